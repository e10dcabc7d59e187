#![allow(clippy::unwrap_used, clippy::expect_used)]

use enum_mirror::generator::{
    generate_contract_params, layout, scan_enum, to_constant_case, IdentifierNormalizer, Lexer,
    MarkerKind, OverrideTable, ScanEnd, Section, SlotKind, TargetEnumSpec, TextReplacements,
    TokenKind,
};

fn normalizer() -> IdentifierNormalizer {
    IdentifierNormalizer::new(OverrideTable::new([("UTIL_PRNG", "PRNG")]))
}

#[test]
fn test_to_constant_case() {
    assert_eq!(to_constant_case("AccountID"), "ACCOUNT_ID");
    assert_eq!(to_constant_case("OK"), "OK");
    assert_eq!(to_constant_case("duplicateAccount_Id"), "DUPLICATEACCOUNT_ID");
    assert_eq!(to_constant_case("TokenCreate"), "TOKEN_CREATE");
}

#[test]
fn test_override_applies_after_casing() {
    assert_eq!(normalizer().canonicalize("UtilPrng"), "PRNG");
    assert_eq!(normalizer().canonicalize("UTIL_PRNG"), "PRNG");
    assert_eq!(normalizer().canonicalize("UtilPrngX"), "UTIL_PRNG_X");
}

#[test]
fn test_marker_priority_order() {
    assert_eq!(
        MarkerKind::BY_PRIORITY,
        [
            MarkerKind::Assignment,
            MarkerKind::LineComment,
            MarkerKind::BlockComment,
            MarkerKind::Terminator,
        ]
    );
    assert!(MarkerKind::Assignment < MarkerKind::Terminator);
    assert_eq!(MarkerKind::classify(b"/* x */", 0), Some(MarkerKind::BlockComment));
    assert_eq!(MarkerKind::classify(b"/x", 0), None);
}

#[test]
fn test_lexer_single_pass() {
    let text = "{\n  A = 1; // one\n}";
    let kinds: Vec<TokenKind> = Lexer::new(text, 1).map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        [
            TokenKind::LineBreak,
            TokenKind::Assignment,
            TokenKind::LineComment,
            TokenKind::LineBreak,
            TokenKind::Terminator,
        ]
    );
}

#[test]
fn test_scan_realistic_response_codes() {
    let text = r#"
enum ResponseCodeEnum {
    /**
     * The transaction passed the precheck validations.
     */
    OK = 0;

    /**
     * For any error not handled by specific error codes listed below.
     */
    INVALID_TRANSACTION = 1;

    // Payer account does not exist.
    PAYER_ACCOUNT_NOT_FOUND = 2 [deprecated = true];
}
"#;
    let (members, end) = scan_enum(text, "ResponseCodeEnum", &normalizer()).unwrap();
    assert_eq!(end, Some(ScanEnd::Terminator));
    let names: Vec<_> = members.iter().map(|m| m.canonical_name.as_str()).collect();
    assert_eq!(names, ["OK", "INVALID_TRANSACTION", "PAYER_ACCOUNT_NOT_FOUND"]);
    assert_eq!(
        members[0].doc_lines,
        ["The transaction passed the precheck validations."]
    );
    assert_eq!(members[2].doc_lines, ["Payer account does not exist."]);
}

#[test]
fn test_scan_unknown_enum() {
    assert!(scan_enum("enum SubType { DEFAULT = 0; }", "TokenType", &normalizer()).is_none());
}

#[test]
fn test_scan_halts_on_unterminated_comment() {
    let text = "enum SubType {\n  DEFAULT = 0;\n  /* never closed\n  TOKEN = 1;\n";
    let (members, end) = scan_enum(text, "SubType", &normalizer()).unwrap();
    assert_eq!(members.len(), 1);
    assert!(matches!(end, Some(ScanEnd::UnterminatedComment { .. })));
}

#[test]
fn test_finalize_is_idempotent() {
    let text = "enum SubType {\n  DEFAULT = 0;\n}";
    let (members, _) = scan_enum(text, "SubType", &normalizer()).unwrap();
    let mut spec = TargetEnumSpec::new("SubType", false, TextReplacements::default());
    spec.push_member(&members[0]).unwrap();
    spec.finalize();
    let once = spec.slot_text(SlotKind::Declarations).to_string();
    spec.finalize();
    assert_eq!(spec.slot_text(SlotKind::Declarations), once);
    assert_eq!(once, "    DEFAULT(SubType.DEFAULT);\n\n");
    assert!(spec.slot(SlotKind::ReverseMapping).is_none());
}

#[test]
fn test_layout_order() {
    assert_eq!(
        layout(true),
        [
            Section::Static(0),
            Section::Dynamic(SlotKind::Declarations),
            Section::Static(2),
            Section::Dynamic(SlotKind::ForwardMapping),
            Section::Static(4),
            Section::Dynamic(SlotKind::ReverseMapping),
            Section::Static(6),
        ]
    );
}

#[test]
fn test_contract_params_groups() {
    let out = generate_contract_params().unwrap();
    let int = out.find("INT VERSIONS").unwrap();
    let uint = out.find("UINT VERSIONS").unwrap();
    let int_array = out.find("INT ARRAY VERSIONS").unwrap();
    let uint_array = out.find("UINT ARRAY VERSIONS").unwrap();
    assert!(int < uint && uint < int_array && int_array < uint_array);
    assert!(out.contains("public ContractFunctionParameters addUint72(BigInteger value) {"));
}
