//! Identifier canonicalization
//!
//! Converts protobuf enum value identifiers (which upstream writes in a mix of
//! `UPPER_SNAKE`, `lower` and `CamelCase`) into the `UPPER_SNAKE` form used
//! for Java enum constants.

use std::collections::BTreeMap;

/// Separator inserted between words of a canonical name.
const SEPARATOR: char = '_';

/// Two-letter abbreviation kept together when splitting camel case.
///
/// `AccountID` must become `ACCOUNT_ID`, not `ACCOUNT_I_D`.
const SUFFIX_MARKER: [char; 2] = ['I', 'D'];

/// Convert a source identifier to constant case, without overrides.
///
/// Names that already contain a separator, or whose letters are all one case,
/// are uppercased verbatim. Everything else is split at uppercase letters.
///
/// # Example
///
/// ```rust
/// use enum_mirror::generator::to_constant_case;
///
/// assert_eq!(to_constant_case("CryptoTransfer"), "CRYPTO_TRANSFER");
/// assert_eq!(to_constant_case("AccountID"), "ACCOUNT_ID");
/// assert_eq!(to_constant_case("duplicateAccount_Id"), "DUPLICATEACCOUNT_ID");
/// ```
pub fn to_constant_case(name: &str) -> String {
    if name.contains(SEPARATOR) || is_single_case(name) {
        return name.to_uppercase();
    }

    let chars: Vec<char> = name.chars().collect();
    let Some((first, rest)) = chars.split_first() else {
        return String::new();
    };

    let mut out: String = first.to_uppercase().collect();
    let mut i = 0;
    while i < rest.len() {
        if rest[i..].starts_with(&SUFFIX_MARKER) {
            out.push(SEPARATOR);
            out.extend(SUFFIX_MARKER);
            i += SUFFIX_MARKER.len();
            continue;
        }
        let c = rest[i];
        if c.is_uppercase() {
            out.push(SEPARATOR);
        }
        out.extend(c.to_uppercase());
        i += 1;
    }
    out
}

/// True when every cased letter has the same case and there is at least one.
fn is_single_case(name: &str) -> bool {
    let mut cased = name.chars().filter(|c| c.is_uppercase() || c.is_lowercase());
    match cased.next() {
        None => false,
        Some(first) if first.is_uppercase() => cased.all(char::is_uppercase),
        Some(_) => cased.all(char::is_lowercase),
    }
}

/// Canonical-name substitutions applied after casing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideTable {
    entries: BTreeMap<String, String>,
}

impl OverrideTable {
    /// Build a table from `(canonical, replacement)` pairs.
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Replacement for `canonical`, if configured.
    pub fn get(&self, canonical: &str) -> Option<&str> {
        self.entries.get(canonical).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Canonicalizes identifiers: constant casing followed by the override table.
#[derive(Debug, Clone, Default)]
pub struct IdentifierNormalizer {
    overrides: OverrideTable,
}

impl IdentifierNormalizer {
    pub fn new(overrides: OverrideTable) -> Self {
        Self { overrides }
    }

    /// Canonical name for `name`.
    ///
    /// Depends only on `name` and the override table, never on where the
    /// identifier was found.
    pub fn canonicalize(&self, name: &str) -> String {
        let cased = to_constant_case(name);
        match self.overrides.get(&cased) {
            Some(replacement) => replacement.to_string(),
            None => cased,
        }
    }

    pub fn overrides(&self) -> &OverrideTable {
        &self.overrides
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    fn normalizer() -> IdentifierNormalizer {
        IdentifierNormalizer::new(OverrideTable::new([("UTIL_PRNG", "PRNG")]))
    }

    #[test]
    fn test_marker_token_merges() {
        assert_eq!(to_constant_case("AccountID"), "ACCOUNT_ID");
        assert_eq!(to_constant_case("TokenIDRepeated"), "TOKEN_ID_REPEATED");
    }

    #[test]
    fn test_single_case_is_uppercased_verbatim() {
        assert_eq!(to_constant_case("OK"), "OK");
        assert_eq!(to_constant_case("none"), "NONE");
        assert_eq!(to_constant_case("FAIL_FEE"), "FAIL_FEE");
    }

    #[test]
    fn test_separator_short_circuits_camel_split() {
        assert_eq!(to_constant_case("duplicateAccount_Id"), "DUPLICATEACCOUNT_ID");
        assert_eq!(to_constant_case("Crypto_Transfer"), "CRYPTO_TRANSFER");
    }

    #[test]
    fn test_camel_case_split() {
        assert_eq!(to_constant_case("CryptoTransfer"), "CRYPTO_TRANSFER");
        assert_eq!(to_constant_case("ConsensusCreateTopic"), "CONSENSUS_CREATE_TOPIC");
        assert_eq!(to_constant_case("cryptoTransfer"), "CRYPTO_TRANSFER");
    }

    #[test]
    fn test_marker_is_case_sensitive() {
        // "Id" is not the marker; the uppercase I splits normally
        assert_eq!(to_constant_case("AccountId"), "ACCOUNT_ID");
        // "ID" at the start is handled by the first-character rule
        assert_eq!(to_constant_case("IDs"), "I_DS");
    }

    #[test]
    fn test_no_letters_and_empty() {
        assert_eq!(to_constant_case(""), "");
        assert_eq!(to_constant_case("42"), "42");
    }

    #[test]
    fn test_override_applied_after_casing() {
        let n = normalizer();
        assert_eq!(n.canonicalize("UtilPrng"), "PRNG");
        assert_eq!(n.canonicalize("UTIL_PRNG"), "PRNG");
        assert_eq!(n.canonicalize("CryptoTransfer"), "CRYPTO_TRANSFER");
    }

    #[test]
    fn test_canonicalize_is_deterministic() {
        let n = normalizer();
        let first = n.canonicalize("ScheduleCreate");
        let second = n.canonicalize("ScheduleCreate");
        assert_eq!(first, second);
        assert_eq!(first, "SCHEDULE_CREATE");
    }
}
