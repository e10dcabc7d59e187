//! Slot-based assembly of one generated Java enum.
//!
//! A [`TargetEnumSpec`] owns the dynamic regions of one output file. Each
//! discovered [`Member`] appends one fragment to every region, and
//! [`TargetEnumSpec::finalize`] turns the last constant's separator into the
//! terminator Java requires before the enum body continues.

use askama::Template;

use super::comments::{render_doc_block, TextReplacements};
use super::scanner::Member;

/// Separator written after every enum constant.
pub const CONSTANT_SEPARATOR: &str = ",\n\n";

/// Terminator written after the last enum constant.
pub const CONSTANT_TERMINATOR: &str = ";\n\n";

/// Spaces per indentation level in generated Java.
const INDENT_WIDTH: usize = 4;

/// Indentation of enum constants.
const CONSTANT_LEVEL: usize = 1;

/// Indentation of `case` arms inside the mapping switches.
const CASE_LEVEL: usize = 3;

/// Whitespace for an indentation level.
pub fn indent(level: usize) -> String {
    " ".repeat(INDENT_WIDTH * level)
}

/// The dynamic regions of a generated enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    /// Enum constant declarations, each bound to the proto value
    Declarations,
    /// `valueOf(ProtoEnum)` switch arms: proto name to constant
    ForwardMapping,
    /// `toString()` switch arms: constant to display string
    ReverseMapping,
}

impl SlotKind {
    pub fn name(self) -> &'static str {
        match self {
            SlotKind::Declarations => "declarations",
            SlotKind::ForwardMapping => "forward_mapping",
            SlotKind::ReverseMapping => "reverse_mapping",
        }
    }
}

/// A named, growable region of generated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSlot {
    kind: SlotKind,
    text: String,
}

impl TemplateSlot {
    pub fn new(kind: SlotKind) -> Self {
        Self {
            kind,
            text: String::new(),
        }
    }

    pub fn kind(&self) -> SlotKind {
        self.kind
    }

    pub fn push_str(&mut self, fragment: &str) {
        self.text.push_str(fragment);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replace a trailing `from` with `to`. Returns whether anything changed.
    fn replace_suffix(&mut self, from: &str, to: &str) -> bool {
        if !self.text.ends_with(from) {
            return false;
        }
        let cut = self.text.len() - from.len();
        self.text.truncate(cut);
        self.text.push_str(to);
        true
    }
}

#[derive(Template)]
#[template(
    source = "{{ pad }}{{ canonical }}({{ qualified }}.{{ original }})",
    ext = "txt",
    escape = "none"
)]
struct ConstantLine<'a> {
    pad: &'a str,
    canonical: &'a str,
    qualified: &'a str,
    original: &'a str,
}

#[derive(Template)]
#[template(
    source = "{{ pad }}case {{ original }} -> {{ canonical }};",
    ext = "txt",
    escape = "none"
)]
struct ForwardCase<'a> {
    pad: &'a str,
    original: &'a str,
    canonical: &'a str,
}

#[derive(Template)]
#[template(
    source = "{{ pad }}case {{ canonical }} -> \"{{ canonical }}\";",
    ext = "txt",
    escape = "none"
)]
struct ReverseCase<'a> {
    pad: &'a str,
    canonical: &'a str,
}

/// The slots of one target enum.
#[derive(Debug, Clone)]
pub struct TargetEnumSpec {
    /// Java expression naming the proto enum, e.g. `HederaFunctionality`
    qualified_name: String,
    declarations: TemplateSlot,
    forward: TemplateSlot,
    reverse: Option<TemplateSlot>,
    replacements: TextReplacements,
    members: usize,
}

impl TargetEnumSpec {
    /// Create the slots for a target.
    ///
    /// `reverse_mapping` decides whether a `toString()` region is produced.
    pub fn new(
        qualified_name: impl Into<String>,
        reverse_mapping: bool,
        replacements: TextReplacements,
    ) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            declarations: TemplateSlot::new(SlotKind::Declarations),
            forward: TemplateSlot::new(SlotKind::ForwardMapping),
            reverse: reverse_mapping.then(|| TemplateSlot::new(SlotKind::ReverseMapping)),
            replacements,
            members: 0,
        }
    }

    /// Append the fragments for one member to every slot.
    pub fn push_member(&mut self, member: &Member) -> anyhow::Result<()> {
        let constant_pad = indent(CONSTANT_LEVEL);
        let case_pad = indent(CASE_LEVEL);

        let doc = render_doc_block(&member.doc_lines, CONSTANT_LEVEL, &self.replacements)?;
        let constant = ConstantLine {
            pad: &constant_pad,
            canonical: &member.canonical_name,
            qualified: &self.qualified_name,
            original: &member.original_name,
        }
        .render()?;
        self.declarations.push_str(&doc);
        self.declarations.push_str(&constant);
        self.declarations.push_str(CONSTANT_SEPARATOR);

        let forward = ForwardCase {
            pad: &case_pad,
            original: &member.original_name,
            canonical: &member.canonical_name,
        }
        .render()?;
        self.forward.push_str(&forward);
        self.forward.push_str("\n");

        if let Some(reverse) = self.reverse.as_mut() {
            let case = ReverseCase {
                pad: &case_pad,
                canonical: &member.canonical_name,
            }
            .render()?;
            reverse.push_str(&case);
            reverse.push_str("\n");
        }

        self.members += 1;
        Ok(())
    }

    /// Terminate the constant list.
    ///
    /// Replaces the trailing separator with the terminator; calling it again
    /// finds no separator and changes nothing.
    pub fn finalize(&mut self) {
        self.declarations
            .replace_suffix(CONSTANT_SEPARATOR, CONSTANT_TERMINATOR);
    }

    pub fn slot(&self, kind: SlotKind) -> Option<&TemplateSlot> {
        match kind {
            SlotKind::Declarations => Some(&self.declarations),
            SlotKind::ForwardMapping => Some(&self.forward),
            SlotKind::ReverseMapping => self.reverse.as_ref(),
        }
    }

    /// Text of a slot, empty when the target has no such slot.
    pub fn slot_text(&self, kind: SlotKind) -> &str {
        self.slot(kind).map_or("", TemplateSlot::as_str)
    }

    pub fn has_reverse_mapping(&self) -> bool {
        self.reverse.is_some()
    }

    pub fn member_count(&self) -> usize {
        self.members
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    fn member(original: &str, canonical: &str, doc: &[&str]) -> Member {
        Member {
            original_name: original.to_string(),
            canonical_name: canonical.to_string(),
            doc_lines: doc.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn spec(reverse: bool) -> TargetEnumSpec {
        TargetEnumSpec::new(
            "HederaFunctionality",
            reverse,
            TextReplacements::new([("&", "and")]),
        )
    }

    #[test]
    fn test_push_member_fills_every_slot() {
        let mut spec = spec(true);
        spec.push_member(&member("CryptoTransfer", "CRYPTO_TRANSFER", &["transfer & pay"]))
            .unwrap();

        assert_eq!(
            spec.slot_text(SlotKind::Declarations),
            "    /**\n     * transfer and pay\n     */\n    CRYPTO_TRANSFER(HederaFunctionality.CryptoTransfer),\n\n"
        );
        assert_eq!(
            spec.slot_text(SlotKind::ForwardMapping),
            "            case CryptoTransfer -> CRYPTO_TRANSFER;\n"
        );
        assert_eq!(
            spec.slot_text(SlotKind::ReverseMapping),
            "            case CRYPTO_TRANSFER -> \"CRYPTO_TRANSFER\";\n"
        );
        assert_eq!(spec.member_count(), 1);
    }

    #[test]
    fn test_no_reverse_slot_when_not_configured() {
        let mut spec = spec(false);
        spec.push_member(&member("OK", "OK", &[])).unwrap();
        assert!(!spec.has_reverse_mapping());
        assert!(spec.slot(SlotKind::ReverseMapping).is_none());
        assert_eq!(spec.slot_text(SlotKind::ReverseMapping), "");
        assert_eq!(
            spec.slot_text(SlotKind::Declarations),
            "    OK(HederaFunctionality.OK),\n\n"
        );
    }

    #[test]
    fn test_finalize_terminates_last_constant() {
        let mut spec = spec(false);
        spec.push_member(&member("NONE", "NONE", &[])).unwrap();
        spec.push_member(&member("CryptoTransfer", "CRYPTO_TRANSFER", &[]))
            .unwrap();
        spec.finalize();

        let decl = spec.slot_text(SlotKind::Declarations);
        assert_eq!(
            decl,
            "    NONE(HederaFunctionality.NONE),\n\n    CRYPTO_TRANSFER(HederaFunctionality.CryptoTransfer);\n\n"
        );
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let mut spec = spec(true);
        spec.push_member(&member("NONE", "NONE", &["do nothing"]))
            .unwrap();
        spec.finalize();
        let once = spec.slot_text(SlotKind::Declarations).to_string();
        spec.finalize();
        assert_eq!(spec.slot_text(SlotKind::Declarations), once);
    }

    #[test]
    fn test_finalize_empty_is_noop() {
        let mut spec = spec(true);
        spec.finalize();
        assert!(spec.slot(SlotKind::Declarations).unwrap().is_empty());
    }
}
