//! Cell text normalisation: strip category-C characters, then compose (NFC).
//!
//! ## Why is normalisation necessary?
//!
//! PDF text extraction sometimes emits accented Latin letters (Croatian
//! diacritics are the motivating case) as decomposed base + combining-mark
//! sequences, occasionally interleaved with stray control bytes left over
//! from the content stream. Downstream CSV consumers then see `sÌŒ`-style
//! mojibake or invisible junk inside cells. Two deterministic passes fix
//! both:
//!
//! 1. Remove every character whose Unicode general category is in group C
//!    (control, format, private-use, unassigned) EXCEPT tab, newline and
//!    carriage return, which are legitimate in-cell whitespace.
//! 2. Apply canonical composition (NFC) so base + diacritic pairs become
//!    single composed code points.
//!
//! The order matters: stripping first means NFC never re-combines around a
//! control byte. The composite is idempotent — NFC output contains no
//! category-C characters that pass 1 would remove (the preserved tab/CR/LF
//! are NFC-invariant), so a second application is the identity.

use unicode_normalization::UnicodeNormalization;
use unicode_properties::{GeneralCategoryGroup, UnicodeGeneralCategory};

/// Normalise one textual cell value.
pub fn normalize_cell(text: &str) -> String {
    text.chars().filter(|&c| !is_stripped(c)).nfc().collect()
}

/// Normalise an optional cell in place; `None` (absent) cells pass through.
pub fn normalize_opt(cell: Option<String>) -> Option<String> {
    cell.map(|t| normalize_cell(&t))
}

/// Whether a character is removed by the control-character pass.
///
/// Tab, newline and carriage return are always preserved. Everything else in
/// general-category group C (Cc/Cf/Co/Cn; surrogates cannot occur in `char`)
/// is stripped.
fn is_stripped(c: char) -> bool {
    if matches!(c, '\t' | '\n' | '\r') {
        return false;
    }
    c.general_category_group() == GeneralCategoryGroup::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ascii_unchanged() {
        assert_eq!(normalize_cell("hello, world"), "hello, world");
    }

    #[test]
    fn decomposed_diacritic_composes() {
        // "c" + COMBINING CARON → "č" (U+010D)
        assert_eq!(normalize_cell("c\u{030C}"), "\u{010D}");
        // "Š" decomposed: "S" + COMBINING CARON
        assert_eq!(normalize_cell("S\u{030C}ibenik"), "\u{0160}ibenik");
    }

    #[test]
    fn control_byte_stripped_before_composition() {
        // Decomposed č followed by a BEL control byte (Cc, not tab/newline/CR)
        assert_eq!(normalize_cell("c\u{030C}\u{0007}"), "\u{010D}");
    }

    #[test]
    fn tab_newline_cr_preserved() {
        assert_eq!(normalize_cell("a\tb\nc\rd"), "a\tb\nc\rd");
    }

    #[test]
    fn format_characters_stripped() {
        // ZERO WIDTH SPACE, BOM, SOFT HYPHEN are all category Cf
        assert_eq!(normalize_cell("a\u{200B}b\u{FEFF}c\u{00AD}d"), "abcd");
    }

    #[test]
    fn private_use_stripped() {
        assert_eq!(normalize_cell("x\u{E000}y"), "xy");
    }

    #[test]
    fn idempotent() {
        let inputs = [
            "c\u{030C}\u{0007}",
            "S\u{030C}ibenik\u{200B}",
            "a\tb\nc",
            "",
            "already composed: čćžšđ",
        ];
        for input in inputs {
            let once = normalize_cell(input);
            let twice = normalize_cell(&once);
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn none_passes_through() {
        assert_eq!(normalize_opt(None), None);
        assert_eq!(
            normalize_opt(Some("c\u{030C}".into())),
            Some("\u{010D}".into())
        );
    }
}
