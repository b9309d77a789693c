//! Input cleanup before the text is handed to the analyzer
//!
//! The analyzer is line oriented: an invisible character in front of the first
//! token shifts every reported position on line 1, and some builds reject the
//! input outright. Only the leading run is removed so legitimate content
//! further in is never touched.

/// Characters removed from the start of the input.
pub const LEADING_NOISE: [char; 4] = ['\u{FEFF}', '\u{200B}', '\r', '\n'];

/// Strip any leading run of byte-order marks, zero-width spaces, carriage
/// returns and line feeds.
pub fn normalize(text: &str) -> &str {
    text.trim_start_matches(LEADING_NOISE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain("int x;", "int x;")]
    #[case::bom("\u{FEFF}int x;", "int x;")]
    #[case::zero_width("\u{200B}int x;", "int x;")]
    #[case::mixed_run("\u{FEFF}\r\n\u{200B}\n\nint x;", "int x;")]
    #[case::only_noise("\u{FEFF}\r\n", "")]
    #[case::empty("", "")]
    #[case::leading_space_kept("  int x;", "  int x;")]
    #[case::tab_kept("\tint x;", "\tint x;")]
    fn strips_leading_run(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize(input), expected);
    }

    #[test]
    fn interior_characters_pass_through() {
        let input = "a\u{FEFF}b\u{200B}c\r\nd\u{0007}e\n";
        assert_eq!(normalize(input), input);
    }

    #[test]
    fn noise_after_first_visible_character_is_kept() {
        assert_eq!(normalize("\nx\n\u{FEFF}"), "x\n\u{FEFF}");
    }
}
