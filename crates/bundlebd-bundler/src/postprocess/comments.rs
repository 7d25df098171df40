//! Line comment removal for library artifacts.

use regex::Regex;

use crate::error::Result;

/// An optional newline, `//`, the rest of the line and its newline.
///
/// The rest of the line stops at `\r` as well, so a comment on a CRLF line
/// never matches.
pub const LINE_COMMENT_PATTERN: &str = r"\n?//[^\r\n]*\n";

/// Textual `//` comment stripper.
///
/// Every match of [`LINE_COMMENT_PATTERN`] is removed. This is not a parser:
/// `//` inside a string literal (a URL, say) is stripped along with the rest
/// of its line, and a comment on the last line is only removed if the file
/// ends with a newline.
#[derive(Debug, Clone)]
pub struct CommentStripper {
    pattern: Regex,
}

impl CommentStripper {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(LINE_COMMENT_PATTERN)?,
        })
    }

    pub fn strip(&self, source: &str) -> String {
        self.pattern.replace_all(source, "").into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(source: &str) -> String {
        CommentStripper::new().unwrap().strip(source)
    }

    #[test]
    fn removes_full_line_comments_with_their_line_break() {
        assert_eq!(strip("a();\n// note\nb();\n"), "a();b();\n");
    }

    #[test]
    fn removes_trailing_comments() {
        assert_eq!(strip("a(); // note\nb();\n"), "a(); b();\n");
    }

    #[test]
    fn consecutive_comment_lines() {
        assert_eq!(strip("a();\n// one\n// two\nb();\n"), "a();b();\n");
    }

    #[test]
    fn crlf_comment_lines_are_kept() {
        let source = "a();\r\n// note\r\nb(); // tail\r\n";
        assert_eq!(strip(source), source);
    }

    #[test]
    fn lf_comment_after_crlf_code_is_removed() {
        assert_eq!(strip("a();\r\n// note\nb();\n"), "a();\rb();\n");
    }

    #[test]
    fn last_line_without_newline_is_kept() {
        assert_eq!(strip("a();\n// tail"), "a();\n// tail");
    }

    #[test]
    fn urls_in_strings_are_stripped_too() {
        assert_eq!(
            strip("const u = \"https://example.com\";\nnext();\n"),
            "const u = \"https:next();\n"
        );
    }

    #[test]
    fn source_without_comments_is_unchanged() {
        let source = "export const a = 1;\nexport const b = a / 2;\n";
        assert_eq!(strip(source), source);
    }
}
