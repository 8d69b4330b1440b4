//! A single line of `.nexs` source code, tagged with the line number it was
//! read from so that diagnostics and traces can point back to the source.

/// The largest number of bytes a single source line may contain.
pub const MAX_LINE_LEN: usize = 1023;

#[derive(Clone, Debug, PartialEq)]
pub struct SourceLine {
    line: u32,
    text: String,
}

impl SourceLine {
    pub fn new(line: u32, text: &str) -> SourceLine {
        SourceLine {
            line,
            text: text.into(),
        }
    }

    /// The 1-based line number of this line in its source file
    pub fn line(&self) -> u32 {
        self.line
    }

    /// The raw text of the line, as it was captured by the loader
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The text of the line with leading and trailing whitespace removed
    pub fn trimmed(&self) -> &str {
        trim(&self.text)
    }
}

/// Removes leading and trailing whitespace.  Trimming a line which has already
/// been trimmed returns it unchanged.
pub fn trim(s: &str) -> &str {
    s.trim_matches(is_space)
}

/// ASCII whitespace, including the vertical tab
pub fn is_space(c: char) -> bool {
    c.is_ascii_whitespace() || c == '\x0B'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim() {
        let tests = vec![
            ("STOP", "STOP"),
            ("   STOP", "STOP"),
            ("STOP \t", "STOP"),
            ("\t PRINT \"a b\"  \r", "PRINT \"a b\""),
            ("   ", ""),
            ("\x0BSTOP\x0B", "STOP"),
        ];

        for (text, expected) in tests {
            assert_eq!(trim(text), expected);
        }
    }

    #[test]
    fn test_trim_is_idempotent() {
        for text in ["  GO loop:  ", "{", "\tcolour_bg 1", "mov ax, 1 ", ""].iter() {
            let once = trim(text);
            assert_eq!(trim(once), once);
        }
    }

    #[test]
    fn test_is_space() {
        for c in [' ', '\t', '\n', '\r', '\x0B', '\x0C'].iter() {
            assert!(is_space(*c), "{:?}", c);
        }
        for c in ['a', ':', '\0', '_'].iter() {
            assert!(!is_space(*c), "{:?}", c);
        }
    }

    #[test]
    fn test_source_line() {
        let sl = SourceLine::new(4, "  STOP_LOOP ");
        assert_eq!(sl.line(), 4);
        assert_eq!(sl.text(), "  STOP_LOOP ");
        assert_eq!(sl.trimmed(), "STOP_LOOP");
    }
}
