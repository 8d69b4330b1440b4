//! Code generation for the `PRINT "<text>"` directive.
//!
//! Each PRINT becomes a print block: a routine which writes its message one
//! character at a time through the BIOS teletype interrupt, followed by the
//! table holding the message.  Blocks are numbered in the order they are
//! expanded and every block after the first is reached by a jump from the
//! end of the block before it.
use log::debug;

use super::x86::assembly::{DataItem, Inst};
use crate::assembly;

/// Size of the buffer which escape conversion writes into, including the
/// terminator; at most `ESCAPE_BUFFER_LEN - 1` characters are converted.
pub const ESCAPE_BUFFER_LEN: usize = 2048;

/// Byte written for a line break in a message
pub const NEWLINE: u8 = 10;

/// Converts each `\n` escape in `text` to a line break.  Every other
/// character is copied as is.  Conversion stops once the output has
/// `max_len - 1` characters and the rest of `text` is dropped.
pub fn convert_escapes(text: &str, max_len: usize) -> String {
    let mut out = String::new();
    let mut count = 0;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if count + 1 >= max_len {
            debug!("Escape buffer full, dropping the rest of: {}", text);
            break;
        }

        if c == '\\' && chars.peek() == Some(&'n') {
            chars.next();
            out.push('\n');
        } else {
            out.push(c);
        }
        count += 1;
    }

    out
}

#[derive(Clone, Debug, PartialEq)]
pub struct PrintBlock {
    id: u32,
    segments: Vec<String>,
}

impl PrintBlock {
    /// Creates the print block `id` for the message text found between the
    /// quotes of a PRINT directive.
    pub fn new(id: u32, text: &str) -> PrintBlock {
        let converted = convert_escapes(text, ESCAPE_BUFFER_LEN);
        PrintBlock {
            id,
            segments: converted.split('\n').map(|s| s.into()).collect(),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// The message split at each line break
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Label of the entry point of this block's routine
    pub fn label(&self) -> String {
        format!("print_{}", self.id)
    }

    /// Label of this block's message table
    pub fn message_label(&self) -> String {
        format!("message_{}", self.id)
    }

    /// The items of the message table: each non-empty segment as a quoted
    /// string, a newline byte between consecutive segments, and a terminating
    /// zero byte.
    pub fn data(&self) -> Vec<DataItem> {
        let mut items = vec![];
        for (idx, seg) in self.segments.iter().enumerate() {
            if idx > 0 {
                items.push(DataItem::Byte(NEWLINE));
            }
            if !seg.is_empty() {
                items.push(DataItem::Str(seg.clone()));
            }
        }
        items.push(DataItem::Byte(0));
        items
    }

    /// Writes this block to `code`.  If `prev` is the id of an earlier print
    /// block then a jump from the end of that block to the start of this one
    /// is written first.
    pub fn emit(&self, prev: Option<u32>, code: &mut Vec<Inst>) {
        let id = self.id;
        if prev.is_some() {
            assembly! {(code) {
                jmp @{self.label()};
            }}
        }

        assembly! {(code) {
            @{self.label()}:
                cli;
                xor %ax, %ax;
                mov %ds, %ax;
                mov %si, @{self.message_label()};
            @{format!("print_loop_{}", id)}:
                lodsb;
                or %al, %al;
                jz @{format!("print_done_{}", id)};
                cmp %al, 10;
                jne @{format!("print_char_{}", id)};
                mov %al, 13;
                mov %ah, 0x0E;
                int 0x10;
                mov %al, 10;
                mov %ah, 0x0E;
                int 0x10;
                jmp @{format!("print_loop_{}", id)};
            @{format!("print_char_{}", id)}:
                mov %ah, 0x0E;
                int 0x10;
                jmp @{format!("print_loop_{}", id)};
            @{format!("print_done_{}", id)}:
                sti;
                jmp @{format!("print_end_{}", id)};
        }}

        code.push(Inst::Data(Some(self.message_label()), self.data()));

        assembly! {(code) {
            @{format!("print_end_{}", id)}:
        }}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(code: &[Inst]) -> Vec<String> {
        code.iter().map(|i| format!("{}", i).trim().to_string()).collect()
    }

    #[test]
    fn test_convert_escapes() {
        let tests = vec![
            ("Hi", "Hi"),
            ("Hi\\nThere", "Hi\nThere"),
            ("\\n", "\n"),
            ("a\\tb", "a\\tb"),
            ("trailing\\", "trailing\\"),
            ("\\\\n", "\\\n"),
        ];

        for (text, expected) in tests {
            assert_eq!(convert_escapes(text, ESCAPE_BUFFER_LEN), expected, "{}", text);
        }
    }

    #[test]
    fn test_convert_escapes_bound() {
        assert_eq!(convert_escapes("abcdef", 4), "abc");
        assert_eq!(convert_escapes("a\\nbcdef", 4), "a\nb");
        assert_eq!(convert_escapes("abc", 4), "abc");
        assert_eq!(convert_escapes("abc", 1), "");
    }

    #[test]
    fn test_segments() {
        let tests = vec![
            ("Hello", vec!["Hello"]),
            ("Hi\\nThere", vec!["Hi", "There"]),
            ("a\\nb\\nc", vec!["a", "b", "c"]),
            ("Hi\\n", vec!["Hi", ""]),
            ("", vec![""]),
        ];

        for (text, expected) in tests {
            let block = PrintBlock::new(0, text);
            assert_eq!(block.segments(), expected.as_slice(), "{}", text);
        }
    }

    #[test]
    fn test_data() {
        let tests = vec![
            ("Hi\\nThere", "db \"Hi\",10,\"There\",0"),
            ("Hello world", "db \"Hello world\",0"),
            ("Hi\\n", "db \"Hi\",10,0"),
            ("\\nHi", "db 10,\"Hi\",0"),
            ("a\\n\\nb", "db \"a\",10,10,\"b\",0"),
            ("", "db 0"),
        ];

        for (text, expected) in tests {
            let block = PrintBlock::new(0, text);
            let data = format!("{}", Inst::Data(None, block.data()));
            assert_eq!(data.trim(), expected, "{}", text);
        }
    }

    #[test]
    fn test_newline_count_matches_escapes() {
        let block = PrintBlock::new(0, "one\\ntwo\\nthree");
        let newlines = block
            .data()
            .iter()
            .filter(|i| **i == DataItem::Byte(NEWLINE))
            .count();
        assert_eq!(newlines, 2);
        assert_eq!(block.segments().len(), 3);
    }

    #[test]
    fn test_first_block_has_no_chain_jump() {
        let mut code = vec![];
        PrintBlock::new(0, "Hi").emit(None, &mut code);
        let text = render(&code);
        assert_eq!(text[0], "print_0:");
        assert!(!text.contains(&"jmp print_0".to_string()));
    }

    #[test]
    fn test_chain_jump() {
        let mut code = vec![];
        PrintBlock::new(4, "Hi").emit(Some(3), &mut code);
        let text = render(&code);
        assert_eq!(text[0], "jmp print_4");
        assert_eq!(text[1], "print_4:");
    }

    #[test]
    fn test_routine() {
        let mut code = vec![];
        PrintBlock::new(2, "Hi\\nThere").emit(None, &mut code);
        assert_eq!(
            render(&code),
            vec![
                "print_2:",
                "cli",
                "xor ax, ax",
                "mov ds, ax",
                "mov si, message_2",
                "print_loop_2:",
                "lodsb",
                "or al, al",
                "jz print_done_2",
                "cmp al, 10",
                "jne print_char_2",
                "mov al, 13",
                "mov ah, 0x0E",
                "int 0x10",
                "mov al, 10",
                "mov ah, 0x0E",
                "int 0x10",
                "jmp print_loop_2",
                "print_char_2:",
                "mov ah, 0x0E",
                "int 0x10",
                "jmp print_loop_2",
                "print_done_2:",
                "sti",
                "jmp print_end_2",
                "message_2: db \"Hi\",10,\"There\",0",
                "print_end_2:",
            ]
        );
    }
}
