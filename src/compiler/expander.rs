//! The second pass: translates each buffered program line into assembly.
//!
//! The directive vocabulary is fixed.  A line which is not a directive, or
//! which looks like a `GO` or `PRINT` directive but is malformed, is copied
//! to the output as is so that raw assembly can be written anywhere in a
//! program.
use log::debug;

use super::loader::ProgramLines;
use super::print::PrintBlock;
use super::source::{is_space, trim};
use super::x86::assembly::Inst;
use crate::assembly;
use crate::diagnostics::config::{Tracing, TracingConfig};
use crate::trace;

/// The longest label a `GO` directive can name
pub const MAX_LABEL_LEN: usize = 127;

#[derive(Debug, PartialEq)]
pub enum Directive<'a> {
    /// `STOP`
    Stop,
    /// `STOP_LOOP`
    StopLoop,
    /// `GO <label>:`
    Go(&'a str),
    /// `PRINT "<text>"`, holding the text between the first and last quote
    Print(&'a str),
    /// Anything else, emitted unchanged
    Verbatim(&'a str),
}

impl<'a> Directive<'a> {
    /// Determines which directive a line holds.  Leading and trailing
    /// whitespace is ignored.
    pub fn classify(line: &'a str) -> Directive<'a> {
        let line = trim(line);
        if line == "STOP" {
            Directive::Stop
        } else if line == "STOP_LOOP" {
            Directive::StopLoop
        } else if line.starts_with("GO") {
            go_label(line).map_or(Directive::Verbatim(line), Directive::Go)
        } else if line.starts_with("PRINT") {
            print_text(line).map_or(Directive::Verbatim(line), Directive::Print)
        } else {
            Directive::Verbatim(line)
        }
    }
}

/// Extracts `label` from `GO <label>:`.  Whitespace may appear between `GO`
/// and the label and between the label and the colon.  Returns `None` if
/// there is no label or the label is not followed by a colon.
fn go_label(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("GO")?;
    let rest = rest.trim_start_matches(is_space);

    let len = rest
        .char_indices()
        .take_while(|(_, c)| *c != ':' && !is_space(*c))
        .take(MAX_LABEL_LEN)
        .map(|(idx, c)| idx + c.len_utf8())
        .last()
        .unwrap_or(0);
    let (label, rest) = rest.split_at(len);

    let rest = rest.trim_start_matches(is_space);
    if !label.is_empty() && rest.starts_with(':') {
        Some(label)
    } else {
        None
    }
}

/// Extracts the text between the first and the last `"` of a line.  A quote
/// inside the text is not escaped, so `PRINT "a "b" c"` prints `a "b" c`
/// and produces a broken string in the output.
fn print_text(line: &str) -> Option<&str> {
    let start = line.find('"')?;
    let end = line.rfind('"')?;
    if end > start {
        Some(&line[start + 1..end])
    } else {
        None
    }
}

/// Expands the program lines of a source file into assembly.
pub struct Expander {
    tracing: TracingConfig,
    line: u32,
    current: String,

    /// Number of print blocks emitted so far; also the id of the next block
    print_count: u32,

    /// Id of the most recently emitted print block
    prev_print: Option<u32>,

    blocks: Vec<PrintBlock>,
    jumps: Vec<String>,
    verbatim: usize,
}

impl Tracing for Expander {
    fn set_tracing(&mut self, config: TracingConfig) {
        self.tracing = config;
    }
}

impl Expander {
    pub fn new() -> Expander {
        Expander {
            tracing: TracingConfig::Off,
            line: 0,
            current: String::new(),
            print_count: 0,
            prev_print: None,
            blocks: vec![],
            jumps: vec![],
            verbatim: 0,
        }
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn current_line(&self) -> &str {
        &self.current
    }

    /// The print blocks which have been emitted, in order
    pub fn blocks(&self) -> &[PrintBlock] {
        &self.blocks
    }

    /// The targets of every `GO` directive which has been expanded, in order
    pub fn jumps(&self) -> &[String] {
        &self.jumps
    }

    /// The number of lines which were copied to the output unchanged
    pub fn verbatim(&self) -> usize {
        self.verbatim
    }

    /// Expands every line of `program`, in order, appending the generated
    /// code to `code`.
    pub fn expand(&mut self, program: ProgramLines, code: &mut Vec<Inst>) {
        for sl in program {
            self.line = sl.line();
            self.current = sl.trimmed().into();
            trace!(self);

            self.expand_line(sl.text(), code);
        }
    }

    fn expand_line(&mut self, text: &str, code: &mut Vec<Inst>) {
        match Directive::classify(text) {
            Directive::Stop => {
                assembly! {(code) {
                    cli;
                    hlt;
                }}
            }
            Directive::StopLoop => {
                assembly! {(code) {
                    cli;
                    hlt;
                    jmp here;
                }}
            }
            Directive::Go(label) => {
                debug!("L{}: jump to {}", self.line, label);
                assembly! {(code) {
                    jmp @{label};
                }}
                self.jumps.push(label.into());
            }
            Directive::Print(text) => {
                let id = self.print_count;
                self.print_count += 1;

                let block = PrintBlock::new(id, text);
                debug!(
                    "L{}: print block {} with {} segments",
                    self.line,
                    id,
                    block.segments().len()
                );
                block.emit(self.prev_print, code);

                self.prev_print = Some(id);
                self.blocks.push(block);
            }
            Directive::Verbatim(line) => {
                code.push(Inst::Verbatim(line.into()));
                self.verbatim += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::source::SourceLine;

    fn program(lines: &[&str]) -> ProgramLines {
        let mut program = ProgramLines::new();
        for (idx, l) in lines.iter().enumerate() {
            program.push(SourceLine::new(idx as u32 + 1, l));
        }
        program
    }

    fn expand(lines: &[&str]) -> (Expander, Vec<String>) {
        let mut expander = Expander::new();
        let mut code = vec![];
        expander.expand(program(lines), &mut code);
        let text = code
            .iter()
            .map(|i| format!("{}", i).trim().to_string())
            .collect();
        (expander, text)
    }

    #[test]
    fn test_classify() {
        let tests = vec![
            ("STOP", Directive::Stop),
            ("  STOP  ", Directive::Stop),
            ("STOP_LOOP", Directive::StopLoop),
            ("STOPS", Directive::Verbatim("STOPS")),
            ("stop", Directive::Verbatim("stop")),
            ("GO loop:", Directive::Go("loop")),
            ("GO   loop   :", Directive::Go("loop")),
            ("GO\x0Bloop\x0B:", Directive::Go("loop")),
            ("GOloop:", Directive::Go("loop")),
            ("GO loop: trailing", Directive::Go("loop")),
            ("GO loop", Directive::Verbatim("GO loop")),
            ("GO :", Directive::Verbatim("GO :")),
            ("GO", Directive::Verbatim("GO")),
            ("GOTO x:", Directive::Verbatim("GOTO x:")),
            ("go loop:", Directive::Verbatim("go loop:")),
            ("PRINT \"Hi\"", Directive::Print("Hi")),
            ("PRINT   \"Hi\\nThere\"  ", Directive::Print("Hi\\nThere")),
            ("PRINT \"\"", Directive::Print("")),
            ("PRINT \"a \"b\" c\"", Directive::Print("a \"b\" c")),
            ("PRINTLN \"x\"", Directive::Print("x")),
            ("PRINT \"Hi", Directive::Verbatim("PRINT \"Hi")),
            ("PRINT Hi", Directive::Verbatim("PRINT Hi")),
            ("mov ax, 1", Directive::Verbatim("mov ax, 1")),
            ("my_label:", Directive::Verbatim("my_label:")),
        ];

        for (text, expected) in tests {
            assert_eq!(Directive::classify(text), expected, "{}", text);
        }
    }

    #[test]
    fn test_go_label_bound() {
        let longest = format!("GO {}:", "a".repeat(MAX_LABEL_LEN));
        assert_eq!(
            Directive::classify(&longest),
            Directive::Go(&longest[3..3 + MAX_LABEL_LEN])
        );

        let too_long = format!("GO {}:", "a".repeat(MAX_LABEL_LEN + 1));
        assert_eq!(
            Directive::classify(&too_long),
            Directive::Verbatim(too_long.as_str())
        );
    }

    #[test]
    fn test_stop() {
        let (_, text) = expand(&["STOP"]);
        assert_eq!(text, vec!["cli", "hlt"]);
    }

    #[test]
    fn test_stop_loop() {
        let (_, text) = expand(&["STOP_LOOP"]);
        assert_eq!(text, vec!["cli", "hlt", "jmp $"]);
    }

    #[test]
    fn test_go() {
        let (expander, text) = expand(&["GO loop:", "GO loop"]);
        assert_eq!(text, vec!["jmp loop", "GO loop"]);
        assert_eq!(expander.jumps(), &["loop".to_string()]);
        assert_eq!(expander.verbatim(), 1);
    }

    #[test]
    fn test_verbatim_is_trimmed() {
        let (_, text) = expand(&["   loop:   ", "\tmov ax, 1"]);
        assert_eq!(text, vec!["loop:", "mov ax, 1"]);
    }

    #[test]
    fn test_print_blocks_are_numbered_and_chained() {
        let (expander, text) = expand(&[
            "PRINT \"one\"",
            "mov ax, 1",
            "PRINT \"two\"",
            "PRINT \"three\"",
            "STOP",
        ]);

        let ids: Vec<_> = expander.blocks().iter().map(|b| b.id()).collect();
        assert_eq!(ids, vec![0, 1, 2]);

        let pos = |s: &str| text.iter().position(|t| t == s).unwrap();
        assert!(pos("print_0:") < pos("print_1:"));
        assert!(pos("print_1:") < pos("print_2:"));

        // Every block after the first is preceded by a jump to its label
        assert_eq!(text[pos("print_1:") - 1], "jmp print_1");
        assert_eq!(text[pos("print_2:") - 1], "jmp print_2");
        assert!(!text.contains(&"jmp print_0".to_string()));
        assert!(!text.contains(&"jmp print_3".to_string()));

        // The raw line stays between the blocks it was written between
        assert!(pos("mov ax, 1") > pos("print_end_0:"));
        assert!(pos("mov ax, 1") < pos("jmp print_1"));

        assert_eq!(text.last().unwrap(), "hlt");
    }

    #[test]
    fn test_malformed_print_does_not_take_an_id() {
        let (expander, text) = expand(&["PRINT oops", "PRINT \"ok\""]);
        assert_eq!(text[0], "PRINT oops");
        assert_eq!(text[1], "print_0:");
        assert_eq!(expander.blocks().len(), 1);
    }
}
