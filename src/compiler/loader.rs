//! The first pass over a `.nexs` source file.
//!
//! The loader strips grouping braces, applies colour directives to the running
//! [`ColourState`] and buffers every other line, in order, for the expander.
//! Colour directives may appear anywhere in the source, so the expander cannot
//! start until this pass is complete.
use std::fmt::Display;

use log::debug;

use super::colour::{Colour, ColourState, Layer};
use super::error::CompilerError;
use super::source::{is_space, trim, SourceLine, MAX_LINE_LEN};
use crate::diagnostics::config::{Tracing, TracingConfig};
use crate::trace;

pub type LoaderResult<T> = Result<T, CompilerError<LoaderError>>;

/// Errors which stop the source from being loaded
#[derive(Clone, Debug, PartialEq)]
pub enum LoaderError {
    LineTooLong(usize),
}

impl Display for LoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderError::LineTooLong(len) => f.write_fmt(format_args!(
                "Line is {} bytes long, lines may be at most {} bytes",
                len, MAX_LINE_LEN
            )),
        }
    }
}

/// Problems in the source which are reported but do not stop compilation
#[derive(Clone, Debug, PartialEq)]
pub enum LoaderWarning {
    /// A colour directive with a code outside of `[0,15]`.  The colour
    /// which was kept in its place is recorded.
    InvalidColour(Layer, i64, Colour),
}

impl Display for LoaderWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderWarning::InvalidColour(layer, code, kept) => f.write_fmt(format_args!(
                "Invalid {} colour code {}, keeping {} ({})",
                layer,
                code,
                kept.code(),
                kept
            )),
        }
    }
}

/// The lines of the program which the expander will translate, in source order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProgramLines(Vec<SourceLine>);

impl ProgramLines {
    pub fn new() -> ProgramLines {
        ProgramLines(vec![])
    }

    pub fn push(&mut self, line: SourceLine) {
        self.0.push(line)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<SourceLine> {
        self.0.iter()
    }
}

impl IntoIterator for ProgramLines {
    type Item = SourceLine;
    type IntoIter = std::vec::IntoIter<SourceLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// The result of the first pass: the final colour settings and the lines
/// of the program.
#[derive(Debug)]
pub struct LoadedSource {
    colours: ColourState,
    program: ProgramLines,
    warnings: Vec<CompilerError<LoaderWarning>>,
}

impl LoadedSource {
    pub fn colours(&self) -> ColourState {
        self.colours
    }

    pub fn program(&self) -> &ProgramLines {
        &self.program
    }

    pub fn warnings(&self) -> &[CompilerError<LoaderWarning>] {
        &self.warnings
    }

    pub fn into_parts(
        self,
    ) -> (
        ColourState,
        ProgramLines,
        Vec<CompilerError<LoaderWarning>>,
    ) {
        (self.colours, self.program, self.warnings)
    }
}

/// How the loader treats a single trimmed line
#[derive(Debug, PartialEq)]
enum LineKind {
    Empty,
    Grouping,
    Colour(Layer, i64),
    Program,
}

fn classify(line: &str) -> LineKind {
    if line.is_empty() {
        LineKind::Empty
    } else if is_grouping(line) {
        LineKind::Grouping
    } else if let Some((layer, code)) = parse_colour(line) {
        LineKind::Colour(layer, code)
    } else {
        LineKind::Program
    }
}

/// A line holding only `{` or `}` is visual grouping and carries no meaning
fn is_grouping(line: &str) -> bool {
    let line = trim(line);
    line == "{" || line == "}"
}

/// Parses `colour_bg <n>` and `colour_fg <n>`.  The keyword only has to be a
/// prefix of the line and the code is read leniently: text which is not a
/// number reads as 0.
fn parse_colour(line: &str) -> Option<(Layer, i64)> {
    [Layer::Background, Layer::Foreground]
        .iter()
        .find(|layer| line.starts_with(layer.keyword()))
        .map(|layer| (*layer, lenient_int(&line[layer.keyword().len()..])))
}

/// Reads the integer at the start of `s`, after any whitespace and an optional
/// sign.  Reading stops at the first character which is not a digit; if there
/// are no digits the result is 0.
fn lenient_int(s: &str) -> i64 {
    let s = s.trim_start_matches(is_space);
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let value = digits
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .fold(0i64, |acc, b| {
            acc.saturating_mul(10).saturating_add((b - b'0') as i64)
        });

    if negative {
        -value
    } else {
        value
    }
}

pub struct Loader {
    tracing: TracingConfig,
    line: u32,
    current: String,
}

impl Tracing for Loader {
    fn set_tracing(&mut self, config: TracingConfig) {
        self.tracing = config;
    }
}

impl Loader {
    pub fn new() -> Loader {
        Loader {
            tracing: TracingConfig::Off,
            line: 0,
            current: String::new(),
        }
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn current_line(&self) -> &str {
        &self.current
    }

    /// Runs the first pass over `lines`.  The colour state that is returned is
    /// final: every colour directive in the source has been applied.
    pub fn load<'a, I>(&mut self, lines: I) -> LoaderResult<LoadedSource>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut colours = ColourState::default();
        let mut program = ProgramLines::new();
        let mut warnings = vec![];

        for (idx, text) in lines.into_iter().enumerate() {
            self.line = idx as u32 + 1;
            self.current = text.into();
            trace!(self);

            if text.len() > MAX_LINE_LEN {
                return Err(CompilerError::new(
                    self.line,
                    LoaderError::LineTooLong(text.len()),
                ));
            }

            match classify(trim(text)) {
                LineKind::Empty | LineKind::Grouping => (),
                LineKind::Colour(layer, code) => match colours.set(layer, code) {
                    Ok(colour) => debug!("L{}: {} colour set to {}", self.line, layer, colour),
                    Err(code) => warnings.push(CompilerError::new(
                        self.line,
                        LoaderWarning::InvalidColour(layer, code, colours.get(layer)),
                    )),
                },
                LineKind::Program => program.push(SourceLine::new(self.line, text)),
            }
        }

        debug!(
            "Loaded {} program lines, attribute 0x{:02X}",
            program.len(),
            colours.attribute()
        );

        Ok(LoadedSource {
            colours,
            program,
            warnings,
        })
    }
}
