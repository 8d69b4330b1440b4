// Compiler - drives the translation of a loaded `.nexs` program into the
// assembly source of a boot sector and holds the generated instructions so
// that they can be written out as a file of NASM source.
use log::{info, warn};

use super::colour::ColourState;
use super::error::CompilerError;
use super::expander::Expander;
use super::framer;
use super::loader::{LoadedSource, Loader, LoaderResult, LoaderWarning};
use super::print::PrintBlock;
use super::x86::assembly::Inst;
use crate::diagnostics::config::{Tracing, TracingConfig};

pub struct Compiler {
    code: Vec<Inst>,
    colours: ColourState,
    blocks: Vec<PrintBlock>,
    jumps: Vec<String>,
    verbatim: usize,
    warnings: Vec<CompilerError<LoaderWarning>>,
}

impl Compiler {
    /// Writes the generated assembly to `output`, one line per instruction.
    pub fn print(&self, output: &mut dyn std::io::Write) -> std::io::Result<()> {
        for inst in self.code.iter() {
            writeln!(output, "{}", inst)?;
        }
        Ok(())
    }

    /// The generated assembly as a single string
    pub fn text(&self) -> String {
        let mut text = String::new();
        for inst in self.code.iter() {
            text.push_str(&format!("{}\n", inst));
        }
        text
    }

    /// Compiles a program whose first pass is complete.  The layout of the
    /// output is: header, screen clear, the expanded program, footer.
    pub fn compile(source: LoadedSource, tracing: TracingConfig) -> Compiler {
        let (colours, program, warnings) = source.into_parts();
        for w in warnings.iter() {
            warn!("{}", w);
        }
        let mut code = vec![];

        framer::header(&mut code);
        framer::clear_screen(&colours, &mut code);

        let mut expander = Expander::new();
        expander.set_tracing(tracing);
        expander.expand(program, &mut code);

        framer::footer(&mut code);

        info!(
            "Generated {} instructions, {} print blocks",
            code.len(),
            expander.blocks().len()
        );

        Compiler {
            code,
            colours,
            blocks: expander.blocks().to_vec(),
            jumps: expander.jumps().to_vec(),
            verbatim: expander.verbatim(),
            warnings,
        }
    }

    /// Runs both passes over the text of a source file.
    pub fn compile_str(text: &str) -> LoaderResult<Compiler> {
        let loaded = Loader::new().load(text.lines())?;
        Ok(Compiler::compile(loaded, TracingConfig::Off))
    }

    pub fn code(&self) -> &[Inst] {
        &self.code
    }

    pub fn colours(&self) -> ColourState {
        self.colours
    }

    pub fn blocks(&self) -> &[PrintBlock] {
        &self.blocks
    }

    pub fn jumps(&self) -> &[String] {
        &self.jumps
    }

    pub fn verbatim(&self) -> usize {
        self.verbatim
    }

    /// Problems found while loading the source which did not stop compilation
    pub fn warnings(&self) -> &[CompilerError<LoaderWarning>] {
        &self.warnings
    }
}
