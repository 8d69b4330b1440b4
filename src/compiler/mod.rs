/**
 * The Compiler takes the lines of a `.nexs` program and converts them into
 * the NASM source of a 512 byte x86 boot sector.
 *
 * Compilation is two passes over the source:
 * 1. The Loader reads every line.  Grouping braces are dropped, colour
 * directives update the screen colours, and every other line is buffered in
 * order.  Colour directives can appear anywhere in a program but the screen
 * is cleared before any of the program runs, so this pass must finish before
 * any code is generated.
 * 2. The Expander translates the buffered lines one at a time.  `STOP`,
 * `STOP_LOOP`, `GO` and `PRINT` are directives; every other line is raw
 * assembly and is copied to the output unchanged.
 *
 * The Framer wraps the expanded program: a header which places the code at
 * the BIOS load address and clears the screen, and a footer which halts the
 * machine, pads the sector and writes the boot signature.
 *
 * Errors in a `GO` or `PRINT` directive are not reported: the line is copied
 * to the output and the assembler decides whether it is valid.  The only
 * errors the compiler itself raises come from the Loader.
 */
pub mod colour;
pub mod compiler;
pub mod error;
pub mod expander;
pub mod framer;
pub mod loader;
pub mod print;
pub mod source;
pub mod x86;


pub use colour::{Colour, ColourState, Layer};
pub use compiler::Compiler;
pub use error::CompilerError;
pub use loader::{LoadedSource, Loader, LoaderError, LoaderWarning, ProgramLines};
pub use print::PrintBlock;
pub use source::SourceLine;
