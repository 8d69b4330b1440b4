pub mod result;

pub mod cli;
pub mod compiler;
pub mod diagnostics;
pub mod io;
pub mod project;
pub mod toolchain;

pub use cli::*;
pub use io::{read_source, write_file};
pub use project::{get_project_name, Manifest};
