//! Tools used for looking into what the compiler does with each line of
//! source code.  A pass which supports tracing implements [`config::Tracing`]
//! and calls `trace!` as it reaches each line.
pub mod config;
mod tracer;
