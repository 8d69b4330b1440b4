/// Prints a trace of the line that a compiler pass is currently working on,
/// if that line is selected by the pass's [`TracingConfig`](crate::diagnostics::config::TracingConfig).
///
/// The pass must have a `tracing` field and `line()` and `current_line()`
/// methods.
#[macro_export]
macro_rules! trace {
    ($ts:expr) => {
        if $ts.tracing.includes($ts.line()) {
            println!(
                "{} <- L{}:{:?}",
                stdext::function_name!(),
                $ts.line(),
                $ts.current_line()
            )
        }
    };
}
