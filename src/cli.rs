use clap::{App, Arg, ArgMatches};
use log::LevelFilter;
use simplelog::{Config, SimpleLogger};

use crate::compiler::Colour;
use crate::diagnostics::config::TracingConfig;
use crate::project::ManifestFormat;
use crate::result::Result;
use crate::toolchain::ToolchainError;

// Exit Codes for different types of errors
pub const ERR_IO: i32 = 1;
pub const ERR_LOADER: i32 = 2;
pub const ERR_ASSEMBLER: i32 = 3;
pub const ERR_IMAGE: i32 = 4;
pub const ERR_EMULATOR: i32 = 5;
pub const ERR_MANIFEST_WRITE_ERROR: i32 = 6;
pub const ERR_ARGUMENT: i32 = 7;

/// The exit code for a failure in the assembler, the emulator or image checks
pub fn toolchain_exit_code(err: &ToolchainError) -> i32 {
    match err {
        ToolchainError::InvalidImage(_) => ERR_IMAGE,
        ToolchainError::EmulatorFailed(_) => ERR_EMULATOR,
        ToolchainError::AssemblerFailed(_) | ToolchainError::Io(_) => ERR_ASSEMBLER,
    }
}

pub fn print_errs<E: std::fmt::Display>(errs: &[E]) {
    for e in errs {
        eprintln!("{}", e);
    }
}

/// The long help: the directive vocabulary and the colour code table.
fn directives_help() -> String {
    let mut help = String::from(
        "DIRECTIVES:
    colour_bg <code>      Background colour of the cleared screen
    colour_fg <code>      Foreground colour of the cleared screen
    PRINT \"<text>\"        Print text at the cursor, \\n starts a new line
    GO <label>:           Jump to label
    STOP                  Halt the CPU
    STOP_LOOP             Spin forever
    { }                   Lines holding only a brace are ignored
    anything else         Copied to the assembly unchanged

COLOUR CODES:
",
    );
    for c in Colour::ALL.iter() {
        help.push_str(&format!("    {:>2}  {}\n", c.code(), c));
    }
    help
}

pub fn configure_cli() -> clap::App<'static, 'static> {
    let app = App::new("Nex Compiler")
        .version("0.1.0")
        .author("Erich Ess")
        .about("Compiles Nex programs into bootable x86 boot sectors")
        .after_help(&*Box::leak(directives_help().into_boxed_str()))
        .arg(
            Arg::with_name("input")
                .short("i")
                .long("input")
                .takes_value(true)
                .required(true)
                .help("Source code file to compile"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .required(true)
                .help("Name the output file that the boot image will be written to"),
        )
        .arg(
            Arg::with_name("emit")
                .long("emit")
                .possible_values(&["asm"])
                .takes_value(true)
                .help("When set to asm, the generated assembly is written to the output file and the assembler is not run")
        )
        .arg(
            Arg::with_name("run")
                .short("r")
                .long("run")
                .help("Boot the image in the emulator after it has been assembled")
        )
        .arg(
            Arg::with_name("nasm")
                .long("nasm")
                .takes_value(true)
                .help("Path to the assembler. Defaults to nasm")
        )
        .arg(
            Arg::with_name("qemu")
                .long("qemu")
                .takes_value(true)
                .help("Path to the emulator. Defaults to qemu-system-x86_64")
        )
        .arg(
            Arg::with_name("manifest")
                .long("manifest")
                .takes_value(false)
                .help("Write a manifest file describing the colours, print blocks and jumps of this program.")
        )
        .arg(
            Arg::with_name("manifest-format")
                .long("manifest-format")
                .possible_values(&["yaml", "json"])
                .takes_value(true)
                .help("File format of the manifest. Defaults to yaml")
        )
        .arg(
            Arg::with_name("log-level")
                .long("log-level")
                .possible_values(&["error", "warn", "info", "debug", "trace"])
                .takes_value(true)
                .help("Enables logging at the given level")
        )
        .arg(
            Arg::with_name("trace-loader")
                .long("trace-loader")
                .takes_value(true)
                .help("Prints out a trace of the lines the loader reads.  Takes all, off, a line number or a range N:M, :N or N:.")
        )
        .arg(
            Arg::with_name("trace-expander")
                .long("trace-expander")
                .takes_value(true)
                .help("Prints out a trace of the lines the expander translates.  Takes all, off, a line number or a range N:M, :N or N:.")
        );
    app
}

pub fn get_log_level(args: &ArgMatches) -> Option<LevelFilter> {
    match args.value_of("log-level")? {
        "error" => Some(LevelFilter::Error),
        "warn" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

pub fn configure_logging(level: LevelFilter) -> Result<()> {
    SimpleLogger::init(level, Config::default()).map_err(|e| format!("{}", e))
}

pub fn get_tracing(args: &ArgMatches, name: &str) -> Result<TracingConfig> {
    match args.value_of(name) {
        None => Ok(TracingConfig::Off),
        Some(cfg) => cfg.parse(),
    }
}

pub fn get_manifest_format(args: &ArgMatches) -> Result<ManifestFormat> {
    args.value_of("manifest-format").unwrap_or("yaml").parse()
}

pub fn emit_asm(args: &ArgMatches) -> bool {
    args.value_of("emit") == Some("asm")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ArgMatches<'static> {
        let mut argv = vec!["nexc"];
        argv.extend_from_slice(args);
        configure_cli().get_matches_from(argv)
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["-i", "hello.nexs", "-o", "hello.nex"]);
        assert_eq!(args.value_of("input"), Some("hello.nexs"));
        assert_eq!(args.value_of("output"), Some("hello.nex"));
        assert!(!emit_asm(&args));
        assert!(!args.is_present("run"));
        assert_eq!(get_log_level(&args), None);
        assert_eq!(get_tracing(&args, "trace-loader"), Ok(TracingConfig::Off));
        assert_eq!(get_manifest_format(&args), Ok(ManifestFormat::Yaml));
    }

    #[test]
    fn test_options() {
        let args = parse(&[
            "-i",
            "a.nexs",
            "-o",
            "a.asm",
            "--emit",
            "asm",
            "-r",
            "--log-level",
            "debug",
            "--trace-expander",
            "2:4",
            "--manifest-format",
            "json",
        ]);
        assert!(emit_asm(&args));
        assert!(args.is_present("run"));
        assert_eq!(get_log_level(&args), Some(LevelFilter::Debug));
        assert_eq!(
            get_tracing(&args, "trace-expander"),
            Ok(TracingConfig::Between(2, 4))
        );
        assert_eq!(get_manifest_format(&args), Ok(ManifestFormat::Json));
    }

    #[test]
    fn test_bad_trace_range() {
        let args = parse(&["-i", "a", "-o", "b", "--trace-loader", "9:3"]);
        assert!(get_tracing(&args, "trace-loader").is_err());
    }

    #[test]
    fn test_long_help_includes_directives() {
        let mut buf = vec![];
        configure_cli().write_long_help(&mut buf).unwrap();
        let help = String::from_utf8(buf).unwrap();
        assert!(help.contains("COLOUR CODES:"));
        assert!(help.contains("14  Yellow"));
    }

    #[test]
    fn test_toolchain_exit_codes() {
        use crate::toolchain::ImageError;

        let tests = vec![
            (ToolchainError::AssemblerFailed(Some(1)), ERR_ASSEMBLER),
            (
                ToolchainError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "nasm")),
                ERR_ASSEMBLER,
            ),
            (
                ToolchainError::InvalidImage(ImageError::WrongSize(0)),
                ERR_IMAGE,
            ),
            (ToolchainError::EmulatorFailed(None), ERR_EMULATOR),
        ];

        for (err, expected) in tests {
            assert_eq!(toolchain_exit_code(&err), expected, "{}", err);
        }
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let mut codes = vec![
            ERR_IO,
            ERR_LOADER,
            ERR_ASSEMBLER,
            ERR_IMAGE,
            ERR_EMULATOR,
            ERR_MANIFEST_WRITE_ERROR,
            ERR_ARGUMENT,
        ];
        assert!(codes.iter().all(|c| *c != 0));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 7);
    }

    #[test]
    fn test_help_lists_colours() {
        let help = directives_help();
        assert!(help.contains(" 0  Black"));
        assert!(help.contains("15  White"));
        assert!(help.contains("STOP_LOOP"));
    }
}
