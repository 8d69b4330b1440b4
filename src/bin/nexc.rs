extern crate log;
extern crate simplelog;

use std::path::Path;
use std::process::exit;
use std::time::Instant;

use log::warn;

use nex_lang::compiler::{Compiler, Loader};
use nex_lang::diagnostics::config::Tracing;
use nex_lang::project::*;
use nex_lang::toolchain::{Assembler, Emulator};
use nex_lang::*;

fn main() {
    if let Err(code) = run() {
        exit(code)
    }
}

fn run() -> Result<(), i32> {
    let config = configure_cli().get_matches();

    if let Some(level) = get_log_level(&config) {
        if let Err(e) = configure_logging(level) {
            eprintln!("Failed to configure logger: {}", e);
        }
    }

    // Both arguments are required by clap
    let input = config.value_of("input").unwrap_or_default();
    let output = Path::new(config.value_of("output").unwrap_or_default());

    let src_path = Path::new(input);
    let project_name = get_project_name(src_path).map_err(|e| {
        print_errs(&[e]);
        ERR_IO
    })?;

    let (loader_tracing, expander_tracing) = match (
        get_tracing(&config, "trace-loader"),
        get_tracing(&config, "trace-expander"),
    ) {
        (Ok(l), Ok(e)) => (l, e),
        (Err(msg), _) | (_, Err(msg)) => {
            print_errs(&[msg]);
            return Err(ERR_ARGUMENT);
        }
    };

    let text = read_source(src_path).map_err(|e| {
        print_errs(&[e]);
        ERR_IO
    })?;

    let load_time = Instant::now();
    let mut loader = Loader::new();
    loader.set_tracing(loader_tracing);
    let loaded = match loader.load(text.lines()) {
        Ok(loaded) => loaded,
        Err(err) => {
            print_errs(&[err]);
            return Err(ERR_LOADER);
        }
    };
    print_errs(loaded.warnings());
    eprintln!("Loader: {}", load_time.elapsed().as_secs_f32());

    let expand_time = Instant::now();
    let compiler = Compiler::compile(loaded, expander_tracing);
    eprintln!("Expander: {}", expand_time.elapsed().as_secs_f32());

    if emit_asm(&config) {
        write_file(output, |f| compiler.print(f)).map_err(|e| {
            print_errs(&[e]);
            ERR_IO
        })?;
    } else {
        let asm_path = intermediate_asm_path(output);
        write_file(&asm_path, |f| compiler.print(f)).map_err(|e| {
            print_errs(&[e]);
            ERR_IO
        })?;

        let assembler = config
            .value_of("nasm")
            .map_or_else(Assembler::default, Assembler::new);
        let assembled = assembler.assemble(&asm_path, output);

        if let Err(e) = std::fs::remove_file(&asm_path) {
            warn!("Could not remove {:?}: {}", asm_path, e);
        }

        if let Err(e) = assembled {
            print_errs(&[&e]);
            return Err(toolchain_exit_code(&e));
        }

        match std::fs::metadata(output) {
            Ok(md) => println!("File size: {} bytes", md.len()),
            Err(e) => warn!("Could not read size of {:?}: {}", output, e),
        }
    }

    if config.is_present("manifest") {
        let format = get_manifest_format(&config).map_err(|e| {
            print_errs(&[e]);
            ERR_ARGUMENT
        })?;
        let manifest = Manifest::extract(project_name, &compiler);
        match std::fs::File::create(manifest_path(output))
            .map_err(|e| format!("{}", e))
            .and_then(|mut f| manifest.write(&mut f, format))
        {
            Ok(()) => (),
            Err(e) => {
                println!("Failed to write manifest file: {}", e);
                return Err(ERR_MANIFEST_WRITE_ERROR);
            }
        }
    }

    if config.is_present("run") && !emit_asm(&config) {
        let emulator = config
            .value_of("qemu")
            .map_or_else(Emulator::default, Emulator::new);
        if let Err(e) = emulator.run(output) {
            print_errs(&[&e]);
            return Err(toolchain_exit_code(&e));
        }
    }

    Ok(())
}
