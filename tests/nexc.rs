use std::path::PathBuf;
use std::process::Command;

use nex_lang::{ERR_ARGUMENT, ERR_LOADER};

fn source_file(name: &str, text: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("nexc-{}-{}", std::process::id(), name));
    std::fs::write(&path, text).expect("expected source file to be written");
    path
}

fn nexc(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_nexc"))
        .args(args)
        .output()
        .expect("expected nexc to run")
}

#[test]
fn emit_asm_succeeds() {
    let src = source_file("ok.nexs", "colour_bg 1\nPRINT \"Hi\"\nSTOP\n");
    let out = src.with_extension("asm");
    let output = nexc(&["-i", src.to_str().unwrap(), "-o", out.to_str().unwrap(), "--emit", "asm"]);

    assert_eq!(output.status.code(), Some(0));
    let asm = std::fs::read_to_string(&out).unwrap();
    assert!(asm.contains("message_0: db \"Hi\",0"));

    std::fs::remove_file(&src).unwrap();
    std::fs::remove_file(&out).unwrap();
}

#[test]
fn long_line_exits_with_loader_code() {
    let text = format!("STOP\n{}\n", "x".repeat(1100));
    let src = source_file("long.nexs", &text);
    let out = src.with_extension("asm");
    let output = nexc(&["-i", src.to_str().unwrap(), "-o", out.to_str().unwrap(), "--emit", "asm"]);

    assert_eq!(output.status.code(), Some(ERR_LOADER));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("L2: Line is 1100 bytes long"), "{}", stderr);
    assert!(!out.exists());

    std::fs::remove_file(&src).unwrap();
}

#[test]
fn bad_trace_range_exits_with_argument_code() {
    let src = source_file("trace.nexs", "STOP\n");
    let out = src.with_extension("asm");
    let output = nexc(&[
        "-i",
        src.to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
        "--emit",
        "asm",
        "--trace-loader",
        "9:3",
    ]);

    assert_eq!(output.status.code(), Some(ERR_ARGUMENT));
    std::fs::remove_file(&src).unwrap();
}
