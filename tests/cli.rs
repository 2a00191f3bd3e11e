use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use mano_rs::{LogEntry, Operation, Register};
use pretty_assertions::assert_eq;

fn translate(args: &[&str], dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mano-translate"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run mano-translate")
}

fn create_temp_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn read_log(path: &Path) -> Vec<LogEntry> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[test]
fn assembles_to_output_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    create_temp_file(temp_dir.path(), "prog.asm", "LDA 100\nADD 101\nSTA 102\nHLT\n");

    let out = translate(&["prog.asm", "-o", "prog.hex"], temp_dir.path());
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("prog.hex")).unwrap(),
        "A100\n9101\nB102\n7001\n"
    );
}

#[test]
fn disassembles_to_stdout() {
    let temp_dir = tempfile::tempdir().unwrap();
    create_temp_file(temp_dir.path(), "prog.hex", "A100\n7001\n");

    let out = translate(&["--disassemble", "prog.hex"], temp_dir.path());
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "LDA 100\nHLT\n");
}

#[test]
fn failed_run_keeps_log_of_earlier_lines() {
    let temp_dir = tempfile::tempdir().unwrap();
    create_temp_file(temp_dir.path(), "prog.asm", "LDA 100\nFOO\nHLT\n");

    let out = translate(&["prog.asm", "-o", "prog.hex", "--log", "regs.log"], temp_dir.path());
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Invalid instruction FOO"));
    assert!(!temp_dir.path().join("prog.hex").exists());

    let log = read_log(&temp_dir.path().join("regs.log"));
    let kinds: Vec<_> = log.iter().map(|e| (e.operation, e.register, e.value)).collect();
    assert_eq!(
        kinds,
        vec![
            (Operation::Update, Register::Ir, 0xA100),
            (Operation::Update, Register::Ar, 0x100),
            (Operation::Increment, Register::Pc, 1),
        ]
    );
}

#[test]
fn empty_input_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    create_temp_file(temp_dir.path(), "empty.asm", "");

    let out = translate(&["empty.asm"], temp_dir.path());
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Input is empty"));
}
