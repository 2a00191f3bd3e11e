use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mano_rs::workspace::format_log_line;
use mano_rs::{Direction, Session};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Translate a Mano program between mnemonics and hex, one instruction per line"
)]
struct Opts {
    /// Treat the input as hex machine code and emit mnemonics
    #[arg(short, long)]
    disassemble: bool,
    /// Write the translation here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Write the register log here (one JSON object per line)
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,
    #[arg(value_name = "INPUT")]
    input: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opts = Opts::parse();
    let text = std::fs::read_to_string(&opts.input)
        .with_context(|| format!("reading {}", opts.input.display()))?;
    let lines: Vec<&str> = text.lines().collect();
    let direction = if opts.disassemble { Direction::Disassemble } else { Direction::Assemble };

    let mut session = Session::new();
    let result = session.translate(direction, &lines);
    let bank = session.into_bank();

    // The log covers lines translated before a failure too.
    if let Some(path) = &opts.log {
        let mut buf = String::new();
        for e in bank.log() {
            buf.push_str(&format_log_line(e)?);
            buf.push('\n');
        }
        std::fs::write(path, buf).with_context(|| format!("writing {}", path.display()))?;
    }

    let out = result.with_context(|| format!("translating {}", opts.input.display()))?;
    let mut buf = out.join("\n");
    buf.push('\n');
    match &opts.output {
        Some(path) => std::fs::write(path, buf).with_context(|| format!("writing {}", path.display()))?,
        None => print!("{buf}"),
    }
    Ok(())
}
