use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use mano_rs::{DataFile, Direction, LogEntry, Session, Workspace, WorkspaceConfig};

mod menu;
mod table;

#[derive(Parser, Debug)]
#[command(author, version, about = "Mano machine assembler/disassembler", long_about = None)]
struct Cli {
    /// Workspace config (JSON; missing fields use defaults)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Directory holding the data files and the register log
    #[arg(long, value_name = "DIR")]
    dir: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive menu (default)
    Menu {
        /// Keep existing files instead of clearing them on start
        #[arg(long)]
        keep: bool,
    },
    /// Clear the data files and the register log
    Init,
    /// Convert the assembly input file into the machine output file
    Assemble {
        /// Also print the final register state
        #[arg(long)]
        registers: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Convert the machine input file into the assembly output file
    Disassemble {
        #[arg(long)]
        registers: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print one of the workspace files
    Show {
        #[arg(value_enum)]
        file: FileArg,
        /// Render the register log as a table
        #[arg(long)]
        table: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FileArg {
    AssemblyInput,
    AssemblyOutput,
    MachineInput,
    MachineOutput,
    Log,
}

#[derive(Debug, serde::Serialize)]
struct Report<'a> {
    lines: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    registers: Option<mano_rs::Snapshot>,
}

fn workspace(cli: &Cli) -> Result<Workspace> {
    let mut cfg = match &cli.config {
        Some(path) => WorkspaceConfig::load(path)?,
        None => WorkspaceConfig::default(),
    };
    if let Some(dir) = &cli.dir {
        cfg.dir = dir.clone();
    }
    Ok(Workspace::new(cfg))
}

fn convert(ws: &Workspace, direction: Direction, registers: bool, format: OutputFormat) -> Result<()> {
    let mut session = Session::new();
    let lines: Vec<String> = ws.convert(&mut session, direction)?.into_iter().map(|t| t.text).collect();
    let snapshot = session.bank().snapshot();
    match format {
        OutputFormat::Json => {
            let report = Report { lines: &lines, registers: registers.then_some(snapshot) };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            for l in &lines {
                println!("{l}");
            }
            if registers {
                println!("\n{}", table::registers(&snapshot));
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ws = workspace(&cli)?;

    match cli.cmd.unwrap_or(Command::Menu { keep: false }) {
        Command::Menu { keep } => {
            if !keep {
                ws.initialize()?;
            }
            let stdin = std::io::stdin();
            let mut menu = menu::Menu::new(&ws, stdin.lock(), std::io::stdout());
            menu.run()?;
        }
        Command::Init => {
            ws.initialize()?;
            println!("{}", table::boxed("Files have been cleared."));
        }
        Command::Assemble { registers, format } => convert(&ws, Direction::Assemble, registers, format)?,
        Command::Disassemble { registers, format } => {
            convert(&ws, Direction::Disassemble, registers, format)?
        }
        Command::Show { file: FileArg::Log, table: true } => {
            let mut entries = Vec::new();
            for l in ws.read_log()? {
                let e: LogEntry = serde_json::from_str(&l).with_context(|| format!("bad log line: {l}"))?;
                entries.push(e);
            }
            println!("{}", table::log_entries(&entries));
        }
        Command::Show { file, .. } => {
            let lines = match file {
                FileArg::AssemblyInput => ws.read_lines(DataFile::AssemblyInput)?,
                FileArg::AssemblyOutput => ws.read_lines(DataFile::AssemblyOutput)?,
                FileArg::MachineInput => ws.read_lines(DataFile::MachineInput)?,
                FileArg::MachineOutput => ws.read_lines(DataFile::MachineOutput)?,
                FileArg::Log => ws.read_log()?,
            };
            for l in lines {
                println!("{l}");
            }
        }
    }

    Ok(())
}
