use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::codec::{Assembler, Direction, Disassembler, Translated};
use crate::registers::LogEntry;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataFile {
    AssemblyInput,
    MachineInput,
    AssemblyOutput,
    MachineOutput,
}

impl DataFile {
    pub const ALL: [DataFile; 4] = [
        DataFile::AssemblyInput,
        DataFile::MachineInput,
        DataFile::AssemblyOutput,
        DataFile::MachineOutput,
    ];

    pub fn description(self) -> &'static str {
        match self {
            DataFile::AssemblyInput => "Assembly Input",
            DataFile::MachineInput => "Machine Input",
            DataFile::AssemblyOutput => "Assembly Output",
            DataFile::MachineOutput => "Machine Output",
        }
    }

    /// `(input, output)` for a translation direction.
    pub fn for_direction(direction: Direction) -> (DataFile, DataFile) {
        match direction {
            Direction::Assemble => (DataFile::AssemblyInput, DataFile::MachineOutput),
            Direction::Disassemble => (DataFile::MachineInput, DataFile::AssemblyOutput),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    pub dir: PathBuf,
    pub assembly_input: String,
    pub machine_input: String,
    pub assembly_output: String,
    pub machine_output: String,
    pub log: String,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            assembly_input: "assembly_input.txt".into(),
            machine_input: "machine_input.txt".into(),
            assembly_output: "assembly_output.txt".into(),
            machine_output: "machine_output.txt".into(),
            log: "register_log.txt".into(),
        }
    }
}

impl WorkspaceConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let txt = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&txt).with_context(|| format!("parsing config {}", path.display()))
    }
}

/// The four line-oriented data files and the register log on disk.
#[derive(Debug, Clone)]
pub struct Workspace {
    cfg: WorkspaceConfig,
}

impl Workspace {
    pub fn new(cfg: WorkspaceConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.cfg
    }

    pub fn path(&self, file: DataFile) -> PathBuf {
        let name = match file {
            DataFile::AssemblyInput => &self.cfg.assembly_input,
            DataFile::MachineInput => &self.cfg.machine_input,
            DataFile::AssemblyOutput => &self.cfg.assembly_output,
            DataFile::MachineOutput => &self.cfg.machine_output,
        };
        self.cfg.dir.join(name)
    }

    pub fn log_path(&self) -> PathBuf {
        self.cfg.dir.join(&self.cfg.log)
    }

    /// Truncate every data file and the log.
    pub fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.cfg.dir)
            .with_context(|| format!("creating {}", self.cfg.dir.display()))?;
        let paths = DataFile::ALL.iter().map(|&f| self.path(f)).chain([self.log_path()]);
        for p in paths {
            fs::write(&p, "").with_context(|| format!("truncating {}", p.display()))?;
        }
        tracing::info!(dir = %self.cfg.dir.display(), "workspace initialized");
        Ok(())
    }

    pub fn read_lines(&self, file: DataFile) -> Result<Vec<String>> {
        read_lines(&self.path(file))
    }

    pub fn write_lines<S: AsRef<str>>(&self, file: DataFile, lines: &[S]) -> Result<()> {
        let p = self.path(file);
        let mut buf = String::new();
        for l in lines {
            buf.push_str(l.as_ref());
            buf.push('\n');
        }
        fs::write(&p, buf).with_context(|| format!("writing {}", p.display()))
    }

    pub fn append_log(&self, entries: &[LogEntry]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let p = self.log_path();
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&p)
            .with_context(|| format!("opening {}", p.display()))?;
        for e in entries {
            writeln!(f, "{}", format_log_line(e)?)
                .with_context(|| format!("writing {}", p.display()))?;
        }
        Ok(())
    }

    pub fn read_log(&self) -> Result<Vec<String>> {
        read_lines(&self.log_path())
    }

    /// Translate the direction's input file into its output file.
    ///
    /// Every register change made by the batch is appended to the log, also
    /// when the batch fails. The output file is only written on success. A
    /// codec failure is returned as a [`crate::CodecError`] inside the
    /// `anyhow::Error`.
    pub fn convert(&self, session: &mut Session, direction: Direction) -> Result<Vec<Translated>> {
        let (input, output) = DataFile::for_direction(direction);
        let lines = self.read_lines(input)?;
        let before = session.bank().log().len();
        let result = match direction {
            Direction::Assemble => session.run(&Assembler, &lines),
            Direction::Disassemble => session.run(&Disassembler, &lines),
        };
        self.append_log(&session.bank().log()[before..])?;
        let out = result?;
        let text: Vec<&str> = out.iter().map(|t| t.text.as_str()).collect();
        self.write_lines(output, &text)?;
        tracing::info!(?direction, lines = out.len(), file = %self.path(output).display(), "converted");
        Ok(out)
    }
}

pub fn format_log_line(e: &LogEntry) -> Result<String> {
    Ok(serde_json::to_string(e)?)
}

fn read_lines(p: &Path) -> Result<Vec<String>> {
    let txt = fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
    Ok(txt.lines().map(str::to_string).collect())
}
