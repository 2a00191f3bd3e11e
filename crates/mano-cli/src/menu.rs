use std::io::{BufRead, Write};

use anyhow::Result;
use mano_rs::{DataFile, Direction, Session, Workspace};

use crate::table::{self, Align, Style, Table};

const OPTIONS: [&str; 11] = [
    "Convert Assembly to Machine Language",
    "Convert Machine Language to Assembly",
    "View Register State",
    "Display Log File",
    "Display Assembly Input File",
    "Display Assembly Output File",
    "Display Machine Input File",
    "Display Machine Output File",
    "Add Assembly Code",
    "Add Machine Code",
    "Exit",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Convert(Direction),
    ViewRegisters,
    DisplayLog,
    Display(DataFile),
    AddCode(DataFile),
    Exit,
}

impl Choice {
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.trim() {
            "1" => Choice::Convert(Direction::Assemble),
            "2" => Choice::Convert(Direction::Disassemble),
            "3" => Choice::ViewRegisters,
            "4" => Choice::DisplayLog,
            "5" => Choice::Display(DataFile::AssemblyInput),
            "6" => Choice::Display(DataFile::AssemblyOutput),
            "7" => Choice::Display(DataFile::MachineInput),
            "8" => Choice::Display(DataFile::MachineOutput),
            "9" => Choice::AddCode(DataFile::AssemblyInput),
            "10" => Choice::AddCode(DataFile::MachineInput),
            "11" | "0" => Choice::Exit,
            _ => return None,
        })
    }
}

pub fn banner() -> String {
    Table::new()
        .row(["Welcome to the Mano CLI Assembler"])
        .row(["Assemble mnemonics to hex and back, one instruction per line"])
        .row(["Register changes are logged to the register log file"])
        .align(&[Align::Center])
        .render(Style::Fancy)
}

fn menu_table() -> String {
    let mut t = Table::new().align(&[Align::Center, Align::Center]);
    for (i, o) in OPTIONS.iter().enumerate() {
        t = t.row([(i + 1).to_string(), o.to_string()]);
    }
    t.render(Style::Fancy)
}

/// Interactive loop over one workspace and one session.
pub struct Menu<'a, R, W> {
    ws: &'a Workspace,
    session: Session,
    input: R,
    out: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(ws: &'a Workspace, input: R, out: W) -> Self {
        Self { ws, session: Session::new(), input, out }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn run(&mut self) -> Result<()> {
        writeln!(self.out, "{}", banner())?;
        loop {
            writeln!(self.out, "{}", menu_table())?;
            write!(self.out, "Select an option: ")?;
            self.out.flush()?;
            let Some(line) = self.read_line()? else { break };
            match Choice::parse(&line) {
                Some(Choice::Exit) => {
                    self.message("Exiting the program. Goodbye!")?;
                    break;
                }
                Some(choice) => self.dispatch(choice)?,
                None => self.message("Invalid choice. Please try again.")?,
            }
        }
        Ok(())
    }

    pub fn dispatch(&mut self, choice: Choice) -> Result<()> {
        tracing::debug!(?choice, "menu");
        match choice {
            Choice::Convert(direction) => match self.ws.convert(&mut self.session, direction) {
                Ok(_) => self.message(match direction {
                    Direction::Assemble => "Assembly code has been converted to machine language.",
                    Direction::Disassemble => "Machine code has been converted to assembly language.",
                }),
                Err(err) => self.message(&format!("Error: {err:#}")),
            },
            Choice::ViewRegisters => {
                let t = table::registers(&self.session.bank().snapshot());
                self.message(&t)
            }
            Choice::DisplayLog => match self.ws.read_log() {
                Ok(lines) if lines.is_empty() => self.message("Log file is empty."),
                Ok(lines) => {
                    self.message("Log File Contents:")?;
                    for l in lines {
                        writeln!(self.out, "{l}")?;
                    }
                    writeln!(self.out)?;
                    Ok(())
                }
                Err(err) => self.message(&format!("Error: {err:#}")),
            },
            Choice::Display(file) => match self.ws.read_lines(file) {
                Ok(lines) if lines.is_empty() => self.message(&format!("{} file is empty.", file.description())),
                Ok(lines) => {
                    self.message(&format!("{} File Contents:", file.description()))?;
                    for l in lines {
                        writeln!(self.out, "{l}")?;
                    }
                    writeln!(self.out)?;
                    Ok(())
                }
                Err(err) => self.message(&format!("Error: {err:#}")),
            },
            Choice::AddCode(file) => {
                let kind = if file == DataFile::AssemblyInput { "Assembly" } else { "Machine" };
                writeln!(self.out, "Enter {} code (terminate with an empty line):", kind.to_lowercase())?;
                self.out.flush()?;
                let mut lines = Vec::new();
                while let Some(l) = self.read_line()? {
                    if l.is_empty() {
                        break;
                    }
                    lines.push(l);
                }
                match self.ws.write_lines(file, &lines) {
                    Ok(()) => self.message(&format!("{kind} code has been added.")),
                    Err(err) => self.message(&format!("Error: {err:#}")),
                }
            }
            Choice::Exit => Ok(()),
        }
    }

    fn message(&mut self, msg: &str) -> Result<()> {
        writeln!(self.out, "{}", table::boxed(msg))?;
        Ok(())
    }

    // None on EOF.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(buf.trim_end_matches(['\r', '\n']).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mano_rs::{Register, WorkspaceConfig};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn scratch() -> (TempDir, Workspace) {
        let tmp = tempfile::tempdir().unwrap();
        let ws = Workspace::new(WorkspaceConfig { dir: tmp.path().into(), ..Default::default() });
        ws.initialize().unwrap();
        (tmp, ws)
    }

    #[test]
    fn parses_menu_numbers() {
        assert_eq!(Choice::parse(" 1 "), Some(Choice::Convert(Direction::Assemble)));
        assert_eq!(Choice::parse("8"), Some(Choice::Display(DataFile::MachineOutput)));
        assert_eq!(Choice::parse("0"), Some(Choice::Exit));
        assert_eq!(Choice::parse("12"), None);
    }

    #[test]
    fn add_then_convert_session() {
        let (_tmp, ws) = scratch();
        let script = "9\nLDA 100\nHLT\n\n1\n8\n3\n11\n";
        let mut out = Vec::new();
        let mut menu = Menu::new(&ws, Cursor::new(script), &mut out);
        menu.run().unwrap();
        assert_eq!(menu.session().bank().get(Register::Pc), 2);
        drop(menu);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Assembly code has been added."));
        assert!(text.contains("Assembly code has been converted to machine language."));
        assert!(text.contains("Machine Output File Contents:"));
        assert!(text.contains("A100\n7001\n"));
        assert!(text.contains("Exiting the program."));
        assert_eq!(ws.read_lines(DataFile::MachineOutput).unwrap(), vec!["A100", "7001"]);
    }

    #[test]
    fn conversion_errors_are_shown_not_fatal() {
        let (_tmp, ws) = scratch();
        let mut out = Vec::new();
        let mut menu = Menu::new(&ws, Cursor::new("2\nfoo\n"), &mut out);
        menu.run().unwrap();
        drop(menu);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Error: Input is empty"));
        assert!(text.contains("Invalid choice. Please try again."));
    }
}
