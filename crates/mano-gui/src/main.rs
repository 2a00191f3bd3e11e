use iced::widget::{button, column, container, horizontal_rule, row, scrollable, text, text_input};
use iced::{executor, theme, Application, Color, Command, Element, Font, Length, Theme};
use tracing_subscriber::EnvFilter;

use mano_rs::{DataFile, Direction, Session, Touched, Translated, Workspace, WorkspaceConfig};

/// Code being typed into one of the two input files.
#[derive(Debug, Clone)]
struct Editor {
    file: DataFile,
    lines: Vec<String>,
    current: String,
}

struct AppState {
    ws: Workspace,
    session: Session,
    output: String,
    status: String,
    editor: Option<Editor>,
    logs: Vec<String>,
}

#[derive(Debug, Clone)]
enum Msg {
    Convert(Direction),
    ViewRegisters,
    DisplayLog,
    Display(DataFile),
    Loaded(String, Result<Vec<String>, String>),
    ClearFiles,
    OpenEditor(DataFile),
    EditorChanged(String),
    EditorPush,
    EditorPop,
    EditorSave,
    EditorCancel,
}

struct App(AppState);

const ACTIONS: [(&str, Msg); 10] = [
    ("Convert Assembly to Machine Language", Msg::Convert(Direction::Assemble)),
    ("Convert Machine Language to Assembly", Msg::Convert(Direction::Disassemble)),
    ("View Register State", Msg::ViewRegisters),
    ("Display Log File", Msg::DisplayLog),
    ("Display Assembly Input File", Msg::Display(DataFile::AssemblyInput)),
    ("Display Assembly Output File", Msg::Display(DataFile::AssemblyOutput)),
    ("Display Machine Input File", Msg::Display(DataFile::MachineInput)),
    ("Display Machine Output File", Msg::Display(DataFile::MachineOutput)),
    ("Add Assembly Code", Msg::OpenEditor(DataFile::AssemblyInput)),
    ("Add Machine Code", Msg::OpenEditor(DataFile::MachineInput)),
];

impl Application for App {
    type Executor = executor::Default;
    type Message = Msg;
    type Theme = Theme;
    type Flags = WorkspaceConfig;

    fn new(cfg: Self::Flags) -> (Self, Command<Self::Message>) {
        let mut app = App(AppState {
            ws: Workspace::new(cfg),
            session: Session::new(),
            output: String::new(),
            status: String::new(),
            editor: None,
            logs: Vec::new(),
        });
        // Start from empty files, like the terminal menu does.
        app.clear_files();
        (app, Command::none())
    }

    fn title(&self) -> String { "Mano Assembler".into() }
    fn theme(&self) -> Theme { Theme::Dark }

    fn update(&mut self, message: Self::Message) -> Command<Self::Message> {
        tracing::debug!(?message, "gui");
        match message {
            Msg::Convert(direction) => {
                let st = &mut self.0;
                match st.ws.convert(&mut st.session, direction) {
                    Ok(lines) => {
                        let done = match direction {
                            Direction::Assemble => "Assembly code has been converted to machine language.",
                            Direction::Disassemble => "Machine code has been converted to assembly language.",
                        };
                        self.0.output = format!("{done}\n\n{}", render_translation(&lines));
                        self.set_status(done);
                    }
                    Err(err) => {
                        self.0.output = format!("Error: {err:#}");
                        self.set_status("Conversion failed");
                    }
                }
            }
            Msg::ViewRegisters => {
                let snap = self.0.session.bank().snapshot();
                let mut out = format!("{:<10}{:>8}\n", "Register", "Value");
                for (r, v) in snap.iter() {
                    out.push_str(&format!("{:<10}{:>8}   {v:#06x}\n", r.name(), v));
                }
                self.0.output = out;
            }
            Msg::DisplayLog => {
                let ws = self.0.ws.clone();
                return Command::perform(read_log_async(ws), |res| Msg::Loaded("Log".into(), res));
            }
            Msg::Display(file) => {
                let ws = self.0.ws.clone();
                let title = file.description().to_string();
                return Command::perform(read_file_async(ws, file), move |res| Msg::Loaded(title.clone(), res));
            }
            Msg::Loaded(title, res) => {
                self.0.output = match res {
                    Ok(lines) if lines.is_empty() => format!("{title} file is empty."),
                    Ok(lines) => format!("{title} File Contents:\n{}", lines.join("\n")),
                    Err(e) => format!("Error: {e}"),
                };
            }
            Msg::ClearFiles => {
                self.clear_files();
                self.0.output = "Files have been cleared.".into();
            }
            Msg::OpenEditor(file) => {
                self.0.editor = Some(Editor { file, lines: Vec::new(), current: String::new() });
            }
            Msg::EditorChanged(s) => {
                if let Some(ed) = &mut self.0.editor { ed.current = s; }
            }
            Msg::EditorPush => {
                if let Some(ed) = &mut self.0.editor {
                    let line = ed.current.trim().to_string();
                    if !line.is_empty() { ed.lines.push(line); }
                    ed.current.clear();
                }
            }
            Msg::EditorPop => {
                if let Some(ed) = &mut self.0.editor { ed.lines.pop(); }
            }
            Msg::EditorSave => self.save_editor(),
            Msg::EditorCancel => self.0.editor = None,
        }
        Command::none()
    }

    fn view(&self) -> Element<Self::Message> {
        let header = column![
            text("Mano Assembler").size(28),
            text("Assemble mnemonics to hex and back, one instruction per line").size(16),
        ]
        .spacing(4)
        .align_items(iced::Alignment::Center);

        let mut grid = column![].spacing(10);
        for pair in ACTIONS.chunks(2) {
            let mut r = row![].spacing(10);
            for (label, msg) in pair {
                r = r.push(button(text(*label)).on_press(msg.clone()).width(Length::Fixed(360.0)));
            }
            grid = grid.push(r);
        }
        grid = grid.push(row![button(text("Clear Files")).on_press(Msg::ClearFiles)].spacing(10));

        let body: Element<Msg> = match &self.0.editor {
            Some(ed) => editor_view(ed),
            None => scrollable(text(&self.0.output).font(Font::MONOSPACE).size(16))
                .height(Length::Fill)
                .width(Length::Fill)
                .into(),
        };

        let status = text(&self.0.status).size(14).style(theme::Text::Color(Color::from_rgb(0.7, 0.8, 1.0)));

        container(
            column![header, grid, horizontal_rule(10), body, horizontal_rule(10), status]
                .spacing(10)
                .padding(20)
                .align_items(iced::Alignment::Center),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }
}

fn editor_view(ed: &Editor) -> Element<'_, Msg> {
    let title = match ed.file {
        DataFile::AssemblyInput => "Enter assembly code:",
        _ => "Enter machine code:",
    };
    let mut listing = column![].spacing(2);
    for (i, l) in ed.lines.iter().enumerate() {
        listing = listing.push(text(format!("{:>3}  {l}", i + 1)).font(Font::MONOSPACE));
    }
    column![
        text(title).size(18),
        scrollable(listing).height(Length::Fill),
        text_input("instruction, Enter to add", &ed.current)
            .on_input(Msg::EditorChanged)
            .on_submit(Msg::EditorPush)
            .font(Font::MONOSPACE),
        row![
            button(text("Add Line")).on_press(Msg::EditorPush),
            button(text("Remove Last")).on_press(Msg::EditorPop),
            button(text("Save")).on_press(Msg::EditorSave),
            button(text("Cancel")).on_press(Msg::EditorCancel),
        ]
        .spacing(10),
    ]
    .spacing(10)
    .into()
}

fn render_translation(lines: &[Translated]) -> String {
    let mut out = String::new();
    for t in lines {
        out.push_str(&format!("{:<10} {:#06x}   writes {}\n", t.text, t.code, touched_names(t.writes())));
    }
    out
}

fn touched_names(t: Touched) -> String {
    t.iter_names().map(|(n, _)| n).collect::<Vec<_>>().join(" ")
}

async fn read_file_async(ws: Workspace, file: DataFile) -> Result<Vec<String>, String> {
    tokio::task::spawn_blocking(move || ws.read_lines(file))
        .await
        .map_err(|e| e.to_string())?
        .map_err(|e| format!("{e:#}"))
}

async fn read_log_async(ws: Workspace) -> Result<Vec<String>, String> {
    tokio::task::spawn_blocking(move || ws.read_log())
        .await
        .map_err(|e| e.to_string())?
        .map_err(|e| format!("{e:#}"))
}

impl App {
    fn set_status(&mut self, line: impl Into<String>) {
        let line = line.into();
        self.0.logs.push(line.clone());
        if self.0.logs.len() > 200 {
            let drop_n = self.0.logs.len() - 200;
            self.0.logs.drain(0..drop_n);
        }
        self.0.status = format!("{line}  ({} actions)", self.0.logs.len());
    }

    // A fresh session goes with fresh files.
    fn clear_files(&mut self) {
        match self.0.ws.initialize() {
            Ok(()) => {
                self.0.session = Session::new();
                self.set_status("Files initialized");
            }
            Err(e) => self.set_status(format!("Init error: {e:#}")),
        }
    }

    fn save_editor(&mut self) {
        let Some(ed) = self.0.editor.take() else { return };
        let mut lines = ed.lines.clone();
        let pending = ed.current.trim();
        if !pending.is_empty() {
            lines.push(pending.to_string());
        }
        if lines.is_empty() {
            self.set_status("No code entered.");
            self.0.editor = Some(ed);
            return;
        }
        let kind = if ed.file == DataFile::AssemblyInput { "Assembly" } else { "Machine" };
        match self.0.ws.write_lines(ed.file, &lines) {
            Ok(()) => {
                self.0.output = format!("{kind} code has been added.");
                self.set_status(format!("Saved {} lines", lines.len()));
            }
            Err(e) => {
                self.0.output = format!("Error: {e:#}");
                self.0.editor = Some(ed);
            }
        }
    }
}

// MANO_CONFIG points at an optional JSON workspace config.
fn load_config() -> anyhow::Result<WorkspaceConfig> {
    match std::env::var_os("MANO_CONFIG") {
        Some(path) => WorkspaceConfig::load(std::path::Path::new(&path)),
        None => Ok(WorkspaceConfig::default()),
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = load_config().unwrap_or_else(|e| {
        tracing::warn!("{e:#}; using default workspace");
        WorkspaceConfig::default()
    });
    App::run(iced::Settings::with_flags(cfg))
}
