use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use berth::app::App;
use berth::commands::{BackendHandle, CommandRegistry, Commander, TermSize, UiHandle};
use berth::config::{self, Config};
use berth::console::{ConsoleBackend, ConsoleUi, Inventory, print_colored_message};
use berth::dispatch::Runtimes;
use berth::logging;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    style::Color,
    terminal,
};
use reedline::{DefaultPrompt, DefaultPromptSegment, EditCommand, Reedline, Signal};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "berth", version, about = "Manage containers and images from the terminal")]
struct Cli {
    /// Config file (default: ~/.config/berth.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write logs; overrides the config file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Run a command line and exit; may be repeated
    #[arg(short = 'c', long = "command", value_name = "LINE")]
    commands: Vec<String>,

    /// Read single keystrokes and resolve them through the keybindings
    #[arg(long)]
    keys: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config::load_config(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            print_colored_message(
                &format!("Warning: {}\nUsing default settings.\n", e),
                Color::DarkYellow,
            );
            Config::default()
        }
    };

    let log_path = logging::resolve_log_path(cli.log_file.as_deref(), config.log_file.as_deref());
    if let Err(e) = logging::init(config.log_level.as_deref(), &log_path) {
        print_colored_message(
            &format!("Warning: logging disabled ({}): {}\n", log_path.display(), e),
            Color::DarkYellow,
        );
    }

    let runtimes = match Runtimes::new() {
        Ok(runtimes) => runtimes,
        Err(e) => {
            print_colored_message(&format!("Failed to start runtimes: {}\n", e), Color::Red);
            return ExitCode::FAILURE;
        }
    };

    let registry = Arc::new(CommandRegistry::builtin());
    let keybindings = Arc::new(config.keybindings());
    let inventory = Arc::new(Inventory::demo());
    let ui = Arc::new(ConsoleUi::new(registry.clone(), keybindings.clone(), inventory.clone()));
    let ui_handle: UiHandle = ui.clone();
    let backend: BackendHandle = Arc::new(ConsoleBackend::new(inventory));
    let commander = Commander::new(Some(ui_handle.clone()), Some(backend), registry, keybindings);
    let mut app = App::new(commander, runtimes.dispatcher(), ui_handle);
    if let Ok((cols, rows)) = terminal::size() {
        app.set_size(TermSize { cols, rows });
    }
    info!(log = %log_path.display(), keys = cli.keys, "berth started");

    if !cli.commands.is_empty() {
        for line in &cli.commands {
            app.execute_line(line);
            app.wait_idle();
            if !app.is_running() {
                break;
            }
        }
        return ExitCode::SUCCESS;
    }

    ui.redraw();
    let result = if cli.keys {
        run_keys(&mut app, &ui)
    } else {
        run_lines(&mut app, &ui);
        Ok(())
    };
    app.wait_idle();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_colored_message(&format!("Terminal error: {}\n", e), Color::Red);
            ExitCode::FAILURE
        }
    }
}

/// Command lines from a reedline prompt.
fn run_lines(app: &mut App, ui: &ConsoleUi) {
    print_colored_message("Type help for commands, quit to leave.\n", Color::DarkMagenta);

    let mut rl = Reedline::create();
    while app.is_running() {
        let (prompt_text, initial) = ui
            .take_prompt()
            .unwrap_or_else(|| (":".to_string(), String::new()));
        if let Some(line) = read_prompt(&mut rl, &prompt_text, &initial) {
            app.poll();
            submit(app, &prompt_text, &line);
        } else {
            break;
        }
        app.poll();
    }
}

/// Raw keystrokes; prompts requested by commands drop back to line input.
fn run_keys(app: &mut App, ui: &ConsoleUi) -> io::Result<()> {
    print_colored_message("Press h for help, ctrl c to leave.\n", Color::DarkMagenta);

    let mut rl = Reedline::create();
    terminal::enable_raw_mode()?;
    while app.is_running() {
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key)
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL) =>
                {
                    break;
                }
                Event::Key(key) => app.handle_key(&key),
                Event::Resize(cols, rows) => app.set_size(TermSize { cols, rows }),
                _ => {}
            }
        }
        app.poll();

        if let Some((prompt_text, initial)) = ui.take_prompt() {
            terminal::disable_raw_mode()?;
            let line = read_prompt(&mut rl, &prompt_text, &initial);
            terminal::enable_raw_mode()?;
            if let Some(line) = line {
                submit(app, &prompt_text, &line);
            }
        }
    }
    terminal::disable_raw_mode()
}

fn read_prompt(rl: &mut Reedline, prompt_text: &str, initial: &str) -> Option<String> {
    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic(prompt_text.to_string()),
        DefaultPromptSegment::Empty,
    );
    if !initial.is_empty() {
        rl.run_edit_commands(&[EditCommand::InsertString(initial.to_string())]);
    }
    match rl.read_line(&prompt) {
        Ok(Signal::Success(input)) => Some(input.trim().to_string()),
        Ok(Signal::CtrlD) | Ok(Signal::CtrlC) => None,
        Err(e) => {
            warn!(error = %e, "prompt failed");
            None
        }
    }
}

/// Search and filter prompts take a query, the command prompt a command line.
fn submit(app: &mut App, prompt_text: &str, line: &str) {
    match (prompt_text, line) {
        ("filter ", "") => app.execute_line("filter clear"),
        (_, "") => {}
        ("/", query) => app.execute_line(&format!("search {}", query)),
        ("filter ", query) => app.execute_line(&format!("filter {}", query)),
        (_, line) => app.execute_line(line),
    }
}
