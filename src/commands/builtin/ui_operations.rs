use tracing::{info, warn};

use crate::commands::args::{ArgValue, ArgumentDef, OptionDef, text_action};
use crate::commands::command::{Command, CommandDef, CommandOutcome};
use crate::commands::context::BufferRequest;
use crate::commands::error::CommandError;
use crate::commands::types::{CommandCategory, CommandPriority};

use super::{command, display_buffer};

pub static QUIT: CommandDef = command(
    "quit",
    "Quit the application.",
    CommandPriority::SameThread,
    CommandCategory::Other,
    run_quit,
);

pub static KILL_BUFFER: CommandDef = command(
    "kill-buffer",
    "Close the current buffer; quit when it was the last one.",
    CommandPriority::SameThread,
    CommandCategory::Buffers,
    run_kill_buffer,
);

pub static REMOVE_BUFFER: CommandDef = command(
    "remove-buffer",
    "Close the current buffer, keeping the last one open.",
    CommandPriority::SameThread,
    CommandCategory::Buffers,
    run_remove_buffer,
);

static SELECT_BUFFER_OPTIONS: &[OptionDef] = &[OptionDef {
    name: "index",
    description: "Position of the buffer in the buffer list.",
    default: ArgValue::None,
}];

pub static SELECT_BUFFER: CommandDef = CommandDef {
    options: SELECT_BUFFER_OPTIONS,
    ..command(
        "select-buffer",
        "Display the buffer at the given index.",
        CommandPriority::SameThread,
        CommandCategory::Buffers,
        run_select_buffer,
    )
};

pub static SELECT_NEXT_BUFFER: CommandDef = command(
    "select-next-buffer",
    "Display the next buffer.",
    CommandPriority::SameThread,
    CommandCategory::Buffers,
    run_select_next_buffer,
);

pub static SELECT_PREVIOUS_BUFFER: CommandDef = command(
    "select-previous-buffer",
    "Display the previous buffer.",
    CommandPriority::SameThread,
    CommandCategory::Buffers,
    run_select_previous_buffer,
);

pub static HELP: CommandDef = command(
    "help",
    "Show commands and their key bindings.",
    CommandPriority::SameThread,
    CommandCategory::Other,
    run_help,
);

pub static LAYERS: CommandDef = command(
    "layers",
    "Show the tree of images and containers.",
    CommandPriority::SameThread,
    CommandCategory::Inspection,
    run_layers,
);

static PROMPT_ARGUMENTS: &[ArgumentDef] = &[ArgumentDef {
    name: "initial-text",
    description: "Text to pre-fill the prompt with.",
    aliases: &[],
    default: ArgValue::None,
    action: text_action,
}];

pub static PROMPT: CommandDef = CommandDef {
    arguments: PROMPT_ARGUMENTS,
    ..command(
        "prompt",
        "Open the command prompt.",
        CommandPriority::SameThread,
        CommandCategory::Other,
        run_prompt,
    )
};

static SEARCH_OPTIONS: &[OptionDef] = &[OptionDef {
    name: "query",
    description: "Text to look for; without it, a search prompt opens.",
    default: ArgValue::None,
}];

pub static SEARCH: CommandDef = CommandDef {
    options: SEARCH_OPTIONS,
    ..command(
        "search",
        "Search the current buffer.",
        CommandPriority::SameThread,
        CommandCategory::Navigation,
        run_search,
    )
};

pub static SEARCH_NEXT: CommandDef = command(
    "search-next",
    "Repeat the last search forwards.",
    CommandPriority::SameThread,
    CommandCategory::Navigation,
    run_search_next,
);

pub static SEARCH_PREVIOUS: CommandDef = command(
    "search-previous",
    "Repeat the last search backwards.",
    CommandPriority::SameThread,
    CommandCategory::Navigation,
    run_search_previous,
);

static FILTER_OPTIONS: &[OptionDef] = &[OptionDef {
    name: "query",
    description: "Keep only lines containing this text; `clear` shows all lines again.",
    default: ArgValue::None,
}];

pub static FILTER: CommandDef = CommandDef {
    options: FILTER_OPTIONS,
    ..command(
        "filter",
        "Filter the lines of the current buffer.",
        CommandPriority::SameThread,
        CommandCategory::Navigation,
        run_filter,
    )
};

fn run_quit(cmd: &Command) -> Result<CommandOutcome, CommandError> {
    if let Some(ui) = cmd.context().ui.as_deref() {
        ui.shutdown_workers();
    }
    info!("quit requested");
    Ok(CommandOutcome::Exit)
}

fn close_current_buffer(
    cmd: &Command,
    close_if_no_buffer: bool,
) -> Result<CommandOutcome, CommandError> {
    match cmd.context().ui()?.remove_current_buffer(close_if_no_buffer) {
        None => Err(CommandError::notify("Last buffer will not be removed.")),
        Some(0) => Ok(CommandOutcome::FollowUp(QUIT.name.to_string())),
        Some(_) => Ok(CommandOutcome::Done),
    }
}

fn run_kill_buffer(cmd: &Command) -> Result<CommandOutcome, CommandError> {
    close_current_buffer(cmd, true)
}

fn run_remove_buffer(cmd: &Command) -> Result<CommandOutcome, CommandError> {
    close_current_buffer(cmd, false)
}

fn select_buffer(cmd: &Command, index: isize) -> Result<CommandOutcome, CommandError> {
    cmd.context().ui()?.pick_and_display_buffer(index);
    Ok(CommandOutcome::Done)
}

fn run_select_buffer(cmd: &Command) -> Result<CommandOutcome, CommandError> {
    let Some(index) = cmd.arguments().int("index")? else {
        return Err(CommandError::notify(
            "Please specify index of a buffer to display.",
        ));
    };
    let index = isize::try_from(index)
        .map_err(|_| CommandError::notify(format!("No buffer at index {index}.")))?;
    select_buffer(cmd, index)
}

fn current_index(cmd: &Command) -> Result<isize, CommandError> {
    cmd.context()
        .ui()?
        .current_buffer_index()
        .map(|i| i as isize)
        .ok_or_else(|| CommandError::notify("No buffer is displayed."))
}

fn run_select_next_buffer(cmd: &Command) -> Result<CommandOutcome, CommandError> {
    let index = current_index(cmd)?;
    select_buffer(cmd, index + 1)
}

fn run_select_previous_buffer(cmd: &Command) -> Result<CommandOutcome, CommandError> {
    let index = current_index(cmd)?;
    select_buffer(cmd, index - 1)
}

fn run_help(cmd: &Command) -> Result<CommandOutcome, CommandError> {
    display_buffer(cmd, BufferRequest::Help)
}

fn run_layers(cmd: &Command) -> Result<CommandOutcome, CommandError> {
    display_buffer(cmd, BufferRequest::Tree)
}

fn run_prompt(cmd: &Command) -> Result<CommandOutcome, CommandError> {
    let initial = cmd.arguments().text("initial-text")?.unwrap_or_default();
    cmd.context().ui()?.prompt(":", initial);
    Ok(CommandOutcome::Done)
}

fn run_search(cmd: &Command) -> Result<CommandOutcome, CommandError> {
    match cmd.arguments().text("query")? {
        Some(query) if !query.is_empty() => {
            let buffer = cmd.context().buffer()?;
            buffer.find_next(Some(query)).inspect_err(|e| {
                warn!(buffer = %buffer.display_name(), error = %e, "search failed");
            })?;
        }
        _ => cmd.context().ui()?.prompt("/", ""),
    }
    Ok(CommandOutcome::Done)
}

fn run_search_next(cmd: &Command) -> Result<CommandOutcome, CommandError> {
    cmd.context().buffer()?.find_next(None)?;
    Ok(CommandOutcome::Done)
}

fn run_search_previous(cmd: &Command) -> Result<CommandOutcome, CommandError> {
    cmd.context().buffer()?.find_previous(None)?;
    Ok(CommandOutcome::Done)
}

fn run_filter(cmd: &Command) -> Result<CommandOutcome, CommandError> {
    match cmd.arguments().text("query")? {
        Some("clear") => cmd.context().buffer()?.filter("")?,
        Some(query) if !query.is_empty() => cmd.context().buffer()?.filter(query)?,
        _ => cmd.context().ui()?.prompt("filter ", ""),
    }
    Ok(CommandOutcome::Done)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::commands::context::CommandContext;
    use crate::test_helpers::{FakeBuffer, FakeUi};

    fn with_ui(def: &'static CommandDef, ui: &Arc<FakeUi>) -> Command {
        Command::new(
            def,
            CommandContext {
                ui: Some(ui.clone()),
                ..Default::default()
            },
        )
    }

    #[test]
    fn quit_shuts_workers_down_and_exits() {
        let ui = Arc::new(FakeUi::default());
        assert_eq!(with_ui(&QUIT, &ui).run(), Ok(CommandOutcome::Exit));
        assert!(ui.was_shut_down());
    }

    #[test]
    fn kill_buffer_asks_for_quit_when_nothing_is_left() {
        let ui = Arc::new(FakeUi::with_buffers(&["main"]));
        assert_eq!(
            with_ui(&KILL_BUFFER, &ui).run(),
            Ok(CommandOutcome::FollowUp("quit".to_string()))
        );
        assert!(!ui.was_shut_down());
    }

    #[test]
    fn kill_buffer_with_buffers_left() {
        let ui = Arc::new(FakeUi::with_buffers(&["main", "logs web"]));
        assert_eq!(with_ui(&KILL_BUFFER, &ui).run(), Ok(CommandOutcome::Done));
        assert_eq!(ui.buffer_names(), vec!["main"]);
    }

    #[test]
    fn remove_buffer_keeps_the_last_one() {
        let ui = Arc::new(FakeUi::with_buffers(&["main"]));
        let err = with_ui(&REMOVE_BUFFER, &ui).run().unwrap_err();
        assert_eq!(err, CommandError::notify("Last buffer will not be removed."));
        assert_eq!(ui.buffer_names(), vec!["main"]);
    }

    #[test]
    fn select_buffer_by_index() {
        let ui = Arc::new(FakeUi::with_buffers(&["main", "logs", "help"]));
        let mut cmd = with_ui(&SELECT_BUFFER, &ui);
        cmd.process_args(&["2"]).unwrap();
        cmd.run().unwrap();
        assert_eq!(ui.picks(), vec![2]);

        let err = with_ui(&SELECT_BUFFER, &ui).run().unwrap_err();
        assert!(err.is_notify());
    }

    #[test]
    fn next_and_previous_are_relative_to_current() {
        let ui = Arc::new(FakeUi::with_buffers(&["main", "logs", "help"]));
        ui.pick_current(1);
        with_ui(&SELECT_NEXT_BUFFER, &ui).run().unwrap();
        with_ui(&SELECT_PREVIOUS_BUFFER, &ui).run().unwrap();
        assert_eq!(ui.picks(), vec![2, 0]);
    }

    #[test]
    fn help_and_layers_build_buffers() {
        let ui = Arc::new(FakeUi::default());
        with_ui(&HELP, &ui).run().unwrap();
        with_ui(&LAYERS, &ui).run().unwrap();
        assert_eq!(ui.requests(), vec![BufferRequest::Help, BufferRequest::Tree]);
        assert_eq!(ui.displayed(), vec!["help", "tree"]);
    }

    #[test]
    fn prompt_prefills_text() {
        let ui = Arc::new(FakeUi::default());
        let mut cmd = with_ui(&PROMPT, &ui);
        cmd.process_args(&["initial-text=logs"]).unwrap();
        cmd.run().unwrap();
        with_ui(&PROMPT, &ui).run().unwrap();
        assert_eq!(
            ui.prompts(),
            vec![(":".to_string(), "logs".to_string()), (":".to_string(), String::new())]
        );
    }

    #[test]
    fn search_with_and_without_query() {
        let ui = Arc::new(FakeUi::default());
        let buffer = Arc::new(FakeBuffer::with_rows("main", 3));
        let mut cmd = Command::new(
            &SEARCH,
            CommandContext {
                ui: Some(ui.clone()),
                buffer: Some(buffer.clone()),
                ..Default::default()
            },
        );
        cmd.process_args(&["nginx"]).unwrap();
        cmd.run().unwrap();
        assert_eq!(buffer.searches(), vec![Some("nginx".to_string())]);

        with_ui(&SEARCH, &ui).run().unwrap();
        assert_eq!(ui.prompts(), vec![("/".to_string(), String::new())]);
    }

    fn with_buffer(def: &'static CommandDef, ui: &Arc<FakeUi>, buffer: &Arc<FakeBuffer>) -> Command {
        Command::new(
            def,
            CommandContext {
                ui: Some(ui.clone()),
                buffer: Some(buffer.clone()),
                ..Default::default()
            },
        )
    }

    #[test]
    fn search_next_and_previous_repeat_the_last_query() {
        let ui = Arc::new(FakeUi::default());
        let buffer = Arc::new(FakeBuffer::with_rows("main", 3));
        with_buffer(&SEARCH_NEXT, &ui, &buffer).run().unwrap();
        with_buffer(&SEARCH_PREVIOUS, &ui, &buffer).run().unwrap();
        assert_eq!(buffer.searches(), vec![None]);
        assert_eq!(buffer.backward_searches(), vec![None]);

        let err = with_ui(&SEARCH_NEXT, &ui).run().unwrap_err();
        assert_eq!(err, CommandError::MissingContext("a buffer"));
    }

    #[test]
    fn filter_applies_clears_or_prompts() {
        let ui = Arc::new(FakeUi::default());
        let buffer = Arc::new(FakeBuffer::with_rows("main", 3));
        let mut cmd = with_buffer(&FILTER, &ui, &buffer);
        cmd.process_args(&["web"]).unwrap();
        cmd.run().unwrap();
        let mut cmd = with_buffer(&FILTER, &ui, &buffer);
        cmd.process_args(&["clear"]).unwrap();
        cmd.run().unwrap();
        assert_eq!(buffer.filters(), vec!["web".to_string(), String::new()]);

        with_ui(&FILTER, &ui).run().unwrap();
        assert_eq!(ui.prompts(), vec![("filter ".to_string(), String::new())]);
    }

    #[test]
    fn select_buffer_accepts_negative_indexes() {
        let ui = Arc::new(FakeUi::with_buffers(&["main"]));
        let mut cmd = with_ui(&SELECT_BUFFER, &ui);
        cmd.process_args(&["-7"]).unwrap();
        cmd.run().unwrap();
        assert_eq!(ui.picks(), vec![-7]);
    }
}
