use crate::commands::command::{Command, CommandDef, CommandOutcome};
use crate::commands::error::CommandError;
use crate::commands::types::{CommandCategory, CommandPriority};

use super::command;

/// Rows moved by `navigate-upwards` / `navigate-downwards`.
pub const PAGE_STEP: usize = 10;

pub static NAVIGATE_TOP: CommandDef = navigation("navigate-top", "Go to the first line.", run_top);
pub static NAVIGATE_BOTTOM: CommandDef =
    navigation("navigate-bottom", "Go to the last line.", run_bottom);
pub static NAVIGATE_UP: CommandDef = navigation("navigate-up", "Go one line up.", run_up);
pub static NAVIGATE_DOWN: CommandDef = navigation("navigate-down", "Go one line down.", run_down);
pub static NAVIGATE_UPWARDS: CommandDef =
    navigation("navigate-upwards", "Go ten lines up.", run_upwards);
pub static NAVIGATE_DOWNWARDS: CommandDef =
    navigation("navigate-downwards", "Go ten lines down.", run_downwards);

const fn navigation(
    name: &'static str,
    description: &'static str,
    handler: fn(&Command) -> Result<CommandOutcome, CommandError>,
) -> CommandDef {
    command(
        name,
        description,
        CommandPriority::SameThread,
        CommandCategory::Navigation,
        handler,
    )
}

fn run_top(cmd: &Command) -> Result<CommandOutcome, CommandError> {
    let buffer = cmd.context().buffer()?;
    if !buffer.is_empty() {
        buffer.set_focus(0)?;
    }
    buffer.reload();
    Ok(CommandOutcome::Done)
}

fn run_bottom(cmd: &Command) -> Result<CommandOutcome, CommandError> {
    let buffer = cmd.context().buffer()?;
    if let Some(last) = buffer.len().checked_sub(1) {
        buffer.set_focus(last)?;
    }
    buffer.reload();
    Ok(CommandOutcome::Done)
}

fn run_up(cmd: &Command) -> Result<CommandOutcome, CommandError> {
    cmd.context().buffer()?.keypress(cmd.context().size, "up");
    Ok(CommandOutcome::Done)
}

fn run_down(cmd: &Command) -> Result<CommandOutcome, CommandError> {
    cmd.context().buffer()?.keypress(cmd.context().size, "down");
    Ok(CommandOutcome::Done)
}

fn run_upwards(cmd: &Command) -> Result<CommandOutcome, CommandError> {
    let buffer = cmd.context().buffer()?;
    if let Some(focus) = buffer.focus() {
        buffer.set_focus(focus.saturating_sub(PAGE_STEP))?;
    }
    buffer.reload();
    Ok(CommandOutcome::Done)
}

fn run_downwards(cmd: &Command) -> Result<CommandOutcome, CommandError> {
    let buffer = cmd.context().buffer()?;
    if let (Some(focus), Some(last)) = (buffer.focus(), buffer.len().checked_sub(1)) {
        buffer.set_focus((focus + PAGE_STEP).min(last))?;
    }
    buffer.reload();
    Ok(CommandOutcome::Done)
}
