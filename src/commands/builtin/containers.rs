use crate::commands::args::{ArgValue, ArgumentDef, bool_action};
use crate::commands::command::{Command, CommandDef, CommandOutcome};
use crate::commands::context::{BackendOps, ObjectRef};
use crate::commands::error::CommandError;
use crate::commands::types::{CommandCategory, CommandPriority};

use super::{command, selected_object};

static RM_ARGUMENTS: &[ArgumentDef] = &[ArgumentDef {
    name: "force",
    description: "Remove even if the container is running.",
    aliases: &["-f"],
    default: ArgValue::Bool(false),
    action: bool_action,
}];

pub static RM: CommandDef = CommandDef {
    pre_info_message: "Removing {}...",
    post_info_message: "{} removed.",
    arguments: RM_ARGUMENTS,
    ..command(
        "rm",
        "Remove the selected container or image.",
        CommandPriority::Backend,
        CommandCategory::Containers,
        run_rm,
    )
};

pub static START: CommandDef = lifecycle("start", "Start the selected container.", run_start);
pub static STOP: CommandDef = lifecycle("stop", "Stop the selected container.", run_stop);
pub static RESTART: CommandDef =
    lifecycle("restart", "Restart the selected container.", run_restart);
pub static KILL: CommandDef = lifecycle("kill", "Kill the selected container.", run_kill);
pub static PAUSE: CommandDef = lifecycle("pause", "Pause the selected container.", run_pause);
pub static UNPAUSE: CommandDef =
    lifecycle("unpause", "Unpause the selected container.", run_unpause);

const fn lifecycle(
    name: &'static str,
    description: &'static str,
    handler: fn(&Command) -> Result<CommandOutcome, CommandError>,
) -> CommandDef {
    CommandDef {
        pre_info_message: "Running {}...",
        post_info_message: "Done: {}.",
        ..command(
            name,
            description,
            CommandPriority::Backend,
            CommandCategory::Containers,
            handler,
        )
    }
}

fn run_rm(cmd: &Command) -> Result<CommandOutcome, CommandError> {
    let force = cmd.arguments().flag("force")?;
    let target = selected_object(cmd)?;
    cmd.context().backend()?.remove(target, force)?;
    Ok(CommandOutcome::Done)
}

fn on_target(
    cmd: &Command,
    op: fn(&dyn BackendOps, &ObjectRef) -> Result<(), CommandError>,
) -> Result<CommandOutcome, CommandError> {
    let target = selected_object(cmd)?;
    op(cmd.context().backend()?, target)?;
    Ok(CommandOutcome::Done)
}

fn run_start(cmd: &Command) -> Result<CommandOutcome, CommandError> {
    on_target(cmd, |backend, target| backend.start(target))
}

fn run_stop(cmd: &Command) -> Result<CommandOutcome, CommandError> {
    on_target(cmd, |backend, target| backend.stop(target))
}

fn run_restart(cmd: &Command) -> Result<CommandOutcome, CommandError> {
    on_target(cmd, |backend, target| backend.restart(target))
}

fn run_kill(cmd: &Command) -> Result<CommandOutcome, CommandError> {
    on_target(cmd, |backend, target| backend.kill(target))
}

fn run_pause(cmd: &Command) -> Result<CommandOutcome, CommandError> {
    on_target(cmd, |backend, target| backend.pause(target))
}

fn run_unpause(cmd: &Command) -> Result<CommandOutcome, CommandError> {
    on_target(cmd, |backend, target| backend.unpause(target))
}
