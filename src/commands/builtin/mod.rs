//! Built-in commands.
//!
//! - `containers`: lifecycle operations, run on the backend lane
//! - `inspection`: buffers describing one object, run on the frontend lane
//! - `navigation`: focus movement inside the current buffer
//! - `ui_operations`: buffer management, prompt, help and quitting

pub mod containers;
pub mod inspection;
pub mod navigation;
pub mod ui_operations;

use super::command::{Command, CommandDef, CommandHandler, CommandOutcome};
use super::context::{BufferRequest, ObjectRef};
use super::error::CommandError;
use super::types::{CommandCategory, CommandPriority};

/// Every built-in command, registered by [`CommandRegistry::builtin`].
///
/// [`CommandRegistry::builtin`]: super::CommandRegistry::builtin
pub static ALL: &[&CommandDef] = &[
    &containers::RM,
    &containers::START,
    &containers::STOP,
    &containers::RESTART,
    &containers::KILL,
    &containers::PAUSE,
    &containers::UNPAUSE,
    &inspection::DISPLAY_INFO,
    &inspection::LOGS,
    &inspection::INSPECT,
    &navigation::NAVIGATE_TOP,
    &navigation::NAVIGATE_BOTTOM,
    &navigation::NAVIGATE_UP,
    &navigation::NAVIGATE_DOWN,
    &navigation::NAVIGATE_UPWARDS,
    &navigation::NAVIGATE_DOWNWARDS,
    &ui_operations::QUIT,
    &ui_operations::KILL_BUFFER,
    &ui_operations::REMOVE_BUFFER,
    &ui_operations::SELECT_BUFFER,
    &ui_operations::SELECT_NEXT_BUFFER,
    &ui_operations::SELECT_PREVIOUS_BUFFER,
    &ui_operations::HELP,
    &ui_operations::LAYERS,
    &ui_operations::PROMPT,
    &ui_operations::SEARCH,
    &ui_operations::SEARCH_NEXT,
    &ui_operations::SEARCH_PREVIOUS,
    &ui_operations::FILTER,
];

/// Definition without arguments, options or info messages.
const fn command(
    name: &'static str,
    description: &'static str,
    priority: CommandPriority,
    category: CommandCategory,
    handler: CommandHandler,
) -> CommandDef {
    CommandDef {
        name,
        description,
        pre_info_message: "",
        post_info_message: "",
        priority,
        category,
        arguments: &[],
        options: &[],
        handler,
    }
}

/// The object the command acts on; its absence is the user's to fix.
fn selected_object(cmd: &Command) -> Result<&ObjectRef, CommandError> {
    cmd.context()
        .target
        .as_ref()
        .ok_or_else(|| CommandError::notify("No container or image is selected."))
}

/// Builds the requested buffer and shows it.
fn display_buffer(cmd: &Command, request: BufferRequest) -> Result<CommandOutcome, CommandError> {
    let ui = cmd.context().ui()?;
    ui.add_and_display_buffer(ui.build_buffer(request)?);
    Ok(CommandOutcome::Done)
}
