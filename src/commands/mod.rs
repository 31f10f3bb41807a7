//! Command framework.
//!
//! Everything a user can trigger, by key or at the prompt, is a registered
//! command. This module resolves input into bound command instances; running
//! them on the right thread is the caller's job, guided by each command's
//! [`CommandPriority`].
//!
//! # Architecture
//!
//! - `args`: argument/option declarations and the token processor
//! - `arguments`: read access to resolved values
//! - `command`: command descriptors and per-invocation instances
//! - `context`: collaborator traits (UI, buffers, backend)
//! - `registry`: name -> command lookup, built once at startup
//! - `keybinds`: key sequence -> command line table
//! - `keys`: crossterm key events -> binding-table key names
//! - `commander`: command line and key sequence resolution
//! - `builtin`: the commands themselves
//! - `render`: help text generation

pub mod args;
mod arguments;
pub mod builtin;
mod command;
mod commander;
mod context;
mod error;
mod keybinds;
mod keys;
mod registry;
mod render;
mod types;

pub use args::{ArgValue, ArgumentDef, ArgumentProcessor, OptionDef};
pub use arguments::CommandArguments;
pub use command::{Command, CommandDef, CommandHandler, CommandOutcome};
pub use commander::Commander;
pub use context::{
    BackendHandle, BackendOps, BufferHandle, BufferOps, BufferRequest, CommandContext,
    NotifyLevel, ObjectKind, ObjectRef, TermSize, UiHandle, UiOps,
};
pub use error::CommandError;
pub use keybinds::{DEFAULT_KEYBINDS, DEFAULT_MODIFIER_KEYS, Keybindings};
pub use keys::key_name;
pub use registry::{CommandRegistry, RegistryBuilder};
pub use render::{help_lines, help_text};
pub use types::{CommandCategory, CommandPriority};
