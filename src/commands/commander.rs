//! Turns typed command lines and keystrokes into ready-to-run commands.

use std::sync::Arc;

use tracing::{debug, info};

use super::command::Command;
use super::context::{BackendHandle, BufferHandle, CommandContext, ObjectRef, TermSize, UiHandle};
use super::error::CommandError;
use super::keybinds::Keybindings;
use super::registry::CommandRegistry;

/// Resolves input into [`Command`]s. Running them is up to the caller.
///
/// One commander serves one input stream: the pending key prefix is only
/// touched through `&mut self`.
pub struct Commander {
    ui: Option<UiHandle>,
    backend: Option<BackendHandle>,
    registry: Arc<CommandRegistry>,
    keybindings: Arc<Keybindings>,
    /// Modifier keys pressed so far, e.g. the first `g` of `gg`.
    pending: Vec<String>,
}

impl Commander {
    pub fn new(
        ui: Option<UiHandle>,
        backend: Option<BackendHandle>,
        registry: Arc<CommandRegistry>,
        keybindings: Arc<Keybindings>,
    ) -> Self {
        debug!(commands = registry.len(), "commander created");
        Self {
            ui,
            backend,
            registry,
            keybindings,
            pending: Vec::new(),
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn keybindings(&self) -> &Keybindings {
        &self.keybindings
    }

    /// Builds the command for `input` (`"name arg arg2=val opt"`).
    ///
    /// Empty input is a no-op and yields `Ok(None)`.
    pub fn get_command(
        &self,
        input: &str,
        target: Option<ObjectRef>,
        buffer: Option<BufferHandle>,
        size: Option<TermSize>,
    ) -> Result<Option<Command>, CommandError> {
        debug!(input, "get command for command input");
        if input.is_empty() {
            return Ok(None);
        }

        let (name, rest) = match input.split_once(' ') {
            Some((name, rest)) => (name, Some(rest)),
            None => (input, None),
        };
        let tokens: Vec<&str> = rest.map(|r| r.split(' ').collect()).unwrap_or_default();

        let Some(def) = self.registry.get(name) else {
            info!(command = name, "no such command");
            return Err(CommandError::NoSuchCommand(name.to_string()));
        };

        let ctx = CommandContext {
            ui: self.ui.clone(),
            backend: self.backend.clone(),
            target,
            buffer,
            size,
        };
        let mut command = Command::new(def, ctx);
        command.process_args(&tokens)?;
        Ok(Some(command))
    }

    /// Feeds one key into the sequence resolver.
    ///
    /// Returns the bound command line once a sequence completes, `Ok(None)`
    /// while a modifier prefix is pending, and `KeyNotMapped` (with the
    /// resolver reset) for a sequence that leads nowhere.
    pub fn resolve_key(&mut self, key: &str) -> Result<Option<String>, CommandError> {
        let probe = format!("{}{}", self.pending.concat(), key);
        debug!(key, probe = %probe, "get command input for key");

        if let Some(command_line) = self.keybindings.get(&probe) {
            self.pending.clear();
            return Ok(Some(command_line.to_string()));
        }

        if self.keybindings.is_modifier(key) {
            self.pending.push(key.to_string());
            info!(pending = ?self.pending, "modifier keys pressed");
            return Ok(None);
        }

        self.pending.clear();
        info!(probe = %probe, "no such keybind");
        Err(CommandError::KeyNotMapped(probe))
    }

    /// `resolve_key` followed by `get_command`.
    pub fn command_for_key(
        &mut self,
        key: &str,
        target: Option<ObjectRef>,
        buffer: Option<BufferHandle>,
        size: Option<TermSize>,
    ) -> Result<Option<Command>, CommandError> {
        match self.resolve_key(key)? {
            Some(line) => self.get_command(&line, target, buffer, size),
            None => Ok(None),
        }
    }

    /// Modifier keys waiting for the rest of their sequence.
    pub fn pending_prefix(&self) -> String {
        self.pending.concat()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drops any pending prefix, e.g. when focus moves to the prompt.
    pub fn reset_keys(&mut self) {
        self.pending.clear();
    }
}
