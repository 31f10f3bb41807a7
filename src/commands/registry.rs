//! Command registry for centralized access.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::builtin;
use super::command::CommandDef;
use super::types::CommandCategory;

/// Collects command definitions at startup.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    commands: HashMap<&'static str, &'static CommandDef>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `def` under its name. A second definition with the same name
    /// replaces the first; that is a configuration defect and gets logged.
    pub fn register(&mut self, def: &'static CommandDef) -> &mut Self {
        if let Some(previous) = self.commands.insert(def.name, def) {
            if !std::ptr::eq(previous, def) {
                warn!(command = def.name, "command registered twice, keeping the last one");
            }
        }
        self
    }

    pub fn register_all(&mut self, defs: &[&'static CommandDef]) -> &mut Self {
        for &def in defs {
            self.register(def);
        }
        self
    }

    pub fn build(&mut self) -> CommandRegistry {
        let commands = std::mem::take(&mut self.commands);
        debug!(count = commands.len(), "command registry built");
        CommandRegistry { commands }
    }
}

/// Immutable lookup table from command name to definition.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: HashMap<&'static str, &'static CommandDef>,
}

impl CommandRegistry {
    /// Registry with every built-in command.
    pub fn builtin() -> Self {
        RegistryBuilder::new().register_all(builtin::ALL).build()
    }

    pub fn get(&self, name: &str) -> Option<&'static CommandDef> {
        self.commands.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All commands, sorted by name.
    pub fn all(&self) -> Vec<&'static CommandDef> {
        let mut all: Vec<_> = self.commands.values().copied().collect();
        all.sort_by_key(|def| def.name);
        all
    }

    /// Commands in one help category, sorted by name.
    pub fn in_category(&self, category: CommandCategory) -> Vec<&'static CommandDef> {
        self.all()
            .into_iter()
            .filter(|def| def.category == category)
            .collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
