//! Key sequence to command line bindings.

use std::collections::HashMap;

use tracing::debug;

/// Default bindings: key sequence -> command line.
pub const DEFAULT_KEYBINDS: &[(&str, &str)] = &[
    // containers
    ("d", "rm"),
    ("s", "start"),
    ("t", "stop"),
    ("r", "restart"),
    ("X", "kill"),
    ("p", "pause"),
    ("u", "unpause"),
    // inspection
    ("enter", "display-info"),
    ("l", "logs"),
    ("f", "logs -f"),
    ("i", "inspect"),
    // navigation
    ("gg", "navigate-top"),
    ("G", "navigate-bottom"),
    ("j", "navigate-down"),
    ("k", "navigate-up"),
    ("ctrl d", "navigate-downwards"),
    ("ctrl u", "navigate-upwards"),
    // prompt
    (":", "prompt"),
    ("/", "search"),
    ("n", "search-next"),
    ("N", "search-previous"),
    ("f4", "filter"),
    // buffers
    ("x", "remove-buffer"),
    ("q", "kill-buffer"),
    ("ctrl i", "select-next-buffer"),
    ("ctrl o", "select-previous-buffer"),
    ("h", "help"),
    ("?", "help"),
    ("f5", "layers"),
];

/// Keys that start a multi-key sequence instead of resolving on their own.
pub const DEFAULT_MODIFIER_KEYS: &[&str] = &["g"];

/// The binding table a [`Commander`](super::Commander) resolves keys against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybindings {
    bindings: HashMap<String, String>,
    modifiers: Vec<String>,
}

impl Keybindings {
    pub fn new(bindings: HashMap<String, String>, modifiers: Vec<String>) -> Self {
        Self {
            bindings,
            modifiers,
        }
    }

    /// Applies user overrides on top of the defaults. An empty command line
    /// unbinds the key.
    pub fn with_overrides(overrides: &HashMap<String, String>, extra_modifiers: &[String]) -> Self {
        let mut keybindings = Self::default();
        for (key, command_line) in overrides {
            if command_line.trim().is_empty() {
                debug!(key = %key, "keybinding removed by config");
                keybindings.bindings.remove(key);
            } else {
                debug!(key = %key, command_line = %command_line, "keybinding set by config");
                keybindings.bindings.insert(key.clone(), command_line.clone());
            }
        }
        for modifier in extra_modifiers {
            if !keybindings.modifiers.contains(modifier) {
                keybindings.modifiers.push(modifier.clone());
            }
        }
        keybindings
    }

    /// Command line bound to `sequence`.
    pub fn get(&self, sequence: &str) -> Option<&str> {
        self.bindings.get(sequence).map(String::as_str)
    }

    pub fn is_modifier(&self, key: &str) -> bool {
        self.modifiers.iter().any(|m| m == key)
    }

    pub fn modifiers(&self) -> &[String] {
        &self.modifiers
    }

    /// Key sequences bound to command `name`, sorted.
    pub fn keys_for_command(&self, name: &str) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .bindings
            .iter()
            .filter(|(_, line)| line.split(' ').next() == Some(name))
            .map(|(key, _)| key.as_str())
            .collect();
        keys.sort();
        keys
    }

    /// All bindings sorted by key sequence.
    pub fn iter_sorted(&self) -> Vec<(&str, &str)> {
        let mut all: Vec<_> = self
            .bindings
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        all.sort();
        all
    }
}

impl Default for Keybindings {
    fn default() -> Self {
        Self::new(
            DEFAULT_KEYBINDS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            DEFAULT_MODIFIER_KEYS.iter().map(|m| m.to_string()).collect(),
        )
    }
}
