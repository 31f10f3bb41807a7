//! Help text generation.

use std::collections::HashMap;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use super::command::CommandDef;
use super::keybinds::Keybindings;
use super::registry::CommandRegistry;
use super::types::CommandCategory;

/// Help lines for every registered command, grouped by category.
pub fn help_lines(registry: &CommandRegistry, keybindings: &Keybindings) -> Vec<Line<'static>> {
    let mut lines = vec![section_header("COMMANDS"), Line::from("")];

    for (category, defs) in grouped(registry) {
        // Category header
        lines.push(Line::from(vec![Span::styled(
            format!("  {}", category.display_name()),
            Style::default().fg(Color::Cyan),
        )]));

        for def in defs {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("    {:10}", keys_label(keybindings, def)),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(format!(" {:24} {}", def.name, def.description)),
            ]));
        }

        lines.push(Line::from(""));
    }

    lines
}

/// `help_lines` as plain strings.
pub fn help_text(registry: &CommandRegistry, keybindings: &Keybindings) -> Vec<String> {
    help_lines(registry, keybindings)
        .iter()
        .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
        .collect()
}

fn grouped(registry: &CommandRegistry) -> Vec<(CommandCategory, Vec<&'static CommandDef>)> {
    let mut by_category: HashMap<CommandCategory, Vec<&'static CommandDef>> = HashMap::new();
    for def in registry.all() {
        by_category.entry(def.category).or_default().push(def);
    }

    let mut groups: Vec<_> = by_category.into_iter().collect();
    groups.sort_by_key(|(category, _)| category.order());
    groups
}

fn keys_label(keybindings: &Keybindings, def: &CommandDef) -> String {
    let keys = keybindings.keys_for_command(def.name);
    if keys.is_empty() {
        ":".to_string()
    } else {
        keys.join("/")
    }
}

fn section_header(title: &'static str) -> Line<'static> {
    Line::from(vec![Span::styled(
        format!("─── {} ───", title),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )])
}
