//! Line-oriented collaborators for the `berth` binary.
//!
//! `ConsoleUi` prints buffers and notifications to stdout, `ConsoleBackend`
//! manages an in-memory [`Inventory`] of containers and images.

use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::commands::{
    BackendOps, BufferHandle, BufferOps, BufferRequest, CommandError, CommandRegistry, Keybindings,
    NotifyLevel, ObjectKind, ObjectRef, TermSize, UiOps, help_text,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Lines end in `\r\n` so output stays aligned in raw mode.
pub fn print_colored_message(message: &str, color: Color) {
    let mut stdout = io::stdout();
    let message = message.replace('\n', "\r\n");
    if let Err(e) = execute!(stdout, SetForegroundColor(color), Print(message), ResetColor) {
        warn!(error = %e, "failed to write to stdout");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Running,
    Paused,
    Exited,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Running => "running",
            Status::Paused => "paused",
            Status::Exited => "exited",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    #[serde(flatten)]
    pub object: ObjectRef,
    /// Containers only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    /// Image a container was created from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Containers and images known to the console backend, plus an event log
/// per object.
#[derive(Debug, Default)]
pub struct Inventory {
    entries: Mutex<Vec<Entry>>,
    events: Mutex<Vec<(String, String)>>,
}

impl Inventory {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self {
            entries: Mutex::new(entries),
            events: Mutex::new(Vec::new()),
        }
    }

    /// A couple of images and containers to play with.
    pub fn demo() -> Self {
        let image = |id: &str, name: &str| Entry {
            object: ObjectRef::image(id, name),
            status: None,
            image: None,
        };
        let container = |id: &str, name: &str, status: Status, image: &str| Entry {
            object: ObjectRef::container(id, name),
            status: Some(status),
            image: Some(image.to_string()),
        };
        Self::new(vec![
            image("sha256:4b1f", "nginx"),
            image("sha256:9c3e", "postgres"),
            container("c0ffee01", "web", Status::Running, "nginx"),
            container("c0ffee02", "proxy", Status::Paused, "nginx"),
            container("c0ffee03", "db", Status::Exited, "postgres"),
        ])
    }

    pub fn entries(&self) -> Vec<Entry> {
        lock(&self.entries).clone()
    }

    pub fn get(&self, id: &str) -> Option<Entry> {
        lock(&self.entries).iter().find(|e| e.object.id == id).cloned()
    }

    pub fn events_for(&self, id: &str) -> Vec<String> {
        lock(&self.events)
            .iter()
            .filter(|(object, _)| object == id)
            .map(|(_, event)| event.clone())
            .collect()
    }

    fn record(&self, id: &str, event: String) {
        lock(&self.events).push((id.to_string(), event));
    }

    /// Moves a container to `to`, if it is currently in one of `from`.
    fn transition(&self, target: &ObjectRef, from: &[Status], to: Status) -> Result<(), CommandError> {
        let mut entries = lock(&self.entries);
        let entry = entries
            .iter_mut()
            .find(|e| e.object.id == target.id)
            .ok_or_else(|| CommandError::Backend(format!("no such object: {}", target.name)))?;
        let Some(status) = entry.status else {
            return Err(CommandError::Backend(format!(
                "{} is an image, not a container",
                target.name
            )));
        };
        if !from.contains(&status) {
            return Err(CommandError::Backend(format!(
                "{} is {}",
                target.name,
                status.as_str()
            )));
        }
        entry.status = Some(to);
        drop(entries);
        self.record(&target.id, format!("{} -> {}", status.as_str(), to.as_str()));
        Ok(())
    }

    fn remove(&self, target: &ObjectRef, force: bool) -> Result<(), CommandError> {
        let mut entries = lock(&self.entries);
        let Some(position) = entries.iter().position(|e| e.object.id == target.id) else {
            return Err(CommandError::Backend(format!("no such object: {}", target.name)));
        };
        if !force {
            let entry = &entries[position];
            if matches!(entry.status, Some(Status::Running | Status::Paused)) {
                return Err(CommandError::Backend(format!(
                    "{} is running, use force to remove it",
                    target.name
                )));
            }
            if target.kind == ObjectKind::Image {
                let users: Vec<&str> = entries
                    .iter()
                    .filter(|e| e.image.as_deref() == Some(target.name.as_str()))
                    .map(|e| e.object.name.as_str())
                    .collect();
                if !users.is_empty() {
                    return Err(CommandError::Backend(format!(
                        "image {} is used by {}",
                        target.name,
                        users.join(", ")
                    )));
                }
            }
        }
        entries.remove(position);
        drop(entries);
        self.record(&target.id, "removed".to_string());
        Ok(())
    }
}

/// Backend over an [`Inventory`].
pub struct ConsoleBackend {
    inventory: Arc<Inventory>,
}

impl ConsoleBackend {
    pub fn new(inventory: Arc<Inventory>) -> Self {
        Self { inventory }
    }
}

impl BackendOps for ConsoleBackend {
    fn remove(&self, target: &ObjectRef, force: bool) -> Result<(), CommandError> {
        info!(object = %target, force, "remove");
        self.inventory.remove(target, force)
    }

    fn start(&self, target: &ObjectRef) -> Result<(), CommandError> {
        info!(object = %target, "start");
        self.inventory.transition(target, &[Status::Exited], Status::Running)
    }

    fn stop(&self, target: &ObjectRef) -> Result<(), CommandError> {
        info!(object = %target, "stop");
        self.inventory
            .transition(target, &[Status::Running, Status::Paused], Status::Exited)
    }

    fn restart(&self, target: &ObjectRef) -> Result<(), CommandError> {
        info!(object = %target, "restart");
        self.inventory.transition(
            target,
            &[Status::Running, Status::Paused, Status::Exited],
            Status::Running,
        )
    }

    fn kill(&self, target: &ObjectRef) -> Result<(), CommandError> {
        info!(object = %target, "kill");
        self.inventory
            .transition(target, &[Status::Running, Status::Paused], Status::Exited)
    }

    fn pause(&self, target: &ObjectRef) -> Result<(), CommandError> {
        info!(object = %target, "pause");
        self.inventory.transition(target, &[Status::Running], Status::Paused)
    }

    fn unpause(&self, target: &ObjectRef) -> Result<(), CommandError> {
        info!(object = %target, "unpause");
        self.inventory.transition(target, &[Status::Paused], Status::Running)
    }
}

#[derive(Debug, Clone)]
struct Row {
    text: String,
    object: Option<ObjectRef>,
}

#[derive(Debug, Default)]
struct ListState {
    /// Rows passing `filter`; what is shown and searched.
    rows: Vec<Row>,
    all_rows: Vec<Row>,
    filter: String,
    focus: Option<usize>,
    last_query: Option<String>,
}

impl ListState {
    fn apply_filter(&mut self) {
        self.rows = self
            .all_rows
            .iter()
            .filter(|row| row.text.contains(&self.filter))
            .cloned()
            .collect();
        self.focus = match (self.focus, self.rows.len()) {
            (_, 0) => None,
            (Some(i), len) => Some(i.min(len - 1)),
            (None, _) => Some(0),
        };
    }

    /// Moves focus to the next row containing the query, wrapping around.
    fn search(&mut self, query: Option<&str>, backward: bool) -> Result<(), CommandError> {
        if let Some(query) = query {
            self.last_query = Some(query.to_string());
        }
        let Some(query) = self.last_query.clone() else {
            return Err(CommandError::notify("No previous search."));
        };

        let len = self.rows.len();
        let found = (1..=len)
            .map(|offset| match (self.focus, backward) {
                (None, false) => offset - 1,
                (None, true) => len - offset,
                (Some(f), false) => (f + offset) % len,
                (Some(f), true) => (f + len - offset % len) % len,
            })
            .find(|&i| self.rows[i].text.contains(&query));
        match found {
            Some(i) => {
                self.focus = Some(i);
                Ok(())
            }
            None => Err(CommandError::notify(format!("No match for {query:?}."))),
        }
    }
}

/// A named list of rows with a focus line.
///
/// Buffers built from the inventory re-read it on `reload`.
pub struct ListBuffer {
    name: String,
    source: Option<Arc<Inventory>>,
    state: Mutex<ListState>,
}

impl ListBuffer {
    pub fn new(name: impl Into<String>, lines: Vec<String>) -> Self {
        let rows = lines
            .into_iter()
            .map(|text| Row { text, object: None })
            .collect();
        Self::with_rows(name.into(), None, rows)
    }

    /// One row per inventory entry, each pointing at its object.
    pub fn inventory(inventory: Arc<Inventory>) -> Self {
        let rows = inventory_rows(&inventory);
        Self::with_rows("containers".to_string(), Some(inventory), rows)
    }

    fn with_rows(name: String, source: Option<Arc<Inventory>>, rows: Vec<Row>) -> Self {
        let focus = (!rows.is_empty()).then_some(0);
        Self {
            name,
            source,
            state: Mutex::new(ListState {
                all_rows: rows.clone(),
                rows,
                filter: String::new(),
                focus,
                last_query: None,
            }),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        lock(&self.state).rows.iter().map(|r| r.text.clone()).collect()
    }

    /// Rows with a marker on the focused one.
    pub fn render(&self) -> String {
        let state = lock(&self.state);
        let mut out = format!("── {} ──\n", self.name);
        for (i, row) in state.rows.iter().enumerate() {
            let marker = if state.focus == Some(i) { '>' } else { ' ' };
            out.push_str(&format!("{marker} {}\n", row.text));
        }
        out
    }
}

fn inventory_rows(inventory: &Inventory) -> Vec<Row> {
    inventory
        .entries()
        .into_iter()
        .map(|entry| {
            let status = entry.status.map(|s| s.as_str()).unwrap_or("-");
            Row {
                text: format!(
                    "{:<10} {:<10} {:<10} {}",
                    entry.object.name,
                    kind_name(entry.object.kind),
                    status,
                    entry.object.id
                ),
                object: Some(entry.object),
            }
        })
        .collect()
}

fn kind_name(kind: ObjectKind) -> &'static str {
    match kind {
        ObjectKind::Container => "container",
        ObjectKind::Image => "image",
    }
}

impl BufferOps for ListBuffer {
    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn len(&self) -> usize {
        lock(&self.state).rows.len()
    }

    fn focus(&self) -> Option<usize> {
        lock(&self.state).focus
    }

    fn set_focus(&self, index: usize) -> Result<(), CommandError> {
        let mut state = lock(&self.state);
        if index >= state.rows.len() {
            return Err(CommandError::notify(format!("No line {index} in {}.", self.name)));
        }
        state.focus = Some(index);
        Ok(())
    }

    fn reload(&self) {
        let Some(inventory) = &self.source else {
            return;
        };
        let mut state = lock(&self.state);
        state.all_rows = inventory_rows(inventory);
        state.apply_filter();
        debug!(buffer = %self.name, rows = state.rows.len(), "buffer reloaded");
    }

    fn keypress(&self, _size: Option<TermSize>, key: &str) -> bool {
        let mut state = lock(&self.state);
        let Some(current) = state.focus else {
            return false;
        };
        let last = state.rows.len().saturating_sub(1);
        state.focus = match key {
            "up" => Some(current.saturating_sub(1)),
            "down" => Some((current + 1).min(last)),
            _ => return false,
        };
        true
    }

    fn find_next(&self, query: Option<&str>) -> Result<(), CommandError> {
        lock(&self.state).search(query, false)
    }

    fn find_previous(&self, query: Option<&str>) -> Result<(), CommandError> {
        lock(&self.state).search(query, true)
    }

    fn filter(&self, query: &str) -> Result<(), CommandError> {
        let mut state = lock(&self.state);
        let previous = std::mem::replace(&mut state.filter, query.to_string());
        state.apply_filter();
        if state.rows.is_empty() && !state.all_rows.is_empty() {
            state.filter = previous;
            state.apply_filter();
            return Err(CommandError::notify(format!("No line in {} matches {query:?}.", self.name)));
        }
        debug!(buffer = %self.name, filter = query, rows = state.rows.len(), "buffer filtered");
        Ok(())
    }

    fn focused_object(&self) -> Option<ObjectRef> {
        let state = lock(&self.state);
        state
            .focus
            .and_then(|i| state.rows.get(i))
            .and_then(|row| row.object.clone())
    }
}

#[derive(Default)]
struct ConsoleState {
    buffers: Vec<Arc<ListBuffer>>,
    /// Built but not displayed yet.
    built: Vec<Arc<ListBuffer>>,
    current: Option<usize>,
    prompt: Option<(String, String)>,
    shut_down: bool,
}

/// UI that prints to stdout.
///
/// Only buffers from its own `build_buffer` can be displayed.
pub struct ConsoleUi {
    registry: Arc<CommandRegistry>,
    keybindings: Arc<Keybindings>,
    inventory: Arc<Inventory>,
    state: Mutex<ConsoleState>,
}

impl ConsoleUi {
    pub fn new(
        registry: Arc<CommandRegistry>,
        keybindings: Arc<Keybindings>,
        inventory: Arc<Inventory>,
    ) -> Self {
        let main = Arc::new(ListBuffer::inventory(inventory.clone()));
        Self {
            registry,
            keybindings,
            inventory,
            state: Mutex::new(ConsoleState {
                buffers: vec![main],
                current: Some(0),
                ..Default::default()
            }),
        }
    }

    /// Prompt requested by the last command, if any.
    pub fn take_prompt(&self) -> Option<(String, String)> {
        lock(&self.state).prompt.take()
    }

    pub fn is_shut_down(&self) -> bool {
        lock(&self.state).shut_down
    }

    pub fn buffer_names(&self) -> Vec<String> {
        lock(&self.state).buffers.iter().map(|b| b.display_name()).collect()
    }

    /// Prints the current buffer.
    pub fn redraw(&self) {
        if let Some(buffer) = self.current_list() {
            print_colored_message(&buffer.render(), Color::Reset);
        }
    }

    fn current_list(&self) -> Option<Arc<ListBuffer>> {
        let state = lock(&self.state);
        state.current.and_then(|i| state.buffers.get(i).cloned())
    }

    fn entry(&self, target: &ObjectRef) -> Result<Entry, CommandError> {
        self.inventory
            .get(&target.id)
            .ok_or_else(|| CommandError::notify(format!("{} no longer exists.", target.name)))
    }

    fn tree_lines(&self) -> Vec<String> {
        let entries = self.inventory.entries();
        let mut lines = Vec::new();
        for image in entries.iter().filter(|e| e.object.kind == ObjectKind::Image) {
            lines.push(format!("{} ({})", image.object.name, image.object.id));
            for container in entries
                .iter()
                .filter(|e| e.image.as_deref() == Some(image.object.name.as_str()))
            {
                let status = container.status.map(|s| s.as_str()).unwrap_or("-");
                lines.push(format!("└─ {} [{}]", container.object.name, status));
            }
        }
        lines
    }
}

impl UiOps for ConsoleUi {
    fn add_and_display_buffer(&self, buffer: BufferHandle) {
        let name = buffer.display_name();
        let mut state = lock(&self.state);
        let Some(position) = state
            .built
            .iter()
            .position(|b| std::ptr::addr_eq(Arc::as_ptr(b), Arc::as_ptr(&buffer)))
        else {
            warn!(buffer = %name, "not built by this UI, ignored");
            return;
        };
        let list = state.built.swap_remove(position);

        // A buffer with the same name is replaced in place.
        let index = match state.buffers.iter().position(|b| b.display_name() == name) {
            Some(i) => {
                state.buffers[i] = list;
                i
            }
            None => {
                state.buffers.push(list);
                state.buffers.len() - 1
            }
        };
        state.current = Some(index);
        drop(state);
        debug!(buffer = %name, "buffer displayed");
        self.redraw();
    }

    fn remove_current_buffer(&self, close_if_no_buffer: bool) -> Option<usize> {
        let mut state = lock(&self.state);
        let current = state.current?;
        if state.buffers.len() == 1 && !close_if_no_buffer {
            return None;
        }
        let removed = state.buffers.remove(current);
        state.current = match state.buffers.len() {
            0 => None,
            len => Some(current.min(len - 1)),
        };
        let left = state.buffers.len();
        drop(state);
        info!(buffer = %removed.display_name(), left, "buffer removed");
        if left > 0 {
            self.redraw();
        }
        Some(left)
    }

    fn pick_and_display_buffer(&self, index: isize) {
        let mut state = lock(&self.state);
        let len = state.buffers.len();
        if len == 0 {
            return;
        }
        state.current = Some(index.rem_euclid(len as isize) as usize);
        drop(state);
        self.redraw();
    }

    fn current_buffer_index(&self) -> Option<usize> {
        lock(&self.state).current
    }

    fn current_buffer(&self) -> Option<BufferHandle> {
        self.current_list().map(|b| b as BufferHandle)
    }

    fn notify_message(&self, text: &str, level: NotifyLevel) {
        let color = match level {
            NotifyLevel::Info => Color::Green,
            NotifyLevel::Error => Color::Red,
        };
        print_colored_message(&format!("{text}\n"), color);
    }

    fn shutdown_workers(&self) {
        info!("shutting down workers");
        lock(&self.state).shut_down = true;
    }

    fn build_buffer(&self, request: BufferRequest) -> Result<BufferHandle, CommandError> {
        debug!(?request, "building buffer");
        let buffer = match request {
            BufferRequest::Help => {
                ListBuffer::new("help", help_text(&self.registry, &self.keybindings))
            }
            BufferRequest::Tree => ListBuffer::new("layers", self.tree_lines()),
            BufferRequest::Logs { target, follow } => {
                let mut lines = self.inventory.events_for(&target.id);
                if lines.is_empty() {
                    lines.push("(no events)".to_string());
                }
                let name = if follow {
                    format!("logs -f {}", target.name)
                } else {
                    format!("logs {}", target.name)
                };
                ListBuffer::new(name, lines)
            }
            BufferRequest::Inspect(target) => {
                let entry = self.entry(&target)?;
                let json = serde_json::to_string_pretty(&entry)
                    .map_err(|e| CommandError::Backend(e.to_string()))?;
                ListBuffer::new(
                    format!("inspect {}", target.name),
                    json.lines().map(str::to_string).collect(),
                )
            }
            BufferRequest::Info(target) => {
                let entry = self.entry(&target)?;
                let mut lines = vec![
                    format!("Id:     {}", entry.object.id),
                    format!("Name:   {}", entry.object.name),
                    format!("Kind:   {}", kind_name(entry.object.kind)),
                ];
                if let Some(status) = entry.status {
                    lines.push(format!("Status: {}", status.as_str()));
                }
                if let Some(image) = entry.image {
                    lines.push(format!("Image:  {image}"));
                }
                ListBuffer::new(format!("info {}", target.name), lines)
            }
        };
        let buffer = Arc::new(buffer);
        let mut state = lock(&self.state);
        state.built.retain(|b| Arc::strong_count(b) > 1);
        state.built.push(buffer.clone());
        Ok(buffer)
    }

    fn prompt(&self, prompt_text: &str, initial: &str) {
        lock(&self.state).prompt = Some((prompt_text.to_string(), initial.to_string()));
    }
}
