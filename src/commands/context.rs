//! Collaborators a command talks to while running.
//!
//! The framework never implements these. It receives handles when the
//! [`Commander`](super::Commander) is built and passes them through, untouched,
//! to every command it constructs.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::error::CommandError;

/// Terminal size, for collaborators that need it on keypress-style calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TermSize {
    pub cols: u16,
    pub rows: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Container,
    Image,
}

/// The backend object a command acts on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    pub id: String,
    pub name: String,
    pub kind: ObjectKind,
}

impl ObjectRef {
    pub fn container(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: ObjectKind::Container,
        }
    }

    pub fn image(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: ObjectKind::Image,
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Buffers the UI can be asked to construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferRequest {
    Help,
    /// Image/container layer tree.
    Tree,
    Logs { target: ObjectRef, follow: bool },
    Inspect(ObjectRef),
    Info(ObjectRef),
}

/// A displayed buffer and its list widget.
pub trait BufferOps: Send + Sync {
    fn display_name(&self) -> String;
    /// Number of rows in the widget.
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn focus(&self) -> Option<usize>;
    /// Indices past the end are an error for the buffer to report.
    fn set_focus(&self, index: usize) -> Result<(), CommandError>;
    fn reload(&self);
    /// Feeds a raw key (`"up"`, `"down"`) to the widget's own handler.
    fn keypress(&self, size: Option<TermSize>, key: &str) -> bool;
    /// Searches forward; `None` repeats the last query.
    fn find_next(&self, query: Option<&str>) -> Result<(), CommandError>;
    /// Searches backward; `None` repeats the last query.
    fn find_previous(&self, query: Option<&str>) -> Result<(), CommandError>;
    /// Keeps only rows matching `query`; an empty query shows everything.
    fn filter(&self, _query: &str) -> Result<(), CommandError> {
        Err(CommandError::notify(format!(
            "Buffer {} can't be filtered.",
            self.display_name()
        )))
    }
    /// Backend object under the cursor, if the buffer lists objects.
    fn focused_object(&self) -> Option<ObjectRef> {
        None
    }
}

/// Buffer management and notifications.
pub trait UiOps: Send + Sync {
    fn add_and_display_buffer(&self, buffer: BufferHandle);
    /// Returns the number of buffers left, or `None` when the current
    /// buffer may not be removed.
    fn remove_current_buffer(&self, close_if_no_buffer: bool) -> Option<usize>;
    /// Negative indices count from the end.
    fn pick_and_display_buffer(&self, index: isize);
    fn current_buffer_index(&self) -> Option<usize>;
    fn current_buffer(&self) -> Option<BufferHandle>;
    fn notify_message(&self, text: &str, level: NotifyLevel);
    fn shutdown_workers(&self);
    fn build_buffer(&self, request: BufferRequest) -> Result<BufferHandle, CommandError>;
    fn prompt(&self, prompt_text: &str, initial: &str);
}

/// Lifecycle operations on backend objects. These may block.
pub trait BackendOps: Send + Sync {
    fn remove(&self, target: &ObjectRef, force: bool) -> Result<(), CommandError>;
    fn start(&self, target: &ObjectRef) -> Result<(), CommandError>;
    fn stop(&self, target: &ObjectRef) -> Result<(), CommandError>;
    fn restart(&self, target: &ObjectRef) -> Result<(), CommandError>;
    fn kill(&self, target: &ObjectRef) -> Result<(), CommandError>;
    fn pause(&self, target: &ObjectRef) -> Result<(), CommandError>;
    fn unpause(&self, target: &ObjectRef) -> Result<(), CommandError>;
}

pub type UiHandle = Arc<dyn UiOps>;
pub type BackendHandle = Arc<dyn BackendOps>;
pub type BufferHandle = Arc<dyn BufferOps>;

/// Everything a command instance is constructed with. Any part may be absent.
#[derive(Clone, Default)]
pub struct CommandContext {
    pub ui: Option<UiHandle>,
    pub backend: Option<BackendHandle>,
    pub target: Option<ObjectRef>,
    pub buffer: Option<BufferHandle>,
    pub size: Option<TermSize>,
}

impl CommandContext {
    pub fn ui(&self) -> Result<&dyn UiOps, CommandError> {
        self.ui.as_deref().ok_or(CommandError::MissingContext("a UI handle"))
    }

    pub fn backend(&self) -> Result<&dyn BackendOps, CommandError> {
        self.backend
            .as_deref()
            .ok_or(CommandError::MissingContext("a backend handle"))
    }

    pub fn target(&self) -> Result<&ObjectRef, CommandError> {
        self.target
            .as_ref()
            .ok_or(CommandError::MissingContext("a target object"))
    }

    pub fn buffer(&self) -> Result<&dyn BufferOps, CommandError> {
        self.buffer
            .as_deref()
            .ok_or(CommandError::MissingContext("a buffer"))
    }
}

impl fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandContext")
            .field("ui", &self.ui.is_some())
            .field("backend", &self.backend.is_some())
            .field("target", &self.target)
            .field("buffer", &self.buffer.as_ref().map(|b| b.display_name()))
            .field("size", &self.size)
            .finish()
    }
}
