//! Command system types.

/// Where a command has to run.
///
/// The framework only tags commands; the scheduler picks the thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandPriority {
    /// May block for a long time (remote calls). Never on the UI thread.
    Backend,
    /// Must run ASAP on the lane reserved for UI responsiveness.
    Frontend,
    /// Runs synchronously in the dispatching (UI) thread.
    SameThread,
}

impl CommandPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backend => "backend",
            Self::Frontend => "frontend",
            Self::SameThread => "same-thread",
        }
    }
}

/// Category for grouping commands in help display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandCategory {
    Containers,
    Inspection,
    Navigation,
    Buffers,
    Other,
}

impl CommandCategory {
    /// Display name for help screen headers.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Containers => "CONTAINERS",
            Self::Inspection => "INSPECTION",
            Self::Navigation => "NAVIGATION",
            Self::Buffers => "BUFFERS",
            Self::Other => "OTHER",
        }
    }

    /// Order for help display (lower = first).
    pub fn order(&self) -> u8 {
        match self {
            Self::Containers => 0,
            Self::Inspection => 1,
            Self::Navigation => 2,
            Self::Buffers => 3,
            Self::Other => 4,
        }
    }
}
