//! Command descriptors and the per-invocation command instance.

use std::fmt;

use tracing::{debug, info};

use super::args::{ArgumentDef, ArgumentProcessor, OptionDef};
use super::arguments::CommandArguments;
use super::context::CommandContext;
use super::error::CommandError;
use super::types::{CommandCategory, CommandPriority};

/// Function that performs a command's effect.
pub type CommandHandler = fn(&Command) -> Result<CommandOutcome, CommandError>;

/// What the scheduler should do once a command has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Done,
    /// Resolve and dispatch this command line next.
    FollowUp(String),
    /// Leave the main loop.
    Exit,
}

/// A registered command. Lives for the whole process.
pub struct CommandDef {
    /// Unique identifier, also what the prompt accepts.
    pub name: &'static str,
    /// Used in help.
    pub description: &'static str,
    /// Shown before running.
    pub pre_info_message: &'static str,
    /// Shown after a successful run.
    pub post_info_message: &'static str,
    pub priority: CommandPriority,
    pub category: CommandCategory,
    pub arguments: &'static [ArgumentDef],
    pub options: &'static [OptionDef],
    pub handler: CommandHandler,
}

impl fmt::Debug for CommandDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDef")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// One invocation of a command, bound to its context and arguments.
///
/// Built fresh by the [`Commander`](super::Commander) for every invocation
/// and dropped once it has run.
pub struct Command {
    def: &'static CommandDef,
    ctx: CommandContext,
    processor: ArgumentProcessor<'static>,
    arguments: CommandArguments,
}

impl Command {
    pub fn new(def: &'static CommandDef, ctx: CommandContext) -> Self {
        debug!(command = def.name, ?ctx, "command initialized");
        let processor = ArgumentProcessor::new(def.arguments, def.options);
        let arguments = CommandArguments::new(processor.defaults());
        Self {
            def,
            ctx,
            processor,
            arguments,
        }
    }

    pub fn name(&self) -> &'static str {
        self.def.name
    }

    pub fn priority(&self) -> CommandPriority {
        self.def.priority
    }

    pub fn def(&self) -> &'static CommandDef {
        self.def
    }

    pub fn context(&self) -> &CommandContext {
        &self.ctx
    }

    /// Resolved arguments; the declared defaults until `process_args` runs.
    pub fn arguments(&self) -> &CommandArguments {
        &self.arguments
    }

    pub fn arguments_mut(&mut self) -> &mut CommandArguments {
        &mut self.arguments
    }

    /// Parses `tokens` and replaces the resolved arguments.
    pub fn process_args<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<(), CommandError> {
        let resolved = self.processor.process(tokens)?;
        info!(command = self.def.name, ?resolved, "arguments processed");
        self.arguments = CommandArguments::new(resolved);
        Ok(())
    }

    /// Message to show before running, `{}` replaced by the target.
    pub fn pre_info(&self) -> Option<String> {
        self.info_message(self.def.pre_info_message)
    }

    /// Message to show after a successful run, `{}` replaced by the target.
    pub fn post_info(&self) -> Option<String> {
        self.info_message(self.def.post_info_message)
    }

    fn info_message(&self, template: &str) -> Option<String> {
        if template.is_empty() {
            return None;
        }
        let subject = match &self.ctx.target {
            Some(target) => target.name.clone(),
            None => self.def.name.to_string(),
        };
        Some(template.replace("{}", &subject))
    }

    /// Performs the command's effect.
    ///
    /// [`CommandError::Notify`] is a message for the user, not a failure of
    /// the program.
    pub fn run(&self) -> Result<CommandOutcome, CommandError> {
        debug!(command = self.def.name, priority = self.def.priority.as_str(), "running command");
        (self.def.handler)(self)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.def.name)
            .field("priority", &self.def.priority)
            .field("ctx", &self.ctx)
            .field("arguments", &self.arguments)
            .finish()
    }
}
