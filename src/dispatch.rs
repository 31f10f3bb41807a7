//! Runs commands in the execution context their priority asks for.
//!
//! - `SameThread`: inline, before the next input is read
//! - `Frontend`: on the single-worker frontend runtime
//! - `Backend`: on the backend runtime's blocking pool
//!
//! Scheduled commands report back through a channel the input loop drains.

use std::io;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::commands::{Command, CommandError, CommandOutcome, CommandPriority};

/// Result of one command run.
#[derive(Debug)]
pub struct Completion {
    pub command: &'static str,
    pub result: Result<CommandOutcome, CommandError>,
    /// Post-run message, only set when the run succeeded.
    pub post_info: Option<String>,
}

#[derive(Debug)]
pub enum Dispatched {
    /// Ran inline.
    Finished(Completion),
    /// Handed to a runtime; the completion arrives later.
    Scheduled,
}

/// The two runtimes behind the frontend and backend lanes.
pub struct Runtimes {
    frontend: Runtime,
    backend: Runtime,
}

impl Runtimes {
    pub fn new() -> io::Result<Self> {
        let frontend = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("berth-frontend")
            .enable_all()
            .build()?;
        let backend = Builder::new_multi_thread()
            .thread_name("berth-backend")
            .enable_all()
            .build()?;
        Ok(Self { frontend, backend })
    }

    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(self.frontend.handle().clone(), self.backend.handle().clone())
    }
}

pub struct Dispatcher {
    frontend: Handle,
    backend: Handle,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
}

impl Dispatcher {
    pub fn new(frontend: Handle, backend: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            frontend,
            backend,
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn dispatch(&mut self, command: Command) -> Dispatched {
        let priority = command.priority();
        debug!(command = command.name(), priority = priority.as_str(), "dispatching");

        match priority {
            CommandPriority::SameThread => return Dispatched::Finished(complete(command)),
            CommandPriority::Frontend => {
                let tx = self.tx.clone();
                self.frontend.spawn(async move {
                    report(&tx, complete(command));
                });
            }
            CommandPriority::Backend => {
                let tx = self.tx.clone();
                self.backend.spawn_blocking(move || {
                    report(&tx, complete(command));
                });
            }
        }
        self.in_flight += 1;
        Dispatched::Scheduled
    }

    /// Commands scheduled but not yet collected.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Completions that have already arrived, without waiting.
    pub fn try_completed(&mut self) -> Vec<Completion> {
        let mut done = Vec::new();
        while let Ok(completion) = self.rx.try_recv() {
            done.push(completion);
        }
        self.in_flight = self.in_flight.saturating_sub(done.len());
        done
    }

    /// Waits for the next completion. `None` when nothing is in flight.
    pub async fn next_completed(&mut self) -> Option<Completion> {
        if self.in_flight == 0 {
            return None;
        }
        let completion = self.rx.recv().await;
        if completion.is_some() {
            self.in_flight -= 1;
        }
        completion
    }

    /// Blocking `next_completed`, for callers outside any runtime.
    pub fn wait_completed(&mut self) -> Option<Completion> {
        if self.in_flight == 0 {
            return None;
        }
        let completion = self.rx.blocking_recv();
        if completion.is_some() {
            self.in_flight -= 1;
        }
        completion
    }
}

fn complete(command: Command) -> Completion {
    let result = command.run();
    let post_info = match &result {
        Ok(_) => command.post_info(),
        Err(_) => None,
    };
    Completion {
        command: command.name(),
        result,
        post_info,
    }
}

fn report(tx: &mpsc::UnboundedSender<Completion>, completion: Completion) {
    if let Err(e) = tx.send(completion) {
        warn!(command = e.0.command, "completion dropped, dispatcher is gone");
    }
}
