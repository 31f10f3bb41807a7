//! Input loop state: resolves lines and keys, dispatches the commands and
//! reports their results through the UI.

use crossterm::event::KeyEvent;
use tracing::{error, info};

use crate::commands::{
    BufferHandle, CommandError, CommandOutcome, Commander, NotifyLevel, ObjectRef, TermSize,
    UiHandle, key_name,
};
use crate::dispatch::{Completion, Dispatched, Dispatcher};

pub struct App {
    commander: Commander,
    dispatcher: Dispatcher,
    ui: UiHandle,
    size: Option<TermSize>,
    running: bool,
}

impl App {
    pub fn new(commander: Commander, dispatcher: Dispatcher, ui: UiHandle) -> Self {
        Self {
            commander,
            dispatcher,
            ui,
            size: None,
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_size(&mut self, size: TermSize) {
        self.size = Some(size);
    }

    pub fn commander(&self) -> &Commander {
        &self.commander
    }

    /// Runs a typed command line.
    pub fn execute_line(&mut self, line: &str) {
        self.commander.reset_keys();
        self.run_line(line.trim().to_string());
    }

    /// Feeds a key event through the sequence resolver.
    pub fn handle_key(&mut self, event: &KeyEvent) {
        let Some(key) = key_name(event) else {
            return;
        };
        match self.commander.resolve_key(&key) {
            Ok(Some(line)) => self.run_line(line),
            Ok(None) => {}
            Err(e) => self.report(&e),
        }
    }

    /// Handles completions of scheduled commands that have arrived.
    pub fn poll(&mut self) {
        for completion in self.dispatcher.try_completed() {
            self.settle(completion);
        }
    }

    /// Blocks until every scheduled command has reported back.
    pub fn wait_idle(&mut self) {
        while let Some(completion) = self.dispatcher.wait_completed() {
            self.settle(completion);
        }
    }

    fn selection(&self) -> (Option<ObjectRef>, Option<BufferHandle>) {
        let buffer = self.ui.current_buffer();
        let target = buffer.as_ref().and_then(|b| b.focused_object());
        (target, buffer)
    }

    fn run_line(&mut self, line: String) {
        let mut next = Some(line);
        while let Some(line) = next.take() {
            if !self.running {
                return;
            }
            let (target, buffer) = self.selection();
            let command = match self.commander.get_command(&line, target, buffer, self.size) {
                Ok(Some(command)) => command,
                Ok(None) => return,
                Err(e) => return self.report(&e),
            };
            if let Some(message) = command.pre_info() {
                self.ui.notify_message(&message, NotifyLevel::Info);
            }
            next = match self.dispatcher.dispatch(command) {
                Dispatched::Finished(completion) => self.finish(completion),
                Dispatched::Scheduled => None,
            };
        }
    }

    /// `finish`, then any follow-up it asked for.
    fn settle(&mut self, completion: Completion) {
        if let Some(line) = self.finish(completion) {
            self.run_line(line);
        }
    }

    /// Reports a completion; returns the follow-up command line, if any.
    fn finish(&mut self, completion: Completion) -> Option<String> {
        match completion.result {
            Ok(outcome) => {
                if let Some(message) = completion.post_info {
                    self.ui.notify_message(&message, NotifyLevel::Info);
                }
                match outcome {
                    CommandOutcome::Done => None,
                    CommandOutcome::FollowUp(line) => {
                        info!(command = completion.command, follow_up = %line, "follow-up requested");
                        Some(line)
                    }
                    CommandOutcome::Exit => {
                        self.running = false;
                        None
                    }
                }
            }
            Err(e) => {
                self.report(&e);
                None
            }
        }
    }

    fn report(&self, err: &CommandError) {
        if err.is_user_facing() {
            info!(error = %err, "command refused");
        } else {
            error!(error = %err, "command failed");
        }
        self.ui.notify_message(&err.to_string(), NotifyLevel::Error);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::{KeyCode, KeyModifiers};
    use tokio::runtime::Handle;

    use super::*;
    use crate::commands::{BackendHandle, CommandRegistry, Keybindings, UiOps};
    use crate::test_helpers::{FakeBackend, FakeBuffer, FakeUi};

    fn app(ui: &Arc<FakeUi>, backend: &Arc<FakeBackend>) -> App {
        let ui_handle: UiHandle = ui.clone();
        let backend_handle: BackendHandle = backend.clone();
        let commander = Commander::new(
            Some(ui_handle.clone()),
            Some(backend_handle),
            Arc::new(CommandRegistry::builtin()),
            Arc::new(Keybindings::default()),
        );
        App::new(
            commander,
            Dispatcher::new(Handle::current(), Handle::current()),
            ui_handle,
        )
    }

    fn ui_with_selection() -> Arc<FakeUi> {
        let ui = Arc::new(FakeUi::default());
        ui.add_and_display_buffer(Arc::new(FakeBuffer::with_object(
            "containers",
            ObjectRef::container("abc", "web"),
        )));
        ui
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn errors(ui: &FakeUi) -> Vec<String> {
        ui.notifications()
            .into_iter()
            .filter(|(_, level)| *level == NotifyLevel::Error)
            .map(|(text, _)| text)
            .collect()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn quit_stops_the_loop() {
        let ui = Arc::new(FakeUi::default());
        let mut app = app(&ui, &Arc::new(FakeBackend::default()));
        app.execute_line("quit");
        assert!(!app.is_running());
        assert!(ui.was_shut_down());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn kill_buffer_on_the_last_buffer_quits() {
        let ui = Arc::new(FakeUi::with_buffers(&["main"]));
        let mut app = app(&ui, &Arc::new(FakeBackend::default()));
        app.execute_line("kill-buffer");
        assert!(!app.is_running());
        assert!(ui.was_shut_down());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn errors_are_shown_to_the_user() {
        let ui = Arc::new(FakeUi::with_buffers(&["main"]));
        let mut app = app(&ui, &Arc::new(FakeBackend::default()));
        app.execute_line("frobnicate");
        app.execute_line("remove-buffer");
        app.execute_line("");
        assert_eq!(
            errors(&ui),
            vec![
                "There is no such command: frobnicate",
                "Last buffer will not be removed.",
            ]
        );
        assert!(app.is_running());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn backend_commands_target_the_focused_object() {
        let ui = ui_with_selection();
        let backend = Arc::new(FakeBackend::default());
        let mut app = app(&ui, &backend);

        app.execute_line("rm force=true");
        while app.dispatcher.in_flight() > 0 {
            let completion = app.dispatcher.next_completed().await.unwrap();
            app.settle(completion);
        }

        assert_eq!(backend.calls(), vec!["remove abc force=true"]);
        let infos: Vec<String> = ui
            .notifications()
            .into_iter()
            .filter(|(_, level)| *level == NotifyLevel::Info)
            .map(|(text, _)| text)
            .collect();
        assert_eq!(infos, vec!["Removing web...", "web removed."]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn keys_run_bound_commands() {
        let ui = ui_with_selection();
        let mut app = app(&ui, &Arc::new(FakeBackend::default()));

        app.handle_key(&key('h'));
        assert_eq!(ui.displayed(), vec!["containers", "help"]);

        app.handle_key(&key('g'));
        app.handle_key(&key('z'));
        assert_eq!(errors(&ui), vec!["No such keybind: \"gz\"."]);
        assert!(app.commander().is_idle());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn typed_lines_drop_a_pending_prefix() {
        let ui = Arc::new(FakeUi::default());
        let mut app = app(&ui, &Arc::new(FakeBackend::default()));
        app.handle_key(&key('g'));
        assert!(!app.commander().is_idle());
        app.execute_line("help");
        assert!(app.commander().is_idle());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn missing_selection_is_reported() {
        let ui = Arc::new(FakeUi::default());
        let backend = Arc::new(FakeBackend::default());
        let mut app = app(&ui, &backend);
        app.execute_line("stop");
        while app.dispatcher.in_flight() > 0 {
            let completion = app.dispatcher.next_completed().await.unwrap();
            app.settle(completion);
        }
        assert_eq!(errors(&ui), vec!["No container or image is selected."]);
        assert!(backend.calls().is_empty());
    }
}
