//! Recording fakes for the collaborator traits.

use std::sync::{Arc, Mutex};

use crate::commands::{
    BackendOps, BufferHandle, BufferOps, BufferRequest, CommandError, NotifyLevel, ObjectRef,
    TermSize, UiOps,
};

/// List buffer with `rows` lines that records what is done to it.
#[derive(Default)]
pub struct FakeBuffer {
    name: String,
    rows: usize,
    object: Option<ObjectRef>,
    focus: Mutex<Option<usize>>,
    reloads: Mutex<usize>,
    keypresses: Mutex<Vec<String>>,
    searches: Mutex<Vec<Option<String>>>,
    backward_searches: Mutex<Vec<Option<String>>>,
    filters: Mutex<Vec<String>>,
}

impl FakeBuffer {
    pub fn with_rows(name: &str, rows: usize) -> Self {
        Self {
            name: name.to_string(),
            rows,
            focus: Mutex::new((rows > 0).then_some(0)),
            ..Default::default()
        }
    }

    pub fn with_object(name: &str, object: ObjectRef) -> Self {
        Self {
            object: Some(object),
            ..Self::with_rows(name, 1)
        }
    }

    pub fn reloads(&self) -> usize {
        *self.reloads.lock().unwrap()
    }

    pub fn keypresses(&self) -> Vec<String> {
        self.keypresses.lock().unwrap().clone()
    }

    pub fn searches(&self) -> Vec<Option<String>> {
        self.searches.lock().unwrap().clone()
    }

    pub fn backward_searches(&self) -> Vec<Option<String>> {
        self.backward_searches.lock().unwrap().clone()
    }

    pub fn filters(&self) -> Vec<String> {
        self.filters.lock().unwrap().clone()
    }
}

impl BufferOps for FakeBuffer {
    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn len(&self) -> usize {
        self.rows
    }

    fn focus(&self) -> Option<usize> {
        *self.focus.lock().unwrap()
    }

    fn set_focus(&self, index: usize) -> Result<(), CommandError> {
        if index >= self.rows {
            return Err(CommandError::notify(format!("No line {index}.")));
        }
        *self.focus.lock().unwrap() = Some(index);
        Ok(())
    }

    fn reload(&self) {
        *self.reloads.lock().unwrap() += 1;
    }

    fn keypress(&self, _size: Option<TermSize>, key: &str) -> bool {
        self.keypresses.lock().unwrap().push(key.to_string());
        let mut focus = self.focus.lock().unwrap();
        if let Some(current) = *focus {
            *focus = match key {
                "up" => Some(current.saturating_sub(1)),
                "down" => Some((current + 1).min(self.rows - 1)),
                _ => return false,
            };
        }
        true
    }

    fn find_next(&self, query: Option<&str>) -> Result<(), CommandError> {
        self.searches
            .lock()
            .unwrap()
            .push(query.map(str::to_string));
        Ok(())
    }

    fn find_previous(&self, query: Option<&str>) -> Result<(), CommandError> {
        self.backward_searches
            .lock()
            .unwrap()
            .push(query.map(str::to_string));
        Ok(())
    }

    fn filter(&self, query: &str) -> Result<(), CommandError> {
        self.filters.lock().unwrap().push(query.to_string());
        Ok(())
    }

    fn focused_object(&self) -> Option<ObjectRef> {
        self.object.clone()
    }
}

#[derive(Default)]
struct FakeUiState {
    buffers: Vec<BufferHandle>,
    current: Option<usize>,
    requests: Vec<BufferRequest>,
    displayed: Vec<String>,
    picks: Vec<isize>,
    prompts: Vec<(String, String)>,
    notifications: Vec<(String, NotifyLevel)>,
    refuse: Option<String>,
    shut_down: bool,
}

/// UI that keeps a buffer list and records every call.
#[derive(Default)]
pub struct FakeUi {
    state: Mutex<FakeUiState>,
}

impl FakeUi {
    /// Buffers named `names`, the last one displayed.
    pub fn with_buffers(names: &[&str]) -> Self {
        let ui = Self::default();
        {
            let mut state = ui.state.lock().unwrap();
            for name in names {
                state.buffers.push(Arc::new(FakeBuffer::with_rows(name, 3)));
            }
            state.current = names.len().checked_sub(1);
        }
        ui
    }

    pub fn pick_current(&self, index: usize) {
        self.state.lock().unwrap().current = Some(index);
    }

    /// Makes `build_buffer` fail with a notification.
    pub fn refuse_buffers(&self, message: &str) {
        self.state.lock().unwrap().refuse = Some(message.to_string());
    }

    pub fn buffer_names(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.buffers.iter().map(|b| b.display_name()).collect()
    }

    pub fn requests(&self) -> Vec<BufferRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn displayed(&self) -> Vec<String> {
        self.state.lock().unwrap().displayed.clone()
    }

    pub fn picks(&self) -> Vec<isize> {
        self.state.lock().unwrap().picks.clone()
    }

    pub fn prompts(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().prompts.clone()
    }

    pub fn notifications(&self) -> Vec<(String, NotifyLevel)> {
        self.state.lock().unwrap().notifications.clone()
    }

    pub fn was_shut_down(&self) -> bool {
        self.state.lock().unwrap().shut_down
    }
}

impl UiOps for FakeUi {
    fn add_and_display_buffer(&self, buffer: BufferHandle) {
        let mut state = self.state.lock().unwrap();
        state.displayed.push(buffer.display_name());
        state.buffers.push(buffer);
        state.current = Some(state.buffers.len() - 1);
    }

    fn remove_current_buffer(&self, close_if_no_buffer: bool) -> Option<usize> {
        let mut state = self.state.lock().unwrap();
        let current = state.current?;
        if state.buffers.len() == 1 && !close_if_no_buffer {
            return None;
        }
        state.buffers.remove(current);
        state.current = state.buffers.len().checked_sub(1);
        Some(state.buffers.len())
    }

    fn pick_and_display_buffer(&self, index: isize) {
        self.state.lock().unwrap().picks.push(index);
    }

    fn current_buffer_index(&self) -> Option<usize> {
        self.state.lock().unwrap().current
    }

    fn current_buffer(&self) -> Option<BufferHandle> {
        let state = self.state.lock().unwrap();
        state.current.and_then(|i| state.buffers.get(i).cloned())
    }

    fn notify_message(&self, text: &str, level: NotifyLevel) {
        self.state
            .lock()
            .unwrap()
            .notifications
            .push((text.to_string(), level));
    }

    fn shutdown_workers(&self) {
        self.state.lock().unwrap().shut_down = true;
    }

    fn build_buffer(&self, request: BufferRequest) -> Result<BufferHandle, CommandError> {
        let mut state = self.state.lock().unwrap();
        if let Some(message) = &state.refuse {
            return Err(CommandError::notify(message.clone()));
        }
        let name = match &request {
            BufferRequest::Help => "help".to_string(),
            BufferRequest::Tree => "tree".to_string(),
            BufferRequest::Logs { target, .. } => format!("logs {}", target.name),
            BufferRequest::Inspect(target) => format!("inspect {}", target.name),
            BufferRequest::Info(target) => format!("info {}", target.name),
        };
        state.requests.push(request);
        Ok(Arc::new(FakeBuffer::with_rows(&name, 1)))
    }

    fn prompt(&self, prompt_text: &str, initial: &str) {
        self.state
            .lock()
            .unwrap()
            .prompts
            .push((prompt_text.to_string(), initial.to_string()));
    }
}

/// Backend that records `"<op> <id>"` for every call.
#[derive(Default)]
pub struct FakeBackend {
    calls: Mutex<Vec<String>>,
    failure: Option<String>,
}

impl FakeBackend {
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<(), CommandError> {
        if let Some(message) = &self.failure {
            return Err(CommandError::Backend(message.clone()));
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

impl BackendOps for FakeBackend {
    fn remove(&self, target: &ObjectRef, force: bool) -> Result<(), CommandError> {
        self.record(format!("remove {} force={force}", target.id))
    }

    fn start(&self, target: &ObjectRef) -> Result<(), CommandError> {
        self.record(format!("start {}", target.id))
    }

    fn stop(&self, target: &ObjectRef) -> Result<(), CommandError> {
        self.record(format!("stop {}", target.id))
    }

    fn restart(&self, target: &ObjectRef) -> Result<(), CommandError> {
        self.record(format!("restart {}", target.id))
    }

    fn kill(&self, target: &ObjectRef) -> Result<(), CommandError> {
        self.record(format!("kill {}", target.id))
    }

    fn pause(&self, target: &ObjectRef) -> Result<(), CommandError> {
        self.record(format!("pause {}", target.id))
    }

    fn unpause(&self, target: &ObjectRef) -> Result<(), CommandError> {
        self.record(format!("unpause {}", target.id))
    }
}
