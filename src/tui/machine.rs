//! Interaction state machine.
//!
//! Owns the UI state, the task tabs, the stopwatch, and the confirmation
//! gate, and is the only thing that talks to the task store. Each call to
//! [`Machine::update`] handles one event to completion and returns the
//! commands the event loop should carry out; the loop never mutates any of
//! this state itself.
//!
//! | State      | Keys that apply                                  |
//! |------------|--------------------------------------------------|
//! | NotRunning | left/right, exit, start/stop, create, delete     |
//! | Running    | exit (blocked), start/stop, reset                |
//! | Typing     | enter, esc, text editing                         |
//! | Confirming | exit, no, yes                                    |
//!
//! Keys outside a state's row are ignored; they never fall through to
//! another state's bindings.

use std::time::Duration;

use chrono::Utc;

use crate::Result;
use crate::models::{DEFAULT_DAILY_TARGET_MINUTES, DEFAULT_TASK_COLOR, Session};
use crate::stopwatch::{IdAllocator, Stopwatch, format_elapsed};
use crate::storage::TaskStore;

use super::confirm::{Answer, ConfirmationGate, PendingAction, Resolution};
use super::event::{Command, Event};
use super::input::TextInput;
use super::keymap::{KeyPress, Keymap};
use super::notifications::StatusMessage;
use super::tabs::{Selection, Tabs};

/// Top-level UI state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    NotRunning,
    Running,
    Typing,
    Confirming,
}

impl InteractionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionState::NotRunning => "idle",
            InteractionState::Running => "running",
            InteractionState::Typing => "new task",
            InteractionState::Confirming => "confirm",
        }
    }
}

/// One task tab as the renderer sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabLabel {
    pub name: String,
    pub color: String,
    pub active: bool,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub state: InteractionState,
    pub tabs: Vec<TabLabel>,
    pub timer_label: String,
    pub elapsed: Duration,
    pub running: bool,
    pub status: Option<StatusMessage>,
    pub help: String,
    /// In-progress task name, only while Typing
    pub input: Option<String>,
    /// Question being asked, only while Confirming
    pub prompt: Option<&'static str>,
}

impl Snapshot {
    pub fn elapsed_display(&self) -> String {
        format_elapsed(self.elapsed)
    }
}

pub struct Machine<S: TaskStore> {
    store: S,
    keymap: Keymap,
    ids: IdAllocator,
    state: InteractionState,
    gate: ConfirmationGate,
    tabs: Tabs,
    selected_task: Option<i64>,
    stopwatch: Stopwatch,
    session: Option<Session>,
    input: TextInput,
    status: Option<StatusMessage>,
}

impl<S: TaskStore> Machine<S> {
    /// Seed the tabs from the store. Fails only if the store cannot list tasks.
    pub fn new(store: S, keymap: Keymap, ids: IdAllocator) -> Result<Self> {
        let tabs = Tabs::new(store.get_tasks()?);
        let selected_task = tabs.active_task().map(|t| t.id);
        let label = tabs
            .active_task()
            .map(|t| t.name.clone())
            .unwrap_or_default();
        let stopwatch = Stopwatch::new(label, &ids);

        Ok(Self {
            store,
            keymap,
            ids,
            state: InteractionState::NotRunning,
            gate: ConfirmationGate::new(),
            tabs,
            selected_task,
            stopwatch,
            session: None,
            input: TextInput::new(),
            status: None,
        })
    }

    /// Start with a message on the status line.
    pub fn with_status(mut self, status: StatusMessage) -> Self {
        self.status = Some(status);
        self
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn pending(&self) -> Option<PendingAction> {
        self.gate.pending()
    }

    pub fn tabs(&self) -> &Tabs {
        &self.tabs
    }

    pub fn selected_task(&self) -> Option<i64> {
        self.selected_task
    }

    pub fn stopwatch(&self) -> &Stopwatch {
        &self.stopwatch
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handle one event.
    pub fn update(&mut self, event: Event) -> Vec<Command> {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Stopwatch(msg) => self
                .stopwatch
                .update(msg)
                .map(Command::from)
                .into_iter()
                .collect(),
            Event::TaskSelected(task_id) => {
                self.select_task(task_id);
                Vec::new()
            }
        }
    }

    fn handle_key(&mut self, key: KeyPress) -> Vec<Command> {
        match self.state {
            InteractionState::NotRunning => self.handle_not_running(&key),
            InteractionState::Running => self.handle_running(&key),
            InteractionState::Typing => self.handle_typing(&key),
            InteractionState::Confirming => self.handle_confirming(&key),
        }
    }

    fn handle_not_running(&mut self, key: &KeyPress) -> Vec<Command> {
        if self.keymap.go_left.matches(key) {
            return selection_event(self.tabs.switch_left());
        }
        if self.keymap.go_right.matches(key) {
            return selection_event(self.tabs.switch_right());
        }
        if self.keymap.exit.matches(key) {
            return vec![Command::Quit];
        }
        if self.keymap.start_stop.matches(key) {
            return self.start_session();
        }
        if self.keymap.create_task.matches(key) {
            self.input.reset();
            self.input.focus();
            self.transition(InteractionState::Typing);
            return Vec::new();
        }
        if self.keymap.delete_task.matches(key) {
            match self.selected_task_name() {
                Some(name) => {
                    self.arm(PendingAction::DeleteTask);
                    self.status = Some(StatusMessage::warning(format!("Delete \"{}\"?", name)));
                }
                None => self.status = Some(StatusMessage::info("No task selected")),
            }
        }
        Vec::new()
    }

    fn handle_running(&mut self, key: &KeyPress) -> Vec<Command> {
        if self.keymap.exit.matches(key) {
            self.status = Some(StatusMessage::warning(
                "Timer is running; stop it before quitting",
            ));
            return Vec::new();
        }
        if self.keymap.start_stop.matches(key) {
            return self.stop_session();
        }
        if self.keymap.reset_timer.matches(key) {
            self.arm(PendingAction::ResetTimer);
            self.status = Some(StatusMessage::warning(PendingAction::ResetTimer.prompt()));
        }
        Vec::new()
    }

    fn handle_typing(&mut self, key: &KeyPress) -> Vec<Command> {
        match key.name().as_str() {
            "enter" => self.create_task(),
            "esc" => {
                self.input.reset();
                self.input.blur();
                self.transition(InteractionState::NotRunning);
                Vec::new()
            }
            _ => {
                self.input.handle_key(key);
                Vec::new()
            }
        }
    }

    fn handle_confirming(&mut self, key: &KeyPress) -> Vec<Command> {
        if self.keymap.exit.matches(key) {
            self.gate.disarm();
            return vec![Command::Quit];
        }
        if self.keymap.no.matches(key) {
            return self.resolve(Answer::No);
        }
        if self.keymap.yes.matches(key) {
            return self.resolve(Answer::Yes);
        }
        Vec::new()
    }

    fn transition(&mut self, next: InteractionState) {
        if self.state != next {
            tracing::info!(from = self.state.as_str(), to = next.as_str(), "state transition");
        }
        self.state = next;
    }

    fn arm(&mut self, action: PendingAction) {
        self.gate.arm(action);
        self.transition(InteractionState::Confirming);
    }

    fn select_task(&mut self, task_id: Option<i64>) {
        self.selected_task = task_id;
        if !self.stopwatch.is_running() {
            let label = self.selected_task_name().unwrap_or_default();
            self.stopwatch.set_label(label);
        }
    }

    fn selected_task_name(&self) -> Option<String> {
        let id = self.selected_task?;
        self.tabs
            .tasks()
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.name.clone())
    }

    fn start_session(&mut self) -> Vec<Command> {
        let (Some(task_id), Some(name)) = (self.selected_task, self.selected_task_name()) else {
            self.status = Some(StatusMessage::info(
                "No task selected; press the new-task key to create one",
            ));
            return Vec::new();
        };

        match self.store.start_session(task_id, Utc::now()) {
            Ok(session) => {
                self.session = Some(session);
                self.stopwatch = Stopwatch::new_running(name.clone(), &self.ids);
                self.transition(InteractionState::Running);
                self.status = Some(StatusMessage::success(format!("Started {}", name)));
                self.stopwatch.init().map(Command::from).into_iter().collect()
            }
            Err(e) => {
                tracing::warn!(task_id, "failed to start session: {}", e);
                self.status = Some(StatusMessage::error(format!("Could not start session: {}", e)));
                Vec::new()
            }
        }
    }

    fn stop_session(&mut self) -> Vec<Command> {
        let Some(task_id) = self.session.as_ref().map(|s| s.task_id) else {
            self.transition(InteractionState::NotRunning);
            return vec![Command::Emit(Event::Stopwatch(self.stopwatch.stop()))];
        };

        match self.store.end_session(task_id, Utc::now()) {
            Ok(()) => {
                self.session = None;
                self.transition(InteractionState::NotRunning);
                self.status = Some(StatusMessage::success(format!(
                    "Stopped {} at {}",
                    self.stopwatch.label(),
                    format_elapsed(self.stopwatch.elapsed())
                )));
                vec![Command::Emit(Event::Stopwatch(self.stopwatch.stop()))]
            }
            Err(e) => {
                tracing::warn!(task_id, "failed to stop session: {}", e);
                self.status = Some(StatusMessage::error(format!("Could not stop session: {}", e)));
                Vec::new()
            }
        }
    }

    fn create_task(&mut self) -> Vec<Command> {
        let name = self.input.value();
        match self.store.create_task(
            name.trim(),
            DEFAULT_TASK_COLOR,
            DEFAULT_DAILY_TARGET_MINUTES,
        ) {
            Ok(task) => {
                self.status = Some(StatusMessage::success(format!("Created {}", task.name)));
                let selection = self.tabs.append(task);
                self.input.reset();
                self.input.blur();
                self.transition(InteractionState::NotRunning);
                selection_event(Some(selection))
            }
            Err(e) => {
                tracing::warn!("failed to create task: {}", e);
                self.status = Some(StatusMessage::error(format!("Could not create task: {}", e)));
                self.input.focus();
                Vec::new()
            }
        }
    }

    fn resolve(&mut self, answer: Answer) -> Vec<Command> {
        let Some(resolution) = self.gate.resolve(answer) else {
            tracing::error!("confirmation resolved without a pending action");
            self.transition(InteractionState::NotRunning);
            return Vec::new();
        };

        match resolution {
            Resolution::Declined(PendingAction::DeleteTask) => {
                self.status = Some(StatusMessage::info("Delete cancelled"));
                self.transition(InteractionState::NotRunning);
                Vec::new()
            }
            Resolution::Declined(PendingAction::ResetTimer) => {
                // Declining keeps the time, so the session closes normally.
                let commands = self.stop_session();
                if self.state == InteractionState::NotRunning {
                    return commands;
                }
                // The close failed and the error is on the status line. The
                // store still holds the session open; the UI lets it go.
                self.session = None;
                self.transition(InteractionState::NotRunning);
                vec![Command::Emit(Event::Stopwatch(self.stopwatch.stop()))]
            }
            Resolution::Confirmed(PendingAction::DeleteTask) => self.delete_selected_task(),
            Resolution::Confirmed(PendingAction::ResetTimer) => self.discard_session(),
        }
    }

    fn delete_selected_task(&mut self) -> Vec<Command> {
        let origin = PendingAction::DeleteTask.origin();
        let Some(task_id) = self.selected_task else {
            self.transition(origin);
            return Vec::new();
        };

        match self.store.delete_task(task_id) {
            Ok(()) => {
                self.transition(InteractionState::NotRunning);
                match self.tabs.remove_active() {
                    Some((task, selection)) => {
                        self.status = Some(StatusMessage::success(format!("Deleted {}", task.name)));
                        selection_event(Some(selection))
                    }
                    None => Vec::new(),
                }
            }
            Err(e) => {
                tracing::warn!(task_id, "failed to delete task: {}", e);
                self.status = Some(StatusMessage::error(format!("Could not delete task: {}", e)));
                self.transition(origin);
                Vec::new()
            }
        }
    }

    fn discard_session(&mut self) -> Vec<Command> {
        let origin = PendingAction::ResetTimer.origin();
        let Some(task_id) = self.session.as_ref().map(|s| s.task_id) else {
            self.transition(InteractionState::NotRunning);
            return vec![Command::Emit(Event::Stopwatch(self.stopwatch.reset()))];
        };

        match self.store.end_session_as_entropy(task_id, Utc::now()) {
            Ok(()) => {
                self.session = None;
                self.transition(InteractionState::NotRunning);
                self.status = Some(StatusMessage::info("Session discarded as entropy"));
                vec![Command::Emit(Event::Stopwatch(self.stopwatch.reset()))]
            }
            Err(e) => {
                tracing::warn!(task_id, "failed to discard session: {}", e);
                self.status = Some(StatusMessage::error(format!("Could not reset timer: {}", e)));
                self.transition(origin);
                Vec::new()
            }
        }
    }

    fn help(&self) -> String {
        let k = &self.keymap;
        let entries = match self.state {
            InteractionState::NotRunning => vec![
                k.start_stop.help(),
                k.go_left.help(),
                k.go_right.help(),
                k.create_task.help(),
                k.delete_task.help(),
                k.exit.help(),
            ],
            InteractionState::Running => vec![k.start_stop.help(), k.reset_timer.help()],
            InteractionState::Typing => vec!["enter create".to_string(), "esc cancel".to_string()],
            InteractionState::Confirming => vec![k.yes.help(), k.no.help(), k.exit.help()],
        };
        entries.join(" • ")
    }

    /// Pure view of the current state for the renderer.
    pub fn snapshot(&self) -> Snapshot {
        let active = self.tabs.active_index();
        Snapshot {
            state: self.state,
            tabs: self
                .tabs
                .tasks()
                .iter()
                .enumerate()
                .map(|(i, t)| TabLabel {
                    name: t.name.clone(),
                    color: t.color.clone(),
                    active: Some(i) == active,
                })
                .collect(),
            timer_label: self.stopwatch.label().to_string(),
            elapsed: self.stopwatch.elapsed(),
            running: self.stopwatch.is_running(),
            status: self.status.clone(),
            help: self.help(),
            input: (self.state == InteractionState::Typing).then(|| self.input.value()),
            prompt: match self.state {
                InteractionState::Confirming => self.gate.pending().map(PendingAction::prompt),
                _ => None,
            },
        }
    }
}

fn selection_event(selection: Option<Selection>) -> Vec<Command> {
    selection
        .map(|s| Command::Emit(Event::TaskSelected(s.task_id)))
        .into_iter()
        .collect()
}
