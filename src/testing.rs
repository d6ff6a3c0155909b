//! recording fakes shared by the unit tests

use std::sync::{Arc, Mutex};

use crate::{
    commands::CommandExecutor,
    definition::DialogDefinition,
    pages::DialogPageGraph,
    scheduler::TickScheduler,
    services::DialogServices,
    session::{DialogHost, DialogSession, GameMode, HostConfig, SessionRef},
    settings::DialogSettings,
    transport::{DialogListener, DialogResponse, DialogTransport, DialogWindow},
};

pub(crate) struct FakeSession {
    name: String,
    mode: Mutex<GameMode>,
    mode_changes: Mutex<Vec<GameMode>>,
    sounds: Mutex<Vec<String>>,
}

impl FakeSession {
    pub(crate) fn new(name: &str) -> Arc<Self> {
        Self::with_mode(name, GameMode::Survival)
    }

    pub(crate) fn with_mode(name: &str, mode: GameMode) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            mode: Mutex::new(mode),
            mode_changes: Mutex::new(Vec::new()),
            sounds: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn current_mode(&self) -> GameMode {
        *self.mode.lock().unwrap()
    }

    pub(crate) fn mode_changes(&self) -> Vec<GameMode> {
        self.mode_changes.lock().unwrap().clone()
    }

    pub(crate) fn sounds(&self) -> Vec<String> {
        self.sounds.lock().unwrap().clone()
    }
}

impl DialogSession for FakeSession {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn game_mode(&self) -> GameMode {
        self.current_mode()
    }

    fn set_game_mode(&self, mode: GameMode) {
        *self.mode.lock().unwrap() = mode;
        self.mode_changes.lock().unwrap().push(mode);
    }

    fn play_sound(&self, identifier: &str) {
        self.sounds.lock().unwrap().push(identifier.to_string());
    }
}

pub(crate) struct FakeHost {
    name: String,
    config: HostConfig,
    tag: Mutex<String>,
    tag_history: Mutex<Vec<String>>,
}

impl FakeHost {
    pub(crate) fn new(name: &str) -> Arc<Self> {
        let mut config = HostConfig::new();
        config.insert("npc".to_string(), name.to_string());
        Arc::new(Self {
            name: name.to_string(),
            config,
            tag: Mutex::new(name.to_string()),
            tag_history: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn tag_history(&self) -> Vec<String> {
        self.tag_history.lock().unwrap().clone()
    }
}

impl DialogHost for FakeHost {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn config(&self) -> &HostConfig {
        &self.config
    }

    fn name_tag(&self) -> String {
        self.tag.lock().unwrap().clone()
    }

    fn set_name_tag(&self, tag: &str) {
        *self.tag.lock().unwrap() = tag.to_string();
        self.tag_history.lock().unwrap().push(tag.to_string());
    }
}

#[derive(Default)]
pub(crate) struct RecordingTransport {
    sent: Mutex<Vec<(String, DialogWindow)>>,
    closed: Mutex<Vec<(String, DialogWindow)>>,
}

impl RecordingTransport {
    pub(crate) fn sent(&self) -> Vec<DialogWindow> {
        let sent = self.sent.lock().unwrap();
        sent.iter().map(|(_, window)| window.clone()).collect()
    }

    pub(crate) fn last(&self) -> Option<DialogWindow> {
        self.sent().pop()
    }

    pub(crate) fn bodies(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .map(|window| window.snapshot.body.clone())
            .collect()
    }

    pub(crate) fn session_names(&self) -> Vec<String> {
        let sent = self.sent.lock().unwrap();
        sent.iter().map(|(name, _)| name.clone()).collect()
    }

    pub(crate) fn closed(&self) -> Vec<DialogWindow> {
        let closed = self.closed.lock().unwrap();
        closed.iter().map(|(_, window)| window.clone()).collect()
    }
}

impl DialogTransport for RecordingTransport {
    fn transmit(&self, session: &SessionRef, window: &DialogWindow) {
        self.sent
            .lock()
            .unwrap()
            .push((session.name(), window.clone()));
    }

    fn request_close(&self, session: &SessionRef, window: &DialogWindow) {
        self.closed
            .lock()
            .unwrap()
            .push((session.name(), window.clone()));
    }
}

#[derive(Default)]
pub(crate) struct RecordingCommands {
    runs: Mutex<Vec<(String, Vec<String>)>>,
}

impl RecordingCommands {
    pub(crate) fn runs(&self) -> Vec<(String, Vec<String>)> {
        self.runs.lock().unwrap().clone()
    }
}

impl CommandExecutor for RecordingCommands {
    fn run(&self, session: &dyn DialogSession, _config: &HostConfig, lines: &[String]) {
        self.runs
            .lock()
            .unwrap()
            .push((session.name(), lines.to_vec()));
    }
}

pub(crate) struct NoopListener;

impl DialogListener for NoopListener {
    fn on_click(&self, _session: &SessionRef, _button: usize, _response: &DialogResponse) {}
    fn on_close(&self, _session: &SessionRef, _response: &DialogResponse) {}
}

pub(crate) struct Harness {
    pub(crate) clock: Arc<TickScheduler>,
    pub(crate) transport: Arc<RecordingTransport>,
    pub(crate) commands: Arc<RecordingCommands>,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self::with_clock(Arc::new(TickScheduler::new()))
    }

    pub(crate) fn with_clock(clock: Arc<TickScheduler>) -> Self {
        Self {
            clock,
            transport: Arc::new(RecordingTransport::default()),
            commands: Arc::new(RecordingCommands::default()),
        }
    }

    pub(crate) fn settings(&self) -> DialogSettings {
        DialogSettings::default()
    }

    pub(crate) fn services(&self) -> Arc<DialogServices> {
        self.services_with(|services| services)
    }

    pub(crate) fn services_with(
        &self,
        configure: impl FnOnce(DialogServices) -> DialogServices,
    ) -> Arc<DialogServices> {
        let services = DialogServices::new(self.transport.clone(), self.clock.clone())
            .commands(self.commands.clone())
            .settings(self.settings());
        configure(services).build()
    }

    pub(crate) fn graph(&self, name: &str, source: &str) -> Arc<DialogPageGraph> {
        let definition = DialogDefinition::from_ron_str(source).unwrap();
        DialogPageGraph::load(name, definition, self.services()).unwrap()
    }
}
