use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{
    commands::{CommandExecutor, LoggedCommands},
    scheduler::{Scheduler, TaskHandle},
    session::{GameMode, HostRef, SessionRef},
    settings::DialogSettings,
    transport::DialogTransport,
    variables::{PlaceholderVariables, VariableSubstitution},
};

/// Runs right before a page is transmitted. Used for client-specific presentation fixes.
pub trait PresentationHook: Send + Sync {
    fn before_transmit(&self, host: &HostRef, session: &SessionRef, services: &DialogServices);
}

/// Re-applies the host's name tag after the shim delay.
///
/// Some client versions stop rendering an entity's name once it has opened a dialog.
/// Setting a different tag and then the original one forces a resend.
#[derive(Debug, Default, Clone, Copy)]
pub struct NameTagRefresh;

impl PresentationHook for NameTagRefresh {
    fn before_transmit(&self, host: &HostRef, _session: &SessionRef, services: &DialogServices) {
        let host = host.clone();
        services.scheduler.schedule_once(
            services.settings.shim_delay_ticks,
            Box::new(move || {
                let tag = host.name_tag();
                host.set_name_tag(&format!("re{tag}"));
                host.set_name_tag(&tag);
            }),
        );
    }
}

/// A scrolling page still revealing itself to a session.
pub(crate) struct ActiveReveal {
    pub(crate) timer: TaskHandle,
    /// Mode the session had before the creative shim, restored if the reveal is abandoned.
    pub(crate) restore_mode: Option<GameMode>,
}

/// At most one running reveal per session name.
#[derive(Default)]
pub(crate) struct RevealSlots {
    active: Mutex<HashMap<String, ActiveReveal>>,
}

impl RevealSlots {
    pub(crate) fn insert(&self, session: String, reveal: ActiveReveal) {
        self.lock().insert(session, reveal);
    }

    pub(crate) fn take(&self, session: &str) -> Option<ActiveReveal> {
        self.lock().remove(session)
    }

    /// Forgets the reveal for `session` once its timer has been cancelled.
    pub(crate) fn release(&self, session: &str) {
        let mut active = self.lock();
        if active
            .get(session)
            .is_some_and(|reveal| reveal.timer.is_cancelled())
        {
            active.remove(session);
        }
    }

    fn contains(&self, session: &str) -> bool {
        self.lock().contains_key(session)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, ActiveReveal>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Everything a dialog graph needs from the outside world.
pub struct DialogServices {
    pub transport: Arc<dyn DialogTransport>,
    pub scheduler: Arc<dyn Scheduler>,
    pub variables: Arc<dyn VariableSubstitution>,
    pub commands: Arc<dyn CommandExecutor>,
    pub hooks: Vec<Arc<dyn PresentationHook>>,
    pub settings: DialogSettings,
    pub(crate) reveals: RevealSlots,
}

impl DialogServices {
    pub fn new(transport: Arc<dyn DialogTransport>, scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            transport,
            scheduler,
            variables: Arc::new(PlaceholderVariables),
            commands: Arc::new(LoggedCommands),
            hooks: Vec::new(),
            settings: DialogSettings::default(),
            reveals: RevealSlots::default(),
        }
    }

    /// Whether a scrolling page is still being revealed to the session called `session`.
    pub fn is_revealing(&self, session: &str) -> bool {
        self.reveals.contains(session)
    }

    pub fn variables(mut self, variables: Arc<dyn VariableSubstitution>) -> Self {
        self.variables = variables;
        self
    }

    pub fn commands(mut self, commands: Arc<dyn CommandExecutor>) -> Self {
        self.commands = commands;
        self
    }

    pub fn hook(mut self, hook: Arc<dyn PresentationHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn settings(mut self, settings: DialogSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(self) -> Arc<Self> {
        Arc::new(self)
    }
}
