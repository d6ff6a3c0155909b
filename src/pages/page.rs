use std::{
    fmt,
    sync::{Arc, Weak},
};

use tracing::{debug, warn};

use super::{
    action::{Button, ButtonAction},
    graph::DialogPageGraph,
    types::SoundRef,
};
use crate::{
    definition::PageRecord,
    error::DialogError,
    scrolling::ScrollingTextPresenter,
    services::{ActiveReveal, DialogServices},
    session::{GameMode, HostRef, SessionRef},
    transport::{DialogListener, DialogResponse, DialogSnapshot, DialogWindow},
};

pub struct DialogPage {
    graph: Weak<DialogPageGraph>,
    services: Arc<DialogServices>,
    key: String,
    title: String,
    content: String,
    sound: SoundRef,
    buttons: Vec<Button>,
    close_go: Option<String>,
    scroll_speed: Option<u32>,
}

impl DialogPage {
    pub(super) fn from_record(
        graph: Weak<DialogPageGraph>,
        services: Arc<DialogServices>,
        record: PageRecord,
    ) -> Result<Self, String> {
        if record.key.trim().is_empty() {
            return Err("page key is empty".to_string());
        }
        if record.scroll_speed == Some(0) {
            return Err("scroll_speed must be at least one tick".to_string());
        }

        Ok(Self {
            graph,
            services,
            key: record.key,
            title: record.title,
            content: record.content,
            sound: record.sound.into(),
            buttons: record.buttons.into_iter().map(Button::from).collect(),
            close_go: record.close.go,
            scroll_speed: record.scroll_speed,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn sound(&self) -> &SoundRef {
        &self.sound
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    pub fn close_go(&self) -> Option<&str> {
        self.close_go.as_deref()
    }

    pub fn scroll_speed(&self) -> Option<u32> {
        self.scroll_speed
    }

    /// Shows this page to `session` on behalf of `host`.
    ///
    /// Everything delayed (mode restore, hooks, commands, scrolling) goes through the
    /// scheduler, so this returns as soon as the window is handed to the transport. A reveal
    /// still running for the same session is abandoned without its final send.
    pub fn send(self: &Arc<Self>, host: &HostRef, session: &SessionRef) {
        let services = &self.services;
        let name = session.name();

        if let Some(stale) = services.reveals.take(&name) {
            stale.timer.cancel();
            if let Some(mode) = stale.restore_mode {
                session.set_game_mode(mode);
            }
        }

        // creative clients open the editor instead of the dialog
        let previous_mode = session.game_mode();
        let restore_mode = previous_mode.dialog_fallback().map(|fallback| {
            session.set_game_mode(fallback);
            previous_mode
        });

        if self.sound.is_playable() {
            session.play_sound(&self.sound.identifier);
        }

        let window = self.render(host, session);
        debug!(
            "dialog page '{}' sent to '{name}' for '{}'",
            self.key,
            host.name()
        );
        let Some(speed) = self.scroll_speed else {
            self.before_interactive(host, session, restore_mode);
            services.transport.transmit(session, &window);
            return;
        };

        let page = self.clone();
        let finish_host = host.clone();
        let finish_session = session.clone();
        let slot = name.clone();
        let timer = ScrollingTextPresenter::new(services.clone(), session.clone(), window, speed)
            .on_finish(move || {
                page.services.reveals.release(&slot);
                page.before_interactive(&finish_host, &finish_session, restore_mode);
            })
            .start();
        services.reveals.insert(
            name,
            ActiveReveal {
                timer,
                restore_mode,
            },
        );
    }

    /// Runs the hooks and schedules the mode restore, timed from the window with buttons.
    fn before_interactive(
        &self,
        host: &HostRef,
        session: &SessionRef,
        restore_mode: Option<GameMode>,
    ) {
        let services = &self.services;
        if let Some(mode) = restore_mode {
            let session = session.clone();
            services.scheduler.schedule_once(
                services.settings.shim_delay_ticks,
                Box::new(move || session.set_game_mode(mode)),
            );
        }

        for hook in &services.hooks {
            hook.before_transmit(host, session, services);
        }
    }

    /// Renders the page for `session` with click and close handling attached.
    pub fn render(self: &Arc<Self>, host: &HostRef, session: &SessionRef) -> DialogWindow {
        let services = &self.services;
        let config = host.config();
        let snapshot = DialogSnapshot {
            title: services.variables.resolve(&**session, &self.title, config),
            body: services.variables.resolve(&**session, &self.content, config),
            buttons: self.buttons.iter().map(|button| button.text.clone()).collect(),
            skin_data: services.settings.skin_data.clone(),
        };

        let window = DialogWindow::new(host.clone(), snapshot);
        let listener = Arc::new_cyclic(|listener: &Weak<PageListener>| PageListener {
            page: self.clone(),
            host: host.clone(),
            session: session.clone(),
            window: window.clone().with_weak_listener(listener.clone()),
        });
        window.with_listener(listener)
    }

    fn sibling(&self, key: &str) -> Result<Arc<DialogPage>, DialogError> {
        let graph = self.graph.upgrade().ok_or_else(|| DialogError::GraphDropped {
            page: self.key.clone(),
        })?;
        graph.resolve(key)
    }

    /// Sends the sibling page `key`. A missing page is logged and otherwise ignored.
    fn branch(&self, key: &str, host: &HostRef, session: &SessionRef) {
        match self.sibling(key) {
            Ok(page) => page.send(host, session),
            Err(error) => warn!("dialog page '{}' can't go to '{key}': {error}", self.key),
        }
    }
}

impl fmt::Debug for DialogPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogPage")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("content", &self.content)
            .field("sound", &self.sound)
            .field("buttons", &self.buttons)
            .field("close_go", &self.close_go)
            .field("scroll_speed", &self.scroll_speed)
            .finish_non_exhaustive()
    }
}

struct PageListener {
    page: Arc<DialogPage>,
    host: HostRef,
    session: SessionRef,
    /// The same window, pointing back here without keeping this listener alive.
    window: DialogWindow,
}

impl DialogListener for PageListener {
    fn on_click(&self, clicker: &SessionRef, index: usize, _response: &DialogResponse) {
        let Some(button) = self.page.buttons.get(index) else {
            warn!("dialog page '{}' has no button {index}", self.page.key);
            return;
        };
        let services = &self.page.services;

        for action in &button.actions {
            match action {
                ButtonAction::Close => services.transport.request_close(clicker, &self.window),
                ButtonAction::Goto(target) => self.page.branch(target, &self.host, &self.session),
                ButtonAction::RunCommand(lines) => {
                    let commands = services.commands.clone();
                    let clicker = clicker.clone();
                    let host = self.host.clone();
                    let lines = lines.clone();
                    services.scheduler.schedule_once(
                        services.settings.command_delay_ticks,
                        Box::new(move || commands.run(&*clicker, host.config(), &lines)),
                    );
                }
                ButtonAction::Generic(raw) => {
                    debug!(
                        "dialog page '{}' button '{}' action '{raw}' has no handler",
                        self.page.key, button.text
                    );
                }
            }

            if button.sound.is_playable() {
                self.session.play_sound(&button.sound.identifier);
            }
        }
    }

    fn on_close(&self, _session: &SessionRef, _response: &DialogResponse) {
        if let Some(target) = &self.page.close_go {
            self.page.branch(target, &self.host, &self.session);
        }
    }
}
