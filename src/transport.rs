use std::{
    fmt,
    sync::{Arc, Weak},
};

use crate::session::{HostRef, SessionRef};

/// Immutable rendered dialog box.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DialogSnapshot {
    pub title: String,
    pub body: String,
    pub buttons: Vec<String>,
    pub skin_data: String,
}

impl DialogSnapshot {
    /// Same box with a different body and no buttons, as shown mid-reveal.
    pub fn partial(&self, body: impl Into<String>) -> Self {
        Self {
            title: self.title.clone(),
            body: body.into(),
            buttons: Vec::new(),
            skin_data: self.skin_data.clone(),
        }
    }
}

/// What the client answered with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogResponse {
    pub button: Option<usize>,
}

impl DialogResponse {
    pub fn button(index: usize) -> Self {
        Self {
            button: Some(index),
        }
    }
}

pub trait DialogListener: Send + Sync {
    fn on_click(&self, session: &SessionRef, button: usize, response: &DialogResponse);
    fn on_close(&self, session: &SessionRef, response: &DialogResponse);
}

#[derive(Clone)]
enum ListenerRef {
    Owned(Arc<dyn DialogListener>),
    /// Held by the listener itself, e.g. the window it asks the transport to close.
    Borrowed(Weak<dyn DialogListener>),
}

impl ListenerRef {
    fn get(&self) -> Option<Arc<dyn DialogListener>> {
        match self {
            Self::Owned(listener) => Some(listener.clone()),
            Self::Borrowed(listener) => listener.upgrade(),
        }
    }
}

/// A snapshot bound to its host entity, plus whoever wants to hear about clicks.
#[derive(Clone)]
pub struct DialogWindow {
    pub host: HostRef,
    pub snapshot: Arc<DialogSnapshot>,
    listener: Option<ListenerRef>,
}

impl DialogWindow {
    pub fn new(host: HostRef, snapshot: DialogSnapshot) -> Self {
        Self {
            host,
            snapshot: Arc::new(snapshot),
            listener: None,
        }
    }

    pub fn with_listener(mut self, listener: Arc<dyn DialogListener>) -> Self {
        self.listener = Some(ListenerRef::Owned(listener));
        self
    }

    /// Like [`with_listener`](Self::with_listener) without keeping the listener alive. Lets a
    /// listener hold a window that reports back to it.
    pub fn with_weak_listener(mut self, listener: Weak<dyn DialogListener>) -> Self {
        self.listener = Some(ListenerRef::Borrowed(listener));
        self
    }

    /// Copy of this window showing `body` instead, without buttons or listener.
    pub fn partial(&self, body: impl Into<String>) -> Self {
        Self {
            host: self.host.clone(),
            snapshot: Arc::new(self.snapshot.partial(body)),
            listener: None,
        }
    }

    pub fn has_listener(&self) -> bool {
        self.listener().is_some()
    }

    fn listener(&self) -> Option<Arc<dyn DialogListener>> {
        self.listener.as_ref().and_then(ListenerRef::get)
    }

    /// Entry point for transports when a button was pressed. Returns `false` when the window
    /// has nobody listening or the index is out of range.
    pub fn click(&self, session: &SessionRef, button: usize, response: &DialogResponse) -> bool {
        if button >= self.snapshot.buttons.len() {
            return false;
        }
        match self.listener() {
            Some(listener) => {
                listener.on_click(session, button, response);
                true
            }
            None => false,
        }
    }

    /// Entry point for transports when the dialog was dismissed.
    pub fn close(&self, session: &SessionRef, response: &DialogResponse) {
        if let Some(listener) = self.listener() {
            listener.on_close(session, response);
        }
    }
}

impl fmt::Debug for DialogWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogWindow")
            .field("host", &self.host.name())
            .field("snapshot", &self.snapshot)
            .field("listener", &self.has_listener())
            .finish()
    }
}

pub trait DialogTransport: Send + Sync {
    fn transmit(&self, session: &SessionRef, window: &DialogWindow);
    fn request_close(&self, session: &SessionRef, window: &DialogWindow);
}
