//! multi-page npc dialogs with branching buttons, delayed commands and scrolling text
//!
//! pages come from RON definitions (see `assets/dialogs/guide.dialog.ron`), get rendered
//! against the host entity's config and are pushed to a remote session through a
//! [`DialogTransport`]. everything time-based runs on a tick [`Scheduler`]; inside a bevy app
//! [`DialogPlugin`] drives one from frame time.

// Support configuring Bevy lints within code.
#![cfg_attr(bevy_lint, feature(register_tool), register_tool(bevy))]

pub mod commands;
pub mod definition;
pub mod error;
pub mod pages;
pub mod plugin;
pub mod scheduler;
pub mod scrolling;
pub mod services;
pub mod session;
pub mod settings;
pub mod transport;
pub mod variables;

#[cfg(test)]
mod testing;

pub use commands::{CommandExecutor, LoggedCommands};
pub use definition::DialogDefinition;
pub use error::DialogError;
pub use pages::{Button, ButtonAction, DialogPage, DialogPageGraph, SoundRef};
pub use plugin::{
    DialogAssetPlugin, DialogClock, DialogLibrary, DialogPlugin, DialogRuntimePlugin,
    DialogServicesRes, OpenDialog,
};
pub use scheduler::{Scheduler, TaskHandle, TickScheduler};
pub use scrolling::ScrollingTextPresenter;
pub use services::{DialogServices, NameTagRefresh, PresentationHook};
pub use session::{DialogHost, DialogSession, GameMode, HostConfig, HostRef, SessionRef};
pub use settings::DialogSettings;
pub use transport::{DialogListener, DialogResponse, DialogSnapshot, DialogTransport, DialogWindow};
pub use variables::{PlaceholderVariables, VariableSubstitution};
