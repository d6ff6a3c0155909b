use tracing::info;

use crate::session::{DialogSession, HostConfig};

pub trait CommandExecutor: Send + Sync {
    fn run(&self, session: &dyn DialogSession, config: &HostConfig, lines: &[String]);
}

/// Executor for hosts without a command dispatcher: substitutes `@p` and logs each line.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggedCommands;

impl CommandExecutor for LoggedCommands {
    fn run(&self, session: &dyn DialogSession, _config: &HostConfig, lines: &[String]) {
        let player = session.name();
        for line in lines {
            let line = line.replace("@p", &player);
            info!("dialog command for '{player}': {line}");
        }
    }
}
