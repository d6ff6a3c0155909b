use crate::session::{DialogSession, HostConfig};

pub trait VariableSubstitution: Send + Sync {
    fn resolve(&self, session: &dyn DialogSession, template: &str, config: &HostConfig) -> String;
}

/// Replaces `{player}` / `@p` with the session name and `{key}` with the matching host
/// config value. Unknown placeholders are left as written.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderVariables;

impl VariableSubstitution for PlaceholderVariables {
    fn resolve(&self, session: &dyn DialogSession, template: &str, config: &HostConfig) -> String {
        if !template.contains('{') && !template.contains('@') {
            return template.to_string();
        }

        let player = session.name();
        let mut text = template.replace("{player}", &player).replace("@p", &player);
        for (key, value) in config {
            let placeholder = format!("{{{key}}}");
            if text.contains(&placeholder) {
                text = text.replace(&placeholder, value);
            }
        }
        text
    }
}
