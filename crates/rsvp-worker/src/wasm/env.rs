use worker::Env;

use crate::config::{normalize_env_value, EventConfig};

pub fn env_string(env: &Env, key: &str) -> Option<String> {
    env.var(key)
        .ok()
        .map(|v| normalize_env_value(&v.to_string()))
        .filter(|s| !s.is_empty())
}

/// Event settings from Worker vars, used when the database holds no settings row.
pub fn event_config_from_env(env: &Env) -> EventConfig {
    EventConfig::from_vars(|key| env_string(env, key))
}
