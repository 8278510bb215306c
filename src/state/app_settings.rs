use log::{LevelFilter, warn};
use padel_api::ApiConfig;

const ENV_LOG_LEVEL: &str = "PADELTUI_LOG";

#[derive(Debug, Default, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub api: ApiConfig,
}

impl AppSettings {
    pub fn load() -> Self {
        Self {
            full_screen: false,
            log_level: std::env::var(ENV_LOG_LEVEL).ok().and_then(|raw| parse_level(&raw)),
            api: ApiConfig::from_env(),
        }
    }
}

fn parse_level(raw: &str) -> Option<LevelFilter> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<LevelFilter>()
        .inspect_err(|_| warn!("ignoring {ENV_LOG_LEVEL}={raw:?}"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_parses_case_insensitively() {
        assert_eq!(parse_level("debug"), Some(LevelFilter::Debug));
        assert_eq!(parse_level(" WARN "), Some(LevelFilter::Warn));
        assert_eq!(parse_level(""), None);
        assert_eq!(parse_level("loud"), None);
    }
}
