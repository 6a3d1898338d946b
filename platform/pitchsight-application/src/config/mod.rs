use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub service: ServiceConfig,
    pub pitch_log: Option<PitchLogConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub retries: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct PitchLogConfig {
    pub base_url: String,
    pub timeout_ms: Option<u64>,
}

pub fn load_config(path: &Path) -> Result<Config, String> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("failed to read config {}: {}", path.display(), err))?;
    toml::from_str(&contents)
        .map_err(|err| format!("failed to parse TOML {}: {}", path.display(), err))
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn parse_minimal_config() {
        let toml_str = r#"
[service]
base_url = "http://127.0.0.1:8000"
timeout_ms = 5000
retries = 2
"#;
        let config: Config = toml::from_str(toml_str).expect("config should parse");
        assert_eq!(config.service.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.service.retries, 2);
        assert!(config.pitch_log.is_none());
    }

    #[test]
    fn parse_config_with_pitch_log() {
        let toml_str = r#"
[service]
base_url = "http://127.0.0.1:8000"
timeout_ms = 5000
retries = 0

[pitch_log]
base_url = "http://127.0.0.1:8001"
"#;
        let config: Config = toml::from_str(toml_str).expect("config should parse");
        let log = config.pitch_log.expect("pitch_log section");
        assert_eq!(log.base_url, "http://127.0.0.1:8001");
        assert!(log.timeout_ms.is_none());
    }

    #[test]
    fn parse_config_rejects_unknown_fields() {
        let toml_str = r#"
[service]
base_url = "http://127.0.0.1:8000"
timeout_ms = 5000
retries = 0
unknown_field = true
"#;
        let err = toml::from_str::<Config>(toml_str).expect_err("unknown field should fail");
        assert!(err.to_string().to_lowercase().contains("unknown field"));
    }

    #[test]
    fn parse_config_rejects_malformed_toml() {
        let err = toml::from_str::<Config>("[service\nbase_url = 1").expect_err("malformed");
        assert!(!err.to_string().is_empty());
    }
}
