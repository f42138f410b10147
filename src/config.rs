use std::path::PathBuf;

use serde::Deserialize;

/// Server settings, layered as: built-in defaults, then an optional TOML
/// file, then `DOCFLOW_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Overrides the Leptos `site-addr` when set.
    pub listen_addr: Option<String>,
    /// Root for uploaded attachments.
    pub data_dir: PathBuf,
    /// Seed sample submissions on startup.
    pub demo_mode: bool,
    /// Emit logs as JSON lines.
    pub log_json: bool,
}

impl ServerConfig {
    pub fn load(file: Option<&str>) -> Result<Self, config::ConfigError> {
        Self::load_with_env(
            file,
            config::Environment::with_prefix("DOCFLOW").try_parsing(true),
        )
    }

    fn load_with_env(
        file: Option<&str>,
        env: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("data_dir", "data")?
            .set_default("demo_mode", false)?
            .set_default("log_json", false)?;

        if let Some(path) = file {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder.add_source(env).build()?.try_deserialize()
    }

    pub fn attachments_dir(&self) -> PathBuf {
        self.data_dir.join("attachments")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix("DOCFLOW")
            .try_parsing(true)
            .source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let cfg = ServerConfig::load_with_env(None, env(&[])).unwrap();
        assert_eq!(cfg.listen_addr, None);
        assert_eq!(cfg.data_dir, PathBuf::from("data"));
        assert!(!cfg.demo_mode);
        assert!(!cfg.log_json);
        assert_eq!(cfg.attachments_dir(), PathBuf::from("data").join("attachments"));
    }

    #[test]
    fn test_file_then_env_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docflow.toml");
        std::fs::write(
            &path,
            "listen_addr = \"0.0.0.0:8080\"\ndata_dir = \"/srv/docflow\"\ndemo_mode = true\n",
        )
        .unwrap();

        let cfg = ServerConfig::load_with_env(
            path.to_str(),
            env(&[("DOCFLOW_DEMO_MODE", "false"), ("DOCFLOW_LOG_JSON", "true")]),
        )
        .unwrap();

        assert_eq!(cfg.listen_addr.as_deref(), Some("0.0.0.0:8080"));
        assert_eq!(cfg.data_dir, PathBuf::from("/srv/docflow"));
        assert!(!cfg.demo_mode);
        assert!(cfg.log_json);
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let cfg = ServerConfig::load_with_env(Some("/nonexistent/docflow"), env(&[])).unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("data"));
    }
}
