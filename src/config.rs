//! Layered application settings.
//!
//! Settings come from built-in defaults, an optional TOML file, `TASK_BOARD__*`
//! environment variables and finally command-line overrides, in that order
//! of precedence.

use std::path::{Path, PathBuf};

use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Directory under the home directory holding the config file and logs.
pub const APP_DIR: &str = ".task_board";

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub store: StoreSettings,
    #[serde(default)]
    pub log: LogSettings,
}

/// Connection to the remote table.
#[derive(Debug, Deserialize)]
pub struct StoreSettings {
    /// Project URL; the REST endpoint lives under `rest/v1/`.
    pub url: Url,
    /// Key sent as `apikey` and bearer token.
    pub api_key: SecretString,
    /// Table holding the tasks.
    pub table: String,
}

#[derive(Debug, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for the rolling log files. Defaults to `~/.task_board/logs`.
    pub dir: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        LogSettings {
            level: default_log_level(),
            dir: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Values given on the command line, applied last.
#[derive(Debug, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub table: Option<String>,
}

impl Settings {
    /// Load settings for the given application directory.
    ///
    /// An explicit `config_path` must exist; the default
    /// `<app_dir>/config.toml` is optional.
    pub fn load(
        app_dir: &Path,
        config_path: Option<&Path>,
        overrides: Overrides,
    ) -> Result<Self, ConfigError> {
        let file = match config_path {
            Some(path) => File::from(path).required(true),
            None => File::from(app_dir.join("config.toml")).required(false),
        };

        let builder = base_builder()?
            .add_source(file)
            .add_source(Environment::with_prefix("TASK_BOARD").separator("__"));

        apply_overrides(builder, overrides)?.build()?.try_deserialize()
    }

    /// Directory the log files go to.
    pub fn log_dir(&self, app_dir: &Path) -> PathBuf {
        self.log
            .dir
            .clone()
            .unwrap_or_else(|| app_dir.join("logs"))
    }
}

/// Defaults shared by every source stack. The conventional hosted-database
/// variables seed the connection when present.
fn base_builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let mut builder = Config::builder()
        .set_default("store.table", "task_tech")?
        .set_default("log.level", default_log_level())?;
    if let Ok(url) = std::env::var("SUPABASE_URL") {
        builder = builder.set_default("store.url", url)?;
    }
    if let Ok(key) = std::env::var("SUPABASE_ANON_KEY") {
        builder = builder.set_default("store.api_key", key)?;
    }
    Ok(builder)
}

fn apply_overrides(
    builder: ConfigBuilder<DefaultState>,
    overrides: Overrides,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_override_option("store.url", overrides.url)?
        .set_override_option("store.table", overrides.table)
}

/// Resolve the application directory under `$HOME`, falling back to the
/// working directory.
pub fn app_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(APP_DIR)
}

#[cfg(test)]
mod tests {
    use config::FileFormat;
    use secrecy::ExposeSecret;

    use super::*;

    fn from_toml(toml: &str, overrides: Overrides) -> Result<Settings, ConfigError> {
        let builder = base_builder()?.add_source(File::from_str(toml, FileFormat::Toml));
        apply_overrides(builder, overrides)?.build()?.try_deserialize()
    }

    const BASIC: &str = r#"
        [store]
        url = "https://demo.example.co"
        api_key = "anon-key"
    "#;

    #[test]
    fn test_defaults_fill_table_and_log() {
        let settings = from_toml(BASIC, Overrides::default()).unwrap();
        assert_eq!(settings.store.url.as_str(), "https://demo.example.co/");
        assert_eq!(settings.store.api_key.expose_secret(), "anon-key");
        assert_eq!(settings.store.table, "task_tech");
        assert_eq!(settings.log.level, "info");
        assert_eq!(
            settings.log_dir(Path::new("/home/ana/.task_board")),
            PathBuf::from("/home/ana/.task_board/logs")
        );
    }

    #[test]
    fn test_overrides_win_over_file() {
        let settings = from_toml(
            BASIC,
            Overrides {
                url: Some("http://localhost:54321".to_string()),
                table: Some("demandas".to_string()),
            },
        )
        .unwrap();
        assert_eq!(settings.store.url.as_str(), "http://localhost:54321/");
        assert_eq!(settings.store.table, "demandas");
    }

    #[test]
    fn test_log_section_is_read() {
        let toml = format!("{BASIC}\n[log]\nlevel = \"debug\"\ndir = \"/tmp/tb-logs\"\n");
        let settings = from_toml(&toml, Overrides::default()).unwrap();
        assert_eq!(settings.log.level, "debug");
        assert_eq!(settings.log_dir(Path::new("/ignored")), PathBuf::from("/tmp/tb-logs"));
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let toml = r#"
            [store]
            url = "not a url"
            api_key = "k"
        "#;
        assert!(from_toml(toml, Overrides::default()).is_err());
    }

    #[test]
    fn test_api_key_is_not_debug_printed() {
        let settings = from_toml(BASIC, Overrides::default()).unwrap();
        assert!(!format!("{:?}", settings.store).contains("anon-key"));
    }
}
