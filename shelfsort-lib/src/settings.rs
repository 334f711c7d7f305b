//! User defaults for runs, read from `~/.config/shelfsort/settings.toml`.
//!
//! ```toml
//! [defaults]
//! output_dir = "~/Music/shelves"
//! extra_articles = ["le", "la", "l'"]
//! lnf_exclude = ["Elton John"]
//! currency = "EUR"
//! various_policy = "last"
//! per_page = 50
//! folder_id = 0
//! ```
//!
//! Command-line flags win over anything set here.

use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::{RunConfigurationBuilder, VariousPolicy};
use crate::error::ShelfError;

/// Canonical path to the settings file.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("shelfsort").join("settings.toml")
}

/// The `[defaults]` table. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunDefaults {
    pub output_dir: Option<PathBuf>,
    pub extra_articles: Option<Vec<String>>,
    pub lnf_exclude: Option<Vec<String>>,
    pub currency: Option<String>,
    pub various_policy: Option<String>,
    pub per_page: Option<u32>,
    pub folder_id: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    defaults: RunDefaults,
}

impl RunDefaults {
    /// Seed a builder with these defaults.
    pub fn apply(&self, mut builder: RunConfigurationBuilder) -> Result<RunConfigurationBuilder, ShelfError> {
        if let Some(dir) = &self.output_dir {
            builder = builder.output_dir(expand_home(dir));
        }
        if let Some(articles) = &self.extra_articles {
            builder = builder.extra_articles(articles.iter().cloned());
        }
        if let Some(names) = &self.lnf_exclude {
            builder = builder.lnf_exclude(names.iter().cloned());
        }
        if let Some(currency) = &self.currency {
            builder = builder.currency(currency.clone());
        }
        if let Some(policy) = &self.various_policy {
            let policy: VariousPolicy = policy
                .parse()
                .map_err(|e| ShelfError::settings(format!("{}: {}", settings_path().display(), e)))?;
            builder = builder.various_policy(policy);
        }
        if let Some(per_page) = self.per_page {
            builder = builder.per_page(per_page);
        }
        if let Some(folder_id) = self.folder_id {
            builder = builder.folder_id(folder_id);
        }
        Ok(builder)
    }
}

/// Replace a leading `~` with the home directory.
fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}

/// Parse settings text. Unknown keys in `[defaults]` are rejected so typos
/// don't go unnoticed.
pub fn parse_defaults(content: &str) -> Result<RunDefaults, ShelfError> {
    let file: SettingsFile = toml::from_str(content)
        .map_err(|e| ShelfError::settings(format!("{}: {}", settings_path().display(), e)))?;
    Ok(file.defaults)
}

/// Load `[defaults]` from the settings file. A missing file yields empty
/// defaults.
pub fn load_defaults() -> Result<RunDefaults, ShelfError> {
    match std::fs::read_to_string(settings_path()) {
        Ok(content) => parse_defaults(&content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(RunDefaults::default()),
        Err(e) => Err(e.into()),
    }
}

/// Load the full settings file as a pretty-printed TOML string for display.
pub fn load_settings_string() -> Option<String> {
    let contents = std::fs::read_to_string(settings_path()).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfiguration;

    #[test]
    fn defaults_seed_the_builder() {
        let defaults = parse_defaults(
            r#"
            [defaults]
            extra_articles = ["le", "la"]
            currency = "eur"
            various_policy = "last"
            per_page = 50
            "#,
        )
        .unwrap();
        let config = defaults
            .apply(RunConfiguration::builder())
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.normalize().extra_articles, vec!["le", "la"]);
        assert_eq!(config.price().currency, "EUR");
        assert_eq!(config.various(), VariousPolicy::Last);
        assert_eq!(config.fetch().per_page, 50);
    }

    #[test]
    fn later_builder_calls_override_defaults() {
        let defaults = parse_defaults("[defaults]\nper_page = 50\n").unwrap();
        let config = defaults
            .apply(RunConfiguration::builder())
            .unwrap()
            .per_page(25)
            .build()
            .unwrap();
        assert_eq!(config.fetch().per_page, 25);
    }

    #[test]
    fn empty_file_is_fine() {
        assert_eq!(parse_defaults("").unwrap(), RunDefaults::default());
    }

    #[test]
    fn unknown_keys_and_bad_policies_are_errors() {
        assert!(parse_defaults("[defaults]\nper_pgae = 5\n").is_err());
        let defaults = parse_defaults("[defaults]\nvarious_policy = \"middle\"\n").unwrap();
        assert!(defaults.apply(RunConfiguration::builder()).is_err());
    }

    #[test]
    fn home_prefix_is_expanded() {
        let plain = Path::new("/tmp/out");
        assert_eq!(expand_home(plain), PathBuf::from("/tmp/out"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~/shelves")), home.join("shelves"));
        }
    }
}
