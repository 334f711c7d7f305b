use std::path::PathBuf;

use crate::error::CatalogError;

const TOKEN_ENV: &str = "DISCOGS_TOKEN";
const USER_AGENT_ENV: &str = "DISCOGS_USER_AGENT";

/// User agent sent when none is configured.
pub fn default_user_agent() -> String {
    format!("shelfsort/{}", env!("CARGO_PKG_VERSION"))
}

/// Credentials for authenticating with the catalog API.
#[derive(Clone)]
pub struct Credentials {
    /// Personal access token.
    pub token: String,
    pub user_agent: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &mask(&self.token))
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Show only the last four characters of a secret.
pub fn mask(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}

/// Where a credential field's value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Passed on the command line.
    Flag,
    /// Loaded from an environment variable.
    EnvVar(&'static str),
    /// Loaded from the config file.
    ConfigFile,
    /// Hard-coded default value.
    Default,
    /// Not set anywhere.
    Missing,
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flag => write!(f, "command line"),
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// Provenance of each credential field.
#[derive(Debug)]
pub struct CredentialSources {
    pub token: CredentialSource,
    pub user_agent: CredentialSource,
}

/// TOML config file format.
#[derive(Debug, Default, serde::Deserialize)]
struct ConfigFile {
    discogs: Option<DiscogsConfig>,
}

#[derive(Debug, Default, Clone, serde::Deserialize)]
struct DiscogsConfig {
    token: Option<String>,
    user_agent: Option<String>,
}

fn parse_config(content: &str) -> Result<DiscogsConfig, CatalogError> {
    let config: ConfigFile = toml::from_str(content)
        .map_err(|e| CatalogError::config(format!("Invalid credentials file: {}", e)))?;
    Ok(config.discogs.unwrap_or_default())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_value(var: &str) -> Option<String> {
    non_empty(std::env::var(var).ok())
}

impl Credentials {
    /// Resolve credentials from explicit overrides, environment variables,
    /// and the config file.
    ///
    /// Priority: overrides > env vars > config file > default.
    /// Required: token.
    pub fn resolve(
        token_override: Option<String>,
        user_agent_override: Option<String>,
    ) -> Result<Self, CatalogError> {
        let config = load_config_file()?;
        Self::resolve_with(
            token_override,
            user_agent_override,
            env_value(TOKEN_ENV),
            env_value(USER_AGENT_ENV),
            &config,
        )
    }

    fn resolve_with(
        token_override: Option<String>,
        user_agent_override: Option<String>,
        token_env: Option<String>,
        user_agent_env: Option<String>,
        config: &DiscogsConfig,
    ) -> Result<Self, CatalogError> {
        let token = non_empty(token_override)
            .or(token_env)
            .or_else(|| non_empty(config.token.clone()))
            .ok_or_else(|| {
                CatalogError::config(format!(
                    "Missing token. Pass --token, set {} or add [discogs] token to the credentials file",
                    TOKEN_ENV
                ))
            })?;

        let user_agent = non_empty(user_agent_override)
            .or(user_agent_env)
            .or_else(|| non_empty(config.user_agent.clone()))
            .unwrap_or_else(default_user_agent);

        Ok(Self { token, user_agent })
    }
}

/// Return the path to the credentials config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("shelfsort").join("credentials.toml"))
}

/// Determine where each credential field is coming from.
pub fn credential_sources(
    token_flag: bool,
    user_agent_flag: bool,
) -> Result<CredentialSources, CatalogError> {
    let config = load_config_file()?;

    let token = if token_flag {
        CredentialSource::Flag
    } else if env_value(TOKEN_ENV).is_some() {
        CredentialSource::EnvVar(TOKEN_ENV)
    } else if non_empty(config.token.clone()).is_some() {
        CredentialSource::ConfigFile
    } else {
        CredentialSource::Missing
    };

    let user_agent = if user_agent_flag {
        CredentialSource::Flag
    } else if env_value(USER_AGENT_ENV).is_some() {
        CredentialSource::EnvVar(USER_AGENT_ENV)
    } else if non_empty(config.user_agent.clone()).is_some() {
        CredentialSource::ConfigFile
    } else {
        CredentialSource::Default
    };

    Ok(CredentialSources { token, user_agent })
}

/// A missing file is not an error; a malformed one is.
fn load_config_file() -> Result<DiscogsConfig, CatalogError> {
    let Some(path) = config_path() else {
        return Ok(DiscogsConfig::default());
    };
    match std::fs::read_to_string(&path) {
        Ok(content) => parse_config(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(DiscogsConfig::default()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_beats_env_beats_file() {
        let config = parse_config("[discogs]\ntoken = \"file-token\"\n").unwrap();

        let creds = Credentials::resolve_with(
            Some("flag-token".into()),
            None,
            Some("env-token".into()),
            None,
            &config,
        )
        .unwrap();
        assert_eq!(creds.token, "flag-token");

        let creds =
            Credentials::resolve_with(None, None, Some("env-token".into()), None, &config).unwrap();
        assert_eq!(creds.token, "env-token");

        let creds = Credentials::resolve_with(None, None, None, None, &config).unwrap();
        assert_eq!(creds.token, "file-token");
        assert_eq!(creds.user_agent, default_user_agent());
    }

    #[test]
    fn missing_token_is_a_config_error() {
        let err = Credentials::resolve_with(
            Some("   ".into()),
            None,
            None,
            None,
            &DiscogsConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::Config(_)));
    }

    #[test]
    fn user_agent_from_file() {
        let config =
            parse_config("[discogs]\ntoken = \"t\"\nuser_agent = \"MyShelf/1.0\"\n").unwrap();
        let creds = Credentials::resolve_with(None, None, None, None, &config).unwrap();
        assert_eq!(creds.user_agent, "MyShelf/1.0");
    }

    #[test]
    fn malformed_file_is_rejected() {
        assert!(parse_config("[discogs\ntoken=").is_err());
        assert!(parse_config("").unwrap().token.is_none());
    }

    #[test]
    fn debug_output_masks_token() {
        let creds = Credentials {
            token: "abcdefgh1234".into(),
            user_agent: "ua".into(),
        };
        let shown = format!("{creds:?}");
        assert!(!shown.contains("abcdefgh"));
        assert!(shown.contains("1234"));
        assert_eq!(mask("abc"), "***");
    }
}
