use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use shelfsort_catalog::{
    CatalogClient, CredentialSource, Credentials, config_path, credential_sources,
    default_user_agent, mask,
};
use shelfsort_lib::settings::{load_settings_string, settings_path};

use crate::error::CliError;
use crate::spinner::spinner;

fn log_file_status(label: &str, path: Option<&std::path::Path>) {
    match path {
        Some(p) if p.exists() => {
            log::info!(
                "  {}: {} {}",
                label,
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(exists)".if_supports_color(Stdout, |t| t.green()),
            );
        }
        Some(p) => {
            log::info!(
                "  {}: {} {}",
                label,
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        None => {
            log::info!(
                "  {}: {}",
                label,
                "could not determine path".if_supports_color(Stdout, |t| t.red()),
            );
        }
    }
}

/// Show current credentials, their sources, and the settings file.
pub(crate) fn run_config_show(
    token: Option<String>,
    user_agent: Option<String>,
) -> Result<(), CliError> {
    let sources = credential_sources(token.is_some(), user_agent.is_some())?;
    let creds = Credentials::resolve(token, user_agent).ok();

    log::info!(
        "{}",
        "shelfsort Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");
    log_file_status("Credentials file", config_path().as_deref());
    log_file_status("Settings file", Some(settings_path().as_path()));
    log::info!("");

    let fields: [(&str, &CredentialSource, Option<String>); 2] = [
        (
            "token",
            &sources.token,
            creds.as_ref().map(|c| mask(&c.token)),
        ),
        (
            "user_agent",
            &sources.user_agent,
            creds
                .as_ref()
                .map(|c| c.user_agent.clone())
                .or_else(|| (sources.user_agent == CredentialSource::Default).then(default_user_agent)),
        ),
    ];

    for (name, source, value) in fields {
        let source_str = format!("({})", source);
        match value {
            Some(v) if *source != CredentialSource::Missing => {
                log::info!(
                    "  {} {} {}",
                    format!("{}:", name).if_supports_color(Stdout, |t| t.cyan()),
                    v,
                    source_str.if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
            _ => {
                log::info!(
                    "  {} {} {}",
                    format!("{}:", name).if_supports_color(Stdout, |t| t.cyan()),
                    "not set".if_supports_color(Stdout, |t| t.yellow()),
                    source_str.if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
        }
    }

    if let Some(settings) = load_settings_string() {
        log::info!("");
        log::info!("{}", "Settings".if_supports_color(Stdout, |t| t.bold()));
        for line in settings.lines() {
            log::info!("  {}", line);
        }
    }
    Ok(())
}

/// Check the token against the identity endpoint.
pub(crate) fn run_config_test(
    token: Option<String>,
    user_agent: Option<String>,
    quiet: bool,
) -> Result<(), CliError> {
    let creds = Credentials::resolve(token, user_agent)?;
    log::info!("Testing token against the Discogs API...");

    let mut client = CatalogClient::connect(&creds)?;
    let pb = spinner(quiet, "Connecting...");
    let identity = client.identity();
    pb.finish_and_clear();

    match identity {
        Ok(identity) => {
            log::info!(
                "{} Token is valid for {}",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                identity.username.if_supports_color(Stdout, |t| t.cyan()),
            );
            if let Some(remaining) = client.remaining_budget() {
                log::info!("  Requests left this minute: {}", remaining);
            }
            Ok(())
        }
        Err(e) => {
            log::warn!(
                "{} Token check failed",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            );
            Err(e.into())
        }
    }
}

/// Print the credentials and settings file paths.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    let creds = config_path()
        .ok_or_else(|| CliError::config("could not determine config directory"))?;
    log::info!("{}", creds.display());
    log::info!("{}", settings_path().display());
    Ok(())
}
