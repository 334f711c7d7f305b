use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use shelfsort_catalog::{CatalogClient, Credentials};
use shelfsort_core::CancelToken;
use shelfsort_lib::settings::{RunDefaults, load_defaults};
use shelfsort_lib::{ClassificationStats, Pipeline, RunConfiguration, RunEvent, RunOutput};

use crate::cli_types::SortArgs;
use crate::error::CliError;
use crate::spinner::{event_message, spinner};

/// Merge settings-file defaults and command-line flags. Flags win.
pub(crate) fn build_config(
    args: &SortArgs,
    defaults: &RunDefaults,
) -> Result<RunConfiguration, CliError> {
    let mut builder = defaults.apply(RunConfiguration::builder())?;

    let media = &args.media;
    if let Some(policy) = media.lp_mode {
        builder = builder.lp_policy(policy);
    }
    if let Some(policy) = media.box_set {
        builder = builder.box_set_policy(policy);
    }
    builder = builder
        .include_lp(!media.no_lp)
        .include_45s(media.include_45s)
        .include_cds(media.include_cds)
        .report_exclusions(media.report_filters);

    let keys = &args.keys;
    if !keys.articles_extra.is_empty() {
        builder = builder.extra_articles(keys.articles_extra.iter().cloned());
    }
    if let Some(policy) = keys.various {
        builder = builder.various_policy(policy);
    }
    if !keys.lnf_exclude.is_empty() {
        builder = builder.lnf_exclude(keys.lnf_exclude.iter().cloned());
    }
    builder = builder
        .last_name_first(keys.lnf)
        .allow_three_words(keys.lnf_allow_3)
        .band_safe(keys.lnf_band_safe);

    let layout = &args.layout;
    builder = builder
        .dividers(layout.dividers)
        .align(layout.align)
        .show_country(layout.show_country)
        .json(layout.json);
    if let Some(dir) = &layout.output_dir {
        builder = builder.output_dir(dir.clone());
    }

    if let Some(folder) = args.folder {
        builder = builder.folder_id(folder);
    }
    if let Some(per_page) = args.per_page {
        builder = builder.per_page(per_page);
    }
    if args.max_pages.is_some() {
        builder = builder.max_pages(args.max_pages);
    }
    if let Some(currency) = &args.currency {
        builder = builder.currency(currency.clone());
    }
    builder = builder.value_threshold(args.value_threshold);

    Ok(builder.build()?)
}

fn log_stats(stats: &ClassificationStats) {
    log::info!("{}", "Classification".if_supports_color(Stdout, |t| t.bold()));
    log::info!("  scanned:          {}", stats.scanned);
    log::info!("  vinyl:            {}", stats.vinyl);
    log::info!("  vinyl LP/Album:   {}", stats.vinyl_lp);
    log::info!("  vinyl LP 33 RPM:  {}", stats.vinyl_lp_33);
    log::info!("  LP shelf:         {}", stats.lp);
    log::info!("  45s shelf:        {}", stats.single45);
    log::info!("  CD shelf:         {}", stats.cd);
    log::info!("  excluded:         {}", stats.excluded);
    log::info!("");
}

fn log_prices(output: &RunOutput, currency: &str) {
    let Some(prices) = &output.prices else {
        return;
    };
    log::info!(
        "  Prices: {} of {} items priced in {} ({} lookups)",
        prices.priced,
        prices.priced + prices.unknown,
        currency,
        prices.lookups,
    );
    if prices.is_partial() {
        log::warn!(
            "{} {} items have no known price; the value report may be incomplete",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            prices.unknown,
        );
    }
}

/// Fetch, arrange and write the collection's shelf lists.
pub(crate) fn run_sort(
    args: SortArgs,
    token: Option<String>,
    user_agent: Option<String>,
    quiet: bool,
) -> Result<(), CliError> {
    let defaults = load_defaults()?;
    let config = build_config(&args, &defaults)?;
    let creds = Credentials::resolve(token, user_agent)?;
    log::debug!("Using {:?}", creds);

    let client = CatalogClient::connect(&creds)?;
    let cancel = CancelToken::new();
    let pb = spinner(quiet, "Connecting...");

    let result = Pipeline::new(config.clone(), client).run(&cancel, |event| {
        if let Some(msg) = event_message(&event) {
            pb.set_message(msg);
        }
        if let RunEvent::Fetched {
            username,
            items,
            pages,
        } = &event
        {
            log::debug!("{} items in {} pages for {}", items, pages, username);
        }
    });
    pb.finish_and_clear();
    let output = result?;

    log::info!(
        "{} Fetched {} items for {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        output.stats.scanned,
        output.username.if_supports_color(Stdout, |t| t.cyan()),
    );
    if args.media.debug_stats {
        log_stats(&output.stats);
    }
    log_prices(&output, &config.price().currency);
    if output.transport.retries > 0 {
        log::info!(
            "  {} requests, {} retries",
            output.transport.requests,
            output.transport.retries
        );
    }

    let written = shelfsort_export::write_outputs(&output, &config, &cancel)?;
    for path in &written {
        log::info!(
            "  {} {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            path.display().if_supports_color(Stdout, |t| t.cyan()),
        );
    }
    log::info!("");
    log::info!("{}", output.summary_line().if_supports_color(Stdout, |t| t.bold()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli_types::{Cli, Commands};
    use clap::Parser;
    use shelfsort_lib::{LpPolicy, VariousPolicy};

    fn parse(args: &[&str]) -> SortArgs {
        let cli = Cli::try_parse_from(std::iter::once("shelfsort").chain(args.iter().copied()))
            .unwrap();
        match cli.command {
            Commands::Sort(args) => args,
            _ => panic!("expected sort"),
        }
    }

    #[test]
    fn flags_reach_the_configuration() {
        let args = parse(&[
            "sort",
            "--lp-mode",
            "strict",
            "--include-45s",
            "--various",
            "last",
            "--lnf",
            "--lnf-exclude",
            "Elton John,Kiki Dee",
            "--articles-extra",
            "le,la",
            "--per-page",
            "50",
            "--value-threshold",
            "25",
            "--currency",
            "eur",
        ]);
        let config = build_config(&args, &RunDefaults::default()).unwrap();
        assert_eq!(config.classify().lp, LpPolicy::Strict);
        assert!(config.classify().include_45);
        assert!(config.classify().include_lp);
        assert_eq!(config.various(), VariousPolicy::Last);
        assert!(config.normalize().last_name_first);
        assert_eq!(config.normalize().exclude, vec!["Elton John", "Kiki Dee"]);
        assert_eq!(config.normalize().extra_articles, vec!["le", "la"]);
        assert_eq!(config.fetch().per_page, 50);
        assert_eq!(config.price().threshold, Some(25.0));
        assert_eq!(config.price().currency, "EUR");
    }

    #[test]
    fn flags_override_settings_defaults() {
        let defaults = RunDefaults {
            per_page: Some(25),
            various_policy: Some("first".to_string()),
            currency: Some("GBP".to_string()),
            ..Default::default()
        };
        let config = build_config(&parse(&["sort", "--per-page", "75"]), &defaults).unwrap();
        assert_eq!(config.fetch().per_page, 75);
        assert_eq!(config.various(), VariousPolicy::First);
        assert_eq!(config.price().currency, "GBP");
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let err = build_config(&parse(&["sort", "--per-page", "500"]), &RunDefaults::default())
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let err = build_config(&parse(&["sort", "--no-lp"]), &RunDefaults::default()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn unknown_policy_is_rejected_by_the_parser() {
        let result = Cli::try_parse_from(["shelfsort", "sort", "--lp-mode", "sloppy"]);
        assert!(result.is_err());
    }

    #[test]
    fn policy_aliases_are_accepted() {
        for (alias, expected) in [
            ("loose", LpPolicy::Permissive),
            ("DEFAULT", LpPolicy::Permissive),
            ("probable-33", LpPolicy::Probable),
        ] {
            let args = parse(&["sort", "--lp-mode", alias]);
            assert_eq!(args.media.lp_mode, Some(expected), "alias {alias}");
        }
    }

    #[test]
    fn lnf_sub_flags_require_lnf() {
        assert!(Cli::try_parse_from(["shelfsort", "sort", "--lnf-band-safe"]).is_err());
        assert!(Cli::try_parse_from(["shelfsort", "run", "--lnf", "--lnf-band-safe"]).is_ok());
    }
}
