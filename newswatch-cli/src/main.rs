mod cli;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use cli::{Cli, Commands, SearchArgs};
use newswatch::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    init_logging(cli.json_logs);

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Search(args) => cmd_search(config, args).await,
        Commands::Sectors => {
            cmd_sectors(&config.taxonomy);
            Ok(())
        }
    }
}

fn init_logging(json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("newswatch=info"));

    if json {
        fmt().json().with_env_filter(filter).init();
    } else {
        fmt().with_env_filter(filter).with_target(false).init();
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<WatchConfig> {
    match path {
        Some(path) => WatchConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(WatchConfig::default()),
    }
}

async fn cmd_search(config: WatchConfig, args: SearchArgs) -> Result<()> {
    let keyword = resolve_keyword(&config.taxonomy, &args)?;

    let mut search = config.search;
    if args.keep_partial {
        search = search.with_error_policy(ErrorPolicy::KeepPartial);
    }

    let mut query = SearchQuery::from_config(&keyword, &search)?;
    if !args.sites.is_empty() {
        query = query.with_sites(args.sites.iter().cloned());
    }
    if let Some(count) = args.count {
        query = query.with_target_count(count)?;
    }
    if !args.no_date_range {
        query = query.with_date_range(date_range(args.from, args.to)?);
    }

    let credentials = Credentials::from_env().context("search credentials are not configured")?;
    let backend = HttpSearchBackend::new(search.clone(), credentials)?;
    let aggregator = SearchAggregator::from_config(Arc::new(backend), &search)
        .with_observer(Arc::new(LoggingSearchObserver));

    let results = aggregator
        .search(&query)
        .await
        .with_context(|| format!("search for '{keyword}' failed"))?;

    if results.is_empty() {
        println!("No results found for '{keyword}'.");
    } else {
        print_results(&results);
    }

    let suggestions = SpellSuggestionEngine::new().suggest(query.keyword(), &results);
    if !suggestions.is_empty() {
        println!("Possible corrections: {suggestions}");
    }

    if results.is_empty() {
        return Ok(());
    }

    let artifact = exporter_for(&args.format).export(query.keyword(), &results)?;
    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&artifact.file_name));
    std::fs::write(&path, &artifact.bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Saved {} results to {}", results.len(), path.display());

    if let Some(recipient) = args.email.as_deref() {
        let request = DeliveryRequest::for_results(query.keyword(), recipient, artifact)?;
        let outcome = LoggingMailTransport
            .send(&request)
            .await
            .with_context(|| format!("failed to send results to {recipient}"))?;
        println!("{}", outcome.notice(&request.recipient));
    }

    Ok(())
}

fn exporter_for(format: &str) -> Box<dyn TabularExporter> {
    match format {
        "json" => Box::new(JsonExporter::pretty()),
        _ => Box::new(CsvExporter::new()),
    }
}

fn resolve_keyword(taxonomy: &Taxonomy, args: &SearchArgs) -> Result<String> {
    if let Some(keyword) = &args.keyword {
        return Ok(keyword.clone());
    }
    let Some(company) = &args.company else {
        bail!("a keyword or --company is required");
    };

    match (taxonomy.sector_of(company), args.sector.as_deref()) {
        (None, _) if taxonomy.is_empty() => Ok(company.clone()),
        (None, _) => bail!("company '{company}' is not in the configured taxonomy"),
        (Some(found), Some(sector)) if found != sector => {
            bail!("company '{company}' is listed under '{found}', not '{sector}'")
        }
        (Some(_), _) => Ok(company.clone()),
    }
}

fn date_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<DateRange> {
    let end = to.unwrap_or_else(|| Local::now().date_naive());
    let range = match from {
        Some(start) => DateRange::new(start, end)?,
        None => DateRange::ending_on(end, 1)?,
    };
    Ok(range)
}

fn print_results(results: &ResultSet) {
    println!("{:<20} {:<18} {}", "SITE", "DATE", "TITLE");
    for result in results {
        println!(
            "{:<20} {:<18} {}",
            truncate(&result.site_name, 20),
            truncate(&result.date, 18),
            result.title
        );
        println!("{:<20} {:<18} {}", "", "", result.link);
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn cmd_sectors(taxonomy: &Taxonomy) {
    if taxonomy.is_empty() {
        println!("No sectors configured.");
        return;
    }
    for sector in taxonomy.entries() {
        println!("{}", sector.name);
        for company in &sector.companies {
            println!("  {company}");
        }
    }
}
