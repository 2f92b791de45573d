//! CLI command definitions and parsing
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "newswatch",
    version,
    about = "Search news sites for a company or keyword",
    long_about = "Newswatch queries a custom web-search engine across preferred news sites, \
                  normalizes publication dates and site names, suggests keyword corrections \
                  and exports the results."
)]
pub struct Cli {
    /// JSON config file with search settings and the sector taxonomy
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search for a keyword or a company from the taxonomy
    Search(SearchArgs),

    /// List configured sectors and their companies
    Sectors,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Keyword to search for
    #[arg(required_unless_present = "company")]
    pub keyword: Option<String>,

    /// Sector the company belongs to
    #[arg(long, requires = "company")]
    pub sector: Option<String>,

    /// Company from the taxonomy to search for
    #[arg(long, conflicts_with = "keyword")]
    pub company: Option<String>,

    /// First day of the date range (YYYY-MM-DD), defaults to the day before --to
    #[arg(long, value_name = "DATE")]
    pub from: Option<NaiveDate>,

    /// Last day of the date range (YYYY-MM-DD), defaults to today
    #[arg(long, value_name = "DATE")]
    pub to: Option<NaiveDate>,

    /// Search without a date range, newest first
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub no_date_range: bool,

    /// Number of results to collect
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Restrict to these sites instead of the configured ones
    #[arg(long = "site", value_name = "HOST")]
    pub sites: Vec<String>,

    /// Where to write the export (defaults to <keyword>_search_results.<format>)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Export format
    #[arg(short, long, value_parser = ["csv", "json"], default_value = "csv")]
    pub format: String,

    /// Send the export to this address
    #[arg(long, value_name = "ADDR")]
    pub email: Option<String>,

    /// Keep results collected before a backend failure
    #[arg(long)]
    pub keep_partial: bool,
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
