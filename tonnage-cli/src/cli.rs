use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(
    name = "tonnage",
    version = APP_VERSION,
    about = "Report NYC sanitation tonnage collected during January 2015",
    after_help = "Examples:\n  tonnage -b Bronx -t PAPER -d 9\n  tonnage -b BROOKLYN -t mgp -d 01\n  tonnage -get_total"
)]
pub(crate) struct Cli {
    /// Type of garbage to query: refuse, paper or mgp
    #[arg(short = 't', long = "type")]
    pub garbage_type: Option<String>,

    /// One of the five boroughs of New York City
    #[arg(short, long)]
    pub borough: Option<String>,

    /// Community district number within the borough, 01 to 18
    #[arg(short, long)]
    pub district: Option<String>,

    /// Report the total tonnage of every district queried so far
    #[arg(long = "get-total", visible_alias = "get_total")]
    pub get_total: bool,

    /// Path of the local store file
    #[arg(long, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Path of a TOML settings file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Optional log level
    #[arg(long, value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: Option<String>,
}

/// Accept the single-dash `-get_total` spelling, which clap cannot declare itself.
pub(crate) fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            if arg == "-get_total" {
                OsString::from("--get-total")
            } else {
                arg
            }
        })
        .collect()
}
