use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "movies-search",
    about = "Search movies, list recent searches and download posters",
    version
)]
pub struct Cli {
    /// Text to search for
    #[arg(required_unless_present_any = ["recent", "create_config"])]
    pub query: Option<String>,

    /// Result page to fetch
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Path to the configuration file
    #[arg(long, default_value = "movies-search.toml")]
    pub config: PathBuf,

    /// API key (alternatively use TMDB_API_KEY env var)
    #[arg(long, env = "TMDB_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Set log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    pub log_level: Option<String>,

    /// Write logs to a file instead of stderr
    #[arg(long)]
    pub log_to_file: bool,

    /// Print the N most recent queries instead of searching
    #[arg(long, value_name = "N")]
    pub recent: Option<usize>,

    /// Poster width to download for the first result
    #[arg(long, requires = "poster_out")]
    pub poster_width: Option<u32>,

    /// Where to write the downloaded poster
    #[arg(long, requires = "poster_width")]
    pub poster_out: Option<PathBuf>,

    /// Create a default configuration file at --config and exit
    #[arg(long)]
    pub create_config: bool,
}
