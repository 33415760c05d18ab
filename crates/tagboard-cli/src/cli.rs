use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "tagboard", version, about = "Terminal client for a tagboard image board")]
pub struct Cli {
    /// Base URL of the board API, e.g. http://localhost:3000/api.
    /// Defaults to the TAGBOARD_URL environment variable.
    #[arg(long, global = true)]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Search posts by tag and print a page of results.
    Search(SearchArgs),
    /// Show a single post.
    Show(ShowArgs),
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Tags every result must carry.
    pub tags: Vec<String>,

    /// Tags no result may carry.
    #[arg(short = 'x', long = "exclude", value_name = "TAG")]
    pub exclude: Vec<String>,

    /// Result page to open.
    #[arg(long, default_value_t = 1)]
    pub page: i32,

    /// Jump to the final page of the result set instead.
    #[arg(long, default_value_t = false)]
    pub last: bool,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub id: i64,
}
