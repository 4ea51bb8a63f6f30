use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the view-model HTTP server and the realtime change feed.
    Serve,
    /// Search bugs and print one line per hit.
    Search(SearchArgs),
    /// Print the weighted tag cloud.
    Tags(TagsArgs),
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    pub query: String,
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    /// Results per page; defaults to the user's saved preference.
    #[arg(long)]
    pub rpp: Option<usize>,
    #[arg(long, value_delimiter = ',')]
    pub status: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,
    #[arg(long)]
    pub modified: Option<String>,
    #[arg(long)]
    pub sort: Option<String>,
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct TagsArgs {
    #[arg(long, default_value_t = bugboard_core::domain::tag_cloud::DEFAULT_TOP_TAGS)]
    pub top: usize,
    #[arg(long, default_value_t = bugboard_core::domain::tag_cloud::DEFAULT_BUCKETS)]
    pub buckets: usize,
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::Serve)
    }
}
