use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "house-finder")]
#[command(about = "Rank property listings by Pareto dominance over price and travel time")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "house-finder.toml")]
    pub config: String,

    /// Override the listings file from the configuration
    #[arg(short, long)]
    pub listings: Option<String>,

    /// Override the output directory from the configuration
    #[arg(short, long)]
    pub output: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit JSON logs
    #[arg(long)]
    pub json_logs: bool,

    /// Validate configuration and build objectives without evaluating listings
    #[arg(long)]
    pub dry_run: bool,
}
