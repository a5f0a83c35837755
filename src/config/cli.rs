use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "available-dates")]
#[command(about = "Collect per-layer available dates from WMS/WCS servers")]
pub struct CliConfig {
    /// Path to the servers configuration file (TOML, or JSON with a .json extension)
    #[arg(short, long, default_value = "servers.toml")]
    pub config: String,

    /// Write the result to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Pretty-print the JSON result
    #[arg(long)]
    pub pretty: bool,

    /// Override the request timeout from the config file (seconds)
    #[arg(long)]
    pub timeout: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}
