use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "tplan")]
#[command(about = "Tracking plan API client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Runner config file (YAML or JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Workspace to use instead of the one in the config file
    #[arg(long, global = true)]
    pub workspace: Option<String>,
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    #[arg(long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// List the tracking plans of the workspace
    List,
    /// Show one tracking plan
    Get(PlanIdCommand),
    /// Create a tracking plan
    Create(CreateCommand),
    /// Update fields of a tracking plan selected by an update mask
    Update(UpdateCommand),
    /// Delete a tracking plan
    Delete(PlanIdCommand),
    /// Connect a source to a tracking plan
    Connect(ConnectionCommand),
    /// List the sources connected to a tracking plan
    Connections(PlanIdCommand),
    /// Disconnect a source from a tracking plan
    Disconnect(ConnectionCommand),
}

#[derive(Debug, Clone, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, clap::Args)]
pub struct PlanIdCommand {
    /// Short tracking plan id, e.g. `rs_123`
    #[arg(long)]
    pub id: String,
}

#[derive(Debug, Clone, clap::Args)]
pub struct CreateCommand {
    #[arg(long)]
    pub display_name: String,
    /// JSON file holding the plan rules; the plan starts with no rules when omitted
    #[arg(long)]
    pub rules: Option<PathBuf>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct UpdateCommand {
    #[arg(long)]
    pub id: String,
    /// JSON file holding the tracking plan payload
    #[arg(long)]
    pub plan: PathBuf,
    /// Field path to apply from the payload, e.g. `tracking_plan.display_name`
    #[arg(long = "mask", required = true)]
    pub mask: Vec<String>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ConnectionCommand {
    #[arg(long)]
    pub id: String,
    /// Source name, short (`js`) or `workspaces/{workspace}/sources/{name}`
    #[arg(long)]
    pub source: String,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
