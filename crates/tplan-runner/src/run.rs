use crate::cli::{Cli, Commands, OutputFormat};
use crate::config::{build_endpoint, load_runner_config_with_workspace, RunnerConfigError};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::fs;
use std::path::Path;
use tplan_client::{ClientError, HttpEndpointError, HttpTransport, TrackingPlanClient};
use tplan_core::short_id;
use tplan_model::{decode_json, Rules, SourceConnections, TrackingPlan, TrackingPlans};

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("runner config path is required: pass `--config <file>`")]
    MissingConfig,
    #[error("runner config load failed: {0}")]
    ConfigLoad(#[from] RunnerConfigError),
    #[error("http endpoint invalid: {0}")]
    Endpoint(#[from] HttpEndpointError),
    #[error("read file failed `{path}`: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("payload parse failed `{path}`: {reason}")]
    PayloadParse { path: String, reason: String },
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("json encode failed: {0}")]
    JsonEncode(#[from] serde_json::Error),
}

/// Loads the runner config, connects over HTTP and runs the selected command.
pub fn execute(cli: &Cli) -> Result<String, RunnerError> {
    let config_path = cli.config.as_deref().ok_or(RunnerError::MissingConfig)?;
    let config = load_runner_config_with_workspace(config_path, cli.workspace.as_deref())?;

    let transport = HttpTransport::new(build_endpoint(&config)?)?;
    let client = TrackingPlanClient::new(Box::new(transport));
    tracing::debug!(workspace = %config.workspace, "running command");
    execute_command(&client, config.workspace.as_str(), &cli.command, &cli.format)
}

pub fn execute_command(
    client: &TrackingPlanClient,
    workspace: &str,
    command: &Commands,
    format: &OutputFormat,
) -> Result<String, RunnerError> {
    match command {
        Commands::List => {
            let plans = client.list_tracking_plans(workspace)?;
            render(format, &plans, render_plans_text)
        }
        Commands::Get(command) => {
            let plan = client.get_tracking_plan(workspace, command.id.as_str())?;
            render(format, &plan, render_plan_text)
        }
        Commands::Create(command) => {
            let rules = match &command.rules {
                Some(path) => read_payload::<Rules>(path)?,
                None => Rules::default(),
            };
            let plan =
                client.create_tracking_plan(workspace, command.display_name.as_str(), rules)?;
            render(format, &plan, render_plan_text)
        }
        Commands::Update(command) => {
            let payload = read_payload::<TrackingPlan>(&command.plan)?;
            let plan = client.update_tracking_plan(
                workspace,
                command.id.as_str(),
                command.mask.clone(),
                payload,
            )?;
            render(format, &plan, render_plan_text)
        }
        Commands::Delete(command) => {
            client.delete_tracking_plan(workspace, command.id.as_str())?;
            match format {
                OutputFormat::Text => Ok(format!("deleted tracking plan `{}`", command.id)),
                OutputFormat::Json => Ok(serde_json::to_string_pretty(
                    &json!({"deleted": {"tracking_plan_id": command.id}}),
                )?),
            }
        }
        Commands::Connect(command) => {
            let connection = client.create_source_connection(
                workspace,
                command.id.as_str(),
                command.source.as_str(),
            )?;
            render(format, &connection, |connection| {
                format!(
                    "connected source `{}` to tracking plan `{}`",
                    connection.source(),
                    connection.tracking_plan_id
                )
            })
        }
        Commands::Connections(command) => {
            let connections = client.list_source_connections(workspace, command.id.as_str())?;
            render(format, &connections, render_connections_text)
        }
        Commands::Disconnect(command) => {
            client.delete_source_connection(
                workspace,
                command.id.as_str(),
                command.source.as_str(),
            )?;
            match format {
                OutputFormat::Text => Ok(format!(
                    "disconnected source `{}` from tracking plan `{}`",
                    short_id(&command.source),
                    command.id
                )),
                OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                    "deleted": {
                        "tracking_plan_id": command.id,
                        "source": short_id(&command.source),
                    }
                }))?),
            }
        }
    }
}

fn render<T: serde::Serialize>(
    format: &OutputFormat,
    value: &T,
    text: impl Fn(&T) -> String,
) -> Result<String, RunnerError> {
    match format {
        OutputFormat::Text => Ok(text(value)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
    }
}

fn render_plans_text(plans: &TrackingPlans) -> String {
    plans
        .iter()
        .map(render_plan_text)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_plan_text(plan: &TrackingPlan) -> String {
    format!("{}\t{}", plan.id(), plan.display_name)
}

fn render_connections_text(connections: &SourceConnections) -> String {
    connections.sources().join("\n")
}

fn read_payload<T: DeserializeOwned>(path: &Path) -> Result<T, RunnerError> {
    let bytes = fs::read(path).map_err(|source| RunnerError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;
    decode_json::<T>(&bytes).map_err(|failure| RunnerError::PayloadParse {
        path: path.display().to_string(),
        reason: failure.to_string(),
    })
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;
