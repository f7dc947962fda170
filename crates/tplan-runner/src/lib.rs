mod cli;
mod config;
mod logging;
mod run;

pub use cli::{
    Cli, Commands, ConnectionCommand, CreateCommand, OutputFormat, PlanIdCommand, UpdateCommand,
};
pub use config::{
    build_endpoint, load_runner_config, load_runner_config_with_workspace, validate_runner_config,
    RunnerConfig, RunnerConfigError,
};
pub use logging::init_logging;
pub use run::{execute, execute_command, RunnerError};
