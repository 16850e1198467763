//! Application startup: arguments, config, logging, then one harvest run

use crate::app::cli::args::{Args, RunConfig};
use crate::app::cli::config::load_config_file;
use crate::app::input::{self, InputError};
use crate::core::error_handling::{log_error_with_context, ContextualError};
use crate::core::logging::{init_logging, level_for_verbosity};
use crate::core::shutdown::ShutdownCoordinator;
use crate::harvest::coordinator::Coordinator;
use crate::harvest::error::HarvestError;
use crate::harvest::types::{HarvestSummary, WorkerState};
use crate::remote::recorder::UserRecorder;
use crate::remote::vk::VkTransport;
use crate::sink::error::SinkError;
use crate::sink::file::FileSink;
use clap::Parser;
use std::io::IsTerminal;
use std::sync::Arc;

pub const EXIT_OK: i32 = 0;
pub const EXIT_FATAL: i32 = 1;
pub const EXIT_PARTIAL: i32 = 2;
pub const EXIT_INTERRUPTED: i32 = 130;

/// Anything that stops a run before workers start
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Harvest(#[from] HarvestError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("cannot build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

impl ContextualError for StartupError {
    fn is_user_actionable(&self) -> bool {
        match self {
            StartupError::Input(e) => e.is_user_actionable(),
            StartupError::Harvest(e) => e.is_user_actionable(),
            StartupError::Sink(e) => e.is_user_actionable(),
            StartupError::Http(_) => false,
        }
    }

    fn user_message(&self) -> Option<String> {
        match self {
            StartupError::Input(e) => e.user_message(),
            StartupError::Harvest(e) => e.user_message(),
            StartupError::Sink(e) => e.user_message(),
            StartupError::Http(_) => None,
        }
    }
}

/// Parse the process arguments and run; returns the exit code
pub async fn startup() -> i32 {
    let mut args = Args::parse();

    match load_config_file(args.config_file.as_deref()).await {
        Ok(Some((path, config))) => {
            if let Err(e) = Args::apply_toml_values(&mut args, &config) {
                eprintln!(
                    "Error in configuration file validation {}: {}",
                    path.display(),
                    e
                );
                return EXIT_FATAL;
            }
        }
        Ok(None) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_FATAL;
        }
    }

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| level_for_verbosity(args.verbose, args.quiet).to_string());
    let log_file = args.log_file.as_ref().map(|p| p.to_string_lossy().to_string());
    if let Err(e) = init_logging(
        Some(&level),
        args.log_format.as_deref(),
        log_file.as_deref(),
        args.use_color(std::io::stderr().is_terminal()),
    ) {
        eprintln!("Error initialising logging: {}", e);
        return EXIT_FATAL;
    }

    log::info!("vkfetch {} starting", crate::core::version::long_version());
    log::debug!("Arguments: {:?}", args);

    let config = match args.resolve() {
        Ok(config) => config,
        Err(e) => {
            log_error_with_context(&e, "Validating arguments");
            return EXIT_FATAL;
        }
    };

    let shutdown = ShutdownCoordinator::with_signal_handlers();
    match run(&config, &shutdown).await {
        Ok(summary) => {
            println!(
                "Program finished, info dumped to {}",
                config.output_path.display()
            );
            exit_code(&summary, config.fail_on_partial)
        }
        Err(e) => {
            log_error_with_context(&e, "Starting harvest");
            EXIT_FATAL
        }
    }
}

/// Load inputs, open the sink, and run the coordinator to completion
pub async fn run(
    config: &RunConfig,
    shutdown: &ShutdownCoordinator,
) -> Result<HarvestSummary, StartupError> {
    let coordinator = Coordinator::new(config.harvest.clone())?;
    let clients = input::load_clients(&config.tokens_path).await?;
    let items = input::load_items(&config.items).await?;

    let transport = VkTransport::new(&config.vk)?;
    let sink = FileSink::open(&config.output_path).await?;
    let recorder = Arc::new(UserRecorder::new(
        transport,
        sink,
        config.recorder.clone(),
    ));

    Ok(coordinator.run(items, clients, recorder, shutdown).await)
}

/// Exit status for a finished run
///
/// Partial completion still exits 0 unless `fail_on_partial` is set.
pub fn exit_code(summary: &HarvestSummary, fail_on_partial: bool) -> i32 {
    if summary.workers_in(WorkerState::Cancelled) > 0 {
        EXIT_INTERRUPTED
    } else if fail_on_partial && !summary.is_complete() {
        EXIT_PARTIAL
    } else {
        EXIT_OK
    }
}
