use std::process::ExitCode;

use clap::Parser;
use clhi_cli::cli_args::Args;
use clhi_cli::console::{TerminalConsole, Theme};
use clhi_cli::logging::SessionLog;
use clhi_core::config::{self, Settings};
use clhi_core::editor::ExternalEditor;
use clhi_core::error::Result;
use clhi_core::execution::{DryRunExecutor, Executor, ShellExecutor};
use clhi_core::file_handling;
use clhi_core::pipeline::RagPipeline;
use clhi_core::session::InteractionController;
use log::{debug, info};

/// Load the settings file and apply command-line overrides
fn initialize_settings(args: &Args) -> Result<Settings> {
    let settings_path = config::get_settings_path(&args.settings_path);
    let mut settings = file_handling::get_settings(&settings_path)?;

    if let Some(history_path) = &args.history_path {
        settings.history.path = Some(history_path.clone());
    }

    Ok(settings)
}

fn build_executor(args: &Args, settings: &Settings) -> Box<dyn Executor> {
    if args.dry_run {
        info!("Dry run is specified, commands will not be executed");
        Box::new(DryRunExecutor)
    } else {
        Box::new(ShellExecutor::new(settings.shell()))
    }
}

fn execute() -> Result<()> {
    let args = Args::parse();
    let settings = initialize_settings(&args)?;
    let session_log = SessionLog::init(&settings.log_path(), args.verbose)?;
    debug!("Logging to `{}`", session_log.path());

    let theme = Theme::from_definition(&settings.theme)?;
    let pipeline = RagPipeline::from_settings(&settings)?;
    let editor = ExternalEditor::new(&settings.editor());
    let executor = build_executor(&args, &settings);

    let mut console = TerminalConsole::new(theme)?;
    console.clear()?;

    let result =
        InteractionController::new(&pipeline, &mut console, &editor, executor.as_ref()).run();
    session_log.finish();
    result
}

fn main() -> ExitCode {
    match execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
