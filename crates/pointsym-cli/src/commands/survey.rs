use crate::cli::SurveyArgs;
use crate::config::PartialConfig;
use crate::error::Result;
use crate::report;
use crate::utils::progress::CliProgressHandler;
use pointsym::{engine::progress::ProgressReporter, workflows};
use tracing::{info, warn};

pub async fn run(args: SurveyArgs) -> Result<()> {
    let config = PartialConfig::load(args.config.as_deref())?.analysis_config(None)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Surveying the built-in molecule library...");
    let survey = tokio::task::block_in_place(|| {
        workflows::survey::run_library(&config, &reporter)
    });

    if survey.failed() > 0 {
        warn!("{} molecule(s) failed analysis.", survey.failed());
    }
    info!("Survey covered {} molecule(s).", survey.entries.len());
    print!("{}", report::survey(&survey));
    Ok(())
}
