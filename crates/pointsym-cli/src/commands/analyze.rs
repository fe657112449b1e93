use crate::cli::{AnalyzeArgs, OutputFormat};
use crate::config::PartialConfig;
use crate::error::{CliError, Result};
use crate::io;
use crate::report;
use crate::utils::progress::CliProgressHandler;
use pointsym::{engine::progress::ProgressReporter, workflows};
use tracing::info;

pub async fn run(args: AnalyzeArgs) -> Result<()> {
    let partial_config = PartialConfig::load(args.config.as_deref())?;
    let config = partial_config.analysis_config(args.tolerance)?;

    let mut molecule = io::load_molecule(&args.source)?;
    if let Some(point_group) = &args.point_group {
        info!("Overriding point group with '{}'.", point_group);
        molecule = molecule.with_point_group(Some(point_group.as_str()));
    }

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the core analysis workflow...");
    let analysis = tokio::task::block_in_place(|| {
        workflows::analyze::run(&molecule, &config, &reporter)
    })?;

    match args.format {
        OutputFormat::Text => print!("{}", report::analysis(&analysis)),
        OutputFormat::Toml => {
            let text = toml::to_string_pretty(&analysis)
                .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to serialize analysis: {e}")))?;
            print!("{text}");
        }
    }
    Ok(())
}
