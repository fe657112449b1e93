use crate::cli::AnimateArgs;
use crate::config::PartialConfig;
use crate::error::{CliError, Result};
use crate::io;
use crate::report;
use pointsym::engine::animation::{AnimationState, OperationAnimationController};
use pointsym::engine::progress::ProgressReporter;
use pointsym::workflows;
use std::time::Duration;
use tracing::{debug, info};

pub async fn run(args: AnimateArgs) -> Result<()> {
    let partial_config = PartialConfig::load(args.config.as_deref())?;
    let config = partial_config.analysis_config(None)?;
    let playback = partial_config.playback_config(args.fps)?;

    let molecule = io::load_molecule(&args.source)?;
    let analysis = tokio::task::block_in_place(|| {
        workflows::analyze::run(&molecule, &config, &ProgressReporter::new())
    })?;

    let mut controller = OperationAnimationController::new(
        analysis.classes.clone(),
        molecule.center_of_mass(),
        playback.animation,
    );
    if !controller.play(&args.operation) {
        let available: Vec<&str> = controller.labels().collect();
        return Err(CliError::Argument(format!(
            "'{}' is not an operation class of {}; available: {}",
            args.operation,
            analysis.reduction_group,
            available.join(", ")
        )));
    }
    info!(
        "Playing {} of {} at {} fps.",
        controller.active_label().unwrap_or_default(),
        analysis.molecule,
        playback.frame_rate
    );

    let dt = playback.frame_interval();
    let mut elapsed = Duration::ZERO;
    let mut frame = 0usize;
    loop {
        let matrix = controller.advance(dt);
        elapsed += dt;
        frame += 1;
        let state = controller.state();
        debug!(frame, ?state, "Frame computed.");
        println!(
            "frame {frame:>4}  t = {:.3} s  {:?}",
            elapsed.as_secs_f64(),
            state
        );
        print!("{}", report::matrix(&matrix));
        if state == AnimationState::Idle {
            break;
        }
    }
    Ok(())
}
