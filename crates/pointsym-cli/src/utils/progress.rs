use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use pointsym::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// The bar plus the molecules that failed in the current batch.
struct BarState {
    bar: ProgressBar,
    failed: Vec<String>,
}

impl BarState {
    fn apply(&mut self, event: Progress) {
        let bar = &self.bar;
        match event {
            Progress::PhaseStart { name } => {
                bar.reset();
                bar.set_length(0);
                bar.set_style(spinner_style());
                bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                bar.set_message(name);
            }
            Progress::PhaseFinish => {
                bar.disable_steady_tick();
                // A finished task bar already shows its batch summary.
                if !bar.is_finished() {
                    bar.finish_with_message("✓ Done");
                }
            }
            Progress::TaskStart { total_steps } => {
                self.failed.clear();
                bar.disable_steady_tick();
                bar.reset();
                bar.set_length(total_steps);
                bar.set_style(bar_style());
            }
            Progress::TaskIncrement => bar.inc(1),
            Progress::MoleculeDone { name, succeeded } => {
                if !succeeded {
                    bar.println(format!("  ✗ {name}"));
                    self.failed.push(name.clone());
                }
                bar.set_message(name);
            }
            Progress::TaskFinish => {
                if let Some(length) = bar.length() {
                    bar.set_position(length);
                }
                let summary = match self.failed.len() {
                    0 => format!("{} analyzed", bar.position()),
                    n => format!("{} analyzed, {n} failed", bar.position()),
                };
                bar.finish_with_message(summary);
            }
            Progress::Message(msg) if bar.is_finished() => bar.set_message(msg),
            Progress::Message(msg) => bar.println(format!("  {msg}")),
        }
    }
}

/// Renders core progress events on stderr with an indicatif spinner or bar.
#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<BarState>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr())
            .with_style(spinner_style());
        bar.finish_and_clear();
        Self {
            state: Arc::new(Mutex::new(BarState {
                bar,
                failed: Vec::new(),
            })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = Arc::clone(&self.state);
        Box::new(move |event: Progress| match state.lock() {
            Ok(mut guard) => guard.apply(event),
            Err(_) => warn!("Progress bar mutex was poisoned. Cannot update progress."),
        })
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .expect("Failed to create spinner style template")
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg:<24} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        .expect("Failed to create bar style template")
        .with_key(
            "eta",
            |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
            },
        )
        .progress_chars("##-")
}
