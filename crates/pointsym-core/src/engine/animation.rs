use super::config::AnimationConfig;
use crate::core::chartab::notation::{normalize_class_label, strip_class_multiplier};
use crate::core::geometry::transform::transform;
use crate::core::models::operation::{OperationClass, SymmetryOperation};
use nalgebra::{Matrix4, Point3};
use std::time::Duration;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Idle,
    Playing,
    Reversing,
}

/// Plays one symmetry operation forward and back over a fixed duration.
///
/// The controller owns no scene: each [`advance`](Self::advance) returns the homogeneous
/// transform the caller applies to the molecule for that frame. Starting a new operation
/// while one is running restarts the timing; nothing is queued.
#[derive(Debug, Clone)]
pub struct OperationAnimationController {
    classes: Vec<OperationClass>,
    center: Point3<f64>,
    duration: Duration,
    state: AnimationState,
    active: Option<usize>,
    elapsed: Duration,
}

impl OperationAnimationController {
    /// `classes` are the operation classes in the molecule's frame; operations act about
    /// `center`, normally the molecule's center of mass.
    pub fn new(classes: Vec<OperationClass>, center: Point3<f64>, config: AnimationConfig) -> Self {
        Self {
            classes,
            center,
            duration: config.duration,
            state: AnimationState::Idle,
            active: None,
            elapsed: Duration::ZERO,
        }
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn active_label(&self) -> Option<&str> {
        self.active.map(|i| self.classes[i].label.as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(|c| c.label.as_str())
    }

    /// Starts playing the class matching `label`. Returns `false`, changing nothing, when no
    /// class matches.
    ///
    /// Labels are compared after normalization (`sigma_v(xz)` matches `σv(xz)`), then with
    /// the class-size multiplier dropped on both sides (`C3` matches `2C3`).
    pub fn play(&mut self, label: &str) -> bool {
        let Some(index) = self.find_class(label) else {
            debug!(label, "No operation class matches; ignoring.");
            return false;
        };
        self.active = Some(index);
        self.elapsed = Duration::ZERO;
        self.state = AnimationState::Playing;
        debug!(class = %self.classes[index].label, "Animation started.");
        true
    }

    /// Advances the clock by `dt` and returns the transform for the new time.
    pub fn advance(&mut self, dt: Duration) -> Matrix4<f64> {
        let Some(op) = self.active_operation().cloned() else {
            return Matrix4::identity();
        };
        self.elapsed += dt;

        let p = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        if p >= 1.0 {
            return self.stop();
        }
        let linear = if p < 0.5 {
            self.state = AnimationState::Playing;
            2.0 * p
        } else {
            self.state = AnimationState::Reversing;
            2.0 * (1.0 - p)
        };
        let t = smoothstep(linear);
        trace!(p, t, state = ?self.state, "Animation frame.");
        transform(&op, &self.center, t)
    }

    /// Ends any running animation immediately.
    pub fn stop(&mut self) -> Matrix4<f64> {
        self.state = AnimationState::Idle;
        self.active = None;
        self.elapsed = Duration::ZERO;
        Matrix4::identity()
    }

    fn active_operation(&self) -> Option<&SymmetryOperation> {
        self.active
            .and_then(|i| self.classes[i].representative())
    }

    fn find_class(&self, label: &str) -> Option<usize> {
        let wanted = normalize_class_label(label);
        let bare = strip_class_multiplier(&wanted);
        let playable: Vec<(usize, String)> = self
            .classes
            .iter()
            .enumerate()
            .filter(|(_, c)| c.representative().is_some())
            .map(|(i, c)| (i, normalize_class_label(&c.label)))
            .collect();

        playable
            .iter()
            .find(|(_, l)| *l == wanted)
            .or_else(|| {
                playable
                    .iter()
                    .find(|(_, l)| strip_class_multiplier(l) == bare)
            })
            .map(|(i, _)| *i)
    }
}

fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}
