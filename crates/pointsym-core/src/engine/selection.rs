use super::decomposition::Decomposition;
use crate::core::chartab::table::CharacterTable;
use serde::Serialize;
use std::fmt;
use tracing::{debug, instrument};

/// Spectroscopic activity of the vibrational modes of one irreducible species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ModeActivity {
    Infrared,
    Raman,
    Both,
    Silent,
}

impl ModeActivity {
    fn from_flags(ir: bool, raman: bool) -> Self {
        match (ir, raman) {
            (true, true) => Self::Both,
            (true, false) => Self::Infrared,
            (false, true) => Self::Raman,
            (false, false) => Self::Silent,
        }
    }

    pub fn is_infrared(self) -> bool {
        matches!(self, Self::Infrared | Self::Both)
    }

    pub fn is_raman(self) -> bool {
        matches!(self, Self::Raman | Self::Both)
    }
}

impl fmt::Display for ModeActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Infrared => "IR",
            Self::Raman => "Raman",
            Self::Both => "IR + Raman",
            Self::Silent => "silent",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeSelection {
    pub irrep: String,
    pub multiplicity: usize,
    pub dimension: usize,
    /// `multiplicity × dimension`.
    pub modes: usize,
    pub activity: ModeActivity,
}

/// Binary IR/Raman activity of a vibrational decomposition.
///
/// Modes active in both are counted in `ir_count` and in `raman_count`, so the three counts
/// may add up to more than `total_modes`. `unique_observable` counts each such mode once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionResult {
    pub ir_count: usize,
    pub raman_count: usize,
    pub silent_count: usize,
    pub total_modes: usize,
    pub unique_observable: usize,
    /// `unique_observable / total_modes`, or 0 without modes.
    pub ratio: f64,
    pub modes: Vec<ModeSelection>,
}

impl SelectionResult {
    pub fn activity_of(&self, irrep: &str) -> Option<ModeActivity> {
        self.modes
            .iter()
            .find(|m| m.irrep == irrep)
            .map(|m| m.activity)
    }

    /// Species carrying the given activity, in table order.
    pub fn species_with(&self, activity: ModeActivity) -> impl Iterator<Item = &str> {
        self.modes
            .iter()
            .filter(move |m| m.activity == activity)
            .map(|m| m.irrep.as_str())
    }
}

/// Classifies every vibrational species as IR-active, Raman-active, both or silent.
///
/// An irrep is IR-active when it carries a translation (`x`, `y`, `z`) and Raman-active when
/// it carries a quadratic function. Folded complex pairs take the tags of their first member.
#[instrument(skip_all, name = "selection_rules", fields(point_group = %table.id))]
pub fn classify(vibrational: &Decomposition, table: &CharacterTable) -> SelectionResult {
    let mut result = SelectionResult {
        ir_count: 0,
        raman_count: 0,
        silent_count: 0,
        total_modes: 0,
        unique_observable: 0,
        ratio: 0.0,
        modes: Vec::new(),
    };

    for component in vibrational.present() {
        let (ir, raman) = table
            .folded_irrep(&component.label)
            .map_or((false, false), |i| (i.is_ir_active(), i.is_raman_active()));
        let activity = ModeActivity::from_flags(ir, raman);
        let modes = component.multiplicity * component.dimension;

        if activity.is_infrared() {
            result.ir_count += modes;
        }
        if activity.is_raman() {
            result.raman_count += modes;
        }
        if activity == ModeActivity::Silent {
            result.silent_count += modes;
        } else {
            result.unique_observable += modes;
        }
        result.total_modes += modes;

        result.modes.push(ModeSelection {
            irrep: component.label.clone(),
            multiplicity: component.multiplicity,
            dimension: component.dimension,
            modes,
            activity,
        });
    }

    if result.total_modes > 0 {
        result.ratio = result.unique_observable as f64 / result.total_modes as f64;
    }
    debug!(
        ir = result.ir_count,
        raman = result.raman_count,
        silent = result.silent_count,
        total = result.total_modes,
        "Selection rules applied."
    );
    result
}
