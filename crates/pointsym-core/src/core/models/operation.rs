use crate::core::geometry::transform;
use nalgebra::{Matrix3, Rotation3, Unit, Vector3};
use serde::Serialize;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Cosine threshold above which two directions are treated as parallel.
const PARALLEL_COSINE: f64 = 1.0 - 1e-9;

/// A point-group symmetry operation.
///
/// The set of operation kinds is closed, so every formula that depends on the kind
/// (matrix, character contribution, animation path) is an exhaustive match over this enum.
/// Axes and plane normals are unit vectors through the molecular center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SymmetryOperation {
    /// `E`, leaves every point in place.
    Identity,
    /// `Cₙᵏ`, proper rotation by `2πk/n` about `axis`.
    Rotation {
        axis: Unit<Vector3<f64>>,
        order: u32,
        power: u32,
    },
    /// `σ`, reflection through the plane with the given normal.
    Reflection { normal: Unit<Vector3<f64>> },
    /// `Sₙᵏ`, rotation by `2πk/n` about `axis` followed by reflection through the
    /// plane perpendicular to it.
    ImproperRotation {
        axis: Unit<Vector3<f64>>,
        order: u32,
        power: u32,
    },
    /// `i`, maps every point `r` to `-r`.
    Inversion,
}

impl SymmetryOperation {
    pub fn rotation(axis: Vector3<f64>, order: u32, power: u32) -> Self {
        Self::Rotation {
            axis: Unit::new_normalize(axis),
            order,
            power,
        }
    }

    pub fn reflection(normal: Vector3<f64>) -> Self {
        Self::Reflection {
            normal: Unit::new_normalize(normal),
        }
    }

    pub fn improper_rotation(axis: Vector3<f64>, order: u32, power: u32) -> Self {
        Self::ImproperRotation {
            axis: Unit::new_normalize(axis),
            order,
            power,
        }
    }

    /// Rotation angle `2πk/n` in radians for proper and improper rotations.
    pub fn angle(&self) -> Option<f64> {
        match self {
            Self::Rotation { order, power, .. } | Self::ImproperRotation { order, power, .. } => {
                Some(2.0 * PI * f64::from(*power) / f64::from(*order))
            }
            _ => None,
        }
    }

    /// The rotation axis or the plane normal, if the operation has a geometric element.
    pub fn element(&self) -> Option<Unit<Vector3<f64>>> {
        match self {
            Self::Rotation { axis, .. } | Self::ImproperRotation { axis, .. } => Some(*axis),
            Self::Reflection { normal } => Some(*normal),
            Self::Identity | Self::Inversion => None,
        }
    }

    /// Contribution of one unmoved atom to the character of the 3N Cartesian representation.
    ///
    /// This is the trace of the operation's 3×3 matrix: `3` for `E`, `1 + 2cos θ` for `Cₙ`,
    /// `1` for `σ`, `-3` for `i` and `-1 + 2cos θ` for `Sₙ`.
    pub fn character_per_unmoved_atom(&self) -> f64 {
        match self {
            Self::Identity => 3.0,
            Self::Rotation { .. } => 1.0 + 2.0 * self.angle().unwrap_or(0.0).cos(),
            Self::Reflection { .. } => 1.0,
            Self::Inversion => -3.0,
            Self::ImproperRotation { .. } => -1.0 + 2.0 * self.angle().unwrap_or(0.0).cos(),
        }
    }

    /// The orthogonal 3×3 matrix of the operation about the origin.
    pub fn matrix(&self) -> Matrix3<f64> {
        transform::operation_matrix(self)
    }

    /// Applies the operation to a vector relative to the symmetry center.
    pub fn apply(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.matrix() * v
    }

    /// Returns `true` if the operation's axis or normal is parallel to `direction`.
    pub fn is_anchored_to(&self, direction: &Vector3<f64>) -> bool {
        self.element()
            .is_some_and(|e| e.dot(&direction.normalize()).abs() > PARALLEL_COSINE)
    }

    /// Re-expresses the operation in a rotated frame: axes are mapped by `rotation`.
    pub fn rotated(&self, rotation: &Rotation3<f64>) -> Self {
        match *self {
            Self::Rotation { axis, order, power } => Self::Rotation {
                axis: Unit::new_normalize(rotation * axis.into_inner()),
                order,
                power,
            },
            Self::Reflection { normal } => Self::Reflection {
                normal: Unit::new_normalize(rotation * normal.into_inner()),
            },
            Self::ImproperRotation { axis, order, power } => Self::ImproperRotation {
                axis: Unit::new_normalize(rotation * axis.into_inner()),
                order,
                power,
            },
            Self::Identity | Self::Inversion => *self,
        }
    }

    /// Short Schoenflies symbol: `E`, `C3`, `C3^2`, `σ`, `S4^3`, `i`.
    pub fn symbol(&self) -> String {
        match self {
            Self::Identity => "E".to_string(),
            Self::Rotation { order, power, .. } => power_symbol('C', *order, *power),
            Self::Reflection { .. } => "σ".to_string(),
            Self::ImproperRotation { order, power, .. } => power_symbol('S', *order, *power),
            Self::Inversion => "i".to_string(),
        }
    }
}

fn power_symbol(prefix: char, order: u32, power: u32) -> String {
    if power == 1 {
        format!("{prefix}{order}")
    } else {
        format!("{prefix}{order}^{power}")
    }
}

impl fmt::Display for SymmetryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.element() {
            Some(e) => write!(
                f,
                "{} [{:.4}, {:.4}, {:.4}]",
                self.symbol(),
                e.x,
                e.y,
                e.z
            ),
            None => write!(f, "{}", self.symbol()),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OperationParseError {
    #[error("Empty operation notation")]
    Empty,
    #[error("Unrecognized operation symbol '{0}'")]
    Symbol(String),
    #[error("Operation '{0}' requires an axis (e.g. '{0}@z')")]
    MissingAxis(String),
    #[error("Invalid axis '{0}'")]
    Axis(String),
    #[error("Invalid order or power in '{0}'")]
    OrderOrPower(String),
}

/// Parses the compact notation used by the character table data:
/// `E`, `i`, `C6^5@z`, `S4@x`, `sigma@xy:150`, `C3@[1,1,1]`.
impl FromStr for SymmetryOperation {
    type Err = OperationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(OperationParseError::Empty);
        }
        match s {
            "E" => return Ok(Self::Identity),
            "i" => return Ok(Self::Inversion),
            _ => {}
        }

        let (symbol, axis) = s
            .split_once('@')
            .ok_or_else(|| OperationParseError::MissingAxis(s.to_string()))?;
        let axis = parse_axis(axis)?;

        if symbol == "sigma" || symbol == "σ" {
            return Ok(Self::Reflection {
                normal: Unit::new_normalize(axis),
            });
        }

        let mut chars = symbol.chars();
        let prefix = chars.next().ok_or(OperationParseError::Empty)?;
        let (order, power) = match chars.as_str().split_once('^') {
            Some((order, power)) => (order, power),
            None => (chars.as_str(), "1"),
        };
        let order: u32 = order
            .parse()
            .map_err(|_| OperationParseError::OrderOrPower(s.to_string()))?;
        let power: u32 = power
            .parse()
            .map_err(|_| OperationParseError::OrderOrPower(s.to_string()))?;
        // Sₙ of odd order only repeats after 2n applications.
        let period = match prefix {
            'C' => order,
            'S' if order % 2 == 1 => 2 * order,
            'S' => order,
            _ => return Err(OperationParseError::Symbol(symbol.to_string())),
        };
        if order == 0 || power == 0 || power >= period {
            return Err(OperationParseError::OrderOrPower(s.to_string()));
        }

        Ok(match prefix {
            'C' => Self::rotation(axis, order, power),
            _ => Self::improper_rotation(axis, order, power),
        })
    }
}

fn parse_axis(text: &str) -> Result<Vector3<f64>, OperationParseError> {
    let text = text.trim();
    let err = || OperationParseError::Axis(text.to_string());
    let axis = match text {
        "x" => Vector3::x(),
        "y" => Vector3::y(),
        "z" => Vector3::z(),
        _ if text.starts_with("xy:") => {
            let degrees: f64 = text[3..].parse().map_err(|_| err())?;
            let radians = degrees.to_radians();
            Vector3::new(radians.cos(), radians.sin(), 0.0)
        }
        _ if text.starts_with('[') && text.ends_with(']') => {
            let components: Vec<f64> = text[1..text.len() - 1]
                .split(',')
                .map(|c| c.trim().parse::<f64>())
                .collect::<Result<_, _>>()
                .map_err(|_| err())?;
            match components.as_slice() {
                [x, y, z] => Vector3::new(*x, *y, *z),
                _ => return Err(err()),
            }
        }
        _ => return Err(err()),
    };
    if axis.norm() < 1e-12 {
        return Err(err());
    }
    Ok(axis)
}

/// A conjugacy class of symmetry operations, the unit by which character tables are indexed.
///
/// The class size `g_c` is the number of member operations. The continuous classes of the
/// linear groups (`2C∞^φ`, `∞σv`, ...) have no finite membership and are flagged as such.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationClass {
    pub label: String,
    pub operations: Vec<SymmetryOperation>,
    pub continuous: bool,
}

impl OperationClass {
    pub fn new(label: &str, operations: Vec<SymmetryOperation>) -> Self {
        Self {
            label: label.to_string(),
            operations,
            continuous: false,
        }
    }

    pub fn continuous(label: &str) -> Self {
        Self {
            label: label.to_string(),
            operations: Vec::new(),
            continuous: true,
        }
    }

    /// Number of operations in the class, `None` for continuous classes.
    pub fn size(&self) -> Option<usize> {
        (!self.continuous).then_some(self.operations.len())
    }

    /// The operation used to evaluate the class character.
    pub fn representative(&self) -> Option<&SymmetryOperation> {
        self.operations.first()
    }

    pub fn contains_inversion(&self) -> bool {
        self.operations
            .iter()
            .any(|op| matches!(op, SymmetryOperation::Inversion))
    }

    /// Re-expresses every member operation in a rotated frame.
    pub fn rotated(&self, rotation: &Rotation3<f64>) -> Self {
        Self {
            label: self.label.clone(),
            operations: self.operations.iter().map(|op| op.rotated(rotation)).collect(),
            continuous: self.continuous,
        }
    }

    /// Display-ready (label, count) pair; continuous classes report `"∞"`.
    pub fn summary(&self) -> OperationSummary {
        OperationSummary {
            label: self.label.clone(),
            count: match self.size() {
                Some(n) => n.to_string(),
                None => "∞".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationSummary {
    pub label: String,
    pub count: String,
}
