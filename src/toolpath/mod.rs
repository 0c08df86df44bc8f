//! Role-tagged toolpath output.
//!
//! The slicer hands a flat `Vec<PathPoint>` to the downstream machine-code
//! stage, which maps [`Role`] to speed and flow.

use std::fmt;
use std::str::FromStr;

use crate::error::{OptionsError, SliceError};
use crate::math::Point2;

/// Manufacturing role of a path point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Role {
    WallOuter,
    WallInner,
    Infill,
    Top,
    Bottom,
    Travel,
}

impl Role {
    /// Wire name used by the machine-code stage.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WallOuter => "wall_outer",
            Self::WallInner => "wall_inner",
            Self::Infill => "infill",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Travel => "travel",
        }
    }

    /// The output group a feature with this role is emitted in.
    #[must_use]
    pub fn group(self) -> Option<PathGroup> {
        match self {
            Self::WallOuter | Self::WallInner => Some(PathGroup::Walls),
            Self::Infill => Some(PathGroup::Infill),
            Self::Top => Some(PathGroup::Top),
            Self::Bottom => Some(PathGroup::Bottom),
            Self::Travel => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entries of the role-order contract: the printer visits groups in the
/// order the caller lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PathGroup {
    Bottom,
    Walls,
    Infill,
    Top,
}

impl PathGroup {
    /// Bottom, walls, infill, top.
    pub const DEFAULT_ORDER: [Self; 4] = [Self::Bottom, Self::Walls, Self::Infill, Self::Top];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bottom => "bottom",
            Self::Walls => "walls",
            Self::Infill => "infill",
            Self::Top => "top",
        }
    }
}

impl FromStr for PathGroup {
    type Err = SliceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bottom" => Ok(Self::Bottom),
            "walls" | "wall" => Ok(Self::Walls),
            "infill" => Ok(Self::Infill),
            "top" => Ok(Self::Top),
            other => Err(OptionsError::UnknownPathGroup(other.to_owned()).into()),
        }
    }
}

/// One continuous extrusion: a closed wall ring, an infill stroke or chain,
/// or a concentric ring.
#[derive(Debug, Clone, PartialEq)]
pub struct FeaturePath {
    pub role: Role,
    pub points: Vec<Point2>,
}

impl FeaturePath {
    #[must_use]
    pub fn new(role: Role, points: Vec<Point2>) -> Self {
        Self { role, points }
    }

    /// Returns `true` if first and last points coincide.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.points.len() > 2 && self.points.first() == self.points.last()
    }
}

/// A single emitted toolpath point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Non-extruding move onto the first point of a new feature.
    pub travel: bool,
    pub layer: usize,
    pub role: Role,
    pub layer_height: f64,
}

impl PathPoint {
    /// Role the downstream stage should use for this move: `Travel` for
    /// repositioning moves, the feature role otherwise.
    #[must_use]
    pub fn effective_role(&self) -> Role {
        if self.travel {
            Role::Travel
        } else {
            self.role
        }
    }
}
