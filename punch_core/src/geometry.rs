//! # Column Geometry and Critical Perimeters
//!
//! Column shape and position types plus the control-perimeter formula
//! families of EN 1992-1-1 §6.4.2. Each shape × position cell has its own
//! closed-form u0 (face) and u1 (at 2d) expression; edge and corner
//! positions additionally have a reduced perimeter u1* and circular columns
//! are handled through the equivalent-rectangle substitution c1 = c2 = D.
//!
//! ## Perimeter summary (rectangular, sides c1/c2, depth d)
//!
//! | position | u0                      | u1                  |
//! |----------|-------------------------|---------------------|
//! | interior | 2(c1+c2)                | 2(c1+c2) + 4πd      |
//! | edge     | min(c2+3d, c2+2c1)      | (c1+2c2) + 3πd      |
//! | corner   | min(3d, c1+c2)          | (c1+c2) + 2πd       |
//!
//! ## Example
//!
//! ```rust
//! use punch_core::geometry::{ColumnGeometry, ColumnPosition};
//!
//! let column = ColumnGeometry::Rectangular { c1_m: 0.40, c2_m: 0.40 };
//! let u0 = column.u0(ColumnPosition::Interior, 0.22);
//! assert!((u0 - 1.60).abs() < 1e-12);
//! ```

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Position of the column relative to the slab edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ColumnPosition {
    /// Column away from all slab edges
    #[default]
    Interior,

    /// Column at a slab edge
    Edge,

    /// Column at a slab corner
    Corner,
}

impl ColumnPosition {
    /// All positions for UI selection
    pub const ALL: [ColumnPosition; 3] = [
        ColumnPosition::Interior,
        ColumnPosition::Edge,
        ColumnPosition::Corner,
    ];

    /// Code-recommended simplified β value for this position (Fig. 6.21N).
    pub fn simplified_beta(&self) -> f64 {
        match self {
            ColumnPosition::Interior => 1.15,
            ColumnPosition::Edge => 1.40,
            ColumnPosition::Corner => 1.50,
        }
    }

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            ColumnPosition::Interior => "interior",
            ColumnPosition::Edge => "edge",
            ColumnPosition::Corner => "corner",
        }
    }
}

impl std::fmt::Display for ColumnPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Column cross-section.
///
/// Rectangular columns carry both side lengths explicitly; only circular
/// columns reuse a single dimension (the diameter).
///
/// ## JSON Examples
///
/// ```json
/// { "shape": "Rectangular", "c1_m": 0.40, "c2_m": 0.30 }
/// ```
///
/// ```json
/// { "shape": "Circular", "diameter_m": 0.35 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape")]
pub enum ColumnGeometry {
    /// Rectangular column with sides c1 (x direction) and c2 (y direction).
    /// For edge columns c1 is the side parallel to the free edge.
    Rectangular { c1_m: f64, c2_m: f64 },

    /// Circular column with the given diameter
    Circular { diameter_m: f64 },
}

impl ColumnGeometry {
    /// Validate that all dimensions are positive.
    pub fn validate(&self) -> CalcResult<()> {
        match *self {
            ColumnGeometry::Rectangular { c1_m, c2_m } => {
                if c1_m <= 0.0 {
                    return Err(CalcError::invalid_input(
                        "c1_m",
                        c1_m.to_string(),
                        "Column side c1 must be positive",
                    ));
                }
                if c2_m <= 0.0 {
                    return Err(CalcError::invalid_input(
                        "c2_m",
                        c2_m.to_string(),
                        "Column side c2 must be positive",
                    ));
                }
            }
            ColumnGeometry::Circular { diameter_m } => {
                if diameter_m <= 0.0 {
                    return Err(CalcError::invalid_input(
                        "diameter_m",
                        diameter_m.to_string(),
                        "Column diameter must be positive",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Shape name for reports and UI
    pub fn shape_name(&self) -> &'static str {
        match self {
            ColumnGeometry::Rectangular { .. } => "rectangular",
            ColumnGeometry::Circular { .. } => "circular",
        }
    }

    /// Equivalent sides (c1, c2). Circular columns map to c1 = c2 = D.
    pub fn equivalent_sides(&self) -> (f64, f64) {
        match *self {
            ColumnGeometry::Rectangular { c1_m, c2_m } => (c1_m, c2_m),
            ColumnGeometry::Circular { diameter_m } => (diameter_m, diameter_m),
        }
    }

    /// Side aspect ratio c1/c2 for the Table 6.1 coefficient.
    /// Circular columns use the equivalent square, so exactly 1.0.
    pub fn aspect_ratio(&self) -> f64 {
        match *self {
            ColumnGeometry::Rectangular { c1_m, c2_m } => {
                if c2_m != 0.0 {
                    c1_m / c2_m
                } else {
                    1.0
                }
            }
            ColumnGeometry::Circular { .. } => 1.0,
        }
    }

    /// Control perimeter u0 at the column face (m).
    pub fn u0(&self, position: ColumnPosition, d_m: f64) -> f64 {
        match (*self, position) {
            (ColumnGeometry::Rectangular { c1_m, c2_m }, ColumnPosition::Interior) => {
                2.0 * (c1_m + c2_m)
            }
            (ColumnGeometry::Rectangular { c1_m, c2_m }, ColumnPosition::Edge) => {
                (c2_m + 3.0 * d_m).min(c2_m + 2.0 * c1_m)
            }
            (ColumnGeometry::Rectangular { c1_m, c2_m }, ColumnPosition::Corner) => {
                (3.0 * d_m).min(c1_m + c2_m)
            }
            (ColumnGeometry::Circular { diameter_m }, ColumnPosition::Interior) => PI * diameter_m,
            (ColumnGeometry::Circular { diameter_m }, ColumnPosition::Edge) => {
                (diameter_m + 3.0 * d_m).min(3.0 * diameter_m)
            }
            (ColumnGeometry::Circular { diameter_m }, ColumnPosition::Corner) => {
                (3.0 * d_m).min(2.0 * diameter_m)
            }
        }
    }

    /// Basic control perimeter u1 at 2d from the column face (m).
    pub fn u1(&self, position: ColumnPosition, d_m: f64) -> f64 {
        match (*self, position) {
            (ColumnGeometry::Rectangular { c1_m, c2_m }, ColumnPosition::Interior) => {
                2.0 * (c1_m + c2_m) + 4.0 * PI * d_m
            }
            (ColumnGeometry::Rectangular { c1_m, c2_m }, ColumnPosition::Edge) => {
                (c1_m + 2.0 * c2_m) + 3.0 * PI * d_m
            }
            (ColumnGeometry::Rectangular { c1_m, c2_m }, ColumnPosition::Corner) => {
                (c1_m + c2_m) + 2.0 * PI * d_m
            }
            (ColumnGeometry::Circular { diameter_m }, ColumnPosition::Interior) => {
                PI * (diameter_m + 4.0 * d_m)
            }
            (ColumnGeometry::Circular { diameter_m }, ColumnPosition::Edge) => {
                0.5 * PI * diameter_m + 3.0 * PI * d_m
            }
            (ColumnGeometry::Circular { diameter_m }, ColumnPosition::Corner) => {
                0.25 * PI * diameter_m + 2.0 * PI * d_m
            }
        }
    }

    /// Reduced control perimeter u1* (Fig. 6.20) for moment transfer at
    /// edge and corner columns, clamped at zero. Interior columns have no
    /// reduction and return `u1_m` unchanged. Circular columns use the
    /// equivalent-rectangle sides.
    pub fn u1_star(&self, position: ColumnPosition, d_m: f64, u1_m: f64) -> f64 {
        let (c1, c2) = self.equivalent_sides();
        let reduction = match position {
            ColumnPosition::Interior => 0.0,
            ColumnPosition::Edge => 2.0 * (0.5 * c1).min(1.5 * d_m),
            ColumnPosition::Corner => (0.5 * c1).min(1.5 * d_m) + (0.5 * c2).min(1.5 * d_m),
        };
        (u1_m - reduction).max(0.0)
    }

    /// Static modulus W1 of the u1 perimeter (m²), rearranged Eq. 6.45.
    /// Circular columns substitute c1 = c2 = D.
    pub fn w1(&self, d_m: f64) -> f64 {
        let (c1, c2) = self.equivalent_sides();
        (c1 * c1 + c2 * c2) / 4.0
            + 8.0 * d_m * c1
            + 4.0 * d_m * d_m
            + 2.0 * PI * d_m * c2
            + 2.0 * PI * d_m * d_m
    }

    /// Loaded area inside the control perimeter at 2d (m²), used for the
    /// soil-reaction relief of foundation slabs: rounded-corner rectangle
    /// for rectangular columns, a disk of radius D/2 + 2d for circular.
    pub fn control_area(&self, d_m: f64) -> f64 {
        match *self {
            ColumnGeometry::Rectangular { c1_m, c2_m } => {
                c1_m * c2_m
                    + c1_m * 2.0 * d_m
                    + c2_m * 2.0 * d_m
                    + PI * (2.0 * d_m).powi(2) / 4.0
            }
            ColumnGeometry::Circular { diameter_m } => {
                PI * (diameter_m / 2.0 + 2.0 * d_m).powi(2)
            }
        }
    }

    /// Radial distance from the column face to the outer perimeter
    /// u_out,ef (m), back-solved from the u1 formula family. Circular
    /// columns solve the full circle regardless of position, matching the
    /// perimeter family used to build u_out,ef.
    pub fn outer_radius(&self, position: ColumnPosition, u_out_ef_m: f64) -> f64 {
        match *self {
            ColumnGeometry::Rectangular { c1_m, c2_m } => match position {
                ColumnPosition::Interior => (u_out_ef_m - 2.0 * (c1_m + c2_m)) / (2.0 * PI),
                ColumnPosition::Edge => (u_out_ef_m - (c1_m + 2.0 * c2_m)) / (3.0 * PI / 2.0),
                ColumnPosition::Corner => (u_out_ef_m - (c1_m + c2_m)) / PI,
            },
            ColumnGeometry::Circular { diameter_m } => (u_out_ef_m / PI - diameter_m) / 2.0,
        }
    }
}

impl std::fmt::Display for ColumnGeometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            ColumnGeometry::Rectangular { c1_m, c2_m } => {
                write!(f, "rectangular {c1_m:.3} x {c2_m:.3} m")
            }
            ColumnGeometry::Circular { diameter_m } => {
                write!(f, "circular D={diameter_m:.3} m")
            }
        }
    }
}
