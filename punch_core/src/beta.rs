//! # Eccentricity Factor β
//!
//! The β factor amplifies the punching shear stress to account for
//! unbalanced moment transfer at the column-slab connection (§6.4.3).
//! Two strategies are supported:
//!
//! - **Simplified**: the code-recommended constants of Fig. 6.21N by
//!   column position, independent of the moment magnitudes.
//! - **Computed**: the closed-form Eq. 6.44 family using the reduced
//!   perimeter u1*, the static modulus W1 and the Table 6.1 coefficient k
//!   interpolated from the side ratio c1/c2. Circular columns go through
//!   the equivalent-rectangle substitution c1 = c2 = D.
//!
//! When both applied moments are negligible, β = 1.0 in either mode.

use serde::{Deserialize, Serialize};

use crate::geometry::{ColumnGeometry, ColumnPosition};

/// Moments below this magnitude (N·m) are treated as absent.
const MOMENT_TOLERANCE_NM: f64 = 1e-12;

/// Floor applied to V_Ed when forming eccentricities, to avoid dividing
/// by zero for moment-only inputs.
const SHEAR_FLOOR_N: f64 = 1e-9;

/// Table 6.1 control points: (c1/c2 ratio, k).
const K_CONTROL_POINTS: [(f64, f64); 4] = [(0.5, 0.45), (1.0, 0.60), (2.0, 0.70), (3.0, 0.80)];

/// Strategy used to derive the eccentricity factor β.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BetaMethod {
    /// Code-recommended fixed values by column position
    #[default]
    Simplified,

    /// Closed-form eccentricity-based formula (Eq. 6.44 family)
    Computed,
}

impl BetaMethod {
    /// All methods for UI selection
    pub const ALL: [BetaMethod; 2] = [BetaMethod::Simplified, BetaMethod::Computed];

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            BetaMethod::Simplified => "simplified",
            BetaMethod::Computed => "computed",
        }
    }
}

impl std::fmt::Display for BetaMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Identifies which computed-mode formula cell produced a β value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComputedCase {
    RectangularEdge,
    RectangularCorner,
    CircularInterior,
    CircularEdge,
    CircularCorner,
}

impl ComputedCase {
    /// Label used in report lines
    pub fn label(&self) -> &'static str {
        match self {
            ComputedCase::RectangularEdge => "rectangular edge",
            ComputedCase::RectangularCorner => "rectangular corner",
            ComputedCase::CircularInterior => "circular interior, equiv. rect.",
            ComputedCase::CircularEdge => "circular edge, equiv. rect.",
            ComputedCase::CircularCorner => "circular corner, equiv. rect.",
        }
    }
}

/// Which branch of the β derivation was taken, with the formula inputs
/// needed to echo the derivation in the report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "branch")]
pub enum BetaBranch {
    /// Both moments negligible: β = 1.0
    NoMoments,

    /// Simplified mode: position constant
    Simplified,

    /// Computed mode, one of the enumerated formula cells.
    /// `perimeter_ratio` is u1/u1* (absent for the circular interior cell,
    /// which has no u1* reduction).
    Computed {
        case: ComputedCase,
        perimeter_ratio: Option<f64>,
        eccentricity_m: f64,
        w1_m2: f64,
        aspect_ratio: f64,
    },

    /// Computed mode requested but u1* or W1 degenerated to a non-positive
    /// value: β falls back to 1.0 with a warning.
    Degenerate { case: ComputedCase },

    /// Computed mode requested for a cell with no closed-form expression
    /// (rectangular interior): the simplified constant is adopted and
    /// flagged as provisional.
    Provisional,
}

/// The eccentricity factor together with its derivation trail.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetaFactor {
    /// The β value applied to the shear stress
    pub value: f64,

    /// Interpolated Table 6.1 coefficient, present whenever the computed
    /// path evaluated it
    pub k_coefficient: Option<f64>,

    /// Branch taken, with formula inputs for reporting
    pub branch: BetaBranch,
}

/// Table 6.1 coefficient k as a function of the side ratio c1/c2,
/// piecewise-linear between the control points and flat outside [0.5, 3.0].
pub fn interpolate_k(ratio: f64) -> f64 {
    let (first, last) = (K_CONTROL_POINTS[0], K_CONTROL_POINTS[3]);
    if ratio <= first.0 {
        return first.1;
    }
    if ratio >= last.0 {
        return last.1;
    }
    for pair in K_CONTROL_POINTS.windows(2) {
        let (r0, k0) = pair[0];
        let (r1, k1) = pair[1];
        if ratio < r1 {
            let t = (ratio - r0) / (r1 - r0);
            return k0 + t * (k1 - k0);
        }
    }
    last.1
}

/// Derive β for the given configuration and actions.
///
/// `u1_m` must be the basic control perimeter already computed for the
/// same geometry/position/depth.
#[allow(clippy::too_many_arguments)]
pub fn beta_factor(
    geometry: &ColumnGeometry,
    position: ColumnPosition,
    method: BetaMethod,
    d_m: f64,
    u1_m: f64,
    v_ed_n: f64,
    m_edx_nm: f64,
    m_edy_nm: f64,
) -> BetaFactor {
    if m_edx_nm.abs() < MOMENT_TOLERANCE_NM && m_edy_nm.abs() < MOMENT_TOLERANCE_NM {
        return BetaFactor {
            value: 1.0,
            k_coefficient: None,
            branch: BetaBranch::NoMoments,
        };
    }

    if method == BetaMethod::Simplified {
        return BetaFactor {
            value: position.simplified_beta(),
            k_coefficient: None,
            branch: BetaBranch::Simplified,
        };
    }

    let v = v_ed_n.max(SHEAR_FLOOR_N);
    let ex = m_edx_nm.abs() / v;
    let ey = m_edy_nm.abs() / v;

    let ratio = geometry.aspect_ratio();
    let k = interpolate_k(ratio);

    let case = match (geometry, position) {
        (ColumnGeometry::Rectangular { .. }, ColumnPosition::Edge) => ComputedCase::RectangularEdge,
        (ColumnGeometry::Rectangular { .. }, ColumnPosition::Corner) => {
            ComputedCase::RectangularCorner
        }
        (ColumnGeometry::Circular { .. }, ColumnPosition::Interior) => {
            ComputedCase::CircularInterior
        }
        (ColumnGeometry::Circular { .. }, ColumnPosition::Edge) => ComputedCase::CircularEdge,
        (ColumnGeometry::Circular { .. }, ColumnPosition::Corner) => ComputedCase::CircularCorner,
        (ColumnGeometry::Rectangular { .. }, ColumnPosition::Interior) => {
            // No closed-form cell; adopt the simplified constant, flagged.
            log::warn!(
                "computed beta requested for a rectangular interior column; \
                 adopting the simplified value {:.3} as provisional",
                position.simplified_beta()
            );
            return BetaFactor {
                value: position.simplified_beta(),
                k_coefficient: None,
                branch: BetaBranch::Provisional,
            };
        }
    };

    let w1 = geometry.w1(d_m);
    // Eccentricity transferred across the control perimeter: parallel to
    // the free edge for edge columns, both components otherwise.
    let eccentricity = match position {
        ColumnPosition::Edge => ey,
        _ => ex + ey,
    };

    if case == ComputedCase::CircularInterior {
        if w1 <= 0.0 {
            log::warn!("degenerate W1 for circular interior column; assuming beta = 1.0");
            return BetaFactor {
                value: 1.0,
                k_coefficient: Some(k),
                branch: BetaBranch::Degenerate { case },
            };
        }
        return BetaFactor {
            value: 1.0 + (eccentricity / w1) * k,
            k_coefficient: Some(k),
            branch: BetaBranch::Computed {
                case,
                perimeter_ratio: None,
                eccentricity_m: eccentricity,
                w1_m2: w1,
                aspect_ratio: ratio,
            },
        };
    }

    let u1_star = geometry.u1_star(position, d_m, u1_m);
    if u1_star <= 0.0 || w1 <= 0.0 {
        log::warn!(
            "degenerate u1* or W1 for {} column; assuming beta = 1.0",
            case.label()
        );
        return BetaFactor {
            value: 1.0,
            k_coefficient: Some(k),
            branch: BetaBranch::Degenerate { case },
        };
    }

    let perimeter_ratio = u1_m / u1_star;
    BetaFactor {
        value: 1.0 + perimeter_ratio * (eccentricity / w1) * k,
        k_coefficient: Some(k),
        branch: BetaBranch::Computed {
            case,
            perimeter_ratio: Some(perimeter_ratio),
            eccentricity_m: eccentricity,
            w1_m2: w1,
            aspect_ratio: ratio,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rect(c1: f64, c2: f64) -> ColumnGeometry {
        ColumnGeometry::Rectangular { c1_m: c1, c2_m: c2 }
    }

    #[test]
    fn test_interpolate_k_control_points() {
        assert_relative_eq!(interpolate_k(0.5), 0.45, epsilon = 1e-12);
        assert_relative_eq!(interpolate_k(1.0), 0.60, epsilon = 1e-12);
        assert_relative_eq!(interpolate_k(2.0), 0.70, epsilon = 1e-12);
        assert_relative_eq!(interpolate_k(3.0), 0.80, epsilon = 1e-12);
    }

    #[test]
    fn test_interpolate_k_midpoints() {
        // Between (1.0, 0.60) and (2.0, 0.70)
        assert!((interpolate_k(1.5) - 0.65).abs() < 1e-3);
        // Between (0.5, 0.45) and (1.0, 0.60)
        assert!((interpolate_k(0.75) - 0.525).abs() < 1e-3);
    }

    #[test]
    fn test_interpolate_k_flat_extrapolation() {
        assert_eq!(interpolate_k(0.1), 0.45);
        assert_eq!(interpolate_k(10.0), 0.80);
    }

    #[test]
    fn test_no_moments_gives_unity() {
        let g = rect(0.4, 0.4);
        let beta = beta_factor(
            &g,
            ColumnPosition::Edge,
            BetaMethod::Computed,
            0.22,
            g.u1(ColumnPosition::Edge, 0.22),
            600_000.0,
            0.0,
            0.0,
        );
        assert_eq!(beta.value, 1.0);
        assert_eq!(beta.branch, BetaBranch::NoMoments);
        assert!(beta.k_coefficient.is_none());
    }

    #[test]
    fn test_simplified_values_by_position() {
        let g = rect(0.4, 0.4);
        for (position, expected) in [
            (ColumnPosition::Interior, 1.15),
            (ColumnPosition::Edge, 1.40),
            (ColumnPosition::Corner, 1.50),
        ] {
            let beta = beta_factor(
                &g,
                position,
                BetaMethod::Simplified,
                0.22,
                g.u1(position, 0.22),
                600_000.0,
                10_000.0,
                0.0,
            );
            assert_eq!(beta.value, expected);
            assert_eq!(beta.branch, BetaBranch::Simplified);
        }
    }

    #[test]
    fn test_simplified_independent_of_moment_magnitude() {
        let g = rect(0.4, 0.4);
        for m in [1.0, 50_000.0, 5_000_000.0] {
            let beta = beta_factor(
                &g,
                ColumnPosition::Edge,
                BetaMethod::Simplified,
                0.22,
                g.u1(ColumnPosition::Edge, 0.22),
                600_000.0,
                m,
                m,
            );
            assert_eq!(beta.value, 1.40);
        }
    }

    #[test]
    fn test_computed_rectangular_edge() {
        // c1/c2 = 1.5 -> k ~ 0.65; moment about y drives the edge term
        let g = rect(0.45, 0.30);
        let u1 = g.u1(ColumnPosition::Edge, 0.22);
        let beta = beta_factor(
            &g,
            ColumnPosition::Edge,
            BetaMethod::Computed,
            0.22,
            u1,
            600_000.0,
            0.0,
            30_000.0,
        );
        assert!((beta.k_coefficient.unwrap() - 0.65).abs() < 1e-3);
        assert!(beta.value > 1.0);
        match beta.branch {
            BetaBranch::Computed {
                case,
                perimeter_ratio,
                eccentricity_m,
                ..
            } => {
                assert_eq!(case, ComputedCase::RectangularEdge);
                assert!(perimeter_ratio.unwrap() > 1.0);
                assert_relative_eq!(eccentricity_m, 0.05, epsilon = 1e-12);
            }
            other => panic!("unexpected branch: {other:?}"),
        }
    }

    #[test]
    fn test_computed_corner_uses_both_eccentricities() {
        let g = rect(0.40, 0.40);
        let u1 = g.u1(ColumnPosition::Corner, 0.22);
        let beta = beta_factor(
            &g,
            ColumnPosition::Corner,
            BetaMethod::Computed,
            0.22,
            u1,
            600_000.0,
            30_000.0,
            30_000.0,
        );
        match beta.branch {
            BetaBranch::Computed { eccentricity_m, .. } => {
                assert_relative_eq!(eccentricity_m, 0.10, epsilon = 1e-12);
            }
            other => panic!("unexpected branch: {other:?}"),
        }
    }

    #[test]
    fn test_computed_circular_always_at_least_unity() {
        let g = ColumnGeometry::Circular { diameter_m: 0.40 };
        for position in ColumnPosition::ALL {
            let u1 = g.u1(position, 0.22);
            let beta = beta_factor(
                &g,
                position,
                BetaMethod::Computed,
                0.22,
                u1,
                600_000.0,
                20_000.0,
                15_000.0,
            );
            assert!(beta.value >= 1.0, "beta < 1 at {position}");
            assert!(beta.k_coefficient.is_some());
        }
    }

    #[test]
    fn test_computed_rectangular_interior_is_provisional() {
        let g = rect(0.40, 0.40);
        let u1 = g.u1(ColumnPosition::Interior, 0.22);
        let beta = beta_factor(
            &g,
            ColumnPosition::Interior,
            BetaMethod::Computed,
            0.22,
            u1,
            600_000.0,
            10_000.0,
            5_000.0,
        );
        assert_eq!(beta.value, 1.15);
        assert_eq!(beta.branch, BetaBranch::Provisional);
        assert!(beta.k_coefficient.is_none());
    }

    #[test]
    fn test_serialization() {
        let g = rect(0.45, 0.30);
        let u1 = g.u1(ColumnPosition::Edge, 0.22);
        let beta = beta_factor(
            &g,
            ColumnPosition::Edge,
            BetaMethod::Computed,
            0.22,
            u1,
            600_000.0,
            0.0,
            30_000.0,
        );
        let json = serde_json::to_string(&beta).unwrap();
        let roundtrip: BetaFactor = serde_json::from_str(&json).unwrap();
        assert_eq!(beta, roundtrip);
    }
}
