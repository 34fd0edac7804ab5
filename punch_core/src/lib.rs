//! # punch_core - Punching-Shear Verification Engine
//!
//! `punch_core` verifies reinforced-concrete flat slabs against punching
//! shear at columns per EN 1992-1-1 §6.4. Given slab depth, material
//! strengths, column geometry/position, applied shear and moments, and the
//! flexural reinforcement, it determines critical perimeters, the
//! eccentricity factor β, the concrete resistance, and, when the concrete
//! alone is insufficient, sizes punching shear reinforcement and estimates
//! its radial layout. Every run produces both queryable numeric results and
//! a sequential human-readable report.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Verdicts, not exceptions**: design failures (strut crushing,
//!   demand beyond the reinforced maximum) are reported outcomes, never
//!   errors
//!
//! ## Quick Start
//!
//! ```rust
//! use punch_core::calculations::punching::{calculate, PunchingInput};
//! use punch_core::geometry::{ColumnGeometry, ColumnPosition};
//! use punch_core::materials::{Concrete, ReinforcingSteel};
//! use punch_core::beta::BetaMethod;
//!
//! let input = PunchingInput {
//!     label: "P-1".to_string(),
//!     d_m: 0.220,
//!     as_lx_cm2pm: Some(8.80),
//!     as_ly_cm2pm: Some(8.80),
//!     rho_l: None,
//!     concrete: Concrete::new(30.0),
//!     flexural_steel: ReinforcingSteel::new(500.0),
//!     shear_steel: ReinforcingSteel::new(500.0),
//!     geometry: ColumnGeometry::Rectangular { c1_m: 0.40, c2_m: 0.40 },
//!     position: ColumnPosition::Interior,
//!     v_ed_n: 600_000.0,
//!     m_edx_nm: 0.0,
//!     m_edy_nm: 0.0,
//!     sigma_cp_mpa: 0.0,
//!     is_footing: false,
//!     soil_pressure_pa: 0.0,
//!     u1_ineffective_m: 0.0,
//!     beta_method: BetaMethod::Simplified,
//! };
//!
//! let result = calculate(&input).unwrap();
//! assert!(result.v_rd_c_mpa > 0.0);
//! println!("{}", result.report_text());
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - The punching-shear verification pipeline
//! - [`geometry`] - Column shapes, positions and critical perimeters
//! - [`beta`] - Eccentricity factor strategies
//! - [`materials`] - Concrete and steel design values
//! - [`report`] - Ordered report buffer and formatting contract
//! - [`project`] - Project container and metadata
//! - [`units`] - Type-safe unit wrappers for boundary conversions
//! - [`errors`] - Structured error types

pub mod beta;
pub mod calculations;
pub mod errors;
pub mod geometry;
pub mod materials;
pub mod project;
pub mod report;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::punching::{calculate, CheckOutcome, PunchingInput, PunchingResult};
pub use errors::{CalcError, CalcResult};
pub use project::{Project, ProjectMetadata};
