//! # Verification Calculations
//!
//! This module contains the verification calculation types. Each calculation
//! follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate(input) -> Result<*Result, CalcError>` - Pure calculation function
//!
//! ## Available Calculations
//!
//! - [`punching`] - Punching-shear verification of flat slabs (EN 1992-1-1 §6.4)

pub mod punching;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use punching::{CheckOutcome, PunchingInput, PunchingResult, ReinforcementDesign};

/// Enum wrapper for all calculation types.
///
/// This allows storing heterogeneous calculations in a single collection
/// while maintaining type safety and clean serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationItem {
    /// Punching-shear verification of a flat slab at a column
    Punching(PunchingInput),
}

impl CalculationItem {
    /// Get the user-provided label for this calculation
    pub fn label(&self) -> &str {
        match self {
            CalculationItem::Punching(p) => &p.label,
        }
    }

    /// Get the calculation type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationItem::Punching(_) => "Punching",
        }
    }
}
