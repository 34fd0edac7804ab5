//! # Material Design Values
//!
//! Concrete and reinforcing-steel definitions with the design values
//! derived from them per EN 1992-1-1. Characteristic strengths and partial
//! safety factors are stored; everything else is a pure function of those.
//!
//! ## Example
//!
//! ```rust
//! use punch_core::materials::{Concrete, ReinforcingSteel};
//!
//! let concrete = Concrete::new(30.0);
//! assert_eq!(concrete.fcd(), 20.0); // 30 / 1.5
//!
//! let steel = ReinforcingSteel::new(500.0);
//! assert!((steel.fyd() - 434.78).abs() < 0.01); // 500 / 1.15
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Recommended partial safety factor for concrete (persistent/transient)
pub const DEFAULT_GAMMA_C: f64 = 1.5;

/// Recommended partial safety factor for reinforcing steel
pub const DEFAULT_GAMMA_S: f64 = 1.15;

fn default_gamma_c() -> f64 {
    DEFAULT_GAMMA_C
}

fn default_gamma_s() -> f64 {
    DEFAULT_GAMMA_S
}

/// Concrete material defined by its characteristic cylinder strength.
///
/// ## JSON Example
///
/// ```json
/// { "fck_mpa": 30.0, "gamma_c": 1.5 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Concrete {
    /// Characteristic compressive cylinder strength fck (MPa)
    pub fck_mpa: f64,

    /// Partial safety factor γC
    #[serde(default = "default_gamma_c")]
    pub gamma_c: f64,
}

impl Concrete {
    /// Create a concrete with the recommended γC = 1.5.
    pub fn new(fck_mpa: f64) -> Self {
        Concrete {
            fck_mpa,
            gamma_c: DEFAULT_GAMMA_C,
        }
    }

    /// Create a concrete with an explicit partial safety factor.
    pub fn with_gamma(fck_mpa: f64, gamma_c: f64) -> Self {
        Concrete { fck_mpa, gamma_c }
    }

    /// Validate strength and safety factor.
    pub fn validate(&self) -> CalcResult<()> {
        if self.fck_mpa <= 0.0 {
            return Err(CalcError::invalid_input(
                "fck_mpa",
                self.fck_mpa.to_string(),
                "Concrete strength must be positive",
            ));
        }
        if self.gamma_c <= 0.0 {
            return Err(CalcError::invalid_input(
                "gamma_c",
                self.gamma_c.to_string(),
                "Partial safety factor must be positive",
            ));
        }
        Ok(())
    }

    /// Design compressive strength fcd = fck / γC (MPa)
    pub fn fcd(&self) -> f64 {
        self.fck_mpa / self.gamma_c
    }

    /// Mean tensile strength fctm (MPa), Table 3.1.
    ///
    /// 0.30·fck^(2/3) up to fck = 50 MPa, logarithmic branch above.
    pub fn fctm(&self) -> f64 {
        if self.fck_mpa <= 50.0 {
            0.30 * self.fck_mpa.powf(2.0 / 3.0)
        } else {
            2.12 * (1.0 + (self.fck_mpa + 8.0) / 10.0).ln()
        }
    }

    /// 5% fractile tensile strength fctk,0.05 = 0.7·fctm (MPa)
    pub fn fctk_005(&self) -> f64 {
        0.7 * self.fctm()
    }

    /// Design tensile strength fctd = fctk,0.05 / γC (MPa)
    pub fn fctd(&self) -> f64 {
        self.fctk_005() / self.gamma_c
    }

    /// Strength reduction factor ν = 0.6·(1 − fck/250) for shear-cracked
    /// concrete (Eq. 6.6N)
    pub fn nu(&self) -> f64 {
        0.6 * (1.0 - self.fck_mpa / 250.0)
    }

    /// C_Rd,c = 0.18 / γC, the empirical punching coefficient of Eq. 6.47
    pub fn c_rd_c(&self) -> f64 {
        0.18 / self.gamma_c
    }

    /// Minimum shear resistance v_min = 0.035·k^1.5·√fck (MPa, Eq. 6.3N)
    /// for a given size-effect factor k.
    pub fn v_min(&self, k: f64) -> f64 {
        0.035 * k.powf(1.5) * self.fck_mpa.sqrt()
    }
}

/// Reinforcing steel defined by its characteristic yield strength.
///
/// Used both for the flexural reinforcement (fyk) and for the punching
/// shear reinforcement (fywk), each with its own instance.
///
/// ## JSON Example
///
/// ```json
/// { "fyk_mpa": 500.0, "gamma_s": 1.15 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReinforcingSteel {
    /// Characteristic yield strength fyk (MPa)
    pub fyk_mpa: f64,

    /// Partial safety factor γS
    #[serde(default = "default_gamma_s")]
    pub gamma_s: f64,
}

impl ReinforcingSteel {
    /// Create a steel with the recommended γS = 1.15.
    pub fn new(fyk_mpa: f64) -> Self {
        ReinforcingSteel {
            fyk_mpa,
            gamma_s: DEFAULT_GAMMA_S,
        }
    }

    /// Create a steel with an explicit partial safety factor.
    pub fn with_gamma(fyk_mpa: f64, gamma_s: f64) -> Self {
        ReinforcingSteel { fyk_mpa, gamma_s }
    }

    /// Validate strength and safety factor.
    pub fn validate(&self) -> CalcResult<()> {
        if self.fyk_mpa <= 0.0 {
            return Err(CalcError::invalid_input(
                "fyk_mpa",
                self.fyk_mpa.to_string(),
                "Steel yield strength must be positive",
            ));
        }
        if self.gamma_s <= 0.0 {
            return Err(CalcError::invalid_input(
                "gamma_s",
                self.gamma_s.to_string(),
                "Partial safety factor must be positive",
            ));
        }
        Ok(())
    }

    /// Design yield strength fyd = fyk / γS (MPa)
    pub fn fyd(&self) -> f64 {
        self.fyk_mpa / self.gamma_s
    }
}

/// Size-effect factor k = min(1 + √(200/d), 2.0) with d in millimeters
/// (Eq. 6.47 notation).
pub fn size_effect_factor(d_m: f64) -> f64 {
    (1.0 + (200.0 / (d_m * 1000.0)).sqrt()).min(2.0)
}
