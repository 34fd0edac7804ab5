//! # Project Data Structures
//!
//! The `Project` struct is the root container for verification data:
//! job metadata plus the set of punching checks belonging to the job.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, engineer, job info, timestamps)
//! └── items: HashMap<Uuid, CalculationItem> (all verifications)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use punch_core::project::Project;
//!
//! let project = Project::new("Jane Engineer", "25-042", "ACME Corp");
//!
//! // Serialize to JSON
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::CalculationItem;

/// Current schema version for serialized projects
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
///
/// Items are stored in a flat UUID-keyed map for O(1) lookups and stable
/// references when items are relabeled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project metadata (version, engineer, job info)
    pub meta: ProjectMetadata,

    /// All verification items, keyed by UUID
    pub items: HashMap<Uuid, CalculationItem>,
}

impl Project {
    /// Create a new empty project.
    ///
    /// # Arguments
    ///
    /// * `engineer` - Name of the responsible engineer
    /// * `job_id` - Job/project number (e.g., "25-001")
    /// * `client` - Client name
    pub fn new(
        engineer: impl Into<String>,
        job_id: impl Into<String>,
        client: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            items: HashMap::new(),
        }
    }

    /// Add a verification item to the project.
    ///
    /// Returns the UUID assigned to the item.
    pub fn add_item(&mut self, item: CalculationItem) -> Uuid {
        let id = Uuid::new_v4();
        self.items.insert(id, item);
        self.touch();
        id
    }

    /// Remove a verification item by UUID.
    ///
    /// Returns the removed item if it existed.
    pub fn remove_item(&mut self, id: &Uuid) -> Option<CalculationItem> {
        let item = self.items.remove(id);
        if item.is_some() {
            self.touch();
        }
        item
    }

    /// Get a verification item by UUID.
    pub fn get_item(&self, id: &Uuid) -> Option<&CalculationItem> {
        self.items.get(id)
    }

    /// Update the modification timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

/// Project metadata: who, what job, and when.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version of the serialized form
    pub version: String,

    /// Responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Client name
    pub client: String,

    /// Creation timestamp (UTC)
    pub created: DateTime<Utc>,

    /// Last modification timestamp (UTC)
    pub modified: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beta::BetaMethod;
    use crate::geometry::{ColumnGeometry, ColumnPosition};
    use crate::materials::{Concrete, ReinforcingSteel};
    use crate::calculations::punching::PunchingInput;

    fn sample_check() -> CalculationItem {
        CalculationItem::Punching(PunchingInput {
            label: "P-1".to_string(),
            d_m: 0.220,
            as_lx_cm2pm: Some(8.80),
            as_ly_cm2pm: Some(8.80),
            rho_l: None,
            concrete: Concrete::new(30.0),
            flexural_steel: ReinforcingSteel::new(500.0),
            shear_steel: ReinforcingSteel::new(500.0),
            geometry: ColumnGeometry::Rectangular {
                c1_m: 0.40,
                c2_m: 0.40,
            },
            position: ColumnPosition::Interior,
            v_ed_n: 600_000.0,
            m_edx_nm: 0.0,
            m_edy_nm: 0.0,
            sigma_cp_mpa: 0.0,
            is_footing: false,
            soil_pressure_pa: 0.0,
            u1_ineffective_m: 0.0,
            beta_method: BetaMethod::Simplified,
        })
    }

    #[test]
    fn test_add_and_get_item() {
        let mut project = Project::new("Engineer", "25-001", "Client");
        let id = project.add_item(sample_check());
        assert!(project.items.contains_key(&id));
        assert_eq!(project.get_item(&id).unwrap().label(), "P-1");
        assert_eq!(project.get_item(&id).unwrap().calc_type(), "Punching");
    }

    #[test]
    fn test_remove_item() {
        let mut project = Project::new("Engineer", "25-001", "Client");
        let id = project.add_item(sample_check());
        assert!(project.remove_item(&id).is_some());
        assert!(project.items.is_empty());
    }

    #[test]
    fn test_serialization() {
        let mut project = Project::new("Engineer", "25-001", "Client");
        project.add_item(sample_check());
        let json = serde_json::to_string_pretty(&project).unwrap();
        let roundtrip: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.meta.engineer, "Engineer");
        assert_eq!(roundtrip.items.len(), 1);
    }
}
