//! Risk profile labels.
//!
//! The risk profile selects the Monte Carlo sample budget used for
//! correlated groups. Sample counts themselves live in the engine
//! configuration; this type only carries the label.
//!
//! # Examples
//!
//! ```
//! use parlay_core::types::RiskProfile;
//!
//! let profile: RiskProfile = "Balanced".parse().unwrap();
//! assert_eq!(profile, RiskProfile::Balanced);
//! assert_eq!(profile.label(), "balanced");
//! assert_eq!(RiskProfile::default(), RiskProfile::Balanced);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ProfileError;

/// Enumerated risk profiles.
///
/// # Variants
/// - `Conservative`: Largest sample budget, tightest estimates
/// - `Balanced`: Default budget
/// - `Degen`: Smallest budget, lowest latency
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskProfile {
    /// Largest sample budget.
    Conservative,
    /// Default sample budget.
    #[default]
    Balanced,
    /// Smallest sample budget.
    Degen,
}

impl RiskProfile {
    /// Returns the lowercase label used in seeds and configuration.
    pub fn label(&self) -> &'static str {
        match self {
            RiskProfile::Conservative => "conservative",
            RiskProfile::Balanced => "balanced",
            RiskProfile::Degen => "degen",
        }
    }

    /// Returns all profiles in declaration order.
    pub fn all() -> [RiskProfile; 3] {
        [
            RiskProfile::Conservative,
            RiskProfile::Balanced,
            RiskProfile::Degen,
        ]
    }
}

impl FromStr for RiskProfile {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "conservative" => Ok(RiskProfile::Conservative),
            "balanced" => Ok(RiskProfile::Balanced),
            "degen" => Ok(RiskProfile::Degen),
            _ => Err(ProfileError::Unknown(s.to_string())),
        }
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
