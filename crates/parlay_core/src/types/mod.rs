//! Wager data model and error types.
//!
//! This module provides:
//! - `leg`: The immutable [`Leg`] input record
//! - `probability`: Probability extraction from loosely typed leg records
//! - `profile`: [`RiskProfile`] labels selecting the simulation budget
//! - `error`: Structured error types for the engine edges
//!
//! # Re-exports
//!
//! For convenience, commonly used types are re-exported at this module level.

pub mod error;
pub mod leg;
pub mod probability;
pub mod profile;

pub use error::{PricingError, ProfileError};
pub use leg::Leg;
pub use probability::{clamp_probability, extract_probability};
pub use profile::RiskProfile;
