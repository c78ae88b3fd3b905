//! # Random Number Generation
//!
//! Seeded normal variates for copula simulations. Every generator is built
//! from a group seed; there is no process-wide generator, and draws write
//! into caller-owned buffers.
//!
//! ## Usage Example
//!
//! ```rust
//! use parlay_pricing::rng::SimulationRng;
//!
//! let mut rng = SimulationRng::for_group(12345);
//! let mut buffer = vec![0.0; 4];
//! rng.fill_normal(&mut buffer);
//! ```

mod prng;

pub use prng::SimulationRng;

#[cfg(test)]
mod tests;
