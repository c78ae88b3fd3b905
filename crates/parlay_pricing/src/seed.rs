//! Deterministic simulation seeds.
//!
//! Each correlated group is simulated with a generator seeded from the
//! group's content, so pricing the same parlay twice, in any leg order,
//! replays the same draws.

use parlay_core::types::{Leg, RiskProfile};
use sha2::{Digest, Sha256};

/// Derives a 32-bit seed from the risk profile, group key and legs.
///
/// Each leg contributes `market_identifier|market_type|outcome|event_id`.
/// The per-leg strings are sorted, joined with `;` and prefixed with
/// `profile:group_key:`. The seed is the first four bytes of the SHA-256
/// digest read big-endian.
///
/// # Examples
///
/// ```rust
/// use parlay_core::types::{Leg, RiskProfile};
/// use parlay_pricing::seed::derive_seed;
///
/// let a = Leg::new("G1", "ml", "moneyline", "home", 0.6);
/// let b = Leg::new("G1", "tot", "total", "over", 0.5);
///
/// let s1 = derive_seed(RiskProfile::Balanced, "G1", &[a.clone(), b.clone()]);
/// let s2 = derive_seed(RiskProfile::Balanced, "G1", &[b, a]);
/// assert_eq!(s1, s2);
/// ```
pub fn derive_seed(profile: RiskProfile, group_key: &str, legs: &[Leg]) -> u32 {
    let digest = Sha256::digest(seed_material(profile, group_key, legs).as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Returns the canonical string hashed by [`derive_seed`].
pub fn seed_material(profile: RiskProfile, group_key: &str, legs: &[Leg]) -> String {
    let mut parts: Vec<String> = legs
        .iter()
        .map(|leg| {
            format!(
                "{}|{}|{}|{}",
                leg.market_identifier, leg.market_type, leg.outcome, leg.event_id
            )
        })
        .collect();
    parts.sort_unstable();

    format!("{}:{}:{}", profile.label(), group_key, parts.join(";"))
}
