//! Partitioning of parlay legs into event groups.
//!
//! Legs that reference the same underlying event are simulated jointly;
//! legs on different events are treated as independent. Legs without an
//! event identifier each get a key unique to their input position so they
//! are never merged with one another.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use parlay_core::types::Leg;

/// Key prefix for legs without an event identifier.
pub const SOLO_KEY_PREFIX: &str = "__solo_";

/// Legs sharing one event, in canonical order.
#[derive(Clone, Debug, PartialEq)]
pub struct EventGroup {
    /// Group key: trimmed event id, or a positional solo key.
    pub key: String,
    /// Member legs sorted by [`canonical_cmp`].
    pub legs: Vec<Leg>,
}

impl EventGroup {
    /// Number of legs in the group.
    pub fn len(&self) -> usize {
        self.legs.len()
    }

    /// Returns `true` if the group has no legs.
    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Marginal probabilities in canonical order.
    pub fn marginals(&self) -> Vec<f64> {
        self.legs.iter().map(|leg| leg.probability).collect()
    }
}

/// Derives the group key for the leg at `index` in the input list.
///
/// # Examples
///
/// ```rust
/// use parlay_core::types::Leg;
/// use parlay_pricing::grouping::group_key;
///
/// let leg = Leg::new(" G1 ", "m", "total", "over", 0.5);
/// assert_eq!(group_key(&leg, 4), "G1");
///
/// let orphan = Leg::new("", "m", "total", "over", 0.5);
/// assert_eq!(group_key(&orphan, 4), "__solo_4");
/// ```
pub fn group_key(leg: &Leg, index: usize) -> String {
    match leg.event_key() {
        Some(event) => event.to_string(),
        None => format!("{SOLO_KEY_PREFIX}{index}"),
    }
}

/// Canonical leg ordering: `(event_id, market_identifier, market_type, outcome)`,
/// with the probability as a final total-order tie-break.
pub fn canonical_cmp(a: &Leg, b: &Leg) -> Ordering {
    (&a.event_id, &a.market_identifier, &a.market_type, &a.outcome)
        .cmp(&(&b.event_id, &b.market_identifier, &b.market_type, &b.outcome))
        .then_with(|| a.probability.total_cmp(&b.probability))
}

/// Groups legs by event, sorting each group canonically.
///
/// Groups are returned ordered by key.
///
/// # Examples
///
/// ```rust
/// use parlay_core::types::Leg;
/// use parlay_pricing::grouping::group_legs;
///
/// let legs = vec![
///     Leg::new("G1", "total", "total", "over", 0.5),
///     Leg::new("G2", "ml", "moneyline", "home", 0.6),
///     Leg::new("G1", "ml", "moneyline", "away", 0.4),
/// ];
///
/// let groups = group_legs(&legs);
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].key, "G1");
/// assert_eq!(groups[0].legs[0].market_identifier, "ml");
/// ```
pub fn group_legs(legs: &[Leg]) -> Vec<EventGroup> {
    let mut buckets: BTreeMap<String, Vec<Leg>> = BTreeMap::new();
    for (index, leg) in legs.iter().enumerate() {
        buckets
            .entry(group_key(leg, index))
            .or_default()
            .push(leg.clone());
    }

    buckets
        .into_iter()
        .map(|(key, mut legs)| {
            legs.sort_by(canonical_cmp);
            EventGroup { key, legs }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leg(event: &str, market: &str, outcome: &str, p: f64) -> Leg {
        Leg::new(event, market, "moneyline", outcome, p)
    }

    #[test]
    fn test_empty_input() {
        assert!(group_legs(&[]).is_empty());
    }

    #[test]
    fn test_blank_events_never_merge() {
        let legs = vec![leg("", "a", "x", 0.5), leg("  ", "a", "x", 0.5)];
        let groups = group_legs(&legs);
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.len() == 1));
        assert_eq!(groups[0].key, "__solo_0");
        assert_eq!(groups[1].key, "__solo_1");
    }

    #[test]
    fn test_whitespace_event_ids_share_group() {
        let legs = vec![leg("G1", "a", "x", 0.5), leg(" G1", "b", "y", 0.4)];
        let groups = group_legs(&legs);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "G1");
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn test_every_leg_in_exactly_one_group() {
        let legs = vec![
            leg("G1", "a", "x", 0.5),
            leg("", "b", "y", 0.4),
            leg("G2", "c", "z", 0.3),
            leg("G1", "d", "w", 0.2),
        ];
        let groups = group_legs(&legs);
        let total: usize = groups.iter().map(EventGroup::len).sum();
        assert_eq!(total, legs.len());
        assert!(groups.iter().all(|g| !g.is_empty()));
    }

    #[test]
    fn test_group_contents_are_permutation_invariant() {
        let legs = vec![
            leg("G1", "spread", "home", 0.5),
            leg("G1", "ml", "home", 0.6),
            leg("G2", "total", "over", 0.55),
            leg("G1", "total", "under", 0.45),
        ];
        let mut reversed = legs.clone();
        reversed.reverse();

        assert_eq!(group_legs(&legs), group_legs(&reversed));
    }

    #[test]
    fn test_canonical_tie_break_on_probability() {
        let a = leg("G1", "m", "x", 0.3);
        let b = leg("G1", "m", "x", 0.7);
        assert_eq!(canonical_cmp(&a, &b), Ordering::Less);
        assert_eq!(canonical_cmp(&b, &a), Ordering::Greater);

        let groups = group_legs(&[b.clone(), a.clone()]);
        assert_eq!(groups[0].marginals(), vec![0.3, 0.7]);
    }
}
