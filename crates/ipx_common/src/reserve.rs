//! Interval reservation and overlap detection.
//!
//! A [`MemoryReserve`] collects named half-open `[start, end)` claims in
//! insertion order and reports every pair that intersects. Touching at a
//! boundary is not an overlap.

use serde::{Deserialize, Serialize};

/// A half-open address interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressRegion {
    /// First address inside the region.
    pub start: u64,
    /// First address past the region.
    pub end: u64,
}

impl AddressRegion {
    /// Creates a region from its bounds.
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Creates a region from a base and a size, saturating at `u64::MAX`.
    pub fn from_base_and_range(base: u64, range: u64) -> Self {
        Self {
            start: base,
            end: base.saturating_add(range),
        }
    }

    /// Returns the number of addresses covered.
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the region covers no addresses.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Returns `true` if this region lies inside `[0, parent_range)`.
    pub fn is_contained_in(&self, parent_range: u64) -> bool {
        self.end <= parent_range
    }
}

/// Returns `true` if two half-open intervals share at least one address.
pub fn overlaps(a: AddressRegion, b: AddressRegion) -> bool {
    a.start < b.end && b.start < a.end
}

/// One named claim in a [`MemoryReserve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    /// Name of the claiming item.
    pub name: String,
    /// Interval claimed.
    pub region: AddressRegion,
}

/// Ordered collection of named interval claims.
#[derive(Debug, Clone, Default)]
pub struct MemoryReserve {
    areas: Vec<Reservation>,
}

impl MemoryReserve {
    /// Creates an empty reserve.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a claim for `[start, end)`.
    pub fn add_area(&mut self, name: impl Into<String>, start: u64, end: u64) {
        self.areas.push(Reservation {
            name: name.into(),
            region: AddressRegion::new(start, end),
        });
    }

    /// Adds a claim for a prepared region.
    pub fn add_region(&mut self, name: impl Into<String>, region: AddressRegion) {
        self.areas.push(Reservation {
            name: name.into(),
            region,
        });
    }

    /// Returns the claims in insertion order.
    pub fn areas(&self) -> &[Reservation] {
        &self.areas
    }

    /// Returns `true` if no claims have been made.
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Returns `true` if any two claims overlap.
    pub fn has_overlap(&self) -> bool {
        self.first_overlap().is_some()
    }

    /// Returns the first overlapping pair in insertion order.
    pub fn first_overlap(&self) -> Option<(&str, &str)> {
        self.pairs().next()
    }

    /// Returns every overlapping pair as `(earlier, later)` names.
    pub fn overlapping_pairs(&self) -> Vec<(String, String)> {
        self.pairs()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect()
    }

    /// Returns the names of claims that extend past `[0, parent_range)`.
    pub fn uncontained(&self, parent_range: u64) -> Vec<&str> {
        self.areas
            .iter()
            .filter(|area| !area.region.is_contained_in(parent_range))
            .map(|area| area.name.as_str())
            .collect()
    }

    /// Returns the smallest region covering every claim.
    pub fn span(&self) -> Option<AddressRegion> {
        let start = self.areas.iter().map(|a| a.region.start).min()?;
        let end = self.areas.iter().map(|a| a.region.end).max()?;
        Some(AddressRegion::new(start, end))
    }

    /// Appends one message per overlapping pair to `errors`.
    ///
    /// Messages read `<kind> <a> and <b> overlap within <context>`.
    pub fn find_errors_in_overlap(&self, errors: &mut Vec<String>, kind: &str, context: &str) {
        for (a, b) in self.pairs() {
            errors.push(format!("{kind} {a} and {b} overlap within {context}"));
        }
    }

    fn pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.areas.iter().enumerate().flat_map(move |(i, a)| {
            self.areas[i + 1..]
                .iter()
                .filter(move |b| overlaps(a.region, b.region))
                .map(move |b| (a.name.as_str(), b.name.as_str()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(start: u64, end: u64) -> AddressRegion {
        AddressRegion::new(start, end)
    }

    #[test]
    fn touching_is_not_overlap() {
        assert!(!overlaps(region(0, 2), region(2, 4)));
        assert!(!overlaps(region(2, 4), region(0, 2)));
    }

    #[test]
    fn partial_overlap() {
        assert!(overlaps(region(5, 15), region(8, 18)));
        assert!(overlaps(region(8, 18), region(5, 15)));
    }

    #[test]
    fn nested_overlap() {
        assert!(overlaps(region(0, 100), region(10, 20)));
    }

    #[test]
    fn overlap_matches_definition_exhaustively() {
        for a in 0..6u64 {
            for b in a..6 {
                for c in 0..6u64 {
                    for d in c..6 {
                        assert_eq!(overlaps(region(a, b), region(c, d)), a < d && c < b);
                    }
                }
            }
        }
    }

    #[test]
    fn pairs_in_insertion_order() {
        let mut reserve = MemoryReserve::new();
        reserve.add_area("a", 0, 10);
        reserve.add_area("b", 20, 30);
        reserve.add_area("c", 5, 25);
        assert_eq!(
            reserve.overlapping_pairs(),
            vec![
                ("a".to_string(), "c".to_string()),
                ("b".to_string(), "c".to_string())
            ]
        );
        assert_eq!(reserve.first_overlap(), Some(("a", "c")));
        assert_eq!(reserve.areas()[0].name, "a");
    }

    #[test]
    fn no_overlap_for_adjacent_claims() {
        let mut reserve = MemoryReserve::new();
        reserve.add_area("low", 0, 0x1000);
        reserve.add_area("high", 0x1000, 0x2000);
        assert!(!reserve.has_overlap());
        assert_eq!(reserve.span(), Some(region(0, 0x2000)));
    }

    #[test]
    fn containment() {
        let mut reserve = MemoryReserve::new();
        reserve.add_region("inside", AddressRegion::from_base_and_range(0, 4));
        reserve.add_region("edge", AddressRegion::from_base_and_range(4, 4));
        reserve.add_region("outside", AddressRegion::from_base_and_range(6, 4));
        assert_eq!(reserve.uncontained(8), vec!["outside"]);
    }

    #[test]
    fn overlap_messages() {
        let mut reserve = MemoryReserve::new();
        reserve.add_area("r0", 0, 4);
        reserve.add_area("r1", 2, 6);
        let mut errors = Vec::new();
        reserve.find_errors_in_overlap(&mut errors, "Registers", "address block blk");
        assert_eq!(errors, vec!["Registers r0 and r1 overlap within address block blk"]);
    }

    #[test]
    fn empty_reserve() {
        let reserve = MemoryReserve::new();
        assert!(reserve.is_empty());
        assert!(!reserve.has_overlap());
        assert_eq!(reserve.span(), None);
    }

    #[test]
    fn region_helpers() {
        let r = AddressRegion::from_base_and_range(u64::MAX - 1, 10);
        assert_eq!(r.end, u64::MAX);
        assert_eq!(region(4, 10).len(), 6);
        assert!(region(4, 4).is_empty());
    }
}
