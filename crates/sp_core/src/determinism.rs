//! Determinism utilities: a stable total order over roster parties.
//!
//! I/O-free. Every tie in the engine (district winner, equal D'Hondt
//! quotients) is broken through [`TieOrder`], so identical inputs always give
//! identical outputs regardless of platform or hash seeds.

use core::cmp::Ordering;

use crate::entities::PartyRoster;
use crate::variables::TiePolicy;

/* -------------------------------------------------------------------------- */
/*                                  Tie order                                 */
/* -------------------------------------------------------------------------- */

/// Precomputed rank per roster index; lower rank wins a tie.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TieOrder {
    rank: Vec<usize>,
}

impl TieOrder {
    pub fn new(policy: TiePolicy, roster: &PartyRoster) -> Self {
        let mut idx: Vec<usize> = (0..roster.len()).collect();
        if policy == TiePolicy::Alphabetical {
            idx.sort_by(|&a, &b| {
                roster.name(a).as_str().cmp(roster.name(b).as_str()).then(a.cmp(&b))
            });
        }
        let mut rank = vec![0; roster.len()];
        for (r, i) in idx.into_iter().enumerate() {
            rank[i] = r;
        }
        Self { rank }
    }

    /// Rank of roster index `i` (0 = strongest claim on a tie).
    #[inline]
    pub fn rank(&self, i: usize) -> usize { self.rank[i] }

    /// `Less` when `a` is preferred over `b`.
    #[inline]
    pub fn cmp(&self, a: usize, b: usize) -> Ordering {
        self.rank[a].cmp(&self.rank[b])
    }

    #[inline]
    pub fn prefers(&self, a: usize, b: usize) -> bool {
        self.cmp(a, b) == Ordering::Less
    }
}

/* ---------------------------------- Tests --------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::PartyName;

    fn roster(names: &[&str]) -> PartyRoster {
        PartyRoster::new(names.iter().map(|s| s.parse::<PartyName>().unwrap()).collect()).unwrap()
    }

    #[test]
    fn alphabetical_ranks_by_name() {
        let r = roster(&["Tisza", "Fidesz", "DK"]);
        let t = TieOrder::new(TiePolicy::Alphabetical, &r);
        assert_eq!((t.rank(0), t.rank(1), t.rank(2)), (2, 1, 0));
        assert!(t.prefers(2, 0));
    }

    #[test]
    fn table_order_ranks_by_column() {
        let r = roster(&["Tisza", "Fidesz", "DK"]);
        let t = TieOrder::new(TiePolicy::TableOrder, &r);
        assert_eq!((t.rank(0), t.rank(1), t.rank(2)), (0, 1, 2));
        assert!(t.prefers(0, 2));
        assert_eq!(t.cmp(1, 1), Ordering::Equal);
    }
}
