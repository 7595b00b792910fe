//! D’Hondt (highest averages) allocation over the national list pool.
//!
//! Contract:
//! - Allocate `seats` sequentially, each to the eligible party with the largest
//!   `weight / (seats_so_far + 1)`.
//! - Ties: fewer seats so far first, then the run's `TieOrder`.
//! - Pure integers; no division in comparisons (cross-multiply in u128).
//! - Ineligible parties always end with 0 seats.

use core::cmp::Ordering;

use sp_core::TieOrder;

use crate::{check_len, AlgoError};

/// Allocate `seats` among `eligible` parties by list weight.
///
/// Returns one seat count per roster party. With `seats == 0` every count is 0.
pub fn allocate_dhondt(
    seats: u32,
    weights: &[u64],
    eligible: &[bool],
    tie: &TieOrder,
) -> Result<Vec<u32>, AlgoError> {
    check_len("eligibility flags", weights.len(), eligible.len())?;
    let mut alloc = vec![0u32; weights.len()];
    if seats == 0 {
        return Ok(alloc);
    }
    if !eligible.iter().any(|&e| e) {
        return Err(AlgoError::NoEligibleParties);
    }

    for _round in 0..seats {
        let winner = next_award(&alloc, weights, eligible, tie);
        alloc[winner] += 1;
    }
    Ok(alloc)
}

/// Argmax of `w / (s + 1)` across eligible parties; ties per the contract above.
fn next_award(seats_so_far: &[u32], weights: &[u64], eligible: &[bool], tie: &TieOrder) -> usize {
    let mut best: Option<usize> = None;
    for i in (0..weights.len()).filter(|&i| eligible[i]) {
        let Some(b) = best else {
            best = Some(i);
            continue;
        };
        let ord = cmp_quotients(weights[i], seats_so_far[i], weights[b], seats_so_far[b])
            .then_with(|| seats_so_far[b].cmp(&seats_so_far[i]))
            .then_with(|| tie.cmp(b, i));
        if ord == Ordering::Greater {
            best = Some(i);
        }
    }
    // Callers guarantee at least one eligible party.
    best.unwrap_or(0)
}

/// Compare D’Hondt quotients v_a/(s_a+1) vs v_b/(s_b+1) without floats.
/// Returns Ordering::Greater if a's quotient is larger.
fn cmp_quotients(v_a: u64, s_a: u32, v_b: u64, s_b: u32) -> Ordering {
    let da = (s_a as u128) + 1;
    let db = (s_b as u128) + 1;
    let lhs = (v_a as u128) * db;
    let rhs = (v_b as u128) * da;
    lhs.cmp(&rhs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sp_core::{PartyName, PartyRoster, TiePolicy};

    fn tie(policy: TiePolicy, names: &[&str]) -> TieOrder {
        let r = PartyRoster::new(names.iter().map(|s| s.parse::<PartyName>().unwrap()).collect())
            .unwrap();
        TieOrder::new(policy, &r)
    }

    #[test]
    fn classic_dhondt_sequence() {
        let t = tie(TiePolicy::TableOrder, &["A", "B", "C"]);
        // 100k / 80k / 30k over 8 seats → 4 / 3 / 1
        let got = allocate_dhondt(8, &[100_000, 80_000, 30_000], &[true; 3], &t).unwrap();
        assert_eq!(got, vec![4, 3, 1]);
    }

    #[test]
    fn ten_seat_scenario_split() {
        let t = tie(TiePolicy::Alphabetical, &["X", "Y"]);
        let got = allocate_dhondt(10, &[1360, 1021], &[true, true], &t).unwrap();
        assert_eq!(got, vec![6, 4]);
    }

    #[test]
    fn ineligible_parties_get_nothing() {
        let t = tie(TiePolicy::TableOrder, &["A", "B", "C"]);
        let got = allocate_dhondt(5, &[10, 1_000_000, 10], &[true, false, true], &t).unwrap();
        assert_eq!(got[1], 0);
        assert_eq!(got.iter().sum::<u32>(), 5);
    }

    #[test]
    fn identical_weights_follow_tie_order() {
        let alpha = tie(TiePolicy::Alphabetical, &["Zeta", "Alfa"]);
        assert_eq!(allocate_dhondt(1, &[7, 7], &[true, true], &alpha).unwrap(), vec![0, 1]);
        let table = tie(TiePolicy::TableOrder, &["Zeta", "Alfa"]);
        assert_eq!(allocate_dhondt(1, &[7, 7], &[true, true], &table).unwrap(), vec![1, 0]);
    }

    #[test]
    fn equal_quotient_goes_to_party_with_fewer_seats() {
        // Seat 1: A (100). Seat 2: A 50 vs B 50, tie on quotient; B has fewer seats.
        let t = tie(TiePolicy::TableOrder, &["A", "B"]);
        assert_eq!(allocate_dhondt(2, &[100, 50], &[true, true], &t).unwrap(), vec![1, 1]);
    }

    #[test]
    fn zero_seats_and_no_eligible() {
        let t = tie(TiePolicy::TableOrder, &["A"]);
        assert_eq!(allocate_dhondt(0, &[5], &[false], &t).unwrap(), vec![0]);
        assert_eq!(
            allocate_dhondt(3, &[5], &[false], &t),
            Err(AlgoError::NoEligibleParties)
        );
    }

    #[test]
    fn quotient_compare_is_exact() {
        assert_eq!(cmp_quotients(u64::MAX, 0, u64::MAX, 0), Ordering::Equal);
        assert_eq!(cmp_quotients(3, 2, 2, 1), Ordering::Equal);
        assert_eq!(cmp_quotients(4, 2, 2, 1), Ordering::Greater);
    }
}
