// crates/sp_algo/src/allocation/mixed.rs
//
// National list apportionment for the mixed system:
// - eligibility: target share ≥ threshold AND not the independent party,
// - seat pool = total seats − Σ fixed seats (rejected when negative),
// - D’Hondt over the pool among eligible parties,
// - list mandates = D’Hondt seats + fixed seats, for every party.
//
// Determinism: no RNG; ties resolved inside `allocate_dhondt`.

use sp_core::{Params, PartyRoster, TieOrder};

use super::dhondt::allocate_dhondt;
use crate::{check_len, AlgoError};

/// Outcome of the list apportionment, roster-aligned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListApportionment {
    pub eligible: Vec<bool>,
    pub seat_pool: u32,
    /// Seats won in the D’Hondt loop only.
    pub dhondt_seats: Vec<u32>,
    /// `dhondt_seats + fixed_seats`.
    pub list_mandates: Vec<u32>,
}

/// Run the list apportionment. `targets`, `weights` and `fixed_seats` are roster-aligned.
pub fn apportion_list(
    params: &Params,
    roster: &PartyRoster,
    targets: &[f64],
    weights: &[u64],
    fixed_seats: &[u32],
    tie: &TieOrder,
) -> Result<ListApportionment, AlgoError> {
    let n = roster.len();
    check_len("national targets", n, targets.len())?;
    check_len("list weights", n, weights.len())?;
    check_len("fixed seats", n, fixed_seats.len())?;

    let fixed: u64 = fixed_seats.iter().map(|&s| u64::from(s)).sum();
    if fixed > u64::from(params.total_seats) {
        return Err(AlgoError::FixedSeatsExceedTotal { fixed, total: params.total_seats });
    }
    let seat_pool = params.total_seats - fixed as u32;

    let eligible: Vec<bool> = roster
        .iter()
        .map(|(i, name)| params.is_list_eligible(name, targets[i]))
        .collect();
    if !eligible.iter().any(|&e| e) {
        return Err(AlgoError::NoEligibleParties);
    }

    let dhondt_seats = allocate_dhondt(seat_pool, weights, &eligible, tie)?;
    let list_mandates = dhondt_seats.iter().zip(fixed_seats).map(|(&d, &f)| d + f).collect();

    Ok(ListApportionment { eligible, seat_pool, dhondt_seats, list_mandates })
}
