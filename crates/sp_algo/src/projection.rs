//! District projector.
//!
//! Contract:
//! - `baseline[p] = Σ_d population[d]·share[d,p] / Σ_d population[d]`
//! - `projected[d,p] = share[d,p] / baseline[p] · target[p]`
//! - A district whose projected row sums above 100 is scaled by `100 / rowSum`
//!   (proportional shrink; individual values are never clamped).
//! - A zero baseline is a typed error, never an infinite or NaN ratio.

use sp_core::BaselineTable;

use crate::{check_len, AlgoError};

/// Projected shares per district (table order) and the baseline they came from.
#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    /// Population-weighted national baseline share per party.
    pub baseline: Vec<f64>,
    /// `shares[d][p]`, percent, after overflow correction.
    pub shares: Vec<Vec<f64>>,
}

/// Population-weighted national baseline share per roster party.
pub fn national_baseline(table: &BaselineTable) -> Result<Vec<f64>, AlgoError> {
    let total_pop = table.total_population();
    if total_pop == 0 {
        return Err(AlgoError::ZeroPopulation);
    }
    let n = table.roster().len();
    let mut weighted = vec![0.0_f64; n];
    for d in table.districts() {
        check_len("baseline shares", n, d.shares.len())?;
        let pop = d.population as f64;
        for (acc, &s) in weighted.iter_mut().zip(&d.shares) {
            *acc += pop * s;
        }
    }
    let total = total_pop as f64;
    Ok(weighted.into_iter().map(|w| w / total).collect())
}

/// Project every district onto the national targets.
pub fn project_districts(table: &BaselineTable, targets: &[f64]) -> Result<Projection, AlgoError> {
    let roster = table.roster();
    check_len("national targets", roster.len(), targets.len())?;

    let baseline = national_baseline(table)?;
    if let Some(p) = baseline.iter().position(|&b| b == 0.0 || !b.is_finite()) {
        return Err(AlgoError::ZeroBaseline { party: roster.name(p).to_string() });
    }

    let shares = table
        .districts()
        .iter()
        .map(|d| {
            let mut row: Vec<f64> = d
                .shares
                .iter()
                .zip(&baseline)
                .zip(targets)
                .map(|((&share, &base), &target)| share / base * target)
                .collect();
            correct_overflow(&mut row);
            row
        })
        .collect();

    Ok(Projection { baseline, shares })
}

/// Scale a row down to 100 when it sums above 100.
fn correct_overflow(row: &mut [f64]) {
    let sum: f64 = row.iter().sum();
    if sum > 100.0 {
        let scale = 100.0 / sum;
        for v in row.iter_mut() {
            *v *= scale;
        }
    }
}
