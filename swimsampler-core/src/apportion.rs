//! Proportional apportionment with rounding correction.
//!
//! One routine serves both nesting levels of the sampler: distributing the
//! total sample across divisions (with a per-division floor), and
//! distributing a division's target across its selected teams (no floor,
//! roster sizes as capacities). Independent roundings at the two levels are
//! reconciled by the correction sweep so quotas still sum to the requested
//! total whenever that is feasible.

/// Result of one apportionment call.
///
/// `exact` is false when the inputs were infeasible (e.g. the floor times
/// the number of non-empty keys exceeds the total, or capacities are too
/// small) and the quotas are a best-effort closest fit instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Apportionment {
    /// Quota per key, aligned with the input weights.
    pub quotas: Vec<usize>,
    /// Whether the quotas sum exactly to the requested total.
    pub exact: bool,
}

impl Apportionment {
    pub fn assigned(&self) -> usize {
        self.quotas.iter().sum()
    }
}

/// Distribute `total` across keys proportionally to `weights`.
///
/// - Initial quotas are `round(total * weight / weight_sum)` using
///   `f64::round`, i.e. ties round away from zero: a key entitled to
///   exactly 2.5 starts at 3.
/// - Every key with a positive weight is then raised to `minimum`.
/// - Quotas are clamped to `capacities` when given (same length as
///   `weights`).
/// - The remaining difference is settled one unit at a time, sweeping keys
///   in descending weight order (ties keep input order): surplus demand goes
///   to the heaviest key still below capacity, excess is taken from the
///   heaviest key still above its floor. A sweep that changes nothing
///   terminates the loop — the inputs were infeasible and the current
///   quotas are returned with `exact = false`.
///
/// Zero-weight keys never receive a quota. An all-zero weight vector yields
/// all-zero quotas.
pub fn apportion(
    weights: &[usize],
    total: usize,
    minimum: usize,
    capacities: Option<&[usize]>,
) -> Apportionment {
    let n = weights.len();
    if let Some(caps) = capacities {
        assert_eq!(caps.len(), n, "capacities must align with weights");
    }

    let weight_sum: usize = weights.iter().sum();
    if weight_sum == 0 {
        return Apportionment {
            quotas: vec![0; n],
            exact: total == 0,
        };
    }

    let mut quotas: Vec<usize> = weights
        .iter()
        .map(|&w| ((total as f64 * w as f64) / weight_sum as f64).round() as usize)
        .collect();

    for (quota, &w) in quotas.iter_mut().zip(weights) {
        if w > 0 && *quota < minimum {
            *quota = minimum;
        }
    }

    if let Some(caps) = capacities {
        for (quota, &cap) in quotas.iter_mut().zip(caps) {
            *quota = (*quota).min(cap);
        }
    }

    // Largest population first; sort is stable, so equal weights keep their
    // input order.
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(weights[i]));

    let mut diff = total as i64 - quotas.iter().sum::<usize>() as i64;
    while diff != 0 {
        let mut changed = false;
        for &i in &order {
            if diff == 0 {
                break;
            }
            if diff > 0 {
                if weights[i] == 0 {
                    continue;
                }
                let cap = capacities.map_or(usize::MAX, |c| c[i]);
                if quotas[i] < cap {
                    quotas[i] += 1;
                    diff -= 1;
                    changed = true;
                }
            } else {
                let floor = if weights[i] > 0 { minimum } else { 0 };
                if quotas[i] > floor {
                    quotas[i] -= 1;
                    diff += 1;
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }

    Apportionment {
        quotas,
        exact: diff == 0,
    }
}
