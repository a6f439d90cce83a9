use crate::{BoundaryPolicy, Chance, Count, Lottery, Result};

/// Chance that the separator at rank `position` wins against
/// `adversaries` black balls among `total`.
///
/// Fails when `adversaries >= total` or `position` is outside `1..=total`.
/// With no adversaries the product is empty and the chance is `0`.
pub fn single_trial_win_chance(
    total: Count,
    adversaries: Count,
    position: Count,
    policy: BoundaryPolicy,
) -> Result<Chance> {
    Lottery::new(total, adversaries)?
        .with_policy(policy)
        .win_chance(position)
}

/// Mean of [`single_trial_win_chance`] over every separator rank `1..=total`.
pub fn average_win_chance(
    total: Count,
    adversaries: Count,
    policy: BoundaryPolicy,
) -> Result<Chance> {
    Ok(Lottery::new(total, adversaries)?
        .with_policy(policy)
        .average_win_chance())
}

/// Per-rank win chances, index `i` holding rank `i + 1`.
pub fn win_chances(
    total: Count,
    adversaries: Count,
    policy: BoundaryPolicy,
) -> Result<Vec<Chance>> {
    Ok(Lottery::new(total, adversaries)?
        .with_policy(policy)
        .win_chances())
}

/// `position` must already be checked against `lottery`.
pub(crate) fn win_chance(lottery: &Lottery, position: Count) -> Chance {
    let n = lottery.total();
    let k = lottery.adversaries();
    let policy = lottery.policy();

    if policy.clamps_before(k, position) {
        return 1.0;
    }

    let mut value = 1.0;
    for j in 1..=k {
        if policy.clamps_at(j, position) {
            return 1.0;
        }
        // position > j here under either policy, n > k >= j by construction
        value *= (position - j) as f64 / (n - j) as f64;
    }
    1.0 - value
}

pub(crate) fn mean(values: &[Chance]) -> Chance {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<Chance>() / values.len() as f64
}
