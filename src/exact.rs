//! Exact rational evaluation of the win chance.
//!
//! Runs the same recurrence and boundary policy as the float engine over
//! [`BigRational`], for small lotteries and cross-checks.

use num::traits::{One, Zero};
use num::{BigInt, BigRational, ToPrimitive};

use crate::{Count, Lottery, Result};

pub fn win_chance(lottery: &Lottery, position: Count) -> Result<BigRational> {
    let position = lottery.check_position(position)?;
    Ok(win_chance_unchecked(lottery, position))
}

pub fn average_win_chance(lottery: &Lottery) -> BigRational {
    let sum = lottery
        .positions()
        .map(|m| win_chance_unchecked(lottery, m))
        .fold(BigRational::zero(), |acc, x| acc + x);
    sum / ratio(lottery.total(), 1)
}

/// Lossy conversion; `None` only when the value does not fit an `f64`.
pub fn to_f64(value: &BigRational) -> Option<f64> {
    value.to_f64()
}

fn win_chance_unchecked(lottery: &Lottery, position: Count) -> BigRational {
    let n = lottery.total();
    let k = lottery.adversaries();
    let policy = lottery.policy();

    if policy.clamps_before(k, position) {
        return BigRational::one();
    }

    let mut value = BigRational::one();
    for j in 1..=k {
        if policy.clamps_at(j, position) {
            return BigRational::one();
        }
        value *= ratio(position - j, n - j);
    }
    BigRational::one() - value
}

fn ratio(numer: Count, denom: Count) -> BigRational {
    BigRational::new(BigInt::from(numer), BigInt::from(denom))
}
