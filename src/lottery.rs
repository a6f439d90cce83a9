use std::ops::RangeInclusive;

use crate::engine;
use crate::{BoundaryPolicy, Chance, Count, Error, Result};

/// A validated buckets lottery: `total` balls, `adversaries` of them black,
/// one white separator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Lottery {
    total: Count,
    adversaries: Count,
    policy: BoundaryPolicy,
}

impl Lottery {
    pub fn new(total: Count, adversaries: Count) -> Result<Self> {
        if total == 0 {
            return Err(Error::Empty);
        }
        if adversaries >= total {
            return Err(Error::TooManyAdversaries { total, adversaries });
        }
        Ok(Self {
            total,
            adversaries,
            policy: BoundaryPolicy::default(),
        })
    }

    #[must_use]
    pub fn with_policy(self, policy: BoundaryPolicy) -> Self {
        Self { policy, ..self }
    }

    pub fn total(&self) -> Count {
        self.total
    }

    pub fn adversaries(&self) -> Count {
        self.adversaries
    }

    pub fn policy(&self) -> BoundaryPolicy {
        self.policy
    }

    pub fn positions(&self) -> RangeInclusive<Count> {
        1..=self.total
    }

    pub fn check_position(&self, position: Count) -> Result<Count> {
        if self.positions().contains(&position) {
            Ok(position)
        } else {
            Err(Error::PositionOutOfRange {
                total: self.total,
                position,
            })
        }
    }

    pub fn win_chance(&self, position: Count) -> Result<Chance> {
        let position = self.check_position(position)?;
        Ok(engine::win_chance(self, position))
    }

    pub fn loss_chance(&self, position: Count) -> Result<Chance> {
        self.win_chance(position).map(|x| 1.0 - x)
    }

    pub fn win_chances(&self) -> Vec<Chance> {
        self.positions()
            .map(|m| engine::win_chance(self, m))
            .collect()
    }

    pub fn average_win_chance(&self) -> Chance {
        engine::mean(&self.win_chances())
    }
}
