use std::fmt::{self, Display};
use std::str::FromStr;

use crate::Count;

/// Boundary rule applied on top of the survival product
/// `prod_{j=1}^{k} (m - j) / (n - j)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BoundaryPolicy {
    /// Front-run rule: clamp to a certain win at the first step whose
    /// numerator `m - j` is exactly zero.
    ClampOnFirstZero,
    /// Rand-black-balls rule: clamp to a certain win up front when
    /// `m <= k`, then run the product with no check inside the loop.
    #[default]
    ClampOnPositionLeCount,
}

impl BoundaryPolicy {
    pub const ALL: [BoundaryPolicy; 2] = [
        BoundaryPolicy::ClampOnFirstZero,
        BoundaryPolicy::ClampOnPositionLeCount,
    ];

    #[inline]
    pub(crate) fn clamps_before(self, adversaries: Count, position: Count) -> bool {
        match self {
            BoundaryPolicy::ClampOnFirstZero => false,
            BoundaryPolicy::ClampOnPositionLeCount => position <= adversaries,
        }
    }

    #[inline]
    pub(crate) fn clamps_at(self, step: Count, position: Count) -> bool {
        match self {
            BoundaryPolicy::ClampOnFirstZero => position == step,
            BoundaryPolicy::ClampOnPositionLeCount => false,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BoundaryPolicy::ClampOnFirstZero => "clamp-on-first-zero",
            BoundaryPolicy::ClampOnPositionLeCount => "clamp-on-position-le-count",
        }
    }
}

impl Display for BoundaryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown boundary policy: {0}")]
pub struct UnknownPolicy(String);

impl FromStr for BoundaryPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clamp-on-first-zero" | "front-run" => Ok(BoundaryPolicy::ClampOnFirstZero),
            "clamp-on-position-le-count" | "rand-black-balls" => {
                Ok(BoundaryPolicy::ClampOnPositionLeCount)
            }
            _ => Err(UnknownPolicy(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_names_and_aliases() {
        for policy in BoundaryPolicy::ALL {
            assert_eq!(policy.name().parse::<BoundaryPolicy>(), Ok(policy));
        }
        assert_eq!(
            "front-run".parse::<BoundaryPolicy>(),
            Ok(BoundaryPolicy::ClampOnFirstZero)
        );
        assert_eq!(
            "rand-black-balls".parse::<BoundaryPolicy>(),
            Ok(BoundaryPolicy::ClampOnPositionLeCount)
        );
        assert!("clamp".parse::<BoundaryPolicy>().is_err());
    }
}
