use thiserror::Error;

pub type Count = usize;
pub type Chance = f64;
pub type Result<T> = ::core::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum Error {
    #[error("lottery must contain at least one ball")]
    Empty,
    #[error("adversary count {adversaries} must be less than total {total}")]
    TooManyAdversaries { total: Count, adversaries: Count },
    #[error("separator position {position} outside 1..={total}")]
    PositionOutOfRange { total: Count, position: Count },
    #[error("ratio {0} outside (0, 1]")]
    InvalidRatio(f64),
}

#[inline]
pub(crate) fn check_ratio(value: f64) -> Result<f64> {
    if value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(Error::InvalidRatio(value))
    }
}

/// Truncating `fraction * total`, the way the sweep picks fixed positions.
#[inline]
pub(crate) fn scale(fraction: f64, total: Count) -> Count {
    (fraction * total as f64) as Count
}
