//! Sweeps over the adversary count and the series derived from them.

use std::ops::Range;

use bon::Builder;
use itertools::Itertools;

use crate::util::{check_ratio, scale};
use crate::{
    BoundaryPolicy, Chance, Count, Lottery, Result, HIGHLIGHTS, MAX_ADVERSARY_RATIO, PLOT_LIMIT,
    POSITION_FRACTIONS,
};

#[derive(Debug, Clone, Builder)]
pub struct SweepConfig {
    #[builder(default = MAX_ADVERSARY_RATIO)]
    max_adversary_ratio: f64,
    #[builder(default = POSITION_FRACTIONS.to_vec())]
    position_fractions: Vec<f64>,
    #[builder(default = HIGHLIGHTS.to_vec())]
    highlights: Vec<Count>,
    #[builder(default = PLOT_LIMIT)]
    plot_limit: Count,
    #[builder(default)]
    policy: BoundaryPolicy,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A labelled sequence of `(adversaries, chance)` points.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    label: String,
    points: Vec<(Count, Chance)>,
}

impl SweepConfig {
    pub fn policy(&self) -> BoundaryPolicy {
        self.policy
    }

    pub fn highlights(&self) -> &[Count] {
        &self.highlights
    }

    pub fn plot_limit(&self) -> Count {
        self.plot_limit
    }

    /// `1..floor(ratio * total)`; the exclusive end keeps every count below
    /// `total`.
    pub fn adversary_range(&self, total: Count) -> Result<Range<Count>> {
        Lottery::new(total, 0)?;
        let ratio = check_ratio(self.max_adversary_ratio)?;
        Ok(1..scale(ratio, total))
    }

    /// Fixed separator ranks, `floor(fraction * total)` for every fraction.
    pub fn positions(&self, total: Count) -> Result<Vec<Count>> {
        let lottery = Lottery::new(total, 0)?;
        self.position_fractions
            .iter()
            .map(|&f| lottery.check_position(scale(check_ratio(f)?, total)))
            .collect()
    }

    pub fn average_curve(&self, total: Count) -> Result<Curve> {
        let points = self
            .adversary_range(total)?
            .map(|k| {
                let lottery = Lottery::new(total, k)?.with_policy(self.policy);
                Ok((k, lottery.average_win_chance()))
            })
            .collect::<Result<Vec<_>>>()?;
        log::debug!("average sweep N={total}: {} points", points.len());
        Ok(Curve::new(format!("N={total}"), points))
    }

    pub fn fixed_position_curves(&self, total: Count) -> Result<Vec<Curve>> {
        let range = self.adversary_range(total)?;
        self.positions(total)?
            .into_iter()
            .map(|m| {
                let points = range
                    .clone()
                    .map(|k| {
                        let lottery = Lottery::new(total, k)?.with_policy(self.policy);
                        Ok((k, lottery.win_chance(m)?))
                    })
                    .collect::<Result<Vec<_>>>()?;
                log::debug!("fixed sweep N={total} m={m}: {} points", points.len());
                Ok(Curve::new(m.to_string(), points))
            })
            .collect()
    }
}

impl Curve {
    pub fn new(label: impl Into<String>, points: Vec<(Count, Chance)>) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn points(&self) -> &[(Count, Chance)] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn max_adversaries(&self) -> Option<Count> {
        self.points.iter().map(|&(k, _)| k).max()
    }

    pub fn value_at(&self, adversaries: Count) -> Option<Chance> {
        self.points
            .iter()
            .find(|&&(k, _)| k == adversaries)
            .map(|&(_, p)| p)
    }

    /// `(1 - p) / p * k`
    #[must_use]
    pub fn loss_win_ratio(&self) -> Curve {
        self.derive("p_loss / p_win * k", |k, p| (1.0 - p) / p * k as f64)
    }

    /// `p / k`
    #[must_use]
    pub fn win_per_adversary(&self) -> Curve {
        self.derive("p_win / k", |k, p| p / k as f64)
    }

    /// Discrete derivative `p[i] - p[i - 1]`. The first point has no
    /// predecessor and keeps its raw value.
    #[must_use]
    pub fn increments(&self) -> Curve {
        let points = self
            .points
            .first()
            .copied()
            .into_iter()
            .chain(
                self.points
                    .iter()
                    .tuple_windows()
                    .map(|(&(_, p0), &(k1, p1))| (k1, p1 - p0)),
            )
            .collect();
        Curve::new("d p_win / dk", points)
    }

    fn derive<F>(&self, label: &str, op: F) -> Curve
    where
        F: Fn(Count, Chance) -> Chance,
    {
        Curve::new(
            label,
            self.points.iter().map(|&(k, p)| (k, op(k, p))).collect(),
        )
    }
}

impl FromIterator<(Count, Chance)> for Curve {
    fn from_iter<T: IntoIterator<Item = (Count, Chance)>>(iter: T) -> Self {
        Curve::new(String::new(), iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::Error;

    #[test]
    fn default_range_stops_below_three_quarters() {
        let config = SweepConfig::default();
        assert_eq!(config.adversary_range(100), Ok(1..75));
        assert_eq!(config.adversary_range(1000), Ok(1..750));
        assert_eq!(config.adversary_range(2), Ok(1..1));
        assert_eq!(config.adversary_range(0), Err(Error::Empty));
    }

    #[test]
    fn default_positions_truncate() {
        let config = SweepConfig::default();
        assert_eq!(config.positions(100), Ok(vec![50, 75, 90, 95]));
        assert_eq!(config.positions(1000), Ok(vec![500, 750, 900, 950]));
        assert_eq!(
            config.positions(1),
            Err(Error::PositionOutOfRange {
                total: 1,
                position: 0
            })
        );
    }

    #[test]
    fn rejects_bad_ratios() {
        let config = SweepConfig::builder().max_adversary_ratio(1.5).build();
        assert_eq!(config.adversary_range(10), Err(Error::InvalidRatio(1.5)));
        let config = SweepConfig::builder().position_fractions(vec![0.0]).build();
        assert_eq!(config.positions(10), Err(Error::InvalidRatio(0.0)));
    }

    #[test]
    fn full_ratio_keeps_counts_below_total() {
        let config = SweepConfig::builder().max_adversary_ratio(1.0).build();
        let curve = config.average_curve(12).unwrap();
        assert_eq!(curve.max_adversaries(), Some(11));
    }

    #[test]
    fn average_curve_follows_closed_form() {
        let curve = SweepConfig::default().average_curve(100).unwrap();
        assert_eq!(curve.len(), 74);
        assert_eq!(curve.label(), "N=100");
        for &(k, p) in curve.points() {
            let expected = k as f64 / (k + 1) as f64;
            assert!((p - expected).abs() < 1e-9, "k={k} p={p}");
        }
    }

    #[test]
    fn fixed_position_curves_are_labelled_by_rank() {
        let curves = SweepConfig::default().fixed_position_curves(100).unwrap();
        let labels = curves.iter().map(Curve::label).collect::<Vec<_>>();
        assert_eq!(labels, vec!["50", "75", "90", "95"]);
        // past the separator rank every adversary count is a certain win
        assert_eq!(curves[0].value_at(50), Some(1.0));
        assert_eq!(curves[0].value_at(74), Some(1.0));
        let expected = 1.0 - 94.0 / 99.0;
        let got = curves[3].value_at(1).unwrap();
        assert!((got - expected).abs() < 1e-15);
    }

    #[test]
    fn derived_series() {
        let curve: Curve = vec![(1, 0.5), (2, 0.75), (4, 0.8)].into_iter().collect();
        assert_eq!(
            curve.loss_win_ratio().points(),
            &[(1, 1.0), (2, 0.25 / 0.75 * 2.0), (4, (1.0 - 0.8) / 0.8 * 4.0)]
        );
        assert_eq!(
            curve.win_per_adversary().points(),
            &[(1, 0.5), (2, 0.375), (4, 0.2)]
        );
        assert_eq!(
            curve.increments().points(),
            &[(1, 0.5), (2, 0.25), (4, 0.8 - 0.75)]
        );
        assert!(Curve::new("empty", vec![]).increments().is_empty());
    }

    #[test]
    fn policy_flows_through_sweep() {
        for policy in BoundaryPolicy::ALL {
            let config = SweepConfig::builder().policy(policy).build();
            assert_eq!(config.policy(), policy);
            let curves = config.fixed_position_curves(40).unwrap();
            assert_eq!(curves.len(), 4);
        }
    }
}
