use bon::Builder;
use rand::rngs::ThreadRng;
use rand::seq::index;
use rand::{thread_rng, Rng, RngCore};

use crate::{Chance, Count, Lottery, Result, APPROX_SAMPLE_SIZE};

/// Monte Carlo estimate of the win chance, sampling arrangements directly.
#[derive(Debug, Builder)]
pub struct Approx<G = ThreadRng>
where
    G: RngCore,
{
    #[builder(finish_fn)]
    rng: G,
    #[builder(default = APPROX_SAMPLE_SIZE)]
    sample_size: u32,
}

impl Default for Approx<ThreadRng> {
    fn default() -> Self {
        Self::builder().build(thread_rng())
    }
}

impl<G> Approx<G>
where
    G: RngCore,
{
    pub fn sample_size(&self) -> u32 {
        self.sample_size
    }

    pub fn win_chance(&mut self, lottery: &Lottery, position: Count) -> Result<Chance> {
        let position = lottery.check_position(position)?;
        Ok(self.eval(|rng| Self::trial(rng, lottery, position)))
    }

    pub fn average_win_chance(&mut self, lottery: &Lottery) -> Chance {
        let total = lottery.total();
        self.eval(|rng| {
            let position = rng.gen_range(1..=total);
            Self::trial(rng, lottery, position)
        })
    }

    fn eval<F>(&mut self, mut op: F) -> Chance
    where
        F: FnMut(&mut G) -> bool,
    {
        let wins = (0..self.sample_size)
            .filter(|_| op(&mut self.rng))
            .count();
        log::debug!("approx wins: {wins} / {}", self.sample_size);
        wins as Chance / Chance::from(self.sample_size.max(1))
    }

    /// Adversaries take distinct ranks among the `total - 1` ranks left by the
    /// separator; the separator wins if any of them lands after it.
    fn trial(rng: &mut G, lottery: &Lottery, position: Count) -> bool {
        // slot `i` is rank `i + 1` below the separator and `i + 2` above it
        let behind = position - 1;
        index::sample(rng, lottery.total() - 1, lottery.adversaries())
            .iter()
            .any(|i| i >= behind)
    }
}
