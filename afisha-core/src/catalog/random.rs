use std::collections::VecDeque;

use rand::Rng;

/// Uniform integer source used for page picks and shuffles.
pub trait RandomSource {
    /// A value uniform in `[0, upper)`. `upper` is at least 1.
    fn below(&mut self, upper: usize) -> usize;
}

/// Adapts any `rand` generator.
#[derive(Debug)]
pub struct RngSource<R>(pub R);

impl<R: Rng> RandomSource for RngSource<R> {
    fn below(&mut self, upper: usize) -> usize {
        if upper <= 1 {
            return 0;
        }
        self.0.random_range(0..upper)
    }
}

/// In-place Fisher-Yates shuffle.
pub fn shuffle<T, S>(items: &mut [T], rng: &mut S)
where
    S: RandomSource + ?Sized,
{
    for i in (1..items.len()).rev() {
        let j = rng.below(i + 1).min(i);
        items.swap(i, j);
    }
}

/// Replays a fixed script of draws. Each draw is reduced modulo `upper`.
/// Once the script runs out it answers `upper - 1`, which makes [`shuffle`]
/// keep the current order.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    script: VecDeque<usize>,
}

impl ScriptedRandom {
    pub fn new(script: impl IntoIterator<Item = usize>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    pub fn keep_order() -> Self {
        Self::default()
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn below(&mut self, upper: usize) -> usize {
        let upper = upper.max(1);
        match self.script.pop_front() {
            Some(value) => value % upper,
            None => upper - 1,
        }
    }
}
