//! Repeated randomized trials and the selection policy over their outcomes.
//!
//! Trial `t` always draws from a generator seeded with `seed + t`, so a
//! trial's random sequence depends only on the invocation seed and its own
//! index. Trials therefore run in parallel without any shared random state,
//! and the reduction below is order-independent, so parallel and sequential
//! execution return bit-identical results.

use super::TrialSet;
use crate::common::IndexMask;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

/// Run `trials` independent randomized trials of `run` and combine them under
/// the selection policy: all trial masks in trial order, or only the best
/// (most retained points, earliest trial on ties).
pub(crate) fn run_trials<F>(trials: u32, all_trials: bool, seed: u64, run: F) -> TrialSet
where
    F: Fn(&mut StdRng) -> IndexMask + Sync,
{
    if all_trials {
        let masks = (0..trials)
            .into_par_iter()
            .map(|t| run_one(seed, t, &run))
            .collect();
        TrialSet::All(masks)
    } else {
        let (_, best) = (0..trials)
            .into_par_iter()
            .map(|t| (t, run_one(seed, t, &run)))
            .reduce_with(better_trial)
            .expect("trial count is validated to be nonzero");
        TrialSet::Best(best)
    }
}

/// The result shape for an empty point set: every trial trivially keeps all
/// zero points.
pub(crate) fn empty_set(trials: u32, all_trials: bool) -> TrialSet {
    if all_trials {
        TrialSet::All(vec![IndexMask::new(0, true); trials as usize])
    } else {
        TrialSet::Best(IndexMask::new(0, true))
    }
}

fn run_one<F>(seed: u64, trial: u32, run: &F) -> IndexMask
where
    F: Fn(&mut StdRng) -> IndexMask,
{
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(trial as u64));
    run(&mut rng)
}

/// More retained points wins; ties go to the earlier trial.
fn better_trial(a: (u32, IndexMask), b: (u32, IndexMask)) -> (u32, IndexMask) {
    let (ka, kb) = (a.1.count_true(), b.1.count_true());
    if kb > ka || (kb == ka && b.0 < a.0) { b } else { a }
}
