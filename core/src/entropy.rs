use arrayvec::ArrayVec;
use ndarray::Array1;

use crate::{
    algo,
    candidate::LiveEntry,
    structs::{HintsN, WordN},
};

/// Shannon entropy in bits of a probability vector; zero entries are skipped.
pub fn entropy(arr: Array1<f64>) -> f64 {
    let arr = arr
        .into_iter()
        .filter(|&x| x > 0.)
        .collect::<Array1<f64>>();

    let arr_log = {
        let mut arr_log = arr.clone();
        arr_log.mapv_inplace(|x| x.log2());
        arr_log
    };

    -1. * (arr * arr_log).sum()
}

/// Expected information of a weighted pattern distribution.
///
/// Buckets are normalized by their own total, so the value is relative to
/// the live set the distribution was computed against.
pub fn information(distribution: &[f64]) -> f64 {
    let weights = distribution
        .iter()
        .copied()
        .filter(|&w| w > 0.)
        .collect::<Array1<f64>>();
    let total = weights.sum();
    if total <= 0. {
        return 0.;
    }

    entropy(weights / total)
}

/// Weight of every live solution, bucketed by the pattern `guess` would
/// produce against it.
pub fn pattern_distribution<const N: usize>(
    guess: &WordN<u8, N>,
    live: &[LiveEntry<N>],
) -> Vec<f64> {
    let mut distribution = vec![0.; HintsN::<N>::COUNT];
    let mut left = ArrayVec::<_, N>::new();

    for entry in live {
        let hints = algo::get_hints_with_work_array(guess, &entry.word, &mut left);
        distribution[hints.to_ind()] += entry.weight;
    }

    distribution
}
