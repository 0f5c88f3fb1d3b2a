use crate::{
    entropy::{information, pattern_distribution},
    structs::{HintsN, WordN},
    vocabulary::VocabularyError,
};

/// A live word as a hypothetical solution: what the distribution pass reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveEntry<const N: usize> {
    pub word: WordN<u8, N>,
    pub weight: f64,
}

impl<const N: usize> LiveEntry<N> {
    pub fn new(word: WordN<u8, N>, weight: f64) -> Self {
        Self { word, weight }
    }
}

/// Per-word statistics of a vocabulary entry.
///
/// `word` and `weight` never change. `distribution`, `probability` and
/// `info` are only meaningful right after the owning vocabulary refreshed.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRecord<const N: usize> {
    word: WordN<char, N>,
    bytes: WordN<u8, N>,
    weight: f64,
    distribution: Vec<f64>,
    probability: f64,
    info: f64,
}

impl<const N: usize> CandidateRecord<N> {
    pub fn new(word: WordN<char, N>, bytes: WordN<u8, N>, weight: f64) -> Self {
        Self {
            word,
            bytes,
            weight,
            distribution: vec![0.; HintsN::<N>::COUNT],
            probability: 0.,
            info: 0.,
        }
    }

    /// Attaches an info value loaded from a persisted table.
    pub fn with_info(mut self, info: f64) -> Self {
        self.info = info;
        self
    }

    pub fn word(&self) -> &WordN<char, N> {
        &self.word
    }

    pub fn bytes(&self) -> &WordN<u8, N> {
        &self.bytes
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn distribution(&self) -> &[f64] {
        &self.distribution
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn info(&self) -> f64 {
        self.info
    }

    pub fn live_entry(&self) -> LiveEntry<N> {
        LiveEntry::new(self.bytes, self.weight)
    }

    pub fn recompute_distribution(&mut self, live: &[LiveEntry<N>]) {
        self.distribution = pattern_distribution(&self.bytes, live);
    }

    pub fn recompute_probability(&mut self, total_weight: f64) -> Result<(), VocabularyError> {
        if total_weight <= 0. {
            return Err(VocabularyError::EmptyVocabulary);
        }
        self.probability = self.weight / total_weight;
        Ok(())
    }

    pub fn recompute_info(&mut self) {
        self.info = information(&self.distribution);
    }

    pub(crate) fn clear_distribution(&mut self) {
        self.distribution.iter_mut().for_each(|w| *w = 0.);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Alphabet;

    fn record(alphabet: &Alphabet, text: &str, weight: f64) -> CandidateRecord<3> {
        let word = alphabet.parse::<3>(text).unwrap();
        let bytes = alphabet.to_bytes(&word).unwrap();
        CandidateRecord::new(word, bytes, weight)
    }

    #[test]
    fn starts_zeroed() {
        let alphabet = Alphabet::new("abc".chars()).unwrap();
        let r = record(&alphabet, "abc", 4.);
        assert_eq!(r.distribution().len(), 27);
        assert!(r.distribution().iter().all(|&w| w == 0.));
        assert_eq!(r.probability(), 0.);
        assert_eq!(r.info(), 0.);
    }

    #[test]
    fn distribution_counts_itself() {
        let alphabet = Alphabet::new("abc".chars()).unwrap();
        let mut r = record(&alphabet, "abc", 4.);
        let others = [record(&alphabet, "acb", 1.), record(&alphabet, "bac", 2.)];
        let live = std::iter::once(&r)
            .chain(others.iter())
            .map(CandidateRecord::live_entry)
            .collect::<Vec<_>>();

        r.recompute_distribution(&live);

        assert_eq!(r.distribution()[26], 4.);
        assert_eq!(r.distribution().iter().sum::<f64>(), 7.);
    }

    #[test]
    fn certain_outcome_has_no_information() {
        let alphabet = Alphabet::new("abcxyz".chars()).unwrap();
        let mut r = record(&alphabet, "xyz", 1.);
        let live = [
            record(&alphabet, "abc", 1.).live_entry(),
            record(&alphabet, "bca", 2.).live_entry(),
            record(&alphabet, "cab", 3.).live_entry(),
        ];

        r.recompute_distribution(&live);
        r.recompute_info();

        assert_eq!(r.distribution()[0], 6.);
        assert_eq!(r.info(), 0.);
    }

    #[test]
    fn probability_needs_positive_total() {
        let alphabet = Alphabet::new("abc".chars()).unwrap();
        let mut r = record(&alphabet, "abc", 1.);
        assert!(matches!(
            r.recompute_probability(0.),
            Err(VocabularyError::EmptyVocabulary)
        ));
        r.recompute_probability(4.).unwrap();
        assert_eq!(r.probability(), 0.25);
    }
}
