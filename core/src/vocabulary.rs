use fxhash::FxHashMap;
use log::{debug, info, warn};
use std::{fmt::Write, time::Instant};
use thiserror::Error;

use crate::{
    algo,
    alphabet::Alphabet,
    candidate::{CandidateRecord, LiveEntry},
    config::EngineConfig,
    coordinator::{Coordinator, CoordinatorError, ProgressMonitor},
    data::TableRow,
    structs::{WordError, WordN},
};

#[derive(Error, Debug)]
pub enum VocabularyError {
    #[error("Total weight of the vocabulary is zero")]
    EmptyVocabulary,
    #[error("No candidate is consistent with pattern {code} for guess \"{guess}\"")]
    ExhaustedCandidates { guess: String, code: usize },
    #[error("Word \"{0}\" is already in the vocabulary")]
    Duplicate(String),
    #[error("Word \"{0}\" is not in the vocabulary")]
    UnknownWord(String),
    #[error("Word \"{word}\" has invalid weight {weight}")]
    InvalidWeight { word: String, weight: f64 },
    #[error(transparent)]
    Word(#[from] WordError),
    #[error("Distribution pass failed: {0}")]
    Coordinator(#[from] CoordinatorError),
}

/// The live candidate set of one game session.
///
/// Records are kept in ranking order. Adding or removing words leaves
/// probabilities, distributions, info and the order stale until the next
/// [`Vocabulary::refresh`]. Sums over the live set run in word order, so
/// they do not depend on the ranking.
#[derive(Debug, Clone)]
pub struct Vocabulary<const N: usize> {
    alphabet: Alphabet,
    records: Vec<CandidateRecord<N>>,
    index: FxHashMap<WordN<char, N>, usize>,
    stale: bool,
}

impl<const N: usize> Vocabulary<N> {
    pub fn new(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            records: Vec::new(),
            index: FxHashMap::default(),
            stale: false,
        }
    }

    /// Builds a vocabulary from persisted rows, trusting their `info` and
    /// keeping their order as the ranking.
    pub fn from_rows<I>(alphabet: Alphabet, rows: I) -> Result<Self, VocabularyError>
    where
        I: IntoIterator<Item = TableRow>,
    {
        let mut vocabulary = Self::new(alphabet);
        for row in rows {
            let record = vocabulary.make_record(&row.word, row.points)?;
            vocabulary.add(record.with_info(row.info))?;
        }

        if vocabulary.total_weight() > 0. {
            vocabulary.recompute_probabilities()?;
        }
        vocabulary.stale = false;
        info!("Loaded {} words", vocabulary.len());

        Ok(vocabulary)
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.live().iter().map(|entry| entry.weight).sum()
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn contains(&self, word: &WordN<char, N>) -> bool {
        self.index.contains_key(word)
    }

    pub fn get(&self, word: &WordN<char, N>) -> Option<&CandidateRecord<N>> {
        self.index.get(word).map(|&i| &self.records[i])
    }

    pub fn records(&self) -> &[CandidateRecord<N>] {
        &self.records
    }

    pub fn make_record(&self, text: &str, weight: f64) -> Result<CandidateRecord<N>, VocabularyError> {
        let word = self.alphabet.parse::<N>(text)?;
        let bytes = self.alphabet.to_bytes(&word)?;
        Ok(CandidateRecord::new(word, bytes, weight))
    }

    pub fn add(&mut self, record: CandidateRecord<N>) -> Result<(), VocabularyError> {
        let weight = record.weight();
        if !weight.is_finite() || weight < 0. {
            return Err(VocabularyError::InvalidWeight {
                word: record.word().to_string(),
                weight,
            });
        }
        if self.index.contains_key(record.word()) {
            return Err(VocabularyError::Duplicate(record.word().to_string()));
        }

        self.index.insert(*record.word(), self.records.len());
        self.records.push(record);
        self.stale = true;
        Ok(())
    }

    pub fn add_word(&mut self, text: &str, weight: f64) -> Result<(), VocabularyError> {
        let record = self.make_record(text, weight)?;
        self.add(record)
    }

    /// Removes `word`; the last record takes its slot.
    pub fn remove(&mut self, word: &WordN<char, N>) -> Result<CandidateRecord<N>, VocabularyError> {
        let i = self
            .index
            .remove(word)
            .ok_or_else(|| VocabularyError::UnknownWord(word.to_string()))?;

        let record = self.records.swap_remove(i);
        if let Some(moved) = self.records.get(i) {
            self.index.insert(*moved.word(), i);
        }
        self.stale = true;
        Ok(record)
    }

    pub fn recompute_probabilities(&mut self) -> Result<(), VocabularyError> {
        let total_weight = self.total_weight();
        if total_weight <= 0. {
            return Err(VocabularyError::EmptyVocabulary);
        }
        self.records
            .iter_mut()
            .try_for_each(|record| record.recompute_probability(total_weight))
    }

    pub fn recompute_distributions(&mut self, config: &EngineConfig) -> Result<(), VocabularyError> {
        let coordinator = Coordinator::from_config(config);
        self.recompute_distributions_with(config, &coordinator, None)
    }

    pub fn recompute_distributions_with(
        &mut self,
        config: &EngineConfig,
        coordinator: &Coordinator,
        mut monitor: Option<ProgressMonitor<'_>>,
    ) -> Result<(), VocabularyError> {
        let start = Instant::now();
        let live = self.live();
        let total = self.records.len();

        if total > config.parallel_threshold {
            let result = coordinator.recompute_distributions(&mut self.records, &live, monitor);
            if let Err(err) = result {
                warn!("Discarding partial distributions of {} words", self.len());
                self.records
                    .iter_mut()
                    .for_each(CandidateRecord::clear_distribution);
                self.stale = true;
                return Err(err.into());
            }
        } else {
            for (done, record) in self.records.iter_mut().enumerate() {
                record.recompute_distribution(&live);
                if let Some(monitor) = monitor.as_mut() {
                    monitor(done + 1, total);
                }
            }
        }

        debug!(
            "Distributions of {} words took {}ms",
            self.len(),
            start.elapsed().as_millis()
        );
        Ok(())
    }

    pub fn recompute_information(&mut self) {
        self.records
            .iter_mut()
            .for_each(CandidateRecord::recompute_info);
    }

    /// Orders records by info, then probability, both descending; ties keep
    /// their current relative order.
    pub fn rank(&mut self) {
        self.records.sort_by(|a, b| {
            b.info()
                .total_cmp(&a.info())
                .then_with(|| b.probability().total_cmp(&a.probability()))
        });
        self.reindex();
    }

    pub fn refresh(&mut self, config: &EngineConfig) -> Result<(), VocabularyError> {
        let coordinator = Coordinator::from_config(config);
        self.refresh_with(config, &coordinator, None)
    }

    pub fn refresh_with(
        &mut self,
        config: &EngineConfig,
        coordinator: &Coordinator,
        monitor: Option<ProgressMonitor<'_>>,
    ) -> Result<(), VocabularyError> {
        self.recompute_probabilities()?;
        self.recompute_distributions_with(config, coordinator, monitor)?;
        self.recompute_information();
        self.rank();
        self.stale = false;
        Ok(())
    }

    /// Keeps only the words that would have produced `code` for `guess`.
    ///
    /// Nothing is removed when no word survives.
    pub fn prune(&mut self, guess: &WordN<char, N>, code: usize) -> Result<usize, VocabularyError> {
        let guess_b = self.alphabet.to_bytes(guess)?;
        let keep = self
            .records
            .iter()
            .map(|record| algo::pattern_code(&guess_b, record.bytes()) == code)
            .collect::<Vec<_>>();

        if !keep.contains(&true) {
            return Err(VocabularyError::ExhaustedCandidates {
                guess: guess.to_string(),
                code,
            });
        }

        let before = self.records.len();
        let mut keep = keep.into_iter();
        self.records.retain(|_| keep.next().unwrap_or(false));
        self.reindex();
        self.stale = true;

        let removed = before - self.records.len();
        info!(
            "Guess {guess} with pattern {code} left {} of {before} words",
            self.records.len()
        );
        Ok(removed)
    }

    /// The first `k` records of the current ranking.
    pub fn top_k(&self, k: usize) -> &[CandidateRecord<N>] {
        &self.records[..k.min(self.records.len())]
    }

    pub fn rows(&self) -> Vec<TableRow> {
        self.records
            .iter()
            .map(|r| TableRow::new(r.word().to_string(), r.weight(), r.info()))
            .collect()
    }

    pub fn summary(&self, k: usize) -> String {
        let mut output = format!("there are {} available words.\n", self.len());
        let _ = writeln!(output, "{:<4} {:<10} {:<20} {:<30}", "#", "word", "info", "prob");
        for (i, record) in self.top_k(k).iter().enumerate() {
            let _ = writeln!(
                output,
                "{:<4} {:<10} {:<20.4} {:<30.4}",
                i + 1,
                record.word().to_string(),
                record.info(),
                record.probability()
            );
        }
        output
    }

    /// Snapshot of the live set in word order.
    fn live(&self) -> Vec<LiveEntry<N>> {
        let mut live = self
            .records
            .iter()
            .map(CandidateRecord::live_entry)
            .collect::<Vec<_>>();
        live.sort_unstable_by(|a, b| a.word.cmp(&b.word));
        live
    }

    fn reindex(&mut self) {
        self.index = self
            .records
            .iter()
            .enumerate()
            .map(|(i, record)| (*record.word(), i))
            .collect();
    }
}
