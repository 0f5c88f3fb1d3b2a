use log::info;
use thiserror::Error;

use crate::{
    algo::get_hints,
    candidate::CandidateRecord,
    config::EngineConfig,
    structs::{HintsN, WordError, WordN},
    vocabulary::{Vocabulary, VocabularyError},
};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("This session has no hidden word, feedback must be supplied")]
    NoTarget,
    #[error("The hidden word has not been supplied yet")]
    TargetPending,
    #[error("The session is over")]
    Finished,
    #[error(transparent)]
    Word(#[from] WordError),
    #[error(transparent)]
    Vocabulary(#[from] VocabularyError),
}

/// What the session knows about the hidden word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<const N: usize> {
    /// Nobody told us; feedback comes from the player.
    None,
    /// A hidden word will be supplied before the first round.
    Pending,
    Known(WordN<char, N>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Solved { turns: usize },
    Continue { remaining: usize },
    OutOfTries,
}

#[derive(Debug, Clone)]
pub struct Session<const N: usize> {
    vocabulary: Vocabulary<N>,
    tryouts: usize,
    target: Target<N>,
    history: Vec<(WordN<char, N>, HintsN<N>)>,
    finished: bool,
}

impl<const N: usize> Session<N> {
    pub fn new(vocabulary: Vocabulary<N>, tryouts: usize, target: Target<N>) -> Self {
        Self {
            vocabulary,
            tryouts,
            target,
            history: Vec::new(),
            finished: false,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary<N> {
        &self.vocabulary
    }

    pub fn target(&self) -> &Target<N> {
        &self.target
    }

    pub fn history(&self) -> &[(WordN<char, N>, HintsN<N>)] {
        &self.history
    }

    pub fn turns_left(&self) -> usize {
        self.tryouts.saturating_sub(self.history.len())
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Sets the hidden word, spelled in the vocabulary's alphabet.
    pub fn supply_target(&mut self, text: &str) -> Result<(), SessionError> {
        let word = self.vocabulary.alphabet().parse::<N>(text)?;
        self.target = Target::Known(word);
        Ok(())
    }

    /// The top-ranked candidate, if any.
    pub fn suggestion(&self) -> Option<&CandidateRecord<N>> {
        self.vocabulary.top_k(1).first()
    }

    pub fn feedback_for(&self, guess: &WordN<char, N>) -> Result<HintsN<N>, SessionError> {
        match &self.target {
            Target::Known(target) => Ok(get_hints(guess, target)),
            Target::Pending => Err(SessionError::TargetPending),
            Target::None => Err(SessionError::NoTarget),
        }
    }

    /// Records a round; on `Continue` the vocabulary has been pruned and
    /// refreshed. Any error ends the session.
    pub fn play_round(
        &mut self,
        guess: WordN<char, N>,
        hints: HintsN<N>,
        config: &EngineConfig,
    ) -> Result<RoundOutcome, SessionError> {
        if self.finished {
            return Err(SessionError::Finished);
        }

        self.history.push((guess, hints));
        let turns = self.history.len();

        if hints.is_solved() {
            self.finished = true;
            info!("Solved with {guess} in {turns} turns");
            return Ok(RoundOutcome::Solved { turns });
        }
        if turns >= self.tryouts {
            self.finished = true;
            return Ok(RoundOutcome::OutOfTries);
        }

        let result = self
            .vocabulary
            .prune(&guess, hints.to_ind())
            .and_then(|_| self.vocabulary.refresh(config));
        if let Err(err) = result {
            self.finished = true;
            return Err(err.into());
        }

        Ok(RoundOutcome::Continue {
            remaining: self.vocabulary.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Alphabet;
    use std::str::FromStr;

    const WORDS: [&str; 10] = [
        "crane", "slate", "trace", "crate", "raise", "arise", "stare", "roast", "toast", "beast",
    ];

    fn vocabulary() -> Vocabulary<5> {
        let mut vocabulary = Vocabulary::new(Alphabet::new('a'..='z').unwrap());
        for (i, word) in WORDS.iter().enumerate() {
            vocabulary.add_word(word, (i + 1) as f64).unwrap();
        }
        vocabulary.refresh(&EngineConfig::sequential()).unwrap();
        vocabulary
    }

    fn word(text: &str) -> WordN<char, 5> {
        WordN::try_from(text).unwrap()
    }

    #[test]
    fn self_play_reaches_every_target() {
        let config = EngineConfig::sequential();
        for target in WORDS {
            let mut session = Session::new(vocabulary(), 6, Target::Pending);
            session.supply_target(target).unwrap();

            let outcome = loop {
                let guess = *session.suggestion().unwrap().word();
                let hints = session.feedback_for(&guess).unwrap();
                match session.play_round(guess, hints, &config).unwrap() {
                    RoundOutcome::Continue { remaining } => assert!(remaining >= 1),
                    outcome => break outcome,
                }
            };

            assert!(matches!(outcome, RoundOutcome::Solved { .. }), "{target}");
            assert_eq!(session.history().last().unwrap().0, word(target));
            assert!(session.is_finished());
        }
    }

    #[test]
    fn supplied_target_is_normalised() {
        let mut session = Session::new(vocabulary(), 6, Target::Pending);
        session.supply_target("CRANE").unwrap();
        assert_eq!(session.target(), &Target::Known(word("crane")));

        let hints = session.feedback_for(&word("crane")).unwrap();
        assert!(hints.is_solved());
        let outcome = session
            .play_round(word("crane"), hints, &EngineConfig::sequential())
            .unwrap();
        assert_eq!(outcome, RoundOutcome::Solved { turns: 1 });

        let mut session = Session::new(vocabulary(), 6, Target::Pending);
        assert!(matches!(
            session.supply_target("cran3"),
            Err(SessionError::Word(WordError::UnknownSymbol { symbol: '3', .. }))
        ));
        assert!(matches!(
            session.supply_target("cranes"),
            Err(SessionError::Word(WordError::IncorrectLength { .. }))
        ));
        assert_eq!(session.target(), &Target::Pending);
    }

    #[test]
    fn feedback_needs_a_known_target() {
        let none = Session::new(vocabulary(), 6, Target::None);
        assert!(matches!(
            none.feedback_for(&word("crane")),
            Err(SessionError::NoTarget)
        ));

        let pending = Session::new(vocabulary(), 6, Target::Pending);
        assert!(matches!(
            pending.feedback_for(&word("crane")),
            Err(SessionError::TargetPending)
        ));
    }

    #[test]
    fn inconsistent_feedback_ends_the_session() {
        let mut session = Session::new(vocabulary(), 6, Target::None);
        let hints = HintsN::from_str("22220").unwrap();

        let err = session
            .play_round(word("zzzzz"), hints, &EngineConfig::sequential())
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Vocabulary(VocabularyError::ExhaustedCandidates { .. })
        ));
        assert!(session.is_finished());
        assert!(matches!(
            session.play_round(word("crane"), HintsN::correct(), &EngineConfig::sequential()),
            Err(SessionError::Finished)
        ));
    }

    #[test]
    fn runs_out_of_tries() {
        let mut session = Session::new(vocabulary(), 1, Target::None);
        let outcome = session
            .play_round(word("crane"), HintsN::wrong(), &EngineConfig::sequential())
            .unwrap();
        assert_eq!(outcome, RoundOutcome::OutOfTries);
        assert_eq!(session.turns_left(), 0);
    }
}
