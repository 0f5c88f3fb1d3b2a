//! Ranking and pruning of candidate words for Wordle-style games.
//!
//! Every live word gets the weighted distribution of feedback patterns it
//! would produce against the live set, and the Shannon entropy of that
//! distribution. Words are ranked by it, and the set is pruned with the
//! feedback of each round.

pub mod algo;
pub mod alphabet;
pub mod candidate;
pub mod config;
pub mod coordinator;
pub mod data;
pub mod entropy;
pub mod session;
pub mod structs;
pub mod variant;
pub mod vocabulary;

pub use algo::{compare_str, get_hints, pattern_code};
pub use alphabet::Alphabet;
pub use candidate::CandidateRecord;
pub use config::EngineConfig;
pub use coordinator::{Coordinator, CoordinatorError};
pub use session::{RoundOutcome, Session, SessionError, Target};
pub use structs::{is_solved, pattern_count, Hint, HintsN, WordError, WordN};
pub use variant::{Variant, VariantConfig, VariantRegistry, WeightSource};
pub use vocabulary::{Vocabulary, VocabularyError};
