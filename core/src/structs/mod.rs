pub mod hints;
pub mod word;

pub use hints::{is_solved, pattern_count, Hint, HintsError, HintsN};
pub use word::{WordError, WordN};
