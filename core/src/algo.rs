use crate::structs::{
    hints::{Hint, HintsN},
    word::{WordError, WordN},
};
use arrayvec::ArrayVec;
use itertools::izip;
use serde::{Deserialize, Serialize};

/// Feedback for `guess` when `solution` is the hidden word.
///
/// Exact matches are marked first and consume their solution position.
/// Remaining positions are then scanned left to right; a symbol still
/// present among the unconsumed solution symbols is marked out of place and
/// consumes one occurrence, so repeated guess symbols beyond the solution's
/// count stay wrong.
pub fn get_hints<T, const N: usize>(guess: &WordN<T, N>, solution: &WordN<T, N>) -> HintsN<N>
where
    T: Serialize + Copy + Eq,
    for<'de2> T: Deserialize<'de2>,
{
    let mut left = ArrayVec::<T, N>::new();
    get_hints_with_work_array(guess, solution, &mut left)
}

pub fn get_hints_with_work_array<T, const N: usize>(
    guess: &WordN<T, N>,
    solution: &WordN<T, N>,
    left: &mut ArrayVec<T, N>,
) -> HintsN<N>
where
    T: Serialize + Copy + Eq,
    for<'de2> T: Deserialize<'de2>,
{
    left.clear();
    let mut hints = HintsN::<N>::wrong();

    for (hint, &g, &s) in izip!(hints.0.iter_mut(), &guess.0, &solution.0) {
        if g == s {
            *hint = Hint::Correct;
        } else {
            left.push(s);
        }
    }

    for (hint, &g) in izip!(hints.0.iter_mut(), &guess.0) {
        if *hint == Hint::Correct {
            continue;
        }
        if let Some(j) = left.iter().position(|&s| s == g) {
            *hint = Hint::OutOfPlace;
            left.remove(j);
        }
    }

    hints
}

/// Pattern code of `guess` against `solution`, in `0..3^N`.
pub fn pattern_code<T, const N: usize>(guess: &WordN<T, N>, solution: &WordN<T, N>) -> usize
where
    T: Serialize + Copy + Eq,
    for<'de2> T: Deserialize<'de2>,
{
    get_hints(guess, solution).to_ind()
}

/// Text-level comparison; lengths other than `N` are reported instead of
/// being truncated.
pub fn compare_str<const N: usize>(guess: &str, solution: &str) -> Result<HintsN<N>, WordError> {
    let guess = WordN::<char, N>::try_from(guess.to_lowercase().as_str())?;
    let solution = WordN::<char, N>::try_from(solution.to_lowercase().as_str())?;

    Ok(get_hints(&guess, &solution))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Alphabet;
    use rstest::rstest;
    use std::str::FromStr;

    const WORDS_LENGTH: usize = 5;

    type Word = WordN<char, WORDS_LENGTH>;
    type Hints = HintsN<WORDS_LENGTH>;

    #[rstest]
    #[case("abcde", "abcde", "CCCCC")]
    #[case("abcdd", "abcde", "CCCCW")]
    #[case("aabab", "aaabb", "CCOOC")]
    #[case("aabab", "bxaxx", "OWOWW")]
    #[case("cacbb", "abcba", "WOCCO")]
    #[case("speed", "abide", "WWOWO")]
    #[case("śląsk", "oślik", "OWWWC")]
    fn hints_ok(#[case] guess: &str, #[case] answer: &str, #[case] expected: &str) {
        let guess_w: Word = guess.try_into().unwrap();
        let answer_w: Word = answer.try_into().unwrap();
        let alphabet = Alphabet::new(guess.chars().chain(answer.chars())).unwrap();
        let guess_b = alphabet.to_bytes(&guess_w).unwrap();
        let answer_b = alphabet.to_bytes(&answer_w).unwrap();

        let expected = Hints::from_str(expected).unwrap();
        assert_eq!(get_hints(&guess_b, &answer_b), expected);
        assert_eq!(get_hints(&guess_w, &answer_w), expected);
    }

    #[test]
    fn duplicate_letters_example() {
        let hints = compare_str::<3>("AAB", "ABA").unwrap();
        assert_eq!(hints, HintsN::from_str("211").unwrap());
        assert_eq!(hints.to_ind(), 22);
        assert!(!hints.is_solved());
    }

    #[test]
    fn identical_words_are_solved() {
        let hints = compare_str::<3>("ABC", "abc").unwrap();
        assert_eq!(hints.to_ind(), 26);
        assert!(hints.is_solved());
    }

    #[test]
    fn every_word_solves_itself() {
        let alphabet = Alphabet::new("ab".chars()).unwrap();
        let symbols = alphabet.symbols();
        for code in 0..(1usize << 4) {
            let mut word = WordN::<char, 4>::init('a');
            for (i, c) in word.0.iter_mut().enumerate() {
                *c = symbols[(code >> i) & 1];
            }
            let bytes = alphabet.to_bytes(&word).unwrap();
            assert!(get_hints(&bytes, &bytes).is_solved());
            assert_eq!(pattern_code(&word, &word), HintsN::<4>::SOLVED);
        }
    }

    #[test]
    fn length_mismatch_is_reported() {
        assert!(matches!(
            compare_str::<5>("crane", "cranes"),
            Err(WordError::IncorrectLength {
                expected_length: 5,
                ..
            })
        ));
    }
}
