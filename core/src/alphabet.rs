use crate::structs::{WordError, WordN};
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlphabetError {
    #[error("Alphabet has no symbols")]
    Empty,
    #[error("Alphabet has {0} symbols, at most 256 are supported")]
    TooLarge(usize),
}

/// The symbol set of a game variant.
///
/// Symbols are lower-cased and numbered in first-seen order, so words can be
/// compared as compact byte arrays.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Alphabet {
    char_to_u8: FxHashMap<char, u8>,
    u8_to_char: Vec<char>,
}

impl Alphabet {
    pub fn new<I>(symbols: I) -> Result<Self, AlphabetError>
    where
        I: IntoIterator<Item = char>,
    {
        let mut char_to_u8 = FxHashMap::default();
        let mut u8_to_char = Vec::new();

        for c in symbols.into_iter().flat_map(char::to_lowercase) {
            if char_to_u8.contains_key(&c) {
                continue;
            }
            let byte = u8::try_from(u8_to_char.len())
                .map_err(|_| AlphabetError::TooLarge(u8_to_char.len() + 1))?;
            char_to_u8.insert(c, byte);
            u8_to_char.push(c);
        }

        if u8_to_char.is_empty() {
            return Err(AlphabetError::Empty);
        }

        Ok(Self {
            char_to_u8,
            u8_to_char,
        })
    }

    pub fn len(&self) -> usize {
        self.u8_to_char.len()
    }

    pub fn is_empty(&self) -> bool {
        self.u8_to_char.is_empty()
    }

    pub fn symbols(&self) -> &[char] {
        &self.u8_to_char
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.char_to_u8.contains_key(&symbol)
    }

    /// Lower-cases `text` and checks its length and symbols.
    pub fn parse<const N: usize>(&self, text: &str) -> Result<WordN<char, N>, WordError> {
        let normalized = text.trim().to_lowercase();
        let word = WordN::<char, N>::try_from(normalized.as_str())?;
        self.to_bytes(&word)?;
        Ok(word)
    }

    pub fn to_chars<const N: usize>(&self, byte_word: &WordN<u8, N>) -> WordN<char, N> {
        let mut word = WordN::init(' ');
        for (i, b) in byte_word.0.into_iter().enumerate() {
            word.0[i] = self.u8_to_char[b as usize];
        }
        word
    }

    pub fn to_bytes<const N: usize>(&self, word: &WordN<char, N>) -> Result<WordN<u8, N>, WordError> {
        let mut byte_word = WordN::init(0);
        for (i, c) in word.0.iter().enumerate() {
            byte_word.0[i] = *self
                .char_to_u8
                .get(c)
                .ok_or_else(|| WordError::UnknownSymbol {
                    word: word.to_string(),
                    symbol: *c,
                })?;
        }
        Ok(byte_word)
    }
}
