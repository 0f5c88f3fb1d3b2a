#[cfg(feature = "terminal")]
use colored::Colorize;
use core::fmt;
use serde::{
    de::{self, Visitor},
    Deserializer, Serializer,
};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::str::FromStr;
use thiserror::Error;

/// Number of distinct feedback patterns for words of length `n`.
pub const fn pattern_count(n: usize) -> usize {
    3usize.pow(n as u32)
}

/// Whether `code` is the all-correct pattern for words of length `n`.
pub fn is_solved(code: usize, n: usize) -> bool {
    code == pattern_count(n) - 1
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HintsError {
    #[error("Expected {expected_length} hints, found {found}")]
    IncorrectLength { expected_length: usize, found: usize },
    #[error("Unrecognized hint character '{0}'")]
    UnknownHint(char),
    #[error("Pattern code {code} is out of range for words of length {length}")]
    CodeOutOfRange { code: usize, length: usize },
}

#[derive(
    Copy, Clone, Debug, SerializeDisplay, DeserializeFromStr, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum Hint {
    Wrong,
    OutOfPlace,
    Correct,
}

impl Hint {
    pub fn trit(self) -> usize {
        match self {
            Hint::Wrong => 0,
            Hint::OutOfPlace => 1,
            Hint::Correct => 2,
        }
    }

    fn from_trit(trit: usize) -> Self {
        match trit {
            0 => Hint::Wrong,
            1 => Hint::OutOfPlace,
            _ => Hint::Correct,
        }
    }

    fn from_char(c: char) -> Result<Self, HintsError> {
        match c.to_ascii_lowercase() {
            'w' | '0' => Ok(Hint::Wrong),
            'o' | '1' => Ok(Hint::OutOfPlace),
            'c' | '2' => Ok(Hint::Correct),
            other => Err(HintsError::UnknownHint(other)),
        }
    }
}

impl FromStr for Hint {
    type Err = HintsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Hint::from_char(c),
            _ => Err(HintsError::IncorrectLength {
                expected_length: 1,
                found: s.chars().count(),
            }),
        }
    }
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let char = match self {
            Hint::Wrong => 'w',
            Hint::OutOfPlace => 'o',
            Hint::Correct => 'c',
        };

        write!(f, "{}", char)
    }
}

/// Feedback for one guess: one [`Hint`] per position.
///
/// The pattern code reads the hints as a base-3 numeral, first position
/// most significant, so it ranges over `0..3^N` and the all-correct
/// pattern is `3^N - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HintsN<const N: usize>(pub [Hint; N]);

impl<const N: usize> Serialize for HintsN<N> {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&self.to_digits())
    }
}

struct HintsNVisitor<const N: usize>;

impl<'de, const N: usize> Visitor<'de> for HintsNVisitor<N> {
    type Value = HintsN<N>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str(&format!("hints of length {}", N))
    }

    #[inline]
    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        HintsN::<N>::from_str(value).map_err(de::Error::custom)
    }
}

impl<'de, const N: usize> Deserialize<'de> for HintsN<N> {
    fn deserialize<D>(deserializer: D) -> Result<HintsN<N>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(HintsNVisitor::<N>)
    }
}

impl<const N: usize> HintsN<N> {
    pub const COUNT: usize = pattern_count(N);
    pub const SOLVED: usize = pattern_count(N) - 1;

    pub fn correct() -> Self {
        Self([Hint::Correct; N])
    }

    pub fn wrong() -> Self {
        Self([Hint::Wrong; N])
    }

    pub fn to_ind(&self) -> usize {
        self.0.iter().fold(0, |code, hint| code * 3 + hint.trit())
    }

    pub fn from_ind(code: usize) -> Result<Self, HintsError> {
        if code >= Self::COUNT {
            return Err(HintsError::CodeOutOfRange { code, length: N });
        }

        let mut hints = Self::wrong();
        let mut rest = code;
        for hint in hints.0.iter_mut().rev() {
            *hint = Hint::from_trit(rest % 3);
            rest /= 3;
        }

        Ok(hints)
    }

    pub fn is_solved(&self) -> bool {
        self.to_ind() == Self::SOLVED
    }

    /// The `0`/`1`/`2` digit form, independent of the `terminal` feature.
    pub fn to_digits(&self) -> String {
        self.0
            .iter()
            .map(|hint| match hint {
                Hint::Wrong => '0',
                Hint::OutOfPlace => '1',
                Hint::Correct => '2',
            })
            .collect()
    }
}

impl<const N: usize> FromStr for HintsN<N> {
    type Err = HintsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .map(Hint::from_char)
            .collect::<Result<Vec<_>, _>>()?
            .try_into()
    }
}

#[cfg(feature = "terminal")]
impl<const N: usize> fmt::Display for HintsN<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &hint in self.0.iter() {
            let square = match hint {
                Hint::Wrong => "■".bright_black(),
                Hint::OutOfPlace => "■".yellow(),
                Hint::Correct => "■".green(),
            };

            write!(f, "{}", square)?;
        }
        Ok(())
    }
}

#[cfg(not(feature = "terminal"))]
impl<const N: usize> fmt::Display for HintsN<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &hint in self.0.iter() {
            let square = match hint {
                Hint::Wrong => "W",
                Hint::OutOfPlace => "O",
                Hint::Correct => "C",
            };

            write!(f, "{}", square)?;
        }
        Ok(())
    }
}

impl<const N: usize> TryFrom<Vec<Hint>> for HintsN<N> {
    type Error = HintsError;

    fn try_from(value: Vec<Hint>) -> Result<Self, Self::Error> {
        let found = value.len();
        value
            .try_into()
            .map(Self)
            .map_err(|_| HintsError::IncorrectLength {
                expected_length: N,
                found,
            })
    }
}
