use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::alphabet::{Alphabet, AlphabetError};

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Engwordle,
    Primel,
    Nerdle,
}

/// Where word weights come from when a vocabulary is built.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightSource {
    /// The `Points` column of the input table.
    Table,
    /// Every word weighs 1.
    Uniform,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantConfig {
    pub variant: Variant,
    pub symbols: Vec<char>,
    pub length: usize,
    pub tryouts: usize,
    pub weight_source: WeightSource,
}

impl VariantConfig {
    pub fn alphabet(&self) -> Result<Alphabet, AlphabetError> {
        Alphabet::new(self.symbols.iter().copied())
    }

    pub fn table_file(&self) -> String {
        format!("{}.csv", self.variant)
    }

    fn builtin(variant: Variant) -> Self {
        let (symbols, length, weight_source): (Vec<char>, _, _) = match variant {
            Variant::Engwordle => (
                ('a'..='z').chain('A'..='Z').collect(),
                5,
                WeightSource::Table,
            ),
            Variant::Primel => (('0'..='9').collect(), 5, WeightSource::Uniform),
            Variant::Nerdle => (
                ('0'..='9').chain("+-*/=".chars()).collect(),
                8,
                WeightSource::Uniform,
            ),
        };

        Self {
            variant,
            symbols,
            length,
            tryouts: 6,
            weight_source,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct VariantRegistry {
    configs: FxHashMap<Variant, VariantConfig>,
}

impl VariantRegistry {
    pub fn builtin() -> Self {
        Self {
            configs: Variant::iter()
                .map(|variant| (variant, VariantConfig::builtin(variant)))
                .collect(),
        }
    }

    pub fn register(&mut self, config: VariantConfig) -> Option<VariantConfig> {
        self.configs.insert(config.variant, config)
    }

    pub fn get(&self, variant: Variant) -> Option<&VariantConfig> {
        self.configs.get(&variant)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VariantConfig> {
        Variant::iter().filter_map(|variant| self.configs.get(&variant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case("engwordle", Variant::Engwordle, 5, 26)]
    #[case("Primel", Variant::Primel, 5, 10)]
    #[case("NERDLE", Variant::Nerdle, 8, 15)]
    fn builtin_variants(
        #[case] name: &str,
        #[case] variant: Variant,
        #[case] length: usize,
        #[case] symbols: usize,
    ) {
        assert_eq!(Variant::from_str(name).unwrap(), variant);

        let registry = VariantRegistry::builtin();
        let config = registry.get(variant).unwrap();
        assert_eq!(config.length, length);
        assert_eq!(config.tryouts, 6);
        assert_eq!(config.alphabet().unwrap().len(), symbols);
        assert_eq!(config.table_file(), format!("{}.csv", name.to_lowercase()));
    }

    #[test]
    fn unknown_variant() {
        assert!(Variant::from_str("quordle").is_err());
    }

    #[test]
    fn register_overrides() {
        let mut registry = VariantRegistry::builtin();
        let mut config = registry.get(Variant::Primel).unwrap().clone();
        config.tryouts = 8;

        assert!(registry.register(config).is_some());
        assert_eq!(registry.get(Variant::Primel).unwrap().tryouts, 8);
        assert_eq!(registry.iter().count(), 3);
    }
}
