//! Mapping table: ordered multi-character patterns plus a single-character map.
//!
//! Keys are stored lower-cased; lookups compare against the lower-case view of
//! the input and the caller restores case afterwards.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::{Error, Result};

const BUILTIN_MULTI: &[(&str, &str)] = &[
    ("shch", "щ"),
    ("sch", "щ"),
    ("yo", "ё"),
    ("jo", "ё"),
    ("zh", "ж"),
    ("kh", "х"),
    ("ts", "ц"),
    ("ch", "ч"),
    ("sh", "ш"),
    ("yu", "ю"),
    ("ju", "ю"),
    ("ya", "я"),
    ("ja", "я"),
    ("ye", "е"),
    ("je", "е"),
];

const BUILTIN_SINGLE: &[(char, &str)] = &[
    ('a', "а"),
    ('b', "б"),
    ('v', "в"),
    ('g', "г"),
    ('d', "д"),
    ('e', "е"),
    ('z', "з"),
    ('i', "и"),
    ('j', "й"),
    ('y', "ы"),
    ('k', "к"),
    ('l', "л"),
    ('m', "м"),
    ('n', "н"),
    ('o', "о"),
    ('p', "п"),
    ('r', "р"),
    ('s', "с"),
    ('t', "т"),
    ('u', "у"),
    ('f', "ф"),
    ('h', "х"),
    ('c', "ц"),
    ('x', "кс"),
    ('q', "к"),
    ('w', "в"),
    // apostrophe is the soft sign
    ('\'', "ь"),
];

/// A multi-character pattern, pre-split into chars for positional matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiPattern {
    pub latin: Vec<char>,
    pub cyrillic: String,
}

/// Immutable transliteration table. Built once and handed to a `Transliterator`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingTable {
    multi: Vec<MultiPattern>,
    single: HashMap<char, String>,
}

impl Default for MappingTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl MappingTable {
    pub fn builtin() -> Self {
        let multi = BUILTIN_MULTI
            .iter()
            .map(|(latin, cyr)| MultiPattern {
                latin: latin.chars().collect(),
                cyrillic: cyr.to_string(),
            })
            .collect();
        let single = BUILTIN_SINGLE
            .iter()
            .map(|(latin, cyr)| (*latin, cyr.to_string()))
            .collect();

        Self { multi, single }
    }

    /// Build a table from explicit parts. Keys are lower-cased; an empty
    /// multi pattern is rejected because it would match at every position.
    pub fn from_parts(
        multi: Vec<(String, String)>,
        single: impl IntoIterator<Item = (char, String)>,
    ) -> Result<Self> {
        let mut patterns = Vec::with_capacity(multi.len());
        for (latin, cyrillic) in multi {
            if latin.is_empty() {
                return Err(Error::config_invalid_value(
                    "mapping_multi",
                    Some(cyrillic),
                    "Pattern must not be empty",
                ));
            }
            patterns.push(MultiPattern {
                latin: latin.to_lowercase().chars().collect(),
                cyrillic,
            });
        }

        let single = single
            .into_iter()
            .map(|(latin, cyr)| (latin.to_ascii_lowercase(), cyr))
            .collect();

        Ok(Self {
            multi: patterns,
            single,
        })
    }

    /// Apply a config file's overrides on top of the built-in table:
    /// `mapping_multi` replaces the ordered list, `mapping_single` is merged.
    pub fn from_config(config: &TableConfig) -> Result<Self> {
        let base = Self::builtin();

        let multi = match &config.mapping_multi {
            Some(pairs) => pairs.clone(),
            None => base
                .multi
                .iter()
                .map(|p| (p.latin.iter().collect(), p.cyrillic.clone()))
                .collect(),
        };

        let mut single = base.single;
        if let Some(overrides) = &config.mapping_single {
            for (key, value) in overrides {
                let mut chars = key.chars();
                let ch = match (chars.next(), chars.next()) {
                    (Some(ch), None) => ch,
                    _ => {
                        return Err(Error::config_invalid_value(
                            "mapping_single",
                            Some(key.clone()),
                            "Key must be exactly one character",
                        ))
                    }
                };
                single.insert(ch.to_ascii_lowercase(), value.clone());
            }
        }

        Self::from_parts(multi, single)
    }

    pub fn multi(&self) -> &[MultiPattern] {
        &self.multi
    }

    pub fn single(&self, lower: char) -> Option<&str> {
        self.single.get(&lower).map(String::as_str)
    }

    /// Serializable view, in the same shape the config file uses.
    pub fn to_config(&self) -> TableConfig {
        let single: BTreeMap<String, String> = self
            .single
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();

        TableConfig {
            mapping_multi: Some(
                self.multi
                    .iter()
                    .map(|p| (p.latin.iter().collect(), p.cyrillic.clone()))
                    .collect(),
            ),
            mapping_single: Some(single),
        }
    }
}

/// On-disk table override (`translit_config.json`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping_multi: Option<Vec<(String, String)>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping_single: Option<BTreeMap<String, String>>,
}
