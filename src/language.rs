//! Language type: validated representation of the supported article languages.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::EngineError;

/// A supported article language.
///
/// Articles are authored canonically in English; the other languages are
/// translation targets or secondary-content languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Language {
    English,
    Arabic,
    Indonesian,
    Turkish,
}

impl Language {
    /// All supported languages, in canonical-first order.
    pub const ALL: [Language; 4] = [
        Language::English,
        Language::Arabic,
        Language::Indonesian,
        Language::Turkish,
    ];

    /// Create a Language from an ISO 639-1 code.
    pub fn from_code(code: &str) -> Result<Language, EngineError> {
        match code {
            "en" => Ok(Language::English),
            "ar" => Ok(Language::Arabic),
            "id" => Ok(Language::Indonesian),
            "tr" => Ok(Language::Turkish),
            _ => Err(EngineError::InvalidLanguage {
                code: code.to_string(),
            }),
        }
    }

    /// The ISO 639-1 language code (e.g. "en", "ar").
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Arabic => "ar",
            Language::Indonesian => "id",
            Language::Turkish => "tr",
        }
    }

    /// The English name of the language.
    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Arabic => "Arabic",
            Language::Indonesian => "Indonesian",
            Language::Turkish => "Turkish",
        }
    }

    /// The canonical (source) language. All machine translations derive from
    /// content in this language.
    pub fn canonical() -> Language {
        Language::English
    }

    /// Whether this is the canonical language.
    pub fn is_canonical(&self) -> bool {
        *self == Language::canonical()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_code(s)
    }
}

// Manual serde impls so the type serializes as its bare code. This keeps it
// usable as a string map key in both JSON documents and BSON documents.
impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CodeVisitor;

        impl<'de> Visitor<'de> for CodeVisitor {
            type Value = Language;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a supported language code (en, ar, id, tr)")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Language, E> {
                Language::from_code(value).map_err(|_| {
                    de::Error::invalid_value(de::Unexpected::Str(value), &self)
                })
            }
        }

        deserializer.deserialize_str(CodeVisitor)
    }
}
