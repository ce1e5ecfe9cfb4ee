/*!
Decoding of single data words.

This module turns a raw 32-bit word into a [`DecodedWord`]. Classification
walks [`CLASSIFICATION_RULES`] in priority order; extraction reads the fields
of the winning category through the [`layout`](crate::layout) constants.
*/

use crate::layout::{self, Category, CLASSIFICATION_RULES};
use serde::{Deserialize, Serialize};

/// Start of one module's event data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleHeader {
    pub module_id: u8,
    pub module_setting: u8,
    /// Number of data words that follow the header
    pub data_length: u16,
}

impl ModuleHeader {
    pub fn from_word(word: u32) -> Self {
        Self {
            module_id: layout::MODULE_ID.extract(word) as u8,
            module_setting: layout::MODULE_SETTING.extract(word) as u8,
            data_length: layout::DATA_LENGTH.extract(word) as u16,
        }
    }
}

/// One channel's measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataWord {
    pub channel_address: u8,
    pub mdpp_flags: u8,
}

impl DataWord {
    pub fn from_word(word: u32) -> Self {
        Self {
            channel_address: layout::CHANNEL_ADDRESS.extract(word) as u8,
            mdpp_flags: layout::MDPP_FLAGS.extract(word) as u8,
        }
    }
}

/// Upper 16 bits of a 48-bit event timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedTimestamp {
    pub high_stamp: u16,
}

impl ExtendedTimestamp {
    pub fn from_word(word: u32) -> Self {
        Self {
            high_stamp: layout::HIGH_STAMP.extract(word) as u16,
        }
    }
}

/// End of one module's event data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndOfEvent {
    /// Lower 30 bits of the event timestamp
    pub low_stamp: u32,
}

impl EndOfEvent {
    pub fn from_word(word: u32) -> Self {
        Self {
            low_stamp: layout::LOW_STAMP.extract(word),
        }
    }
}

/// What a word turned out to be, with the fields that exist for it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WordKind {
    ModuleHeader(ModuleHeader),
    DataWord(DataWord),
    ExtendedTimestamp(ExtendedTimestamp),
    EndOfEvent(EndOfEvent),
    FillWord,
    Unrecognized,
}

impl WordKind {
    pub fn category(&self) -> Category {
        match self {
            Self::ModuleHeader(_) => Category::ModuleHeader,
            Self::DataWord(_) => Category::DataWord,
            Self::ExtendedTimestamp(_) => Category::ExtendedTimestamp,
            Self::EndOfEvent(_) => Category::EndOfEvent,
            Self::FillWord => Category::FillWord,
            Self::Unrecognized => Category::Unrecognized,
        }
    }
}

/// A raw word and its decoded form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedWord {
    pub raw: u32,
    pub kind: WordKind,
}

impl DecodedWord {
    /// Decode a raw word
    pub fn decode(raw: u32) -> Self {
        let kind = match classify(raw) {
            Category::ModuleHeader => WordKind::ModuleHeader(ModuleHeader::from_word(raw)),
            Category::DataWord => WordKind::DataWord(DataWord::from_word(raw)),
            Category::ExtendedTimestamp => {
                WordKind::ExtendedTimestamp(ExtendedTimestamp::from_word(raw))
            }
            Category::EndOfEvent => WordKind::EndOfEvent(EndOfEvent::from_word(raw)),
            Category::FillWord => WordKind::FillWord,
            Category::Unrecognized => WordKind::Unrecognized,
        };

        Self { raw, kind }
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }

    /// Check if no known bit pattern matched the word
    pub fn is_unrecognized(&self) -> bool {
        matches!(self.kind, WordKind::Unrecognized)
    }
}

impl From<u32> for DecodedWord {
    fn from(raw: u32) -> Self {
        Self::decode(raw)
    }
}

/// Decode a raw word. Every 32-bit value decodes; words matching no pattern
/// come back as [`WordKind::Unrecognized`].
pub fn decode(word: u32) -> DecodedWord {
    DecodedWord::decode(word)
}

/// Category of a word, without extracting its fields
pub fn classify(word: u32) -> Category {
    CLASSIFICATION_RULES
        .iter()
        .find(|rule| rule.matches(word))
        .map_or(Category::Unrecognized, |rule| rule.category)
}

/// Every category whose patterns match the word, highest priority first.
///
/// With the current layout this yields exactly one category per word.
pub fn matching_categories(word: u32) -> impl Iterator<Item = Category> {
    Category::ALL
        .into_iter()
        .filter(move |category| category.matches(word))
}
