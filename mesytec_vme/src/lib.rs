/*!
# mesytec VME Data Words

Classification and field extraction for the 32-bit data words read out of
mesytec VME modules (MDPP and MxDC families).

A readout stream is a flat sequence of words with no length prefix: the bit
pattern of each word alone says what it is. [`decode`] turns one raw word into
a [`DecodedWord`] whose [`WordKind`] carries only the fields that exist for
that kind of word.

## Core Types

- [`Category`] - Word categories in classification priority order
- [`DecodedWord`] - A raw word together with its decoded [`WordKind`]
- [`WordSource`] - Iterator of words parsed from text input

## Modules

- [`layout`] - Bit patterns and field positions of every category
- [`word`] - Decoding of single words
- [`render`] - One-line text and JSON renderings
- [`source`] - Parsing words from whitespace-separated text
- [`error`] - Error types of the text source

## Example

```
use mesytec_vme::{decode, WordKind};

let word = decode(0x40010c07);
match word.kind {
    WordKind::ModuleHeader(header) => assert_eq!(header.data_length, 7),
    _ => unreachable!(),
}
assert_eq!(
    word.to_string(),
    "0x40010c07 module_header, module_id=0x01, module_setting=0x3, data_length=7 words"
);
```
*/

pub mod error;
pub mod layout;
pub mod render;
pub mod source;
pub mod word;

// Re-export commonly used types
pub use error::{Result, SourceError};
pub use layout::{BitField, BitPattern, Category, ClassificationRule, CLASSIFICATION_RULES};
pub use render::{render, to_json_line};
pub use source::{parse_token, WordSource};
pub use word::{
    classify, decode, matching_categories, DataWord, DecodedWord, EndOfEvent, ExtendedTimestamp,
    ModuleHeader, WordKind,
};

/// Version information for the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Protocol constants
pub mod protocol {
    /// Size of a data word in bytes
    pub const WORD_SIZE_BYTES: usize = 4;

    /// Size of a data word in bits
    pub const WORD_SIZE_BITS: u32 = 32;

    /// Width of the low timestamp carried by an end of event word
    pub const LOW_STAMP_BITS: u32 = 30;

    /// Width of the high timestamp carried by an extended timestamp word
    pub const HIGH_STAMP_BITS: u32 = 16;

    /// Maximum number of data words announced by a module header
    pub const MAX_DATA_LENGTH: u16 = 1023;

    /// Number of parsed words buffered between the reader and the decoder
    pub const WORD_CHANNEL_CAPACITY: usize = 4096;
}
