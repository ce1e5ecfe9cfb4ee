/*!
Text renderings of decoded words.

The one-line text form is what the command line tool prints, one line per
input word. Unrecognized words get a line of their own so that decoding drift
in a stream stays visible.
*/

use crate::word::{DecodedWord, WordKind};
use std::fmt;

impl fmt::Display for DecodedWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x} {}", self.raw, self.category())?;

        match self.kind {
            WordKind::ModuleHeader(header) => write!(
                f,
                ", module_id={:#04x}, module_setting={:#x}, data_length={} words",
                header.module_id, header.module_setting, header.data_length
            ),
            WordKind::DataWord(data) => write!(
                f,
                ", channel_address={:2}, mdpp_flags={:#x}",
                data.channel_address, data.mdpp_flags
            ),
            WordKind::ExtendedTimestamp(ts) => write!(f, ", high_stamp={}", ts.high_stamp),
            WordKind::EndOfEvent(eoe) => write!(f, ", low_stamp={}", eoe.low_stamp),
            WordKind::FillWord | WordKind::Unrecognized => Ok(()),
        }
    }
}

/// Render a decoded word as one line of text, without a line terminator
pub fn render(word: &DecodedWord) -> String {
    word.to_string()
}

/// Render a decoded word as one JSON object
pub fn to_json_line(word: &DecodedWord) -> serde_json::Result<String> {
    serde_json::to_string(word)
}
