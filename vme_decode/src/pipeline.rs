/*!
Word-at-a-time decoding pipeline.

1. Reader thread: text input -> parsed words -> bounded channel
2. Main thread: channel -> decode -> render -> output, in input order

The reader stops at the first malformed token. Everything decoded before it
is written and flushed before the error is returned.
*/

use anyhow::{anyhow, Context, Result};
use crossbeam_channel::bounded;
use mesytec_vme::protocol::WORD_CHANNEL_CAPACITY;
use mesytec_vme::{decode, Category, WordSource};
use std::io::{BufReader, BufWriter, Read, Write};
use std::thread;
use tracing::{debug, error, info, warn};

/// Per-category word counts of one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    counts: [u64; Category::ALL.len()],
}

impl RunSummary {
    fn record(&mut self, category: Category) {
        self.counts[category.index()] += 1;
    }

    /// Number of words decoded as `category`
    pub fn count(&self, category: Category) -> u64 {
        self.counts[category.index()]
    }

    /// Number of words decoded
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Decode every word of `input` and write one line per word to `output`.
pub fn run<R, W>(input: R, output: W) -> Result<RunSummary>
where
    R: Read + Send + 'static,
    W: Write,
{
    debug!("Reading data words");
    let (word_tx, word_rx) = bounded(WORD_CHANNEL_CAPACITY);

    let reader_handle = thread::Builder::new()
        .name("word-source".to_string())
        .spawn(move || {
            for item in WordSource::new(BufReader::new(input)) {
                let failed = item.is_err();
                if word_tx.send(item).is_err() || failed {
                    break;
                }
            }
        })
        .context("Failed to start word source thread")?;

    let mut out = BufWriter::new(output);
    let mut summary = RunSummary::default();
    let mut failure = None;

    for item in word_rx.iter() {
        let raw = match item {
            Ok(raw) => raw,
            Err(e) => {
                failure = Some(e);
                break;
            }
        };

        let word = decode(raw);
        if word.is_unrecognized() {
            warn!("Unrecognized data word {:#010x}", raw);
        }
        summary.record(word.category());
        writeln!(out, "{word}").context("Failed to write decoded word")?;

        // Nothing queued: the source is waiting on input, show what we have
        if word_rx.is_empty() {
            out.flush().context("Failed to flush output")?;
        }
    }

    out.flush().context("Failed to flush output")?;
    reader_handle
        .join()
        .map_err(|_| anyhow!("Word source thread panicked"))?;

    if let Some(e) = failure {
        error!("Stopped reading input: {}", e);
        return Err(e).context("Failed to read data words");
    }

    debug!("Input exhausted");
    info!(
        total = summary.total(),
        module_headers = summary.count(Category::ModuleHeader),
        data_words = summary.count(Category::DataWord),
        extended_ts = summary.count(Category::ExtendedTimestamp),
        end_of_event = summary.count(Category::EndOfEvent),
        fill_words = summary.count(Category::FillWord),
        unrecognized = summary.count(Category::Unrecognized),
        "Decoding finished"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesytec_vme::SourceError;
    use std::io::Cursor;

    fn run_str(input: &str) -> (Result<RunSummary>, String) {
        let mut output = Vec::new();
        let result = run(Cursor::new(input.to_owned()), &mut output);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_documented_event() {
        let (result, output) = run_str(
            "0x40010c07 0x10100868 0x1000036e 0x103002aa 0x10110868 0x10010417 0x10310317 0xc18d01bd\n",
        );
        let expected = "\
0x40010c07 module_header, module_id=0x01, module_setting=0x3, data_length=7 words
0x10100868 data_word, channel_address=16, mdpp_flags=0x0
0x1000036e data_word, channel_address= 0, mdpp_flags=0x0
0x103002aa data_word, channel_address=48, mdpp_flags=0x0
0x10110868 data_word, channel_address=17, mdpp_flags=0x0
0x10010417 data_word, channel_address= 1, mdpp_flags=0x0
0x10310317 data_word, channel_address=49, mdpp_flags=0x0
0xc18d01bd end_of_event, low_stamp=26018237
";
        assert_eq!(output, expected);

        let summary = result.unwrap();
        assert_eq!(summary.total(), 8);
        assert_eq!(summary.count(Category::ModuleHeader), 1);
        assert_eq!(summary.count(Category::DataWord), 6);
        assert_eq!(summary.count(Category::EndOfEvent), 1);
    }

    #[test]
    fn test_empty_input() {
        let (result, output) = run_str("");
        assert_eq!(result.unwrap(), RunSummary::default());
        assert!(output.is_empty());
    }

    #[test]
    fn test_unrecognized_and_fill_words_are_printed() {
        let (result, output) = run_str("0x80000000\n0\n0x0480002a\n");
        assert_eq!(
            output,
            "0x80000000 unrecognized\n0x00000000 fill_word\n0x0480002a extended_ts, high_stamp=42\n"
        );
        let summary = result.unwrap();
        assert_eq!(summary.count(Category::Unrecognized), 1);
        assert_eq!(summary.count(Category::FillWord), 1);
        assert_eq!(summary.count(Category::ExtendedTimestamp), 1);
    }

    #[test]
    fn test_order_is_preserved_for_long_input() {
        let count = WORD_CHANNEL_CAPACITY * 3;
        let input: String = (0..count as u32)
            .map(|i| format!("{:#x}\n", 0xC000_0000 | i))
            .collect();
        let (result, output) = run_str(&input);

        assert_eq!(result.unwrap().count(Category::EndOfEvent), count as u64);
        for (i, line) in output.lines().enumerate() {
            assert_eq!(line, format!("{:#010x} end_of_event, low_stamp={}", 0xC000_0000u32 | i as u32, i));
        }
        assert_eq!(output.lines().count(), count);
    }

    #[test]
    fn test_bad_token_keeps_earlier_output() {
        let (result, output) = run_str("0x40010c07\n0xc18d01bd zzz 0x10100868\n");
        assert_eq!(
            output,
            "0x40010c07 module_header, module_id=0x01, module_setting=0x3, data_length=7 words\n\
             0xc18d01bd end_of_event, low_stamp=26018237\n"
        );

        let err = result.unwrap_err();
        let source = err.downcast_ref::<SourceError>().unwrap();
        assert_eq!(source.line(), Some(2));
    }

    #[test]
    fn test_out_of_range_token_fails() {
        let (result, output) = run_str("0x1ffffffff\n");
        assert!(output.is_empty());
        assert!(matches!(
            result.unwrap_err().downcast_ref::<SourceError>(),
            Some(SourceError::OutOfRange { line: 1, .. })
        ));
    }
}
