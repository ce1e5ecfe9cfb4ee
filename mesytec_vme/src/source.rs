/*!
Reading data words from text.

Input is any number of lines holding whitespace-separated integer tokens.
The base of each token is taken from its prefix, the way a C++ stream with
no basefield flags reads integers: `0x`/`0X` for hexadecimal, a leading `0`
for octal and decimal otherwise.
*/

use crate::error::{Result, SourceError};
use std::collections::VecDeque;
use std::io::BufRead;
use std::num::IntErrorKind;
use tracing::{debug, trace};

/// Parse one token into a data word.
///
/// `line` is the 1-based line number reported in errors.
pub fn parse_token(token: &str, line: usize) -> Result<u32> {
    let (digits, radix) = if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        (hex, 16)
    } else if token.len() > 1 && token.starts_with('0') {
        (&token[1..], 8)
    } else {
        (token, 10)
    };

    // from_str_radix would also take a sign
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(SourceError::invalid_token(token, line));
    }

    u32::from_str_radix(digits, radix).map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => SourceError::out_of_range(token, line),
        _ => SourceError::invalid_token(token, line),
    })
}

/// Iterator over the data words of a text reader.
///
/// Yields words in input order. Iteration ends at end of input, or after the
/// first error has been yielded.
pub struct WordSource<R> {
    reader: R,
    line: usize,
    pending: VecDeque<String>,
    buffer: String,
    finished: bool,
}

impl<R: BufRead> WordSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            pending: VecDeque::new(),
            buffer: String::new(),
            finished: false,
        }
    }

    /// Number of lines read so far
    pub fn lines_read(&self) -> usize {
        self.line
    }

    /// Read lines until one holds at least one token. Returns false at end of input.
    fn fill_pending(&mut self) -> Result<bool> {
        while self.pending.is_empty() {
            self.buffer.clear();
            if self.reader.read_line(&mut self.buffer)? == 0 {
                debug!(lines = self.line, "end of input");
                return Ok(false);
            }
            self.line += 1;
            self.pending
                .extend(self.buffer.split_whitespace().map(str::to_owned));
            trace!(line = self.line, tokens = self.pending.len(), "read line");
        }
        Ok(true)
    }
}

impl<R: BufRead> Iterator for WordSource<R> {
    type Item = Result<u32>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let item = match self.fill_pending() {
            Ok(true) => {
                let token = self.pending.pop_front()?;
                parse_token(&token, self.line)
            }
            Ok(false) => {
                self.finished = true;
                return None;
            }
            Err(e) => Err(e),
        };

        if item.is_err() {
            self.finished = true;
        }
        Some(item)
    }
}
