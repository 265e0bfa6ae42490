use crate::error::Result;
use crate::outline::Outline;
use std::io::{Read, Seek, SeekFrom};
use tracing::debug;

/// A readable input that can be re-read from the start.
pub trait InputStream: Read + Seek {}

impl<T: Read + Seek> InputStream for T {}

/// A format that can recognize its own documents and build an [`Outline`] from them.
pub trait Parser {
    /// Short identifier used in logs, error messages and `--list-type`.
    fn name(&self) -> &'static str;

    /// Returns `true` if `input` looks like this format.
    ///
    /// Must leave the stream at the position it was called with and must never
    /// fail: anything unreadable is simply "not this format".
    fn sniff(&self, input: &mut dyn InputStream) -> bool;

    /// Builds the outline. Callers rewind `input` and only call this after
    /// `sniff` returned `true` for the same stream.
    fn parse(&self, input: &mut dyn InputStream) -> Result<Outline>;
}

/// Runs a sniff check and restores the stream position afterwards.
///
/// Errors raised by `check` count as a negative answer.
pub fn probe<F>(format: &'static str, input: &mut dyn InputStream, check: F) -> bool
where
    F: FnOnce(&mut dyn InputStream) -> anyhow::Result<bool>,
{
    let start = match input.stream_position() {
        Ok(pos) => pos,
        Err(e) => {
            debug!(format, error = %e, "input position unavailable");
            return false;
        }
    };

    let matched = match check(&mut *input) {
        Ok(matched) => matched,
        Err(e) => {
            debug!(format, error = %e, "sniff rejected input");
            false
        }
    };

    if let Err(e) = input.seek(SeekFrom::Start(start)) {
        debug!(format, error = %e, "could not restore input position");
        return false;
    }
    matched
}
