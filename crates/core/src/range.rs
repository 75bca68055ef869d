//! HTTP-Range-style pagination over ordinal collection positions.
//!
//! A `Range` describes the inclusive window `[start, end]` over a collection
//! of `size` items, and converts to/from the textual forms used on the wire:
//! requests send `"<unit>=<start>-<end>"`, responses carry
//! `"<unit> <start>-<end>/<size>"`.

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Range {
    pub start: usize,
    pub end: usize,
    /// Total collection size; filled in by the producer once known.
    pub size: usize,
}

impl Range {
    /// An unset range is the default first-page request, not an error.
    pub fn is_zero(&self) -> bool {
        self.start == 0 && self.end == 0
    }

    /// Parse a request header of the form `"<unit>=<start>-<end>"`.
    ///
    /// Fails with [`Error::BadRange`] when the unit does not match, the
    /// bounds are not integers, or `start > end`. On success only `start`
    /// and `end` are set; `size` is left for the producer.
    pub fn parse_header(&mut self, header: &str, unit: &str) -> Result<()> {
        let malformed = || Error::BadRange(format!("malformed range header {header:?}"));

        let bounds = header
            .strip_prefix(unit)
            .and_then(|rest| rest.strip_prefix('='))
            .ok_or_else(malformed)?;
        let (start, end) = bounds.split_once('-').ok_or_else(malformed)?;

        let start: usize = start.trim().parse().map_err(|_| malformed())?;
        let end: usize = end.trim().parse().map_err(|_| malformed())?;
        if start > end {
            return Err(Error::BadRange(format!(
                "range start {start} is greater than end {end}"
            )));
        }

        self.start = start;
        self.end = end;
        Ok(())
    }

    /// Render the response header `"<unit> <start>-<end>/<size>"`.
    pub fn content_range_header(&self, unit: &str) -> String {
        format!("{unit} {}-{}/{}", self.start, self.end, self.size)
    }

    /// Resolve this requested window against a collection of `size` items.
    ///
    /// `end` past the last position is silently clamped; callers detect the
    /// partial fulfilment by comparing the returned `end`. A `start` at or
    /// past the end of the collection is an error rather than an empty page:
    /// it distinguishes "page partially exists" from "page starts beyond
    /// data" and maps to 416 upstream.
    pub fn window(&self, size: usize) -> Result<Range> {
        if self.start > self.end {
            return Err(Error::BadRange(format!(
                "range start {} is greater than end {}",
                self.start, self.end
            )));
        }
        if self.start >= size {
            return Err(Error::BadRange(format!(
                "range start {} is past the end of {size} items",
                self.start
            )));
        }
        Ok(Range {
            start: self.start,
            end: self.end.min(size - 1),
            size,
        })
    }
}
