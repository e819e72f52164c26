// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::segments::Segments;
use chrono::{DateTime, Utc};
#[cfg(test)]
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Convenience type alias for usage within lexid.
#[cfg(test)]
pub(crate) type BoxDynError = Box<dyn StdError + 'static + Send + Sync>;

/// Which encoded part of an ID failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Time,
    Counter,
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentKind::Time => f.write_str("time"),
            SegmentKind::Counter => f.write_str("counter"),
        }
    }
}

/// The error type for this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid lexid length: {id:?} is {len} bytes, need at least {min}")]
    InvalidLength { id: String, len: usize, min: usize },
    #[error("invalid lexid or separator: {id:?} splits on {separator:?} into {parts} segments, expected 3")]
    InvalidSeparator {
        id: String,
        separator: String,
        parts: usize,
    },
    #[error("invalid lexid: segment boundary at byte {index} of {id:?} is inside a character")]
    InvalidBoundary { id: String, index: usize },
    #[error("unable to parse {segment} segment: {raw:?}")]
    InvalidSegment { segment: SegmentKind, raw: String },
    #[error("epoch `{0}` is ahead of current time")]
    EpochAheadOfCurrentTime(DateTime<Utc>),
    #[error("separator {0:?} must not contain lexid digits")]
    SeparatorInAlphabet(String),
    #[error("identity {identity:?} must start with separator {separator:?} and contain it only once")]
    IdentitySeparatorMismatch { identity: String, separator: String },
    #[error("min_counter_length {min} cannot hold the largest counter, need {required}")]
    CounterLengthTooShort { min: usize, required: usize },
    #[error("{kind} {min} cannot hold the current time, need {required}")]
    TimeLengthTooShort {
        kind: &'static str,
        min: usize,
        required: usize,
    },
}

/// A failed [`parse`], still carrying whatever could be decoded.
///
/// [`parse`]: crate::Generator::parse
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct ParseError {
    #[source]
    reason: Error,
    segments: Segments,
}

impl ParseError {
    pub(crate) fn new(reason: Error, segments: Segments) -> Self {
        Self { reason, segments }
    }

    /// Why parsing failed.
    pub fn reason(&self) -> &Error {
        &self.reason
    }

    /// The best-effort decode. Fields that could not be decoded are zero.
    pub fn segments(&self) -> &Segments {
        &self.segments
    }

    pub fn into_segments(self) -> Segments {
        self.segments
    }
}
