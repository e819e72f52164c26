use crate::Generator;
use crate::clock;
use crate::codec::{self, ALPHABET};
use crate::error::Error;
use crate::global::defaults;
use chrono::prelude::*;

/// A builder for building the [`Generator`].
///
/// Every field starts from the process-wide [`Defaults`](crate::Defaults).
#[derive(Debug, Clone)]
pub struct Builder {
    separator: String,
    identity: String,
    min_counter_length: usize,
    min_time_length: usize,
    min_nano_time_length: usize,
    min_date_offset: i64,
    min_nano_date_offset: i64,
    epoch: Option<DateTime<Utc>>,
}

impl Default for Builder {
    fn default() -> Self {
        Builder::new()
    }
}

impl Builder {
    /// Construct a new builder for the build of [`Generator`].
    pub fn new() -> Self {
        let defaults = defaults();
        Self {
            separator: defaults.separator.clone(),
            identity: defaults.identity.clone(),
            min_counter_length: defaults.min_counter_length,
            min_time_length: defaults.min_time_length,
            min_nano_time_length: defaults.min_nano_time_length,
            min_date_offset: defaults.min_date_offset,
            min_nano_date_offset: defaults.min_nano_date_offset,
            epoch: None,
        }
    }

    /// Set the separator placed between segments.
    /// An empty separator switches to fixed-width segments.
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Set the identity suffix of this server or process.
    /// With a non-empty separator it must start with the separator, e.g. `~1`.
    pub fn identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = identity.into();
        self
    }

    /// Set the minimum width of the counter segment.
    pub fn min_counter_length(mut self, min_counter_length: usize) -> Self {
        self.min_counter_length = min_counter_length;
        self
    }

    /// Set the minimum width of the time segment of second-based IDs.
    pub fn min_time_length(mut self, min_time_length: usize) -> Self {
        self.min_time_length = min_time_length;
        self
    }

    /// Set the minimum width of the time segment of nanosecond-based IDs.
    pub fn min_nano_time_length(mut self, min_nano_time_length: usize) -> Self {
        self.min_nano_time_length = min_nano_time_length;
        self
    }

    /// Set the unix seconds subtracted before encoding second-based IDs.
    pub fn min_date_offset(mut self, min_date_offset: i64) -> Self {
        self.min_date_offset = min_date_offset;
        self
    }

    /// Set the unix nanoseconds subtracted before encoding nanosecond-based IDs.
    pub fn min_nano_date_offset(mut self, min_nano_date_offset: i64) -> Self {
        self.min_nano_date_offset = min_nano_date_offset;
        self
    }

    /// Set both date offsets from one epoch, such as [`offset_2020`](crate::offset_2020).
    /// If the epoch is later than the current time, `finalize` will fail.
    pub fn epoch(mut self, epoch: DateTime<Utc>) -> Self {
        self.epoch = Some(epoch);
        self
    }

    /// Finish building and create a Generator instance.
    /// This method will return an error if the layout could produce IDs that do not parse back.
    pub fn finalize(mut self) -> Result<Generator, Error> {
        if let Some(epoch) = self.epoch {
            if epoch > Utc::now() {
                return Err(Error::EpochAheadOfCurrentTime(epoch));
            }
            self.min_date_offset = epoch.timestamp();
            // before 1677 the nanosecond offset does not fit and stays untouched
            if let Some(nanos) = epoch.timestamp_nanos_opt() {
                self.min_nano_date_offset = nanos;
            }
        }

        if self.separator.bytes().any(|b| ALPHABET.contains(&b)) {
            return Err(Error::SeparatorInAlphabet(self.separator));
        }

        if self.separator.is_empty() {
            self.check_fixed_widths()?;
        } else if !identity_fits(&self.separator, &self.identity) {
            return Err(Error::IdentitySeparatorMismatch {
                identity: self.identity,
                separator: self.separator,
            });
        }

        Ok(Generator::new_inner(
            self.separator,
            self.identity,
            self.min_counter_length,
            self.min_time_length,
            self.min_nano_time_length,
            self.min_date_offset,
            self.min_nano_date_offset,
        ))
    }

    /// Without a separator, segments are cut by width, so every width must hold its value.
    fn check_fixed_widths(&self) -> Result<(), Error> {
        let required = codec::encoded_len(i64::from(u32::MAX));
        if self.min_counter_length < required {
            return Err(Error::CounterLengthTooShort {
                min: self.min_counter_length,
                required,
            });
        }

        let required =
            codec::encoded_len(clock::unix_seconds().saturating_sub(self.min_date_offset));
        if self.min_time_length < required {
            return Err(Error::TimeLengthTooShort {
                kind: "min_time_length",
                min: self.min_time_length,
                required,
            });
        }

        let required =
            codec::encoded_len(clock::unix_nanos().saturating_sub(self.min_nano_date_offset));
        if self.min_nano_time_length < required {
            return Err(Error::TimeLengthTooShort {
                kind: "min_nano_time_length",
                min: self.min_nano_time_length,
                required,
            });
        }
        Ok(())
    }
}

/// With a separator, the identity must start with it and hold no other copy, so a rendered ID
/// splits into exactly three parts.
pub(crate) fn identity_fits(separator: &str, identity: &str) -> bool {
    separator.is_empty()
        || (identity.starts_with(separator) && identity.matches(separator).count() == 1)
}
