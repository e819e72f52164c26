use crate::builder::{Builder, identity_fits};
use crate::error::*;
use crate::global::{self, defaults};
use crate::segments::Segments;
use crate::{clock, codec};
use std::sync::atomic::{AtomicU64, Ordering};

/// Generator issues lexicographically sortable IDs.
///
/// An ID is `time + separator + counter + identity`. Two IDs from the same generator compare
/// in the order their counter increments completed. It is thread-safe; wrap it in an
/// [`Arc`](std::sync::Arc) to share it between threads.
///
/// Every generator running at the same time must carry its own identity.
#[derive(Debug)]
pub struct Generator {
    /// Last second this generator issued an [`id`](Generator::id) in (high 32 bits) and the
    /// counter (low 32 bits), updated together.
    state: AtomicU64,
    separator: String,
    identity: String,
    min_counter_length: usize,
    min_time_length: usize,
    min_nano_time_length: usize,
    min_date_offset: i64,
    min_nano_date_offset: i64,
}

impl Generator {
    /// Create a new Generator with the default configuration and the given identity.
    /// For custom configuration see [`builder`].
    ///
    /// [`builder`]: Generator::builder
    pub fn new(identity: impl Into<String>) -> Result<Self, Error> {
        Builder::new().identity(identity).finalize()
    }

    /// Create a new [`Builder`] to construct a Generator.
    pub fn builder() -> Builder {
        Builder::new()
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new_inner(
        separator: String,
        identity: String,
        min_counter_length: usize,
        min_time_length: usize,
        min_nano_time_length: usize,
        min_date_offset: i64,
        min_nano_date_offset: i64,
    ) -> Self {
        Self {
            state: AtomicU64::new(0),
            separator,
            identity,
            min_counter_length,
            min_time_length,
            min_nano_time_length,
            min_date_offset,
            min_nano_date_offset,
        }
    }

    /// Default configuration with `identity`.
    ///
    /// An identity that would not split under the default separator gets the separator
    /// prepended, or is replaced by the default identity if that still does not split.
    pub(crate) fn with_defaults(identity: String) -> Self {
        let defaults = defaults();
        let separator = defaults.separator.as_str();
        let identity = if identity_fits(separator, &identity) {
            identity
        } else {
            let prefixed = format!("{}{}", separator, identity);
            let fitted = if identity_fits(separator, &prefixed) {
                prefixed
            } else {
                defaults.identity.clone()
            };
            tracing::debug!(from = %identity, to = %fitted, "identity adjusted to default separator");
            fitted
        };
        Self::new_inner(
            defaults.separator.clone(),
            identity,
            defaults.min_counter_length,
            defaults.min_time_length,
            defaults.min_nano_time_length,
            defaults.min_date_offset,
            defaults.min_nano_date_offset,
        )
    }

    /// Reset the counter to 0 and restore the default configuration, keeping the identity
    /// (adjusted to the default separator when needed).
    pub fn reinit(&mut self) {
        let identity = std::mem::take(&mut self.identity);
        *self = Self::with_defaults(identity);
    }

    /// Generate an ID with second precision.
    ///
    /// The counter restarts at 1 whenever this generator enters a new second. The second and
    /// the counter move in one atomic step, so an increment taken in the old second can never
    /// be reused after the reset.
    pub fn id(&self) -> String {
        let now = clock::unix_seconds();
        let now_second = u32::try_from(now.max(0)).unwrap_or(u32::MAX);
        let prev = self.update_state(|state| advance_second(state, now_second));
        let (second, counter) = unpack(advance_second(prev, now_second));
        if second > unpack(prev).0 {
            tracing::trace!(second, "new second, counter reset");
        }
        global::claim_second(i64::from(second));
        self.render(
            i64::from(second).saturating_sub(self.min_date_offset),
            self.min_time_length,
            counter,
            &self.identity,
        )
    }

    /// Generate an ID with nanosecond precision.
    ///
    /// Each time the counter wraps, the process-wide nanosecond compensation moves forward by
    /// one so IDs keep increasing even when the clock has not.
    pub fn nano_id(&self) -> String {
        let counter = self.next_counter();
        if counter == 0 {
            global::bump_nano_compensation();
        }
        let time = clock::unix_nanos().saturating_add(global::nano_compensation());
        self.render(
            time.saturating_sub(self.min_nano_date_offset),
            self.min_nano_time_length,
            counter,
            &self.identity,
        )
    }

    /// Render unix seconds, a counter and an explicit identity. The counter is not touched.
    ///
    /// A `time` earlier than `min_date_offset` renders as the offset itself, so parsing it back
    /// returns the offset and not `time`.
    pub fn from_unix_counter_ident(&self, time: i64, counter: u32, ident: &str) -> String {
        self.render(
            time.saturating_sub(self.min_date_offset),
            self.min_time_length,
            counter,
            ident,
        )
    }

    /// Render unix seconds and a counter with this generator's identity.
    pub fn from_unix_counter(&self, time: i64, counter: u32) -> String {
        self.from_unix_counter_ident(time, counter, &self.identity)
    }

    /// Render unix seconds with the next counter value.
    pub fn from_unix(&self, time: i64) -> String {
        self.from_unix_counter(time, self.next_counter())
    }

    /// Render unix nanoseconds, a counter and an explicit identity. The counter is not touched.
    ///
    /// A `time` earlier than `min_nano_date_offset` renders as the offset itself, so parsing it
    /// back returns the offset and not `time`.
    pub fn from_nano_counter_ident(&self, time: i64, counter: u32, ident: &str) -> String {
        self.render(
            time.saturating_sub(self.min_nano_date_offset),
            self.min_nano_time_length,
            counter,
            ident,
        )
    }

    /// Render unix nanoseconds and a counter with this generator's identity.
    pub fn from_nano_counter(&self, time: i64, counter: u32) -> String {
        self.from_nano_counter_ident(time, counter, &self.identity)
    }

    /// Render unix nanoseconds with the next counter value.
    pub fn from_nano(&self, time: i64) -> String {
        self.from_nano_counter(time, self.next_counter())
    }

    /// Break an ID up into its segments.
    ///
    /// `is_nano` tells whether the time segment holds nanoseconds (from [`nano_id`]) or seconds
    /// (from [`id`]). On failure the error still carries whatever could be decoded.
    ///
    /// [`nano_id`]: Generator::nano_id
    /// [`id`]: Generator::id
    pub fn parse(&self, id: &str, is_nano: bool) -> Result<Segments, ParseError> {
        let mut segments = Segments {
            is_nano,
            ..Default::default()
        };
        let (time_part, counter_part, identity) = match self.split(id) {
            Ok(parts) => parts,
            Err(reason) => return Err(ParseError::new(reason, segments)),
        };
        segments.identity = identity.to_owned();

        let offset = if is_nano {
            self.min_nano_date_offset
        } else {
            self.min_date_offset
        };
        let time = codec::decode(time_part);
        let counter = codec::decode(counter_part).and_then(|c| u32::try_from(c).ok());
        if let Some(time) = time {
            segments.time = time.saturating_add(offset);
        }
        if let Some(counter) = counter {
            segments.counter = counter;
        }

        let failed = match (time, counter) {
            (None, _) => Some((SegmentKind::Time, time_part)),
            (_, None) => Some((SegmentKind::Counter, counter_part)),
            _ => None,
        };
        match failed {
            Some((segment, raw)) => Err(ParseError::new(
                Error::InvalidSegment {
                    segment,
                    raw: raw.to_owned(),
                },
                segments,
            )),
            None => Ok(segments),
        }
    }

    /// Cut an ID into its time, counter and identity parts.
    fn split<'a>(&self, id: &'a str) -> Result<(&'a str, &'a str, &'a str), Error> {
        if !self.separator.is_empty() {
            let parts: Vec<&str> = id.split(self.separator.as_str()).collect();
            if let [time, counter, identity] = parts[..] {
                return Ok((time, counter, identity));
            }
            return Err(Error::InvalidSeparator {
                id: id.to_owned(),
                separator: self.separator.clone(),
                parts: parts.len(),
            });
        }

        // nanosecond layout first, second layout only if the ID is too short for it
        let mut start = self.min_nano_time_length;
        let mut end = start + self.min_counter_length;
        if id.len() < end {
            start = self.min_time_length;
            end = start + self.min_counter_length;
            if id.len() < end {
                return Err(Error::InvalidLength {
                    id: id.to_owned(),
                    len: id.len(),
                    min: end,
                });
            }
        }
        if let Some(&index) = [start, end].iter().find(|&&i| !id.is_char_boundary(i)) {
            return Err(Error::InvalidBoundary {
                id: id.to_owned(),
                index,
            });
        }
        Ok((&id[..start], &id[start..end], &id[end..]))
    }

    fn render(&self, time: i64, min_time_length: usize, counter: u32, identity: &str) -> String {
        let mut id = codec::encode(time, min_time_length);
        id.push_str(&self.separator);
        id.push_str(&codec::encode(i64::from(counter), self.min_counter_length));
        id.push_str(identity);
        id
    }

    /// Apply `f` atomically to the state, returning the previous state.
    fn update_state(&self, f: impl Fn(u64) -> u64) -> u64 {
        match self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |state| Some(f(state)))
        {
            Ok(prev) | Err(prev) => prev,
        }
    }

    fn next_counter(&self) -> u32 {
        let prev = self.update_state(increment);
        unpack(increment(prev)).1
    }

    /// Returns the current counter value.
    pub fn counter(&self) -> u32 {
        unpack(self.state.load(Ordering::Acquire)).1
    }

    /// Preset the counter, e.g. to resume a sequence. The next ID uses `counter + 1`.
    pub fn set_counter(&self, counter: u32) {
        self.update_state(|state| pack(unpack(state).0, counter));
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn min_counter_length(&self) -> usize {
        self.min_counter_length
    }

    pub fn min_time_length(&self) -> usize {
        self.min_time_length
    }

    pub fn min_nano_time_length(&self) -> usize {
        self.min_nano_time_length
    }

    pub fn min_date_offset(&self) -> i64 {
        self.min_date_offset
    }

    pub fn min_nano_date_offset(&self) -> i64 {
        self.min_nano_date_offset
    }
}

/// Returns an independent Generator with the same configuration and the current counter value.
impl Clone for Generator {
    fn clone(&self) -> Self {
        Self {
            state: AtomicU64::new(self.state.load(Ordering::Acquire)),
            separator: self.separator.clone(),
            identity: self.identity.clone(),
            min_counter_length: self.min_counter_length,
            min_time_length: self.min_time_length,
            min_nano_time_length: self.min_nano_time_length,
            min_date_offset: self.min_date_offset,
            min_nano_date_offset: self.min_nano_date_offset,
        }
    }
}

fn pack(second: u32, counter: u32) -> u64 {
    (u64::from(second) << 32) | u64::from(counter)
}

fn unpack(state: u64) -> (u32, u32) {
    ((state >> 32) as u32, state as u32)
}

/// Bump the counter, wrapping at 2^32 without touching the second.
fn increment(state: u64) -> u64 {
    let (second, counter) = unpack(state);
    pack(second, counter.wrapping_add(1))
}

/// Restart the counter at 1 when `now` is past the recorded second, otherwise bump it.
/// A stale `now` keeps the recorded second.
fn advance_second(state: u64, now: u32) -> u64 {
    let (second, counter) = unpack(state);
    if now > second {
        pack(now, 1)
    } else {
        pack(second, counter.wrapping_add(1))
    }
}
