//! The process-wide default generator and the state every generator shares.

use crate::error::ParseError;
use crate::generator::Generator;
use crate::segments::Segments;
use crate::{clock, codec};
use chrono::{DateTime, Utc};
use std::sync::{
    Arc, OnceLock, PoisonError, RwLock,
    atomic::{AtomicI64, Ordering},
};

/// Unix time in seconds at 2020-01-01T00:00:00Z, a recommended `min_date_offset`.
pub const OFFSET_2020_UNIX: i64 = 1_577_836_800;

/// Unix time in nanoseconds at 2020-01-01T00:00:00Z, a recommended `min_nano_date_offset`.
pub const OFFSET_2020_UNIX_NANO: i64 = OFFSET_2020_UNIX * 1_000_000_000;

/// Returns 2020-01-01T00:00:00Z, for use with [`Builder::epoch`](crate::Builder::epoch).
pub fn offset_2020() -> DateTime<Utc> {
    DateTime::from_timestamp_nanos(OFFSET_2020_UNIX_NANO)
}

/// Last unix second seen by any generator's [`Generator::id`].
static LAST_SECOND: AtomicI64 = AtomicI64::new(0);

/// Nanoseconds added to every [`Generator::nano_id`], one per counter wrap.
static NANO_COMPENSATION: AtomicI64 = AtomicI64::new(0);

/// Returns true for exactly one caller when `now` moves past the last recorded second.
pub(crate) fn claim_second(now: i64) -> bool {
    claim(&LAST_SECOND, now)
}

fn claim(last_second: &AtomicI64, now: i64) -> bool {
    let last = last_second.load(Ordering::Acquire);
    now > last
        && last_second
            .compare_exchange(last, now, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
}

pub(crate) fn bump_nano_compensation() {
    let compensation = NANO_COMPENSATION.fetch_add(1, Ordering::AcqRel) + 1;
    tracing::trace!(compensation, "counter wrapped, nanosecond compensation advanced");
}

pub(crate) fn nano_compensation() -> i64 {
    NANO_COMPENSATION.load(Ordering::Acquire)
}

/// Configuration every new [`Generator`] starts from.
///
/// The minimum lengths are measured once per process by encoding `u32::MAX` and the time at
/// startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    pub separator: String,
    pub identity: String,
    pub min_counter_length: usize,
    pub min_time_length: usize,
    pub min_nano_time_length: usize,
    pub min_date_offset: i64,
    pub min_nano_date_offset: i64,
}

/// Returns the process-wide defaults.
pub fn defaults() -> &'static Defaults {
    static DEFAULTS: OnceLock<Defaults> = OnceLock::new();
    DEFAULTS.get_or_init(|| Defaults {
        separator: "~".to_owned(),
        identity: "~0".to_owned(),
        min_counter_length: codec::encoded_len(i64::from(u32::MAX)),
        min_time_length: codec::encoded_len(clock::unix_seconds()),
        min_nano_time_length: codec::encoded_len(clock::unix_nanos()),
        min_date_offset: 0,
        min_nano_date_offset: 0,
    })
}

fn handle() -> &'static RwLock<Arc<Generator>> {
    static DEFAULT_GENERATOR: OnceLock<RwLock<Arc<Generator>>> = OnceLock::new();
    DEFAULT_GENERATOR.get_or_init(|| {
        let generator = Generator::with_defaults(defaults().identity.clone());
        tracing::debug!(identity = generator.identity(), "initialized default generator");
        RwLock::new(Arc::new(generator))
    })
}

/// Returns the process-wide default generator.
pub fn default_generator() -> Arc<Generator> {
    handle()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Replace the process-wide default generator.
///
/// IDs already issued by the previous one may not sort before those of `generator` unless
/// both share a layout and `generator`'s counter continues the sequence.
pub fn set_default(generator: Generator) {
    tracing::debug!(
        identity = generator.identity(),
        separator = generator.separator(),
        "replaced default generator"
    );
    *handle().write().unwrap_or_else(PoisonError::into_inner) = Arc::new(generator);
}

/// Reset the default generator: counter back to 0 and default configuration, keeping its
/// identity.
pub fn reinit() {
    let mut current = handle().write().unwrap_or_else(PoisonError::into_inner);
    let generator = Generator::with_defaults(current.identity().to_owned());
    tracing::debug!(identity = generator.identity(), "reinitialized default generator");
    *current = Arc::new(generator);
}

/// Generate an ID with second precision using the default generator.
pub fn id() -> String {
    default_generator().id()
}

/// Generate an ID with nanosecond precision using the default generator.
pub fn nano_id() -> String {
    default_generator().nano_id()
}

/// Break an ID from the default generator up into its segments.
pub fn parse(id: &str, is_nano: bool) -> Result<Segments, ParseError> {
    default_generator().parse(id, is_nano)
}

pub fn from_unix_counter_ident(time: i64, counter: u32, ident: &str) -> String {
    default_generator().from_unix_counter_ident(time, counter, ident)
}

pub fn from_unix_counter(time: i64, counter: u32) -> String {
    default_generator().from_unix_counter(time, counter)
}

pub fn from_unix(time: i64) -> String {
    default_generator().from_unix(time)
}

pub fn from_nano_counter_ident(time: i64, counter: u32, ident: &str) -> String {
    default_generator().from_nano_counter_ident(time, counter, ident)
}

pub fn from_nano_counter(time: i64, counter: u32) -> String {
    default_generator().from_nano_counter(time, counter)
}

pub fn from_nano(time: i64) -> String {
    default_generator().from_nano(time)
}
