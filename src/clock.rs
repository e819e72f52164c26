// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Cached wall clock.
//!
//! A background ticker thread refreshes an atomic copy of the current unix time in
//! nanoseconds about once per millisecond, so the hot path never makes a syscall.

use chrono::Utc;
use std::{
    sync::{
        OnceLock,
        atomic::{AtomicI64, Ordering},
    },
    thread,
    time::Duration,
};

const NANOS_PER_SECOND: i64 = 1_000_000_000;
const TICK: Duration = Duration::from_millis(1);

/// Shared state of the ticker thread.
#[derive(Debug)]
struct Ticker {
    nanos: AtomicI64,
    running: bool,
}

static TICKER: OnceLock<Ticker> = OnceLock::new();

fn system_nanos() -> i64 {
    Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX)
}

fn ticker() -> &'static Ticker {
    TICKER.get_or_init(|| {
        let running = thread::Builder::new()
            .name("lexid-clock".into())
            .spawn(|| {
                loop {
                    thread::sleep(TICK);
                    if let Some(ticker) = TICKER.get() {
                        // never rewind, a stepped-back wall clock only freezes the cache
                        ticker.nanos.fetch_max(system_nanos(), Ordering::Relaxed);
                    }
                }
            })
            .map_err(|err| {
                tracing::warn!(error = %err, "could not spawn clock ticker, reading the system clock directly");
            })
            .is_ok();
        if running {
            tracing::debug!(tick = ?TICK, "clock ticker started");
        }
        Ticker {
            nanos: AtomicI64::new(system_nanos()),
            running,
        }
    })
}

/// Returns the cached unix time in nanoseconds.
pub fn unix_nanos() -> i64 {
    let ticker = ticker();
    if ticker.running {
        ticker.nanos.load(Ordering::Relaxed)
    } else {
        let now = system_nanos();
        ticker.nanos.fetch_max(now, Ordering::Relaxed).max(now)
    }
}

/// Returns the cached unix time in seconds.
pub fn unix_seconds() -> i64 {
    unix_nanos().div_euclid(NANOS_PER_SECOND)
}
