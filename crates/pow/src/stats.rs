// Copyright (c) 2025 Zensical and contributors

// SPDX-License-Identifier: MIT
// Third-party contributions licensed under DCO

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to
// deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NON-INFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS
// IN THE SOFTWARE.

// ----------------------------------------------------------------------------

//! Stats aggregation.
//!
//! Hits are first counted in memory by the [`HitCounter`], and folded into
//! persistent stats by a background job, one short code at a time. Every
//! fold is recorded with a marker in the same transaction, so the count of
//! an hour is never folded twice.

use chrono::{DateTime, Utc};
use crossbeam::channel::tick;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::counter::HitCounter;
use super::store::{Result, Store};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Stats of a short code.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stats {
    /// Total number of hits.
    pub total: u64,
    /// Hits by day, e.g. `20250307`.
    #[serde(default)]
    pub daily: BTreeMap<String, u64>,
    /// Hits by hour of the day, e.g. `09`.
    #[serde(default)]
    pub hourly: BTreeMap<String, u64>,
    /// Hits by day of the week, e.g. `Fri`.
    #[serde(default)]
    pub weekday: BTreeMap<String, u64>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Stats {
    /// Adds the given number of hits at the given time.
    pub fn fold(&mut self, count: u64, time: DateTime<Utc>) {
        self.total += count;
        for (slots, format) in [
            (&mut self.daily, "%Y%m%d"),
            (&mut self.hourly, "%H"),
            (&mut self.weekday, "%a"),
        ] {
            *slots.entry(time.format(format).to_string()).or_default() += count;
        }
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Folds the hits of one random short code of the oldest hour that is over
/// into its stats, returning the code and the number of hits folded.
///
/// Nothing is folded if the hits were already folded before, in which case
/// `0` is returned. The hits are taken from the counter in both cases.
///
/// # Errors
///
/// This method returns an error, if the store can't be updated. The hits are
/// put back into the counter, so the fold is retried later.
pub fn process(
    store: &Store, counter: &HitCounter, now: DateTime<Utc>,
) -> Result<Option<(String, u64)>> {
    let Some(pending) = counter.pending(now) else {
        return Ok(None);
    };

    // Fold the count and mark it as done in the same transaction
    let count = counter.take(&pending.hour, &pending.id);
    let done = format!("{}:{}", pending.hour, pending.id);
    let res = store.update(|tx| {
        if tx.get(DONE_BUCKET, &done)?.is_some() {
            return Ok(0);
        }

        let stats = tx.get_json::<Stats>(STATS_BUCKET, &pending.id)?;
        let mut stats = stats.unwrap_or_default();
        stats.fold(count, pending.time);
        tx.put_json(STATS_BUCKET, &pending.id, &stats)?;

        let stamp = now.format("%Y%m%d-%H%M%S%.9f").to_string();
        tx.put_string(DONE_BUCKET, &done, &stamp)?;
        Ok(count)
    });
    match res {
        Ok(folded) => Ok(Some((pending.id, folded))),
        Err(err) => {
            counter.restore(&pending, count);
            Err(err)
        }
    }
}

/// Returns the stats of the given short code, if any were folded yet.
///
/// # Errors
///
/// This method returns an error, if the record can't be read.
pub fn lookup(store: &Store, id: &str) -> Result<Option<Stats>> {
    store.view(|tx| tx.get_json(STATS_BUCKET, id))
}

/// Spawns the aggregation job, processing one short code per interval.
pub fn spawn(
    store: Arc<Store>, counter: Arc<HitCounter>, interval: std::time::Duration,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let ticker = tick(interval);
        for _ in &ticker {
            match process(&store, &counter, Utc::now()) {
                Ok(Some((id, count))) => {
                    tracing::debug!(%id, count, "folded hits");
                }
                Ok(None) => {}
                Err(err) => tracing::error!(%err, "stats aggregation failed"),
            }
        }
    })
}

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Bucket of stats.
pub const STATS_BUCKET: &str = "stats";

/// Bucket of markers of folded hits.
pub const DONE_BUCKET: &str = "stats.done";

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::{DONE_BUCKET, lookup, process};
    use crate::counter::HitCounter;
    use crate::store::Store;

    #[test]
    fn folds_previous_hour() {
        let store = Store::memory();
        let counter = HitCounter::new();
        let hit = Utc.with_ymd_and_hms(2025, 3, 7, 9, 15, 0).unwrap();
        counter.record("abcd", hit);
        counter.record("abcd", hit);

        // Hits of the current hour are left alone
        let res = process(&store, &counter, hit).expect("process");
        assert_eq!(res, None);

        let now = hit + Duration::hours(1);
        let res = process(&store, &counter, now).expect("process");
        assert_eq!(res, Some(("abcd".into(), 2)));

        let stats = lookup(&store, "abcd").expect("lookup").expect("stats");
        assert_eq!(stats.total, 2);
        assert_eq!(stats.daily.get("20250307"), Some(&2));
        assert_eq!(stats.hourly.get("09"), Some(&2));
        assert_eq!(stats.weekday.get("Fri"), Some(&2));
        assert_eq!(counter.count("20250307-09", "abcd"), 0);
    }

    #[test]
    fn skips_folded_hits() {
        let store = Store::memory();
        let counter = HitCounter::new();
        let hit = Utc.with_ymd_and_hms(2025, 3, 7, 9, 15, 0).unwrap();
        let now = hit + Duration::hours(1);
        store
            .update(|tx| tx.put(DONE_BUCKET, "20250307-09:abcd", "x"))
            .expect("update");

        counter.record("abcd", hit);
        let res = process(&store, &counter, now).expect("process");
        assert_eq!(res, Some(("abcd".into(), 0)));
        assert_eq!(lookup(&store, "abcd").expect("lookup"), None);
        assert_eq!(counter.pending(now), None);
    }

    #[test]
    fn accumulates_folds() {
        let store = Store::memory();
        let counter = HitCounter::new();
        let first = Utc.with_ymd_and_hms(2025, 3, 7, 9, 0, 0).unwrap();
        let second = first + Duration::hours(1);
        counter.record("abcd", first);
        counter.record("abcd", second);

        process(&store, &counter, second).expect("process");
        process(&store, &counter, second + Duration::hours(1))
            .expect("process");

        let stats = lookup(&store, "abcd").expect("lookup").expect("stats");
        assert_eq!(stats.total, 2);
        assert_eq!(stats.hourly.len(), 2);
        assert_eq!(stats.weekday.get("Fri"), Some(&2));
    }

    #[test]
    fn drains_stale_hours() {
        let store = Store::memory();
        let counter = HitCounter::new();
        let hit = Utc.with_ymd_and_hms(2025, 3, 7, 9, 15, 0).unwrap();
        counter.record("abcd", hit);
        counter.record("wxyz", hit + Duration::hours(1));

        // Both hours are over, so the oldest one is folded first
        let now = hit + Duration::hours(2);
        let res = process(&store, &counter, now).expect("process");
        assert_eq!(res, Some(("abcd".into(), 1)));
        let res = process(&store, &counter, now).expect("process");
        assert_eq!(res, Some(("wxyz".into(), 1)));
        assert_eq!(process(&store, &counter, now).expect("process"), None);

        let stats = lookup(&store, "abcd").expect("lookup").expect("stats");
        assert_eq!(stats.hourly.get("09"), Some(&1));
        assert_eq!(counter.count("20250307-09", "abcd"), 0);
    }

    #[test]
    fn keeps_hits_on_failure() {
        // Saving fails, as the parent directory doesn't exist
        let path = std::env::temp_dir()
            .join(format!("pow-stats-{}", std::process::id()))
            .join("pow.db");
        let store = Store::open(path).expect("open");
        let counter = HitCounter::new();
        let hit = Utc.with_ymd_and_hms(2025, 3, 7, 9, 15, 0).unwrap();
        counter.record("abcd", hit);

        let now = hit + Duration::hours(1);
        assert!(process(&store, &counter, now).is_err());
        assert_eq!(counter.count("20250307-09", "abcd"), 1);
    }
}
