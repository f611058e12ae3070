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
//! Hit counter.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Hit counter.
///
/// Counts redirects per short code and hour, so the stats job can pick them
/// up once the hour is over. Counters live in memory only, which means hits
/// that weren't folded into the stats yet are lost on restart. All hours are
/// kept under one lock, so taking the count of a short code and removing it
/// happen at once.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use pow::counter::{HitCounter, hour_key};
///
/// let counter = HitCounter::new();
/// let now = Utc::now();
/// counter.record("abcd", now);
/// counter.record("abcd", now);
/// assert_eq!(counter.count(&hour_key(now), "abcd"), 2);
///
/// // Hits become pending once their hour is over
/// assert_eq!(counter.pending(now), None);
/// let pending = counter.pending(now + Duration::hours(1)).unwrap();
/// assert_eq!(pending.id, "abcd");
/// assert_eq!(counter.take(&pending.hour, &pending.id), 2);
/// assert_eq!(counter.count(&hour_key(now), "abcd"), 0);
/// ```
#[derive(Debug, Default)]
pub struct HitCounter {
    /// Hours by key, oldest first.
    hours: Mutex<BTreeMap<String, Hour>>,
}

/// Hits of one hour.
#[derive(Debug)]
struct Hour {
    /// Time of the first hit.
    time: DateTime<Utc>,
    /// Counts by short code.
    counts: HashMap<String, u64>,
}

/// Short code with hits of an hour that is over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pending {
    /// Hour key.
    pub hour: String,
    /// Time within the hour.
    pub time: DateTime<Utc>,
    /// Short code.
    pub id: String,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl HitCounter {
    /// Creates a hit counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a hit for the given short code.
    pub fn record(&self, id: &str, now: DateTime<Utc>) {
        self.add(&hour_key(now), now, id, 1);
    }

    /// Returns a random short code of the oldest hour before the current
    /// one, if any hits are left to fold.
    pub fn pending(&self, now: DateTime<Utc>) -> Option<Pending> {
        let current = hour_key(now);
        let hours = self.lock();
        let (hour, entry) = hours.first_key_value()?;
        if *hour >= current {
            return None;
        }

        // Empty hours are removed, so there's always a code to pick
        let index = fastrand::usize(..entry.counts.len());
        let id = entry.counts.keys().nth(index)?;
        Some(Pending {
            hour: hour.clone(),
            time: entry.time,
            id: id.clone(),
        })
    }

    /// Returns the number of hits for the given short code in the given hour.
    pub fn count(&self, hour: &str, id: &str) -> u64 {
        let hours = self.lock();
        let entry = hours.get(hour);
        entry.and_then(|entry| entry.counts.get(id).copied()).unwrap_or(0)
    }

    /// Removes the hits for the given short code in the given hour, returning
    /// how many there were.
    pub fn take(&self, hour: &str, id: &str) -> u64 {
        let mut hours = self.lock();
        let Some(entry) = hours.get_mut(hour) else {
            return 0;
        };
        let count = entry.counts.remove(id).unwrap_or(0);

        // Drop the hour once no code is left
        if entry.counts.is_empty() {
            hours.remove(hour);
        }
        count
    }

    /// Puts back hits that were taken but couldn't be folded, adding them to
    /// any recorded since.
    pub fn restore(&self, pending: &Pending, count: u64) {
        if count > 0 {
            self.add(&pending.hour, pending.time, &pending.id, count);
        }
    }

    /// Adds hits for the given short code to the given hour.
    fn add(&self, hour: &str, time: DateTime<Utc>, id: &str, count: u64) {
        let mut hours = self.lock();
        let entry = hours.entry(hour.to_string()).or_insert_with(|| Hour {
            time,
            counts: HashMap::new(),
        });
        *entry.counts.entry(id.to_string()).or_default() += count;
    }

    /// Acquires the lock on the counters.
    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Hour>> {
        self.hours.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Returns the key of the hour the given time falls into.
///
/// Keys sort in chronological order.
#[must_use]
pub fn hour_key(time: DateTime<Utc>) -> String {
    time.format("%Y%m%d-%H").to_string()
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::{HitCounter, hour_key};

    #[test]
    fn formats_hour_keys() {
        let time = Utc.with_ymd_and_hms(2025, 3, 7, 9, 59, 59).unwrap();
        assert_eq!(hour_key(time), "20250307-09");
    }

    #[test]
    fn counts_per_hour() {
        let counter = HitCounter::new();
        let now = Utc.with_ymd_and_hms(2025, 3, 7, 9, 0, 0).unwrap();
        counter.record("abcd", now);
        counter.record("abcd", now + Duration::hours(1));
        counter.record("wxyz", now);

        assert_eq!(counter.count("20250307-09", "abcd"), 1);
        assert_eq!(counter.count("20250307-10", "abcd"), 1);
        assert_eq!(counter.count("20250307-11", "abcd"), 0);
    }

    #[test]
    fn picks_oldest_hour_first() {
        let counter = HitCounter::new();
        let nine = Utc.with_ymd_and_hms(2025, 3, 7, 9, 15, 0).unwrap();
        counter.record("late", nine + Duration::hours(1));
        counter.record("early", nine);

        let now = nine + Duration::hours(5);
        let pending = counter.pending(now).expect("pending");
        assert_eq!(pending.hour, "20250307-09");
        assert_eq!(pending.id, "early");
        assert_eq!(pending.time, nine);

        counter.take(&pending.hour, &pending.id);
        let pending = counter.pending(now).expect("pending");
        assert_eq!(pending.hour, "20250307-10");
        assert_eq!(pending.id, "late");
    }

    #[test]
    fn leaves_current_hour_alone() {
        let counter = HitCounter::new();
        let now = Utc.with_ymd_and_hms(2025, 3, 7, 9, 15, 0).unwrap();
        counter.record("abcd", now);
        assert_eq!(counter.pending(now + Duration::minutes(30)), None);
    }

    #[test]
    fn takes_hits() {
        let counter = HitCounter::new();
        let now = Utc.with_ymd_and_hms(2025, 3, 7, 9, 0, 0).unwrap();
        counter.record("abcd", now);
        counter.record("abcd", now);

        assert_eq!(counter.take("20250307-09", "abcd"), 2);
        assert_eq!(counter.count("20250307-09", "abcd"), 0);
        assert_eq!(counter.pending(now + Duration::hours(1)), None);
        assert_eq!(counter.take("20250307-09", "abcd"), 0);
    }

    #[test]
    fn restores_hits() {
        let counter = HitCounter::new();
        let now = Utc.with_ymd_and_hms(2025, 3, 7, 9, 0, 0).unwrap();
        counter.record("abcd", now);

        let pending = counter.pending(now + Duration::hours(1)).expect("hit");
        let count = counter.take(&pending.hour, &pending.id);
        counter.record("abcd", now);
        counter.restore(&pending, count);
        assert_eq!(counter.count("20250307-09", "abcd"), 2);
    }
}
