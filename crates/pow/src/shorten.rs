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

//! Short codes.

use chrono::{DateTime, Utc};
use fluent_uri::Uri;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::store::{self, Store};

mod error;

pub use error::{Error, Result};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Shortened URL.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShortUrl {
    /// Short code.
    pub id: String,
    /// Target URL.
    pub url: String,
    /// Creation time.
    pub created: DateTime<Utc>,
    /// Last update time.
    pub updated: DateTime<Utc>,
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Validates the given URL, returning it with its host lowercased.
///
/// # Errors
///
/// This method returns an [`Error`] describing the first rule the URL breaks.
///
/// # Examples
///
/// ```
/// use pow::shorten::{validate, Error};
///
/// assert_eq!(validate("https://Pow.GD/x"), Ok("https://pow.gd/x".into()));
/// assert_eq!(validate("ftp://pow.gd"), Err(Error::InvalidScheme));
/// ```
pub fn validate(url: &str) -> Result<String> {
    let uri = Uri::parse(url).map_err(|_| Error::InvalidUri(url.into()))?;
    let scheme = uri.scheme().as_str();
    if !scheme.eq_ignore_ascii_case("http")
        && !scheme.eq_ignore_ascii_case("https")
    {
        return Err(Error::InvalidScheme);
    }

    // The host is checked together with the port, if any
    let rest = url[scheme.len() + 1..].strip_prefix("//").unwrap_or("");
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let authority = &rest[..end];
    let host = match authority.rsplit_once('@') {
        Some((_, host)) => host,
        None => authority,
    };

    // Compute the host's position before lowercasing it
    let start = url.len() - rest.len() + end - host.len();
    let host = host.to_ascii_lowercase();
    if !DOMAIN.is_match(&host) {
        return Err(Error::InvalidHost);
    }
    if host.contains(".-") || host.contains("-.") {
        return Err(Error::DashNextToDot);
    }
    if host.starts_with('-') || host.ends_with('-') {
        return Err(Error::DashAtEdge);
    }

    // Reassemble the URL with the lowercased host
    let (head, tail) = (&url[..start], &url[start + host.len()..]);
    Ok(format!("{head}{host}{tail}"))
}

/// Generates a random short code.
#[must_use]
pub fn generate_id() -> String {
    (0..ID_LENGTH).map(|_| fastrand::alphabetic()).collect()
}

/// Creates a short code for the given URL.
///
/// # Errors
///
/// This method returns an error, if the store can't be updated.
pub fn create(
    store: &Store, url: &str, now: DateTime<Utc>,
) -> store::Result<ShortUrl> {
    create_with(store, url, now, generate_id)
}

/// Creates a short code for the given URL, drawing codes from the given
/// function until an unused one is found.
fn create_with<F>(
    store: &Store, url: &str, now: DateTime<Utc>, mut next_id: F,
) -> store::Result<ShortUrl>
where
    F: FnMut() -> String,
{
    store.update(|tx| {
        let id = loop {
            let id = next_id();
            if tx.get(URL_BUCKET, &id)?.is_none() {
                break id;
            }
            tracing::debug!(%id, "short code taken");
        };

        let short = ShortUrl {
            id,
            url: url.to_string(),
            created: now,
            updated: now,
        };
        tx.put_json(URL_BUCKET, &short.id, &short)?;
        Ok(short)
    })
}

/// Returns the shortened URL for the given code, if it exists.
///
/// # Errors
///
/// This method returns an error, if the record can't be read.
pub fn lookup(store: &Store, id: &str) -> store::Result<Option<ShortUrl>> {
    if id.is_empty() {
        return Ok(None);
    }
    store.view(|tx| tx.get_json(URL_BUCKET, id))
}

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Bucket of shortened URLs.
pub const URL_BUCKET: &str = "url";

/// Length of short codes.
pub const ID_LENGTH: usize = 4;

/// Labels followed by a top-level domain of at least two letters.
static DOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z0-9-]+\.)+[a-z]{2,}$").expect("invariant")
});

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{Error, URL_BUCKET, create_with, generate_id, lookup, validate};
    use crate::store::Store;

    #[test]
    fn accepts_web_urls() {
        for url in [
            "http://example.com",
            "https://sub.example.co.uk/path?q=1#top",
            "https://a-b.example.io/",
        ] {
            assert_eq!(validate(url), Ok(url.to_string()));
        }
        let url = "https://user@Example.COM/A";
        assert_eq!(validate(url), Ok("https://user@example.com/A".into()));
    }

    #[test]
    fn rejects_invalid_urls() {
        let res = validate("example.com");
        assert!(matches!(res, Err(Error::InvalidUri(_))));

        let cases = [
            ("mailto:me@example.com", Error::InvalidScheme),
            ("http://localhost", Error::InvalidHost),
            ("http://example.c0m", Error::InvalidHost),
            ("http://example.com:80", Error::InvalidHost),
            ("http:example.com", Error::InvalidHost),
            ("http://a-.example.com", Error::DashNextToDot),
            ("http://-a.example.com", Error::DashAtEdge),
        ];
        for (url, err) in cases {
            assert_eq!(validate(url), Err(err), "{url}");
        }
    }

    #[test]
    fn generates_letters() {
        let id = generate_id();
        assert_eq!(id.len(), 4);
        assert!(id.chars().all(|c| c.is_ascii_alphabetic()));
    }

    #[test]
    fn retries_taken_codes() {
        let store = Store::memory();
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap();
        store
            .update(|tx| tx.put(URL_BUCKET, "AAAA", "{}"))
            .expect("update");

        let mut ids = ["AAAA", "BBBB"].into_iter().map(String::from);
        let next = move || ids.next().expect("id");
        let short = create_with(&store, "https://pow.gd", now, next)
            .expect("create");
        assert_eq!(short.id, "BBBB");
        assert_eq!(short.created, now);

        let found = lookup(&store, "BBBB").expect("lookup");
        assert_eq!(found, Some(short));
        assert_eq!(lookup(&store, "CCCC").expect("lookup"), None);
        assert_eq!(lookup(&store, "").expect("lookup"), None);
    }
}
