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

//! Configuration.

use fluent_uri::Uri;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

mod error;

pub use error::{Error, Result};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Configuration.
///
/// Read once from the environment at startup. Only the port is required,
/// everything else falls back to defaults suitable for local development.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Port to listen on.
    pub port: u16,
    /// Base URL of the service, used in templates.
    pub base_url: String,
    /// Domain shown on the index page.
    pub naked_domain: String,
    /// Path of the record store.
    pub db: PathBuf,
    /// Directory of static files.
    pub static_dir: PathBuf,
    /// Directory with template overrides.
    pub templates: Option<PathBuf>,
    /// Interval of the stats aggregation job.
    pub stats_interval: Duration,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Config {
    /// Reads the configuration from the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Reads the configuration using the given variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = var("POW_PORT").ok_or(Error::MissingPort)?;
        let port = port.parse().map_err(|_| Error::InvalidPort(port))?;

        // Derive the naked domain from the base URL, unless given
        let base_url = var("POW_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{port}"));
        let naked_domain = match var("POW_NAKED_DOMAIN") {
            Some(domain) => domain,
            None => host(&base_url)
                .ok_or_else(|| Error::InvalidBaseUrl(base_url.clone()))?,
        };

        // Stats are aggregated every few seconds by default
        let stats_interval = match var("POW_STATS_INTERVAL") {
            Some(value) => value
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| Error::InvalidInterval(value))?,
            None => Duration::from_secs(3),
        };

        Ok(Self {
            port,
            base_url,
            naked_domain,
            db: var("POW_DB").unwrap_or_else(|| "pow.db".into()).into(),
            static_dir: var("POW_STATIC")
                .unwrap_or_else(|| "static".into())
                .into(),
            templates: var("POW_TEMPLATES").map(PathBuf::from),
            stats_interval,
        })
    }

    /// Returns the address to listen on.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Returns the host of the given URL, if any.
fn host(url: &str) -> Option<String> {
    let uri = Uri::parse(url).ok()?;
    let host = uri.authority()?.host().to_string();
    (!host.is_empty()).then_some(host)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    use super::{Config, Error, Result};

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<_, _> = vars.iter().copied().collect();
        Config::from_vars(|name| vars.get(name).map(ToString::to_string))
    }

    #[test]
    fn requires_port() {
        assert_eq!(config(&[]), Err(Error::MissingPort));
        assert_eq!(
            config(&[("POW_PORT", "http")]),
            Err(Error::InvalidPort("http".into()))
        );
    }

    #[test]
    fn applies_defaults() {
        let config = config(&[("POW_PORT", "8080")]).expect("config");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.naked_domain, "localhost");
        assert_eq!(config.db, PathBuf::from("pow.db"));
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert_eq!(config.templates, None);
        assert_eq!(config.stats_interval, Duration::from_secs(3));
        assert_eq!(config.addr(), "0.0.0.0:8080");
    }

    #[test]
    fn derives_naked_domain() {
        let config = config(&[
            ("POW_PORT", "80"),
            ("POW_BASE_URL", "https://pow.gd"),
            ("POW_STATS_INTERVAL", "10"),
        ])
        .expect("config");
        assert_eq!(config.naked_domain, "pow.gd");
        assert_eq!(config.stats_interval, Duration::from_secs(10));
    }

    #[test]
    fn rejects_invalid_values() {
        let res = config(&[("POW_PORT", "80"), ("POW_BASE_URL", "pow")]);
        assert_eq!(res, Err(Error::InvalidBaseUrl("pow".into())));
        let res = config(&[("POW_PORT", "80"), ("POW_STATS_INTERVAL", "x")]);
        assert_eq!(res, Err(Error::InvalidInterval("x".into())));
    }
}
