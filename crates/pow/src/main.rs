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

//! Link shortener server.

use anyhow::Context;
use pow::config::Config;
use pow::counter::HitCounter;
use pow::handlers::{self, App};
use pow::stats;
use pow::store::Store;
use pow::template::Templates;
use pow_serve::server::Server;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Sets up logging, defaulting to `info` unless `RUST_LOG` is set.
fn setup_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> anyhow::Result<()> {
    setup_tracing();
    let config = Config::from_env().context("invalid configuration")?;
    tracing::info!(
        port = config.port,
        base_url = %config.base_url,
        db = %config.db.display(),
        "configuration loaded"
    );

    // Open the store and start folding hits into stats
    let store = Store::open(&config.db).context("could not open store")?;
    let store = Arc::new(store);
    let counter = Arc::new(HitCounter::new());
    let interval = config.stats_interval;
    stats::spawn(Arc::clone(&store), Arc::clone(&counter), interval);

    // Create the router, and serve it until the process is stopped
    let templates = Templates::new(config.templates.as_deref());
    let addr = config.addr();
    let app = Arc::new(App { config, store, counter, templates });
    let router = handlers::router(&app)?;

    let mut server = Server::new(router, addr)?;
    server.run()?;
    Ok(())
}
