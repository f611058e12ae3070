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

//! Non-blocking HTTP/1.1 server with a prefix-scoped router.
//!
//! Routes and middlewares are registered in order on a [`router::Builder`],
//! and each middleware scoped to a path prefix applies to the routes that
//! are registered after it. Every route is composed into a single chain at
//! registration time, so requests never pay for the scoping at serve time.
//!
//! The server is deliberately implemented with sync Rust on top of [`mio`]
//! to keep dependencies minimal and avoid async runtimes.
//!
//! # Examples
//!
//! ```no_run
//! # use std::error::Error;
//! # fn main() -> Result<(), Box<dyn Error>> {
//! use pow_serve::http::{Request, Response, ResponseExt};
//! use pow_serve::middleware::Logger;
//! use pow_serve::router::{Item, Params, Router};
//! use pow_serve::server::Server;
//!
//! let router = Router::builder()
//!     .scope("/", Item::middleware(Logger))
//!     .get("/", Item::action(|_: Request, _: Params| {
//!         Response::from_text("Home")
//!     }))
//!     .build()?;
//!
//! let mut server = Server::new(router, "127.0.0.1:8080")?;
//! server.run()?;
//! # Ok(())
//! # }
//! ```

#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]

pub mod handler;
pub mod http;
pub mod middleware;
pub mod router;
pub mod server;
