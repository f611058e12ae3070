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

//! HTTP server.

use mio::net::TcpListener;
use mio::{Interest, Token, Waker};
use slab::Slab;
use std::io::{self, ErrorKind};
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::handler::Handler;

mod builder;
mod connection;
mod error;
mod poller;

pub use builder::Builder;
use connection::{Connection, Signal};
pub use error::{Error, Result};
use poller::{Poller, WAKER};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// HTTP server.
///
/// A single-threaded, non-blocking HTTP/1.1 server. All connections are
/// multiplexed on one poller and every request is passed to the handler on
/// the polling thread, so handlers should answer quickly. Idle connections
/// are dropped after 30 seconds.
///
/// # Examples
///
/// ```no_run
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use pow_serve::http::{Request, Response, ResponseExt};
/// use pow_serve::router::{Item, Params, Router};
/// use pow_serve::server::Server;
///
/// let router = Router::builder()
///     .get("/", Item::action(|_: Request, _: Params| {
///         Response::from_text("Home")
///     }))
///     .build()?;
///
/// let mut server = Server::new(router, "127.0.0.1:8080")?;
/// server.run()?;
/// # Ok(())
/// # }
/// ```
pub struct Server<H>
where
    H: Handler,
{
    /// Handler for incoming requests.
    handler: H,
    /// Poller for I/O events.
    events: Poller,
    /// Acceptors for incoming connections.
    acceptors: Vec<TcpListener>,
    /// HTTP connections.
    connections: Slab<Connection>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl<H> Server<H>
where
    H: Handler,
{
    /// Creates a server listening on the given address.
    #[inline]
    pub fn new<A>(handler: H, addr: A) -> Result<Self>
    where
        A: ToSocketAddrs,
    {
        Self::builder(handler).bind(addr)?.listen()
    }

    /// Creates a server builder.
    #[inline]
    pub fn builder(handler: H) -> Builder<H> {
        Builder::new(handler)
    }

    /// Returns the addresses the server is listening on.
    pub fn local_addrs(&self) -> Result<Vec<SocketAddr>> {
        let iter = self.acceptors.iter().map(TcpListener::local_addr);
        Ok(iter.collect::<io::Result<_>>()?)
    }

    /// Runs the server until an unrecoverable error occurs.
    pub fn run(&mut self) -> Result {
        loop {
            self.poll(Some(Duration::from_secs(10)))?;
        }
    }

    /// Waits for events at most for the given timeout and processes them.
    ///
    /// Timed out connections are dropped before new events are handled.
    pub fn poll(&mut self, timeout: Option<Duration>) -> Result {
        self.events.poll(timeout)?;

        // Drop idle connections
        let now = Instant::now();
        let timed_out: Vec<_> = self
            .connections
            .iter()
            .filter_map(|(n, conn)| conn.is_timed_out(now).then_some(n))
            .collect();
        for n in timed_out {
            self.close(n)?;
        }

        // Handle events, collecting signals for the connections
        let start = self.acceptors.len();
        let mut signals = Vec::new();
        for event in &self.events {
            let n = usize::from(event.token());
            if event.token() == WAKER {
                continue;
            }

            // Accept all pending connections of a listener
            if let Some(acceptor) = self.acceptors.get(n) {
                loop {
                    match acceptor.accept() {
                        Ok((socket, addr)) => {
                            tracing::trace!(%addr, "accepted connection");
                            let entry = self.connections.vacant_entry();
                            let token = Token(start + entry.key());
                            let conn = entry.insert(Connection::new(socket));
                            self.events.register(
                                conn.socket(),
                                token,
                                Interest::READABLE,
                            )?;
                        }
                        Err(err) if err.kind() == ErrorKind::WouldBlock => {
                            break;
                        }
                        Err(err) => {
                            tracing::warn!(error = %err, "accept failed");
                            break;
                        }
                    }
                }
            } else if let Some(conn) = self.connections.get_mut(n - start) {
                if event.is_readable() {
                    signals.push((n - start, conn.read(&self.handler)));
                }
                if event.is_writable() {
                    signals.push((n - start, conn.write()));
                }
            }
        }

        // Apply signals once the events are no longer borrowed
        for (n, signal) in signals {
            match signal {
                Signal::Interest(interest) => {
                    let Some(conn) = self.connections.get_mut(n) else {
                        continue;
                    };
                    let interest = if conn.is_writing() {
                        interest | Interest::WRITABLE
                    } else {
                        interest
                    };
                    self.events.reregister(
                        conn.socket(),
                        Token(start + n),
                        interest,
                    )?;
                }
                Signal::Close => self.close(n)?,
                Signal::Continue => {}
            }
        }
        Ok(())
    }

    /// Returns a waker, which interrupts a blocking [`Server::poll`] from
    /// another thread.
    #[must_use]
    pub fn waker(&self) -> Arc<Waker> {
        self.events.waker()
    }

    /// Closes and deregisters the connection with the given index.
    fn close(&mut self, n: usize) -> Result {
        match self.connections.try_remove(n) {
            Some(conn) => self.events.deregister(&mut conn.into_socket()),
            None => Ok(()),
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpStream;
    use std::thread;
    use std::time::Duration;

    use super::{Error, Server};
    use crate::handler::NotFound;
    use crate::http::{Request, Response, ResponseExt};
    use crate::router::{Item, Params, Router};

    #[test]
    fn listen_requires_address() {
        let res = Server::builder(NotFound).listen();
        assert!(matches!(res, Err(Error::NoAddress)));
    }

    #[test]
    fn serves_request() {
        let router = Router::builder()
            .get(
                "/u/:name/",
                Item::action(|_: Request, params: Params| {
                    let name = params.get("name").unwrap_or_default();
                    Response::from_text(format!("Hello, {name}!"))
                }),
            )
            .build()
            .expect("valid routes");

        let mut server = Server::new(router, "127.0.0.1:0").expect("bind");
        let addr = server.local_addrs().expect("addresses")[0];

        // Client closes after the first response
        let client = thread::spawn(move || {
            let mut stream = TcpStream::connect(addr).expect("connect");
            stream
                .write_all(
                    b"GET /u/chilts/ HTTP/1.1\r\nConnection: close\r\n\r\n",
                )
                .expect("write");
            let mut response = String::new();
            stream.read_to_string(&mut response).expect("read");
            response
        });

        while !client.is_finished() {
            server.poll(Some(Duration::from_millis(50))).expect("poll");
        }
        let response = client.join().expect("client");
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.ends_with("\r\n\r\nHello, chilts!"));
    }
}
