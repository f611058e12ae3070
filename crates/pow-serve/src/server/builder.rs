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

//! HTTP server builder.

use mio::net::TcpListener;
use mio::{Interest, Token};
use slab::Slab;
use std::net::{SocketAddr, ToSocketAddrs};

use crate::handler::Handler;

use super::poller::Poller;
use super::{Error, Result, Server};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// HTTP server builder.
pub struct Builder<H> {
    /// Handler for incoming requests.
    handler: H,
    /// Socket addresses to bind to.
    addrs: Vec<SocketAddr>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl<H> Builder<H>
where
    H: Handler,
{
    /// Creates a server builder.
    ///
    /// Prefer [`Server::builder`], or [`Server::new`] when binding a single
    /// address.
    pub fn new(handler: H) -> Self {
        Self { handler, addrs: Vec::new() }
    }

    /// Adds the addresses the given value resolves to.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use pow_serve::handler::NotFound;
    /// use pow_serve::server::Server;
    ///
    /// let server = Server::builder(NotFound)
    ///     .bind("127.0.0.1:0")?
    ///     .listen()?;
    /// assert_eq!(server.local_addrs()?.len(), 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn bind<A>(mut self, addr: A) -> Result<Self>
    where
        A: ToSocketAddrs,
    {
        // Resolvers may return the same address more than once
        for addr in addr.to_socket_addrs()? {
            if !self.addrs.contains(&addr) {
                self.addrs.push(addr);
            }
        }
        Ok(self)
    }

    /// Binds listeners to all addresses and creates the server.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::NoAddress`], if no address was added, and
    /// [`Error::Io`], if binding or registering a listener fails.
    pub fn listen(self) -> Result<Server<H>> {
        if self.addrs.is_empty() {
            return Err(Error::NoAddress);
        }

        // Listener tokens are their index, connection tokens follow them
        let poller = Poller::with_capacity(1024)?;
        let mut acceptors = Vec::with_capacity(self.addrs.len());
        for (n, addr) in self.addrs.into_iter().enumerate() {
            let mut listener = TcpListener::bind(addr)?;
            poller.register(&mut listener, Token(n), Interest::READABLE)?;
            tracing::info!(%addr, "listening");
            acceptors.push(listener);
        }

        // Return server
        Ok(Server {
            handler: self.handler,
            events: poller,
            acceptors,
            connections: Slab::new(),
        })
    }
}
