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

//! HTTP connection.

use mio::net::TcpStream;
use mio::Interest;
use std::io::{Cursor, ErrorKind, Read, Write};
use std::time::{Duration, Instant};

use crate::handler::Handler;
use crate::http::request::Error;
use crate::http::{Header, Method, Request, Response, ResponseExt, Status};

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Idle time after which a connection is dropped.
const IDLE_TIMEOUT: Duration = Duration::from_secs(30);

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// What the server should do with the connection after an event.
#[derive(Debug, PartialEq, Eq)]
pub enum Signal {
    /// Continue with the specified interest.
    Interest(Interest),
    /// Continue without changing the current interest.
    Continue,
    /// Connection is done and should be dropped.
    Close,
}

/// Connection state.
#[derive(Debug)]
enum Buffer {
    /// Accumulating a request.
    Reading(Vec<u8>),
    /// Flushing a response, then closing the connection, if requested.
    Writing(Cursor<Vec<u8>>, bool),
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// HTTP connection.
///
/// A connection alternates between reading one request and writing its
/// response, keeping the socket open for further requests unless the client
/// asked to close it.
#[derive(Debug)]
pub struct Connection {
    /// TCP socket.
    socket: TcpStream,
    /// Read or write buffer.
    buffer: Buffer,
    /// Time of last activity.
    time: Instant,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Connection {
    /// Creates a connection.
    pub fn new(socket: TcpStream) -> Self {
        Connection {
            socket,
            buffer: Buffer::Reading(Vec::new()),
            time: Instant::now(),
        }
    }

    /// Consumes the connection and returns the underlying socket.
    pub fn into_socket(self) -> TcpStream {
        self.socket
    }

    /// Returns a mutable reference to the underlying socket.
    pub fn socket(&mut self) -> &mut TcpStream {
        &mut self.socket
    }

    /// Reads from the socket until a complete request was received, which is
    /// then handled, switching the connection to writing the response.
    pub fn read<H>(&mut self, handler: &H) -> Signal
    where
        H: Handler + ?Sized,
    {
        let Buffer::Reading(buffer) = &mut self.buffer else {
            return Signal::Continue;
        };
        self.time = Instant::now();

        // Drain the socket, as edge-triggered readiness won't fire again
        let mut chunk = [0u8; 4096];
        loop {
            match self.socket.read(&mut chunk) {
                Ok(0) => return Signal::Close,
                Ok(n) => buffer.extend_from_slice(&chunk[..n]),
                Err(err) if err.kind() == ErrorKind::WouldBlock => break,
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) => {
                    log_unexpected(&err);
                    return Signal::Close;
                }
            }
        }

        // Parse and handle the request, or wait for more data
        let (res, close) = match Request::from_bytes(buffer) {
            Ok(req) => {
                let head = req.method == Method::Head;
                let close = req
                    .headers
                    .get(Header::Connection)
                    .is_some_and(|value| value.eq_ignore_ascii_case("close"));

                // Responses to HEAD requests keep their headers only
                let mut res = handler.handle(req);
                if head {
                    res.body.clear();
                }
                (res, close)
            }
            Err(Error::Incomplete) => {
                return Signal::Interest(Interest::READABLE);
            }
            Err(err) => {
                tracing::debug!(error = %err, "malformed request");
                let status = err.status().unwrap_or(Status::BadRequest);
                (Response::from_status(status), true)
            }
        };

        // Switch to writing the response
        let bytes = res.into_bytes();
        self.buffer = Buffer::Writing(Cursor::new(bytes), close);
        Signal::Interest(Interest::WRITABLE)
    }

    /// Writes the pending response to the socket.
    #[allow(clippy::cast_possible_truncation)]
    pub fn write(&mut self) -> Signal {
        let Buffer::Writing(cursor, close) = &mut self.buffer else {
            return Signal::Continue;
        };
        self.time = Instant::now();

        // Write until done or the socket would block
        loop {
            let pos = cursor.position() as usize;
            let data = cursor.get_ref();
            if pos >= data.len() {
                break;
            }
            match self.socket.write(&data[pos..]) {
                Ok(0) => return Signal::Close,
                Ok(n) => cursor.set_position((pos + n) as u64),
                Err(err) if err.kind() == ErrorKind::WouldBlock => {
                    return Signal::Continue;
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) => {
                    log_unexpected(&err);
                    return Signal::Close;
                }
            }
        }

        // Response is out, so either close or wait for the next request
        if *close {
            let _ = self.socket.flush();
            return Signal::Close;
        }
        self.buffer = Buffer::Reading(Vec::new());
        Signal::Interest(Interest::READABLE)
    }

    /// Returns whether the connection is currently writing data.
    pub fn is_writing(&self) -> bool {
        matches!(self.buffer, Buffer::Writing(..))
    }

    /// Returns whether the connection has been idle for too long.
    pub fn is_timed_out(&self, now: Instant) -> bool {
        now.duration_since(self.time) > IDLE_TIMEOUT
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Logs socket errors, except for clients going away.
fn log_unexpected(err: &std::io::Error) {
    match err.kind() {
        ErrorKind::ConnectionReset
        | ErrorKind::ConnectionAborted
        | ErrorKind::BrokenPipe
        | ErrorKind::UnexpectedEof => {}
        _ => tracing::warn!(error = %err, "connection error"),
    }
}
