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

//! HTTP header.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use super::error::{Error, Result};

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl AsRef<str> for Header {
    #[inline]
    fn as_ref(&self) -> &str {
        self.name()
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ----------------------------------------------------------------------------
// Macros
// ----------------------------------------------------------------------------

/// Defines HTTP headers and a case-insensitive lookup table for parsing.
macro_rules! define_and_impl_header {
    (
        $(
            $(#[$comment:meta])*
            $name:ident = $header:literal
        ),+
        $(,)?
    ) => {
        /// HTTP header.
        ///
        /// Only headers that the server, the bundled middlewares or typical
        /// applications inspect or emit are known. Unknown request headers
        /// are skipped while parsing, and every header can be set only once
        /// per message.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Header {
            $(
                $(#[$comment])*
                $name,
            )+
        }

        impl Header {
            /// Returns the canonical header name.
            ///
            /// # Examples
            ///
            /// ```
            /// use pow_serve::http::Header;
            ///
            /// assert_eq!(Header::ContentType.name(), "Content-Type");
            /// ```
            #[must_use]
            pub const fn name(&self) -> &'static str {
                match self {
                    $(
                        Header::$name => $header,
                    )+
                }
            }
        }

        /// Header names by their lowercase form.
        static HEADERS: LazyLock<HashMap<String, Header>> =
            LazyLock::new(|| {
                HashMap::from_iter([
                    $(
                        ($header.to_ascii_lowercase(), Header::$name),
                    )+
                ])
            });

        impl FromStr for Header {
            type Err = Error;

            /// Attempts to resolve a header from its name, ignoring case.
            ///
            /// # Errors
            ///
            /// This method returns [`Error::Header`], if the name does not
            /// match one of the known headers.
            ///
            /// # Examples
            ///
            /// ```
            /// # use std::error::Error;
            /// # fn main() -> Result<(), Box<dyn Error>> {
            /// use pow_serve::http::Header;
            ///
            /// let header: Header = "if-modified-since".parse()?;
            /// assert_eq!(header, Header::IfModifiedSince);
            /// # Ok(())
            /// # }
            /// ```
            fn from_str(value: &str) -> Result<Self> {
                HEADERS
                    .get(&value.to_ascii_lowercase())
                    .copied()
                    .ok_or_else(|| Error::Header(value.to_string()))
            }
        }
    };
}

// ----------------------------------------------------------------------------

define_and_impl_header! {
    /// Accept
    Accept = "Accept",
    /// Accept-Encoding
    AcceptEncoding = "Accept-Encoding",
    /// Accept-Language
    AcceptLanguage = "Accept-Language",
    /// Allow
    Allow = "Allow",
    /// Authorization
    Authorization = "Authorization",
    /// Cache-Control
    CacheControl = "Cache-Control",
    /// Connection
    Connection = "Connection",
    /// Content-Encoding
    ContentEncoding = "Content-Encoding",
    /// Content-Length
    ContentLength = "Content-Length",
    /// Content-Type
    ContentType = "Content-Type",
    /// Cookie
    Cookie = "Cookie",
    /// Date
    Date = "Date",
    /// ETag
    ETag = "ETag",
    /// Expect
    Expect = "Expect",
    /// Host
    Host = "Host",
    /// If-Modified-Since
    IfModifiedSince = "If-Modified-Since",
    /// If-None-Match
    IfNoneMatch = "If-None-Match",
    /// Keep-Alive
    KeepAlive = "Keep-Alive",
    /// Last-Modified
    LastModified = "Last-Modified",
    /// Location
    Location = "Location",
    /// Origin
    Origin = "Origin",
    /// Referer
    Referer = "Referer",
    /// Server
    Server = "Server",
    /// Set-Cookie
    SetCookie = "Set-Cookie",
    /// Transfer-Encoding
    TransferEncoding = "Transfer-Encoding",
    /// User-Agent
    UserAgent = "User-Agent",
    /// Vary
    Vary = "Vary",
    /// X-Content-Type-Options
    XContentTypeOptions = "X-Content-Type-Options",
    /// X-Forwarded-For
    XForwardedFor = "X-Forwarded-For",
    /// X-Frame-Options
    XFrameOptions = "X-Frame-Options",
    /// X-Request-Id
    XRequestId = "X-Request-Id",
}
