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

//! URL validation error.

use std::result;
use thiserror::Error;

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// URL validation error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Not an absolute URI.
    #[error("URL must be absolute: {0}")]
    InvalidUri(String),

    /// Scheme other than HTTP(S).
    #[error("URL scheme must be http or https")]
    InvalidScheme,

    /// Host not made of labels and a top-level domain.
    #[error(
        "Host must contain letters/numbers, contain at least one dot and last \
         component is at least 2 letters"
    )]
    InvalidHost,

    /// Host with a dash next to a dot.
    #[error("Host can't have dashes next to dots anywhere")]
    DashNextToDot,

    /// Host starting or ending with a dash.
    #[error("Host can't begin or end with a dash")]
    DashAtEdge,
}

// ----------------------------------------------------------------------------
// Type aliases
// ----------------------------------------------------------------------------

/// URL validation result.
pub type Result<T = ()> = result::Result<T, Error>;
