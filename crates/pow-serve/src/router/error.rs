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

//! Router error.

use std::result;
use thiserror::Error;

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// Router error.
///
/// Registration errors carry the offending path pattern. Only the first error
/// is kept, as every registration after it is ignored.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Path pattern does not start with `/`.
    #[error("path must start with a slash: {0}")]
    PathMustStartWithSlash(String),

    /// More than one action was given for a route.
    #[error("multiple actions given for route: {0}")]
    MultipleActions(String),

    /// Middleware was given after the action of a route.
    #[error("middleware given after action for route: {0}")]
    MiddlewareAfterAction(String),

    /// Registration argument is not recognized.
    #[error("unrecognized registration argument: {0}")]
    UnrecognizedArgument(String),

    /// Route was given without an action.
    #[error("missing action for route: {0}")]
    MissingAction(String),
}

// ----------------------------------------------------------------------------
// Type aliases
// ----------------------------------------------------------------------------

/// Router result.
pub type Result<T = ()> = result::Result<T, Error>;
