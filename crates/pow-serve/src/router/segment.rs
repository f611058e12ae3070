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

//! Path patterns.

use std::fmt;
use std::str::FromStr;

use super::error::{Error, Result};

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// Path pattern segment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// Segment that must match verbatim.
    Literal(String),
    /// Segment that matches anything and binds it to a name.
    Capture(String),
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Path pattern.
///
/// A pattern is split at every `/` after the leading one, keeping empty
/// segments, so `/` has a single empty segment and `/x/` has two segments,
/// `x` and an empty one. A segment starting with `:` captures the whole
/// segment under the name that follows.
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use pow_serve::router::{Pattern, Segment};
///
/// let pattern: Pattern = "/u/:name/".parse()?;
/// assert_eq!(pattern.segments(), [
///     Segment::Literal("u".into()),
///     Segment::Capture("name".into()),
///     Segment::Literal(String::new()),
/// ]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    /// Pattern as given.
    path: String,
    /// Pattern segments.
    segments: Vec<Segment>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Pattern {
    /// Returns the pattern as given.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Returns the pattern segments.
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Matches all request segments exactly, returning the captured values.
    ///
    /// Captures match any segment, including an empty one.
    pub(crate) fn match_exact<'p>(
        &self, path: &[&'p str],
    ) -> Option<Vec<(&str, &'p str)>> {
        if path.len() != self.segments.len() {
            return None;
        }

        // Compare segment by segment, collecting captures
        let mut captures = Vec::new();
        for (segment, value) in self.segments.iter().zip(path) {
            match segment {
                Segment::Literal(literal) if literal != value => return None,
                Segment::Literal(_) => {}
                Segment::Capture(name) => {
                    captures.push((name.as_str(), *value));
                }
            }
        }
        Some(captures)
    }

    /// Matches the pattern as a prefix of the request segments, returning the
    /// number of segments consumed.
    ///
    /// Captures act as wildcards without binding, while literals must match
    /// verbatim, including a trailing empty one. The root pattern `/` is the
    /// only exception, as it matches every path without consuming anything.
    pub(crate) fn match_prefix(&self, path: &[&str]) -> Option<usize> {
        if self.is_root() {
            return Some(0);
        }
        if path.len() < self.segments.len() {
            return None;
        }

        // Compare segment by segment, skipping wildcards
        for (segment, value) in self.segments.iter().zip(path) {
            match segment {
                Segment::Literal(literal) if literal != value => return None,
                Segment::Literal(_) | Segment::Capture(_) => {}
            }
        }
        Some(self.segments.len())
    }

    /// Returns whether the pattern is `/`.
    pub(crate) fn is_root(&self) -> bool {
        let segments = self.segments.as_slice();
        matches!(segments, [Segment::Literal(s)] if s.is_empty())
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl FromStr for Pattern {
    type Err = Error;

    /// Parses a pattern.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::PathMustStartWithSlash`], if the pattern
    /// does not start with `/`.
    fn from_str(value: &str) -> Result<Self> {
        let Some(rest) = value.strip_prefix('/') else {
            return Err(Error::PathMustStartWithSlash(value.to_string()));
        };
        let segments = rest
            .split('/')
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) => Segment::Capture(name.to_string()),
                None => Segment::Literal(segment.to_string()),
            })
            .collect();
        Ok(Pattern { path: value.to_string(), segments })
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Splits a normalized request path into segments, dropping the empty
/// segment in front of the leading `/`.
pub(crate) fn split(path: &str) -> Vec<&str> {
    path.strip_prefix('/').unwrap_or(path).split('/').collect()
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::{split, Pattern};
    use crate::router::Error;

    fn pattern(value: &str) -> Pattern {
        value.parse().expect("valid pattern")
    }

    #[test]
    fn requires_leading_slash() {
        let err = "abc".parse::<Pattern>().expect_err("invalid pattern");
        assert_eq!(err, Error::PathMustStartWithSlash("abc".into()));
        assert!("".parse::<Pattern>().is_err());
    }

    #[test]
    fn splits_requests() {
        assert_eq!(split("/"), [""]);
        assert_eq!(split("/x/"), ["x", ""]);
        assert_eq!(split("/u/chilts"), ["u", "chilts"]);
    }

    #[test]
    fn exact_match_binds_captures() {
        let route = pattern("/u/:name/");
        let captures = route.match_exact(&split("/u/chilts/"));
        assert_eq!(captures, Some(vec![("name", "chilts")]));
    }

    #[test]
    fn exact_match_respects_trailing_slash() {
        assert!(pattern("/x/").match_exact(&split("/x")).is_none());
        assert!(pattern("/x").match_exact(&split("/x/")).is_none());
        assert!(pattern("/x").match_exact(&split("/x")).is_some());
    }

    #[test]
    fn exact_match_is_case_sensitive() {
        assert!(pattern("/new").match_exact(&split("/New")).is_none());
    }

    #[test]
    fn root_prefix_matches_everything() {
        let root = pattern("/");
        assert_eq!(root.match_prefix(&split("/")), Some(0));
        assert_eq!(root.match_prefix(&split("/a/b/c")), Some(0));
    }

    #[test]
    fn literal_prefix() {
        let prefix = pattern("/s");
        assert_eq!(prefix.match_prefix(&split("/s")), Some(1));
        assert_eq!(prefix.match_prefix(&split("/s/app.css")), Some(1));
        assert_eq!(prefix.match_prefix(&split("/style.css")), None);
    }

    #[test]
    fn trailing_slash_prefix() {
        let prefix = pattern("/profile/");
        assert_eq!(prefix.match_prefix(&split("/profile/")), Some(2));
        assert_eq!(prefix.match_prefix(&split("/profile/a/b")), None);
        assert_eq!(prefix.match_prefix(&split("/profile")), None);
    }

    #[test]
    fn capture_prefix_is_wildcard() {
        let prefix = pattern("/u/:name");
        assert_eq!(prefix.match_prefix(&split("/u/chilts/links")), Some(2));
        assert_eq!(prefix.match_prefix(&split("/v/chilts")), None);
    }
}
