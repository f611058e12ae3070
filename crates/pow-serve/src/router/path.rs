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

//! Path normalization.

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Normalizes an absolute request path.
///
/// Repeated slashes are collapsed, `.` segments are removed and `..` segments
/// remove the segment before them, never going above the root. A trailing
/// slash on the input is kept on the output.
///
/// # Examples
///
/// ```
/// use pow_serve::router::normalize;
///
/// assert_eq!(normalize("/a/../b"), "/b");
/// assert_eq!(normalize("//u/./chilts/"), "/u/chilts/");
/// assert_eq!(normalize("/../.."), "/");
/// ```
#[must_use]
pub fn normalize(path: &str) -> String {
    let mut stack: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            _ => stack.push(segment),
        }
    }

    // Rebuild, restoring the trailing slash
    let mut clean = String::with_capacity(path.len());
    for segment in &stack {
        clean.push('/');
        clean.push_str(segment);
    }
    if clean.is_empty() || path.ends_with('/') {
        clean.push('/');
    }
    clean
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn keeps_clean_paths() {
        for path in ["/", "/x", "/x/", "/u/chilts/", "/abcd+"] {
            assert_eq!(normalize(path), path);
        }
    }

    #[test]
    fn resolves_dots() {
        assert_eq!(normalize("/a/./b"), "/a/b");
        assert_eq!(normalize("/a/b/.."), "/a");
        assert_eq!(normalize("/a/b/../"), "/a/");
        assert_eq!(normalize("/.."), "/");
    }

    #[test]
    fn collapses_slashes() {
        assert_eq!(normalize("//x"), "/x");
        assert_eq!(normalize("/x//y//"), "/x/y/");
    }
}
