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

//! Record store transaction.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::borrow::Borrow;
use std::str::Split;

use super::{Bucket, Error, Result};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Record store transaction.
///
/// Read transactions wrap a shared reference to the root bucket and can only
/// read, while write transactions wrap an exclusive reference and can also
/// put and delete values. A missing bucket or key always reads as `None`.
#[derive(Debug)]
pub struct Tx<B> {
    /// Root bucket.
    root: B,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl<B> Tx<B>
where
    B: Borrow<Bucket>,
{
    /// Creates a transaction on the given root bucket.
    pub(super) fn new(root: B) -> Self {
        Self { root }
    }

    /// Returns the raw value at the given location and key.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::EmptyLocation`] or [`Error::InvalidBucket`]
    /// for malformed locations, and [`Error::EmptyKey`] for empty keys.
    pub fn get(&self, location: &str, key: &str) -> Result<Option<&str>> {
        let names = parse(location)?;
        let Some(bucket) = self.root().find(names) else {
            return Ok(None);
        };
        if key.is_empty() {
            return Err(Error::EmptyKey);
        }
        Ok(bucket.values.get(key).map(String::as_str))
    }

    /// Returns the value at the given location and key as a string, which is
    /// empty if the key doesn't exist.
    pub fn get_string(&self, location: &str, key: &str) -> Result<String> {
        let value = self.get(location, key)?;
        Ok(value.unwrap_or_default().to_string())
    }

    /// Returns the value at the given location and key parsed from JSON.
    ///
    /// # Errors
    ///
    /// In addition to the errors of [`Tx::get`], this method returns
    /// [`Error::Json`], if the value can't be parsed.
    pub fn get_json<T>(&self, location: &str, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        match self.get(location, key)? {
            Some(value) => Ok(Some(serde_json::from_str(value)?)),
            None => Ok(None),
        }
    }

    /// Returns the root bucket.
    fn root(&self) -> &Bucket {
        self.root.borrow()
    }
}

impl Tx<&mut Bucket> {
    /// Puts a value at the given location and key, creating all buckets of
    /// the location that don't exist yet.
    pub fn put<V>(&mut self, location: &str, key: &str, value: V) -> Result
    where
        V: Into<String>,
    {
        let names = parse(location)?;
        if key.is_empty() {
            return Err(Error::EmptyKey);
        }

        let bucket = self.root.find_or_create(names);
        bucket.values.insert(key.to_string(), value.into());
        Ok(())
    }

    /// Puts a string value at the given location and key.
    #[inline]
    pub fn put_string(
        &mut self, location: &str, key: &str, value: &str,
    ) -> Result {
        self.put(location, key, value)
    }

    /// Puts a value serialized as JSON at the given location and key.
    pub fn put_json<T>(
        &mut self, location: &str, key: &str, value: &T,
    ) -> Result
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_string(value)?;
        self.put(location, key, value)
    }

    /// Deletes the value at the given location and key. Missing buckets and
    /// keys are not an error.
    pub fn del(&mut self, location: &str, key: &str) -> Result {
        let names = parse(location)?;
        if key.is_empty() {
            return Err(Error::EmptyKey);
        }

        // Resolve mutably by hand, as missing buckets must not be created
        let mut bucket = &mut *self.root;
        for name in names {
            match bucket.buckets.get_mut(name) {
                Some(next) => bucket = next,
                None => return Ok(()),
            }
        }
        bucket.values.remove(key);
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Splits the given location into bucket names, validating each of them.
fn parse(location: &str) -> Result<Split<'_, char>> {
    if location.is_empty() {
        return Err(Error::EmptyLocation);
    }
    if location.split('.').any(str::is_empty) {
        return Err(Error::InvalidBucket(location.to_string()));
    }
    Ok(location.split('.'))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::Tx;
    use crate::store::{Bucket, Error};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct User {
        name: String,
    }

    #[test]
    fn puts_and_gets_nested() {
        let mut root = Bucket::default();
        let mut tx = Tx::new(&mut root);
        tx.put("users.chilts.posts", "hello", "Hello, World!")
            .expect("put");

        let value = tx.get("users.chilts.posts", "hello").expect("get");
        assert_eq!(value, Some("Hello, World!"));
        assert_eq!(tx.get("users.chilts", "hello").expect("get"), None);
        assert_eq!(tx.get("users.nobody", "hello").expect("get"), None);
    }

    #[test]
    fn validates_locations() {
        let mut root = Bucket::default();
        let mut tx = Tx::new(&mut root);
        assert!(matches!(tx.put("", "k", "v"), Err(Error::EmptyLocation)));
        assert!(matches!(
            tx.put("users..field", "k", "v"),
            Err(Error::InvalidBucket(_))
        ));
        let res = tx.put(".users", "k", "v");
        assert!(matches!(res, Err(Error::InvalidBucket(_))));
        assert!(matches!(tx.put("users", "", "v"), Err(Error::EmptyKey)));
        assert!(matches!(tx.get("", "k"), Err(Error::EmptyLocation)));
    }

    #[test]
    fn missing_bucket_hides_empty_key() {
        let root = Bucket::default();
        let tx = Tx::new(&root);
        assert_eq!(tx.get("url", "").expect("get"), None);
    }

    #[test]
    fn round_trips_json() {
        let mut root = Bucket::default();
        let mut tx = Tx::new(&mut root);
        let user = User { name: "chilts".into() };
        tx.put_json("users", "chilts", &user).expect("put");

        let value: Option<User> = tx.get_json("users", "chilts").expect("get");
        assert_eq!(value, Some(user));
        tx.put_string("users", "broken", "{").expect("put");
        let res = tx.get_json::<User>("users", "broken");
        assert!(matches!(res, Err(Error::Json(_))));
    }

    #[test]
    fn deletes_values() {
        let mut root = Bucket::default();
        let mut tx = Tx::new(&mut root);
        tx.put("url", "abcd", "x").expect("put");
        tx.del("url", "abcd").expect("del");
        tx.del("url", "abcd").expect("del missing key");
        tx.del("missing.bucket", "abcd").expect("del missing bucket");

        assert_eq!(tx.get_string("url", "abcd").expect("get"), "");
        assert_eq!(tx.get("missing", "abcd").expect("get"), None);
    }
}
