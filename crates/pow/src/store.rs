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

//! Record store.
//!
//! Records are kept in a tree of named buckets, addressed by dotted locations
//! like `url` or `stats.done`. Reads and writes happen in transactions, and
//! every committed write is saved to disk as a whole, which is plenty for the
//! amount of data a link shortener deals with.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

mod error;
mod tx;

pub use error::{Error, Result};
pub use tx::Tx;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Record store.
///
/// Transactions are serialized by a lock, so a store can be shared between
/// threads behind an [`Arc`][]. Writes are atomic: an update works on a copy
/// of the data, which replaces the data only if the update succeeds.
///
/// [`Arc`]: std::sync::Arc
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use pow::store::Store;
///
/// let store = Store::memory();
/// store.update(|tx| tx.put("users.chilts", "email", "me@example.com"))?;
///
/// let email = store.view(|tx| Ok(tx.get_string("users.chilts", "email")?))?;
/// assert_eq!(email, "me@example.com");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Store {
    /// Root bucket.
    root: Mutex<Bucket>,
    /// File the root bucket is saved to, if any.
    path: Option<PathBuf>,
}

/// Bucket.
///
/// Buckets hold values by key, and nested buckets by name. Keys and names
/// live in separate namespaces.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bucket {
    /// Nested buckets.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    buckets: BTreeMap<String, Bucket>,
    /// Values by key.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    values: BTreeMap<String, String>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Store {
    /// Opens a store backed by the given file.
    ///
    /// If the file doesn't exist yet, the store starts out empty, and the file
    /// is created with the first update.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Io`], if the file can't be read, and
    /// [`Error::Json`], if its contents can't be parsed.
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: Into<PathBuf>,
    {
        let path = path.into();
        let root = match fs::read(&path) {
            Ok(data) => serde_json::from_slice(&data)?,
            Err(err) if err.kind() == ErrorKind::NotFound => Bucket::default(),
            Err(err) => return Err(err.into()),
        };

        tracing::info!(path = %path.display(), "opened store");
        Ok(Self {
            root: Mutex::new(root),
            path: Some(path),
        })
    }

    /// Creates a store that is never saved.
    #[must_use]
    pub fn memory() -> Self {
        Self {
            root: Mutex::new(Bucket::default()),
            path: None,
        }
    }

    /// Runs a read transaction.
    ///
    /// # Errors
    ///
    /// This method returns the error of the given function.
    pub fn view<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Tx<&Bucket>) -> Result<T>,
    {
        let root = self.lock();
        f(&Tx::new(&*root))
    }

    /// Runs a write transaction.
    ///
    /// The given function works on a copy of the data, which is committed and
    /// saved only if the function succeeds. Every update clones the whole
    /// tree and rewrites the whole file, so its cost grows with the size of
    /// the store, not with the size of the change.
    ///
    /// # Errors
    ///
    /// This method returns the error of the given function, or an error if
    /// the data can't be saved, in which case nothing is committed.
    pub fn update<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Tx<&mut Bucket>) -> Result<T>,
    {
        let mut root = self.lock();
        let mut copy = root.clone();
        let value = f(&mut Tx::new(&mut copy))?;

        // Save before committing, so memory never runs ahead of the disk
        if let Some(path) = &self.path {
            save(path, &copy)?;
        }
        *root = copy;
        Ok(value)
    }

    /// Acquires the lock on the root bucket.
    fn lock(&self) -> MutexGuard<'_, Bucket> {
        // Updates never leave the root half-written, so poison is harmless
        self.root.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Bucket {
    /// Returns the nested bucket at the given names, if it exists.
    fn find<'a, I>(&self, mut names: I) -> Option<&Bucket>
    where
        I: Iterator<Item = &'a str>,
    {
        names.try_fold(self, |bucket, name| bucket.buckets.get(name))
    }

    /// Returns the nested bucket at the given names, creating it if needed.
    fn find_or_create<'a, I>(&mut self, names: I) -> &mut Bucket
    where
        I: Iterator<Item = &'a str>,
    {
        names.fold(self, |bucket, name| {
            bucket.buckets.entry(name.to_string()).or_default()
        })
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Saves the bucket to the given file, replacing it atomically.
fn save(path: &Path, root: &Bucket) -> Result {
    let mut temp = OsString::from(path.as_os_str());
    temp.push(".tmp");

    // Write to a temporary file first, so readers never see partial data
    let data = serde_json::to_vec(root)?;
    fs::write(&temp, data)?;
    fs::rename(&temp, path)?;
    Ok(())
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{Error, Store};

    #[test]
    fn failed_update_is_rolled_back() {
        let store = Store::memory();
        store.update(|tx| tx.put("url", "a", "1")).expect("update");

        let res = store.update(|tx| {
            tx.put("url", "a", "2")?;
            tx.put("url", "", "3")
        });
        assert!(matches!(res, Err(Error::EmptyKey)));

        let value = store.view(|tx| Ok(tx.get_string("url", "a")?));
        assert_eq!(value.expect("view"), "1");
    }

    #[test]
    fn persists_updates() {
        let path = std::env::temp_dir()
            .join(format!("pow-store-{}.db", std::process::id()));
        let _ = fs::remove_file(&path);

        let store = Store::open(&path).expect("open");
        store
            .update(|tx| tx.put("stats.done", "20250101-10:abcd", "x"))
            .expect("update");
        drop(store);

        let store = Store::open(&path).expect("reopen");
        let value = store
            .view(|tx| Ok(tx.get("stats.done", "20250101-10:abcd")?.is_some()));
        assert!(value.expect("view"));
        fs::remove_file(&path).expect("remove");
    }

    #[test]
    fn corrupt_file_is_error() {
        let path = std::env::temp_dir()
            .join(format!("pow-corrupt-{}.db", std::process::id()));
        fs::write(&path, "not json").expect("write");
        assert!(matches!(Store::open(&path), Err(Error::Json(_))));
        fs::remove_file(&path).expect("remove");
    }
}
