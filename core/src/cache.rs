// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::time::{now, DateTime};
use crate::{ExpiringCredential, Result};
use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::sync::Mutex;

/// CredentialCache holds the last credential a remote-backed provider fetched.
///
/// [`CredentialCache::resolve`] returns the cached credential while it is not
/// expired and only calls the fetch future otherwise. The lock is never held
/// across the fetch, so concurrent callers that observe a stale entry may fetch
/// twice. Both fetches produce a valid credential and the last writer wins.
pub struct CredentialCache<C> {
    entry: Mutex<Option<CacheEntry<C>>>,
}

#[derive(Clone)]
struct CacheEntry<C> {
    credential: C,
    fetched_at: DateTime,
}

impl<C> Default for CredentialCache<C> {
    fn default() -> Self {
        Self {
            entry: Mutex::new(None),
        }
    }
}

impl<C: ExpiringCredential> Debug for CredentialCache<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let entry = self.entry.lock().expect("lock poisoned");
        f.debug_struct("CredentialCache")
            .field("credential", &entry.as_ref().map(|v| &v.credential))
            .field("fetched_at", &entry.as_ref().map(|v| v.fetched_at))
            .finish()
    }
}

impl<C: ExpiringCredential> CredentialCache<C> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached credential if it's still valid at `now`.
    pub fn get(&self, now: DateTime) -> Option<C> {
        let entry = self.entry.lock().expect("lock poisoned");
        entry
            .as_ref()
            .filter(|v| !v.credential.is_expired(now))
            .map(|v| v.credential.clone())
    }

    /// Instant of the last successful fetch.
    pub fn fetched_at(&self) -> Option<DateTime> {
        self.entry
            .lock()
            .expect("lock poisoned")
            .as_ref()
            .map(|v| v.fetched_at)
    }

    /// Overwrite the cached credential.
    pub fn store(&self, credential: C) {
        *self.entry.lock().expect("lock poisoned") = Some(CacheEntry {
            credential,
            fetched_at: now(),
        });
    }

    /// Return the cached credential or fetch, store and return a new one.
    ///
    /// A failed fetch leaves the previous entry untouched.
    pub async fn resolve<F, Fut>(&self, fetch: F) -> Result<C>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<C>>,
    {
        if let Some(cred) = self.get(now()) {
            log::debug!("credential cache hit");
            return Ok(cred);
        }

        match self.fetched_at() {
            Some(fetched_at) => {
                log::debug!("credential fetched at {fetched_at} is expired, refreshing")
            }
            None => log::debug!("credential cache is empty, fetching"),
        }
        let cred = fetch().await?;
        self.store(cred.clone());
        Ok(cred)
    }
}
