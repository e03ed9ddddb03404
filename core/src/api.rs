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

use crate::time::DateTime;
use crate::{Context, Result};
use std::fmt::Debug;

/// ExpiringCredential is implemented by every credential a provider can return.
pub trait ExpiringCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// The instant this credential stops being valid, `None` if it never expires.
    fn expires_at(&self) -> Option<DateTime>;

    /// Check whether the credential is expired at `now`.
    ///
    /// A credential is valid strictly before its expiration.
    fn is_expired(&self, now: DateTime) -> bool {
        match self.expires_at() {
            Some(expiration) => now >= expiration,
            None => false,
        }
    }
}

/// ProvideCredential is the trait implemented by every credential source.
///
/// The return value separates three outcomes:
///
/// - `Ok(Some(cred))`: the source produced a credential.
/// - `Ok(None)`: the source is not configured here, callers may try the next one.
/// - `Err(err)`: the source is configured but broken, or the remote call failed.
#[async_trait::async_trait]
pub trait ProvideCredential: Debug + Send + Sync + Unpin + 'static {
    /// Credential returned by this provider.
    type Credential: Send + Sync + Unpin + 'static;

    /// Load credential from current context.
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>>;
}
