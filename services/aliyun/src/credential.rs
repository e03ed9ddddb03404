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

use alicred_core::time::DateTime;
use alicred_core::utils::Redact;
use alicred_core::ExpiringCredential;
use std::fmt::{Debug, Formatter};

/// Credential that holds the access key pair and the optional session token.
///
/// A credential with `expiration` is valid strictly before that instant, one
/// without never expires.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct Credential {
    /// Access key id for aliyun services.
    pub access_key_id: String,
    /// Access key secret for aliyun services.
    pub access_key_secret: String,
    /// Security token for session credentials.
    pub security_token: Option<String>,
    /// Expiration time for this credential.
    pub expiration: Option<DateTime>,
}

impl Credential {
    /// Build a static credential that never expires.
    pub fn new(access_key_id: impl Into<String>, access_key_secret: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            access_key_secret: access_key_secret.into(),
            security_token: None,
            expiration: None,
        }
    }

    /// Check whether the credential is expired at `now`.
    pub fn is_expired(&self, now: DateTime) -> bool {
        ExpiringCredential::is_expired(self, now)
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("access_key_secret", &Redact::from(&self.access_key_secret))
            .field("security_token", &Redact::from(&self.security_token))
            .field("expiration", &self.expiration)
            .finish()
    }
}

impl ExpiringCredential for Credential {
    fn expires_at(&self) -> Option<DateTime> {
        self.expiration
    }
}
