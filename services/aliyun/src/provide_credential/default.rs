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

use crate::provide_credential::{
    EcsRamRoleCredentialProvider, EnvCredentialProvider, ProfileCredentialProvider,
};
use crate::Credential;
use alicred_core::{Context, Error, ProvideCredential, Result};
use async_trait::async_trait;
use log::{debug, warn};
use std::fmt::{self, Debug};
use std::sync::{Arc, Mutex};

/// A shared credential provider as stored by [`DefaultCredentialProvider`].
pub type SharedCredentialProvider = Arc<dyn ProvideCredential<Credential = Credential>>;

/// DefaultCredentialProvider is the ordered chain of credential sources.
///
/// Providers registered by the user are tried first, in insertion order. Then
/// the fixed fallback sequence is tried:
///
/// 1. [`EnvCredentialProvider`]
/// 2. [`ProfileCredentialProvider`]
/// 3. [`EcsRamRoleCredentialProvider::from_env`]
///
/// The first provider returning a credential wins. The first error aborts
/// the chain and is returned as is.
pub struct DefaultCredentialProvider {
    providers: Mutex<Vec<SharedCredentialProvider>>,
    fallback: Vec<SharedCredentialProvider>,
}

impl Default for DefaultCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for DefaultCredentialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultCredentialProvider")
            .field("providers_count", &self.providers().len())
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl DefaultCredentialProvider {
    /// Create a chain with no user providers and the default fallback.
    pub fn new() -> Self {
        Self::with_fallback(vec![
            Arc::new(EnvCredentialProvider::new()),
            Arc::new(ProfileCredentialProvider::new()),
            Arc::new(EcsRamRoleCredentialProvider::from_env()),
        ])
    }

    /// Create a chain with a custom fallback sequence.
    pub fn with_fallback(fallback: Vec<SharedCredentialProvider>) -> Self {
        Self {
            providers: Mutex::new(Vec::new()),
            fallback,
        }
    }

    /// Append a provider to the user list. Duplicates are allowed.
    pub fn add_credentials_provider(&self, provider: SharedCredentialProvider) {
        self.providers.lock().expect("lock poisoned").push(provider);
    }

    /// Remove the first occurrence of `provider` from the user list.
    ///
    /// Providers are compared by identity. Returns whether one was removed.
    pub fn remove_credentials_provider(&self, provider: &SharedCredentialProvider) -> bool {
        let mut providers = self.providers.lock().expect("lock poisoned");
        match providers.iter().position(|p| Arc::ptr_eq(p, provider)) {
            Some(idx) => {
                providers.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Check whether `provider` is in the user list.
    pub fn contains_credentials_provider(&self, provider: &SharedCredentialProvider) -> bool {
        self.providers
            .lock()
            .expect("lock poisoned")
            .iter()
            .any(|p| Arc::ptr_eq(p, provider))
    }

    /// Remove all user providers. The fallback sequence is kept.
    pub fn clear_credentials_provider(&self) {
        self.providers.lock().expect("lock poisoned").clear();
    }

    /// Snapshot of the user providers in order.
    pub fn providers(&self) -> Vec<SharedCredentialProvider> {
        self.providers.lock().expect("lock poisoned").clone()
    }

    /// The fallback providers in order.
    pub fn fallback_providers(&self) -> &[SharedCredentialProvider] {
        &self.fallback
    }

    /// Resolve a credential, failing with `CredentialNotFound` if no provider has one.
    pub async fn get_credentials(&self, ctx: &Context) -> Result<Credential> {
        self.provide_credential(ctx)
            .await?
            .ok_or_else(|| Error::credential_not_found("not found credentials"))
    }
}

#[async_trait]
impl ProvideCredential for DefaultCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        // Snapshot so the lock is not held across awaits.
        let providers = self.providers();

        for provider in providers.iter().chain(self.fallback.iter()) {
            debug!("trying credential provider: {provider:?}");

            match provider.provide_credential(ctx).await {
                Ok(Some(cred)) => {
                    debug!("loaded credential from provider: {provider:?}");
                    return Ok(Some(cred));
                }
                Ok(None) => {
                    debug!("no credential found in provider: {provider:?}");
                }
                Err(err) => {
                    warn!("failed to load credential from provider {provider:?}: {err}");
                    return Err(err);
                }
            }
        }

        Ok(None)
    }
}
