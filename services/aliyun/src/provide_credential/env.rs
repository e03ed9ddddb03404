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

use crate::constants::*;
use crate::Credential;
use alicred_core::{Context, Error, ProvideCredential, Result};
use async_trait::async_trait;

/// EnvCredentialProvider loads credential from environment variables.
///
/// - [`ALIBABA_CLOUD_ACCESS_KEY_ID`]
/// - [`ALIBABA_CLOUD_ACCESS_KEY_SECRET`]
/// - [`ALIBABA_CLOUD_SECURITY_TOKEN`] (optional)
///
/// Unset variables mean this source is not configured and yield `None`.
/// Variables that are set but empty are a configuration error.
#[derive(Debug, Default, Clone)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new `EnvCredentialProvider` instance.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let Some(access_key_id) = ctx.env_var(ALIBABA_CLOUD_ACCESS_KEY_ID) else {
            return Ok(None);
        };
        if access_key_id.is_empty() {
            return Err(Error::config_invalid(format!(
                "environment variable {ALIBABA_CLOUD_ACCESS_KEY_ID} cannot be empty"
            )));
        }

        let Some(access_key_secret) = ctx.env_var(ALIBABA_CLOUD_ACCESS_KEY_SECRET) else {
            return Ok(None);
        };
        if access_key_secret.is_empty() {
            return Err(Error::config_invalid(format!(
                "environment variable {ALIBABA_CLOUD_ACCESS_KEY_SECRET} cannot be empty"
            )));
        }

        Ok(Some(Credential {
            access_key_id,
            access_key_secret,
            security_token: ctx
                .env_var(ALIBABA_CLOUD_SECURITY_TOKEN)
                .filter(|v| !v.is_empty()),
            expiration: None,
        }))
    }
}
