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
use crate::provide_credential::utils::{parse_expiration, send_json};
use crate::rpc::RpcRequest;
use crate::{Config, Credential};
use alicred_core::utils::non_empty;
use alicred_core::{Context, CredentialCache, Error, ProvideCredential, Result};
use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// RsaKeyPairCredentialProvider exchanges an RSA key pair for a session access key.
///
/// `access_key_id` in config is the public key id and `access_key_secret`
/// the private key content. The STS `GenerateSessionAccessKey` call is only
/// served from `sts.ap-northeast-1.aliyuncs.com`.
///
/// Session access keys carry no security token. They are cached until they expire.
#[derive(Debug)]
pub struct RsaKeyPairCredentialProvider {
    config: Arc<Config>,
    endpoint: String,
    cache: CredentialCache<Credential>,
}

impl RsaKeyPairCredentialProvider {
    /// Create a new `RsaKeyPairCredentialProvider` from config.
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            endpoint: STS_KEY_PAIR_ENDPOINT.to_string(),
            cache: CredentialCache::new(),
        }
    }

    /// Set the STS endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Config used by this provider.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Timeout applied to each STS request.
    pub fn timeout(&self) -> Duration {
        self.config.effective_timeout()
    }

    async fn fetch_credential(&self, ctx: &Context) -> Result<Credential> {
        let config = &self.config;
        let (Some(public_key_id), Some(private_key)) = (
            non_empty(config.access_key_id.as_deref()),
            non_empty(config.access_key_secret.as_deref()),
        ) else {
            return Err(Error::config_invalid(
                "public key id and private key are required to generate session access key",
            ));
        };

        let req = RpcRequest::new("GenerateSessionAccessKey")
            .with_param("DurationSeconds", config.duration_seconds.to_string())
            .with_param("RegionId", config.region_id());

        debug!("generating session access key for {public_key_id} via {}", self.endpoint);
        let req = req.into_http_request(&self.endpoint, public_key_id, private_key)?;

        let resp: GenerateSessionAccessKeyResponse =
            send_json(ctx, req, self.timeout(), "STS GenerateSessionAccessKey").await?;
        let key = resp.session_access_key.ok_or_else(|| {
            Error::credential_invalid(
                "STS GenerateSessionAccessKey response is missing SessionAccessKey",
            )
        })?;

        Ok(Credential {
            access_key_id: key.session_access_key_id,
            access_key_secret: key.session_access_key_secret,
            security_token: None,
            expiration: Some(parse_expiration(
                key.expiration.as_deref(),
                "STS GenerateSessionAccessKey",
            )?),
        })
    }
}

#[async_trait]
impl ProvideCredential for RsaKeyPairCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let cred = self.cache.resolve(|| self.fetch_credential(ctx)).await?;
        Ok(Some(cred))
    }
}

#[derive(Default, Debug, Deserialize)]
#[serde(default)]
struct GenerateSessionAccessKeyResponse {
    #[serde(rename = "SessionAccessKey")]
    session_access_key: Option<SessionAccessKey>,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct SessionAccessKey {
    session_access_key_id: String,
    session_access_key_secret: String,
    expiration: Option<String>,
}
