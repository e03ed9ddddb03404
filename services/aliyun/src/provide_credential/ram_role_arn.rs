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

/// RamRoleArnCredentialProvider assumes a RAM role through STS `AssumeRole`.
///
/// The request is signed with `access_key_id` / `access_key_secret` from
/// config and asks for a session credential for `role_arn`. An optional
/// `policy` narrows the permissions of the session.
///
/// Fetched credentials are cached until they expire.
#[derive(Debug)]
pub struct RamRoleArnCredentialProvider {
    config: Arc<Config>,
    endpoint: Option<String>,
    cache: CredentialCache<Credential>,
}

impl RamRoleArnCredentialProvider {
    /// Create a new `RamRoleArnCredentialProvider` from config.
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            endpoint: None,
            cache: CredentialCache::new(),
        }
    }

    /// Set the STS endpoint, overriding config and the default `sts.aliyuncs.com`.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
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

    fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .or(self.config.sts_endpoint.as_deref())
            .unwrap_or(STS_ENDPOINT)
    }

    async fn fetch_credential(&self, ctx: &Context) -> Result<Credential> {
        let config = &self.config;
        let (Some(access_key_id), Some(access_key_secret), Some(role_arn)) = (
            non_empty(config.access_key_id.as_deref()),
            non_empty(config.access_key_secret.as_deref()),
            non_empty(config.role_arn.as_deref()),
        ) else {
            return Err(Error::config_invalid(
                "access_key_id, access_key_secret and role_arn are required to assume role",
            ));
        };

        let req = RpcRequest::new("AssumeRole")
            .with_param("RoleArn", role_arn)
            .with_param("RoleSessionName", config.role_session_name())
            .with_param("DurationSeconds", config.duration_seconds.to_string())
            .with_param("RegionId", config.region_id())
            .with_optional_param("Policy", non_empty(config.policy.as_deref()))
            .with_optional_param("SecurityToken", non_empty(config.security_token.as_deref()));

        let endpoint = self.endpoint();
        debug!("assuming role {role_arn} via {endpoint}");
        let req = req.into_http_request(endpoint, access_key_id, access_key_secret)?;

        let resp: AssumeRoleResponse = send_json(ctx, req, self.timeout(), "STS AssumeRole")
            .await
            .map_err(|e| e.with_context(format!("role_arn: {role_arn}")))?;
        let creds = resp.credentials.ok_or_else(|| {
            Error::credential_invalid("STS AssumeRole response is missing Credentials")
                .with_context(format!("role_arn: {role_arn}"))
        })?;

        Ok(Credential {
            access_key_id: creds.access_key_id,
            access_key_secret: creds.access_key_secret,
            security_token: creds.security_token,
            expiration: Some(parse_expiration(
                creds.expiration.as_deref(),
                "STS AssumeRole",
            )?),
        })
    }
}

#[async_trait]
impl ProvideCredential for RamRoleArnCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let cred = self.cache.resolve(|| self.fetch_credential(ctx)).await?;
        Ok(Some(cred))
    }
}

#[derive(Default, Debug, Deserialize)]
#[serde(default)]
struct AssumeRoleResponse {
    #[serde(rename = "Credentials")]
    credentials: Option<AssumeRoleCredentials>,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct AssumeRoleCredentials {
    access_key_id: String,
    access_key_secret: String,
    security_token: Option<String>,
    expiration: Option<String>,
}
