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
use crate::{Config, Credential};
use alicred_core::utils::non_empty;
use alicred_core::{Context, CredentialCache, Error, ProvideCredential, Result};
use async_trait::async_trait;
use bytes::Bytes;
use log::debug;
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// EcsRamRoleCredentialProvider loads credential from the ECS instance metadata service.
///
/// Credentials are read from
/// `http://100.100.100.200/latest/meta-data/ram/security-credentials/{role_name}`.
/// If no role name is configured, the sole role attached to the instance is
/// discovered from the same path first and remembered afterwards.
///
/// Fetched credentials are cached until they expire.
#[derive(Debug)]
pub struct EcsRamRoleCredentialProvider {
    config: Arc<Config>,
    endpoint: String,
    role_name: Mutex<Option<String>>,
    enable_by_env: bool,
    cache: CredentialCache<Credential>,
}

impl EcsRamRoleCredentialProvider {
    /// Create a provider for the given role name.
    ///
    /// An empty role name means the role will be discovered.
    pub fn new(role_name: impl Into<String>) -> Self {
        let config = Config {
            role_name: Some(role_name.into()),
            ..Default::default()
        };
        Self::with_config(Arc::new(config))
    }

    /// Create a provider from config, using `role_name` and the timeouts.
    pub fn with_config(config: Arc<Config>) -> Self {
        let role_name = non_empty(config.role_name.as_deref()).map(str::to_string);
        Self {
            config,
            endpoint: ECS_METADATA_ENDPOINT.to_string(),
            role_name: Mutex::new(role_name),
            enable_by_env: false,
            cache: CredentialCache::new(),
        }
    }

    /// Create a provider that is only active when [`ALIBABA_CLOUD_ECS_METADATA`] is set.
    ///
    /// The variable holds the role name, an empty value means discover it.
    /// Without the variable this provider yields no credential, which keeps the
    /// default chain from probing the metadata service outside of ECS.
    pub fn from_env() -> Self {
        Self {
            enable_by_env: true,
            ..Self::with_config(Arc::new(Config::default()))
        }
    }

    /// Set the metadata service endpoint, mostly useful for tests.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// The role name in use, `None` if not configured or discovered yet.
    pub fn role_name(&self) -> Option<String> {
        self.role_name.lock().expect("lock poisoned").clone()
    }

    /// Timeout applied to each metadata request.
    pub fn timeout(&self) -> Duration {
        self.config.effective_timeout()
    }

    /// The credential url for the current role name.
    pub fn credential_url(&self) -> Option<String> {
        self.role_name()
            .map(|role| format!("{}{ECS_METADATA_CREDENTIALS_PATH}{role}", self.endpoint))
    }

    /// Ask the metadata service which role is attached to this instance.
    async fn discover_role_name(&self, ctx: &Context) -> Result<String> {
        let url = format!("{}{ECS_METADATA_CREDENTIALS_PATH}", self.endpoint);
        debug!("discovering ECS RAM role name from {url}");

        let req = http::Request::get(&url).body(Bytes::new())?;
        let resp = ctx.http_send_as_string(req, self.timeout()).await?;
        if !resp.status().is_success() {
            return Err(Error::credential_invalid(format!(
                "failed to get RAM role name from ECS metadata service: HttpCode={}",
                resp.status().as_u16()
            ))
            .with_context(format!("url: {url}")));
        }

        resp.body()
            .lines()
            .map(str::trim)
            .find(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::credential_invalid("no RAM role attached to ECS instance")
                    .with_context(format!("url: {url}"))
            })
    }

    /// Return the configured role name, discovering and persisting it if needed.
    ///
    /// Returns `None` when enabled by env and the env is not set.
    async fn load_role_name(&self, ctx: &Context) -> Result<Option<String>> {
        if let Some(role) = self.role_name() {
            return Ok(Some(role));
        }

        if self.enable_by_env {
            let Some(v) = ctx.env_var(ALIBABA_CLOUD_ECS_METADATA) else {
                return Ok(None);
            };
            if let Some(role) = non_empty(Some(v.as_str())) {
                *self.role_name.lock().expect("lock poisoned") = Some(role.to_string());
                return Ok(Some(role.to_string()));
            }
        }

        let role = self.discover_role_name(ctx).await?;
        debug!("discovered ECS RAM role name: {role}");
        *self.role_name.lock().expect("lock poisoned") = Some(role.clone());
        Ok(Some(role))
    }

    async fn fetch_credential(&self, ctx: &Context, role_name: &str) -> Result<Credential> {
        let url = format!(
            "{}{ECS_METADATA_CREDENTIALS_PATH}{role_name}",
            self.endpoint
        );
        let req = http::Request::get(&url).body(Bytes::new())?;

        let resp: EcsRamRoleResponse = send_json(ctx, req, self.timeout(), "ECS metadata service")
            .await
            .map_err(|e| e.with_context(format!("role_name: {role_name}")))?;

        if resp.code != "Success" {
            return Err(Error::credential_invalid(
                "failed to get RAM session credentials from ECS metadata service",
            )
            .with_context(format!("code: {}", resp.code))
            .with_context(format!("role_name: {role_name}")));
        }

        Ok(Credential {
            access_key_id: resp.access_key_id,
            access_key_secret: resp.access_key_secret,
            security_token: resp.security_token,
            expiration: Some(parse_expiration(
                resp.expiration.as_deref(),
                "ECS metadata service",
            )?),
        })
    }
}

#[async_trait]
impl ProvideCredential for EcsRamRoleCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let Some(role_name) = self.load_role_name(ctx).await? else {
            debug!("{ALIBABA_CLOUD_ECS_METADATA} is not set, skip ECS RAM role");
            return Ok(None);
        };

        let cred = self
            .cache
            .resolve(|| self.fetch_credential(ctx, &role_name))
            .await?;
        Ok(Some(cred))
    }
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct EcsRamRoleResponse {
    code: String,
    access_key_id: String,
    access_key_secret: String,
    security_token: Option<String>,
    expiration: Option<String>,
}
