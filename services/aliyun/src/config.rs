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
use alicred_core::utils::Redact;
use alicred_core::Context;
use std::fmt::{Debug, Formatter};
use std::time::Duration;

/// Config carries the settings shared by every provider in this crate.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_ACCESS_KEY_ID`]
    ///
    /// For the RSA key pair provider this is the public key id.
    pub access_key_id: Option<String>,
    /// `access_key_secret` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_ACCESS_KEY_SECRET`]
    ///
    /// For the RSA key pair provider this is the private key content.
    pub access_key_secret: Option<String>,
    /// `security_token` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_SECURITY_TOKEN`]
    pub security_token: Option<String>,
    /// RAM role attached to the ECS instance.
    ///
    /// Discovered from the metadata service when empty.
    pub role_name: Option<String>,
    /// `role_arn` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_ROLE_ARN`]
    pub role_arn: Option<String>,
    /// `role_session_name` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_ROLE_SESSION_NAME`]
    /// - default to `alicred`
    pub role_session_name: Option<String>,
    /// `region_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_REGION_ID`]
    /// - default to `cn-hangzhou`
    pub region_id: Option<String>,
    /// JSON policy that further restricts the assumed role.
    pub policy: Option<String>,
    /// Lifetime requested for session credentials.
    pub duration_seconds: u64,
    /// `sts_endpoint` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_STS_ENDPOINT`]
    pub sts_endpoint: Option<String>,
    /// Read timeout in milliseconds.
    pub timeout: u64,
    /// Connect timeout in milliseconds.
    pub connect_timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            access_key_id: None,
            access_key_secret: None,
            security_token: None,
            role_name: None,
            role_arn: None,
            role_session_name: None,
            region_id: None,
            policy: None,
            duration_seconds: DEFAULT_DURATION_SECONDS,
            sts_endpoint: None,
            timeout: DEFAULT_TIMEOUT_MILLIS,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT_MILLIS,
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("access_key_secret", &Redact::from(&self.access_key_secret))
            .field("security_token", &Redact::from(&self.security_token))
            .field("role_name", &self.role_name)
            .field("role_arn", &self.role_arn)
            .field("role_session_name", &self.role_session_name)
            .field("region_id", &self.region_id)
            .field("policy", &self.policy)
            .field("duration_seconds", &self.duration_seconds)
            .field("sts_endpoint", &self.sts_endpoint)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl Config {
    /// Load config from env.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(ALIBABA_CLOUD_ACCESS_KEY_ID) {
            self.access_key_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(ALIBABA_CLOUD_ACCESS_KEY_SECRET) {
            self.access_key_secret.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(ALIBABA_CLOUD_SECURITY_TOKEN) {
            self.security_token.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(ALIBABA_CLOUD_ROLE_ARN) {
            self.role_arn.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(ALIBABA_CLOUD_ROLE_SESSION_NAME) {
            self.role_session_name.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(ALIBABA_CLOUD_REGION_ID) {
            self.region_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(ALIBABA_CLOUD_STS_ENDPOINT) {
            self.sts_endpoint.get_or_insert(v);
        }

        self
    }

    /// Region used for STS calls, `cn-hangzhou` if unset.
    pub fn region_id(&self) -> &str {
        self.region_id.as_deref().unwrap_or(DEFAULT_REGION_ID)
    }

    /// Session name used for AssumeRole, `alicred` if unset.
    pub fn role_session_name(&self) -> &str {
        self.role_session_name
            .as_deref()
            .unwrap_or(DEFAULT_ROLE_SESSION_NAME)
    }

    /// Total time a single credential request may take.
    ///
    /// This is `timeout + connect_timeout`: both budgets are applied to the
    /// whole request rather than to separate phases.
    pub fn effective_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout.saturating_add(self.connect_timeout))
    }
}
