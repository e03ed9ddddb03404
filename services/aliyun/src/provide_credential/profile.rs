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
use crate::provide_credential::{
    EcsRamRoleCredentialProvider, RamRoleArnCredentialProvider, RsaKeyPairCredentialProvider,
    StaticCredentialProvider,
};
use crate::{Config, Credential};
use alicred_core::utils::non_empty;
use alicred_core::{Context, Error, ProvideCredential, Result};
use async_trait::async_trait;
use ini::Ini;
use log::debug;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

/// Profile is a named set of settings read from a profile store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    name: String,
    settings: HashMap<String, String>,
}

/// ProfileKind is the parsed `type` of a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileKind {
    /// `access_key`, also accepted as `default`.
    AccessKey,
    /// `ecs_ram_role`
    EcsRamRole,
    /// `ram_role_arn`
    RamRoleArn,
    /// `rsa_key_pair`
    RsaKeyPair,
    /// Any other type, ignored by [`ProfileCredentialProvider`].
    Unknown(String),
}

impl Profile {
    /// Create an empty profile.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            settings: HashMap::new(),
        }
    }

    /// Set a setting of this profile.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// Name of this profile.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get a trimmed, non-empty setting.
    pub fn get(&self, key: &str) -> Option<&str> {
        non_empty(self.settings.get(key).map(String::as_str))
    }

    /// Profiles with `enable = false` are treated as absent.
    pub fn is_enabled(&self) -> bool {
        !matches!(self.get("enable"), Some(v) if v.eq_ignore_ascii_case("false"))
    }

    /// Parse the `type` setting.
    pub fn kind(&self) -> Result<ProfileKind> {
        let Some(kind) = self.get("type") else {
            return Err(Error::config_invalid("profile type is missing")
                .with_context(format!("profile: {}", self.name)));
        };

        Ok(match kind {
            "access_key" | "default" => ProfileKind::AccessKey,
            "ecs_ram_role" => ProfileKind::EcsRamRole,
            "ram_role_arn" => ProfileKind::RamRoleArn,
            "rsa_key_pair" => ProfileKind::RsaKeyPair,
            v => ProfileKind::Unknown(v.to_string()),
        })
    }

    fn require(&self, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| {
            Error::config_invalid(format!("{key} is required by profile"))
                .with_context(format!("profile: {}", self.name))
        })
    }
}

impl<K, V> FromIterator<(K, V)> for Profile
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            name: String::new(),
            settings: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// ProfileStore looks up profiles by name.
#[async_trait]
pub trait ProfileStore: Debug + Send + Sync + 'static {
    /// Load the profile named `name`, `None` if it does not exist.
    async fn get_profile(&self, ctx: &Context, name: &str) -> Result<Option<Profile>>;
}

/// IniProfileStore reads profiles from an INI credentials file.
///
/// The file path is loaded from
///
/// - the path set by [`IniProfileStore::with_path`]
/// - env value: [`ALIBABA_CLOUD_CREDENTIALS_FILE`]
/// - default to `~/.alibabacloud/credentials.ini`
///
/// Each section is a profile:
///
/// ```ini
/// [default]
/// enable = true
/// type = access_key
/// access_key_id = foo
/// access_key_secret = bar
/// ```
#[derive(Debug, Default, Clone)]
pub struct IniProfileStore {
    path: Option<String>,
}

impl IniProfileStore {
    /// Create a store using the path from env or the default path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read profiles from the given path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

#[async_trait]
impl ProfileStore for IniProfileStore {
    async fn get_profile(&self, ctx: &Context, name: &str) -> Result<Option<Profile>> {
        let path = match &self.path {
            Some(path) => path.clone(),
            None => ctx
                .env_var(ALIBABA_CLOUD_CREDENTIALS_FILE)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_CREDENTIALS_FILE.to_string()),
        };

        let Some(path) = ctx.expand_home_dir(&path) else {
            debug!("failed to expand homedir for path: {path}");
            return Ok(None);
        };

        let content = match ctx.file_read_as_string(&path).await {
            Ok(content) => content,
            Err(err) => {
                debug!("failed to read credentials file {path}: {err}");
                return Ok(None);
            }
        };

        let conf = Ini::load_from_str(&content).map_err(|e| {
            Error::config_invalid("failed to parse credentials file")
                .with_source(e)
                .with_context(format!("path: {path}"))
        })?;

        let Some(props) = conf.section(Some(name)) else {
            debug!("profile {name} not found in credentials file {path}");
            return Ok(None);
        };

        let mut profile: Profile = props.iter().collect();
        profile.name = name.to_string();
        Ok(Some(profile))
    }
}

/// StaticProfileStore keeps profiles in memory.
#[derive(Debug, Default, Clone)]
pub struct StaticProfileStore {
    profiles: HashMap<String, Profile>,
}

impl StaticProfileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a profile, replacing the one with the same name.
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profiles.insert(profile.name.clone(), profile);
        self
    }
}

#[async_trait]
impl ProfileStore for StaticProfileStore {
    async fn get_profile(&self, _: &Context, name: &str) -> Result<Option<Profile>> {
        Ok(self.profiles.get(name).cloned())
    }
}

type CredentialProvider = Arc<dyn ProvideCredential<Credential = Credential>>;

/// ProfileCredentialProvider loads credential from a named profile.
///
/// The profile name is loaded from
///
/// - the name set by [`ProfileCredentialProvider::with_profile`]
/// - env value: [`ALIBABA_CLOUD_PROFILE`]
/// - default to `default`
///
/// The profile `type` decides which provider serves the credential:
///
/// - `access_key`: `access_key_id`, `access_key_secret`
/// - `ram_role_arn`: `access_key_id`, `access_key_secret`, `role_arn`,
///   `role_session_name`, optional `policy` and `region_id`
/// - `ecs_ram_role`: `role_name`
/// - `rsa_key_pair`: `public_key_id`, `private_key_file`
///
/// Unknown types yield no credential. The provider built for a profile is
/// reused until the profile changes, so remote-backed profiles keep their cache.
#[derive(Debug)]
pub struct ProfileCredentialProvider {
    config: Arc<Config>,
    profile: Option<String>,
    store: Arc<dyn ProfileStore>,
    inner: Mutex<Option<(Profile, CredentialProvider)>>,
}

impl Default for ProfileCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileCredentialProvider {
    /// Create a provider reading the INI credentials file.
    pub fn new() -> Self {
        Self {
            config: Arc::new(Config::default()),
            profile: None,
            store: Arc::new(IniProfileStore::new()),
            inner: Mutex::new(None),
        }
    }

    /// Set the profile store.
    pub fn with_store(mut self, store: impl ProfileStore) -> Self {
        self.store = Arc::new(store);
        self
    }

    /// Set the profile name.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Set the config used for timeouts, duration and STS endpoint of
    /// remote-backed profiles.
    pub fn with_config(mut self, config: Arc<Config>) -> Self {
        self.config = config;
        self
    }

    fn profile_name(&self, ctx: &Context) -> String {
        self.profile
            .clone()
            .or_else(|| ctx.env_var(ALIBABA_CLOUD_PROFILE).filter(|v| !v.is_empty()))
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string())
    }

    async fn build_provider(
        &self,
        ctx: &Context,
        profile: &Profile,
    ) -> Result<Option<CredentialProvider>> {
        let provider: CredentialProvider = match profile.kind()? {
            ProfileKind::AccessKey => Arc::new(StaticCredentialProvider::new(
                profile.require("access_key_id")?,
                profile.require("access_key_secret")?,
            )),
            ProfileKind::RamRoleArn => {
                let config = Config {
                    access_key_id: Some(profile.require("access_key_id")?.to_string()),
                    access_key_secret: Some(profile.require("access_key_secret")?.to_string()),
                    role_arn: Some(profile.require("role_arn")?.to_string()),
                    role_session_name: Some(profile.require("role_session_name")?.to_string()),
                    policy: profile.get("policy").map(str::to_string),
                    region_id: profile
                        .get("region_id")
                        .map(str::to_string)
                        .or_else(|| self.config.region_id.clone()),
                    ..(*self.config).clone()
                };
                Arc::new(RamRoleArnCredentialProvider::new(Arc::new(config)))
            }
            ProfileKind::EcsRamRole => {
                let config = Config {
                    role_name: Some(profile.require("role_name")?.to_string()),
                    ..(*self.config).clone()
                };
                Arc::new(EcsRamRoleCredentialProvider::with_config(Arc::new(config)))
            }
            ProfileKind::RsaKeyPair => {
                let public_key_id = profile.require("public_key_id")?;
                let private_key_file = profile.require("private_key_file")?;
                let path = ctx.expand_home_dir(private_key_file).ok_or_else(|| {
                    Error::config_invalid("failed to expand homedir for private_key_file")
                        .with_context(format!("path: {private_key_file}"))
                })?;
                let private_key = ctx.file_read_as_string(&path).await?;
                if private_key.trim().is_empty() {
                    return Err(Error::config_invalid("private_key_file is empty")
                        .with_context(format!("path: {path}")));
                }

                let config = Config {
                    access_key_id: Some(public_key_id.to_string()),
                    access_key_secret: Some(private_key),
                    ..(*self.config).clone()
                };
                Arc::new(RsaKeyPairCredentialProvider::new(Arc::new(config)))
            }
            ProfileKind::Unknown(kind) => {
                debug!("profile {} has unsupported type {kind}", profile.name());
                return Ok(None);
            }
        };

        Ok(Some(provider))
    }

    async fn load_provider(&self, ctx: &Context) -> Result<Option<CredentialProvider>> {
        let name = self.profile_name(ctx);
        let Some(profile) = self.store.get_profile(ctx, &name).await? else {
            debug!("profile {name} not found");
            return Ok(None);
        };
        if !profile.is_enabled() {
            debug!("profile {name} is disabled");
            return Ok(None);
        }

        let cached = self
            .inner
            .lock()
            .expect("lock poisoned")
            .as_ref()
            .filter(|(cached, _)| cached == &profile)
            .map(|(_, provider)| provider.clone());
        if cached.is_some() {
            return Ok(cached);
        }

        let provider = self.build_provider(ctx, &profile).await?;
        if let Some(provider) = &provider {
            *self.inner.lock().expect("lock poisoned") = Some((profile, provider.clone()));
        }
        Ok(provider)
    }
}

#[async_trait]
impl ProvideCredential for ProfileCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        match self.load_provider(ctx).await? {
            Some(provider) => provider.provide_credential(ctx).await,
            None => Ok(None),
        }
    }
}
