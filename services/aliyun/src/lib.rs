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

//! Alibaba Cloud credential resolution for alicred.
//!
//! This crate resolves the access key pair (and optional security token)
//! used to call Alibaba Cloud APIs, from whichever source is configured.
//!
//! ## Quick Start
//!
//! ```no_run
//! use alicred_aliyun::DefaultCredentialProvider;
//! use alicred_core::{Context, OsEnv};
//! use alicred_file_read_tokio::TokioFileRead;
//! use alicred_http_send_reqwest::ReqwestHttpSend;
//!
//! #[tokio::main]
//! async fn main() -> alicred_core::Result<()> {
//!     let ctx = Context::new()
//!         .with_file_read(TokioFileRead)
//!         .with_http_send(ReqwestHttpSend::default())
//!         .with_env(OsEnv);
//!
//!     let provider = DefaultCredentialProvider::new();
//!     let cred = provider.get_credentials(&ctx).await?;
//!     println!("access key id: {}", cred.access_key_id);
//!     Ok(())
//! }
//! ```
//!
//! ## Credential Sources
//!
//! [`DefaultCredentialProvider`] tries the providers registered with
//! [`DefaultCredentialProvider::add_credentials_provider`] first, then:
//!
//! ### Environment Variables
//!
//! ```bash
//! export ALIBABA_CLOUD_ACCESS_KEY_ID=your-access-key-id
//! export ALIBABA_CLOUD_ACCESS_KEY_SECRET=your-access-key-secret
//! export ALIBABA_CLOUD_SECURITY_TOKEN=your-sts-token  # Optional, for STS
//! ```
//!
//! ### Credentials File
//!
//! Profiles from `~/.alibabacloud/credentials.ini` (or the path in
//! `ALIBABA_CLOUD_CREDENTIALS_FILE`), selected by `ALIBABA_CLOUD_PROFILE`:
//!
//! ```ini
//! [default]
//! type = ram_role_arn
//! access_key_id = foo
//! access_key_secret = bar
//! role_arn = acs:ram::123456789012:role/MyRole
//! role_session_name = session
//! ```
//!
//! ### ECS RAM Role
//!
//! When `ALIBABA_CLOUD_ECS_METADATA` is set on an ECS instance, credentials
//! for the RAM role it names are obtained from the metadata service. An empty
//! value discovers the role attached to the instance.
//!
//! ## Remote Providers
//!
//! ```no_run
//! use alicred_aliyun::{Config, RamRoleArnCredentialProvider};
//!
//! let config = Config {
//!     access_key_id: Some("access_key_id".to_string()),
//!     access_key_secret: Some("access_key_secret".to_string()),
//!     role_arn: Some("acs:ram::123456789012:role/MyRole".to_string()),
//!     ..Default::default()
//! };
//! let provider = RamRoleArnCredentialProvider::new(config.into());
//! ```
//!
//! Credentials returned by [`EcsRamRoleCredentialProvider`],
//! [`RamRoleArnCredentialProvider`] and [`RsaKeyPairCredentialProvider`] are
//! cached and only fetched again once expired.

pub mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

pub mod rpc;

mod provide_credential;
pub use provide_credential::*;
