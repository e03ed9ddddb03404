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

//! Core components for resolving cloud credentials.
//!
//! This crate provides the foundational types and traits shared by every
//! credential provider in the workspace.
//!
//! ## Overview
//!
//! - **Context**: A container that holds implementations for file reading, HTTP sending, and environment access
//! - **Traits**: [`ProvideCredential`] for credential sources and [`ExpiringCredential`] for credentials that may expire
//! - **Cache**: [`CredentialCache`], the refresh discipline shared by remote-backed providers
//! - **Error**: A single [`Error`] type whose [`ErrorKind`] tells configuration problems, remote failures,
//!   transport failures and an exhausted provider chain apart
//!
//! ## Example
//!
//! ```no_run
//! use alicred_core::{Context, ExpiringCredential, ProvideCredential, Result};
//! use alicred_core::time::DateTime;
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     key: String,
//! }
//!
//! impl ExpiringCredential for MyCredential {
//!     fn expires_at(&self) -> Option<DateTime> {
//!         None
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MyProvider;
//!
//! #[async_trait]
//! impl ProvideCredential for MyProvider {
//!     type Credential = MyCredential;
//!
//!     async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
//!         Ok(Some(MyCredential {
//!             key: "my-access-key".to_string(),
//!         }))
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let ctx = Context::new();
//! let cred = MyProvider.provide_credential(&ctx).await?;
//! assert!(cred.is_some());
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};

mod context;
pub use context::{
    Context, Env, FileRead, HttpSend, NoopEnv, NoopFileRead, NoopHttpSend, OsEnv, StaticEnv,
};

mod api;
pub use api::{ExpiringCredential, ProvideCredential};

mod cache;
pub use cache::CredentialCache;
