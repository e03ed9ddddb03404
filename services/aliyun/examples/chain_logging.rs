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

//! Resolve credentials through the default chain with debug logging.
//!
//! ```shell
//! cargo run --example chain_logging
//! ```

use alicred_aliyun::DefaultCredentialProvider;
use alicred_core::{Context, OsEnv, ProvideCredential};
use alicred_file_read_tokio::TokioFileRead;
use alicred_http_send_reqwest::ReqwestHttpSend;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .init();

    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);

    // Each provider tried is logged with its Debug output, secrets redacted.
    let provider = DefaultCredentialProvider::new();
    println!("Attempting to load credentials from the default chain...\n");
    match provider.provide_credential(&ctx).await? {
        Some(cred) => println!("\nFound credential: {cred:?}"),
        None => println!("\nNo credential found in any provider"),
    }

    Ok(())
}
