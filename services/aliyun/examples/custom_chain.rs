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

//! Register custom providers in front of the default fallback sequence.
//!
//! ```shell
//! ALIBABA_CLOUD_ROLE_ARN=acs:ram::123456789012:role/demo cargo run --example custom_chain
//! ```

use alicred_aliyun::{
    Config, DefaultCredentialProvider, RamRoleArnCredentialProvider, SharedCredentialProvider,
    StaticCredentialProvider,
};
use alicred_core::{Context, OsEnv};
use alicred_file_read_tokio::TokioFileRead;
use alicred_http_send_reqwest::ReqwestHttpSend;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = env_logger::try_init();

    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);

    let chain = DefaultCredentialProvider::new();

    let config = Config::default().from_env(&ctx);
    if config.role_arn.is_some() {
        let assume_role: SharedCredentialProvider =
            Arc::new(RamRoleArnCredentialProvider::new(Arc::new(config)));
        chain.add_credentials_provider(assume_role);
    }

    let fixed: SharedCredentialProvider = Arc::new(StaticCredentialProvider::new(
        "demo_access_key_id",
        "demo_access_key_secret",
    ));
    chain.add_credentials_provider(fixed.clone());
    println!(
        "registered providers: {}, fallback providers: {}",
        chain.providers().len(),
        chain.fallback_providers().len()
    );

    let cred = chain.get_credentials(&ctx).await?;
    println!("resolved credential: {cred:?}");

    chain.remove_credentials_provider(&fixed);
    match chain.get_credentials(&ctx).await {
        Ok(cred) => println!("without the static provider: {cred:?}"),
        Err(err) => println!("without the static provider: {err}"),
    }

    Ok(())
}
