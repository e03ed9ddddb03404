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

//! Implement a remote-backed provider on top of `CredentialCache`.

use alicred_core::time::{now, DateTime};
use alicred_core::{Context, CredentialCache, ExpiringCredential, ProvideCredential, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Clone, Debug)]
struct Token {
    value: String,
    expires_at: DateTime,
}

impl ExpiringCredential for Token {
    fn expires_at(&self) -> Option<DateTime> {
        Some(self.expires_at)
    }
}

#[derive(Debug, Default)]
struct CountingTokenProvider {
    fetches: AtomicUsize,
    cache: CredentialCache<Token>,
}

impl CountingTokenProvider {
    async fn fetch(&self) -> Result<Token> {
        let n = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Token {
            value: format!("token-{n}"),
            expires_at: now() + chrono::TimeDelta::minutes(15),
        })
    }
}

#[async_trait]
impl ProvideCredential for CountingTokenProvider {
    type Credential = Token;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        let token = self.cache.resolve(|| self.fetch()).await?;
        Ok(Some(token))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let ctx = Context::new();
    let provider = CountingTokenProvider::default();

    for _ in 0..3 {
        let token = provider.provide_credential(&ctx).await?;
        println!("got {:?}", token.map(|t| t.value));
    }
    println!("fetched {} time(s)", provider.fetches.load(Ordering::SeqCst));

    Ok(())
}
