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

use super::*;
use alicred_aliyun::{
    Credential, DefaultCredentialProvider, EnvCredentialProvider, SharedCredentialProvider,
};
use alicred_core::{Error, ErrorKind, ProvideCredential};
use pretty_assertions::assert_eq;

/// Mock provider that tracks how many times it was called.
#[derive(Debug)]
struct CountingProvider {
    name: String,
    outcome: Outcome,
    call_count: Arc<Mutex<usize>>,
}

#[derive(Debug, Clone, Copy)]
enum Outcome {
    Credential,
    Absent,
    Fail,
}

impl CountingProvider {
    fn new(name: &str, outcome: Outcome) -> (SharedCredentialProvider, Arc<Mutex<usize>>) {
        let call_count = Arc::new(Mutex::new(0));
        let provider = Arc::new(Self {
            name: name.to_string(),
            outcome,
            call_count: call_count.clone(),
        });
        (provider, call_count)
    }
}

#[async_trait]
impl ProvideCredential for CountingProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _ctx: &Context) -> Result<Option<Self::Credential>> {
        *self.call_count.lock().unwrap() += 1;

        match self.outcome {
            Outcome::Credential => Ok(Some(Credential::new(
                &format!("{}_key", self.name),
                &format!("{}_secret", self.name),
            ))),
            Outcome::Absent => Ok(None),
            Outcome::Fail => Err(Error::credential_invalid(format!("{} is broken", self.name))),
        }
    }
}

fn empty_chain() -> DefaultCredentialProvider {
    DefaultCredentialProvider::with_fallback(Vec::new())
}

#[tokio::test]
async fn test_chain_stops_at_first_success() {
    let ctx = create_test_context(MockHttpSend::new());
    let (p1, c1) = CountingProvider::new("provider1", Outcome::Absent);
    let (p2, c2) = CountingProvider::new("provider2", Outcome::Credential);
    let (p3, c3) = CountingProvider::new("provider3", Outcome::Credential);

    let chain = empty_chain();
    chain.add_credentials_provider(p1);
    chain.add_credentials_provider(p2);
    chain.add_credentials_provider(p3);

    let cred = chain.get_credentials(&ctx).await.expect("must succeed");
    assert_eq!(cred.access_key_id, "provider2_key");
    assert_eq!(*c1.lock().unwrap(), 1);
    assert_eq!(*c2.lock().unwrap(), 1);
    assert_eq!(*c3.lock().unwrap(), 0);
}

#[tokio::test]
async fn test_chain_error_aborts() {
    let ctx = create_test_context(MockHttpSend::new());
    let (p1, _) = CountingProvider::new("provider1", Outcome::Fail);
    let (p2, c2) = CountingProvider::new("provider2", Outcome::Credential);

    let chain = empty_chain();
    chain.add_credentials_provider(p1);
    chain.add_credentials_provider(p2);

    let err = chain
        .get_credentials(&ctx)
        .await
        .expect_err("first provider fails");
    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    assert_eq!(err.message(), "provider1 is broken");
    assert_eq!(*c2.lock().unwrap(), 0);
}

#[tokio::test]
async fn test_chain_exhausted() {
    let ctx = create_test_context(MockHttpSend::new());
    let (p1, c1) = CountingProvider::new("provider1", Outcome::Absent);

    let chain = empty_chain();
    chain.add_credentials_provider(p1.clone());
    chain.add_credentials_provider(p1);

    let err = chain
        .get_credentials(&ctx)
        .await
        .expect_err("no provider has credential");
    assert_eq!(err.kind(), ErrorKind::CredentialNotFound);
    assert_eq!(err.message(), "not found credentials");
    assert_eq!(*c1.lock().unwrap(), 2);

    assert!(chain
        .provide_credential(&ctx)
        .await
        .expect("must succeed")
        .is_none());
}

#[tokio::test]
async fn test_chain_fallback_after_user_providers() {
    let envs = HashMap::from([
        (
            "ALIBABA_CLOUD_ACCESS_KEY_ID".to_string(),
            "env_ak".to_string(),
        ),
        (
            "ALIBABA_CLOUD_ACCESS_KEY_SECRET".to_string(),
            "env_sk".to_string(),
        ),
    ]);
    let ctx = create_test_context_with_env(MockHttpSend::new(), envs);

    let chain = DefaultCredentialProvider::with_fallback(vec![Arc::new(EnvCredentialProvider::new())]);
    let (p1, c1) = CountingProvider::new("provider1", Outcome::Absent);
    chain.add_credentials_provider(p1.clone());

    let cred = chain.get_credentials(&ctx).await.expect("must succeed");
    assert_eq!(cred.access_key_id, "env_ak");
    assert_eq!(*c1.lock().unwrap(), 1);

    assert!(chain.remove_credentials_provider(&p1));
    chain.get_credentials(&ctx).await.expect("must succeed");
    assert_eq!(*c1.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_default_chain_env_error_propagates() {
    let envs = HashMap::from([
        ("ALIBABA_CLOUD_ACCESS_KEY_ID".to_string(), "".to_string()),
        (
            "ALIBABA_CLOUD_ACCESS_KEY_SECRET".to_string(),
            "env_sk".to_string(),
        ),
    ]);
    let ctx = create_test_context_with_env(MockHttpSend::new(), envs);

    let err = DefaultCredentialProvider::new()
        .get_credentials(&ctx)
        .await
        .expect_err("empty access key id is invalid");
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
}

#[tokio::test]
async fn test_default_chain_composes() {
    let ctx = create_test_context(MockHttpSend::new());
    let (p1, _) = CountingProvider::new("inner", Outcome::Credential);

    let inner = empty_chain();
    inner.add_credentials_provider(p1);
    let outer = empty_chain();
    outer.add_credentials_provider(Arc::new(inner));

    let cred = outer.get_credentials(&ctx).await.expect("must succeed");
    assert_eq!(cred.access_key_id, "inner_key");
}
