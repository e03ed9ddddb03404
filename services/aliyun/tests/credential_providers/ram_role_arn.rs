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
use alicred_aliyun::{Config, RamRoleArnCredentialProvider};
use alicred_core::{ErrorKind, ProvideCredential};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn config() -> Config {
    Config {
        access_key_id: Some("access_key_id".to_string()),
        access_key_secret: Some("access_key_secret".to_string()),
        role_arn: Some("acs:ram::123456789012:role/test".to_string()),
        role_session_name: Some("session".to_string()),
        policy: Some(r#"{"Statement":[]}"#.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_assume_role_request() {
    let http = MockHttpSend::new().with_response("/", 200, assume_role_body("sts_ak", FUTURE_EXPIRATION));
    let ctx = create_test_context(http.clone());
    let provider = RamRoleArnCredentialProvider::new(Arc::new(config()));

    let cred = provider
        .provide_credential(&ctx)
        .await
        .expect("must succeed")
        .expect("must have credential");
    assert_eq!(cred.access_key_id, "sts_ak");
    assert_eq!(cred.access_key_secret, "secret");
    assert_eq!(cred.security_token.as_deref(), Some("token"));
    assert!(cred.expiration.is_some());

    let requests = http.requests();
    assert_eq!(requests.len(), 1);
    let uri = &requests[0];
    assert_eq!(uri.host(), Some("sts.aliyuncs.com"));

    let params = query_params(uri);
    assert_eq!(params["Action"], "AssumeRole");
    assert_eq!(params["Format"], "JSON");
    assert_eq!(params["Version"], "2015-04-01");
    assert_eq!(params["AccessKeyId"], "access_key_id");
    assert_eq!(params["RoleArn"], "acs%3Aram%3A%3A123456789012%3Arole%2Ftest");
    assert_eq!(params["RoleSessionName"], "session");
    assert_eq!(params["DurationSeconds"], "3600");
    assert_eq!(params["RegionId"], "cn-hangzhou");
    assert_eq!(params["SignatureMethod"], "HMAC-SHA1");
    assert_eq!(params["SignatureVersion"], "1.0");
    assert!(params.contains_key("Policy"));
    assert!(params.contains_key("Timestamp"));
    assert!(params.contains_key("SignatureNonce"));
    assert!(params.contains_key("Signature"));
    assert!(!params.contains_key("SecurityToken"));
}

#[tokio::test]
async fn test_assume_role_cached() {
    let http = MockHttpSend::new().with_response("/", 200, assume_role_body("sts_ak", FUTURE_EXPIRATION));
    let ctx = create_test_context(http.clone());
    let provider = RamRoleArnCredentialProvider::new(Arc::new(config()));

    for _ in 0..3 {
        provider
            .provide_credential(&ctx)
            .await
            .expect("must succeed");
    }
    assert_eq!(http.requests().len(), 1);
}

#[tokio::test]
async fn test_assume_role_expired_refetched_once() {
    let http = MockHttpSend::new().with_response("/", 200, assume_role_body("old", PAST_EXPIRATION));
    let ctx = create_test_context(http.clone());
    let provider = RamRoleArnCredentialProvider::new(Arc::new(config()));

    let cred = provider
        .provide_credential(&ctx)
        .await
        .expect("must succeed")
        .expect("must have credential");
    assert_eq!(cred.access_key_id, "old");

    http.set_response("/", 200, assume_role_body("new", FUTURE_EXPIRATION));
    for _ in 0..3 {
        let cred = provider
            .provide_credential(&ctx)
            .await
            .expect("must succeed")
            .expect("must have credential");
        assert_eq!(cred.access_key_id, "new");
    }
    assert_eq!(http.requests().len(), 2);
}

#[tokio::test]
async fn test_assume_role_sts_endpoint_from_env() {
    let http = MockHttpSend::new().with_response("/", 200, assume_role_body("sts_ak", FUTURE_EXPIRATION));
    let ctx = create_test_context_with_env(
        http.clone(),
        HashMap::from([
            (
                "ALIBABA_CLOUD_STS_ENDPOINT".to_string(),
                "sts-vpc.cn-shanghai.aliyuncs.com".to_string(),
            ),
            (
                "ALIBABA_CLOUD_ROLE_ARN".to_string(),
                "acs:ram::123456789012:role/env".to_string(),
            ),
        ]),
    );
    let config = Config {
        access_key_id: Some("access_key_id".to_string()),
        access_key_secret: Some("access_key_secret".to_string()),
        ..Default::default()
    }
    .from_env(&ctx);
    let provider = RamRoleArnCredentialProvider::new(Arc::new(config));

    provider
        .provide_credential(&ctx)
        .await
        .expect("must succeed");
    let requests = http.requests();
    assert_eq!(requests[0].host(), Some("sts-vpc.cn-shanghai.aliyuncs.com"));
    assert_eq!(requests[0].scheme_str(), Some("https"));
    assert_eq!(
        query_params(&requests[0])["RoleArn"],
        "acs%3Aram%3A%3A123456789012%3Arole%2Fenv"
    );
}

#[tokio::test]
async fn test_assume_role_errors() {
    let cases = [
        (403, r#"{"Code":"NoPermission"}"#.to_string()),
        (200, r#"{"RequestId":"request-id"}"#.to_string()),
        (
            200,
            r#"{"Credentials":{"AccessKeyId":"ak","AccessKeySecret":"sk"}}"#.to_string(),
        ),
        (200, "<xml/>".to_string()),
    ];

    for (status, body) in cases {
        let http = MockHttpSend::new().with_response("/", status, body.clone());
        let ctx = create_test_context(http);
        let provider = RamRoleArnCredentialProvider::new(Arc::new(config()));

        let err = provider
            .provide_credential(&ctx)
            .await
            .expect_err("bad response must fail");
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid, "body: {body}");
    }
}

#[tokio::test]
async fn test_assume_role_missing_config() {
    let http = MockHttpSend::new();
    let ctx = create_test_context(http.clone());

    let configs = [
        Config {
            role_arn: Some("role_arn".to_string()),
            ..Default::default()
        },
        Config {
            access_key_id: Some("access_key_id".to_string()),
            access_key_secret: Some("".to_string()),
            role_arn: Some("role_arn".to_string()),
            ..Default::default()
        },
    ];
    for config in configs {
        let provider = RamRoleArnCredentialProvider::new(Arc::new(config));
        let err = provider
            .provide_credential(&ctx)
            .await
            .expect_err("config is incomplete");
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }
    assert!(http.requests().is_empty());
}
