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

//! Signing for Alibaba Cloud RPC style APIs (signature version 1.0).
//!
//! All parameters travel in the query string. The signature is computed as:
//!
//! ```text
//! canonical      = join("&", sorted(percent_encode(k) + "=" + percent_encode(v)))
//! string_to_sign = METHOD + "&%2F&" + percent_encode(canonical)
//! signature      = base64(hmac_sha1(secret + "&", string_to_sign))
//! ```

use crate::constants::STS_API_VERSION;
use alicred_core::hash::base64_hmac_sha1;
use alicred_core::time::{format_iso8601, now, DateTime};
use alicred_core::Result;
use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::BTreeMap;

/// AsciiSet for RPC percent encoding.
///
/// Encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '_', '.' and '~'.
/// Space is encoded as `%20`, never `+`.
pub static RPC_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent encode input with [`RPC_ENCODE_SET`].
pub fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, &RPC_ENCODE_SET).to_string()
}

/// RpcRequest collects the parameters of a signed RPC call.
///
/// `Timestamp` and `SignatureNonce` are generated per call unless fixed with
/// [`RpcRequest::with_timestamp`] and [`RpcRequest::with_nonce`]. Fixing both
/// makes the produced url a pure function of the inputs.
#[derive(Debug, Clone)]
pub struct RpcRequest {
    method: http::Method,
    params: BTreeMap<String, String>,
    timestamp: Option<DateTime>,
    nonce: Option<String>,
}

impl RpcRequest {
    /// Create a GET request for `action` with JSON format and the STS api version.
    pub fn new(action: &str) -> Self {
        let params = BTreeMap::from([
            ("Action".to_string(), action.to_string()),
            ("Format".to_string(), "JSON".to_string()),
            ("Version".to_string(), STS_API_VERSION.to_string()),
        ]);

        Self {
            method: http::Method::GET,
            params,
            timestamp: None,
            nonce: None,
        }
    }

    /// Set a query parameter, replacing any previous value.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Set the parameter only if `value` is `Some`.
    pub fn with_optional_param(self, key: impl Into<String>, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.with_param(key, v),
            None => self,
        }
    }

    /// Fix the timestamp used for signing.
    pub fn with_timestamp(mut self, timestamp: DateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Fix the nonce used for signing.
    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    /// Parameters including the signing fields, without `Signature`.
    fn signing_params(&self, access_key_id: &str) -> BTreeMap<String, String> {
        let mut params = self.params.clone();
        let timestamp = self.timestamp.unwrap_or_else(now);
        let nonce = self.nonce.clone().unwrap_or_else(new_nonce);

        params.insert("Timestamp".to_string(), format_iso8601(timestamp));
        params.insert("SignatureNonce".to_string(), nonce);
        params.insert("AccessKeyId".to_string(), access_key_id.to_string());
        params.insert("SignatureMethod".to_string(), "HMAC-SHA1".to_string());
        params.insert("SignatureVersion".to_string(), "1.0".to_string());
        params
    }

    /// Sign the request and return the query string including `Signature`.
    pub fn signed_query(&self, access_key_id: &str, access_key_secret: &str) -> String {
        let mut params = self.signing_params(access_key_id);
        let signature = sign(&self.method, &params, access_key_secret);
        params.insert("Signature".to_string(), signature);
        canonicalize(&params)
    }

    /// Sign the request and return the full url against `endpoint`.
    pub fn signed_url(&self, endpoint: &str, access_key_id: &str, access_key_secret: &str) -> String {
        format!(
            "{}/?{}",
            normalize_endpoint(endpoint),
            self.signed_query(access_key_id, access_key_secret)
        )
    }

    /// Sign the request and build the http request against `endpoint`.
    pub fn into_http_request(
        self,
        endpoint: &str,
        access_key_id: &str,
        access_key_secret: &str,
    ) -> Result<http::Request<Bytes>> {
        let url = self.signed_url(endpoint, access_key_id, access_key_secret);
        let req = http::Request::builder()
            .method(self.method)
            .uri(url)
            .header(http::header::ACCEPT, "application/json")
            .body(Bytes::new())?;
        Ok(req)
    }
}

/// Build the canonicalized query string from sorted parameters.
pub fn canonicalize(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the string to sign for `method` and the canonicalized query.
pub fn string_to_sign(method: &http::Method, canonicalized_query: &str) -> String {
    format!(
        "{}&{}&{}",
        method.as_str(),
        percent_encode("/"),
        percent_encode(canonicalized_query)
    )
}

/// Compute the base64 HMAC-SHA1 signature of `params`.
pub fn sign(
    method: &http::Method,
    params: &BTreeMap<String, String>,
    access_key_secret: &str,
) -> String {
    let string_to_sign = string_to_sign(method, &canonicalize(params));
    let key = format!("{access_key_secret}&");
    base64_hmac_sha1(key.as_bytes(), string_to_sign.as_bytes())
}

fn new_nonce() -> String {
    format!("{:032x}", rand::random::<u128>())
}

fn normalize_endpoint(endpoint: &str) -> String {
    let endpoint = endpoint.trim_end_matches('/');
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("https://{endpoint}")
    }
}
