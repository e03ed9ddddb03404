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

use alicred_core::time::{parse_rfc3339, DateTime};
use alicred_core::{Context, Error, Result};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Send `req` and decode a successful JSON response body.
///
/// Non-2xx status and malformed JSON are reported as credential errors;
/// transport failures pass through untouched.
pub async fn send_json<T: DeserializeOwned>(
    ctx: &Context,
    req: http::Request<Bytes>,
    timeout: Duration,
    service: &str,
) -> Result<T> {
    let resp = ctx.http_send_as_string(req, timeout).await?;

    if !resp.status().is_success() {
        return Err(Error::credential_invalid(format!(
            "request to {service} failed: HttpCode={}",
            resp.status().as_u16()
        ))
        .with_context(format!("body: {}", resp.body())));
    }

    let content = resp.into_body();
    serde_json::from_str(&content).map_err(|e| {
        Error::credential_invalid(format!("failed to parse {service} response"))
            .with_source(e)
            .with_context(format!("response_length: {}", content.len()))
    })
}

/// Parse the `Expiration` field of a credential response.
pub fn parse_expiration(expiration: Option<&str>, service: &str) -> Result<DateTime> {
    let expiration = expiration.ok_or_else(|| {
        Error::credential_invalid(format!("{service} response is missing Expiration"))
    })?;

    parse_rfc3339(expiration).map_err(|e| {
        Error::credential_invalid(format!("{service} response has invalid Expiration"))
            .with_source(e)
            .with_context(format!("expiration_value: {expiration}"))
    })
}
