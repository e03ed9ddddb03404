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

// Env values used in aliyun services.
pub const ALIBABA_CLOUD_ACCESS_KEY_ID: &str = "ALIBABA_CLOUD_ACCESS_KEY_ID";
pub const ALIBABA_CLOUD_ACCESS_KEY_SECRET: &str = "ALIBABA_CLOUD_ACCESS_KEY_SECRET";
pub const ALIBABA_CLOUD_SECURITY_TOKEN: &str = "ALIBABA_CLOUD_SECURITY_TOKEN";
pub const ALIBABA_CLOUD_ROLE_ARN: &str = "ALIBABA_CLOUD_ROLE_ARN";
pub const ALIBABA_CLOUD_ROLE_SESSION_NAME: &str = "ALIBABA_CLOUD_ROLE_SESSION_NAME";
pub const ALIBABA_CLOUD_REGION_ID: &str = "ALIBABA_CLOUD_REGION_ID";
pub const ALIBABA_CLOUD_STS_ENDPOINT: &str = "ALIBABA_CLOUD_STS_ENDPOINT";
pub const ALIBABA_CLOUD_ECS_METADATA: &str = "ALIBABA_CLOUD_ECS_METADATA";
pub const ALIBABA_CLOUD_PROFILE: &str = "ALIBABA_CLOUD_PROFILE";
pub const ALIBABA_CLOUD_CREDENTIALS_FILE: &str = "ALIBABA_CLOUD_CREDENTIALS_FILE";

// Instance metadata service.
pub const ECS_METADATA_ENDPOINT: &str = "http://100.100.100.200";
pub const ECS_METADATA_CREDENTIALS_PATH: &str = "/latest/meta-data/ram/security-credentials/";

// STS endpoints.
pub const STS_ENDPOINT: &str = "https://sts.aliyuncs.com";
// GenerateSessionAccessKey is only served from ap-northeast-1.
pub const STS_KEY_PAIR_ENDPOINT: &str = "https://sts.ap-northeast-1.aliyuncs.com";
pub const STS_API_VERSION: &str = "2015-04-01";

pub const DEFAULT_REGION_ID: &str = "cn-hangzhou";
pub const DEFAULT_ROLE_SESSION_NAME: &str = "alicred";
pub const DEFAULT_DURATION_SECONDS: u64 = 3600;
pub const DEFAULT_TIMEOUT_MILLIS: u64 = 1000;
pub const DEFAULT_CONNECT_TIMEOUT_MILLIS: u64 = 1000;

pub const DEFAULT_PROFILE: &str = "default";
pub const DEFAULT_CREDENTIALS_FILE: &str = "~/.alibabacloud/credentials.ini";
