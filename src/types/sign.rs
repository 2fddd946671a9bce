// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 U.S. Federal Government (in countries where recognized)

//! SignServer worker process messages.

use std::collections::BTreeMap;

use base64::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Body of a worker `process` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRequest {
    /// Base64 of the document to sign.
    pub data: String,
    /// Encoding of `data`; always `BASE64`.
    pub encoding: String,
    /// Worker-specific request metadata.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub meta_data: BTreeMap<String, String>,
}

impl SignRequest {
    /// Create a request for the raw document bytes.
    pub fn new(document: &[u8]) -> Self {
        Self {
            data: BASE64_STANDARD.encode(document),
            encoding: "BASE64".to_string(),
            meta_data: BTreeMap::new(),
        }
    }

    /// Add a request metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta_data.insert(key.into(), value.into());
        self
    }
}

/// Body of a successful worker `process` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignResponse {
    /// Base64 of the signed document.
    pub data: String,
    /// Server-assigned request id.
    #[serde(default)]
    pub request_id: Option<String>,
    /// Archive id, when the worker archives responses.
    #[serde(default)]
    pub archive_id: Option<String>,
    /// Base64 DER of the signer certificate.
    #[serde(default)]
    pub signer_certificate: Option<String>,
    /// Worker-specific response metadata.
    #[serde(default)]
    pub meta_data: BTreeMap<String, serde_json::Value>,
}

impl SignResponse {
    /// Decode the signed document.
    pub fn decoded_data(&self) -> Result<Vec<u8>> {
        Ok(BASE64_STANDARD.decode(self.data.trim())?)
    }
}
