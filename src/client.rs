// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 U.S. Federal Government (in countries where recognized)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! REST client implementation.
//!
//! This module provides the `AdminClient` struct for calling the EJBCA and
//! SignServer administrative REST APIs over mutual TLS.

use std::path::PathBuf;

use reqwest::header::CONTENT_TYPE;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::operations::{ConfigdumpQuery, enroll, save_response, sign};
use crate::tls::build_http_client;
use crate::types::{
    EnrollRequest, EnrollResponse, EnrolledCertificate, ExportFormat, ExportRequest, SignRequest,
    SignResponse, content_types, paths,
};

/// Administrative REST client.
///
/// Each method issues a single request; nothing is retried.
///
/// # Example
///
/// ```no_run
/// use ejbca_admin_client::{AdminClient, ClientConfig, ExportFormat, ExportRequest};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ClientConfig::builder()
///     .server_url("https://ejbca.example.com:8443")?
///     .build()?;
///
/// let client = AdminClient::new(config)?;
///
/// let request = ExportRequest::new(ExportFormat::Zip).include(["CA"]);
/// let path = client.export_config(&request).await?;
/// println!("Wrote {}", path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AdminClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl AdminClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if TLS configuration fails.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = build_http_client(&config)?;

        Ok(Self { config, http })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // =========================================================================
    // Configuration export
    // =========================================================================

    /// Check that the configdump endpoint is enabled and reachable.
    ///
    /// # Errors
    ///
    /// Returns `EndpointUnavailable` on a transport failure or any non-2xx
    /// answer. A refusal from the server carries a hint that the
    /// REST Configdump protocol may be disabled.
    pub async fn configdump_status(&self) -> Result<()> {
        let url = self.config.build_url(paths::CONFIGDUMP_STATUS);
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| ClientError::endpoint_unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::endpoint_refused(status.as_u16()));
        }

        tracing::debug!("Configdump endpoint is available");
        Ok(())
    }

    /// Export the CA configuration to a file.
    ///
    /// Runs the health check, then fetches the export in the requested format
    /// and streams it to [`ExportRequest::output_path`]. No file is created
    /// unless the server answers the export with a success status.
    ///
    /// # Returns
    ///
    /// The path of the written file.
    pub async fn export_config(&self, request: &ExportRequest) -> Result<PathBuf> {
        self.configdump_status().await?;

        if request.exclusion_ignored() {
            tracing::warn!(
                "Both include and exclude lists given; ignoring the exclude list ({})",
                request.exclude.join(", ")
            );
        }

        let query = ConfigdumpQuery::from_request(request);
        let mut url = self.config.build_url(request.format.endpoint());
        url.set_query(Some(&query.to_query_string()));
        tracing::debug!("GET {}", url);

        let mut builder = self.http.get(url);
        if request.format == ExportFormat::Zip {
            builder = builder.header(CONTENT_TYPE, content_types::ZIP);
        }

        let response = builder.send().await?;
        let response = self.handle_error_response(response).await?;

        let path = request.output_path();
        let written = save_response(response, &path).await?;
        tracing::info!("Wrote {} bytes to {}", written, path.display());

        Ok(path)
    }

    // =========================================================================
    // Enrollment
    // =========================================================================

    /// Submit a PKCS#10 request for issuance.
    pub async fn enroll_pkcs10(&self, request: &EnrollRequest) -> Result<EnrolledCertificate> {
        let url = self.config.build_url(paths::PKCS10_ENROLL);
        tracing::debug!("POST {}", url);

        let response = self
            .http
            .post(url)
            .timeout(self.config.timeout)
            .json(request)
            .send()
            .await?;
        let response = self.handle_error_response(response).await?;

        let body: EnrollResponse = response.json().await?;
        let enrolled = EnrolledCertificate::try_from(body)?;

        if let Some(serial) = &enrolled.serial_number {
            tracing::info!("Issued certificate with serial number {}", serial);
        }

        Ok(enrolled)
    }

    // =========================================================================
    // Signing
    // =========================================================================

    /// Have a SignServer worker process a document.
    ///
    /// `worker` is the worker name or numeric id.
    pub async fn sign(&self, worker: &str, request: &SignRequest) -> Result<SignResponse> {
        let url = self.config.build_url(&sign::process_path(worker));
        tracing::debug!("POST {}", url);

        let response = self
            .http
            .post(url)
            .timeout(self.config.timeout)
            .json(request)
            .send()
            .await?;
        let response = self.handle_error_response(response).await?;

        let body: SignResponse = response.json().await?;
        if let Some(id) = &body.request_id {
            tracing::info!("Worker {} processed request {}", worker, id);
        }

        Ok(body)
    }

    // =========================================================================
    // Helper Methods
    // =========================================================================

    /// Handle error responses from the server.
    async fn handle_error_response(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let message = match enroll::error_message(&body) {
            m if m.is_empty() => status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
            m => m,
        };

        Err(ClientError::request_failed(status.as_u16(), message))
    }
}
