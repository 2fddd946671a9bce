// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 U.S. Federal Government (in countries where recognized)

//! PKCS#10 enrollment message types.

use base64::prelude::*;
use der::Decode;
use serde::{Deserialize, Serialize};
use x509_cert::Certificate;

use crate::error::{ClientError, Result};

/// Body of a `pkcs10enroll` request.
#[derive(Clone, Serialize)]
pub struct EnrollRequest {
    /// PEM-encoded PKCS#10 certificate request.
    pub certificate_request: String,
    /// Certificate profile to issue under.
    pub certificate_profile_name: String,
    /// End entity profile the user belongs to.
    pub end_entity_profile_name: String,
    /// Issuing CA name.
    pub certificate_authority_name: String,
    /// End entity username.
    pub username: String,
    /// End entity enrollment code.
    pub password: String,
    /// Return the CA chain along with the certificate.
    pub include_chain: bool,
}

impl EnrollRequest {
    /// Create a request for `csr_pem` on behalf of `username`.
    pub fn new(csr_pem: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            certificate_request: csr_pem.into(),
            certificate_profile_name: String::new(),
            end_entity_profile_name: String::new(),
            certificate_authority_name: String::new(),
            username: username.into(),
            password: String::new(),
            include_chain: true,
        }
    }

    /// Set the certificate profile.
    pub fn certificate_profile(mut self, name: impl Into<String>) -> Self {
        self.certificate_profile_name = name.into();
        self
    }

    /// Set the end entity profile.
    pub fn end_entity_profile(mut self, name: impl Into<String>) -> Self {
        self.end_entity_profile_name = name.into();
        self
    }

    /// Set the issuing CA.
    pub fn certificate_authority(mut self, name: impl Into<String>) -> Self {
        self.certificate_authority_name = name.into();
        self
    }

    /// Set the enrollment code.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Ask for the CA chain.
    pub fn include_chain(mut self, value: bool) -> Self {
        self.include_chain = value;
        self
    }
}

impl std::fmt::Debug for EnrollRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrollRequest")
            .field("certificate_profile_name", &self.certificate_profile_name)
            .field("end_entity_profile_name", &self.end_entity_profile_name)
            .field("certificate_authority_name", &self.certificate_authority_name)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("include_chain", &self.include_chain)
            .finish()
    }
}

/// Body of a successful `pkcs10enroll` response.
#[derive(Debug, Clone, Deserialize)]
pub struct EnrollResponse {
    /// Base64 DER of the issued certificate.
    pub certificate: String,
    /// Serial number in hex.
    #[serde(default)]
    pub serial_number: Option<String>,
    /// Encoding of `certificate`, normally `DER`.
    #[serde(default)]
    pub response_format: Option<String>,
    /// Base64 DER of the CA chain, when requested.
    #[serde(default)]
    pub certificate_chain: Option<Vec<String>>,
}

/// An issued certificate with its chain.
#[derive(Debug, Clone)]
pub struct EnrolledCertificate {
    /// DER of the issued certificate.
    pub certificate: Vec<u8>,
    /// Serial number as reported by the server.
    pub serial_number: Option<String>,
    /// DER of each chain certificate, leaf's issuer first.
    pub chain: Vec<Vec<u8>>,
}

impl EnrolledCertificate {
    /// Decode the issued certificate.
    pub fn parse(&self) -> Result<Certificate> {
        Certificate::from_der(&self.certificate)
            .map_err(|e| ClientError::certificate_parsing(format!("Issued certificate: {e}")))
    }

    /// Render the certificate followed by its chain as PEM.
    pub fn to_pem(&self) -> String {
        std::iter::once(&self.certificate)
            .chain(&self.chain)
            .map(|der| pem_block("CERTIFICATE", der))
            .collect()
    }
}

impl TryFrom<EnrollResponse> for EnrolledCertificate {
    type Error = ClientError;

    fn try_from(response: EnrollResponse) -> Result<Self> {
        if let Some(format) = &response.response_format
            && !format.eq_ignore_ascii_case("DER")
        {
            return Err(ClientError::certificate_parsing(format!(
                "Unsupported response format '{format}'"
            )));
        }

        let certificate = BASE64_STANDARD.decode(response.certificate.trim())?;
        let chain = response
            .certificate_chain
            .unwrap_or_default()
            .iter()
            .map(|c| BASE64_STANDARD.decode(c.trim()))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            certificate,
            serial_number: response.serial_number,
            chain,
        })
    }
}

pub(crate) fn pem_block(label: &str, der: &[u8]) -> String {
    let b64 = BASE64_STANDARD.encode(der);

    // Wrap at 64 characters
    let wrapped: Vec<&str> = b64
        .as_bytes()
        .chunks(64)
        .filter_map(|c| std::str::from_utf8(c).ok())
        .collect();

    format!(
        "-----BEGIN {label}-----\n{}\n-----END {label}-----\n",
        wrapped.join("\n")
    )
}
