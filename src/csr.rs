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

//! CSR (Certificate Signing Request) generation utilities.
//!
//! This module provides a builder for creating PKCS#10 requests to submit
//! with `AdminClient::enroll_pkcs10`. It is feature-gated behind the
//! `csr-gen` feature.

use std::net::IpAddr;

use rcgen::{
    CertificateParams, DnType, ExtendedKeyUsagePurpose, Ia5String, KeyPair, KeyUsagePurpose,
    SanType,
};

use crate::error::{ClientError, Result};

/// A generated request and the private key it was signed with.
pub struct GeneratedCsr {
    /// PEM-encoded PKCS#10 request.
    pub csr_pem: String,
    /// PEM-encoded PKCS#8 private key.
    pub key_pem: String,
}

impl std::fmt::Debug for GeneratedCsr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratedCsr")
            .field("csr_pem", &self.csr_pem)
            .field("key_pem", &"[REDACTED]")
            .finish()
    }
}

/// Builder for creating Certificate Signing Requests.
///
/// # Example
///
/// ```no_run
/// use ejbca_admin_client::csr::CsrBuilder;
///
/// let generated = CsrBuilder::new()
///     .common_name("ra-officer")
///     .organization("Example Corp")
///     .country("US")
///     .extended_key_usage_client_auth()
///     .build()
///     .expect("Failed to generate CSR");
/// ```
pub struct CsrBuilder {
    params: CertificateParams,
    dns_names: Vec<String>,
    emails: Vec<String>,
}

impl Default for CsrBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CsrBuilder {
    /// Create a new CSR builder with default parameters.
    pub fn new() -> Self {
        Self {
            params: CertificateParams::default(),
            dns_names: Vec::new(),
            emails: Vec::new(),
        }
    }

    /// Set the Common Name (CN) for the subject.
    pub fn common_name(mut self, cn: impl Into<String>) -> Self {
        self.params
            .distinguished_name
            .push(DnType::CommonName, cn.into());
        self
    }

    /// Set the Organization (O) for the subject.
    pub fn organization(mut self, org: impl Into<String>) -> Self {
        self.params
            .distinguished_name
            .push(DnType::OrganizationName, org.into());
        self
    }

    /// Set the Organizational Unit (OU) for the subject.
    pub fn organizational_unit(mut self, ou: impl Into<String>) -> Self {
        self.params
            .distinguished_name
            .push(DnType::OrganizationalUnitName, ou.into());
        self
    }

    /// Set the Country (C) for the subject.
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.params
            .distinguished_name
            .push(DnType::CountryName, country.into());
        self
    }

    /// Add a DNS Subject Alternative Name.
    pub fn san_dns(mut self, dns: impl Into<String>) -> Self {
        self.dns_names.push(dns.into());
        self
    }

    /// Add an IP address Subject Alternative Name.
    pub fn san_ip(mut self, ip: IpAddr) -> Self {
        self.params.subject_alt_names.push(SanType::IpAddress(ip));
        self
    }

    /// Add an email Subject Alternative Name.
    pub fn san_email(mut self, email: impl Into<String>) -> Self {
        self.emails.push(email.into());
        self
    }

    /// Enable digital signature key usage.
    pub fn key_usage_digital_signature(mut self) -> Self {
        self.params
            .key_usages
            .push(KeyUsagePurpose::DigitalSignature);
        self
    }

    /// Add TLS client authentication extended key usage.
    pub fn extended_key_usage_client_auth(mut self) -> Self {
        self.params
            .extended_key_usages
            .push(ExtendedKeyUsagePurpose::ClientAuth);
        self
    }

    /// Build the CSR with a new ECDSA P-256 key pair.
    pub fn build(self) -> Result<GeneratedCsr> {
        let key_pair = KeyPair::generate()
            .map_err(|e| ClientError::csr(format!("Failed to generate key pair: {e}")))?;

        let csr_pem = self.build_with_key(&key_pair)?;

        Ok(GeneratedCsr {
            csr_pem,
            key_pem: key_pair.serialize_pem(),
        })
    }

    /// Build the CSR using the provided key pair.
    ///
    /// Returns only the PEM-encoded CSR.
    pub fn build_with_key(mut self, key_pair: &KeyPair) -> Result<String> {
        for dns in self.dns_names {
            let name = Ia5String::try_from(dns.clone())
                .map_err(|e| ClientError::csr(format!("Invalid DNS name '{dns}': {e}")))?;
            self.params.subject_alt_names.push(SanType::DnsName(name));
        }
        for email in self.emails {
            let name = Ia5String::try_from(email.clone())
                .map_err(|e| ClientError::csr(format!("Invalid email '{email}': {e}")))?;
            self.params.subject_alt_names.push(SanType::Rfc822Name(name));
        }

        let csr = self
            .params
            .serialize_request(key_pair)
            .map_err(|e| ClientError::csr(format!("Failed to serialize CSR: {e}")))?;

        csr.pem()
            .map_err(|e| ClientError::csr(format!("Failed to encode CSR: {e}")))
    }
}

/// Generate a CSR for an administrator or RA client certificate.
pub fn generate_client_csr(common_name: &str, organization: Option<&str>) -> Result<GeneratedCsr> {
    let mut builder = CsrBuilder::new()
        .common_name(common_name)
        .key_usage_digital_signature()
        .extended_key_usage_client_auth();

    if let Some(org) = organization {
        builder = builder.organization(org);
    }

    builder.build()
}
