// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 U.S. Federal Government (in countries where recognized)

//! Client certificate handles.

use const_oid::ObjectIdentifier;
use const_oid::db::rfc4519::CN;
use const_oid::db::rfc5280::{ID_CE_EXT_KEY_USAGE, ID_KP_CLIENT_AUTH};
use der::Decode;
use x509_cert::Certificate;
use x509_cert::ext::pkix::ExtendedKeyUsage;

use crate::config::ClientIdentity;
use crate::error::{ClientError, Result};
use crate::tls::{parse_pem_certificates, parse_pem_private_key};

/// A certificate usable for TLS client authentication.
///
/// Carries the attributes shown to the operator during selection plus the PEM
/// material needed to build a TLS identity.
#[derive(Debug, Clone)]
pub struct ClientCertificate {
    /// Friendly name shown to the operator.
    pub display_name: String,
    /// Subject Distinguished Name (formatted).
    pub subject: String,
    /// Issuer Common Name, if present.
    pub issuer_cn: Option<String>,
    /// Serial number as uppercase hex without separators.
    pub serial_number: String,
    /// Validity end date (YYYY-MM-DD).
    pub not_after: String,
    /// Extended key usage purposes.
    pub extended_key_usages: Vec<ObjectIdentifier>,
    /// DER-encoded certificate.
    pub der: Vec<u8>,
    identity: Option<ClientIdentity>,
}

impl ClientCertificate {
    /// Parse a DER-encoded certificate with no associated private key.
    pub fn from_der(der_bytes: &[u8]) -> Result<Self> {
        let cert = Certificate::from_der(der_bytes)
            .map_err(|e| ClientError::certificate_parsing(e.to_string()))?;
        let tbs = &cert.tbs_certificate;

        let issuer_cn = name_cn(&tbs.issuer);
        let serial_number = hex::encode_upper(tbs.serial_number.as_bytes());
        let display_name = name_cn(&tbs.subject).unwrap_or_else(|| serial_number.clone());

        Ok(Self {
            display_name,
            subject: format_dn(&tbs.subject),
            issuer_cn,
            serial_number,
            not_after: format_time(&tbs.validity.not_after),
            extended_key_usages: extended_key_usages(&cert)?,
            der: der_bytes.to_vec(),
            identity: None,
        })
    }

    /// Parse a PEM certificate (chain) and attach the private key as the TLS identity.
    ///
    /// The first certificate in `cert_pem` is the leaf.
    pub fn from_pem_identity(cert_pem: &[u8], key_pem: &[u8]) -> Result<Self> {
        let certs = parse_pem_certificates(cert_pem)?;
        parse_pem_private_key(key_pem)?;

        let mut cert = Self::from_der(certs[0].as_ref())?;
        cert.identity = Some(ClientIdentity::new(cert_pem, key_pem));
        Ok(cert)
    }

    /// Override the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    /// The TLS identity for this certificate, if the private key is available.
    pub fn identity(&self) -> Option<&ClientIdentity> {
        self.identity.as_ref()
    }

    /// Returns true if the extended key usage includes Client Authentication.
    pub fn has_client_auth(&self) -> bool {
        self.extended_key_usages.contains(&ID_KP_CLIENT_AUTH)
    }

    /// Compare against an operator-supplied serial number.
    ///
    /// Case-insensitive; `:`, space and `-` separators and leading zeros are ignored.
    pub fn matches_serial(&self, serial: &str) -> bool {
        let wanted = normalize_serial(serial);
        !wanted.is_empty() && wanted == normalize_serial(&self.serial_number)
    }
}

/// Normalize a hex serial number for comparison.
pub fn normalize_serial(serial: &str) -> String {
    let clean = serial.replace([':', ' ', '-'], "").to_ascii_uppercase();
    let trimmed = clean.trim_start_matches('0');
    if trimmed.is_empty() && !clean.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn extended_key_usages(cert: &Certificate) -> Result<Vec<ObjectIdentifier>> {
    let Some(extensions) = cert.tbs_certificate.extensions.as_ref() else {
        return Ok(Vec::new());
    };

    for ext in extensions.iter() {
        if ext.extn_id == ID_CE_EXT_KEY_USAGE {
            let eku = ExtendedKeyUsage::from_der(ext.extn_value.as_bytes()).map_err(|e| {
                ClientError::certificate_parsing(format!("Invalid extended key usage: {}", e))
            })?;
            return Ok(eku.0);
        }
    }

    Ok(Vec::new())
}

fn name_cn(name: &x509_cert::name::Name) -> Option<String> {
    for rdn in name.0.iter() {
        for atv in rdn.0.iter() {
            if atv.oid == CN {
                if let Ok(s) = std::str::from_utf8(atv.value.value()) {
                    return Some(s.to_string());
                }
            }
        }
    }
    None
}

fn format_dn(name: &x509_cert::name::Name) -> String {
    use const_oid::db::rfc4519::{C, O, OU};

    let mut components = Vec::new();

    for rdn in name.0.iter() {
        for atv in rdn.0.iter() {
            let attr_name = if atv.oid == CN {
                "CN"
            } else if atv.oid == O {
                "O"
            } else if atv.oid == OU {
                "OU"
            } else if atv.oid == C {
                "C"
            } else {
                continue;
            };

            if let Ok(s) = std::str::from_utf8(atv.value.value()) {
                components.push(format!("{}={}", attr_name, s));
            }
        }
    }

    components.reverse();
    components.join(", ")
}

fn format_time(time: &x509_cert::time::Time) -> String {
    let datetime = time.to_date_time();
    format!(
        "{:04}-{:02}-{:02}",
        datetime.year(),
        datetime.month(),
        datetime.day()
    )
}
