//! TLS configuration helpers for the administrative client.
//!
//! EJBCA and SignServer authenticate administrators by TLS client certificate,
//! so every request is made over mutual TLS with the selected identity.

use rustls::pki_types::{CertificateDer, PrivateKeyDer};

use crate::config::{ClientConfig, ClientIdentity, TrustAnchors};
use crate::error::{ClientError, Result};

/// Build a reqwest Client with the appropriate TLS configuration.
///
/// `config.timeout` bounds connecting and each individual read. There is no
/// total deadline here, so a long export download keeps going while data
/// arrives; callers set one per request where it applies.
pub fn build_http_client(config: &ClientConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .connect_timeout(config.timeout)
        .read_timeout(config.timeout)
        .user_agent(crate::USER_AGENT)
        .use_rustls_tls();

    match &config.trust_anchors {
        TrustAnchors::WebPki => {
            builder = builder.tls_built_in_root_certs(true);
        }
        TrustAnchors::Explicit(ca_certs) => {
            builder = builder.tls_built_in_root_certs(false);
            for ca_pem in ca_certs {
                for cert in reqwest::Certificate::from_pem_bundle(ca_pem).map_err(|e| {
                    ClientError::tls(format!("Failed to parse CA certificate: {}", e))
                })? {
                    builder = builder.add_root_certificate(cert);
                }
            }
        }
        TrustAnchors::InsecureAcceptAny => {
            builder = builder
                .tls_built_in_root_certs(false)
                .danger_accept_invalid_certs(true);
        }
    }

    if let Some(ref identity) = config.client_identity {
        let identity = build_reqwest_identity(identity)?;
        builder = builder.identity(identity);
    }

    builder = builder.min_tls_version(reqwest::tls::Version::TLS_1_2);

    let mut headers = reqwest::header::HeaderMap::new();
    for (name, value) in &config.additional_headers {
        if let (Ok(name), Ok(value)) = (
            reqwest::header::HeaderName::try_from(name.as_str()),
            reqwest::header::HeaderValue::try_from(value.as_str()),
        ) {
            headers.insert(name, value);
        } else {
            tracing::warn!("Ignoring invalid header '{}'", name);
        }
    }
    builder = builder.default_headers(headers);

    builder
        .build()
        .map_err(|e| ClientError::tls(format!("Failed to build HTTP client: {}", e)))
}

/// Build a reqwest Identity from PEM-encoded certificate and key.
fn build_reqwest_identity(identity: &ClientIdentity) -> Result<reqwest::Identity> {
    // reqwest expects the chain and key in a single PEM buffer
    let mut pem_data = identity.cert_pem.clone();
    pem_data.extend_from_slice(b"\n");
    pem_data.extend_from_slice(&identity.key_pem);

    reqwest::Identity::from_pem(&pem_data)
        .map_err(|e| ClientError::tls(format!("Failed to create client identity: {}", e)))
}

/// Parse PEM-encoded certificates.
pub fn parse_pem_certificates(pem_data: &[u8]) -> Result<Vec<CertificateDer<'static>>> {
    let mut reader = std::io::BufReader::new(pem_data);
    let certs: Vec<_> = rustls_pemfile::certs(&mut reader)
        .filter_map(|result| result.ok())
        .collect();

    if certs.is_empty() {
        return Err(ClientError::invalid_pem("No certificates found in PEM data"));
    }

    Ok(certs)
}

/// Parse a PEM-encoded private key.
pub fn parse_pem_private_key(pem_data: &[u8]) -> Result<PrivateKeyDer<'static>> {
    let mut reader = std::io::BufReader::new(pem_data);

    loop {
        match rustls_pemfile::read_one(&mut reader) {
            Ok(Some(rustls_pemfile::Item::Pkcs8Key(key))) => {
                return Ok(PrivateKeyDer::Pkcs8(key));
            }
            Ok(Some(rustls_pemfile::Item::Pkcs1Key(key))) => {
                return Ok(PrivateKeyDer::Pkcs1(key));
            }
            Ok(Some(rustls_pemfile::Item::Sec1Key(key))) => {
                return Ok(PrivateKeyDer::Sec1(key));
            }
            Ok(Some(_)) => continue,
            Ok(None) => break,
            Err(e) => {
                return Err(ClientError::invalid_pem(format!(
                    "Failed to parse PEM: {}",
                    e
                )));
            }
        }
    }

    Err(ClientError::invalid_pem("No private key found in PEM data"))
}

/// Returns true if the PEM data contains a private key.
pub fn contains_private_key(pem_data: &[u8]) -> bool {
    parse_pem_private_key(pem_data).is_ok()
}
