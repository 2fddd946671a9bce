//! Integration test utilities and helpers
//!
//! This module provides common test infrastructure for the integration tests,
//! including mock server setup and certificate fixtures.

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ejbca_admin_client::types::paths;

/// Mock EJBCA/SignServer builder for integration tests
pub struct MockEjbcaServer {
    server: MockServer,
}

impl MockEjbcaServer {
    /// Create a new mock server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Get the base URL of the mock server
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Get a reference to the inner MockServer for custom mocking
    pub fn inner(&self) -> &MockServer {
        &self.server
    }

    /// Requests received so far
    pub async fn requests(&self) -> Vec<wiremock::Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Raw query strings of requests to `request_path`
    pub async fn queries_for(&self, request_path: &str) -> Vec<String> {
        self.requests()
            .await
            .iter()
            .filter(|r| r.url.path() == request_path)
            .map(|r| r.url.query().unwrap_or_default().to_string())
            .collect()
    }

    /// Mock the configdump status endpoint
    pub async fn mock_status(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path(paths::CONFIGDUMP_STATUS))
            .respond_with(ResponseTemplate::new(status).set_body_string("OK"))
            .mount(&self.server)
            .await;
    }

    /// Mock a JSON export
    pub async fn mock_export_json(&self, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(paths::CONFIGDUMP))
            .respond_with(
                ResponseTemplate::new(status)
                    .set_body_string(body)
                    .insert_header("Content-Type", "application/json"),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock a ZIP export; only matches when the request carries the ZIP content type
    pub async fn mock_export_zip(&self, body: &[u8]) {
        Mock::given(method("GET"))
            .and(path(paths::CONFIGDUMP_ZIP))
            .and(header("Content-Type", "application/zip"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(body.to_vec())
                    .insert_header("Content-Type", "application/octet-stream"),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock a PKCS#10 enrollment response
    pub async fn mock_enroll(&self, status: u16, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path(paths::PKCS10_ENROLL))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Mock a SignServer worker process response
    pub async fn mock_sign(&self, worker: &str, status: u16, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path(format!("{}/{}/process", paths::SIGNSERVER_WORKERS, worker)))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }
}

/// Test fixture helpers
pub mod fixtures {
    use std::time::Duration;

    use ejbca_admin_client::{AdminClient, ClientCertificate, ClientConfig};
    use rcgen::{
        CertificateParams, DistinguishedName, DnType, ExtendedKeyUsagePurpose, KeyPair,
        SerialNumber,
    };

    /// Generated certificate and key in PEM form
    pub struct PemPair {
        pub cert_pem: String,
        pub key_pem: String,
        pub cert_der: Vec<u8>,
    }

    /// Generate a self-signed certificate with the given serial number
    pub fn generate(cn: &str, serial: &[u8], client_auth: bool) -> PemPair {
        let mut params = CertificateParams::default();
        let mut dn = DistinguishedName::new();
        dn.push(DnType::CommonName, cn);
        params.distinguished_name = dn;
        params.serial_number = Some(SerialNumber::from_slice(serial));
        params.extended_key_usages = if client_auth {
            vec![ExtendedKeyUsagePurpose::ClientAuth]
        } else {
            vec![ExtendedKeyUsagePurpose::ServerAuth]
        };

        let key = KeyPair::generate().unwrap();
        let cert = params.self_signed(&key).unwrap();
        PemPair {
            cert_pem: cert.pem(),
            key_pem: key.serialize_pem(),
            cert_der: cert.der().to_vec(),
        }
    }

    /// A client certificate with its private key
    pub fn client_certificate(cn: &str, serial: &[u8]) -> ClientCertificate {
        let pair = generate(cn, serial, true);
        ClientCertificate::from_pem_identity(pair.cert_pem.as_bytes(), pair.key_pem.as_bytes())
            .unwrap()
            .with_display_name(cn)
    }

    /// A client for `url` authenticating with a freshly generated certificate
    pub fn client_for(url: &str) -> AdminClient {
        client_with_timeout(url, Duration::from_secs(30))
    }

    /// Like [`client_for`], with the given connect and read timeout
    pub fn client_with_timeout(url: &str, timeout: Duration) -> AdminClient {
        let cert = client_certificate("SuperAdmin", &[0x01]);
        let config = ClientConfig::builder()
            .server_url(url)
            .expect("Valid URL")
            .client_certificate(&cert)
            .expect("Certificate has a key")
            .trust_any_insecure()
            .timeout(timeout)
            .build()
            .expect("Valid config");
        AdminClient::new(config).expect("Client creation failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_server_starts() {
        let mock_server = MockEjbcaServer::start().await;
        assert!(!mock_server.url().is_empty());
        assert!(mock_server.url().starts_with("http://"));
        assert!(mock_server.inner().received_requests().await.is_some());
    }

    #[test]
    fn test_fixture_certificate_has_client_auth() {
        let cert = fixtures::client_certificate("Admin", &[0x1A, 0x2B]);
        assert!(cert.has_client_auth());
        assert_eq!(cert.serial_number, "1A2B");
        assert!(cert.identity().is_some());
    }
}
