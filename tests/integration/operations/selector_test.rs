// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 U.S. Federal Government (in countries where recognized)

//! Certificate selection handed off to the export client

use crate::integration::{MockEjbcaServer, fixtures};
use ejbca_admin_client::certstore::{CertificateStore, MemoryStore, PemDirectoryStore};
use ejbca_admin_client::types::paths;
use ejbca_admin_client::{
    AdminClient, ClientCertificate, ClientConfig, ClientError, ExportFormat, ExportRequest, Result,
    select_client_certificate,
};

fn never_prompt(_: &[ClientCertificate]) -> Result<usize> {
    panic!("prompt should not be shown");
}

fn write_store(dir: &std::path::Path) {
    let admin = fixtures::generate("SuperAdmin", &[0x1A, 0x2B, 0x3C], true);
    std::fs::write(
        dir.join("superadmin.pem"),
        format!("{}\n{}", admin.cert_pem, admin.key_pem),
    )
    .unwrap();

    let officer = fixtures::generate("RA Officer", &[0x10, 0x02], true);
    std::fs::write(dir.join("ra-officer.crt"), &officer.cert_pem).unwrap();
    std::fs::write(dir.join("ra-officer.key"), &officer.key_pem).unwrap();

    let server = fixtures::generate("web.example.com", &[0x77], false);
    std::fs::write(
        dir.join("web.pem"),
        format!("{}\n{}", server.cert_pem, server.key_pem),
    )
    .unwrap();
}

#[tokio::test]
async fn test_selected_certificate_drives_export() {
    let store_dir = tempfile::tempdir().unwrap();
    write_store(store_dir.path());
    let store = PemDirectoryStore::new(store_dir.path());

    assert_eq!(store.list_certificates().unwrap().len(), 3);
    assert_eq!(store.list_client_auth_certificates().unwrap().len(), 2);

    let mut prompt = never_prompt;
    let cert = select_client_certificate(&store, Some("1a:2b:3c"), &mut prompt).unwrap();
    assert_eq!(cert.display_name, "superadmin");

    let mock = MockEjbcaServer::start().await;
    mock.mock_status(200).await;
    mock.mock_export_json(200, "{}").await;

    let config = ClientConfig::builder()
        .server_url(mock.url())
        .unwrap()
        .client_certificate(&cert)
        .unwrap()
        .trust_any_insecure()
        .build()
        .unwrap();
    let client = AdminClient::new(config).unwrap();

    let out = tempfile::tempdir().unwrap();
    let path = client
        .export_config(&ExportRequest::new(ExportFormat::Json).outfile(out.path().join("dump")))
        .await
        .unwrap();
    assert!(path.exists());
}

#[tokio::test]
async fn test_prompt_chooses_among_candidates() {
    let store_dir = tempfile::tempdir().unwrap();
    write_store(store_dir.path());
    let store = PemDirectoryStore::new(store_dir.path());

    let mut shown = 0;
    let mut prompt = |candidates: &[ClientCertificate]| -> Result<usize> {
        shown = candidates.len();
        Ok(candidates
            .iter()
            .position(|c| c.display_name == "ra-officer")
            .unwrap())
    };

    let cert = select_client_certificate(&store, None, &mut prompt).unwrap();
    assert_eq!(cert.display_name, "ra-officer");
    assert_eq!(shown, 2);
}

#[tokio::test]
async fn test_no_candidates_means_no_network() {
    let mock = MockEjbcaServer::start().await;
    mock.mock_status(200).await;

    let store = MemoryStore::new(vec![]);
    let mut prompt = never_prompt;
    let err = select_client_certificate(&store, None, &mut prompt).unwrap_err();

    assert!(matches!(err, ClientError::NoCandidateCertificate));
    assert!(err.hint().is_some());
    assert!(mock.queries_for(paths::CONFIGDUMP_STATUS).await.is_empty());
}
