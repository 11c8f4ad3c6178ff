//! TLS material for secure mode.

use std::io;
use std::path::Path;

use axum_server::tls_rustls::RustlsConfig;

use crate::config::schema::TlsOptions;

/// Build the rustls config for the local listener.
///
/// Configured pem files are loaded as-is; without any, a throwaway
/// self-signed localhost certificate is generated in memory.
pub async fn rustls_config(tls: Option<&TlsOptions>) -> io::Result<RustlsConfig> {
    match tls {
        Some(options) => from_pem_files(&options.cert_path, &options.key_path).await,
        None => self_signed().await,
    }
}

async fn from_pem_files(cert_path: &Path, key_path: &Path) -> io::Result<RustlsConfig> {
    if !cert_path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Certificate file not found: {:?}", cert_path),
        ));
    }
    if !key_path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Private key file not found: {:?}", key_path),
        ));
    }

    RustlsConfig::from_pem_file(cert_path, key_path).await
}

async fn self_signed() -> io::Result<RustlsConfig> {
    tracing::warn!("no certificate configured, generating a self-signed one for localhost");

    let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_string()])
        .map_err(|error| io::Error::new(io::ErrorKind::Other, error))?;

    let cert_pem = certified.cert.pem();
    let key_pem = certified.key_pair.serialize_pem();

    RustlsConfig::from_pem(cert_pem.into_bytes(), key_pem.into_bytes()).await
}
