use rustls::pki_types::pem::PemObject;
use rustls::pki_types::CertificateDer;
use rustls::crypto::ring;
use rustls::{ClientConfig, RootCertStore};
use std::path::Path;
use std::sync::Arc;
use tokio_postgres_rustls::MakeRustlsConnect;
use tracing::{debug, error};

/// TLS connector that trusts only the root certificates in the PEM file at `path`.
pub(crate) fn connector(path: &Path) -> anyhow::Result<MakeRustlsConnect> {
    let certs = CertificateDer::pem_file_iter(path).map_err(|err| {
        error!(
            "failed to read root certificate {}, error({err})",
            path.display()
        );
        err
    })?;

    let mut roots = RootCertStore::empty();
    for cert in certs {
        roots.add(cert?)?;
    }
    if roots.is_empty() {
        anyhow::bail!("no certificates found in {}", path.display());
    }
    debug!(
        "{} root certificate(s) loaded from {}",
        roots.len(),
        path.display()
    );

    let config = ClientConfig::builder_with_provider(Arc::new(ring::default_provider()))
        .with_safe_default_protocol_versions()?
        .with_root_certificates(roots)
        .with_no_client_auth();

    Ok(MakeRustlsConnect::new(config))
}
