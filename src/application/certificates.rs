use crate::domain::certificate::CertificateStatus;
use crate::domain::ports::CertificateLogRef;
use rust_decimal::Decimal;
use serde::Serialize;

/// Outcome of a certificate validity check.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct CertificateCheck {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nominal: Option<Decimal>,
}

impl CertificateCheck {
    fn invalid() -> Self {
        Self {
            valid: false,
            nominal: None,
        }
    }
}

/// Read-only validity lookups against the certificate log.
///
/// Every check re-reads the log; the view is eventually consistent and the
/// latency cost is accepted.
pub struct CertificateService {
    log: CertificateLogRef,
}

impl CertificateService {
    pub fn new(log: CertificateLogRef) -> Self {
        Self { log }
    }

    /// Returns `{valid: false}` for absent or non-active codes, otherwise the
    /// nominal. A log failure is logged and reported as invalid rather than
    /// surfaced.
    pub async fn check(&self, code: &str) -> CertificateCheck {
        match self.log.find_by_code(code).await {
            Ok(Some(cert)) if cert.status == CertificateStatus::Active => CertificateCheck {
                valid: true,
                nominal: Some(cert.nominal),
            },
            Ok(_) => CertificateCheck::invalid(),
            Err(e) => {
                tracing::error!(code, stage = "certificate-log", error = %e, "certificate lookup failed");
                CertificateCheck::invalid()
            }
        }
    }
}
