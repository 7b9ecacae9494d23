use chrono::{DateTime, Months, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Brand prefix carried by every minted certificate code.
pub const CODE_PREFIX: &str = "MONAL";

const CODE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const CODE_RANDOM_LEN: usize = 4;

/// How long a certificate stays redeemable after minting.
const VALIDITY_MONTHS: u32 = 12;

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CertificateStatus {
    Active,
    Used,
}

impl CertificateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Used => "used",
        }
    }
}

/// A gift certificate minted at settlement time.
///
/// Persisted only in the external certificate log, never in the registry.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Certificate {
    /// `MONAL-<4 random base36 uppercase>-<orderId>`.
    pub code: String,
    pub nominal: Decimal,
    /// The order that paid for this certificate.
    pub order_id: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub status: CertificateStatus,
    pub used_at: Option<DateTime<Utc>>,
}

impl Certificate {
    /// Mints a fresh certificate for the given order, valid for one year.
    ///
    /// The random segment is not cryptographically strong; the order-id suffix
    /// keeps codes from distinct orders disjoint.
    pub fn mint(order_id: &str, nominal: Decimal) -> Self {
        Self::mint_at(order_id, nominal, Utc::now())
    }

    pub fn mint_at(order_id: &str, nominal: Decimal, issued_at: DateTime<Utc>) -> Self {
        let mut rng = rand::thread_rng();
        let random: String = (0..CODE_RANDOM_LEN)
            .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
            .collect();

        Self {
            code: format!("{CODE_PREFIX}-{random}-{order_id}"),
            nominal,
            order_id: order_id.to_string(),
            issued_at,
            expires_at: issued_at + Months::new(VALIDITY_MONTHS),
            status: CertificateStatus::Active,
            used_at: None,
        }
    }

    /// Formats the block appended to the operator notification for this code.
    pub fn notification_block(&self) -> String {
        format!(
            "Gift certificate: {}\nNominal: {} UAH\nValid until: {}\nThe code is redeemed at checkout.",
            self.code,
            self.nominal,
            self.expires_at.format("%Y-%m-%d"),
        )
    }
}
