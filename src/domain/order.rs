use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a purchased gift certificate is delivered to the buyer.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum CertificateType {
    #[default]
    Electronic,
    Physical,
}

/// A gift-certificate line item requested as part of an order.
///
/// Only the nominal is tracked here; the code is minted at settlement time.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct CertificateItem {
    pub nominal: Decimal,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Buyer {
    #[serde(default)]
    pub name: String,
    /// Free text, may be empty.
    #[serde(default)]
    pub phone: String,
}

/// An order awaiting settlement.
///
/// Lives in the pending-order registry between registration and settlement.
/// Monetary amounts are kept as the caller-supplied strings and passed through
/// verbatim to the order log; they may be empty when unknown to the caller.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    /// Pre-rendered human-readable order summary for the operator.
    /// Registration rejects records where this is empty.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub certificates: Vec<CertificateItem>,
    /// Codes the shopper redeemed toward this order's payment.
    #[serde(default)]
    pub used_certificates: Vec<String>,
    #[serde(default)]
    pub certificate_type: CertificateType,
    #[serde(default)]
    pub buyer: Buyer,
    #[serde(default)]
    pub delivery: String,
    #[serde(default)]
    pub items_text: String,
    #[serde(default)]
    pub total_amount: String,
    #[serde(default)]
    pub paid_amount: String,
    #[serde(default)]
    pub due_amount: String,
    #[serde(default)]
    pub payment_label: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_record_deserialization_defaults() {
        let json = r#"{"text": "2x Vase - 500 UAH"}"#;
        let record: OrderRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.text, "2x Vase - 500 UAH");
        assert!(record.certificates.is_empty());
        assert!(record.used_certificates.is_empty());
        assert_eq!(record.certificate_type, CertificateType::Electronic);
        assert_eq!(record.buyer, Buyer::default());
    }

    #[test]
    fn test_order_record_deserialization_full() {
        let json = r#"{
            "text": "Gift set",
            "certificates": [{"nominal": 300}],
            "usedCertificates": ["MONAL-AB12-X9"],
            "certificateType": "physical",
            "buyer": {"name": "Olena", "phone": "+380501112233"},
            "delivery": "Nova Poshta #12",
            "itemsText": "1x Gift set",
            "totalAmount": "800",
            "paidAmount": "500",
            "dueAmount": "300",
            "paymentLabel": "card"
        }"#;
        let record: OrderRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.certificates[0].nominal, dec!(300));
        assert_eq!(record.used_certificates, vec!["MONAL-AB12-X9"]);
        assert_eq!(record.certificate_type, CertificateType::Physical);
        assert_eq!(record.buyer.name, "Olena");
        assert_eq!(record.paid_amount, "500");
    }
}
