mod common;

use common::test_app;
use monal_relay::domain::certificate::CertificateStatus;
use monal_relay::domain::order::{CertificateItem, OrderRecord};
use monal_relay::domain::ports::OrderSource;
use rust_decimal_macros::dec;

fn order(text: &str) -> OrderRecord {
    OrderRecord {
        text: text.to_string(),
        paid_amount: "500".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_site_order_end_to_end() {
    let app = test_app();

    app.state
        .registry
        .register("A100", order("2x Vase - 500 UAH"))
        .await
        .unwrap();

    let url = app
        .state
        .invoices
        .create(Some("A100"), Some("500"))
        .await
        .unwrap();
    assert!(url.starts_with("https://"));
    assert_eq!(app.provider.requests().await[0].amount_minor, 50_000);

    app.state
        .settlement
        .handle_provider_signal("success", "A100")
        .await;

    let sent = app.notifier.sent().await;
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("A100"));
    assert!(!sent[0].contains("Gift certificate"));

    let rows = app.orders.rows().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].paid_amount, "500");
    assert_eq!(rows[0].source, OrderSource::Site);

    assert!(!app.state.registry.contains("A100").await);
}

#[tokio::test]
async fn test_certificate_order_end_to_end() {
    let app = test_app();

    let mut record = order("1x Gift certificate - 300 UAH");
    record.certificates = vec![CertificateItem { nominal: dec!(300) }];
    app.state.registry.register("B200", record).await.unwrap();

    app.state
        .settlement
        .handle_provider_signal("success", "B200")
        .await;

    let sent = app.notifier.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].matches("Gift certificate:").count(), 1);
    assert!(sent[0].contains("Nominal: 300 UAH"));

    let certs = app.certificates.rows().await;
    assert_eq!(certs.len(), 1);
    assert_eq!(certs[0].status, CertificateStatus::Active);
    assert_eq!(certs[0].nominal, dec!(300));
    assert!(certs[0].code.ends_with("-B200"));

    assert!(!app.state.registry.contains("B200").await);
}

#[tokio::test]
async fn test_settling_unknown_order_has_no_side_effects() {
    let app = test_app();

    app.state
        .settlement
        .handle_provider_signal("success", "GHOST")
        .await;
    app.state.settlement.settle_free_order("GHOST", &[]).await;

    assert!(app.notifier.sent().await.is_empty());
    assert!(app.orders.rows().await.is_empty());
    assert!(app.certificates.rows().await.is_empty());
}

#[tokio::test]
async fn test_redelivered_signal_settles_once() {
    let app = test_app();

    let mut record = order("Gift order");
    record.certificates = vec![CertificateItem { nominal: dec!(300) }];
    app.state.registry.register("C300", record).await.unwrap();

    let s1 = app.state.settlement.clone();
    let s2 = app.state.settlement.clone();
    let (a, b) = tokio::join!(
        tokio::spawn(async move { s1.handle_provider_signal("success", "C300").await }),
        tokio::spawn(async move { s2.handle_provider_signal("success", "C300").await }),
    );
    a.unwrap();
    b.unwrap();

    assert_eq!(app.notifier.sent().await.len(), 1);
    assert_eq!(app.certificates.rows().await.len(), 1);
    assert_eq!(app.orders.rows().await.len(), 1);
}

#[tokio::test]
async fn test_free_order_redeems_supplied_and_recorded_codes() {
    let app = test_app();

    let minted_a = monal_relay::domain::certificate::Certificate::mint("OLD1", dec!(300));
    let minted_b = monal_relay::domain::certificate::Certificate::mint("OLD2", dec!(200));
    let (code_a, code_b) = (minted_a.code.clone(), minted_b.code.clone());
    {
        use monal_relay::domain::ports::CertificateLog;
        app.certificates.append(minted_a).await.unwrap();
        app.certificates.append(minted_b).await.unwrap();
    }

    let mut record = order("Voucher order");
    record.used_certificates = vec![code_b.clone()];
    app.state.registry.register("D400", record).await.unwrap();

    app.state
        .settlement
        .settle_free_order("D400", std::slice::from_ref(&code_a))
        .await;

    for code in [&code_a, &code_b] {
        use monal_relay::domain::ports::CertificateLog;
        let stored = app
            .certificates
            .find_by_code(code)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, CertificateStatus::Used);
    }
    assert_eq!(app.orders.rows().await.len(), 1);
    assert_eq!(app.notifier.sent().await.len(), 1);
}
