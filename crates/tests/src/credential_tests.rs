use chrono::{Duration, Utc};
use octavian_db::models::{AccountStatus, Platform, SocialAccount};
use octavian_services::credentials::{
    CredentialError, CredentialRecord, SECRET_ALPHABET, SecretAction, SecretClass,
    digest_secret, is_expired,
};
use octavian_services::dao::SocialAccountDao;
use tokio_test::{assert_err, assert_ok};

use crate::fixtures::clipboard::MemoryClipboard;
use crate::fixtures::flaky_store::Op;
use crate::fixtures::test_app::TestApp;

/// Rewrites the stored expiry so tests can put a secret in the past.
async fn backdate_expiry(app: &TestApp, tenant_id: &str, platform: Platform, days_ago: i64) {
    let expiry = Utc::now() - Duration::days(days_ago);
    SocialAccountDao::new(app.dyn_store())
        .update(
            tenant_id,
            platform,
            bson::doc! { "secret_expiry": bson::DateTime::from_chrono(expiry) },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn link_then_rotate_issues_a_thirty_day_secret() -> anyhow::Result<()> {
    let app = TestApp::new();
    let manager = app.credentials();

    manager.link("c1", Platform::Instagram, "@x").await?;
    let before = Utc::now();
    let rotated = manager.rotate_secret("c1", Platform::Instagram).await?;

    assert_eq!(rotated.platform(), Platform::Instagram);
    assert_eq!(rotated.expose().chars().count(), 16);
    assert!(rotated.expose().bytes().all(|b| SECRET_ALPHABET.contains(&b)));

    let accounts = manager.list("c1").await?;
    let account = &accounts[&Platform::Instagram];
    assert_eq!(account.handle, "@x");
    assert_eq!(account.status, AccountStatus::Connected);
    assert!(!account.secret.is_empty());
    assert_eq!(account.secret, digest_secret(rotated.expose()));
    assert_ne!(account.secret, rotated.expose());

    let expiry = account.secret_expiry.expect("rotated").to_chrono();
    let window = expiry - before;
    assert!(window >= Duration::days(30) - Duration::seconds(5));
    assert!(window <= Duration::days(30) + Duration::seconds(5));
    assert!(!is_expired(account, Utc::now()));
    assert!(is_expired(account, Utc::now() + Duration::days(31)));
    Ok(())
}

#[tokio::test]
async fn rotate_on_unlinked_pair_is_rejected() {
    let app = TestApp::new();
    let manager = app.credentials();

    let err = assert_err!(manager.rotate_secret("c1", Platform::Tiktok).await);
    assert!(matches!(
        err,
        CredentialError::TenantOrPlatformNotFound {
            platform: Platform::Tiktok,
            ..
        }
    ));
    assert!(assert_ok!(manager.list("c1").await).is_empty());
}

#[tokio::test]
async fn link_overwrites_existing_account() -> anyhow::Result<()> {
    let app = TestApp::new();
    let manager = app.credentials();

    manager.link("c1", Platform::Twitter, "@old").await?;
    manager.rotate_secret("c1", Platform::Twitter).await?;
    manager.link("c1", Platform::Twitter, "@new").await?;

    let accounts = manager.list("c1").await?;
    assert_eq!(accounts.len(), 1);
    let account = &accounts[&Platform::Twitter];
    assert_eq!(account.handle, "@new");
    assert!(account.secret.is_empty());
    assert_eq!(account.secret_expiry, None);
    Ok(())
}

#[tokio::test]
async fn link_validates_handle() {
    let app = TestApp::new();
    let manager = app.credentials();

    let err = assert_err!(manager.link("c1", Platform::Youtube, "   ").await);
    assert!(matches!(err, CredentialError::Validation(_)));

    let too_long = "h".repeat(65);
    let err = assert_err!(manager.link("c1", Platform::Youtube, &too_long).await);
    assert!(matches!(err, CredentialError::Validation(_)));
}

#[tokio::test]
async fn link_by_name_rejects_unknown_platform() {
    let app = TestApp::new();
    let manager = app.credentials();

    let err = assert_err!(manager.link_named("c1", "myspace", "@x").await);
    assert!(matches!(err, CredentialError::UnsupportedPlatform(_)));

    let account = assert_ok!(manager.link_named("c1", "LinkedIn", "acme").await);
    assert_eq!(account.platform, Platform::Linkedin);
}

#[tokio::test]
async fn unlink_is_idempotent() -> anyhow::Result<()> {
    let app = TestApp::new();
    let manager = app.credentials();

    manager.link("c1", Platform::Facebook, "acme").await?;
    manager.unlink("c1", Platform::Facebook).await?;
    manager.unlink("c1", Platform::Facebook).await?;
    manager.unlink("c1", Platform::Instagram).await?;

    assert!(manager.list("c1").await?.is_empty());
    let err = assert_err!(manager.get("c1", Platform::Facebook).await);
    assert!(matches!(err, CredentialError::TenantOrPlatformNotFound { .. }));
    Ok(())
}

#[tokio::test]
async fn rotate_and_copy_writes_the_plaintext_to_the_clipboard() -> anyhow::Result<()> {
    let app = TestApp::new();
    let manager = app.credentials();
    let clipboard = MemoryClipboard::new();

    manager.link("c1", Platform::Instagram, "@x").await?;
    let expires_at = manager
        .rotate_and_copy("c1", Platform::Instagram, &clipboard)
        .await?;

    let copied = clipboard.last().expect("secret copied");
    let account = manager.get("c1", Platform::Instagram).await?;
    assert_eq!(account.secret, digest_secret(&copied));
    assert_eq!(
        account.secret_expiry.map(|e| e.to_chrono().timestamp_millis()),
        Some(expires_at.timestamp_millis())
    );
    Ok(())
}

#[tokio::test]
async fn expired_secret_blocks_rotate_and_copy() -> anyhow::Result<()> {
    let app = TestApp::new();
    let manager = app.credentials();
    let clipboard = MemoryClipboard::new();

    manager.link("c1", Platform::Tiktok, "@x").await?;
    manager.rotate_secret("c1", Platform::Tiktok).await?;
    backdate_expiry(&app, "c1", Platform::Tiktok, 2).await;

    let err = assert_err!(
        manager
            .rotate_and_copy("c1", Platform::Tiktok, &clipboard)
            .await
    );
    match err {
        CredentialError::SecretExpired {
            platform,
            reset_url,
        } => {
            assert_eq!(platform, Platform::Tiktok);
            assert_eq!(reset_url, Platform::Tiktok.reset_url());
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(clipboard.count(), 0);

    let view = manager
        .account_view("c1", Platform::Tiktok, Utc::now())
        .await?;
    assert_eq!(view.class, SecretClass::Expired);
    assert_eq!(view.expiry.days_remaining, 0);
    assert_eq!(view.expiry.progress_value, 0.0);
    assert!(matches!(view.action, SecretAction::ResetOnPlatform { .. }));

    // Direct rotation stays available once the platform password was reset.
    manager.rotate_secret("c1", Platform::Tiktok).await?;
    let view = manager
        .account_view("c1", Platform::Tiktok, Utc::now())
        .await?;
    assert_eq!(view.class, SecretClass::Active);
    Ok(())
}

#[tokio::test]
async fn unissued_secret_can_be_copied() -> anyhow::Result<()> {
    let app = TestApp::new();
    let manager = app.credentials();
    let clipboard = MemoryClipboard::new();

    manager.link("c1", Platform::Youtube, "channel").await?;
    let view = manager
        .account_view("c1", Platform::Youtube, Utc::now())
        .await?;
    assert_eq!(view.record, CredentialRecord::Unissued);
    assert_eq!(view.action, SecretAction::Rotate);

    manager
        .rotate_and_copy("c1", Platform::Youtube, &clipboard)
        .await?;
    assert_eq!(clipboard.count(), 1);
    Ok(())
}

#[tokio::test]
async fn clipboard_failure_is_reported() -> anyhow::Result<()> {
    let app = TestApp::new();
    let manager = app.credentials();

    manager.link("c1", Platform::Facebook, "acme").await?;
    let err = assert_err!(
        manager
            .rotate_and_copy("c1", Platform::Facebook, &MemoryClipboard::broken())
            .await
    );
    assert!(matches!(err, CredentialError::Clipboard(_)));
    Ok(())
}

#[tokio::test]
async fn flag_expired_marks_only_expired_issued_secrets() -> anyhow::Result<()> {
    let app = TestApp::new();
    let manager = app.credentials();

    manager.link("c1", Platform::Instagram, "@a").await?;
    manager.link("c1", Platform::Facebook, "b").await?;
    manager.link("c1", Platform::Twitter, "@c").await?;
    manager.rotate_secret("c1", Platform::Instagram).await?;
    manager.rotate_secret("c1", Platform::Facebook).await?;
    backdate_expiry(&app, "c1", Platform::Instagram, 1).await;

    let flagged = manager.flag_expired("c1", Utc::now()).await?;
    assert_eq!(flagged, vec![Platform::Instagram]);

    let accounts = manager.list("c1").await?;
    assert_eq!(accounts[&Platform::Instagram].status, AccountStatus::NeedsUpdate);
    assert_eq!(accounts[&Platform::Facebook].status, AccountStatus::Connected);
    // Linked but never rotated is not flagged.
    assert_eq!(accounts[&Platform::Twitter].status, AccountStatus::Connected);

    // Already flagged.
    assert!(manager.flag_expired("c1", Utc::now()).await?.is_empty());

    manager.rotate_secret("c1", Platform::Instagram).await?;
    let account = manager.get("c1", Platform::Instagram).await?;
    assert_eq!(account.status, AccountStatus::Connected);
    Ok(())
}

#[tokio::test]
async fn views_cover_every_linked_platform_in_order() -> anyhow::Result<()> {
    let app = TestApp::new();
    let manager = app.credentials();

    manager.link("c1", Platform::Youtube, "yt").await?;
    manager.link("c1", Platform::Instagram, "@ig").await?;
    manager.rotate_secret("c1", Platform::Youtube).await?;

    let views = manager.views("c1", Utc::now()).await?;
    let platforms: Vec<Platform> = views.iter().map(|v| v.platform).collect();
    assert_eq!(platforms, vec![Platform::Instagram, Platform::Youtube]);
    assert_eq!(views[0].class, SecretClass::Expired);
    assert_eq!(views[0].action, SecretAction::Rotate);
    assert_eq!(views[1].class, SecretClass::Active);
    assert_eq!(views[1].expiry.days_remaining, 30);

    let soon = manager.views("c1", Utc::now() + Duration::days(25)).await?;
    assert_eq!(soon[1].class, SecretClass::ExpiringSoon);
    Ok(())
}

#[tokio::test]
async fn store_failure_during_rotation_is_not_a_missing_account() -> anyhow::Result<()> {
    let app = TestApp::new();
    let manager = app.credentials();

    manager.link("c1", Platform::Linkedin, "acme").await?;
    app.store.fail(
        Op::Update,
        SocialAccount::COLLECTION,
        &SocialAccount::key("c1", Platform::Linkedin),
    );

    let err = assert_err!(manager.rotate_secret("c1", Platform::Linkedin).await);
    assert!(matches!(err, CredentialError::Dao(_)));

    let account = manager.get("c1", Platform::Linkedin).await?;
    assert!(account.secret.is_empty());
    Ok(())
}
