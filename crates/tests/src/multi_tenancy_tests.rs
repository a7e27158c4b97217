use chrono::Utc;
use octavian_db::models::Platform;
use tokio_test::assert_ok;

use crate::fixtures::test_app::{TestApp, settled};

#[tokio::test]
async fn accounts_are_isolated_per_tenant() -> anyhow::Result<()> {
    let app = TestApp::new();
    let manager = app.credentials();

    manager.link("acme", Platform::Instagram, "@acme").await?;
    manager.link("beta", Platform::Instagram, "@beta").await?;
    manager.rotate_secret("acme", Platform::Instagram).await?;

    let acme = manager.list("acme").await?;
    let beta = manager.list("beta").await?;
    assert_eq!(acme[&Platform::Instagram].handle, "@acme");
    assert_eq!(beta[&Platform::Instagram].handle, "@beta");
    assert!(!acme[&Platform::Instagram].secret.is_empty());
    assert!(beta[&Platform::Instagram].secret.is_empty());

    manager.unlink("beta", Platform::Instagram).await?;
    assert!(manager.list("beta").await?.is_empty());
    assert_eq!(manager.list("acme").await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn flagging_one_tenant_leaves_the_other_alone() -> anyhow::Result<()> {
    let app = TestApp::new();
    let manager = app.credentials();

    manager.link("acme", Platform::Facebook, "acme").await?;
    manager.link("beta", Platform::Facebook, "beta").await?;
    manager.rotate_secret("acme", Platform::Facebook).await?;
    manager.rotate_secret("beta", Platform::Facebook).await?;

    let later = Utc::now() + chrono::Duration::days(31);
    assert_eq!(
        manager.flag_expired("acme", later).await?,
        vec![Platform::Facebook]
    );
    assert!(manager.flag_expired("beta", Utc::now()).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn scoped_collection_excludes_other_tenants_customers() {
    let app = TestApp::new();
    app.seed_tenants(&["acme", "beta"]).await;
    app.seed_admin("u1", &["acme"]).await;
    app.seed_customer("Alice", &["acme"]).await;
    app.seed_customer("Bob", &["beta"]).await;
    app.sign_in("u1");

    let session = app.spawn_session();
    let snapshot = settled(&session).await;

    assert_eq!(snapshot.tenants.len(), 1);
    let names: Vec<&str> = snapshot
        .scoped_collection
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["Alice"]);
    assert!(session.switch_tenant("beta").await.is_err());
}

#[tokio::test]
async fn admins_see_only_their_own_tenants() {
    let app = TestApp::new();
    app.seed_tenants(&["acme", "beta", "gamma"]).await;
    app.seed_admin("u1", &["acme", "beta"]).await;
    app.seed_admin("u2", &["gamma"]).await;

    app.sign_in("u1");
    let session = app.spawn_session();
    let first = settled(&session).await;
    let ids: Vec<&str> = first.tenants.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["acme", "beta"]);
    assert_ok!(session.switch_tenant("beta").await);

    // Same device, different admin: the stored selection is not a member.
    app.sign_in("u2");
    let second = crate::fixtures::test_app::wait_for(&session, |s| {
        !s.loading && s.principal.as_ref().is_some_and(|p| p.id == "u2")
    })
    .await;
    let ids: Vec<&str> = second.tenants.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["gamma"]);
    assert_eq!(second.active_tenant_id.as_deref(), Some("gamma"));
    assert_eq!(app.selected_tenant().as_deref(), Some("gamma"));
}
