use std::collections::BTreeMap;
use std::sync::Arc;

use bson::doc;
use chrono::{DateTime, Duration, Utc};
use octavian_config::CredentialSettings;
use octavian_db::DocumentStore;
use octavian_db::models::{AccountStatus, ParsePlatformError, Platform, SocialAccount};
use thiserror::Error;
use tracing::{info, warn};
use validator::Validate;

use crate::dao::{DaoError, SocialAccountDao};

use super::clipboard::{Clipboard, ClipboardError};
use super::expiry::{AccountView, CredentialRecord, ExpiryPolicy, SecretClass};
use super::secret::{RotatedSecret, digest_secret, generate_secret};

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("No {platform} account linked for tenant {tenant_id}")]
    TenantOrPlatformNotFound {
        tenant_id: String,
        platform: Platform,
    },
    #[error("{platform} secret expired; reset the password at {reset_url}")]
    SecretExpired {
        platform: Platform,
        reset_url: &'static str,
    },
    #[error(transparent)]
    UnsupportedPlatform(#[from] ParsePlatformError),
    #[error("Validation: {0}")]
    Validation(String),
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
    #[error(transparent)]
    Dao(#[from] DaoError),
}

#[derive(Debug, Validate)]
struct LinkRequest {
    #[validate(length(min = 1, max = 64, message = "Handle must be 1-64 characters"))]
    handle: String,
}

/// Linked third-party accounts and their rotating secrets, one record per
/// (tenant, platform).
pub struct CredentialManager {
    accounts: SocialAccountDao,
    policy: ExpiryPolicy,
    secret_length: usize,
}

impl CredentialManager {
    pub fn new(store: Arc<dyn DocumentStore>, settings: &CredentialSettings) -> Self {
        Self {
            accounts: SocialAccountDao::new(store),
            policy: ExpiryPolicy::from(settings),
            secret_length: settings.secret_length,
        }
    }

    /// Creates or replaces the account for this platform. Any previous secret is dropped.
    pub async fn link(
        &self,
        tenant_id: &str,
        platform: Platform,
        handle: &str,
    ) -> Result<SocialAccount, CredentialError> {
        let request = LinkRequest {
            handle: handle.trim().to_string(),
        };
        request
            .validate()
            .map_err(|e| CredentialError::Validation(e.to_string()))?;

        let account = SocialAccount {
            id: SocialAccount::key(tenant_id, platform),
            tenant_id: tenant_id.to_string(),
            platform,
            handle: request.handle,
            status: AccountStatus::Connected,
            secret: String::new(),
            secret_expiry: None,
            last_updated: bson::DateTime::now(),
        };
        self.accounts.upsert(&account).await?;
        info!(tenant_id, %platform, "Linked account");
        Ok(account)
    }

    /// Same as [`Self::link`] with the platform given by name.
    pub async fn link_named(
        &self,
        tenant_id: &str,
        platform: &str,
        handle: &str,
    ) -> Result<SocialAccount, CredentialError> {
        let platform: Platform = platform.parse()?;
        self.link(tenant_id, platform, handle).await
    }

    pub async fn list(
        &self,
        tenant_id: &str,
    ) -> Result<BTreeMap<Platform, SocialAccount>, CredentialError> {
        let accounts = self.accounts.list_for_tenant(tenant_id).await?;
        Ok(accounts
            .into_iter()
            .map(|account| (account.platform, account))
            .collect())
    }

    pub async fn get(
        &self,
        tenant_id: &str,
        platform: Platform,
    ) -> Result<SocialAccount, CredentialError> {
        self.accounts
            .find(tenant_id, platform)
            .await?
            .ok_or_else(|| not_linked(tenant_id, platform))
    }

    /// Issues a new secret for a linked account. Secret digest, expiry and
    /// timestamp are written in one record update. The plaintext is only
    /// available from the returned value.
    pub async fn rotate_secret(
        &self,
        tenant_id: &str,
        platform: Platform,
    ) -> Result<RotatedSecret, CredentialError> {
        let secret = generate_secret(self.secret_length);
        let now = Utc::now();
        let expires_at = now + Duration::days(self.policy.validity_days);

        let connected = status_bson(AccountStatus::Connected)?;
        let update = doc! {
            "secret": digest_secret(&secret),
            "secret_expiry": bson::DateTime::from_chrono(expires_at),
            "last_updated": bson::DateTime::from_chrono(now),
            "status": connected,
        };
        match self.accounts.update(tenant_id, platform, update).await {
            Ok(()) => {}
            Err(DaoError::NotFound) => return Err(not_linked(tenant_id, platform)),
            Err(e) => return Err(e.into()),
        }

        info!(tenant_id, %platform, expires_at = %expires_at, "Rotated secret");
        Ok(RotatedSecret::new(secret, platform, expires_at))
    }

    /// Generate-and-copy. Refused while an issued secret is expired; the
    /// operator has to reset the password on the platform first. Returns the
    /// new expiry.
    pub async fn rotate_and_copy(
        &self,
        tenant_id: &str,
        platform: Platform,
        clipboard: &dyn Clipboard,
    ) -> Result<DateTime<Utc>, CredentialError> {
        let account = self.get(tenant_id, platform).await?;
        let record = CredentialRecord::from_account(&account);
        if matches!(record, CredentialRecord::Issued { .. })
            && record.classify_with(Utc::now(), &self.policy) == SecretClass::Expired
        {
            return Err(CredentialError::SecretExpired {
                platform,
                reset_url: platform.reset_url(),
            });
        }

        let rotated = self.rotate_secret(tenant_id, platform).await?;
        if let Err(e) = clipboard.write_text(rotated.expose()) {
            warn!(tenant_id, %platform, error = %e, "Rotated secret could not be copied");
            return Err(e.into());
        }
        Ok(rotated.expires_at())
    }

    /// Removes the account. Unlinking an unknown pair is not an error.
    pub async fn unlink(&self, tenant_id: &str, platform: Platform) -> Result<(), CredentialError> {
        if self.accounts.delete(tenant_id, platform).await? {
            info!(tenant_id, %platform, "Unlinked account");
        }
        Ok(())
    }

    /// One view per linked account, in platform order.
    pub async fn views(
        &self,
        tenant_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<AccountView>, CredentialError> {
        let accounts = self.list(tenant_id).await?;
        Ok(accounts
            .values()
            .map(|account| AccountView::new(account, now, &self.policy))
            .collect())
    }

    pub async fn account_view(
        &self,
        tenant_id: &str,
        platform: Platform,
        now: DateTime<Utc>,
    ) -> Result<AccountView, CredentialError> {
        let account = self.get(tenant_id, platform).await?;
        Ok(AccountView::new(&account, now, &self.policy))
    }

    /// Marks accounts whose issued secret has expired as `needs_update` and
    /// returns the platforms that changed.
    pub async fn flag_expired(
        &self,
        tenant_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Platform>, CredentialError> {
        let needs_update = status_bson(AccountStatus::NeedsUpdate)?;
        let mut flagged = Vec::new();
        for account in self.list(tenant_id).await?.into_values() {
            let record = CredentialRecord::from_account(&account);
            let expired = matches!(record, CredentialRecord::Issued { .. })
                && record.classify_with(now, &self.policy) == SecretClass::Expired;
            if !expired || account.status == AccountStatus::NeedsUpdate {
                continue;
            }

            match self
                .accounts
                .update(
                    tenant_id,
                    account.platform,
                    doc! { "status": needs_update.clone() },
                )
                .await
            {
                Ok(()) => flagged.push(account.platform),
                // Unlinked concurrently.
                Err(DaoError::NotFound) => {}
                Err(e) => return Err(e.into()),
            }
        }

        if !flagged.is_empty() {
            info!(tenant_id, count = flagged.len(), "Flagged expired secrets");
        }
        Ok(flagged)
    }
}

fn status_bson(status: AccountStatus) -> Result<bson::Bson, CredentialError> {
    bson::to_bson(&status).map_err(|e| CredentialError::Dao(DaoError::from(e)))
}

fn not_linked(tenant_id: &str, platform: Platform) -> CredentialError {
    CredentialError::TenantOrPlatformNotFound {
        tenant_id: tenant_id.to_string(),
        platform,
    }
}
