//! Secret expiry classification. The UI and the workflows read expiry only
//! through these functions.

use chrono::{DateTime, Utc};
use octavian_config::CredentialSettings;
use octavian_db::models::{Platform, SocialAccount};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryPolicy {
    pub validity_days: i64,
    pub expiring_soon_days: i64,
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self::from(&CredentialSettings::default())
    }
}

impl From<&CredentialSettings> for ExpiryPolicy {
    fn from(settings: &CredentialSettings) -> Self {
        Self {
            validity_days: settings.validity_days,
            expiring_soon_days: settings.expiring_soon_days,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpiryStatus {
    /// Whole days left, rounded up, never negative.
    pub days_remaining: i64,
    /// Share of the validity window left, 0 to 100.
    pub progress_value: f64,
    pub expired: bool,
}

impl ExpiryStatus {
    pub fn compute(
        secret_expiry: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        validity_days: i64,
    ) -> Self {
        let days_remaining = secret_expiry
            .map(|expiry| days_until(expiry, now))
            .unwrap_or(0);
        let progress_value = if validity_days > 0 {
            (100.0 * days_remaining as f64 / validity_days as f64).clamp(0.0, 100.0)
        } else {
            0.0
        };

        Self {
            days_remaining,
            progress_value,
            expired: days_remaining == 0,
        }
    }

    pub fn for_account(account: &SocialAccount, now: DateTime<Utc>, policy: &ExpiryPolicy) -> Self {
        Self::compute(
            account.secret_expiry.map(|e| e.to_chrono()),
            now,
            policy.validity_days,
        )
    }
}

fn days_until(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let ms = (expiry - now).num_milliseconds();
    if ms <= 0 {
        return 0;
    }
    (ms + DAY_MS - 1) / DAY_MS
}

/// An account without a secret expiry counts as expired.
pub fn is_expired(account: &SocialAccount, now: DateTime<Utc>) -> bool {
    ExpiryStatus::for_account(account, now, &ExpiryPolicy::default()).expired
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretClass {
    Active,
    ExpiringSoon,
    Expired,
}

/// Secret state of one linked account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialRecord {
    /// Linked, never rotated.
    Unissued,
    Issued { expires_at: DateTime<Utc> },
}

impl CredentialRecord {
    pub fn from_account(account: &SocialAccount) -> Self {
        match account.secret_expiry {
            Some(expiry) if !account.secret.is_empty() => CredentialRecord::Issued {
                expires_at: expiry.to_chrono(),
            },
            _ => CredentialRecord::Unissued,
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        match self {
            CredentialRecord::Unissued => None,
            CredentialRecord::Issued { expires_at } => Some(*expires_at),
        }
    }

    pub fn classify(&self, now: DateTime<Utc>) -> SecretClass {
        self.classify_with(now, &ExpiryPolicy::default())
    }

    pub fn classify_with(&self, now: DateTime<Utc>, policy: &ExpiryPolicy) -> SecretClass {
        let status = ExpiryStatus::compute(self.expires_at(), now, policy.validity_days);
        if status.expired {
            SecretClass::Expired
        } else if status.days_remaining <= policy.expiring_soon_days {
            SecretClass::ExpiringSoon
        } else {
            SecretClass::Active
        }
    }
}

/// What the console may offer for an account's secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretAction {
    Rotate,
    /// An issued secret expired. Generation and copy are blocked until the
    /// operator resets the password on the platform.
    ResetOnPlatform { url: &'static str },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccountView {
    pub platform: Platform,
    pub display_name: &'static str,
    pub handle: String,
    pub record: CredentialRecord,
    pub expiry: ExpiryStatus,
    pub class: SecretClass,
    pub action: SecretAction,
    pub last_updated: DateTime<Utc>,
}

impl AccountView {
    pub fn new(account: &SocialAccount, now: DateTime<Utc>, policy: &ExpiryPolicy) -> Self {
        let record = CredentialRecord::from_account(account);
        let class = record.classify_with(now, policy);
        let action = match (record, class) {
            (CredentialRecord::Issued { .. }, SecretClass::Expired) => {
                SecretAction::ResetOnPlatform {
                    url: account.platform.reset_url(),
                }
            }
            _ => SecretAction::Rotate,
        };

        Self {
            platform: account.platform,
            display_name: account.platform.display_name(),
            handle: account.handle.clone(),
            record,
            expiry: ExpiryStatus::for_account(account, now, policy),
            class,
            action,
            last_updated: account.last_updated.to_chrono(),
        }
    }
}
