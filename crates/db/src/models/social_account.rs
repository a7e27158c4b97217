use std::fmt;
use std::str::FromStr;

use bson::DateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Third-party account linked to a tenant. At most one per platform per tenant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SocialAccount {
    #[serde(rename = "_id")]
    pub id: String,
    pub tenant_id: String,
    pub platform: Platform,
    pub handle: String,
    #[serde(default)]
    pub status: AccountStatus,
    /// SHA-256 hex digest of the current secret. Empty until the first rotation.
    #[serde(default)]
    pub secret: String,
    pub secret_expiry: Option<DateTime>,
    pub last_updated: DateTime,
}

impl SocialAccount {
    pub const COLLECTION: &'static str = "social_accounts";

    pub fn key(tenant_id: &str, platform: Platform) -> String {
        format!("{tenant_id}:{}", platform.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    #[default]
    Connected,
    NeedsUpdate,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Facebook,
    Tiktok,
    Twitter,
    Linkedin,
    Youtube,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::Instagram,
        Platform::Facebook,
        Platform::Tiktok,
        Platform::Twitter,
        Platform::Linkedin,
        Platform::Youtube,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
            Platform::Tiktok => "tiktok",
            Platform::Twitter => "twitter",
            Platform::Linkedin => "linkedin",
            Platform::Youtube => "youtube",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::Facebook => "Facebook",
            Platform::Tiktok => "TikTok",
            Platform::Twitter => "Twitter",
            Platform::Linkedin => "LinkedIn",
            Platform::Youtube => "YouTube",
        }
    }

    /// Where the operator resets the password on the platform itself.
    pub fn reset_url(self) -> &'static str {
        match self {
            Platform::Instagram => "https://www.instagram.com/accounts/password/reset/",
            Platform::Facebook => "https://www.facebook.com/login/identify/",
            Platform::Tiktok => "https://www.tiktok.com/reset-password",
            Platform::Twitter => "https://twitter.com/account/begin_password_reset",
            Platform::Linkedin => "https://www.linkedin.com/uas/request-password-reset",
            Platform::Youtube => "https://accounts.google.com/signin/recovery",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unsupported platform: {0}")]
pub struct ParsePlatformError(pub String);

impl FromStr for Platform {
    type Err = ParsePlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| ParsePlatformError(s.to_string()))
    }
}
