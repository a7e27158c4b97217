pub mod admin;
pub mod customer;
pub mod social_account;
pub mod tenant;

pub use admin::AdminProfile;
pub use customer::Customer;
pub use social_account::{AccountStatus, ParsePlatformError, Platform, SocialAccount};
pub use tenant::{ContactInfo, Tenant};
