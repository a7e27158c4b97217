pub mod admin;
pub mod base;
pub mod customer;
pub mod social_account;
pub mod tenant;

pub use admin::AdminDao;
pub use base::{BaseDao, DaoError, DaoResult};
pub use customer::CustomerDao;
pub use social_account::SocialAccountDao;
pub use tenant::TenantDao;
