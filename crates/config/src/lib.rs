mod settings;

pub use settings::{
    CredentialSettings, DatabaseSettings, LogSettings, SessionSettings, Settings,
};
