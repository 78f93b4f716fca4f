mod main;
mod trust;
mod types;

pub use main::{
    authorize_connection, complete_settings, end_session, grant_settings_token, start_session,
    verify_session, verify_settings_token,
};
pub use trust::SessionTrust;
pub use types::SettingsAuth;
