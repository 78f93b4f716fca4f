mod lifecycle;
mod settings;
mod verify;

pub use lifecycle::{
    authorize_connection, complete_settings, end_session, grant_settings_token, start_session,
};
pub use settings::verify_settings_token;
pub use verify::verify_session;
