use serde::{Deserialize, Serialize};

/// Whether the current identity recently re-entered its password.
///
/// Serialized as `{"isAuth": bool}`, the only shape clients ever see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsAuth {
    #[serde(rename = "isAuth")]
    pub is_auth: bool,
}

impl SettingsAuth {
    pub fn granted() -> Self {
        Self { is_auth: true }
    }

    pub fn denied() -> Self {
        Self { is_auth: false }
    }
}
