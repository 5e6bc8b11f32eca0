use serde::{Deserialize, Serialize};

/// In-progress registration form data
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationDraft {
    pub name: String,
    pub email: String,
    /// `None` when nothing (or something unparseable) was selected
    pub area_id: Option<i64>,
}

impl RegistrationDraft {
    pub fn new(name: impl Into<String>, email: impl Into<String>, area_id: Option<i64>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            area_id,
        }
    }
}
