use thiserror::Error;

use crate::models::{draft::RegistrationDraft, persona::NewPersona};

/// Form fields, in the order they are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Area,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name is required. Please enter the full name.")]
    NameRequired,

    #[error("Email is required. Please enter a valid email address.")]
    EmailRequired,

    #[error("Email format is not valid. E.g. name@company.com")]
    EmailMalformed,

    #[error("You must select an area. Please pick one of the available areas.")]
    AreaRequired,
}

impl ValidationError {
    pub fn field(&self) -> Field {
        match self {
            ValidationError::NameRequired => Field::Name,
            ValidationError::EmailRequired | ValidationError::EmailMalformed => Field::Email,
            ValidationError::AreaRequired => Field::Area,
        }
    }
}

/// Checks the draft rule by rule and stops at the first violation.
///
/// On success returns the request body to send, built from the draft as typed.
pub fn validate(draft: &RegistrationDraft) -> Result<NewPersona, ValidationError> {
    if draft.name.trim().is_empty() {
        return Err(ValidationError::NameRequired);
    }

    if draft.email.trim().is_empty() {
        return Err(ValidationError::EmailRequired);
    }

    if !is_email_shaped(&draft.email) {
        return Err(ValidationError::EmailMalformed);
    }

    let area_id = draft
        .area_id
        .filter(|id| *id > 0)
        .and_then(|id| u64::try_from(id).ok())
        .ok_or(ValidationError::AreaRequired)?;

    Ok(NewPersona {
        name: draft.name.clone(),
        email: draft.email.clone(),
        area_id,
    })
}

/// `local@domain.tld`: one `@`, a dot inside the domain, no whitespace
fn is_email_shaped(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(idx, c)| c == '.' && idx > 0 && idx + 1 < domain.len())
}
