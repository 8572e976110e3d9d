//! Submitted form shapes and their validation.

use axum::extract::{rejection::FormRejection, Form};
use serde::{Deserialize, Serialize};

/// Theme description form used by submit and edit
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DescriptionForm {
    pub description: String,
}

impl DescriptionForm {
    /// Validate a submission. On failure the returned form holds whatever
    /// should be shown again in the editor.
    pub fn validate(submission: Result<Form<Self>, FormRejection>) -> Result<Self, Self> {
        match submission {
            Ok(Form(form)) => Ok(form),
            Err(rejection) => {
                tracing::debug!("Description form rejected: {}", rejection);
                Err(Self::default())
            }
        }
    }
}

/// Confirmation checkbox for clearing discussed themes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClearDiscussedForm {
    #[serde(default)]
    pub sure: Option<String>,
}

impl ClearDiscussedForm {
    /// A checkbox is checked when it was sent with a value other than
    /// empty or `false`.
    pub fn is_checked(&self) -> bool {
        matches!(self.sure.as_deref(), Some(value) if !value.is_empty() && value != "false")
    }

    /// Whether the submission validates and the box was ticked.
    pub fn confirmed(submission: Result<Form<Self>, FormRejection>) -> bool {
        match submission {
            Ok(Form(form)) => form.is_checked(),
            Err(rejection) => {
                tracing::debug!("Clear form rejected: {}", rejection);
                false
            }
        }
    }
}
