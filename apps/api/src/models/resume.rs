use serde::{Deserialize, Serialize};

/// A named full-text variant of the candidate's résumé. `name` is the unique key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeVersion {
    pub name: String,
    pub text: String,
}
