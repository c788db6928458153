use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::domain::{FieldPath, JsonPayload, Rule, Schema, Validate, ValidationReport};

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Body of `POST /auth/1/session`. `Debug` hides the password.
pub struct CreateSessionRequest {
    pub username: String,
    pub password: String,
}

impl CreateSessionRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for CreateSessionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateSessionRequest")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

static CREATE_SESSION: LazyLock<Schema<CreateSessionRequest>> = LazyLock::new(|| {
    Schema::<CreateSessionRequest>::builder()
        .field("username", [Rule::Required], |r| (&r.username).into())
        .field("password", [Rule::Required], |r| (&r.password).into())
        .build()
});

impl Validate for CreateSessionRequest {
    fn validate_into(&self, path: &FieldPath, report: &mut ValidationReport) {
        CREATE_SESSION.check(self, path, report);
    }
}

impl JsonPayload for CreateSessionRequest {}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateSessionResponse {
    pub token: String,
}

impl fmt::Debug for CreateSessionResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CreateSessionResponse { token: *** }")
    }
}
