use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    extractors::JsonPayload,
    users::repo_types::{User, UserWithArticles},
    validation::non_empty,
};

/// Request body for `POST /api/users`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl JsonPayload for CreateUserRequest {
    const REJECTION: &'static str = "All fields are required";
}

impl CreateUserRequest {
    /// Returns `(email, plaintext password)` when both are present.
    pub fn validate(self) -> Result<(String, String), ApiError> {
        match (non_empty(self.email), non_empty(self.password)) {
            (Some(email), Some(password)) => Ok((email, password)),
            _ => Err(ApiError::bad_request("All fields are required")),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

/// Zero-or-one users, kept as a list for response compatibility.
#[derive(Debug, Serialize)]
pub struct UserArticlesResponse {
    pub user: Vec<UserWithArticles>,
}

#[derive(Debug, Serialize)]
pub struct UserDeletedResponse {
    pub msg: String,
    pub articles_affected: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_fields_required() {
        let ok = CreateUserRequest {
            email: Some("a@x.com".into()),
            password: Some("secret".into()),
        };
        assert_eq!(ok.validate().unwrap(), ("a@x.com".into(), "secret".into()));

        let missing = CreateUserRequest {
            email: Some("a@x.com".into()),
            password: None,
        };
        assert!(missing.validate().is_err());
        assert!(CreateUserRequest::default().validate().is_err());
    }
}
