use serde::{Deserialize, Serialize};

/// A stored account record, keyed by email in the user store.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub age: u32,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
}

impl User {
    /// A profile counts as complete once both the bio and the picture
    /// have been set.
    pub fn profile_complete(&self) -> bool {
        self.bio.is_some() && self.profile_picture.is_some()
    }
}

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub age: u32,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RecoveryForm {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct FindAccountForm {
    pub identifier: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordForm {
    pub token: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
    #[serde(rename = "confirmNewPassword")]
    pub confirm_new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetQuery {
    pub token: Option<String>,
}

/// Mask an email for the find-account response: first two characters of
/// the local part, then `***@` and the full domain.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let prefix: String = local.chars().take(2).collect();
            format!("{prefix}***@{domain}")
        }
        None => email.to_string(),
    }
}
