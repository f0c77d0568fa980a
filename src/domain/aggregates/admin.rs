//! Back-office accounts
//!
//! Passwords are stored as argon2 PHC strings and never leave the repository
//! layer; [`AdminUser`] is the only shape that is serialized.

use crate::{Result, StorefrontError};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::Argon2;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: i64,
    pub email: String,
}

/// Account creation payload.
#[derive(Clone, Deserialize, Validate)]
pub struct NewAdmin {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

impl fmt::Debug for NewAdmin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAdmin").field("email", &self.email).field("password", &"***").finish()
    }
}

#[derive(Clone, Deserialize, Validate)]
pub struct PasswordChange {
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

impl fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str("PasswordChange(***)") }
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| StorefrontError::StorageError(format!("password hashing failed: {e}")))
}
