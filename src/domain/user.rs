use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Public view of a user: everything except the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl CreateUser {
    /// Trims name and email and rejects empty or malformed values.
    pub fn normalize(self) -> Result<Self, DomainError> {
        let name = self.name.trim().to_string();
        let email = self.email.trim().to_string();

        if name.is_empty() {
            return Err(DomainError::validation("Name is required"));
        }
        if email.is_empty() {
            return Err(DomainError::validation("Email is required"));
        }
        if !email.contains('@') {
            return Err(DomainError::validation("Invalid email format"));
        }
        if self.password.is_empty() {
            return Err(DomainError::validation("Password is required"));
        }

        Ok(Self {
            name,
            email,
            password: self.password,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
