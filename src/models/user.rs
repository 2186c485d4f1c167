use serde::{Deserialize, Serialize};

use super::entity::impl_model;
use super::{Meta, Patch};

/// Account owning places and writing reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(flatten)]
    pub meta: Meta,

    /// Immutable once the user is created
    pub email: String,

    /// Stored but never returned to clients
    pub password: String,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,
}

impl_model!(User, hidden = ["password"]);

impl User {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            meta: Meta::new(),
            email: email.into(),
            password: password.into(),
            first_name: None,
            last_name: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl From<NewUser> for User {
    fn from(new: NewUser) -> Self {
        let mut user = User::new(new.email, new.password);
        user.first_name = new.first_name;
        user.last_name = new.last_name;
        user
    }
}

/// `email` is deliberately absent: it cannot be changed after creation.
#[derive(Debug, Default, Deserialize)]
pub struct UserPatch {
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl Patch<User> for UserPatch {
    fn apply(self, target: &mut User) {
        if let Some(password) = self.password {
            target.password = password;
        }
        if let Some(first_name) = self.first_name {
            target.first_name = Some(first_name);
        }
        if let Some(last_name) = self.last_name {
            target.last_name = Some(last_name);
        }
    }
}
