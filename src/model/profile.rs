use serde::{Deserialize, Serialize};

use super::Timestamp;

/// An identity handed over by the external authentication provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Provider display name, present for federated sign-in
    #[serde(default)]
    pub display_name: Option<String>,
}

impl AuthUser {
    pub fn new(uid: impl Into<String>, email: Option<String>) -> Self {
        AuthUser {
            uid: uid.into(),
            email,
            display_name: None,
        }
    }
}

/// A user's record in the `users` collection, keyed by uid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Favorite recipe ids in insertion order
    #[serde(default)]
    pub favorites: Vec<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl UserProfile {
    /// Builds the profile written on a first federated sign-in.
    ///
    /// The first word of the provider's display name becomes the first name,
    /// the remaining words the last name.
    pub fn from_display_name(user: &AuthUser, created_at: Timestamp) -> Self {
        let (first_name, last_name) = split_display_name(user.display_name.as_deref());
        UserProfile {
            uid: user.uid.clone(),
            email: user.email.clone().unwrap_or_default(),
            first_name,
            last_name,
            favorites: Vec::new(),
            created_at: Some(created_at),
        }
    }

    /// Returns `"First Last"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

fn split_display_name(display_name: Option<&str>) -> (String, String) {
    let mut parts = display_name.unwrap_or_default().split(' ');
    let first = parts.next().unwrap_or_default().to_string();
    let rest = parts.collect::<Vec<_>>().join(" ");
    (first, rest)
}
