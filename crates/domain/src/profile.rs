//! User profile types

use serde::{Deserialize, Serialize};

/// Profile of the authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Account handle, e.g. `jane`.
    pub user_name: String,
    /// First and last name joined by a space.
    pub name: String,
    /// Handle prefixed with `@`.
    pub login_name: String,
    /// Free-form biography.
    pub bio: Option<String>,
}

impl From<ProfileResult> for Profile {
    fn from(result: ProfileResult) -> Self {
        let name = [result.first_name, result.last_name]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            login_name: format!("@{}", result.username),
            user_name: result.username,
            name,
            bio: result.bio,
        }
    }
}

/// Body of `GET /me`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProfileResult {
    /// Account handle.
    pub username: String,
    /// Given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Biography.
    #[serde(default)]
    pub bio: Option<String>,
}

/// Body of `GET /users/{username}`; only the avatar is read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserResult {
    /// Avatar renditions.
    pub profile_image: ProfileImage,
}

/// Avatar renditions of a user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProfileImage {
    /// Small avatar URL.
    pub small: String,
}
