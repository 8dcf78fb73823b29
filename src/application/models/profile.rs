use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileImage {
    pub small: Option<String>,
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
}

/// Body of `GET /me`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileResult {
    pub username: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_image: Option<ProfileImage>,
}

/// Body of `GET /users/{username}`; only the avatar is of interest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserResult {
    #[serde(default)]
    pub profile_image: Option<ProfileImage>,
}

/// The signed-in user as shown on the profile screen
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub username: String,
    pub name: String,
    pub login_name: String,
    pub bio: Option<String>,
}

impl ProfileResult {
    /// First and last name joined by a space, or the username when both are blank.
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();

        if parts.is_empty() {
            self.username.clone()
        } else {
            parts.join(" ")
        }
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.profile_image.as_ref().and_then(|image| image.small.as_deref())
    }
}

impl From<&ProfileResult> for Profile {
    fn from(result: &ProfileResult) -> Self {
        Profile {
            username: result.username.clone(),
            name: result.display_name(),
            login_name: format!("@{}", result.username),
            bio: result.bio.clone(),
        }
    }
}
