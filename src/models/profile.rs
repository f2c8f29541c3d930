use crate::auth::ProviderUser;
use serde::{Deserialize, Serialize};

/// Reduced contractor profile served to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i64,
    pub clerk_id: String,
    pub name: String,
    pub email: Option<String>,
    pub avatar_url: String,
}

impl Profile {
    pub fn from_provider(contractor_id: i64, user: &ProviderUser) -> Self {
        let name = [user.first_name.as_deref(), user.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            id: contractor_id,
            clerk_id: user.id.clone(),
            name,
            email: user.primary_email().map(str::to_string),
            avatar_url: user.image_url.clone(),
        }
    }
}
