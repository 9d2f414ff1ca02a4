//! User profile record.

use crate::model::plan::Details;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PROFILE_NAME: &str = "Guest Student";
pub const DEFAULT_PLAN_TYPE: &str = "Free Plan";
pub const DEFAULT_AVATAR_URL: &str = "https://picsum.photos/seed/omni/40/40";

/// Profile shown in the sidebar and dashboard greeting.
///
/// Persisted as camelCase JSON (`planType`). Fields this build does not
/// model are kept in `details` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub plan_type: String,
    /// Avatar image URL.
    pub avatar: String,
    #[serde(flatten)]
    pub details: Details,
}

const PROFILE_KEYS: &[&str] = &["name", "planType", "avatar"];

impl UserProfile {
    /// First `details` key that collides with a typed field, if any.
    pub fn shadowed_detail_key(&self) -> Option<&'static str> {
        PROFILE_KEYS
            .iter()
            .copied()
            .find(|key| self.details.contains_key(*key))
    }

    /// Returns a copy of this profile with `name` replaced.
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }
}

impl Default for UserProfile {
    /// The guest profile used when nothing usable is persisted.
    fn default() -> Self {
        Self {
            name: DEFAULT_PROFILE_NAME.to_string(),
            plan_type: DEFAULT_PLAN_TYPE.to_string(),
            avatar: DEFAULT_AVATAR_URL.to_string(),
            details: Details::new(),
        }
    }
}
