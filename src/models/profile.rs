// src/models/profile.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Experience needed to leave level 1.
pub const INITIAL_XP_TO_NEXT_LEVEL: u32 = 1000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// Learner profile persisted under the `nextmimo_user` storage key.
///
/// Not a trust boundary: the profile lives in the learner's own storage scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next_level: u32,
    /// Consecutive days with at least one completed lesson.
    pub streak: u32,
    pub completed_lessons: u32,
    /// Number of unlocked badges.
    pub badges: u32,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(id: String, name: String, email: String, role: Role) -> Self {
        Self {
            id,
            email,
            name,
            role,
            level: 1,
            xp: 0,
            xp_to_next_level: INITIAL_XP_TO_NEXT_LEVEL,
            streak: 0,
            completed_lessons: 0,
            badges: 0,
            created_at: Utc::now(),
        }
    }
}

/// DTO for starting a learner session.
#[derive(Debug, Deserialize, Validate)]
pub struct StartSessionRequest {
    #[validate(length(
        min = 2,
        max = 80,
        message = "Name length must be between 2 and 80 characters."
    ))]
    pub name: String,
    #[validate(email(message = "Email address is not valid."))]
    pub email: String,
}

/// DTO for updating the profile. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 80))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}
