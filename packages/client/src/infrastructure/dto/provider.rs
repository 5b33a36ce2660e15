//! Media-provider API response DTOs.

use serde::{Deserialize, Serialize};

use crate::domain::UserProfile;

/// Every provider response wraps its payload in `data`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderEnvelope<T> {
    pub data: Option<T>,
}

/// `GET /v1/users/{id}` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfileDto {
    pub id: String,
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub name: String,
}

impl From<UserProfileDto> for UserProfile {
    fn from(dto: UserProfileDto) -> Self {
        Self {
            id: dto.id,
            handle: dto.handle,
            name: dto.name,
        }
    }
}
