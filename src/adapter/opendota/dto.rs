//! OpenDota response shapes that do not map 1:1 onto domain types.

use serde::Deserialize;

use crate::domain::{null_as_default, Profile};

#[derive(Debug, Deserialize)]
pub struct HeroDto {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub localized_name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlayerDto {
    #[serde(default)]
    pub profile: Option<ProfileDto>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileDto {
    #[serde(default)]
    pub personaname: Option<String>,
    #[serde(default)]
    pub avatarfull: Option<String>,
}

impl From<PlayerDto> for Profile {
    fn from(player: PlayerDto) -> Self {
        let profile = player.profile.unwrap_or_default();
        Self {
            persona_name: profile.personaname.unwrap_or_default().trim().to_string(),
            avatar_url: profile.avatarfull.unwrap_or_default().trim().to_string(),
        }
    }
}
