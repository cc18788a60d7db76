use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export, export_to = "../frontend/bindings/Nationality.ts"))]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nationality {
    Indian,
    Singaporean,
}

#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export, export_to = "../frontend/bindings/Gender.ts"))]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
}

/// A synthetic speaker offered by the voice provider.
///
/// `id` is opaque and provider-assigned; it is forwarded verbatim.
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export, export_to = "../frontend/bindings/VoiceOption.ts"))]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VoiceOption {
    pub id: String,
    pub name: String,
    pub nationality: Nationality,
    pub gender: Gender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
}

/// Static entry of the voice catalog.
#[derive(Debug, Clone, Copy)]
pub struct CatalogVoice {
    pub id: &'static str,
    pub name: &'static str,
    pub nationality: Nationality,
    pub gender: Gender,
}

impl CatalogVoice {
    pub fn to_option(&self) -> VoiceOption {
        VoiceOption {
            id: self.id.to_string(),
            name: self.name.to_string(),
            nationality: self.nationality,
            gender: self.gender,
            preview_url: None,
        }
    }
}

/// Voices the client may choose from.
pub const VOICES: [CatalogVoice; 3] = [
    CatalogVoice {
        id: "amiAXapsDOAiHJqbsAZj",
        name: "Priya",
        nationality: Nationality::Indian,
        gender: Gender::Female,
    },
    CatalogVoice {
        id: "pzxut4zZz4GImZNlqQ3H",
        name: "Raju",
        nationality: Nationality::Indian,
        gender: Gender::Male,
    },
    CatalogVoice {
        id: "6qpxBH5KUSDb40bij36w",
        name: "Lilian",
        nationality: Nationality::Singaporean,
        gender: Gender::Female,
    },
];

/// Every catalog voice as an owned [`VoiceOption`].
pub fn voice_options() -> Vec<VoiceOption> {
    VOICES.iter().map(CatalogVoice::to_option).collect()
}

/// Find a catalog voice by provider id.
pub fn voice_by_id(id: &str) -> Option<VoiceOption> {
    VOICES.iter().find(|v| v.id == id).map(CatalogVoice::to_option)
}

/// Find a catalog voice by display name (case-insensitive) or id.
pub fn find_voice(name_or_id: &str) -> Option<VoiceOption> {
    let needle = name_or_id.trim();
    VOICES
        .iter()
        .find(|v| v.name.eq_ignore_ascii_case(needle) || v.id == needle)
        .map(CatalogVoice::to_option)
}
