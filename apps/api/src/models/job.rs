use serde::{Deserialize, Serialize};

/// A stored job advertisement. `id` is generated once at creation and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: String,
    pub title: String,
    pub text: String,
}

/// Writing tone requested for a tailored résumé.
/// Unrecognised names read back as `Professional`, so older documents still load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Tone {
    #[default]
    Professional,
    Creative,
    Balanced,
    ResultsDriven,
    Collaborative,
}

impl From<String> for Tone {
    fn from(name: String) -> Self {
        match name.as_str() {
            "creative" => Tone::Creative,
            "balanced" => Tone::Balanced,
            "results_driven" => Tone::ResultsDriven,
            "collaborative" => Tone::Collaborative,
            _ => Tone::Professional,
        }
    }
}

/// Target résumé length: 1 = concise, 2 = standard, 3 = detailed.
/// Serialized as the bare integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ResumeLength {
    Concise,
    #[default]
    Standard,
    Detailed,
}

impl TryFrom<u8> for ResumeLength {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ResumeLength::Concise),
            2 => Ok(ResumeLength::Standard),
            3 => Ok(ResumeLength::Detailed),
            other => Err(format!("length must be 1, 2 or 3 (got {other})")),
        }
    }
}

impl From<ResumeLength> for u8 {
    fn from(length: ResumeLength) -> Self {
        match length {
            ResumeLength::Concise => 1,
            ResumeLength::Standard => 2,
            ResumeLength::Detailed => 3,
        }
    }
}

/// Per-job settings as stored: every field optional.
///
/// Field names match the export document (`emphasis_skills`, `deemphasize_skills`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsOverride {
    #[serde(
        default,
        rename = "emphasis_skills",
        skip_serializing_if = "Option::is_none"
    )]
    pub emphasize: Option<String>,
    #[serde(
        default,
        rename = "deemphasize_skills",
        alias = "deemphasis_skills",
        skip_serializing_if = "Option::is_none"
    )]
    pub deemphasize: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<Tone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<ResumeLength>,
}

/// Effective per-job settings, after defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomizationSettings {
    pub emphasize: String,
    pub deemphasize: String,
    pub tone: Tone,
    pub length: ResumeLength,
}

impl CustomizationSettings {
    /// Applies `over` field by field; absent fields keep the value in `self`.
    pub fn merged_with(&self, over: &SettingsOverride) -> Self {
        Self {
            emphasize: over
                .emphasize
                .clone()
                .unwrap_or_else(|| self.emphasize.clone()),
            deemphasize: over
                .deemphasize
                .clone()
                .unwrap_or_else(|| self.deemphasize.clone()),
            tone: over.tone.unwrap_or(self.tone),
            length: over.length.unwrap_or(self.length),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_professional_standard() {
        let d = CustomizationSettings::default();
        assert_eq!(d.tone, Tone::Professional);
        assert_eq!(u8::from(d.length), 2);
        assert!(d.emphasize.is_empty());
    }

    #[test]
    fn test_partial_override_merges_field_by_field() {
        let over = SettingsOverride {
            length: Some(ResumeLength::Detailed),
            ..Default::default()
        };
        let effective = CustomizationSettings::default().merged_with(&over);
        assert_eq!(effective.tone, Tone::Professional);
        assert_eq!(effective.length, ResumeLength::Detailed);
    }

    #[test]
    fn test_tone_serde_snake_case() {
        let tone: Tone = serde_json::from_str(r#""results_driven""#).unwrap();
        assert_eq!(tone, Tone::ResultsDriven);
        let json = serde_json::to_string(&Tone::ResultsDriven).unwrap();
        assert_eq!(json, r#""results_driven""#);
    }

    #[test]
    fn test_unknown_tone_falls_back_to_professional() {
        let tone: Tone = serde_json::from_str(r#""aggressive""#).unwrap();
        assert_eq!(tone, Tone::Professional);
        let over: SettingsOverride =
            serde_json::from_str(r#"{"tone": "formal", "length": 2}"#).unwrap();
        assert_eq!(over.tone, Some(Tone::Professional));
    }

    #[test]
    fn test_length_rejects_out_of_range() {
        assert!(serde_json::from_str::<ResumeLength>("0").is_err());
        assert!(serde_json::from_str::<ResumeLength>("4").is_err());
        assert_eq!(
            serde_json::from_str::<ResumeLength>("1").unwrap(),
            ResumeLength::Concise
        );
    }

    #[test]
    fn test_override_accepts_legacy_deemphasis_key() {
        let over: SettingsOverride =
            serde_json::from_str(r#"{"deemphasis_skills": "Java", "length": 3}"#).unwrap();
        assert_eq!(over.deemphasize.as_deref(), Some("Java"));
        assert_eq!(over.length, Some(ResumeLength::Detailed));
        assert!(over.tone.is_none());
    }

    #[test]
    fn test_override_omits_absent_fields_when_serialized() {
        let over = SettingsOverride {
            tone: Some(Tone::Creative),
            ..Default::default()
        };
        let json = serde_json::to_value(&over).unwrap();
        assert_eq!(json, serde_json::json!({"tone": "creative"}));
    }
}
