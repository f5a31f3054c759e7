use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The fixed set of models a session may select.
/// Serialized as the wire identifier the Messages API expects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelId {
    #[default]
    #[serde(rename = "claude-3-7-sonnet-20250219")]
    Claude37Sonnet,
    #[serde(rename = "claude-3-5-sonnet-20240620")]
    Claude35Sonnet,
    #[serde(rename = "claude-3-opus-20240229")]
    Claude3Opus,
    #[serde(rename = "claude-3-haiku-20240307")]
    Claude3Haiku,
}

impl ModelId {
    /// All selectable models, in picker order.
    pub fn all() -> &'static [ModelId] {
        &[
            ModelId::Claude37Sonnet,
            ModelId::Claude35Sonnet,
            ModelId::Claude3Opus,
            ModelId::Claude3Haiku,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::Claude37Sonnet => "claude-3-7-sonnet-20250219",
            ModelId::Claude35Sonnet => "claude-3-5-sonnet-20240620",
            ModelId::Claude3Opus => "claude-3-opus-20240229",
            ModelId::Claude3Haiku => "claude-3-haiku-20240307",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ModelId::Claude37Sonnet => "Claude 3.7 Sonnet (latest)",
            ModelId::Claude35Sonnet => "Claude 3.5 Sonnet",
            ModelId::Claude3Opus => "Claude 3 Opus",
            ModelId::Claude3Haiku => "Claude 3 Haiku",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelId::all()
            .iter()
            .copied()
            .find(|m| m.as_str() == s.trim())
            .ok_or_else(|| format!("unknown model id '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_uses_wire_id() {
        let json = serde_json::to_string(&ModelId::Claude3Haiku).unwrap();
        assert_eq!(json, r#""claude-3-haiku-20240307""#);
        let back: ModelId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ModelId::Claude3Haiku);
    }

    #[test]
    fn test_as_str_matches_serde_for_every_model() {
        for model in ModelId::all() {
            let json = serde_json::to_string(model).unwrap();
            assert_eq!(json.trim_matches('"'), model.as_str());
        }
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert_eq!(
            "claude-3-opus-20240229".parse::<ModelId>().unwrap(),
            ModelId::Claude3Opus
        );
        assert!("gpt-4".parse::<ModelId>().is_err());
    }

    #[test]
    fn test_default_is_first_in_picker() {
        assert_eq!(ModelId::default(), ModelId::all()[0]);
    }
}
