//! Tone and length calibration: maps per-job settings to the phrasing
//! guidance rendered into the tailoring prompt.

use crate::models::job::{ResumeLength, Tone};

/// Phrasing guidance for one tone.
#[derive(Debug, Clone)]
pub struct ToneGuide {
    pub description: &'static str,
    pub preferred_verbs: Vec<&'static str>,
    pub avoid: Vec<&'static str>,
}

/// Returns the phrasing guidance for a tone.
pub fn get_tone_guide(tone: Tone) -> ToneGuide {
    match tone {
        Tone::Professional => ToneGuide {
            description: "professional and formal",
            preferred_verbs: vec!["Managed", "Delivered", "Implemented", "Coordinated", "Directed"],
            avoid: vec!["slang", "exclamation marks", "first-person pronouns"],
        },
        Tone::Creative => ToneGuide {
            description: "creative and energetic",
            preferred_verbs: vec!["Designed", "Reimagined", "Pioneered", "Crafted", "Launched"],
            avoid: vec!["stock phrases", "passive voice"],
        },
        Tone::Balanced => ToneGuide {
            description: "balanced and neutral",
            preferred_verbs: vec!["Developed", "Improved", "Supported", "Maintained", "Built"],
            avoid: vec!["superlatives", "overstated claims"],
        },
        Tone::ResultsDriven => ToneGuide {
            description: "results-driven",
            preferred_verbs: vec!["Increased", "Reduced", "Grew", "Accelerated", "Saved"],
            avoid: vec!["duties without outcomes", "unquantified claims"],
        },
        Tone::Collaborative => ToneGuide {
            description: "collaboration-focused",
            preferred_verbs: vec![
                "Partnered with",
                "Collaborated on",
                "Contributed to",
                "Facilitated",
                "Mentored",
            ],
            avoid: vec!["sole-ownership language", "lone-hero framing"],
        },
    }
}

/// Length description and a concrete target for the model.
pub fn length_guide(length: ResumeLength) -> (&'static str, &'static str) {
    match length {
        ResumeLength::Concise => ("concise", "about one page, only the strongest points"),
        ResumeLength::Standard => ("standard", "one to two pages"),
        ResumeLength::Detailed => (
            "detailed",
            "two pages or more, with full context for each role",
        ),
    }
}
