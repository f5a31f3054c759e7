use serde::{Deserialize, Serialize};

/// Structured decomposition of a résumé into named parts.
///
/// The schema is strict: every key must be present and no other key is accepted,
/// so a partially-matching model response fails to parse instead of being guessed at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResumeSections {
    #[serde(rename = "professional_summary")]
    pub summary: String,
    pub work_experience: Vec<WorkExperience>,
    pub education: Vec<Education>,
    pub skills: Vec<String>,
    pub projects: Vec<Project>,
    pub additional_sections: Vec<AdditionalSection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkExperience {
    pub title: String,
    pub company: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdditionalSection {
    pub title: String,
    pub content: String,
}

/// Addresses one revisable part of a `ResumeSections`.
///
/// JSON form: `{"section": "summary"}` or `{"section": "work_experience", "index": 0}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "section", content = "index", rename_all = "snake_case")]
pub enum SectionTarget {
    Summary,
    Skills,
    WorkExperience(usize),
    Education(usize),
    Projects(usize),
    AdditionalSections(usize),
}

impl ResumeSections {
    /// Human-readable label for the targeted section, used in revision prompts.
    pub fn label(&self, target: SectionTarget) -> Option<String> {
        match target {
            SectionTarget::Summary => Some("Professional summary".to_string()),
            SectionTarget::Skills => Some("Skills".to_string()),
            SectionTarget::WorkExperience(i) => self
                .work_experience
                .get(i)
                .map(|e| format!("Work experience: {} at {}", e.title, e.company)),
            SectionTarget::Education(i) => self
                .education
                .get(i)
                .map(|e| format!("Education: {}, {}", e.degree, e.institution)),
            SectionTarget::Projects(i) => self
                .projects
                .get(i)
                .map(|p| format!("Project: {}", p.name)),
            SectionTarget::AdditionalSections(i) => {
                self.additional_sections.get(i).map(|s| s.title.clone())
            }
        }
    }

    /// Current text of the targeted section. Skills are rendered one per line.
    pub fn content(&self, target: SectionTarget) -> Option<String> {
        match target {
            SectionTarget::Summary => Some(self.summary.clone()),
            SectionTarget::Skills => Some(self.skills.join("\n")),
            SectionTarget::WorkExperience(i) => {
                self.work_experience.get(i).map(|e| e.content.clone())
            }
            SectionTarget::Education(i) => self.education.get(i).map(|e| e.content.clone()),
            SectionTarget::Projects(i) => self.projects.get(i).map(|p| p.content.clone()),
            SectionTarget::AdditionalSections(i) => {
                self.additional_sections.get(i).map(|s| s.content.clone())
            }
        }
    }

    /// Replaces the content of the targeted section.
    /// Returns `false` (and changes nothing) when an indexed target is out of range.
    pub fn replace(&mut self, target: SectionTarget, content: String) -> bool {
        let slot = match target {
            SectionTarget::Summary => &mut self.summary,
            SectionTarget::Skills => {
                self.skills = split_skills(&content);
                return true;
            }
            SectionTarget::WorkExperience(i) => match self.work_experience.get_mut(i) {
                Some(e) => &mut e.content,
                None => return false,
            },
            SectionTarget::Education(i) => match self.education.get_mut(i) {
                Some(e) => &mut e.content,
                None => return false,
            },
            SectionTarget::Projects(i) => match self.projects.get_mut(i) {
                Some(p) => &mut p.content,
                None => return false,
            },
            SectionTarget::AdditionalSections(i) => match self.additional_sections.get_mut(i) {
                Some(s) => &mut s.content,
                None => return false,
            },
        };
        *slot = content;
        true
    }
}

/// Splits revised skills text on newlines and commas, dropping list bullets and blanks.
fn split_skills(content: &str) -> Vec<String> {
    content
        .split(['\n', ','])
        .map(|s| s.trim().trim_start_matches(['-', '*', '•']).trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
