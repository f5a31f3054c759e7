//! Session Store: in-memory CRUD over résumé versions, job postings, analyses,
//! per-job settings, the last tailored result, and its section breakdown.
//!
//! Single logical caller: the registry hands out one locked session at a time,
//! so nothing in here synchronises.

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::info;

use crate::errors::AppError;
use crate::models::job::{CustomizationSettings, JobPosting, SettingsOverride};
use crate::models::resume::ResumeVersion;
use crate::models::sections::{ResumeSections, SectionTarget};

/// The most recent tailoring output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailoredResult {
    pub text: String,
    /// Bumped on every write; lets a section breakdown detect that it is stale.
    pub revision: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct StoredSections {
    pub(super) sections: ResumeSections,
    pub(super) source_revision: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStore {
    pub(super) resumes: BTreeMap<String, String>,
    pub(super) jobs: BTreeMap<String, JobPosting>,
    pub(super) analyses: BTreeMap<String, String>,
    pub(super) settings: BTreeMap<String, SettingsOverride>,
    pub(super) tailored: Option<TailoredResult>,
    pub(super) sections: Option<StoredSections>,
    pub(super) next_revision: u64,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Résumé versions ────────────────────────────────────────────────────

    /// Upserts a résumé version. Reusing a name overwrites its text.
    pub fn save_resume(&mut self, name: &str, text: &str) -> Result<ResumeVersion, AppError> {
        // Blank names are rejected; any other name is stored exactly as given.
        if name.trim().is_empty() || text.trim().is_empty() {
            return Err(AppError::Validation(
                "Both a résumé name and résumé text are required".to_string(),
            ));
        }
        let replaced = self
            .resumes
            .insert(name.to_string(), text.to_string())
            .is_some();
        info!("Saved résumé version '{name}' (replaced={replaced})");
        Ok(ResumeVersion {
            name: name.to_string(),
            text: text.to_string(),
        })
    }

    pub fn get_resume(&self, name: &str) -> Option<&str> {
        self.resumes.get(name).map(String::as_str)
    }

    pub fn list_resumes(&self) -> Vec<ResumeVersion> {
        self.resumes
            .iter()
            .map(|(name, text)| ResumeVersion {
                name: name.clone(),
                text: text.clone(),
            })
            .collect()
    }

    /// Removes a résumé version. Returns whether one existed.
    pub fn delete_resume(&mut self, name: &str) -> bool {
        self.resumes.remove(name).is_some()
    }

    // ── Job postings ───────────────────────────────────────────────────────

    pub fn save_job(&mut self, title: &str, text: &str) -> Result<JobPosting, AppError> {
        self.save_job_at(title, text, Utc::now().timestamp())
    }

    /// Stores a job posting with an id of `slug(title) + "_" + timestamp`.
    /// Collisions within the same second get a numeric suffix.
    pub fn save_job_at(
        &mut self,
        title: &str,
        text: &str,
        timestamp: i64,
    ) -> Result<JobPosting, AppError> {
        let title = title.trim();
        if title.is_empty() || text.trim().is_empty() {
            return Err(AppError::Validation(
                "Both a job title and job posting text are required".to_string(),
            ));
        }

        let base = format!("{}_{}", slug(title), timestamp);
        let mut id = base.clone();
        let mut n = 2;
        while self.jobs.contains_key(&id) {
            id = format!("{base}_{n}");
            n += 1;
        }

        let job = JobPosting {
            id: id.clone(),
            title: title.to_string(),
            text: text.to_string(),
        };
        self.jobs.insert(id.clone(), job.clone());
        info!("Saved job posting {id}");
        Ok(job)
    }

    pub fn get_job(&self, id: &str) -> Option<&JobPosting> {
        self.jobs.get(id)
    }

    pub fn list_jobs(&self) -> Vec<JobPosting> {
        self.jobs.values().cloned().collect()
    }

    /// Removes a job and everything keyed by it. Returns whether the job existed.
    pub fn delete_job(&mut self, id: &str) -> bool {
        let removed = self.jobs.remove(id).is_some();
        self.analyses.remove(id);
        self.settings.remove(id);
        if removed {
            info!("Deleted job posting {id} with its analysis and settings");
        }
        removed
    }

    // ── Analyses ───────────────────────────────────────────────────────────

    pub fn set_analysis(&mut self, job_id: &str, text: String) -> Result<(), AppError> {
        self.require_job(job_id)?;
        self.analyses.insert(job_id.to_string(), text);
        Ok(())
    }

    pub fn get_analysis(&self, job_id: &str) -> Option<&str> {
        self.analyses.get(job_id).map(String::as_str)
    }

    // ── Customization settings ─────────────────────────────────────────────

    /// Stores the override for a job, replacing any previous one.
    pub fn set_settings(
        &mut self,
        job_id: &str,
        settings: SettingsOverride,
    ) -> Result<(), AppError> {
        self.require_job(job_id)?;
        self.settings.insert(job_id.to_string(), settings);
        Ok(())
    }

    /// Effective settings: the stored override applied over defaults.
    pub fn get_settings(&self, job_id: &str) -> CustomizationSettings {
        let defaults = CustomizationSettings::default();
        match self.settings.get(job_id) {
            Some(over) => defaults.merged_with(over),
            None => defaults,
        }
    }

    pub fn get_settings_override(&self, job_id: &str) -> Option<&SettingsOverride> {
        self.settings.get(job_id)
    }

    // ── Tailored result ────────────────────────────────────────────────────

    /// Replaces the tailored result and returns its new revision.
    /// An existing section breakdown is kept but becomes stale.
    pub fn set_tailored_result(&mut self, text: String) -> u64 {
        self.next_revision += 1;
        let revision = self.next_revision;
        self.tailored = Some(TailoredResult { text, revision });
        revision
    }

    pub fn get_tailored_result(&self) -> Option<&str> {
        self.tailored.as_ref().map(|t| t.text.as_str())
    }

    pub fn tailored(&self) -> Option<&TailoredResult> {
        self.tailored.as_ref()
    }

    // ── Section breakdown ──────────────────────────────────────────────────

    /// Stores a breakdown derived from the current tailored result.
    pub fn set_sections(&mut self, sections: ResumeSections) {
        self.sections = Some(StoredSections {
            sections,
            source_revision: self.current_revision(),
        });
    }

    pub fn get_sections(&self) -> Option<&ResumeSections> {
        self.sections.as_ref().map(|s| &s.sections)
    }

    /// True when a breakdown exists but was derived from an older tailored result.
    pub fn sections_are_stale(&self) -> bool {
        self.sections
            .as_ref()
            .is_some_and(|s| s.source_revision != self.current_revision())
    }

    pub fn replace_section(
        &mut self,
        target: SectionTarget,
        content: String,
    ) -> Result<(), AppError> {
        let stored = self.sections.as_mut().ok_or_else(|| {
            AppError::Validation(
                "No section breakdown exists yet. Split the résumé first.".to_string(),
            )
        })?;
        if !stored.sections.replace(target, content) {
            return Err(AppError::Validation(format!(
                "Section {target:?} does not exist in the current breakdown"
            )));
        }
        Ok(())
    }

    /// Stores a résumé rebuilt from the current sections. The breakdown stays
    /// current because the new result is derived from it.
    pub fn set_tailored_from_sections(&mut self, text: String) -> u64 {
        let revision = self.set_tailored_result(text);
        if let Some(stored) = self.sections.as_mut() {
            stored.source_revision = revision;
        }
        revision
    }

    fn current_revision(&self) -> u64 {
        self.tailored.as_ref().map_or(0, |t| t.revision)
    }

    fn require_job(&self, job_id: &str) -> Result<&JobPosting, AppError> {
        self.jobs
            .get(job_id)
            .ok_or_else(|| AppError::Validation(format!("Job posting '{job_id}' does not exist")))
    }
}

/// Keeps alphanumerics, collapses every other run of characters into `_`.
fn slug(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_alphanumeric() {
            out.push(c);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "job".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::{ResumeLength, Tone};
    use crate::models::sections::WorkExperience;

    fn sections() -> ResumeSections {
        ResumeSections {
            summary: "Summary".to_string(),
            work_experience: vec![WorkExperience {
                title: "Engineer".to_string(),
                company: "Acme".to_string(),
                content: "Built things".to_string(),
            }],
            education: vec![],
            skills: vec![],
            projects: vec![],
            additional_sections: vec![],
        }
    }

    #[test]
    fn test_save_resume_round_trip() {
        let mut store = SessionStore::new();
        store.save_resume("Backend", "Rust, Postgres\n  indented").unwrap();
        assert_eq!(store.get_resume("Backend"), Some("Rust, Postgres\n  indented"));
    }

    #[test]
    fn test_resume_name_is_kept_verbatim() {
        let mut store = SessionStore::new();
        store.save_resume(" Backend ", "text").unwrap();
        assert_eq!(store.get_resume(" Backend "), Some("text"));
        assert!(store.get_resume("Backend").is_none());
        assert_eq!(store.list_resumes()[0].name, " Backend ");
    }

    #[test]
    fn test_save_resume_overwrites_same_name() {
        let mut store = SessionStore::new();
        store.save_resume("A", "one").unwrap();
        store.save_resume("A", "two").unwrap();
        assert_eq!(store.get_resume("A"), Some("two"));
        assert_eq!(store.list_resumes().len(), 1);
    }

    #[test]
    fn test_save_resume_rejects_empty_inputs() {
        let mut store = SessionStore::new();
        assert!(matches!(store.save_resume("", "text"), Err(AppError::Validation(_))));
        assert!(matches!(store.save_resume("   ", "text"), Err(AppError::Validation(_))));
        assert!(matches!(store.save_resume("A", "   "), Err(AppError::Validation(_))));
        assert!(store.list_resumes().is_empty());
    }

    #[test]
    fn test_delete_resume_absent_is_noop() {
        let mut store = SessionStore::new();
        store.save_resume("A", "x").unwrap();
        assert!(!store.delete_resume("B"));
        assert!(store.delete_resume("A"));
        assert!(store.get_resume("A").is_none());
    }

    #[test]
    fn test_job_id_is_slug_plus_timestamp() {
        let mut store = SessionStore::new();
        let job = store
            .save_job_at("Senior Rust Engineer", "We need Rust", 1_700_000_000)
            .unwrap();
        assert_eq!(job.id, "Senior_Rust_Engineer_1700000000");
        assert_eq!(store.get_job(&job.id).unwrap().text, "We need Rust");
    }

    #[test]
    fn test_job_ids_stay_unique_within_one_second() {
        let mut store = SessionStore::new();
        let a = store.save_job_at("Dev", "a", 42).unwrap();
        let b = store.save_job_at("Dev", "b", 42).unwrap();
        let c = store.save_job_at("Dev", "c", 42).unwrap();
        assert_eq!(a.id, "Dev_42");
        assert_eq!(b.id, "Dev_42_2");
        assert_eq!(c.id, "Dev_42_3");
        assert_eq!(store.list_jobs().len(), 3);
    }

    #[test]
    fn test_save_job_rejects_empty_inputs() {
        let mut store = SessionStore::new();
        assert!(matches!(store.save_job(" ", "text"), Err(AppError::Validation(_))));
        assert!(matches!(store.save_job("Dev", ""), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Front-end / UI  Dev"), "Front_end_UI_Dev");
        assert_eq!(slug("  백엔드 개발자 "), "백엔드_개발자");
        assert_eq!(slug("!!!"), "job");
    }

    #[test]
    fn test_delete_job_cascades() {
        let mut store = SessionStore::new();
        let job = store.save_job_at("Dev", "text", 1).unwrap();
        store.set_analysis(&job.id, "analysis".to_string()).unwrap();
        store
            .set_settings(
                &job.id,
                SettingsOverride {
                    tone: Some(Tone::Creative),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(store.delete_job(&job.id));
        assert!(store.get_job(&job.id).is_none());
        assert!(store.get_analysis(&job.id).is_none());
        assert!(store.get_settings_override(&job.id).is_none());
        assert_eq!(store.get_settings(&job.id), CustomizationSettings::default());
    }

    #[test]
    fn test_analysis_and_settings_require_existing_job() {
        let mut store = SessionStore::new();
        assert!(matches!(
            store.set_analysis("ghost", "x".to_string()),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            store.set_settings("ghost", SettingsOverride::default()),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_settings_partial_override_falls_back_per_field() {
        let mut store = SessionStore::new();
        let job = store.save_job_at("Dev", "text", 1).unwrap();
        store
            .set_settings(
                &job.id,
                SettingsOverride {
                    length: Some(ResumeLength::Detailed),
                    ..Default::default()
                },
            )
            .unwrap();
        let effective = store.get_settings(&job.id);
        assert_eq!(effective.tone, Tone::Professional);
        assert_eq!(effective.length, ResumeLength::Detailed);
    }

    #[test]
    fn test_settings_last_write_wins() {
        let mut store = SessionStore::new();
        let job = store.save_job_at("Dev", "text", 1).unwrap();
        store
            .set_settings(
                &job.id,
                SettingsOverride {
                    tone: Some(Tone::Creative),
                    emphasize: Some("Rust".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        store
            .set_settings(
                &job.id,
                SettingsOverride {
                    length: Some(ResumeLength::Concise),
                    ..Default::default()
                },
            )
            .unwrap();
        let effective = store.get_settings(&job.id);
        assert_eq!(effective.tone, Tone::Professional);
        assert_eq!(effective.emphasize, "");
        assert_eq!(effective.length, ResumeLength::Concise);
    }

    #[test]
    fn test_new_tailored_result_marks_sections_stale() {
        let mut store = SessionStore::new();
        store.set_tailored_result("v1".to_string());
        store.set_sections(sections());
        assert!(!store.sections_are_stale());

        store.set_tailored_result("v2".to_string());
        assert!(store.sections_are_stale());
        assert!(store.get_sections().is_some(), "stale sections are kept, not dropped");
    }

    #[test]
    fn test_tailored_from_sections_keeps_sections_current() {
        let mut store = SessionStore::new();
        store.set_tailored_result("v1".to_string());
        store.set_sections(sections());
        let rev = store.set_tailored_from_sections("rebuilt".to_string());
        assert_eq!(store.tailored().unwrap().revision, rev);
        assert_eq!(store.get_tailored_result(), Some("rebuilt"));
        assert!(!store.sections_are_stale());
    }

    #[test]
    fn test_replace_section_requires_breakdown_and_valid_index() {
        let mut store = SessionStore::new();
        assert!(matches!(
            store.replace_section(SectionTarget::Summary, "x".to_string()),
            Err(AppError::Validation(_))
        ));
        store.set_sections(sections());
        assert!(matches!(
            store.replace_section(SectionTarget::WorkExperience(5), "x".to_string()),
            Err(AppError::Validation(_))
        ));
        store
            .replace_section(SectionTarget::WorkExperience(0), "Shipped things".to_string())
            .unwrap();
        assert_eq!(
            store.get_sections().unwrap().work_experience[0].content,
            "Shipped things"
        );
    }
}
