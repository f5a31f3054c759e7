//! Export / import of the persisted part of a session as one JSON document.
//!
//! Only the four keyed maps are persisted. The tailored result, its section
//! breakdown, and the oracle credential never leave the process.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::job::{JobPosting, SettingsOverride};
use crate::session::store::SessionStore;

/// A job posting as it appears in the export document (the id is the map key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDocument {
    pub title: String,
    #[serde(alias = "content")]
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(default)]
    pub resume_versions: BTreeMap<String, String>,
    #[serde(default)]
    pub job_postings: BTreeMap<String, JobDocument>,
    #[serde(default)]
    pub job_analyses: BTreeMap<String, String>,
    #[serde(default)]
    pub customization_settings: BTreeMap<String, SettingsOverride>,
}

impl SessionSnapshot {
    pub fn to_json_pretty(&self) -> Result<String, AppError> {
        serde_json::to_string_pretty(self)
            .context("Failed to serialize session snapshot")
            .map_err(AppError::Internal)
    }

    pub fn from_json(json: &str) -> Result<Self, AppError> {
        serde_json::from_str(json)
            .map_err(|e| AppError::Validation(format!("Invalid session document: {e}")))
    }

    pub fn read_from_path(path: &Path) -> Result<Self, AppError> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read session snapshot from {}", path.display()))?;
        Self::from_json(&json)
    }

    pub fn write_to_path(&self, path: &Path) -> Result<(), AppError> {
        let json = self.to_json_pretty()?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write session snapshot to {}", path.display()))?;
        Ok(())
    }
}

impl SessionStore {
    pub fn export(&self) -> SessionSnapshot {
        SessionSnapshot {
            resume_versions: self.resumes.clone(),
            job_postings: self
                .jobs
                .iter()
                .map(|(id, job)| {
                    (
                        id.clone(),
                        JobDocument {
                            title: job.title.clone(),
                            text: job.text.clone(),
                        },
                    )
                })
                .collect(),
            job_analyses: self.analyses.clone(),
            customization_settings: self.settings.clone(),
        }
    }

    /// Builds a fresh store from a snapshot. Analyses and settings that refer to
    /// a job missing from the document are dropped.
    pub fn import(snapshot: SessionSnapshot) -> Self {
        let SessionSnapshot {
            resume_versions,
            job_postings,
            job_analyses,
            customization_settings,
        } = snapshot;

        let jobs: BTreeMap<String, JobPosting> = job_postings
            .into_iter()
            .map(|(id, doc)| {
                (
                    id.clone(),
                    JobPosting {
                        id,
                        title: doc.title,
                        text: doc.text,
                    },
                )
            })
            .collect();

        let analyses = retain_known_jobs(job_analyses, &jobs, "analysis");
        let settings = retain_known_jobs(customization_settings, &jobs, "settings");

        info!(
            "Imported session: {} résumés, {} jobs, {} analyses, {} settings",
            resume_versions.len(),
            jobs.len(),
            analyses.len(),
            settings.len()
        );

        SessionStore {
            resumes: resume_versions,
            jobs,
            analyses,
            settings,
            ..SessionStore::default()
        }
    }
}

fn retain_known_jobs<V>(
    entries: BTreeMap<String, V>,
    jobs: &BTreeMap<String, JobPosting>,
    kind: &str,
) -> BTreeMap<String, V> {
    entries
        .into_iter()
        .filter(|(id, _)| {
            let known = jobs.contains_key(id);
            if !known {
                warn!("Dropping orphaned {kind} for unknown job '{id}'");
            }
            known
        })
        .collect()
}
