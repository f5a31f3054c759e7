//! Section workflow: split the tailored résumé into a strict structured
//! breakdown, revise one section from user feedback, and rebuild the résumé
//! from the (possibly revised) sections.

use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::{
    FACTUALITY_INSTRUCTION, JSON_ONLY_SYSTEM, MISSING_ANALYSIS_PLACEHOLDER,
};
use crate::llm_client::strip_json_fences;
use crate::models::sections::{ResumeSections, SectionTarget};
use crate::session::store::SessionStore;
use crate::tailoring::prompts::{
    fill_template, RECONSTRUCT_PROMPT_TEMPLATE, RECONSTRUCT_SYSTEM, REVISE_PROMPT_TEMPLATE,
    REVISE_SYSTEM, SPLIT_PROMPT_TEMPLATE,
};
use crate::tailoring::{require_non_empty, OracleCall};

const SPLIT_TEMPERATURE: f32 = 0.0;
const REVISE_TEMPERATURE: f32 = 0.3;
const RECONSTRUCT_TEMPERATURE: f32 = 0.3;

/// Inputs of a single-section revision. Everything but `job_analysis` is required.
#[derive(Debug, Clone)]
pub struct SectionRevision<'a> {
    pub section_label: &'a str,
    pub section_text: &'a str,
    pub feedback: &'a str,
    pub job_text: &'a str,
    pub job_analysis: &'a str,
}

/// Splits the current tailored result and stores the breakdown.
/// On any failure the previous breakdown is left untouched.
pub async fn split_sections(
    store: &mut SessionStore,
    oracle: &OracleCall<'_>,
) -> Result<ResumeSections, AppError> {
    let text = store
        .get_tailored_result()
        .ok_or_else(|| {
            AppError::Validation(
                "There is no tailored result to split. Tailor a résumé first.".to_string(),
            )
        })?
        .to_string();

    let sections = split_sections_text(oracle, &text).await?;
    store.set_sections(sections.clone());
    info!(
        "Stored section breakdown: {} experience, {} education, {} projects, {} additional",
        sections.work_experience.len(),
        sections.education.len(),
        sections.projects.len(),
        sections.additional_sections.len()
    );
    Ok(sections)
}

/// Asks the model to split arbitrary résumé text into sections.
pub async fn split_sections_text(
    oracle: &OracleCall<'_>,
    resume_text: &str,
) -> Result<ResumeSections, AppError> {
    require_non_empty("Résumé text", resume_text)?;
    let prompt = fill_template(SPLIT_PROMPT_TEMPLATE, &[("resume_text", resume_text)]);
    let raw = oracle
        .complete(prompt, SPLIT_TEMPERATURE, Some(JSON_ONLY_SYSTEM))
        .await?;
    parse_sections(&raw)
}

/// Strict parse of a split response. Code fences around the JSON are stripped;
/// anything that does not match the full schema is rejected.
pub fn parse_sections(raw: &str) -> Result<ResumeSections, AppError> {
    let json = strip_json_fences(raw);
    serde_json::from_str::<ResumeSections>(json).map_err(|e| {
        warn!("Section split response did not match the schema: {e}");
        AppError::Parse(format!("Section breakdown is not valid: {e}"))
    })
}

/// Revises one section according to feedback and returns the new content only.
pub async fn revise_section(
    oracle: &OracleCall<'_>,
    revision: &SectionRevision<'_>,
) -> Result<String, AppError> {
    require_non_empty("Section label", revision.section_label)?;
    require_non_empty("Section text", revision.section_text)?;
    require_non_empty("Feedback", revision.feedback)?;
    require_non_empty("Job posting text", revision.job_text)?;

    let job_analysis = if revision.job_analysis.trim().is_empty() {
        MISSING_ANALYSIS_PLACEHOLDER
    } else {
        revision.job_analysis
    };

    let prompt = fill_template(
        REVISE_PROMPT_TEMPLATE,
        &[
            ("section_label", revision.section_label),
            ("section_text", revision.section_text),
            ("feedback", revision.feedback),
            ("job_text", revision.job_text),
            ("job_analysis", job_analysis),
            ("factuality_instruction", FACTUALITY_INSTRUCTION),
        ],
    );

    info!("Revising section '{}'", revision.section_label);
    let revised = oracle
        .complete_text(prompt, REVISE_TEMPERATURE, Some(REVISE_SYSTEM))
        .await?;
    Ok(revised.trim().to_string())
}

/// Revises the targeted section of the stored breakdown against a stored job,
/// then writes the revised content back in place.
pub async fn revise_stored_section(
    store: &mut SessionStore,
    oracle: &OracleCall<'_>,
    target: SectionTarget,
    feedback: &str,
    job_id: &str,
) -> Result<String, AppError> {
    let sections = store.get_sections().ok_or_else(|| {
        AppError::Validation(
            "No section breakdown exists yet. Split the résumé first.".to_string(),
        )
    })?;
    let (label, text) = sections
        .label(target)
        .zip(sections.content(target))
        .ok_or_else(|| {
            AppError::Validation(format!(
                "Section {target:?} does not exist in the current breakdown"
            ))
        })?;
    let job = store.get_job(job_id).ok_or_else(|| {
        AppError::Validation(format!("Job posting '{job_id}' does not exist"))
    })?;
    let job_text = job.text.clone();
    let job_analysis = store.get_analysis(job_id).unwrap_or_default().to_string();

    let revised = revise_section(
        oracle,
        &SectionRevision {
            section_label: &label,
            section_text: &text,
            feedback,
            job_text: &job_text,
            job_analysis: &job_analysis,
        },
    )
    .await?;

    store.replace_section(target, revised.clone())?;
    Ok(revised)
}

/// Rebuilds a full résumé from the stored sections and makes it the tailored result.
pub async fn reconstruct_resume(
    store: &mut SessionStore,
    oracle: &OracleCall<'_>,
) -> Result<String, AppError> {
    let sections = store.get_sections().ok_or_else(|| {
        AppError::Validation(
            "No section breakdown exists yet. Split the résumé first.".to_string(),
        )
    })?;
    let sections_json = serde_json::to_string_pretty(sections)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize sections: {e}")))?;

    let prompt = fill_template(
        RECONSTRUCT_PROMPT_TEMPLATE,
        &[("sections_json", sections_json.as_str())],
    );

    info!("Reconstructing résumé from sections");
    let rebuilt = oracle
        .complete_text(prompt, RECONSTRUCT_TEMPERATURE, Some(RECONSTRUCT_SYSTEM))
        .await?;

    let revision = store.set_tailored_from_sections(rebuilt.clone());
    info!("Stored reconstructed résumé as revision {revision}");
    Ok(rebuilt)
}
