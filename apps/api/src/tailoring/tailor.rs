//! Résumé tailoring: rewrites the selected résumé versions for one job posting,
//! honouring the job's customization settings and analysis.
//!
//! Flow: validate inputs → effective settings → tone/length guides →
//!       render prompt → LLM call → store as the tailored result.

use tracing::info;

use crate::errors::AppError;
use crate::llm_client::prompts::{FACTUALITY_INSTRUCTION, MISSING_ANALYSIS_PLACEHOLDER};
use crate::models::job::{CustomizationSettings, JobPosting};
use crate::models::resume::ResumeVersion;
use crate::session::store::SessionStore;
use crate::tailoring::prompts::{fill_template, TAILOR_PROMPT_TEMPLATE, TAILOR_SYSTEM};
use crate::tailoring::tone::{get_tone_guide, length_guide};
use crate::tailoring::OracleCall;

const TAILOR_TEMPERATURE: f32 = 0.3;
const NOT_SPECIFIED: &str = "(none specified)";

/// Tailors the named résumé versions to a job and stores the result.
///
/// Fails with `Validation` before any oracle call if `resume_names` is empty,
/// the job is unknown, or any named version does not exist.
pub async fn tailor_resume(
    store: &mut SessionStore,
    oracle: &OracleCall<'_>,
    job_id: &str,
    resume_names: &[String],
) -> Result<String, AppError> {
    if resume_names.is_empty() {
        return Err(AppError::Validation(
            "Select at least one résumé version to tailor".to_string(),
        ));
    }

    let job = store.get_job(job_id).ok_or_else(|| {
        AppError::Validation(format!("Job posting '{job_id}' does not exist"))
    })?;

    let resumes = resume_names
        .iter()
        .map(|name| {
            store
                .get_resume(name)
                .map(|text| ResumeVersion {
                    name: name.clone(),
                    text: text.to_string(),
                })
                .ok_or_else(|| {
                    AppError::Validation(format!("Résumé version '{name}' does not exist"))
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let settings = store.get_settings(job_id);
    let analysis = store.get_analysis(job_id);
    let prompt = build_tailor_prompt(job, analysis, &resumes, &settings);

    info!(
        "Tailoring {} résumé version(s) for job {job_id} (tone={:?}, length={:?})",
        resumes.len(),
        settings.tone,
        settings.length
    );
    let tailored = oracle
        .complete_text(prompt, TAILOR_TEMPERATURE, Some(TAILOR_SYSTEM))
        .await?;

    let revision = store.set_tailored_result(tailored.clone());
    info!("Stored tailored result revision {revision} ({} bytes)", tailored.len());
    Ok(tailored)
}

/// Saves the current tailored result as a named résumé version.
pub fn save_tailored_as(store: &mut SessionStore, name: &str) -> Result<ResumeVersion, AppError> {
    let text = store
        .get_tailored_result()
        .ok_or_else(|| AppError::Validation("There is no tailored result to save".to_string()))?
        .to_string();
    store.save_resume(name, &text)
}

fn build_tailor_prompt(
    job: &JobPosting,
    analysis: Option<&str>,
    resumes: &[ResumeVersion],
    settings: &CustomizationSettings,
) -> String {
    let resume_versions = resumes
        .iter()
        .map(|r| format!("### Version: {}\n{}", r.name, r.text))
        .collect::<Vec<_>>()
        .join("\n\n");

    let tone = get_tone_guide(settings.tone);
    let tone_verbs = tone.preferred_verbs.join(", ");
    let tone_avoid = tone.avoid.join(", ");
    let (length, length_target) = length_guide(settings.length);

    let analysis = analysis
        .filter(|a| !a.trim().is_empty())
        .unwrap_or(MISSING_ANALYSIS_PLACEHOLDER);

    fill_template(
        TAILOR_PROMPT_TEMPLATE,
        &[
            ("job_title", job.title.as_str()),
            ("job_text", job.text.as_str()),
            ("analysis", analysis),
            ("resume_versions", resume_versions.as_str()),
            ("emphasize", or_not_specified(&settings.emphasize)),
            ("deemphasize", or_not_specified(&settings.deemphasize)),
            ("tone", tone.description),
            ("tone_verbs", tone_verbs.as_str()),
            ("tone_avoid", tone_avoid.as_str()),
            ("length", length),
            ("length_target", length_target),
            ("factuality_instruction", FACTUALITY_INSTRUCTION),
        ],
    )
}

fn or_not_specified(value: &str) -> &str {
    if value.trim().is_empty() {
        NOT_SPECIFIED
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::ModelId;
    use crate::models::job::{ResumeLength, SettingsOverride, Tone};
    use crate::session::registry::OracleSettings;
    use crate::test_support::StubOracle;

    fn settings() -> OracleSettings {
        OracleSettings {
            api_key: Some("key".to_string()),
            model: ModelId::Claude35Sonnet,
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_end_to_end_single_call_with_both_texts() {
        let mut store = SessionStore::new();
        store.save_resume("A", "resume-text-X").unwrap();
        let job = store.save_job_at("Job1", "posting-text-Y", 1).unwrap();
        let stub = StubOracle::replying("RESULT");
        let settings = settings();
        let call = OracleCall::new(&stub, &settings);

        tailor_resume(&mut store, &call, &job.id, &names(&["A"]))
            .await
            .unwrap();

        let calls = stub.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].request.prompt.contains("resume-text-X"));
        assert!(calls[0].request.prompt.contains("posting-text-Y"));
        assert_eq!(calls[0].request.temperature, 0.3);
        assert_eq!(calls[0].request.model, ModelId::Claude35Sonnet);
        assert_eq!(store.get_tailored_result(), Some("RESULT"));
    }

    #[tokio::test]
    async fn test_empty_resume_list_is_validation_without_call() {
        let mut store = SessionStore::new();
        let job = store.save_job_at("Job1", "Y", 1).unwrap();
        let stub = StubOracle::replying("RESULT");
        let settings = settings();
        let call = OracleCall::new(&stub, &settings);

        let err = tailor_resume(&mut store, &call, &job.id, &[]).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(stub.call_count(), 0);
        assert!(store.get_tailored_result().is_none());
    }

    #[tokio::test]
    async fn test_unknown_resume_name_is_validation_without_call() {
        let mut store = SessionStore::new();
        store.save_resume("A", "X").unwrap();
        let job = store.save_job_at("Job1", "Y", 1).unwrap();
        let stub = StubOracle::replying("RESULT");
        let settings = settings();
        let call = OracleCall::new(&stub, &settings);

        let err = tailor_resume(&mut store, &call, &job.id, &names(&["A", "B"]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_prompt_uses_placeholder_and_defaults() {
        let mut store = SessionStore::new();
        store.save_resume("A", "X").unwrap();
        let job = store.save_job_at("Job1", "Y", 1).unwrap();
        let stub = StubOracle::replying("RESULT");
        let settings = settings();
        let call = OracleCall::new(&stub, &settings);

        tailor_resume(&mut store, &call, &job.id, &names(&["A"]))
            .await
            .unwrap();

        let prompt = &stub.calls()[0].request.prompt;
        assert!(prompt.contains(MISSING_ANALYSIS_PLACEHOLDER));
        assert!(prompt.contains("Tone: professional and formal"));
        assert!(prompt.contains("Length: standard"));
        assert!(prompt.contains("emphasize: (none specified)"));
    }

    #[tokio::test]
    async fn test_prompt_reflects_settings_analysis_and_version_order() {
        let mut store = SessionStore::new();
        store.save_resume("Zeta", "zeta text").unwrap();
        store.save_resume("Alpha", "alpha text").unwrap();
        let job = store.save_job_at("Job1", "Y", 1).unwrap();
        store.set_analysis(&job.id, "KEYWORDS: Kafka".to_string()).unwrap();
        store
            .set_settings(
                &job.id,
                SettingsOverride {
                    emphasize: Some("Kafka".to_string()),
                    tone: Some(Tone::ResultsDriven),
                    length: Some(ResumeLength::Concise),
                    ..Default::default()
                },
            )
            .unwrap();
        let stub = StubOracle::replying("RESULT");
        let settings = settings();
        let call = OracleCall::new(&stub, &settings);

        tailor_resume(&mut store, &call, &job.id, &names(&["Zeta", "Alpha"]))
            .await
            .unwrap();

        let prompt = &stub.calls()[0].request.prompt;
        assert!(prompt.contains("KEYWORDS: Kafka"));
        assert!(prompt.contains("emphasize: Kafka"));
        assert!(prompt.contains("Tone: results-driven"));
        assert!(prompt.contains("Length: concise"));
        let zeta = prompt.find("### Version: Zeta").unwrap();
        let alpha = prompt.find("### Version: Alpha").unwrap();
        assert!(zeta < alpha, "versions are rendered in the order requested");
    }

    #[test]
    fn test_save_tailored_as_new_version() {
        let mut store = SessionStore::new();
        assert!(matches!(
            save_tailored_as(&mut store, "Tailored"),
            Err(AppError::Validation(_))
        ));
        store.set_tailored_result("RESULT".to_string());
        let saved = save_tailored_as(&mut store, "Tailored - Job1").unwrap();
        assert_eq!(saved.name, "Tailored - Job1");
        assert_eq!(store.get_resume("Tailored - Job1"), Some("RESULT"));
    }
}
