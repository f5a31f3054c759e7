//! Job analysis: asks the model for a six-part breakdown of a posting and
//! stores it as the job's analysis.

use tracing::info;

use crate::errors::AppError;
use crate::session::store::SessionStore;
use crate::tailoring::prompts::{fill_template, ANALYZE_PROMPT_TEMPLATE, ANALYZE_SYSTEM};
use crate::tailoring::OracleCall;

const ANALYSIS_TEMPERATURE: f32 = 0.3;

/// Analyses a stored job posting. Re-analysis overwrites the previous result.
pub async fn analyze_job(
    store: &mut SessionStore,
    oracle: &OracleCall<'_>,
    job_id: &str,
) -> Result<String, AppError> {
    let job = store.get_job(job_id).ok_or_else(|| {
        AppError::Validation(format!("Job posting '{job_id}' does not exist"))
    })?;
    let prompt = build_analysis_prompt(&job.text);

    info!("Analyzing job posting {job_id}");
    let analysis = oracle
        .complete_text(prompt, ANALYSIS_TEMPERATURE, Some(ANALYZE_SYSTEM))
        .await?;

    store.set_analysis(job_id, analysis.clone())?;
    info!("Stored analysis for {job_id} ({} bytes)", analysis.len());
    Ok(analysis)
}

fn build_analysis_prompt(job_text: &str) -> String {
    fill_template(ANALYZE_PROMPT_TEMPLATE, &[("job_text", job_text)])
}
