// All LLM prompt constants for the tailoring workflow.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for job posting analysis.
pub const ANALYZE_SYSTEM: &str = "You are an expert job posting analyst. \
    Analyse postings so a candidate can optimise their résumé for them.";

/// Job analysis prompt template. Placeholders: `{job_text}`.
pub const ANALYZE_PROMPT_TEMPLATE: &str = r#"You are an expert job posting analyst. Analyse the job posting below and extract what a candidate needs in order to optimise their résumé for it.

## Job posting:
{job_text}

Return your analysis in exactly this format:

1. Role summary: [a short summary of the role]
2. Core requirements: [required skills, experience and qualifications, one per line]
3. Preferred qualifications: [nice-to-have skills, experience and qualifications, one per line]
4. Key keywords: [10-15 keywords a résumé for this role should contain]
5. Company values and culture: [what the company appears to value]
6. Résumé optimisation strategy: [concrete strategy and advice for tailoring a résumé to this posting]

Be thorough in every section, and include factors that matter for this kind of role even when the posting does not state them explicitly."#;

/// System prompt for résumé tailoring.
pub const TAILOR_SYSTEM: &str = "You are an expert résumé tailoring specialist. \
    Write the résumé that makes the candidate the strongest fit for the posting.";

/// Tailoring prompt template.
/// Placeholders: {job_title}, {job_text}, {analysis}, {resume_versions}, {emphasize},
///               {deemphasize}, {tone}, {tone_verbs}, {tone_avoid}, {length},
///               {length_target}, {factuality_instruction}
pub const TAILOR_PROMPT_TEMPLATE: &str = r#"You are an expert résumé tailoring specialist. Using the résumé versions below as source material, write a new résumé optimised for the job posting provided.

## Job posting: {job_title}
{job_text}

## Job posting analysis:
{analysis}

## Résumé versions:
{resume_versions}

## Customization settings:
- Skills/experience to emphasize: {emphasize}
- Skills/experience to de-emphasize: {deemphasize}
- Tone: {tone}
- Length: {length} ({length_target})

Follow these instructions:
1. Emphasize the skills, experience and achievements that match the posting's requirements.
2. Shorten or drop content with little relevance to the role.
3. Give the "emphasize" items above particular prominence.
4. Minimise the "de-emphasize" items, or replace them with more relevant material.
5. Write in the requested tone ({tone}). Prefer verbs such as: {tone_verbs}. Avoid: {tone_avoid}.
6. Keep the overall length {length}.
7. Follow the format and structure of the original résumé.
8. Reflect the key keywords and core requirements from the analysis.

{factuality_instruction}

The final résumé should present the candidate as the best possible fit for this specific posting. Return only the résumé text."#;

/// Section split prompt template. Placeholders: `{resume_text}`.
pub const SPLIT_PROMPT_TEMPLATE: &str = r#"Split the following résumé into its main sections.

{resume_text}

Return the sections as a JSON object with this EXACT schema (every key required, no extra keys):
{
  "professional_summary": "summary text...",
  "work_experience": [
    {"title": "Position", "company": "Company", "content": "details..."}
  ],
  "education": [
    {"degree": "Degree", "institution": "School", "content": "details..."}
  ],
  "skills": ["skill 1", "skill 2"],
  "projects": [
    {"name": "Project", "content": "details..."}
  ],
  "additional_sections": [
    {"title": "Section title", "content": "details..."}
  ]
}

Use empty strings or empty arrays for sections the résumé does not have.
Output the JSON object only."#;

/// System prompt for single-section revision.
pub const REVISE_SYSTEM: &str = "You are an expert résumé editor. \
    You revise one résumé section at a time according to the candidate's feedback.";

/// Section revision prompt template.
/// Placeholders: {section_label}, {section_text}, {feedback}, {job_text},
///               {job_analysis}, {factuality_instruction}
pub const REVISE_PROMPT_TEMPLATE: &str = r#"Below is the '{section_label}' section of a résumé:

{section_text}

The candidate gave this feedback on the section:

{feedback}

Related job posting:
{job_text}

Job posting analysis:
{job_analysis}

Rewrite this section to reflect the feedback. Keep the core information of the original section, adjusting content, wording and emphasis as the feedback asks.
Change only what the feedback mentions and keep everything else as close to the original as possible.

{factuality_instruction}

Return only the revised section content, with no heading and no commentary."#;

/// System prompt for rebuilding a résumé from its sections.
pub const RECONSTRUCT_SYSTEM: &str = "You are an expert résumé editor. \
    You assemble résumé sections into one polished document.";

/// Reconstruction prompt template. Placeholders: `{sections_json}`.
pub const RECONSTRUCT_PROMPT_TEMPLATE: &str = r#"Below are the sections of a résumé. Merge them naturally into one complete résumé.

{sections_json}

Keep every fact in the sections, order them conventionally (summary, experience, projects, education, skills, additional sections), and make transitions read smoothly.
Return only the résumé text."#;

/// Fills `{name}` placeholders in a single left-to-right pass.
///
/// Substituted values are never rescanned, so user text containing `{...}`
/// is inserted verbatim. Unknown placeholders are left as written.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (close, *v))
        });
        match replaced {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_replaces_known_keys() {
        let out = fill_template("Hi {name}, job: {job}.", &[("name", "Ada"), ("job", "Dev")]);
        assert_eq!(out, "Hi Ada, job: Dev.");
    }

    #[test]
    fn test_fill_template_does_not_rescan_values() {
        let out = fill_template("{a} / {b}", &[("a", "{b}"), ("b", "B")]);
        assert_eq!(out, "{b} / B");
    }

    #[test]
    fn test_fill_template_keeps_json_braces() {
        let out = fill_template(SPLIT_PROMPT_TEMPLATE, &[("resume_text", "RESUME")]);
        assert!(out.contains("RESUME"));
        assert!(out.contains(r#""professional_summary": "summary text...""#));
        assert!(out.contains("{\"title\": \"Position\""));
    }

    #[test]
    fn test_analyze_template_lists_six_sections() {
        for heading in [
            "1. Role summary",
            "2. Core requirements",
            "3. Preferred qualifications",
            "4. Key keywords",
            "5. Company values and culture",
            "6. Résumé optimisation strategy",
        ] {
            assert!(ANALYZE_PROMPT_TEMPLATE.contains(heading), "missing {heading}");
        }
    }
}
