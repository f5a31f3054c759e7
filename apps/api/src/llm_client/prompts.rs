// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction appended to every prompt that rewrites résumé content.
pub const FACTUALITY_INSTRUCTION: &str = "\
    Never invent employers, titles, dates, degrees, metrics or skills that do not \
    appear in the source material. Rephrase, reorder and condense freely, but every \
    claim must be traceable to the text you were given.";

/// Rendered in place of an analysis that has not been produced yet.
pub const MISSING_ANALYSIS_PLACEHOLDER: &str = "No analysis has been run for this posting yet.";
