// Shared prompt fragments. Each module that calls the model keeps its own
// prompts.rs alongside it; this file holds the cross-cutting pieces.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every capability prompt that rewrites or summarises resume text.
pub const FAITHFULNESS_INSTRUCTION: &str = "\
    CRITICAL: Never invent skills, employers, dates, or metrics that are not present \
    in the text you were given. If something cannot be supported by the source, \
    say so instead of guessing.";
