// Shared prompt fragments used across extraction tasks.

/// System prompt attached to every completion request, asking for JSON-only output.
/// The tolerant JSON extractor still copes when the model ignores it.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
