// Shared prompt fragments.
// Each pipeline that calls the generator defines its own prompts.rs alongside it;
// this file only holds the pieces they have in common.

/// Appended to every prompt whose completion goes through `json_recovery`.
pub const JSON_ONLY_INSTRUCTION: &str = "\
CRITICAL: Return ONLY a valid JSON object with NO markdown formatting, \
code blocks, or explanatory text.";

/// Instruction shared by every prompt that deals with missing information.
pub const NOT_AVAILABLE_INSTRUCTION: &str = "\
Use \"N/A\" for any missing information and keep arrays empty [] if no items are found. \
Do not make assumptions or infer information that is not explicitly stated.";
