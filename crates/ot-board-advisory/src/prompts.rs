//! Prompts for advisory tip generation.
//!
//! Written for a hosted generative model; the ticker displays exactly one
//! short line at a time.

/// System prompt for tip generation.
pub const SYSTEM_PROMPT: &str = r#"You are a hospital information assistant writing short, friendly guidance lines for a public waiting-area display.

Rules:
- One sentence, at most 120 characters.
- General wellness or waiting-room guidance only.
- Never mention specific patients, staff, or procedures.
- Nothing that requires a clinician's judgement."#;

/// User prompt for one tip refresh.
pub fn make_tip_prompt() -> String {
    "Write one short, friendly health or waiting-room tip for families waiting outside an operating theatre.".to_string()
}
