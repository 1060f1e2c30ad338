use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

/// System prompt for model-assisted intent classification.
pub fn intent_system() -> String {
    format!(
        "You route requests for a resume coaching service to the specialist \
         capabilities that should handle them, in the order they should run. {JSON_ONLY_SYSTEM}"
    )
}

/// Intent prompt template. Replace `{capabilities}`, `{history}` and `{input}`.
pub const INTENT_PROMPT_TEMPLATE: &str = r#"Available capabilities: {capabilities}

Conversation so far: {history}

User request:
"""
{input}
"""

Return a JSON array of capability names to run, in order, e.g. ["ResumeCriticAgent"].
Use only names from the list above."#;
