//! Prompt templates for Svar.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The fixed sentence the model is instructed to emit when the retrieved
/// context cannot answer the question.
pub const REFUSAL_SENTENCE: &str =
    "The provided video context does not contain enough information to answer this question.";

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub qa: QaPrompts,
}


/// Prompts for question answering over retrieved transcript context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QaPrompts {
    pub system: String,
    pub user: String,
}

impl Default for QaPrompts {
    fn default() -> Self {
        Self {
            system: format!(
                r#"You are an expert AI assistant.

Use ONLY the information provided in the CONTEXT to answer the QUESTION.
Do NOT use prior knowledge or make assumptions.

INSTRUCTIONS:
- Answer clearly and concisely.
- If the answer is explicitly stated in the context, quote or paraphrase it accurately.
- If the context does NOT contain enough information to answer the question, say:
"{}"
- Do NOT hallucinate or infer beyond the context.
- If the question is ambiguous, ask for clarification instead of guessing.
- Prefer bullet points or step-by-step explanations when appropriate."#,
                REFUSAL_SENTENCE
            ),

            user: r#"CONTEXT:
{{context}}

QUESTION:
{{question}}"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with an optional custom directory.
    pub fn load(custom_dir: Option<&str>) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            // Load QA prompts if file exists
            let qa_path = custom_path.join("qa.toml");
            if qa_path.exists() {
                let content = std::fs::read_to_string(&qa_path)?;
                prompts.qa = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(prompts.qa.system.contains(REFUSAL_SENTENCE));
        assert!(prompts.qa.user.contains("{{context}}"));
        assert!(prompts.qa.user.contains("{{question}}"));
    }

    #[test]
    fn test_render_template() {
        let template = "CONTEXT:\n{{context}}\n\nQUESTION:\n{{question}}";
        let mut vars = std::collections::HashMap::new();
        vars.insert("context".to_string(), "some passage".to_string());
        vars.insert("question".to_string(), "what is it?".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "CONTEXT:\nsome passage\n\nQUESTION:\nwhat is it?");
    }
}
