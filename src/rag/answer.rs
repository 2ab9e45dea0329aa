//! Answer generation from retrieved transcript context.

use crate::config::{Credentials, Prompts};
use crate::error::{Result, SvarError};
use crate::openai::create_client;
use crate::vector_store::ScoredChunk;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Generates answers from a question and its retrieved context chunks.
///
/// The prompt constrains the model to the supplied context and a fixed
/// refusal sentence; generation runs at temperature zero so repeated
/// questions get repeatable answers.
pub struct AnswerEngine {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    prompts: Prompts,
}

impl AnswerEngine {
    /// Create a new answer engine.
    pub fn new(credentials: &Credentials, model: &str) -> Self {
        Self {
            client: create_client(credentials),
            model: model.to_string(),
            prompts: Prompts::default(),
        }
    }

    /// Set custom prompts.
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Build the user prompt for a question and its context chunks.
    fn compose_prompt(&self, question: &str, context: &[ScoredChunk]) -> String {
        let mut vars = HashMap::new();
        vars.insert("context".to_string(), join_context(context));
        vars.insert("question".to_string(), question.to_string());
        Prompts::render(&self.prompts.qa.user, &vars)
    }

    /// Answer a question from the given context chunks.
    ///
    /// Returns the model's text verbatim; an insufficient-context refusal is
    /// a normal answer, not an error.
    #[instrument(skip(self, context), fields(question = %question, chunks = context.len()))]
    pub async fn answer(&self, question: &str, context: &[ScoredChunk]) -> Result<Answer> {
        let user_prompt = self.compose_prompt(question, context);

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.prompts.qa.system.clone())
                .build()
                .map_err(|e| SvarError::Generation(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_prompt)
                .build()
                .map_err(|e| SvarError::Generation(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(0.0)
            .build()
            .map_err(|e| SvarError::Generation(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| SvarError::OpenAI(format!("Failed to generate answer: {}", e)))?;

        let text = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| SvarError::Generation("Empty response from model".to_string()))?
            .clone();

        debug!("Generated answer from {} context chunks", context.len());

        Ok(Answer {
            text,
            sources: context.to_vec(),
        })
    }
}

/// Join context chunk texts with blank-line separators.
fn join_context(chunks: &[ScoredChunk]) -> String {
    chunks
        .iter()
        .map(|c| c.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// A generated answer with the chunks it was grounded in.
#[derive(Debug, Clone)]
pub struct Answer {
    /// The generated answer text.
    pub text: String,
    /// Context chunks the answer was generated from.
    pub sources: Vec<ScoredChunk>,
}
