//! Ask command: ingest a video and answer a single question.

use crate::cli::{preflight, Output};
use crate::config::{Prompts, Settings};
use crate::error::Result;
use crate::orchestrator::Orchestrator;
use crate::rag::{AnswerEngine, Retriever};

/// Run the ask command.
pub async fn run_ask(
    input: &str,
    question: &str,
    top_k: Option<usize>,
    model: Option<String>,
    keep: bool,
    settings: Settings,
) -> Result<()> {
    let credentials = match preflight::credentials() {
        Ok(c) => c,
        Err(e) => {
            Output::error(&format!("{}", e));
            Output::info("Run 'svar doctor' for detailed diagnostics.");
            return Err(e);
        }
    };

    let model = model.unwrap_or_else(|| settings.generation.model.clone());
    let top_k = top_k.unwrap_or(settings.retrieval.top_k);
    let prompts = Prompts::load(settings.prompts.custom_dir.as_deref())?;

    let orchestrator = Orchestrator::new(settings, credentials.clone())?;

    let spinner = Output::spinner("Fetching transcript and indexing...");
    let ingest = match orchestrator.ingest(input).await {
        Ok(result) => {
            spinner.finish_and_clear();
            result
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to process video: {}", e));
            return Err(e);
        }
    };

    let guard = orchestrator.guard(ingest.collection_id.clone());
    let retriever =
        Retriever::new(orchestrator.store(), orchestrator.embedder()).with_top_k(top_k);
    let engine = AnswerEngine::new(&credentials, &model).with_prompts(prompts);

    let spinner = Output::spinner("Thinking...");
    let answer = async {
        let chunks = retriever.retrieve(&ingest.collection_id, question).await?;
        engine.answer(question, &chunks).await
    }
    .await;
    spinner.finish_and_clear();

    let outcome = match answer {
        Ok(answer) => {
            println!("\n{}\n", answer.text);

            if !answer.sources.is_empty() {
                Output::header("Sources");
                for source in &answer.sources {
                    Output::source(source.order, source.score, &source.content);
                }
            }
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Failed to generate answer: {}", e));
            Err(e)
        }
    };

    if keep {
        guard.keep();
        Output::info(&format!("Collection kept: {}", ingest.collection_id));
    } else {
        guard.release().await?;
    }

    outcome
}
