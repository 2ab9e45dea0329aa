//! Interactive chat command: ingest once, then answer questions until "exit".

use crate::cli::{preflight, Output};
use crate::config::{Prompts, Settings};
use crate::error::Result;
use crate::orchestrator::Orchestrator;
use crate::rag::{AnswerEngine, Retriever};
use console::style;
use std::io::{self, BufRead, Write};

/// Run the interactive chat command.
pub async fn run_chat(
    input: &str,
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

    // Ingest once; questions are only accepted after this completes.
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
    Output::success(&format!(
        "Video indexed ({} chunks). Ask away!",
        ingest.chunks_indexed
    ));

    let guard = orchestrator.guard(ingest.collection_id.clone());
    let retriever =
        Retriever::new(orchestrator.store(), orchestrator.embedder()).with_top_k(top_k);
    let engine = AnswerEngine::new(&credentials, &model).with_prompts(prompts);

    println!(
        "{}\n",
        style("Type your questions, or 'exit' to quit.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // stdin closed
            break;
        }

        let question = line.trim();

        if question.is_empty() {
            continue;
        }

        if question.eq_ignore_ascii_case("exit") {
            break;
        }

        let spinner = Output::spinner("Thinking...");
        let answer = async {
            let chunks = retriever.retrieve(&ingest.collection_id, question).await?;
            engine.answer(question, &chunks).await
        }
        .await;
        spinner.finish_and_clear();

        match answer {
            Ok(answer) => {
                println!("\n{} {}\n", style("Svar:").cyan().bold(), answer.text);
            }
            Err(e) => {
                Output::error(&format!("Failed to generate answer: {}", e));
            }
        }
    }

    if keep {
        guard.keep();
        Output::info(&format!(
            "Collection kept: {}. Remove it later with 'svar drop'.",
            ingest.collection_id
        ));
    } else {
        guard.release().await?;
        Output::info("Session ended; collection removed.");
    }

    Ok(())
}
