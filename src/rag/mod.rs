//! Retrieval and answer generation for question answering over a collection.
//!
//! The retriever embeds a question and pulls the top-k chunks from one
//! collection; the answer engine turns those chunks and the question into a
//! single constrained prompt and returns the model's response.

mod answer;
mod retriever;

pub use answer::{Answer, AnswerEngine};
pub use retriever::Retriever;
