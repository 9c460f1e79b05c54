//! Question answering over retrieved passages.

use tracing::debug;

use crate::error::Result;
use crate::models::config::RetrievalConfig;
use crate::services::prompts::rag_prompt;
use crate::services::{CompletionService, RetrievedPassage, Retriever};

/// Model response plus the passages it was grounded on.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub response: String,
    pub sources: String,
    pub passages: Vec<RetrievedPassage>,
}

impl Answer {
    /// Response followed by its sources, as shown to the user.
    pub fn to_markdown(&self) -> String {
        format!("{}\n\n*Sources:*\n{}", self.response, self.sources)
    }
}

/// Format passage origins as `[file, Page: n | file, Page: m]`.
pub fn format_sources(passages: &[RetrievedPassage]) -> String {
    let entries: Vec<String> = passages
        .iter()
        .map(|p| format!("{}, Page: {}", p.filename, p.page_number))
        .collect();
    format!("[{}]", entries.join(" | "))
}

/// Retrieve context for `question`, ask the model and attach sources.
pub async fn answer_question<R, C>(
    question: &str,
    retriever: &R,
    completion: &C,
    config: &RetrievalConfig,
) -> Result<Answer>
where
    R: Retriever,
    C: CompletionService,
{
    let passages = retriever.retrieve(question, config.top_k).await?;
    debug!("Retrieved {} passages", passages.len());

    let context = passages
        .iter()
        .map(|p| p.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    let response = completion
        .complete(&config.system_prompt, &rag_prompt(question, &context))
        .await?;

    Ok(Answer {
        response,
        sources: format_sources(&passages),
        passages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use std::sync::Mutex;

    struct FixedRetriever {
        requested_k: Mutex<Option<usize>>,
    }

    impl Retriever for FixedRetriever {
        async fn retrieve(&self, _query: &str, top_k: usize) -> std::result::Result<Vec<RetrievedPassage>, ServiceError> {
            *self.requested_k.lock().unwrap() = Some(top_k);
            Ok(vec![
                RetrievedPassage {
                    content: "Revenue grew 10%.".to_string(),
                    filename: "report.pdf".to_string(),
                    page_number: 2,
                },
                RetrievedPassage {
                    content: "Costs fell.".to_string(),
                    filename: "report.pdf".to_string(),
                    page_number: 5,
                },
            ])
        }
    }

    struct PromptEcho;

    impl CompletionService for PromptEcho {
        async fn complete(&self, _system_prompt: &str, prompt: &str) -> std::result::Result<String, ServiceError> {
            Ok(prompt.to_string())
        }
    }

    #[tokio::test]
    async fn test_answer_question() {
        let retriever = FixedRetriever {
            requested_k: Mutex::new(None),
        };
        let config = RetrievalConfig::default();

        let answer = answer_question("How did revenue change?", &retriever, &PromptEcho, &config)
            .await
            .unwrap();

        assert_eq!(*retriever.requested_k.lock().unwrap(), Some(15));
        assert!(answer.response.contains("Question: How did revenue change?"));
        assert!(answer.response.contains("Revenue grew 10%.\n\nCosts fell."));
        assert_eq!(answer.sources, "[report.pdf, Page: 2 | report.pdf, Page: 5]");
        assert!(answer.to_markdown().ends_with("*Sources:*\n[report.pdf, Page: 2 | report.pdf, Page: 5]"));
    }

    #[test]
    fn test_format_sources_empty() {
        assert_eq!(format_sources(&[]), "[]");
    }
}
