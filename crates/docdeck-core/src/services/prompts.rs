//! Prompt templates sent to the language-model collaborators.

/// Default system prompt for answers and table summaries.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant. Please answer the following questions to the best of your ability.";

/// Answer prompt over retrieved document context.
pub fn rag_prompt(question: &str, context: &str) -> String {
    format!(
        "You are given a question and context.\n\
         Go through the whole context once and then answer the question.\n\
         The context is from a document or presentation.\n\
         Your task is to find the answer to the query from the context.\n\
         Your answers should revolve around the provided context.\n\
         If the user greets you in their question, start your answer with a greeting as well.\n\
         Question: {question}\n\
         Context: \n\n {context}\n\n\
         Answer:\n"
    )
}

/// Summary prompt for a table given as HTML-like markup.
pub fn table_summary_prompt(table_markup: &str) -> String {
    format!(
        "Analyze the table provided in the context below. Summarize the key insights, \
         trends, and significant points that can be extracted from the data.\n\n\
         Context:\n{table_markup}\n\n\
         Summary and Key Points:\n"
    )
}

/// Instructions for describing a batch of images in one response.
pub fn caption_instructions(delimiter: &str) -> String {
    format!(
        "Describe each image with clear, precise sentences. Start with 'The image shows' \
         and detail the main subject and key features. Use formal language, avoid opinions, \
         and keep a neutral tone. Separate each description with '{delimiter}'."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rag_prompt_embeds_question_and_context() {
        let prompt = rag_prompt("What is revenue?", "Revenue grew 10%.");
        assert!(prompt.contains("Question: What is revenue?"));
        assert!(prompt.contains("Revenue grew 10%."));
        assert!(prompt.trim_end().ends_with("Answer:"));
    }

    #[test]
    fn test_caption_instructions_name_delimiter() {
        assert!(caption_instructions("###").contains("'###'"));
    }
}
