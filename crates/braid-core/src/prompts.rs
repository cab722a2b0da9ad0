//! Prompt templates and response post-processing for the LLM calls the
//! pipeline makes: keyword extraction, graph construction, and final
//! answer synthesis.

/// Prompt the model to extract query keywords, one line, comma separated.
pub fn keyword_prompt(question: &str, max_keywords: usize) -> String {
    format!(
        "A question is provided below. Given the question, extract up to {max_keywords} \
         keywords from the text. Focus on extracting the keywords that can be used \
         to best look up answers to the question.\n\
         ---------------------\n\
         {question}\n\
         ---------------------\n\
         Provide keywords in the following comma-separated format: 'KEYWORDS: <keywords>'"
    )
}

/// Parse the keyword-extraction reply back into entity names.
///
/// Tolerates a missing `KEYWORDS:` prefix, stray quoting, and empty
/// entries. Each keyword is lowercased then capitalized to match the
/// entity naming used at graph construction time.
pub fn parse_keywords(response: &str) -> Vec<String> {
    let body = response
        .trim()
        .trim_start_matches("KEYWORDS:")
        .trim_start_matches("Keywords:")
        .trim();
    body.split(',')
        .map(|kw| kw.trim().trim_matches(|c| c == '\'' || c == '"').trim())
        .filter(|kw| !kw.is_empty())
        .map(|kw| capitalize(&kw.to_lowercase()))
        .collect()
}

/// Capitalize the first character of a phrase, leaving the rest intact.
pub fn capitalize(phrase: &str) -> String {
    let mut chars = phrase.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Prompt the model to extract entities and triplets from a document as
/// strict JSON, for graph construction.
pub fn extraction_prompt(text: &str) -> String {
    format!(
        "Extract the named entities and the relationships between them from the \
         text below. Respond with a single JSON object and nothing else, in this \
         exact shape:\n\
         {{\"entities\": [\"EntityA\", \"EntityB\"], \
         \"triplets\": [[\"EntityA\", \"relation\", \"EntityB\"]]}}\n\
         Keep entity names short noun phrases. Keep relations concise verb phrases.\n\
         ---------------------\n\
         {text}\n\
         ---------------------"
    )
}

/// Prompt the model to answer a question from retrieved context.
pub fn answer_prompt(context: &str, question: &str) -> String {
    format!(
        "Context information is provided below. It contains retrieved text chunks \
         and knowledge-graph relation paths of the form \
         'Entity -relation-> Entity'.\n\
         ---------------------\n\
         {context}\n\
         ---------------------\n\
         Given the context information and not prior knowledge, answer the \
         question: {question}"
    )
}

/// Render chunks for the answer prompt, numbered from one.
pub fn format_chunks(chunks: &[String]) -> String {
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| format!("Chunk{}: {}", i + 1, chunk))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render relation paths for the answer prompt, one per line.
pub fn format_paths(paths: &[String]) -> String {
    paths.join("\n")
}
