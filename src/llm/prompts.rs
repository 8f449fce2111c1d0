// src/llm/prompts.rs
// Prompt templates for the judgment calls. Each asks for a machine-checkable
// reply shape: bare yes/no, a bare number, or a single JSON object.

pub fn needs_recall_prompt(query: &str) -> String {
    format!(
        "Given this message: '{query}'\n\
         Would answering it benefit from remembering earlier facts or \
         preferences the user has shared? Reply 'yes' or 'no'."
    )
}

pub fn confirm_relevance_prompt(memory: &str, query: &str) -> String {
    format!(
        "Memory: '{memory}'\n\
         Question: '{query}'\n\
         Is this memory directly relevant to answering the question? \
         Reply 'yes' or 'no'."
    )
}

pub fn should_remember_prompt(content: &str) -> String {
    format!(
        "A user said: '{content}'\n\
         Does this contain a lasting personal fact or preference worth \
         remembering in future conversations? Reply 'yes' or 'no'."
    )
}

pub fn should_search_prompt(query: &str) -> String {
    format!(
        "Given this question: '{query}'\n\
         Does it need a web search for current information? Reply 'yes' or 'no'."
    )
}

pub fn classify_prompt(content: &str) -> String {
    format!(
        "Classify this user statement: '{content}'\n\
         Reply with exactly one JSON object, no other text:\n\
         {{\"type\": \"preference\" or \"fact\", \"importance\": 1 to 5}}"
    )
}

pub fn score_prompt(query: &str, memory: &str) -> String {
    format!(
        "Question: '{query}'\n\
         Memory: '{memory}'\n\
         How relevant is the memory to the question? Reply with a single \
         number between 0.0 and 1.0, nothing else."
    )
}

pub fn summarize_prompt(memories: &[String], query: &str) -> String {
    let listed = memories
        .iter()
        .map(|m| format!("- {m}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "The user asked: '{query}'\n\
         These remembered statements are relevant:\n{listed}\n\
         Compress them into one short natural sentence of background \
         context. Reply with that sentence only."
    )
}
