/// Build the flashcard-generation prompt around a transcript
pub fn build_prompt(transcript: &str) -> String {
    format!(
        "You are a knowledgeable assistant that creates educational flashcards.\n\
         \n\
         From the following transcript, generate as many flashcards as possible \
         covering the key points. Output only the flashcards in the following format:\n\
         \n\
         Question: [Question]\n\
         Answer: [Answer]\n\
         \n\
         Do not include any introductions, conclusions, or comments. Output only \
         the flashcards, and do not enumerate them.\n\
         \n\
         Ensure that:\n\
         - The questions are clear.\n\
         - The answers are accurate and concise.\n\
         \n\
         Transcript:\n\
         \"\"\"\n\
         {}\n\
         \"\"\"\n",
        transcript
    )
}

/// Rough token estimate: one token per four characters. Close enough
/// to reject a transcript that clearly exceeds the context window.
pub fn estimate_tokens(text: &str) -> usize {
    (text.chars().count() + 3) / 4
}

/// Context window size for a model name, by family
pub fn context_limit(model_name: &str) -> usize {
    if model_name.contains("llama3.1") {
        128_000
    } else if model_name.contains("gpt-4") {
        8_192
    } else {
        4_096
    }
}
