use regex::Regex;

/// One question/answer pair destined for Anki
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
}

/// Split an LLM's free-form reply into flashcards.
///
/// The model is asked to emit `Question:` / `Answer:` blocks, but replies
/// in practice carry preamble ("Here are your flashcards:"), enumeration
/// ("1. Question: ..."), and multi-line answers. Everything before the
/// first `Question:` is discarded; a card is kept only when both fields
/// end up non-empty.
pub fn parse_flashcards(reply: &str) -> Vec<Flashcard> {
    // Leading "1." / "2)" / "-" list markers are tolerated on both labels
    let question_re = Regex::new(r"^(?:[-*]\s*)?(?:\d+[.)]\s*)?Question:\s*(.*)$").unwrap();
    let answer_re = Regex::new(r"^(?:[-*]\s*)?(?:\d+[.)]\s*)?Answer:\s*(.*)$").unwrap();

    let mut cards = Vec::new();
    let mut question: Option<String> = None;
    let mut answer_lines: Vec<String> = Vec::new();
    let mut collecting_answer = false;

    let mut flush = |question: &mut Option<String>, answer_lines: &mut Vec<String>| {
        if let Some(q) = question.take() {
            let answer = answer_lines.join("\n").trim().to_string();
            if !q.is_empty() && !answer.is_empty() {
                cards.push(Flashcard {
                    question: q,
                    answer,
                });
            }
        }
        answer_lines.clear();
    };

    for line in reply.lines() {
        let line = line.trim();
        if let Some(caps) = question_re.captures(line) {
            flush(&mut question, &mut answer_lines);
            question = Some(caps[1].trim().to_string());
            collecting_answer = false;
        } else if let Some(caps) = answer_re.captures(line) {
            // Answers before any question belong to discarded preamble
            if question.is_some() {
                answer_lines.push(caps[1].trim().to_string());
                collecting_answer = true;
            }
        } else if collecting_answer && !line.is_empty() {
            // Continuation line of a multi-line answer
            answer_lines.push(line.to_string());
        }
    }
    flush(&mut question, &mut answer_lines);

    cards
}
