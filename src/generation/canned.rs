//! Canned replies for small talk
//!
//! Greetings and pleasantries get a fixed reply without touching the
//! embedding API or the index.

/// Return a canned reply if the message is common small talk
pub fn check_common_question(message: &str) -> Option<&'static str> {
    let normalized = message
        .trim()
        .trim_end_matches(['!', '.', '?'])
        .to_lowercase();

    match normalized.as_str() {
        "hi" | "hello" | "hey" | "good morning" | "good afternoon" | "good evening" => {
            Some("Hello! I'm a medical information assistant. Ask me a question about the documents I've been given.")
        }
        "how are you" | "how are you doing" => {
            Some("I'm doing well, thank you! How can I help you with your medical questions?")
        }
        "thanks" | "thank you" | "thank you so much" => {
            Some("You're welcome! Feel free to ask if you have more questions.")
        }
        "bye" | "goodbye" | "see you" | "see you later" => {
            Some("Goodbye! Take care of your health.")
        }
        "who are you" | "what are you" | "what can you do" => {
            Some("I'm a chatbot that answers questions from a library of medical documents. Ask me about a condition, symptom, or treatment.")
        }
        _ => None,
    }
}
