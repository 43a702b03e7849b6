/// Combine a transcript and the user's instruction into the single plain-text prompt sent
/// to the model.
pub fn summary_prompt(transcript: &str, instruction: &str) -> String {
    format!("Transcript:\n{transcript}\n\nInstruction: {instruction}")
}
