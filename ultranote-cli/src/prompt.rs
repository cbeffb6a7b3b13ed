//! Prompt assembly from arguments, files and stdin.

/// Join positional words and optional file text into one prompt.
///
/// File text goes after the typed prompt, separated by a blank line. Returns
/// `None` when neither source provided anything, so the caller can fall back
/// to stdin.
pub fn compose(words: &[String], file_text: Option<&str>) -> Option<String> {
    let typed = words.join(" ");
    let file_text = file_text.map(str::trim).filter(|t| !t.is_empty());

    match (typed.trim().is_empty(), file_text) {
        (true, None) => None,
        (true, Some(text)) => Some(text.to_string()),
        (false, None) => Some(typed),
        (false, Some(text)) => Some(format!("{typed}\n\n{text}")),
    }
}
