//! Application services - Wrappers around the external services

pub mod generation_service;
pub mod search_service;

pub use generation_service::GenerationService;
pub use search_service::SearchService;

/// Characters of user input repeated in log lines
const PREVIEW_CHARS: usize = 50;

/// Shortened user input for log lines
pub(crate) fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
