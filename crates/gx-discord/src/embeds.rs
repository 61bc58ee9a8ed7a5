//! Embed construction and text shaping
//!
//! Discord embeds cap descriptions at 4096 characters; responses are
//! chunked below that and overall output is bounded so a runaway
//! completion cannot produce dozens of messages.

use serenity::all::{Colour, CreateEmbed};

use gx_core::ChatParameters;

/// Maximum characters per response chunk
pub const CHUNK_TEXT_SIZE: usize = 3500;
/// Overall response cap before truncation
const RESPONSE_TEXT_LIMIT: usize = 20000;
/// Reasoning trace cap before truncation
const REASONING_TEXT_LIMIT: usize = 3500;
/// Error description cap
const ERROR_TEXT_LIMIT: usize = 4000;
/// Prompt echo cap in the parameter embed
const PROMPT_ECHO_LIMIT: usize = 2000;
/// System prompt echo cap in the parameter embed
const SYSTEM_ECHO_LIMIT: usize = 500;

/// Split a string into chunks of at most `chunk_size` characters
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for c in text.chars() {
        current.push(c);
        count += 1;
        if count == chunk_size {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Truncate text to `max_chars` characters, appending an ellipsis when
/// anything was cut
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => format!("{}...", &text[..index]),
        None => text.to_string(),
    }
}

fn cap_chars(text: &str, max_chars: usize) -> Option<&str> {
    text.char_indices().nth(max_chars).map(|(index, _)| &text[..index])
}

/// Embed echoing the parameters of a freshly started conversation
pub fn started_embed(prompt: &str, params: &ChatParameters) -> CreateEmbed {
    let mut description = format!("**Prompt:** {}\n", truncate_text(prompt, PROMPT_ECHO_LIMIT));
    description.push_str(&format!("**Model:** {}\n", params.model));
    if let Some(system) = &params.system {
        description.push_str(&format!(
            "**System:** {}\n",
            truncate_text(system, SYSTEM_ECHO_LIMIT)
        ));
    }
    description.push_str(&format!("**Max Tokens:** {}\n", params.max_tokens));
    if let Some(temperature) = params.temperature {
        description.push_str(&format!("**Temperature:** {temperature}\n"));
    }
    if let Some(top_p) = params.top_p {
        description.push_str(&format!("**Top P:** {top_p}\n"));
    }
    if let Some(frequency_penalty) = params.frequency_penalty {
        description.push_str(&format!("**Frequency Penalty:** {frequency_penalty}\n"));
    }
    if let Some(presence_penalty) = params.presence_penalty {
        description.push_str(&format!("**Presence Penalty:** {presence_penalty}\n"));
    }

    CreateEmbed::new()
        .title("Conversation Started")
        .description(description)
        .colour(Colour::DARK_GREEN)
}

/// Spoilered embed for the model's reasoning trace, when present
pub fn reasoning_embed(reasoning: &str) -> Option<CreateEmbed> {
    if reasoning.is_empty() {
        return None;
    }

    let text = match cap_chars(reasoning, REASONING_TEXT_LIMIT - 50) {
        Some(capped) => format!("{capped}\n\n... [reasoning truncated]"),
        None => reasoning.to_string(),
    };

    Some(
        CreateEmbed::new()
            .title("Reasoning")
            .description(format!("||{text}||"))
            .colour(Colour::LIGHT_GREY),
    )
}

/// Response text as one or more embeds, chunked for the embed limit
pub fn response_embeds(response_text: &str) -> Vec<CreateEmbed> {
    let text = match cap_chars(response_text, RESPONSE_TEXT_LIMIT - 500) {
        Some(capped) => format!("{capped}\n\n... [Response truncated due to length]"),
        None => response_text.to_string(),
    };

    chunk_text(&text, CHUNK_TEXT_SIZE)
        .into_iter()
        .enumerate()
        .map(|(index, chunk)| {
            let title = if index == 0 {
                "Response".to_string()
            } else {
                format!("Response (Part {})", index + 1)
            };
            CreateEmbed::new()
                .title(title)
                .description(chunk)
                .colour(Colour::DARK_TEAL)
        })
        .collect()
}

/// Red error embed with a bounded description
pub fn error_embed(description: &str) -> CreateEmbed {
    let description = match cap_chars(description, ERROR_TEXT_LIMIT) {
        Some(capped) => format!("{capped}\n\n... (error message truncated)"),
        None => description.to_string(),
    };

    CreateEmbed::new()
        .title("Error")
        .description(description)
        .colour(Colour::RED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_text_short() {
        assert_eq!(chunk_text("hello", 10), vec!["hello"]);
    }

    #[test]
    fn test_chunk_text_exact_boundaries() {
        let chunks = chunk_text("abcdef", 3);
        assert_eq!(chunks, vec!["abc", "def"]);

        let chunks = chunk_text("abcdefg", 3);
        assert_eq!(chunks, vec!["abc", "def", "g"]);
    }

    #[test]
    fn test_chunk_text_empty() {
        assert!(chunk_text("", 10).is_empty());
    }

    #[test]
    fn test_chunk_text_multibyte() {
        // Chunking counts characters, not bytes.
        let text = "héllo wörld".repeat(400);
        let chunks = chunk_text(&text, CHUNK_TEXT_SIZE);
        assert_eq!(chunks[0].chars().count(), CHUNK_TEXT_SIZE);
        let total: usize = chunks.iter().map(|chunk| chunk.chars().count()).sum();
        assert_eq!(total, text.chars().count());
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("exactly ten", 11), "exactly ten");
        assert_eq!(truncate_text("much too long", 4), "much...");
    }

    #[test]
    fn test_truncate_text_multibyte() {
        assert_eq!(truncate_text("日本語テキスト", 3), "日本語...");
    }

    #[test]
    fn test_response_embeds_chunking() {
        let embeds = response_embeds(&"a".repeat(CHUNK_TEXT_SIZE + 1));
        assert_eq!(embeds.len(), 2);
    }

    #[test]
    fn test_response_embeds_single() {
        let embeds = response_embeds("fine");
        assert_eq!(embeds.len(), 1);
    }

    #[test]
    fn test_reasoning_embed_empty() {
        assert!(reasoning_embed("").is_none());
        assert!(reasoning_embed("because").is_some());
    }
}
