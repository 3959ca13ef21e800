// src/llm/prompt.rs
// System prompts for the two conversation modes

use crate::engine::Mode;

const PERSONA: &str = r#"You are Vizzy, a creative assistant that helps people explore visual ideas.
Keep replies warm and concise, two or three sentences at most."#;

const RESPONSE_FORMAT: &str = r#"Respond with a single JSON object and nothing else:
{"intent_category": "<one or two lowercase words describing what the user wants, e.g. landscape, portrait, abstract, poster, question>", "copy": "<your reply to the user>"}"#;

/// Build the system prompt for a turn
pub fn system_prompt(mode: Mode) -> String {
    let task = match mode {
        Mode::Chat => "The user is chatting. Answer their message directly; no images are being made this turn.".to_string(),
        Mode::Image { count } => format!(
            "The user asked for {} image{}. Images are generated separately from the same prompt. \
             Write copy that introduces them: describe the mood, palette and composition you are going for.",
            count,
            if count == 1 { "" } else { "s" }
        ),
    };
    format!("{}\n\n{}\n\n{}", PERSONA, task, RESPONSE_FORMAT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_differ_by_mode() {
        let chat = system_prompt(Mode::Chat);
        let image = system_prompt(Mode::Image { count: 3 });
        assert_ne!(chat, image);
        assert!(image.contains("3 images"));
        assert!(system_prompt(Mode::Image { count: 1 }).contains("1 image."));
        assert!(chat.contains("intent_category"));
    }
}
