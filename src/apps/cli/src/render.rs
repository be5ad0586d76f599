//! Plain-text rendering of chat events

use paddock_core::{ChatEvent, Role, Turn};

const BOT_LABEL: &str = "PaddockPal: ";
const NEW_CHAT_BANNER: &str = "--- new chat ---\n";

/// Turns the event feed into terminal output.
///
/// Streamed text is printed incrementally; the committed bot turn only adds a
/// line break when it matches what was already shown. The first history reset
/// is the session's initial history and gets no banner.
#[derive(Debug, Default)]
pub struct Renderer {
    streamed: String,
    started: bool,
}

impl Renderer {
    pub fn render(&mut self, event: &ChatEvent) -> String {
        match event {
            ChatEvent::Typing(text) => self.render_typing(text),
            ChatEvent::TurnAppended(turn) if turn.role == Role::Bot => self.render_bot_turn(turn),
            ChatEvent::HistoryReset(history) => {
                self.streamed.clear();
                let banner = if self.started { NEW_CHAT_BANNER } else { "" };
                self.started = true;
                format!("{}{}", banner, render_history(history))
            }
            _ => String::new(),
        }
    }

    fn render_typing(&mut self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        let output = match text.strip_prefix(self.streamed.as_str()) {
            Some(suffix) if !self.streamed.is_empty() => suffix.to_string(),
            _ => format!("{}{}", BOT_LABEL, text),
        };
        self.streamed = text.to_string();
        output
    }

    fn render_bot_turn(&mut self, turn: &Turn) -> String {
        let streamed = std::mem::take(&mut self.streamed);
        if streamed.is_empty() {
            return format!("{}{}\n", BOT_LABEL, turn.content);
        }
        if streamed == turn.content {
            "\n".to_string()
        } else {
            format!("\n{}{}\n", BOT_LABEL, turn.content)
        }
    }
}

fn render_history(history: &[Turn]) -> String {
    history
        .iter()
        .map(|turn| match turn.role {
            Role::Bot => format!("{}{}\n", BOT_LABEL, turn.content),
            Role::User => format!("> {}\n", turn.content),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use paddock_core::{ChatSession, ClientConfig, HttpRelayClient, WELCOME_MESSAGE};
    use tokio::sync::mpsc;

    fn render_all(events: &[ChatEvent]) -> String {
        let mut renderer = Renderer::default();
        events.iter().map(|event| renderer.render(event)).collect()
    }

    #[test]
    fn prints_only_new_suffix_while_streaming() {
        let output = render_all(&[
            ChatEvent::TurnAppended(Turn::user("Who won Monaco?")),
            ChatEvent::Typing("Charles".to_string()),
            ChatEvent::Typing("Charles Leclerc".to_string()),
            ChatEvent::TurnAppended(Turn::bot("Charles Leclerc")),
            ChatEvent::Typing(String::new()),
        ]);
        assert_eq!(output, "PaddockPal: Charles Leclerc\n");
    }

    #[test]
    fn error_after_partial_stream_is_printed_on_its_own_line() {
        let output = render_all(&[
            ChatEvent::Typing("Half".to_string()),
            ChatEvent::TurnAppended(Turn::bot("Error: Stream read error: reset")),
        ]);
        assert_eq!(output, "PaddockPal: Half\nPaddockPal: Error: Stream read error: reset\n");
    }

    #[test]
    fn turn_without_streamed_text_is_printed_whole() {
        let output = render_all(&[ChatEvent::TurnAppended(Turn::bot(
            "Error: API request failed with status 500",
        ))]);
        assert_eq!(output, "PaddockPal: Error: API request failed with status 500\n");
    }

    #[test]
    fn new_chat_prints_banner_and_welcome() {
        let output = render_all(&[
            ChatEvent::HistoryReset(vec![Turn::bot("Welcome!")]),
            ChatEvent::HistoryReset(vec![Turn::bot("Welcome!")]),
        ]);
        assert_eq!(output, "PaddockPal: Welcome!\n--- new chat ---\nPaddockPal: Welcome!\n");
    }

    #[test]
    fn startup_prints_welcome_once() {
        let config = ClientConfig::default();
        let client = HttpRelayClient::new(&config).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _session = ChatSession::new(client, tx, config.model.clone());

        let mut renderer = Renderer::default();
        let mut output = String::new();
        while let Ok(event) = rx.try_recv() {
            output.push_str(&renderer.render(&event));
        }
        assert_eq!(output, format!("PaddockPal: {}\n", WELCOME_MESSAGE));
    }
}
