//! Conversation session state
//!
//! Owned by the serving layer, consumed by the retrieval core: a bounded
//! chat history for prompt context, plus the text of the most recently
//! processed attachment, retained across turns so follow-up questions can
//! be answered by direct search without re-uploading the file.

use crate::config::SessionConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One user/assistant exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub user: String,
    pub assistant: String,
}

/// Text retained from the last successfully processed attachment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetainedFile {
    pub name: String,
    /// Extracted text, truncated to the configured cap
    pub text: String,
}

/// A conversation session
///
/// Only successful extractions update the retained file; a failed upload
/// leaves the previous one in place. `clear` drops both history and the
/// retained file (explicit reset, or page reload in the original flow).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    history: Vec<ChatTurn>,
    retained_file: Option<RetainedFile>,
    max_history_turns: usize,
    file_text_cap: usize,
}

impl Session {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            history: Vec::new(),
            retained_file: None,
            max_history_turns: config.max_history_turns,
            file_text_cap: config.file_text_cap,
        }
    }

    /// Append an exchange, keeping only the most recent turns
    pub fn record_turn(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.history.push(ChatTurn {
            user: user.into(),
            assistant: assistant.into(),
        });
        if self.history.len() > self.max_history_turns {
            let excess = self.history.len() - self.max_history_turns;
            self.history.drain(..excess);
        }
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// Retain an attachment's extracted text for later direct search,
    /// truncated to the configured cap (measured in characters)
    pub fn retain_file(&mut self, name: impl Into<String>, text: &str) {
        let capped = match text.char_indices().nth(self.file_text_cap) {
            Some((i, _)) => &text[..i],
            None => text,
        };
        self.retained_file = Some(RetainedFile {
            name: name.into(),
            text: capped.to_string(),
        });
    }

    pub fn retained_file(&self) -> Option<&RetainedFile> {
        self.retained_file.as_ref()
    }

    /// Drop history and retained file
    pub fn clear(&mut self) {
        self.history.clear();
        self.retained_file = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn session() -> Session {
        Session::new(&Config::default().session)
    }

    #[test]
    fn test_history_is_bounded() {
        let mut session = session();
        for i in 0..12 {
            session.record_turn(format!("pergunta {}", i), format!("resposta {}", i));
        }

        assert_eq!(session.history().len(), 5);
        assert_eq!(session.history()[0].user, "pergunta 7");
        assert_eq!(session.history()[4].user, "pergunta 11");
    }

    #[test]
    fn test_retained_file_truncated_to_cap() {
        let mut config = Config::default().session;
        config.file_text_cap = 10;
        let mut session = Session::new(&config);

        session.retain_file("contrato.pdf", "çççççççççççççççç");
        let retained = session.retained_file().unwrap();
        assert_eq!(retained.text.chars().count(), 10);
        assert_eq!(retained.name, "contrato.pdf");
    }

    #[test]
    fn test_short_text_not_truncated() {
        let mut session = session();
        session.retain_file("nota.pdf", "texto curto");
        assert_eq!(session.retained_file().unwrap().text, "texto curto");
    }

    #[test]
    fn test_new_file_replaces_previous() {
        let mut session = session();
        session.retain_file("a.pdf", "primeiro");
        session.retain_file("b.pdf", "segundo");

        let retained = session.retained_file().unwrap();
        assert_eq!(retained.name, "b.pdf");
        assert_eq!(retained.text, "segundo");
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut session = session();
        session.record_turn("oi", "olá");
        session.retain_file("doc.pdf", "conteúdo");

        session.clear();
        assert!(session.history().is_empty());
        assert!(session.retained_file().is_none());
    }
}
