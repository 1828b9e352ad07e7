/// Visible chat transcript
///
/// One entry per submission, pairing the user's text with either the workflow's
/// answer or the error that stopped it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub user: String,
    pub reply: String,
}

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    exchanges: Vec<Exchange>,
}

impl Transcript {
    pub fn push(&mut self, user: impl Into<String>, reply: impl Into<String>) {
        self.exchanges.push(Exchange {
            user: user.into(),
            reply: reply.into(),
        });
    }

    pub fn exchanges(&self) -> &[Exchange] {
        &self.exchanges
    }

    pub fn clear(&mut self) {
        self.exchanges.clear();
    }

    /// Numbered log of every exchange
    pub fn log(&self) -> String {
        if self.exchanges.is_empty() {
            return "No conversation yet".to_string();
        }

        self.exchanges
            .iter()
            .enumerate()
            .map(|(i, e)| format!("[Exchange {}]\nUser: {}\nAssistant: {}\n", i + 1, e.user, e.reply))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
