//! Console messenger for the demo binary.

use async_trait::async_trait;
use tokio::io::{AsyncWriteExt, Stdout};
use tokio::sync::Mutex;

use crate::domain::dialog::OutboundMessage;
use crate::ports::{DeliveryError, Messenger};

/// Renders a message as plain text, keyboard rows as `[a] [b]` lines.
pub fn render(message: &OutboundMessage) -> String {
    let mut out = format!("-> {}: {}", message.chat, message.text);
    if let Some(keyboard) = &message.keyboard {
        for row in &keyboard.rows {
            let buttons: Vec<String> = row.iter().map(|c| format!("[{}]", c)).collect();
            out.push_str("\n   ");
            out.push_str(&buttons.join(" "));
        }
    }
    out
}

/// Writes every outbound message to stdout.
pub struct ConsoleMessenger {
    stdout: Mutex<Stdout>,
}

impl ConsoleMessenger {
    pub fn new() -> Self {
        Self {
            stdout: Mutex::new(tokio::io::stdout()),
        }
    }
}

impl Default for ConsoleMessenger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Messenger for ConsoleMessenger {
    async fn send(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        let mut line = render(message);
        line.push('\n');
        let mut stdout = self.stdout.lock().await;
        stdout
            .write_all(line.as_bytes())
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;
        stdout
            .flush()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dialog::{Keyboard, TextStyle};
    use crate::domain::foundation::ChatId;

    #[test]
    fn renders_keyboard_rows() {
        let message = OutboundMessage {
            chat: ChatId::new(7),
            text: "Pick one".into(),
            style: TextStyle::Plain,
            keyboard: Some(Keyboard::from_captions(["A", "B", "C"], 2)),
        };

        assert_eq!(render(&message), "-> 7: Pick one\n   [A] [B]\n   [C]");
    }
}
