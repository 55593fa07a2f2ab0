use arboard::Clipboard;
use tracing::debug;

pub struct ClipboardService;

impl ClipboardService {
    /// Copies `text` to the system clipboard.
    pub fn copy(text: &str) -> Result<(), String> {
        let mut clipboard = Clipboard::new().map_err(|e| e.to_string())?;
        clipboard.set_text(text.to_string()).map_err(|e| e.to_string())?;
        debug!(chars = text.chars().count(), "copied to clipboard");
        Ok(())
    }
}
