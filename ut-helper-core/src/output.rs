// output pane - holds the generated text exactly as received

use tokio::sync::watch;

#[derive(Debug)]
pub struct OutputPane {
    text: watch::Sender<String>,
}

impl Default for OutputPane {
    fn default() -> Self {
        let (text, _rx) = watch::channel(String::new());
        Self { text }
    }
}

impl OutputPane {
    pub fn set(&self, text: &str) {
        self.text.send_replace(text.to_string());
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.text.subscribe()
    }
}
