use std::sync::Mutex;

/// Message captured by [`MockOutput`]
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub enum OutputMessage {
    Success(String),
    Error(String),
    Warning(String),
    Info(String),
    Section(String),
    KeyValue(String, String),
    Dimmed(String),
    Banner(String),
}

/// Everything shown to the operator outside of prompts
pub trait Output: Send + Sync {
    fn success(&self, message: &str);

    fn error(&self, message: &str);

    /// Validation message for a rejected answer
    fn warning(&self, message: &str);

    fn info(&self, message: &str);

    /// Heading of one domain in the summary
    fn section(&self, title: &str);

    /// Summary row for one resolved value
    fn key_value(&self, key: &str, value: &str);

    fn dimmed(&self, message: &str);

    /// Generator title, printed once per command
    fn banner(&self, title: &str);
}

/// Output styled for a terminal, see [`crate::output`]
pub struct TerminalOutput;

impl Output for TerminalOutput {
    fn success(&self, message: &str) {
        crate::output::success(message);
    }

    fn error(&self, message: &str) {
        crate::output::error(message);
    }

    fn warning(&self, message: &str) {
        crate::output::warning(message);
    }

    fn info(&self, message: &str) {
        crate::output::info(message);
    }

    fn section(&self, title: &str) {
        crate::output::section(title);
    }

    fn key_value(&self, key: &str, value: &str) {
        crate::output::key_value(key, value);
    }

    fn dimmed(&self, message: &str) {
        crate::output::dimmed(message);
    }

    fn banner(&self, title: &str) {
        crate::output::banner(title, env!("CARGO_PKG_VERSION"));
    }
}

/// Output that records every message for assertions
#[allow(dead_code)]
#[derive(Default)]
pub struct MockOutput {
    messages: Mutex<Vec<OutputMessage>>,
}

#[allow(dead_code)]
impl MockOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_messages(&self) -> Vec<OutputMessage> {
        self.messages.lock().unwrap().clone()
    }

    pub fn contains_message(&self, message: &OutputMessage) -> bool {
        self.messages.lock().unwrap().contains(message)
    }

    pub fn get_warnings(&self) -> Vec<String> {
        self.texts(|m| match m {
            OutputMessage::Warning(text) => Some(text),
            _ => None,
        })
    }

    pub fn get_errors(&self) -> Vec<String> {
        self.texts(|m| match m {
            OutputMessage::Error(text) => Some(text),
            _ => None,
        })
    }

    pub fn has_success(&self) -> bool {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .any(|m| matches!(m, OutputMessage::Success(_)))
    }

    fn texts(&self, pick: impl Fn(&OutputMessage) -> Option<&String>) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter_map(|m| pick(m).cloned())
            .collect()
    }

    fn push(&self, message: OutputMessage) {
        self.messages.lock().unwrap().push(message);
    }
}

impl Output for MockOutput {
    fn success(&self, message: &str) {
        self.push(OutputMessage::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.push(OutputMessage::Error(message.to_string()));
    }

    fn warning(&self, message: &str) {
        self.push(OutputMessage::Warning(message.to_string()));
    }

    fn info(&self, message: &str) {
        self.push(OutputMessage::Info(message.to_string()));
    }

    fn section(&self, title: &str) {
        self.push(OutputMessage::Section(title.to_string()));
    }

    fn key_value(&self, key: &str, value: &str) {
        self.push(OutputMessage::KeyValue(key.to_string(), value.to_string()));
    }

    fn dimmed(&self, message: &str) {
        self.push(OutputMessage::Dimmed(message.to_string()));
    }

    fn banner(&self, title: &str) {
        self.push(OutputMessage::Banner(title.to_string()));
    }
}
