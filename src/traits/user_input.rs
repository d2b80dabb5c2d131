use anyhow::Result;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Response type for mock user input
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum MockResponse {
    Select(String),
    Text(String),
    Confirm(bool),
    /// Accept whatever default the prompt offers
    AcceptDefault,
}

/// A prompt recorded by the mock, with the default it was offered
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub struct AskedPrompt {
    pub message: String,
    pub default: Option<String>,
}

/// Trait for user input operations to enable testing with mocks
pub trait UserInput: Send + Sync {
    /// Display a selection prompt with options, starting on `cursor`
    fn select(&self, prompt: &str, options: Vec<String>, cursor: usize) -> Result<String>;

    /// Display a text input prompt
    fn text(&self, prompt: &str, default: Option<&str>) -> Result<String>;

    /// Display a confirmation prompt (yes/no)
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;
}

/// Real user input implementation using inquire crate
pub struct InquireUserInput;

impl UserInput for InquireUserInput {
    fn select(&self, prompt: &str, options: Vec<String>, cursor: usize) -> Result<String> {
        use inquire::Select;
        let answer = Select::new(prompt, options)
            .with_starting_cursor(cursor)
            .prompt()?;
        Ok(answer)
    }

    fn text(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        use inquire::Text;
        let mut text_prompt = Text::new(prompt);
        if let Some(default_val) = default {
            text_prompt = text_prompt.with_default(default_val);
        }
        let answer = text_prompt.prompt()?;
        Ok(answer)
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        use inquire::Confirm;
        let answer = Confirm::new(prompt)
            .with_default(default)
            .prompt()?;
        Ok(answer)
    }
}

/// Mock user input implementation for testing
#[allow(dead_code)]
pub struct MockUserInput {
    responses: Mutex<VecDeque<MockResponse>>,
    asked: Mutex<Vec<AskedPrompt>>,
}

#[allow(dead_code)]
impl MockUserInput {
    /// Create new mock with no pre-configured responses
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Create mock with pre-configured responses
    pub fn with_responses(responses: Vec<MockResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Prompts shown so far, in order
    pub fn asked(&self) -> Vec<AskedPrompt> {
        self.asked.lock().unwrap().clone()
    }

    /// Messages of the prompts shown so far
    pub fn asked_messages(&self) -> Vec<String> {
        self.asked().into_iter().map(|p| p.message).collect()
    }

    /// Number of queued responses not yet consumed
    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }

    fn record(&self, prompt: &str, default: Option<String>) {
        self.asked.lock().unwrap().push(AskedPrompt {
            message: prompt.to_string(),
            default,
        });
    }

    /// Get the next response from the queue
    fn next_response(&self) -> Result<MockResponse> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("No more mock responses available"))
    }
}

impl Default for MockUserInput {
    fn default() -> Self {
        Self::new()
    }
}

impl UserInput for MockUserInput {
    fn select(&self, prompt: &str, options: Vec<String>, cursor: usize) -> Result<String> {
        self.record(prompt, options.get(cursor).cloned());
        match self.next_response()? {
            MockResponse::Select(answer) => {
                // Verify the answer is in the options
                if options.contains(&answer) {
                    Ok(answer)
                } else {
                    anyhow::bail!(
                        "Mock response '{}' is not in the provided options: {:?}",
                        answer,
                        options
                    )
                }
            }
            MockResponse::AcceptDefault => options
                .get(cursor)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("No option at cursor {} for '{}'", cursor, prompt)),
            _ => anyhow::bail!("Expected Select response for '{}' but got a different type", prompt),
        }
    }

    fn text(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        self.record(prompt, default.map(str::to_string));
        match self.next_response()? {
            MockResponse::Text(answer) => Ok(answer),
            MockResponse::AcceptDefault => Ok(default.unwrap_or_default().to_string()),
            _ => anyhow::bail!("Expected Text response for '{}' but got a different type", prompt),
        }
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        self.record(prompt, Some(default.to_string()));
        match self.next_response()? {
            MockResponse::Confirm(answer) => Ok(answer),
            MockResponse::AcceptDefault => Ok(default),
            _ => anyhow::bail!("Expected Confirm response for '{}' but got a different type", prompt),
        }
    }
}
