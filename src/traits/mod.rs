//! Process boundaries behind traits, each with a real and a mock implementation.

pub mod filesystem;
pub mod user_input;
pub mod output;
pub mod command;

pub use filesystem::{FileSystem, RealFileSystem};
pub use user_input::{UserInput, InquireUserInput};
pub use output::{Output, TerminalOutput};
pub use command::{CommandExecutor, RealCommandExecutor};

#[cfg(test)]
pub use filesystem::MockFileSystem;
#[cfg(test)]
pub use user_input::{MockResponse, MockUserInput};
#[cfg(test)]
pub use output::MockOutput;
#[cfg(test)]
pub use command::{MockCommandExecutor, MockCommandResult};
