use crate::traits::{
    CommandExecutor, FileSystem, InquireUserInput, Output, RealCommandExecutor, RealFileSystem,
    TerminalOutput, UserInput,
};
use std::sync::Arc;

/// Handles to the process boundaries a command touches: files (config store,
/// credentials), prompts, terminal output and the `aws` CLI
#[derive(Clone)]
pub struct Context {
    pub fs: Arc<dyn FileSystem>,
    pub input: Arc<dyn UserInput>,
    pub output: Arc<dyn Output>,
    pub command: Arc<dyn CommandExecutor>,
}

impl Context {
    /// Interactive terminal session against the real file system
    pub fn new() -> Self {
        Self::from_parts(
            Arc::new(RealFileSystem),
            Arc::new(InquireUserInput),
            Arc::new(TerminalOutput),
            Arc::new(RealCommandExecutor::new()),
        )
    }

    pub fn from_parts(
        fs: Arc<dyn FileSystem>,
        input: Arc<dyn UserInput>,
        output: Arc<dyn Output>,
        command: Arc<dyn CommandExecutor>,
    ) -> Self {
        Self {
            fs,
            input,
            output,
            command,
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
