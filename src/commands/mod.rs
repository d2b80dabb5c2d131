pub mod lambda;
pub mod microservice;
pub mod new;

pub use lambda::LambdaCommand;
pub use microservice::MicroserviceCommand;
pub use new::NewCommand;

use crate::context::Context;
use crate::provider::{AwsCliProvider, ExternalDataProvider};
use crate::resolver::orchestrator::DomainResolution;
use crate::resolver::{ExternalDataCache, Orchestrator, PromptRunner, display_value};
use crate::store::{ConfigStore, JsonConfigStore};
use crate::traits::Output;
use anyhow::{Context as _, Result};
use serde_json::json;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// Store key recording which generator last ran in the project
pub const PROJECT_TYPE_KEY: &str = "_projectType";

/// Fallback project name when the project directory has no usable name
const DEFAULT_APP_NAME: &str = "project";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectType {
    Microservice,
    Lambda,
}

impl ProjectType {
    pub const ALL: [ProjectType; 2] = [ProjectType::Microservice, ProjectType::Lambda];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Microservice => "microservice",
            ProjectType::Lambda => "lambda",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        ProjectType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown project type: {}", s))
    }
}

/// Options shared by every command
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory holding the config store
    pub project_dir: PathBuf,
    /// Credentials file listing AWS profiles; `~/.aws/credentials` when unset
    pub credentials_file: Option<PathBuf>,
}

impl RunOptions {
    /// Fallback project name, taken from the project directory
    pub fn app_name(&self) -> String {
        self.project_dir
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| DEFAULT_APP_NAME.to_string())
    }
}

/// Config store, data provider and lookup cache for one command run
pub(crate) struct Session {
    pub store: JsonConfigStore,
    pub provider: Arc<dyn ExternalDataProvider>,
    pub cache: ExternalDataCache,
}

impl Session {
    pub fn open(ctx: &Context, options: &RunOptions) -> Result<Self> {
        let store = JsonConfigStore::open(Arc::clone(&ctx.fs), &options.project_dir)
            .context("Failed to open project configuration")?;
        let provider: Arc<dyn ExternalDataProvider> = Arc::new(AwsCliProvider::new(
            Arc::clone(&ctx.fs),
            Arc::clone(&ctx.command),
            options.credentials_file.clone(),
        ));
        let cache = ExternalDataCache::new(Arc::clone(&provider));

        Ok(Self {
            store,
            provider,
            cache,
        })
    }

    pub fn orchestrator<'a>(&'a self, ctx: &'a Context) -> Orchestrator<'a> {
        Orchestrator::new(
            &self.store,
            PromptRunner::new(ctx.input.as_ref(), ctx.output.as_ref(), &self.cache),
        )
    }

    pub fn mark_project_type(&self, project_type: ProjectType) -> Result<()> {
        self.store
            .set(PROJECT_TYPE_KEY, json!(project_type.as_str()))
            .context("Failed to record project type")
    }
}

/// Print every resolved value with where it came from
pub(crate) fn print_summary(output: &dyn Output, resolutions: &[DomainResolution]) {
    for resolution in resolutions {
        output.section(resolution.kind.title());
        for field in resolution.fields.iter().filter(|f| !f.value.is_null()) {
            output.key_value(
                &field.name,
                &format!("{} ({})", display_value(&field.value), field.origin),
            );
        }
        for (name, value) in &resolution.derived {
            output.key_value(name, &format!("{} (derived)", display_value(value)));
        }
    }
}
