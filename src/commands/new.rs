use super::{LambdaCommand, MicroserviceCommand, ProjectType, RunOptions};
use crate::context::Context;
use crate::resolver::runner::default_cursor;
use anyhow::{Context as _, Result};
use tracing::info;

/// Handles the 'new' command - asks for the project type and runs its flow
pub struct NewCommand;

impl NewCommand {
    pub async fn execute(ctx: &Context, options: &RunOptions) -> Result<()> {
        ctx.output.banner("AWS Project Generators");

        let choices: Vec<String> = ProjectType::ALL.iter().map(|t| t.to_string()).collect();
        let cursor = default_cursor(&choices, Some(ProjectType::Lambda.as_str()));
        let answer = ctx
            .input
            .select("What type of project do you want to create?", choices, cursor)
            .context("Failed to select project type")?;

        let project_type: ProjectType = answer.parse()?;
        info!(%project_type, "selected project type");

        match project_type {
            ProjectType::Microservice => MicroserviceCommand::execute(ctx, options, false).await,
            ProjectType::Lambda => LambdaCommand::execute(ctx, options).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{Fixture, fs_with_store};
    use crate::traits::{MockCommandExecutor, MockResponse, MockUserInput};
    use serde_json::json;

    #[tokio::test]
    async fn test_new_defaults_to_lambda() {
        let mut responses = vec![MockResponse::AcceptDefault];
        responses.extend(std::iter::repeat_n(MockResponse::AcceptDefault, 6));
        let fixture = Fixture::new(
            fs_with_store(json!({
                "projectNamespace": "",
                "projectName": "sample-svc",
                "projectVersion": "0.0.1",
                "projectPrefix": "ss0",
                "projectDescription": "My AWS microservice",
                "projectKeywords": []
            })),
            MockUserInput::with_responses(responses),
            MockCommandExecutor::new(),
        );

        NewCommand::execute(&fixture.context(), &fixture.options())
            .await
            .unwrap();

        assert_eq!(fixture.input.asked()[0].default, Some("lambda".to_string()));
        assert_eq!(fixture.stored()["_projectType"], json!("lambda"));
    }

    #[tokio::test]
    async fn test_new_dispatches_to_microservice() {
        let fixture = Fixture::new(
            fs_with_store(json!({})),
            MockUserInput::with_responses(vec![
                MockResponse::Select("microservice".to_string()),
                MockResponse::Text("@acme".to_string()),
            ]),
            MockCommandExecutor::new(),
        );

        // Runs out of answers partway through the project domain
        let result = NewCommand::execute(&fixture.context(), &fixture.options()).await;

        assert!(result.is_err());
        let stored = fixture.stored();
        assert_eq!(stored["_projectType"], json!("microservice"));
        // Answers of an unfinished domain are not saved
        assert!(!stored.contains_key("projectNamespace"));
    }
}
