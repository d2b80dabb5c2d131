use super::{ProjectType, RunOptions, Session, print_summary};
use crate::context::Context;
use crate::resolver::catalog;
use anyhow::Result;

/// Handles the 'lambda' command - reuses stored project settings and asks
/// for the details of one lambda function
pub struct LambdaCommand;

impl LambdaCommand {
    pub async fn execute(ctx: &Context, options: &RunOptions) -> Result<()> {
        let session = Session::open(ctx, options)?;
        Self::resolve_function(ctx, &session, options).await
    }

    /// Resolve one lambda function on top of the project settings held by
    /// `session`, asking only for project fields that are still missing
    pub(crate) async fn resolve_function(ctx: &Context, session: &Session, options: &RunOptions) -> Result<()> {
        ctx.output.banner("AWS Lambda Generator");
        session.mark_project_type(ProjectType::Lambda)?;

        let project = catalog::project_domain(&options.app_name())?;
        let lambda = catalog::lambda_domain()?;

        let mut orchestrator = session.orchestrator(ctx);
        let resolutions = vec![
            orchestrator.resolve_domain(&project, false).await?,
            orchestrator.resolve_domain(&lambda, true).await?,
        ];

        print_summary(ctx.output.as_ref(), &resolutions);
        ctx.output.success(&format!(
            "Lambda function '{}' configured",
            orchestrator.answers().str("lambdaQualifiedName").unwrap_or_default()
        ));
        Ok(())
    }
}
