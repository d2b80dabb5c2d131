use super::{LambdaCommand, ProjectType, RunOptions, Session, print_summary};
use crate::context::Context;
use crate::provider::ExternalDataProvider;
use crate::resolver::field::DomainKind;
use crate::resolver::orchestrator::DomainResolution;
use crate::resolver::{Answers, Origin, catalog};
use anyhow::Result;
use serde_json::Value;
use tracing::{debug, warn};

/// Handles the 'microservice' command - resolves project, author and AWS
/// settings, creates the deployment bucket when asked to, then sets up the
/// first lambda function of the service
pub struct MicroserviceCommand;

impl MicroserviceCommand {
    /// Execute the microservice command. Every question is asked again
    /// unless `reuse` is set, in which case stored answers are kept.
    pub async fn execute(ctx: &Context, options: &RunOptions, reuse: bool) -> Result<()> {
        ctx.output.banner("AWS Microservice Generator");

        let session = Session::open(ctx, options)?;
        session.mark_project_type(ProjectType::Microservice)?;

        let domains = catalog::microservice_domains(&options.app_name())?;
        let mut orchestrator = session.orchestrator(ctx);
        let resolutions = orchestrator.resolve_all(&domains, !reuse).await?;

        print_summary(ctx.output.as_ref(), &resolutions);
        Self::ensure_bucket(ctx, session.provider.as_ref(), &resolutions, orchestrator.answers()).await;

        ctx.output.success(&format!(
            "Configuration saved to {}",
            session.store.path().display()
        ));

        LambdaCommand::resolve_function(ctx, &session, options).await
    }

    /// Create the deployment bucket if the operator asked for it during this
    /// run. A stored request from an earlier run is never acted on again.
    /// Failure is reported but does not fail the command.
    async fn ensure_bucket(
        ctx: &Context,
        provider: &dyn ExternalDataProvider,
        resolutions: &[DomainResolution],
        answers: &Answers,
    ) {
        let Some(requested) = resolutions
            .iter()
            .filter(|r| r.kind == DomainKind::Aws)
            .find_map(|r| r.field("awsS3BucketCreate"))
        else {
            return;
        };
        if requested.origin == Origin::Stored {
            debug!("bucket creation was settled in an earlier run");
            return;
        }
        if requested.value != Value::Bool(true) {
            return;
        }
        let (Some(bucket), Some(profile)) = (answers.str("awsS3Bucket"), answers.str("awsProfile"))
        else {
            return;
        };

        ctx.output.info(&format!("Creating S3 bucket: {}", bucket));
        match provider.create_resource(bucket, profile).await {
            Ok(created) => ctx.output.success(&format!(
                "S3 bucket created: {} ({})",
                bucket, created.location
            )),
            Err(err) => {
                warn!(%bucket, %profile, error = %err, "bucket creation failed");
                ctx.output.error(&format!("Error creating S3 bucket ({}): {:#}", bucket, err));
                ctx.output
                    .dimmed("Create the bucket manually before deploying the project");
            }
        }
    }
}
