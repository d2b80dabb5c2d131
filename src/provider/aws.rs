use super::{CreatedResource, ExternalDataProvider};
use crate::traits::{CommandExecutor, FileSystem};
use anyhow::{Context, Result};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::path::PathBuf;
use std::process::Output;
use std::sync::Arc;
use tracing::debug;

/// Region used to authenticate the describe-regions call; any region will do
const DISCOVERY_REGION: &str = "us-east-1";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeRegionsResponse {
    regions: Vec<RegionEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RegionEntry {
    region_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CreateBucketResponse {
    location: Option<String>,
}

/// AWS data provider backed by the shared credentials file and the `aws` CLI.
///
/// Profiles are read from the credentials file (default
/// `~/.aws/credentials`); regions and buckets are queried through
/// `aws ec2 describe-regions` and `aws s3api`.
pub struct AwsCliProvider {
    fs: Arc<dyn FileSystem>,
    command: Arc<dyn CommandExecutor>,
    credentials_file: Option<PathBuf>,
}

impl AwsCliProvider {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        command: Arc<dyn CommandExecutor>,
        credentials_file: Option<PathBuf>,
    ) -> Self {
        Self {
            fs,
            command,
            credentials_file,
        }
    }

    fn credentials_path(&self) -> Result<PathBuf> {
        match &self.credentials_file {
            Some(path) => Ok(path.clone()),
            None => dirs::home_dir()
                .map(|home| home.join(".aws").join("credentials"))
                .context("Could not determine home directory"),
        }
    }

    /// Run `aws` off the async executor
    async fn run_aws(&self, args: Vec<String>) -> Result<Output> {
        let command = Arc::clone(&self.command);
        debug!(args = ?args, "running aws cli");
        tokio::task::spawn_blocking(move || {
            let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
            command.execute("aws", &arg_refs)
        })
        .await
        .context("aws cli task panicked")?
    }
}

/// Section names of an INI-style credentials file
pub fn parse_profile_names(content: &str) -> Result<Vec<String>> {
    let section = Regex::new(r"^\s*\[\s*([^\]]+?)\s*\]\s*$")?;
    Ok(content
        .lines()
        .filter_map(|line| section.captures(line))
        .map(|caps| caps[1].to_string())
        .collect())
}

#[async_trait]
impl ExternalDataProvider for AwsCliProvider {
    async fn list_profiles(&self) -> Result<Vec<String>> {
        let path = self.credentials_path()?;
        let content = self.fs.read_to_string(&path)?;
        parse_profile_names(&content)
    }

    async fn list_regions(&self, profile: &str) -> Result<Vec<String>> {
        let output = self
            .run_aws(vec![
                "ec2".to_string(),
                "describe-regions".to_string(),
                "--profile".to_string(),
                profile.to_string(),
                "--region".to_string(),
                DISCOVERY_REGION.to_string(),
                "--output".to_string(),
                "json".to_string(),
            ])
            .await?;

        if !output.status.success() {
            anyhow::bail!(
                "describe-regions failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let response: DescribeRegionsResponse = serde_json::from_slice(&output.stdout)
            .context("Failed to parse describe-regions output")?;
        Ok(response.regions.into_iter().map(|r| r.region_name).collect())
    }

    async fn check_resource_exists(&self, name: &str, profile: &str) -> Result<bool> {
        let output = self
            .run_aws(vec![
                "s3api".to_string(),
                "head-bucket".to_string(),
                "--bucket".to_string(),
                name.to_string(),
                "--profile".to_string(),
                profile.to_string(),
            ])
            .await?;

        Ok(output.status.success())
    }

    async fn create_resource(&self, name: &str, profile: &str) -> Result<CreatedResource> {
        let output = self
            .run_aws(vec![
                "s3api".to_string(),
                "create-bucket".to_string(),
                "--bucket".to_string(),
                name.to_string(),
                "--profile".to_string(),
                profile.to_string(),
                "--output".to_string(),
                "json".to_string(),
            ])
            .await?;

        if !output.status.success() {
            anyhow::bail!(
                "create-bucket failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let response: CreateBucketResponse = serde_json::from_slice(&output.stdout)
            .context("Failed to parse create-bucket output")?;
        Ok(CreatedResource {
            location: response.location.unwrap_or_else(|| format!("/{}", name)),
        })
    }
}
