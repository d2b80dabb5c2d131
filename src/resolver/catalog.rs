//! Field catalogs for the project, author, AWS and lambda domains.

use super::Answers;
use super::cache::{CUSTOM_PROFILE_CHOICE, CUSTOM_REGION_CHOICE, LookupKey};
use super::field::{Choices, Domain, DomainKind, FieldSpec};
use anyhow::Result;
use heck::ToLowerCamelCase;
use serde_json::{Value, json};

/// Placeholder for unknown author details
pub const NOT_AVAILABLE: &str = "__NA__";

/// First letter of each hyphen-separated token of `name`, padded with `0`
/// and cut to three characters: `sample-svc` becomes `ss0`
pub fn project_prefix(name: &str) -> String {
    let mut letters: Vec<String> = name
        .split('-')
        .map(|token| token.chars().take(1).collect())
        .collect();
    while letters.len() < 3 {
        letters.push("0".to_string());
    }
    letters.truncate(3);
    letters.concat()
}

/// Split a comma separated answer into trimmed, non-empty keywords.
/// Lists (e.g. a stored default) pass through untouched.
pub fn split_keywords(value: Value) -> Value {
    match value {
        Value::String(text) => Value::Array(
            text.split(',')
                .map(str::trim)
                .filter(|keyword| !keyword.is_empty())
                .map(|keyword| Value::String(keyword.to_string()))
                .collect(),
        ),
        other => other,
    }
}

/// Whitespace replaced by `-`
pub fn dasherize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect()
}

fn require_non_empty(raw: &str) -> Result<(), String> {
    if raw.is_empty() {
        return Err("Please enter a non empty value".to_string());
    }
    Ok(())
}

fn require_namespace(raw: &str) -> Result<(), String> {
    if !raw.is_empty() && !raw.starts_with('@') {
        return Err("Namespaces must start with a \"@\"".to_string());
    }
    Ok(())
}

fn require_semver(raw: &str) -> Result<(), String> {
    semver::Version::parse(raw)
        .map(|_| ())
        .map_err(|_| "Please enter a SemVer compatible version string".to_string())
}

/// Integer answer, or `fallback` when it does not parse
fn integer_or(fallback: i64) -> impl Fn(Value) -> Value + Send + Sync + 'static {
    move |value| {
        let parsed = match &value {
            Value::String(text) => text.trim().parse::<i64>().ok(),
            Value::Number(number) => number.as_i64(),
            _ => None,
        };
        json!(parsed.unwrap_or(fallback))
    }
}

/// Project metadata. `app_name` is the fallback project name, usually the
/// project directory's name.
pub fn project_domain(app_name: &str) -> Result<Domain> {
    let app_name = dasherize(app_name);

    let domain = Domain::new(
        DomainKind::Project,
        vec![
            FieldSpec::text("projectNamespace", "Project namespace (leave empty if none)?")
                .default_value(json!(""))
                .validate(require_namespace),
            FieldSpec::text("projectName", "Project name?")
                .default_with(move |_, stored| {
                    let name = stored.and_then(Value::as_str).unwrap_or(app_name.as_str());
                    Some(json!(dasherize(name)))
                }),
            FieldSpec::text("projectVersion", "Project version?")
                .default_value(json!("0.0.1"))
                .validate(require_semver),
            FieldSpec::text("projectPrefix", "Project prefix?")
                .default_with(|answers, _| answers.str("projectName").map(|n| json!(project_prefix(n)))),
            FieldSpec::text("projectDescription", "Project description?")
                .default_value(json!("My AWS microservice")),
            FieldSpec::text("projectKeywords", "Project keywords (comma separated)?")
                .default_value(json!([]))
                .transform(split_keywords),
        ],
    )?;
    Ok(domain)
}

pub fn author_domain() -> Result<Domain> {
    let git_username = |answers: &Answers| -> String {
        answers.str("gitUsername").unwrap_or(NOT_AVAILABLE).to_string()
    };
    let project_name = |answers: &Answers| -> String {
        answers.str("projectName").unwrap_or_default().to_string()
    };

    let domain = Domain::new(
        DomainKind::Author,
        vec![
            FieldSpec::text("authorName", "Author name?").default_value(json!(NOT_AVAILABLE)),
            FieldSpec::text("authorEmail", "Author email?").default_value(json!(NOT_AVAILABLE)),
            FieldSpec::text("gitUsername", "Git username?").default_with(|answers, stored| {
                if let Some(stored) = stored {
                    return Some(stored.clone());
                }
                // An empty namespace yields an empty username; only a missing one falls back
                let from_namespace = answers
                    .str("projectNamespace")
                    .map(|ns| ns.strip_prefix('@').unwrap_or(ns));
                Some(json!(from_namespace.unwrap_or(NOT_AVAILABLE)))
            }),
            FieldSpec::text("gitUrl", "Git URL?").default_with(move |answers, stored| {
                Some(stored.cloned().unwrap_or_else(|| {
                    json!(format!("github.com/{}/{}", git_username(answers), project_name(answers)))
                }))
            }),
            FieldSpec::text("gitDocumentationUrl", "Documentation URL?").default_with(
                move |answers, stored| {
                    Some(stored.cloned().unwrap_or_else(|| {
                        json!(format!(
                            "https://{}.github.io/{}",
                            git_username(answers),
                            project_name(answers)
                        ))
                    }))
                },
            ),
        ],
    )?;
    Ok(domain)
}

/// Deployment target: credential profile, region and deployment bucket
pub fn aws_domain() -> Result<Domain> {
    let domain = Domain::new(
        DomainKind::Aws,
        vec![
            FieldSpec::select(
                "awsProfile",
                "AWS profile?",
                Choices::lookup(|_| LookupKey::Profiles),
            ),
            FieldSpec::text("awsProfileCustom", "Enter AWS profile name")
                .overrides("awsProfile")
                .visible_when(|answers| answers.str("awsProfile") == Some(CUSTOM_PROFILE_CHOICE))
                .validate(require_non_empty),
            FieldSpec::select(
                "awsRegion",
                "AWS region?",
                Choices::lookup(|answers| LookupKey::Regions {
                    profile: answers.str("awsProfile").unwrap_or_default().to_string(),
                }),
            )
            .visible_when(|answers| !answers.has_text("awsProfileCustom")),
            FieldSpec::text("awsRegionCustom", "Enter AWS region name")
                .overrides("awsRegion")
                .visible_when(|answers| {
                    answers.has_text("awsProfileCustom")
                        || answers.str("awsRegion") == Some(CUSTOM_REGION_CHOICE)
                })
                .validate(require_non_empty),
            FieldSpec::text("awsS3Bucket", "AWS S3 bucket for deployment files?")
                .validate(require_non_empty),
            FieldSpec::confirm("awsS3BucketCreate", "Bucket does not exist. Create?")
                .asked_with("awsS3Bucket")
                .default_value(json!(true))
                .when_hidden(json!(false))
                .visible_when_missing(|answers| {
                    if answers.has_text("awsProfileCustom") {
                        return None;
                    }
                    Some(LookupKey::ResourceExists {
                        name: answers.str("awsS3Bucket")?.to_string(),
                        profile: answers.str("awsProfile")?.to_string(),
                    })
                }),
        ],
    )?;
    Ok(domain)
}

/// Lambda function details; asked every time and never persisted
pub fn lambda_domain() -> Result<Domain> {
    let domain = Domain::new(
        DomainKind::Lambda,
        vec![
            FieldSpec::text("lambdaFunctionName", "Lambda function name?")
                .default_value(json!("hello_world")),
            FieldSpec::text("lambdaHandlerName", "Lambda handler name?").default_with(|answers, _| {
                let function = answers.str("lambdaFunctionName").unwrap_or_default();
                Some(json!(format!("index.{}Handler", function.to_lower_camel_case())))
            }),
            FieldSpec::text("lambdaFunctionDescription", "Lambda function description?")
                .default_value(json!("sample lambda function")),
            FieldSpec::text("lambdaMemory", "Memory allocation?")
                .default_value(json!(128))
                .transform(integer_or(128)),
            FieldSpec::text("lambdaTimeout", "Lambda timeout?")
                .default_value(json!(3))
                .transform(integer_or(3)),
            FieldSpec::confirm("lambdaSchemaCreate", "Does the function require schema validation?")
                .default_value(json!(false)),
        ],
    )?;
    Ok(domain.ephemeral())
}

/// Project, author and AWS domains, in resolution order
pub fn microservice_domains(app_name: &str) -> Result<Vec<Domain>> {
    Ok(vec![project_domain(app_name)?, author_domain()?, aws_domain()?])
}
