//! Executes a plan against the operator, one field at a time.

use super::cache::ExternalDataCache;
use super::field::{Choices, Domain, FieldKind, FieldSpec, Visibility};
use super::planner::Plan;
use super::{Answers, Origin, ResolvedField, display_value};
use crate::traits::{Output, UserInput};
use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;

/// Position of `value` in `choices`, else the last entry (the escape hatch)
pub fn default_cursor(choices: &[String], value: Option<&str>) -> usize {
    value
        .and_then(|v| choices.iter().position(|c| c == v))
        .unwrap_or_else(|| choices.len().saturating_sub(1))
}

pub struct PromptRunner<'a> {
    input: &'a dyn UserInput,
    output: &'a dyn Output,
    cache: &'a ExternalDataCache,
}

impl<'a> PromptRunner<'a> {
    pub fn new(input: &'a dyn UserInput, output: &'a dyn Output, cache: &'a ExternalDataCache) -> Self {
        Self {
            input,
            output,
            cache,
        }
    }

    /// Resolve every field of `domain` in declaration order.
    ///
    /// Fields outside the plan keep their stored value. Planned fields are
    /// asked when visible; hidden ones record their default. `shared` holds
    /// answers from earlier domains and is visible to defaults and
    /// predicates but never modified.
    pub async fn run(
        &self,
        domain: &Domain,
        plan: &Plan,
        stored: &Answers,
        shared: &Answers,
    ) -> Result<Vec<ResolvedField>> {
        let mut scope = shared.clone();
        let mut resolved = Vec::with_capacity(domain.fields().len());

        for field in domain.fields() {
            let stored_value = stored.get(&field.name);

            let (value, origin) = if !plan.contains(&field.name) {
                (stored_value.cloned().unwrap_or(Value::Null), Origin::Stored)
            } else if self.is_visible(field, &scope).await {
                (self.ask(field, &scope, stored_value).await?, Origin::Answered)
            } else {
                (field.hidden_value(&scope, stored_value), Origin::Computed)
            };

            debug!(field = %field.name, %origin, "resolved field");
            scope.insert(field.name.clone(), value.clone());
            resolved.push(ResolvedField::new(field.name.clone(), value, origin));
        }

        Ok(resolved)
    }

    async fn is_visible(&self, field: &FieldSpec, answers: &Answers) -> bool {
        match field.visibility() {
            Visibility::Always => true,
            Visibility::When(predicate) => predicate(answers),
            Visibility::WhenMissing(probe) => match probe(answers) {
                Some(key) => !self.cache.exists(&key).await,
                None => false,
            },
        }
    }

    async fn ask(&self, field: &FieldSpec, answers: &Answers, stored: Option<&Value>) -> Result<Value> {
        let default = field.compute_default(answers, stored);

        let raw = match field.kind {
            FieldKind::Text => {
                let default_text = default.as_ref().map(display_value);
                loop {
                    let answer = self
                        .input
                        .text(&field.message, default_text.as_deref())
                        .with_context(|| format!("Failed to read answer for {}", field.name))?;

                    match field.check(&answer) {
                        Ok(()) => break Value::String(answer),
                        Err(message) => {
                            debug!(field = %field.name, %message, "answer rejected, asking again");
                            self.output.warning(&message);
                        }
                    }
                }
            }
            FieldKind::Select => {
                let choices = match field.choices() {
                    #[cfg(test)]
                    Some(Choices::Static(choices)) => choices.clone(),
                    Some(Choices::Lookup(key)) => self.cache.choices(&key(answers)).await,
                    None => Vec::new(),
                };
                if choices.is_empty() {
                    anyhow::bail!("No choices available for {}", field.name);
                }

                let cursor = default_cursor(&choices, default.as_ref().and_then(Value::as_str));
                let answer = self
                    .input
                    .select(&field.message, choices, cursor)
                    .with_context(|| format!("Failed to read answer for {}", field.name))?;
                Value::String(answer)
            }
            FieldKind::Confirm => {
                let default_flag = default.as_ref().and_then(Value::as_bool).unwrap_or(false);
                let answer = self
                    .input
                    .confirm(&field.message, default_flag)
                    .with_context(|| format!("Failed to read answer for {}", field.name))?;
                Value::Bool(answer)
            }
        };

        Ok(field.apply_transform(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::cache::testing::FakeProvider;
    use crate::resolver::cache::{CUSTOM_PROFILE_CHOICE, LookupKey};
    use crate::resolver::field::DomainKind;
    use crate::resolver::planner;
    use crate::traits::user_input::AskedPrompt;
    use crate::traits::{MockOutput, MockResponse, MockUserInput};
    use serde_json::json;
    use std::sync::Arc;

    struct Harness {
        input: MockUserInput,
        output: MockOutput,
        cache: ExternalDataCache,
    }

    impl Harness {
        fn new(responses: Vec<MockResponse>, provider: FakeProvider) -> Self {
            Self {
                input: MockUserInput::with_responses(responses),
                output: MockOutput::new(),
                cache: ExternalDataCache::new(Arc::new(provider)),
            }
        }

        async fn run(&self, domain: &Domain, stored: &Answers, shared: &Answers) -> Result<Vec<ResolvedField>> {
            let plan = planner::plan(domain, stored, false);
            PromptRunner::new(&self.input, &self.output, &self.cache)
                .run(domain, &plan, stored, shared)
                .await
        }
    }

    fn value_of<'r>(resolved: &'r [ResolvedField], name: &str) -> &'r ResolvedField {
        resolved.iter().find(|f| f.name == name).unwrap()
    }

    #[test]
    fn test_default_cursor_matches_or_falls_back_to_last() {
        let choices = vec!["a".to_string(), "b".to_string(), "custom".to_string()];
        assert_eq!(default_cursor(&choices, Some("b")), 1);
        assert_eq!(default_cursor(&choices, Some("zzz")), 2);
        assert_eq!(default_cursor(&choices, None), 2);
        assert_eq!(default_cursor(&[], None), 0);
    }

    #[tokio::test]
    async fn test_invalid_answer_is_asked_again() {
        let domain = Domain::new(
            DomainKind::Project,
            vec![FieldSpec::text("projectVersion", "Project version?").validate(|raw| {
                semver::Version::parse(raw)
                    .map(|_| ())
                    .map_err(|_| "Please enter a SemVer compatible version string".to_string())
            })],
        )
        .unwrap();
        let harness = Harness::new(
            vec![
                MockResponse::Text("one".to_string()),
                MockResponse::Text("1.0".to_string()),
                MockResponse::Text("1.0.0".to_string()),
            ],
            FakeProvider::new(),
        );

        let resolved = harness.run(&domain, &Answers::new(), &Answers::new()).await.unwrap();

        assert_eq!(value_of(&resolved, "projectVersion").value, json!("1.0.0"));
        assert_eq!(harness.output.get_warnings().len(), 2);
        assert_eq!(harness.input.asked_messages().len(), 3);
    }

    #[tokio::test]
    async fn test_stops_when_no_valid_answer_arrives() {
        let domain = Domain::new(
            DomainKind::Aws,
            vec![FieldSpec::text("awsS3Bucket", "Bucket?").validate(|raw| {
                if raw.is_empty() {
                    Err("Please enter a non empty value".to_string())
                } else {
                    Ok(())
                }
            })],
        )
        .unwrap();
        let harness = Harness::new(vec![MockResponse::Text(String::new())], FakeProvider::new());

        let result = harness.run(&domain, &Answers::new(), &Answers::new()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_default_reads_earlier_answers_and_shared_values() {
        let domain = Domain::new(
            DomainKind::Author,
            vec![
                FieldSpec::text("gitUsername", "Git username?"),
                FieldSpec::text("gitUrl", "Git URL?").default_with(|answers, _| {
                    Some(json!(format!(
                        "github.com/{}/{}",
                        answers.str("gitUsername").unwrap_or_default(),
                        answers.str("projectName").unwrap_or_default()
                    )))
                }),
            ],
        )
        .unwrap();
        let shared: Answers = [("projectName", json!("widget"))].into_iter().collect();
        let harness = Harness::new(
            vec![
                MockResponse::Text("acme".to_string()),
                MockResponse::Text("github.com/acme/widget".to_string()),
            ],
            FakeProvider::new(),
        );

        harness.run(&domain, &Answers::new(), &shared).await.unwrap();

        assert_eq!(
            harness.input.asked()[1],
            AskedPrompt {
                message: "Git URL?".to_string(),
                default: Some("github.com/acme/widget".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_unplanned_field_keeps_stored_value() {
        let domain = Domain::new(
            DomainKind::Project,
            vec![
                FieldSpec::text("projectName", "Project name?"),
                FieldSpec::text("projectDescription", "Description?"),
            ],
        )
        .unwrap();
        let stored: Answers = [("projectName", json!("svc"))].into_iter().collect();
        let harness = Harness::new(vec![MockResponse::Text("desc".to_string())], FakeProvider::new());

        let resolved = harness.run(&domain, &stored, &Answers::new()).await.unwrap();

        assert_eq!(
            value_of(&resolved, "projectName"),
            &ResolvedField::new("projectName", json!("svc"), Origin::Stored)
        );
        assert_eq!(value_of(&resolved, "projectDescription").origin, Origin::Answered);
        assert_eq!(harness.input.asked_messages(), vec!["Description?".to_string()]);
    }

    #[tokio::test]
    async fn test_hidden_field_records_default_for_later_fields() {
        let domain = Domain::new(
            DomainKind::Project,
            vec![
                FieldSpec::text("projectNamespace", "Namespace?")
                    .visible_when(|_| false)
                    .default_value(json!("@acme")),
                FieldSpec::text("gitUsername", "Git user?").default_with(|answers, _| {
                    answers
                        .str("projectNamespace")
                        .map(|ns| json!(ns.trim_start_matches('@')))
                }),
            ],
        )
        .unwrap();
        let harness = Harness::new(vec![MockResponse::Text("acme".to_string())], FakeProvider::new());

        let resolved = harness.run(&domain, &Answers::new(), &Answers::new()).await.unwrap();

        assert_eq!(
            value_of(&resolved, "projectNamespace"),
            &ResolvedField::new("projectNamespace", json!("@acme"), Origin::Computed)
        );
        assert_eq!(harness.input.asked()[0].default, Some("acme".to_string()));
    }

    #[tokio::test]
    async fn test_select_default_points_at_stored_entry() {
        let domain = Domain::new(
            DomainKind::Aws,
            vec![FieldSpec::select(
                "awsProfile",
                "AWS profile?",
                Choices::lookup(|_| LookupKey::Profiles),
            )],
        )
        .unwrap();
        let stored: Answers = [("awsProfile", json!("prod"))].into_iter().collect();
        let harness = Harness::new(
            vec![MockResponse::Select("prod".to_string())],
            FakeProvider::new().with_profiles(&["default", "prod"]),
        );

        let plan = planner::plan(&domain, &stored, true);
        PromptRunner::new(&harness.input, &harness.output, &harness.cache)
            .run(&domain, &plan, &stored, &Answers::new())
            .await
            .unwrap();

        assert_eq!(harness.input.asked()[0].default, Some("prod".to_string()));
    }

    #[tokio::test]
    async fn test_select_without_stored_value_defaults_to_escape_hatch() {
        let domain = Domain::new(
            DomainKind::Aws,
            vec![FieldSpec::select(
                "awsProfile",
                "AWS profile?",
                Choices::lookup(|_| LookupKey::Profiles),
            )],
        )
        .unwrap();
        let harness = Harness::new(
            vec![MockResponse::Select(CUSTOM_PROFILE_CHOICE.to_string())],
            FakeProvider::new(),
        );

        harness.run(&domain, &Answers::new(), &Answers::new()).await.unwrap();

        assert_eq!(
            harness.input.asked()[0].default,
            Some(CUSTOM_PROFILE_CHOICE.to_string())
        );
    }

    #[tokio::test]
    async fn test_when_missing_asks_only_for_absent_resource() {
        let domain = Domain::new(
            DomainKind::Aws,
            vec![
                FieldSpec::text("awsS3Bucket", "Bucket?"),
                FieldSpec::confirm("awsS3BucketCreate", "Create?")
                    .asked_with("awsS3Bucket")
                    .default_value(json!(true))
                    .when_hidden(json!(false))
                    .visible_when_missing(|answers| {
                        Some(LookupKey::ResourceExists {
                            name: answers.str("awsS3Bucket")?.to_string(),
                            profile: "prod".to_string(),
                        })
                    }),
            ],
        )
        .unwrap();

        let existing = Harness::new(
            vec![MockResponse::Text("deploy".to_string())],
            FakeProvider::new().with_bucket("deploy"),
        );
        let resolved = existing.run(&domain, &Answers::new(), &Answers::new()).await.unwrap();
        assert_eq!(
            value_of(&resolved, "awsS3BucketCreate"),
            &ResolvedField::new("awsS3BucketCreate", json!(false), Origin::Computed)
        );

        let missing = Harness::new(
            vec![
                MockResponse::Text("fresh".to_string()),
                MockResponse::Confirm(true),
            ],
            FakeProvider::new().with_bucket("deploy"),
        );
        let resolved = missing.run(&domain, &Answers::new(), &Answers::new()).await.unwrap();
        assert_eq!(value_of(&resolved, "awsS3BucketCreate").value, json!(true));
        assert_eq!(missing.input.asked()[1].default, Some("true".to_string()));
    }

    #[tokio::test]
    async fn test_transform_applied_to_answer() {
        let domain = Domain::new(
            DomainKind::Project,
            vec![FieldSpec::text("projectName", "Name?").transform(|v| match v {
                Value::String(s) => json!(s.to_uppercase()),
                other => other,
            })],
        )
        .unwrap();
        let harness = Harness::new(vec![MockResponse::Text("svc".to_string())], FakeProvider::new());

        let resolved = harness.run(&domain, &Answers::new(), &Answers::new()).await.unwrap();
        assert_eq!(value_of(&resolved, "projectName").value, json!("SVC"));
    }
}
