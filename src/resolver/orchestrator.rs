//! Runs domains in order, persisting answers and deriving composite values.

use super::field::{Domain, DomainKind};
use super::runner::PromptRunner;
use super::{Answers, Origin, ResolvedField, overrides, planner};
use crate::store::ConfigStore;
use anyhow::{Context, Result};
use heck::ToKebabCase;
use serde_json::{Value, json};
use tracing::{debug, info};

/// `namespace/name`, or just `name` without a namespace
pub fn namespaced_name(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", namespace, name)
    }
}

/// Values derived from a completed domain. They join the shared answers but
/// are never written to the store.
pub fn derive_composites(kind: DomainKind, answers: &Answers) -> Vec<(String, Value)> {
    match kind {
        DomainKind::Project => {
            let namespace = answers.str("projectNamespace").unwrap_or_default();
            let name = answers.str("projectName").unwrap_or_default();
            vec![(
                "projectNamespacedName".to_string(),
                json!(namespaced_name(namespace, name)),
            )]
        }
        DomainKind::Lambda => {
            let function = answers.str("lambdaFunctionName").unwrap_or_default();
            let file_stem = function.to_kebab_case();
            let prefix = answers.str("projectPrefix").unwrap_or_default();
            vec![
                ("lambdaHandlerFile".to_string(), json!(format!("{}-handler", file_stem))),
                ("lambdaSchemaFile".to_string(), json!(format!("{}-schema", file_stem))),
                ("lambdaSpecFile".to_string(), json!(format!("{}-handler-spec", file_stem))),
                ("lambdaQualifiedName".to_string(), json!(format!("{}-{}", prefix, function))),
            ]
        }
        DomainKind::Author | DomainKind::Aws => Vec::new(),
    }
}

/// Outcome of resolving one domain
#[derive(Debug, Clone, PartialEq)]
pub struct DomainResolution {
    pub kind: DomainKind,
    pub fields: Vec<ResolvedField>,
    pub derived: Vec<(String, Value)>,
}

impl DomainResolution {
    pub fn field(&self, name: &str) -> Option<&ResolvedField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

pub struct Orchestrator<'a> {
    store: &'a dyn ConfigStore,
    runner: PromptRunner<'a>,
    answers: Answers,
}

impl<'a> Orchestrator<'a> {
    pub fn new(store: &'a dyn ConfigStore, runner: PromptRunner<'a>) -> Self {
        Self {
            store,
            runner,
            answers: Answers::new(),
        }
    }

    /// Answers shared across domains so far, composites included
    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    /// Plan, run, apply overrides and persist one domain, then fold its
    /// answers into the shared set
    pub async fn resolve_domain(&mut self, domain: &Domain, force: bool) -> Result<DomainResolution> {
        let stored: Answers = if domain.is_persisted() {
            domain
                .fields()
                .iter()
                .filter_map(|f| self.store.get(&f.name).map(|v| (f.name.clone(), v)))
                .collect()
        } else {
            Answers::new()
        };

        let plan = planner::plan(domain, &stored, force);
        if plan.is_empty() {
            debug!(domain = %domain.kind(), "every answer is stored, nothing to ask");
        }
        let mut fields = self
            .runner
            .run(domain, &plan, &stored, &self.answers)
            .await
            .with_context(|| format!("Failed to resolve {} details", domain.kind()))?;
        overrides::apply(domain, &mut fields);

        for field in &fields {
            let transient = domain.field(&field.name).is_some_and(|spec| spec.is_transient());
            if transient {
                continue;
            }

            if domain.is_persisted() && field.origin != Origin::Stored && !field.value.is_null() {
                self.store
                    .set(&field.name, field.value.clone())
                    .with_context(|| format!("Failed to save {}", field.name))?;
                debug!(field = %field.name, "persisted answer");
            }
            self.answers.insert(field.name.clone(), field.value.clone());
        }

        let derived = derive_composites(domain.kind(), &self.answers);
        for (name, value) in &derived {
            self.answers.insert(name.clone(), value.clone());
        }

        info!(
            domain = %domain.kind(),
            asked = plan.len(),
            total = fields.len(),
            "resolved domain"
        );

        Ok(DomainResolution {
            kind: domain.kind(),
            fields,
            derived,
        })
    }

    /// Resolve `domains` in the fixed project, author, AWS, lambda order
    pub async fn resolve_all(&mut self, domains: &[Domain], force: bool) -> Result<Vec<DomainResolution>> {
        let mut ordered: Vec<&Domain> = domains.iter().collect();
        ordered.sort_by_key(|d| d.kind());

        let mut resolutions = Vec::with_capacity(ordered.len());
        for domain in ordered {
            resolutions.push(self.resolve_domain(domain, force).await?);
        }
        Ok(resolutions)
    }
}
