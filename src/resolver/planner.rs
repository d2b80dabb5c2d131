//! Decides which fields of a domain must be asked this run.

use super::Answers;
use super::field::Domain;
use std::collections::HashSet;
use tracing::debug;

/// Ordered subset of a domain's fields that will be presented
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plan {
    names: Vec<String>,
}

impl Plan {
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    #[cfg(test)]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Plan a domain: a field is included when `force` is set or the store has
/// no value for it. Override and companion fields are included exactly when
/// their anchor is. Declaration order is kept.
pub fn plan(domain: &Domain, stored: &Answers, force: bool) -> Plan {
    let mut included: HashSet<&str> = HashSet::new();
    let mut names = Vec::new();

    for field in domain.fields() {
        let ask = match field.anchor() {
            Some(anchor) => included.contains(anchor),
            None => force || !stored.contains(&field.name),
        };

        if ask {
            included.insert(field.name.as_str());
            names.push(field.name.clone());
        }
    }

    debug!(domain = %domain.kind(), force, planned = ?names, "planned questions");
    Plan { names }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::field::{Choices, DomainKind, FieldSpec};
    use serde_json::{Value, json};

    fn aws_like_domain() -> Domain {
        Domain::new(
            DomainKind::Aws,
            vec![
                FieldSpec::select("awsProfile", "p", Choices::Static(vec!["default".to_string()])),
                FieldSpec::text("awsProfileCustom", "pc").overrides("awsProfile"),
                FieldSpec::text("awsS3Bucket", "b"),
                FieldSpec::confirm("awsS3BucketCreate", "c").asked_with("awsS3Bucket"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_empty_store_plans_every_field() {
        let plan = plan(&aws_like_domain(), &Answers::new(), false);
        assert_eq!(
            plan.names(),
            &["awsProfile", "awsProfileCustom", "awsS3Bucket", "awsS3BucketCreate"]
        );
    }

    #[test]
    fn test_stored_fields_are_skipped_without_force() {
        let stored: Answers = [("awsProfile", json!("prod"))].into_iter().collect();
        let plan = plan(&aws_like_domain(), &stored, false);

        assert!(!plan.contains("awsProfile"));
        assert!(!plan.contains("awsProfileCustom"));
        assert_eq!(plan.names(), &["awsS3Bucket", "awsS3BucketCreate"]);
    }

    #[test]
    fn test_force_plans_stored_fields() {
        let stored: Answers = [
            ("awsProfile", json!("prod")),
            ("awsS3Bucket", json!("deploy")),
            ("awsS3BucketCreate", json!(false)),
        ]
        .into_iter()
        .collect();
        let plan = plan(&aws_like_domain(), &stored, true);

        assert_eq!(plan.len(), 4);
    }

    #[test]
    fn test_companion_follows_anchor_even_if_stored_missing() {
        let stored: Answers = [("awsS3Bucket", json!("deploy"))].into_iter().collect();
        let plan = plan(&aws_like_domain(), &stored, false);

        assert!(!plan.contains("awsS3BucketCreate"));
    }

    #[test]
    fn test_null_stored_value_counts_as_missing() {
        let stored: Answers = [("awsProfile", Value::Null)].into_iter().collect();
        let plan = plan(&aws_like_domain(), &stored, false);

        assert!(plan.contains("awsProfile"));
    }

    #[test]
    fn test_empty_catalog_yields_empty_plan() {
        let domain = Domain::new(DomainKind::Author, Vec::new()).unwrap();
        assert!(plan(&domain, &Answers::new(), true).is_empty());
    }
}
