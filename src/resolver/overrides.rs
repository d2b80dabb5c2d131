//! Free-text override fields win over their list selection.

use super::field::Domain;
use super::{Answers, ResolvedField};
use serde_json::Value;
use tracing::debug;

/// Final value of `field`: the override's text when it is a non-empty
/// string, else the field's own answer
pub fn resolve(field: &str, override_field: &str, answers: &Answers) -> Option<Value> {
    match answers.str(override_field) {
        Some(text) if !text.is_empty() => Some(Value::String(text.to_string())),
        _ => answers.get(field).cloned(),
    }
}

/// Apply every override declared in `domain` to its resolved fields
pub fn apply(domain: &Domain, resolved: &mut [ResolvedField]) {
    let answers: Answers = resolved
        .iter()
        .map(|f| (f.name.clone(), f.value.clone()))
        .collect();

    for spec in domain.fields() {
        let Some(base) = spec.override_of() else {
            continue;
        };
        if !answers.has_text(&spec.name) {
            continue;
        }
        let Some(value) = resolve(base, &spec.name, &answers) else {
            continue;
        };

        let origin = resolved
            .iter()
            .find(|f| f.name == spec.name)
            .map(|f| f.origin);
        if let Some(target) = resolved.iter_mut().find(|f| f.name == base) {
            debug!(field = %base, from = %spec.name, "override replaces selection");
            target.value = value;
            if let Some(origin) = origin {
                target.origin = origin;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::Origin;
    use crate::resolver::cache::CUSTOM_REGION_CHOICE;
    use crate::resolver::field::{Choices, DomainKind, FieldSpec};
    use serde_json::json;

    fn region_domain() -> Domain {
        Domain::new(
            DomainKind::Aws,
            vec![
                FieldSpec::select("awsRegion", "r", Choices::Static(vec!["eu-west-1".to_string()])),
                FieldSpec::text("awsRegionCustom", "rc").overrides("awsRegion"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_override_text_wins() {
        let answers: Answers = [
            ("awsRegion", json!("eu-west-1")),
            ("awsRegionCustom", json!("ap-south-2")),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            resolve("awsRegion", "awsRegionCustom", &answers),
            Some(json!("ap-south-2"))
        );
    }

    #[test]
    fn test_empty_or_missing_override_keeps_selection() {
        let empty: Answers = [("awsRegion", json!("eu-west-1")), ("awsRegionCustom", json!(""))]
            .into_iter()
            .collect();
        let missing: Answers = [("awsRegion", json!("eu-west-1"))].into_iter().collect();

        assert_eq!(resolve("awsRegion", "awsRegionCustom", &empty), Some(json!("eu-west-1")));
        assert_eq!(resolve("awsRegion", "awsRegionCustom", &missing), Some(json!("eu-west-1")));
    }

    #[test]
    fn test_apply_replaces_sentinel_selection() {
        let mut resolved = vec![
            ResolvedField::new("awsRegion", json!(CUSTOM_REGION_CHOICE), Origin::Answered),
            ResolvedField::new("awsRegionCustom", json!("me-central-1"), Origin::Answered),
        ];

        apply(&region_domain(), &mut resolved);

        assert_eq!(resolved[0].value, json!("me-central-1"));
    }

    #[test]
    fn test_apply_ignores_null_override() {
        let mut resolved = vec![
            ResolvedField::new("awsRegion", json!("eu-west-1"), Origin::Stored),
            ResolvedField::new("awsRegionCustom", Value::Null, Origin::Stored),
        ];

        apply(&region_domain(), &mut resolved);

        assert_eq!(
            resolved[0],
            ResolvedField::new("awsRegion", json!("eu-west-1"), Origin::Stored)
        );
    }
}
