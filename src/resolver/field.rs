use super::Answers;
use super::cache::LookupKey;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

pub type DefaultFn = Box<dyn Fn(&Answers, Option<&Value>) -> Option<Value> + Send + Sync>;
pub type Validator = Box<dyn Fn(&str) -> Result<(), String> + Send + Sync>;
pub type Transformer = Box<dyn Fn(Value) -> Value + Send + Sync>;
pub type Predicate = Box<dyn Fn(&Answers) -> bool + Send + Sync>;
pub type KeyFn = Box<dyn Fn(&Answers) -> LookupKey + Send + Sync>;
pub type ProbeFn = Box<dyn Fn(&Answers) -> Option<LookupKey> + Send + Sync>;

/// Errors in a field catalog declaration
#[derive(Error, Debug, PartialEq)]
pub enum CatalogError {
    #[error("Duplicate field '{name}' in {domain} domain")]
    DuplicateField { domain: DomainKind, name: String },

    #[error("Field '{field}' in {domain} domain refers to '{anchor}', which is not declared before it")]
    AnchorNotDeclaredBefore {
        domain: DomainKind,
        field: String,
        anchor: String,
    },

    #[error("Select field '{0}' has no choices")]
    MissingChoices(String),
}

/// How a question is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Select,
    Confirm,
}

/// Second gate, applied by the runner after planning
pub enum Visibility {
    Always,
    When(Predicate),
    /// Shown only when the existence check built from the answers reports
    /// the resource missing; `None` hides the question
    WhenMissing(ProbeFn),
}

/// Where a select field's options come from
pub enum Choices {
    #[cfg(test)]
    Static(Vec<String>),
    Lookup(KeyFn),
}

impl Choices {
    pub fn lookup<F>(f: F) -> Self
    where
        F: Fn(&Answers) -> LookupKey + Send + Sync + 'static,
    {
        Choices::Lookup(Box::new(f))
    }
}

/// Declarative description of one configurable value
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub message: String,
    default: Option<DefaultFn>,
    hidden_default: Option<Value>,
    validator: Option<Validator>,
    transformer: Option<Transformer>,
    visibility: Visibility,
    choices: Option<Choices>,
    override_of: Option<String>,
    asked_with: Option<String>,
    transient: bool,
}

impl FieldSpec {
    fn new(name: impl Into<String>, kind: FieldKind, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            message: message.into(),
            default: None,
            hidden_default: None,
            validator: None,
            transformer: None,
            visibility: Visibility::Always,
            choices: None,
            override_of: None,
            asked_with: None,
            transient: false,
        }
    }

    pub fn text(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text, message)
    }

    pub fn select(name: impl Into<String>, message: impl Into<String>, choices: Choices) -> Self {
        let mut field = Self::new(name, FieldKind::Select, message);
        field.choices = Some(choices);
        field
    }

    pub fn confirm(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Confirm, message)
    }

    /// Default: the stored value, else `value`
    pub fn default_value(self, value: Value) -> Self {
        self.default_with(move |_, stored| Some(stored.cloned().unwrap_or_else(|| value.clone())))
    }

    /// Default computed from earlier answers and the stored value
    pub fn default_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Answers, Option<&Value>) -> Option<Value> + Send + Sync + 'static,
    {
        self.default = Some(Box::new(f));
        self
    }

    /// Value recorded when the question is hidden, in place of the default
    pub fn when_hidden(mut self, value: Value) -> Self {
        self.hidden_default = Some(value);
        self
    }

    pub fn validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validator = Some(Box::new(f));
        self
    }

    pub fn transform<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.transformer = Some(Box::new(f));
        self
    }

    pub fn visible_when<F>(mut self, f: F) -> Self
    where
        F: Fn(&Answers) -> bool + Send + Sync + 'static,
    {
        self.visibility = Visibility::When(Box::new(f));
        self
    }

    pub fn visible_when_missing<F>(mut self, f: F) -> Self
    where
        F: Fn(&Answers) -> Option<LookupKey> + Send + Sync + 'static,
    {
        self.visibility = Visibility::WhenMissing(Box::new(f));
        self
    }

    /// Free-text sibling that supersedes the list selection in `base`.
    /// Override fields are never persisted.
    pub fn overrides(mut self, base: impl Into<String>) -> Self {
        self.override_of = Some(base.into());
        self.transient = true;
        self
    }

    /// Only planned when `base` is planned
    pub fn asked_with(mut self, base: impl Into<String>) -> Self {
        self.asked_with = Some(base.into());
        self
    }

    pub fn compute_default(&self, answers: &Answers, stored: Option<&Value>) -> Option<Value> {
        match &self.default {
            Some(f) => f(answers, stored),
            None => stored.cloned(),
        }
    }

    /// Value recorded when the question is hidden
    pub fn hidden_value(&self, answers: &Answers, stored: Option<&Value>) -> Value {
        match &self.hidden_default {
            Some(value) => value.clone(),
            None => self.compute_default(answers, stored).unwrap_or(Value::Null),
        }
    }

    pub fn check(&self, raw: &str) -> Result<(), String> {
        match &self.validator {
            Some(f) => f(raw),
            None => Ok(()),
        }
    }

    pub fn apply_transform(&self, value: Value) -> Value {
        match &self.transformer {
            Some(f) => f(value),
            None => value,
        }
    }

    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    pub fn choices(&self) -> Option<&Choices> {
        self.choices.as_ref()
    }

    pub fn override_of(&self) -> Option<&str> {
        self.override_of.as_deref()
    }

    /// Field whose planning decision this field follows
    pub fn anchor(&self) -> Option<&str> {
        self.override_of.as_deref().or(self.asked_with.as_deref())
    }

    pub fn is_transient(&self) -> bool {
        self.transient
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("override_of", &self.override_of)
            .field("asked_with", &self.asked_with)
            .finish_non_exhaustive()
    }
}

/// Named groups of fields, in the order they are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DomainKind {
    Project,
    Author,
    Aws,
    Lambda,
}

impl DomainKind {
    pub fn title(&self) -> &'static str {
        match self {
            DomainKind::Project => "Project",
            DomainKind::Author => "Author",
            DomainKind::Aws => "AWS",
            DomainKind::Lambda => "Lambda function",
        }
    }
}

impl fmt::Display for DomainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title().to_lowercase())
    }
}

/// Ordered field catalog for one domain
#[derive(Debug)]
pub struct Domain {
    kind: DomainKind,
    fields: Vec<FieldSpec>,
    persisted: bool,
}

impl Domain {
    /// Build a domain, checking that names are unique and that every
    /// anchored field comes after its anchor
    pub fn new(kind: DomainKind, fields: Vec<FieldSpec>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for field in &fields {
            if let Some(anchor) = field.anchor() {
                if !seen.contains(anchor) {
                    return Err(CatalogError::AnchorNotDeclaredBefore {
                        domain: kind,
                        field: field.name.clone(),
                        anchor: anchor.to_string(),
                    });
                }
            }
            if field.kind == FieldKind::Select && field.choices.is_none() {
                return Err(CatalogError::MissingChoices(field.name.clone()));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(CatalogError::DuplicateField {
                    domain: kind,
                    name: field.name.clone(),
                });
            }
        }

        Ok(Self {
            kind,
            fields,
            persisted: true,
        })
    }

    /// Answers of this domain are never written to the config store
    pub fn ephemeral(mut self) -> Self {
        self.persisted = false;
        self
    }

    pub fn kind(&self) -> DomainKind {
        self.kind
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_persisted(&self) -> bool {
        self.persisted
    }
}
