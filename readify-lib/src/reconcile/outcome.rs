//! Per-rule outcomes of a reconciliation pass.

use crate::reconcile::rules::RuleTable;
use serde::Serialize;
use serde_json::Value;

/// Which result list an outcome lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Ok,
    Warn,
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// The attribute was written.
    Added,
    /// The rule's selector matched no element.
    NotFound,
    /// The element already had the attribute; the page's value wins.
    AlreadyPresent,
    /// Rule selector or reference selector could not be parsed or is unsupported.
    InvalidSelector,
    AttributeNotAllowed,
    ValueTypeNotAllowed,
    /// A labelledby/describedby selector matched nothing.
    ReferenceNotFound,
}

impl OutcomeKind {
    pub fn bucket(self) -> Bucket {
        match self {
            OutcomeKind::Added => Bucket::Ok,
            OutcomeKind::NotFound | OutcomeKind::AlreadyPresent => Bucket::Warn,
            OutcomeKind::InvalidSelector
            | OutcomeKind::AttributeNotAllowed
            | OutcomeKind::ValueTypeNotAllowed
            | OutcomeKind::ReferenceNotFound => Bucket::Fail,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            OutcomeKind::Added => "Added",
            OutcomeKind::NotFound => "Not found",
            OutcomeKind::AlreadyPresent => "Already present, skipped",
            OutcomeKind::InvalidSelector => "Invalid selector",
            OutcomeKind::AttributeNotAllowed => "Attribute not allowed",
            OutcomeKind::ValueTypeNotAllowed => "Value-type not allowed",
            OutcomeKind::ReferenceNotFound => "Reference not found",
        }
    }
}

/// One record of what happened to a (selector, attribute) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub kind: OutcomeKind,
    pub selector: String,
    pub attribute: Option<String>,
    pub value: Option<Value>,
    pub message: String,
    pub details: Option<String>,
}

impl Outcome {
    pub fn new(kind: OutcomeKind, selector: &str) -> Self {
        Outcome {
            kind,
            selector: selector.to_string(),
            attribute: None,
            value: None,
            message: kind.message().to_string(),
            details: None,
        }
    }

    pub fn with_attribute(mut self, attribute: &str) -> Self {
        self.attribute = Some(attribute.to_string());
        self
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn bucket(&self) -> Bucket {
        self.kind.bucket()
    }
}

/// Everything one pass did, plus the table it ran with.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    pub ok: Vec<Outcome>,
    pub warn: Vec<Outcome>,
    pub fail: Vec<Outcome>,
    pub input: RuleTable,
}

impl ResultSet {
    pub fn new(input: RuleTable) -> Self {
        ResultSet {
            input,
            ..Default::default()
        }
    }

    /// Files the outcome under the bucket of its kind.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome.bucket() {
            Bucket::Ok => self.ok.push(outcome),
            Bucket::Warn => self.warn.push(outcome),
            Bucket::Fail => self.fail.push(outcome),
        }
    }

    pub fn len(&self) -> usize {
        self.ok.len() + self.warn.len() + self.fail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// No rule failed. Warnings do not count.
    pub fn is_clean(&self) -> bool {
        self.fail.is_empty()
    }

    /// All outcomes across buckets: fail, then warn, then ok.
    pub fn outcomes(&self) -> impl Iterator<Item = &Outcome> {
        self.fail.iter().chain(&self.warn).chain(&self.ok)
    }

    pub fn for_selector<'a>(&'a self, selector: &'a str) -> impl Iterator<Item = &'a Outcome> {
        self.outcomes().filter(move |o| o.selector == selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_land_in_their_bucket() {
        let mut result = ResultSet::default();
        result.record(Outcome::new(OutcomeKind::Added, "nav").with_attribute("role"));
        result.record(Outcome::new(OutcomeKind::NotFound, "output"));
        result.record(Outcome::new(OutcomeKind::AlreadyPresent, "nav").with_attribute("role"));
        result.record(
            Outcome::new(OutcomeKind::AttributeNotAllowed, "a").with_attribute("onclick"),
        );

        assert_eq!(result.ok.len(), 1);
        assert_eq!(result.warn.len(), 2);
        assert_eq!(result.fail.len(), 1);
        assert_eq!(result.len(), 4);
        assert!(!result.is_clean());
        assert_eq!(result.for_selector("nav").count(), 2);
        assert_eq!(result.fail[0].message, "Attribute not allowed");
    }
}
