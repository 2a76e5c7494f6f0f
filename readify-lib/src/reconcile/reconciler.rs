use crate::query::DocumentQuery;
use crate::reconcile::labels::{CounterScope, LabelIds};
use crate::reconcile::outcome::{Outcome, OutcomeKind, ResultSet};
use crate::reconcile::policy::{self, ReferenceKind};
use crate::reconcile::rules::{build_table, Defaults, RuleTable};
use crate::reconcile::value::AttrValue;
use log::{debug, info};
use serde_json::Value;

/// Applies a rule table to documents.
///
/// The table is resolved once, when the reconciler is built. Each call to
/// [`Reconciler::reconcile`] is a single synchronous pass over one document
/// and never fails: every problem ends up as an outcome in the returned
/// [`ResultSet`].
#[derive(Debug, Clone)]
pub struct Reconciler {
    table: RuleTable,
    counter_scope: CounterScope,
    labels: LabelIds,
}

impl Reconciler {
    pub fn new(defaults: &Defaults, overrides: Option<&RuleTable>) -> Self {
        Reconciler {
            table: build_table(defaults, overrides),
            counter_scope: CounterScope::default(),
            labels: LabelIds::new(),
        }
    }

    /// Uses `table` as is, bypassing defaults and merging.
    pub fn from_table(table: RuleTable) -> Self {
        Reconciler {
            table,
            counter_scope: CounterScope::default(),
            labels: LabelIds::new(),
        }
    }

    pub fn with_counter_scope(mut self, counter_scope: CounterScope) -> Self {
        self.counter_scope = counter_scope;
        self
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    pub fn counter_scope(&self) -> CounterScope {
        self.counter_scope
    }

    pub fn reconcile<D: DocumentQuery>(&mut self, document: &mut D) -> ResultSet {
        if self.counter_scope == CounterScope::PerCall {
            self.labels.reset();
        }
        let mut result = ResultSet::new(self.table.clone());

        for (selector, attributes) in self.table.iter() {
            if policy::is_directive(selector) {
                debug!("skipping directive {}", selector);
                continue;
            }

            let elements = match document.query_selector_all(selector) {
                Ok(elements) => elements,
                Err(err) => {
                    result.record(
                        Outcome::new(OutcomeKind::InvalidSelector, selector)
                            .with_details(err.to_string()),
                    );
                    continue;
                }
            };
            if elements.is_empty() {
                result.record(Outcome::new(OutcomeKind::NotFound, selector));
                continue;
            }

            debug!("{} matched {} element(s)", selector, elements.len());
            for element in &elements {
                for (name, raw) in attributes {
                    apply_attribute(
                        document,
                        &mut self.labels,
                        selector,
                        element,
                        name,
                        raw,
                        &mut result,
                    );
                }
            }
        }

        info!(
            "reconciled {} rule(s): {} added, {} warning(s), {} failure(s)",
            self.table.selectors().count(),
            result.ok.len(),
            result.warn.len(),
            result.fail.len()
        );
        result
    }
}

/// Reconciles `document` with a fresh reconciler (per-call id counter).
pub fn reconcile<D: DocumentQuery>(
    document: &mut D,
    defaults: &Defaults,
    overrides: Option<&RuleTable>,
) -> ResultSet {
    Reconciler::new(defaults, overrides).reconcile(document)
}

/// Handles one (element, attribute) pair of a rule.
fn apply_attribute<D: DocumentQuery>(
    document: &mut D,
    labels: &mut LabelIds,
    selector: &str,
    element: &D::Element,
    name: &str,
    raw: &Value,
    result: &mut ResultSet,
) {
    if policy::is_note(name) {
        return;
    }
    if !policy::is_allowed_attribute(name) {
        result.record(
            Outcome::new(OutcomeKind::AttributeNotAllowed, selector)
                .with_attribute(name)
                .with_details(format!("allowed: {}", policy::ALLOWED_ATTRIBUTES_HINT)),
        );
        return;
    }
    let value = match AttrValue::try_from(raw) {
        Ok(value) => value,
        Err(err) => {
            result.record(
                Outcome::new(OutcomeKind::ValueTypeNotAllowed, selector)
                    .with_attribute(name)
                    .with_value(raw.clone())
                    .with_details(err.to_string()),
            );
            return;
        }
    };

    let (attribute, text) = match ReferenceKind::from_attribute(name) {
        Some(kind) => {
            let reference = value.to_string();
            let target = match document.query_selector(&reference) {
                Ok(Some(target)) => target,
                Ok(None) => {
                    result.record(
                        Outcome::new(OutcomeKind::ReferenceNotFound, selector)
                            .with_attribute(name)
                            .with_value(raw.clone()),
                    );
                    return;
                }
                Err(err) => {
                    result.record(
                        Outcome::new(OutcomeKind::InvalidSelector, selector)
                            .with_attribute(name)
                            .with_value(raw.clone())
                            .with_details(err.to_string()),
                    );
                    return;
                }
            };
            let id = match document.element_id(&target) {
                Some(id) => id,
                None => {
                    let id = labels.next_id(document);
                    debug!("assigning id {} to reference target {}", id, reference);
                    document.set_element_id(&target, &id);
                    id
                }
            };
            (kind.canonical_attribute().to_string(), id)
        }
        None => (name.to_ascii_lowercase(), value.to_string()),
    };

    if document.has_attribute(element, &attribute) {
        result.record(
            Outcome::new(OutcomeKind::AlreadyPresent, selector)
                .with_attribute(&attribute)
                .with_value(Value::String(text)),
        );
    } else {
        document.set_attribute(element, &attribute, &text);
        result.record(
            Outcome::new(OutcomeKind::Added, selector)
                .with_attribute(&attribute)
                .with_value(Value::String(text)),
        );
    }
}
