//! Accessibility-attribute reconciliation.
//!
//! A rule table maps CSS selectors to the ARIA/role attributes their
//! elements should carry. A pass adds the attributes that are missing,
//! leaves page-authored values alone, resolves `aria-labelledby` and
//! `aria-describedby` references to element ids, and records one outcome per
//! attempted (selector, attribute) pair in `ok`, `warn` or `fail`.

pub mod labels;
pub mod outcome;
pub mod policy;
pub mod reconciler;
pub mod rules;
pub mod value;

pub use labels::{CounterScope, LabelIds, ID_PREFIX};
pub use outcome::{Bucket, Outcome, OutcomeKind, ResultSet};
pub use reconciler::{reconcile, Reconciler};
pub use rules::{build_table, Defaults, RuleTable};
pub use value::AttrValue;
