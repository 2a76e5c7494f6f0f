//! readify - adds missing ARIA roles and attributes to static HTML pages.
//!
//! A page is parsed into an in-memory DOM (`parser::html`), a rule table of
//! CSS selectors and the attributes their elements should carry is applied
//! to it (`reconcile`), and the page is written back out
//! (`parser::serialize`). Every attempted change is reported as an outcome
//! instead of an error, so one bad rule never stops a build.

pub mod config;
pub mod dom;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod query;
pub mod reconcile;
pub mod report;
pub mod selector;

pub use config::ReadifyConfig;
pub use error::{ReadifyError, Result};
pub use query::DocumentQuery;
pub use reconcile::{reconcile, Defaults, Reconciler, ResultSet, RuleTable};
