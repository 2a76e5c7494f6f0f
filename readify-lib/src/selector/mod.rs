//! CSS selector querying over the DOM tree.
//!
//! Selector text goes through two stages: LightningCSS checks that it is
//! syntactically valid CSS (`validate`), then `css_matcher` compiles it into
//! compound selectors and matches those against elements right to left.

pub mod css_matcher;
pub mod validate;

use crate::dom::dom_tree::{Document, NodeRef};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("invalid selector `{selector}`: {reason}")]
    Syntax { selector: String, reason: String },

    #[error("unsupported selector `{selector}`: {feature} is not supported")]
    Unsupported { selector: String, feature: String },
}

/// Every element matching `selector`, in document order.
pub fn query_selector_all(document: &Document, selector: &str) -> Result<Vec<NodeRef>, SelectorError> {
    validate::validate_selector(selector)?;
    let compiled = css_matcher::parse_selector_list(selector)?;
    Ok(document
        .elements()
        .into_iter()
        .filter(|element| {
            compiled
                .iter()
                .any(|complex| css_matcher::matches_complex_selector(element, complex))
        })
        .collect())
}

/// The first element matching `selector` in document order.
pub fn query_selector(document: &Document, selector: &str) -> Result<Option<NodeRef>, SelectorError> {
    Ok(query_selector_all(document, selector)?.into_iter().next())
}

/// True if any element in `document` carries exactly this id.
pub fn contains_id(document: &Document, id: &str) -> bool {
    document
        .elements()
        .iter()
        .any(|element| element.borrow().as_element().and_then(|e| e.id()) == Some(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::html::create_dom_tree;

    #[test]
    fn selector_groups_are_deduplicated_in_document_order() {
        let document = create_dom_tree(
            r#"<main><p class="a b" id="one"></p><p class="b" id="two"></p></main>"#,
        );
        let found = query_selector_all(&document, "p.b, #one, main").unwrap();
        let ids: Vec<String> = found
            .iter()
            .map(|n| {
                let node = n.borrow();
                let elem = node.as_element().unwrap();
                elem.id().unwrap_or(&elem.tag).to_string()
            })
            .collect();
        assert_eq!(ids, vec!["main", "one", "two"]);
    }

    #[test]
    fn unsupported_features_are_errors() {
        let document = create_dom_tree("<a href='/'>x</a>");
        let err = query_selector_all(&document, "a:has(b)").unwrap_err();
        assert!(matches!(err, SelectorError::Unsupported { .. }));
        assert!(query_selector_all(&document, "a:hover").unwrap().is_empty());
    }

    #[test]
    fn syntax_errors_are_reported() {
        let document = create_dom_tree("<a href='/'>x</a>");
        let err = query_selector(&document, "a[").unwrap_err();
        assert!(matches!(err, SelectorError::Syntax { .. }));
    }

    #[test]
    fn finds_ids() {
        let document = create_dom_tree("<div id='x'></div>");
        assert!(contains_id(&document, "x"));
        assert!(!contains_id(&document, "y"));
    }
}
