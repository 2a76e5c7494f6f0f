//! The document capabilities the reconciler needs: selector queries and
//! attribute access. The reconciler is generic over this trait, so it can run
//! against any DOM, not only the one built by `parser::html`.

use crate::dom::dom_tree::{Document, NodeRef};
use crate::selector::{self, SelectorError};

pub trait DocumentQuery {
    type Element: Clone;

    /// Elements matching `selector` in document order.
    fn query_selector_all(&self, selector: &str) -> Result<Vec<Self::Element>, SelectorError>;

    /// The first element matching `selector`.
    fn query_selector(&self, selector: &str) -> Result<Option<Self::Element>, SelectorError> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    fn get_attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    fn has_attribute(&self, element: &Self::Element, name: &str) -> bool {
        self.get_attribute(element, name).is_some()
    }

    fn set_attribute(&mut self, element: &Self::Element, name: &str, value: &str);

    /// Non-empty id of the element.
    fn element_id(&self, element: &Self::Element) -> Option<String> {
        self.get_attribute(element, "id").filter(|id| !id.is_empty())
    }

    fn set_element_id(&mut self, element: &Self::Element, id: &str) {
        self.set_attribute(element, "id", id);
    }

    /// True if some element of the document already uses `id`.
    fn contains_id(&self, id: &str) -> bool;
}

impl DocumentQuery for Document {
    type Element = NodeRef;

    fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeRef>, SelectorError> {
        selector::query_selector_all(self, selector)
    }

    fn get_attribute(&self, element: &NodeRef, name: &str) -> Option<String> {
        element
            .borrow()
            .as_element()
            .and_then(|elem| elem.get_attribute(name).map(String::from))
    }

    fn has_attribute(&self, element: &NodeRef, name: &str) -> bool {
        element
            .borrow()
            .as_element()
            .is_some_and(|elem| elem.has_attribute(name))
    }

    fn set_attribute(&mut self, element: &NodeRef, name: &str, value: &str) {
        if let Some(elem) = element.borrow_mut().as_element_mut() {
            elem.set_attribute(name, value);
        }
    }

    fn contains_id(&self, id: &str) -> bool {
        selector::contains_id(self, id)
    }
}
