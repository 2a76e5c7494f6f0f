//! Parsing HTML into the crate's own DOM tree.
//!
//! html5ever does the tokenizing and tree construction; `ReadifyTreeSink`
//! receives the construction callbacks and builds a `dom_tree::Document`.

use crate::dom::dom_tree::{self, ElementNode, Node, NodeData, NodeRef};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{
    interface::{ElemName, ElementFlags, NodeOrText, QuirksMode, TreeSink},
    Attribute, LocalName, Namespace, QualName,
};
use log::debug;
use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

/// Parses a full HTML document.
///
/// html5ever never rejects input: malformed markup is repaired the same way a
/// browser would, and parse errors are only logged.
pub fn create_dom_tree(html_content: &str) -> dom_tree::Document {
    let tree_sink = ReadifyTreeSink::new();
    html5ever::parse_document(tree_sink, Default::default()).one(html_content.to_string())
}

/// Tree builder callbacks for html5ever.
pub struct ReadifyTreeSink {
    document: dom_tree::Document,
    quirks_mode: RefCell<QuirksMode>,
}

impl ReadifyTreeSink {
    pub fn new() -> Self {
        Self {
            document: dom_tree::new_document(),
            quirks_mode: RefCell::new(QuirksMode::NoQuirks),
        }
    }

    pub fn quirks_mode(&self) -> QuirksMode {
        *self.quirks_mode.borrow()
    }
}

impl Default for ReadifyTreeSink {
    fn default() -> Self {
        Self::new()
    }
}

/// Owned element name handed back to the tree builder.
#[derive(Debug)]
pub struct ReadifyElemName {
    ns: Namespace,
    local: LocalName,
}

impl ElemName for ReadifyElemName {
    fn ns(&self) -> &Namespace {
        &self.ns
    }

    fn local_name(&self) -> &LocalName {
        &self.local
    }
}

impl TreeSink for ReadifyTreeSink {
    type Handle = NodeRef;
    type Output = dom_tree::Document;
    type ElemName<'a>
        = ReadifyElemName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self.document
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        debug!("html parse error: {}", msg);
    }

    fn get_document(&self) -> Self::Handle {
        Rc::clone(&self.document.root)
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        match target.borrow().as_element() {
            Some(elem) => ReadifyElemName {
                ns: elem.qual_name.ns.clone(),
                local: elem.qual_name.local.clone(),
            },
            // html5ever only asks for names of elements it created.
            None => ReadifyElemName {
                ns: Namespace::from(""),
                local: LocalName::from(""),
            },
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        flags: ElementFlags,
    ) -> Self::Handle {
        let mut element = ElementNode::new(name);
        element.attributes = attrs
            .into_iter()
            .map(|attr| (attr.name, attr.value.to_string()))
            .collect();
        if flags.template {
            element.template_contents = Some(Node::new(NodeData::DocumentFragment));
        }
        Node::new(NodeData::Element(element))
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        Node::new(NodeData::Comment(text.to_string()))
    }

    fn create_pi(&self, target: StrTendril, data: StrTendril) -> Self::Handle {
        Node::new(NodeData::ProcessingInstruction {
            target: target.to_string(),
            data: data.to_string(),
        })
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        match child {
            NodeOrText::AppendNode(node) => dom_tree::append_child(parent, node),
            NodeOrText::AppendText(text) => dom_tree::append_text(parent, &text),
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        if dom_tree::parent_node(element).is_some() {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        *self.document.doctype.borrow_mut() = Some(dom_tree::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        });
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        let contents = target
            .borrow()
            .as_element()
            .and_then(|elem| elem.template_contents.clone());
        contents.unwrap_or_else(|| Rc::clone(target))
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        Rc::ptr_eq(x, y)
    }

    fn set_quirks_mode(&self, mode: QuirksMode) {
        *self.quirks_mode.borrow_mut() = mode;
    }

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        match new_node {
            NodeOrText::AppendNode(node) => dom_tree::insert_before(sibling, node),
            NodeOrText::AppendText(text) => dom_tree::insert_text_before(sibling, &text),
        }
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>) {
        let mut target_node = target.borrow_mut();
        if let Some(elem_node) = target_node.as_element_mut() {
            for attr in attrs {
                if !elem_node.has_attribute(&attr.name.local) {
                    elem_node
                        .attributes
                        .push((attr.name, attr.value.to_string()));
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        dom_tree::detach(target);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        dom_tree::reparent_children(node, new_parent);
    }
}
