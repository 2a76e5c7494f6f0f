use html5ever::{LocalName, Namespace, QualName};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub mod dom_tree {
    use super::*;

    /// Shared handle to a node; the tree owns its children, children point back weakly.
    pub type NodeRef = Rc<RefCell<Node>>;
    pub type WeakNodeRef = Weak<RefCell<Node>>;

    #[derive(Debug)]
    pub struct Node {
        pub parent: Option<WeakNodeRef>,
        pub children: Vec<NodeRef>,
        pub data: NodeData,
    }

    #[derive(Debug, Clone)]
    pub enum NodeData {
        DocumentRoot,
        Element(ElementNode),
        Text(String),
        Comment(String),
        ProcessingInstruction { target: String, data: String },
        /// Holder of a `<template>` element's contents.
        DocumentFragment,
    }

    #[derive(Debug, Clone)]
    pub struct ElementNode {
        pub tag: String,
        pub qual_name: QualName,
        /// Attributes in source order. Serialization keeps this order.
        pub attributes: Vec<(QualName, String)>,
        /// Inert contents of a `<template>`, kept outside the element's children.
        pub template_contents: Option<NodeRef>,
    }

    #[derive(Debug)]
    pub struct Document {
        pub root: NodeRef,
        pub doctype: RefCell<Option<Doctype>>,
    }

    #[derive(Debug, Clone)]
    pub struct Doctype {
        pub name: String,
        pub public_id: String,
        pub system_id: String,
    }

    impl Node {
        pub fn new(data: NodeData) -> NodeRef {
            Rc::new(RefCell::new(Node {
                parent: None,
                children: Vec::new(),
                data,
            }))
        }

        pub fn as_element(&self) -> Option<&ElementNode> {
            match &self.data {
                NodeData::Element(elem) => Some(elem),
                _ => None,
            }
        }

        pub fn as_element_mut(&mut self) -> Option<&mut ElementNode> {
            match &mut self.data {
                NodeData::Element(elem) => Some(elem),
                _ => None,
            }
        }

        pub fn is_element(&self) -> bool {
            matches!(self.data, NodeData::Element(_))
        }
    }

    impl ElementNode {
        pub fn new(qual_name: QualName) -> Self {
            ElementNode {
                tag: qual_name.local.to_string(),
                qual_name,
                attributes: Vec::new(),
                template_contents: None,
            }
        }

        /// Attribute lookup by local name, ASCII case-insensitive as in HTML documents.
        pub fn get_attribute(&self, name: &str) -> Option<&str> {
            self.attributes
                .iter()
                .find(|(key, _)| (&*key.local).eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str())
        }

        pub fn has_attribute(&self, name: &str) -> bool {
            self.get_attribute(name).is_some()
        }

        /// Replaces the value of an existing attribute or appends a new one.
        pub fn set_attribute(&mut self, name: &str, value: &str) {
            if let Some((_, existing)) = self
                .attributes
                .iter_mut()
                .find(|(key, _)| (&*key.local).eq_ignore_ascii_case(name))
            {
                *existing = value.to_string();
                return;
            }
            let qual_name = QualName::new(
                None,
                Namespace::from(""),
                LocalName::from(name.to_ascii_lowercase()),
            );
            self.attributes.push((qual_name, value.to_string()));
        }

        /// The element's id, treating an empty `id=""` as absent.
        pub fn id(&self) -> Option<&str> {
            self.get_attribute("id").filter(|id| !id.is_empty())
        }

        pub fn classes(&self) -> impl Iterator<Item = &str> {
            self.get_attribute("class")
                .unwrap_or("")
                .split_ascii_whitespace()
        }
    }

    impl Document {
        /// All element nodes in document order (pre-order depth-first).
        pub fn elements(&self) -> Vec<NodeRef> {
            let mut out = Vec::new();
            collect_elements(&self.root, &mut out);
            out
        }
    }

    fn collect_elements(node: &NodeRef, out: &mut Vec<NodeRef>) {
        let node_ref = node.borrow();
        for child in &node_ref.children {
            if child.borrow().is_element() {
                out.push(Rc::clone(child));
            }
            collect_elements(child, out);
        }
    }

    pub fn new_document() -> Document {
        Document {
            root: Node::new(NodeData::DocumentRoot),
            doctype: RefCell::new(None),
        }
    }

    /// Removes `node` from its parent's child list, if it has one.
    pub fn detach(node: &NodeRef) {
        let parent = node.borrow_mut().parent.take();
        if let Some(parent) = parent.and_then(|weak| weak.upgrade()) {
            parent
                .borrow_mut()
                .children
                .retain(|child| !Rc::ptr_eq(child, node));
        }
    }

    /// Appends `child` as the last child of `parent`, detaching it from any previous parent.
    pub fn append_child(parent: &NodeRef, child: NodeRef) {
        detach(&child);
        child.borrow_mut().parent = Some(Rc::downgrade(parent));
        parent.borrow_mut().children.push(child);
    }

    /// Appends text to `parent`, merging with a trailing text node.
    pub fn append_text(parent: &NodeRef, text: &str) {
        if let Some(last) = parent.borrow().children.last() {
            if let NodeData::Text(existing) = &mut last.borrow_mut().data {
                existing.push_str(text);
                return;
            }
        }
        append_child(parent, Node::new(NodeData::Text(text.to_string())));
    }

    /// Inserts `child` immediately before `sibling`. No-op when `sibling` is detached.
    pub fn insert_before(sibling: &NodeRef, child: NodeRef) {
        let Some(parent) = parent_node(sibling) else {
            return;
        };
        detach(&child);
        child.borrow_mut().parent = Some(Rc::downgrade(&parent));
        let mut parent_mut = parent.borrow_mut();
        let index = parent_mut
            .children
            .iter()
            .position(|c| Rc::ptr_eq(c, sibling))
            .unwrap_or(parent_mut.children.len());
        parent_mut.children.insert(index, child);
    }

    /// Inserts text before `sibling`, merging with a preceding text node.
    pub fn insert_text_before(sibling: &NodeRef, text: &str) {
        let Some(parent) = parent_node(sibling) else {
            return;
        };
        {
            let parent_ref = parent.borrow();
            let index = parent_ref
                .children
                .iter()
                .position(|c| Rc::ptr_eq(c, sibling));
            if let Some(prev) = index.and_then(|i| i.checked_sub(1)) {
                if let NodeData::Text(existing) = &mut parent_ref.children[prev].borrow_mut().data {
                    existing.push_str(text);
                    return;
                }
            }
        }
        insert_before(sibling, Node::new(NodeData::Text(text.to_string())));
    }

    /// Moves every child of `node` to the end of `new_parent`.
    pub fn reparent_children(node: &NodeRef, new_parent: &NodeRef) {
        let children = std::mem::take(&mut node.borrow_mut().children);
        for child in &children {
            child.borrow_mut().parent = Some(Rc::downgrade(new_parent));
        }
        new_parent.borrow_mut().children.extend(children);
    }

    pub fn parent_node(node: &NodeRef) -> Option<NodeRef> {
        node.borrow().parent.as_ref().and_then(|weak| weak.upgrade())
    }

    /// The parent, if it is an element (the document root is not).
    pub fn parent_element(node: &NodeRef) -> Option<NodeRef> {
        parent_node(node).filter(|parent| parent.borrow().is_element())
    }

    /// Element siblings preceding `node`, nearest first.
    pub fn previous_element_siblings(node: &NodeRef) -> Vec<NodeRef> {
        let Some(parent) = parent_node(node) else {
            return Vec::new();
        };
        let parent_ref = parent.borrow();
        let mut siblings = Vec::new();
        for child in &parent_ref.children {
            if Rc::ptr_eq(child, node) {
                break;
            }
            if child.borrow().is_element() {
                siblings.push(Rc::clone(child));
            }
        }
        siblings.reverse();
        siblings
    }
}

#[cfg(test)]
mod tests {
    use super::dom_tree::*;
    use super::*;

    fn element(tag: &str) -> NodeRef {
        let name = QualName::new(None, Namespace::from(""), LocalName::from(tag));
        Node::new(NodeData::Element(ElementNode::new(name)))
    }

    #[test]
    fn set_attribute_replaces_case_insensitively() {
        let mut elem = ElementNode::new(QualName::new(
            None,
            Namespace::from(""),
            LocalName::from("nav"),
        ));
        elem.set_attribute("Role", "navigation");
        elem.set_attribute("role", "menu");
        assert_eq!(elem.attributes.len(), 1);
        assert_eq!(elem.get_attribute("ROLE"), Some("menu"));
    }

    #[test]
    fn empty_id_counts_as_missing() {
        let mut elem = ElementNode::new(QualName::new(
            None,
            Namespace::from(""),
            LocalName::from("p"),
        ));
        elem.set_attribute("id", "");
        assert_eq!(elem.id(), None);
        elem.set_attribute("id", "intro");
        assert_eq!(elem.id(), Some("intro"));
    }

    #[test]
    fn text_is_merged_on_append() {
        let doc = new_document();
        let p = element("p");
        append_child(&doc.root, Rc::clone(&p));
        append_text(&p, "Hello ");
        append_text(&p, "world");
        let p_ref = p.borrow();
        assert_eq!(p_ref.children.len(), 1);
        match &p_ref.children[0].borrow().data {
            NodeData::Text(text) => assert_eq!(text, "Hello world"),
            other => panic!("expected text, got {:?}", other),
        };
    }

    #[test]
    fn siblings_and_reparenting() {
        let doc = new_document();
        let body = element("body");
        append_child(&doc.root, Rc::clone(&body));
        let a = element("a");
        let b = element("b");
        let c = element("c");
        append_child(&body, Rc::clone(&a));
        append_child(&body, Rc::clone(&c));
        insert_before(&c, Rc::clone(&b));

        let before_c = previous_element_siblings(&c);
        assert_eq!(before_c.len(), 2);
        assert!(Rc::ptr_eq(&before_c[0], &b));
        assert!(Rc::ptr_eq(&before_c[1], &a));

        let div = element("div");
        append_child(&doc.root, Rc::clone(&div));
        reparent_children(&body, &div);
        assert!(body.borrow().children.is_empty());
        assert!(Rc::ptr_eq(&parent_element(&a).unwrap(), &div));
        assert_eq!(doc.elements().len(), 5);
    }
}
