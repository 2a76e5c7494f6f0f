//! Writing the DOM tree back out as HTML.

use crate::dom::dom_tree::{Doctype, Document, NodeData, NodeRef};
use html5ever::serialize::{serialize, Serialize, SerializeOpts, Serializer, TraversalScope};
use std::io::{self, Write};

struct SerializableDocument<'a>(&'a Document);

impl Serialize for SerializableDocument<'_> {
    fn serialize<S: Serializer>(
        &self,
        serializer: &mut S,
        _traversal_scope: TraversalScope,
    ) -> io::Result<()> {
        serialize_node(&self.0.root, serializer)
    }
}

fn serialize_node<S: Serializer>(node: &NodeRef, serializer: &mut S) -> io::Result<()> {
    let node_ref = node.borrow();
    match &node_ref.data {
        NodeData::DocumentRoot | NodeData::DocumentFragment => {
            for child in &node_ref.children {
                serialize_node(child, serializer)?;
            }
        }
        NodeData::Element(elem) => {
            serializer.start_elem(
                elem.qual_name.clone(),
                elem.attributes
                    .iter()
                    .map(|(name, value)| (name, value.as_str())),
            )?;
            if let Some(contents) = &elem.template_contents {
                serialize_node(contents, serializer)?;
            }
            for child in &node_ref.children {
                serialize_node(child, serializer)?;
            }
            serializer.end_elem(elem.qual_name.clone())?;
        }
        NodeData::Text(text) => serializer.write_text(text)?,
        NodeData::Comment(text) => serializer.write_comment(text)?,
        NodeData::ProcessingInstruction { target, data } => {
            serializer.write_processing_instruction(target, data)?
        }
    }
    Ok(())
}

/// html5ever's serializer only writes the doctype name, so legacy public and
/// system identifiers are written here.
fn write_doctype<W: Write>(writer: &mut W, doctype: &Doctype) -> io::Result<()> {
    write!(writer, "<!DOCTYPE {}", doctype.name)?;
    if !doctype.public_id.is_empty() {
        write!(writer, " PUBLIC {}", quoted(&doctype.public_id))?;
        if !doctype.system_id.is_empty() {
            write!(writer, " {}", quoted(&doctype.system_id))?;
        }
    } else if !doctype.system_id.is_empty() {
        write!(writer, " SYSTEM {}", quoted(&doctype.system_id))?;
    }
    writer.write_all(b">")
}

fn quoted(identifier: &str) -> String {
    if identifier.contains('"') {
        format!("'{}'", identifier)
    } else {
        format!("\"{}\"", identifier)
    }
}

/// Serializes a whole document, doctype included.
pub fn to_html(document: &Document) -> io::Result<String> {
    let mut buffer = Vec::new();
    if let Some(doctype) = &*document.doctype.borrow() {
        write_doctype(&mut buffer, doctype)?;
    }
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::ChildrenOnly(None),
        ..Default::default()
    };
    serialize(&mut buffer, &SerializableDocument(document), opts)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::html::create_dom_tree;
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trips_markup() {
        let html = "<!DOCTYPE html><html><head><title>Docs</title></head>\
                    <body><!-- nav --><nav id=\"primary\"><a href=\"/\">Home</a></nav>\
                    <img src=\"a.png\" alt=\"\"><br></body></html>";
        let document = create_dom_tree(html);
        assert_eq!(to_html(&document).unwrap(), html);
    }

    #[test]
    fn keeps_legacy_doctype_identifiers() {
        let html = "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Transitional//EN\" \
                    \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd\">\
                    <html><head></head><body><p>Legacy</p></body></html>";
        let document = create_dom_tree(html);
        assert_eq!(to_html(&document).unwrap(), html);

        let system_only = "<!DOCTYPE html SYSTEM \"about:legacy-compat\"><html><head></head><body></body></html>";
        let document = create_dom_tree(system_only);
        assert_eq!(to_html(&document).unwrap(), system_only);
    }

    #[test]
    fn writes_template_contents() {
        let html = "<html><head><template><nav><a href=\"/\">x</a></nav></template></head><body></body></html>";
        let document = create_dom_tree(html);
        assert_eq!(to_html(&document).unwrap(), html);
    }

    #[test]
    fn escapes_text_but_not_script() {
        let html = "<html><head><script>if (a < b) {}</script></head><body>a &lt; b</body></html>";
        let document = create_dom_tree(html);
        assert_eq!(to_html(&document).unwrap(), html);
    }
}
