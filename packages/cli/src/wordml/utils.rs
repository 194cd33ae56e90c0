//! XML navigation helpers for WordprocessingML trees.
//!
//! Tag and attribute names are compared by local name only, so `w:p` and a
//! `p` in any other prefix mapping are treated alike.

use roxmltree::Node;

/// Get the tag name without namespace prefix.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use condoc::wordml::get_tag_name;
///
/// let xml = r#"<w:body xmlns:w="urn:w"><w:p/></w:body>"#;
/// let doc = Document::parse(xml).unwrap();
/// let p = doc.root_element().first_element_child().unwrap();
/// assert_eq!(get_tag_name(p), "p");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Check if a node is an element with a specific local name.
pub fn has_tag(node: Node<'_, '_>, tag: &str) -> bool {
    node.is_element() && get_tag_name(node) == tag
}

/// Find the first child element with the given local name.
pub fn find_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| has_tag(*child, tag))
}

/// Get all element children of a node.
pub fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}

/// Get the `val` attribute of a node, whatever its prefix.
pub fn get_val<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.attributes()
        .find(|a| a.name() == "val")
        .map(|a| a.value())
}
