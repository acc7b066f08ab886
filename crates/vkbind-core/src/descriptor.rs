//! Parsed descriptor tree.
//!
//! The ingestion engine never tokenizes the descriptor document itself. It works on an
//! already-parsed tree of [`Element`]s, each carrying a tag, attributes and an ordered
//! list of child nodes (nested elements and raw text). [`Element::parse_xml`] builds it
//! from XML text through `roxmltree`; tests build it through [`TypeDecl`].
//!
//! # Layout
//!
//! ```text
//! registry
//! └── types
//!     ├── type category="handle" ── <type>VK_DEFINE_HANDLE</type> <name>VkInstance</name>
//!     ├── type category="struct" name="VkExtent2D"
//!     │   ├── member ── <type>uint32_t</type> <name>width</name>
//!     │   └── member ── <type>uint32_t</type> <name>height</name>
//!     └── type category="union" name="VkClearValue"
//! ```

use std::fmt;

use crate::error::DescriptorError;

/// A node in the descriptor tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorNode {
    /// A nested element.
    Element(Element),
    /// Raw character data between elements.
    Text(String),
}

/// An element of the descriptor tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<DescriptorNode>,
}

impl Element {
    /// Create an element with no attributes or children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute. A repeated key replaces the earlier value.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Append a child element.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(DescriptorNode::Element(child));
        self
    }

    /// Append raw text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(DescriptorNode::Text(text.into()));
        self
    }

    /// Append a child element holding only text, e.g. `<name>width</name>`.
    pub fn with_text_child(self, tag: impl Into<String>, text: impl Into<String>) -> Self {
        self.with_child(Element::new(tag).with_text(text))
    }

    /// Set an attribute in place.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Append a child node in place.
    pub fn push(&mut self, node: DescriptorNode) {
        self.children.push(node);
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Look up an attribute value.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// All child nodes in document order.
    pub fn children(&self) -> &[DescriptorNode] {
        &self.children
    }

    /// Child elements in document order, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            DescriptorNode::Element(e) => Some(e),
            DescriptorNode::Text(_) => None,
        })
    }

    /// Child elements with the given tag, in document order.
    pub fn elements_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |e| e.tag == tag)
    }

    /// First child element with the given tag.
    pub fn element(&self, tag: &str) -> Option<&Element> {
        self.elements().find(|e| e.tag == tag)
    }

    /// Concatenated text of this element and all descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out, &[]);
        out
    }

    /// Concatenated descendant text, skipping any subtree whose tag is in `skip`.
    pub fn text_excluding(&self, skip: &[&str]) -> String {
        let mut out = String::new();
        self.collect_text(&mut out, skip);
        out
    }

    fn collect_text(&self, out: &mut String, skip: &[&str]) {
        for node in &self.children {
            match node {
                DescriptorNode::Text(t) => out.push_str(t),
                DescriptorNode::Element(e) if skip.contains(&e.tag.as_str()) => {}
                DescriptorNode::Element(e) => e.collect_text(out, skip),
            }
        }
    }

    /// Text of the first child element with the given tag.
    pub fn child_text(&self, tag: &str) -> Option<String> {
        self.element(tag).map(Element::text)
    }

    /// The declared name: the `name` attribute if present, otherwise the text of a
    /// `name` child element.
    pub fn declared_name(&self) -> Option<String> {
        self.attribute("name")
            .map(str::to_string)
            .or_else(|| self.child_text("name"))
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
    }
}

// ============================================================================
// XML
// ============================================================================

impl Element {
    /// Parse an XML document into a descriptor tree rooted at its root element.
    ///
    /// Comments and processing instructions are dropped. Text runs are kept verbatim,
    /// whitespace included, since member declarations are read from them.
    pub fn parse_xml(text: &str) -> Result<Element, DescriptorError> {
        let document = roxmltree::Document::parse(text)?;
        Ok(Element::from(document.root_element()))
    }
}

impl From<roxmltree::Node<'_, '_>> for Element {
    fn from(node: roxmltree::Node<'_, '_>) -> Self {
        let mut element = Element::new(node.tag_name().name());
        for attr in node.attributes() {
            element.set_attr(attr.name(), attr.value());
        }
        for child in node.children() {
            match child.node_type() {
                roxmltree::NodeType::Element => {
                    element.push(DescriptorNode::Element(Element::from(child)));
                }
                roxmltree::NodeType::Text => {
                    let text = child.text().unwrap_or_default();
                    element.push(DescriptorNode::Text(text.to_string()));
                }
                _ => {}
            }
        }
        element
    }
}

// ============================================================================
// Entity kinds
// ============================================================================

/// Category of a declared type entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    /// Opaque reference entity.
    Handle,
    /// Plain structure.
    Struct,
    /// Union, classified exactly like a structure.
    Union,
}

impl EntityKind {
    /// All kinds, in the order the driver processes them.
    pub const PASS_ORDER: [EntityKind; 3] =
        [EntityKind::Handle, EntityKind::Struct, EntityKind::Union];

    /// Parse the `category` attribute value.
    pub fn from_category(category: &str) -> Option<Self> {
        match category {
            "handle" => Some(EntityKind::Handle),
            "struct" => Some(EntityKind::Struct),
            "union" => Some(EntityKind::Union),
            _ => None,
        }
    }

    /// The `category` attribute value for this kind.
    pub fn category(&self) -> &'static str {
        match self {
            EntityKind::Handle => "handle",
            EntityKind::Struct => "struct",
            EntityKind::Union => "union",
        }
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, EntityKind::Struct | EntityKind::Union)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.category())
    }
}

/// A borrowed view of one `type` declaration in the descriptor.
///
/// `position` is the zero-based index among all `type` elements of the `types`
/// section, which makes diagnostics point at a stable location.
#[derive(Debug, Clone, Copy)]
pub struct RawEntity<'a> {
    pub kind: EntityKind,
    pub position: usize,
    pub node: &'a Element,
}

impl<'a> RawEntity<'a> {
    pub fn name(&self) -> Option<String> {
        self.node.declared_name()
    }

    /// Target of an `alias="..."` declaration, if this entry is an alias.
    pub fn alias_of(&self) -> Option<&'a str> {
        self.node.attribute("alias")
    }

    pub fn members(&self) -> impl Iterator<Item = &'a Element> {
        self.node.elements_named("member")
    }
}

/// All typed declarations of the descriptor rooted at `root`, in document order.
///
/// Entries whose `category` is not one of [`EntityKind`] are skipped.
pub fn type_entities(root: &Element) -> impl Iterator<Item = RawEntity<'_>> {
    root.elements_named("types")
        .flat_map(|types| types.elements_named("type"))
        .enumerate()
        .filter_map(|(position, node)| {
            let kind = EntityKind::from_category(node.attribute("category")?)?;
            Some(RawEntity {
                kind,
                position,
                node,
            })
        })
}

/// Declarations of one kind, in document order.
pub fn entities_of(root: &Element, kind: EntityKind) -> impl Iterator<Item = RawEntity<'_>> {
    type_entities(root).filter(move |e| e.kind == kind)
}

// ============================================================================
// Builders
// ============================================================================

/// Builder for `type` declarations.
///
/// # Example
///
/// ```
/// use vkbind_core::descriptor::{TypeDecl, registry};
///
/// let root = registry([
///     TypeDecl::handle("VkDevice", "VK_DEFINE_HANDLE"),
///     TypeDecl::structure("VkExtent2D")
///         .member("uint32_t", "width")
///         .member("uint32_t", "height"),
/// ]);
/// assert_eq!(vkbind_core::descriptor::type_entities(&root).count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct TypeDecl {
    element: Element,
}

impl TypeDecl {
    /// A handle declared with `<type>` and `<name>` children.
    pub fn handle(name: &str, representation: &str) -> Self {
        let element = Element::new("type")
            .with_attr("category", "handle")
            .with_text_child("type", representation)
            .with_text("(")
            .with_text_child("name", name)
            .with_text(")");
        Self { element }
    }

    /// A structure declared with a `name` attribute.
    pub fn structure(name: &str) -> Self {
        Self::aggregate("struct", name)
    }

    /// A union declared with a `name` attribute.
    pub fn union(name: &str) -> Self {
        Self::aggregate("union", name)
    }

    /// An alias entry: `<type category=".." name=".." alias=".."/>`.
    pub fn alias(kind: EntityKind, name: &str, target: &str) -> Self {
        let element = Element::new("type")
            .with_attr("category", kind.category())
            .with_attr("name", name)
            .with_attr("alias", target);
        Self { element }
    }

    fn aggregate(category: &str, name: &str) -> Self {
        let element = Element::new("type")
            .with_attr("category", category)
            .with_attr("name", name);
        Self { element }
    }

    /// A plain by-value member.
    pub fn member(self, ty: &str, name: &str) -> Self {
        self.member_with(
            Element::new("member")
                .with_text_child("type", ty)
                .with_text(" ")
                .with_text_child("name", name),
        )
    }

    /// A `const T* name` member.
    pub fn pointer_member(self, ty: &str, name: &str) -> Self {
        self.member_with(
            Element::new("member")
                .with_text("const ")
                .with_text_child("type", ty)
                .with_text("* ")
                .with_text_child("name", name),
        )
    }

    /// A `T name[len]` member.
    pub fn array_member(self, ty: &str, name: &str, len: &str) -> Self {
        let mut member = Element::new("member")
            .with_text_child("type", ty)
            .with_text(" ")
            .with_text_child("name", name);
        if len.chars().all(|c| c.is_ascii_digit()) {
            member = member.with_text(format!("[{len}]"));
        } else {
            member = member
                .with_text("[")
                .with_text_child("enum", len)
                .with_text("]");
        }
        self.member_with(member)
    }

    /// Append a hand-built `member` element.
    pub fn member_with(mut self, member: Element) -> Self {
        self.element.push(DescriptorNode::Element(member));
        self
    }

    pub fn into_element(self) -> Element {
        self.element
    }
}

impl From<TypeDecl> for Element {
    fn from(decl: TypeDecl) -> Self {
        decl.element
    }
}

/// Build a `registry` root with a single `types` section.
pub fn registry<I, T>(types: I) -> Element
where
    I: IntoIterator<Item = T>,
    T: Into<Element>,
{
    let section = types
        .into_iter()
        .fold(Element::new("types"), |section, ty| section.with_child(ty.into()));
    Element::new("registry").with_child(section)
}
