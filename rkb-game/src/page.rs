//! The page a setup is written into.
//!
//! Parts build their sections through [`Page`] and keep [`FieldHandle`]s to
//! the elements they later write. Elements are looked up by *key*: a key
//! starting with `.` matches a class (`".boards"` finds `<div class="boards">`),
//! any other key matches an id (`"b0"` finds `<output id="b0">`).
//!
//! [`MemoryPage`] is the in-process implementation used by tests and the
//! command-line tester; the browser crate implements the same traits over
//! the DOM.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::{SetupError, SetupResult};

/// A readable and writable element on the page.
pub trait Field: fmt::Debug {
    /// Current value (`value` for inputs, text content otherwise).
    fn value(&self) -> String;
    fn set_value(&self, value: &str);
    fn set_class(&self, class_name: &str);
    fn set_text(&self, text: &str);
    fn is_checked(&self) -> bool;
    fn set_checked(&self, checked: bool);
}

/// Shared handle to a page element.
pub type FieldHandle = Rc<dyn Field>;

/// Where a new element goes relative to an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Last child of the element matching the key.
    Append(String),
    /// First child of the element matching the key.
    Prepend(String),
    /// Next sibling of the element matching the key.
    After(String),
}

impl Placement {
    #[must_use]
    pub fn append(key: &str) -> Self {
        Self::Append(key.to_string())
    }

    #[must_use]
    pub fn prepend(key: &str) -> Self {
        Self::Prepend(key.to_string())
    }

    #[must_use]
    pub fn after(key: &str) -> Self {
        Self::After(key.to_string())
    }

    #[must_use]
    pub fn anchor(&self) -> &str {
        match self {
            Self::Append(key) | Self::Prepend(key) | Self::After(key) => key,
        }
    }
}

/// Description of an element tree to insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementSpec {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<ElementSpec>,
}

impl ElementSpec {
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    /// A bare text node, rendered without a tag.
    #[must_use]
    pub fn text_node(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    #[must_use]
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    #[must_use]
    pub fn class(self, class_name: &str) -> Self {
        self.attr("class", class_name)
    }

    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn is_text_node(&self) -> bool {
        self.tag.is_empty()
    }

    #[must_use]
    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Shorthand for `<output type="text" id=..>`.
#[must_use]
pub fn output_field(id: &str) -> ElementSpec {
    ElementSpec::new("output").attr("type", "text").id(id)
}

/// Shorthand for a checked checkbox.
#[must_use]
pub fn checked_checkbox(id: &str) -> ElementSpec {
    ElementSpec::new("input")
        .attr("type", "checkbox")
        .id(id)
        .attr("checked", "checked")
}

/// Element creation and lookup, implemented over the DOM or in memory.
pub trait Page {
    /// Whether any element matches `key`.
    fn contains(&self, key: &str) -> bool;

    /// Insert `spec` (and its children) relative to an existing element.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::MissingSection`] when the anchor does not exist,
    /// or [`SetupError::Page`] when the implementation cannot build the element.
    fn insert(&mut self, spec: ElementSpec, at: Placement) -> SetupResult<()>;

    /// Handle to the first element matching `key`.
    fn field(&self, key: &str) -> Option<FieldHandle>;

    /// Whether the checkbox or radio matching `key` exists and is checked.
    fn is_checked(&self, key: &str) -> bool {
        self.field(key).is_some_and(|field| field.is_checked())
    }
}

/// Take the page out of an optional context argument.
///
/// # Errors
///
/// Returns [`SetupError::MissingContext`] when no page was supplied.
pub fn require_page(page: Option<&mut dyn Page>) -> SetupResult<&mut dyn Page> {
    page.ok_or(SetupError::MissingContext)
}

/// Look up an element that must exist.
///
/// # Errors
///
/// Returns [`SetupError::MissingSection`] when nothing matches `key`.
pub fn locate(page: &dyn Page, key: &str) -> SetupResult<FieldHandle> {
    page.field(key)
        .ok_or_else(|| SetupError::MissingSection(key.to_string()))
}

#[derive(Debug, Default)]
struct Node {
    tag: String,
    attrs: Vec<(String, String)>,
    text: String,
    value: String,
    checked: bool,
    children: Vec<NodeRef>,
}

type NodeRef = Rc<RefCell<Node>>;

impl Node {
    fn from_spec(spec: &ElementSpec) -> NodeRef {
        let checked = spec.attr_value("checked").is_some();
        let value = spec.attr_value("value").unwrap_or_default().to_string();
        let node = Self {
            tag: spec.tag.clone(),
            attrs: spec.attrs.clone(),
            text: spec.text.clone().unwrap_or_default(),
            value,
            checked,
            children: spec.children.iter().map(Self::from_spec).collect(),
        };
        Rc::new(RefCell::new(node))
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn set_attr(&mut self, name: &str, value: &str) {
        if let Some(slot) = self.attrs.iter_mut().find(|(key, _)| key == name) {
            slot.1 = value.to_string();
        } else {
            self.attrs.push((name.to_string(), value.to_string()));
        }
    }

    fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(key, _)| key != name);
    }

    fn matches(&self, key: &str) -> bool {
        if self.tag.is_empty() {
            return false;
        }
        match key.strip_prefix('.') {
            Some(class_name) => self
                .attr("class")
                .is_some_and(|classes| classes.split_whitespace().any(|c| c == class_name)),
            None => self.attr("id") == Some(key.trim_start_matches('#')),
        }
    }

    fn is_form_input(&self) -> bool {
        self.tag == "input"
    }

    fn input_type(&self) -> &str {
        self.attr("type").unwrap_or("text")
    }
}

/// Element handle into a [`MemoryPage`].
#[derive(Clone)]
pub struct MemoryField(NodeRef);

impl fmt::Debug for MemoryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.0.borrow();
        f.debug_struct("MemoryField")
            .field("tag", &node.tag)
            .field("id", &node.attr("id"))
            .finish()
    }
}

impl MemoryField {
    /// Class attribute currently set on the element.
    #[must_use]
    pub fn class_name(&self) -> String {
        self.0.borrow().attr("class").unwrap_or_default().to_string()
    }

    /// Text content of the element and its descendants.
    #[must_use]
    pub fn text(&self) -> String {
        fn collect(node: &NodeRef, out: &mut String) {
            let node = node.borrow();
            out.push_str(&node.text);
            for child in &node.children {
                collect(child, out);
            }
        }
        let mut out = String::new();
        collect(&self.0, &mut out);
        out
    }
}

impl Field for MemoryField {
    fn value(&self) -> String {
        let node = self.0.borrow();
        if node.is_form_input() || node.tag == "output" {
            node.value.clone()
        } else {
            node.text.clone()
        }
    }

    fn set_value(&self, value: &str) {
        let mut node = self.0.borrow_mut();
        if node.tag == "output" {
            node.text = value.to_string();
        }
        node.value = value.to_string();
    }

    fn set_class(&self, class_name: &str) {
        self.0.borrow_mut().set_attr("class", class_name);
    }

    fn set_text(&self, text: &str) {
        let mut node = self.0.borrow_mut();
        node.children.clear();
        node.text = text.to_string();
    }

    fn is_checked(&self) -> bool {
        self.0.borrow().checked
    }

    fn set_checked(&self, checked: bool) {
        let mut node = self.0.borrow_mut();
        node.checked = checked;
        if checked {
            node.set_attr("checked", "checked");
        } else {
            node.remove_attr("checked");
        }
    }
}

/// In-memory page with the randomizer's starting markup.
///
/// The fresh page holds a `content` section with the `randomSetup` button,
/// mirroring the static HTML the browser front end is served with.
#[derive(Debug, Clone)]
pub struct MemoryPage {
    body: NodeRef,
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPage {
    #[must_use]
    pub fn new() -> Self {
        let body = ElementSpec::new("body")
            .child(ElementSpec::new("h1").text("Kingdom Builder Random Setup"))
            .child(
                ElementSpec::new("div").class("content").child(
                    ElementSpec::new("p").child(
                        ElementSpec::new("button")
                            .class("randomSetup")
                            .attr("type", "button")
                            .text("Make random setup"),
                    ),
                ),
            );
        Self {
            body: Node::from_spec(&body),
        }
    }

    /// A page with nothing but an empty body.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            body: Node::from_spec(&ElementSpec::new("body")),
        }
    }

    /// Number of elements matching `key`.
    #[must_use]
    pub fn count(&self, key: &str) -> usize {
        fn walk(node: &NodeRef, key: &str) -> usize {
            let node = node.borrow();
            let own = usize::from(node.matches(key));
            own + node.children.iter().map(|c| walk(c, key)).sum::<usize>()
        }
        walk(&self.body, key)
    }

    /// Concrete handle, exposing the class and text accessors.
    #[must_use]
    pub fn element(&self, key: &str) -> Option<MemoryField> {
        find(&self.body, key).map(MemoryField)
    }

    /// Check the radio with id `key` and clear the rest of its group.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::MissingField`] when no radio has that id.
    pub fn select_radio(&self, key: &str) -> SetupResult<()> {
        let radio = find(&self.body, key).ok_or_else(|| SetupError::MissingField(key.into()))?;
        let group = radio.borrow().attr("name").unwrap_or_default().to_string();
        let mut members = Vec::new();
        collect_where(&self.body, &mut members, &|node| {
            node.input_type() == "radio" && node.attr("name") == Some(group.as_str())
        });
        for member in members {
            MemoryField(member).set_checked(false);
        }
        MemoryField(radio).set_checked(true);
        Ok(())
    }

    /// Serialise the page to HTML markup.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::from("<!DOCTYPE html>\n<html>\n<head>\n");
        out.push_str("<meta charset=\"UTF-8\">\n<title>Kingdom Builder Randomizer</title>\n");
        out.push_str("</head>\n");
        write_node(&self.body, &mut out);
        out.push_str("\n</html>\n");
        out
    }

    /// Drop the first element matching `key` together with its subtree.
    pub fn remove(&mut self, key: &str) -> bool {
        fn walk(node: &NodeRef, key: &str) -> bool {
            let mut parent = node.borrow_mut();
            if let Some(pos) = parent.children.iter().position(|c| c.borrow().matches(key)) {
                parent.children.remove(pos);
                return true;
            }
            parent.children.iter().any(|c| walk(c, key))
        }
        walk(&self.body, key)
    }
}

impl Page for MemoryPage {
    fn contains(&self, key: &str) -> bool {
        find(&self.body, key).is_some()
    }

    fn insert(&mut self, spec: ElementSpec, at: Placement) -> SetupResult<()> {
        let node = Node::from_spec(&spec);
        match &at {
            Placement::Append(key) => {
                let parent = find(&self.body, key)
                    .ok_or_else(|| SetupError::MissingSection(key.clone()))?;
                parent.borrow_mut().children.push(node);
            }
            Placement::Prepend(key) => {
                let parent = find(&self.body, key)
                    .ok_or_else(|| SetupError::MissingSection(key.clone()))?;
                parent.borrow_mut().children.insert(0, node);
            }
            Placement::After(key) => {
                let (parent, index) = find_parent(&self.body, key)
                    .ok_or_else(|| SetupError::MissingSection(key.clone()))?;
                parent.borrow_mut().children.insert(index + 1, node);
            }
        }
        Ok(())
    }

    fn field(&self, key: &str) -> Option<FieldHandle> {
        find(&self.body, key).map(|node| Rc::new(MemoryField(node)) as FieldHandle)
    }
}

fn find(node: &NodeRef, key: &str) -> Option<NodeRef> {
    if node.borrow().matches(key) {
        return Some(Rc::clone(node));
    }
    node.borrow().children.iter().find_map(|child| find(child, key))
}

fn find_parent(node: &NodeRef, key: &str) -> Option<(NodeRef, usize)> {
    let children = node.borrow().children.clone();
    if let Some(index) = children.iter().position(|c| c.borrow().matches(key)) {
        return Some((Rc::clone(node), index));
    }
    children.iter().find_map(|child| find_parent(child, key))
}

fn collect_where(node: &NodeRef, out: &mut Vec<NodeRef>, pred: &dyn Fn(&Node) -> bool) {
    if pred(&node.borrow()) {
        out.push(Rc::clone(node));
    }
    for child in &node.borrow().children {
        collect_where(child, out, pred);
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn write_node(node: &NodeRef, out: &mut String) {
    let node = node.borrow();
    if node.tag.is_empty() {
        out.push_str(&escape(&node.text));
        return;
    }
    out.push('<');
    out.push_str(&node.tag);
    for (name, value) in &node.attrs {
        if node.is_form_input() && (name == "value" || name == "checked") {
            continue;
        }
        out.push_str(&format!(" {name}=\"{}\"", escape(value)));
    }
    if node.is_form_input() {
        match node.input_type() {
            "checkbox" | "radio" => {
                if node.checked {
                    out.push_str(" checked=\"checked\"");
                }
            }
            _ => out.push_str(&format!(" value=\"{}\"", escape(&node.value))),
        }
        out.push('>');
        return;
    }
    out.push('>');
    if node.tag == "style" {
        out.push_str(&node.text);
    } else {
        out.push_str(&escape(&node.text));
    }
    for child in &node.children {
        write_node(child, out);
    }
    out.push_str(&format!("</{}>", node.tag));
}
