//! In-memory document the site behaviour runs against.
//!
//! Pages and partials are parsed into a flat arena of elements with parent
//! links. The parser is a tag scanner, not an HTML5 tree builder: it knows
//! about void elements, comments and raw-text `script`/`style`, and recovers
//! from stray closing tags by ignoring them. That is enough for the markup the
//! site ships, where the core only needs ids, attributes, classes and text.

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Stable handle to an element. Handles of removed elements are never reused.
pub type NodeId = usize;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

static TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();
static ATTR_REGEX: OnceLock<Regex> = OnceLock::new();

fn token_regex() -> &'static Regex {
    TOKEN_REGEX.get_or_init(|| {
        Regex::new(
            r#"(?s)<!--.*?-->|<![^>]*>|</\s*([A-Za-z][\w-]*)\s*>|<([A-Za-z][\w-]*)((?:\s+[^\s=>/"']+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>"']+))?)*)\s*(/?)>"#,
        )
        .expect("valid token regex")
    })
}

fn attr_regex() -> &'static Regex {
    ATTR_REGEX.get_or_init(|| {
        Regex::new(r#"([^\s=>/"']+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>"']+)))?"#)
            .expect("valid attribute regex")
    })
}

/// A single element: tag, attributes and its own (direct) text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    attributes: BTreeMap<String, String>,
    text: String,
    parent: Option<NodeId>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            text: String::new(),
            parent: None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attributes.remove(name);
    }

    /// Visible text owned directly by this element.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Add or remove `class` so that its presence equals `on`.
    pub fn set_class(&mut self, class: &str, on: bool) {
        let mut classes: Vec<String> = self
            .classes()
            .filter(|c| *c != class)
            .map(str::to_string)
            .collect();
        if on {
            classes.push(class.to_string());
        }
        if classes.is_empty() {
            self.remove_attr("class");
        } else {
            self.set_attr("class", &classes.join(" "));
        }
    }

    /// Flip `class`; returns whether it is present afterwards.
    pub fn toggle_class(&mut self, class: &str) -> bool {
        let on = !self.has_class(class);
        self.set_class(class, on);
        on
    }
}

/// An element tree rooted at `<html>` with a guaranteed `<body>`.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Option<Element>>,
    root: NodeId,
    body: NodeId,
}

impl Document {
    /// An empty `<html><body></body></html>`.
    pub fn new() -> Self {
        let mut body = Element::new("body");
        body.parent = Some(0);
        Self {
            nodes: vec![Some(Element::new("html")), Some(body)],
            root: 0,
            body: 1,
        }
    }

    /// Parse a full page. `<html>` and `<body>` attributes land on the shell
    /// elements; markup without them is placed inside `<body>`.
    pub fn parse(html: &str) -> Self {
        let mut doc = Self::new();
        let body = doc.body;
        doc.parse_into(body, html, true);
        doc
    }

    pub fn root(&self) -> &Element {
        self.node(self.root)
    }

    pub fn root_mut(&mut self) -> &mut Element {
        let root = self.root;
        self.node_mut(root)
    }

    pub fn body(&self) -> &Element {
        self.node(self.body)
    }

    pub fn body_mut(&mut self) -> &mut Element {
        let body = self.body;
        self.node_mut(body)
    }

    pub fn get(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(node).and_then(Option::as_mut)
    }

    /// First element in document order whose `id` equals `id`.
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.live().find(|(_, el)| el.id() == Some(id)).map(|(n, _)| n)
    }

    pub fn by_id(&self, id: &str) -> Option<&Element> {
        self.find_by_id(id).and_then(|n| self.get(n))
    }

    pub fn by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        let node = self.find_by_id(id)?;
        self.get_mut(node)
    }

    /// Elements carrying every attribute in `names`, in document order.
    pub fn select_with_attrs(&self, names: &[&str]) -> Vec<NodeId> {
        self.live()
            .filter(|(_, el)| names.iter().all(|name| el.has_attr(name)))
            .map(|(n, _)| n)
            .collect()
    }

    /// Direct children of `node`, in document order.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.live()
            .filter(|(_, el)| el.parent == Some(node))
            .map(|(n, _)| n)
            .collect()
    }

    /// Number of live elements, shell included.
    pub fn len(&self) -> usize {
        self.live().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the element's text wholesale, like assigning `textContent`.
    ///
    /// Nested elements are discarded. Returns `false` if the node is gone.
    pub fn set_text(&mut self, node: NodeId, text: &str) -> bool {
        if self.get(node).is_none() {
            return false;
        }
        self.remove_descendants(node);
        self.node_mut(node).text = text.to_string();
        true
    }

    /// Replace the element's content with a parsed fragment, like assigning
    /// `innerHTML`. Returns the number of elements inserted.
    pub fn set_inner_html(&mut self, node: NodeId, html: &str) -> usize {
        if self.get(node).is_none() {
            return 0;
        }
        self.remove_descendants(node);
        self.node_mut(node).text.clear();
        let before = self.nodes.len();
        self.parse_into(node, html, false);
        self.nodes.len() - before
    }

    fn live(&self) -> impl Iterator<Item = (NodeId, &Element)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(n, el)| el.as_ref().map(|el| (n, el)))
    }

    fn node(&self, node: NodeId) -> &Element {
        self.nodes[node].as_ref().expect("shell elements are never removed")
    }

    fn node_mut(&mut self, node: NodeId) -> &mut Element {
        self.nodes[node].as_mut().expect("live node")
    }

    fn is_descendant_of(&self, mut node: NodeId, ancestor: NodeId) -> bool {
        while let Some(parent) = self.get(node).and_then(|el| el.parent) {
            if parent == ancestor {
                return true;
            }
            node = parent;
        }
        false
    }

    fn remove_descendants(&mut self, ancestor: NodeId) {
        let doomed: Vec<NodeId> = self
            .live()
            .map(|(n, _)| n)
            .filter(|&n| self.is_descendant_of(n, ancestor))
            .collect();
        for n in doomed {
            self.nodes[n] = None;
        }
    }

    fn push(&mut self, mut element: Element, parent: NodeId) -> NodeId {
        element.parent = Some(parent);
        self.nodes.push(Some(element));
        self.nodes.len() - 1
    }

    fn append_text(&mut self, node: NodeId, raw: &str) {
        let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            return;
        }
        let decoded = decode_entities(&collapsed);
        let el = self.node_mut(node);
        if !el.text.is_empty() {
            el.text.push(' ');
        }
        el.text.push_str(&decoded);
    }

    fn parse_into(&mut self, container: NodeId, html: &str, document_shell: bool) {
        let mut stack: Vec<(String, NodeId)> = Vec::new();
        let mut pos = 0;

        while let Some(caps) = token_regex().captures_at(html, pos) {
            let Some(whole) = caps.get(0) else {
                break;
            };
            let current = stack.last().map(|(_, n)| *n).unwrap_or(container);
            self.append_text(current, &html[pos..whole.start()]);
            pos = whole.end();

            if let Some(closing) = caps.get(1) {
                let tag = closing.as_str().to_ascii_lowercase();
                if let Some(depth) = stack.iter().rposition(|(open, _)| *open == tag) {
                    stack.truncate(depth);
                }
                continue;
            }

            let Some(open) = caps.get(2) else {
                // comment or doctype
                continue;
            };
            let tag = open.as_str().to_ascii_lowercase();
            let self_closing = caps.get(4).is_some_and(|m| !m.as_str().is_empty());

            let node = match (document_shell, tag.as_str()) {
                (true, "html") => {
                    let root = self.root;
                    apply_attributes(self.node_mut(root), &caps);
                    root
                }
                (true, "body") => {
                    let body = self.body;
                    apply_attributes(self.node_mut(body), &caps);
                    body
                }
                _ => {
                    let mut element = Element::new(&tag);
                    apply_attributes(&mut element, &caps);
                    let parent = if document_shell && stack.is_empty() && tag == "head" {
                        self.root
                    } else {
                        current
                    };
                    self.push(element, parent)
                }
            };

            if RAW_TEXT_ELEMENTS.contains(&tag.as_str()) {
                let close = format!("</{}", tag);
                let end = html[pos..]
                    .to_ascii_lowercase()
                    .find(&close)
                    .map(|i| pos + i)
                    .unwrap_or(html.len());
                pos = html[end..].find('>').map(|i| end + i + 1).unwrap_or(html.len());
                continue;
            }

            if !self_closing && !VOID_ELEMENTS.contains(&tag.as_str()) {
                stack.push((tag, node));
            }
        }

        let current = stack.last().map(|(_, n)| *n).unwrap_or(container);
        self.append_text(current, &html[pos..]);
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_attributes(element: &mut Element, caps: &Captures<'_>) {
    let Some(raw) = caps.get(3) else {
        return;
    };
    for attr in attr_regex().captures_iter(raw.as_str()) {
        let name = attr[1].to_ascii_lowercase();
        let value = attr
            .get(2)
            .or_else(|| attr.get(3))
            .or_else(|| attr.get(4))
            .map(|m| decode_entities(m.as_str()))
            .unwrap_or_default();
        element.set_attr(&name, &value);
    }
}

fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    raw.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}
