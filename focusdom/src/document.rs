use crate::event::{Attachment, ListenerId};
use crate::geometry::{Offset, Rect, ScrollBox};
use crate::markup::{self, MarkupError, ParsedNode, VOID_ELEMENTS};
use crate::node::{ElementData, Node, NodeId, NodeKind};
use crate::selector::{Selector, SelectorError};
use crate::style::Style;

/// A headless document: an arena of element and text nodes rooted at
/// `<html>`, with a single `<body>` child.
///
/// Nodes are never freed. Detaching a node removes it from its parent but
/// keeps the whole subtree alive so it can be reinserted later.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    body: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            body: NodeId(0),
        };
        doc.root = doc.create_element("html");
        doc.body = doc.create_element("body");
        doc.append_child(doc.root, doc.body);
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element(ElementData::new(tag)))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(kind));
        id
    }

    // ------------------------------------------------------------------
    // Tree
    // ------------------------------------------------------------------

    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.node(node).kind
    }

    pub fn element(&self, node: NodeId) -> Option<&ElementData> {
        self.node(node).element()
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.tag.as_str())
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.element(node).is_some()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.node(node).children
    }

    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.children(node)
            .iter()
            .copied()
            .filter(|&c| self.is_element(c))
            .collect()
    }

    /// Parent chain of `node`, nearest first. Does not include `node`.
    pub fn ancestors(&self, node: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.parent(node),
        }
    }

    /// Whether `node` is reachable from the document root.
    pub fn is_connected(&self, node: NodeId) -> bool {
        node == self.root || self.ancestors(node).any(|a| a == self.root)
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        ancestor == node || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Nearest inclusive ancestor carrying `class`.
    pub fn closest_with_class(&self, node: NodeId, class: &str) -> Option<NodeId> {
        std::iter::once(node)
            .chain(self.ancestors(node))
            .find(|&n| self.has_class(n, class))
    }

    /// All descendants of `node` in document order, `node` excluded.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_child(parent, None, child);
    }

    /// Insert `child` before the `position`-th element child of `parent`.
    ///
    /// `None` or a position past the last element child appends. A child
    /// that is already attached somewhere is moved.
    pub fn insert_child(&mut self, parent: NodeId, position: Option<usize>, child: NodeId) {
        if self.contains(child, parent) {
            log::warn!("refusing to insert {child} into its own subtree");
            return;
        }
        self.detach(child);
        let index = self.raw_index(parent, position);
        self.node_mut(parent).children.insert(index, child);
        self.node_mut(child).parent = Some(parent);
    }

    /// Index into `parent`'s child list matching an element position.
    fn raw_index(&self, parent: NodeId, position: Option<usize>) -> usize {
        let children = self.children(parent);
        position
            .and_then(|p| {
                children
                    .iter()
                    .enumerate()
                    .filter(|&(_, &c)| self.is_element(c))
                    .nth(p)
                    .map(|(i, _)| i)
            })
            .unwrap_or(children.len())
    }

    /// Remove `node` from its parent. The subtree stays intact.
    pub fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.node_mut(node).parent.take() else {
            return;
        };
        self.node_mut(parent).children.retain(|&c| c != node);
    }

    pub fn clear_children(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.node_mut(node).children);
        for child in children {
            self.node_mut(child).parent = None;
        }
    }

    // ------------------------------------------------------------------
    // Markup
    // ------------------------------------------------------------------

    /// Parse `markup` and insert the resulting top-level nodes, in order,
    /// before the `position`-th element child of `parent`.
    pub fn insert_markup(
        &mut self,
        parent: NodeId,
        position: Option<usize>,
        markup: &str,
    ) -> Result<Vec<NodeId>, MarkupError> {
        let parsed = markup::parse_fragment(markup)?;
        let mut index = self.raw_index(parent, position);
        let mut inserted = Vec::with_capacity(parsed.len());
        for node in parsed {
            let id = self.build(node);
            self.node_mut(parent).children.insert(index, id);
            self.node_mut(id).parent = Some(parent);
            index += 1;
            inserted.push(id);
        }
        Ok(inserted)
    }

    fn build(&mut self, parsed: ParsedNode) -> NodeId {
        match parsed {
            ParsedNode::Text(text) => self.push(NodeKind::Text(text)),
            ParsedNode::Element {
                tag,
                attrs,
                children,
            } => {
                let id = self.push(NodeKind::Element(ElementData::with_attrs(tag, attrs)));
                for child in children {
                    let child = self.build(child);
                    self.node_mut(child).parent = Some(id);
                    self.node_mut(id).children.push(child);
                }
                id
            }
        }
    }

    /// Replace the children of `node` with parsed `markup`.
    pub fn set_inner_html(
        &mut self,
        node: NodeId,
        markup: &str,
    ) -> Result<Vec<NodeId>, MarkupError> {
        let parsed = markup::parse_fragment(markup)?;
        self.clear_children(node);
        let mut inserted = Vec::with_capacity(parsed.len());
        for child in parsed {
            let id = self.build(child);
            self.node_mut(id).parent = Some(node);
            self.node_mut(node).children.push(id);
            inserted.push(id);
        }
        Ok(inserted)
    }

    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.serialize(node, &mut out);
        out
    }

    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(node) {
            self.serialize(child, &mut out);
        }
        out
    }

    fn serialize(&self, node: NodeId, out: &mut String) {
        match &self.node(node).kind {
            NodeKind::Text(text) => out.push_str(&markup::escape_text(text)),
            NodeKind::Element(element) => {
                out.push('<');
                out.push_str(&element.tag);
                for (name, value) in element.attrs() {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&markup::escape_attr(value));
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&element.tag.as_str()) {
                    return;
                }
                for &child in self.children(node) {
                    self.serialize(child, out);
                }
                out.push_str("</");
                out.push_str(&element.tag);
                out.push('>');
            }
        }
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, node: NodeId) -> String {
        if let NodeKind::Text(text) = &self.node(node).kind {
            return text.clone();
        }
        self.descendants(node)
            .into_iter()
            .filter_map(|n| match &self.node(n).kind {
                NodeKind::Text(text) => Some(text.as_str()),
                NodeKind::Element(_) => None,
            })
            .collect()
    }

    /// Replace the children of `node` with a single text node.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        if let NodeKind::Text(current) = &mut self.node_mut(node).kind {
            *current = text.to_string();
            return;
        }
        self.clear_children(node);
        if !text.is_empty() {
            let child = self.create_text(text);
            self.append_child(node, child);
        }
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).and_then(|e| e.attr(name))
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        if let Some(element) = self.node_mut(node).element_mut() {
            element.set_attr(name, value);
        }
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) -> Option<String> {
        self.node_mut(node).element_mut()?.remove_attr(name)
    }

    /// Value of the `data-<key>` attribute.
    pub fn data(&self, node: NodeId, key: &str) -> Option<&str> {
        self.attr(node, &format!("data-{key}"))
    }

    pub fn set_data(&mut self, node: NodeId, key: &str, value: impl Into<String>) {
        self.set_attr(node, &format!("data-{key}"), value);
    }

    /// First connected element whose `name` attribute equals `value`.
    pub fn find_by_attr(&self, name: &str, value: &str) -> Option<NodeId> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .find(|&n| self.attr(n, name) == Some(value))
    }

    // ------------------------------------------------------------------
    // Classes
    // ------------------------------------------------------------------

    pub fn classes(&self, node: NodeId) -> Vec<&str> {
        self.attr(node, "class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attr(node, "class")
            .is_some_and(|c| c.split_whitespace().any(|token| token == class))
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if class.is_empty() || self.has_class(node, class) || !self.is_element(node) {
            return;
        }
        let mut classes: Vec<String> = self.classes(node).into_iter().map(String::from).collect();
        classes.push(class.to_string());
        self.set_attr(node, "class", classes.join(" "));
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if !self.has_class(node, class) {
            return;
        }
        let classes: Vec<String> = self
            .classes(node)
            .into_iter()
            .filter(|&c| c != class)
            .map(String::from)
            .collect();
        self.set_attr(node, "class", classes.join(" "));
    }

    // ------------------------------------------------------------------
    // Inline style
    // ------------------------------------------------------------------

    pub fn style(&self, node: NodeId) -> Style {
        self.attr(node, "style").map(Style::parse).unwrap_or_default()
    }

    /// Set one inline style property. An empty value removes it.
    pub fn set_style(&mut self, node: NodeId, property: &str, value: impl Into<String>) {
        if !self.is_element(node) {
            return;
        }
        let mut style = self.style(node);
        style.set(property, value);
        if style.is_empty() {
            self.remove_attr(node, "style");
        } else {
            self.set_attr(node, "style", style.to_string());
        }
    }

    // ------------------------------------------------------------------
    // Form controls
    // ------------------------------------------------------------------

    pub fn value(&self, node: NodeId) -> &str {
        &self.node(node).value
    }

    pub fn set_value(&mut self, node: NodeId, value: impl Into<String>) {
        self.node_mut(node).value = value.into();
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    pub fn layout(&self, node: NodeId) -> Rect {
        self.node(node).layout
    }

    /// Record the box computed by whoever lays the document out.
    pub fn set_layout(&mut self, node: NodeId, rect: Rect) {
        self.node_mut(node).layout = rect;
    }

    pub fn offset_left(&self, node: NodeId) -> f64 {
        self.style(node).px("left").unwrap_or(self.layout(node).x)
    }

    pub fn offset_top(&self, node: NodeId) -> f64 {
        self.style(node).px("top").unwrap_or(self.layout(node).y)
    }

    pub fn offset_width(&self, node: NodeId) -> f64 {
        self.style(node).px("width").unwrap_or(self.layout(node).width)
    }

    pub fn offset_height(&self, node: NodeId) -> f64 {
        self.style(node)
            .px("height")
            .unwrap_or(self.layout(node).height)
    }

    /// Offset of `node` inside `area`, summed up the parent chain.
    ///
    /// If `area` is not an ancestor the sum runs up to the root.
    pub fn position_in_area(&self, node: NodeId, area: NodeId) -> Offset {
        let mut offset = Offset::default();
        let mut current = Some(node);
        while let Some(n) = current {
            if n == area {
                break;
            }
            offset.left += self.offset_left(n);
            offset.top += self.offset_top(n);
            current = self.parent(n);
        }
        offset
    }

    // ------------------------------------------------------------------
    // Scrolling
    // ------------------------------------------------------------------

    pub fn scroll(&self, node: NodeId) -> ScrollBox {
        self.node(node).scroll
    }

    pub fn scroll_top(&self, node: NodeId) -> f64 {
        self.node(node).scroll.top
    }

    pub fn client_height(&self, node: NodeId) -> f64 {
        self.node(node).scroll.client_height
    }

    pub fn scroll_height(&self, node: NodeId) -> f64 {
        let scroll = self.node(node).scroll;
        scroll.content_height.max(scroll.client_height)
    }

    /// Set the content and viewport sizes of a scrollable node. The current
    /// position is clamped to the new extent.
    pub fn set_scroll_extent(
        &mut self,
        node: NodeId,
        content_width: f64,
        content_height: f64,
        client_width: f64,
        client_height: f64,
    ) {
        let scroll = &mut self.node_mut(node).scroll;
        scroll.content_width = content_width;
        scroll.content_height = content_height;
        scroll.client_width = client_width;
        scroll.client_height = client_height;
        scroll.top = scroll.top.clamp(0.0, scroll.max_top());
        scroll.left = scroll.left.clamp(0.0, scroll.max_left());
    }

    /// Scroll to the given position, clamped to the scrollable range.
    /// Returns whether the position changed.
    pub fn set_scroll_position(&mut self, node: NodeId, top: f64, left: f64) -> bool {
        let scroll = &mut self.node_mut(node).scroll;
        let top = top.clamp(0.0, scroll.max_top());
        let left = left.clamp(0.0, scroll.max_left());
        let changed = top != scroll.top || left != scroll.left;
        scroll.top = top;
        scroll.left = left;
        changed
    }

    // ------------------------------------------------------------------
    // Selectors
    // ------------------------------------------------------------------

    /// Descendants of `scope` matching `selector`, in document order.
    pub fn query_selector_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&n| selector.matches(self, n))
            .collect()
    }

    pub fn query_selector(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|&n| selector.matches(self, n))
    }

    /// Every connected element matching `selector`, root included.
    pub fn query_all(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .filter(|&n| selector.matches(self, n))
            .collect())
    }

    pub fn select(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        Ok(self.query_selector_all(scope, &Selector::parse(selector)?))
    }

    pub fn select_first(
        &self,
        scope: NodeId,
        selector: &str,
    ) -> Result<Option<NodeId>, SelectorError> {
        Ok(self.query_selector(scope, &Selector::parse(selector)?))
    }

    // ------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------

    /// Attach a listener. Returns `false` if the exact same attachment is
    /// already present, in which case nothing changes.
    pub fn add_listener(&mut self, node: NodeId, attachment: Attachment) -> bool {
        let listeners = &mut self.node_mut(node).listeners;
        if listeners.contains(&attachment) {
            return false;
        }
        listeners.push(attachment);
        true
    }

    pub fn remove_listener(&mut self, node: NodeId, attachment: &Attachment) -> bool {
        let listeners = &mut self.node_mut(node).listeners;
        let before = listeners.len();
        listeners.retain(|a| a != attachment);
        listeners.len() != before
    }

    /// Drop every attachment of `listener` on `node`, whatever the event.
    pub fn remove_listener_id(&mut self, node: NodeId, listener: ListenerId) {
        self.node_mut(node)
            .listeners
            .retain(|a| a.listener != listener);
    }

    pub fn attachments(&self, node: NodeId) -> &[Attachment] {
        &self.node(node).listeners
    }

    /// Nodes an event targeted at `target` travels through, root first.
    pub fn propagation_path(&self, target: NodeId) -> Vec<NodeId> {
        let mut path: Vec<NodeId> = self.ancestors(target).collect();
        path.reverse();
        path.push(target);
        path
    }
}

/// Iterator over the ancestors of a node. See [`Document::ancestors`].
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.parent(current);
        Some(current)
    }
}
