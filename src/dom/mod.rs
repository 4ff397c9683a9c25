// SPDX-License-Identifier: PMPL-1.0-or-later

//! Arena-backed fragment tree.
//!
//! Rendered dashboards live in a [`Document`]: a flat `Vec<Node>` addressed by
//! [`NodeId`]. Ids stay valid for the lifetime of the document, so the
//! controllers can hold on to the cards, list items and language controls
//! they derive presentation for.
//!
//! Every element keeps two class lists apart:
//!
//! - `classes`: static style tokens written once by the renderer
//! - `state_classes`: derived tokens (highlight, active, expanded) that the
//!   controllers wipe and recompute on every transition
//!
//! Serialization merges both lists, static first.

use serde::Serialize;
use std::fmt::Write as _;

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeKind {
    Element(String),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    classes: Vec<String>,
    state_classes: Vec<String>,
    attrs: Vec<(String, String)>,
    style: Option<String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Node {
    fn new(kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            classes: Vec::new(),
            state_classes: Vec::new(),
            attrs: Vec::new(),
            style: None,
            children: Vec::new(),
            parent,
        }
    }
}

/// Serializable projection of a subtree, used by the JSON/YAML outputs.
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attrs: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Document {
    pub fn new(root_tag: &str) -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Element(root_tag.to_string()), None)],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create an element and append it to `parent`.
    pub fn element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        self.push(parent, NodeKind::Element(tag.to_string()))
    }

    /// Create an element with static classes in one step.
    pub fn element_with(&mut self, parent: NodeId, tag: &str, classes: &str) -> NodeId {
        let id = self.element(parent, tag);
        self.add_class(id, classes);
        id
    }

    pub fn text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.push(parent, NodeKind::Text(text.to_string()))
    }

    fn push(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(kind, Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(tag) => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Add whitespace-separated static class tokens, skipping duplicates.
    pub fn add_class(&mut self, id: NodeId, classes: &str) {
        let node = &mut self.nodes[id.0];
        for token in classes.split_whitespace() {
            if !node.classes.iter().any(|c| c == token) {
                node.classes.push(token.to_string());
            }
        }
    }

    /// Add whitespace-separated derived class tokens.
    pub fn add_state_class(&mut self, id: NodeId, classes: &str) {
        let node = &mut self.nodes[id.0];
        for token in classes.split_whitespace() {
            if !node.state_classes.iter().any(|c| c == token) {
                node.state_classes.push(token.to_string());
            }
        }
    }

    pub fn clear_state_classes(&mut self, id: NodeId) {
        self.nodes[id.0].state_classes.clear();
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        let node = &self.nodes[id.0];
        node.classes.iter().any(|c| c == class) || node.state_classes.iter().any(|c| c == class)
    }

    pub fn has_state_class(&self, id: NodeId, class: &str) -> bool {
        self.nodes[id.0].state_classes.iter().any(|c| c == class)
    }

    /// Static classes followed by derived ones.
    pub fn classes(&self, id: NodeId) -> Vec<&str> {
        let node = &self.nodes[id.0];
        node.classes
            .iter()
            .chain(node.state_classes.iter())
            .map(String::as_str)
            .collect()
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        let attrs = &mut self.nodes[id.0].attrs;
        match attrs.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value.to_string(),
            None => attrs.push((name.to_string(), value.to_string())),
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes[id.0]
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_style(&mut self, id: NodeId, style: &str) {
        self.nodes[id.0].style = Some(style.to_string());
    }

    pub fn style(&self, id: NodeId) -> Option<&str> {
        self.nodes[id.0].style.as_deref()
    }

    /// Replace all children of `id` with a single text node (or none for "").
    /// A lone existing text child is rewritten in place, so repeated updates
    /// do not grow the arena.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        let reusable = match self.nodes[id.0].children.as_slice() {
            [only] if matches!(self.nodes[only.0].kind, NodeKind::Text(_)) => Some(*only),
            _ => None,
        };
        match reusable {
            Some(node) => self.nodes[node.0].kind = NodeKind::Text(text.to_string()),
            None => {
                self.detach_children(id);
                if !text.is_empty() {
                    self.text(id, text);
                }
            }
        }
    }

    /// Unlink every child of `id`. Detached nodes stay in the arena but are
    /// no longer reachable from the root.
    pub fn detach_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.nodes[id.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id.0].kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element(_) => {
                for child in &self.nodes[id.0].children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    /// Pre-order walk of the subtree rooted at `id`, `id` included.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            for child in self.nodes[next.0].children.iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    pub fn find_by_class(&self, from: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(from)
            .into_iter()
            .filter(|id| self.has_class(*id, class))
            .collect()
    }

    /// Whether `id` is still attached under the document root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == self.root {
                return true;
            }
            cursor = self.nodes[current.0].parent;
        }
        false
    }

    pub fn to_html(&self) -> String {
        self.subtree_html(self.root)
    }

    pub fn subtree_html(&self, id: NodeId) -> String {
        let mut out = String::with_capacity(16 * 1024);
        self.write_html(id, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let node = &self.nodes[id.0];
        let tag = match &node.kind {
            NodeKind::Text(text) => {
                out.push_str(&escape_text(text));
                return;
            }
            NodeKind::Element(tag) => tag,
        };

        let _ = write!(out, "<{}", tag);
        let classes = self.classes(id);
        if !classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape(&classes.join(" ")));
        }
        for (name, value) in &node.attrs {
            let _ = write!(out, " {}=\"{}\"", name, escape(value));
        }
        if let Some(style) = &node.style {
            let _ = write!(out, " style=\"{}\"", escape(style));
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&tag.as_str()) {
            return;
        }
        for child in &node.children {
            self.write_html(*child, out);
        }
        let _ = write!(out, "</{}>", tag);
    }

    pub fn tree(&self, id: NodeId) -> TreeNode {
        let node = &self.nodes[id.0];
        match &node.kind {
            NodeKind::Text(text) => TreeNode {
                tag: None,
                text: Some(text.clone()),
                classes: Vec::new(),
                attrs: Vec::new(),
                children: Vec::new(),
            },
            NodeKind::Element(tag) => {
                let mut attrs = node.attrs.clone();
                if let Some(style) = &node.style {
                    attrs.push(("style".to_string(), style.clone()));
                }
                TreeNode {
                    tag: Some(tag.clone()),
                    text: None,
                    classes: self.classes(id).into_iter().map(str::to_string).collect(),
                    attrs,
                    children: node.children.iter().map(|c| self.tree(*c)).collect(),
                }
            }
        }
    }
}

/// Escape element content. Quotes are left alone so inline CSS survives.
pub fn escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape a double-quoted attribute value.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
