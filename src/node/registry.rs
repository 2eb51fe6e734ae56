use std::sync::OnceLock;

use crate::foundation::config::HostConfig;
use crate::foundation::error::{NodeError, NodeResult};
use crate::node::Node;
use crate::node::value::{Inputs, NodeOutput};
use crate::nodes::{convert, draw, input, json, output, prep};

type Constructor = fn() -> Box<dyn Node>;

fn make<N: Node + Default + 'static>() -> Box<dyn Node> {
    Box::new(N::default())
}

/// `(id, constructor, display title)` for every built-in node, in menu order.
const BUILTIN: &[(&str, Constructor, &str)] = &[
    ("SsnInputString", make::<input::InputString>, "[SSN] Input String"),
    ("SsnInputInt", make::<input::InputInt>, "[SSN] Input Integer"),
    ("SsnInputFloat", make::<input::InputFloat>, "[SSN] Input Float"),
    ("SsnInputColor", make::<input::InputColor>, "[SSN] Input Color"),
    ("SsnInputJSON", make::<input::InputJson>, "[SSN] Input JSON"),
    ("SsnInputFont", make::<input::InputFont>, "[SSN] Input Font"),
    ("SsnConvInt", make::<convert::ConvInt>, "[SSN] Convert Int To Others"),
    ("SsnConvFloat", make::<convert::ConvFloat>, "[SSN] Convert Float To Others"),
    ("SsnConvString", make::<convert::ConvString>, "[SSN] Convert String To Others"),
    ("SsnOutputWebM", make::<output::OutputWebm>, "[SSN] Output WebM"),
    ("SsnJSONGetKeyValue", make::<json::GetKeyValue>, "[SSN] JSON Get Key Value"),
    ("SsnJSONGetIndexValue", make::<json::GetIndexValue>, "[SSN] JSON Get Index Value"),
    ("SsnJSONGetValueAs", make::<json::GetValueAs>, "[SSN] JSON Get Value As"),
    ("SsnPrepTrimScale", make::<prep::TrimScale>, "[SSN] Prep Trim Scale"),
    ("SsnPrepFlattenAlpha", make::<prep::FlattenAlpha>, "[SSN] Prep Flatten Alpha"),
    ("SsnPrepAppendBatch", make::<prep::AppendBatch>, "[SSN] Prep Append Batch"),
    ("SsnPrepReverseBatch", make::<prep::ReverseBatch>, "[SSN] Prep Reverse Batch"),
    ("SsnDrawText", make::<draw::DrawText>, "[SSN] Draw Text"),
];

pub struct NodeEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub node: Box<dyn Node>,
}

impl std::fmt::Debug for NodeEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeEntry")
            .field("id", &self.id)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

/// Name-to-node and name-to-title lookup over the built-in nodes.
#[derive(Debug)]
pub struct NodeRegistry {
    entries: Vec<NodeEntry>,
}

impl NodeRegistry {
    fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|&(id, make, title)| NodeEntry {
                id,
                title,
                node: make(),
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[NodeEntry] {
        &self.entries
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.id)
    }

    pub fn entry(&self, id: &str) -> Option<&NodeEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&dyn Node> {
        self.entry(id).map(|e| e.node.as_ref())
    }

    pub fn title(&self, id: &str) -> Option<&'static str> {
        self.entry(id).map(|e| e.title)
    }

    /// Run node `id` with `inputs`.
    pub fn execute(&self, id: &str, host: &HostConfig, inputs: &Inputs) -> NodeResult<NodeOutput> {
        let node = self
            .get(id)
            .ok_or_else(|| NodeError::validation(format!("unknown node '{id}'")))?;
        tracing::debug!(node = id, "executing node");
        node.execute(host, inputs)
    }
}

/// The process-wide registry, built on first use.
pub fn registry() -> &'static NodeRegistry {
    static REGISTRY: OnceLock<NodeRegistry> = OnceLock::new();
    REGISTRY.get_or_init(NodeRegistry::builtin)
}

#[cfg(test)]
#[path = "../../tests/unit/node/registry.rs"]
mod tests;
