/* Consumer graph
 *
 * Resolver nodes live in an arena and refer to each other by ConsumerId, so
 * back-references created by recursive schemas are plain indices. Each
 * node holds a counted handle on its writer schema. Nodes are released by
 * `free`, which walks everything reachable from a root exactly once. */

use crate::callbacks::ConsumerCallbacks;
use crate::errors::{SpecificError, SpecificResult};
use avro_types::Schema;
use std::collections::HashSet;
use std::fmt;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConsumerId(pub(crate) usize);

impl ConsumerId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ConsumerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/* Marks a node that stores a non-union writer value into one branch of a
 * target union */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchSelector {
    pub discriminant: usize,
}

pub struct ConsumerNode {
    schema: Schema,
    children: Vec<Option<ConsumerId>>,
    callbacks: Box<dyn ConsumerCallbacks>,
    selector: Option<BranchSelector>,
}

impl ConsumerNode {
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn children(&self) -> &[Option<ConsumerId>] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<ConsumerId> {
        self.children.get(index).copied().flatten()
    }

    pub fn callbacks(&self) -> &dyn ConsumerCallbacks {
        self.callbacks.as_ref()
    }

    pub fn selector(&self) -> Option<BranchSelector> {
        self.selector
    }
}

impl fmt::Debug for ConsumerNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumerNode")
            .field("schema", &self.schema.type_name())
            .field("children", &self.children)
            .field("selector", &self.selector)
            .finish()
    }
}

#[derive(Default, Debug)]
pub struct ConsumerGraph {
    nodes: Vec<Option<ConsumerNode>>,
}

impl ConsumerGraph {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn insert(
        &mut self,
        schema: Schema,
        child_count: usize,
        callbacks: Box<dyn ConsumerCallbacks>,
        selector: Option<BranchSelector>,
    ) -> ConsumerId {
        let id = ConsumerId(self.nodes.len());
        self.nodes.push(Some(ConsumerNode {
            schema,
            children: vec![None; child_count],
            callbacks,
            selector,
        }));
        id
    }

    pub fn get(&self, id: ConsumerId) -> SpecificResult<&ConsumerNode> {
        self.nodes
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(SpecificError::FreedConsumer { id: id.0 })
    }

    pub fn set_child(&mut self, id: ConsumerId, slot: usize, child: ConsumerId) -> SpecificResult<()> {
        let node = self
            .nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(SpecificError::FreedConsumer { id: id.0 })?;
        let slots = node.children.len();
        let entry = node
            .children
            .get_mut(slot)
            .ok_or(SpecificError::SlotOutOfRange { id: id.0, slot, slots })?;
        *entry = Some(child);
        Ok(())
    }

    /* Slots allocated so far, freed or not */
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn live_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_live(&self, id: ConsumerId) -> bool {
        matches!(self.nodes.get(id.0), Some(Some(_)))
    }

    /* Drops every node created after `len`. Resolution is strictly nested,
     * so these all belong to the attempt being abandoned. */
    pub(crate) fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    /* Releases every node reachable from `root` exactly once, back-edges
     * included, and returns how many were released. */
    pub fn free(&mut self, root: ConsumerId) -> usize {
        let mut freeing: HashSet<ConsumerId> = HashSet::new();
        let mut pending = vec![root];
        let mut freed = 0;

        while let Some(id) = pending.pop() {
            if !freeing.insert(id) {
                continue;
            }
            let node = match self.nodes.get_mut(id.0).and_then(Option::take) {
                Some(node) => node,
                None => continue,
            };
            trace!("Freeing consumer {} for {}", id, node.schema.type_name());

            let ConsumerNode {
                schema,
                children,
                callbacks,
                ..
            } = node;
            drop(schema);
            pending.extend(children.into_iter().flatten().rev());
            callbacks.on_free();
            freed += 1;
        }
        freed
    }
}
