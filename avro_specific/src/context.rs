/* Resolution context and resolver handles */

use crate::binary::consume_binary;
use crate::callbacks::{ConsumerCallbacks, WriterUnionCallbacks};
use crate::errors::{SpecificError, SpecificResult};
use crate::graph::{BranchSelector, ConsumerGraph, ConsumerId};
use crate::raw::RawConsume;
use avro_data::Memo;
use avro_types::{Schema, SchemaId, SchemaType};
use avro_value::Reader;
use std::any::{Any, TypeId};
use std::marker::PhantomData;
use tracing::debug;

/* A type that encoded data can be resolved into */
pub trait Specific: Any + Default + Send {
    /* How the type is described in mismatch errors */
    fn target_name() -> String;

    /* Build the consumer for a non-union, link-free writer schema.
     * Implementations create their node with `ResolveContext::new_node`
     * before resolving any children. */
    fn resolve(ctx: &mut ResolveContext, wschema: &Schema) -> SpecificResult<ConsumerId>;
}

/* State for one resolution pass: the graph being built and the memo table
 * keyed by (target type, writer schema). */
pub struct ResolveContext {
    graph: ConsumerGraph,
    memo: Memo<TypeId, SchemaId, ConsumerId>,
    journal: Vec<(TypeId, SchemaId)>,
}

impl ResolveContext {
    pub fn new() -> Self {
        Self {
            graph: ConsumerGraph::new(),
            memo: Memo::new(),
            journal: Vec::new(),
        }
    }

    pub fn graph(&self) -> &ConsumerGraph {
        &self.graph
    }

    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    pub fn memoized<T: Specific>(&self, wschema: &Schema) -> Option<ConsumerId> {
        self.memo.get(TypeId::of::<T>(), wschema.id()).copied()
    }

    /* Resolve `wschema` into `T`, reusing the node from an earlier request
     * for the same pair. A failed attempt leaves no nodes or memo entries
     * behind. */
    pub fn resolve<T: Specific>(&mut self, wschema: &Schema) -> SpecificResult<ConsumerId> {
        let wschema = wschema.resolve_link()?;
        if let Some(id) = self.memoized::<T>(&wschema) {
            debug!("Reusing consumer {} for {} into {}", id, wschema.type_name(), T::target_name());
            return Ok(id);
        }

        self.attempt(|ctx| {
            if wschema.schema_type() == SchemaType::Union {
                ctx.resolve_writer_union::<T>(&wschema, |ctx, branch| ctx.resolve::<T>(branch))
            } else {
                T::resolve(ctx, &wschema)
            }
        })
    }

    /* A node with one child slot per writer branch. Each branch is resolved
     * independently with `attempt`; branches that fail stay empty and only
     * fail at decode time if the data selects them. When no branch resolves
     * the node and its memo entry are rolled back. */
    pub fn resolve_writer_union<K: Specific>(
        &mut self,
        wschema: &Schema,
        mut attempt: impl FnMut(&mut Self, &Schema) -> SpecificResult<ConsumerId>,
    ) -> SpecificResult<ConsumerId> {
        self.attempt(|ctx| {
            let branches = wschema.union_size();
            let id = ctx.new_node::<K>(wschema, branches, Box::new(WriterUnionCallbacks), None);

            let mut resolved = 0;
            for index in 0..branches {
                let branch = match wschema.union_branch(index) {
                    Some(branch) => branch.clone(),
                    None => continue,
                };
                match attempt(ctx, &branch) {
                    Ok(child) => {
                        ctx.graph.set_child(id, index, child)?;
                        resolved += 1;
                    }
                    Err(err) => debug!(
                        "Writer union branch {} ({}) skipped: {}",
                        index,
                        branch.type_name(),
                        err
                    ),
                }
            }

            if resolved == 0 {
                debug!("No branch of {} resolves into {}", wschema.type_name(), K::target_name());
                return Err(SpecificError::SchemaMismatch {
                    target: K::target_name(),
                    actual: wschema.type_name().to_string(),
                });
            }
            Ok(id)
        })
    }

    /* Create a node and register it under (K, writer schema) */
    pub fn new_node<K: Any>(
        &mut self,
        wschema: &Schema,
        child_count: usize,
        callbacks: Box<dyn ConsumerCallbacks>,
        selector: Option<BranchSelector>,
    ) -> ConsumerId {
        let id = self.graph.insert(wschema.clone(), child_count, callbacks, selector);
        let key = (TypeId::of::<K>(), wschema.id());
        self.memo.set(key.0, key.1, id);
        self.journal.push(key);
        id
    }

    pub fn set_child(&mut self, id: ConsumerId, slot: usize, child: ConsumerId) -> SpecificResult<()> {
        self.graph.set_child(id, slot, child)
    }

    /* Runs `f`, undoing every node and memo entry it created if it fails */
    pub fn attempt<R>(&mut self, f: impl FnOnce(&mut Self) -> SpecificResult<R>) -> SpecificResult<R> {
        let nodes = self.graph.len();
        let entries = self.journal.len();
        let result = f(self);
        if result.is_err() {
            for (k1, k2) in self.journal.drain(entries..) {
                self.memo.delete(k1, k2);
            }
            self.graph.truncate(nodes);
        }
        result
    }

    pub fn into_graph(self) -> ConsumerGraph {
        self.graph
    }
}

impl Default for ResolveContext {
    fn default() -> Self {
        Self::new()
    }
}

/* ============================================================================
   Resolver handle
   ============================================================================ */

/* An owned decode plan for writer data into `T`. Dropping it runs the free
 * walk from its root. */
pub struct Resolver<T: Specific> {
    graph: ConsumerGraph,
    root: ConsumerId,
    _target: PhantomData<fn(&mut T)>,
}

impl<T: Specific> Resolver<T> {
    pub fn new(wschema: &Schema) -> SpecificResult<Self> {
        let mut ctx = ResolveContext::new();
        let root = ctx.resolve::<T>(wschema)?;
        Ok(Self::with_context(ctx, root))
    }

    pub fn with_context(ctx: ResolveContext, root: ConsumerId) -> Self {
        Self {
            graph: ctx.into_graph(),
            root,
            _target: PhantomData,
        }
    }

    pub fn root(&self) -> ConsumerId {
        self.root
    }

    pub fn graph(&self) -> &ConsumerGraph {
        &self.graph
    }

    pub fn writer_schema(&self) -> SpecificResult<&Schema> {
        Ok(self.graph.get(self.root)?.schema())
    }

    pub fn decode(&self, reader: &mut Reader<'_>, target: &mut T) -> SpecificResult<()> {
        consume_binary(reader, &self.graph, self.root, target)
    }

    pub fn decode_slice(&self, bytes: &[u8], target: &mut T) -> SpecificResult<()> {
        self.decode(&mut Reader::new(bytes), target)
    }

    /* Feed an in-memory value of the writer's shape into `target` */
    pub fn consume<V: RawConsume + ?Sized>(&self, value: &V, target: &mut T) -> SpecificResult<()> {
        value.raw_consume(&self.graph, self.root, target)
    }
}

impl<T: Specific> Drop for Resolver<T> {
    fn drop(&mut self) {
        let freed = self.graph.free(self.root);
        debug!("Released resolver into {} ({} consumers)", T::target_name(), freed);
    }
}
