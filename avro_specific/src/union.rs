/* Target unions
 *
 * A non-union writer value is stored into the first target branch that can
 * hold it. The chosen branch is fixed at resolution time: the node carries
 * a BranchSelector, and at decode time the consumer selects that branch on
 * the target and hands the branch storage to the node's only child. */

use crate::callbacks::{target_mut, ConsumerCallbacks};
use crate::context::ResolveContext;
use crate::errors::{SpecificError, SpecificResult};
use crate::graph::{BranchSelector, ConsumerId};
use avro_types::Schema;
use std::any::Any;
use std::marker::PhantomData;
use tracing::debug;

pub trait SpecificUnion: Any + Default + Send {
    const BRANCHES: usize;

    /* Resolve a non-union writer schema into target branch `index` */
    fn resolve_branch(ctx: &mut ResolveContext, index: usize, wschema: &Schema) -> SpecificResult<ConsumerId>;

    /* Make `index` the current branch and return its storage. Selecting the
     * current branch again keeps its contents. */
    fn select(&mut self, index: usize) -> Option<&mut dyn Any>;
}

struct UnionCallbacks<T>(PhantomData<fn(&mut T)>);

impl<T: SpecificUnion> ConsumerCallbacks for UnionCallbacks<T> {
    fn union_branch<'a>(&self, target: &'a mut dyn Any, discriminant: usize) -> SpecificResult<&'a mut dyn Any> {
        target_mut::<T>(target)?
            .select(discriminant)
            .ok_or(SpecificError::MissingBranch { discriminant })
    }
}

pub fn union_target_name<T: SpecificUnion>() -> String {
    format!("union of {} branches", T::BRANCHES)
}

pub fn resolve_union<T: SpecificUnion>(ctx: &mut ResolveContext, wschema: &Schema) -> SpecificResult<ConsumerId> {
    for index in 0..T::BRANCHES {
        let attempt = ctx.attempt(|ctx| {
            let id = ctx.new_node::<T>(
                wschema,
                1,
                Box::new(UnionCallbacks::<T>(PhantomData)),
                Some(BranchSelector { discriminant: index }),
            );
            let child = T::resolve_branch(ctx, index, wschema)?;
            ctx.set_child(id, 0, child)?;
            Ok(id)
        });
        match attempt {
            Ok(id) => {
                debug!("{} stores into target branch {}", wschema.type_name(), index);
                return Ok(id);
            }
            Err(err) => debug!("Target branch {} rejects {}: {}", index, wschema.type_name(), err),
        }
    }
    Err(SpecificError::mismatch(union_target_name::<T>(), wschema))
}
