/* Raw primitive resolvers
 *
 * Each raw type accepts exactly one writer kind; there is no numeric
 * promotion. The consumer copies the decoded value into the target slot. */

use crate::callbacks::{target_mut, ConsumerCallbacks};
use crate::context::{ResolveContext, Resolver, Specific};
use crate::errors::{SpecificError, SpecificResult};
use crate::graph::{ConsumerGraph, ConsumerId};
use avro_data::{RawArray, RawBytes, RawMap, RawString};
use avro_types::{Schema, SchemaType};
use std::any::Any;
use std::marker::PhantomData;

struct RawCallbacks<T>(PhantomData<fn(&mut T)>);

impl<T> RawCallbacks<T> {
    fn boxed() -> Box<Self> {
        Box::new(Self(PhantomData))
    }
}

fn check_kind<T: Specific>(wschema: &Schema, expected: SchemaType) -> SpecificResult<()> {
    if wschema.schema_type() != expected {
        return Err(SpecificError::mismatch(T::target_name(), wschema));
    }
    Ok(())
}

macro_rules! raw_resolver {
    ($ty:ty, $kind:ident, $callback:ident, $value:ty, $ctor:ident) => {
        impl Specific for $ty {
            fn target_name() -> String {
                SchemaType::$kind.name().to_string()
            }

            fn resolve(ctx: &mut ResolveContext, wschema: &Schema) -> SpecificResult<ConsumerId> {
                check_kind::<$ty>(wschema, SchemaType::$kind)?;
                Ok(ctx.new_node::<$ty>(wschema, 0, RawCallbacks::<$ty>::boxed(), None))
            }
        }

        impl ConsumerCallbacks for RawCallbacks<$ty> {
            fn $callback(&self, target: &mut dyn Any, value: $value) -> SpecificResult<()> {
                *target_mut::<$ty>(target)? = value;
                Ok(())
            }
        }

        pub fn $ctor(wschema: &Schema) -> SpecificResult<Resolver<$ty>> {
            Resolver::new(wschema)
        }
    };
}

raw_resolver!(bool, Boolean, boolean_value, bool, raw_boolean_resolver_new);
raw_resolver!(i32, Int, int_value, i32, raw_int_resolver_new);
raw_resolver!(i64, Long, long_value, i64, raw_long_resolver_new);
raw_resolver!(f32, Float, float_value, f32, raw_float_resolver_new);
raw_resolver!(f64, Double, double_value, f64, raw_double_resolver_new);

impl Specific for () {
    fn target_name() -> String {
        SchemaType::Null.name().to_string()
    }

    fn resolve(ctx: &mut ResolveContext, wschema: &Schema) -> SpecificResult<ConsumerId> {
        check_kind::<()>(wschema, SchemaType::Null)?;
        Ok(ctx.new_node::<()>(wschema, 0, RawCallbacks::<()>::boxed(), None))
    }
}

impl ConsumerCallbacks for RawCallbacks<()> {
    fn null_value(&self, target: &mut dyn Any) -> SpecificResult<()> {
        target_mut::<()>(target).map(|_| ())
    }
}

pub fn raw_null_resolver_new(wschema: &Schema) -> SpecificResult<Resolver<()>> {
    Resolver::new(wschema)
}

impl Specific for RawString {
    fn target_name() -> String {
        SchemaType::String.name().to_string()
    }

    fn resolve(ctx: &mut ResolveContext, wschema: &Schema) -> SpecificResult<ConsumerId> {
        check_kind::<RawString>(wschema, SchemaType::String)?;
        Ok(ctx.new_node::<RawString>(wschema, 0, RawCallbacks::<RawString>::boxed(), None))
    }
}

impl ConsumerCallbacks for RawCallbacks<RawString> {
    fn string_value(&self, target: &mut dyn Any, value: &str) -> SpecificResult<()> {
        Ok(target_mut::<RawString>(target)?.set_str(value)?)
    }
}

pub fn raw_string_resolver_new(wschema: &Schema) -> SpecificResult<Resolver<RawString>> {
    Resolver::new(wschema)
}

impl Specific for RawBytes {
    fn target_name() -> String {
        SchemaType::Bytes.name().to_string()
    }

    fn resolve(ctx: &mut ResolveContext, wschema: &Schema) -> SpecificResult<ConsumerId> {
        check_kind::<RawBytes>(wschema, SchemaType::Bytes)?;
        Ok(ctx.new_node::<RawBytes>(wschema, 0, RawCallbacks::<RawBytes>::boxed(), None))
    }
}

impl ConsumerCallbacks for RawCallbacks<RawBytes> {
    fn bytes_value(&self, target: &mut dyn Any, value: &[u8]) -> SpecificResult<()> {
        Ok(target_mut::<RawBytes>(target)?.set(value)?)
    }
}

pub fn raw_bytes_resolver_new(wschema: &Schema) -> SpecificResult<Resolver<RawBytes>> {
    Resolver::new(wschema)
}

/* ============================================================================
   Raw consume
   ============================================================================ */

/* Feeds an in-memory raw value into a consumer, playing the role of the
 * writer. The consumer must have been built for a writer schema of the
 * value's own kind; a writer-union consumer is entered through its first
 * branch that accepts the value. */
pub trait RawConsume {
    fn raw_consume(&self, graph: &ConsumerGraph, id: ConsumerId, target: &mut dyn Any) -> SpecificResult<()>;
}

/* Steps through writer-union and branch-selector nodes to the consumer
 * that takes a value of `kind` */
fn enter<'a>(
    graph: &ConsumerGraph,
    id: ConsumerId,
    kind: SchemaType,
    target: &'a mut dyn Any,
) -> SpecificResult<(ConsumerId, &'a mut dyn Any)> {
    let node = graph.get(id)?;
    if let Some(selector) = node.selector() {
        let branch = node.callbacks().union_branch(target, selector.discriminant)?;
        let child = node
            .child(0)
            .ok_or(SpecificError::MissingBranch { discriminant: selector.discriminant })?;
        return enter(graph, child, kind, branch);
    }
    let schema = node.schema();
    if schema.schema_type() == SchemaType::Union && kind != SchemaType::Union {
        for index in 0..schema.union_size() {
            let accepts = schema
                .union_branch(index)
                .and_then(|b| b.resolve_link().ok())
                .is_some_and(|b| b.schema_type() == kind);
            if let (true, Some(child)) = (accepts, node.child(index)) {
                return enter(graph, child, kind, target);
            }
        }
        return Err(SpecificError::SchemaMismatch {
            target: schema.type_name().to_string(),
            actual: kind.name().to_string(),
        });
    }
    Ok((id, target))
}

macro_rules! raw_consume_scalar {
    ($ty:ty, $kind:ident, $callback:ident) => {
        impl RawConsume for $ty {
            fn raw_consume(&self, graph: &ConsumerGraph, id: ConsumerId, target: &mut dyn Any) -> SpecificResult<()> {
                let (id, target) = enter(graph, id, SchemaType::$kind, target)?;
                graph.get(id)?.callbacks().$callback(target, *self)
            }
        }
    };
}

raw_consume_scalar!(bool, Boolean, boolean_value);
raw_consume_scalar!(i32, Int, int_value);
raw_consume_scalar!(i64, Long, long_value);
raw_consume_scalar!(f32, Float, float_value);
raw_consume_scalar!(f64, Double, double_value);

impl RawConsume for () {
    fn raw_consume(&self, graph: &ConsumerGraph, id: ConsumerId, target: &mut dyn Any) -> SpecificResult<()> {
        let (id, target) = enter(graph, id, SchemaType::Null, target)?;
        graph.get(id)?.callbacks().null_value(target)
    }
}

impl RawConsume for RawString {
    fn raw_consume(&self, graph: &ConsumerGraph, id: ConsumerId, target: &mut dyn Any) -> SpecificResult<()> {
        let (id, target) = enter(graph, id, SchemaType::String, target)?;
        let text = self.as_str().ok_or(avro_value::ValueError::InvalidUtf8)?;
        graph.get(id)?.callbacks().string_value(target, text)
    }
}

impl RawConsume for RawBytes {
    fn raw_consume(&self, graph: &ConsumerGraph, id: ConsumerId, target: &mut dyn Any) -> SpecificResult<()> {
        let (id, target) = enter(graph, id, SchemaType::Bytes, target)?;
        graph.get(id)?.callbacks().bytes_value(target, self.get())
    }
}

impl<T: RawConsume> RawConsume for RawArray<T> {
    fn raw_consume(&self, graph: &ConsumerGraph, id: ConsumerId, target: &mut dyn Any) -> SpecificResult<()> {
        let (id, target) = enter(graph, id, SchemaType::Array, target)?;
        let node = graph.get(id)?;
        let callbacks = node.callbacks();
        callbacks.array_start(target, self.size())?;
        let items = node.child(0);
        for element in self.iter() {
            let slot = callbacks.array_element(target)?;
            match items {
                Some(items) => element.raw_consume(graph, items, slot)?,
                None => return Err(SpecificError::MissingBranch { discriminant: 0 }),
            }
        }
        Ok(())
    }
}

impl<T: RawConsume> RawConsume for RawMap<T> {
    fn raw_consume(&self, graph: &ConsumerGraph, id: ConsumerId, target: &mut dyn Any) -> SpecificResult<()> {
        let (id, target) = enter(graph, id, SchemaType::Map, target)?;
        let node = graph.get(id)?;
        let callbacks = node.callbacks();
        callbacks.map_start(target, self.size())?;
        let values = node.child(0);
        for (key, element) in self.iter() {
            let slot = callbacks.map_element(target, key)?;
            match values {
                Some(values) => element.raw_consume(graph, values, slot)?,
                None => return Err(SpecificError::MissingBranch { discriminant: 0 }),
            }
        }
        Ok(())
    }
}
