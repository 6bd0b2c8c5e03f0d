/* Array and map resolvers
 *
 * The item (or value) consumer is the node's only child. The target is
 * cleared when the array or map starts, so decoding into a reused target
 * replaces its contents. */

use crate::callbacks::{target_mut, ConsumerCallbacks};
use crate::context::{ResolveContext, Specific};
use crate::errors::{SpecificError, SpecificResult};
use crate::graph::ConsumerId;
use avro_data::{RawArray, RawMap};
use avro_types::{Schema, SchemaType};
use std::any::Any;
use std::marker::PhantomData;

/* Block counts come from the data; larger blocks grow on append */
const PREALLOCATE_LIMIT: usize = 1024;

struct ArrayCallbacks<T>(PhantomData<fn(&mut T)>);

impl<T: Specific> ConsumerCallbacks for ArrayCallbacks<T> {
    fn array_start(&self, target: &mut dyn Any, size_hint: usize) -> SpecificResult<()> {
        let array = target_mut::<RawArray<T>>(target)?;
        array.clear();
        Ok(array.ensure_size(size_hint.min(PREALLOCATE_LIMIT))?)
    }

    fn array_element<'a>(&self, target: &'a mut dyn Any) -> SpecificResult<&'a mut dyn Any> {
        let element = target_mut::<RawArray<T>>(target)?.append()?;
        Ok(element)
    }
}

impl<T: Specific> Specific for RawArray<T> {
    fn target_name() -> String {
        format!("array of {}", T::target_name())
    }

    fn resolve(ctx: &mut ResolveContext, wschema: &Schema) -> SpecificResult<ConsumerId> {
        let items = match (wschema.schema_type(), wschema.array_items()) {
            (SchemaType::Array, Some(items)) => items.clone(),
            _ => return Err(SpecificError::mismatch(Self::target_name(), wschema)),
        };
        let id = ctx.new_node::<Self>(wschema, 1, Box::new(ArrayCallbacks::<T>(PhantomData)), None);
        let child = ctx.resolve::<T>(&items)?;
        ctx.set_child(id, 0, child)?;
        Ok(id)
    }
}

struct MapCallbacks<T>(PhantomData<fn(&mut T)>);

impl<T: Specific> ConsumerCallbacks for MapCallbacks<T> {
    fn map_start(&self, target: &mut dyn Any, size_hint: usize) -> SpecificResult<()> {
        let map = target_mut::<RawMap<T>>(target)?;
        map.clear();
        Ok(map.ensure_size(size_hint.min(PREALLOCATE_LIMIT))?)
    }

    /* A repeated key overwrites the earlier entry */
    fn map_element<'a>(&self, target: &'a mut dyn Any, key: &str) -> SpecificResult<&'a mut dyn Any> {
        let (element, _, is_new) = target_mut::<RawMap<T>>(target)?.get_or_create(key)?;
        if !is_new {
            *element = T::default();
        }
        Ok(element)
    }
}

impl<T: Specific> Specific for RawMap<T> {
    fn target_name() -> String {
        format!("map of {}", T::target_name())
    }

    fn resolve(ctx: &mut ResolveContext, wschema: &Schema) -> SpecificResult<ConsumerId> {
        let values = match (wschema.schema_type(), wschema.map_values()) {
            (SchemaType::Map, Some(values)) => values.clone(),
            _ => return Err(SpecificError::mismatch(Self::target_name(), wschema)),
        };
        let id = ctx.new_node::<Self>(wschema, 1, Box::new(MapCallbacks::<T>(PhantomData)), None);
        let child = ctx.resolve::<T>(&values)?;
        ctx.set_child(id, 0, child)?;
        Ok(id)
    }
}
