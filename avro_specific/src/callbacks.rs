/* Consumer callbacks
 *
 * A consumer receives decoded values in encoding order and stores them into
 * a target. The target is passed to every callback as `dyn Any`; compound
 * callbacks hand back the child target the next consumer should write to.
 * Every callback defaults to NotApplicable, so a consumer only implements
 * the ones matching the writer schema it was built for. */

use crate::errors::{SpecificError, SpecificResult};
use std::any::Any;

fn not_applicable<T>(callback: &'static str) -> SpecificResult<T> {
    Err(SpecificError::NotApplicable { callback })
}

pub fn target_mut<T: Any>(target: &mut dyn Any) -> SpecificResult<&mut T> {
    target.downcast_mut::<T>().ok_or(SpecificError::WrongTarget {
        expected: std::any::type_name::<T>(),
    })
}

pub trait ConsumerCallbacks: Send + Sync {
    fn null_value(&self, _target: &mut dyn Any) -> SpecificResult<()> {
        not_applicable("null_value")
    }

    fn boolean_value(&self, _target: &mut dyn Any, _value: bool) -> SpecificResult<()> {
        not_applicable("boolean_value")
    }

    fn int_value(&self, _target: &mut dyn Any, _value: i32) -> SpecificResult<()> {
        not_applicable("int_value")
    }

    fn long_value(&self, _target: &mut dyn Any, _value: i64) -> SpecificResult<()> {
        not_applicable("long_value")
    }

    fn float_value(&self, _target: &mut dyn Any, _value: f32) -> SpecificResult<()> {
        not_applicable("float_value")
    }

    fn double_value(&self, _target: &mut dyn Any, _value: f64) -> SpecificResult<()> {
        not_applicable("double_value")
    }

    fn bytes_value(&self, _target: &mut dyn Any, _value: &[u8]) -> SpecificResult<()> {
        not_applicable("bytes_value")
    }

    fn string_value(&self, _target: &mut dyn Any, _value: &str) -> SpecificResult<()> {
        not_applicable("string_value")
    }

    /* Writer symbol index */
    fn enum_value(&self, _target: &mut dyn Any, _symbol: usize) -> SpecificResult<()> {
        not_applicable("enum_value")
    }

    fn fixed_value(&self, _target: &mut dyn Any, _value: &[u8]) -> SpecificResult<()> {
        not_applicable("fixed_value")
    }

    /* Called once before the first block, including for empty arrays */
    fn array_start(&self, _target: &mut dyn Any, _size_hint: usize) -> SpecificResult<()> {
        not_applicable("array_start")
    }

    fn array_element<'a>(&self, _target: &'a mut dyn Any) -> SpecificResult<&'a mut dyn Any> {
        not_applicable("array_element")
    }

    fn map_start(&self, _target: &mut dyn Any, _size_hint: usize) -> SpecificResult<()> {
        not_applicable("map_start")
    }

    fn map_element<'a>(&self, _target: &'a mut dyn Any, _key: &str) -> SpecificResult<&'a mut dyn Any> {
        not_applicable("map_element")
    }

    fn record_start(&self, _target: &mut dyn Any) -> SpecificResult<()> {
        not_applicable("record_start")
    }

    /* Writer field index */
    fn record_field<'a>(&self, _target: &'a mut dyn Any, _index: usize) -> SpecificResult<&'a mut dyn Any> {
        not_applicable("record_field")
    }

    /* Target-side branch selection */
    fn union_branch<'a>(
        &self,
        _target: &'a mut dyn Any,
        _discriminant: usize,
    ) -> SpecificResult<&'a mut dyn Any> {
        not_applicable("union_branch")
    }

    /* Invoked once when the free walk releases the node */
    fn on_free(&self) {}
}

/* Writer unions consume nothing themselves; the driver reads the
 * discriminant and hands the same target to the branch's child. */
pub struct WriterUnionCallbacks;

impl ConsumerCallbacks for WriterUnionCallbacks {}
