/* Binary decode driver
 *
 * Walks the writer schema of each consumer node, reading values in
 * encoding order and handing them to the node's callbacks. Writer data
 * with no consumer (fields the target does not have) is skipped. */

use crate::errors::{SpecificError, SpecificResult};
use crate::graph::{ConsumerGraph, ConsumerId};
use avro_types::{Schema, SchemaType};
use avro_value::encoding::check_block_count;
use avro_value::{skip, Reader, ValueError};
use std::any::Any;

pub fn consume_binary(
    reader: &mut Reader<'_>,
    graph: &ConsumerGraph,
    id: ConsumerId,
    target: &mut dyn Any,
) -> SpecificResult<()> {
    let node = graph.get(id)?;
    let callbacks = node.callbacks();

    if let Some(selector) = node.selector() {
        let branch = callbacks.union_branch(target, selector.discriminant)?;
        let child = node.child(0).ok_or(SpecificError::MissingBranch {
            discriminant: selector.discriminant,
        })?;
        return consume_binary(reader, graph, child, branch);
    }

    let schema = node.schema();
    match schema.schema_type() {
        SchemaType::Null => callbacks.null_value(target),
        SchemaType::Boolean => callbacks.boolean_value(target, reader.read_boolean()?),
        SchemaType::Int => callbacks.int_value(target, reader.read_int()?),
        SchemaType::Long => callbacks.long_value(target, reader.read_long()?),
        SchemaType::Float => callbacks.float_value(target, reader.read_float()?),
        SchemaType::Double => callbacks.double_value(target, reader.read_double()?),
        SchemaType::Bytes => callbacks.bytes_value(target, reader.read_bytes()?),
        SchemaType::String => callbacks.string_value(target, reader.read_string()?),
        SchemaType::Enum => {
            let symbol = reader.read_int()?;
            let index = usize::try_from(symbol)
                .ok()
                .filter(|&i| i < schema.enum_size())
                .ok_or(ValueError::InvalidEnumSymbol {
                    index: i64::from(symbol),
                    size: schema.enum_size(),
                })?;
            callbacks.enum_value(target, index)
        }
        SchemaType::Fixed => {
            let size = schema.fixed_size().unwrap_or(0);
            callbacks.fixed_value(target, reader.read_fixed(size)?)
        }
        SchemaType::Record => {
            callbacks.record_start(target)?;
            for index in 0..schema.record_size() {
                match node.child(index) {
                    Some(child) => {
                        let field = callbacks.record_field(target, index)?;
                        consume_binary(reader, graph, child, field)?;
                    }
                    None => {
                        if let Some(field_schema) = schema.record_field(index) {
                            skip(reader, field_schema)?;
                        }
                    }
                }
            }
            Ok(())
        }
        SchemaType::Array => {
            let items = node.child(0).ok_or(SpecificError::MissingBranch { discriminant: 0 })?;
            let items_schema = schema.array_items().cloned().unwrap_or_else(Schema::null);
            let mut started = false;
            loop {
                let count = reader.read_block_count()?;
                check_block_count(reader, count, &items_schema, false)?;
                if !started {
                    callbacks.array_start(target, count)?;
                    started = true;
                }
                if count == 0 {
                    return Ok(());
                }
                for _ in 0..count {
                    let element = callbacks.array_element(target)?;
                    consume_binary(reader, graph, items, element)?;
                }
            }
        }
        SchemaType::Map => {
            let values = node.child(0).ok_or(SpecificError::MissingBranch { discriminant: 0 })?;
            let values_schema = schema.map_values().cloned().unwrap_or_else(Schema::null);
            let mut started = false;
            loop {
                let count = reader.read_block_count()?;
                check_block_count(reader, count, &values_schema, true)?;
                if !started {
                    callbacks.map_start(target, count)?;
                    started = true;
                }
                if count == 0 {
                    return Ok(());
                }
                for _ in 0..count {
                    let key = reader.read_string()?;
                    let element = callbacks.map_element(target, key)?;
                    consume_binary(reader, graph, values, element)?;
                }
            }
        }
        SchemaType::Union => {
            let discriminant = reader.read_long()?;
            let index = usize::try_from(discriminant)
                .ok()
                .filter(|&i| i < schema.union_size())
                .ok_or(ValueError::InvalidDiscriminant {
                    discriminant,
                    branches: schema.union_size(),
                })?;
            let child = node
                .child(index)
                .ok_or(SpecificError::MissingBranch { discriminant: index })?;
            consume_binary(reader, graph, child, target)
        }
        SchemaType::Link => Err(SpecificError::NotApplicable { callback: "link" }),
    }
}
