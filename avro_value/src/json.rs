/* JSON rendering of values, following Avro's JSON encoding: bytes and fixed
 * become strings with one code point per byte, enums their symbol, and a
 * non-null union branch an object keyed by the branch's type name. */

use crate::errors::{ValueError, ValueResult};
use crate::iface::ValueRef;
use avro_types::SchemaType;
use serde_json::{Map, Number, Value};

fn bytes_to_json(bytes: &[u8]) -> Value {
    Value::String(bytes.iter().map(|&b| char::from(b)).collect())
}

fn float_to_json(value: f64) -> Value {
    Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
}

pub fn to_json(value: &ValueRef<'_>) -> ValueResult<Value> {
    Ok(match value.value_type()? {
        SchemaType::Null => Value::Null,
        SchemaType::Boolean => Value::Bool(value.get_boolean()?),
        SchemaType::Int => Value::from(value.get_int()?),
        SchemaType::Long => Value::from(value.get_long()?),
        SchemaType::Float => float_to_json(f64::from(value.get_float()?)),
        SchemaType::Double => float_to_json(value.get_double()?),
        SchemaType::Bytes => bytes_to_json(value.get_bytes()?),
        SchemaType::String => Value::String(value.get_string()?.0.to_string()),
        SchemaType::Enum => {
            let index = value.get_enum()?;
            let schema = value.schema()?;
            let symbol = usize::try_from(index)
                .ok()
                .and_then(|i| schema.enum_symbol(i))
                .ok_or(ValueError::InvalidEnumSymbol {
                    index: i64::from(index),
                    size: schema.enum_size(),
                })?;
            Value::String(symbol.to_string())
        }
        SchemaType::Fixed => bytes_to_json(value.get_fixed()?),
        SchemaType::Record => {
            let mut object = Map::new();
            for index in 0..value.get_size()? {
                let (field, name) = value.get_by_index(index)?;
                object.insert(name.unwrap_or_default().to_string(), to_json(&field)?);
            }
            Value::Object(object)
        }
        SchemaType::Array => {
            let mut items = Vec::with_capacity(value.get_size()?);
            for index in 0..value.get_size()? {
                items.push(to_json(&value.get_by_index(index)?.0)?);
            }
            Value::Array(items)
        }
        SchemaType::Map => {
            let mut object = Map::new();
            for index in 0..value.get_size()? {
                let (entry, key) = value.get_by_index(index)?;
                object.insert(key.unwrap_or_default().to_string(), to_json(&entry)?);
            }
            Value::Object(object)
        }
        SchemaType::Union => {
            let branch = value.get_current_branch()?;
            match branch.value_type()? {
                SchemaType::Null => Value::Null,
                _ => {
                    let mut object = Map::new();
                    object.insert(branch.schema()?.type_name().to_string(), to_json(&branch)?);
                    Value::Object(object)
                }
            }
        }
        SchemaType::Link => {
            return Err(ValueError::NotApplicable {
                operation: "to_json",
                value_type: SchemaType::Link.to_string(),
            })
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generic::GenericValue;
    use avro_types::Schema;
    use serde_json::json;

    #[test]
    fn union_branch_is_keyed_by_type_name() {
        let schema = Schema::union(vec![Schema::null(), Schema::string()]).expect("union");
        let mut value = GenericValue::new(&schema).expect("value");
        value
            .as_value_mut()
            .set_branch(1)
            .expect("branch")
            .set_string("hi")
            .expect("set");
        assert_eq!(to_json(&value.as_value()).expect("json"), json!({"string": "hi"}));

        value.as_value_mut().set_branch(0).expect("null branch");
        assert_eq!(to_json(&value.as_value()).expect("json"), Value::Null);
    }

    #[test]
    fn bytes_render_one_char_per_byte() {
        let mut value = GenericValue::new(&Schema::bytes()).expect("value");
        value.as_value_mut().set_bytes(&[0x41, 0xff]).expect("set");
        assert_eq!(to_json(&value.as_value()).expect("json"), json!("A\u{ff}"));
    }
}
