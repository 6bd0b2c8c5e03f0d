/* Generic value tree
 *
 * One node per schema node, owning its children. Every node is served by
 * the single shared GENERIC_IFACE. Links are followed when a node is
 * created, so a node's schema is never a link. Unions start with no branch
 * selected and arrays/maps start empty, which is what keeps recursive
 * schemas finite. */

use crate::errors::{ValueError, ValueResult};
use crate::iface::{downcast, downcast_mut, not_applicable, ValueIface, ValueMut, ValueRef};
use avro_data::{RawArray, RawBytes, RawMap, RawString};
use avro_types::{Schema, SchemaError, SchemaId, SchemaType};
use std::any::Any;

#[derive(Debug, Clone)]
pub struct GenericValue {
    schema: Schema,
    data: GenericData,
}

#[derive(Debug, Clone)]
enum GenericData {
    Null,
    Boolean(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Bytes(RawBytes),
    String(RawString),
    Enum(i32),
    Fixed(Vec<u8>),
    Record(Vec<GenericValue>),
    Array(RawArray<GenericValue>),
    Map(RawMap<GenericValue>),
    Union {
        discriminant: Option<usize>,
        branch: Option<Box<GenericValue>>,
    },
}

pub struct GenericIface;

pub static GENERIC_IFACE: GenericIface = GenericIface;

impl GenericValue {
    pub fn new(schema: &Schema) -> ValueResult<Self> {
        Self::build(schema, &mut Vec::new())
    }

    fn build(schema: &Schema, records: &mut Vec<SchemaId>) -> ValueResult<Self> {
        let schema = schema.resolve_link()?;
        let data = match schema.schema_type() {
            SchemaType::Null => GenericData::Null,
            SchemaType::Boolean => GenericData::Boolean(false),
            SchemaType::Int => GenericData::Int(0),
            SchemaType::Long => GenericData::Long(0),
            SchemaType::Float => GenericData::Float(0.0),
            SchemaType::Double => GenericData::Double(0.0),
            SchemaType::Bytes => GenericData::Bytes(RawBytes::new()),
            SchemaType::String => GenericData::String(RawString::new()),
            SchemaType::Enum => GenericData::Enum(0),
            SchemaType::Fixed => GenericData::Fixed(vec![0; schema.fixed_size().unwrap_or(0)]),
            SchemaType::Array => GenericData::Array(RawArray::new()),
            SchemaType::Map => GenericData::Map(RawMap::new()),
            SchemaType::Union => GenericData::Union {
                discriminant: None,
                branch: None,
            },
            SchemaType::Record => {
                if records.contains(&schema.id()) {
                    return Err(ValueError::UnboundedRecursion {
                        name: schema.type_name().to_string(),
                    });
                }
                records.push(schema.id());
                let mut fields = Vec::with_capacity(schema.record_size());
                for index in 0..schema.record_size() {
                    if let Some(field) = schema.record_field(index) {
                        fields.push(Self::build(field, records)?);
                    }
                }
                records.pop();
                GenericData::Record(fields)
            }
            SchemaType::Link => {
                return Err(ValueError::Schema(SchemaError::UnboundLink {
                    name: schema.type_name().to_string(),
                }))
            }
        };
        Ok(Self { schema, data })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn as_value(&self) -> ValueRef<'_> {
        ValueRef::new(&GENERIC_IFACE, self)
    }

    pub fn as_value_mut(&mut self) -> ValueMut<'_> {
        ValueMut::new(&GENERIC_IFACE, self)
    }

    pub fn reset(&mut self) {
        match &mut self.data {
            GenericData::Null => {}
            GenericData::Boolean(v) => *v = false,
            GenericData::Int(v) => *v = 0,
            GenericData::Long(v) => *v = 0,
            GenericData::Float(v) => *v = 0.0,
            GenericData::Double(v) => *v = 0.0,
            GenericData::Bytes(v) => v.clear(),
            GenericData::String(v) => v.clear(),
            GenericData::Enum(v) => *v = 0,
            GenericData::Fixed(v) => v.fill(0),
            GenericData::Record(fields) => fields.iter_mut().for_each(GenericValue::reset),
            GenericData::Array(items) => items.clear(),
            GenericData::Map(entries) => entries.clear(),
            GenericData::Union {
                discriminant,
                branch,
            } => {
                *discriminant = None;
                *branch = None;
            }
        }
    }
}

impl Default for GenericValue {
    /* A null value */
    fn default() -> Self {
        Self {
            schema: Schema::null(),
            data: GenericData::Null,
        }
    }
}

fn generic(this: &dyn Any) -> ValueResult<&GenericValue> {
    downcast::<GenericValue>(this)
}

fn generic_mut(this: &mut dyn Any) -> ValueResult<&mut GenericValue> {
    downcast_mut::<GenericValue>(this)
}

macro_rules! scalar_accessors {
    ($get:ident, $set:ident, $variant:ident, $ty:ty) => {
        fn $get(&self, this: &dyn Any) -> ValueResult<$ty> {
            match &generic(this)?.data {
                GenericData::$variant(v) => Ok(*v),
                _ => Err(not_applicable(self, this, stringify!($get))),
            }
        }

        fn $set(&self, this: &mut dyn Any, value: $ty) -> ValueResult<()> {
            match &mut generic_mut(this)?.data {
                GenericData::$variant(v) => {
                    *v = value;
                    Ok(())
                }
                _ => Err(not_applicable(self, &*this, stringify!($set))),
            }
        }
    };
}

impl ValueIface for GenericIface {
    fn value_type(&self, this: &dyn Any) -> ValueResult<SchemaType> {
        Ok(generic(this)?.schema.schema_type())
    }

    fn schema(&self, this: &dyn Any) -> ValueResult<Schema> {
        Ok(generic(this)?.schema.clone())
    }

    fn reset(&self, this: &mut dyn Any) -> ValueResult<()> {
        generic_mut(this)?.reset();
        Ok(())
    }

    scalar_accessors!(get_boolean, set_boolean, Boolean, bool);
    scalar_accessors!(get_int, set_int, Int, i32);
    scalar_accessors!(get_long, set_long, Long, i64);
    scalar_accessors!(get_float, set_float, Float, f32);
    scalar_accessors!(get_double, set_double, Double, f64);

    fn get_null(&self, this: &dyn Any) -> ValueResult<()> {
        match &generic(this)?.data {
            GenericData::Null => Ok(()),
            _ => Err(not_applicable(self, this, "get_null")),
        }
    }

    fn set_null(&self, this: &mut dyn Any) -> ValueResult<()> {
        match &generic_mut(this)?.data {
            GenericData::Null => Ok(()),
            _ => Err(not_applicable(self, &*this, "set_null")),
        }
    }

    fn get_bytes<'a>(&self, this: &'a dyn Any) -> ValueResult<&'a [u8]> {
        match &generic(this)?.data {
            GenericData::Bytes(v) => Ok(v.get()),
            _ => Err(not_applicable(self, this, "get_bytes")),
        }
    }

    fn set_bytes(&self, this: &mut dyn Any, value: &[u8]) -> ValueResult<()> {
        match &mut generic_mut(this)?.data {
            GenericData::Bytes(v) => Ok(v.set(value)?),
            _ => Err(not_applicable(self, &*this, "set_bytes")),
        }
    }

    fn give_bytes(&self, this: &mut dyn Any, value: Vec<u8>) -> ValueResult<()> {
        match &mut generic_mut(this)?.data {
            GenericData::Bytes(v) => {
                v.give(value, None);
                Ok(())
            }
            _ => Err(not_applicable(self, &*this, "give_bytes")),
        }
    }

    fn get_string<'a>(&self, this: &'a dyn Any) -> ValueResult<(&'a str, usize)> {
        match &generic(this)?.data {
            GenericData::String(v) => {
                let text = v.as_str().ok_or(ValueError::InvalidUtf8)?;
                Ok((text, text.len() + 1))
            }
            _ => Err(not_applicable(self, this, "get_string")),
        }
    }

    fn set_string(&self, this: &mut dyn Any, value: &str) -> ValueResult<()> {
        match &mut generic_mut(this)?.data {
            GenericData::String(v) => Ok(v.set_str(value)?),
            _ => Err(not_applicable(self, &*this, "set_string")),
        }
    }

    fn give_string(&self, this: &mut dyn Any, value: String) -> ValueResult<()> {
        match &mut generic_mut(this)?.data {
            GenericData::String(v) => {
                v.give(value.into_bytes(), None);
                Ok(())
            }
            _ => Err(not_applicable(self, &*this, "give_string")),
        }
    }

    fn get_enum(&self, this: &dyn Any) -> ValueResult<i32> {
        match &generic(this)?.data {
            GenericData::Enum(v) => Ok(*v),
            _ => Err(not_applicable(self, this, "get_enum")),
        }
    }

    fn set_enum(&self, this: &mut dyn Any, symbol: i32) -> ValueResult<()> {
        let value = generic_mut(this)?;
        let size = value.schema.enum_size();
        match &mut value.data {
            GenericData::Enum(v) => {
                if symbol < 0 || symbol as usize >= size {
                    return Err(ValueError::InvalidEnumSymbol {
                        index: i64::from(symbol),
                        size,
                    });
                }
                *v = symbol;
                Ok(())
            }
            _ => Err(not_applicable(self, &*this, "set_enum")),
        }
    }

    fn get_fixed<'a>(&self, this: &'a dyn Any) -> ValueResult<&'a [u8]> {
        match &generic(this)?.data {
            GenericData::Fixed(v) => Ok(v),
            _ => Err(not_applicable(self, this, "get_fixed")),
        }
    }

    fn set_fixed(&self, this: &mut dyn Any, value: &[u8]) -> ValueResult<()> {
        self.give_fixed(this, value.to_vec())
    }

    fn give_fixed(&self, this: &mut dyn Any, value: Vec<u8>) -> ValueResult<()> {
        let fixed = generic_mut(this)?;
        let name = fixed.schema.type_name().to_string();
        match &mut fixed.data {
            GenericData::Fixed(v) => {
                if value.len() != v.len() {
                    return Err(ValueError::FixedSizeMismatch {
                        name,
                        expected: v.len(),
                        actual: value.len(),
                    });
                }
                *v = value;
                Ok(())
            }
            _ => Err(not_applicable(self, &*this, "give_fixed")),
        }
    }

    fn get_size(&self, this: &dyn Any) -> ValueResult<usize> {
        match &generic(this)?.data {
            GenericData::Record(fields) => Ok(fields.len()),
            GenericData::Array(items) => Ok(items.size()),
            GenericData::Map(entries) => Ok(entries.size()),
            _ => Err(not_applicable(self, this, "get_size")),
        }
    }

    fn get_by_index<'a>(
        &self,
        this: &'a dyn Any,
        index: usize,
    ) -> ValueResult<(ValueRef<'a>, Option<&'a str>)> {
        let value = generic(this)?;
        let out_of_range = |size| ValueError::IndexOutOfRange { index, size };
        match &value.data {
            GenericData::Record(fields) => {
                let field = fields.get(index).ok_or(out_of_range(fields.len()))?;
                Ok((field.as_value(), value.schema.record_field_name(index)))
            }
            GenericData::Array(items) => {
                let item = items.get(index).ok_or(out_of_range(items.size()))?;
                Ok((item.as_value(), None))
            }
            GenericData::Map(entries) => {
                let entry = entries
                    .get_by_index(index)
                    .ok_or(out_of_range(entries.size()))?;
                Ok((entry.as_value(), entries.key(index)))
            }
            _ => Err(not_applicable(self, this, "get_by_index")),
        }
    }

    fn get_by_name<'a>(&self, this: &'a dyn Any, name: &str) -> ValueResult<(ValueRef<'a>, usize)> {
        let value = generic(this)?;
        match &value.data {
            GenericData::Record(fields) => value
                .schema
                .record_field_index(name)
                .and_then(|index| fields.get(index).map(|f| (f.as_value(), index)))
                .ok_or_else(|| ValueError::NoSuchField {
                    name: name.to_string(),
                }),
            GenericData::Map(entries) => entries
                .get(name)
                .map(|(entry, index)| (entry.as_value(), index))
                .ok_or_else(|| ValueError::NoSuchKey {
                    key: name.to_string(),
                }),
            _ => Err(not_applicable(self, this, "get_by_name")),
        }
    }

    fn get_by_index_mut<'a>(&self, this: &'a mut dyn Any, index: usize) -> ValueResult<ValueMut<'a>> {
        if !matches!(
            generic(&*this)?.data,
            GenericData::Record(_) | GenericData::Array(_) | GenericData::Map(_)
        ) {
            return Err(not_applicable(self, &*this, "get_by_index_mut"));
        }
        let value = generic_mut(this)?;
        let child = match &mut value.data {
            GenericData::Record(fields) => {
                let size = fields.len();
                fields.get_mut(index).ok_or(ValueError::IndexOutOfRange { index, size })?
            }
            GenericData::Array(items) => {
                let size = items.size();
                items.get_mut(index).ok_or(ValueError::IndexOutOfRange { index, size })?
            }
            GenericData::Map(entries) => {
                let size = entries.size();
                entries
                    .get_by_index_mut(index)
                    .ok_or(ValueError::IndexOutOfRange { index, size })?
            }
            _ => {
                return Err(ValueError::NotApplicable {
                    operation: "get_by_index_mut",
                    value_type: value.schema.schema_type().to_string(),
                })
            }
        };
        Ok(child.as_value_mut())
    }

    fn get_by_name_mut<'a>(
        &self,
        this: &'a mut dyn Any,
        name: &str,
    ) -> ValueResult<(ValueMut<'a>, usize)> {
        let value = generic_mut(this)?;
        let field_index = value.schema.record_field_index(name);
        let value_type = value.schema.schema_type();
        match &mut value.data {
            GenericData::Record(fields) => match field_index {
                Some(index) if index < fields.len() => Ok((fields[index].as_value_mut(), index)),
                _ => Err(ValueError::NoSuchField {
                    name: name.to_string(),
                }),
            },
            GenericData::Map(entries) => entries
                .get_mut(name)
                .map(|(entry, index)| (entry.as_value_mut(), index))
                .ok_or_else(|| ValueError::NoSuchKey {
                    key: name.to_string(),
                }),
            _ => Err(ValueError::NotApplicable {
                operation: "get_by_name_mut",
                value_type: value_type.to_string(),
            }),
        }
    }

    fn append<'a>(&self, this: &'a mut dyn Any) -> ValueResult<(ValueMut<'a>, usize)> {
        let value = generic_mut(this)?;
        let items_schema = match value.schema.array_items() {
            Some(items) => items.clone(),
            None => {
                return Err(ValueError::NotApplicable {
                    operation: "append",
                    value_type: value.schema.schema_type().to_string(),
                })
            }
        };
        let element = GenericValue::new(&items_schema)?;
        match &mut value.data {
            GenericData::Array(items) => {
                let index = items.size();
                let slot = items.append_with(element)?;
                Ok((slot.as_value_mut(), index))
            }
            _ => Err(ValueError::WrongSelf {
                expected: "array value",
            }),
        }
    }

    fn add<'a>(&self, this: &'a mut dyn Any, key: &str) -> ValueResult<(ValueMut<'a>, usize, bool)> {
        let value = generic_mut(this)?;
        let values_schema = match value.schema.map_values() {
            Some(values) => values.clone(),
            None => {
                return Err(ValueError::NotApplicable {
                    operation: "add",
                    value_type: value.schema.schema_type().to_string(),
                })
            }
        };
        match &mut value.data {
            GenericData::Map(entries) => {
                /* build the element first so a failure leaves the map untouched */
                let fresh = match entries.get(key) {
                    Some(_) => None,
                    None => Some(GenericValue::new(&values_schema)?),
                };
                let (slot, index, is_new) = entries.get_or_create(key)?;
                if let Some(fresh) = fresh {
                    *slot = fresh;
                }
                Ok((slot.as_value_mut(), index, is_new))
            }
            _ => Err(ValueError::WrongSelf {
                expected: "map value",
            }),
        }
    }

    fn get_discriminant(&self, this: &dyn Any) -> ValueResult<usize> {
        match &generic(this)?.data {
            GenericData::Union { discriminant, .. } => discriminant.ok_or(ValueError::NoBranch),
            _ => Err(not_applicable(self, this, "get_discriminant")),
        }
    }

    fn get_current_branch<'a>(&self, this: &'a dyn Any) -> ValueResult<ValueRef<'a>> {
        match &generic(this)?.data {
            GenericData::Union { branch, .. } => branch
                .as_deref()
                .map(GenericValue::as_value)
                .ok_or(ValueError::NoBranch),
            _ => Err(not_applicable(self, this, "get_current_branch")),
        }
    }

    fn get_current_branch_mut<'a>(&self, this: &'a mut dyn Any) -> ValueResult<ValueMut<'a>> {
        let value = generic_mut(this)?;
        let value_type = value.schema.schema_type();
        match &mut value.data {
            GenericData::Union { branch, .. } => branch
                .as_deref_mut()
                .map(GenericValue::as_value_mut)
                .ok_or(ValueError::NoBranch),
            _ => Err(ValueError::NotApplicable {
                operation: "get_current_branch_mut",
                value_type: value_type.to_string(),
            }),
        }
    }

    fn set_branch<'a>(&self, this: &'a mut dyn Any, index: usize) -> ValueResult<ValueMut<'a>> {
        let value = generic_mut(this)?;
        let value_type = value.schema.schema_type();
        let branches = value.schema.union_size();
        let branch_schema = value.schema.union_branch(index).cloned();
        match &mut value.data {
            GenericData::Union {
                discriminant,
                branch,
            } => {
                let branch_schema = branch_schema.ok_or(ValueError::InvalidDiscriminant {
                    discriminant: index as i64,
                    branches,
                })?;
                if *discriminant != Some(index) || branch.is_none() {
                    let fresh = GenericValue::new(&branch_schema)?;
                    *discriminant = Some(index);
                    *branch = Some(Box::new(fresh));
                }
                match branch.as_deref_mut() {
                    Some(selected) => Ok(selected.as_value_mut()),
                    None => Err(ValueError::NoBranch),
                }
            }
            _ => Err(ValueError::NotApplicable {
                operation: "set_branch",
                value_type: value_type.to_string(),
            }),
        }
    }
}
