/* Avro binary encoding.
 *
 * ints and longs are zig-zag varints, floats and doubles little-endian,
 * bytes and strings a long length followed by the contents. Arrays and maps
 * are a series of blocks, each a long count followed by that many items,
 * ending with a zero count. A negative count is followed by the block's
 * size in bytes and means |count| items. */

use crate::errors::{ValueError, ValueResult};
use crate::generic::GenericValue;
use crate::iface::{ValueMut, ValueRef};
use avro_types::{Schema, SchemaType};

const MAX_VARINT_BYTES: usize = 10;

/* Items that encode to nothing are not bounded by the input length */
pub const MAX_ZERO_WIDTH_BLOCK: usize = 1 << 20;

const ZERO_WIDTH_DEPTH: usize = 32;

pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, count: usize) -> ValueResult<&'a [u8]> {
        if count > self.remaining() {
            return Err(ValueError::UnexpectedEof {
                needed: count,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + count];
        self.pos += count;
        Ok(bytes)
    }

    fn read_varint(&mut self) -> ValueResult<u64> {
        let mut value: u64 = 0;
        for shift in 0..MAX_VARINT_BYTES {
            let byte = self.take(1)?[0];
            value |= u64::from(byte & 0x7f) << (shift * 7);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(ValueError::VarintOverflow)
    }

    pub fn read_long(&mut self) -> ValueResult<i64> {
        let raw = self.read_varint()?;
        Ok((raw >> 1) as i64 ^ -((raw & 1) as i64))
    }

    pub fn read_int(&mut self) -> ValueResult<i32> {
        let value = self.read_long()?;
        i32::try_from(value).map_err(|_| ValueError::IntOutOfRange(value))
    }

    pub fn read_boolean(&mut self) -> ValueResult<bool> {
        match self.take(1)?[0] {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(ValueError::InvalidBoolean(other)),
        }
    }

    pub fn read_float(&mut self) -> ValueResult<f32> {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(self.take(4)?);
        Ok(f32::from_le_bytes(bytes))
    }

    pub fn read_double(&mut self) -> ValueResult<f64> {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(self.take(8)?);
        Ok(f64::from_le_bytes(bytes))
    }

    fn read_length(&mut self) -> ValueResult<usize> {
        let length = self.read_long()?;
        usize::try_from(length).map_err(|_| ValueError::InvalidLength(length))
    }

    pub fn read_bytes(&mut self) -> ValueResult<&'a [u8]> {
        let length = self.read_length()?;
        self.take(length)
    }

    pub fn read_string(&mut self) -> ValueResult<&'a str> {
        std::str::from_utf8(self.read_bytes()?).map_err(|_| ValueError::InvalidUtf8)
    }

    pub fn read_fixed(&mut self, size: usize) -> ValueResult<&'a [u8]> {
        self.take(size)
    }

    /* Item count of the next block; zero ends the array or map */
    pub fn read_block_count(&mut self) -> ValueResult<usize> {
        let count = self.read_long()?;
        if count < 0 {
            let _byte_size = self.read_length()?;
            return usize::try_from(count.unsigned_abs())
                .map_err(|_| ValueError::InvalidLength(count));
        }
        usize::try_from(count).map_err(|_| ValueError::InvalidLength(count))
    }
}

/* A block count comes from the data. Every map entry and every item of a
 * non-empty schema takes at least one byte, so a count beyond the remaining
 * input is rejected before anything is allocated. */
pub fn check_block_count(reader: &Reader<'_>, count: usize, items: &Schema, keyed: bool) -> ValueResult<()> {
    let limit = if keyed || !encodes_empty(items, 0) {
        reader.remaining()
    } else {
        MAX_ZERO_WIDTH_BLOCK
    };
    if count > limit {
        return Err(ValueError::BlockTooLarge { count, limit });
    }
    Ok(())
}

/* True when every value of `schema` encodes to zero bytes */
fn encodes_empty(schema: &Schema, depth: usize) -> bool {
    if depth > ZERO_WIDTH_DEPTH {
        return false;
    }
    let Ok(schema) = schema.resolve_link() else {
        return false;
    };
    match schema.schema_type() {
        SchemaType::Null => true,
        SchemaType::Fixed => schema.fixed_size() == Some(0),
        SchemaType::Record => (0..schema.record_size())
            .all(|i| schema.record_field(i).is_some_and(|field| encodes_empty(field, depth + 1))),
        _ => false,
    }
}

/* ---- writers ---- */

pub fn write_long(value: i64, out: &mut Vec<u8>) {
    let mut raw = ((value << 1) ^ (value >> 63)) as u64;
    while raw >= 0x80 {
        out.push((raw as u8 & 0x7f) | 0x80);
        raw >>= 7;
    }
    out.push(raw as u8);
}

pub fn write_int(value: i32, out: &mut Vec<u8>) {
    write_long(i64::from(value), out);
}

pub fn write_boolean(value: bool, out: &mut Vec<u8>) {
    out.push(u8::from(value));
}

pub fn write_float(value: f32, out: &mut Vec<u8>) {
    out.extend_from_slice(&value.to_le_bytes());
}

pub fn write_double(value: f64, out: &mut Vec<u8>) {
    out.extend_from_slice(&value.to_le_bytes());
}

pub fn write_bytes(value: &[u8], out: &mut Vec<u8>) {
    write_long(value.len() as i64, out);
    out.extend_from_slice(value);
}

pub fn write_string(value: &str, out: &mut Vec<u8>) {
    write_bytes(value.as_bytes(), out);
}

/* Arrays and maps are written as one block plus the terminator */
pub fn write_value(value: &ValueRef<'_>, out: &mut Vec<u8>) -> ValueResult<()> {
    match value.value_type()? {
        SchemaType::Null => value.get_null(),
        SchemaType::Boolean => Ok(write_boolean(value.get_boolean()?, out)),
        SchemaType::Int => Ok(write_int(value.get_int()?, out)),
        SchemaType::Long => Ok(write_long(value.get_long()?, out)),
        SchemaType::Float => Ok(write_float(value.get_float()?, out)),
        SchemaType::Double => Ok(write_double(value.get_double()?, out)),
        SchemaType::Bytes => Ok(write_bytes(value.get_bytes()?, out)),
        SchemaType::String => Ok(write_string(value.get_string()?.0, out)),
        SchemaType::Enum => Ok(write_int(value.get_enum()?, out)),
        SchemaType::Fixed => {
            out.extend_from_slice(value.get_fixed()?);
            Ok(())
        }
        SchemaType::Record => {
            for index in 0..value.get_size()? {
                write_value(&value.get_by_index(index)?.0, out)?;
            }
            Ok(())
        }
        SchemaType::Array => {
            let size = value.get_size()?;
            if size > 0 {
                write_long(size as i64, out);
                for index in 0..size {
                    write_value(&value.get_by_index(index)?.0, out)?;
                }
            }
            write_long(0, out);
            Ok(())
        }
        SchemaType::Map => {
            let size = value.get_size()?;
            if size > 0 {
                write_long(size as i64, out);
                for index in 0..size {
                    let (entry, key) = value.get_by_index(index)?;
                    write_string(key.unwrap_or_default(), out);
                    write_value(&entry, out)?;
                }
            }
            write_long(0, out);
            Ok(())
        }
        SchemaType::Union => {
            write_long(value.get_discriminant()? as i64, out);
            write_value(&value.get_current_branch()?, out)
        }
        SchemaType::Link => Err(ValueError::NotApplicable {
            operation: "write_value",
            value_type: SchemaType::Link.to_string(),
        }),
    }
}

/* Decodes into an existing value, driven by that value's own schema */
pub fn read_value(reader: &mut Reader<'_>, dest: &mut ValueMut<'_>) -> ValueResult<()> {
    match dest.value_type()? {
        SchemaType::Null => dest.set_null(),
        SchemaType::Boolean => dest.set_boolean(reader.read_boolean()?),
        SchemaType::Int => dest.set_int(reader.read_int()?),
        SchemaType::Long => dest.set_long(reader.read_long()?),
        SchemaType::Float => dest.set_float(reader.read_float()?),
        SchemaType::Double => dest.set_double(reader.read_double()?),
        SchemaType::Bytes => dest.set_bytes(reader.read_bytes()?),
        SchemaType::String => dest.set_string(reader.read_string()?),
        SchemaType::Enum => dest.set_enum(reader.read_int()?),
        SchemaType::Fixed => {
            let schema = dest.schema()?;
            let size = schema.fixed_size().unwrap_or(0);
            dest.set_fixed(reader.read_fixed(size)?)
        }
        SchemaType::Record => {
            for index in 0..dest.get_size()? {
                read_value(reader, &mut dest.get_by_index_mut(index)?)?;
            }
            Ok(())
        }
        SchemaType::Array => {
            let schema = dest.schema()?;
            let items = schema.array_items().cloned().unwrap_or_else(Schema::null);
            dest.reset()?;
            loop {
                let count = reader.read_block_count()?;
                if count == 0 {
                    return Ok(());
                }
                check_block_count(reader, count, &items, false)?;
                for _ in 0..count {
                    let (mut item, _) = dest.append()?;
                    read_value(reader, &mut item)?;
                }
            }
        }
        SchemaType::Map => {
            let schema = dest.schema()?;
            let values = schema.map_values().cloned().unwrap_or_else(Schema::null);
            dest.reset()?;
            loop {
                let count = reader.read_block_count()?;
                if count == 0 {
                    return Ok(());
                }
                check_block_count(reader, count, &values, true)?;
                for _ in 0..count {
                    let key = reader.read_string()?;
                    let (mut entry, _, _) = dest.add(key)?;
                    read_value(reader, &mut entry)?;
                }
            }
        }
        SchemaType::Union => {
            let schema = dest.schema()?;
            let discriminant = reader.read_long()?;
            let index = usize::try_from(discriminant)
                .ok()
                .filter(|&i| i < schema.union_size())
                .ok_or(ValueError::InvalidDiscriminant {
                    discriminant,
                    branches: schema.union_size(),
                })?;
            read_value(reader, &mut dest.set_branch(index)?)
        }
        SchemaType::Link => Err(ValueError::NotApplicable {
            operation: "read_value",
            value_type: SchemaType::Link.to_string(),
        }),
    }
}

pub fn read_generic(reader: &mut Reader<'_>, schema: &Schema) -> ValueResult<GenericValue> {
    let mut value = GenericValue::new(schema)?;
    read_value(reader, &mut value.as_value_mut())?;
    Ok(value)
}

/* Advances past one encoded value without materializing it */
pub fn skip(reader: &mut Reader<'_>, schema: &Schema) -> ValueResult<()> {
    let schema = schema.resolve_link()?;
    match schema.schema_type() {
        SchemaType::Null => Ok(()),
        SchemaType::Boolean => reader.read_boolean().map(|_| ()),
        SchemaType::Int | SchemaType::Enum => reader.read_int().map(|_| ()),
        SchemaType::Long => reader.read_long().map(|_| ()),
        SchemaType::Float => reader.read_float().map(|_| ()),
        SchemaType::Double => reader.read_double().map(|_| ()),
        SchemaType::Bytes | SchemaType::String => reader.read_bytes().map(|_| ()),
        SchemaType::Fixed => reader
            .read_fixed(schema.fixed_size().unwrap_or(0))
            .map(|_| ()),
        SchemaType::Record => {
            for index in 0..schema.record_size() {
                if let Some(field) = schema.record_field(index) {
                    skip(reader, field)?;
                }
            }
            Ok(())
        }
        SchemaType::Array | SchemaType::Map => {
            let child = match schema.schema_type() {
                SchemaType::Array => schema.array_items(),
                _ => schema.map_values(),
            }
            .cloned()
            .ok_or(ValueError::NotApplicable {
                operation: "skip",
                value_type: schema.schema_type().to_string(),
            })?;
            loop {
                let count = reader.read_long()?;
                if count == 0 {
                    return Ok(());
                }
                if count < 0 {
                    /* the byte size lets the whole block be jumped over */
                    let size = reader.read_length()?;
                    reader.take(size)?;
                    continue;
                }
                let count = usize::try_from(count).map_err(|_| ValueError::InvalidLength(count))?;
                check_block_count(reader, count, &child, schema.schema_type() == SchemaType::Map)?;
                for _ in 0..count {
                    if schema.schema_type() == SchemaType::Map {
                        reader.read_bytes()?;
                    }
                    skip(reader, &child)?;
                }
            }
        }
        SchemaType::Union => {
            let discriminant = reader.read_long()?;
            let branch = usize::try_from(discriminant)
                .ok()
                .and_then(|i| schema.union_branch(i))
                .cloned()
                .ok_or(ValueError::InvalidDiscriminant {
                    discriminant,
                    branches: schema.union_size(),
                })?;
            skip(reader, &branch)
        }
        SchemaType::Link => Err(ValueError::NotApplicable {
            operation: "skip",
            value_type: SchemaType::Link.to_string(),
        }),
    }
}
