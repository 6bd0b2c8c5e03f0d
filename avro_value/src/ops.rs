/* Interface-level copy and comparison.
 *
 * Both walk two values side by side through their interfaces only, so they
 * work across implementations: a generic tree can be copied into a wrapped
 * struct and compared against it afterwards. */

use crate::errors::{ValueError, ValueResult};
use crate::iface::{ValueMut, ValueRef};
use avro_types::SchemaType;

fn mismatch(left: SchemaType, right: SchemaType) -> ValueError {
    ValueError::TypeMismatch {
        left: left.to_string(),
        right: right.to_string(),
    }
}

/* Overwrites `dest` with the contents of `src`. Arrays and maps in `dest`
 * are cleared first. */
pub fn copy_value(dest: &mut ValueMut<'_>, src: &ValueRef<'_>) -> ValueResult<()> {
    let src_type = src.value_type()?;
    let dest_type = dest.value_type()?;
    if src_type != dest_type {
        return Err(mismatch(dest_type, src_type));
    }

    match src_type {
        SchemaType::Null => dest.set_null(),
        SchemaType::Boolean => dest.set_boolean(src.get_boolean()?),
        SchemaType::Int => dest.set_int(src.get_int()?),
        SchemaType::Long => dest.set_long(src.get_long()?),
        SchemaType::Float => dest.set_float(src.get_float()?),
        SchemaType::Double => dest.set_double(src.get_double()?),
        SchemaType::Bytes => dest.set_bytes(src.get_bytes()?),
        SchemaType::String => dest.set_string(src.get_string()?.0),
        SchemaType::Enum => dest.set_enum(src.get_enum()?),
        SchemaType::Fixed => dest.set_fixed(src.get_fixed()?),
        SchemaType::Record => {
            for index in 0..src.get_size()? {
                let (field, _) = src.get_by_index(index)?;
                copy_value(&mut dest.get_by_index_mut(index)?, &field)?;
            }
            Ok(())
        }
        SchemaType::Array => {
            dest.reset()?;
            for index in 0..src.get_size()? {
                let (item, _) = src.get_by_index(index)?;
                let (mut slot, _) = dest.append()?;
                copy_value(&mut slot, &item)?;
            }
            Ok(())
        }
        SchemaType::Map => {
            dest.reset()?;
            for index in 0..src.get_size()? {
                let (entry, key) = src.get_by_index(index)?;
                let (mut slot, _, _) = dest.add(key.unwrap_or_default())?;
                copy_value(&mut slot, &entry)?;
            }
            Ok(())
        }
        SchemaType::Union => {
            let discriminant = src.get_discriminant()?;
            let branch = src.get_current_branch()?;
            copy_value(&mut dest.set_branch(discriminant)?, &branch)
        }
        SchemaType::Link => Err(mismatch(dest_type, src_type)),
    }
}

/* Structural equality through the interface. Map entries are compared by
 * key, so insertion order does not matter. */
pub fn values_equal(a: &ValueRef<'_>, b: &ValueRef<'_>) -> ValueResult<bool> {
    let a_type = a.value_type()?;
    let b_type = b.value_type()?;
    if a_type != b_type {
        return Ok(false);
    }

    Ok(match a_type {
        SchemaType::Null => true,
        SchemaType::Boolean => a.get_boolean()? == b.get_boolean()?,
        SchemaType::Int => a.get_int()? == b.get_int()?,
        SchemaType::Long => a.get_long()? == b.get_long()?,
        SchemaType::Float => a.get_float()? == b.get_float()?,
        SchemaType::Double => a.get_double()? == b.get_double()?,
        SchemaType::Bytes => a.get_bytes()? == b.get_bytes()?,
        SchemaType::String => a.get_string()?.0 == b.get_string()?.0,
        SchemaType::Enum => a.get_enum()? == b.get_enum()?,
        SchemaType::Fixed => a.get_fixed()? == b.get_fixed()?,
        SchemaType::Record | SchemaType::Array => {
            let size = a.get_size()?;
            if size != b.get_size()? {
                return Ok(false);
            }
            for index in 0..size {
                let (a_child, _) = a.get_by_index(index)?;
                let (b_child, _) = b.get_by_index(index)?;
                if !values_equal(&a_child, &b_child)? {
                    return Ok(false);
                }
            }
            true
        }
        SchemaType::Map => {
            let size = a.get_size()?;
            if size != b.get_size()? {
                return Ok(false);
            }
            for index in 0..size {
                let (a_entry, key) = a.get_by_index(index)?;
                let b_entry = match b.get_by_name(key.unwrap_or_default()) {
                    Ok((entry, _)) => entry,
                    Err(ValueError::NoSuchKey { .. }) => return Ok(false),
                    Err(err) => return Err(err),
                };
                if !values_equal(&a_entry, &b_entry)? {
                    return Ok(false);
                }
            }
            true
        }
        SchemaType::Union => {
            let a_branch = match a.get_discriminant() {
                Ok(d) => Some(d),
                Err(ValueError::NoBranch) => None,
                Err(err) => return Err(err),
            };
            let b_branch = match b.get_discriminant() {
                Ok(d) => Some(d),
                Err(ValueError::NoBranch) => None,
                Err(err) => return Err(err),
            };
            match (a_branch, b_branch) {
                (None, None) => true,
                (Some(x), Some(y)) if x == y => {
                    values_equal(&a.get_current_branch()?, &b.get_current_branch()?)?
                }
                _ => false,
            }
        }
        SchemaType::Link => false,
    })
}
