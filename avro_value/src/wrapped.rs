/* Wrapping interfaces for raw storage.
 *
 * These let a plain `i32`, `RawString`, `RawBytes` and friends be read and
 * written through the value interface in place. Application structs do the
 * same thing by implementing `ValueIface` on a unit struct of their own and
 * returning field interfaces from `get_by_index`. */

use crate::errors::{ValueError, ValueResult};
use crate::iface::{downcast, downcast_mut, ValueIface, ValueMut, ValueRef};
use avro_data::{RawBytes, RawString};
use avro_types::{Schema, SchemaType};
use std::any::Any;

/* Raw storage that has a wrapping interface */
pub trait RawWrap: Any {
    const IFACE: &'static dyn ValueIface;
}

pub fn wrap<T: RawWrap>(value: &T) -> ValueRef<'_> {
    ValueRef::new(T::IFACE, value)
}

pub fn wrap_mut<T: RawWrap>(value: &mut T) -> ValueMut<'_> {
    ValueMut::new(T::IFACE, value)
}

macro_rules! raw_scalar_iface {
    ($iface:ident, $ty:ty, $schema_type:ident, $schema:ident, $get:ident, $set:ident) => {
        pub struct $iface;

        impl ValueIface for $iface {
            fn value_type(&self, _this: &dyn Any) -> ValueResult<SchemaType> {
                Ok(SchemaType::$schema_type)
            }

            fn schema(&self, _this: &dyn Any) -> ValueResult<Schema> {
                Ok(Schema::$schema())
            }

            fn reset(&self, this: &mut dyn Any) -> ValueResult<()> {
                *downcast_mut::<$ty>(this)? = <$ty>::default();
                Ok(())
            }

            fn $get(&self, this: &dyn Any) -> ValueResult<$ty> {
                downcast::<$ty>(this).copied()
            }

            fn $set(&self, this: &mut dyn Any, value: $ty) -> ValueResult<()> {
                *downcast_mut::<$ty>(this)? = value;
                Ok(())
            }
        }

        impl RawWrap for $ty {
            const IFACE: &'static dyn ValueIface = &$iface;
        }
    };
}

raw_scalar_iface!(RawBooleanIface, bool, Boolean, boolean, get_boolean, set_boolean);
raw_scalar_iface!(RawIntIface, i32, Int, int, get_int, set_int);
raw_scalar_iface!(RawLongIface, i64, Long, long, get_long, set_long);
raw_scalar_iface!(RawFloatIface, f32, Float, float, get_float, set_float);
raw_scalar_iface!(RawDoubleIface, f64, Double, double, get_double, set_double);

pub struct RawNullIface;

impl ValueIface for RawNullIface {
    fn value_type(&self, _this: &dyn Any) -> ValueResult<SchemaType> {
        Ok(SchemaType::Null)
    }

    fn schema(&self, _this: &dyn Any) -> ValueResult<Schema> {
        Ok(Schema::null())
    }

    fn reset(&self, this: &mut dyn Any) -> ValueResult<()> {
        downcast_mut::<()>(this).map(|_| ())
    }

    fn get_null(&self, this: &dyn Any) -> ValueResult<()> {
        downcast::<()>(this).map(|_| ())
    }

    fn set_null(&self, this: &mut dyn Any) -> ValueResult<()> {
        downcast_mut::<()>(this).map(|_| ())
    }
}

impl RawWrap for () {
    const IFACE: &'static dyn ValueIface = &RawNullIface;
}

pub struct RawStringIface;

impl ValueIface for RawStringIface {
    fn value_type(&self, _this: &dyn Any) -> ValueResult<SchemaType> {
        Ok(SchemaType::String)
    }

    fn schema(&self, _this: &dyn Any) -> ValueResult<Schema> {
        Ok(Schema::string())
    }

    fn reset(&self, this: &mut dyn Any) -> ValueResult<()> {
        downcast_mut::<RawString>(this)?.clear();
        Ok(())
    }

    fn get_string<'a>(&self, this: &'a dyn Any) -> ValueResult<(&'a str, usize)> {
        let text = downcast::<RawString>(this)?
            .as_str()
            .ok_or(ValueError::InvalidUtf8)?;
        Ok((text, text.len() + 1))
    }

    fn set_string(&self, this: &mut dyn Any, value: &str) -> ValueResult<()> {
        Ok(downcast_mut::<RawString>(this)?.set_str(value)?)
    }

    fn give_string(&self, this: &mut dyn Any, value: String) -> ValueResult<()> {
        downcast_mut::<RawString>(this)?.give(value.into_bytes(), None);
        Ok(())
    }
}

impl RawWrap for RawString {
    const IFACE: &'static dyn ValueIface = &RawStringIface;
}

pub struct RawBytesIface;

impl ValueIface for RawBytesIface {
    fn value_type(&self, _this: &dyn Any) -> ValueResult<SchemaType> {
        Ok(SchemaType::Bytes)
    }

    fn schema(&self, _this: &dyn Any) -> ValueResult<Schema> {
        Ok(Schema::bytes())
    }

    fn reset(&self, this: &mut dyn Any) -> ValueResult<()> {
        downcast_mut::<RawBytes>(this)?.clear();
        Ok(())
    }

    fn get_bytes<'a>(&self, this: &'a dyn Any) -> ValueResult<&'a [u8]> {
        Ok(downcast::<RawBytes>(this)?.get())
    }

    fn set_bytes(&self, this: &mut dyn Any, value: &[u8]) -> ValueResult<()> {
        Ok(downcast_mut::<RawBytes>(this)?.set(value)?)
    }

    fn give_bytes(&self, this: &mut dyn Any, value: Vec<u8>) -> ValueResult<()> {
        downcast_mut::<RawBytes>(this)?.give(value, None);
        Ok(())
    }
}

impl RawWrap for RawBytes {
    const IFACE: &'static dyn ValueIface = &RawBytesIface;
}
