/* Value interface
 *
 * A value is an (interface, self) pair. The interface is a shared static
 * implementing `ValueIface`; the self is whatever storage that interface
 * knows how to read, passed around as `dyn Any`. Every accessor other than
 * `value_type` and `schema` defaults to a NotApplicable error, so an
 * implementation only provides the methods that make sense for the kinds
 * of values it serves.
 *
 * Compound accessors hand back new pairs. A wrapping implementation can
 * return the same self under a field-specific interface, which keeps field
 * access free of allocation. */

use crate::errors::{ValueError, ValueResult};
use avro_types::{Schema, SchemaType};
use std::any::Any;
use std::fmt;
use std::ops::Deref;

/* Read-only bytes handed out by the grab accessors */
pub enum WrappedBuffer<'a> {
    Borrowed(&'a [u8]),
    Owned(Vec<u8>),
}

impl WrappedBuffer<'_> {
    pub fn into_owned(self) -> Vec<u8> {
        match self {
            WrappedBuffer::Borrowed(bytes) => bytes.to_vec(),
            WrappedBuffer::Owned(bytes) => bytes,
        }
    }

    pub fn is_borrowed(&self) -> bool {
        matches!(self, WrappedBuffer::Borrowed(_))
    }
}

impl Deref for WrappedBuffer<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            WrappedBuffer::Borrowed(bytes) => bytes,
            WrappedBuffer::Owned(bytes) => bytes,
        }
    }
}

impl fmt::Debug for WrappedBuffer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

pub fn not_applicable<I: ValueIface + ?Sized>(
    iface: &I,
    this: &dyn Any,
    operation: &'static str,
) -> ValueError {
    let value_type = iface
        .value_type(this)
        .map(|t| t.to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    ValueError::NotApplicable {
        operation,
        value_type,
    }
}

pub fn downcast<T: Any>(this: &dyn Any) -> ValueResult<&T> {
    this.downcast_ref::<T>().ok_or(ValueError::WrongSelf {
        expected: std::any::type_name::<T>(),
    })
}

pub fn downcast_mut<T: Any>(this: &mut dyn Any) -> ValueResult<&mut T> {
    this.downcast_mut::<T>().ok_or(ValueError::WrongSelf {
        expected: std::any::type_name::<T>(),
    })
}

pub trait ValueIface: Sync {
    fn value_type(&self, this: &dyn Any) -> ValueResult<SchemaType>;
    fn schema(&self, this: &dyn Any) -> ValueResult<Schema>;

    /* Restores the value to its freshly-created state */
    fn reset(&self, this: &mut dyn Any) -> ValueResult<()> {
        Err(not_applicable(self, &*this, "reset"))
    }

    /* ---- scalar getters ---- */

    fn get_boolean(&self, this: &dyn Any) -> ValueResult<bool> {
        Err(not_applicable(self, this, "get_boolean"))
    }

    fn get_bytes<'a>(&self, this: &'a dyn Any) -> ValueResult<&'a [u8]> {
        Err(not_applicable(self, this, "get_bytes"))
    }

    fn grab_bytes<'a>(&self, this: &'a dyn Any) -> ValueResult<WrappedBuffer<'a>> {
        self.get_bytes(this).map(WrappedBuffer::Borrowed)
    }

    fn get_double(&self, this: &dyn Any) -> ValueResult<f64> {
        Err(not_applicable(self, this, "get_double"))
    }

    fn get_float(&self, this: &dyn Any) -> ValueResult<f32> {
        Err(not_applicable(self, this, "get_float"))
    }

    fn get_int(&self, this: &dyn Any) -> ValueResult<i32> {
        Err(not_applicable(self, this, "get_int"))
    }

    fn get_long(&self, this: &dyn Any) -> ValueResult<i64> {
        Err(not_applicable(self, this, "get_long"))
    }

    fn get_null(&self, this: &dyn Any) -> ValueResult<()> {
        Err(not_applicable(self, this, "get_null"))
    }

    /* Text plus its size counting a trailing terminator */
    fn get_string<'a>(&self, this: &'a dyn Any) -> ValueResult<(&'a str, usize)> {
        Err(not_applicable(self, this, "get_string"))
    }

    fn grab_string<'a>(&self, this: &'a dyn Any) -> ValueResult<WrappedBuffer<'a>> {
        self.get_string(this)
            .map(|(text, _)| WrappedBuffer::Borrowed(text.as_bytes()))
    }

    /* Symbol index */
    fn get_enum(&self, this: &dyn Any) -> ValueResult<i32> {
        Err(not_applicable(self, this, "get_enum"))
    }

    fn get_fixed<'a>(&self, this: &'a dyn Any) -> ValueResult<&'a [u8]> {
        Err(not_applicable(self, this, "get_fixed"))
    }

    fn grab_fixed<'a>(&self, this: &'a dyn Any) -> ValueResult<WrappedBuffer<'a>> {
        self.get_fixed(this).map(WrappedBuffer::Borrowed)
    }

    /* ---- scalar setters ---- */

    fn set_boolean(&self, this: &mut dyn Any, _value: bool) -> ValueResult<()> {
        Err(not_applicable(self, &*this, "set_boolean"))
    }

    fn set_bytes(&self, this: &mut dyn Any, _value: &[u8]) -> ValueResult<()> {
        Err(not_applicable(self, &*this, "set_bytes"))
    }

    fn give_bytes(&self, this: &mut dyn Any, _value: Vec<u8>) -> ValueResult<()> {
        Err(not_applicable(self, &*this, "give_bytes"))
    }

    fn set_double(&self, this: &mut dyn Any, _value: f64) -> ValueResult<()> {
        Err(not_applicable(self, &*this, "set_double"))
    }

    fn set_float(&self, this: &mut dyn Any, _value: f32) -> ValueResult<()> {
        Err(not_applicable(self, &*this, "set_float"))
    }

    fn set_int(&self, this: &mut dyn Any, _value: i32) -> ValueResult<()> {
        Err(not_applicable(self, &*this, "set_int"))
    }

    fn set_long(&self, this: &mut dyn Any, _value: i64) -> ValueResult<()> {
        Err(not_applicable(self, &*this, "set_long"))
    }

    fn set_null(&self, this: &mut dyn Any) -> ValueResult<()> {
        Err(not_applicable(self, &*this, "set_null"))
    }

    fn set_string(&self, this: &mut dyn Any, _value: &str) -> ValueResult<()> {
        Err(not_applicable(self, &*this, "set_string"))
    }

    fn give_string(&self, this: &mut dyn Any, _value: String) -> ValueResult<()> {
        Err(not_applicable(self, &*this, "give_string"))
    }

    fn set_enum(&self, this: &mut dyn Any, _symbol: i32) -> ValueResult<()> {
        Err(not_applicable(self, &*this, "set_enum"))
    }

    fn set_fixed(&self, this: &mut dyn Any, _value: &[u8]) -> ValueResult<()> {
        Err(not_applicable(self, &*this, "set_fixed"))
    }

    fn give_fixed(&self, this: &mut dyn Any, _value: Vec<u8>) -> ValueResult<()> {
        Err(not_applicable(self, &*this, "give_fixed"))
    }

    /* ---- compound accessors ---- */

    /* Fields of a record, elements of an array, entries of a map */
    fn get_size(&self, this: &dyn Any) -> ValueResult<usize> {
        Err(not_applicable(self, this, "get_size"))
    }

    /* Child value plus its field name or map key, if it has one */
    fn get_by_index<'a>(
        &self,
        this: &'a dyn Any,
        _index: usize,
    ) -> ValueResult<(ValueRef<'a>, Option<&'a str>)> {
        Err(not_applicable(self, this, "get_by_index"))
    }

    fn get_by_name<'a>(&self, this: &'a dyn Any, _name: &str) -> ValueResult<(ValueRef<'a>, usize)> {
        Err(not_applicable(self, this, "get_by_name"))
    }

    fn get_by_index_mut<'a>(&self, this: &'a mut dyn Any, _index: usize) -> ValueResult<ValueMut<'a>> {
        Err(not_applicable(self, &*this, "get_by_index_mut"))
    }

    fn get_by_name_mut<'a>(
        &self,
        this: &'a mut dyn Any,
        _name: &str,
    ) -> ValueResult<(ValueMut<'a>, usize)> {
        Err(not_applicable(self, &*this, "get_by_name_mut"))
    }

    /* New array element and its index */
    fn append<'a>(&self, this: &'a mut dyn Any) -> ValueResult<(ValueMut<'a>, usize)> {
        Err(not_applicable(self, &*this, "append"))
    }

    /* Map entry for `key`, its index, and whether it was just created */
    fn add<'a>(&self, this: &'a mut dyn Any, _key: &str) -> ValueResult<(ValueMut<'a>, usize, bool)> {
        Err(not_applicable(self, &*this, "add"))
    }

    fn get_discriminant(&self, this: &dyn Any) -> ValueResult<usize> {
        Err(not_applicable(self, this, "get_discriminant"))
    }

    fn get_current_branch<'a>(&self, this: &'a dyn Any) -> ValueResult<ValueRef<'a>> {
        Err(not_applicable(self, this, "get_current_branch"))
    }

    fn get_current_branch_mut<'a>(&self, this: &'a mut dyn Any) -> ValueResult<ValueMut<'a>> {
        Err(not_applicable(self, &*this, "get_current_branch_mut"))
    }

    /* Selects a branch and returns it. Reselecting the current branch keeps
     * its contents. */
    fn set_branch<'a>(&self, this: &'a mut dyn Any, _discriminant: usize) -> ValueResult<ValueMut<'a>> {
        Err(not_applicable(self, &*this, "set_branch"))
    }
}

/* ============================================================================
   Value handles
   ============================================================================ */

#[derive(Clone, Copy)]
pub struct ValueRef<'a> {
    iface: &'static dyn ValueIface,
    this: &'a dyn Any,
}

impl<'a> ValueRef<'a> {
    pub fn new(iface: &'static dyn ValueIface, this: &'a dyn Any) -> Self {
        Self { iface, this }
    }

    pub fn iface(&self) -> &'static dyn ValueIface {
        self.iface
    }

    pub fn this(&self) -> &'a dyn Any {
        self.this
    }

    pub fn value_type(&self) -> ValueResult<SchemaType> {
        self.iface.value_type(self.this)
    }

    pub fn schema(&self) -> ValueResult<Schema> {
        self.iface.schema(self.this)
    }

    pub fn get_boolean(&self) -> ValueResult<bool> {
        self.iface.get_boolean(self.this)
    }

    pub fn get_bytes(&self) -> ValueResult<&'a [u8]> {
        self.iface.get_bytes(self.this)
    }

    pub fn grab_bytes(&self) -> ValueResult<WrappedBuffer<'a>> {
        self.iface.grab_bytes(self.this)
    }

    pub fn get_double(&self) -> ValueResult<f64> {
        self.iface.get_double(self.this)
    }

    pub fn get_float(&self) -> ValueResult<f32> {
        self.iface.get_float(self.this)
    }

    pub fn get_int(&self) -> ValueResult<i32> {
        self.iface.get_int(self.this)
    }

    pub fn get_long(&self) -> ValueResult<i64> {
        self.iface.get_long(self.this)
    }

    pub fn get_null(&self) -> ValueResult<()> {
        self.iface.get_null(self.this)
    }

    pub fn get_string(&self) -> ValueResult<(&'a str, usize)> {
        self.iface.get_string(self.this)
    }

    pub fn grab_string(&self) -> ValueResult<WrappedBuffer<'a>> {
        self.iface.grab_string(self.this)
    }

    pub fn get_enum(&self) -> ValueResult<i32> {
        self.iface.get_enum(self.this)
    }

    pub fn get_fixed(&self) -> ValueResult<&'a [u8]> {
        self.iface.get_fixed(self.this)
    }

    pub fn grab_fixed(&self) -> ValueResult<WrappedBuffer<'a>> {
        self.iface.grab_fixed(self.this)
    }

    pub fn get_size(&self) -> ValueResult<usize> {
        self.iface.get_size(self.this)
    }

    pub fn get_by_index(&self, index: usize) -> ValueResult<(ValueRef<'a>, Option<&'a str>)> {
        self.iface.get_by_index(self.this, index)
    }

    pub fn get_by_name(&self, name: &str) -> ValueResult<(ValueRef<'a>, usize)> {
        self.iface.get_by_name(self.this, name)
    }

    pub fn get_discriminant(&self) -> ValueResult<usize> {
        self.iface.get_discriminant(self.this)
    }

    pub fn get_current_branch(&self) -> ValueResult<ValueRef<'a>> {
        self.iface.get_current_branch(self.this)
    }
}

impl fmt::Debug for ValueRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match crate::json::to_json(self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => f.write_str("<value>"),
        }
    }
}

pub struct ValueMut<'a> {
    iface: &'static dyn ValueIface,
    this: &'a mut dyn Any,
}

impl<'a> ValueMut<'a> {
    pub fn new(iface: &'static dyn ValueIface, this: &'a mut dyn Any) -> Self {
        Self { iface, this }
    }

    pub fn to_ref(&self) -> ValueRef<'_> {
        ValueRef::new(self.iface, &*self.this)
    }

    pub fn reborrow(&mut self) -> ValueMut<'_> {
        ValueMut::new(self.iface, &mut *self.this)
    }

    pub fn value_type(&self) -> ValueResult<SchemaType> {
        self.iface.value_type(&*self.this)
    }

    pub fn schema(&self) -> ValueResult<Schema> {
        self.iface.schema(&*self.this)
    }

    pub fn reset(&mut self) -> ValueResult<()> {
        self.iface.reset(&mut *self.this)
    }

    pub fn set_boolean(&mut self, value: bool) -> ValueResult<()> {
        self.iface.set_boolean(&mut *self.this, value)
    }

    pub fn set_bytes(&mut self, value: &[u8]) -> ValueResult<()> {
        self.iface.set_bytes(&mut *self.this, value)
    }

    pub fn give_bytes(&mut self, value: Vec<u8>) -> ValueResult<()> {
        self.iface.give_bytes(&mut *self.this, value)
    }

    pub fn set_double(&mut self, value: f64) -> ValueResult<()> {
        self.iface.set_double(&mut *self.this, value)
    }

    pub fn set_float(&mut self, value: f32) -> ValueResult<()> {
        self.iface.set_float(&mut *self.this, value)
    }

    pub fn set_int(&mut self, value: i32) -> ValueResult<()> {
        self.iface.set_int(&mut *self.this, value)
    }

    pub fn set_long(&mut self, value: i64) -> ValueResult<()> {
        self.iface.set_long(&mut *self.this, value)
    }

    pub fn set_null(&mut self) -> ValueResult<()> {
        self.iface.set_null(&mut *self.this)
    }

    pub fn set_string(&mut self, value: &str) -> ValueResult<()> {
        self.iface.set_string(&mut *self.this, value)
    }

    pub fn give_string(&mut self, value: String) -> ValueResult<()> {
        self.iface.give_string(&mut *self.this, value)
    }

    pub fn set_enum(&mut self, symbol: i32) -> ValueResult<()> {
        self.iface.set_enum(&mut *self.this, symbol)
    }

    pub fn set_fixed(&mut self, value: &[u8]) -> ValueResult<()> {
        self.iface.set_fixed(&mut *self.this, value)
    }

    pub fn give_fixed(&mut self, value: Vec<u8>) -> ValueResult<()> {
        self.iface.give_fixed(&mut *self.this, value)
    }

    pub fn get_size(&self) -> ValueResult<usize> {
        self.iface.get_size(&*self.this)
    }

    pub fn get_by_index_mut(&mut self, index: usize) -> ValueResult<ValueMut<'_>> {
        self.iface.get_by_index_mut(&mut *self.this, index)
    }

    pub fn get_by_name_mut(&mut self, name: &str) -> ValueResult<(ValueMut<'_>, usize)> {
        self.iface.get_by_name_mut(&mut *self.this, name)
    }

    pub fn append(&mut self) -> ValueResult<(ValueMut<'_>, usize)> {
        self.iface.append(&mut *self.this)
    }

    pub fn add(&mut self, key: &str) -> ValueResult<(ValueMut<'_>, usize, bool)> {
        self.iface.add(&mut *self.this, key)
    }

    pub fn get_discriminant(&self) -> ValueResult<usize> {
        self.iface.get_discriminant(&*self.this)
    }

    pub fn get_current_branch_mut(&mut self) -> ValueResult<ValueMut<'_>> {
        self.iface.get_current_branch_mut(&mut *self.this)
    }

    pub fn set_branch(&mut self, discriminant: usize) -> ValueResult<ValueMut<'_>> {
        self.iface.set_branch(&mut *self.this, discriminant)
    }
}

impl fmt::Debug for ValueMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.to_ref(), f)
    }
}
