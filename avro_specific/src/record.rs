/* Record, enum and fixed resolvers
 *
 * Named targets match writer schemas by declared name. Record fields are
 * matched by name: writer-only fields are skipped when decoding and
 * target-only fields keep whatever value the target already holds. */

use crate::callbacks::{target_mut, ConsumerCallbacks};
use crate::context::ResolveContext;
use crate::errors::{SpecificError, SpecificResult};
use crate::graph::ConsumerId;
use avro_types::{Schema, SchemaType};
use std::any::Any;
use std::marker::PhantomData;
use tracing::debug;

/* A struct with one target per field */
pub trait SpecificRecord: Any + Default + Send {
    const NAME: &'static str;
    const FIELDS: &'static [&'static str];

    /* Resolve the writer's schema for target field `index` */
    fn resolve_field(ctx: &mut ResolveContext, index: usize, wschema: &Schema) -> SpecificResult<ConsumerId>;

    fn field_mut(&mut self, index: usize) -> Option<&mut dyn Any>;
}

/* A target enum addressed by symbol index */
pub trait SpecificEnum: Any + Default + Send {
    const NAME: &'static str;
    const SYMBOLS: &'static [&'static str];

    fn set_symbol(&mut self, index: usize);
}

pub trait SpecificFixed: Any + Default + Send {
    const NAME: &'static str;
    const SIZE: usize;

    fn bytes_mut(&mut self) -> &mut [u8];
}

fn check_named(target: String, wschema: &Schema, kind: SchemaType, name: &str) -> SpecificResult<()> {
    if wschema.schema_type() != kind || wschema.name() != Some(name) {
        return Err(SpecificError::SchemaMismatch {
            target,
            actual: wschema.type_name().to_string(),
        });
    }
    Ok(())
}

/* ---- records ---- */

struct RecordCallbacks<T> {
    /* writer field index -> target field index */
    field_map: Vec<Option<usize>>,
    _target: PhantomData<fn(&mut T)>,
}

impl<T: SpecificRecord> ConsumerCallbacks for RecordCallbacks<T> {
    fn record_start(&self, target: &mut dyn Any) -> SpecificResult<()> {
        target_mut::<T>(target).map(|_| ())
    }

    fn record_field<'a>(&self, target: &'a mut dyn Any, index: usize) -> SpecificResult<&'a mut dyn Any> {
        let field = self
            .field_map
            .get(index)
            .copied()
            .flatten()
            .ok_or(SpecificError::NotApplicable { callback: "record_field" })?;
        target_mut::<T>(target)?
            .field_mut(field)
            .ok_or(SpecificError::NotApplicable { callback: "record_field" })
    }
}

pub fn record_target_name<T: SpecificRecord>() -> String {
    format!("record {}", T::NAME)
}

pub fn resolve_record<T: SpecificRecord>(ctx: &mut ResolveContext, wschema: &Schema) -> SpecificResult<ConsumerId> {
    check_named(record_target_name::<T>(), wschema, SchemaType::Record, T::NAME)?;

    let field_map: Vec<Option<usize>> = (0..wschema.record_size())
        .map(|i| {
            wschema
                .record_field_name(i)
                .and_then(|name| T::FIELDS.iter().position(|f| *f == name))
        })
        .collect();
    let writer_fields = field_map.len();

    /* registered before any field so recursive references find it */
    let id = ctx.new_node::<T>(
        wschema,
        writer_fields,
        Box::new(RecordCallbacks::<T> {
            field_map: field_map.clone(),
            _target: PhantomData,
        }),
        None,
    );

    for (windex, target_index) in field_map.into_iter().enumerate() {
        let (target_index, field_schema) = match (target_index, wschema.record_field(windex)) {
            (Some(t), Some(schema)) => (t, schema.clone()),
            _ => {
                debug!(
                    "Writer field {}.{} has no target field and will be skipped",
                    T::NAME,
                    wschema.record_field_name(windex).unwrap_or_default()
                );
                continue;
            }
        };
        let child = T::resolve_field(ctx, target_index, &field_schema)?;
        ctx.set_child(id, windex, child)?;
    }
    Ok(id)
}

/* ---- enums ---- */

struct EnumCallbacks<T> {
    /* writer symbol index -> target symbol index */
    symbol_map: Vec<Option<usize>>,
    writer_symbols: Vec<String>,
    _target: PhantomData<fn(&mut T)>,
}

impl<T: SpecificEnum> ConsumerCallbacks for EnumCallbacks<T> {
    fn enum_value(&self, target: &mut dyn Any, symbol: usize) -> SpecificResult<()> {
        match self.symbol_map.get(symbol).copied().flatten() {
            Some(index) => {
                target_mut::<T>(target)?.set_symbol(index);
                Ok(())
            }
            None => Err(SpecificError::UnknownSymbol {
                symbol: self
                    .writer_symbols
                    .get(symbol)
                    .cloned()
                    .unwrap_or_else(|| symbol.to_string()),
                target: enum_target_name::<T>(),
            }),
        }
    }
}

pub fn enum_target_name<T: SpecificEnum>() -> String {
    format!("enum {}", T::NAME)
}

pub fn resolve_enum<T: SpecificEnum>(ctx: &mut ResolveContext, wschema: &Schema) -> SpecificResult<ConsumerId> {
    check_named(enum_target_name::<T>(), wschema, SchemaType::Enum, T::NAME)?;
    let writer_symbols: Vec<String> = (0..wschema.enum_size())
        .filter_map(|i| wschema.enum_symbol(i).map(str::to_string))
        .collect();
    let symbol_map = writer_symbols
        .iter()
        .map(|symbol| T::SYMBOLS.iter().position(|s| *s == symbol.as_str()))
        .collect();
    Ok(ctx.new_node::<T>(
        wschema,
        0,
        Box::new(EnumCallbacks::<T> {
            symbol_map,
            writer_symbols,
            _target: PhantomData,
        }),
        None,
    ))
}

/* ---- fixed ---- */

struct FixedCallbacks<T>(PhantomData<fn(&mut T)>);

impl<T: SpecificFixed> ConsumerCallbacks for FixedCallbacks<T> {
    fn fixed_value(&self, target: &mut dyn Any, value: &[u8]) -> SpecificResult<()> {
        let bytes = target_mut::<T>(target)?.bytes_mut();
        if bytes.len() != value.len() {
            return Err(SpecificError::SchemaMismatch {
                target: fixed_target_name::<T>(),
                actual: format!("{} bytes", value.len()),
            });
        }
        bytes.copy_from_slice(value);
        Ok(())
    }
}

pub fn fixed_target_name<T: SpecificFixed>() -> String {
    format!("fixed {}", T::NAME)
}

pub fn resolve_fixed<T: SpecificFixed>(ctx: &mut ResolveContext, wschema: &Schema) -> SpecificResult<ConsumerId> {
    check_named(fixed_target_name::<T>(), wschema, SchemaType::Fixed, T::NAME)?;
    if wschema.fixed_size() != Some(T::SIZE) {
        return Err(SpecificError::SchemaMismatch {
            target: format!("{} (size {})", fixed_target_name::<T>(), T::SIZE),
            actual: format!("{} (size {})", wschema.type_name(), wschema.fixed_size().unwrap_or(0)),
        });
    }
    Ok(ctx.new_node::<T>(wschema, 0, Box::new(FixedCallbacks::<T>(PhantomData)), None))
}
