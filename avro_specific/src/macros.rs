/* Connects a type implementing one of the named-kind traits to the
 * resolver. Generated code invokes this once per record, enum, fixed and
 * union type. */
#[macro_export]
macro_rules! impl_specific {
    (record $ty:ty) => {
        impl $crate::Specific for $ty {
            fn target_name() -> String {
                $crate::record::record_target_name::<$ty>()
            }

            fn resolve(
                ctx: &mut $crate::ResolveContext,
                wschema: &$crate::avro_types::Schema,
            ) -> $crate::SpecificResult<$crate::ConsumerId> {
                $crate::record::resolve_record::<$ty>(ctx, wschema)
            }
        }
    };
    (enum $ty:ty) => {
        impl $crate::Specific for $ty {
            fn target_name() -> String {
                $crate::record::enum_target_name::<$ty>()
            }

            fn resolve(
                ctx: &mut $crate::ResolveContext,
                wschema: &$crate::avro_types::Schema,
            ) -> $crate::SpecificResult<$crate::ConsumerId> {
                $crate::record::resolve_enum::<$ty>(ctx, wschema)
            }
        }
    };
    (fixed $ty:ty) => {
        impl $crate::Specific for $ty {
            fn target_name() -> String {
                $crate::record::fixed_target_name::<$ty>()
            }

            fn resolve(
                ctx: &mut $crate::ResolveContext,
                wschema: &$crate::avro_types::Schema,
            ) -> $crate::SpecificResult<$crate::ConsumerId> {
                $crate::record::resolve_fixed::<$ty>(ctx, wschema)
            }
        }
    };
    (union $ty:ty) => {
        impl $crate::Specific for $ty {
            fn target_name() -> String {
                $crate::union::union_target_name::<$ty>()
            }

            fn resolve(
                ctx: &mut $crate::ResolveContext,
                wschema: &$crate::avro_types::Schema,
            ) -> $crate::SpecificResult<$crate::ConsumerId> {
                $crate::union::resolve_union::<$ty>(ctx, wschema)
            }
        }
    };
}
