/* Autogenerated file.  Do not edit! */

include!("avro-specific-account.rs");

impl avro_specific::SpecificEnum for AvroSpecificKind {
    const NAME: &'static str = "kind";
    const SYMBOLS: &'static [&'static str] = &["CHECKING", "SAVINGS"];

    fn set_symbol(&mut self, index: usize) {
        *self = match index {
            1 => AvroSpecificKind::Savings,
            _ => AvroSpecificKind::Checking,
        };
    }
}

avro_specific::impl_specific!(enum AvroSpecificKind);

impl avro_specific::SpecificFixed for AvroSpecificDigest {
    const NAME: &'static str = "digest";
    const SIZE: usize = 4;

    fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

avro_specific::impl_specific!(fixed AvroSpecificDigest);

impl avro_specific::SpecificUnion for AvroSpecificNullAccount {
    const BRANCHES: usize = 2;

    fn resolve_branch(
        ctx: &mut avro_specific::ResolveContext,
        index: usize,
        wschema: &avro_specific::avro_types::Schema,
    ) -> avro_specific::SpecificResult<avro_specific::ConsumerId> {
        match index {
            0 => ctx.resolve::<()>(wschema),
            1 => ctx.resolve::<AvroSpecificAccount>(wschema),
            _ => Err(avro_specific::SpecificError::MissingBranch { discriminant: index }),
        }
    }

    fn select(&mut self, index: usize) -> Option<&mut dyn std::any::Any> {
        let current = match self {
            AvroSpecificNullAccount::Null(_) => 0,
            AvroSpecificNullAccount::Account(_) => 1,
        };
        if current != index {
            *self = match index {
                0 => AvroSpecificNullAccount::Null(Default::default()),
                1 => AvroSpecificNullAccount::Account(Default::default()),
                _ => return None,
            };
        }
        match self {
            AvroSpecificNullAccount::Null(value) => Some(value),
            AvroSpecificNullAccount::Account(value) => Some(&mut **value),
        }
    }
}

avro_specific::impl_specific!(union AvroSpecificNullAccount);

impl avro_specific::SpecificRecord for AvroSpecificAccount {
    const NAME: &'static str = "account";
    const FIELDS: &'static [&'static str] = &["id", "owner", "kind", "digest", "tags", "history", "parent"];

    fn resolve_field(
        ctx: &mut avro_specific::ResolveContext,
        index: usize,
        wschema: &avro_specific::avro_types::Schema,
    ) -> avro_specific::SpecificResult<avro_specific::ConsumerId> {
        match index {
            0 => ctx.resolve::<i64>(wschema),
            1 => ctx.resolve::<avro_specific::avro_data::RawString>(wschema),
            2 => ctx.resolve::<AvroSpecificKind>(wschema),
            3 => ctx.resolve::<AvroSpecificDigest>(wschema),
            4 => ctx.resolve::<AvroSpecificMapString>(wschema),
            5 => ctx.resolve::<AvroSpecificArrayLong>(wschema),
            6 => ctx.resolve::<AvroSpecificNullAccount>(wschema),
            _ => Err(avro_specific::SpecificError::NotApplicable { callback: "resolve_field" }),
        }
    }

    fn field_mut(&mut self, index: usize) -> Option<&mut dyn std::any::Any> {
        match index {
            0 => Some(&mut self.id),
            1 => Some(&mut self.owner),
            2 => Some(&mut self.kind),
            3 => Some(&mut self.digest),
            4 => Some(&mut self.tags),
            5 => Some(&mut self.history),
            6 => Some(&mut self.parent),
            _ => None,
        }
    }
}

avro_specific::impl_specific!(record AvroSpecificAccount);
