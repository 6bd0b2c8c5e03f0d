/* Autogenerated file.  Do not edit! */

include!("avro-specific-account.def");

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AvroSpecificKind {
    #[default]
    Checking,
    Savings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvroSpecificDigest(pub [u8; 4]);

impl Default for AvroSpecificDigest {
    fn default() -> Self {
        AvroSpecificDigest([0; 4])
    }
}

pub type AvroSpecificMapString = avro_specific::avro_data::RawMap<avro_specific::avro_data::RawString>;

pub type AvroSpecificArrayLong = avro_specific::avro_data::RawArray<i64>;

#[derive(Debug, PartialEq)]
pub enum AvroSpecificNullAccount {
    Null(()),
    Account(Box<AvroSpecificAccount>),
}

impl Default for AvroSpecificNullAccount {
    fn default() -> Self {
        AvroSpecificNullAccount::Null(Default::default())
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct AvroSpecificAccount {
    pub id: i64,
    pub owner: avro_specific::avro_data::RawString,
    pub kind: AvroSpecificKind,
    pub digest: AvroSpecificDigest,
    pub tags: AvroSpecificMapString,
    pub history: AvroSpecificArrayLong,
    pub parent: AvroSpecificNullAccount,
}
