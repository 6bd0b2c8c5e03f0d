/* Decoding into types produced by the code generator */

#[allow(dead_code)]
mod generated {
    include!("generated/avro-specific-account_impl.rs");

    macro_rules! ignore_entry {
        ($($entry:tt)*) => {};
    }

    avro_specific_schema_definition!(ignore_entry);
}

use avro_specific::avro_data::RawString;
use avro_specific::{Resolver, SpecificError};
use avro_types::Schema;
use avro_value::encoding::{write_int, write_long, write_string};
use generated::{AvroSpecificAccount, AvroSpecificDigest, AvroSpecificKind, AvroSpecificNullAccount};

fn account_schema() -> Schema {
    avro_loader::parse_schema(include_str!("generated/account.json")).expect("account schema")
}

struct Account<'a> {
    id: i64,
    owner: &'a str,
    kind: i32,
    digest: [u8; 4],
    tags: &'a [(&'a str, &'a str)],
    history: &'a [i64],
    parent: Option<&'a Account<'a>>,
}

fn encode(account: &Account<'_>, out: &mut Vec<u8>) {
    write_long(account.id, out);
    write_string(account.owner, out);
    write_int(account.kind, out);
    out.extend_from_slice(&account.digest);
    if !account.tags.is_empty() {
        write_long(account.tags.len() as i64, out);
        for (key, value) in account.tags {
            write_string(key, out);
            write_string(value, out);
        }
    }
    write_long(0, out);
    if !account.history.is_empty() {
        write_long(account.history.len() as i64, out);
        for entry in account.history {
            write_long(*entry, out);
        }
    }
    write_long(0, out);
    match account.parent {
        None => write_long(0, out),
        Some(parent) => {
            write_long(1, out);
            encode(parent, out);
        }
    }
}

#[test]
fn generated_account_decodes() {
    let parent = Account {
        id: 7,
        owner: "bank",
        kind: 0,
        digest: [9, 9, 9, 9],
        tags: &[],
        history: &[],
        parent: None,
    };
    let account = Account {
        id: 42,
        owner: "ann",
        kind: 1,
        digest: [1, 2, 3, 4],
        tags: &[("branch", "north"), ("tier", "gold")],
        history: &[100, -25],
        parent: Some(&parent),
    };
    let mut data = Vec::new();
    encode(&account, &mut data);

    let resolver = Resolver::<AvroSpecificAccount>::new(&account_schema()).expect("resolver");
    let mut decoded = AvroSpecificAccount::default();
    resolver.decode_slice(&data, &mut decoded).expect("decode");

    let expected_parent = AvroSpecificAccount {
        id: 7,
        owner: RawString::from_str_value("bank").expect("owner"),
        digest: AvroSpecificDigest([9, 9, 9, 9]),
        ..AvroSpecificAccount::default()
    };

    let mut expected = AvroSpecificAccount {
        id: 42,
        owner: RawString::from_str_value("ann").expect("owner"),
        kind: AvroSpecificKind::Savings,
        digest: AvroSpecificDigest([1, 2, 3, 4]),
        parent: AvroSpecificNullAccount::Account(Box::new(expected_parent)),
        ..AvroSpecificAccount::default()
    };
    for (key, value) in [("branch", "north"), ("tier", "gold")] {
        let (slot, _, _) = expected.tags.get_or_create(key).expect("tag");
        slot.set_str(value).expect("tag value");
    }
    for entry in [100, -25] {
        *expected.history.append().expect("history") = entry;
    }

    assert_eq!(decoded, expected);

    /* any differing field breaks equality, including inside the parent */
    let mut other = AvroSpecificAccount::default();
    resolver.decode_slice(&data, &mut other).expect("decode again");
    assert_eq!(decoded, other);
    if let AvroSpecificNullAccount::Account(parent) = &mut other.parent {
        parent.kind = AvroSpecificKind::Savings;
    }
    assert_ne!(decoded, other);
    assert_ne!(decoded.parent, AvroSpecificNullAccount::Null(()));
}

#[test]
fn generated_account_rejects_other_records() {
    let other = avro_loader::parse_schema(r#"{"type": "record", "name": "ledger", "fields": []}"#)
        .expect("ledger schema");
    let err = Resolver::<AvroSpecificAccount>::new(&other).err().expect("mismatch");
    assert!(matches!(err, SpecificError::SchemaMismatch { .. }));
    assert_eq!(err.to_string(), "Cannot store ledger into record account");
}
