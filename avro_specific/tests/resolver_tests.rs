/* Resolution and decoding into schema-specific targets */

use avro_data::{RawArray, RawBytes, RawMap, RawString};
use avro_specific::{
    impl_specific, raw_int_resolver_new, raw_string_resolver_new, ConsumerId, ResolveContext,
    Resolver, Specific, SpecificEnum, SpecificError, SpecificFixed, SpecificRecord,
    SpecificResult, SpecificUnion,
};
use avro_types::{RecordBuilder, Schema, SchemaType};
use avro_value::encoding::{write_bytes, write_double, write_float, write_int, write_long, write_string};
use avro_value::encoding::MAX_ZERO_WIDTH_BLOCK;
use avro_value::{write_value, GenericValue, ValueError};
use std::any::Any;

/* ============================================================================
   Target types, written the way generated code writes them
   ============================================================================ */

#[derive(Default, Debug, PartialEq)]
struct Person {
    first_name: RawString,
    last_name: RawString,
    age: i32,
    children: RawArray<Person>,
}

impl SpecificRecord for Person {
    const NAME: &'static str = "person";
    const FIELDS: &'static [&'static str] = &["first_name", "last_name", "age", "children"];

    fn resolve_field(ctx: &mut ResolveContext, index: usize, wschema: &Schema) -> SpecificResult<ConsumerId> {
        match index {
            0 | 1 => ctx.resolve::<RawString>(wschema),
            2 => ctx.resolve::<i32>(wschema),
            _ => ctx.resolve::<RawArray<Person>>(wschema),
        }
    }

    fn field_mut(&mut self, index: usize) -> Option<&mut dyn Any> {
        match index {
            0 => Some(&mut self.first_name),
            1 => Some(&mut self.last_name),
            2 => Some(&mut self.age),
            3 => Some(&mut self.children),
            _ => None,
        }
    }
}

impl_specific!(record Person);

fn person_schema() -> Schema {
    let mut builder = RecordBuilder::new("person");
    let me = builder.link_to_self();
    builder
        .field("first_name", Schema::string())
        .and_then(|b| b.field("last_name", Schema::string()))
        .and_then(|b| b.field("age", Schema::int()))
        .and_then(|b| b.field("children", Schema::array(me)))
        .expect("fields");
    builder.build().expect("person")
}

#[derive(Default, Debug, PartialEq)]
struct List {
    value: i32,
    next: ListNext,
}

#[derive(Debug, PartialEq)]
enum ListNext {
    Null(()),
    List(Box<List>),
}

impl Default for ListNext {
    fn default() -> Self {
        ListNext::Null(())
    }
}

impl SpecificRecord for List {
    const NAME: &'static str = "list";
    const FIELDS: &'static [&'static str] = &["value", "next"];

    fn resolve_field(ctx: &mut ResolveContext, index: usize, wschema: &Schema) -> SpecificResult<ConsumerId> {
        match index {
            0 => ctx.resolve::<i32>(wschema),
            _ => ctx.resolve::<ListNext>(wschema),
        }
    }

    fn field_mut(&mut self, index: usize) -> Option<&mut dyn Any> {
        match index {
            0 => Some(&mut self.value),
            1 => Some(&mut self.next),
            _ => None,
        }
    }
}

impl SpecificUnion for ListNext {
    const BRANCHES: usize = 2;

    fn resolve_branch(ctx: &mut ResolveContext, index: usize, wschema: &Schema) -> SpecificResult<ConsumerId> {
        match index {
            0 => ctx.resolve::<()>(wschema),
            _ => ctx.resolve::<List>(wschema),
        }
    }

    fn select(&mut self, index: usize) -> Option<&mut dyn Any> {
        let current = match self {
            ListNext::Null(_) => 0,
            ListNext::List(_) => 1,
        };
        if current != index {
            *self = match index {
                0 => ListNext::Null(()),
                1 => ListNext::List(Box::default()),
                _ => return None,
            };
        }
        match self {
            ListNext::Null(unit) => Some(unit),
            ListNext::List(list) => Some(&mut **list),
        }
    }
}

impl_specific!(record List);
impl_specific!(union ListNext);

fn list_schema() -> Schema {
    let mut builder = RecordBuilder::new("list");
    let me = builder.link_to_self();
    let next = Schema::union(vec![Schema::null(), me]).expect("union");
    builder
        .field("value", Schema::int())
        .and_then(|b| b.field("next", next))
        .expect("fields");
    builder.build().expect("list")
}

#[derive(Default, Debug, PartialEq, Clone, Copy)]
enum Suit {
    #[default]
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl SpecificEnum for Suit {
    const NAME: &'static str = "suit";
    const SYMBOLS: &'static [&'static str] = &["SPADES", "HEARTS", "DIAMONDS", "CLUBS"];

    fn set_symbol(&mut self, index: usize) {
        *self = match index {
            1 => Suit::Hearts,
            2 => Suit::Diamonds,
            3 => Suit::Clubs,
            _ => Suit::Spades,
        };
    }
}

impl_specific!(enum Suit);

#[derive(Default, Debug, PartialEq)]
struct Md5([u8; 16]);

impl SpecificFixed for Md5 {
    const NAME: &'static str = "md5";
    const SIZE: usize = 16;

    fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl_specific!(fixed Md5);

/* ============================================================================
   Primitives
   ============================================================================ */

fn primitive_schemas() -> Vec<Schema> {
    [
        SchemaType::Null,
        SchemaType::Boolean,
        SchemaType::Int,
        SchemaType::Long,
        SchemaType::Float,
        SchemaType::Double,
        SchemaType::Bytes,
        SchemaType::String,
    ]
    .into_iter()
    .filter_map(Schema::primitive)
    .collect()
}

fn accepts<T: Specific>(writer: &Schema) -> bool {
    Resolver::<T>::new(writer).is_ok()
}

#[test]
fn primitive_targets_accept_only_their_own_kind() {
    for writer in primitive_schemas() {
        let kind = writer.schema_type();
        assert_eq!(accepts::<()>(&writer), kind == SchemaType::Null, "null <- {}", kind);
        assert_eq!(accepts::<bool>(&writer), kind == SchemaType::Boolean, "boolean <- {}", kind);
        assert_eq!(accepts::<i32>(&writer), kind == SchemaType::Int, "int <- {}", kind);
        assert_eq!(accepts::<i64>(&writer), kind == SchemaType::Long, "long <- {}", kind);
        assert_eq!(accepts::<f32>(&writer), kind == SchemaType::Float, "float <- {}", kind);
        assert_eq!(accepts::<f64>(&writer), kind == SchemaType::Double, "double <- {}", kind);
        assert_eq!(accepts::<RawBytes>(&writer), kind == SchemaType::Bytes, "bytes <- {}", kind);
        assert_eq!(accepts::<RawString>(&writer), kind == SchemaType::String, "string <- {}", kind);
    }
}

#[test]
fn int_into_long_is_not_promoted() {
    let err = Resolver::<i64>::new(&Schema::int()).err().expect("mismatch");
    assert_eq!(err.to_string(), "Cannot store int into long");
}

#[test]
fn primitives_decode() {
    let mut data = Vec::new();
    write_int(-17, &mut data);
    let mut int = 0i32;
    raw_int_resolver_new(&Schema::int())
        .expect("int")
        .decode_slice(&data, &mut int)
        .expect("decode");
    assert_eq!(int, -17);

    let mut data = Vec::new();
    write_long(1 << 40, &mut data);
    let mut long = 0i64;
    Resolver::<i64>::new(&Schema::long())
        .expect("long")
        .decode_slice(&data, &mut long)
        .expect("decode");
    assert_eq!(long, 1 << 40);

    let mut data = Vec::new();
    write_float(1.25, &mut data);
    write_double(-2.5, &mut data);
    let mut reader = avro_value::Reader::new(&data);
    let (mut float, mut double) = (0f32, 0f64);
    Resolver::<f32>::new(&Schema::float())
        .expect("float")
        .decode(&mut reader, &mut float)
        .expect("decode");
    Resolver::<f64>::new(&Schema::double())
        .expect("double")
        .decode(&mut reader, &mut double)
        .expect("decode");
    assert_eq!((float, double), (1.25, -2.5));

    let mut data = Vec::new();
    write_bytes(&[0, 1, 2, 255], &mut data);
    let mut bytes = RawBytes::new();
    Resolver::<RawBytes>::new(&Schema::bytes())
        .expect("bytes")
        .decode_slice(&data, &mut bytes)
        .expect("decode");
    assert_eq!(bytes.get(), &[0, 1, 2, 255]);

    let mut data = Vec::new();
    write_string("résumé", &mut data);
    let mut string = RawString::new();
    raw_string_resolver_new(&Schema::string())
        .expect("string")
        .decode_slice(&data, &mut string)
        .expect("decode");
    assert_eq!(string.as_str(), Some("résumé"));

    let mut unit = ();
    Resolver::<()>::new(&Schema::null())
        .expect("null")
        .decode_slice(&[], &mut unit)
        .expect("decode");

    let mut flag = false;
    Resolver::<bool>::new(&Schema::boolean())
        .expect("boolean")
        .decode_slice(&[1], &mut flag)
        .expect("decode");
    assert!(flag);
}

/* ============================================================================
   Compound targets
   ============================================================================ */

#[test]
fn arrays_and_maps_decode_and_replace_contents() {
    let mut data = Vec::new();
    write_long(3, &mut data);
    for v in [5, 6, 7] {
        write_long(v, &mut data);
    }
    write_long(0, &mut data);

    let resolver = Resolver::<RawArray<i64>>::new(&Schema::array(Schema::long())).expect("array");
    let mut array = RawArray::new();
    *array.append().expect("stale") = 99;
    resolver.decode_slice(&data, &mut array).expect("decode");
    assert_eq!(array.as_slice(), &[5, 6, 7]);

    let mut data = Vec::new();
    write_long(2, &mut data);
    write_string("a", &mut data);
    write_string("x", &mut data);
    write_string("b", &mut data);
    write_string("y", &mut data);
    write_long(0, &mut data);

    let resolver = Resolver::<RawMap<RawString>>::new(&Schema::map(Schema::string())).expect("map");
    let mut map = RawMap::new();
    resolver.decode_slice(&data, &mut map).expect("decode");
    assert_eq!(map.size(), 2);
    assert_eq!(map.get("b").map(|(v, i)| (v.as_str(), i)), Some((Some("y"), 1)));
}

#[test]
fn block_counts_beyond_the_input_are_rejected() {
    /* a map of nulls allocates nothing per element, so only the key index
     * would grow */
    let mut data = Vec::new();
    write_long(1 << 61, &mut data);
    let resolver = Resolver::<RawMap<()>>::new(&Schema::map(Schema::null())).expect("map");
    let mut map = RawMap::new();
    let err = resolver.decode_slice(&data, &mut map).unwrap_err();
    assert!(matches!(err, SpecificError::Value(ValueError::BlockTooLarge { limit: 0, .. })));

    let mut data = Vec::new();
    write_long(1000, &mut data);
    write_int(1, &mut data);
    let resolver = Resolver::<RawArray<i32>>::new(&Schema::array(Schema::int())).expect("array");
    let mut array = RawArray::new();
    let err = resolver.decode_slice(&data, &mut array).unwrap_err();
    assert!(matches!(
        err,
        SpecificError::Value(ValueError::BlockTooLarge { count: 1000, limit: 1 })
    ));

    let mut data = Vec::new();
    write_long(1000, &mut data);
    write_string("k", &mut data);
    write_int(1, &mut data);
    let resolver = Resolver::<RawMap<i32>>::new(&Schema::map(Schema::int())).expect("map");
    let err = resolver.decode_slice(&data, &mut RawMap::new()).unwrap_err();
    assert!(matches!(err, SpecificError::Value(ValueError::BlockTooLarge { count: 1000, .. })));
}

#[test]
fn zero_width_items_are_bounded_separately() {
    let resolver = Resolver::<RawArray<()>>::new(&Schema::array(Schema::null())).expect("array");

    let mut data = Vec::new();
    write_long(3, &mut data);
    write_long(0, &mut data);
    let mut nulls = RawArray::new();
    resolver.decode_slice(&data, &mut nulls).expect("three nulls");
    assert_eq!(nulls.size(), 3);

    let mut data = Vec::new();
    write_long(1 << 61, &mut data);
    let err = resolver.decode_slice(&data, &mut nulls).unwrap_err();
    assert!(matches!(
        err,
        SpecificError::Value(ValueError::BlockTooLarge { limit, .. }) if limit == MAX_ZERO_WIDTH_BLOCK
    ));
}

#[test]
fn negative_block_counts_carry_a_byte_size() {
    let mut data = Vec::new();
    let mut block = Vec::new();
    for v in [1, 2] {
        write_int(v, &mut block);
    }
    write_long(-2, &mut data);
    write_long(block.len() as i64, &mut data);
    data.extend_from_slice(&block);
    write_long(1, &mut data);
    write_int(3, &mut data);
    write_long(0, &mut data);

    let resolver = Resolver::<RawArray<i32>>::new(&Schema::array(Schema::int())).expect("array");
    let mut array = RawArray::new();
    resolver.decode_slice(&data, &mut array).expect("decode");
    assert_eq!(array.as_slice(), &[1, 2, 3]);

    let mut data = Vec::new();
    let mut block = Vec::new();
    write_string("a", &mut block);
    write_int(10, &mut block);
    write_string("b", &mut block);
    write_int(20, &mut block);
    write_long(-2, &mut data);
    write_long(block.len() as i64, &mut data);
    data.extend_from_slice(&block);
    write_long(0, &mut data);

    let resolver = Resolver::<RawMap<i32>>::new(&Schema::map(Schema::int())).expect("map");
    let mut map = RawMap::new();
    resolver.decode_slice(&data, &mut map).expect("decode");
    assert_eq!(map.size(), 2);
    assert_eq!(map.get("b"), Some((&20, 1)));

    /* a negative count whose items run past the input still fails cleanly */
    let mut data = Vec::new();
    write_long(-4, &mut data);
    write_long(2, &mut data);
    write_int(1, &mut data);
    let err = Resolver::<RawArray<i32>>::new(&Schema::array(Schema::int()))
        .expect("array")
        .decode_slice(&data, &mut RawArray::new())
        .unwrap_err();
    assert!(matches!(err, SpecificError::Value(ValueError::BlockTooLarge { count: 4, limit: 1 })));
}

#[test]
fn enum_symbols_map_by_name() {
    let writer = Schema::enumeration("suit", vec!["CLUBS", "HEARTS", "JOKER"]).expect("enum");
    let resolver = Resolver::<Suit>::new(&writer).expect("resolver");

    let mut suit = Suit::default();
    let mut data = Vec::new();
    write_int(0, &mut data);
    resolver.decode_slice(&data, &mut suit).expect("clubs");
    assert_eq!(suit, Suit::Clubs);

    let mut data = Vec::new();
    write_int(2, &mut data);
    let err = resolver.decode_slice(&data, &mut suit).unwrap_err();
    assert!(matches!(err, SpecificError::UnknownSymbol { ref symbol, .. } if symbol == "JOKER"));

    let other = Schema::enumeration("rank", vec!["ACE"]).expect("enum");
    assert!(Resolver::<Suit>::new(&other).is_err());
}

#[test]
fn fixed_requires_name_and_size() {
    let writer = Schema::fixed("md5", 16).expect("fixed");
    let resolver = Resolver::<Md5>::new(&writer).expect("resolver");
    let mut md5 = Md5::default();
    resolver.decode_slice(&[7u8; 16], &mut md5).expect("decode");
    assert_eq!(md5.0, [7u8; 16]);

    assert!(Resolver::<Md5>::new(&Schema::fixed("md5", 8).expect("fixed")).is_err());
    assert!(Resolver::<Md5>::new(&Schema::fixed("sha", 16).expect("fixed")).is_err());
}

#[test]
fn recursive_person_round_trip() {
    let schema = person_schema();

    let mut tree = GenericValue::new(&schema).expect("value");
    {
        let mut root = tree.as_value_mut();
        root.get_by_index_mut(0).expect("first").set_string("Anne").expect("set");
        root.get_by_index_mut(1).expect("last").set_string("Byron").expect("set");
        root.get_by_index_mut(2).expect("age").set_int(35).expect("set");
        let mut children = root.get_by_index_mut(3).expect("children");
        let (mut child, _) = children.append().expect("child");
        child.get_by_index_mut(0).expect("first").set_string("Ada").expect("set");
        child.get_by_index_mut(1).expect("last").set_string("Lovelace").expect("set");
        child.get_by_index_mut(2).expect("age").set_int(8).expect("set");
    }
    let mut data = Vec::new();
    write_value(&tree.as_value(), &mut data).expect("encode");

    let resolver = Resolver::<Person>::new(&schema).expect("resolver");
    /* person, string, int and array<person>; the back-edge reuses person */
    assert_eq!(resolver.graph().live_count(), 4);

    let mut person = Person::default();
    resolver.decode_slice(&data, &mut person).expect("decode");
    assert_eq!(person.first_name.as_str(), Some("Anne"));
    assert_eq!(person.age, 35);
    assert_eq!(person.children.size(), 1);
    assert_eq!(person.children[0].last_name.as_str(), Some("Lovelace"));
    assert_eq!(person.children[0].children.size(), 0);
}

#[test]
fn writer_only_fields_are_skipped() {
    let mut builder = RecordBuilder::new("person");
    builder
        .field("nickname", Schema::map(Schema::string()))
        .and_then(|b| b.field("age", Schema::int()))
        .expect("fields");
    let writer = builder.build().expect("writer");

    let mut data = Vec::new();
    write_long(1, &mut data);
    write_string("k", &mut data);
    write_string("v", &mut data);
    write_long(0, &mut data);
    write_int(41, &mut data);

    let resolver = Resolver::<Person>::new(&writer).expect("resolver");
    let mut person = Person::default();
    person.first_name.set_str("kept").expect("set");
    resolver.decode_slice(&data, &mut person).expect("decode");
    assert_eq!(person.age, 41);
    assert_eq!(person.first_name.as_str(), Some("kept"));
}

#[test]
fn recursive_list_through_union() {
    let schema = list_schema();
    let resolver = Resolver::<List>::new(&schema).expect("resolver");

    let mut data = Vec::new();
    for value in [1, 2, 3] {
        write_int(value, &mut data);
        write_long(if value < 3 { 1 } else { 0 }, &mut data);
    }
    let mut list = List::default();
    resolver.decode_slice(&data, &mut list).expect("decode");

    let mut seen = Vec::new();
    let mut cursor = Some(&list);
    while let Some(node) = cursor {
        seen.push(node.value);
        cursor = match &node.next {
            ListNext::List(next) => Some(next),
            ListNext::Null(()) => None,
        };
    }
    assert_eq!(seen, vec![1, 2, 3]);
}

/* ============================================================================
   Writer unions, memoization and lifetime
   ============================================================================ */

#[test]
fn writer_union_keeps_only_compatible_branches() {
    let writer = Schema::union(vec![Schema::int(), Schema::string()]).expect("union");
    let resolver = raw_int_resolver_new(&writer).expect("resolver");

    let root = resolver.graph().get(resolver.root()).expect("root");
    assert_eq!(root.children().len(), 2);
    assert!(root.child(0).is_some());
    assert!(root.child(1).is_none());

    let mut data = Vec::new();
    write_long(0, &mut data);
    write_int(12, &mut data);
    let mut target = 0;
    resolver.decode_slice(&data, &mut target).expect("int branch");
    assert_eq!(target, 12);

    let mut data = Vec::new();
    write_long(1, &mut data);
    write_string("twelve", &mut data);
    assert!(matches!(
        resolver.decode_slice(&data, &mut target),
        Err(SpecificError::MissingBranch { discriminant: 1 })
    ));
}

#[test]
fn incompatible_writer_union_leaves_nothing_behind() {
    let writer = Schema::union(vec![Schema::string(), Schema::bytes()]).expect("union");
    let mut ctx = ResolveContext::new();
    let err = ctx.resolve::<i32>(&writer).unwrap_err();
    assert_eq!(err.to_string(), "Cannot store union into int");
    assert_eq!(ctx.memo_len(), 0);
    assert!(ctx.graph().is_empty());
    assert!(ctx.memoized::<i32>(&writer).is_none());
}

#[test]
fn failed_record_rolls_back_nested_entries() {
    let mut builder = RecordBuilder::new("person");
    builder
        .field("children", Schema::array(Schema::string()))
        .and_then(|b| b.field("age", Schema::string()))
        .expect("fields");
    let writer = builder.build().expect("writer");

    let mut ctx = ResolveContext::new();
    assert!(ctx.resolve::<Person>(&writer).is_err());
    assert_eq!(ctx.memo_len(), 0);
    assert!(ctx.graph().is_empty());
}

#[test]
fn memoized_resolution_is_idempotent() {
    let schema = person_schema();
    let mut ctx = ResolveContext::new();
    let first = ctx.resolve::<Person>(&schema).expect("first");
    let entries = ctx.memo_len();
    let second = ctx.resolve::<Person>(&schema).expect("second");
    assert_eq!(first, second);
    assert_eq!(ctx.memo_len(), entries);
    assert_eq!(ctx.memoized::<Person>(&schema), Some(first));
}

#[test]
fn reader_union_picks_first_accepting_branch() {
    let writer = Schema::null();
    let mut ctx = ResolveContext::new();
    let id = ctx.resolve::<ListNext>(&writer).expect("null branch");
    let node = ctx.graph().get(id).expect("node");
    assert_eq!(node.selector().map(|s| s.discriminant), Some(0));

    assert!(ctx.resolve::<ListNext>(&Schema::long()).is_err());
}

#[test]
fn free_walk_releases_recursive_graph_once() {
    let schema = list_schema();
    let mut ctx = ResolveContext::new();
    let root = ctx.resolve::<List>(&schema).expect("resolve");
    let mut graph = ctx.into_graph();
    let live = graph.live_count();
    assert!(live >= 4);

    let held = schema.ref_count();
    assert_eq!(graph.free(root), live);
    assert_eq!(graph.live_count(), 0);
    assert!(schema.ref_count() < held);
    assert_eq!(graph.free(root), 0);
}

#[test]
fn raw_values_feed_consumers() {
    let resolver = Resolver::<RawArray<RawString>>::new(&Schema::array(Schema::string())).expect("resolver");
    let mut source: RawArray<RawString> = RawArray::new();
    for word in ["alpha", "beta"] {
        source.append().expect("append").set_str(word).expect("set");
    }
    let mut target = RawArray::new();
    resolver.consume(&source, &mut target).expect("consume");
    assert_eq!(target, source);
}
