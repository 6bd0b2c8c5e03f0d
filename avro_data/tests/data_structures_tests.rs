/* Raw array, raw map and raw string behaviour */

use avro_data::{DataError, RawArray, RawBytes, RawMap, RawString};
use std::sync::{Arc, Mutex};

#[test]
fn array_append_get_clear() {
    let mut array: RawArray<i64> = RawArray::new();
    for i in 0..100 {
        *array.append().expect("append") = i * 3;
    }
    assert_eq!(array.size(), 100);
    for i in 0..100 {
        assert_eq!(array.get(i as usize), Some(&(i * 3)));
    }

    let allocated = array.allocated_size();
    array.clear();
    assert_eq!(array.size(), 0);
    /* clear keeps the storage for reuse */
    assert_eq!(array.allocated_size(), allocated);

    *array.append().expect("append after clear") = 42;
    assert_eq!(array.allocated_size(), allocated);
    assert_eq!(array[0], 42);

    array.done();
    assert_eq!(array.allocated_size(), 0);
}

#[test]
fn map_get_or_create_reports_new_once() {
    let mut map: RawMap<i32> = RawMap::new();

    let (value, index, is_new) = map.get_or_create("alpha").expect("alpha");
    *value = 10;
    assert_eq!(index, 0);
    assert!(is_new);

    let (_, index, is_new) = map.get_or_create("beta").expect("beta");
    assert_eq!(index, 1);
    assert!(is_new);

    let (value, index, is_new) = map.get_or_create("alpha").expect("alpha again");
    assert_eq!(*value, 10);
    assert_eq!(index, 0);
    assert!(!is_new);

    assert_eq!(map.size(), 2);
    assert_eq!(map.key(1), Some("beta"));
}

#[test]
fn map_reserve_failure_is_reported() {
    let mut map: RawMap<()> = RawMap::new();
    map.get_or_create("kept").expect("insert");

    let err = map.ensure_size(1 << 61).expect_err("cannot reserve");
    assert!(matches!(err, DataError::OutOfMemory { .. }));

    /* the map is left as it was */
    assert_eq!(map.size(), 1);
    assert_eq!(map.get("kept").map(|(_, index)| index), Some(0));
    map.get_or_create("more").expect("insert after failure");
    assert_eq!(map.size(), 2);
}

#[test]
fn map_lookup_by_key_and_index_share_storage() {
    let mut map: RawMap<RawString> = RawMap::new();
    for key in ["one", "two", "three"] {
        let (value, _, _) = map.get_or_create(key).expect("create");
        value.set_str(&key.to_uppercase()).expect("set");
    }

    let (by_key, index) = map.get("two").expect("two");
    let by_index = map.get_by_index(index).expect("index");
    assert!(std::ptr::eq(by_key, by_index));
    assert_eq!(by_index.as_str(), Some("TWO"));

    assert!(map.get("four").is_none());

    let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["one", "two", "three"]);

    map.clear();
    assert!(map.is_empty());
    assert!(map.get("one").is_none());
    let (_, index, is_new) = map.get_or_create("three").expect("recreate");
    assert_eq!(index, 0);
    assert!(is_new);
}

#[test]
fn string_set_then_get() {
    let mut string = RawString::new();
    string.set(b"avro").expect("set");
    assert_eq!(string.get(), b"avro");
    assert_eq!(string.length(), 4);
    assert!(string.is_own_buffer());

    /* shorter contents reuse the buffer */
    let allocated = string.allocated_size();
    string.set_str("av").expect("set shorter");
    assert_eq!(string.as_str(), Some("av"));
    assert_eq!(string.allocated_size(), allocated);

    string.clear();
    assert_eq!(string.length(), 0);
    assert_eq!(string.allocated_size(), allocated);

    string.append(b"ro").expect("append");
    string.append(b"ck").expect("append");
    assert_eq!(string.as_str(), Some("rock"));
}

#[test]
fn given_buffer_is_freed_exactly_once() {
    let calls: Arc<Mutex<Vec<(Vec<u8>, usize)>>> = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&calls);

    let mut string = RawString::new();
    string.give(
        b"borrowed".to_vec(),
        Some(Box::new(move |buf: Vec<u8>, len: usize| {
            seen.lock().expect("lock").push((buf, len));
        })),
    );
    assert_eq!(string.get(), b"borrowed");
    assert!(!string.is_own_buffer());

    string.done();
    string.done();
    drop(string);

    let calls = calls.lock().expect("lock");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0], (b"borrowed".to_vec(), 8));
}

#[test]
fn given_buffer_released_on_clear_and_on_next_set() {
    let count = Arc::new(Mutex::new(0usize));

    let mut string = RawString::new();
    let counter = Arc::clone(&count);
    string.give(
        vec![1, 2, 3],
        Some(Box::new(move |_: Vec<u8>, _: usize| *counter.lock().expect("lock") += 1)),
    );
    string.clear();
    assert_eq!(*count.lock().expect("lock"), 1);

    let counter = Arc::clone(&count);
    string.give(
        vec![4, 5],
        Some(Box::new(move |_: Vec<u8>, _: usize| *counter.lock().expect("lock") += 1)),
    );
    string.set(b"own").expect("set");
    assert_eq!(*count.lock().expect("lock"), 2);
    assert!(string.is_own_buffer());
    drop(string);
    assert_eq!(*count.lock().expect("lock"), 2);
}

#[test]
fn bytes_share_string_storage() {
    let bytes = RawBytes::from_slice(&[0, 159, 146, 150]).expect("bytes");
    assert_eq!(bytes.length(), 4);
    assert!(bytes.as_str().is_none());
    assert_eq!(bytes.clone(), bytes);
}
