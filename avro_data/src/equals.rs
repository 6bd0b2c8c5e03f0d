/* Equality predicates over optional raw values. Two references to the same
 * storage are equal without looking at the contents; a missing value only
 * equals another missing value. */

use crate::array::RawArray;
use crate::map::RawMap;
use crate::string::{RawBytes, RawString};
use std::ptr;

pub trait RawEquals {
    fn raw_equals(a: Option<&Self>, b: Option<&Self>) -> bool;
}

pub fn raw_equals<T: RawEquals + ?Sized>(a: Option<&T>, b: Option<&T>) -> bool {
    T::raw_equals(a, b)
}

fn compare_with<T: ?Sized>(a: Option<&T>, b: Option<&T>, by_value: impl FnOnce(&T, &T) -> bool) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => ptr::eq(a, b) || by_value(a, b),
        (None, None) => true,
        _ => false,
    }
}

macro_rules! scalar_equals {
    ($($ty:ty),*) => {
        $(
            impl RawEquals for $ty {
                fn raw_equals(a: Option<&Self>, b: Option<&Self>) -> bool {
                    compare_with(a, b, |a, b| a == b)
                }
            }
        )*
    };
}

scalar_equals!(bool, i32, i64, f32, f64);

/* Null placeholders carry no value; only presence matters */
impl RawEquals for () {
    fn raw_equals(a: Option<&Self>, b: Option<&Self>) -> bool {
        a.is_none() == b.is_none()
    }
}

impl RawEquals for RawString {
    fn raw_equals(a: Option<&Self>, b: Option<&Self>) -> bool {
        compare_with(a, b, |a, b| a.length() == b.length() && a.get() == b.get())
    }
}

impl RawEquals for RawBytes {
    fn raw_equals(a: Option<&Self>, b: Option<&Self>) -> bool {
        RawString::raw_equals(a.map(|x| &x.0), b.map(|x| &x.0))
    }
}

impl<T: RawEquals> RawEquals for RawArray<T> {
    fn raw_equals(a: Option<&Self>, b: Option<&Self>) -> bool {
        compare_with(a, b, |a, b| {
            a.size() == b.size()
                && a.iter().zip(b.iter()).all(|(x, y)| T::raw_equals(Some(x), Some(y)))
        })
    }
}

impl<T: RawEquals> RawEquals for RawMap<T> {
    fn raw_equals(a: Option<&Self>, b: Option<&Self>) -> bool {
        compare_with(a, b, |a, b| {
            a.size() == b.size()
                && a.iter().all(|(key, x)| match b.get(key) {
                    Some((y, _)) => T::raw_equals(Some(x), Some(y)),
                    None => false,
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_and_missing_values() {
        let x = 5i32;
        assert!(raw_equals(Some(&x), Some(&x)));
        assert!(raw_equals::<i32>(None, None));
        assert!(!raw_equals(Some(&x), None));
        assert!(!raw_equals(Some(&1i64), Some(&2i64)));
    }

    #[test]
    fn nan_is_not_equal_to_a_different_nan() {
        let a = f64::NAN;
        let b = f64::NAN;
        /* identity short-circuit still applies */
        assert!(raw_equals(Some(&a), Some(&a)));
        assert!(!raw_equals(Some(&a), Some(&b)));
    }

    #[test]
    fn null_compares_presence_only() {
        assert!(raw_equals(Some(&()), Some(&())));
        assert!(raw_equals::<()>(None, None));
        assert!(!raw_equals(Some(&()), None));
    }

    #[test]
    fn strings_compare_by_length_then_bytes() {
        let a = RawString::from_str_value("hello").expect("a");
        let b = RawString::from_str_value("hello").expect("b");
        let c = RawString::from_str_value("help").expect("c");
        assert!(raw_equals(Some(&a), Some(&b)));
        assert!(!raw_equals(Some(&a), Some(&c)));
    }
}
