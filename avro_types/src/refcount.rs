/* Reference counting primitives.
 *
 * Counters are shared by schema nodes and anything else that wants an
 * observable count. A counter holding IMMORTAL is not reference counted:
 * inc and dec leave it untouched. The default backend is atomic; the
 * `non-atomic-refcount` feature swaps in plain load/store pairs for
 * single-threaded builds. */

use std::sync::atomic::{AtomicPtr, AtomicU32, Ordering};

/* Sentinel marking a statically allocated object */
pub const IMMORTAL: u32 = u32::MAX;

#[derive(Debug)]
pub struct RefCount(AtomicU32);

impl RefCount {
    /* A fresh counter owned by exactly one handle */
    pub const fn new() -> Self {
        Self(AtomicU32::new(1))
    }

    pub const fn immortal() -> Self {
        Self(AtomicU32::new(IMMORTAL))
    }

    pub fn set(&self, value: u32) {
        self.0.store(value, Ordering::Release);
    }

    pub fn get(&self) -> u32 {
        self.0.load(Ordering::Acquire)
    }

    pub fn is_immortal(&self) -> bool {
        self.get() == IMMORTAL
    }

    #[cfg(not(feature = "non-atomic-refcount"))]
    pub fn inc(&self) {
        let _ = self
            .0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, step_up);
    }

    /* Returns true when this call dropped the count to zero */
    #[cfg(not(feature = "non-atomic-refcount"))]
    pub fn dec(&self) -> bool {
        match self
            .0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, step_down)
        {
            Ok(previous) => previous == 1,
            Err(_) => false,
        }
    }

    #[cfg(feature = "non-atomic-refcount")]
    pub fn inc(&self) {
        if let Some(next) = step_up(self.0.load(Ordering::Relaxed)) {
            self.0.store(next, Ordering::Relaxed);
        }
    }

    #[cfg(feature = "non-atomic-refcount")]
    pub fn dec(&self) -> bool {
        match step_down(self.0.load(Ordering::Relaxed)) {
            Some(next) => {
                self.0.store(next, Ordering::Relaxed);
                next == 0
            }
            None => false,
        }
    }
}

impl Default for RefCount {
    fn default() -> Self {
        Self::new()
    }
}

fn step_up(count: u32) -> Option<u32> {
    /* never walk into the sentinel */
    match count {
        IMMORTAL => None,
        c => c.checked_add(1).filter(|next| *next != IMMORTAL),
    }
}

fn step_down(count: u32) -> Option<u32> {
    match count {
        IMMORTAL | 0 => None,
        c => Some(c - 1),
    }
}

/* Compare-and-swap on a shared pointer slot. Stores `new` and returns true
 * only if the slot still held `old`. */
#[cfg(not(feature = "non-atomic-refcount"))]
pub fn cas_ptr<T>(slot: &AtomicPtr<T>, old: *mut T, new: *mut T) -> bool {
    slot.compare_exchange(old, new, Ordering::AcqRel, Ordering::Acquire)
        .is_ok()
}

#[cfg(feature = "non-atomic-refcount")]
pub fn cas_ptr<T>(slot: &AtomicPtr<T>, old: *mut T, new: *mut T) -> bool {
    if slot.load(Ordering::Relaxed) == old {
        slot.store(new, Ordering::Relaxed);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    #[test]
    fn dec_reports_zero_once() {
        let count = RefCount::new();
        count.inc();
        assert_eq!(count.get(), 2);
        assert!(!count.dec());
        assert!(count.dec());
        /* already at zero */
        assert!(!count.dec());
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn immortal_counter_ignores_inc_and_dec() {
        let count = RefCount::immortal();
        count.inc();
        assert!(!count.dec());
        assert!(count.is_immortal());
        assert_eq!(count.get(), IMMORTAL);
    }

    #[test]
    fn inc_never_reaches_sentinel() {
        let count = RefCount::new();
        count.set(IMMORTAL - 1);
        count.inc();
        assert_eq!(count.get(), IMMORTAL - 1);
    }

    #[test]
    fn cas_ptr_swaps_only_on_match() {
        let mut a = 1u32;
        let mut b = 2u32;
        let slot = AtomicPtr::new(ptr::null_mut());

        assert!(cas_ptr(&slot, ptr::null_mut(), &mut a));
        assert!(!cas_ptr(&slot, ptr::null_mut(), &mut b));
        assert_eq!(slot.load(Ordering::Acquire), &mut a as *mut u32);
        assert!(cas_ptr(&slot, &mut a, &mut b));
        assert_eq!(slot.load(Ordering::Acquire), &mut b as *mut u32);
    }
}
