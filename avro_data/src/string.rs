/* Resizable byte buffer used for string and bytes values.
 *
 * The buffer is either self-owned, in which case `clear` keeps it for the
 * next fill, or given by a caller together with an optional free callback.
 * A given buffer is handed back to its free callback exactly once: on the
 * next mutation, on `clear`, on `done`, or on drop. */

use crate::errors::{DataError, DataResult};
use std::fmt;
use std::ops::{Deref, DerefMut};

/* Receives a given buffer back along with the length it was given with */
pub type FreeFn = Box<dyn FnOnce(Vec<u8>, usize) + Send>;

#[derive(Default)]
pub struct RawString {
    buf: Vec<u8>,
    size: usize,
    free: Option<FreeFn>,
    our_buf: bool,
}

impl RawString {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_str_value(value: &str) -> DataResult<Self> {
        let mut string = Self::new();
        string.set_str(value)?;
        Ok(string)
    }

    pub fn get(&self) -> &[u8] {
        &self.buf[..self.size]
    }

    /* Contents as text, if they are valid UTF-8 */
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(self.get()).ok()
    }

    pub fn length(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn allocated_size(&self) -> usize {
        if self.our_buf {
            self.buf.capacity()
        } else {
            self.buf.len()
        }
    }

    pub fn is_own_buffer(&self) -> bool {
        self.our_buf
    }

    /* Copies `src` into self-owned storage */
    pub fn set(&mut self, src: &[u8]) -> DataResult<()> {
        self.ensure_buf(src.len())?;
        self.buf.clear();
        self.buf.extend_from_slice(src);
        self.size = src.len();
        Ok(())
    }

    pub fn set_str(&mut self, src: &str) -> DataResult<()> {
        self.set(src.as_bytes())
    }

    pub fn append(&mut self, src: &[u8]) -> DataResult<()> {
        let length = self.size + src.len();
        if self.our_buf {
            self.ensure_buf(length)?;
            self.buf.extend_from_slice(src);
        } else {
            let mut joined = Vec::new();
            joined
                .try_reserve_exact(length)
                .map_err(|_| DataError::OutOfMemory { requested: length })?;
            joined.extend_from_slice(self.get());
            joined.extend_from_slice(src);
            self.free_buf();
            self.buf = joined;
            self.our_buf = true;
        }
        self.size = length;
        Ok(())
    }

    /* Takes ownership of a caller-allocated buffer without copying. `free`
     * is invoked with the buffer and its length once the string lets go. */
    pub fn give(&mut self, buf: Vec<u8>, free: Option<FreeFn>) {
        self.free_buf();
        self.size = buf.len();
        self.buf = buf;
        self.free = free;
        self.our_buf = false;
    }

    /* Empties the string. Self-owned storage is kept; a given buffer is
     * released. */
    pub fn clear(&mut self) {
        if self.our_buf {
            self.buf.clear();
        } else {
            self.free_buf();
        }
        self.size = 0;
    }

    /* Releases any storage and returns to the freshly-constructed state */
    pub fn done(&mut self) {
        self.free_buf();
        self.size = 0;
        self.our_buf = false;
    }

    fn free_buf(&mut self) {
        let buf = std::mem::take(&mut self.buf);
        if let Some(free) = self.free.take() {
            let length = buf.len();
            free(buf, length);
        }
    }

    /* Makes the buffer self-owned and large enough for `length` bytes.
     * Contents are unspecified afterwards; callers overwrite them. */
    fn ensure_buf(&mut self, length: usize) -> DataResult<()> {
        if !self.our_buf {
            self.free_buf();
            self.size = 0;
            self.our_buf = true;
        }

        let allocated = self.buf.capacity();
        if length <= allocated {
            return Ok(());
        }

        let mut target = if allocated == 0 { length } else { allocated * 2 };
        while target < length {
            target = target.saturating_mul(2);
        }
        self.buf
            .try_reserve_exact(target - self.buf.len())
            .map_err(|_| DataError::OutOfMemory { requested: target })
    }
}

impl Drop for RawString {
    fn drop(&mut self) {
        self.free_buf();
    }
}

impl Clone for RawString {
    /* Clones always own their storage */
    fn clone(&self) -> Self {
        Self {
            buf: self.get().to_vec(),
            size: self.size,
            free: None,
            our_buf: true,
        }
    }
}

impl PartialEq for RawString {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl Eq for RawString {}

impl fmt::Debug for RawString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(text) => write!(f, "{:?}", text),
            None => write!(f, "{:?}", self.get()),
        }
    }
}

/* Byte-string storage; shares the string buffer implementation */
#[derive(Default, Clone, PartialEq, Eq)]
pub struct RawBytes(pub RawString);

impl RawBytes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_slice(value: &[u8]) -> DataResult<Self> {
        let mut bytes = Self::new();
        bytes.set(value)?;
        Ok(bytes)
    }
}

impl Deref for RawBytes {
    type Target = RawString;

    fn deref(&self) -> &RawString {
        &self.0
    }
}

impl DerefMut for RawBytes {
    fn deref_mut(&mut self) -> &mut RawString {
        &mut self.0
    }
}

impl fmt::Debug for RawBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0.get())
    }
}
