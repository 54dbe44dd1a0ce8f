//! Character-sum hash used to pick a bucket for a key.
//!
//! The key is rendered through its `Display` impl and every UTF-16 code
//! unit of the rendering is added to an accumulator that is reduced modulo
//! the bucket count after each step. The accumulator therefore never leaves
//! `[0, bucket_count)`, and the result is a pure function of the rendered
//! text and the bucket count. There is no seed.

use core::fmt::{self, Display, Write};

/// Streaming sink that folds rendered text into a running bucket index.
struct CharSum {
    acc: usize,
    modulus: usize,
}

impl Write for CharSum {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for unit in s.encode_utf16() {
            self.acc = (self.acc + usize::from(unit)) % self.modulus;
        }
        Ok(())
    }
}

/// Bucket index of `key` in a table of `bucket_count` buckets.
///
/// A `bucket_count` of zero is treated as one, so the result is always a
/// valid index into a non-empty bucket array.
///
/// The key's `Display` impl must not fail. `CharSum` itself never errors,
/// so a failed write is a broken key; debug builds panic on it.
pub fn bucket_index<Q>(key: &Q, bucket_count: usize) -> usize
where
    Q: ?Sized + Display,
{
    let mut sum = CharSum {
        acc: 0,
        modulus: bucket_count.max(1),
    };
    let res = write!(sum, "{}", key);
    debug_assert!(res.is_ok(), "key Display impl returned an error");
    sum.acc
}
