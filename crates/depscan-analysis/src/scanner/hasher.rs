//! Content signatures via xxh3.

use xxhash_rust::xxh3::{xxh3_64, Xxh3};

/// Compute the xxh3 64-bit hash of file content.
#[inline]
pub fn hash_content(content: &[u8]) -> u64 {
    xxh3_64(content)
}

/// Order-sensitive hash over a sequence of strings, used to compare
/// dependency lists without keeping both copies around.
pub fn hash_strings<'a, I>(items: I) -> u64
where
    I: IntoIterator<Item = &'a str>,
{
    let mut hasher = Xxh3::new();
    for item in items {
        hasher.update(item.as_bytes());
        // Separator so ["ab", "c"] and ["a", "bc"] differ.
        hasher.update(&[0xff]);
    }
    hasher.digest()
}
