//! Location keys: the hashed shard prefix for a stash directory.

use std::fmt;
use std::path::PathBuf;

/// Location key size in bytes.
pub const KEY_SIZE: usize = 4;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a over raw bytes.
fn fnv1a_64(data: &[u8]) -> u64 {
    data.iter().fold(FNV_OFFSET_BASIS, |hash, &byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// A 4-byte key derived from a stash name.
///
/// Rendered as four uppercase hex segments, it forms the sharding prefix
/// under the storage root: `<root>/DB/B2/27/53/<name>`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocationKey([u8; KEY_SIZE]);

impl LocationKey {
    /// Compute the key for a name.
    ///
    /// The big-endian FNV-1a digest is folded in half by XOR-ing byte `i`
    /// with byte `i + 4`.
    pub fn compute(name: &str) -> Self {
        let digest = fnv1a_64(name.as_bytes()).to_be_bytes();
        let mut key = [0u8; KEY_SIZE];
        for (i, byte) in key.iter_mut().enumerate() {
            *byte = digest[i] ^ digest[i + KEY_SIZE];
        }
        LocationKey(key)
    }

    /// Create a key from raw bytes.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        LocationKey(bytes)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }

    /// Two uppercase hex digits per byte, one path segment each.
    pub fn segments(&self) -> [String; KEY_SIZE] {
        self.0.map(|b| hex::encode_upper([b]))
    }

    /// The segments joined as a relative path.
    pub fn relative_path(&self) -> PathBuf {
        self.segments().iter().collect()
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments().join("/"))
    }
}

impl fmt::Debug for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocationKey({})", hex::encode_upper(self.0))
    }
}
