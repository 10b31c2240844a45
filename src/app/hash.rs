//! Cache key derivation for remote images
//!
//! Image URLs contain characters that are unsafe or awkward in file names, so
//! each URL is mapped to a fixed-length key built from its MD5 digest. The
//! mapping is a pure function of the URL string: the same URL always yields the
//! same key, across calls and across process restarts, so a repeated download
//! is a cache hit without any lookup table.

use std::fmt;

use crate::constants::cache::{IMAGE_PREFIX, IMAGE_SUFFIX};

/// MD5 digest stored as its raw 16 bytes
///
/// Displayed as a lowercase 32-character hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Md5Hash([u8; 16]);

impl Md5Hash {
    /// Compute the digest of arbitrary bytes
    pub fn compute(data: impl AsRef<[u8]>) -> Self {
        Md5Hash(md5::compute(data).0)
    }

    /// Compute the digest of a URL string
    pub fn of_url(url: &str) -> Self {
        Self::compute(url.as_bytes())
    }

    /// Lowercase hex representation
    pub fn to_hex(&self) -> String {
        use std::fmt::Write;
        self.0.iter().fold(String::with_capacity(32), |mut acc, b| {
            let _ = write!(&mut acc, "{:02x}", b);
            acc
        })
    }
}

impl fmt::Display for Md5Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Derive the images-namespace key for a remote image URL
///
/// The key has the shape `img_<32 hex chars>.jpg`.
pub fn image_key(url: &str) -> String {
    format!("{}{}{}", IMAGE_PREFIX, Md5Hash::of_url(url), IMAGE_SUFFIX)
}
