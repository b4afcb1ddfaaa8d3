//! Binary layout of a sealed session.
//!
//! ```text
//! [RFSS: 4B] [version: 2B LE] [memory_kib: 4B LE] [iterations: 4B LE]
//! [lanes: 4B LE] [salt: 16B] [nonce: 12B] [payload_len: 4B LE]
//! [payload: AES-256-GCM ciphertext + 16B tag]
//! ```
//!
//! The whole header is authenticated as associated data, so editing the
//! KDF parameters or version makes decryption fail.

use crate::errors::CoreError;

pub const MAGIC: &[u8; 4] = b"RFSS";
pub const CURRENT_VERSION: u16 = 1;
pub const HEADER_LEN: usize = 4 + 2 + 4 + 4 + 4 + 16 + 12 + 4;

/// Sessions are tiny; anything larger than this is not ours.
const MAX_PAYLOAD_LEN: u32 = 64 * 1024;

/// Argon2id cost parameters recorded in the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub lanes: u32,
}

impl Default for KdfParams {
    /// 19 MiB, 2 passes, 1 lane.
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            lanes: 1,
        }
    }
}

impl KdfParams {
    /// Reject costs a crafted file could use to exhaust memory or CPU.
    pub fn check_bounds(&self) -> Result<(), CoreError> {
        if !(1..=8).contains(&self.lanes) {
            return Err(CoreError::InvalidFileFormat(format!(
                "KDF lanes out of range: {}",
                self.lanes
            )));
        }
        if self.memory_kib < 8 * self.lanes || self.memory_kib > 256 * 1024 {
            return Err(CoreError::InvalidFileFormat(format!(
                "KDF memory out of range: {} KiB",
                self.memory_kib
            )));
        }
        if !(1..=10).contains(&self.iterations) {
            return Err(CoreError::InvalidFileFormat(format!(
                "KDF iterations out of range: {}",
                self.iterations
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeHeader {
    pub version: u16,
    pub kdf: KdfParams,
    pub salt: [u8; 16],
    pub nonce: [u8; 12],
    pub payload_len: u32,
}

impl EnvelopeHeader {
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        let mut w = Writer { buf: &mut out, at: 0 };
        w.put(MAGIC);
        w.put(&self.version.to_le_bytes());
        w.put(&self.kdf.memory_kib.to_le_bytes());
        w.put(&self.kdf.iterations.to_le_bytes());
        w.put(&self.kdf.lanes.to_le_bytes());
        w.put(&self.salt);
        w.put(&self.nonce);
        w.put(&self.payload_len.to_le_bytes());
        out
    }

    /// Split `data` into a validated header, the raw header bytes (for use
    /// as associated data) and the payload.
    pub fn parse(data: &[u8]) -> Result<(Self, &[u8], &[u8]), CoreError> {
        if data.len() < HEADER_LEN {
            return Err(CoreError::InvalidFileFormat(
                "too short to be a session file".into(),
            ));
        }
        let (head, rest) = data.split_at(HEADER_LEN);
        let mut r = Reader { buf: head, at: 0 };

        if r.take::<4>() != *MAGIC {
            return Err(CoreError::InvalidFileFormat("missing RFSS marker".into()));
        }

        let version = u16::from_le_bytes(r.take());
        if version == 0 || version > CURRENT_VERSION {
            return Err(CoreError::UnsupportedVersion(version));
        }

        let kdf = KdfParams {
            memory_kib: u32::from_le_bytes(r.take()),
            iterations: u32::from_le_bytes(r.take()),
            lanes: u32::from_le_bytes(r.take()),
        };
        kdf.check_bounds()?;

        let salt = r.take();
        let nonce = r.take();
        let payload_len = u32::from_le_bytes(r.take());

        if payload_len > MAX_PAYLOAD_LEN {
            return Err(CoreError::InvalidFileFormat(format!(
                "payload length {payload_len} exceeds limit"
            )));
        }
        let payload = rest.get(..payload_len as usize).ok_or_else(|| {
            CoreError::InvalidFileFormat(format!(
                "truncated: expected {payload_len} payload bytes, found {}",
                rest.len()
            ))
        })?;

        let header = Self {
            version,
            kdf,
            salt,
            nonce,
            payload_len,
        };
        Ok((header, head, payload))
    }
}

struct Writer<'a> {
    buf: &'a mut [u8; HEADER_LEN],
    at: usize,
}

impl Writer<'_> {
    fn put(&mut self, bytes: &[u8]) {
        self.buf[self.at..self.at + bytes.len()].copy_from_slice(bytes);
        self.at += bytes.len();
    }
}

/// Fixed-size reads over a slice already known to hold `HEADER_LEN` bytes.
struct Reader<'a> {
    buf: &'a [u8],
    at: usize,
}

impl Reader<'_> {
    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.at..self.at + N]);
        self.at += N;
        out
    }
}
