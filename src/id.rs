// Entity identifiers - storage-agnostic, 12 bytes, 24 hex chars on the wire
use chrono::{DateTime, TimeZone, Utc};
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;
use thiserror::Error;

const ID_LEN: usize = 12;
const COUNTER_MASK: u32 = 0x00ff_ffff;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdParseError {
    #[error("invalid id length: expected 24 hex characters, got {0}")]
    InvalidLength(usize),

    #[error("invalid id: not a hex string")]
    InvalidHex,
}

/// Opaque identifier shared by every stored entity.
///
/// Layout: 4-byte big-endian unix seconds, 5 process-random bytes and a
/// 3-byte big-endian counter, so ids from one process never collide and
/// sort roughly by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId([u8; ID_LEN]);

#[allow(clippy::new_without_default)]
impl EntityId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        let secs = seconds_field(Utc::now().timestamp());
        let count = next_count();

        let mut bytes = [0u8; ID_LEN];
        bytes[0..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(process_bytes());
        bytes[9..12].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(bytes)
    }

    /// Parse the 24-character hex form.
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        if s.len() != ID_LEN * 2 {
            return Err(IdParseError::InvalidLength(s.len()));
        }
        let mut bytes = [0u8; ID_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| IdParseError::InvalidHex)?;
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Creation time embedded in the id (second precision).
    pub fn timestamp(&self) -> DateTime<Utc> {
        let secs = u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]]);
        Utc.timestamp_opt(i64::from(secs), 0)
            .single()
            .unwrap_or(DateTime::UNIX_EPOCH)
    }
}

// Seconds outside the u32 range saturate instead of wrapping.
fn seconds_field(secs: i64) -> u32 {
    u32::try_from(secs.max(0)).unwrap_or(u32::MAX)
}

fn process_bytes() -> &'static [u8; 5] {
    static PROCESS: OnceLock<[u8; 5]> = OnceLock::new();
    PROCESS.get_or_init(|| rand::thread_rng().gen())
}

fn next_count() -> u32 {
    static COUNTER: OnceLock<AtomicU32> = OnceLock::new();
    let counter =
        COUNTER.get_or_init(|| AtomicU32::new(rand::thread_rng().gen_range(0..=COUNTER_MASK)));
    counter.fetch_add(1, Ordering::Relaxed) & COUNTER_MASK
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for EntityId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
