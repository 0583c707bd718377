//! Packet values handed to a transport.
//!
//! Wire serialization belongs to the transport; these types only carry data.

use serde::Serialize;

/// A key paired with an untyped byte payload.
///
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawData {
    key: String,
    data: Vec<u8>,
}

impl RawData {
    pub fn new(key: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            data: data.into(),
        }
    }

    /// The identifying key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The payload bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Any packet a transport accepts for sending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Packet {
    RawData(RawData),
}

impl Packet {
    /// Short name used in trace events.
    pub fn kind(&self) -> &'static str {
        match self {
            Packet::RawData(_) => "raw_data",
        }
    }

    pub fn as_raw_data(&self) -> Option<&RawData> {
        match self {
            Packet::RawData(raw) => Some(raw),
        }
    }
}

impl From<RawData> for Packet {
    fn from(raw: RawData) -> Self {
        Packet::RawData(raw)
    }
}
