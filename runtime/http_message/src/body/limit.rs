use serde::Deserialize;
use ubyte::{ByteUnit, ToByteUnit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
/// An upper limit on the size of the bodies that [`BodyParser`](super::BodyParser) is willing to decode.
///
/// The limit only applies to bodies with a recognized `Content-Type`:
/// bodies that are not decoded are never inspected.
pub enum BodySizeLimit {
    /// There is an active limit on the size of decoded bodies.
    Enabled {
        /// The maximum size of a decoded body, in bytes.
        max_size: ByteUnit,
    },
    /// There is no limit on the size of decoded bodies.
    Disabled,
}

impl BodySizeLimit {
    /// The maximum body size, if the limit is enabled.
    pub fn max_size(&self) -> Option<ByteUnit> {
        match self {
            BodySizeLimit::Enabled { max_size } => Some(*max_size),
            BodySizeLimit::Disabled => None,
        }
    }
}

impl Default for BodySizeLimit {
    fn default() -> Self {
        Self::Enabled {
            max_size: 2.megabytes(),
        }
    }
}
