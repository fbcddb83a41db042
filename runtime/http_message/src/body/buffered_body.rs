use bytes::Bytes;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// The body of an HTTP message, fully buffered in memory.
///
/// The buffer is an immutable snapshot: cloning a message (or a `BufferedBody`) shares
/// the underlying bytes without copying them, and no clone can observe another reading
/// from it, since there is no read cursor to move.
/// Decoding the body is therefore a pure function of these bytes and the declared
/// `Content-Type`.
///
/// An empty buffer stands for a missing body.
pub struct BufferedBody {
    /// The buffer of bytes that represents the body of the message.
    pub bytes: Bytes,
}

impl BufferedBody {
    /// A body with no content.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the body is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The size of the body, in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// The raw bytes of the body.
    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_ref()
    }
}

impl From<Bytes> for BufferedBody {
    fn from(bytes: Bytes) -> Self {
        Self { bytes }
    }
}

impl From<Vec<u8>> for BufferedBody {
    fn from(bytes: Vec<u8>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

impl From<String> for BufferedBody {
    fn from(s: String) -> Self {
        Self { bytes: s.into() }
    }
}

impl From<&'static str> for BufferedBody {
    fn from(s: &'static str) -> Self {
        Self {
            bytes: Bytes::from_static(s.as_bytes()),
        }
    }
}

impl From<&'static [u8]> for BufferedBody {
    fn from(bytes: &'static [u8]) -> Self {
        Self {
            bytes: Bytes::from_static(bytes),
        }
    }
}

impl From<BufferedBody> for Bytes {
    fn from(buffered_body: BufferedBody) -> Self {
        buffered_body.bytes
    }
}
