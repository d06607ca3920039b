//! Opaque packet-buffer handle.

use std::fmt;

/// An owned packet buffer threaded through the fabric.
///
/// The fabric core treats a `Frame` purely as a routing token: it never
/// inspects the payload, it only hands the buffer to the driver for tag
/// insertion or tag lookup. Byte access exists for drivers, which own the
/// tagging format.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    data: Vec<u8>,
}

impl Frame {
    /// Wraps an owned buffer.
    pub fn new(data: Vec<u8>) -> Self {
        Frame { data }
    }

    /// Returns the buffer contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the buffer length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consumes the frame, returning the underlying buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Payloads can be large; show length only.
        write!(f, "Frame({} bytes)", self.data.len())
    }
}

impl From<Vec<u8>> for Frame {
    fn from(data: Vec<u8>) -> Self {
        Frame::new(data)
    }
}

impl From<&[u8]> for Frame {
    fn from(data: &[u8]) -> Self {
        Frame::new(data.to_vec())
    }
}
