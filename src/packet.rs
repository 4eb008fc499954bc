//! Packet-related types.
//!
//! See [Section 4 of RFC 4880] for more details.
//!
//!   [Section 4 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-4

use crate::ctb::{CTB, CTBOld, PacketLengthType};
use crate::{Error, Result};

/// The size of a packet.
///
/// A packet's size can be expressed in three different ways.  Either
/// the size of the packet is fully known (`Full`), the packet is
/// chunked using the new format's partial body encoding (`Partial`),
/// or the packet extends to the end of the data (`Indeterminate`).
/// See [Section 4.2 of RFC 4880] for more details.
///
///   [Section 4.2 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-4.2
///
/// Only `Full` lengths can be decoded into a [`Packet`]; the other
/// two variants exist so that the unsupported encodings are
/// represented, not guessed at.
///
///   [`Packet`]: struct.Packet.html
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyLength {
    /// The packet's size is known.
    Full(u32),
    /// The parameter is the number of bytes in the current chunk.
    /// This type is only used with new format packets.
    Partial(u32),
    /// The packet extends until an EOF is encountered.  This type is
    /// only used with old format packets.
    Indeterminate,
}

/// An OpenPGP packet's header.
///
/// The header is the CTB octet plus the length field selected by it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    /// The packet's CTB.
    ctb: CTB,
    /// The packet's length.
    length: BodyLength,
}

impl Header {
    /// Creates a new header.
    pub fn new(ctb: CTB, length: BodyLength) -> Self {
        Header { ctb, length }
    }

    /// Returns the packet's CTB.
    pub fn ctb(&self) -> &CTB {
        &self.ctb
    }

    /// Returns the packet's length.
    pub fn length(&self) -> &BodyLength {
        &self.length
    }
}

/// A decoded packet.
///
/// A packet pairs the fields of its header with the body bytes the
/// header declared.  The body is owned by the packet and opaque to
/// this crate; its meaning is determined by the tag, which this crate
/// stores but never interprets.
///
/// A packet is immutable once constructed.  It is produced either by
/// [`Packet::from_bytes`], or by [`Packet::new`] when composing a
/// message.
///
/// [`Packet::from_bytes`]: #method.from_bytes
/// [`Packet::new`]: #method.new
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Packet {
    pub(crate) tag: u8,
    pub(crate) new_format: bool,
    pub(crate) header_length: u32,
    pub(crate) packet_length: u32,
    pub(crate) content: Vec<u8>,
}

impl Packet {
    /// Creates a packet from a tag and a body.
    ///
    /// The header fields are derived: the length type is chosen
    /// minimally for the body's size, fixing the header's length, and
    /// the packet uses the old format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the tag is above 15 or
    /// the body is too large to be declared in four octets.
    ///
    /// [`Error::InvalidArgument`]: ../enum.Error.html#variant.InvalidArgument
    pub fn new(tag: u8, content: Vec<u8>) -> Result<Self> {
        if content.len() > u32::MAX as usize {
            return Err(Error::InvalidArgument(
                format!("Body too large: {} bytes", content.len())).into());
        }
        let packet_length = content.len() as u32;

        // Computes the length type, and checks the tag's range.
        let ctb = CTBOld::new(tag, BodyLength::Full(packet_length))?;
        let header_length = 1 + match ctb.length_type {
            PacketLengthType::OneOctet => 1,
            PacketLengthType::TwoOctets => 2,
            PacketLengthType::FourOctets => 4,
            PacketLengthType::Indeterminate => 0,
        };

        Ok(Packet {
            tag,
            new_format: false,
            header_length,
            packet_length,
            content,
        })
    }

    /// Returns the packet's tag.
    pub fn tag(&self) -> u8 {
        self.tag
    }

    /// Returns whether the packet uses the new packet format.
    pub fn new_format(&self) -> bool {
        self.new_format
    }

    /// Returns the number of bytes occupied by the packet's header.
    ///
    /// For old-format packets this is 2, 3, or 5: the CTB octet plus
    /// a one-, two-, or four-octet length field.
    pub fn header_length(&self) -> u32 {
        self.header_length
    }

    /// Returns the declared length of the packet's body.
    pub fn packet_length(&self) -> u32 {
        self.packet_length
    }

    /// Returns the packet's body.
    ///
    /// Exactly [`packet_length`] bytes.
    ///
    /// [`packet_length`]: #method.packet_length
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Returns the packet's total size, header included.
    ///
    /// This is the stride by which to advance a cursor when walking a
    /// multi-packet message.  The sum is returned as a `u64` as it can
    /// exceed 32 bits.
    pub fn total_length(&self) -> u64 {
        self.header_length as u64 + self.packet_length as u64
    }
}
