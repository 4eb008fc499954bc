//! Cipher Type Byte.
//!
//! The first octet of every packet header is the CTB.  It carries the
//! packet's tag, selects between the old and the new packet format,
//! and, for old-format packets, selects the width of the following
//! length field.  See [Section 4.2 of RFC 4880] for more details.
//!
//!   [Section 4.2 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-4.2

use std::ops::Deref;

use crate::packet::BodyLength;
use crate::{Error, Result};

/// Fields shared by the two CTB variants.
///
/// OpenPGP defines two packet formats: the old and the new format.
/// They both include the packet's so-called tag.
///
/// See [Section 4.2 of RFC 4880] for more details.
///
///   [Section 4.2 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-4.2
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CTBCommon {
    /// The packet's tag.
    ///
    /// The tag identifies the kind of payload the packet's body holds.
    /// This crate stores the tag without interpreting it.
    pub tag: u8,
}

/// The new CTB format.
///
/// A new-format CTB devotes its low six bits to the tag; the packet's
/// length follows in a variable-length encoding of its own.  This
/// crate recognizes new-format CTBs but does not decode their length
/// encoding.
///
/// See [Section 4.2 of RFC 4880] for more details.
///
///   [Section 4.2 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-4.2
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CTBNew {
    /// Fields common to all CTB formats.
    pub common: CTBCommon,
}

impl CTBNew {
    /// Constructs a new-style CTB.
    pub fn new(tag: u8) -> Self {
        CTBNew {
            common: CTBCommon {
                tag,
            },
        }
    }
}

// Allow transparent access of common fields.
impl Deref for CTBNew {
    type Target = CTBCommon;

    fn deref(&self) -> &Self::Target {
        &self.common
    }
}

/// The PacketLengthType is used as part of the [old CTB], and
/// determines the width of the length field that follows it.
///
/// See [Section 4.2.1 of RFC 4880] for more details.
///
///   [Section 4.2.1 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-4.2.1
///   [old CTB]: struct.CTBOld.html
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacketLengthType {
    /// A one-octet length field.
    OneOctet = 0,
    /// A two-octet big-endian length field.
    TwoOctets = 1,
    /// A four-octet big-endian length field.
    FourOctets = 2,
    /// No length field; the packet extends to the end of the data.
    Indeterminate = 3,
}

impl PacketLengthType {
    /// Converts a numeric value to an `Option<PacketLengthType>`.
    ///
    /// Returns None, if the value is out of range (outside of 0-3).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pgp_framing::ctb::PacketLengthType;
    ///
    /// assert_eq!(PacketLengthType::from_numeric(1),
    ///            Some(PacketLengthType::TwoOctets));
    /// ```
    pub fn from_numeric(value: u8) -> Option<Self> {
        match value {
            0 => Some(PacketLengthType::OneOctet),
            1 => Some(PacketLengthType::TwoOctets),
            2 => Some(PacketLengthType::FourOctets),
            3 => Some(PacketLengthType::Indeterminate),
            _ => None,
        }
    }

    /// Converts a `PacketLengthType` to its numeric value.
    pub fn to_numeric(self) -> u8 {
        self as u8
    }
}

impl From<PacketLengthType> for u8 {
    fn from(l: PacketLengthType) -> Self {
        l.to_numeric()
    }
}

/// The old CTB format.
///
/// See [Section 4.2 of RFC 4880] for more details.
///
///   [Section 4.2 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-4.2
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CTBOld {
    /// Fields common to all CTB formats.
    pub common: CTBCommon,
    /// The length encoding used by the packet.
    pub length_type: PacketLengthType,
}

impl CTBOld {
    /// Constructs an old-style CTB.
    ///
    /// The length type is chosen minimally for `length`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the tag or body length
    /// cannot be expressed using an old-style CTB.
    ///
    /// [`Error::InvalidArgument`]: ../enum.Error.html#variant.InvalidArgument
    pub fn new(tag: u8, length: BodyLength) -> Result<Self> {
        // An old-format CTB has four tag bits.
        if tag > 15 {
            return Err(Error::InvalidArgument(
                format!("Only tags 0-15 are supported, got: {}", tag)).into());
        }

        let length_type = match length {
            // Assume an optimal encoding.
            BodyLength::Full(l) => {
                match l {
                    // One octet length.
                    0..=0xFF => PacketLengthType::OneOctet,
                    // Two octet length.
                    0x1_00..=0xFF_FF => PacketLengthType::TwoOctets,
                    // Four octet length,
                    _ => PacketLengthType::FourOctets,
                }
            },
            BodyLength::Partial(_) =>
                return Err(Error::InvalidArgument(
                    "Partial body lengths are not supported \
                     for old format packets".into()).into()),
            BodyLength::Indeterminate =>
                PacketLengthType::Indeterminate,
        };
        Ok(CTBOld {
            common: CTBCommon {
                tag,
            },
            length_type,
        })
    }
}

// Allow transparent access of common fields.
impl Deref for CTBOld {
    type Target = CTBCommon;

    fn deref(&self) -> &Self::Target {
        &self.common
    }
}

/// A sum type for the different CTB variants.
///
/// There are two CTB variants: the [old CTB format] and the [new CTB
/// format].
///
///   [old CTB format]: struct.CTBOld.html
///   [new CTB format]: struct.CTBNew.html
///
/// Note: CTB stands for Cipher Type Byte.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CTB {
    /// A new-format CTB.
    New(CTBNew),
    /// An old-format CTB.
    Old(CTBOld),
}

impl CTB {
    /// Parses a CTB from its encoded octet, the first octet of a
    /// packet header.
    ///
    /// Bit 7 of the octet must be set; a ptag with bit 7 clear does
    /// not start a packet, and yields [`Error::MalformedPacket`].
    /// Bit 6 selects the format.  An old-format ptag devotes bits 5-2
    /// to the tag and bits 1-0 to the length type; a new-format ptag
    /// devotes bits 5-0 to the tag.
    ///
    /// [`Error::MalformedPacket`]: ../enum.Error.html#variant.MalformedPacket
    pub fn from_ptag(ptag: u8) -> Result<CTB> {
        // The high bit of the ptag must be set.
        if ptag & 0b1000_0000 == 0 {
            return Err(Error::MalformedPacket(
                format!("Malformed CTB: MSB of ptag ({:#04x}) not set", ptag))
                       .into());
        }

        if ptag & 0b0100_0000 != 0 {
            // New format.
            Ok(CTB::New(CTBNew::new(ptag & 0b0011_1111)))
        } else {
            // Old format.
            let length_type = match ptag & 0b0000_0011 {
                0 => PacketLengthType::OneOctet,
                1 => PacketLengthType::TwoOctets,
                2 => PacketLengthType::FourOctets,
                _ => PacketLengthType::Indeterminate,
            };
            Ok(CTB::Old(CTBOld {
                common: CTBCommon {
                    tag: (ptag & 0b0011_1100) >> 2,
                },
                length_type,
            }))
        }
    }
}

// Allow transparent access of common fields.
impl Deref for CTB {
    type Target = CTBCommon;

    fn deref(&self) -> &Self::Target {
        match self {
            CTB::New(ctb) => &ctb.common,
            CTB::Old(ctb) => &ctb.common,
        }
    }
}
