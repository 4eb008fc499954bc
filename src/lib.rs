//! OpenPGP packet framing.
//!
//! An OpenPGP message is a sequence of self-describing, variable-length
//! records called packets.  Before any of a message's content can be
//! interpreted, the raw byte stream has to be partitioned into those
//! records: every packet starts with a header that carries the packet's
//! so-called tag and the declared length of its body.  This crate
//! implements exactly that layer, as defined by [Section 4.2 of RFC
//! 4880]: given an in-memory buffer, [`Packet::from_bytes`] extracts
//! the tag, the header and body lengths, and the body bytes of the
//! packet the buffer starts with, or fails with a precisely classified
//! [`Error`].
//!
//!   [Section 4.2 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-4.2
//!
//! The body is opaque to this crate: no packet type is interpreted, no
//! cryptography is performed, and no I/O is done.  Decoding is a pure
//! function over the buffer, so it is safe to call concurrently, even
//! on the same read-only buffer.
//!
//! Only the old packet format ([Section 4.2.1 of RFC 4880]) is decoded.
//! The new packet format and old-format packets of indeterminate
//! length are recognized, but fail with
//! [`Error::UnsupportedEncoding`] naming the unsupported variant.
//!
//!   [Section 4.2.1 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-4.2.1
//!
//! # Examples
//!
//! ```
//! use pgp_framing::Packet;
//!
//! // A public-key packet (tag 6) with a three-byte body, followed by
//! // the first octet of the next packet.
//! let buf = [0x98, 0x03, 0x01, 0x02, 0x03, 0x99];
//!
//! let packet = Packet::from_bytes(&buf)?;
//! assert_eq!(packet.tag(), 6);
//! assert_eq!(packet.header_length(), 2);
//! assert_eq!(packet.packet_length(), 3);
//! assert_eq!(packet.content(), &[0x01, 0x02, 0x03]);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! To walk a multi-packet message, advance a cursor by
//! [`Packet::total_length`] after each decode:
//!
//! ```no_run
//! use pgp_framing::Packet;
//!
//! # let buf: Vec<u8> = Vec::new();
//! let mut offset = 0;
//! while offset < buf.len() {
//!     let packet = Packet::from_bytes(&buf[offset..])?;
//!     offset += packet.total_length() as usize;
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

#![warn(missing_docs)]

pub mod ctb;

pub mod packet;
pub use packet::{BodyLength, Header, Packet};

pub mod parse;
pub mod serialize;

/// Crate result specialization.
pub type Result<T, E = anyhow::Error> = ::std::result::Result<T, E>;

/// Errors returned by this crate.
#[non_exhaustive]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The input buffer contains no data at all.
    #[error("Empty input")]
    EmptyInput,

    /// A malformed packet.
    ///
    /// The buffer does not begin at a packet boundary, the header's
    /// length field is truncated, or the buffer ends before the
    /// declared end of the packet.
    #[error("Malformed packet: {0}")]
    MalformedPacket(String),

    /// A syntactically valid framing variant this crate does not
    /// decode.
    ///
    /// Carries the name of the variant that was encountered (the new
    /// packet format, or the old format's indeterminate length).
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
