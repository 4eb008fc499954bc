//! Packet framing parser.
//!
//! Decodes packet headers and bodies from an in-memory buffer, as
//! described in [Section 4.2 of RFC 4880].  Decoding is a pure
//! function over the buffer: no I/O, no state between calls.
//!
//!   [Section 4.2 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-4.2

use crate::ctb::{CTB, PacketLengthType};
use crate::packet::{BodyLength, Header, Packet};
use crate::{Error, Result};

impl BodyLength {
    /// Decodes an old format body length as described in [Section
    /// 4.2.1 of RFC 4880].
    ///
    /// `data` are the octets following the CTB.  Octets beyond the
    /// length field are ignored; a field truncated by the end of
    /// `data` is an error, and nothing past `data` is ever read.
    ///
    ///   [Section 4.2.1 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-4.2.1
    pub(crate) fn parse_old_format(data: &[u8],
                                   length_type: PacketLengthType)
                                   -> Result<BodyLength>
    {
        match length_type {
            PacketLengthType::OneOctet => {
                if data.is_empty() {
                    return Err(Error::MalformedPacket(
                        "Truncated length field".into()).into());
                }
                Ok(BodyLength::Full(data[0] as u32))
            },
            PacketLengthType::TwoOctets => {
                if data.len() < 2 {
                    return Err(Error::MalformedPacket(
                        "Truncated length field".into()).into());
                }
                Ok(BodyLength::Full(((data[0] as u32) << 8)
                                    | data[1] as u32))
            },
            PacketLengthType::FourOctets => {
                if data.len() < 4 {
                    return Err(Error::MalformedPacket(
                        "Truncated length field".into()).into());
                }
                Ok(BodyLength::Full(((data[0] as u32) << 24)
                                    | ((data[1] as u32) << 16)
                                    | ((data[2] as u32) << 8)
                                    | data[3] as u32))
            },
            PacketLengthType::Indeterminate =>
                Ok(BodyLength::Indeterminate),
        }
    }
}

impl Header {
    /// Parses an OpenPGP packet's header as described in [Section 4.2
    /// of RFC 4880].
    ///
    ///   [Section 4.2 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-4.2
    ///
    /// Only the header octets are examined: this succeeds on a buffer
    /// holding a complete header but a truncated body, so a caller
    /// can still learn the declared length of a truncated packet.
    pub fn parse(data: &[u8]) -> Result<Header> {
        let ptag = *data.first().ok_or(Error::EmptyInput)?;
        let ctb = CTB::from_ptag(ptag)?;
        let length = match &ctb {
            // The new format's length encoding is not decoded yet;
            // its decoder slots into this arm.
            CTB::New(_) =>
                return Err(Error::UnsupportedEncoding(
                    "new format packet".into()).into()),
            CTB::Old(ctb) =>
                BodyLength::parse_old_format(&data[1..], ctb.length_type)?,
        };
        Ok(Header::new(ctb, length))
    }
}

impl Packet {
    /// Parses the packet `data` starts with.
    ///
    /// `data` may extend past the packet: trailing octets are ignored,
    /// so successive packets of a message can be decoded from one
    /// buffer at increasing offsets.  In fact the buffer is required
    /// to hold strictly more than `header_length + packet_length`
    /// octets; a buffer ending exactly at the packet boundary is
    /// rejected as truncated.
    ///
    /// # Errors
    ///
    ///   - [`Error::EmptyInput`] if `data` is empty.
    ///   - [`Error::MalformedPacket`] if `data` does not start at a
    ///     packet boundary (bit 7 of the first octet unset), or the
    ///     length field or body is truncated.
    ///   - [`Error::UnsupportedEncoding`] for new-format packets and
    ///     old-format packets of indeterminate length.
    ///
    /// [`Error::EmptyInput`]: ../enum.Error.html#variant.EmptyInput
    /// [`Error::MalformedPacket`]: ../enum.Error.html#variant.MalformedPacket
    /// [`Error::UnsupportedEncoding`]: ../enum.Error.html#variant.UnsupportedEncoding
    pub fn from_bytes(data: &[u8]) -> Result<Packet> {
        let header = Header::parse(data)?;
        let (tag, length_type) = match header.ctb() {
            CTB::Old(ctb) => (ctb.common.tag, ctb.length_type),
            // Header::parse does not produce new-format headers.
            CTB::New(_) =>
                return Err(Error::UnsupportedEncoding(
                    "new format packet".into()).into()),
        };

        let header_length: u32 = match length_type {
            PacketLengthType::OneOctet => 2,
            PacketLengthType::TwoOctets => 3,
            PacketLengthType::FourOctets => 5,
            PacketLengthType::Indeterminate => 1,
        };
        let packet_length = match *header.length() {
            BodyLength::Full(l) => l,
            BodyLength::Indeterminate =>
                return Err(Error::UnsupportedEncoding(
                    "indeterminate length packet".into()).into()),
            BodyLength::Partial(_) =>
                return Err(Error::UnsupportedEncoding(
                    "partial body length".into()).into()),
        };

        // The buffer must extend past the declared end of the packet.
        // u64: the sum can overflow 32 bits.
        let total = header_length as u64 + packet_length as u64;
        if data.len() as u64 <= total {
            return Err(Error::MalformedPacket(
                format!("Truncated packet: expected more than {} bytes, \
                         got {}", total, data.len())).into());
        }

        let start = header_length as usize;
        Ok(Packet {
            tag,
            new_format: false,
            header_length,
            packet_length,
            content: data[start..start + packet_length as usize].to_vec(),
        })
    }
}

#[cfg(test)]
fn unwrap_err<T>(r: Result<T>) -> Error {
    r.err().expect("expected an error").downcast::<Error>()
        .expect("expected a framing error")
}

#[test]
fn body_length_old_format() {
    fn test(input: &[u8], plt: PacketLengthType, expected_result: BodyLength) {
        assert_eq!(BodyLength::parse_old_format(input, plt).unwrap(),
                   expected_result);
    }

    test(&[1], PacketLengthType::OneOctet, BodyLength::Full(1));
    test(&[1, 2], PacketLengthType::TwoOctets,
         BodyLength::Full((1 << 8) + 2));
    test(&[1, 2, 3, 4], PacketLengthType::FourOctets,
         BodyLength::Full((1 << 24) + (2 << 16) + (3 << 8) + 4));
    // Octets past the length field are ignored.
    test(&[1, 2, 3, 4, 5, 6], PacketLengthType::FourOctets,
         BodyLength::Full((1 << 24) + (2 << 16) + (3 << 8) + 4));
    test(&[], PacketLengthType::Indeterminate, BodyLength::Indeterminate);

    // Truncated length fields.
    for (input, plt) in &[
        (&[][..], PacketLengthType::OneOctet),
        (&[1][..], PacketLengthType::TwoOctets),
        (&[1, 2, 3][..], PacketLengthType::FourOctets),
    ] {
        match unwrap_err(BodyLength::parse_old_format(input, *plt)) {
            Error::MalformedPacket(_) => (),
            e => panic!("unexpected error: {}", e),
        }
    }
}

#[test]
fn ptag() {
    // Old format, tag 6, one-octet length.
    match CTB::from_ptag(0x98).unwrap() {
        CTB::Old(ctb) => {
            assert_eq!(ctb.common.tag, 6);
            assert_eq!(ctb.length_type, PacketLengthType::OneOctet);
        },
        ctb => panic!("unexpected CTB: {:?}", ctb),
    }

    // Old format, all tag bits set, indeterminate length.
    match CTB::from_ptag(0xBF).unwrap() {
        CTB::Old(ctb) => {
            assert_eq!(ctb.common.tag, 15);
            assert_eq!(ctb.length_type, PacketLengthType::Indeterminate);
        },
        ctb => panic!("unexpected CTB: {:?}", ctb),
    }

    // New format, tag 20.
    match CTB::from_ptag(0xD4).unwrap() {
        CTB::New(ctb) => assert_eq!(ctb.common.tag, 20),
        ctb => panic!("unexpected CTB: {:?}", ctb),
    }

    // The common fields are reachable through either variant.
    let ctb = CTB::from_ptag(0x98).unwrap();
    let common: &crate::ctb::CTBCommon = &ctb;
    assert_eq!(common.tag, 6);

    // Bit 7 unset: not a packet boundary, whatever the rest looks like.
    for ptag in &[0x00u8, 0x04, 0x3C, 0x7F] {
        match unwrap_err(CTB::from_ptag(*ptag)) {
            Error::MalformedPacket(_) => (),
            e => panic!("unexpected error: {}", e),
        }
    }
}

#[test]
fn empty_input() {
    assert_eq!(unwrap_err(Packet::from_bytes(&[])), Error::EmptyInput);
    assert_eq!(unwrap_err(Header::parse(&[])), Error::EmptyInput);
}

#[test]
fn unsupported_encodings() {
    // New format packet, even a plausible one.
    assert_eq!(unwrap_err(Packet::from_bytes(&[0xC6, 0x03, 1, 2, 3, 0])),
               Error::UnsupportedEncoding("new format packet".into()));

    // Old format, indeterminate length.
    assert_eq!(unwrap_err(Packet::from_bytes(&[0x87, 1, 2, 3, 0])),
               Error::UnsupportedEncoding(
                   "indeterminate length packet".into()));
}

#[test]
fn truncated_header() {
    // Two-octet length field, one octet present.
    match unwrap_err(Packet::from_bytes(&[0x81, 0x00])) {
        Error::MalformedPacket(_) => (),
        e => panic!("unexpected error: {}", e),
    }

    // Four-octet length field, three octets present.
    match unwrap_err(Packet::from_bytes(&[0x82, 0x00, 0x00, 0x00])) {
        Error::MalformedPacket(_) => (),
        e => panic!("unexpected error: {}", e),
    }
}

#[test]
fn exactly_sized_buffer_rejected() {
    // The buffer ends exactly at the packet boundary; one more octet
    // is required.
    let buf = [0x84, 0x03, b'A', b'B', b'C'];
    match unwrap_err(Packet::from_bytes(&buf)) {
        Error::MalformedPacket(_) => (),
        e => panic!("unexpected error: {}", e),
    }

    // The header alone still parses, and declares the body's length.
    let header = Header::parse(&buf).unwrap();
    assert_eq!(header.length(), &BodyLength::Full(3));
}

#[test]
fn one_octet_length() {
    let buf = [0x84, 0x03, b'A', b'B', b'C', 0x00];
    let packet = Packet::from_bytes(&buf).unwrap();
    assert_eq!(packet.tag(), 1);
    assert!(!packet.new_format());
    assert_eq!(packet.header_length(), 2);
    assert_eq!(packet.packet_length(), 3);
    assert_eq!(packet.content(), b"ABC");
    assert_eq!(packet.total_length(), 5);
}

#[test]
fn two_octet_length() {
    let buf = [0x81, 0x00, 0x02, b'X', b'Y', 0x00];
    let packet = Packet::from_bytes(&buf).unwrap();
    assert_eq!(packet.tag(), 0);
    assert_eq!(packet.header_length(), 3);
    assert_eq!(packet.packet_length(), 2);
    assert_eq!(packet.content(), b"XY");
}

#[test]
fn four_octet_length() {
    let buf = [0x86, 0x00, 0x00, 0x00, 0x03, b'X', b'Y', b'Z', 0x00];
    let packet = Packet::from_bytes(&buf).unwrap();
    assert_eq!(packet.tag(), 1);
    assert_eq!(packet.header_length(), 5);
    assert_eq!(packet.packet_length(), 3);
    assert_eq!(packet.content(), b"XYZ");
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::serialize::Serialize;

    quickcheck::quickcheck! {
        fn packet_roundtrip(tag: u8, body: Vec<u8>) -> bool {
            let tag = tag & 0x0F;
            let packet = Packet::new(tag, body).unwrap();
            let mut buf = packet.to_vec().unwrap();
            // One octet past the declared end of the packet.
            buf.push(0x00);
            let decoded = Packet::from_bytes(&buf).unwrap();
            decoded == packet
                && decoded.total_length() == (buf.len() - 1) as u64
        }

        fn truncation_rejected(tag: u8, body: Vec<u8>, cut: usize) -> bool {
            let tag = tag & 0x0F;
            let packet = Packet::new(tag, body).unwrap();
            // Without a trailing octet, every prefix is rejected,
            // including the full buffer.
            let buf = packet.to_vec().unwrap();
            let cut = cut % (buf.len() + 1);
            match unwrap_err(Packet::from_bytes(&buf[..cut])) {
                Error::EmptyInput => cut == 0,
                Error::MalformedPacket(_) => cut > 0,
                _ => false,
            }
        }
    }

    #[test]
    fn larger_bodies_roundtrip() {
        for (len, header_length) in &[(300usize, 3u32), (70_000, 5)] {
            let body: Vec<u8> =
                (0..*len).map(|i| (i % 251) as u8).collect();
            let packet = Packet::new(9, body).unwrap();
            assert_eq!(packet.header_length(), *header_length);

            let mut buf = packet.to_vec().unwrap();
            buf.push(0x00);
            assert_eq!(Packet::from_bytes(&buf).unwrap(), packet);
        }
    }
}
