//! Packet framing serializer.
//!
//! Emits old-format packet headers as described in [Section 4.2.1 of
//! RFC 4880], choosing the minimal length encoding for the body.
//! This is the inverse of the parser, and what the round-trip tests
//! and message composition build on.
//!
//!   [Section 4.2.1 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-4.2.1

use std::io;

use crate::ctb::{CTB, CTBNew, CTBOld};
use crate::packet::{BodyLength, Header, Packet};
use crate::{Error, Result};

/// Packet framing serialization.
pub trait Serialize {
    /// Writes a serialized version of the object to `o`.
    fn serialize<W: io::Write>(&self, o: &mut W) -> Result<()>;

    /// Serializes the object to a vector.
    fn to_vec(&self) -> Result<Vec<u8>> {
        let mut o = Vec::new();
        self.serialize(&mut o)?;
        Ok(o)
    }
}

impl Serialize for CTBOld {
    fn serialize<W: io::Write>(&self, o: &mut W) -> Result<()> {
        let length_type: u8 = self.length_type.into();
        o.write_all(&[0b1000_0000u8 | (self.common.tag << 2) | length_type])?;
        Ok(())
    }
}

impl Serialize for CTBNew {
    fn serialize<W: io::Write>(&self, o: &mut W) -> Result<()> {
        o.write_all(&[0b1100_0000u8 | self.common.tag])?;
        Ok(())
    }
}

impl Serialize for CTB {
    fn serialize<W: io::Write>(&self, o: &mut W) -> Result<()> {
        match self {
            CTB::New(c) => c.serialize(o),
            CTB::Old(c) => c.serialize(o),
        }
    }
}

impl BodyLength {
    /// Emits the length encoded for use with old-style CTBs.
    ///
    /// Note: the CTB itself is not emitted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if invoked on
    /// [`BodyLength::Partial`], which the old format cannot express.
    ///
    /// [`Error::InvalidArgument`]: ../enum.Error.html#variant.InvalidArgument
    /// [`BodyLength::Partial`]: ../packet/enum.BodyLength.html#variant.Partial
    pub fn serialize_old<W: io::Write>(&self, o: &mut W) -> Result<()> {
        // Assume an optimal encoding is desired.
        match *self {
            BodyLength::Full(l) => {
                match l {
                    // One octet length.
                    0..=0xFF =>
                        o.write_all(&[l as u8])?,
                    // Two octet length.
                    0x1_00..=0xFF_FF =>
                        o.write_all(&(l as u16).to_be_bytes())?,
                    // Four octet length,
                    _ =>
                        o.write_all(&l.to_be_bytes())?,
                }
            },
            // No length field at all.
            BodyLength::Indeterminate => (),
            BodyLength::Partial(_) =>
                return Err(Error::InvalidArgument(
                    "Partial body lengths are not supported \
                     for old format packets".into()).into()),
        }
        Ok(())
    }
}

impl Serialize for Header {
    /// Emits the header: the CTB octet, then the length field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedEncoding`] for new-format headers,
    /// whose length encoding is not implemented; nothing is written
    /// in that case.
    ///
    /// [`Error::UnsupportedEncoding`]: ../enum.Error.html#variant.UnsupportedEncoding
    fn serialize<W: io::Write>(&self, o: &mut W) -> Result<()> {
        match self.ctb() {
            CTB::Old(ctb) => {
                ctb.serialize(o)?;
                self.length().serialize_old(o)
            },
            CTB::New(_) =>
                Err(Error::UnsupportedEncoding(
                    "new format packet".into()).into()),
        }
    }
}

impl Serialize for Packet {
    /// Emits the packet: the header, then the content.
    ///
    /// The length type is chosen minimally for the content's size,
    /// like [`Packet::new`] does, so a parsed packet serializes back
    /// to its original bytes.
    ///
    /// [`Packet::new`]: ../packet/struct.Packet.html#method.new
    fn serialize<W: io::Write>(&self, o: &mut W) -> Result<()> {
        if self.new_format() {
            return Err(Error::UnsupportedEncoding(
                "new format packet".into()).into());
        }

        let length = BodyLength::Full(self.packet_length());
        let ctb = CTBOld::new(self.tag(), length)?;
        ctb.serialize(o)?;
        length.serialize_old(o)?;
        o.write_all(self.content())?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ctb_octet() {
        let ctb = CTBOld::new(6, BodyLength::Full(3)).unwrap();
        assert_eq!(ctb.to_vec().unwrap(), [0x98]);

        let ctb = CTBOld::new(15, BodyLength::Full(0x1_00_00)).unwrap();
        assert_eq!(ctb.to_vec().unwrap(), [0xBE]);

        assert_eq!(CTBNew::new(20).to_vec().unwrap(), [0xD4]);

        // Old-format CTBs cannot express tags above 15.
        match CTBOld::new(16, BodyLength::Full(0)).unwrap_err()
            .downcast::<Error>().unwrap()
        {
            Error::InvalidArgument(_) => (),
            e => panic!("unexpected error: {}", e),
        }
    }

    #[test]
    fn length_field() {
        fn test(l: u32, expected: &[u8]) {
            let mut o = Vec::new();
            BodyLength::Full(l).serialize_old(&mut o).unwrap();
            assert_eq!(&o[..], expected);
        }

        test(0, &[0]);
        test(0xFF, &[0xFF]);
        test(0x1_00, &[0x01, 0x00]);
        test(0xFF_FF, &[0xFF, 0xFF]);
        test(0x1_00_00, &[0x00, 0x01, 0x00, 0x00]);
        test(0xDE_AD_BE_EF, &[0xDE, 0xAD, 0xBE, 0xEF]);

        let mut o = Vec::new();
        BodyLength::Indeterminate.serialize_old(&mut o).unwrap();
        assert!(o.is_empty());

        match BodyLength::Partial(512).serialize_old(&mut o).unwrap_err()
            .downcast::<Error>().unwrap()
        {
            Error::InvalidArgument(_) => (),
            e => panic!("unexpected error: {}", e),
        }
    }

    #[test]
    fn header() {
        let ctb = CTBOld::new(1, BodyLength::Full(3)).unwrap();
        let header = Header::new(CTB::Old(ctb), BodyLength::Full(3));
        assert_eq!(header.to_vec().unwrap(), [0x84, 0x03]);

        let header = Header::new(CTB::New(CTBNew::new(1)),
                                 BodyLength::Full(3));
        match header.to_vec().unwrap_err().downcast::<Error>().unwrap() {
            Error::UnsupportedEncoding(_) => (),
            e => panic!("unexpected error: {}", e),
        }
    }

    #[test]
    fn packet() {
        let packet = Packet::new(1, b"ABC".to_vec()).unwrap();
        assert_eq!(packet.to_vec().unwrap(),
                   [0x84, 0x03, b'A', b'B', b'C']);
    }
}
