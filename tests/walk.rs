//! Walks multi-packet messages with repeated single-packet decodes.

use pgp_framing::serialize::Serialize;
use pgp_framing::{Error, Packet};

/// Serializes `packets` into one message buffer, with a trailing
/// octet so that the final packet decodes too.
fn compose(packets: &[Packet]) -> Vec<u8> {
    let mut message = Vec::new();
    for packet in packets {
        packet.serialize(&mut message).unwrap();
    }
    message.push(0x00);
    message
}

#[test]
fn walk_message() {
    let packets = vec![
        // One-octet length.
        Packet::new(6, vec![0x04; 10]).unwrap(),
        // Two-octet length.
        Packet::new(2, vec![0x55; 300]).unwrap(),
        // Four-octet length.
        Packet::new(11, (0..70_000).map(|i| (i % 251) as u8).collect())
            .unwrap(),
        // Empty body.
        Packet::new(13, Vec::new()).unwrap(),
    ];
    let message = compose(&packets);

    let mut offset = 0;
    let mut decoded = Vec::new();
    while offset + 1 < message.len() {
        let packet = Packet::from_bytes(&message[offset..]).unwrap();
        offset += packet.total_length() as usize;
        decoded.push(packet);
    }

    assert_eq!(decoded, packets);
    assert_eq!(decoded.iter().map(|p| p.header_length()).collect::<Vec<_>>(),
               vec![2, 3, 5, 2]);
    // The walk ends at the trailing octet.
    assert_eq!(offset, message.len() - 1);
}

#[test]
fn truncated_tail() {
    let packets = vec![
        Packet::new(1, b"first".to_vec()).unwrap(),
        Packet::new(2, b"second".to_vec()).unwrap(),
    ];
    let mut message = compose(&packets);
    // Lose the second packet's last body octet (and the trailing
    // octet with it).
    message.truncate(message.len() - 2);

    let first = Packet::from_bytes(&message).unwrap();
    assert_eq!(first.content(), b"first");

    let offset = first.total_length() as usize;
    match Packet::from_bytes(&message[offset..]).unwrap_err()
        .downcast::<Error>().unwrap()
    {
        Error::MalformedPacket(_) => (),
        e => panic!("unexpected error: {}", e),
    }
}

#[test]
fn garbage_between_packets() {
    let packet = Packet::new(3, b"ok".to_vec()).unwrap();
    let mut message = packet.to_vec().unwrap();
    // An octet with bit 7 clear cannot start a packet.
    message.push(0x17);
    message.push(0x00);

    let first = Packet::from_bytes(&message).unwrap();
    assert_eq!(first.content(), b"ok");

    let offset = first.total_length() as usize;
    match Packet::from_bytes(&message[offset..]).unwrap_err()
        .downcast::<Error>().unwrap()
    {
        Error::MalformedPacket(_) => (),
        e => panic!("unexpected error: {}", e),
    }
}
