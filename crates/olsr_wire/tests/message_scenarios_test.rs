//! Integration test for the OLSR header codec: one scenario per message type.

use std::net::Ipv4Addr;

use bytes::{Buf, BytesMut};
use olsr_wire::{
    decode_packet, quantum_to_seconds, seconds_to_quantum, Association, Hello, Hna, LinkMessage,
    MessageHeader, MessageType, Mid, Packet, PacketHeader, Quantum, Tc, WireFormat,
};

fn addr(last: u8) -> Ipv4Addr {
    Ipv4Addr::new(10, 1, 1, last)
}

#[test]
fn test_time_quantization_whole_seconds() {
    for time in 1..=30 {
        let seconds = f64::from(time);
        let back = quantum_to_seconds(seconds_to_quantum(seconds).unwrap());
        assert!(back >= 0.0, "negative interval for {time}s");
        assert!((back - seconds).abs() <= 0.1, "{time}s decoded as {back}s");
    }
}

#[test]
fn test_mid_messages_in_one_packet() {
    let mut msg1 = MessageHeader::new(Mid::new(vec![addr(4), addr(5)]));
    msg1.time_to_live = 255;
    msg1.originator_address = addr(44);
    msg1.set_vtime_seconds(9.0).unwrap();
    msg1.message_sequence_number = 7;

    let mut msg2 = MessageHeader::new(Mid::new(vec![addr(8), addr(9)]));
    msg2.time_to_live = 254;
    msg2.originator_address = addr(46);
    msg2.set_vtime_seconds(10.0).unwrap();
    msg2.message_sequence_number = 7;

    let header = PacketHeader::new(
        (PacketHeader::SIZE + msg1.message_size() + msg2.message_size()) as u16,
        123,
    );

    // Header first, then messages in order
    let mut out = BytesMut::new();
    header.encode(&mut out).unwrap();
    msg1.encode(&mut out).unwrap();
    msg2.encode(&mut out).unwrap();
    let mut buf = out.freeze();

    let hdr = PacketHeader::decode(&mut buf).unwrap();
    assert_eq!(hdr.packet_sequence_number, 123);
    let mut size_left = usize::from(hdr.packet_length) - PacketHeader::SIZE;

    let out1 = MessageHeader::decode(&mut buf).unwrap();
    assert_eq!(out1.time_to_live, 255);
    assert_eq!(out1.originator_address, addr(44));
    assert!((out1.vtime_seconds() - 9.0).abs() < f64::EPSILON);
    assert_eq!(out1.message_type(), MessageType::Mid);
    assert_eq!(out1.message_sequence_number, 7);
    let mid1 = out1.payload.as_mid().unwrap();
    assert_eq!(mid1.interface_addresses.len(), 2);
    assert_eq!(mid1.interface_addresses[0], addr(4));
    size_left -= out1.message_size();
    assert!(size_left > 0);

    let out2 = MessageHeader::decode(&mut buf).unwrap();
    assert_eq!(out2.time_to_live, 254);
    assert_eq!(out2.originator_address, addr(46));
    assert!((out2.vtime_seconds() - 10.0).abs() < f64::EPSILON);
    assert_eq!(out2.message_type(), MessageType::Mid);
    assert_eq!(out2.message_sequence_number, 7);
    let mid2 = out2.payload.as_mid().unwrap();
    assert_eq!(mid2.interface_addresses.len(), 2);
    assert_eq!(mid2.interface_addresses[0], addr(8));
    size_left -= out2.message_size();
    assert_eq!(size_left, 0);

    assert_eq!(out1, msg1);
    assert_eq!(out2, msg2);
    assert!(!buf.has_remaining());
}

#[test]
fn test_mid_packet_via_packet_codec() {
    let mut msg1 = MessageHeader::new(Mid::new(vec![addr(4), addr(5)]));
    msg1.time_to_live = 255;
    msg1.originator_address = addr(44);
    msg1.set_vtime_seconds(9.0).unwrap();
    msg1.message_sequence_number = 7;
    let mut msg2 = MessageHeader::new(Mid::new(vec![addr(8), addr(9)]));
    msg2.time_to_live = 254;
    msg2.originator_address = addr(46);
    msg2.set_vtime_seconds(10.0).unwrap();
    msg2.message_sequence_number = 7;

    let packet = Packet::new(123, vec![msg1, msg2]).unwrap();
    let mut buf = packet.to_bytes().unwrap();
    assert_eq!(buf.len(), 4 + 20 + 20);

    let decoded = decode_packet(&mut buf).unwrap();
    assert_eq!(decoded, packet);
    assert!(buf.is_empty());
}

#[test]
fn test_hello_message() {
    let mut msg_in = MessageHeader::new(Hello::new(
        Quantum::from_seconds(7.0).unwrap(),
        66,
        vec![
            LinkMessage::new(2, vec![addr(4), addr(5)]),
            LinkMessage::new(3, vec![addr(8), addr(9)]),
        ],
    ));
    msg_in.set_vtime_seconds(3.0).unwrap();
    msg_in.hop_count = 6;
    msg_in.message_sequence_number = 112;
    msg_in.originator_address = addr(2);

    let mut buf = msg_in.to_bytes().unwrap();
    let msg_out = MessageHeader::decode(&mut buf).unwrap();

    assert_eq!(msg_out.message_type(), MessageType::Hello);
    assert_eq!(msg_out.hop_count, 6);
    assert_eq!(msg_out.message_sequence_number, 112);
    assert_eq!(msg_out.originator_address, addr(2));

    let hello = msg_out.payload.as_hello().unwrap();
    assert!((hello.htime_seconds() - 7.0).abs() < f64::EPSILON);
    assert_eq!(hello.willingness, 66);
    assert_eq!(hello.link_messages.len(), 2);
    assert_eq!(hello.link_messages[0].link_code, 2);
    assert_eq!(
        hello.link_messages[0].neighbor_interface_addresses,
        vec![addr(4), addr(5)]
    );
    assert_eq!(hello.link_messages[1].link_code, 3);
    assert_eq!(
        hello.link_messages[1].neighbor_interface_addresses,
        vec![addr(8), addr(9)]
    );

    assert_eq!(msg_out, msg_in);
    assert_eq!(buf.remaining(), 0, "all bytes in packet were not read");
}

#[test]
fn test_tc_message() {
    let msg_in = MessageHeader::new(Tc::new(33, vec![addr(4), addr(5)]));
    let mut buf = msg_in.to_bytes().unwrap();
    let msg_out = MessageHeader::decode(&mut buf).unwrap();

    let tc = msg_out.payload.as_tc().unwrap();
    assert_eq!(tc.ansn, 33);
    assert_eq!(tc.neighbor_addresses.len(), 2);
    assert_eq!(tc.neighbor_addresses[0], addr(4));
    assert_eq!(tc.neighbor_addresses[1], addr(5));

    assert_eq!(msg_out, msg_in);
    assert_eq!(buf.remaining(), 0);
}

#[test]
fn test_hna_message() {
    let msg_in = MessageHeader::new(Hna::new(vec![
        Association::new(addr(4), Ipv4Addr::new(255, 255, 255, 0)),
        Association::new(addr(5), Ipv4Addr::new(255, 255, 0, 0)),
    ]));
    let mut buf = msg_in.to_bytes().unwrap();
    let msg_out = MessageHeader::decode(&mut buf).unwrap();

    let hna = msg_out.payload.as_hna().unwrap();
    assert_eq!(hna.associations.len(), 2);
    assert_eq!(hna.associations[0].address, addr(4));
    assert_eq!(hna.associations[0].mask, Ipv4Addr::new(255, 255, 255, 0));
    assert_eq!(hna.associations[1].address, addr(5));
    assert_eq!(hna.associations[1].mask, Ipv4Addr::new(255, 255, 0, 0));

    assert_eq!(msg_out, msg_in);
    assert_eq!(buf.remaining(), 0, "all bytes in packet were not read");
}
