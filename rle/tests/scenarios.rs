//! Integration tests exercising the public API end to end: single-PPDU and
//! fragmented round trips, the mandatory burst-size sweep, padding
//! detection, multi-SDU packing with a payload label, and the CRC
//! short-tail rejection.

use rle::{decapsulate, encapsulate, fragment, pack, pad, Config, ProtocolType, Receiver, Sdu, SduRef, Transmitter};
use rle_util::allocator::Global;

fn cfg_uncompressed_seqno() -> Config {
    Config {
        allow_ptype_omission: false,
        use_compressed_ptype: false,
        allow_alpdu_crc: false,
        allow_alpdu_sequence_number: true,
        use_explicit_payload_header_map: false,
        implicit_protocol_type: 0,
        implicit_ppdu_label_size: 0,
        implicit_payload_label_size: 0,
        type_0_alpdu_label_size: 0,
    }
}

fn cfg_omit_vlan_crc() -> Config {
    Config {
        allow_ptype_omission: true,
        use_compressed_ptype: false,
        allow_alpdu_crc: true,
        allow_alpdu_sequence_number: false,
        use_explicit_payload_header_map: false,
        implicit_protocol_type: 0x0f,
        implicit_ppdu_label_size: 0,
        implicit_payload_label_size: 0,
        type_0_alpdu_label_size: 0,
    }
}

fn cfg_uncompressed_crc() -> Config {
    Config { allow_alpdu_crc: true, allow_alpdu_sequence_number: false, ..cfg_uncompressed_seqno() }
}

/// Drains every PPDU a sealed ALPDU produces at a fixed `burst_size`,
/// packing each into `fpdu` in emission order.
fn drain_and_pack(
    tx: &mut Transmitter<Global>,
    frag_id: u8,
    burst_size: usize,
    fpdu: &mut [u8],
    cursor: &mut usize,
    remaining: &mut usize,
) {
    loop {
        let mut ppdu = [0u8; 2048];
        match fragment(tx, frag_id, burst_size, &mut ppdu) {
            Ok(n) => pack(&ppdu[..n], None, fpdu, cursor, remaining).unwrap(),
            Err(rle::FragmentError::ContextIsNull) => break,
            Err(e) => panic!("unexpected fragment error: {e}"),
        }
    }
}

/// A short SDU fits in one COMPLETE PPDU; check the exact wire layout.
#[test]
fn complete_ipv4_ppdu_matches_wire_layout() {
    let cfg = cfg_uncompressed_seqno();
    let mut tx = Transmitter::new_in(cfg, Global).unwrap();
    let mut rx = Receiver::new_in(cfg, Global).unwrap();

    let sdu_bytes: Vec<u8> = (0u8..10).collect();
    encapsulate(&mut tx, 0, SduRef { protocol_type: ProtocolType::IPV4, bytes: &sdu_bytes }).unwrap();

    let mut ppdu = [0u8; 64];
    let ppdu_len = fragment(&mut tx, 0, 120, &mut ppdu).unwrap();
    assert_eq!(ppdu_len, 15, "header(2) + ptype(2) + sdu(10) + seqno(1) == 15");

    // S=1, E=1, LENGTH=13, LT_T_FID=0 (Legacy): 0b1_1_00000001101_000 = 0xC068.
    assert_eq!(&ppdu[..2], &[0xC0, 0x68]);
    let mut expected_body = vec![0x08, 0x00];
    expected_body.extend_from_slice(&sdu_bytes);
    expected_body.push(0); // first SeqNo for a fresh frag_id context
    assert_eq!(&ppdu[2..15], &expected_body[..]);

    let mut fpdu = [0u8; 32];
    let mut cursor = 0;
    let mut remaining = fpdu.len();
    pack(&ppdu[..ppdu_len], None, &mut fpdu, &mut cursor, &mut remaining).unwrap();
    assert_eq!(cursor, 15, "FPDU payload occupies exactly 15 bytes before padding");
    pad(&mut fpdu, cursor, remaining);

    let mut sdus_out: [Option<Sdu<Global>>; 1] = [None];
    let delivered = decapsulate(&mut rx, &fpdu, &mut sdus_out, None).unwrap();
    assert_eq!(delivered, 1);
    let sdu = sdus_out[0].take().unwrap();
    assert_eq!(sdu.protocol_type, ProtocolType::IPV4);
    assert_eq!(&sdu.bytes[..], &sdu_bytes[..]);
}

/// A VLAN-tagged SDU with its protocol-type header omitted, fragmented
/// across multiple PPDUs under CRC protection: checks the START's declared
/// `total_length` and that the full round trip recovers the SDU.
#[test]
fn start_end_vlan_round_trips_and_declares_total_length() {
    let cfg = cfg_omit_vlan_crc();
    let mut tx = Transmitter::new_in(cfg, Global).unwrap();
    let mut rx = Receiver::new_in(cfg, Global).unwrap();

    // VLAN TCI (arbitrary) followed by an IPv4 inner ethertype, so
    // `Config::ptype_is_omissible`'s VLAN rule actually applies and the
    // protocol-type header is omitted (0 bytes), matching the 104-byte
    // ALPDU (0 + 100 + 4-byte CRC) the scenario assumes.
    let mut sdu_bytes = vec![0x00u8, 0x01, 0x08, 0x00];
    sdu_bytes.extend((4u16..100).map(|i| (i % 256) as u8));
    encapsulate(&mut tx, 3, SduRef { protocol_type: ProtocolType::VLAN, bytes: &sdu_bytes }).unwrap();

    let mut first_ppdu = [0u8; 64];
    let first_len = fragment(&mut tx, 3, 40, &mut first_ppdu).unwrap();
    assert_eq!(first_len, 4 + 36, "START header(4) + length(36)");

    let mut fpdu = [0u8; 256];
    let mut cursor = 0;
    let mut remaining = fpdu.len();
    pack(&first_ppdu[..first_len], None, &mut fpdu, &mut cursor, &mut remaining).unwrap();
    loop {
        let mut ppdu = [0u8; 64];
        match fragment(&mut tx, 3, 40, &mut ppdu) {
            Ok(n) => pack(&ppdu[..n], None, &mut fpdu, &mut cursor, &mut remaining).unwrap(),
            Err(rle::FragmentError::ContextIsNull) => break,
            Err(e) => panic!("unexpected fragment error: {e}"),
        }
    }
    pad(&mut fpdu, cursor, remaining);

    let mut sdus_out: [Option<Sdu<Global>>; 1] = [None];
    let delivered = decapsulate(&mut rx, &fpdu, &mut sdus_out, None).unwrap();
    assert_eq!(delivered, 1);
    let sdu = sdus_out[0].take().unwrap();
    assert_eq!(sdu.protocol_type, ProtocolType::VLAN);
    assert_eq!(&sdu.bytes[..], &sdu_bytes[..]);
}

/// Sweeps a wide range of burst sizes against a 1000-byte SDU. SeqNo
/// protection is used deliberately: its one-byte trailer can never straddle
/// two PPDUs, so every burst in the list is expected to succeed (CRC's
/// four-byte trailer is exercised separately by
/// `crc_trailer_rejects_short_tail`).
#[test]
fn mandatory_bursts_round_trip_a_1000_byte_sdu() {
    const BURSTS: &[usize] = &[
        14, 24, 38, 51, 55, 59, 62, 69, 84, 85, 93, 96, 100, 115, 123, 130, 144, 170, 175, 188, 264, 298, 355, 400,
        438, 444, 539, 599,
    ];
    let cfg = cfg_uncompressed_seqno();
    let sdu_bytes: Vec<u8> = (0u16..1000).map(|i| (i % 256) as u8).collect();

    for &burst in BURSTS {
        let mut tx = Transmitter::new_in(cfg, Global).unwrap();
        let mut rx = Receiver::new_in(cfg, Global).unwrap();
        encapsulate(&mut tx, 0, SduRef { protocol_type: ProtocolType::IPV4, bytes: &sdu_bytes }).unwrap();

        let mut fpdu = vec![0u8; 1100];
        let mut cursor = 0;
        let mut remaining = fpdu.len();
        drain_and_pack(&mut tx, 0, burst, &mut fpdu, &mut cursor, &mut remaining);
        pad(&mut fpdu, cursor, remaining);

        let mut sdus_out: [Option<Sdu<Global>>; 1] = [None];
        let delivered = decapsulate(&mut rx, &fpdu, &mut sdus_out, None)
            .unwrap_or_else(|e| panic!("burst {burst} failed to decap: {e}"));
        assert_eq!(delivered, 1, "burst {burst} should deliver exactly one SDU");
        let sdu = sdus_out[0].take().unwrap();
        assert_eq!(&sdu.bytes[..], &sdu_bytes[..], "burst {burst} corrupted the SDU");
    }
}

/// A single COMPLETE PPDU followed by a long run of zero padding still
/// yields exactly one delivered SDU.
#[test]
fn padding_detection_yields_exactly_one_sdu() {
    let cfg = cfg_uncompressed_seqno();
    let mut tx = Transmitter::new_in(cfg, Global).unwrap();
    let mut rx = Receiver::new_in(cfg, Global).unwrap();

    // header(2) + ptype(2) + sdu(15) + seqno(1) == 20 byte COMPLETE PPDU.
    let sdu_bytes: Vec<u8> = (0u8..15).collect();
    encapsulate(&mut tx, 0, SduRef { protocol_type: ProtocolType::IPV4, bytes: &sdu_bytes }).unwrap();
    let mut ppdu = [0u8; 64];
    let ppdu_len = fragment(&mut tx, 0, 64, &mut ppdu).unwrap();
    assert_eq!(ppdu_len, 20);

    let label = [1u8, 2, 3];
    let mut fpdu = vec![0u8; 3 + 20 + 977];
    fpdu[..3].copy_from_slice(&label);
    fpdu[3..23].copy_from_slice(&ppdu[..ppdu_len]);
    assert_eq!(fpdu.len(), 1000);

    let mut sdus_out: [Option<Sdu<Global>>; 1] = [None];
    let mut label_out = [0u8; 3];
    let delivered = decapsulate(&mut rx, &fpdu, &mut sdus_out, Some(&mut label_out)).unwrap();
    assert_eq!(delivered, 1);
    assert_eq!(label_out, label);
    let sdu = sdus_out[0].take().unwrap();
    assert_eq!(&sdu.bytes[..], &sdu_bytes[..]);
}

/// Two SDUs on distinct frag_ids, packed into one labeled FPDU, are
/// delivered in emission order.
#[test]
fn multi_sdu_pack_preserves_emission_order() {
    let cfg = cfg_uncompressed_seqno();
    let mut tx = Transmitter::new_in(cfg, Global).unwrap();
    let mut rx = Receiver::new_in(cfg, Global).unwrap();

    let sdu_a: Vec<u8> = (0u16..100).map(|i| (i % 256) as u8).collect();
    let sdu_b: Vec<u8> = (0u16..200).map(|i| ((i * 3) % 256) as u8).collect();
    encapsulate(&mut tx, 1, SduRef { protocol_type: ProtocolType::IPV4, bytes: &sdu_a }).unwrap();
    encapsulate(&mut tx, 2, SduRef { protocol_type: ProtocolType::IPV6, bytes: &sdu_b }).unwrap();

    let mut fpdu = vec![0u8; 512];
    let mut cursor = 0;
    let mut remaining = fpdu.len();
    let label = [9u8, 8, 7, 6, 5, 4];

    // First PPDU of the FPDU must carry the label; seed it with pack_init,
    // then drain each frag_id's PPDUs in turn.
    rle::pack_init(Some(&label), &mut fpdu, &mut cursor, &mut remaining).unwrap();
    drain_and_pack(&mut tx, 1, 120, &mut fpdu, &mut cursor, &mut remaining);
    drain_and_pack(&mut tx, 2, 120, &mut fpdu, &mut cursor, &mut remaining);
    pad(&mut fpdu, cursor, remaining);

    let mut sdus_out: [Option<Sdu<Global>>; 2] = [None, None];
    let mut label_out = [0u8; 6];
    let delivered = decapsulate(&mut rx, &fpdu, &mut sdus_out, Some(&mut label_out)).unwrap();
    assert_eq!(delivered, 2);
    assert_eq!(label_out, label);

    let first = sdus_out[0].take().unwrap();
    let second = sdus_out[1].take().unwrap();
    assert_eq!(first.protocol_type, ProtocolType::IPV4);
    assert_eq!(&first.bytes[..], &sdu_a[..]);
    assert_eq!(second.protocol_type, ProtocolType::IPV6);
    assert_eq!(&second.bytes[..], &sdu_b[..]);
}

/// A burst 60 then burst 50 sequence leaves only 2 bytes of the 4-byte CRC
/// trailer for the next PPDU, which the next `fragment` call must reject
/// rather than split the trailer.
#[test]
fn crc_trailer_rejects_short_tail() {
    let cfg = cfg_uncompressed_crc();
    let mut tx = Transmitter::new_in(cfg, Global).unwrap();

    let sdu_bytes: Vec<u8> = (0u16..100).map(|i| (i % 256) as u8).collect();
    encapsulate(&mut tx, 0, SduRef { protocol_type: ProtocolType::IPV4, bytes: &sdu_bytes }).unwrap();

    let mut first = [0u8; 64];
    fragment(&mut tx, 0, 60, &mut first).unwrap();

    let mut second = [0u8; 64];
    let err = fragment(&mut tx, 0, 50, &mut second).unwrap_err();
    assert_eq!(err, rle::FragmentError::InvalidSize);
}

/// A bit flipped anywhere in a CRC-protected PPDU's payload, after it has
/// been packed into an FPDU, must cause `decapsulate` to report a
/// reassembly failure rather than silently deliver corrupted bytes.
#[test]
fn corrupted_crc_payload_is_rejected_on_decap() {
    let cfg = cfg_uncompressed_crc();
    let mut tx = Transmitter::new_in(cfg, Global).unwrap();
    let mut rx = Receiver::new_in(cfg, Global).unwrap();

    let sdu_bytes: Vec<u8> = (0u8..20).collect();
    encapsulate(&mut tx, 0, SduRef { protocol_type: ProtocolType::IPV4, bytes: &sdu_bytes }).unwrap();
    let mut ppdu = [0u8; 64];
    let ppdu_len = fragment(&mut tx, 0, 64, &mut ppdu).unwrap();
    ppdu[10] ^= 0xFF;

    let mut fpdu = [0u8; 64];
    let mut cursor = 0;
    let mut remaining = fpdu.len();
    pack(&ppdu[..ppdu_len], None, &mut fpdu, &mut cursor, &mut remaining).unwrap();
    pad(&mut fpdu, cursor, remaining);

    let mut sdus_out: [Option<Sdu<Global>>; 1] = [None];
    let err = decapsulate(&mut rx, &fpdu, &mut sdus_out, None).unwrap_err();
    assert_eq!(err, rle::DecapError::ReassemblyError { delivered: 0 });
}

/// An SDU larger than the maximum supported size is rejected at
/// encapsulation time rather than truncated or accepted.
#[test]
fn oversized_sdu_is_rejected_at_encap() {
    let cfg = cfg_uncompressed_seqno();
    let mut tx = Transmitter::new_in(cfg, Global).unwrap();

    let sdu_bytes = vec![0u8; rle::SDU_MAX_LEN + 1];
    let err = encapsulate(&mut tx, 0, SduRef { protocol_type: ProtocolType::IPV4, bytes: &sdu_bytes }).unwrap_err();
    assert_eq!(err, rle::EncapError::SduTooBig);
}

/// A burst too small to hold even a minimal PPDU header and one payload
/// byte is rejected rather than producing a truncated PPDU.
#[test]
fn burst_too_small_is_rejected() {
    let cfg = cfg_uncompressed_seqno();
    let mut tx = Transmitter::new_in(cfg, Global).unwrap();

    let sdu_bytes: Vec<u8> = (0u8..10).collect();
    encapsulate(&mut tx, 0, SduRef { protocol_type: ProtocolType::IPV4, bytes: &sdu_bytes }).unwrap();

    let mut ppdu = [0u8; 64];
    let err = fragment(&mut tx, 0, 2, &mut ppdu).unwrap_err();
    assert_eq!(err, rle::FragmentError::BurstTooSmall);
}
