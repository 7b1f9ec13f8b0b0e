use signal_bridge::buffers::{BatchBuffer, BufferState};
use signal_bridge::core::RawSample;
use signal_bridge::engine::PacketAssembler;
use signal_bridge::BridgeConfig;

fn constant_set(channels: usize, value: i32) -> Vec<RawSample> {
    vec![RawSample(value); channels]
}

#[test]
fn test_filling_for_first_n_minus_one_pushes() {
    let mut buffer = BatchBuffer::new(50, 8).unwrap();

    for i in 0..49 {
        assert_eq!(
            buffer.push(&constant_set(8, i)).unwrap(),
            BufferState::Filling,
            "push {} should still be filling",
            i
        );
    }
    assert_eq!(buffer.push(&constant_set(8, 49)).unwrap(), BufferState::Full);
    assert_eq!(buffer.fill_count(), 50);
}

#[test]
fn test_fill_assemble_reset_fill_keeps_every_batch() {
    let config = BridgeConfig::from_json_str(
        r#"{ "channels": ["A", "B"], "batch": { "points_per_packet": 4 },
             "conversion": { "unit": "volts", "display_offset": 0.0 } }"#,
    )
    .unwrap();
    let assembler = PacketAssembler::from_config(&config);
    let converter = config.converter();
    let mut buffer = BatchBuffer::new(4, 2).unwrap();

    let mut packets = Vec::new();
    for batch in 0..3 {
        for point in 0..4 {
            let value = batch * 100 + point;
            buffer.push(&[RawSample(value), RawSample(-value)]).unwrap();
        }
        packets.push(assembler.assemble(&buffer, 1_000 + batch as i64).unwrap());
        buffer.reset();
    }

    // Each packet still holds its own batch: nothing was overwritten
    for (batch, packet) in packets.iter().enumerate() {
        for point in 0..4 {
            let value = (batch * 100 + point) as i32;
            assert_eq!(packet.series[0].points[point].v, converter.to_physical(value));
            assert_eq!(packet.series[1].points[point].v, converter.to_physical(-value));
        }
    }
}

#[test]
fn test_full_buffer_rejects_until_reset() {
    let mut buffer = BatchBuffer::new(2, 1).unwrap();
    buffer.push(&[RawSample(1)]).unwrap();
    buffer.push(&[RawSample(2)]).unwrap();

    assert!(buffer.push(&[RawSample(3)]).is_err());
    assert_eq!(buffer.get(1, 0), Some(RawSample(2)));

    buffer.reset();
    assert_eq!(buffer.push(&[RawSample(3)]).unwrap(), BufferState::Filling);
    assert_eq!(buffer.get(0, 0), Some(RawSample(3)));
}
