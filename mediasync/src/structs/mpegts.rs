//! MPEG transport stream sub-packet splitting.
//!
//! TS packets are a fixed 188 bytes, each starting with the sync byte
//! `0x47`. Senders that encapsulate TS in RTP align packets to the payload
//! start, so the walk is a plain fixed-stride scan with no intra-payload
//! resynchronization: the first stride that does not begin with the sync
//! byte ends the walk, and a tail shorter than one packet is discarded.

/// Fixed size of one transport stream packet.
pub const TS_PACKET_SIZE: usize = 188;

/// Sync byte opening every transport stream packet.
pub const TS_SYNC_BYTE: u8 = 0x47;

/// Iterator over aligned 188-byte TS packets in an RTP payload.
#[derive(Debug)]
pub struct TsPacketIter<'a> {
    payload: &'a [u8],
    offset: usize,
}

/// Walks `payload` in 188-byte strides from offset 0.
pub fn ts_packets(payload: &[u8]) -> TsPacketIter<'_> {
    TsPacketIter { payload, offset: 0 }
}

impl<'a> Iterator for TsPacketIter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let end = self.offset.checked_add(TS_PACKET_SIZE)?;
        let chunk = self.payload.get(self.offset..end)?;

        if chunk[0] != TS_SYNC_BYTE {
            // Lost alignment; everything after this stride stays unread.
            self.payload = &[];
            return None;
        }

        self.offset = end;
        Some(chunk)
    }
}

#[cfg(test)]
fn synth_payload(packets: usize) -> Vec<u8> {
    let mut payload = vec![0u8; packets * TS_PACKET_SIZE];
    for (index, packet) in payload.chunks_mut(TS_PACKET_SIZE).enumerate() {
        packet[0] = TS_SYNC_BYTE;
        packet[3] = index as u8; // continuity marker for assertions
    }
    payload
}

#[test]
fn aligned_payload_yields_every_packet() {
    let payload = synth_payload(8);
    let chunks: Vec<_> = ts_packets(&payload).collect();

    assert_eq!(chunks.len(), 8);
    for (index, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.len(), TS_PACKET_SIZE);
        assert_eq!(chunk[0], TS_SYNC_BYTE);
        assert_eq!(chunk[3], index as u8);
    }
}

#[test]
fn stops_at_first_bad_sync_byte() {
    let mut payload = synth_payload(8);
    payload[4 * TS_PACKET_SIZE] = 0x00;

    let chunks: Vec<_> = ts_packets(&payload).collect();
    assert_eq!(chunks.len(), 4);
}

#[test]
fn short_tail_is_discarded() {
    let mut payload = synth_payload(2);
    payload.extend_from_slice(&[TS_SYNC_BYTE; 100]);

    assert_eq!(ts_packets(&payload).count(), 2);
}

#[test]
fn empty_payload_yields_nothing() {
    assert_eq!(ts_packets(&[]).count(), 0);
}
