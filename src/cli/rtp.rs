use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::net::UdpSocket;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info};

use super::command::RtpArgs;
use mediasync::structs::mpegts::ts_packets;
use mediasync::structs::rtp::{PayloadKind, RtpHeader};

/// Largest datagram accepted; anything bigger is truncated by the kernel.
const RECV_BUF_SIZE: usize = 10_000;

/// Poll interval for the shutdown flag between blocking receives.
const RECV_TIMEOUT: Duration = Duration::from_millis(500);

pub fn cmd_rtp(args: &RtpArgs) -> Result<()> {
    let socket = UdpSocket::bind(("0.0.0.0", args.port))
        .with_context(|| format!("binding UDP port {}", args.port))?;
    socket.set_read_timeout(Some(RECV_TIMEOUT))?;

    let dump_file = File::create(&args.dump)
        .with_context(|| format!("creating capture file {}", args.dump.display()))?;
    let mut dump = BufWriter::new(dump_file);

    let running = Arc::new(AtomicBool::new(true));
    let flag = running.clone();
    ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst))?;

    info!("Listening on port {}", args.port);

    let mut buf = [0u8; RECV_BUF_SIZE];
    let mut cnt = 0usize;

    while running.load(Ordering::SeqCst) {
        let (pktsize, _remote) = match socket.recv_from(&mut buf) {
            Ok(received) => received,
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let datagram = &buf[..pktsize];
        let header = match RtpHeader::read(datagram) {
            Ok(header) => header,
            Err(e) => {
                // Runt datagram; drop it without a packet line or capture.
                debug!("Dropping datagram: {e}");
                continue;
            }
        };

        let kind = header.payload_kind();
        let kind_str = kind.to_string();
        println!(
            "[RTP Pkt] {cnt:5}| {kind_str:>5}| {:10}| {:5}| {pktsize:5}|",
            header.timestamp, header.sequence_number
        );

        let payload = header.payload(datagram);
        dump.write_all(payload)?;

        if kind == PayloadKind::Mp2t {
            for _packet in ts_packets(payload) {
                println!("   [MPEGTS Pkt]");
            }
        }

        cnt += 1;
    }

    dump.flush()?;
    info!("Received {cnt} datagrams");

    Ok(())
}
