//! Companion link over UART0
//!
//! The controller hands frames to [`PeerSink`]; the TX task writes them
//! out and the RX task reports the companion's ACK/NACK back through
//! `PEER_REPLY`.

use defmt::*;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embedded_io_async::{Read, Write};

use multitimer_core::error::NotifyError;
use multitimer_core::notify::FrameSink;
use multitimer_protocol::{Frame, FrameParser, PeerReply, MAX_FRAME_SIZE};

use crate::channels::{PEER_REPLY, PEER_TX_CHANNEL};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// [`FrameSink`] that queues frames for the TX task
pub struct PeerSink;

impl FrameSink for PeerSink {
    fn send(&mut self, frame: &Frame) -> Result<(), NotifyError> {
        PEER_TX_CHANNEL
            .try_send(frame.clone())
            .map_err(|_| NotifyError::Link)
    }
}

/// Peer TX task - writes queued frames to the companion
#[embassy_executor::task]
pub async fn peer_tx_task(mut tx: BufferedUartTx) {
    info!("Peer TX task started");

    loop {
        let frame = PEER_TX_CHANNEL.receive().await;

        let mut buf = [0u8; MAX_FRAME_SIZE];
        let len = match frame.encode(&mut buf) {
            Ok(len) => len,
            Err(e) => {
                warn!("Failed to encode frame: {:?}", e);
                PEER_REPLY.signal(PeerReply::Nack);
                continue;
            }
        };

        if let Err(e) = tx.write_all(&buf[..len]).await {
            warn!("Failed to send frame: {:?}", e);
            PEER_REPLY.signal(PeerReply::Nack);
        } else {
            trace!("Frame sent ({} bytes)", len);
        }
    }
}

/// Peer RX task - receives replies from the companion
#[embassy_executor::task]
pub async fn peer_rx_task(mut rx: BufferedUartRx) {
    info!("Peer RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(frame)) => match PeerReply::from_frame(&frame) {
                            Ok(reply) => {
                                trace!("Reply: {:?}", reply);
                                PEER_REPLY.signal(reply);
                            }
                            Err(e) => warn!("Unexpected frame from peer: {:?}", e),
                        },
                        Ok(None) => {
                            // Need more bytes
                        }
                        Err(e) => warn!("Frame parse error: {:?}", e),
                    }
                }
            }
            Ok(_) => {}
            Err(e) => warn!("UART read error: {:?}", e),
        }
    }
}
