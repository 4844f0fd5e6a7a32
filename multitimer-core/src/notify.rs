//! Peer notification over the companion link
//!
//! [`MessageNotifier`] turns engine notifications into framed
//! [`PeerMessage`]s. Only one message may be in flight; the link reports
//! completion through [`MessageNotifier::on_reply`] or
//! [`MessageNotifier::on_failed`]. A message with no answer after
//! [`REPLY_TIMEOUT_TICKS`] ticks counts as failed. Nothing is queued or
//! retried.

use multitimer_protocol::{Frame, PeerMessage, PeerReply};

use crate::error::NotifyError;
use crate::traits::PeerNotifier;

/// Ticks to wait for a reply before the in-flight message is dropped
pub const REPLY_TIMEOUT_TICKS: u8 = 5;

/// Outbound frame transport
pub trait FrameSink {
    /// Hand a frame to the link
    fn send(&mut self, frame: &Frame) -> Result<(), NotifyError>;
}

/// [`PeerNotifier`] that frames messages onto a [`FrameSink`]
pub struct MessageNotifier<S: FrameSink> {
    sink: S,
    in_flight: bool,
    waited_ticks: u8,
}

impl<S: FrameSink> MessageNotifier<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            in_flight: false,
            waited_ticks: 0,
        }
    }

    /// Check if a message is awaiting its reply
    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// The companion answered the in-flight message
    pub fn on_reply(&mut self, reply: PeerReply) {
        match reply {
            PeerReply::Ack => self.on_sent(),
            PeerReply::Nack => self.on_failed(),
        }
    }

    /// The in-flight message was delivered
    pub fn on_sent(&mut self) {
        self.in_flight = false;
    }

    /// The in-flight message was lost
    pub fn on_failed(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::warn!("notify: message to peer failed");
        self.in_flight = false;
    }

    /// One second passed; gives up on a reply that is overdue
    pub fn on_tick(&mut self) {
        if !self.in_flight {
            return;
        }
        self.waited_ticks = self.waited_ticks.saturating_add(1);
        if self.waited_ticks >= REPLY_TIMEOUT_TICKS {
            #[cfg(feature = "defmt")]
            defmt::warn!("notify: no reply after {} ticks", self.waited_ticks);
            self.on_failed();
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn send(&mut self, message: PeerMessage<'_>) -> Result<(), NotifyError> {
        if self.in_flight {
            return Err(NotifyError::Busy);
        }
        let frame = message.to_frame().map_err(|_| NotifyError::Encode)?;
        self.sink.send(&frame)?;
        self.in_flight = true;
        self.waited_ticks = 0;
        Ok(())
    }
}

impl<S: FrameSink> PeerNotifier for MessageNotifier<S> {
    fn notify_add(
        &mut self,
        index: usize,
        remaining_sec: i32,
        title: &str,
    ) -> Result<(), NotifyError> {
        let id = u8::try_from(index).map_err(|_| NotifyError::Encode)?;
        self.send(PeerMessage::AddToTimeline {
            id,
            remaining_sec,
            title,
        })
    }

    fn notify_remove(&mut self, index: usize) -> Result<(), NotifyError> {
        let id = u8::try_from(index).map_err(|_| NotifyError::Encode)?;
        self.send(PeerMessage::RemoveFromTimeline { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    #[derive(Default)]
    struct VecSink {
        frames: Vec<Frame>,
        down: bool,
    }

    impl FrameSink for VecSink {
        fn send(&mut self, frame: &Frame) -> Result<(), NotifyError> {
            if self.down {
                return Err(NotifyError::Link);
            }
            self.frames.push(frame.clone());
            Ok(())
        }
    }

    #[test]
    fn test_add_is_framed() {
        let mut notifier = MessageNotifier::new(VecSink::default());
        notifier.notify_add(2, 95, "Multi-Timer+ Coffee").unwrap();

        let frame = &notifier.sink().frames[0];
        assert_eq!(
            PeerMessage::from_frame(frame),
            Ok(PeerMessage::AddToTimeline {
                id: 2,
                remaining_sec: 95,
                title: "Multi-Timer+ Coffee",
            })
        );
        assert!(notifier.is_busy());
    }

    #[test]
    fn test_second_message_is_busy_until_reply() {
        let mut notifier = MessageNotifier::new(VecSink::default());
        notifier.notify_remove(0).unwrap();

        assert_eq!(notifier.notify_remove(1), Err(NotifyError::Busy));
        assert_eq!(notifier.sink().frames.len(), 1);

        notifier.on_reply(PeerReply::Nack);
        notifier.notify_remove(1).unwrap();
        let frame = &notifier.sink().frames[1];
        assert_eq!(
            PeerMessage::from_frame(frame),
            Ok(PeerMessage::RemoveFromTimeline { id: 1 })
        );
    }

    #[test]
    fn test_link_error_does_not_mark_in_flight() {
        let mut notifier = MessageNotifier::new(VecSink {
            down: true,
            ..VecSink::default()
        });

        assert_eq!(notifier.notify_remove(0), Err(NotifyError::Link));
        assert!(!notifier.is_busy());
    }

    #[test]
    fn test_silent_peer_frees_the_link_after_timeout() {
        let mut notifier = MessageNotifier::new(VecSink::default());
        notifier.notify_add(0, 60, "t").unwrap();

        for _ in 1..REPLY_TIMEOUT_TICKS {
            notifier.on_tick();
        }
        assert_eq!(notifier.notify_remove(0), Err(NotifyError::Busy));

        notifier.on_tick();
        assert!(!notifier.is_busy());
        notifier.notify_remove(0).unwrap();
        assert_eq!(notifier.sink().frames.len(), 2);
    }

    #[test]
    fn test_ticks_while_idle_do_not_shorten_next_wait() {
        let mut notifier = MessageNotifier::new(VecSink::default());
        for _ in 0..REPLY_TIMEOUT_TICKS {
            notifier.on_tick();
        }

        notifier.notify_remove(3).unwrap();
        notifier.on_tick();
        assert!(notifier.is_busy());
    }
}
