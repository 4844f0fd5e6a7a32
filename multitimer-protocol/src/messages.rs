//! Message types for the companion link
//!
//! Message types are divided into two categories:
//! - Wearable → Companion: timeline add/remove requests
//! - Companion → Wearable: delivery acknowledgements

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};
use heapless::Vec;

// Message type IDs: Wearable → Companion
pub const MSG_TIMELINE: u8 = 0x10;

// Message type IDs: Companion → Wearable
pub const MSG_ACK: u8 = 0x11;
pub const MSG_NACK: u8 = 0x12;

// Dictionary keys inside a timeline payload
pub const KEY_COMMAND: u8 = 200;
pub const KEY_ID: u8 = 201;
pub const KEY_TIME: u8 = 202;
pub const KEY_TITLE: u8 = 203;

/// Longest title carried by a timeline pin, in bytes
pub const MAX_TITLE_LEN: usize = 19;

/// Timeline command codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TimelineCommand {
    /// Pin a countdown on the companion's timeline
    Add = 0,
    /// Remove a previously pinned countdown
    Remove = 1,
}

impl TimelineCommand {
    /// Parse a command from its wire value
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(TimelineCommand::Add),
            1 => Some(TimelineCommand::Remove),
            _ => None,
        }
    }
}

/// Longest prefix of `text` that fits in `max` bytes without splitting a
/// character
pub fn truncate_utf8(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Messages from the wearable to the companion
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PeerMessage<'a> {
    /// A countdown started; pin it `remaining_sec` from now
    AddToTimeline {
        id: u8,
        remaining_sec: i32,
        title: &'a str,
    },
    /// A countdown stopped; drop its pin
    RemoveFromTimeline { id: u8 },
}

impl<'a> PeerMessage<'a> {
    /// Command code carried in the payload
    pub fn command(&self) -> TimelineCommand {
        match self {
            PeerMessage::AddToTimeline { .. } => TimelineCommand::Add,
            PeerMessage::RemoveFromTimeline { .. } => TimelineCommand::Remove,
        }
    }

    /// Record slot this message refers to
    pub fn id(&self) -> u8 {
        match self {
            PeerMessage::AddToTimeline { id, .. } | PeerMessage::RemoveFromTimeline { id } => *id,
        }
    }

    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        // Payload: sequence of [key][len][value...]
        let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
        push_entry(&mut payload, KEY_COMMAND, &(self.command() as i32).to_le_bytes())?;
        push_entry(&mut payload, KEY_ID, &i32::from(self.id()).to_le_bytes())?;

        if let PeerMessage::AddToTimeline {
            remaining_sec,
            title,
            ..
        } = self
        {
            push_entry(&mut payload, KEY_TIME, &remaining_sec.to_le_bytes())?;
            push_entry(
                &mut payload,
                KEY_TITLE,
                truncate_utf8(title, MAX_TITLE_LEN).as_bytes(),
            )?;
        }

        Frame::new(MSG_TIMELINE, &payload)
    }

    /// Parse a message from a frame (companion side and tests)
    pub fn from_frame(frame: &'a Frame) -> Result<Self, FrameError> {
        if frame.msg_type != MSG_TIMELINE {
            return Err(FrameError::InvalidFrame);
        }

        let mut command = None;
        let mut id = None;
        let mut remaining_sec = None;
        let mut title = None;

        let mut rest = &frame.payload[..];
        while !rest.is_empty() {
            let (key, value, tail) = split_entry(rest)?;
            match key {
                KEY_COMMAND => command = TimelineCommand::from_i32(read_i32(value)?),
                KEY_ID => id = u8::try_from(read_i32(value)?).ok(),
                KEY_TIME => remaining_sec = Some(read_i32(value)?),
                KEY_TITLE => {
                    title = Some(core::str::from_utf8(value).map_err(|_| FrameError::InvalidFrame)?)
                }
                // Unknown keys are skipped for forward compatibility
                _ => {}
            }
            rest = tail;
        }

        let id = id.ok_or(FrameError::InvalidFrame)?;
        match command.ok_or(FrameError::InvalidFrame)? {
            TimelineCommand::Add => Ok(PeerMessage::AddToTimeline {
                id,
                remaining_sec: remaining_sec.ok_or(FrameError::InvalidFrame)?,
                title: title.unwrap_or(""),
            }),
            TimelineCommand::Remove => Ok(PeerMessage::RemoveFromTimeline { id }),
        }
    }
}

fn push_entry(
    payload: &mut Vec<u8, MAX_PAYLOAD_SIZE>,
    key: u8,
    value: &[u8],
) -> Result<(), FrameError> {
    payload.push(key).map_err(|_| FrameError::PayloadTooLarge)?;
    payload
        .push(value.len() as u8)
        .map_err(|_| FrameError::PayloadTooLarge)?;
    payload
        .extend_from_slice(value)
        .map_err(|_| FrameError::PayloadTooLarge)
}

fn split_entry(bytes: &[u8]) -> Result<(u8, &[u8], &[u8]), FrameError> {
    let (&key, rest) = bytes.split_first().ok_or(FrameError::InvalidFrame)?;
    let (&len, rest) = rest.split_first().ok_or(FrameError::InvalidFrame)?;
    let len = len as usize;
    if rest.len() < len {
        return Err(FrameError::InvalidFrame);
    }
    let (value, tail) = rest.split_at(len);
    Ok((key, value, tail))
}

fn read_i32(value: &[u8]) -> Result<i32, FrameError> {
    let raw: [u8; 4] = value.try_into().map_err(|_| FrameError::InvalidFrame)?;
    Ok(i32::from_le_bytes(raw))
}

/// Replies from the companion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PeerReply {
    /// Last message was delivered
    Ack,
    /// Last message was rejected or could not be delivered
    Nack,
}

impl PeerReply {
    /// Parse a reply from a frame
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        match frame.msg_type {
            MSG_ACK => Ok(PeerReply::Ack),
            MSG_NACK => Ok(PeerReply::Nack),
            _ => Err(FrameError::InvalidFrame),
        }
    }

    /// Encode this reply into a frame (for testing or simulation)
    pub fn to_frame(&self) -> Frame {
        match self {
            PeerReply::Ack => Frame::empty(MSG_ACK),
            PeerReply::Nack => Frame::empty(MSG_NACK),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameParser;

    #[test]
    fn test_add_payload_layout() {
        let msg = PeerMessage::AddToTimeline {
            id: 2,
            remaining_sec: 300,
            title: "Multi-Timer+ egg",
        };
        let frame = msg.to_frame().unwrap();

        assert_eq!(frame.msg_type, MSG_TIMELINE);
        // command entry first
        assert_eq!(&frame.payload[..6], &[KEY_COMMAND, 4, 0, 0, 0, 0]);
        // id entry
        assert_eq!(&frame.payload[6..12], &[KEY_ID, 4, 2, 0, 0, 0]);
        // time entry
        assert_eq!(&frame.payload[12..18], &[KEY_TIME, 4, 0x2C, 0x01, 0, 0]);
        assert_eq!(frame.payload[18], KEY_TITLE);
        assert_eq!(frame.payload[19] as usize, "Multi-Timer+ egg".len());
    }

    #[test]
    fn test_remove_has_no_time_or_title() {
        let frame = PeerMessage::RemoveFromTimeline { id: 7 }.to_frame().unwrap();
        assert_eq!(frame.payload.len(), 12);
        assert_eq!(
            PeerMessage::from_frame(&frame),
            Ok(PeerMessage::RemoveFromTimeline { id: 7 })
        );
    }

    #[test]
    fn test_long_title_is_truncated_on_the_wire() {
        let msg = PeerMessage::AddToTimeline {
            id: 0,
            remaining_sec: 60,
            title: "Multi-Timer+ raspberry pi",
        };
        let frame = msg.to_frame().unwrap();

        match PeerMessage::from_frame(&frame).unwrap() {
            PeerMessage::AddToTimeline { title, .. } => {
                assert_eq!(title, "Multi-Timer+ raspbe");
                assert_eq!(title.len(), MAX_TITLE_LEN);
            }
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        // 'é' is two bytes; cutting at 2 would split it
        assert_eq!(truncate_utf8("aé", 2), "a");
        assert_eq!(truncate_utf8("abc", 5), "abc");
    }

    #[test]
    fn test_unknown_keys_are_skipped() {
        let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
        push_entry(&mut payload, 250, &[9, 9]).unwrap();
        push_entry(&mut payload, KEY_COMMAND, &1i32.to_le_bytes()).unwrap();
        push_entry(&mut payload, KEY_ID, &3i32.to_le_bytes()).unwrap();
        let frame = Frame::new(MSG_TIMELINE, &payload).unwrap();

        assert_eq!(
            PeerMessage::from_frame(&frame),
            Ok(PeerMessage::RemoveFromTimeline { id: 3 })
        );
    }

    #[test]
    fn test_truncated_entry_is_invalid() {
        let frame = Frame::new(MSG_TIMELINE, &[KEY_ID, 4, 1]).unwrap();
        assert_eq!(PeerMessage::from_frame(&frame), Err(FrameError::InvalidFrame));
    }

    #[test]
    fn test_reply_over_the_wire() {
        let encoded = PeerReply::Nack.to_frame().encode_to_vec().unwrap();
        let mut parser = FrameParser::new();
        let frame = parser.feed_bytes(&encoded).unwrap().unwrap();
        assert_eq!(PeerReply::from_frame(&frame), Ok(PeerReply::Nack));
        assert_eq!(
            PeerReply::from_frame(&Frame::empty(MSG_TIMELINE)),
            Err(FrameError::InvalidFrame)
        );
    }
}
