//! Companion Link Protocol
//!
//! This crate defines the UART protocol between the wearable and its
//! companion (phone bridge). The wearable announces running countdowns so
//! the companion can pin them on its timeline, and removes the pin when
//! the countdown stops.
//!
//! # Protocol Overview
//!
//! All messages use a simple binary frame format:
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 1B     │ 1B   │ 0–64B       │ 1B       │
//! └───────┴────────┴──────┴─────────────┴──────────┘
//! ```
//!
//! Timeline payloads are small dictionaries of `(key, length, value)`
//! tuples. The companion acknowledges every frame with an ACK or NACK.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod frame;
pub mod messages;

pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
pub use messages::{PeerMessage, PeerReply, TimelineCommand, MAX_TITLE_LEN};
