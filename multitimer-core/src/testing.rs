//! Host test doubles for the platform and collaborator traits

use std::collections::BTreeMap;
use std::string::String;
use std::vec::Vec;

use multitimer_hal::{
    Clock, Haptics, IntStore, StorageError, StorageKey, VibePattern, WakeError, WakeFacility,
};

use crate::catalog::ICONS;
use crate::error::{BitmapError, NotifyError};
use crate::traits::{BitmapLoader, PeerNotifier};

/// In-memory integer store
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub values: BTreeMap<u32, i32>,
    /// Fail every operation with `Unavailable`
    pub broken: bool,
}

impl MemoryStore {
    pub fn get(&self, key: u32) -> Option<i32> {
        self.values.get(&key).copied()
    }

    pub fn set(&mut self, key: u32, value: i32) {
        self.values.insert(key, value);
    }
}

impl IntStore for MemoryStore {
    fn read(&mut self, key: StorageKey) -> Result<i32, StorageError> {
        if self.broken {
            return Err(StorageError::Unavailable);
        }
        self.get(key.as_u32()).ok_or(StorageError::NotFound)
    }

    fn write(&mut self, key: StorageKey, value: i32) -> Result<(), StorageError> {
        if self.broken {
            return Err(StorageError::Unavailable);
        }
        self.set(key.as_u32(), value);
        Ok(())
    }

    fn delete(&mut self, key: StorageKey) -> Result<(), StorageError> {
        if self.broken {
            return Err(StorageError::Unavailable);
        }
        self.values.remove(&key.as_u32());
        Ok(())
    }
}

/// Records every pattern played
#[derive(Debug, Default)]
pub struct RecordingHaptics {
    pub pulses: Vec<VibePattern>,
}

impl Haptics for RecordingHaptics {
    fn pulse(&mut self, pattern: VibePattern) {
        self.pulses.push(pattern);
    }
}

/// A notification as seen by the peer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Add {
        index: usize,
        remaining_sec: i32,
        title: String,
    },
    Remove {
        index: usize,
    },
}

/// Records every notification
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub sent: Vec<Sent>,
    /// Fail every send with `Link`
    pub link_down: bool,
}

impl PeerNotifier for RecordingNotifier {
    fn notify_add(
        &mut self,
        index: usize,
        remaining_sec: i32,
        title: &str,
    ) -> Result<(), NotifyError> {
        if self.link_down {
            return Err(NotifyError::Link);
        }
        self.sent.push(Sent::Add {
            index,
            remaining_sec,
            title: title.into(),
        });
        Ok(())
    }

    fn notify_remove(&mut self, index: usize) -> Result<(), NotifyError> {
        if self.link_down {
            return Err(NotifyError::Link);
        }
        self.sent.push(Sent::Remove { index });
        Ok(())
    }
}

/// Wake facility call log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeCall {
    Schedule(i64),
    CancelAll,
}

/// Records wake scheduling and tracks the pending set
#[derive(Debug, Default)]
pub struct RecordingWake {
    pub calls: Vec<WakeCall>,
    pub pending: Vec<i64>,
}

impl WakeFacility for RecordingWake {
    fn schedule(&mut self, timestamp: i64) -> Result<(), WakeError> {
        self.calls.push(WakeCall::Schedule(timestamp));
        self.pending.push(timestamp);
        Ok(())
    }

    fn cancel_all(&mut self) {
        self.calls.push(WakeCall::CancelAll);
        self.pending.clear();
    }
}

/// Clock returning successive preset readings, repeating the last
#[derive(Debug)]
pub struct FixedClock {
    readings: core::cell::RefCell<Vec<i64>>,
}

impl FixedClock {
    pub fn at(now: i64) -> Self {
        Self::sequence(&[now])
    }

    pub fn sequence(readings: &[i64]) -> Self {
        let mut readings = readings.to_vec();
        readings.reverse();
        Self {
            readings: core::cell::RefCell::new(readings),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        let mut readings = self.readings.borrow_mut();
        if readings.len() > 1 {
            readings.pop().unwrap_or_default()
        } else {
            readings.last().copied().unwrap_or_default()
        }
    }
}

/// Loader whose handles are icon indices
#[derive(Debug, Default)]
pub struct CountingLoader {
    pub loads: u32,
    pub released: Vec<u8>,
    /// Fail the next load with `OutOfMemory`
    pub fail_next: bool,
}

impl BitmapLoader for CountingLoader {
    type Handle = u8;

    fn load(&mut self, resource: &'static str) -> Result<u8, BitmapError> {
        if core::mem::take(&mut self.fail_next) {
            return Err(BitmapError::OutOfMemory);
        }
        let index = ICONS
            .iter()
            .position(|icon| icon.resource == resource)
            .ok_or(BitmapError::NotFound)?;
        self.loads += 1;
        Ok(index as u8)
    }

    fn release(&mut self, handle: u8) {
        self.released.push(handle);
    }
}
