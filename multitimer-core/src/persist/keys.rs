//! Storage key layout
//!
//! | Key                          | Value                         |
//! |------------------------------|-------------------------------|
//! | 1                            | number of records             |
//! | 2                            | selected list section         |
//! | 3                            | selected list row             |
//! | 4                            | shutdown timestamp            |
//! | 5                            | schema version                |
//! | 100 + 10 × field + record    | one field of one record       |

use multitimer_hal::StorageKey;

use crate::record::MAX_TIMERS;

/// Schema version written by this build
pub const CURRENT_VERSION: i32 = 5;

pub const KEY_NUM_TIMERS: StorageKey = StorageKey(1);
pub const KEY_LIST_SECTION: StorageKey = StorageKey(2);
pub const KEY_LIST_ROW: StorageKey = StorageKey(3);
pub const KEY_SHUTDOWN_TIME: StorageKey = StorageKey(4);
pub const KEY_VERSION: StorageKey = StorageKey(5);

/// First per-record key
pub const KEY_FIRST_RECORD: u32 = 100;

/// Per-record fields, numbered as stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum Field {
    Total = 0,
    Elapsed = 1,
    Running = 2,
    Icon = 3,
    Kind = 4,
    Vibe = 5,
    VibeRepeat = 6,
}

impl Field {
    /// Every field, in key order
    pub const ALL: [Field; 7] = [
        Field::Total,
        Field::Elapsed,
        Field::Running,
        Field::Icon,
        Field::Kind,
        Field::Vibe,
        Field::VibeRepeat,
    ];
}

/// Key of one field of one record
pub fn record_key(index: usize, field: Field) -> StorageKey {
    StorageKey(KEY_FIRST_RECORD + MAX_TIMERS as u32 * field as u32 + index as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keys() {
        assert_eq!(record_key(0, Field::Total), StorageKey(100));
        assert_eq!(record_key(3, Field::Elapsed), StorageKey(113));
        assert_eq!(record_key(9, Field::VibeRepeat), StorageKey(169));
    }

    #[test]
    fn test_record_keys_never_collide() {
        let mut seen = heapless::Vec::<u32, { MAX_TIMERS * 7 }>::new();
        for field in Field::ALL {
            for index in 0..MAX_TIMERS {
                let key = record_key(index, field).as_u32();
                assert!(!seen.contains(&key));
                seen.push(key).unwrap();
            }
        }
    }
}
