//! Fixed catalogs of icons, vibration patterns and repeat counts
//!
//! Records store plain indices into these tables. Index 0 of each table is
//! the default a freshly created record gets.

use multitimer_hal::VibePattern;

/// An icon: a user-facing label and the bitmap resource drawn for it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IconEntry {
    /// Label shown in the icon picker and used in timeline titles
    pub label: &'static str,
    /// Bitmap resource name
    pub resource: &'static str,
}

const fn icon(label: &'static str, resource: &'static str) -> IconEntry {
    IconEntry { label, resource }
}

/// Number of icons in the catalog
pub const ICON_COUNT: usize = 52;

/// Icon catalog; index 0 is "no icon"
pub static ICONS: [IconEntry; ICON_COUNT] = [
    icon("", "BLANK"),
    // Food
    icon("egg", "EGG"),
    icon("burger", "BURGER"),
    icon("fish", "FISH"),
    icon("meat", "MEAT"),
    icon("potato", "POTATO"),
    icon("veggies", "VEGGIES"),
    icon("favorite", "STAR"),
    icon("cappuccino", "CAP"),
    icon("coffee", "ESPRESSO_S"),
    icon("tea", "TEA"),
    icon("bodom", "BODOM"),
    icon("bread", "BREAD"),
    icon("food", "FOOD"),
    icon("stove", "STOVE"),
    icon("toast", "TOAST"),
    icon("wine", "WINE"),
    // Daily life
    icon("calendar", "CALENDAR"),
    icon("clock", "CLOCK"),
    icon("business", "BUSINESS"),
    icon("laundry", "LAUNDRY"),
    icon("laundry", "LAUNDRY2"),
    icon("cat", "CAT"),
    icon("dog", "DOG"),
    icon("people", "PEOPLE"),
    icon("phone", "PHONE"),
    icon("phone", "PHONE2"),
    // Health
    icon("pill", "PILL"),
    icon("doctor", "DOCTOR"),
    icon("ambulance", "AMBULANCE"),
    // Travel
    icon("airplane", "AIRPLANE"),
    icon("bus", "BUS"),
    icon("taxi", "TAXI"),
    icon("train", "TRAIN"),
    icon("walk", "WALK"),
    // Mood
    icon("heart", "LOVE"),
    icon("angry", "ANGER"),
    icon("sleep", "SLEEP"),
    icon("smile", "SMILE"),
    icon("surprise", "SURPRISE"),
    // Misc
    icon("brain", "BRAIN"),
    icon("calculator", "CALCULATOR"),
    icon("danger", "DANGER"),
    icon("fire", "FIRE"),
    icon("holiday", "HOLIDAY"),
    icon("music", "MUSIC"),
    icon("apple", "APPLE"),
    icon("raspberry pi", "RASPBERRY"),
    icon("freedom", "PRISONER"),
    icon("coffee", "COFFEEBEAN"),
    icon("lapavoni", "LAPAVONI"),
    icon("laboratory", "CHEMIST"),
];

/// Look up an icon by index
pub fn icon_entry(index: u8) -> Option<&'static IconEntry> {
    ICONS.get(index as usize)
}

/// Number of vibration patterns
pub const VIBE_PATTERN_COUNT: usize = 4;

/// Picker labels for the vibration patterns
pub static VIBE_PATTERN_LABELS: [&str; VIBE_PATTERN_COUNT] =
    ["short+short", "long", "short", "short+long"];

static SHORT_LONG: [u32; 3] = [200, 100, 400];

/// Haptic pattern for a pattern index
///
/// Unknown indices fall back to a double pulse.
pub fn vibe_pattern(index: u8) -> VibePattern {
    match index {
        1 => VibePattern::LongPulse,
        2 => VibePattern::ShortPulse,
        3 => VibePattern::Custom(&SHORT_LONG),
        _ => VibePattern::DoublePulse,
    }
}

/// Number of repeat-count choices
pub const VIBE_REPEAT_COUNT: usize = 5;

/// Picker labels for the repeat counts
pub static VIBE_REPEAT_LABELS: [&str; VIBE_REPEAT_COUNT] = ["5", "4", "3", "2", "1"];

/// Alert pulses for a repeat index: index 0 → 5, index 4 → 1
pub fn repeat_count(index: u8) -> u32 {
    (VIBE_REPEAT_COUNT as u32).saturating_sub(index as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_zero_is_blank() {
        let entry = icon_entry(0).unwrap();
        assert_eq!(entry.label, "");
        assert_eq!(entry.resource, "BLANK");
    }

    #[test]
    fn test_icon_catalog_bounds() {
        assert_eq!(icon_entry(51).unwrap().resource, "CHEMIST");
        assert!(icon_entry(ICON_COUNT as u8).is_none());
    }

    #[test]
    fn test_repeat_labels_match_counts() {
        for (index, label) in VIBE_REPEAT_LABELS.iter().enumerate() {
            let count: u32 = label.parse().unwrap();
            assert_eq!(repeat_count(index as u8), count);
        }
    }

    #[test]
    fn test_custom_pattern_segments() {
        assert_eq!(vibe_pattern(3).segments(), &[200, 100, 400]);
        assert_eq!(vibe_pattern(0), VibePattern::DoublePulse);
        assert_eq!(vibe_pattern(9), VibePattern::DoublePulse);
    }
}
