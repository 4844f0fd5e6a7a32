//! The timer engine
//!
//! [`Engine`] owns the record store, the list selection and the
//! configuration. Platform services are passed into each operation so the
//! engine itself holds no handles and can be driven identically by the
//! firmware controller task and by host tests.

use core::fmt::Write;

use heapless::String;
use multitimer_hal::{Clock, Haptics, IntStore, LaunchReason, StorageError, VibePattern, WakeFacility};
use multitimer_protocol::messages::truncate_utf8;
use multitimer_protocol::MAX_TITLE_LEN;

use crate::catalog;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::format::{self, Dhms, RowText};
use crate::persist::{self, LoadReport};
use crate::record::{RecordKind, RecordStore, TimerRecord, Toggle};
use crate::state::{self, RowIndicator, TickOutcome};
use crate::traits::PeerNotifier;
use crate::view::{Section, ViewCoordinate};
use crate::wake;

/// Timeline pin title
pub type Title = String<MAX_TITLE_LEN>;

/// Countdown and stopwatch engine
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    records: RecordStore,
    list_selection: ViewCoordinate,
}

impl Engine {
    /// Create an engine with no records
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            records: RecordStore::new(),
            list_selection: ViewCoordinate::default(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Restore state from storage
    ///
    /// A start triggered by a scheduled wake that resumes a recorded
    /// shutdown plays one short pulse. Pending wakes are always cancelled.
    pub fn load<S, H, W>(
        &mut self,
        store: &mut S,
        haptics: &mut H,
        wake: &mut W,
        now: i64,
        launch: LaunchReason,
    ) -> LoadReport
    where
        S: IntStore,
        H: Haptics,
        W: WakeFacility,
    {
        let report = persist::load(store, &mut self.records, &self.config, now);
        self.list_selection = report.list_selection;

        if let Some(_secs) = report.fast_forward_sec {
            #[cfg(feature = "defmt")]
            defmt::info!("engine: resumed after {} s shut down", _secs);
            if launch == LaunchReason::Wakeup {
                haptics.pulse(VibePattern::ShortPulse);
            }
        }
        wake.cancel_all();

        #[cfg(feature = "defmt")]
        defmt::info!(
            "engine: loaded {} records (schema {})",
            self.records.len(),
            report.version
        );
        report
    }

    /// Write the full state
    pub fn save<S: IntStore>(&self, store: &mut S) -> Result<(), StorageError> {
        persist::save(store, &self.records, self.list_selection)
    }

    /// Save, record the shutdown time and schedule a wake for the
    /// earliest running countdown
    ///
    /// Returns the scheduled wake time.
    pub fn shutdown<S, W, C>(&mut self, store: &mut S, wake: &mut W, clock: &C) -> Option<i64>
    where
        S: IntStore,
        W: WakeFacility,
        C: Clock,
    {
        let _ = self.save(store);
        let shutdown = clock.now();
        let _ = persist::save_shutdown_time(store, shutdown);
        wake::schedule_wake(&self.records, wake, clock, shutdown, &self.config)
    }

    // ========================================================================
    // Runtime
    // ========================================================================

    /// Advance every record by one second and play the resulting pulses
    ///
    /// The list selection follows the last countdown that expired.
    pub fn on_tick<H: Haptics>(&mut self, haptics: &mut H) -> TickOutcome {
        let outcome = state::advance(&mut self.records);

        for pattern in &outcome.pulses {
            haptics.pulse(*pattern);
        }
        if let Some(coord) = outcome
            .last_expired()
            .and_then(|index| self.records.coordinate_of(index))
        {
            #[cfg(feature = "defmt")]
            defmt::debug!("engine: countdown expired at {}", coord);
            self.list_selection = coord;
        }
        outcome
    }

    /// Start or stop a record
    ///
    /// Countdowns notify the peer; a zero-length countdown is refused with
    /// a double pulse. Notification failures are logged and otherwise
    /// ignored.
    pub fn toggle_running<H, N>(
        &mut self,
        index: usize,
        haptics: &mut H,
        notifier: &mut N,
    ) -> Result<Toggle, EngineError>
    where
        H: Haptics,
        N: PeerNotifier,
    {
        let toggle = self.records.toggle_running(index)?;
        let record = self.records.get(index).ok_or(EngineError::NotFound)?;

        if toggle == Toggle::Refused {
            haptics.pulse(VibePattern::DoublePulse);
        }
        if record.is_counting_up() {
            return Ok(toggle);
        }

        let result = match toggle {
            Toggle::Started => {
                let remaining = record.remaining_sec().clamp(0, i64::from(i32::MAX)) as i32;
                let title = self.title_for(index).unwrap_or_default();
                notifier.notify_add(index, remaining, &title)
            }
            Toggle::Stopped | Toggle::Refused => notifier.notify_remove(index),
        };
        if let Err(_err) = result {
            #[cfg(feature = "defmt")]
            defmt::warn!("engine: peer notification for {} failed: {}", index, _err);
        }
        Ok(toggle)
    }

    /// Add a new record, select it and persist it
    pub fn append<S: IntStore>(
        &mut self,
        kind: RecordKind,
        store: &mut S,
    ) -> Result<usize, EngineError> {
        let index = self.records.append(kind)?;
        self.records.select(index)?;
        if let Some(record) = self.records.get(index) {
            let _ = persist::save_new_record(store, index, record, self.records.len());
        }
        Ok(index)
    }

    /// Remove a stopped record; later records shift down one index
    ///
    /// The list selection follows the selected record, or stays in its
    /// section when it would point past the end.
    pub fn delete(&mut self, index: usize) -> Result<TimerRecord, EngineError> {
        let record = self.records.get(index).ok_or(EngineError::NotFound)?;
        if record.is_running() {
            return Err(EngineError::RecordRunning);
        }
        let removed = self.records.delete(index)?;

        self.list_selection = match self.records.selected() {
            Some(cur) => self
                .records
                .coordinate_of(cur)
                .unwrap_or(self.list_selection),
            None => self.clamped_list_selection(),
        };
        Ok(removed)
    }

    /// Clear a stopped record's counted time
    pub fn reset(&mut self, index: usize) -> Result<(), EngineError> {
        self.records.reset(index)
    }

    /// Open a record for editing
    pub fn select(&mut self, index: usize) -> Result<(), EngineError> {
        self.records.select(index)
    }

    /// Leave the detail view, persisting the selected record's total
    pub fn close_detail<S: IntStore>(&mut self, store: &mut S) {
        self.persist_selected_total(store);
        self.records.deselect();
    }

    // ========================================================================
    // Selected record settings
    // ========================================================================

    /// Set the selected record's duration; elapsed time restarts
    pub fn set_duration<S: IntStore>(
        &mut self,
        duration: Dhms,
        store: &mut S,
    ) -> Result<(), EngineError> {
        let total = duration.to_secs()?;
        self.records.selected_mut()?.set_total(total);
        self.persist_selected_total(store);
        Ok(())
    }

    pub fn set_icon(&mut self, icon: u8) -> Result<(), EngineError> {
        self.records.selected_mut()?.set_icon(icon)
    }

    pub fn set_vibe_pattern(&mut self, pattern: u8) -> Result<(), EngineError> {
        self.records.selected_mut()?.set_vibe_pattern(pattern)
    }

    pub fn set_vibe_repeat(&mut self, repeat: u8) -> Result<(), EngineError> {
        self.records.selected_mut()?.set_vibe_repeat(repeat)
    }

    fn clamped_list_selection(&self) -> ViewCoordinate {
        let coord = self.list_selection;
        if coord.section.kind().is_none() || self.records.index_at(coord).is_some() {
            return coord;
        }
        match self.records.row_count(coord.section).checked_sub(1) {
            Some(row) => ViewCoordinate::new(coord.section, row),
            None if coord.section == Section::Stopwatches => {
                ViewCoordinate::new(Section::NewStopwatch, 0)
            }
            None => ViewCoordinate::new(Section::NewTimer, 0),
        }
    }

    fn persist_selected_total<S: IntStore>(&self, store: &mut S) {
        if let Some(index) = self.records.selected() {
            if let Some(record) = self.records.get(index) {
                let _ = persist::save_total(store, index, record);
            }
        }
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&TimerRecord> {
        self.records.get(index)
    }

    /// Row the list should highlight
    pub fn list_selection(&self) -> ViewCoordinate {
        self.list_selection
    }

    pub fn set_list_selection(&mut self, coord: ViewCoordinate) {
        self.list_selection = coord;
    }

    pub fn row_indicator(&self, index: usize) -> Option<RowIndicator> {
        self.records.get(index).map(RowIndicator::for_record)
    }

    pub fn row_text(&self, index: usize, blink_on: bool) -> Option<RowText> {
        self.records
            .get(index)
            .map(|record| format::row_text(record, blink_on))
    }

    /// Timeline title: the configured prefix and the record's icon label
    pub fn title_for(&self, index: usize) -> Option<Title> {
        let record = self.records.get(index)?;
        let label = catalog::icon_entry(record.icon()).map_or("", |icon| icon.label);

        let mut full: String<48> = String::new();
        let _ = write!(full, "{} {}", self.config.title_prefix, label);

        let mut title = Title::new();
        let _ = title.push_str(truncate_utf8(&full, MAX_TITLE_LEN));
        Some(title)
    }
}
