use core::sync::atomic::{AtomicBool, Ordering};

use crate::direction::Direction;

/// Flags shared between the transfer-completion path and the silence
/// watchdog.
///
/// All accesses are relaxed. The two contexts only require that a store
/// becomes visible to the other side within roughly one watchdog tick; no
/// invariant depends on ordering between the flags, so nothing stronger is
/// asked of the hardware.
#[derive(Debug, Default)]
pub struct LinkActivity {
    data_seen: AtomicBool,
    hold: [AtomicBool; 2],
}

impl LinkActivity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that a transfer completed, in either direction. Called by the
    /// transport on every arrival.
    pub fn note_arrival(&self) {
        self.data_seen.store(true, Ordering::Relaxed);
    }

    /// Consumes the arrival marker; watchdog side.
    pub fn take_arrival(&self) -> bool {
        self.data_seen.swap(false, Ordering::Relaxed)
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        self.hold[direction.index()].load(Ordering::Relaxed)
    }

    /// True once every direction is held.
    pub fn all_held(&self) -> bool {
        Direction::ALL.iter().all(|&dir| self.is_held(dir))
    }

    /// Forces every direction into the hold state.
    pub fn hold_all(&self) {
        for flag in &self.hold {
            flag.store(true, Ordering::Relaxed);
        }
    }

    /// Clears one direction's hold flag, returning whether it was set. Each
    /// direction exits hold on its own next arrival.
    pub fn take_hold(&self, direction: Direction) -> bool {
        self.hold[direction.index()].swap(false, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrival_marker_is_consumed_on_read() {
        let activity = LinkActivity::new();
        assert!(!activity.take_arrival());
        activity.note_arrival();
        assert!(activity.take_arrival());
        assert!(!activity.take_arrival());
    }

    #[test]
    fn hold_is_cleared_per_direction() {
        let activity = LinkActivity::new();
        activity.hold_all();
        assert!(activity.all_held());
        assert!(activity.take_hold(Direction::Out));
        assert!(!activity.is_held(Direction::Out));
        assert!(activity.is_held(Direction::In));
        assert!(!activity.take_hold(Direction::Out));
    }
}
