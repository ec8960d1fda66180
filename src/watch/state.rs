// src/watch/state.rs

/// Two-state rebuild machine: idle or building.
///
/// Filesystem events arriving while a rebuild is in flight are dropped; a
/// burst of events collapses into zero or one trailing rebuild, and only if
/// another event arrives after the in-flight rebuild completes. There is no
/// queued replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Building,
}

#[derive(Debug)]
pub struct RebuildGate {
    state: State,
}

impl RebuildGate {
    pub fn new() -> Self {
        Self { state: State::Idle }
    }

    /// Attempt to start a rebuild. Returns `true` and transitions to
    /// `Building` when idle; returns `false` while a rebuild is in flight.
    pub fn try_start(&mut self) -> bool {
        match self.state {
            State::Idle => {
                self.state = State::Building;
                true
            }
            State::Building => false,
        }
    }

    /// A rebuild finished; return to idle.
    pub fn finish(&mut self) {
        self.state = State::Idle;
    }

    pub fn is_building(&self) -> bool {
        self.state == State::Building
    }
}

impl Default for RebuildGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_rebuild_can_be_in_flight() {
        let mut gate = RebuildGate::new();

        assert!(gate.try_start());
        assert!(gate.is_building());

        // Events during the rebuild are dropped.
        assert!(!gate.try_start());
        assert!(!gate.try_start());

        gate.finish();
        assert!(!gate.is_building());

        // A fresh event after completion starts the next rebuild.
        assert!(gate.try_start());
    }

    #[test]
    fn no_catch_up_run_without_a_trailing_event() {
        let mut gate = RebuildGate::new();

        assert!(gate.try_start());
        gate.finish();

        // Nothing arrived after completion, so the gate simply sits idle.
        assert!(!gate.is_building());
    }
}
