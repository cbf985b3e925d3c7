//! Decoded player intents and the single-slot "wait for next input" primitive.

use crate::components::Direction;

/// A semantic input event reaching the game core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Move(Direction),
    Search,
    Wait,
    Continue,
}

impl Intent {
    /// Intents that can resolve the seeker's turn.
    pub fn is_seeker_action(&self) -> bool {
        matches!(self, Intent::Move(_) | Intent::Search | Intent::Wait)
    }

    pub fn is_continue(&self) -> bool {
        matches!(self, Intent::Continue)
    }
}

/// What the game is suspended on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitKind {
    SeekerTurn,
    RoundOverConfirm,
}

#[derive(Debug, Clone, Copy)]
struct Registration {
    kind: WaitKind,
    accepts: fn(&Intent) -> bool,
}

/// A resolved wait: which kind of wait fired and with what intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub kind: WaitKind,
    pub intent: Intent,
}

/// Holds at most one pending wait. Registering replaces (retires) any
/// previous wait; a wait resolves at most once.
#[derive(Debug, Default)]
pub struct InputSlot {
    current: Option<Registration>,
}

impl InputSlot {
    pub fn register(&mut self, kind: WaitKind, accepts: fn(&Intent) -> bool) {
        self.retire();
        self.current = Some(Registration { kind, accepts });
    }

    pub fn retire(&mut self) {
        self.current = None;
    }

    pub fn pending(&self) -> Option<WaitKind> {
        self.current.map(|r| r.kind)
    }

    /// Resolve the pending wait if it accepts `intent`. Rejected intents leave
    /// the wait in place.
    pub fn offer(&mut self, intent: Intent) -> Option<Resolution> {
        let registration = self.current?;
        if !(registration.accepts)(&intent) {
            return None;
        }
        self.current = None;
        Some(Resolution {
            kind: registration.kind,
            intent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_exactly_once() {
        let mut slot = InputSlot::default();
        slot.register(WaitKind::SeekerTurn, Intent::is_seeker_action);
        let resolved = slot.offer(Intent::Search).unwrap();
        assert_eq!(resolved.kind, WaitKind::SeekerTurn);
        assert_eq!(resolved.intent, Intent::Search);
        assert_eq!(slot.offer(Intent::Search), None);
        assert_eq!(slot.pending(), None);
    }

    #[test]
    fn rejected_intent_keeps_waiting() {
        let mut slot = InputSlot::default();
        slot.register(WaitKind::RoundOverConfirm, Intent::is_continue);
        assert_eq!(slot.offer(Intent::Move(Direction::Left)), None);
        assert_eq!(slot.pending(), Some(WaitKind::RoundOverConfirm));
        assert!(slot.offer(Intent::Continue).is_some());
    }

    #[test]
    fn reregistering_retires_previous_wait() {
        let mut slot = InputSlot::default();
        slot.register(WaitKind::SeekerTurn, Intent::is_seeker_action);
        slot.register(WaitKind::RoundOverConfirm, Intent::is_continue);
        assert_eq!(slot.pending(), Some(WaitKind::RoundOverConfirm));
        // The stale predicate no longer fires.
        assert_eq!(slot.offer(Intent::Wait), None);
    }

    #[test]
    fn retired_slot_ignores_everything() {
        let mut slot = InputSlot::default();
        slot.register(WaitKind::SeekerTurn, Intent::is_seeker_action);
        slot.retire();
        assert_eq!(slot.offer(Intent::Search), None);
    }
}
