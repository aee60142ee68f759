//! Collision callbacks and their enter / stay / leave classification.

use crate::collision::collision::Collision2D;

/// Solid contacts and trigger overlaps are reported through separate hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionKind {
    Overlap,
    Trigger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactPhase {
    /// First step the pair is seen.
    Enter,
    /// Seen on this step and the previous one.
    Stay,
    /// Seen on the previous step but not this one.
    Leave,
}

/// Receives collisions for one collider. The collision is always presented
/// with the listening collider as `me`.
///
/// All methods default to doing nothing.
pub trait CollisionListener {
    fn on_overlap_enter(&mut self, _collision: &Collision2D) {}
    fn on_overlap_stay(&mut self, _collision: &Collision2D) {}
    fn on_overlap_leave(&mut self, _collision: &Collision2D) {}

    fn on_trigger_enter(&mut self, _collision: &Collision2D) {}
    fn on_trigger_stay(&mut self, _collision: &Collision2D) {}
    fn on_trigger_leave(&mut self, _collision: &Collision2D) {}
}

/// Routes one event to the matching listener hook.
pub fn notify(
    listener: &mut dyn CollisionListener,
    kind: CollisionKind,
    phase: ContactPhase,
    collision: &Collision2D,
) {
    match (kind, phase) {
        (CollisionKind::Overlap, ContactPhase::Enter) => listener.on_overlap_enter(collision),
        (CollisionKind::Overlap, ContactPhase::Stay) => listener.on_overlap_stay(collision),
        (CollisionKind::Overlap, ContactPhase::Leave) => listener.on_overlap_leave(collision),
        (CollisionKind::Trigger, ContactPhase::Enter) => listener.on_trigger_enter(collision),
        (CollisionKind::Trigger, ContactPhase::Stay) => listener.on_trigger_stay(collision),
        (CollisionKind::Trigger, ContactPhase::Leave) => listener.on_trigger_leave(collision),
    }
}

/// Merges this step's detections into the retained records.
///
/// `retained` holds records from earlier steps and gains the new ones.
/// Returns the events in detection order followed by leaves in record
/// order. Records not stamped with `frame` afterwards are stale and are the
/// ones that just produced a leave.
pub fn classify(
    retained: &mut Vec<Collision2D>,
    detected: Vec<Collision2D>,
    frame: u64,
) -> Vec<(ContactPhase, Collision2D)> {
    let mut events = Vec::with_capacity(detected.len());

    for collision in detected {
        match retained.iter_mut().find(|r| r.pair_id == collision.pair_id) {
            // Same pair found twice this step
            Some(existing) if existing.frame == frame => {}
            Some(existing) => {
                *existing = collision.clone();
                events.push((ContactPhase::Stay, collision));
            }
            None => {
                retained.push(collision.clone());
                events.push((ContactPhase::Enter, collision));
            }
        }
    }

    for stale in retained.iter().filter(|r| r.frame != frame) {
        events.push((ContactPhase::Leave, stale.clone()));
    }
    events
}

/// Collisions observed this step, in detection order. Leaves are skipped.
pub fn current_contacts(events: &[(ContactPhase, Collision2D)]) -> Vec<Collision2D> {
    events
        .iter()
        .filter(|(phase, _)| *phase != ContactPhase::Leave)
        .map(|(_, collision)| collision.clone())
        .collect()
}

/// Drops records that were not observed on `frame`.
pub fn purge_stale(retained: &mut Vec<Collision2D>, frame: u64) {
    retained.retain(|r| r.frame == frame);
}
