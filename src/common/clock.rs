//! Pausable, scalable time source shared between the game layer and the
//! physics world.

use std::cell::Cell;

/// Scaled game time.
///
/// The owner feeds real frame deltas through [`Clock::advance`]; readers such
/// as [`crate::Physics2D`] only observe the accumulated scaled total. Pausing
/// or a zero scale freezes the total, which is how the game layer halts the
/// simulation. Interior mutability lets one `Rc<Clock>` be shared by the
/// owner and any number of readers on the same thread.
#[derive(Debug)]
pub struct Clock {
    total_seconds: Cell<f64>,
    scale: Cell<f64>,
    paused: Cell<bool>,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            total_seconds: Cell::new(0.0),
            scale: Cell::new(1.0),
            paused: Cell::new(false),
        }
    }

    /// Advances by `real_seconds` of wall time, scaled. No-op while paused.
    pub fn advance(&self, real_seconds: f64) {
        if self.paused.get() || real_seconds <= 0.0 {
            return;
        }
        self.total_seconds
            .set(self.total_seconds.get() + real_seconds * self.scale.get());
    }

    pub fn total_elapsed_seconds(&self) -> f64 {
        self.total_seconds.get()
    }

    pub fn is_paused(&self) -> bool {
        self.paused.get()
    }

    pub fn pause(&self) {
        self.paused.set(true);
    }

    pub fn resume(&self) {
        self.paused.set(false);
    }

    pub fn scale(&self) -> f64 {
        self.scale.get()
    }

    /// Negative factors are clamped to zero; time never runs backwards.
    pub fn set_scale(&self, factor: f64) {
        self.scale.set(factor.max(0.0));
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
