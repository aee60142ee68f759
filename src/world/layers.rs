use crate::error::{PhysicsError, Result};

pub const LAYER_COUNT: u32 = 32;

/// Symmetric 32x32 interaction matrix, one bit row per layer.
///
/// Every pair interacts by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerMatrix {
    rows: [u32; LAYER_COUNT as usize],
}

impl Default for LayerMatrix {
    fn default() -> Self {
        Self {
            rows: [u32::MAX; LAYER_COUNT as usize],
        }
    }
}

impl LayerMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check_layer(layer: u32) -> Result<()> {
        if layer < LAYER_COUNT {
            Ok(())
        } else {
            Err(PhysicsError::InvalidLayer(layer))
        }
    }

    pub fn interacts(&self, a: u32, b: u32) -> Result<bool> {
        Self::check_layer(a)?;
        Self::check_layer(b)?;
        Ok(self.rows[a as usize] & (1 << b) != 0)
    }

    pub fn enable(&mut self, a: u32, b: u32) -> Result<()> {
        self.set(a, b, true)
    }

    pub fn disable(&mut self, a: u32, b: u32) -> Result<()> {
        self.set(a, b, false)
    }

    /// Flips `(a, b)` and its mirror. Returns the new state.
    pub fn toggle(&mut self, a: u32, b: u32) -> Result<bool> {
        let enabled = !self.interacts(a, b)?;
        self.set(a, b, enabled)?;
        Ok(enabled)
    }

    fn set(&mut self, a: u32, b: u32, enabled: bool) -> Result<()> {
        Self::check_layer(a)?;
        Self::check_layer(b)?;
        if enabled {
            self.rows[a as usize] |= 1 << b;
            self.rows[b as usize] |= 1 << a;
        } else {
            self.rows[a as usize] &= !(1 << b);
            self.rows[b as usize] &= !(1 << a);
        }
        Ok(())
    }
}
