use crate::error::{PhysicsError, Result};
use crate::math::transform::{normalize_angle, Transform};
use crate::math::vec2::Vec2;
use crate::world::ColliderHandle;

/// How a body takes part in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SimulationMode {
    /// Never moves; behaves as infinite mass.
    Static,
    /// Moves only by its own velocity; ignores forces and contacts.
    Kinematic,
    /// Fully simulated.
    #[default]
    Dynamic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rigidbody2D {
    // Placement. Only the world changes these so the collider stays in sync.
    position: Vec2,
    rotation: f64, // Radians, [0, 2π)

    // Motion
    velocity: Vec2,
    verlet_velocity: Vec2, // Actual displacement over the last step
    frame_start_position: Vec2,
    angular_velocity: f64,

    // Accumulators, cleared after integration
    force: Vec2,
    torque: f64,

    // Physical properties
    mass: f64,
    moment: f64, // About the body origin, from the attached collider
    drag: f64,
    mode: SimulationMode,

    enabled: bool,
    destroy_pending: bool,
    collider: Option<ColliderHandle>,
}

impl Rigidbody2D {
    /// A dynamic body at `position`. Moment stays zero until a collider is attached.
    pub fn new(position: Vec2, mass: f64) -> Result<Self> {
        check_mass(mass)?;
        Ok(Self {
            position,
            rotation: 0.0,
            velocity: Vec2::ZERO,
            verlet_velocity: Vec2::ZERO,
            frame_start_position: position,
            angular_velocity: 0.0,
            force: Vec2::ZERO,
            torque: 0.0,
            mass,
            moment: 0.0,
            drag: 0.0,
            mode: SimulationMode::Dynamic,
            enabled: true,
            destroy_pending: false,
            collider: None,
        })
    }

    // --- Placement ---

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Current placement as a [`Transform`].
    pub fn transform(&self) -> Transform {
        Transform::new(self.position, self.rotation)
    }

    pub(crate) fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub(crate) fn set_rotation_radians(&mut self, radians: f64) {
        self.rotation = normalize_angle(radians);
    }

    pub(crate) fn snapshot_frame_start(&mut self) {
        self.frame_start_position = self.position;
    }

    /// Position captured at the start of the current step.
    pub fn frame_start_position(&self) -> Vec2 {
        self.frame_start_position
    }

    // --- Motion ---

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    pub fn set_angular_velocity(&mut self, angular_velocity: f64) {
        self.angular_velocity = angular_velocity;
    }

    /// Displacement over the last step divided by its length.
    pub fn verlet_velocity(&self) -> Vec2 {
        self.verlet_velocity
    }

    /// Force accumulated for the next integration.
    pub fn force(&self) -> Vec2 {
        self.force
    }

    pub fn torque(&self) -> f64 {
        self.torque
    }

    // --- Properties ---

    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Zero for anything but a dynamic body.
    pub fn inverse_mass(&self) -> f64 {
        if self.accepts_forces() {
            1.0 / self.mass
        } else {
            0.0
        }
    }

    pub fn moment(&self) -> f64 {
        self.moment
    }

    /// Zero for anything but a dynamic body, or when no collider set a moment.
    pub fn inverse_moment(&self) -> f64 {
        if self.accepts_forces() && self.moment > 0.0 {
            1.0 / self.moment
        } else {
            0.0
        }
    }

    pub(crate) fn set_moment(&mut self, moment: f64) {
        self.moment = moment;
    }

    /// Rescales the moment with the mass so the inertia distribution is kept.
    pub fn set_mass(&mut self, mass: f64) -> Result<()> {
        check_mass(mass)?;
        self.moment *= mass / self.mass;
        self.mass = mass;
        Ok(())
    }

    pub fn drag(&self) -> f64 {
        self.drag
    }

    /// Negative values are clamped to zero.
    pub fn set_drag(&mut self, drag: f64) {
        self.drag = drag.max(0.0);
    }

    pub fn mode(&self) -> SimulationMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: SimulationMode) {
        self.mode = mode;
    }

    pub fn is_static(&self) -> bool {
        self.mode == SimulationMode::Static
    }

    /// Kinematic or dynamic.
    pub fn is_simulated(&self) -> bool {
        self.mode != SimulationMode::Static
    }

    /// Only dynamic bodies respond to forces and impulses.
    pub fn accepts_forces(&self) -> bool {
        self.mode == SimulationMode::Dynamic
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_destroy_pending(&self) -> bool {
        self.destroy_pending
    }

    pub(crate) fn mark_destroy_pending(&mut self) {
        self.destroy_pending = true;
    }

    /// Enabled and not waiting to be freed.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.destroy_pending
    }

    pub fn collider(&self) -> Option<ColliderHandle> {
        self.collider
    }

    pub(crate) fn set_collider(&mut self, collider: Option<ColliderHandle>) {
        self.collider = collider;
    }

    // --- Forces and impulses ---

    /// Accumulates `force` until the next integration. Dynamic bodies only.
    pub fn add_force(&mut self, force: Vec2) {
        if self.accepts_forces() {
            self.force += force;
        }
    }

    pub fn add_torque(&mut self, torque: f64) {
        if self.accepts_forces() {
            self.torque += torque;
        }
    }

    /// Applies `impulse` at world-space `point`, changing both linear and
    /// angular velocity. Ignored by static and kinematic bodies.
    pub fn apply_impulse_at(&mut self, point: Vec2, impulse: Vec2) {
        if !self.accepts_forces() {
            return;
        }
        self.velocity += impulse / self.mass;
        if self.moment > 0.0 {
            let lever = point - self.position;
            self.angular_velocity += lever.cross(impulse) / self.moment;
        }
    }

    /// Applies a tangential impulse limited to the Coulomb cone of
    /// `normal_impulse`. Returns the scalar actually applied along `tangent`.
    pub fn apply_friction_at(
        &mut self,
        point: Vec2,
        tangent: Vec2,
        tangent_impulse: f64,
        normal_impulse: f64,
        friction: f64,
    ) -> f64 {
        let applied = clamp_friction_impulse(tangent_impulse, normal_impulse, friction);
        self.apply_impulse_at(point, tangent * applied);
        applied
    }

    /// Adds a force opposing the displacement observed over the last step.
    pub fn apply_drag_force(&mut self) {
        let drag = -self.verlet_velocity * self.drag;
        self.add_force(drag);
    }

    /// Derives the verlet velocity from the step's displacement.
    pub fn update_verlet_velocity(&mut self, dt: f64) {
        if dt > 0.0 {
            self.verlet_velocity = (self.position - self.frame_start_position) / dt;
        }
    }

    /// Should be called after integration in each simulation step.
    pub fn clear_accumulators(&mut self) {
        self.force = Vec2::ZERO;
        self.torque = 0.0;
    }

    pub(crate) fn integrate_placement(&mut self, velocity: Vec2, angular_velocity: f64, dt: f64) {
        self.velocity = velocity;
        self.angular_velocity = angular_velocity;
        self.position += velocity * dt;
        self.rotation = normalize_angle(self.rotation + angular_velocity * dt);
    }
}

/// Clamps `|tangent_impulse|` to `friction * |normal_impulse|`, keeping its sign.
pub fn clamp_friction_impulse(tangent_impulse: f64, normal_impulse: f64, friction: f64) -> f64 {
    let bound = (friction * normal_impulse).abs();
    tangent_impulse.clamp(-bound, bound)
}

fn check_mass(mass: f64) -> Result<()> {
    if mass > 0.0 && mass.is_finite() {
        Ok(())
    } else {
        Err(PhysicsError::InvalidMass(mass))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    const EPSILON: f64 = 1e-10;

    fn body_with_moment(mass: f64, moment: f64) -> Rigidbody2D {
        let mut rb = Rigidbody2D::new(Vec2::ZERO, mass).unwrap();
        rb.set_moment(moment);
        rb
    }

    #[test]
    fn test_rigidbody_new() {
        let rb = Rigidbody2D::new(Vec2::new(1.0, 2.0), 3.0).unwrap();
        assert_eq!(rb.position(), Vec2::new(1.0, 2.0));
        assert_eq!(rb.frame_start_position(), Vec2::new(1.0, 2.0));
        assert_eq!(rb.mass(), 3.0);
        assert_eq!(rb.moment(), 0.0);
        assert_eq!(rb.mode(), SimulationMode::Dynamic);
        assert!(rb.is_active());
        assert!(rb.collider().is_none());
    }

    #[test]
    fn test_rigidbody_rejects_bad_mass() {
        assert_eq!(
            Rigidbody2D::new(Vec2::ZERO, 0.0).unwrap_err(),
            PhysicsError::InvalidMass(0.0)
        );
        assert!(Rigidbody2D::new(Vec2::ZERO, -1.0).is_err());
        assert!(Rigidbody2D::new(Vec2::ZERO, f64::INFINITY).is_err());
    }

    #[test]
    fn test_set_mass_rescales_moment() {
        let mut rb = body_with_moment(2.0, 8.0);
        rb.set_mass(4.0).unwrap();
        assert_abs_diff_eq!(rb.moment(), 16.0, epsilon = EPSILON);
        rb.set_mass(1.0).unwrap();
        // Composed rescale equals a single rescale from the original mass
        assert_abs_diff_eq!(rb.moment(), 8.0 * (1.0 / 2.0), epsilon = EPSILON);
        assert!(rb.set_mass(-2.0).is_err());
        assert_eq!(rb.mass(), 1.0);
    }

    #[test]
    fn test_set_rotation_normalizes() {
        let mut rb = body_with_moment(1.0, 1.0);
        rb.set_rotation_radians(-std::f64::consts::FRAC_PI_2);
        assert_abs_diff_eq!(rb.rotation(), 1.5 * std::f64::consts::PI, epsilon = EPSILON);
    }

    #[test]
    fn test_apply_impulse_at_center() {
        let mut rb = body_with_moment(2.0, 1.0);
        rb.apply_impulse_at(Vec2::ZERO, Vec2::new(4.0, 0.0));
        assert_eq!(rb.velocity(), Vec2::new(2.0, 0.0));
        assert_eq!(rb.angular_velocity(), 0.0);
    }

    #[test]
    fn test_apply_impulse_at_lever_arm() {
        let mut rb = body_with_moment(1.0, 2.0);
        // r = (0,1), J = (10,0): r x J = -10
        rb.apply_impulse_at(Vec2::new(0.0, 1.0), Vec2::new(10.0, 0.0));
        assert_abs_diff_eq!(rb.angular_velocity(), -5.0, epsilon = EPSILON);
        assert_abs_diff_eq!(rb.velocity().x, 10.0, epsilon = EPSILON);
    }

    #[test]
    fn test_apply_impulse_without_moment_is_linear_only() {
        let mut rb = body_with_moment(1.0, 0.0);
        rb.apply_impulse_at(Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.0));
        assert_eq!(rb.angular_velocity(), 0.0);
        assert_eq!(rb.velocity(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_impulse_ignored_unless_dynamic() {
        for mode in [SimulationMode::Static, SimulationMode::Kinematic] {
            let mut rb = body_with_moment(1.0, 1.0);
            rb.set_mode(mode);
            rb.apply_impulse_at(Vec2::new(1.0, 1.0), Vec2::new(5.0, 5.0));
            rb.add_force(Vec2::new(1.0, 0.0));
            rb.add_torque(3.0);
            assert_eq!(rb.velocity(), Vec2::ZERO);
            assert_eq!(rb.force(), Vec2::ZERO);
            assert_eq!(rb.torque(), 0.0);
            assert_eq!(rb.inverse_mass(), 0.0);
        }
    }

    #[test]
    fn test_friction_clamp_preserves_sign() {
        assert_eq!(clamp_friction_impulse(5.0, 2.0, 0.5), 1.0);
        assert_eq!(clamp_friction_impulse(-5.0, 2.0, 0.5), -1.0);
        assert_eq!(clamp_friction_impulse(0.3, 2.0, 0.5), 0.3);
        assert_eq!(clamp_friction_impulse(0.3, 2.0, 0.0), 0.0);
    }

    #[test]
    fn test_apply_friction_at_returns_applied() {
        let mut rb = body_with_moment(1.0, 0.0);
        let applied = rb.apply_friction_at(Vec2::ZERO, Vec2::RIGHT, -4.0, 1.0, 0.25);
        assert_eq!(applied, -0.25);
        assert_abs_diff_eq!(rb.velocity().x, -0.25, epsilon = EPSILON);
    }

    #[test]
    fn test_verlet_velocity_and_drag() {
        let mut rb = body_with_moment(1.0, 1.0);
        rb.set_drag(0.5);
        rb.snapshot_frame_start();
        rb.set_position(Vec2::new(1.0, 0.0));
        rb.update_verlet_velocity(0.5);
        assert_eq!(rb.verlet_velocity(), Vec2::new(2.0, 0.0));
        rb.apply_drag_force();
        assert_eq!(rb.force(), Vec2::new(-1.0, 0.0));
        rb.clear_accumulators();
        assert_eq!(rb.force(), Vec2::ZERO);
    }
}
