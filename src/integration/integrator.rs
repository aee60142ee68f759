use crate::objects::rigid_body::Rigidbody2D;

/// Integrates the body's state forward in time using Semi-Implicit Euler.
///
/// Kinematic bodies carry no accumulated force, so they coast on their
/// current velocities. Static bodies are left untouched.
pub fn integrate(body: &mut Rigidbody2D, dt: f64) {
    if !body.is_simulated() {
        body.clear_accumulators();
        return;
    }

    // --- Linear Motion --- //
    let linear_acceleration = body.force() / body.mass();
    let velocity = body.velocity() + linear_acceleration * dt;

    // --- Angular Motion --- //
    let angular_acceleration = body.torque() * body.inverse_moment();
    let angular_velocity = body.angular_velocity() + angular_acceleration * dt;

    body.integrate_placement(velocity, angular_velocity, dt);
    body.clear_accumulators();
}
