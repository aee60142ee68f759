use crate::{
    collision::collision::Collision2D,
    common::clock::Clock,
    config::PhysicsConfig,
    error::{PhysicsError, Result},
    integration::integrator,
    math::vec2::Vec2,
    objects::{Collider2D, Rigidbody2D, SimulationMode},
};

use super::arena::Arena;
use super::events::{self, CollisionKind, CollisionListener, ContactPhase};
use super::layers::LayerMatrix;
use super::{ColliderHandle, RigidbodyHandle};

use log::{debug, trace, warn};
use std::collections::HashMap;
use std::rc::Rc;

/// Per-side view of a body used while resolving one contact. Colliders
/// without a body resolve as immovable.
#[derive(Debug, Clone, Copy)]
struct ContactBody {
    position: Vec2,
    velocity: Vec2,
    angular_velocity: f64,
    inverse_mass: f64,
    inverse_moment: f64,
}

impl ContactBody {
    const IMMOVABLE: ContactBody = ContactBody {
        position: Vec2::ZERO,
        velocity: Vec2::ZERO,
        angular_velocity: 0.0,
        inverse_mass: 0.0,
        inverse_moment: 0.0,
    };

    fn from_body(body: &Rigidbody2D) -> Self {
        Self {
            position: body.position(),
            velocity: body.velocity(),
            angular_velocity: body.angular_velocity(),
            inverse_mass: body.inverse_mass(),
            inverse_moment: body.inverse_moment(),
        }
    }

    fn velocity_at(&self, point: Vec2) -> Vec2 {
        self.velocity + Vec2::cross_scalar(self.angular_velocity, point - self.position)
    }

    /// Inverse effective mass along `direction` for an impulse at `point`.
    fn inverse_mass_along(&self, point: Vec2, direction: Vec2) -> f64 {
        let lever = (point - self.position).cross(direction);
        self.inverse_mass + lever * lever * self.inverse_moment
    }
}

/// Share of the penetration each side moves out by. Only dynamic bodies carry
/// inverse mass, so static and kinematic sides never move and a dynamic body
/// facing one takes the whole correction.
fn push_weights(a: &ContactBody, b: &ContactBody) -> (f64, f64) {
    let total = a.inverse_mass + b.inverse_mass;
    if total <= 0.0 {
        (0.0, 0.0)
    } else {
        (a.inverse_mass / total, b.inverse_mass / total)
    }
}

/// The simulation world: owns every body and collider, runs the fixed-step
/// loop and reports collisions to listeners.
pub struct Physics2D {
    config: PhysicsConfig,
    clock: Rc<Clock>,
    bodies: Arena<Rigidbody2D>,
    colliders: Arena<Collider2D>,
    layers: LayerMatrix,
    // Retained between steps so a vanished pair can be reported as a leave
    solid_collisions: Vec<Collision2D>,
    trigger_collisions: Vec<Collision2D>,
    listeners: HashMap<ColliderHandle, Box<dyn CollisionListener>>,
    frame_index: u64,
    step_timer: f64,
    last_clock_seconds: f64,
    next_collider_id: u32,
}

impl Physics2D {
    /// Creates an empty world reading time from `clock`.
    /// Fails if `config` does not validate.
    pub fn new(config: PhysicsConfig, clock: Rc<Clock>) -> Result<Self> {
        config.validate()?;
        let last_clock_seconds = clock.total_elapsed_seconds();
        debug!(
            "Physics2D created: gravity {:?}, fixed step {}s",
            config.gravity, config.fixed_delta_seconds
        );
        Ok(Self {
            config,
            clock,
            bodies: Arena::new(),
            colliders: Arena::new(),
            layers: LayerMatrix::new(),
            solid_collisions: Vec::new(),
            trigger_collisions: Vec::new(),
            listeners: HashMap::new(),
            frame_index: 0,
            step_timer: 0.0,
            last_clock_seconds,
            next_collider_id: 1,
        })
    }

    // --- Factory ---

    /// Creates a dynamic body with the configured default drag.
    pub fn create_rigidbody(&mut self, position: Vec2, mass: f64) -> Result<RigidbodyHandle> {
        let mut body = Rigidbody2D::new(position, mass)?;
        body.set_drag(self.config.default_drag);
        let handle = self.bodies.insert(body);
        debug!("Created rigidbody {:?} at {:?}, mass {}", handle, position, mass);
        Ok(handle)
    }

    /// Creates an unattached disc collider offset from its future body's origin.
    /// It starts with the configured default material and layer.
    pub fn create_disc_collider(&mut self, offset: Vec2, radius: f64) -> Result<ColliderHandle> {
        let collider = Collider2D::disc(self.next_collider_id, offset, radius)?;
        self.register_collider(collider)
    }

    /// Vertices form a convex loop in either winding.
    pub fn create_polygon_collider(&mut self, vertices: Vec<Vec2>) -> Result<ColliderHandle> {
        let collider = Collider2D::polygon(self.next_collider_id, vertices)?;
        self.register_collider(collider)
    }

    fn register_collider(&mut self, mut collider: Collider2D) -> Result<ColliderHandle> {
        collider.set_layer(self.config.default_layer)?;
        collider.set_material(self.config.default_material);
        self.next_collider_id += 1;
        let id = collider.id();
        let handle = self.colliders.insert(collider);
        debug!("Created collider {:?} (id {})", handle, id);
        Ok(handle)
    }

    /// Makes `body` the owner of `collider`. A collider the body held before
    /// is destroyed; a previous owner of `collider` lets go of it.
    pub fn attach_collider(
        &mut self,
        body: RigidbodyHandle,
        collider: ColliderHandle,
    ) -> Result<()> {
        let previous = self
            .bodies
            .get(body)
            .ok_or(PhysicsError::BodyNotFound(body))?
            .collider();
        let former_owner = self
            .colliders
            .get(collider)
            .ok_or(PhysicsError::ColliderNotFound(collider))?
            .rigidbody();

        if let Some(previous) = previous.filter(|&p| p != collider) {
            if let Some(old) = self.colliders.get_mut(previous) {
                old.set_rigidbody(None);
                old.mark_destroy_pending();
                debug!("Collider {:?} replaced on {:?}; pending destroy", previous, body);
            }
        }
        if let Some(owner) = former_owner.filter(|&o| o != body) {
            if let Some(owner) = self.bodies.get_mut(owner) {
                if owner.collider() == Some(collider) {
                    owner.set_collider(None);
                }
            }
        }

        let Some(owner) = self.bodies.get_mut(body) else {
            return Err(PhysicsError::BodyNotFound(body));
        };
        let Some(attached) = self.colliders.get_mut(collider) else {
            return Err(PhysicsError::ColliderNotFound(collider));
        };
        owner.set_collider(Some(collider));
        attached.set_rigidbody(Some(body));
        attached.update_world_shape(Some(owner.transform()));
        owner.set_moment(attached.calculate_moment(owner.mass()));
        debug!(
            "Attached collider {:?} to {:?}; moment {}",
            collider,
            body,
            owner.moment()
        );
        Ok(())
    }

    // --- Destruction ---

    /// Marks the collider for removal at the next [`Physics2D::end_frame`].
    pub fn destroy_collider(&mut self, handle: ColliderHandle) -> Result<()> {
        let collider = self
            .colliders
            .get_mut(handle)
            .ok_or(PhysicsError::ColliderNotFound(handle))?;
        collider.mark_destroy_pending();
        debug!("Collider {:?} pending destroy", handle);
        Ok(())
    }

    /// Marks the body for removal at the next [`Physics2D::end_frame`].
    ///
    /// # Panics
    ///
    /// If the body still owns a collider that is not itself being destroyed.
    pub fn destroy_body(&mut self, handle: RigidbodyHandle) -> Result<()> {
        let owned = self
            .bodies
            .get(handle)
            .ok_or(PhysicsError::BodyNotFound(handle))?
            .collider();
        if let Some(collider) = owned {
            let live = self
                .colliders
                .get(collider)
                .is_some_and(|c| !c.is_destroy_pending());
            if live {
                panic!(
                    "rigidbody {:?} destroyed while it still owns live collider {:?}",
                    handle, collider
                );
            }
        }
        if let Some(body) = self.bodies.get_mut(handle) {
            body.mark_destroy_pending();
        }
        debug!("Rigidbody {:?} pending destroy", handle);
        Ok(())
    }

    /// Frees colliders, then bodies, marked for destruction. Their slots are
    /// reused with a new generation.
    pub fn end_frame(&mut self) {
        let doomed: Vec<ColliderHandle> = self
            .colliders
            .iter()
            .filter(|(_, c)| c.is_destroy_pending())
            .map(|(h, _)| h)
            .collect();
        for handle in doomed {
            let Some(collider) = self.colliders.remove(handle) else {
                continue;
            };
            if let Some(body) = collider.rigidbody().and_then(|b| self.bodies.get_mut(b)) {
                if body.collider() == Some(handle) {
                    body.set_collider(None);
                }
            }
            self.listeners.remove(&handle);
            self.solid_collisions.retain(|c| !c.involves(handle));
            self.trigger_collisions.retain(|c| !c.involves(handle));
            debug!("Freed collider {:?} (id {})", handle, collider.id());
        }

        let doomed: Vec<RigidbodyHandle> = self
            .bodies
            .iter()
            .filter(|(_, b)| b.is_destroy_pending())
            .map(|(h, _)| h)
            .collect();
        for handle in doomed {
            if self.bodies.remove(handle).is_none() {
                continue;
            }
            for (_, collider) in self.colliders.iter_mut() {
                if collider.rigidbody() == Some(handle) {
                    collider.set_rigidbody(None);
                    collider.update_world_shape(None);
                }
            }
            debug!("Freed rigidbody {:?}", handle);
        }
    }

    // --- Accessors ---

    /// `None` once the body has been freed.
    pub fn body(&self, handle: RigidbodyHandle) -> Option<&Rigidbody2D> {
        self.bodies.get(handle)
    }

    /// Placement changes go through the world so the collider stays in sync;
    /// everything else can be changed here.
    pub fn body_mut(&mut self, handle: RigidbodyHandle) -> Option<&mut Rigidbody2D> {
        self.bodies.get_mut(handle)
    }

    /// `None` once the collider has been freed.
    pub fn collider(&self, handle: ColliderHandle) -> Option<&Collider2D> {
        self.colliders.get(handle)
    }

    pub fn collider_mut(&mut self, handle: ColliderHandle) -> Option<&mut Collider2D> {
        self.colliders.get_mut(handle)
    }

    /// Live bodies in slot order.
    pub fn bodies(&self) -> impl Iterator<Item = (RigidbodyHandle, &Rigidbody2D)> + '_ {
        self.bodies.iter()
    }

    /// Live colliders in slot order.
    pub fn colliders(&self) -> impl Iterator<Item = (ColliderHandle, &Collider2D)> + '_ {
        self.colliders.iter()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Solid contacts observed on the last step.
    pub fn solid_collisions(&self) -> &[Collision2D] {
        &self.solid_collisions
    }

    /// Trigger overlaps observed on the last step.
    pub fn trigger_collisions(&self) -> &[Collision2D] {
        &self.trigger_collisions
    }

    /// Number of completed simulation steps.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn gravity(&self) -> Vec2 {
        self.config.gravity
    }

    /// Applied from the next step on.
    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.config.gravity = gravity;
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn clock(&self) -> &Rc<Clock> {
        &self.clock
    }

    // --- Mutators that keep collider geometry in sync ---

    /// Teleports the body and refreshes its collider.
    pub fn set_position(&mut self, handle: RigidbodyHandle, position: Vec2) -> Result<()> {
        self.bodies
            .get_mut(handle)
            .ok_or(PhysicsError::BodyNotFound(handle))?
            .set_position(position);
        self.sync_collider(handle);
        Ok(())
    }

    /// Stored normalised into `[0, 2π)`.
    pub fn set_rotation_radians(&mut self, handle: RigidbodyHandle, radians: f64) -> Result<()> {
        self.bodies
            .get_mut(handle)
            .ok_or(PhysicsError::BodyNotFound(handle))?
            .set_rotation_radians(radians);
        self.sync_collider(handle);
        Ok(())
    }

    /// Translates the owning body, or the collider itself when it has none.
    pub fn move_collider(&mut self, handle: ColliderHandle, displacement: Vec2) -> Result<()> {
        let owner = self
            .colliders
            .get(handle)
            .ok_or(PhysicsError::ColliderNotFound(handle))?
            .rigidbody();

        let owner = owner.and_then(|b| self.bodies.get(b).map(|body| (b, body.position())));
        if let Some((body, position)) = owner {
            return self.set_position(body, position + displacement);
        }

        if let Some(collider) = self.colliders.get_mut(handle) {
            collider.translate_local(displacement);
            collider.update_world_shape(None);
        }
        Ok(())
    }

    /// See [`Rigidbody2D::set_mass`].
    pub fn set_mass(&mut self, handle: RigidbodyHandle, mass: f64) -> Result<()> {
        self.bodies
            .get_mut(handle)
            .ok_or(PhysicsError::BodyNotFound(handle))?
            .set_mass(mass)
    }

    /// Takes effect on the next step.
    pub fn set_simulation_mode(
        &mut self,
        handle: RigidbodyHandle,
        mode: SimulationMode,
    ) -> Result<()> {
        self.bodies
            .get_mut(handle)
            .ok_or(PhysicsError::BodyNotFound(handle))?
            .set_mode(mode);
        Ok(())
    }

    /// Fails for layers outside `0..LAYER_COUNT`.
    pub fn set_layer(&mut self, handle: ColliderHandle, layer: u32) -> Result<()> {
        self.colliders
            .get_mut(handle)
            .ok_or(PhysicsError::ColliderNotFound(handle))?
            .set_layer(layer)?;
        debug!("Collider {:?} moved to layer {}", handle, layer);
        Ok(())
    }

    /// Triggers report overlaps but are never resolved.
    pub fn set_trigger(&mut self, handle: ColliderHandle, is_trigger: bool) -> Result<()> {
        self.colliders
            .get_mut(handle)
            .ok_or(PhysicsError::ColliderNotFound(handle))?
            .set_trigger(is_trigger);
        Ok(())
    }

    fn sync_collider(&mut self, handle: RigidbodyHandle) {
        let Some(body) = self.bodies.get(handle) else {
            return;
        };
        if let Some(collider) = body.collider().and_then(|c| self.colliders.get_mut(c)) {
            collider.update_world_shape(Some(body.transform()));
        }
    }

    // --- Layers ---

    /// Lets colliders on layers `a` and `b` meet. Symmetric.
    pub fn enable_layer_interaction(&mut self, a: u32, b: u32) -> Result<()> {
        self.layers.enable(a, b)?;
        debug!("Layers {} and {} interact", a, b);
        Ok(())
    }

    pub fn disable_layer_interaction(&mut self, a: u32, b: u32) -> Result<()> {
        self.layers.disable(a, b)?;
        debug!("Layers {} and {} no longer interact", a, b);
        Ok(())
    }

    /// Returns whether the pair interacts afterwards.
    pub fn toggle_layer_interaction(&mut self, a: u32, b: u32) -> Result<bool> {
        let enabled = self.layers.toggle(a, b)?;
        debug!("Layers {} and {} toggled to {}", a, b, enabled);
        Ok(enabled)
    }

    pub fn do_layers_interact(&self, a: u32, b: u32) -> Result<bool> {
        self.layers.interacts(a, b)
    }

    // --- Listeners ---

    /// Replaces any listener already registered for `collider`.
    pub fn set_listener(
        &mut self,
        collider: ColliderHandle,
        listener: Box<dyn CollisionListener>,
    ) -> Result<()> {
        if !self.colliders.contains(collider) {
            return Err(PhysicsError::ColliderNotFound(collider));
        }
        self.listeners.insert(collider, listener);
        Ok(())
    }

    /// Returns the listener that was registered, if any.
    pub fn remove_listener(&mut self, collider: ColliderHandle) -> Option<Box<dyn CollisionListener>> {
        self.listeners.remove(&collider)
    }

    // --- Simulation ---

    /// Runs every whole fixed step that has elapsed on the clock since the
    /// previous call. Returns the number of steps run.
    pub fn update(&mut self) -> u32 {
        let now = self.clock.total_elapsed_seconds();
        let elapsed = now - self.last_clock_seconds;
        self.last_clock_seconds = now;
        if self.clock.is_paused() {
            return 0;
        }
        if elapsed > 0.0 {
            self.step_timer += elapsed;
        }

        let fixed = self.config.fixed_delta_seconds;
        let mut steps = 0;
        while self.step_timer >= fixed {
            if self.config.max_steps_per_update.is_some_and(|max| steps >= max) {
                warn!(
                    "Physics fell behind: discarding {} pending steps",
                    (self.step_timer / fixed).floor()
                );
                self.step_timer %= fixed;
                break;
            }
            self.step_timer -= fixed;
            self.advance_simulation(fixed);
            steps += 1;
        }
        steps
    }

    /// Runs one simulation step of `dt` seconds.
    ///
    /// Pairs are detected in collider slot order and resolved in that same
    /// order, whether they entered on this step or are staying.
    pub fn advance_simulation(&mut self, dt: f64) {
        let frame = self.frame_index;
        trace!("Step {} (dt {})", frame, dt);

        // Frame start
        for (_, body) in self.bodies.iter_mut() {
            if body.is_active() {
                body.snapshot_frame_start();
            }
        }

        // Effectors
        let gravity = self.config.gravity;
        for (_, body) in self.bodies.iter_mut() {
            if body.is_active() && body.accepts_forces() {
                body.add_force(gravity * body.mass());
                body.apply_drag_force();
            }
        }

        // Integration
        for (_, body) in self.bodies.iter_mut() {
            if body.is_active() && body.is_simulated() {
                integrator::integrate(body, dt);
            }
        }
        for (_, body) in self.bodies.iter() {
            if !body.is_active() || !body.is_simulated() {
                continue;
            }
            if let Some(collider) = body.collider().and_then(|c| self.colliders.get_mut(c)) {
                collider.update_world_shape(Some(body.transform()));
            }
        }
        for (_, body) in self.bodies.iter_mut() {
            if body.is_active() && body.is_simulated() {
                body.update_verlet_velocity(dt);
            }
        }

        // Detection
        let solids = self.participants(false);
        let triggers = self.participants(true);
        let detected_solid = self.detect_solid(&solids, frame);
        let detected_trigger = self.detect_triggers(&triggers, &solids, frame);

        // Dispatch, then forget pairs that just left
        let solid_events = events::classify(&mut self.solid_collisions, detected_solid, frame);
        let trigger_events =
            events::classify(&mut self.trigger_collisions, detected_trigger, frame);
        self.dispatch(CollisionKind::Overlap, &solid_events);
        self.dispatch(CollisionKind::Trigger, &trigger_events);
        events::purge_stale(&mut self.solid_collisions, frame);
        events::purge_stale(&mut self.trigger_collisions, frame);

        // Resolution, in this step's detection order
        for collision in &events::current_contacts(&solid_events) {
            self.resolve(collision);
        }

        self.frame_index += 1;
    }

    /// Colliders taking part in detection this step, in slot order, with
    /// whether each counts as static.
    fn participants(&self, triggers: bool) -> Vec<(ColliderHandle, bool)> {
        self.colliders
            .iter()
            .filter(|(_, c)| c.is_active() && c.is_trigger() == triggers)
            .filter_map(|(handle, collider)| {
                let is_static = match collider.rigidbody() {
                    None => true,
                    Some(body) => {
                        let body = self.bodies.get(body).filter(|b| b.is_active())?;
                        body.is_static()
                    }
                };
                Some((handle, is_static))
            })
            .collect()
    }

    fn layers_interact(&self, a: &Collider2D, b: &Collider2D) -> bool {
        self.layers.interacts(a.layer(), b.layer()).unwrap_or(false)
    }

    fn detect_solid(&self, solids: &[(ColliderHandle, bool)], frame: u64) -> Vec<Collision2D> {
        let mut detected = Vec::new();
        for (i, &(handle_a, static_a)) in solids.iter().enumerate() {
            for &(handle_b, static_b) in &solids[i + 1..] {
                if static_a && static_b {
                    continue;
                }
                let (Some(a), Some(b)) = (self.colliders.get(handle_a), self.colliders.get(handle_b))
                else {
                    continue;
                };
                if !self.layers_interact(a, b) {
                    continue;
                }

                // A polygon always leads against a disc
                let ((me, me_handle), (them, them_handle)) = if a.kind() < b.kind() {
                    ((b, handle_b), (a, handle_a))
                } else {
                    ((a, handle_a), (b, handle_b))
                };
                if let Some(manifold) = me.get_manifold(them) {
                    detected.push(Collision2D::new(
                        me_handle,
                        me.id(),
                        them_handle,
                        them.id(),
                        Some(manifold),
                        frame,
                    ));
                }
            }
        }
        detected
    }

    fn detect_triggers(
        &self,
        triggers: &[(ColliderHandle, bool)],
        solids: &[(ColliderHandle, bool)],
        frame: u64,
    ) -> Vec<Collision2D> {
        let mut detected = Vec::new();
        for &(trigger_handle, _) in triggers {
            let Some(trigger) = self.colliders.get(trigger_handle) else {
                continue;
            };
            for &(other_handle, _) in solids {
                let Some(other) = self.colliders.get(other_handle) else {
                    continue;
                };
                if self.layers_interact(trigger, other) && trigger.intersects(other) {
                    detected.push(Collision2D::new(
                        trigger_handle,
                        trigger.id(),
                        other_handle,
                        other.id(),
                        None,
                        frame,
                    ));
                }
            }
        }
        detected
    }

    fn dispatch(&mut self, kind: CollisionKind, batch: &[(ContactPhase, Collision2D)]) {
        for (phase, collision) in batch {
            trace!(
                "{:?} {:?}: {:?} / {:?}",
                kind,
                phase,
                collision.me,
                collision.them
            );
            if let Some(listener) = self.listeners.get_mut(&collision.me) {
                events::notify(listener.as_mut(), kind, *phase, collision);
            }
            if let Some(listener) = self.listeners.get_mut(&collision.them) {
                events::notify(listener.as_mut(), kind, *phase, &collision.swapped());
            }
        }
    }

    fn contact_body(&self, collider: &Collider2D) -> (Option<RigidbodyHandle>, ContactBody) {
        match collider
            .rigidbody()
            .and_then(|h| self.bodies.get(h).map(|b| (h, b)))
        {
            Some((handle, body)) => (Some(handle), ContactBody::from_body(body)),
            None => (None, ContactBody::IMMOVABLE),
        }
    }

    /// Sequential impulse along the normal, then friction, then positional
    /// correction split by push weight.
    fn resolve(&mut self, collision: &Collision2D) {
        let Some(manifold) = collision.manifold else {
            return;
        };
        let (Some(me), Some(them)) = (
            self.colliders.get(collision.me),
            self.colliders.get(collision.them),
        ) else {
            return;
        };
        let restitution = me.bounciness_with(them);
        let friction = me.friction_with(them);
        let (body_a, a) = self.contact_body(me);
        let (body_b, b) = self.contact_body(them);

        let normal = manifold.normal;
        let contact = manifold.contact_point();
        let (weight_a, weight_b) = push_weights(&a, &b);

        let relative = a.velocity_at(contact) - b.velocity_at(contact);
        let closing = relative.dot(normal);
        if closing < 0.0 {
            let denominator = a.inverse_mass_along(contact, normal) + b.inverse_mass_along(contact, normal);
            if denominator > 0.0 {
                let normal_impulse = -(1.0 + restitution) * closing / denominator;
                self.apply_impulse(body_a, contact, normal * normal_impulse);
                self.apply_impulse(body_b, contact, -normal * normal_impulse);
                self.apply_friction(body_a, body_b, contact, normal, normal_impulse, friction);
            }
        }

        let correction = normal * manifold.penetration;
        self.push_body(body_a, correction * weight_a);
        self.push_body(body_b, -correction * weight_b);
    }

    fn apply_impulse(&mut self, body: Option<RigidbodyHandle>, point: Vec2, impulse: Vec2) {
        if let Some(body) = body.and_then(|h| self.bodies.get_mut(h)) {
            body.apply_impulse_at(point, impulse);
        }
    }

    fn apply_friction(
        &mut self,
        body_a: Option<RigidbodyHandle>,
        body_b: Option<RigidbodyHandle>,
        contact: Vec2,
        normal: Vec2,
        normal_impulse: f64,
        friction: f64,
    ) {
        let state = |handle: Option<RigidbodyHandle>| {
            handle
                .and_then(|h| self.bodies.get(h))
                .map(ContactBody::from_body)
                .unwrap_or(ContactBody::IMMOVABLE)
        };
        let (a, b) = (state(body_a), state(body_b));

        let relative = a.velocity_at(contact) - b.velocity_at(contact);
        let tangent = (relative - normal * relative.dot(normal)).normalize();
        if tangent.is_near_zero() {
            return;
        }
        let denominator = a.inverse_mass_along(contact, tangent) + b.inverse_mass_along(contact, tangent);
        if denominator <= 0.0 {
            return;
        }
        let tangent_impulse = -relative.dot(tangent) / denominator;

        if let Some(body) = body_a.and_then(|h| self.bodies.get_mut(h)) {
            body.apply_friction_at(contact, tangent, tangent_impulse, normal_impulse, friction);
        }
        if let Some(body) = body_b.and_then(|h| self.bodies.get_mut(h)) {
            body.apply_friction_at(contact, -tangent, tangent_impulse, normal_impulse, friction);
        }
    }

    fn push_body(&mut self, body: Option<RigidbodyHandle>, displacement: Vec2) {
        let Some(handle) = body else {
            return;
        };
        if displacement.is_near_zero() {
            return;
        }
        if let Some(body) = self.bodies.get_mut(handle) {
            let position = body.position() + displacement;
            body.set_position(position);
            self.sync_collider(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::material::PhysicsMaterial;
    use crate::shapes::Polygon;
    use approx::assert_abs_diff_eq;
    use std::cell::RefCell;

    const EPSILON: f64 = 1e-9;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn world(config: PhysicsConfig) -> (Physics2D, Rc<Clock>) {
        init_logging();
        let clock = Rc::new(Clock::new());
        let world = Physics2D::new(config, clock.clone()).unwrap();
        (world, clock)
    }

    fn disc_body(
        world: &mut Physics2D,
        position: Vec2,
        radius: f64,
        mass: f64,
    ) -> (RigidbodyHandle, ColliderHandle) {
        let body = world.create_rigidbody(position, mass).unwrap();
        let collider = world.create_disc_collider(Vec2::ZERO, radius).unwrap();
        world.attach_collider(body, collider).unwrap();
        (body, collider)
    }

    fn box_body(
        world: &mut Physics2D,
        position: Vec2,
        half_width: f64,
        half_height: f64,
        mass: f64,
    ) -> (RigidbodyHandle, ColliderHandle) {
        let body = world.create_rigidbody(position, mass).unwrap();
        let collider = world
            .create_polygon_collider(vec![
                Vec2::new(-half_width, -half_height),
                Vec2::new(half_width, -half_height),
                Vec2::new(half_width, half_height),
                Vec2::new(-half_width, half_height),
            ])
            .unwrap();
        world.attach_collider(body, collider).unwrap();
        (body, collider)
    }

    type EventLog = Rc<RefCell<Vec<(String, Collision2D)>>>;

    struct Recorder(EventLog);

    impl Recorder {
        fn push(&self, name: &str, collision: &Collision2D) {
            self.0.borrow_mut().push((name.to_string(), collision.clone()));
        }
    }

    impl CollisionListener for Recorder {
        fn on_overlap_enter(&mut self, c: &Collision2D) {
            self.push("overlap_enter", c);
        }
        fn on_overlap_stay(&mut self, c: &Collision2D) {
            self.push("overlap_stay", c);
        }
        fn on_overlap_leave(&mut self, c: &Collision2D) {
            self.push("overlap_leave", c);
        }
        fn on_trigger_enter(&mut self, c: &Collision2D) {
            self.push("trigger_enter", c);
        }
        fn on_trigger_stay(&mut self, c: &Collision2D) {
            self.push("trigger_stay", c);
        }
        fn on_trigger_leave(&mut self, c: &Collision2D) {
            self.push("trigger_leave", c);
        }
    }

    fn record(world: &mut Physics2D, collider: ColliderHandle) -> EventLog {
        let log: EventLog = Rc::new(RefCell::new(Vec::new()));
        world
            .set_listener(collider, Box::new(Recorder(log.clone())))
            .unwrap();
        log
    }

    fn names(log: &EventLog) -> Vec<String> {
        log.borrow().iter().map(|(n, _)| n.clone()).collect()
    }

    #[test]
    fn test_world_new_rejects_bad_config() {
        let clock = Rc::new(Clock::new());
        let config = PhysicsConfig::default().with_fixed_delta(-1.0);
        assert!(Physics2D::new(config, clock).is_err());
    }

    #[test]
    fn test_two_disc_scenario() {
        let (mut world, _) = world(PhysicsConfig::zero_gravity());
        let (body_a, collider_a) = disc_body(&mut world, Vec2::ZERO, 1.0, 1.0);
        let (body_b, collider_b) = disc_body(&mut world, Vec2::new(1.5, 0.0), 1.0, 1.0);

        world.advance_simulation(1.0 / 60.0);

        let collisions = world.solid_collisions();
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].me, collider_a);
        assert_eq!(collisions[0].them, collider_b);
        let manifold = collisions[0].manifold.unwrap();
        assert_abs_diff_eq!(manifold.penetration, 0.5, epsilon = EPSILON);
        assert_abs_diff_eq!(manifold.normal.x, -1.0, epsilon = EPSILON);
        assert_abs_diff_eq!(manifold.normal.y, 0.0, epsilon = EPSILON);

        let a = world.body(body_a).unwrap().position();
        let b = world.body(body_b).unwrap().position();
        assert_abs_diff_eq!(a.x, -0.25, epsilon = EPSILON);
        assert_abs_diff_eq!(b.x, 1.75, epsilon = EPSILON);
        assert_abs_diff_eq!(a.y, 0.0, epsilon = EPSILON);
        assert_eq!(world.frame_index(), 1);

        // Colliders follow the corrected bodies
        assert_abs_diff_eq!(world.collider(collider_b).unwrap().world_center().x, 1.75, epsilon = EPSILON);
    }

    #[test]
    fn test_overlap_events_enter_stay_stay_leave() {
        let (mut world, _) = world(PhysicsConfig::zero_gravity());
        let (body_a, collider_a) = disc_body(&mut world, Vec2::ZERO, 1.0, 1.0);
        let (body_b, collider_b) = disc_body(&mut world, Vec2::new(1.0, 0.0), 1.0, 1.0);
        // Kinematic bodies keep overlapping: nothing pushes them apart
        world.set_simulation_mode(body_a, SimulationMode::Kinematic).unwrap();
        world.set_simulation_mode(body_b, SimulationMode::Kinematic).unwrap();
        let log_a = record(&mut world, collider_a);
        let log_b = record(&mut world, collider_b);

        for _ in 0..3 {
            world.advance_simulation(0.1);
        }
        world.set_position(body_b, Vec2::new(10.0, 0.0)).unwrap();
        world.advance_simulation(0.1);
        world.advance_simulation(0.1);

        let expected = vec!["overlap_enter", "overlap_stay", "overlap_stay", "overlap_leave"];
        assert_eq!(names(&log_a), expected);
        assert_eq!(names(&log_b), expected);

        // Each side sees itself as `me`
        let (_, seen_by_a) = &log_a.borrow()[0];
        let (_, seen_by_b) = &log_b.borrow()[0];
        assert_eq!(seen_by_a.me, collider_a);
        assert_eq!(seen_by_b.me, collider_b);
        assert_eq!(seen_by_a.pair_id, seen_by_b.pair_id);
        let na = seen_by_a.manifold.unwrap().normal;
        let nb = seen_by_b.manifold.unwrap().normal;
        assert_abs_diff_eq!(na.x, -nb.x, epsilon = EPSILON);
        assert!(world.solid_collisions().is_empty());
    }

    #[test]
    fn test_static_body_is_immovable() {
        let (mut world, _) = world(PhysicsConfig::zero_gravity());
        let (wall, _) = disc_body(&mut world, Vec2::ZERO, 1.0, 100.0);
        world.set_simulation_mode(wall, SimulationMode::Static).unwrap();
        let (ball, _) = disc_body(&mut world, Vec2::new(1.5, 0.0), 1.0, 1.0);

        world.advance_simulation(1.0 / 60.0);

        assert_eq!(world.body(wall).unwrap().position(), Vec2::ZERO);
        assert_abs_diff_eq!(world.body(ball).unwrap().position().x, 2.0, epsilon = EPSILON);
    }

    #[test]
    fn test_kinematic_body_is_not_pushed() {
        let (mut world, _) = world(PhysicsConfig::zero_gravity());
        let (mover, _) = disc_body(&mut world, Vec2::ZERO, 1.0, 1.0);
        world.set_simulation_mode(mover, SimulationMode::Kinematic).unwrap();
        let (ball, _) = disc_body(&mut world, Vec2::new(1.5, 0.0), 1.0, 1.0);

        world.advance_simulation(1.0 / 60.0);

        assert_eq!(world.body(mover).unwrap().position(), Vec2::ZERO);
        assert_abs_diff_eq!(world.body(ball).unwrap().position().x, 2.0, epsilon = EPSILON);
    }

    #[test]
    fn test_static_pairs_are_skipped() {
        let (mut world, _) = world(PhysicsConfig::zero_gravity());
        let (a, _) = disc_body(&mut world, Vec2::ZERO, 1.0, 1.0);
        let (b, _) = disc_body(&mut world, Vec2::new(0.5, 0.0), 1.0, 1.0);
        world.set_simulation_mode(a, SimulationMode::Static).unwrap();
        world.set_simulation_mode(b, SimulationMode::Static).unwrap();
        // An unattached collider counts as static too
        world.create_disc_collider(Vec2::new(0.2, 0.0), 1.0).unwrap();

        world.advance_simulation(0.1);
        assert!(world.solid_collisions().is_empty());
    }

    #[test]
    fn test_elastic_head_on_collision_swaps_velocities() {
        let config = PhysicsConfig::zero_gravity().with_default_material(PhysicsMaterial::new(1.0, 0.0));
        let (mut world, _) = world(config);
        let (a, _) = disc_body(&mut world, Vec2::ZERO, 1.0, 1.0);
        let (b, _) = disc_body(&mut world, Vec2::new(1.9, 0.0), 1.0, 1.0);
        world.body_mut(a).unwrap().set_velocity(Vec2::new(1.0, 0.0));
        world.body_mut(b).unwrap().set_velocity(Vec2::new(-1.0, 0.0));

        world.advance_simulation(0.01);

        assert_abs_diff_eq!(world.body(a).unwrap().velocity().x, -1.0, epsilon = EPSILON);
        assert_abs_diff_eq!(world.body(b).unwrap().velocity().x, 1.0, epsilon = EPSILON);
        assert_abs_diff_eq!(world.body(a).unwrap().angular_velocity(), 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_friction_slows_sliding_disc_and_spins_it() {
        let (mut world, _) = world(PhysicsConfig::default().with_fixed_delta(1.0 / 60.0));
        let (ball, ball_collider) = disc_body(&mut world, Vec2::new(0.0, 0.49), 0.5, 1.0);
        let (floor, floor_collider) = box_body(&mut world, Vec2::new(0.0, -0.5), 5.0, 0.5, 1.0);
        world.set_simulation_mode(floor, SimulationMode::Static).unwrap();
        world.body_mut(ball).unwrap().set_velocity(Vec2::new(2.0, 0.0));

        world.advance_simulation(1.0 / 60.0);

        // The polygon leads even though the disc was created first
        let contact = &world.solid_collisions()[0];
        assert_eq!(contact.me, floor_collider);
        assert_eq!(contact.them, ball_collider);

        let ball = world.body(ball).unwrap();
        assert!(ball.velocity().x < 2.0);
        assert!(ball.velocity().x > 1.9);
        assert!(ball.angular_velocity() < 0.0);
        assert!(ball.velocity().y >= 0.0);
        assert_eq!(world.body(floor).unwrap().position(), Vec2::new(0.0, -0.5));
    }

    #[test]
    fn test_box_resting_on_floor_is_pushed_out() {
        let (mut world, _) = world(PhysicsConfig::default());
        let (floor, _) = box_body(&mut world, Vec2::new(0.0, -0.5), 5.0, 0.5, 1.0);
        world.set_simulation_mode(floor, SimulationMode::Static).unwrap();
        let (crate_body, _) = box_body(&mut world, Vec2::new(0.0, 0.45), 0.5, 0.5, 2.0);

        world.advance_simulation(1.0 / 60.0);

        let body = world.body(crate_body).unwrap();
        assert_abs_diff_eq!(body.position().y, 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(body.position().x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(body.angular_velocity(), 0.0, epsilon = 1e-9);
        assert!(body.velocity().y > -1e-9);
    }

    #[test]
    fn test_gravity_only_moves_dynamic_bodies() {
        let (mut world, _) = world(PhysicsConfig::default().with_gravity(0.0, -10.0));
        let (falling, _) = disc_body(&mut world, Vec2::ZERO, 0.5, 2.0);
        let (fixed, _) = disc_body(&mut world, Vec2::new(5.0, 0.0), 0.5, 2.0);
        world.set_simulation_mode(fixed, SimulationMode::Static).unwrap();

        world.advance_simulation(0.1);

        let body = world.body(falling).unwrap();
        assert_abs_diff_eq!(body.velocity().y, -1.0, epsilon = EPSILON);
        assert_abs_diff_eq!(body.position().y, -0.1, epsilon = EPSILON);
        assert_abs_diff_eq!(body.verlet_velocity().y, -1.0, epsilon = EPSILON);
        assert_eq!(world.body(fixed).unwrap().position(), Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_layers_filter_pairs() {
        let (mut world, _) = world(PhysicsConfig::zero_gravity());
        let (_, a) = disc_body(&mut world, Vec2::ZERO, 1.0, 1.0);
        let (_, b) = disc_body(&mut world, Vec2::new(1.0, 0.0), 1.0, 1.0);
        world.set_layer(b, 3).unwrap();
        world.disable_layer_interaction(3, 0).unwrap();
        assert_eq!(world.do_layers_interact(0, 3), Ok(false));

        world.advance_simulation(0.1);
        assert!(world.solid_collisions().is_empty());

        assert_eq!(world.toggle_layer_interaction(0, 3), Ok(true));
        world.advance_simulation(0.1);
        assert_eq!(world.solid_collisions().len(), 1);

        assert_eq!(world.set_layer(a, 32), Err(PhysicsError::InvalidLayer(32)));
        assert_eq!(
            world.enable_layer_interaction(0, 99),
            Err(PhysicsError::InvalidLayer(99))
        );
    }

    #[test]
    fn test_trigger_reports_without_pushing() {
        let (mut world, _) = world(PhysicsConfig::zero_gravity());
        let zone = world.create_disc_collider(Vec2::ZERO, 2.0).unwrap();
        world.set_trigger(zone, true).unwrap();
        let (ball, ball_collider) = disc_body(&mut world, Vec2::new(1.0, 0.0), 0.5, 1.0);
        let zone_log = record(&mut world, zone);
        let ball_log = record(&mut world, ball_collider);

        world.advance_simulation(0.1);
        world.advance_simulation(0.1);
        world.set_position(ball, Vec2::new(10.0, 0.0)).unwrap();
        world.advance_simulation(0.1);

        assert_eq!(
            names(&zone_log),
            vec!["trigger_enter", "trigger_stay", "trigger_leave"]
        );
        assert_eq!(names(&ball_log), names(&zone_log));
        assert!(zone_log.borrow()[0].1.manifold.is_none());
        assert_eq!(ball_log.borrow()[0].1.me, ball_collider);
        assert!(world.solid_collisions().is_empty());
        assert!(world.trigger_collisions().is_empty());
    }

    #[test]
    fn test_trigger_overlap_leaves_body_in_place() {
        let (mut world, _) = world(PhysicsConfig::zero_gravity());
        let (_, zone) = disc_body(&mut world, Vec2::ZERO, 1.0, 1.0);
        world.set_trigger(zone, true).unwrap();
        let (ball, _) = disc_body(&mut world, Vec2::new(1.0, 0.0), 1.0, 1.0);

        world.advance_simulation(0.1);
        assert_eq!(world.trigger_collisions().len(), 1);
        assert_eq!(world.trigger_collisions()[0].me, zone);
        assert_eq!(world.body(ball).unwrap().position(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_deferred_destruction_and_stale_handles() {
        let (mut world, _) = world(PhysicsConfig::zero_gravity());
        let (body, collider) = disc_body(&mut world, Vec2::ZERO, 1.0, 1.0);

        world.destroy_collider(collider).unwrap();
        assert!(world.collider(collider).unwrap().is_destroy_pending());
        world.destroy_body(body).unwrap();
        assert!(world.body(body).is_some());

        world.end_frame();
        assert!(world.collider(collider).is_none());
        assert!(world.body(body).is_none());
        assert_eq!(world.body_count(), 0);

        let replacement = world.create_rigidbody(Vec2::ZERO, 1.0).unwrap();
        assert_eq!(replacement.index(), body.index());
        assert!(world.body(body).is_none());
        assert_eq!(
            world.set_position(body, Vec2::ZERO),
            Err(PhysicsError::BodyNotFound(body))
        );
        assert_eq!(
            world.destroy_collider(collider),
            Err(PhysicsError::ColliderNotFound(collider))
        );
    }

    #[test]
    fn test_destroyed_collider_stops_colliding() {
        let (mut world, _) = world(PhysicsConfig::zero_gravity());
        let (_, a) = disc_body(&mut world, Vec2::ZERO, 1.0, 1.0);
        let (_, _b) = disc_body(&mut world, Vec2::new(1.9, 0.0), 1.0, 1.0);
        let log = record(&mut world, a);

        world.advance_simulation(0.1);
        world.destroy_collider(a).unwrap();
        world.advance_simulation(0.1);
        world.end_frame();

        // The pending collider drops out of detection and reports a leave
        assert_eq!(names(&log), vec!["overlap_enter", "overlap_leave"]);
        assert!(world.solid_collisions().is_empty());
    }

    #[test]
    #[should_panic]
    fn test_destroy_body_with_live_collider_panics() {
        let (mut world, _) = world(PhysicsConfig::zero_gravity());
        let (body, _) = disc_body(&mut world, Vec2::ZERO, 1.0, 1.0);
        let _ = world.destroy_body(body);
    }

    #[test]
    fn test_collider_ids_are_monotonic() {
        let (mut world, _) = world(PhysicsConfig::zero_gravity());
        let a = world.create_disc_collider(Vec2::ZERO, 1.0).unwrap();
        let b = world.create_disc_collider(Vec2::ZERO, 1.0).unwrap();
        world.destroy_collider(a).unwrap();
        world.end_frame();
        let c = world.create_disc_collider(Vec2::ZERO, 1.0).unwrap();

        assert_eq!(world.collider(b).unwrap().id(), 2);
        assert_eq!(world.collider(c).unwrap().id(), 3);
        assert_eq!(c.index(), a.index());
    }

    #[test]
    fn test_new_colliders_take_config_layer_and_material() {
        let config = PhysicsConfig {
            default_layer: 7,
            ..PhysicsConfig::zero_gravity()
        }
        .with_default_material(PhysicsMaterial::new(0.9, 0.1));
        let (mut world, _) = world(config);
        let disc = world.create_disc_collider(Vec2::ZERO, 1.0).unwrap();
        let square = world
            .create_polygon_collider(Polygon::rectangle(0.5, 0.5).unwrap().vertices().to_vec())
            .unwrap();

        for handle in [disc, square] {
            let collider = world.collider(handle).unwrap();
            assert_eq!(collider.layer(), 7);
            assert_eq!(*collider.material(), PhysicsMaterial::new(0.9, 0.1));
        }
        assert_eq!(world.collider(square).unwrap().id(), 2);
    }

    #[test]
    fn test_attach_replaces_previous_collider() {
        let (mut world, _) = world(PhysicsConfig::zero_gravity());
        let body = world.create_rigidbody(Vec2::new(1.0, 1.0), 2.0).unwrap();
        let first = world.create_disc_collider(Vec2::ZERO, 1.0).unwrap();
        let second = world.create_disc_collider(Vec2::new(0.0, 1.0), 0.5).unwrap();

        world.attach_collider(body, first).unwrap();
        assert_abs_diff_eq!(world.body(body).unwrap().moment(), 1.0, epsilon = EPSILON);

        world.attach_collider(body, second).unwrap();
        assert!(world.collider(first).unwrap().is_destroy_pending());
        assert_eq!(world.collider(first).unwrap().rigidbody(), None);
        assert_eq!(world.collider(second).unwrap().rigidbody(), Some(body));
        assert_eq!(world.body(body).unwrap().collider(), Some(second));
        // 0.5 m r^2 + m |offset|^2
        assert_abs_diff_eq!(world.body(body).unwrap().moment(), 0.25 + 2.0, epsilon = EPSILON);
        assert_eq!(world.collider(second).unwrap().world_center(), Vec2::new(1.0, 2.0));

        world.end_frame();
        assert!(world.collider(first).is_none());
        assert!(world.collider(second).is_some());
    }

    #[test]
    fn test_move_collider() {
        let (mut world, _) = world(PhysicsConfig::zero_gravity());
        let loose = world.create_disc_collider(Vec2::ZERO, 1.0).unwrap();
        world.move_collider(loose, Vec2::new(3.0, 0.0)).unwrap();
        assert_eq!(world.collider(loose).unwrap().world_center(), Vec2::new(3.0, 0.0));

        let (body, attached) = disc_body(&mut world, Vec2::ZERO, 1.0, 1.0);
        world.move_collider(attached, Vec2::new(0.0, 2.0)).unwrap();
        assert_eq!(world.body(body).unwrap().position(), Vec2::new(0.0, 2.0));
        assert_eq!(world.collider(attached).unwrap().world_center(), Vec2::new(0.0, 2.0));
    }

    #[test]
    fn test_set_rotation_refreshes_polygon() {
        let (mut world, _) = world(PhysicsConfig::zero_gravity());
        let (body, collider) = box_body(&mut world, Vec2::ZERO, 2.0, 0.5, 1.0);
        world
            .set_rotation_radians(body, std::f64::consts::FRAC_PI_2 + std::f64::consts::TAU)
            .unwrap();
        assert_abs_diff_eq!(
            world.body(body).unwrap().rotation(),
            std::f64::consts::FRAC_PI_2,
            epsilon = EPSILON
        );
        let bounds = world.collider(collider).unwrap().world_bounds();
        assert_abs_diff_eq!(bounds.max.y, 2.0, epsilon = EPSILON);
        assert_abs_diff_eq!(bounds.max.x, 0.5, epsilon = EPSILON);
    }

    #[test]
    fn test_set_mass_through_world() {
        let (mut world, _) = world(PhysicsConfig::zero_gravity());
        let (body, _) = disc_body(&mut world, Vec2::ZERO, 1.0, 2.0);
        let moment = world.body(body).unwrap().moment();
        world.set_mass(body, 6.0).unwrap();
        assert_abs_diff_eq!(world.body(body).unwrap().moment(), moment * 3.0, epsilon = EPSILON);
        assert_eq!(world.set_mass(body, 0.0), Err(PhysicsError::InvalidMass(0.0)));
    }

    #[test]
    fn test_update_runs_whole_fixed_steps() {
        let (mut world, clock) = world(PhysicsConfig::zero_gravity().with_fixed_delta(0.25));

        assert_eq!(world.update(), 0);
        clock.advance(0.6);
        assert_eq!(world.update(), 2);
        clock.advance(0.2);
        assert_eq!(world.update(), 1);
        assert_eq!(world.frame_index(), 3);

        clock.pause();
        clock.advance(5.0);
        assert_eq!(world.update(), 0);
        clock.resume();

        clock.set_scale(0.0);
        clock.advance(5.0);
        assert_eq!(world.update(), 0);
        assert_eq!(world.frame_index(), 3);
    }

    #[test]
    fn test_update_caps_steps_and_drops_backlog() {
        let config = PhysicsConfig::zero_gravity()
            .with_fixed_delta(0.25)
            .with_max_steps_per_update(2);
        let (mut world, clock) = world(config);

        clock.advance(2.0);
        assert_eq!(world.update(), 2);
        assert_eq!(world.update(), 0);
        assert_eq!(world.frame_index(), 2);
    }

    #[test]
    fn test_stale_listener_target_rejected() {
        let (mut world, _) = world(PhysicsConfig::zero_gravity());
        let collider = world.create_disc_collider(Vec2::ZERO, 1.0).unwrap();
        world.destroy_collider(collider).unwrap();
        world.end_frame();
        let log: EventLog = Rc::new(RefCell::new(Vec::new()));
        assert_eq!(
            world.set_listener(collider, Box::new(Recorder(log))).err(),
            Some(PhysicsError::ColliderNotFound(collider))
        );
    }
}
