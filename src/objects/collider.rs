use crate::collision::aabb::Aabb;
use crate::collision::detection;
use crate::collision::manifold::Manifold2;
use crate::common::material::PhysicsMaterial;
use crate::error::Result;
use crate::math::transform::Transform;
use crate::math::vec2::Vec2;
use crate::shapes::{Disc, Polygon};
use crate::world::layers::LayerMatrix;
use crate::world::RigidbodyHandle;

/// Collider geometry in local space plus its cached world-space placement.
#[derive(Debug, Clone, PartialEq)]
pub enum ColliderShape {
    Disc { local: Disc, world_center: Vec2 },
    Polygon { local: Polygon, world: Polygon },
}

/// Discriminant order used to pick which collider of a mixed pair leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShapeKind {
    Disc,
    Polygon,
}

impl ColliderShape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            ColliderShape::Disc { .. } => ShapeKind::Disc,
            ColliderShape::Polygon { .. } => ShapeKind::Polygon,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Collider2D {
    id: u32,
    shape: ColliderShape,
    material: PhysicsMaterial,
    /// Non-owning back-link; the body owns this collider, never the reverse.
    rigidbody: Option<RigidbodyHandle>,
    world_bounds: Aabb,
    is_trigger: bool,
    layer: u32,
    enabled: bool,
    destroy_pending: bool,
}

impl Collider2D {
    /// Disc of `radius` centred at `local_position` in body space.
    pub fn disc(id: u32, local_position: Vec2, radius: f64) -> Result<Self> {
        let local = Disc::new(local_position, radius)?;
        Ok(Self::with_shape(
            id,
            ColliderShape::Disc {
                local,
                world_center: local_position,
            },
        ))
    }

    /// Convex polygon from vertices in body space, in either winding.
    pub fn polygon(id: u32, vertices: Vec<Vec2>) -> Result<Self> {
        let local = Polygon::new(vertices)?;
        let world = local.clone();
        Ok(Self::with_shape(id, ColliderShape::Polygon { local, world }))
    }

    fn with_shape(id: u32, shape: ColliderShape) -> Self {
        let mut collider = Self {
            id,
            shape,
            material: PhysicsMaterial::default(),
            rigidbody: None,
            world_bounds: Aabb::new(Vec2::ZERO, Vec2::ZERO),
            is_trigger: false,
            layer: 0,
            enabled: true,
            destroy_pending: false,
        };
        collider.update_world_shape(None);
        collider
    }

    // --- Accessors ---

    /// Monotonic id assigned by the world; never reused.
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn shape(&self) -> &ColliderShape {
        &self.shape
    }

    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    pub fn material(&self) -> &PhysicsMaterial {
        &self.material
    }

    /// Edits go through the material's saturating setters.
    pub fn material_mut(&mut self) -> &mut PhysicsMaterial {
        &mut self.material
    }

    pub fn set_material(&mut self, material: PhysicsMaterial) {
        self.material = material;
    }

    /// Combined restitution of a contact with `other`.
    pub fn bounciness_with(&self, other: &Collider2D) -> f64 {
        self.material.bounciness_with(&other.material)
    }

    pub fn friction_with(&self, other: &Collider2D) -> f64 {
        self.material.friction_with(&other.material)
    }

    /// The owning body, if attached.
    pub fn rigidbody(&self) -> Option<RigidbodyHandle> {
        self.rigidbody
    }

    pub(crate) fn set_rigidbody(&mut self, rigidbody: Option<RigidbodyHandle>) {
        self.rigidbody = rigidbody;
    }

    /// Bounds of the world-space shape, used as the broad phase.
    pub fn world_bounds(&self) -> Aabb {
        self.world_bounds
    }

    pub fn is_trigger(&self) -> bool {
        self.is_trigger
    }

    pub fn set_trigger(&mut self, is_trigger: bool) {
        self.is_trigger = is_trigger;
    }

    pub fn layer(&self) -> u32 {
        self.layer
    }

    pub fn set_layer(&mut self, layer: u32) -> Result<()> {
        LayerMatrix::check_layer(layer)?;
        self.layer = layer;
        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Set by the world; freed at the next `end_frame`.
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

    /// World-space center: the disc center or the polygon centroid.
    pub fn world_center(&self) -> Vec2 {
        match &self.shape {
            ColliderShape::Disc { world_center, .. } => *world_center,
            ColliderShape::Polygon { world, .. } => world.centroid(),
        }
    }

    // --- Geometry upkeep ---

    /// Recomputes world geometry and bounds. Unattached colliders pass `None`
    /// and are placed by their local geometry alone.
    pub(crate) fn update_world_shape(&mut self, transform: Option<Transform>) {
        let transform = transform.unwrap_or(Transform::IDENTITY);
        self.world_bounds = match &mut self.shape {
            ColliderShape::Disc {
                local,
                world_center,
            } => {
                *world_center = transform.apply(local.local_position);
                Aabb::from_center_half_extents(
                    *world_center,
                    Vec2::new(local.radius, local.radius),
                )
            }
            ColliderShape::Polygon { local, world } => {
                *world = local.transformed(transform);
                let fallback = transform.position;
                Aabb::from_points(world.vertices())
                    .unwrap_or_else(|| Aabb::new(fallback, fallback))
            }
        };
    }

    /// Shifts local geometry. Used to move colliders that have no body.
    pub(crate) fn translate_local(&mut self, displacement: Vec2) {
        match &mut self.shape {
            ColliderShape::Disc { local, .. } => local.local_position += displacement,
            ColliderShape::Polygon { local, .. } => local.translate(displacement),
        }
    }

    // --- Queries ---

    /// Closest point on or inside the world-space shape.
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        match &self.shape {
            ColliderShape::Disc {
                local,
                world_center,
            } => {
                let offset = point - *world_center;
                if offset.length_squared() <= local.radius * local.radius {
                    point
                } else {
                    *world_center + offset.normalize() * local.radius
                }
            }
            ColliderShape::Polygon { world, .. } => world.closest_point(point),
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        match &self.shape {
            ColliderShape::Disc {
                local,
                world_center,
            } => point.distance_squared(*world_center) <= local.radius * local.radius,
            ColliderShape::Polygon { world, .. } => world.contains(point),
        }
    }

    /// Moment of inertia about the owning body's origin for `mass`.
    pub fn calculate_moment(&self, mass: f64) -> f64 {
        match &self.shape {
            ColliderShape::Disc { local, .. } => local.moment(mass),
            ColliderShape::Polygon { local, .. } => local.moment_about_origin(mass),
        }
    }

    /// Boolean overlap test; cheaper than [`Collider2D::get_manifold`].
    pub fn intersects(&self, other: &Collider2D) -> bool {
        if !self.world_bounds.overlaps(&other.world_bounds) {
            return false;
        }
        match (&self.shape, &other.shape) {
            (
                ColliderShape::Disc {
                    local: a,
                    world_center: ca,
                },
                ColliderShape::Disc {
                    local: b,
                    world_center: cb,
                },
            ) => detection::discs_intersect(*ca, a.radius, *cb, b.radius),
            (
                ColliderShape::Disc {
                    local,
                    world_center,
                },
                ColliderShape::Polygon { world, .. },
            )
            | (
                ColliderShape::Polygon { world, .. },
                ColliderShape::Disc {
                    local,
                    world_center,
                },
            ) => detection::disc_intersects_polygon(*world_center, local.radius, world),
            (ColliderShape::Polygon { world: a, .. }, ColliderShape::Polygon { world: b, .. }) => {
                detection::polygons_intersect(a, b)
            }
        }
    }

    /// Contact between `self` and `other`; the normal points from `other`
    /// toward `self`.
    pub fn get_manifold(&self, other: &Collider2D) -> Option<Manifold2> {
        if !self.world_bounds.overlaps(&other.world_bounds) {
            return None;
        }
        match (&self.shape, &other.shape) {
            (
                ColliderShape::Disc {
                    local: a,
                    world_center: ca,
                },
                ColliderShape::Disc {
                    local: b,
                    world_center: cb,
                },
            ) => detection::disc_vs_disc(*ca, a.radius, *cb, b.radius),
            (
                ColliderShape::Disc {
                    local,
                    world_center,
                },
                ColliderShape::Polygon { world, .. },
            ) => detection::disc_vs_polygon(*world_center, local.radius, world),
            (ColliderShape::Polygon { .. }, ColliderShape::Disc { .. }) => {
                other.get_manifold(self).map(|m| m.flipped())
            }
            (ColliderShape::Polygon { world: a, .. }, ColliderShape::Polygon { world: b, .. }) => {
                detection::polygon_vs_polygon(a, b)
            }
        }
    }
}
