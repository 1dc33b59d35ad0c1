use glam::Vec3;

/// A pointer ray, typically derived from a controller pose.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }
}

/// Hit shape for an interactive node.
#[derive(Debug, Clone, Copy)]
pub enum HitShape {
    Sphere { center: Vec3, radius: f32 },
    Aabb { min: Vec3, max: Vec3 },
}

impl HitShape {
    /// Axis-aligned box from a center and full extents.
    pub fn centered_box(center: Vec3, extents: Vec3) -> Self {
        let half = extents * 0.5;
        Self::Aabb {
            min: center - half,
            max: center + half,
        }
    }

    /// Distance along the ray to the nearest intersection, if any.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        match *self {
            HitShape::Sphere { center, radius } => ray_sphere(ray, center, radius),
            HitShape::Aabb { min, max } => ray_aabb(ray, min, max),
        }
    }
}

fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.direction);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let t = -b - sqrt_disc;
    if t >= 0.0 {
        return Some(t);
    }
    let t = -b + sqrt_disc;
    (t >= 0.0).then_some(t)
}

/// Slab test. Handles rays starting inside the box (t = 0).
fn ray_aabb(ray: &Ray, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let dir = ray.direction[axis];
        if dir.abs() < f32::EPSILON {
            if origin < min[axis] || origin > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / dir;
        let mut t0 = (min[axis] - origin) * inv;
        let mut t1 = (max[axis] - origin) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_near = t_near.max(t0);
        t_far = t_far.min(t1);
        if t_near > t_far || t_far < 0.0 {
            return None;
        }
    }

    Some(t_near.max(0.0))
}
