//! CPU-side primitive mesh generators.
//!
//! The scene is rebuilt on the CPU every frame, so generators return plain
//! position/normal/index lists in local space; the mesh builder transforms
//! them into world space and attaches colors. Cylinders and disks follow the
//! GLU quadric convention: extruded along +Z starting at z = 0, base cap
//! facing -Z, top cap facing +Z.

use glam::Vec3;

/// Triangle-list geometry in local space.
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl Geometry {
    fn push_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position);
        self.normals.push(normal);
        index
    }

    fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }
}

/// Axis-aligned cuboid centered on the origin, flat face normals.
pub fn cuboid(half: Vec3) -> Geometry {
    let mut geo = Geometry::default();
    // (normal, two in-plane tangents) per face
    let faces: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];
    for (normal, u, v) in faces {
        let center = normal * half;
        let eu = u * half;
        let ev = v * half;
        let a = geo.push_vertex(center - eu - ev, normal);
        let b = geo.push_vertex(center + eu - ev, normal);
        let c = geo.push_vertex(center + eu + ev, normal);
        let d = geo.push_vertex(center - eu + ev, normal);
        geo.push_triangle(a, b, c);
        geo.push_triangle(a, c, d);
    }
    geo
}

/// The 12 edges of a cuboid as 24 line-list endpoints.
pub fn cuboid_edges(half: Vec3) -> Vec<Vec3> {
    let corner = |x: f32, y: f32, z: f32| Vec3::new(x * half.x, y * half.y, z * half.z);
    let mut lines = Vec::with_capacity(24);
    for &y in &[-1.0f32, 1.0] {
        // Four horizontal edges of this face ring.
        lines.push(corner(-1.0, y, -1.0));
        lines.push(corner(1.0, y, -1.0));
        lines.push(corner(1.0, y, -1.0));
        lines.push(corner(1.0, y, 1.0));
        lines.push(corner(1.0, y, 1.0));
        lines.push(corner(-1.0, y, 1.0));
        lines.push(corner(-1.0, y, 1.0));
        lines.push(corner(-1.0, y, -1.0));
    }
    // Vertical edges.
    for &(x, z) in &[(-1.0f32, -1.0f32), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
        lines.push(corner(x, -1.0, z));
        lines.push(corner(x, 1.0, z));
    }
    lines
}

/// UV sphere centered on the origin.
pub fn uv_sphere(radius: f32, stacks: u32, slices: u32) -> Geometry {
    let mut geo = Geometry::default();
    for stack in 0..=stacks {
        // Latitude from +Y pole to -Y pole.
        let theta = std::f32::consts::PI * stack as f32 / stacks as f32;
        let (sin_t, cos_t) = theta.sin_cos();
        for slice in 0..=slices {
            let phi = std::f32::consts::TAU * slice as f32 / slices as f32;
            let (sin_p, cos_p) = phi.sin_cos();
            let normal = Vec3::new(sin_t * cos_p, cos_t, sin_t * sin_p);
            geo.push_vertex(normal * radius, normal);
        }
    }

    let ring = slices + 1;
    for stack in 0..stacks {
        for slice in 0..slices {
            let a = stack * ring + slice;
            let b = a + ring;
            geo.push_triangle(a, b, a + 1);
            geo.push_triangle(a + 1, b, b + 1);
        }
    }
    geo
}

/// Capped cylinder (or cone when `top_radius` is 0) along +Z from z = 0 to
/// z = `height`, smooth side normals accounting for the taper.
pub fn capped_cylinder(base_radius: f32, top_radius: f32, height: f32, slices: u32) -> Geometry {
    let mut geo = Geometry::default();

    // Side wall. The normal tilts along z by the taper slope.
    let slope = (base_radius - top_radius) / height;
    let normal_scale = 1.0 / (1.0 + slope * slope).sqrt();
    let side_base = geo.positions.len() as u32;
    for slice in 0..=slices {
        let phi = std::f32::consts::TAU * slice as f32 / slices as f32;
        let (sin_p, cos_p) = phi.sin_cos();
        let normal = Vec3::new(cos_p, sin_p, slope) * normal_scale;
        geo.push_vertex(
            Vec3::new(base_radius * cos_p, base_radius * sin_p, 0.0),
            normal,
        );
        geo.push_vertex(
            Vec3::new(top_radius * cos_p, top_radius * sin_p, height),
            normal,
        );
    }
    for slice in 0..slices {
        let a = side_base + slice * 2;
        geo.push_triangle(a, a + 2, a + 1);
        geo.push_triangle(a + 1, a + 2, a + 3);
    }

    // Caps. A cone has no top cap to emit.
    if base_radius > 0.0 {
        push_cap(&mut geo, base_radius, 0.0, Vec3::NEG_Z, slices);
    }
    if top_radius > 0.0 {
        push_cap(&mut geo, top_radius, height, Vec3::Z, slices);
    }
    geo
}

/// Flat disk at z = 0 facing +Z.
pub fn disk(radius: f32, slices: u32) -> Geometry {
    let mut geo = Geometry::default();
    push_cap(&mut geo, radius, 0.0, Vec3::Z, slices);
    geo
}

fn push_cap(geo: &mut Geometry, radius: f32, z: f32, normal: Vec3, slices: u32) {
    let center = geo.push_vertex(Vec3::new(0.0, 0.0, z), normal);
    let rim_base = geo.positions.len() as u32;
    for slice in 0..=slices {
        let phi = std::f32::consts::TAU * slice as f32 / slices as f32;
        geo.push_vertex(
            Vec3::new(radius * phi.cos(), radius * phi.sin(), z),
            normal,
        );
    }
    for slice in 0..slices {
        let a = rim_base + slice;
        if normal.z >= 0.0 {
            geo.push_triangle(center, a, a + 1);
        } else {
            geo.push_triangle(center, a + 1, a);
        }
    }
}
