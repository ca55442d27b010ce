//! Procedural wireframe shapes
//!
//! Every generator is a pure function of `size`. Small solids are written out
//! by hand; the lattice kinds (sphere, dodecahedron, icosahedron) connect
//! vertex pairs closer than a per-kind threshold. That adjacency rule is an
//! approximation that looks right at a glance, not exact polyhedral topology.
//! It is evaluated once on the unit template, so edges never depend on size.
use nalgebra::{Point3, Vector3};
use std::f32::consts::{PI, TAU};

/// Closed set of shapes a solid can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Cube,
    Tetrahedron,
    Pyramid,
    Prism,
    Octahedron,
    Sphere,
    Dodecahedron,
    Icosahedron,
    HexPrism,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 9] = [
        ShapeKind::Cube,
        ShapeKind::Tetrahedron,
        ShapeKind::Pyramid,
        ShapeKind::Prism,
        ShapeKind::Octahedron,
        ShapeKind::Sphere,
        ShapeKind::Dodecahedron,
        ShapeKind::Icosahedron,
        ShapeKind::HexPrism,
    ];

    /// Per-axis stretch applied on top of `size`
    pub fn axis_scale(&self) -> Vector3<f32> {
        match self {
            ShapeKind::HexPrism => Vector3::new(1.0, HEX_PRISM_STRETCH, 1.0),
            _ => Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

/// Index pair into a shape's vertex list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge(pub usize, pub usize);

/// Vertices and edges of one wireframe
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub vertices: Vec<Point3<f32>>,
    pub edges: Vec<Edge>,
}

impl Shape {
    fn new(vertices: Vec<Point3<f32>>, edges: &[(usize, usize)]) -> Self {
        Self {
            vertices,
            edges: edges.iter().map(|&(a, b)| Edge(a, b)).collect(),
        }
    }

    /// Scale every coordinate per axis; edges are untouched
    fn scaled(mut self, factor: Vector3<f32>) -> Self {
        for v in &mut self.vertices {
            v.coords.component_mul_assign(&factor);
        }
        self
    }

    /// True when every edge indexes an existing vertex
    pub fn is_well_formed(&self) -> bool {
        let n = self.vertices.len();
        self.edges.iter().all(|e| e.0 < n && e.1 < n && e.0 != e.1)
    }
}

const PHI: f32 = 1.618_034;
const HEX_PRISM_STRETCH: f32 = 1.4;
const SPHERE_RINGS: usize = 4;
const SPHERE_SEGMENTS: usize = 8;
const SPHERE_THRESHOLD: f32 = 0.78;
const DODECAHEDRON_THRESHOLD: f32 = 1.3;
const ICOSAHEDRON_THRESHOLD: f32 = 2.1;

/// Build the wireframe for `kind` at `size`
pub fn generate(kind: ShapeKind, size: f32) -> Shape {
    let unit = match kind {
        ShapeKind::Cube => cube(),
        ShapeKind::Tetrahedron => tetrahedron(),
        ShapeKind::Pyramid => pyramid(),
        ShapeKind::Prism => prism(),
        ShapeKind::Octahedron => octahedron(),
        ShapeKind::Sphere => sphere(),
        ShapeKind::Dodecahedron => dodecahedron(),
        ShapeKind::Icosahedron => icosahedron(),
        ShapeKind::HexPrism => hex_prism(),
    };
    unit.scaled(kind.axis_scale() * size)
}

fn p(x: f32, y: f32, z: f32) -> Point3<f32> {
    Point3::new(x, y, z)
}

fn cube() -> Shape {
    Shape::new(
        vec![
            p(-1.0, -1.0, -1.0),
            p(1.0, -1.0, -1.0),
            p(1.0, 1.0, -1.0),
            p(-1.0, 1.0, -1.0),
            p(-1.0, -1.0, 1.0),
            p(1.0, -1.0, 1.0),
            p(1.0, 1.0, 1.0),
            p(-1.0, 1.0, 1.0),
        ],
        &[
            (0, 1), (1, 2), (2, 3), (3, 0),
            (4, 5), (5, 6), (6, 7), (7, 4),
            (0, 4), (1, 5), (2, 6), (3, 7),
        ],
    )
}

fn tetrahedron() -> Shape {
    Shape::new(
        vec![
            p(1.0, 1.0, 1.0),
            p(1.0, -1.0, -1.0),
            p(-1.0, 1.0, -1.0),
            p(-1.0, -1.0, 1.0),
        ],
        &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)],
    )
}

fn pyramid() -> Shape {
    // Square base at y = +1, apex at y = -1 (screen y grows downward)
    Shape::new(
        vec![
            p(-1.0, 1.0, -1.0),
            p(1.0, 1.0, -1.0),
            p(1.0, 1.0, 1.0),
            p(-1.0, 1.0, 1.0),
            p(0.0, -1.0, 0.0),
        ],
        &[
            (0, 1), (1, 2), (2, 3), (3, 0),
            (0, 4), (1, 4), (2, 4), (3, 4),
        ],
    )
}

fn prism() -> Shape {
    Shape::new(
        vec![
            p(0.0, -1.0, 0.8),
            p(0.7, -1.0, -0.4),
            p(-0.7, -1.0, -0.4),
            p(0.0, 1.0, 0.8),
            p(0.7, 1.0, -0.4),
            p(-0.7, 1.0, -0.4),
        ],
        &[
            (0, 1), (1, 2), (2, 0),
            (3, 4), (4, 5), (5, 3),
            (0, 3), (1, 4), (2, 5),
        ],
    )
}

fn octahedron() -> Shape {
    Shape::new(
        vec![
            p(1.0, 0.0, 0.0),
            p(-1.0, 0.0, 0.0),
            p(0.0, 1.0, 0.0),
            p(0.0, -1.0, 0.0),
            p(0.0, 0.0, 1.0),
            p(0.0, 0.0, -1.0),
        ],
        &[
            (0, 2), (0, 3), (0, 4), (0, 5),
            (1, 2), (1, 3), (1, 4), (1, 5),
            (2, 4), (4, 3), (3, 5), (5, 2),
        ],
    )
}

fn hex_prism() -> Shape {
    let mut vertices = Vec::with_capacity(12);
    for y in [-1.0, 1.0] {
        for i in 0..6 {
            let a = i as f32 * TAU / 6.0;
            vertices.push(p(a.cos(), y, a.sin()));
        }
    }
    let mut edges = Vec::with_capacity(18);
    for i in 0..6 {
        let j = (i + 1) % 6;
        edges.push((i, j));
        edges.push((i + 6, j + 6));
        edges.push((i, i + 6));
    }
    Shape::new(vertices, &edges)
}

/// Latitude/longitude lattice on the unit sphere, poles first
fn sphere() -> Shape {
    let mut vertices = vec![p(0.0, 1.0, 0.0), p(0.0, -1.0, 0.0)];
    for ring in 1..=SPHERE_RINGS {
        let theta = ring as f32 * PI / (SPHERE_RINGS + 1) as f32;
        let (sin_t, cos_t) = theta.sin_cos();
        for seg in 0..SPHERE_SEGMENTS {
            let phi = seg as f32 * TAU / SPHERE_SEGMENTS as f32;
            vertices.push(p(sin_t * phi.cos(), cos_t, sin_t * phi.sin()));
        }
    }
    lattice(vertices, SPHERE_THRESHOLD)
}

/// Cube corners plus the three golden rectangles; true edges have length 2/phi
fn dodecahedron() -> Shape {
    let inv = 1.0 / PHI;
    let mut vertices = Vec::with_capacity(20);
    for x in [-1.0, 1.0] {
        for y in [-1.0, 1.0] {
            for z in [-1.0, 1.0] {
                vertices.push(p(x, y, z));
            }
        }
    }
    for a in [-inv, inv] {
        for b in [-PHI, PHI] {
            vertices.push(p(0.0, a, b));
            vertices.push(p(a, b, 0.0));
            vertices.push(p(b, 0.0, a));
        }
    }
    lattice(vertices, DODECAHEDRON_THRESHOLD).normalized_to(PHI.hypot(inv))
}

/// Cyclic permutations of (0, ±1, ±phi); true edges have length 2
fn icosahedron() -> Shape {
    let mut vertices = Vec::with_capacity(12);
    for a in [-1.0, 1.0] {
        for b in [-PHI, PHI] {
            vertices.push(p(0.0, a, b));
            vertices.push(p(a, b, 0.0));
            vertices.push(p(b, 0.0, a));
        }
    }
    lattice(vertices, ICOSAHEDRON_THRESHOLD).normalized_to(1.0_f32.hypot(PHI))
}

/// Connect every vertex pair closer than `threshold`
fn lattice(vertices: Vec<Point3<f32>>, threshold: f32) -> Shape {
    let mut edges = Vec::new();
    for i in 0..vertices.len() {
        for j in (i + 1)..vertices.len() {
            if (vertices[i] - vertices[j]).norm() < threshold {
                edges.push((i, j));
            }
        }
    }
    Shape::new(vertices, &edges)
}

impl Shape {
    /// Rescale a template whose circumradius is `radius` to unit circumradius
    fn normalized_to(self, radius: f32) -> Self {
        let f = 1.0 / radius;
        self.scaled(Vector3::new(f, f, f))
    }
}
