use crate::{primitives::AABB, DefaultRng, Hit, Intersect, Ray};
use glam::Vec3;
use rand::Rng;
use std::{cmp::Ordering, sync::Arc};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// The unit vector pointing along the axis
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.gen_range(0, 3)]
    }
}

pub trait GetAxis {
    type Output;

    fn axis(&self, axis: Axis) -> Self::Output;
    fn axis_mut(&mut self, axis: Axis) -> &mut Self::Output;
}

impl GetAxis for Vec3 {
    type Output = f32;

    fn axis(&self, axis: Axis) -> Self::Output {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    fn axis_mut(&mut self, axis: Axis) -> &mut Self::Output {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }
}

/// A Bounding Volume Hirarchy
///
/// A binary tree stored flat, children referenced by index. Every interior node has exactly
/// two children and caches the union of their bounds; the scene is static so it never changes.
pub struct BVH {
    /// The primitives that make up the scene
    geometry: Vec<Arc<dyn Intersect>>,
    /// The BVH tree, the root is the first node
    tree: Vec<FlatNode>,
}

impl BVH {
    /// Builds a tree over `geometry` whose bounds cover the shutter interval [time0, time1].
    /// Each level splits at the median along an axis picked at random.
    pub fn new(
        mut geometry: Vec<Arc<dyn Intersect>>,
        time0: f32,
        time1: f32,
        rng: &mut DefaultRng,
    ) -> Self {
        let mut tree = Vec::with_capacity(geometry.len().saturating_mul(2));

        if !geometry.is_empty() {
            let len = geometry.len();
            BVH::build(&mut geometry, 0, len, (time0, time1), rng, &mut tree);
        }

        log::info!(
            "Built BVH with {} nodes over {} primitives",
            tree.len(),
            geometry.len()
        );

        Self { geometry, tree }
    }

    pub fn len(&self) -> usize {
        self.geometry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
    }

    // Appends the subtree for geometry[start..end] to the tree and returns the index of its root
    fn build(
        geometry: &mut [Arc<dyn Intersect>],
        start: usize,
        end: usize,
        shutter: (f32, f32),
        rng: &mut DefaultRng,
        tree: &mut Vec<FlatNode>,
    ) -> usize {
        let offset = tree.len();
        let axis = Axis::random(rng);
        let compare = |a: &Arc<dyn Intersect>, b: &Arc<dyn Intersect>| {
            box_min(a.as_ref(), axis, shutter)
                .partial_cmp(&box_min(b.as_ref(), axis, shutter))
                .unwrap_or(Ordering::Equal)
        };

        match end - start {
            1 => {
                let bounds = primitive_bounds(geometry[start].as_ref(), shutter);
                tree.push(FlatNode::leaf(bounds, start));
            }
            2 => {
                // Two primitives only need one comparison, not a sort
                if compare(&geometry[start], &geometry[start + 1]) == Ordering::Greater {
                    geometry.swap(start, start + 1);
                }

                tree.push(FlatNode::interior(AABB::default(), 0, 0));
                let left_bounds = primitive_bounds(geometry[start].as_ref(), shutter);
                let right_bounds = primitive_bounds(geometry[start + 1].as_ref(), shutter);
                let left = tree.len();
                tree.push(FlatNode::leaf(left_bounds, start));
                let right = tree.len();
                tree.push(FlatNode::leaf(right_bounds, start + 1));

                tree[offset] = FlatNode::interior(left_bounds.union(right_bounds), left, right);
            }
            span => {
                geometry[start..end].sort_unstable_by(compare);
                let mid = start + span / 2;

                tree.push(FlatNode::interior(AABB::default(), 0, 0));
                let left = BVH::build(geometry, start, mid, shutter, rng, tree);
                let right = BVH::build(geometry, mid, end, shutter, rng, tree);

                let bounds = tree[left].bounds.union(tree[right].bounds);
                tree[offset] = FlatNode::interior(bounds, left, right);
            }
        }

        offset
    }

    fn intersect_node(
        &self,
        index: usize,
        ray: Ray,
        t_min: f32,
        t_max: f32,
        rng: &mut DefaultRng,
    ) -> Option<Hit> {
        let node = &self.tree[index];
        if !node.bounds.has_intersection(ray, t_min, t_max) {
            return None;
        }

        match node.inner {
            FlatNodeInner::Interior { left, right } => {
                let left = self.intersect_node(left, ray, t_min, t_max, rng);
                // Only a hit closer than the left one can matter on the right
                let closest = left.as_ref().map_or(t_max, |hit| hit.t);
                let right = self.intersect_node(right, ray, t_min, closest, rng);

                right.or(left)
            }
            FlatNodeInner::Leaf { primitive } => {
                self.geometry[primitive].intersection(ray, t_min, t_max, rng)
            }
        }
    }
}

fn primitive_bounds(primitive: &dyn Intersect, (time0, time1): (f32, f32)) -> AABB {
    primitive.bounds(time0, time1).unwrap_or_else(|| {
        log::error!("No bounding box in BVH construction, treating the primitive as unbounded");
        AABB::everything()
    })
}

fn box_min(primitive: &dyn Intersect, axis: Axis, (time0, time1): (f32, f32)) -> f32 {
    primitive
        .bounds(time0, time1)
        .map_or(f32::NEG_INFINITY, |b| b.min.axis(axis))
}

impl Intersect for BVH {
    fn intersection(&self, ray: Ray, t_min: f32, t_max: f32, rng: &mut DefaultRng) -> Option<Hit> {
        if self.tree.is_empty() {
            return None;
        }

        self.intersect_node(0, ray, t_min, t_max, rng)
    }

    fn bounds(&self, _time0: f32, _time1: f32) -> Option<AABB> {
        self.tree.first().map(|node| node.bounds)
    }
}

#[derive(Clone, Copy, Debug)]
enum FlatNodeInner {
    Interior { left: usize, right: usize },
    Leaf { primitive: usize },
}

#[derive(Clone, Copy, Debug)]
struct FlatNode {
    bounds: AABB,
    inner: FlatNodeInner,
}

impl FlatNode {
    fn interior(bounds: AABB, left: usize, right: usize) -> Self {
        Self {
            bounds,
            inner: FlatNodeInner::Interior { left, right },
        }
    }

    fn leaf(bounds: AABB, primitive: usize) -> Self {
        Self {
            bounds,
            inner: FlatNodeInner::Leaf { primitive },
        }
    }
}
