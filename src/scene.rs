use crate::{bvh::BVH, primitives::PrimitiveList, DefaultRng, Intersect};
use std::sync::Arc;

/// The primitives of a scene before they are turned into an aggregate
#[derive(Clone, Default)]
pub struct Scene {
    primitives: Vec<Arc<dyn Intersect>>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, primitive: impl Intersect + 'static) -> &mut Self {
        self.primitives.push(Arc::new(primitive));
        self
    }

    /// Adds a primitive that is shared with other aggregates
    pub fn add_shared(&mut self, primitive: Arc<dyn Intersect>) -> &mut Self {
        self.primitives.push(primitive);
        self
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// A flat aggregate, intersected by testing every primitive
    pub fn into_list(self) -> PrimitiveList {
        PrimitiveList::from(self.primitives)
    }

    /// A BVH over the primitives, bounded for the shutter interval [time0, time1]
    pub fn build_bvh(self, time0: f32, time1: f32, rng: &mut DefaultRng) -> BVH {
        BVH::new(self.primitives, time0, time1, rng)
    }
}
