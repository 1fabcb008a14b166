//! Converts the world into instanced draw batches
//!
//! Every visible entity and every mounted part becomes one [`InstanceData`]
//! in the batch of its shape. Opaque and transparent instances are kept in
//! separate batches; transparent instances are sorted back to front.
//!
//! Parts whose material needs the surface texture go through the loading
//! boundary: nothing is drawn while the texture is pending, and a failed
//! load falls back to the untextured material.

use starscape_core::{AssetSlot, Material, Shape, World};
use starscape_math::{mat4, Mat4, Vec3};

use crate::mesh::ShapeKey;
use crate::pipeline::InstanceData;

/// Opacity below which an instance is not drawn at all
const MIN_VISIBLE_OPACITY: f32 = 0.001;

/// State of the surface texture as seen by the draw list
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureState {
    Pending,
    Ready,
    Failed,
}

impl<T> From<&AssetSlot<T>> for TextureState {
    fn from(slot: &AssetSlot<T>) -> Self {
        match slot {
            AssetSlot::Pending => TextureState::Pending,
            AssetSlot::Ready(_) => TextureState::Ready,
            AssetSlot::Failed(_) => TextureState::Failed,
        }
    }
}

/// Instances sharing one mesh
#[derive(Clone, Debug)]
pub struct DrawBatch {
    pub shape: Shape,
    pub key: ShapeKey,
    pub instances: Vec<InstanceData>,
}

/// Everything drawn in one frame, excluding the starfield
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    pub opaque: Vec<DrawBatch>,
    pub transparent: Vec<DrawBatch>,
    /// Textured instances held back because the texture is still loading
    pub deferred: usize,
}

impl DrawList {
    /// Collect the instances of every entity in `world`
    pub fn build(world: &World, eye: Vec3, texture: TextureState) -> Self {
        let mut list = DrawList::default();
        let mut transparent: Vec<(f32, Shape, InstanceData)> = Vec::new();

        for entity in world.iter() {
            let model = entity.transform.to_matrix();
            if let Some(shape) = entity.shape {
                list.push(shape, model, entity.current_material(), texture, eye, &mut transparent);
            }
            for part in entity.mounted_parts() {
                let part_model = entity.transform.compose(&part.transform);
                list.push(part.shape, part_model, part.material, texture, eye, &mut transparent);
            }
        }

        // Farthest first so blending composes correctly
        transparent.sort_by(|a, b| b.0.total_cmp(&a.0));
        for (_, shape, instance) in transparent {
            add_to_batch(&mut list.transparent, shape, instance, true);
        }

        list
    }

    fn push(
        &mut self,
        shape: Shape,
        model: Mat4,
        material: Material,
        texture: TextureState,
        eye: Vec3,
        transparent: &mut Vec<(f32, Shape, InstanceData)>,
    ) {
        let textured = match (material.textured, texture) {
            (false, _) => false,
            (true, TextureState::Pending) => {
                self.deferred += 1;
                return;
            }
            (true, TextureState::Ready) => true,
            (true, TextureState::Failed) => false,
        };

        if material.opacity() < MIN_VISIBLE_OPACITY {
            return;
        }

        let instance = instance_data(model, &material, textured);
        if material.is_transparent() {
            let center = mat4::transform_point(model, Vec3::ZERO);
            transparent.push(((center - eye).length_squared(), shape, instance));
        } else {
            add_to_batch(&mut self.opaque, shape, instance, false);
        }
    }

    /// Total instances across all batches
    pub fn instance_count(&self) -> usize {
        self.opaque
            .iter()
            .chain(self.transparent.iter())
            .map(|b| b.instances.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.instance_count() == 0
    }

    /// Distinct shapes referenced by this list
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.opaque.iter().chain(self.transparent.iter()).map(|b| &b.shape)
    }
}

/// Append to the matching batch; transparent instances only merge into the
/// last batch so the back-to-front order survives
fn add_to_batch(batches: &mut Vec<DrawBatch>, shape: Shape, instance: InstanceData, keep_order: bool) {
    let key = ShapeKey::from(shape);
    let existing = if keep_order {
        batches.last_mut().filter(|b| b.key == key)
    } else {
        batches.iter_mut().find(|b| b.key == key)
    };
    match existing {
        Some(batch) => batch.instances.push(instance),
        None => batches.push(DrawBatch {
            shape,
            key,
            instances: vec![instance],
        }),
    }
}

fn instance_data(model: Mat4, material: &Material, textured: bool) -> InstanceData {
    let e = material.emissive;
    let k = material.emissive_intensity;
    InstanceData {
        model,
        color: material.base_color,
        emissive: [e[0] * k, e[1] * k, e[2] * k, if textured { 1.0 } else { 0.0 }],
    }
}
