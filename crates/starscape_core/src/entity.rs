//! Entity, Part and Material types
//!
//! An Entity is one animated object in the scene: a transform, an optional
//! shape, materials for each interaction state, a behaviour and any number of
//! parts that move with it.

use std::collections::HashSet;
use bitflags::bitflags;
use serde::{Serialize, Deserialize};
use starscape_anim::{Interaction, InteractionState, PointerEvent, Spin, Pulse};
use starscape_math::Vec3;

use crate::behavior::{Animator, Behavior};
use crate::frame::FrameContext;
use crate::shapes::Shape;
use crate::Transform3D;

bitflags! {
    /// Flags indicating which parts of an entity have changed and need updating
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct DirtyFlags: u8 {
        /// No changes
        const NONE = 0;
        /// Transform (position, rotation, scale) has changed
        const TRANSFORM = 1 << 0;
        /// Material has changed (interaction state swap)
        const MATERIAL = 1 << 1;
        /// Set of mounted parts may have changed
        const PARTS = 1 << 2;
        /// All flags set
        const ALL = Self::TRANSFORM.bits() | Self::MATERIAL.bits() | Self::PARTS.bits();
    }
}

/// Surface appearance of an entity or part
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Base color as RGBA; alpha is the opacity
    pub base_color: [f32; 4],
    /// Emissive color, multiplied by `emissive_intensity`
    #[serde(default)]
    pub emissive: [f32; 3],
    #[serde(default)]
    pub emissive_intensity: f32,
    /// Sampled from the scene's surface texture when it has loaded
    #[serde(default)]
    pub textured: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Material {
    /// Create a new material with the given RGBA color
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            base_color: [r, g, b, a],
            emissive: [0.0, 0.0, 0.0],
            emissive_intensity: 0.0,
            textured: false,
        }
    }

    /// Create a new opaque material with the given RGB color
    pub const fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Builder: set the emissive color and intensity
    pub fn with_emissive(mut self, color: [f32; 3], intensity: f32) -> Self {
        self.emissive = color;
        self.emissive_intensity = intensity;
        self
    }

    /// Builder: set the opacity
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.base_color[3] = opacity.clamp(0.0, 1.0);
        self
    }

    /// Builder: sample the scene texture
    pub fn with_texture(mut self) -> Self {
        self.textured = true;
        self
    }

    /// Fallback used when the texture failed to load
    pub fn untextured(mut self) -> Self {
        self.textured = false;
        self
    }

    #[inline]
    pub fn opacity(&self) -> f32 {
        self.base_color[3]
    }

    /// True if the material needs alpha blending
    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.base_color[3] < 1.0
    }

    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const GRAY: Self = Self::new(0.5, 0.5, 0.5, 1.0);
}

/// Materials an entity shows in each interaction state
///
/// Missing hovered or selected materials fall back to `idle`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialStates {
    pub idle: Material,
    #[serde(default)]
    pub hovered: Option<Material>,
    #[serde(default)]
    pub selected: Option<Material>,
}

impl MaterialStates {
    pub fn new(idle: Material) -> Self {
        Self { idle, hovered: None, selected: None }
    }

    /// Material for the given interaction state
    pub fn resolve(&self, state: InteractionState) -> Material {
        match state {
            InteractionState::Idle => self.idle,
            InteractionState::Hovered => self.hovered.unwrap_or(self.idle),
            InteractionState::Selected => self.selected.unwrap_or(self.idle),
        }
    }
}

/// When a part is part of the drawn scene
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mount {
    #[default]
    Always,
    /// Only while the owning entity is selected (atmospheres, expanded panels)
    WhileSelected,
}

impl Mount {
    pub fn is_mounted(&self, interaction: &Interaction) -> bool {
        match self {
            Mount::Always => true,
            Mount::WhileSelected => interaction.is_selected(),
        }
    }
}

/// Self-contained motion a part applies relative to its rest transform
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum PartMotion {
    #[default]
    None,
    /// Adds a constant spin to the rest rotation
    Spin(Spin),
    /// Multiplies the rest scale by the pulse factor
    Pulse(Pulse),
}

/// Sub-geometry owned by an entity and positioned relative to it
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub name: Option<String>,
    pub shape: Shape,
    /// Rest transform relative to the owner
    pub rest: Transform3D,
    /// Current transform relative to the owner
    #[serde(skip)]
    pub transform: Transform3D,
    pub material: Material,
    #[serde(default)]
    pub mount: Mount,
    #[serde(default)]
    pub motion: PartMotion,
}

impl Part {
    /// Create a part at its rest transform
    pub fn new(shape: Shape, rest: Transform3D, material: Material) -> Self {
        Self {
            name: None,
            shape,
            rest,
            transform: rest,
            material,
            mount: Mount::Always,
            motion: PartMotion::None,
        }
    }

    /// Builder: set the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder: set the mount condition
    pub fn with_mount(mut self, mount: Mount) -> Self {
        self.mount = mount;
        self
    }

    /// Builder: set the part's own motion
    pub fn with_motion(mut self, motion: PartMotion) -> Self {
        self.motion = motion;
        self
    }

    /// Return to the rest transform
    pub fn reset(&mut self) {
        self.transform = self.rest;
    }

    /// Apply the part's own motion at time `t`
    pub fn animate(&mut self, t: f32, hovered: bool) {
        match self.motion {
            PartMotion::None => {}
            PartMotion::Spin(spin) => {
                self.transform.rotation = self.rest.rotation + spin.rotation_at(t);
            }
            PartMotion::Pulse(pulse) => {
                self.transform.scale = self.rest.scale * pulse.scale_at(t, hovered);
            }
        }
    }
}

/// An animated object in the scene
///
/// Each entity has:
/// - An optional name (for lookup by name) and tags
/// - A transform, owned and written only by its own update
/// - An optional shape; group entities draw only their parts
/// - Materials per interaction state
/// - A behaviour and an optional custom animator
/// - Interaction state and an optional pick radius
/// - Dirty flags (for change tracking)
pub struct Entity {
    pub name: Option<String>,
    pub tags: HashSet<String>,
    pub transform: Transform3D,
    pub shape: Option<Shape>,
    pub materials: MaterialStates,
    pub behavior: Behavior,
    pub animator: Option<Box<dyn Animator>>,
    pub interaction: Interaction,
    /// Bounding radius for pointer picking in local units; `None` = not pickable
    pub pick_radius: Option<f32>,
    pub parts: Vec<Part>,
    dirty: DirtyFlags,
}

impl Entity {
    /// Create a new entity with the given shape
    pub fn new(shape: Shape) -> Self {
        Self {
            name: None,
            tags: HashSet::new(),
            transform: Transform3D::identity(),
            shape: Some(shape),
            materials: MaterialStates::default(),
            behavior: Behavior::Static,
            animator: None,
            interaction: Interaction::new(),
            pick_radius: None,
            parts: Vec::new(),
            dirty: DirtyFlags::ALL,
        }
    }

    /// Create an entity without geometry of its own
    pub fn group() -> Self {
        Self {
            shape: None,
            ..Self::new(Shape::sphere(1.0))
        }
    }

    /// Set the name of this entity (for lookup)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a tag to this entity
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Check if this entity has a specific tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn with_transform(mut self, transform: Transform3D) -> Self {
        self.transform = transform;
        self
    }

    /// Set the idle material
    pub fn with_material(mut self, material: Material) -> Self {
        self.materials.idle = material;
        self
    }

    pub fn with_hover_material(mut self, material: Material) -> Self {
        self.materials.hovered = Some(material);
        self
    }

    pub fn with_selected_material(mut self, material: Material) -> Self {
        self.materials.selected = Some(material);
        self
    }

    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Attach a custom animator that runs after the behaviour
    pub fn with_animator(mut self, animator: impl Animator + 'static) -> Self {
        self.animator = Some(Box::new(animator));
        self
    }

    /// Make the entity respond to the pointer within `radius` (local units)
    pub fn pickable(mut self, radius: f32) -> Self {
        self.pick_radius = Some(radius.abs());
        self
    }

    pub fn with_part(mut self, mut part: Part) -> Self {
        part.reset();
        self.parts.push(part);
        self
    }

    pub fn with_parts(mut self, parts: impl IntoIterator<Item = Part>) -> Self {
        for part in parts {
            self = self.with_part(part);
        }
        self
    }

    /// Display label: the name, or a placeholder
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }

    /// Advance this entity to the frame described by `ctx`
    ///
    /// Reads nothing but the frame context and the entity's own state.
    pub fn update(&mut self, ctx: &FrameContext) {
        let hovered = self.interaction.is_hovered();
        for part in &mut self.parts {
            part.animate(ctx.elapsed, hovered);
        }
        self.behavior.apply(ctx, &self.interaction, &mut self.transform, &mut self.parts);
        if let Some(animator) = self.animator.as_mut() {
            animator.animate(ctx, &self.interaction, &mut self.transform);
        }
        self.mark_dirty(DirtyFlags::TRANSFORM);
    }

    /// Capture everything an update writes, to roll a failed update back
    pub(crate) fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            transform: self.transform,
            parts: self.parts.clone(),
            behavior: self.behavior.clone(),
        }
    }

    /// Return to a captured state
    pub(crate) fn restore(&mut self, snapshot: EntitySnapshot) {
        self.transform = snapshot.transform;
        self.parts = snapshot.parts;
        self.behavior = snapshot.behavior;
    }

    /// Apply a pointer event; returns true if the interaction state changed
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        let changed = self.interaction.handle(event);
        if changed {
            self.mark_dirty(DirtyFlags::MATERIAL | DirtyFlags::PARTS);
        }
        changed
    }

    /// Set selection directly, as a click would; returns true on change
    pub fn set_selected(&mut self, selected: bool) -> bool {
        let changed = self.interaction.set_selected(selected);
        if changed {
            self.mark_dirty(DirtyFlags::MATERIAL | DirtyFlags::PARTS);
        }
        changed
    }

    /// Material for the current interaction state
    pub fn current_material(&self) -> Material {
        self.materials.resolve(self.interaction.state())
    }

    /// Parts whose mount condition currently holds
    pub fn mounted_parts(&self) -> impl Iterator<Item = &Part> {
        let interaction = self.interaction;
        self.parts.iter().filter(move |p| p.mount.is_mounted(&interaction))
    }

    /// World-space bounding sphere used for picking
    ///
    /// Pulsing entities are picked at their rest size so the hover region
    /// does not breathe with the pulse.
    pub fn bounding_sphere(&self) -> Option<(Vec3, f32)> {
        let scale = match self.behavior {
            Behavior::Pulsar { base_scale, .. } => base_scale.abs(),
            _ => self.transform.max_scale(),
        };
        self.pick_radius.map(|r| (self.transform.position, r * scale))
    }

    // --- Dirty tracking methods ---

    #[inline]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    #[inline]
    pub fn dirty_flags(&self) -> DirtyFlags {
        self.dirty
    }

    #[inline]
    pub fn mark_dirty(&mut self, flags: DirtyFlags) {
        self.dirty |= flags;
    }

    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = DirtyFlags::NONE;
    }
}

/// Animated state of an entity before an update
pub(crate) struct EntitySnapshot {
    transform: Transform3D,
    parts: Vec<Part>,
    behavior: Behavior,
}

/// A serializable entity template
///
/// Used by RON scene files. Templates cannot carry custom animators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityTemplate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub transform: Transform3D,
    #[serde(default)]
    pub shape: Option<Shape>,
    #[serde(default)]
    pub materials: MaterialStates,
    #[serde(default)]
    pub behavior: Behavior,
    #[serde(default)]
    pub pick_radius: Option<f32>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl EntityTemplate {
    /// Create a new entity template
    pub fn new(shape: Option<Shape>, transform: Transform3D, material: Material) -> Self {
        Self {
            name: None,
            tags: Vec::new(),
            transform,
            shape,
            materials: MaterialStates::new(material),
            behavior: Behavior::Static,
            pick_radius: None,
            parts: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Convert this template to an Entity
    ///
    /// An asteroid field without explicit parts gets one rock part per asteroid.
    pub fn to_entity(&self) -> Entity {
        let mut entity = match self.shape {
            Some(shape) => Entity::new(shape),
            None => Entity::group(),
        };
        entity.transform = self.transform;
        entity.materials = self.materials;
        entity.behavior = self.behavior.clone();
        entity.pick_radius = self.pick_radius;
        entity.name = self.name.clone();
        entity.tags = self.tags.iter().cloned().collect();

        let parts = if self.parts.is_empty() {
            self.behavior.default_parts(self.materials.idle)
        } else {
            self.parts.clone()
        };
        entity.with_parts(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starscape_anim::Funnel;

    fn ctx(elapsed: f32) -> FrameContext {
        FrameContext::new(elapsed, 1.0 / 60.0)
    }

    #[test]
    fn test_new_entity_is_dirty() {
        let mut entity = Entity::new(Shape::sphere(1.0));
        assert_eq!(entity.dirty_flags(), DirtyFlags::ALL);
        entity.clear_dirty();
        assert!(!entity.is_dirty());
    }

    #[test]
    fn test_material_swaps_with_state() {
        let idle = Material::from_rgb(0.2, 0.2, 0.8);
        let hovered = Material::from_rgb(1.0, 1.0, 0.0).with_emissive([1.0, 1.0, 0.0], 2.0);
        let selected = Material::from_rgb(1.0, 0.0, 0.0);
        let mut entity = Entity::new(Shape::sphere(1.0))
            .with_material(idle)
            .with_hover_material(hovered)
            .with_selected_material(selected);

        assert_eq!(entity.current_material(), idle);
        entity.handle_pointer(PointerEvent::Enter);
        assert_eq!(entity.current_material(), hovered);
        entity.handle_pointer(PointerEvent::Click);
        assert_eq!(entity.current_material(), selected);
        entity.handle_pointer(PointerEvent::Leave);
        assert_eq!(entity.current_material(), selected);
    }

    #[test]
    fn test_missing_state_material_falls_back() {
        let idle = Material::GRAY;
        let entity = Entity::new(Shape::sphere(1.0)).with_material(idle);
        let states = entity.materials;
        assert_eq!(states.resolve(InteractionState::Hovered), idle);
        assert_eq!(states.resolve(InteractionState::Selected), idle);
    }

    #[test]
    fn test_conditional_part_mounting() {
        let atmosphere = Part::new(Shape::sphere(1.1), Transform3D::identity(), Material::WHITE.with_opacity(0.3))
            .with_name("atmosphere")
            .with_mount(Mount::WhileSelected);
        let mut planet = Entity::new(Shape::sphere(1.0)).with_part(atmosphere);

        assert_eq!(planet.mounted_parts().count(), 0);
        planet.handle_pointer(PointerEvent::Click);
        assert_eq!(planet.mounted_parts().count(), 1);
        planet.handle_pointer(PointerEvent::Click);
        assert_eq!(planet.mounted_parts().count(), 0);
    }

    #[test]
    fn test_part_spin_motion() {
        let rest = Transform3D::identity().with_rotation(Vec3::new(0.3, 0.0, 0.0));
        let mut part = Part::new(Shape::torus(2.0, 0.2), rest, Material::WHITE)
            .with_motion(PartMotion::Spin(Spin::about_y(0.5)));
        part.animate(2.0, false);
        assert!((part.transform.rotation.x - 0.3).abs() < 1e-6);
        assert!((part.transform.rotation.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_bounding_sphere_follows_scale() {
        let mut entity = Entity::new(Shape::sphere(1.0)).pickable(1.0);
        entity.transform = Transform3D::from_position(Vec3::new(1.0, 2.0, 3.0)).with_uniform_scale(1.5);
        let (center, radius) = entity.bounding_sphere().unwrap();
        assert_eq!(center, Vec3::new(1.0, 2.0, 3.0));
        assert!((radius - 1.5).abs() < 1e-6);

        assert!(Entity::new(Shape::sphere(1.0)).bounding_sphere().is_none());
    }

    #[test]
    fn test_part_pulse_motion_scales_rest() {
        let pulse = Pulse::new(0.2, 1.5);
        let rest = Transform3D::identity().with_uniform_scale(1.5);
        let mut part = Part::new(Shape::sphere(1.0), rest, Material::WHITE)
            .with_motion(PartMotion::Pulse(pulse));
        part.animate(0.7, false);
        assert!((part.transform.scale.x - 1.5 * pulse.scale_at(0.7, false)).abs() < 1e-6);
        part.animate(0.7, true);
        assert!((part.transform.scale.x - 1.5 * pulse.scale_at(0.7, true)).abs() < 1e-6);
    }

    #[test]
    fn test_pulsar_pick_radius_ignores_pulse() {
        let mut star = Entity::new(Shape::sphere(0.4))
            .with_behavior(Behavior::Pulsar { pulse: Pulse::default(), base_scale: 1.0 })
            .pickable(0.6);
        star.handle_pointer(PointerEvent::Enter);
        for i in 0..40 {
            star.update(&ctx(i as f32 * 0.1));
            let (_, radius) = star.bounding_sphere().unwrap();
            assert!((radius - 0.6).abs() < 1e-6, "t={} radius={}", i as f32 * 0.1, radius);
        }
    }

    #[test]
    fn test_template_to_entity() {
        let template = EntityTemplate::new(Some(Shape::sphere(0.5)), Transform3D::identity(), Material::GRAY)
            .with_name("moon")
            .with_tag("orbiter")
            .with_behavior(Behavior::Wormhole { funnel: Funnel::default() });
        let entity = template.to_entity();
        assert_eq!(entity.name.as_deref(), Some("moon"));
        assert!(entity.has_tag("orbiter"));
        assert_eq!(entity.current_material(), Material::GRAY);
    }

    #[test]
    fn test_update_marks_transform_dirty() {
        let mut entity = Entity::new(Shape::sphere(1.0));
        entity.clear_dirty();
        entity.update(&ctx(1.0));
        assert!(entity.dirty_flags().contains(DirtyFlags::TRANSFORM));
    }
}
