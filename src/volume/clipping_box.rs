//! Clipping-box widget (spec §4.J)
//!
//! An interactive, axis-aligned box in the image's normalized `[0,1]³` cube
//! with six pickable face handles. This module is pure CPU geometry/state;
//! the scene-graph side (line/sphere/quad mesh upload, picking ray cast
//! against the live scene) is an external collaborator per spec §1 — this
//! module exposes the math that collaborator drives.
//!
//! Grounded on `panxinmiao-myth`'s `scene/` transform-widget conventions
//! (affine get/set pairs) and `resources/primitives/mod.rs` for the
//! edge/handle layout used by [`ClippingBox::edges`]/[`ClippingBox::handle_centers`].

use glam::{Mat4, Vec3};

/// Minimum separation enforced between `min[i]` and `max[i]` on every axis
/// (spec §4.J "Pick a handle", P11).
pub const MIN_SEPARATION: f32 = 1e-3;

/// Which face (by axis + sign) a handle id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    MinX,
    MaxX,
    MinY,
    MaxY,
    MinZ,
    MaxZ,
}

impl Handle {
    const ALL: [Handle; 6] = [Handle::MinX, Handle::MaxX, Handle::MinY, Handle::MaxY, Handle::MinZ, Handle::MaxZ];

    #[must_use]
    pub fn axis(self) -> usize {
        match self {
            Handle::MinX | Handle::MaxX => 0,
            Handle::MinY | Handle::MaxY => 1,
            Handle::MinZ | Handle::MaxZ => 2,
        }
    }

    #[must_use]
    pub fn is_min(self) -> bool {
        matches!(self, Handle::MinX | Handle::MinY | Handle::MinZ)
    }
}

/// User-interaction mode (spec §4.J state).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    #[default]
    None,
    Box,
    Camera,
    Handle,
}

/// Interactive axis-aligned clipping box in `[0,1]³` (spec §3 "Clipping box",
/// §4.J).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClippingBox {
    min: Vec3,
    max: Vec3,
    selection_mode: SelectionMode,
    selected_handle: Option<Handle>,
}

impl Default for ClippingBox {
    fn default() -> Self {
        Self {
            min: Vec3::ZERO,
            max: Vec3::ONE,
            selection_mode: SelectionMode::None,
            selected_handle: None,
        }
    }
}

impl ClippingBox {
    #[must_use]
    pub fn min(&self) -> Vec3 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> Vec3 {
        self.max
    }

    #[must_use]
    pub fn selection_mode(&self) -> SelectionMode {
        self.selection_mode
    }

    #[must_use]
    pub fn selected_handle(&self) -> Option<Handle> {
        self.selected_handle
    }

    fn clamp_to_invariant(&mut self) {
        for i in 0..3 {
            self.min[i] = self.min[i].clamp(0.0, 1.0);
            self.max[i] = self.max[i].clamp(0.0, 1.0);
            if self.min[i] + MIN_SEPARATION > self.max[i] {
                let center = (self.min[i] + self.max[i]) / 2.0;
                self.min[i] = (center - MIN_SEPARATION / 2.0).max(0.0);
                self.max[i] = (self.min[i] + MIN_SEPARATION).min(1.0);
                self.min[i] = self.max[i] - MIN_SEPARATION;
            }
        }
    }

    /// Picks a handle by id, remembering it for subsequent drags (spec
    /// §4.J "Pick a handle"). Fires `on_clipping_updated` is the caller's
    /// responsibility once a drag is confirmed, not on pick alone.
    pub fn pick_handle(&mut self, handle: Handle) {
        self.selection_mode = SelectionMode::Handle;
        self.selected_handle = Some(handle);
    }

    pub fn clear_selection(&mut self) {
        self.selection_mode = SelectionMode::None;
        self.selected_handle = None;
    }

    /// Shrinks/grows the box along the currently-picked handle's axis by
    /// `delta` (image-space units), clamped so `min[i] + ε ≤ max[i]` and
    /// `[min,max] ⊂ [0,1]³` (spec §4.J, P11).
    pub fn drag_handle(&mut self, delta: f32) {
        let Some(handle) = self.selected_handle else { return };
        let axis = handle.axis();
        if handle.is_min() {
            self.min[axis] += delta;
        } else {
            self.max[axis] += delta;
        }
        self.clamp_to_invariant();
    }

    /// Applies a world-space delta to both `min` and `max` uniformly (spec
    /// §4.J "Drag the box").
    pub fn translate(&mut self, delta: Vec3) {
        self.min += delta;
        self.max += delta;
        self.clamp_to_invariant();
    }

    /// Scales the box around its own center by `1 + dy * speed`, where
    /// `speed = |volume| / (100 * viewport_height)` (spec §4.J "Scale the
    /// box").
    pub fn scale_by_cursor(&mut self, dy: f32, viewport_height: f32) {
        let volume = self.size();
        let magnitude = volume.x.abs() + volume.y.abs() + volume.z.abs();
        let speed = magnitude / (100.0 * viewport_height.max(1.0));
        let factor = 1.0 + dy * speed;
        let center = self.center();
        let half = self.size() / 2.0 * factor;
        self.min = center - half;
        self.max = center + half;
        self.clamp_to_invariant();
    }

    /// Sets the box from a 4×4 affine applied to the canonical unit cube's
    /// opposite corners, then clamps to `[0,1]³` (spec §4.J "Set from
    /// transform").
    pub fn set_from_transform(&mut self, transform: Mat4) {
        let a = transform.transform_point3(Vec3::ZERO);
        let b = transform.transform_point3(Vec3::ONE);
        self.min = a.min(b);
        self.max = a.max(b);
        self.clamp_to_invariant();
    }

    /// Returns the affine mapping the canonical unit cube to the current
    /// box: `T_center · S(size) · T_-center` (spec §4.J "Get as transform").
    #[must_use]
    pub fn as_transform(&self) -> Mat4 {
        let size = self.size();
        let center = self.center();
        Mat4::from_translation(center) * Mat4::from_scale(size) * Mat4::from_translation(-Vec3::splat(0.5))
    }

    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) / 2.0
    }

    /// The twelve edges of the box plus the three "cross" segments between
    /// opposite face centers, as `(start, end)` pairs — fifteen segments
    /// total (spec §4.J "Rendering").
    #[must_use]
    pub fn edges(&self) -> Vec<(Vec3, Vec3)> {
        let (min, max) = (self.min, self.max);
        let corners = [
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(max.x, max.y, max.z),
            Vec3::new(min.x, max.y, max.z),
        ];
        let mut segments = Vec::with_capacity(15);
        let bottom = [(0, 1), (1, 2), (2, 3), (3, 0)];
        let top = [(4, 5), (5, 6), (6, 7), (7, 4)];
        let verticals = [(0, 4), (1, 5), (2, 6), (3, 7)];
        for (a, b) in bottom.into_iter().chain(top).chain(verticals) {
            segments.push((corners[a], corners[b]));
        }
        for (h_a, h_b) in [(Handle::MinX, Handle::MaxX), (Handle::MinY, Handle::MaxY), (Handle::MinZ, Handle::MaxZ)] {
            segments.push((self.handle_center(h_a), self.handle_center(h_b)));
        }
        segments
    }

    /// World position of a face handle's center (spec §4.J "Rendering":
    /// "six sphere handles at face centers").
    #[must_use]
    pub fn handle_center(&self, handle: Handle) -> Vec3 {
        let mut p = self.center();
        let v = if handle.is_min() { self.min[handle.axis()] } else { self.max[handle.axis()] };
        p[handle.axis()] = v;
        p
    }

    #[must_use]
    pub fn handle_centers(&self) -> [(Handle, Vec3); 6] {
        let mut out = [(Handle::MinX, Vec3::ZERO); 6];
        for (slot, handle) in out.iter_mut().zip(Handle::ALL) {
            *slot = (handle, self.handle_center(handle));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_box_is_full_unit_cube() {
        let b = ClippingBox::default();
        assert_eq!(b.min(), Vec3::ZERO);
        assert_eq!(b.max(), Vec3::ONE);
    }

    #[test]
    fn drag_handle_respects_min_separation() {
        let mut b = ClippingBox::default();
        b.pick_handle(Handle::MaxX);
        b.drag_handle(-2.0);
        assert!(b.min().x + MIN_SEPARATION <= b.max().x + 1e-6);
        assert!(b.max().x >= 0.0);
    }

    #[test]
    fn invariant_holds_after_many_interactions() {
        let mut b = ClippingBox::default();
        b.pick_handle(Handle::MinY);
        for _ in 0..50 {
            b.drag_handle(0.1);
        }
        for i in 0..3 {
            assert!(b.min()[i] + MIN_SEPARATION <= b.max()[i] + 1e-6);
            assert!(b.min()[i] >= 0.0 && b.max()[i] <= 1.0);
        }
    }

    #[test]
    fn translate_clamps_into_unit_cube() {
        let mut b = ClippingBox::default();
        b.translate(Vec3::splat(5.0));
        assert!(b.max().x <= 1.0 && b.max().y <= 1.0 && b.max().z <= 1.0);
    }

    #[test]
    fn set_from_transform_round_trips_through_as_transform() {
        let mut b = ClippingBox::default();
        b.min = Vec3::new(0.1, 0.2, 0.3);
        b.max = Vec3::new(0.6, 0.7, 0.8);
        let t = b.as_transform();
        let mut b2 = ClippingBox::default();
        b2.set_from_transform(t);
        assert!((b2.min() - b.min).length() < 1e-5);
        assert!((b2.max() - b.max).length() < 1e-5);
    }

    #[test]
    fn scale_grows_around_center() {
        let mut b = ClippingBox::default();
        b.min = Vec3::splat(0.25);
        b.max = Vec3::splat(0.75);
        let center_before = b.center();
        b.scale_by_cursor(10.0, 600.0);
        assert!((b.center() - center_before).length() < 1e-4);
        assert!(b.size().x >= 0.5 - 1e-4);
    }
}
