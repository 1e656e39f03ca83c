//! Volume image data model (spec §3 "Volume image")
//!
//! A 3-D grid of voxels with spacing/origin, a pixel format, and a "window"
//! used to map voxel values into the transfer function's domain. This
//! module only holds the CPU-side description; GPU upload lives in
//! [`super::sat`]/[`super::proxy_geometry`]/[`super::raycaster`], which bind
//! the uploaded texture by name.
//!
//! Grounded on `panxinmiao-myth`'s texture-format enums in
//! `resources/texture.rs` (the model for [`PixelFormat`]'s shape) and
//! `resources/primitives/mod.rs` for voxel/vertex bound computations.

use glam::{UVec3, Vec3};

/// Supported voxel pixel formats (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    L8,
    L16,
    R32Sint,
    Rgba8,
}

impl PixelFormat {
    #[must_use]
    pub fn bytes_per_voxel(self) -> usize {
        match self {
            Self::L8 => 1,
            Self::L16 => 2,
            Self::R32Sint => 4,
            Self::Rgba8 => 4,
        }
    }

    #[must_use]
    pub fn wgpu_format(self) -> wgpu::TextureFormat {
        match self {
            Self::L8 => wgpu::TextureFormat::R8Unorm,
            Self::L16 => wgpu::TextureFormat::R16Uint,
            Self::R32Sint => wgpu::TextureFormat::R32Sint,
            Self::Rgba8 => wgpu::TextureFormat::Rgba8Unorm,
        }
    }
}

/// The `(min, max)` voxel-value window used to map samples into the
/// transfer function's domain (spec §3).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub min: f32,
    pub max: f32,
}

impl Window {
    #[must_use]
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.max - self.min
    }
}

/// CPU-side description of a volume image (spec §3 "Volume image").
///
/// Does not own GPU resources: callers upload `voxels` into a 3-D texture
/// themselves (or via a thin helper added at the application layer) and
/// bind it into [`super::raycaster::RayCaster`] by name.
#[derive(Debug, Clone)]
pub struct VolumeImage {
    pub size: UVec3,
    pub spacing: Vec3,
    pub origin: Vec3,
    pub format: PixelFormat,
    pub window: Window,
    pub voxels: Vec<u8>,
}

impl VolumeImage {
    #[must_use]
    pub fn new(size: UVec3, spacing: Vec3, origin: Vec3, format: PixelFormat, window: Window) -> Self {
        let voxel_count = (size.x as usize) * (size.y as usize) * (size.z as usize);
        Self {
            size,
            spacing,
            origin,
            format,
            window,
            voxels: vec![0u8; voxel_count * format.bytes_per_voxel()],
        }
    }

    /// World-space extent of the image's bounding box (`size * spacing`).
    #[must_use]
    pub fn world_extent(&self) -> Vec3 {
        Vec3::new(
            self.size.x as f32 * self.spacing.x,
            self.size.y as f32 * self.spacing.y,
            self.size.z as f32 * self.spacing.z,
        )
    }

    /// Brick-grid resolution for a given brick size (spec §3 "Brick grid",
    /// `ceil(imageSize / brick)`).
    #[must_use]
    pub fn brick_grid_size(&self, brick: UVec3) -> UVec3 {
        UVec3::new(
            self.size.x.div_ceil(brick.x),
            self.size.y.div_ceil(brick.y),
            self.size.z.div_ceil(brick.z),
        )
    }

    /// Reads a single voxel's scalar value at `(x, y, z)`, decoded per
    /// [`PixelFormat`]. Used by CPU-side tests that check proxy-geometry
    /// soundness (P10) against ground truth without a GPU readback.
    #[must_use]
    pub fn sample(&self, x: u32, y: u32, z: u32) -> f32 {
        let bpv = self.format.bytes_per_voxel();
        let idx = ((z * self.size.y + y) * self.size.x + x) as usize * bpv;
        match self.format {
            PixelFormat::L8 => f32::from(self.voxels[idx]),
            PixelFormat::L16 => u16::from_le_bytes([self.voxels[idx], self.voxels[idx + 1]]) as f32,
            PixelFormat::R32Sint => i32::from_le_bytes(self.voxels[idx..idx + 4].try_into().unwrap()) as f32,
            PixelFormat::Rgba8 => f32::from(self.voxels[idx]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brick_grid_size_rounds_up() {
        let img = VolumeImage::new(
            UVec3::new(17, 16, 9),
            Vec3::ONE,
            Vec3::ZERO,
            PixelFormat::L8,
            Window::new(0.0, 255.0),
        );
        assert_eq!(img.brick_grid_size(UVec3::new(8, 8, 8)), UVec3::new(3, 2, 2));
    }

    #[test]
    fn world_extent_scales_by_spacing() {
        let img = VolumeImage::new(
            UVec3::new(10, 10, 10),
            Vec3::new(0.5, 0.5, 2.0),
            Vec3::ZERO,
            PixelFormat::L8,
            Window::new(0.0, 255.0),
        );
        assert_eq!(img.world_extent(), Vec3::new(5.0, 5.0, 20.0));
    }
}
