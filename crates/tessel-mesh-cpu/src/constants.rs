//! Shared constants for tessel-mesh-cpu.

/// Light levels are clamped to `0..=LIGHT_MAX` before shading.
pub const LIGHT_MAX: u8 = 15;

// Quads
pub(crate) const QUAD_VERTS: usize = 4;
pub(crate) const QUAD_INDICES: usize = 6;

// Colors
pub(crate) const OPAQUE_ALPHA: u8 = 255;
pub(crate) const FULL_BRIGHT: [u8; 4] = [255, 255, 255, OPAQUE_ALPHA];

/// Version tag written ahead of serialized geometry.
pub(crate) const WIRE_VERSION: u16 = 1;
