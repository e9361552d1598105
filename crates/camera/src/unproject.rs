//! Mapping between viewport pixels and world space.

use glam::{Mat4, Vec3, Vec4};
use thiserror::Error;

/// Pixel rectangle the scene is rendered into, origin at the bottom-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Left edge in pixels.
    pub x: f32,
    /// Bottom edge in pixels.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Viewport {
    /// Create a viewport rectangle.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Viewport covering a whole `width x height` surface.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }

    /// Width divided by height.
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

/// Reasons an unprojection cannot produce a world-space point.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum UnprojectError {
    /// The combined view-projection matrix has no inverse.
    #[error("view-projection matrix is not invertible (determinant {determinant})")]
    SingularViewProjection {
        /// Determinant of the combined matrix.
        determinant: f32,
    },
    /// The viewport has zero or non-finite area.
    #[error("viewport {width}x{height} has no area")]
    DegenerateViewport {
        /// Viewport width.
        width: f32,
        /// Viewport height.
        height: f32,
    },
    /// The point maps to infinity (homogeneous w of zero).
    #[error("unprojected point lies at infinity")]
    PointAtInfinity,
    /// Near and far points coincide, so no ray direction exists.
    #[error("near and far points coincide")]
    DegenerateRay,
}

/// Map a window point back into world space.
///
/// `window.x`/`window.y` are viewport pixels (bottom-left origin) and
/// `window.z` is the normalized depth, `0` on the near plane and `1` on the
/// far plane. The depth is used unchanged as the NDC z coordinate, matching
/// the `[0, 1]` depth range of the `*_rh` glam projections.
pub fn unproject(
    window: Vec3,
    view: &Mat4,
    projection: &Mat4,
    viewport: &Viewport,
) -> Result<Vec3, UnprojectError> {
    check_viewport(viewport)?;

    let view_projection = *projection * *view;
    let determinant = view_projection.determinant();
    if determinant == 0.0 || !determinant.is_finite() {
        return Err(UnprojectError::SingularViewProjection { determinant });
    }
    let inverse = view_projection.inverse();

    let ndc = Vec4::new(
        (window.x - viewport.x) / viewport.width * 2.0 - 1.0,
        (window.y - viewport.y) / viewport.height * 2.0 - 1.0,
        window.z,
        1.0,
    );

    let world = inverse * ndc;
    if world.w == 0.0 {
        return Err(UnprojectError::PointAtInfinity);
    }
    let point = world.truncate() / world.w;
    if !point.is_finite() {
        return Err(UnprojectError::PointAtInfinity);
    }

    Ok(point)
}

/// Map a world-space point to window coordinates.
///
/// The inverse of [`unproject`]: returns viewport pixels in x/y and the NDC
/// depth in z. Fails for points on the camera plane (w of zero).
pub fn project(
    world: Vec3,
    view: &Mat4,
    projection: &Mat4,
    viewport: &Viewport,
) -> Result<Vec3, UnprojectError> {
    check_viewport(viewport)?;

    let clip = *projection * *view * world.extend(1.0);
    if clip.w == 0.0 {
        return Err(UnprojectError::PointAtInfinity);
    }
    let ndc = clip.truncate() / clip.w;
    if !ndc.is_finite() {
        return Err(UnprojectError::PointAtInfinity);
    }

    Ok(Vec3::new(
        viewport.x + (ndc.x + 1.0) * 0.5 * viewport.width,
        viewport.y + (ndc.y + 1.0) * 0.5 * viewport.height,
        ndc.z,
    ))
}

fn check_viewport(viewport: &Viewport) -> Result<(), UnprojectError> {
    let area = viewport.width * viewport.height;
    if area == 0.0 || !area.is_finite() {
        return Err(UnprojectError::DegenerateViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }
    Ok(())
}
