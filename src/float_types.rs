// Re-export parry for the appropriate float size
#[cfg(feature = "f64")]
pub use parry3d_f64 as parry3d;

#[cfg(feature = "f32")]
pub use parry3d;

// Our Real scalar type:
#[cfg(feature = "f32")]
pub type Real = f32;
#[cfg(feature = "f64")]
pub type Real = f64;

use core::str::FromStr;
use std::sync::OnceLock;

/// Default side-classification epsilon used when clipping against partition planes.
pub const EPSILON: Real = 1e-4;

/// Two vertex positions closer than this are considered the same point.
pub const COINCIDENCE_EPSILON: Real = 1e-6;

/// Lazily-initialized clipping tolerance.
/// Defaults to [`EPSILON`], but can be overridden:
///  1) **Build-time**: set env var `SHATTER_TOLERANCE` (e.g. `SHATTER_TOLERANCE=1e-5 cargo build`)
///  2) **Runtime**: call [`set_tolerance`] once before shattering anything
static TOLERANCE_CELL: OnceLock<Real> = OnceLock::new();

/// Returns the current clipping tolerance.
pub fn tolerance() -> Real {
    *TOLERANCE_CELL.get_or_init(|| {
        // Compile-time env if provided, inherited by dependencies
        if let Some(environment_variable) = option_env!("SHATTER_TOLERANCE") {
            if let Ok(value) = Real::from_str(environment_variable) {
                return value.max(COINCIDENCE_EPSILON);
            }
        }
        EPSILON
    })
}

/// Set the tolerance programmatically once (subsequent calls are ignored).
/// Call near program start: `meshshatter::float_types::set_tolerance(1e-5);`
pub fn set_tolerance(value: Real) {
    let _ = TOLERANCE_CELL.set(value.max(COINCIDENCE_EPSILON));
}

/// RGBA color, each channel nominally in `[0, 1]`.
pub type Color = nalgebra::Vector4<Real>;

/// Opaque white, the neutral element of the vertex color combination.
pub fn white() -> Color {
    Color::new(1.0, 1.0, 1.0, 1.0)
}
