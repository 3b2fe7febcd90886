//! Runtime **mesh shattering**: break a rigid triangle mesh into debris
//! fragments along a randomly chosen, precomputed partition pattern.
//!
//! Patterns are transform hierarchies whose pivots define cutting planes.
//! Each is turned into a [BSP](bsp) tree once, at load time. A shatter
//! request maps the mesh into the pattern's frame, clips every triangle into
//! the tree's leaf regions and rebuilds each nonempty region as a standalone
//! [`Fragment`] that keeps the source surface's normals, colors and texture
//! coordinates.
//!
//! ```
//! use meshshatter::{Hierarchy, HierarchySet, MeshPass, ShatterConfig, ShatterSystem, SourceMesh};
//! use nalgebra::{Isometry3, Point3, Vector3};
//!
//! // one cutting plane through the pattern origin
//! let patterns: HierarchySet = [Hierarchy::new("pattern0").with_pivot(0, Isometry3::identity())]
//!     .into_iter()
//!     .collect();
//!
//! let mut system = ShatterSystem::new(ShatterConfig::default().with_seed(1));
//! assert_eq!(system.initialize(&patterns), 1);
//!
//! let mesh = SourceMesh::new(
//!     "quad",
//!     vec![
//!         Point3::new(-1.0, -1.0, 0.0),
//!         Point3::new(1.0, -1.0, 0.0),
//!         Point3::new(1.0, 1.0, 0.0),
//!         Point3::new(-1.0, 1.0, 0.0),
//!     ],
//!     vec![[0, 1, 2], [0, 2, 3]],
//! )
//! .with_pass(MeshPass::new("stone"));
//!
//! // the cutting plane passes through the impact point, facing the impact
//! // direction, so a sideways hit at the center cuts the quad in half
//! let count = system
//!     .shatter(&mesh, &Point3::origin(), &Vector3::new(1.0, 0.0, 0.0))
//!     .unwrap();
//! assert_eq!(count, 2);
//! ```
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64

#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod bsp;
pub mod config;
pub mod errors;
pub mod float_types;
pub mod fragment;
pub mod hierarchy;
pub mod mesh;
pub mod pattern;
pub mod shatter;
pub mod space;
pub mod traits;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use bsp::PartitionTree;
pub use config::ShatterConfig;
pub use errors::{PatternError, ShatterError, UnsupportedReason};
pub use fragment::{Fragment, FragmentVertex};
pub use hierarchy::{Hierarchy, HierarchySet, Pivot};
pub use mesh::{MeshPass, SourceMesh};
pub use pattern::PatternLibrary;
pub use shatter::ShatterSystem;
pub use space::SpaceMapper;
pub use traits::{HierarchySource, ShatterSource, TransformTree};
