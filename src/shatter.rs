//! The shatter system: pattern library, per-call scratch state and the most
//! recent fragment batch.

use crate::bsp::ClipPools;
use crate::config::ShatterConfig;
use crate::errors::ShatterError;
use crate::float_types::Real;
use crate::fragment::{Fragment, FragmentAssembler};
use crate::pattern::PatternLibrary;
use crate::space::SpaceMapper;
use crate::traits::{HierarchySource, ShatterSource};
use log::{debug, warn};
use nalgebra::{Point3, Vector3};
use rand::{SeedableRng, rngs::StdRng};
use std::sync::Arc;

/// Scratch state of a single shatter call. Reset at the start of every call,
/// its allocations are reused across calls.
#[derive(Debug, Clone, Default)]
pub struct ShatterContext {
    pub pools: ClipPools,
    /// Shatter-space position of every source vertex
    pub positions: Vec<Point3<Real>>,
}

impl ShatterContext {
    pub fn reset(&mut self, leaf_count: usize) {
        self.pools.reset(leaf_count);
        self.positions.clear();
    }
}

/// Breaks meshes into fragments along randomly chosen partition patterns.
///
/// `M` is the per-pass material type of the meshes it shatters.
#[derive(Debug)]
pub struct ShatterSystem<M> {
    config: ShatterConfig,
    patterns: Arc<PatternLibrary>,
    context: ShatterContext,
    fragments: Vec<Arc<Fragment<M>>>,
    rng: StdRng,
}

impl<M: Clone + std::fmt::Debug> ShatterSystem<M> {
    /// A system with no patterns loaded.
    pub fn new(config: ShatterConfig) -> Self {
        Self::with_patterns(config, Arc::new(PatternLibrary::new()))
    }

    /// A system sharing an already loaded pattern library.
    pub fn with_patterns(config: ShatterConfig, patterns: Arc<PatternLibrary>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        ShatterSystem {
            config,
            patterns,
            context: ShatterContext::default(),
            fragments: Vec::new(),
            rng,
        }
    }

    /// Load every pattern `source` provides, replacing the current library.
    /// Returns the number of patterns loaded.
    pub fn initialize<H: HierarchySource>(&mut self, source: &H) -> usize {
        let mut library = PatternLibrary::new();
        let count = library.load(source, &self.config);
        self.patterns = Arc::new(library);
        count
    }

    /// Drop the fragment batch, the patterns and the scratch buffers.
    pub fn shutdown(&mut self) {
        self.release_fragments();
        self.patterns = Arc::new(PatternLibrary::new());
        self.context = ShatterContext::default();
    }

    pub fn config(&self) -> &ShatterConfig {
        &self.config
    }

    pub fn patterns(&self) -> &Arc<PatternLibrary> {
        &self.patterns
    }

    /// Shatter `mesh` as if hit at `point` travelling along `direction`, both
    /// in world space.
    ///
    /// On success the previous fragment batch is replaced and the number of
    /// new fragments is returned. On failure nothing changes.
    pub fn shatter<S>(
        &mut self,
        mesh: &S,
        point: &Point3<Real>,
        direction: &Vector3<Real>,
    ) -> Result<usize, ShatterError>
    where
        S: ShatterSource<Material = M> + ?Sized,
    {
        match self.try_shatter(mesh, point, direction) {
            Ok(count) => Ok(count),
            Err(err) => {
                match err {
                    ShatterError::NoPatterns => debug!("{err}"),
                    _ => warn!("{err}"),
                }
                Err(err)
            },
        }
    }

    fn try_shatter<S>(
        &mut self,
        mesh: &S,
        point: &Point3<Real>,
        direction: &Vector3<Real>,
    ) -> Result<usize, ShatterError>
    where
        S: ShatterSource<Material = M> + ?Sized,
    {
        let tree = self
            .patterns
            .pick_random(&mut self.rng)
            .ok_or(ShatterError::NoPatterns)?;

        FragmentAssembler::validate(mesh).map_err(|reason| ShatterError::UnsupportedMesh {
            mesh: mesh.name().to_string(),
            reason,
        })?;

        let mapper = SpaceMapper::new(mesh, point, direction, self.config.canonical_radius)?;

        let context = &mut self.context;
        context.reset(tree.leaf_count());
        context.positions.extend(
            (0..mesh.vertex_count()).map(|i| mapper.to_shatter(&mesh.vertex_position(i))),
        );

        let assembler = FragmentAssembler::new(mesh, &mapper);
        for index in 0..mesh.triangle_count() {
            if let Some(polygon) = assembler.source_polygon(index, &context.positions) {
                tree.clip_polygon(polygon, &mut context.pools);
            }
        }

        self.fragments = assembler.assemble_all(&context.pools);
        debug!(
            "shattered mesh {} into {} fragments",
            mesh.name(),
            self.fragments.len()
        );
        Ok(self.fragments.len())
    }

    /// Number of fragments in the current batch.
    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    /// A shared handle to fragment `index` that outlives the batch.
    pub fn get_fragment(&self, index: usize) -> Option<Arc<Fragment<M>>> {
        self.fragments.get(index).cloned()
    }

    /// Borrow fragment `index` without taking a handle.
    pub fn peek_fragment(&self, index: usize) -> Option<&Fragment<M>> {
        self.fragments.get(index).map(Arc::as_ref)
    }

    pub fn fragments(&self) -> &[Arc<Fragment<M>>] {
        &self.fragments
    }

    /// Drop the system's handles to the current batch.
    pub fn release_fragments(&mut self) {
        self.fragments.clear();
    }
}
