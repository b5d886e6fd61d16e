use log::{debug, trace, warn};
use mantori_config::GenerationConfig;
use mantori_util::{math::vector2::Vector2, resource_location::ResourceLocation};
use rayon::{ThreadPoolBuilder, prelude::*};

use super::{
    chunk_generator::StructureChunkGenerator,
    height_limit::HeightLimitView,
    registry::StructureRegistry,
    structure::{Structure, StructureGeneratorContext, StructurePosition},
};

/// A structure that starts in `chunk`.
#[derive(Clone, Debug, PartialEq)]
pub struct StructureStart {
    pub structure: ResourceLocation,
    pub chunk: Vector2<i32>,
    pub position: StructurePosition,
}

/// Finds structure starts across many chunks at once.
pub struct StructureLocator<'a> {
    registry: &'a StructureRegistry,
    generator: &'a dyn StructureChunkGenerator,
    world: &'a (dyn HeightLimitView + Sync),
    seed: u64,
    config: &'a GenerationConfig,
}

impl<'a> StructureLocator<'a> {
    pub fn new(
        registry: &'a StructureRegistry,
        generator: &'a dyn StructureChunkGenerator,
        world: &'a (dyn HeightLimitView + Sync),
        seed: u64,
        config: &'a GenerationConfig,
    ) -> Self {
        Self {
            registry,
            generator,
            world,
            seed,
            config,
        }
    }

    /// Every structure start in `chunks`, ordered by chunk and then by structure id.
    /// Each chunk and structure pair gets its own freshly seeded context, so the result
    /// does not depend on how the work is split between threads.
    pub fn scan(&self, chunks: &[Vector2<i32>]) -> Vec<StructureStart> {
        if !self.config.structures_enabled || self.registry.is_empty() {
            return Vec::new();
        }

        let mut starts = if self.config.locator_threads > 0 {
            match ThreadPoolBuilder::new()
                .num_threads(self.config.locator_threads)
                .build()
            {
                Ok(pool) => pool.install(|| self.scan_parallel(chunks)),
                Err(err) => {
                    warn!("Couldn't build the locator thread pool, using the global one: {err}");
                    self.scan_parallel(chunks)
                }
            }
        } else {
            self.scan_parallel(chunks)
        };

        starts.sort_by(|a, b| (a.chunk, &a.structure).cmp(&(b.chunk, &b.structure)));
        debug!(
            "Found {} structure starts in {} chunks",
            starts.len(),
            chunks.len()
        );
        starts
    }

    fn scan_parallel(&self, chunks: &[Vector2<i32>]) -> Vec<StructureStart> {
        chunks
            .par_iter()
            .flat_map_iter(|chunk| self.scan_chunk(*chunk))
            .collect()
    }

    fn scan_chunk(&self, chunk: Vector2<i32>) -> Vec<StructureStart> {
        self.registry
            .iter()
            .filter_map(|(id, structure)| {
                let mut context = StructureGeneratorContext::new(
                    self.seed,
                    chunk,
                    self.generator,
                    self.world,
                    &self.registry.pools,
                    &self.registry.templates,
                    self.config.legacy_random_source,
                );
                let position = structure.get_valid_structure_position(&mut context)?;
                trace!(
                    "{id} starts in chunk {chunk:?} with {} pieces",
                    position.pieces.len()
                );
                Some(StructureStart {
                    structure: id.clone(),
                    chunk,
                    position,
                })
            })
            .collect()
    }
}
