use derive_getters::Getters;
use mantori_util::{
    HeightMap,
    math::{
        bounded_int::BoundedInt,
        position::BlockPos,
        vector2::{chunk_start_x, chunk_start_z},
    },
    resource_location::ResourceLocation,
};
use serde::Deserialize;

use super::{
    Structure, StructureConfig, StructureGeneratorContext, StructurePosition, StructureType,
    pool::{StructurePoolEntry, generator},
};
use crate::generation::{height_limit::HeightContext, height_provider::HeightProvider};

/// Terrain at the chunk origin must rise above this for the structure to start.
pub const MIN_GROUND_HEIGHT: i32 = 40;

/// A jigsaw structure for the End islands. It only starts in chunks whose origin lies on
/// terrain higher than [`MIN_GROUND_HEIGHT`], so it never spawns over the void.
#[derive(Deserialize, Getters, Debug)]
pub struct EndStructure {
    #[serde(flatten)]
    #[getter(skip)]
    config: StructureConfig,
    start_pool: StructurePoolEntry,
    #[serde(default)]
    start_jigsaw_name: Option<ResourceLocation>,
    size: BoundedInt<0, 30>,
    start_height: HeightProvider,
    #[serde(default)]
    project_start_to_heightmap: Option<HeightMap>,
    max_distance_from_center: BoundedInt<1, 128>,
}

impl EndStructure {
    pub fn new(
        config: StructureConfig,
        start_pool: StructurePoolEntry,
        start_jigsaw_name: Option<ResourceLocation>,
        size: BoundedInt<0, 30>,
        start_height: HeightProvider,
        project_start_to_heightmap: Option<HeightMap>,
        max_distance_from_center: BoundedInt<1, 128>,
    ) -> Self {
        Self {
            config,
            start_pool,
            start_jigsaw_name,
            size,
            start_height,
            project_start_to_heightmap,
            max_distance_from_center,
        }
    }

    fn ground_height(context: &StructureGeneratorContext<'_>) -> i32 {
        context.chunk_generator.get_height_in_ground(
            chunk_start_x(&context.chunk_pos),
            chunk_start_z(&context.chunk_pos),
            HeightMap::MotionBlockingNoLeaves,
            context.world,
        )
    }

    /// Whether the ground at the chunk origin, ignoring leaves, is high enough to build on.
    pub fn extra_spawning_checks(context: &StructureGeneratorContext<'_>) -> bool {
        Self::ground_height(context) > MIN_GROUND_HEIGHT
    }
}

impl Structure for EndStructure {
    fn config(&self) -> &StructureConfig {
        &self.config
    }

    fn get_structure_position(
        &self,
        context: &mut StructureGeneratorContext<'_>,
    ) -> Option<StructurePosition> {
        let ground_y = Self::ground_height(context);
        if ground_y <= MIN_GROUND_HEIGHT {
            log::debug!(
                "Skipping end structure in chunk {:?}, ground at {ground_y}",
                context.chunk_pos
            );
            return None;
        }

        let height_context = HeightContext::new(context.chunk_generator, context.world);
        let start_y = self.start_height.get(&mut context.random, &height_context);
        let pos = BlockPos::new(
            chunk_start_x(&context.chunk_pos),
            start_y + ground_y,
            chunk_start_z(&context.chunk_pos),
        );

        generator::generate(
            context,
            &self.start_pool,
            self.start_jigsaw_name.as_ref(),
            self.size.get(),
            pos,
            false,
            self.project_start_to_heightmap,
            self.max_distance_from_center.get(),
        )
    }

    fn get_type(&self) -> StructureType {
        StructureType::EndStructure
    }
}
