use mantori_util::{HeightMap, resource_location::ResourceLocation};

use super::height_limit::HeightLimitView;

/// What structure placement needs from the host's terrain generator. Implementations own
/// their noise configuration and must answer the same way for the same column every time,
/// since chunks are evaluated in parallel and in any order.
pub trait StructureChunkGenerator: HeightLimitView + Send + Sync {
    /// The y of the first block above the surface described by `heightmap`.
    fn get_height(&self, x: i32, z: i32, heightmap: HeightMap, world: &dyn HeightLimitView)
    -> i32;

    /// The biome at the given block position.
    fn get_biome(&self, x: i32, y: i32, z: i32) -> ResourceLocation;

    /// Whether `biome` is part of the biome tag `tag`.
    fn is_biome_in_tag(&self, biome: &ResourceLocation, tag: &ResourceLocation) -> bool;

    fn get_height_on_ground(
        &self,
        x: i32,
        z: i32,
        heightmap: HeightMap,
        world: &dyn HeightLimitView,
    ) -> i32 {
        self.get_height(x, z, heightmap, world)
    }

    /// The y of the topmost block of the surface itself.
    fn get_height_in_ground(
        &self,
        x: i32,
        z: i32,
        heightmap: HeightMap,
        world: &dyn HeightLimitView,
    ) -> i32 {
        self.get_height(x, z, heightmap, world) - 1
    }
}
