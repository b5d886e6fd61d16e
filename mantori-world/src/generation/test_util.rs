use mantori_util::{HeightMap, resource_location::ResourceLocation};

use super::{
    chunk_generator::StructureChunkGenerator,
    height_limit::{HeightContext, HeightLimitView},
    structure::pool::{StructurePool, StructurePoolRegistry, template::TemplateManager},
};

pub const END_HEIGHT: HeightContext = HeightContext {
    min_y: 0,
    height: 256,
};

/// Terrain with the same surface height in every column.
pub struct FlatGenerator {
    /// Y of the topmost solid block.
    pub surface: i32,
    pub biome: ResourceLocation,
}

impl FlatGenerator {
    pub fn new(surface: i32) -> Self {
        Self {
            surface,
            biome: ResourceLocation::vanilla("end_highlands"),
        }
    }
}

impl HeightLimitView for FlatGenerator {
    fn height(&self) -> i32 {
        END_HEIGHT.height
    }

    fn bottom_y(&self) -> i32 {
        END_HEIGHT.min_y
    }
}

impl StructureChunkGenerator for FlatGenerator {
    fn get_height(
        &self,
        _x: i32,
        _z: i32,
        _heightmap: HeightMap,
        _world: &dyn HeightLimitView,
    ) -> i32 {
        self.surface + 1
    }

    fn get_biome(&self, _x: i32, _y: i32, _z: i32) -> ResourceLocation {
        self.biome.clone()
    }

    fn is_biome_in_tag(&self, biome: &ResourceLocation, tag: &ResourceLocation) -> bool {
        *tag == ResourceLocation::vanilla("is_end")
            && ["the_end", "end_highlands", "end_midlands", "end_barrens"]
                .iter()
                .any(|name| *biome == ResourceLocation::vanilla(name))
    }
}

/// A hall with a door on its east side, and rooms that chain door to door.
pub fn end_city_templates() -> TemplateManager {
    let mut templates = TemplateManager::new();
    templates.register(
        ResourceLocation::mantori("end/hall"),
        serde_json::from_str(
            r#"{"size": [7, 5, 7], "jigsaws": [
                {"pos": [6, 1, 3], "orientation": "east_up", "name": "mantori:door", "target": "mantori:door", "pool": "mantori:end/rooms"},
                {"pos": [3, 0, 3], "orientation": "down_north", "name": "mantori:anchor", "target": "minecraft:empty", "pool": "minecraft:empty"}
            ]}"#,
        )
        .unwrap(),
    );
    templates.register(
        ResourceLocation::mantori("end/room"),
        serde_json::from_str(
            r#"{"size": [5, 4, 5], "jigsaws": [
                {"pos": [0, 1, 2], "orientation": "west_up", "name": "mantori:door", "target": "mantori:door", "pool": "mantori:end/rooms"},
                {"pos": [4, 1, 2], "orientation": "east_up", "name": "mantori:door", "target": "mantori:door", "pool": "mantori:end/rooms"}
            ]}"#,
        )
        .unwrap(),
    );
    templates
}

pub fn end_city_pools() -> StructurePoolRegistry {
    let mut pools = StructurePoolRegistry::new();
    pools.register(
        ResourceLocation::mantori("end/start"),
        pool(r#"{"elements": [{"weight": 1, "element": {"element_type": "minecraft:single_pool_element", "location": "mantori:end/hall"}}]}"#),
    );
    pools.register(
        ResourceLocation::mantori("end/rooms"),
        pool(r#"{"fallback": "minecraft:empty", "elements": [{"weight": 1, "element": {"element_type": "minecraft:single_pool_element", "location": "mantori:end/room"}}]}"#),
    );
    pools
}

fn pool(json: &str) -> StructurePool {
    serde_json::from_str(json).unwrap()
}
