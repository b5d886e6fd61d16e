use std::collections::BTreeMap;

use mantori_util::{
    math::{block_box::BlockBox, position::BlockPos, vector2::Vector2},
    random::{RandomGenerator, RandomImpl},
    resource_location::ResourceLocation,
};
use serde::Deserialize;

use super::{chunk_generator::StructureChunkGenerator, height_limit::HeightLimitView};
use end_structure::EndStructure;
use piece::PoolStructurePiece;
use pool::{StructurePoolRegistry, template::TemplateManager};

pub mod end_structure;
pub mod piece;
pub mod pool;

/// The registered kinds of structure this crate can decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StructureType {
    EndStructure,
}

impl StructureType {
    pub const ALL: [Self; 1] = [Self::EndStructure];

    pub fn id(&self) -> ResourceLocation {
        match self {
            Self::EndStructure => ResourceLocation::mantori("end_structure"),
        }
    }

    pub fn from_id(id: &ResourceLocation) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| &kind.id() == id)
    }
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStep {
    RawGeneration,
    Lakes,
    LocalModifications,
    UndergroundStructures,
    SurfaceStructures,
    Strongholds,
    UndergroundOres,
    UndergroundDecoration,
    FluidSprings,
    VegetalDecoration,
    TopLayerModification,
}

/// How surrounding terrain is reshaped around the placed pieces.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TerrainAdaptation {
    #[default]
    None,
    Bury,
    BeardThin,
    BeardBox,
    Encapsulate,
}

/// The biomes a structure may start in: a `#tag`, a single id or a list of ids.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(try_from = "RawBiomeList")]
pub enum BiomeList {
    Tag(ResourceLocation),
    Entries(Vec<ResourceLocation>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBiomeList {
    Single(String),
    List(Vec<ResourceLocation>),
}

impl TryFrom<RawBiomeList> for BiomeList {
    type Error = String;

    fn try_from(raw: RawBiomeList) -> Result<Self, Self::Error> {
        match raw {
            RawBiomeList::List(entries) => Ok(Self::Entries(entries)),
            RawBiomeList::Single(single) => match single.strip_prefix('#') {
                Some(tag) => tag.parse().map(Self::Tag).map_err(|err| err.to_string()),
                None => single
                    .parse()
                    .map(|id| Self::Entries(vec![id]))
                    .map_err(|err| err.to_string()),
            },
        }
    }
}

impl BiomeList {
    pub fn contains<G>(&self, biome: &ResourceLocation, generator: &G) -> bool
    where
        G: StructureChunkGenerator + ?Sized,
    {
        match self {
            Self::Tag(tag) => generator.is_biome_in_tag(biome, tag),
            Self::Entries(entries) => entries.contains(biome),
        }
    }
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SpawnBoundingBox {
    Piece,
    Full,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SpawnEntry {
    #[serde(rename = "type")]
    pub entity: ResourceLocation,
    pub weight: i32,
    #[serde(rename = "minCount")]
    pub min_count: i32,
    #[serde(rename = "maxCount")]
    pub max_count: i32,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct StructureSpawns {
    pub bounding_box: SpawnBoundingBox,
    pub spawns: Vec<SpawnEntry>,
}

/// Settings every structure carries, regardless of its type.
#[derive(Deserialize, Clone, Debug)]
pub struct StructureConfig {
    pub biomes: BiomeList,
    #[serde(default)]
    pub spawn_overrides: BTreeMap<String, StructureSpawns>,
    pub step: GenerationStep,
    #[serde(default)]
    pub terrain_adaptation: TerrainAdaptation,
}

/// Everything a structure may look at while deciding whether to start in a chunk.
pub struct StructureGeneratorContext<'a> {
    pub seed: u64,
    pub chunk_pos: Vector2<i32>,
    pub chunk_generator: &'a dyn StructureChunkGenerator,
    pub world: &'a dyn HeightLimitView,
    pub pools: &'a StructurePoolRegistry,
    pub templates: &'a TemplateManager,
    pub random: RandomGenerator,
}

impl<'a> StructureGeneratorContext<'a> {
    pub fn new(
        seed: u64,
        chunk_pos: Vector2<i32>,
        chunk_generator: &'a dyn StructureChunkGenerator,
        world: &'a dyn HeightLimitView,
        pools: &'a StructurePoolRegistry,
        templates: &'a TemplateManager,
        legacy_random: bool,
    ) -> Self {
        let mut random = RandomGenerator::from_seed(seed, legacy_random);
        random.set_carver_seed(seed, chunk_pos.x, chunk_pos.y);
        Self {
            seed,
            chunk_pos,
            chunk_generator,
            world,
            pools,
            templates,
            random,
        }
    }
}

/// Where a structure starts and the pieces it is made of.
#[derive(Clone, Debug, PartialEq)]
pub struct StructurePosition {
    pub start: BlockPos,
    pub pieces: Vec<PoolStructurePiece>,
}

impl StructurePosition {
    pub fn bounding_box(&self) -> Option<BlockBox> {
        BlockBox::encompass(self.pieces.iter().map(|piece| piece.bounding_box))
    }
}

pub trait Structure: Send + Sync {
    fn config(&self) -> &StructureConfig;

    /// Decides whether the structure starts in `context.chunk_pos` and lays out its pieces.
    fn get_structure_position(
        &self,
        context: &mut StructureGeneratorContext<'_>,
    ) -> Option<StructurePosition>;

    fn get_type(&self) -> StructureType;

    /// [`Structure::get_structure_position`], rejecting starts outside the configured biomes.
    fn get_valid_structure_position(
        &self,
        context: &mut StructureGeneratorContext<'_>,
    ) -> Option<StructurePosition> {
        let position = self.get_structure_position(context)?;
        let start = position.start.0;
        let biome = context.chunk_generator.get_biome(start.x, start.y, start.z);
        if self.config().biomes.contains(&biome, context.chunk_generator) {
            Some(position)
        } else {
            log::debug!("Structure start at {} rejected in biome {biome}", position.start);
            None
        }
    }
}

/// A structure as it appears in a datapack, dispatched on its `type` field.
#[derive(Deserialize)]
#[serde(tag = "type")]
pub enum StructureKind {
    #[serde(rename = "mantori:end_structure")]
    End(EndStructure),
}

impl Structure for StructureKind {
    fn config(&self) -> &StructureConfig {
        match self {
            Self::End(structure) => structure.config(),
        }
    }

    fn get_structure_position(
        &self,
        context: &mut StructureGeneratorContext<'_>,
    ) -> Option<StructurePosition> {
        match self {
            Self::End(structure) => structure.get_structure_position(context),
        }
    }

    fn get_type(&self) -> StructureType {
        match self {
            Self::End(structure) => structure.get_type(),
        }
    }
}

#[cfg(test)]
mod test {
    use mantori_util::random::legacy_rand::LegacyRand;

    use super::*;
    use crate::generation::test_util::{END_HEIGHT, FlatGenerator};

    #[test]
    fn structure_type_ids() {
        let id = StructureType::EndStructure.id();
        assert_eq!(id.to_string(), "mantori:end_structure");
        assert_eq!(StructureType::from_id(&id), Some(StructureType::EndStructure));
        assert_eq!(
            StructureType::from_id(&ResourceLocation::vanilla("jigsaw")),
            None
        );
    }

    #[test]
    fn legacy_context_uses_carver_seeded_lcg() {
        let generator = FlatGenerator::new(64);
        let pools = StructurePoolRegistry::new();
        let templates = TemplateManager::new();
        let context = |legacy| {
            StructureGeneratorContext::new(
                99,
                Vector2::new(4, -7),
                &generator,
                &END_HEIGHT,
                &pools,
                &templates,
                legacy,
            )
        };

        let mut random = context(true).random;
        assert!(matches!(random, RandomGenerator::Legacy(_)));

        let mut expected = LegacyRand::from_seed(0);
        expected.set_carver_seed(99, 4, -7);
        assert_eq!(random.next_i64(), expected.next_i64());

        assert!(matches!(context(false).random, RandomGenerator::Xoroshiro(_)));
    }

    #[test]
    fn biome_list_shapes() {
        let tag: BiomeList = serde_json::from_str("\"#minecraft:is_end\"").unwrap();
        assert_eq!(tag, BiomeList::Tag(ResourceLocation::vanilla("is_end")));

        let single: BiomeList = serde_json::from_str("\"minecraft:end_highlands\"").unwrap();
        assert_eq!(
            single,
            BiomeList::Entries(vec![ResourceLocation::vanilla("end_highlands")])
        );

        let list: BiomeList =
            serde_json::from_str(r#"["minecraft:end_highlands", "minecraft:end_midlands"]"#)
                .unwrap();
        let generator = FlatGenerator::new(64);
        assert!(list.contains(&ResourceLocation::vanilla("end_midlands"), &generator));
        assert!(!list.contains(&ResourceLocation::vanilla("the_end"), &generator));
        assert!(tag.contains(&ResourceLocation::vanilla("the_end"), &generator));

        assert!(serde_json::from_str::<BiomeList>("\"#Bad Tag\"").is_err());
    }

    #[test]
    fn config_defaults() {
        let config: StructureConfig = serde_json::from_str(
            r##"{"biomes": "#minecraft:is_end", "step": "surface_structures"}"##,
        )
        .unwrap();
        assert_eq!(config.step, GenerationStep::SurfaceStructures);
        assert_eq!(config.terrain_adaptation, TerrainAdaptation::None);
        assert!(config.spawn_overrides.is_empty());
    }

    #[test]
    fn spawn_overrides() {
        let config: StructureConfig = serde_json::from_str(
            r#"{
                "biomes": ["minecraft:end_highlands"],
                "step": "surface_structures",
                "terrain_adaptation": "beard_thin",
                "spawn_overrides": {
                    "monster": {
                        "bounding_box": "full",
                        "spawns": [
                            {
                                "type": "minecraft:shulker",
                                "weight": 10,
                                "minCount": 1,
                                "maxCount": 2
                            }
                        ]
                    }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(config.terrain_adaptation, TerrainAdaptation::BeardThin);
        let monster = &config.spawn_overrides["monster"];
        assert_eq!(monster.bounding_box, SpawnBoundingBox::Full);
        assert_eq!(monster.spawns[0].entity, ResourceLocation::vanilla("shulker"));
        assert_eq!(monster.spawns[0].max_count, 2);
    }
}
