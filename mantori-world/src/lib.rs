pub mod generation;

pub use generation::{
    chunk_generator::StructureChunkGenerator,
    height_limit::{HeightContext, HeightLimitView},
    locator::{StructureLocator, StructureStart},
    registry::{DatapackError, StructureRegistry},
    structure::{
        Structure, StructureGeneratorContext, StructurePosition, end_structure::EndStructure,
    },
};
