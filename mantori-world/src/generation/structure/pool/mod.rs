use std::collections::HashMap;

use mantori_util::{
    math::{
        block_box::BlockBox, bounded_int::BoundedInt, direction::BlockRotation, pool::shuffle,
        position::BlockPos,
    },
    random::RandomImpl,
    resource_location::ResourceLocation,
};
use serde::Deserialize;

use template::{PlacedJigsaw, TemplateManager};

pub mod generator;
pub mod template;

pub fn empty_pool_id() -> ResourceLocation {
    ResourceLocation::vanilla("empty")
}

/// How a piece follows the terrain once it has been placed.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    #[default]
    Rigid,
    TerrainMatching,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SinglePoolElement {
    pub location: ResourceLocation,
    #[serde(default)]
    pub projection: Projection,
}

/// Several templates placed on top of each other, sharing one bounding box.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ListPoolElement {
    pub elements: Vec<PoolElement>,
    #[serde(default)]
    pub projection: Projection,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "element_type")]
pub enum PoolElement {
    #[serde(
        rename = "minecraft:single_pool_element",
        alias = "minecraft:legacy_single_pool_element"
    )]
    Single(SinglePoolElement),
    #[serde(rename = "minecraft:list_pool_element")]
    List(ListPoolElement),
    #[serde(rename = "minecraft:empty_pool_element")]
    Empty,
}

impl PoolElement {
    pub fn projection(&self) -> Projection {
        match self {
            Self::Single(single) => single.projection,
            Self::List(list) => list.projection,
            Self::Empty => Projection::Rigid,
        }
    }

    pub fn ground_level_delta(&self) -> i32 {
        1
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn bounding_box(
        &self,
        templates: &TemplateManager,
        pos: BlockPos,
        rotation: BlockRotation,
    ) -> BlockBox {
        match self {
            Self::Single(single) => templates
                .get_or_blank(&single.location)
                .bounding_box(pos, rotation),
            Self::List(list) => BlockBox::encompass(
                list.elements
                    .iter()
                    .map(|element| element.bounding_box(templates, pos, rotation)),
            )
            .unwrap_or_else(|| BlockBox::from_corners(pos.0, pos.0)),
            Self::Empty => BlockBox::from_corners(pos.0, pos.0),
        }
    }

    /// The element's jigsaws in a random order, highest selection priority first.
    pub fn jigsaws(
        &self,
        templates: &TemplateManager,
        pos: BlockPos,
        rotation: BlockRotation,
        random: &mut impl RandomImpl,
    ) -> Vec<PlacedJigsaw> {
        match self {
            Self::Single(single) => {
                let mut jigsaws = templates
                    .get_or_blank(&single.location)
                    .jigsaws(pos, rotation);
                shuffle(&mut jigsaws, random);
                jigsaws.sort_by_key(|jigsaw| std::cmp::Reverse(jigsaw.selection_priority));
                jigsaws
            }
            Self::List(list) => list
                .elements
                .first()
                .map(|first| first.jigsaws(templates, pos, rotation, random))
                .unwrap_or_default(),
            Self::Empty => Vec::new(),
        }
    }

    /// Tallest template this element can place.
    pub fn highest_y(&self, templates: &TemplateManager) -> i32 {
        match self {
            Self::Single(single) => templates.get_or_blank(&single.location).size.y,
            Self::List(list) => list
                .elements
                .iter()
                .map(|element| element.highest_y(templates))
                .max()
                .unwrap_or(0),
            Self::Empty => 0,
        }
    }

    pub fn template_locations(&self) -> Vec<&ResourceLocation> {
        match self {
            Self::Single(single) => vec![&single.location],
            Self::List(list) => list
                .elements
                .iter()
                .flat_map(PoolElement::template_locations)
                .collect(),
            Self::Empty => Vec::new(),
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PoolElementEntry {
    pub element: PoolElement,
    pub weight: BoundedInt<1, 150>,
}

/// A named set of interchangeable pieces jigsaws can pull from.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct StructurePool {
    #[serde(default = "empty_pool_id")]
    pub fallback: ResourceLocation,
    pub elements: Vec<PoolElementEntry>,
}

impl StructurePool {
    pub fn empty() -> Self {
        Self {
            fallback: empty_pool_id(),
            elements: Vec::new(),
        }
    }

    /// Every element repeated once per point of weight.
    fn weighted_elements(&self) -> Vec<&PoolElement> {
        self.elements
            .iter()
            .flat_map(|entry| std::iter::repeat_n(&entry.element, entry.weight.get() as usize))
            .collect()
    }

    pub fn get_random_element(&self, random: &mut impl RandomImpl) -> Option<&PoolElement> {
        let elements = self.weighted_elements();
        if elements.is_empty() {
            return None;
        }
        Some(elements[random.next_bounded_i32(elements.len() as i32) as usize])
    }

    pub fn elements_in_random_order(&self, random: &mut impl RandomImpl) -> Vec<&PoolElement> {
        let mut elements = self.weighted_elements();
        shuffle(&mut elements, random);
        elements
    }

    pub fn highest_y(&self, templates: &TemplateManager) -> i32 {
        self.elements
            .iter()
            .map(|entry| entry.element.highest_y(templates))
            .max()
            .unwrap_or(0)
    }
}

/// A pool given either by id or written out inline.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum StructurePoolEntry {
    Reference(ResourceLocation),
    Direct(Box<StructurePool>),
}

impl StructurePoolEntry {
    pub fn resolve<'a>(&'a self, registry: &'a StructurePoolRegistry) -> Option<&'a StructurePool> {
        match self {
            Self::Reference(id) => registry.get(id),
            Self::Direct(pool) => Some(pool.as_ref()),
        }
    }
}

pub struct StructurePoolRegistry {
    pools: HashMap<ResourceLocation, StructurePool>,
}

impl Default for StructurePoolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StructurePoolRegistry {
    /// A registry holding only the built in `minecraft:empty` pool.
    pub fn new() -> Self {
        let mut pools = HashMap::new();
        pools.insert(empty_pool_id(), StructurePool::empty());
        Self { pools }
    }

    pub fn register(&mut self, id: ResourceLocation, pool: StructurePool) {
        if self.pools.insert(id.clone(), pool).is_some() {
            log::warn!("Template pool {id} registered twice, keeping the last one");
        }
    }

    pub fn get(&self, id: &ResourceLocation) -> Option<&StructurePool> {
        self.pools.get(id)
    }

    pub fn contains(&self, id: &ResourceLocation) -> bool {
        self.pools.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResourceLocation, &StructurePool)> {
        self.pools.iter()
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}
