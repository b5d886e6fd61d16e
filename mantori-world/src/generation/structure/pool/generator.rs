use std::collections::VecDeque;

use mantori_util::{
    HeightMap,
    math::{
        block_box::BlockBox, direction::BlockRotation, position::BlockPos, vector3::Vector3,
    },
    random::RandomGenerator,
    resource_location::ResourceLocation,
};

use super::{
    PoolElement, Projection, StructurePoolEntry, StructurePoolRegistry, empty_pool_id,
    template::{PlacedJigsaw, TemplateManager},
};
use crate::generation::{
    chunk_generator::StructureChunkGenerator,
    height_limit::HeightLimitView,
    structure::{StructureGeneratorContext, StructurePosition, piece::PoolStructurePiece},
};

/// Candidates taller than this never get extra headroom from the expansion hack.
const EXPANSION_HACK_MAX_HEIGHT: i32 = 16;

/// The volume pieces may still be placed in: `bounds` minus every carved box.
struct FreeSpace {
    bounds: BlockBox,
    carved: Vec<BlockBox>,
}

impl FreeSpace {
    fn new(bounds: BlockBox) -> Self {
        Self {
            bounds,
            carved: Vec::new(),
        }
    }

    fn fits(&self, candidate: &BlockBox) -> bool {
        self.bounds.encloses(candidate) && !self.carved.iter().any(|b| b.intersects(candidate))
    }

    fn carve(&mut self, occupied: BlockBox) {
        self.carved.push(occupied);
    }
}

struct QueuedPiece {
    piece: usize,
    space: usize,
    depth: u32,
}

/// Assembles a jigsaw structure starting from a random element of `start_pool`.
///
/// With `start_jigsaw_name` set, the start piece is shifted so the named jigsaw sits at
/// `pos`. With `project_start_to_heightmap` set, `pos.y` is taken relative to that
/// heightmap at the piece's center. Pieces are attached breadth first up to `size`
/// connections away from the start, and never leave the cube of
/// `max_distance_from_center` blocks around the start position.
#[expect(clippy::too_many_arguments)]
pub fn generate(
    context: &mut StructureGeneratorContext<'_>,
    start_pool: &StructurePoolEntry,
    start_jigsaw_name: Option<&ResourceLocation>,
    size: i32,
    pos: BlockPos,
    use_expansion_hack: bool,
    project_start_to_heightmap: Option<HeightMap>,
    max_distance_from_center: i32,
) -> Option<StructurePosition> {
    let pools = context.pools;
    let templates = context.templates;

    let Some(pool) = start_pool.resolve(pools) else {
        log::warn!("Unknown start pool {start_pool:?}");
        return None;
    };

    let rotation = BlockRotation::random(&mut context.random);
    let element = pool.get_random_element(&mut context.random)?;
    if element.is_empty() {
        return None;
    }

    let jigsaw_offset = match start_jigsaw_name {
        Some(name) => {
            let jigsaws = element.jigsaws(templates, pos, rotation, &mut context.random);
            match jigsaws.iter().find(|jigsaw| &jigsaw.name == name) {
                Some(jigsaw) => jigsaw.pos.0 - pos.0,
                None => {
                    log::warn!("No starting jigsaw {name} found in start pool {start_pool:?}");
                    return None;
                }
            }
        }
        None => Vector3::new(0, 0, 0),
    };

    let piece_pos = BlockPos(pos.0 - jigsaw_offset);
    let mut start_piece = PoolStructurePiece {
        element: element.clone(),
        pos: piece_pos,
        rotation,
        bounding_box: element.bounding_box(templates, piece_pos, rotation),
        ground_level_delta: element.ground_level_delta(),
        depth: 0,
    };

    let center_x = (start_piece.bounding_box.max.x + start_piece.bounding_box.min.x) / 2;
    let center_z = (start_piece.bounding_box.max.z + start_piece.bounding_box.min.z) / 2;
    let ground_y = match project_start_to_heightmap {
        Some(heightmap) => {
            pos.0.y
                + context.chunk_generator.get_height_on_ground(
                    center_x,
                    center_z,
                    heightmap,
                    context.world,
                )
        }
        None => piece_pos.0.y,
    };
    let piece_ground_y = start_piece.bounding_box.min.y + start_piece.ground_level_delta;
    start_piece.translate(0, ground_y - piece_ground_y, 0);

    let start = BlockPos::new(center_x, ground_y + jigsaw_offset.y, center_z);
    let start_box = start_piece.bounding_box;
    let mut pieces = vec![start_piece];

    if size > 0 {
        let mut outer = FreeSpace::new(BlockBox::around(start, max_distance_from_center));
        outer.carve(start_box);

        let mut assembler = PoolAssembler {
            pools,
            templates,
            chunk_generator: context.chunk_generator,
            world: context.world,
            random: &mut context.random,
            max_size: size as u32,
            use_expansion_hack,
            pieces,
            spaces: vec![outer],
            queue: VecDeque::from([QueuedPiece {
                piece: 0,
                space: 0,
                depth: 0,
            }]),
        };
        assembler.run();
        pieces = assembler.pieces;
    }

    log::debug!(
        "Assembled {} pieces from {start_pool:?} starting at {start}",
        pieces.len()
    );
    Some(StructurePosition { start, pieces })
}

struct PoolAssembler<'a, 'r> {
    pools: &'a StructurePoolRegistry,
    templates: &'a TemplateManager,
    chunk_generator: &'a dyn StructureChunkGenerator,
    world: &'a dyn HeightLimitView,
    random: &'r mut RandomGenerator,
    max_size: u32,
    use_expansion_hack: bool,
    pieces: Vec<PoolStructurePiece>,
    spaces: Vec<FreeSpace>,
    queue: VecDeque<QueuedPiece>,
}

impl PoolAssembler<'_, '_> {
    fn run(&mut self) {
        while let Some(queued) = self.queue.pop_front() {
            self.attach_children(&queued);
        }
    }

    /// Extra headroom reserved above a candidate, so pieces expected to grow upward
    /// out of it later have room to do so.
    fn reserved_height(
        &self,
        candidate: &PoolElement,
        rotation: BlockRotation,
        candidate_jigsaws: &[PlacedJigsaw],
    ) -> i32 {
        if !self.use_expansion_hack {
            return 0;
        }
        let origin_box = candidate.bounding_box(self.templates, BlockPos::ZERO, rotation);
        if origin_box.max.y - origin_box.min.y + 1 > EXPANSION_HACK_MAX_HEIGHT {
            return 0;
        }
        candidate_jigsaws
            .iter()
            .filter(|jigsaw| origin_box.contains(&jigsaw.target_pos()))
            .map(|jigsaw| {
                let pool = self.pools.get(&jigsaw.pool);
                let own = pool.map_or(0, |pool| pool.highest_y(self.templates));
                let fallback = pool
                    .and_then(|pool| self.pools.get(&pool.fallback))
                    .map_or(0, |pool| pool.highest_y(self.templates));
                own.max(fallback)
            })
            .max()
            .unwrap_or(0)
    }

    fn attach_children(&mut self, queued: &QueuedPiece) {
        let pools = self.pools;
        let templates = self.templates;
        let chunk_generator = self.chunk_generator;
        let world = self.world;

        let parent = self.pieces[queued.piece].clone();
        let parent_rigid = parent.element.projection() == Projection::Rigid;
        let parent_box = parent.bounding_box;
        let parent_min_y = parent_box.min.y;
        let mut internal_space: Option<usize> = None;

        let jigsaws = parent
            .element
            .jigsaws(templates, parent.pos, parent.rotation, self.random);

        'jigsaws: for jigsaw in jigsaws {
            let front = jigsaw.front();
            let target_pos = jigsaw.target_pos();
            let jigsaw_y = jigsaw.pos.0.y - parent_min_y;
            let mut surface_y: Option<i32> = None;

            let pool = match pools.get(&jigsaw.pool) {
                Some(pool) if !pool.elements.is_empty() || jigsaw.pool == empty_pool_id() => pool,
                _ => {
                    log::warn!("Empty or non-existent pool: {}", jigsaw.pool);
                    continue;
                }
            };
            let fallback = match pools.get(&pool.fallback) {
                Some(fallback)
                    if !fallback.elements.is_empty() || pool.fallback == empty_pool_id() =>
                {
                    fallback
                }
                _ => {
                    log::warn!("Empty or non-existent fallback pool: {}", pool.fallback);
                    continue;
                }
            };

            let space = if parent_box.contains(&target_pos) {
                *internal_space.get_or_insert_with(|| {
                    self.spaces.push(FreeSpace::new(parent_box));
                    self.spaces.len() - 1
                })
            } else {
                queued.space
            };

            let mut candidates = Vec::new();
            if queued.depth != self.max_size {
                candidates.extend(pool.elements_in_random_order(self.random));
            }
            candidates.extend(fallback.elements_in_random_order(self.random));

            for candidate in candidates {
                if candidate.is_empty() {
                    break;
                }
                let candidate_rigid = candidate.projection() == Projection::Rigid;

                for rotation in BlockRotation::shuffled(self.random) {
                    let candidate_jigsaws =
                        candidate.jigsaws(templates, BlockPos::ZERO, rotation, self.random);
                    let reserved_height =
                        self.reserved_height(candidate, rotation, &candidate_jigsaws);

                    for candidate_jigsaw in &candidate_jigsaws {
                        if !jigsaw.can_attach(candidate_jigsaw) {
                            continue;
                        }

                        let local = candidate_jigsaw.pos.0;
                        let candidate_pos = BlockPos(target_pos.0 - local);
                        let candidate_box =
                            candidate.bounding_box(templates, candidate_pos, rotation);

                        let placed_min_y = if parent_rigid && candidate_rigid {
                            parent_min_y + jigsaw_y - local.y + front.to_offset().y
                        } else {
                            *surface_y.get_or_insert_with(|| {
                                chunk_generator.get_height_on_ground(
                                    jigsaw.pos.0.x,
                                    jigsaw.pos.0.z,
                                    HeightMap::WorldSurfaceWg,
                                    world,
                                )
                            }) - local.y
                        };
                        let dy = placed_min_y - candidate_box.min.y;
                        let mut placed_box = candidate_box.offset(0, dy, 0);
                        let placed_pos = candidate_pos.offset(Vector3::new(0, dy, 0));

                        if reserved_height > 0 {
                            let height =
                                (reserved_height + 1).max(placed_box.max.y - placed_box.min.y);
                            let top = placed_box.min.y + height;
                            if top > placed_box.max.y {
                                placed_box = placed_box.expand_up(top - placed_box.max.y);
                            }
                        }

                        if !self.spaces[space].fits(&placed_box) {
                            continue;
                        }
                        self.spaces[space].carve(placed_box);

                        let depth = queued.depth + 1;
                        log::trace!(
                            "Placed {:?} at {placed_pos} ({rotation:?}, depth {depth})",
                            candidate.template_locations()
                        );
                        self.pieces.push(PoolStructurePiece {
                            element: candidate.clone(),
                            pos: placed_pos,
                            rotation,
                            bounding_box: placed_box,
                            ground_level_delta: candidate.ground_level_delta(),
                            depth,
                        });
                        if depth <= self.max_size {
                            self.queue.push_back(QueuedPiece {
                                piece: self.pieces.len() - 1,
                                space,
                                depth,
                            });
                        }
                        continue 'jigsaws;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use mantori_util::{math::vector2::Vector2, random::RandomGenerator};

    use super::*;
    use crate::generation::{
        structure::pool::StructurePool,
        test_util::{END_HEIGHT, FlatGenerator, end_city_pools, end_city_templates},
    };

    fn start_pool() -> StructurePoolEntry {
        StructurePoolEntry::Reference(ResourceLocation::mantori("end/start"))
    }

    fn assemble(
        pools: &StructurePoolRegistry,
        templates: &TemplateManager,
        surface: i32,
        size: i32,
        max_distance: i32,
    ) -> StructurePosition {
        let generator = FlatGenerator::new(surface);
        let mut context = StructureGeneratorContext::new(
            99,
            Vector2::new(0, 0),
            &generator,
            &END_HEIGHT,
            pools,
            templates,
            false,
        );
        generate(
            &mut context,
            &start_pool(),
            None,
            size,
            BlockPos::new(0, 65, 0),
            false,
            None,
            max_distance,
        )
        .unwrap()
    }

    #[test]
    fn size_zero_places_only_start() {
        let position = assemble(&end_city_pools(), &end_city_templates(), 64, 0, 80);
        assert_eq!(position.pieces.len(), 1);
        assert_eq!(position.pieces[0].depth, 0);
        assert_eq!(position.start.0.y, 65);
    }

    #[test]
    fn pieces_stay_apart_and_in_range() {
        for max_distance in [8, 20, 128] {
            let position = assemble(&end_city_pools(), &end_city_templates(), 64, 7, max_distance);
            let bounds = BlockBox::around(position.start, max_distance);
            for (i, piece) in position.pieces.iter().enumerate() {
                assert!(piece.depth <= 7);
                if i > 0 {
                    assert!(bounds.encloses(&piece.bounding_box), "{piece:?} leaves {bounds:?}");
                }
                for other in &position.pieces[i + 1..] {
                    assert!(
                        !piece.bounding_box.intersects(&other.bounding_box),
                        "{piece:?} overlaps {other:?}"
                    );
                }
            }
        }
        let far = assemble(&end_city_pools(), &end_city_templates(), 64, 7, 128);
        assert_eq!(far.pieces.iter().map(|piece| piece.depth).max(), Some(7));
    }

    #[test]
    fn start_jigsaw_lands_on_position() {
        let pools = end_city_pools();
        let templates = end_city_templates();
        let generator = FlatGenerator::new(64);
        let mut context = StructureGeneratorContext::new(
            5,
            Vector2::new(0, 0),
            &generator,
            &END_HEIGHT,
            &pools,
            &templates,
            false,
        );
        let anchor = ResourceLocation::mantori("anchor");
        let pos = BlockPos::new(100, 65, -40);
        let position =
            generate(&mut context, &start_pool(), Some(&anchor), 0, pos, false, None, 80).unwrap();

        let start = &position.pieces[0];
        let mut random = RandomGenerator::from_seed(0, false);
        let jigsaws = start
            .element
            .jigsaws(&templates, start.pos, start.rotation, &mut random);
        let placed_anchor = jigsaws.iter().find(|jigsaw| jigsaw.name == anchor).unwrap();
        assert_eq!(placed_anchor.pos.0.x, 100);
        assert_eq!(placed_anchor.pos.0.z, -40);

        let missing = ResourceLocation::mantori("no_such_jigsaw");
        let pool = start_pool();
        let position = generate(&mut context, &pool, Some(&missing), 0, pos, false, None, 80);
        assert!(position.is_none());
    }

    #[test]
    fn empty_or_unknown_start_pool() {
        let mut pools = end_city_pools();
        pools.register(
            ResourceLocation::mantori("end/nothing"),
            serde_json::from_str(
                r#"{"elements": [{"weight": 1, "element": {"element_type": "minecraft:empty_pool_element"}}]}"#,
            )
            .unwrap(),
        );
        let templates = end_city_templates();
        let generator = FlatGenerator::new(64);
        let mut context = StructureGeneratorContext::new(
            5,
            Vector2::new(0, 0),
            &generator,
            &END_HEIGHT,
            &pools,
            &templates,
            false,
        );
        for pool in ["mantori:end/nothing", "mantori:end/unknown", "minecraft:empty"] {
            let entry = StructurePoolEntry::Reference(pool.parse().unwrap());
            assert!(
                generate(&mut context, &entry, None, 3, BlockPos::ZERO, false, None, 80).is_none(),
                "{pool}"
            );
        }
    }

    #[test]
    fn projects_start_onto_heightmap() {
        let pools = end_city_pools();
        let templates = end_city_templates();
        let generator = FlatGenerator::new(60);
        let mut context = StructureGeneratorContext::new(
            5,
            Vector2::new(0, 0),
            &generator,
            &END_HEIGHT,
            &pools,
            &templates,
            false,
        );
        let position = generate(
            &mut context,
            &start_pool(),
            None,
            0,
            BlockPos::new(0, 5, 0),
            false,
            Some(HeightMap::WorldSurfaceWg),
            80,
        )
        .unwrap();
        assert_eq!(position.start.0.y, 66);
        assert_eq!(position.pieces[0].bounding_box.min.y, 65);
    }

    #[test]
    fn terrain_matching_children_follow_surface() {
        let mut pools = end_city_pools();
        pools.register(
            ResourceLocation::mantori("end/rooms"),
            serde_json::from_str::<StructurePool>(
                r#"{"elements": [{"weight": 1, "element": {"element_type": "minecraft:single_pool_element", "location": "mantori:end/room", "projection": "terrain_matching"}}]}"#,
            )
            .unwrap(),
        );
        // The start sits well above the surface, rigid children would stay level with it.
        let position = assemble(&pools, &end_city_templates(), 40, 2, 80);
        assert_eq!(position.pieces[0].bounding_box.min.y, 64);
        assert!(position.pieces.len() > 1);
        for child in &position.pieces[1..] {
            assert_eq!(child.bounding_box.min.y, 40);
        }
    }

    #[test]
    fn expansion_hack_reserves_headroom() {
        let mut templates = end_city_templates();
        templates.register(
            ResourceLocation::mantori("end/tower"),
            serde_json::from_str(
                r#"{"size": [5, 4, 5], "jigsaws": [
                    {"pos": [0, 1, 2], "orientation": "west_up", "name": "mantori:door", "target": "mantori:door", "pool": "mantori:end/rooms"},
                    {"pos": [4, 1, 2], "orientation": "east_up", "name": "mantori:door", "target": "mantori:door", "pool": "mantori:end/rooms"},
                    {"pos": [2, 0, 2], "orientation": "up_north", "name": "mantori:floor", "target": "mantori:floor", "pool": "mantori:end/rooms"}
                ]}"#,
            )
            .unwrap(),
        );
        let mut pools = end_city_pools();
        pools.register(
            ResourceLocation::mantori("end/rooms"),
            serde_json::from_str::<StructurePool>(
                r#"{"elements": [{"weight": 1, "element": {"element_type": "minecraft:single_pool_element", "location": "mantori:end/tower"}}]}"#,
            )
            .unwrap(),
        );

        let generator = FlatGenerator::new(64);
        for (hack, height) in [(false, 4), (true, 6)] {
            let mut context = StructureGeneratorContext::new(
                11,
                Vector2::new(0, 0),
                &generator,
                &END_HEIGHT,
                &pools,
                &templates,
                false,
            );
            let position = generate(
                &mut context,
                &start_pool(),
                None,
                1,
                BlockPos::new(0, 65, 0),
                hack,
                None,
                80,
            )
            .unwrap();
            assert_eq!(position.pieces.len(), 2);
            let child = &position.pieces[1].bounding_box;
            assert_eq!(child.max.y - child.min.y + 1, height, "hack {hack}");
        }
    }
}
