use mantori_util::math::{block_box::BlockBox, direction::BlockRotation, position::BlockPos};

use super::pool::PoolElement;

/// One placed element of a jigsaw structure.
#[derive(Clone, Debug, PartialEq)]
pub struct PoolStructurePiece {
    pub element: PoolElement,
    pub pos: BlockPos,
    pub rotation: BlockRotation,
    pub bounding_box: BlockBox,
    pub ground_level_delta: i32,
    /// How many jigsaw connections separate this piece from the start piece.
    pub depth: u32,
}

impl PoolStructurePiece {
    pub fn translate(&mut self, x: i32, y: i32, z: i32) {
        self.pos = self.pos.offset((x, y, z).into());
        self.bounding_box = self.bounding_box.offset(x, y, z);
    }
}
