use serde::{Deserialize, Serialize};

use super::{position::BlockPos, vector3::Vector3};

/// An axis aligned box of blocks. Both corners are inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockBox {
    pub min: Vector3<i32>,
    pub max: Vector3<i32>,
}

impl BlockBox {
    pub fn new(min_x: i32, min_y: i32, min_z: i32, max_x: i32, max_y: i32, max_z: i32) -> Self {
        Self::from_corners(
            Vector3::new(min_x, min_y, min_z),
            Vector3::new(max_x, max_y, max_z),
        )
    }

    pub fn from_corners(a: Vector3<i32>, b: Vector3<i32>) -> Self {
        Self {
            min: Vector3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Vector3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// A cube of `radius` blocks in every direction around `center`.
    pub fn around(center: BlockPos, radius: i32) -> Self {
        let BlockPos(Vector3 { x, y, z }) = center;
        Self::new(
            x - radius,
            y - radius,
            z - radius,
            x + radius,
            y + radius,
            z + radius,
        )
    }

    pub fn offset(&self, x: i32, y: i32, z: i32) -> Self {
        Self {
            min: self.min.add_raw(x, y, z),
            max: self.max.add_raw(x, y, z),
        }
    }

    pub fn expand_up(&self, amount: i32) -> Self {
        Self {
            min: self.min,
            max: self.max.add_raw(0, amount, 0),
        }
    }

    pub fn intersects(&self, other: &BlockBox) -> bool {
        self.max.x >= other.min.x
            && self.min.x <= other.max.x
            && self.max.y >= other.min.y
            && self.min.y <= other.max.y
            && self.max.z >= other.min.z
            && self.min.z <= other.max.z
    }

    pub fn contains(&self, pos: &BlockPos) -> bool {
        (self.min.x..=self.max.x).contains(&pos.0.x)
            && (self.min.y..=self.max.y).contains(&pos.0.y)
            && (self.min.z..=self.max.z).contains(&pos.0.z)
    }

    /// Whether `other` lies completely inside this box.
    pub fn encloses(&self, other: &BlockBox) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && self.min.z <= other.min.z
            && self.max.x >= other.max.x
            && self.max.y >= other.max.y
            && self.max.z >= other.max.z
    }

    pub fn encompass(boxes: impl IntoIterator<Item = BlockBox>) -> Option<Self> {
        boxes.into_iter().reduce(|acc, b| Self {
            min: Vector3::new(
                acc.min.x.min(b.min.x),
                acc.min.y.min(b.min.y),
                acc.min.z.min(b.min.z),
            ),
            max: Vector3::new(
                acc.max.x.max(b.max.x),
                acc.max.y.max(b.max.y),
                acc.max.z.max(b.max.z),
            ),
        })
    }
}
