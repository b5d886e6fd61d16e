use serde::{Deserialize, Serialize};

use super::vector3::Vector3;
use crate::random::RandomImpl;

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl Direction {
    pub const ALL: [Self; 6] = [
        Self::Down,
        Self::Up,
        Self::North,
        Self::South,
        Self::West,
        Self::East,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Down => "down",
            Self::Up => "up",
            Self::North => "north",
            Self::South => "south",
            Self::West => "west",
            Self::East => "east",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|direction| direction.name() == name)
    }

    pub const fn opposite(&self) -> Self {
        match self {
            Self::Down => Self::Up,
            Self::Up => Self::Down,
            Self::North => Self::South,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::East => Self::West,
        }
    }

    pub const fn to_offset(&self) -> Vector3<i32> {
        match self {
            Self::Down => Vector3::new(0, -1, 0),
            Self::Up => Vector3::new(0, 1, 0),
            Self::North => Vector3::new(0, 0, -1),
            Self::South => Vector3::new(0, 0, 1),
            Self::West => Vector3::new(-1, 0, 0),
            Self::East => Vector3::new(1, 0, 0),
        }
    }

    pub const fn is_horizontal(&self) -> bool {
        !matches!(self, Self::Down | Self::Up)
    }

    const fn rotate_clockwise(&self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
            vertical => *vertical,
        }
    }
}

/// Rotation around the y axis, applied to structure templates.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BlockRotation {
    None,
    #[serde(rename = "clockwise_90")]
    Clockwise90,
    #[serde(rename = "180")]
    Clockwise180,
    #[serde(rename = "counterclockwise_90")]
    CounterClockwise90,
}

impl BlockRotation {
    pub const ALL: [Self; 4] = [
        Self::None,
        Self::Clockwise90,
        Self::Clockwise180,
        Self::CounterClockwise90,
    ];

    pub fn random(random: &mut impl RandomImpl) -> Self {
        Self::ALL[random.next_bounded_i32(Self::ALL.len() as i32) as usize]
    }

    /// All four rotations in a random order.
    pub fn shuffled(random: &mut impl RandomImpl) -> Vec<Self> {
        let mut rotations = Self::ALL.to_vec();
        super::pool::shuffle(&mut rotations, random);
        rotations
    }

    pub const fn rotate(&self, direction: Direction) -> Direction {
        match self {
            Self::None => direction,
            Self::Clockwise90 => direction.rotate_clockwise(),
            Self::Clockwise180 => direction.rotate_clockwise().rotate_clockwise(),
            Self::CounterClockwise90 => direction
                .rotate_clockwise()
                .rotate_clockwise()
                .rotate_clockwise(),
        }
    }

    /// Rotates a template-local position around the template origin.
    pub const fn transform(&self, pos: Vector3<i32>) -> Vector3<i32> {
        match self {
            Self::None => pos,
            Self::Clockwise90 => Vector3::new(-pos.z, pos.y, pos.x),
            Self::Clockwise180 => Vector3::new(-pos.x, pos.y, -pos.z),
            Self::CounterClockwise90 => Vector3::new(pos.z, pos.y, -pos.x),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rotation_agrees_with_offsets() {
        for rotation in BlockRotation::ALL {
            for direction in [
                Direction::North,
                Direction::South,
                Direction::East,
                Direction::West,
                Direction::Up,
            ] {
                assert_eq!(
                    rotation.transform(direction.to_offset()),
                    rotation.rotate(direction).to_offset(),
                    "{rotation:?} {direction:?}"
                );
            }
        }
    }

    #[test]
    fn names() {
        for direction in Direction::ALL {
            assert_eq!(Direction::from_name(direction.name()), Some(direction));
        }
        assert_eq!(Direction::from_name("sideways"), None);
    }

    #[test]
    fn opposite_is_involution() {
        assert_eq!(Direction::North.opposite(), Direction::South);
        assert_eq!(Direction::Up.opposite().opposite(), Direction::Up);
    }
}
