use std::ops::{Add, Div, Mul, Neg, Sub};

#[derive(Clone, Copy, Debug, PartialEq, Hash, Eq, Default, PartialOrd, Ord)]
pub struct Vector2<T> {
    pub x: T,
    pub y: T,
}

impl<T: Math + Copy> Vector2<T> {
    pub const fn new(x: T, z: T) -> Self {
        Vector2 { x, y: z }
    }
}

pub trait Math:
    Mul<Output = Self>
    + Neg<Output = Self>
    + Add<Output = Self>
    + Div<Output = Self>
    + Sub<Output = Self>
    + Sized
{
}
impl Math for f64 {}
impl Math for f32 {}
impl Math for i32 {}
impl Math for i64 {}
impl Math for i8 {}

/// Block x of the chunk's western edge.
pub const fn chunk_start_x(chunk: &Vector2<i32>) -> i32 {
    chunk.x << 4
}

/// Block z of the chunk's northern edge. `Vector2::y` stores the chunk z.
pub const fn chunk_start_z(chunk: &Vector2<i32>) -> i32 {
    chunk.y << 4
}
