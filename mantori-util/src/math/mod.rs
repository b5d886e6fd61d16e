pub mod block_box;
pub mod bounded_int;
pub mod direction;
pub mod pool;
pub mod position;
pub mod vector2;
pub mod vector3;
