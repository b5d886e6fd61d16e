pub mod chunk_generator;
pub mod height_limit;
pub mod height_provider;
pub mod locator;
pub mod registry;
pub mod structure;
pub mod y_offset;

#[cfg(test)]
pub(crate) mod test_util;
