use std::{fmt, num::NonZeroUsize, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Visitor};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceLocation {
    pub namespace: String,
    pub path: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid resource location `{0}`")]
pub struct InvalidResourceLocation(pub String);

impl ResourceLocation {
    /// The maximum number of bytes for a [`ResourceLocation`], the same as for a protocol
    /// [`String`].
    pub const MAX_SIZE: NonZeroUsize = NonZeroUsize::new(i16::MAX as usize).unwrap();

    pub const DEFAULT_NAMESPACE: &'static str = "minecraft";

    pub fn new(namespace: &str, path: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        }
    }

    pub fn vanilla(path: &str) -> Self {
        Self::new(Self::DEFAULT_NAMESPACE, path)
    }

    pub fn mantori(path: &str) -> Self {
        Self::new("mantori", path)
    }

    fn is_valid_namespace(namespace: &str) -> bool {
        !namespace.is_empty()
            && namespace
                .chars()
                .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.'))
    }

    fn is_valid_path(path: &str) -> bool {
        !path.is_empty()
            && path
                .chars()
                .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.' | '/'))
    }
}

impl FromStr for ResourceLocation {
    type Err = InvalidResourceLocation;

    /// A location without a namespace lives in the `minecraft` namespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() > Self::MAX_SIZE.get() {
            return Err(InvalidResourceLocation(s.to_string()));
        }
        let (namespace, path) = s.split_once(':').unwrap_or((Self::DEFAULT_NAMESPACE, s));
        if !Self::is_valid_namespace(namespace) || !Self::is_valid_path(path) {
            return Err(InvalidResourceLocation(s.to_string()));
        }
        Ok(Self::new(namespace, path))
    }
}

impl fmt::Display for ResourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl Serialize for ResourceLocation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ResourceLocation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ResourceLocationVisitor;

        impl Visitor<'_> for ResourceLocationVisitor {
            type Value = ResourceLocation;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a valid resource location (namespace:path)")
            }

            fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                self.visit_str(&v)
            }

            fn visit_str<E>(self, resource_location: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                resource_location.parse().map_err(serde::de::Error::custom)
            }
        }
        deserializer.deserialize_str(ResourceLocationVisitor)
    }
}
