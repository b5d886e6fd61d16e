use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// An `i32` that is known to lie in `MIN..=MAX`. Deserializing a value outside the
/// range is an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoundedInt<const MIN: i32, const MAX: i32>(i32);

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Value must be within range [{min};{max}]: {value}")]
pub struct OutOfRange {
    pub value: i32,
    pub min: i32,
    pub max: i32,
}

impl<const MIN: i32, const MAX: i32> BoundedInt<MIN, MAX> {
    pub const fn new(value: i32) -> Result<Self, OutOfRange> {
        if value < MIN || value > MAX {
            return Err(OutOfRange {
                value,
                min: MIN,
                max: MAX,
            });
        }
        Ok(Self(value))
    }

    pub const fn get(&self) -> i32 {
        self.0
    }
}

impl<const MIN: i32, const MAX: i32> TryFrom<i32> for BoundedInt<MIN, MAX> {
    type Error = OutOfRange;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<const MIN: i32, const MAX: i32> From<BoundedInt<MIN, MAX>> for i32 {
    fn from(value: BoundedInt<MIN, MAX>) -> Self {
        value.0
    }
}

impl<const MIN: i32, const MAX: i32> Serialize for BoundedInt<MIN, MAX> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

impl<'de, const MIN: i32, const MAX: i32> Deserialize<'de> for BoundedInt<MIN, MAX> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = i32::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    type Size = BoundedInt<0, 30>;

    #[test]
    fn bounds_are_inclusive() {
        assert_eq!(Size::new(0).unwrap().get(), 0);
        assert_eq!(Size::new(30).unwrap().get(), 30);
        assert!(Size::new(-1).is_err());
        assert_eq!(
            Size::new(31),
            Err(OutOfRange {
                value: 31,
                min: 0,
                max: 30
            })
        );
    }

    #[test]
    fn deserialize_checks_range() {
        let size: Size = serde_json::from_str("7").unwrap();
        assert_eq!(i32::from(size), 7);

        let err = serde_json::from_str::<Size>("31").unwrap_err();
        assert!(err.to_string().contains("[0;30]: 31"), "{err}");
    }
}
