use serde::Deserialize;

use super::height_limit::HeightContext;

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum YOffset {
    Absolute(Absolute),
    AboveBottom(AboveBottom),
    BelowTop(BelowTop),
}

impl YOffset {
    pub fn get_y(&self, context: &HeightContext) -> i32 {
        match self {
            YOffset::AboveBottom(above_bottom) => context.min_y + above_bottom.above_bottom,
            YOffset::BelowTop(below_top) => {
                context.height - 1 + context.min_y - below_top.below_top
            }
            YOffset::Absolute(absolute) => absolute.absolute,
        }
    }
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Absolute {
    absolute: i32,
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AboveBottom {
    above_bottom: i32,
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BelowTop {
    below_top: i32,
}

#[cfg(test)]
mod test {
    use super::*;

    const END: HeightContext = HeightContext {
        min_y: 0,
        height: 256,
    };
    const OVERWORLD: HeightContext = HeightContext {
        min_y: -64,
        height: 384,
    };

    fn offset(json: &str) -> YOffset {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn resolves_against_context() {
        assert_eq!(offset(r#"{"absolute": 12}"#).get_y(&OVERWORLD), 12);
        assert_eq!(offset(r#"{"above_bottom": 5}"#).get_y(&OVERWORLD), -59);
        assert_eq!(offset(r#"{"below_top": 0}"#).get_y(&OVERWORLD), 319);
        assert_eq!(offset(r#"{"below_top": 10}"#).get_y(&END), 245);
    }

    #[test]
    fn parses_each_shape() {
        assert!(matches!(offset(r#"{"absolute": 1}"#), YOffset::Absolute(_)));
        assert!(matches!(offset(r#"{"above_bottom": 8}"#), YOffset::AboveBottom(_)));
        assert!(matches!(offset(r#"{"below_top": 1}"#), YOffset::BelowTop(_)));
        assert!(serde_json::from_str::<YOffset>(r#"{"middle": 1}"#).is_err());
    }
}
