use mantori_util::math::pool::{Weighted, get_weighted};
use mantori_util::random::RandomImpl;
use serde::Deserialize;

use super::{height_limit::HeightContext, y_offset::YOffset};

/// Either a full provider object or a bare [`YOffset`], which behaves as a constant.
#[derive(Deserialize, Clone, Debug)]
#[serde(untagged)]
pub enum HeightProvider {
    Object(NormalHeightProvider),
    Constant(YOffset),
}

#[derive(Deserialize, Clone, Debug)]
#[serde(tag = "type")]
pub enum NormalHeightProvider {
    #[serde(rename = "minecraft:constant", alias = "constant")]
    Constant(ConstantHeightProvider),
    #[serde(rename = "minecraft:uniform", alias = "uniform")]
    Uniform(UniformHeightProvider),
    #[serde(rename = "minecraft:biased_to_bottom", alias = "biased_to_bottom")]
    BiasedToBottom(BiasedToBottomHeightProvider),
    #[serde(rename = "minecraft:very_biased_to_bottom", alias = "very_biased_to_bottom")]
    VeryBiasedToBottom(VeryBiasedToBottomHeightProvider),
    #[serde(rename = "minecraft:trapezoid", alias = "trapezoid")]
    Trapezoid(TrapezoidHeightProvider),
    #[serde(rename = "minecraft:weighted_list", alias = "weighted_list")]
    WeightedList(WeightedListHeightProvider),
}

impl HeightProvider {
    pub fn get(&self, random: &mut impl RandomImpl, context: &HeightContext) -> i32 {
        match self {
            HeightProvider::Constant(offset) => offset.get_y(context),
            HeightProvider::Object(provider) => match provider {
                NormalHeightProvider::Constant(provider) => provider.get(context),
                NormalHeightProvider::Uniform(provider) => provider.get(random, context),
                NormalHeightProvider::BiasedToBottom(provider) => provider.get(random, context),
                NormalHeightProvider::VeryBiasedToBottom(provider) => {
                    provider.get(random, context)
                }
                NormalHeightProvider::Trapezoid(provider) => provider.get(random, context),
                NormalHeightProvider::WeightedList(provider) => provider.get(random, context),
            },
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct ConstantHeightProvider {
    value: YOffset,
}

impl ConstantHeightProvider {
    pub fn get(&self, context: &HeightContext) -> i32 {
        self.value.get_y(context)
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct UniformHeightProvider {
    min_inclusive: YOffset,
    max_inclusive: YOffset,
}

impl UniformHeightProvider {
    pub fn get(&self, random: &mut impl RandomImpl, context: &HeightContext) -> i32 {
        let min = self.min_inclusive.get_y(context);
        let max = self.max_inclusive.get_y(context);

        if min > max {
            log::warn!("Empty height range: {min}..={max}");
            return min;
        }

        random.next_inbetween_i32(min, max)
    }
}

fn default_inner() -> u32 {
    1
}

#[derive(Deserialize, Clone, Debug)]
pub struct BiasedToBottomHeightProvider {
    min_inclusive: YOffset,
    max_inclusive: YOffset,
    #[serde(default = "default_inner")]
    inner: u32,
}

impl BiasedToBottomHeightProvider {
    pub fn get(&self, random: &mut impl RandomImpl, context: &HeightContext) -> i32 {
        let min = self.min_inclusive.get_y(context);
        let max = self.max_inclusive.get_y(context);
        let inner = self.inner.max(1) as i32;

        if max - min - inner + 1 <= 0 {
            log::warn!("Empty height range: {min}..={max}");
            return min;
        }

        let range = random.next_bounded_i32(max - min - inner + 1);
        random.next_bounded_i32(range + inner) + min
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct VeryBiasedToBottomHeightProvider {
    min_inclusive: YOffset,
    max_inclusive: YOffset,
    #[serde(default = "default_inner")]
    inner: u32,
}

impl VeryBiasedToBottomHeightProvider {
    pub fn get(&self, random: &mut impl RandomImpl, context: &HeightContext) -> i32 {
        let min = self.min_inclusive.get_y(context);
        let max = self.max_inclusive.get_y(context);
        let inner = self.inner.max(1) as i32;

        if max - min - inner + 1 <= 0 {
            log::warn!("Empty height range: {min}..={max}");
            return min;
        }

        let min_rnd = random.next_inbetween_i32(min + inner, max);
        let max_rnd = random.next_inbetween_i32(min, min_rnd - 1);

        random.next_inbetween_i32(min, max_rnd - 1 + inner)
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct TrapezoidHeightProvider {
    min_inclusive: YOffset,
    max_inclusive: YOffset,
    #[serde(default)]
    plateau: i32,
}

impl TrapezoidHeightProvider {
    pub fn get(&self, random: &mut impl RandomImpl, context: &HeightContext) -> i32 {
        let i = self.min_inclusive.get_y(context);
        let j = self.max_inclusive.get_y(context);

        if i > j {
            log::warn!("Empty height range: {i}..={j}");
            return i;
        }

        let k = j - i;
        if self.plateau >= k {
            return random.next_inbetween_i32(i, j);
        }

        let l = (k - self.plateau) / 2;
        let m = k - l;
        i + random.next_inbetween_i32(0, m) + random.next_inbetween_i32(0, l)
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct WeightedListHeightProvider {
    distribution: Vec<Weighted<HeightProvider>>,
}

impl WeightedListHeightProvider {
    pub fn get(&self, random: &mut impl RandomImpl, context: &HeightContext) -> i32 {
        match get_weighted(&self.distribution, random) {
            Some(provider) => provider.get(random, context),
            None => {
                log::warn!("Empty weighted height list");
                context.min_y
            }
        }
    }
}
