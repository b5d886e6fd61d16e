use serde::Deserialize;

use crate::random::RandomImpl;

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Weighted<E> {
    pub data: E,
    pub weight: i32,
}

/// Picks one entry, each with probability proportional to its weight.
pub fn get_weighted<'a, E>(
    distribution: &'a [Weighted<E>],
    random: &mut impl RandomImpl,
) -> Option<&'a E> {
    let total_weight: i32 = distribution.iter().map(|dist| dist.weight.max(0)).sum();
    if total_weight <= 0 {
        return None;
    }
    let mut index = random.next_bounded_i32(total_weight);
    for dist in distribution {
        index -= dist.weight.max(0);
        if index < 0 {
            return Some(&dist.data);
        }
    }
    None
}

/// Fisher-Yates shuffle drawing from the world generation random.
pub fn shuffle<E>(list: &mut [E], random: &mut impl RandomImpl) {
    for i in (2..=list.len()).rev() {
        let j = random.next_bounded_i32(i as i32) as usize;
        list.swap(i - 1, j);
    }
}
