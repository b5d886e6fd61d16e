/// The vertical extent of a world or generator.
pub trait HeightLimitView {
    fn height(&self) -> i32;

    fn bottom_y(&self) -> i32;
}

/// The height range shared by the world and its chunk generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeightContext {
    pub min_y: i32,
    pub height: i32,
}

impl HeightContext {
    pub fn new<G, W>(generator: &G, world: &W) -> Self
    where
        G: HeightLimitView + ?Sized,
        W: HeightLimitView + ?Sized,
    {
        Self {
            min_y: world.bottom_y().max(generator.bottom_y()),
            height: world.height().min(generator.height()),
        }
    }
}

impl HeightLimitView for HeightContext {
    fn height(&self) -> i32 {
        self.height
    }

    fn bottom_y(&self) -> i32 {
        self.min_y
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn context_takes_narrower_range() {
        let world = HeightContext {
            min_y: -64,
            height: 384,
        };
        let generator = HeightContext {
            min_y: 0,
            height: 256,
        };
        let context = HeightContext::new(&generator, &world);
        assert_eq!(context.min_y, 0);
        assert_eq!(context.height, 256);
        assert_eq!(context.bottom_y(), 0);
    }
}
