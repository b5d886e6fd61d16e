use std::{collections::HashMap, fmt, str::FromStr};

use mantori_util::{
    math::{
        block_box::BlockBox,
        direction::{BlockRotation, Direction},
        position::BlockPos,
        vector3::Vector3,
    },
    resource_location::ResourceLocation,
};
use serde::Deserialize;

/// Which way a jigsaw faces and which way its top points, written `front_top`.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(try_from = "String")]
pub struct JigsawOrientation {
    pub front: Direction,
    pub top: Direction,
}

impl FromStr for JigsawOrientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_direction = |name: &str| {
            Direction::from_name(name)
                .ok_or_else(|| format!("unknown direction `{name}` in orientation `{s}`"))
        };
        let (front, top) = s
            .split_once('_')
            .ok_or_else(|| format!("orientation `{s}` is not of the form front_top"))?;
        let front = parse_direction(front)?;
        let top = parse_direction(top)?;
        // A sideways jigsaw always has its top pointing up, a vertical one never does.
        if front.is_horizontal() == top.is_horizontal()
            || (front.is_horizontal() && top != Direction::Up)
        {
            return Err(format!("orientation `{s}` is not a valid jigsaw orientation"));
        }
        Ok(Self { front, top })
    }
}

impl TryFrom<String> for JigsawOrientation {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for JigsawOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.front.name(), self.top.name())
    }
}

impl JigsawOrientation {
    pub fn rotate(&self, rotation: BlockRotation) -> Self {
        Self {
            front: rotation.rotate(self.front),
            top: rotation.rotate(self.top),
        }
    }
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JointType {
    /// The attached piece may be spun freely around the jigsaw axis.
    Rollable,
    /// Both jigsaws must agree on their top direction.
    Aligned,
}

/// A jigsaw block as stored in a template, in template-local coordinates.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TemplateJigsaw {
    pub pos: Vector3<i32>,
    pub orientation: JigsawOrientation,
    pub name: ResourceLocation,
    pub target: ResourceLocation,
    pub pool: ResourceLocation,
    #[serde(default)]
    pub joint: Option<JointType>,
    #[serde(default)]
    pub selection_priority: i32,
}

impl TemplateJigsaw {
    pub fn joint(&self) -> JointType {
        self.joint.unwrap_or(if self.orientation.front.is_horizontal() {
            JointType::Aligned
        } else {
            JointType::Rollable
        })
    }
}

/// A jigsaw after its template has been rotated and moved into the world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacedJigsaw {
    pub pos: BlockPos,
    pub orientation: JigsawOrientation,
    pub joint: JointType,
    pub name: ResourceLocation,
    pub target: ResourceLocation,
    pub pool: ResourceLocation,
    pub selection_priority: i32,
}

impl PlacedJigsaw {
    pub fn front(&self) -> Direction {
        self.orientation.front
    }

    /// The block this jigsaw points into.
    pub fn target_pos(&self) -> BlockPos {
        self.pos.offset_dir(self.front())
    }

    /// Whether a piece carrying `other` may be attached to this jigsaw.
    pub fn can_attach(&self, other: &PlacedJigsaw) -> bool {
        self.front() == other.front().opposite()
            && (self.joint == JointType::Rollable
                || self.orientation.top == other.orientation.top)
            && self.target == other.name
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct StructureTemplate {
    pub size: Vector3<i32>,
    #[serde(default)]
    pub jigsaws: Vec<TemplateJigsaw>,
}

static BLANK_TEMPLATE: StructureTemplate = StructureTemplate {
    size: Vector3 { x: 1, y: 1, z: 1 },
    jigsaws: Vec::new(),
};

impl StructureTemplate {
    pub fn bounding_box(&self, pos: BlockPos, rotation: BlockRotation) -> BlockBox {
        let far = Vector3::new(
            self.size.x.max(1) - 1,
            self.size.y.max(1) - 1,
            self.size.z.max(1) - 1,
        );
        BlockBox::from_corners(
            rotation.transform(Vector3::new(0, 0, 0)),
            rotation.transform(far),
        )
        .offset(pos.0.x, pos.0.y, pos.0.z)
    }

    /// The template's jigsaws in world space, in template order.
    pub fn jigsaws(&self, pos: BlockPos, rotation: BlockRotation) -> Vec<PlacedJigsaw> {
        self.jigsaws
            .iter()
            .map(|jigsaw| PlacedJigsaw {
                pos: pos.offset(rotation.transform(jigsaw.pos)),
                orientation: jigsaw.orientation.rotate(rotation),
                joint: jigsaw.joint(),
                name: jigsaw.name.clone(),
                target: jigsaw.target.clone(),
                pool: jigsaw.pool.clone(),
                selection_priority: jigsaw.selection_priority,
            })
            .collect()
    }
}

#[derive(Default)]
pub struct TemplateManager {
    templates: HashMap<ResourceLocation, StructureTemplate>,
}

impl TemplateManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: ResourceLocation, template: StructureTemplate) {
        if self.templates.insert(id.clone(), template).is_some() {
            log::warn!("Template {id} registered twice, keeping the last one");
        }
    }

    pub fn get(&self, id: &ResourceLocation) -> Option<&StructureTemplate> {
        self.templates.get(id)
    }

    /// Missing templates place as a single empty block instead of failing generation.
    pub fn get_or_blank(&self, id: &ResourceLocation) -> &StructureTemplate {
        self.templates.get(id).unwrap_or_else(|| {
            log::warn!("Missing structure template {id}");
            &BLANK_TEMPLATE
        })
    }

    pub fn contains(&self, id: &ResourceLocation) -> bool {
        self.templates.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResourceLocation, &StructureTemplate)> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
