//! Targeting parameters attached to a command.
//!
//! Shapes are closed enums with explicit parameters per variant. The resolver
//! in [`crate::targeting`] matches them exhaustively.

use bitflags::bitflags;

bitflags! {
    /// Which units a selection or area may include, relative to the actor.
    ///
    /// `ALLY` means the actor's own team (excluding the actor itself), `ENEMY`
    /// the opposing team, `SELF` the actor.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct TargetTypes: u8 {
        const SELF  = 1 << 0;
        const ALLY  = 1 << 1;
        const ENEMY = 1 << 2;
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for TargetTypes {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        bitflags::serde::serialize(self, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for TargetTypes {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        bitflags::serde::deserialize(deserializer)
    }
}

/// Direction filter for [`SelectionPattern::WithinDistance`], in track order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Higher order-index than the actor.
    Forward,
    /// Lower order-index than the actor.
    Backward,
    #[default]
    Both,
}

/// Primary-target pattern.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectionPattern {
    /// Order-index distance exactly 1 from the actor.
    Adjacent,
    /// Order-index distance up to `distance`.
    WithinDistance {
        distance: u32,
        #[cfg_attr(feature = "serde", serde(default))]
        direction: Direction,
    },
    /// Fixed offsets from the actor. Circular offsets wrap around the living
    /// roster; linear offsets match absolute pseudo-positions.
    SpecificPositions {
        offsets: Vec<i32>,
        #[cfg_attr(feature = "serde", serde(default))]
        circular: bool,
    },
    /// The actor itself, when `SELF` is targetable.
    SelfOnly,
    /// Every defeated unit of the actor's team, regardless of geometry.
    AnyDefeatedAlly,
    /// Closest living opponent by order-index distance.
    ///
    /// The explicit fallback policy for content without a real pattern; the
    /// resolver logs a warning whenever it is used.
    NearestEnemy,
}

/// Where an area of effect is centred.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Origin {
    Caster,
    #[default]
    Selected,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AreaShape {
    /// Only the selected unit.
    #[default]
    SingleOnSelected,
    /// Every unit within circular order-index distance of the origin.
    RadiusAroundOrigin { distance: u32 },
    /// The origin plus the units exactly `distance` places before and after it.
    LineThroughTarget { distance: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Selection {
    pub pattern: SelectionPattern,
    pub targetable: TargetTypes,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Area {
    #[cfg_attr(feature = "serde", serde(default))]
    pub origin: Origin,
    #[cfg_attr(feature = "serde", serde(default))]
    pub shape: AreaShape,
    pub affected: TargetTypes,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetingParams {
    pub selection: Selection,
    pub area: Area,
}

impl TargetingParams {
    /// Single target picked by `pattern` among `types`, affecting only it.
    pub fn single(pattern: SelectionPattern, types: TargetTypes) -> Self {
        Self {
            selection: Selection {
                pattern,
                targetable: types,
            },
            area: Area {
                origin: Origin::Selected,
                shape: AreaShape::SingleOnSelected,
                affected: types,
            },
        }
    }

    /// Affects only the caster.
    pub fn self_only() -> Self {
        Self::single(SelectionPattern::SelfOnly, TargetTypes::SELF)
    }

    pub fn with_area(mut self, origin: Origin, shape: AreaShape, affected: TargetTypes) -> Self {
        self.area = Area {
            origin,
            shape,
            affected,
        };
        self
    }
}
