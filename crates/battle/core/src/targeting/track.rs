use crate::state::{Combatant, UnitId};

/// Living units ordered by `(pseudo_position, id)`.
///
/// A unit's index here is its order-index; all distance arithmetic in the
/// resolver happens in this frame.
pub struct Track<'a> {
    slots: Vec<&'a Combatant>,
}

impl<'a> Track<'a> {
    pub fn new(units: &'a [Combatant]) -> Self {
        let mut slots: Vec<&Combatant> = units.iter().filter(|unit| unit.is_alive()).collect();
        slots.sort_by_key(|unit| (unit.pseudo_position, unit.id));
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn index_of(&self, id: UnitId) -> Option<usize> {
        self.slots.iter().position(|unit| unit.id == id)
    }

    pub fn get(&self, index: usize) -> Option<&'a Combatant> {
        self.slots.get(index).copied()
    }

    /// Slot at a signed index, without wrapping.
    pub fn get_signed(&self, index: isize) -> Option<&'a Combatant> {
        usize::try_from(index).ok().and_then(|index| self.get(index))
    }

    /// Slot at a signed index, wrapping around the track.
    pub fn get_wrapped(&self, index: isize) -> Option<&'a Combatant> {
        if self.slots.is_empty() {
            return None;
        }
        let n = self.slots.len() as isize;
        self.get(index.rem_euclid(n) as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a Combatant)> + '_ {
        self.slots.iter().copied().enumerate()
    }

    /// `min(|a - b|, n - |a - b|)`.
    pub fn circular_distance(&self, a: usize, b: usize) -> usize {
        let linear = a.abs_diff(b);
        linear.min(self.slots.len().saturating_sub(linear))
    }
}
