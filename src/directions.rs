//! A set over the four compass directions of a square cell.

use std::fmt;
use std::iter::FromIterator;
use std::ops::{BitAnd, BitOr, BitOrAssign, BitXor, Not};

use crate::cells::CompassPrimary;


#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Default)]
pub struct Directions {
    bits: u8,
}

impl Directions {
    pub const NONE: Directions = Directions { bits: 0 };
    pub const ALL: Directions = Directions { bits: 0b1111 };

    #[inline]
    fn bit(dir: CompassPrimary) -> u8 {
        match dir {
            CompassPrimary::North => 0b0001,
            CompassPrimary::South => 0b0010,
            CompassPrimary::East => 0b0100,
            CompassPrimary::West => 0b1000,
        }
    }

    #[inline]
    pub fn contains(self, dir: CompassPrimary) -> bool {
        self.bits & Directions::bit(dir) != 0
    }

    #[inline]
    pub fn insert(&mut self, dir: CompassPrimary) {
        self.bits |= Directions::bit(dir);
    }

    #[inline]
    pub fn remove(&mut self, dir: CompassPrimary) {
        self.bits &= !Directions::bit(dir);
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    #[inline]
    pub fn len(self) -> usize {
        self.bits.count_ones() as usize
    }

    /// The only direction in the set, or None if the set is empty or has more than one member.
    pub fn single(self) -> Option<CompassPrimary> {
        if self.len() == 1 {
            self.iter().next()
        } else {
            None
        }
    }

    /// Members in North, South, East, West order.
    pub fn iter(self) -> impl Iterator<Item = CompassPrimary> {
        CompassPrimary::ALL.iter().cloned().filter(move |dir| self.contains(*dir))
    }
}

impl From<CompassPrimary> for Directions {
    fn from(dir: CompassPrimary) -> Directions {
        Directions { bits: Directions::bit(dir) }
    }
}

impl FromIterator<CompassPrimary> for Directions {
    fn from_iter<I: IntoIterator<Item = CompassPrimary>>(iter: I) -> Directions {
        let mut dirs = Directions::NONE;
        for dir in iter {
            dirs.insert(dir);
        }
        dirs
    }
}

impl BitOr for Directions {
    type Output = Directions;
    fn bitor(self, rhs: Directions) -> Directions {
        Directions { bits: self.bits | rhs.bits }
    }
}

impl BitOr<CompassPrimary> for Directions {
    type Output = Directions;
    fn bitor(self, rhs: CompassPrimary) -> Directions {
        self | Directions::from(rhs)
    }
}

impl BitOr for CompassPrimary {
    type Output = Directions;
    fn bitor(self, rhs: CompassPrimary) -> Directions {
        Directions::from(self) | rhs
    }
}

impl BitOrAssign for Directions {
    fn bitor_assign(&mut self, rhs: Directions) {
        self.bits |= rhs.bits;
    }
}

impl BitAnd for Directions {
    type Output = Directions;
    fn bitand(self, rhs: Directions) -> Directions {
        Directions { bits: self.bits & rhs.bits }
    }
}

impl BitXor for Directions {
    type Output = Directions;
    fn bitxor(self, rhs: Directions) -> Directions {
        Directions { bits: self.bits ^ rhs.bits }
    }
}

/// Complement within the four compass directions.
impl Not for Directions {
    type Output = Directions;
    fn not(self) -> Directions {
        Directions::ALL ^ self
    }
}

impl fmt::Display for Directions {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "None");
        }
        for (index, dir) in self.iter().enumerate() {
            if index > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{}", dir)?;
        }
        Ok(())
    }
}
