//! Tile collision rules, kept apart from the render tree.
//!
//! The level controller asks the scene which tile cells overlap the player
//! and hands them here. Everything below is pure bookkeeping: which classes
//! support the player, whether a goal was reached, and which cells have
//! started to collapse.

use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileClass {
    /// Tile id 0: nothing there.
    Empty,
    /// Any nonzero tile that is not a goal.
    Walkable,
    Goal,
}

impl TileClass {
    pub fn of(tile_id: u32, goal_tiles: &HashSet<u32>) -> Self {
        if tile_id == 0 {
            TileClass::Empty
        } else if goal_tiles.contains(&tile_id) {
            TileClass::Goal
        } else {
            TileClass::Walkable
        }
    }

    pub fn supports(self) -> bool {
        !matches!(self, TileClass::Empty)
    }
}

/// Cells (by load-order index) that have been stepped on and are sinking.
#[derive(Debug, Clone, Default)]
pub struct FallingSet {
    cells: BTreeSet<usize>,
}

impl FallingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true only the first time a cell is marked.
    pub fn insert(&mut self, cell: usize) -> bool {
        self.cells.insert(cell)
    }

    pub fn contains(&self, cell: usize) -> bool {
        self.cells.contains(&cell)
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// At least one nonzero tile is under the player.
    pub supported: bool,
    pub goal_reached: bool,
    /// Cells added to the falling set by this sweep.
    pub newly_falling: Vec<usize>,
    pub overlapping: usize,
}

/// Evaluate every overlapping cell. Any goal wins even when other overlaps
/// are plain tiles; plain tiles only start collapsing once the player has
/// moved.
pub fn sweep<I>(overlapping: I, has_moved: bool, falling: &mut FallingSet) -> SweepReport
where
    I: IntoIterator<Item = (usize, TileClass)>,
{
    let mut report = SweepReport::default();
    for (cell, class) in overlapping {
        report.overlapping += 1;
        match class {
            TileClass::Empty => {}
            TileClass::Goal => {
                report.supported = true;
                report.goal_reached = true;
            }
            TileClass::Walkable => {
                report.supported = true;
                if has_moved && falling.insert(cell) {
                    report.newly_falling.push(cell);
                }
            }
        }
    }
    report
}
