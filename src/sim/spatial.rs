//! Uniform-grid spatial hash for the broad phase
//!
//! Cells are keyed by `(floor(x / cell), floor(y / cell))`. The hash is a
//! per-tick index: it is cleared and refilled before any query of that tick.

use std::collections::HashMap;

use glam::Vec2;

/// Integer cell coordinate
pub type CellKey = (i32, i32);

/// Most samples taken along one segment. Longer segments are indexed at
/// their endpoints and midpoint only.
pub const MAX_SEGMENT_SAMPLES: usize = 1024;

/// Maps grid cells to the handles inserted there this tick
#[derive(Debug, Clone)]
pub struct SpatialHash<T> {
    cell_size: f32,
    cells: HashMap<CellKey, Vec<T>>,
    len: usize,
}

impl<T: Copy> SpatialHash<T> {
    /// `cell_size` should be about one typical body diameter or more
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
            len: 0,
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of insertions since the last clear
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Cell containing a point
    #[inline]
    pub fn cell_of(&self, point: Vec2) -> CellKey {
        (
            (point.x / self.cell_size).floor() as i32,
            (point.y / self.cell_size).floor() as i32,
        )
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        self.cells.clear();
        self.len = 0;
    }

    /// Append an item to the cell containing `point`
    pub fn insert(&mut self, item: T, point: Vec2) {
        let key = self.cell_of(point);
        self.cells.entry(key).or_default().push(item);
        self.len += 1;
    }

    /// Insert an item into every cell a segment passes through.
    ///
    /// Samples are spaced at most one cell apart, endpoints included.
    /// Consecutive samples landing in the same cell are stored once.
    pub fn insert_segment(&mut self, item: T, start: Vec2, end: Vec2) {
        let length = start.distance(end);
        let samples = if length.is_finite() {
            (length / self.cell_size).ceil().max(0.0)
        } else {
            0.0
        };

        let mut last = None;
        if samples > MAX_SEGMENT_SAMPLES as f32 {
            log::warn!(
                "Segment of length {} spans over {} cells; indexing its ends and midpoint only",
                length,
                MAX_SEGMENT_SAMPLES
            );
            for point in [start, start.lerp(end, 0.5), end] {
                self.insert_sample(item, point, &mut last);
            }
            return;
        }

        let samples = samples as usize;
        for i in 0..=samples {
            let t = if samples == 0 { 0.0 } else { i as f32 / samples as f32 };
            self.insert_sample(item, start.lerp(end, t), &mut last);
        }
    }

    fn insert_sample(&mut self, item: T, point: Vec2, last: &mut Option<CellKey>) {
        let key = self.cell_of(point);
        if *last == Some(key) {
            return;
        }
        *last = Some(key);
        self.cells.entry(key).or_default().push(item);
        self.len += 1;
    }

    /// Items in the 3x3 block of cells around `point`
    pub fn nearby(&self, point: Vec2) -> Vec<T> {
        let mut out = Vec::new();
        self.nearby_into(point, &mut out);
        out
    }

    /// Like [`nearby`](Self::nearby) but appends into a reusable buffer
    pub fn nearby_into(&self, point: Vec2, out: &mut Vec<T>) {
        let (cx, cy) = self.cell_of(point);
        for x in (cx - 1)..=(cx + 1) {
            for y in (cy - 1)..=(cy + 1) {
                if let Some(cell) = self.cells.get(&(x, y)) {
                    out.extend_from_slice(cell);
                }
            }
        }
    }
}
