use crate::models::BlockId;

/// Viewport coordinate
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in viewport coordinates
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Bounding box of two corner points, in either order
    pub fn from_points(a: Point, b: Point) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Overlap test; touching edges count as intersecting
    pub fn intersects(&self, other: &Rect) -> bool {
        !(other.right < self.left
            || other.left > self.right
            || other.bottom < self.top
            || other.top > self.bottom)
    }
}

/// Answers which blocks a selection rectangle covers
///
/// Implementations return ids in visual (top-to-bottom) order.
pub trait SpatialIndex {
    fn query_blocks_intersecting(&self, rect: &Rect) -> Vec<BlockId>;
}

/// Block rectangles recorded by a layout pass
///
/// Blocks without a recorded rectangle are never hit.
#[derive(Debug, Default, Clone)]
pub struct LayoutIndex {
    entries: Vec<(BlockId, Rect)>,
}

impl LayoutIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record or move a block's rectangle
    pub fn set(&mut self, id: BlockId, rect: Rect) {
        match self.entries.iter_mut().find(|(entry_id, _)| *entry_id == id) {
            Some(entry) => entry.1 = rect,
            None => self.entries.push((id, rect)),
        }
    }

    pub fn remove(&mut self, id: BlockId) {
        self.entries.retain(|(entry_id, _)| *entry_id != id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn rect_of(&self, id: BlockId) -> Option<Rect> {
        self.entries
            .iter()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, rect)| *rect)
    }

    /// Stack blocks vertically with a fixed height and gap
    pub fn stacked(ids: &[BlockId], width: f64, height: f64, gap: f64) -> Self {
        let mut index = Self::new();
        for (position, id) in ids.iter().enumerate() {
            let top = position as f64 * (height + gap);
            index.set(*id, Rect::new(0.0, top, width, top + height));
        }
        index
    }
}

impl SpatialIndex for LayoutIndex {
    fn query_blocks_intersecting(&self, rect: &Rect) -> Vec<BlockId> {
        let mut hits: Vec<(BlockId, Rect)> = self
            .entries
            .iter()
            .filter(|(_, block_rect)| block_rect.intersects(rect))
            .copied()
            .collect();
        hits.sort_by(|a, b| a.1.top.total_cmp(&b.1.top));
        hits.into_iter().map(|(id, _)| id).collect()
    }
}
