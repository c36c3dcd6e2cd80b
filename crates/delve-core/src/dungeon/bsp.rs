//! Binary space partition tree for room layout.
//!
//! Built once per level by recursive random splitting, read by the digger,
//! then discarded.

use serde::{Deserialize, Serialize};

use crate::rng::GameRng;

/// Axis a node was split along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitAxis {
    /// Children stacked on top of each other (cut across y)
    Horizontal,
    /// Children side by side (cut across x)
    Vertical,
}

/// A node of the partition tree
///
/// Leaves are the regions rooms get carved into; internal nodes remember
/// their split so siblings can be joined by corridors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BspNode {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Depth in the tree; the root is 0
    pub depth: u8,
    /// Axis and coordinate of the cut, present on internal nodes
    pub split: Option<(SplitAxis, i32)>,
    pub left: Option<Box<BspNode>>,
    pub right: Option<Box<BspNode>>,
}

impl BspNode {
    /// Create an unsplit node covering the given rectangle
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            depth: 0,
            split: None,
            left: None,
            right: None,
        }
    }

    /// Check whether this node has no children
    pub fn is_leaf(&self) -> bool {
        self.left.is_none()
    }

    /// Recursively split up to `levels` more times
    ///
    /// A node too small to yield two children of at least `min_size` on
    /// either axis stays a leaf. When one dimension exceeds the other by more
    /// than `max_ratio` the cut is forced across the long axis; otherwise the
    /// axis is a coin flip.
    pub fn split(&mut self, levels: u8, min_size: i32, max_ratio: f32, rng: &mut GameRng) {
        if levels == 0 {
            return;
        }

        let can_h = self.height >= 2 * min_size;
        let can_v = self.width >= 2 * min_size;
        let axis = if !can_h && !can_v {
            return;
        } else if can_v && self.width as f32 > self.height as f32 * max_ratio {
            SplitAxis::Vertical
        } else if can_h && self.height as f32 > self.width as f32 * max_ratio {
            SplitAxis::Horizontal
        } else if !can_h {
            SplitAxis::Vertical
        } else if !can_v {
            SplitAxis::Horizontal
        } else if rng.one_in(2) {
            SplitAxis::Horizontal
        } else {
            SplitAxis::Vertical
        };

        let (mut left, mut right) = match axis {
            SplitAxis::Vertical => {
                let cut = self.x + min_size + rng.rn2((self.width - 2 * min_size + 1) as u32) as i32;
                self.split = Some((SplitAxis::Vertical, cut));
                (
                    BspNode::new(self.x, self.y, cut - self.x, self.height),
                    BspNode::new(cut, self.y, self.x + self.width - cut, self.height),
                )
            }
            SplitAxis::Horizontal => {
                let cut =
                    self.y + min_size + rng.rn2((self.height - 2 * min_size + 1) as u32) as i32;
                self.split = Some((SplitAxis::Horizontal, cut));
                (
                    BspNode::new(self.x, self.y, self.width, cut - self.y),
                    BspNode::new(self.x, cut, self.width, self.y + self.height - cut),
                )
            }
        };

        left.depth = self.depth + 1;
        right.depth = self.depth + 1;
        left.split(levels - 1, min_size, max_ratio, rng);
        right.split(levels - 1, min_size, max_ratio, rng);
        self.left = Some(Box::new(left));
        self.right = Some(Box::new(right));
    }

    /// Count the leaves under this node
    pub fn leaf_count(&self) -> usize {
        match (&self.left, &self.right) {
            (Some(l), Some(r)) => l.leaf_count() + r.leaf_count(),
            _ => 1,
        }
    }
}
