use super::{TailContext, TailGeometry, TailParts, TailShape};
use crate::render::{PathShape, Segment, Shape};

/// A thin straight line from root to tip, for captions.
#[derive(Debug, Clone, PartialEq)]
pub struct LineTail {
    parts: TailParts,
}

impl LineTail {
    pub fn new(parts: TailParts) -> Self {
        LineTail { parts }
    }
}

impl TailShape for LineTail {
    fn parts(&self) -> &TailParts {
        &self.parts
    }

    fn parts_mut(&mut self) -> &mut TailParts {
        &mut self.parts
    }

    fn geometry(&self, ctx: &TailContext<'_>) -> TailGeometry {
        let line = Segment::Line {
            from: self.root(),
            to: self.tip(),
        };
        TailGeometry {
            lower: vec![(
                Shape::Path(PathShape::from_segment(line)),
                ctx.line_style(ctx.options.line_tail_width),
            )],
            upper: Vec::new(),
        }
    }
}
