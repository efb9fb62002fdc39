use crate::item::Item;
use crate::types::Pt;

// Running totals of width, stretch, and shrink over the item sequence.
// Entry i is the sum over items 0..i-1, exclusive of item i, so the span
// (a, b] measures as entry[b] - entry[a].
pub(crate) struct PrefixSums {
    width: Vec<Pt>,
    stretch: Vec<Pt>,
    shrink: Vec<Pt>,
}

impl PrefixSums {
    pub fn build(items: &[Item]) -> PrefixSums {
        let mut width = Vec::with_capacity(items.len());
        let mut stretch = Vec::with_capacity(items.len());
        let mut shrink = Vec::with_capacity(items.len());
        let mut width_sum = Pt::ZERO;
        let mut stretch_sum = Pt::ZERO;
        let mut shrink_sum = Pt::ZERO;
        for item in items {
            width.push(width_sum);
            stretch.push(stretch_sum);
            shrink.push(shrink_sum);
            width_sum += item.width();
            stretch_sum += item.stretch();
            shrink_sum += item.shrink();
        }
        PrefixSums {
            width,
            stretch,
            shrink,
        }
    }

    pub fn width_between(&self, a: usize, b: usize) -> Pt {
        self.width[b] - self.width[a]
    }

    pub fn stretch_between(&self, a: usize, b: usize) -> Pt {
        self.stretch[b] - self.stretch[a]
    }

    pub fn shrink_between(&self, a: usize, b: usize) -> Pt {
        self.shrink[b] - self.shrink[a]
    }
}
