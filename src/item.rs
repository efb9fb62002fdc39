use crate::types::Pt;

// Penalty infinity. Values >= INF forbid a break, values <= -INF force one;
// the same magnitude caps adjustment ratios when a line has no elasticity.
pub const INF: f64 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Item {
    Box {
        width: Pt,
    },
    Glue {
        width: Pt,
        stretch: Pt,
        shrink: Pt,
    },
    Penalty {
        width: Pt,
        penalty: f64,
        flagged: bool,
    },
}

impl Item {
    pub fn new_box(width: f32) -> Item {
        Item::Box {
            width: Pt::from_f32(width),
        }
    }

    pub fn new_glue(width: f32, stretch: f32, shrink: f32) -> Item {
        Item::Glue {
            width: Pt::from_f32(width),
            stretch: Pt::from_f32(stretch),
            shrink: Pt::from_f32(shrink),
        }
    }

    pub fn new_penalty(width: f32, penalty: f64, flagged: bool) -> Item {
        Item::Penalty {
            width: Pt::from_f32(width),
            penalty,
            flagged,
        }
    }

    pub fn width(&self) -> Pt {
        match *self {
            Item::Box { width } => width,
            Item::Glue { width, .. } => width,
            Item::Penalty { width, .. } => width,
        }
    }

    pub fn stretch(&self) -> Pt {
        match *self {
            Item::Glue { stretch, .. } => stretch,
            _ => Pt::ZERO,
        }
    }

    pub fn shrink(&self) -> Pt {
        match *self {
            Item::Glue { shrink, .. } => shrink,
            _ => Pt::ZERO,
        }
    }

    pub fn penalty_value(&self) -> f64 {
        match *self {
            Item::Penalty { penalty, .. } => penalty,
            _ => 0.0,
        }
    }

    pub fn is_flagged(&self) -> bool {
        matches!(*self, Item::Penalty { flagged: true, .. })
    }

    pub fn is_box(&self) -> bool {
        matches!(*self, Item::Box { .. })
    }

    pub fn is_glue(&self) -> bool {
        matches!(*self, Item::Glue { .. })
    }

    pub fn is_penalty(&self) -> bool {
        matches!(*self, Item::Penalty { .. })
    }

    pub fn is_forced_break(&self) -> bool {
        match *self {
            Item::Penalty { penalty, .. } => penalty <= -INF,
            _ => false,
        }
    }

    // Width this item occupies on a line set at the given adjustment ratio.
    // A penalty contributes its width only when taken as the break, which is
    // the caller's decision, so it reports zero here.
    pub fn rendered_width(&self, ratio: f64) -> Pt {
        match *self {
            Item::Box { width } => width,
            Item::Glue {
                width,
                stretch,
                shrink,
            } => {
                let elastic = if ratio < 0.0 { shrink } else { stretch };
                let milli =
                    width.to_milli_i64() as f64 + ratio * elastic.to_milli_i64() as f64;
                Pt::from_milli_i64(milli.round() as i64)
            }
            Item::Penalty { .. } => Pt::ZERO,
        }
    }
}

// Standard paragraph termination: forbid a break before the filler glue,
// let the filler absorb the rest of the last line, then force the final
// break. Callers append this after their content items.
pub fn paragraph_end() -> [Item; 3] {
    [
        Item::Penalty {
            width: Pt::ZERO,
            penalty: INF,
            flagged: false,
        },
        Item::Glue {
            width: Pt::ZERO,
            stretch: Pt::INFINITE,
            shrink: Pt::ZERO,
        },
        Item::Penalty {
            width: Pt::ZERO,
            penalty: -INF,
            flagged: false,
        },
    ]
}
