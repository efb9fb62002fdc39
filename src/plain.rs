use crate::item::{paragraph_end, Item, INF};
use crate::search::Breakpoint;
use crate::types::Pt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justify {
    Left,
    Right,
    Center,
    Full,
}

// Demonstration tokenizer: every character is a unit-width box, whitespace
// becomes ordinary inter-word glue, '@' forces a break and '~' forbids one.
// The returned glyph vector is index-aligned with the items, showing how a
// caller carries payloads the breaker itself never reads.
pub fn items_from_text(text: &str) -> (Vec<Item>, Vec<char>) {
    let mut items = Vec::new();
    let mut glyphs = Vec::new();
    for ch in text.chars() {
        let item = if ch.is_whitespace() {
            Item::new_glue(2.0, 1.0, 1.0)
        } else if ch == '@' {
            Item::new_penalty(0.0, -INF, false)
        } else if ch == '~' {
            Item::new_penalty(0.0, INF, false)
        } else {
            Item::new_box(1.0)
        };
        items.push(item);
        glyphs.push(ch);
    }
    for item in paragraph_end() {
        items.push(item);
        glyphs.push(' ');
    }
    (items, glyphs)
}

pub fn render_plain(
    items: &[Item],
    glyphs: &[char],
    breaks: &[Breakpoint],
    line_lengths: &[Pt],
    justify: Justify,
) -> String {
    let mut lines = Vec::with_capacity(breaks.len());
    let mut start = 0;
    for (line_index, brk) in breaks.iter().enumerate() {
        let last = line_index + 1 == breaks.len();
        let mut raw = String::new();
        for j in start..brk.position {
            match items[j] {
                Item::Box { .. } => raw.push(glyphs[j]),
                Item::Glue { .. } => {
                    let spaces = if justify == Justify::Full && !last {
                        glue_spaces(&items[j], brk.ratio)
                    } else {
                        1
                    };
                    for _ in 0..spaces {
                        raw.push(' ');
                    }
                }
                Item::Penalty { .. } => {}
            }
        }
        // A flagged penalty taken as the break inserts its hyphen.
        if items[brk.position].is_flagged() {
            raw.push('-');
        }

        let line = raw.trim().to_string();
        let target = target_chars(line_lengths, line_index);
        let width = line.chars().count();
        let justified = match justify {
            Justify::Left => line,
            Justify::Right => {
                let pad = target.saturating_sub(width);
                format!("{}{}", " ".repeat(pad), line)
            }
            Justify::Center => {
                let pad = target.saturating_sub(width) / 2;
                format!("{}{}", " ".repeat(pad), line)
            }
            Justify::Full => {
                if last || width >= target {
                    line
                } else {
                    pad_full(&line, target)
                }
            }
        };
        lines.push(justified);
        start = brk.position + 1;
    }
    lines.join("\n")
}

fn glue_spaces(glue: &Item, ratio: f64) -> usize {
    let milli = glue.rendered_width(ratio).to_milli_i64().max(0);
    ((milli + 500) / 1000) as usize
}

fn target_chars(line_lengths: &[Pt], line_index: usize) -> usize {
    let length = if line_index < line_lengths.len() {
        line_lengths[line_index]
    } else {
        line_lengths[line_lengths.len() - 1]
    };
    (length.to_milli_i64().max(0) / 1000) as usize
}

// Widen existing gaps one space at a time, left to right, until the line
// reaches the target; a line with no gaps pads on the right.
fn pad_full(line: &str, target: usize) -> String {
    let mut chars: Vec<char> = line.chars().collect();
    let mut needed = target.saturating_sub(chars.len());
    while needed > 0 {
        let mut inserted = false;
        let mut i = 0;
        while i < chars.len() && needed > 0 {
            if chars[i] == ' ' {
                chars.insert(i, ' ');
                needed -= 1;
                inserted = true;
                while i < chars.len() && chars[i] == ' ' {
                    i += 1;
                }
            } else {
                i += 1;
            }
        }
        if !inserted {
            break;
        }
    }
    for _ in 0..needed {
        chars.push(' ');
    }
    chars.into_iter().collect()
}
