use crate::cost::{is_feasible_breakpoint, CostModel, FitnessClass};
use crate::error::ParBreakError;
use crate::item::Item;
use crate::measure::PrefixSums;
use crate::types::Pt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub position: usize,
    pub line: u32,
    pub ratio: f64,
    pub fitness_class: FitnessClass,
    pub demerits: f64,
    pub previous: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakStatus {
    Optimal,
    ForcedFallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphBreaks {
    pub breaks: Vec<Breakpoint>,
    pub status: BreakStatus,
}

impl ParagraphBreaks {
    pub fn line_count(&self) -> usize {
        self.breaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breaks.is_empty()
    }
}

pub(crate) struct SearchOptions {
    pub tolerance: f64,
    pub looseness: i32,
    pub fitness_demerit: f64,
    pub flagged_demerit: f64,
}

#[derive(Default)]
pub(crate) struct SearchStats {
    pub items: u64,
    pub feasible_breakpoints: u64,
    pub nodes_created: u64,
    pub deactivated: u64,
    pub active_peak: u64,
}

// Break nodes live in an arena and refer to their predecessor by index;
// the chain never loops because line strictly increases along it.
type NodeId = u32;

struct Node {
    position: usize,
    line: u32,
    fitness_class: FitnessClass,
    ratio: f64,
    demerits: f64,
    previous: Option<NodeId>,
}

const ROOT: NodeId = 0;

pub(crate) fn find_breaks(
    items: &[Item],
    line_lengths: &[Pt],
    options: &SearchOptions,
    stats: &mut SearchStats,
) -> Result<ParagraphBreaks, ParBreakError> {
    if line_lengths.is_empty() {
        return Err(ParBreakError::InvalidConfiguration(
            "line-length schedule is empty".to_string(),
        ));
    }
    let m = items.len();
    stats.items = m as u64;
    if m == 0 {
        return Ok(ParagraphBreaks {
            breaks: Vec::new(),
            status: BreakStatus::Optimal,
        });
    }

    let sums = PrefixSums::build(items);
    let model = CostModel::new(
        items,
        &sums,
        line_lengths,
        options.tolerance,
        options.fitness_demerit,
        options.flagged_demerit,
    );

    let mut arena: Vec<Node> = vec![Node {
        position: 0,
        line: 0,
        fitness_class: FitnessClass::Normal,
        ratio: 0.0,
        demerits: 0.0,
        previous: None,
    }];
    let mut active: Vec<NodeId> = vec![ROOT];
    let mut to_add: Vec<Node> = Vec::new();
    let mut to_drop: Vec<NodeId> = Vec::new();

    for b in 0..m {
        if !is_feasible_breakpoint(items, b) {
            continue;
        }
        stats.feasible_breakpoints += 1;

        for &id in &active {
            let a = &arena[id as usize];
            let judgment = model.judge(a.position, a.line, a.fitness_class, a.demerits, b);
            if judgment.deactivate {
                to_drop.push(id);
            }
            if let Some(candidate) = judgment.candidate {
                to_add.push(Node {
                    position: b,
                    line: a.line + 1,
                    fitness_class: candidate.fitness_class,
                    ratio: judgment.ratio,
                    demerits: candidate.demerits,
                    previous: Some(id),
                });
            }
        }

        // Retire predecessors the line can no longer reach, but never the
        // last live node: the search needs at least one predecessor even
        // when every current one formally deserves deactivation.
        for &id in &to_drop {
            if active.len() == 1 {
                break;
            }
            if let Some(index) = active.iter().position(|&entry| entry == id) {
                active.remove(index);
                stats.deactivated += 1;
            }
        }
        to_drop.clear();

        for node in to_add.drain(..) {
            insert_active(&mut arena, &mut active, node, stats);
        }
        stats.active_peak = stats.active_peak.max(active.len() as u64);
    }

    select_chain(items, &arena, &active, options)
}

// Keep the active list ordered by line, insertion order within a line, and
// at most one node per (line, fitness class). Admissible candidates arrive
// in predecessor order, so on a collision the earlier node wins.
fn insert_active(arena: &mut Vec<Node>, active: &mut Vec<NodeId>, node: Node, stats: &mut SearchStats) {
    let mut index = 0;
    while index < active.len() && arena[active[index] as usize].line < node.line {
        index += 1;
    }
    while index < active.len() && arena[active[index] as usize].line == node.line {
        if arena[active[index] as usize].fitness_class == node.fitness_class {
            return;
        }
        index += 1;
    }
    let id = arena.len() as NodeId;
    arena.push(node);
    active.insert(index, id);
    stats.nodes_created += 1;
}

fn select_chain(
    items: &[Item],
    arena: &[Node],
    active: &[NodeId],
    options: &SearchOptions,
) -> Result<ParagraphBreaks, ParBreakError> {
    let terminal = (0..items.len())
        .rev()
        .find(|&i| is_feasible_breakpoint(items, i));

    // A run succeeds when some surviving chain ends at the paragraph's last
    // feasible breakpoint; anything else only exists because of the
    // keep-one-node fallback and is reported as such.
    let terminal_pool: Vec<NodeId> = active
        .iter()
        .copied()
        .filter(|&id| arena[id as usize].previous.is_some())
        .filter(|&id| Some(arena[id as usize].position) == terminal)
        .collect();
    let (pool, status) = if !terminal_pool.is_empty() {
        (terminal_pool, BreakStatus::Optimal)
    } else {
        let rest: Vec<NodeId> = active
            .iter()
            .copied()
            .filter(|&id| arena[id as usize].previous.is_some())
            .collect();
        if rest.is_empty() {
            return Err(ParBreakError::Infeasible {
                tolerance: options.tolerance,
            });
        }
        (rest, BreakStatus::ForcedFallback)
    };

    let mut best = pool[0];
    for &id in &pool[1..] {
        if arena[id as usize].demerits < arena[best as usize].demerits {
            best = id;
        }
    }
    if options.looseness != 0 {
        best = apply_looseness(arena, &pool, best, options.looseness);
    }

    let mut chain: Vec<NodeId> = Vec::new();
    let mut cursor = Some(best);
    while let Some(id) = cursor {
        let node = &arena[id as usize];
        if node.previous.is_none() {
            break;
        }
        chain.push(id);
        cursor = node.previous;
    }
    chain.reverse();

    let breaks = chain
        .iter()
        .map(|&id| {
            let node = &arena[id as usize];
            let previous = node.previous.and_then(|prev| {
                let prev = &arena[prev as usize];
                prev.previous.map(|_| prev.position)
            });
            Breakpoint {
                position: node.position,
                line: node.line,
                ratio: node.ratio,
                fitness_class: node.fitness_class,
                demerits: node.demerits,
                previous,
            }
        })
        .collect();

    Ok(ParagraphBreaks { breaks, status })
}

// Looseness asks for a paragraph longer (positive) or shorter (negative)
// than the demerit-minimizing length: among chains extending in the
// requested direction, take the length closest to the request, then the
// fewest demerits. When no chain extends that way the default stands.
fn apply_looseness(arena: &[Node], pool: &[NodeId], default: NodeId, looseness: i32) -> NodeId {
    let base_line = arena[default as usize].line as i64;
    let want = looseness as i64;
    for directed_only in [true, false] {
        let mut best: Option<NodeId> = None;
        let mut best_key = (i64::MAX, f64::INFINITY);
        for &id in pool {
            let delta = arena[id as usize].line as i64 - base_line;
            let in_direction = if want > 0 { delta > 0 } else { delta < 0 };
            if directed_only && !in_direction {
                continue;
            }
            let key = ((delta - want).abs(), arena[id as usize].demerits);
            if key < best_key {
                best_key = key;
                best = Some(id);
            }
        }
        if let Some(id) = best {
            return id;
        }
    }
    default
}
