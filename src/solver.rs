//! The search engine.
//!
//! Every strategy runs through the same loop in `Solver::run`; they differ only
//! in the `Frontier` that orders open nodes and in the priority each node is
//! pushed with. Nodes live in an arena and point at their parent by index, so
//! the winning path is rebuilt by walking parents from the goal node.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, VecDeque};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::engine::BoardState;
use crate::error::{Error, Result};
use crate::goal::GoalTest;
use crate::heuristics::HeuristicKind;
use crate::rules::{Move, Rules};

/// Default depth cap for iterative deepening.
pub const DEFAULT_MAX_DEPTH: u32 = 32;

/// Search strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Breadth-first: shortest path in moves.
    #[default]
    Bfs,
    /// Depth-first, optionally depth-limited.
    Dfs,
    /// Iterative deepening depth-first: shortest path in moves, DFS memory.
    Ids,
    /// Uniform-cost: cheapest path under `MoveCosts`.
    Ucs,
    /// Greedy best-first on the heuristic alone.
    Greedy,
    /// A*: path cost plus weighted heuristic.
    AStar,
}

impl Strategy {
    pub const ALL: [Strategy; 6] = [
        Strategy::Bfs,
        Strategy::Dfs,
        Strategy::Ids,
        Strategy::Ucs,
        Strategy::Greedy,
        Strategy::AStar,
    ];

    /// Returns true for the strategies that consult a heuristic.
    pub fn is_informed(&self) -> bool {
        matches!(self, Strategy::Greedy | Strategy::AStar)
    }

    fn tracks_depth(&self) -> bool {
        matches!(self, Strategy::Dfs | Strategy::Ids)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Bfs => "bfs",
            Strategy::Dfs => "dfs",
            Strategy::Ids => "ids",
            Strategy::Ucs => "ucs",
            Strategy::Greedy => "greedy",
            Strategy::AStar => "astar",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bfs" => Ok(Strategy::Bfs),
            "dfs" => Ok(Strategy::Dfs),
            "ids" => Ok(Strategy::Ids),
            "ucs" => Ok(Strategy::Ucs),
            "greedy" => Ok(Strategy::Greedy),
            "astar" | "a*" | "a_star" => Ok(Strategy::AStar),
            other => Err(format!("unknown strategy '{}'", other)),
        }
    }
}

/// Why a search stopped without reaching the goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every reachable state was examined.
    Exhausted,
    /// Branches were cut at this depth and nothing shallower reached the goal.
    DepthLimit(u32),
    /// The expansion budget ran out.
    NodeLimit(u64),
    /// The cancellation flag was raised.
    Cancelled,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Exhausted => write!(f, "search space exhausted"),
            StopReason::DepthLimit(d) => write!(f, "depth limit {} reached", d),
            StopReason::NodeLimit(n) => write!(f, "node limit {} reached", n),
            StopReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Bounds on a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SearchLimits {
    /// Deepest node expanded by the non-iterative strategies. `None` is unbounded.
    pub depth_limit: Option<u32>,
    /// Last depth bound tried by iterative deepening.
    pub max_depth: u32,
    /// Maximum number of node expansions. `None` is unbounded.
    pub node_limit: Option<u64>,
}

impl Default for SearchLimits {
    fn default() -> Self {
        SearchLimits {
            depth_limit: None,
            max_depth: DEFAULT_MAX_DEPTH,
            node_limit: None,
        }
    }
}

/// Counters collected during a search.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchStats {
    /// Nodes taken off the frontier and expanded.
    pub expanded: u64,
    /// Successor states produced by the move generator.
    pub generated: u64,
    /// Largest frontier size seen.
    pub peak_frontier: usize,
    /// Depth bounds tried; 1 for the non-iterative strategies.
    pub iterations: u32,
    pub elapsed: Duration,
}

/// A path from the initial state to a goal state.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Moves in the order they are played.
    pub moves: Vec<Move>,
    /// The goal state the moves lead to.
    pub final_state: BoardState,
    /// Sum of the move costs along the path.
    pub cost: u32,
    pub stats: SearchStats,
}

impl Solution {
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Score of the final state.
    pub fn score(&self) -> u32 {
        self.final_state.score()
    }
}

/// Open-node container. The discipline decides which node is expanded next.
trait Frontier {
    fn push(&mut self, node: usize, priority: f64);
    fn pop(&mut self) -> Option<usize>;
    fn len(&self) -> usize;
}

/// First in, first out.
#[derive(Default)]
struct FifoFrontier(VecDeque<usize>);

impl Frontier for FifoFrontier {
    fn push(&mut self, node: usize, _priority: f64) {
        self.0.push_back(node);
    }

    fn pop(&mut self) -> Option<usize> {
        self.0.pop_front()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

/// Last in, first out.
#[derive(Default)]
struct LifoFrontier(Vec<usize>);

impl Frontier for LifoFrontier {
    fn push(&mut self, node: usize, _priority: f64) {
        self.0.push(node);
    }

    fn pop(&mut self) -> Option<usize> {
        self.0.pop()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

struct PriorityEntry {
    priority: f64,
    seq: u64,
    node: usize,
}

impl PartialEq for PriorityEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PriorityEntry {}

impl PartialOrd for PriorityEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriorityEntry {
    // Reversed so the max-heap pops the lowest priority, earliest insertion first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Lowest priority first, ties by insertion order.
#[derive(Default)]
struct PriorityFrontier {
    heap: BinaryHeap<PriorityEntry>,
    seq: u64,
}

impl Frontier for PriorityFrontier {
    fn push(&mut self, node: usize, priority: f64) {
        self.heap.push(PriorityEntry {
            priority,
            seq: self.seq,
            node,
        });
        self.seq += 1;
    }

    fn pop(&mut self) -> Option<usize> {
        self.heap.pop().map(|entry| entry.node)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

struct Node {
    state: BoardState,
    parent: Option<usize>,
    mv: Option<Move>,
    depth: u32,
    cost: u32,
}

enum Outcome {
    Found(usize),
    Exhausted { cutoff: bool },
    Stopped(StopReason),
}

/// Runs searches over `BoardState`s with a fixed set of rules and limits.
///
/// # Examples
/// ```
/// use cake_sort_solver::engine::{BoardState, Tray};
/// use cake_sort_solver::goal::Goal;
/// use cake_sort_solver::rules::Rules;
/// use cake_sort_solver::solver::{Solver, Strategy};
/// use cake_sort_solver::utils::board_from_str_array;
///
/// let board = board_from_str_array(&["[0000000] 0"]).unwrap();
/// let state = BoardState::new(board, Tray::empty());
/// let solver = Solver::new(Rules::default());
/// let solution = solver.solve(&state, Strategy::Bfs, &Goal::CakesAtLeast(1)).unwrap();
/// assert_eq!(solution.len(), 1);
/// assert_eq!(solution.score(), 80);
/// ```
#[derive(Debug, Clone)]
pub struct Solver {
    rules: Rules,
    limits: SearchLimits,
    heuristic: HeuristicKind,
    heuristic_weight: f64,
    cancel: Option<Arc<AtomicBool>>,
}

impl Default for Solver {
    fn default() -> Self {
        Solver::new(Rules::default())
    }
}

impl Solver {
    pub fn new(rules: Rules) -> Self {
        Solver {
            rules,
            limits: SearchLimits::default(),
            heuristic: HeuristicKind::default(),
            heuristic_weight: 1.0,
            cancel: None,
        }
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Sets the estimate used by Greedy and A*, and the weight A* gives it.
    pub fn with_heuristic(mut self, heuristic: HeuristicKind, weight: f64) -> Self {
        self.heuristic = heuristic;
        self.heuristic_weight = weight;
        self
    }

    /// Installs a flag that stops the search when set. It is checked before
    /// every expansion.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn limits(&self) -> &SearchLimits {
        &self.limits
    }

    /// Searches with the configured limits.
    pub fn solve<G>(&self, initial: &BoardState, strategy: Strategy, goal: &G) -> Result<Solution>
    where
        G: GoalTest + ?Sized,
    {
        self.search(strategy, initial, goal, self.limits.depth_limit)
    }

    /// Searches from `initial` until `goal` holds for a popped node.
    ///
    /// `depth_limit` overrides the configured one. Iterative deepening ignores
    /// it and raises its bound from 0 to `max_depth` instead.
    ///
    /// # Returns
    /// The path to the first goal node popped, or `Error::NoSolution` with the
    /// reason the search stopped.
    pub fn search<G>(
        &self,
        strategy: Strategy,
        initial: &BoardState,
        goal: &G,
        depth_limit: Option<u32>,
    ) -> Result<Solution>
    where
        G: GoalTest + ?Sized,
    {
        info!(
            event = "search_start",
            strategy = %strategy,
            depth_limit = ?depth_limit,
            node_limit = ?self.limits.node_limit,
        );
        let start = Instant::now();
        let mut stats = SearchStats::default();

        let (arena, outcome) = if strategy == Strategy::Ids {
            self.iterative_deepening(initial, goal, &mut stats)
        } else {
            stats.iterations = 1;
            let mut arena = Vec::new();
            let outcome = match strategy {
                Strategy::Bfs => self.run(
                    strategy,
                    initial,
                    goal,
                    depth_limit,
                    &mut FifoFrontier::default(),
                    &mut arena,
                    &mut stats,
                ),
                Strategy::Dfs => self.run(
                    strategy,
                    initial,
                    goal,
                    depth_limit,
                    &mut LifoFrontier::default(),
                    &mut arena,
                    &mut stats,
                ),
                _ => self.run(
                    strategy,
                    initial,
                    goal,
                    depth_limit,
                    &mut PriorityFrontier::default(),
                    &mut arena,
                    &mut stats,
                ),
            };
            let outcome = match outcome {
                Outcome::Exhausted { cutoff: true } => match depth_limit {
                    Some(d) => Outcome::Stopped(StopReason::DepthLimit(d)),
                    None => Outcome::Exhausted { cutoff: false },
                },
                other => other,
            };
            (arena, outcome)
        };
        stats.elapsed = start.elapsed();

        let result = match outcome {
            Outcome::Found(index) => Ok(reconstruct(arena, index, stats)),
            Outcome::Exhausted { .. } => Err(Error::NoSolution {
                strategy,
                reason: StopReason::Exhausted,
            }),
            Outcome::Stopped(reason) => Err(Error::NoSolution { strategy, reason }),
        };

        match &result {
            Ok(solution) => info!(
                event = "search_end",
                strategy = %strategy,
                found = true,
                moves = solution.len(),
                cost = solution.cost,
                expanded = solution.stats.expanded,
                generated = solution.stats.generated,
                elapsed_ms = solution.stats.elapsed.as_millis() as u64,
            ),
            Err(err) => info!(
                event = "search_end",
                strategy = %strategy,
                found = false,
                error = %err,
            ),
        }
        result
    }

    fn iterative_deepening<G>(
        &self,
        initial: &BoardState,
        goal: &G,
        stats: &mut SearchStats,
    ) -> (Vec<Node>, Outcome)
    where
        G: GoalTest + ?Sized,
    {
        let mut arena = Vec::new();
        for bound in 0..=self.limits.max_depth {
            stats.iterations += 1;
            arena.clear();
            let outcome = self.run(
                Strategy::Ids,
                initial,
                goal,
                Some(bound),
                &mut LifoFrontier::default(),
                &mut arena,
                stats,
            );
            debug!(
                event = "ids_iteration",
                depth = bound,
                expanded = stats.expanded,
                nodes = arena.len(),
            );
            match outcome {
                Outcome::Exhausted { cutoff: true } => continue,
                other => return (arena, other),
            }
        }
        (
            arena,
            Outcome::Stopped(StopReason::DepthLimit(self.limits.max_depth)),
        )
    }

    // The shared loop. DFS and IDS remember the shallowest depth each state was
    // expanded at; the others remember the cheapest path cost seen.
    #[allow(clippy::too_many_arguments)]
    fn run<G, F>(
        &self,
        strategy: Strategy,
        initial: &BoardState,
        goal: &G,
        depth_bound: Option<u32>,
        frontier: &mut F,
        arena: &mut Vec<Node>,
        stats: &mut SearchStats,
    ) -> Outcome
    where
        G: GoalTest + ?Sized,
        F: Frontier,
    {
        let by_depth = strategy.tracks_depth();
        // BFS compares paths by length, the priority strategies by cost.
        let visit_key = |depth: u32, cost: u32| {
            if strategy == Strategy::Bfs {
                depth
            } else {
                cost
            }
        };
        let mut seen: HashMap<BoardState, u32> = HashMap::new();
        let mut cutoff = false;

        if !by_depth {
            seen.insert(initial.clone(), 0);
        }
        arena.push(Node {
            state: initial.clone(),
            parent: None,
            mv: None,
            depth: 0,
            cost: 0,
        });
        frontier.push(0, self.priority(strategy, initial, 0));
        stats.peak_frontier = stats.peak_frontier.max(frontier.len());

        while let Some(index) = frontier.pop() {
            if self.is_cancelled() {
                return Outcome::Stopped(StopReason::Cancelled);
            }

            let node = &arena[index];
            let (depth, cost) = (node.depth, node.cost);

            if by_depth {
                if seen.get(&node.state).is_some_and(|&d| d <= depth) {
                    continue;
                }
                seen.insert(node.state.clone(), depth);
            } else if seen
                .get(&node.state)
                .is_some_and(|&known| known < visit_key(depth, cost))
            {
                // A cheaper path to this state was pushed after this one.
                continue;
            }

            if goal.is_goal(&node.state) {
                return Outcome::Found(index);
            }
            if let Some(limit) = self.limits.node_limit {
                if stats.expanded >= limit {
                    return Outcome::Stopped(StopReason::NodeLimit(limit));
                }
            }
            if depth_bound.is_some_and(|bound| depth >= bound) {
                cutoff = true;
                continue;
            }

            stats.expanded += 1;
            let successors = self.rules.generate_moves(&node.state);
            stats.generated += successors.len() as u64;
            trace!(
                event = "expand",
                depth = depth,
                cost = cost,
                successors = successors.len(),
                frontier = frontier.len(),
            );

            let mut children = Vec::with_capacity(successors.len());
            for (mv, next) in successors {
                let child_depth = depth + 1;
                let child_cost = cost.saturating_add(self.rules.costs.cost(&mv));
                if by_depth {
                    if seen.get(&next).is_some_and(|&d| d <= child_depth) {
                        continue;
                    }
                } else {
                    let key = visit_key(child_depth, child_cost);
                    if seen.get(&next).is_some_and(|&known| known <= key) {
                        continue;
                    }
                    seen.insert(next.clone(), key);
                }
                children.push((mv, next, child_depth, child_cost));
            }

            // The stack pops the last push first; reverse to keep generation order.
            if by_depth {
                children.reverse();
            }
            for (mv, next, child_depth, child_cost) in children {
                let priority = self.priority(strategy, &next, child_cost);
                arena.push(Node {
                    state: next,
                    parent: Some(index),
                    mv: Some(mv),
                    depth: child_depth,
                    cost: child_cost,
                });
                frontier.push(arena.len() - 1, priority);
            }
            stats.peak_frontier = stats.peak_frontier.max(frontier.len());
        }

        Outcome::Exhausted { cutoff }
    }

    fn priority(&self, strategy: Strategy, state: &BoardState, cost: u32) -> f64 {
        match strategy {
            Strategy::Bfs | Strategy::Dfs | Strategy::Ids => 0.0,
            Strategy::Ucs => cost as f64,
            Strategy::Greedy => self.heuristic.evaluate(state),
            Strategy::AStar => cost as f64 + self.heuristic_weight * self.heuristic.evaluate(state),
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(AtomicOrdering::Relaxed))
    }
}

fn reconstruct(mut arena: Vec<Node>, goal_index: usize, stats: SearchStats) -> Solution {
    let mut moves = Vec::new();
    let mut cursor = Some(goal_index);
    while let Some(index) = cursor {
        let node = &arena[index];
        if let Some(mv) = node.mv {
            moves.push(mv);
        }
        cursor = node.parent;
    }
    moves.reverse();

    let goal = arena.swap_remove(goal_index);
    Solution {
        moves,
        final_state: goal.state,
        cost: goal.cost,
        stats,
    }
}
