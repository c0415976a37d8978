use crate::engine::{Move, Puzzle};
use crate::error::SolverResult;
use crate::heuristics::Heuristic;
use serde::Serialize;
use std::rc::Rc;

/// A puzzle state reached during search, with its cost bookkeeping.
///
/// Nodes are immutable once built. Children hold their parent through an `Rc`, so
/// one parent can be shared by all of its children and stays alive as long as any
/// of them does.
#[derive(Debug)]
pub struct SearchNode {
    puzzle: Puzzle,
    parent: Option<Rc<SearchNode>>,
    last_move: Option<Move>,
    g: u32,
    h: f64,
    heuristic: Heuristic,
}

/// One entry of a solution path, ready for rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStep {
    /// 1-based position in the path; the initial state is step 1.
    pub step_index: usize,
    /// The move that produced this state, absent for the initial state.
    #[serde(rename = "move")]
    pub last_move: Option<Move>,
    pub grid_snapshot: Vec<Vec<Option<char>>>,
}

impl SearchNode {
    /// Wraps the initial state: no parent, no move, `g = 0`.
    pub fn root(puzzle: Puzzle, heuristic: Heuristic) -> SolverResult<Rc<Self>> {
        let h = heuristic.evaluate(&puzzle)?;
        Ok(Rc::new(SearchNode {
            puzzle,
            parent: None,
            last_move: None,
            g: 0,
            h,
            heuristic,
        }))
    }

    fn child(parent: &Rc<SearchNode>, puzzle: Puzzle, last_move: Move) -> SolverResult<Rc<Self>> {
        let h = parent.heuristic.evaluate(&puzzle)?;
        Ok(Rc::new(SearchNode {
            puzzle,
            parent: Some(Rc::clone(parent)),
            last_move: Some(last_move),
            g: parent.g + last_move.delta.unsigned_abs(),
            h,
            heuristic: parent.heuristic,
        }))
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn parent(&self) -> Option<&Rc<SearchNode>> {
        self.parent.as_ref()
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Total slide distance from the root.
    pub fn g(&self) -> u32 {
        self.g
    }

    pub fn h(&self) -> f64 {
        self.h
    }

    pub fn f(&self) -> f64 {
        self.g as f64 + self.h
    }

    pub fn is_goal(&self) -> SolverResult<bool> {
        self.puzzle.is_goal()
    }

    /// Expands this node into one child per successor state, all sharing this node
    /// as parent and using the same heuristic.
    pub fn neighbors(self: &Rc<Self>) -> SolverResult<Vec<Rc<SearchNode>>> {
        self.puzzle
            .successors()
            .into_iter()
            .map(|(puzzle, last_move)| SearchNode::child(self, puzzle, last_move))
            .collect()
    }

    /// State key of the wrapped puzzle.
    pub fn serialize(&self) -> String {
        self.puzzle.serialize()
    }

    /// Moves from the root to this node, in order.
    pub fn moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        let mut current = Some(self);
        while let Some(node) = current {
            if let Some(m) = node.last_move {
                moves.push(m);
            }
            current = node.parent.as_deref();
        }
        moves.reverse();
        moves
    }

    /// Walks the parent links and returns the path from the root to this node.
    pub fn path(&self) -> Vec<PathStep> {
        let mut nodes = Vec::new();
        let mut current = Some(self);
        while let Some(node) = current {
            nodes.push(node);
            current = node.parent.as_deref();
        }
        nodes
            .into_iter()
            .rev()
            .enumerate()
            .map(|(idx, node)| PathStep {
                step_index: idx + 1,
                last_move: node.last_move,
                grid_snapshot: node.puzzle.grid_snapshot(),
            })
            .collect()
    }
}

impl Drop for SearchNode {
    // Unlinks long parent chains iteratively; recursive drops can overflow the stack
    // after deep beam or greedy searches.
    fn drop(&mut self) {
        let mut parent = self.parent.take();
        while let Some(node) = parent {
            match Rc::try_unwrap(node) {
                Ok(mut inner) => parent = inner.parent.take(),
                Err(_) => break,
            }
        }
    }
}
