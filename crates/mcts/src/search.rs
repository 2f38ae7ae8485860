//! Monte Carlo Tree Search implementation.
//!
//! Each simulation runs the four classic phases:
//! 1. selection with UCB1 down fully expanded nodes,
//! 2. expansion of one untried move,
//! 3. a rollout scored by the evaluator,
//! 4. backpropagation of the outcome to the root.
//!
//! The final move is the root child with the most visits.

use crate::{
    config::MctsConfig,
    evaluator::Evaluator,
    node::{Node, NodeId},
    tree::Tree,
};
use arena_core::{ArenaError, GameState, Outcome, Result, Reward};
use rand::Rng;
use std::marker::PhantomData;
use tracing::{debug, trace};

/// Result of an MCTS search.
#[derive(Clone, Debug)]
pub struct SearchResult<M> {
    /// Visit count for each root child, in expansion order.
    pub visit_counts: Vec<(M, u32)>,

    /// Most visited root child ("robust child").
    pub best_move: M,

    /// Mean reward at the root, from the perspective of the side to move.
    pub root_value: Reward,

    /// Number of simulations that were run.
    pub simulations: usize,

    /// Number of nodes in the tree when the search finished.
    pub tree_size: usize,
}

impl<M: Copy + PartialEq> SearchResult<M> {
    /// Visits recorded for `mv` at the root (0 if never expanded).
    pub fn visits(&self, mv: M) -> u32 {
        self.visit_counts
            .iter()
            .find(|(m, _)| *m == mv)
            .map_or(0, |(_, count)| *count)
    }

    /// Sum of visits over the root's children.
    pub fn total_visits(&self) -> u32 {
        self.visit_counts.iter().map(|(_, c)| *c).sum()
    }
}

/// Monte Carlo Tree Search with UCB1 selection.
///
/// Generic over:
/// - `G`: The game being played
/// - `E`: The leaf evaluation strategy (random rollouts by default)
/// - `R`: The random number generator used for expansion order
pub struct Mcts<G: GameState, E: Evaluator<G>, R: Rng> {
    config: MctsConfig,
    evaluator: E,
    rng: R,
    _game: PhantomData<G>,
}

impl<G, E, R> Mcts<G, E, R>
where
    G: GameState,
    E: Evaluator<G>,
    R: Rng,
{
    /// Create a new MCTS instance.
    pub fn new(config: MctsConfig, evaluator: E, rng: R) -> Self {
        Self {
            config,
            evaluator,
            rng,
            _game: PhantomData,
        }
    }

    /// Run MCTS from the given state, returning search results.
    ///
    /// The state is only read; every simulation works on its own clone. The
    /// tree is built from scratch and dropped before returning.
    ///
    /// # Errors
    /// - `ArenaError::InvalidConfig` if the configuration is invalid
    /// - `ArenaError::NoLegalMoves` if the state is already terminal
    pub fn search(&mut self, state: &G) -> Result<SearchResult<G::Move>> {
        self.config.validate()?;

        if state.is_terminal() || state.legal_moves().is_empty() {
            return Err(ArenaError::NoLegalMoves);
        }

        let mut tree = Tree::new(Self::make_node(state, None));

        for simulation in 0..self.config.num_simulations {
            let (leaf, outcome) = self.simulate(&mut tree, state)?;
            trace!(simulation, leaf = leaf.0, ?outcome, "simulation finished");
        }

        let result = self.extract_results(&tree)?;
        debug!(
            simulations = result.simulations,
            tree_size = result.tree_size,
            best_move = %result.best_move,
            best_visits = result.visits(result.best_move),
            root_value = %result.root_value,
            "search finished"
        );
        Ok(result)
    }

    /// Build a node for `state`. A position without moves that the game does
    /// not call finished is treated as a draw so selection never dead-ends.
    fn make_node(state: &G, parent: Option<NodeId>) -> Node<G::Move> {
        let untried = state.legal_moves();
        let terminal = state
            .outcome()
            .or_else(|| untried.is_empty().then_some(Outcome::Draw));
        Node::new(parent, state.side_to_move(), untried, terminal)
    }

    /// Run a single simulation: select -> expand -> rollout -> backpropagate.
    ///
    /// Returns the node the outcome was credited from and the outcome.
    fn simulate(&mut self, tree: &mut Tree<G::Move>, root_state: &G) -> Result<(NodeId, Outcome)> {
        let mut state = root_state.clone();
        let mut current_id = NodeId::ROOT;

        // SELECT: descend while the node is fully expanded and not terminal
        loop {
            let node = tree.get(current_id);
            if node.terminal.is_some() || !node.is_fully_expanded() {
                break;
            }
            let (action, child_id) = self.select_child(tree, current_id);
            state.apply(action)?;
            current_id = child_id;
        }

        let outcome = match tree.get(current_id).terminal {
            // Terminal: no expansion, credit the stored result directly
            Some(outcome) => outcome,
            None => {
                // EXPAND: one untried move, chosen at random
                let node = tree.get_mut(current_id);
                let idx = self.rng.gen_range(0..node.untried.len());
                let action = node.untried.swap_remove(idx);
                state.apply(action)?;

                let child = Self::make_node(&state, Some(current_id));
                let terminal = child.terminal;
                current_id = tree.add_child(current_id, action, child);

                // ROLLOUT: on the disposable clone
                match terminal {
                    Some(outcome) => outcome,
                    None => self.evaluator.evaluate(state)?,
                }
            }
        };

        self.backpropagate(tree, current_id, outcome);
        Ok((current_id, outcome))
    }

    /// Select a child using UCB1.
    ///
    /// score = mean + c * sqrt(ln(N_parent) / N_child)
    ///
    /// The mean is seen from the side to move at the parent. Unvisited
    /// children win outright; ties go to the earliest child.
    fn select_child(&self, tree: &Tree<G::Move>, node_id: NodeId) -> (G::Move, NodeId) {
        let node = tree.get(node_id);
        let ln_parent = (node.stats.visit_count.max(1) as f32).ln();
        let c = self.config.exploration_constant;

        let mut best: Option<(G::Move, NodeId)> = None;
        let mut best_score = f32::NEG_INFINITY;

        for &(action, child_id) in &node.children {
            let child = tree.get(child_id);
            let visits = child.stats.visit_count;
            if visits == 0 {
                return (action, child_id);
            }

            // Child rewards are stored from the child's side to move
            let mean = child.stats.mean_reward();
            let exploit = if child.to_move == node.to_move {
                mean
            } else {
                mean.negate()
            };
            let score = exploit.get() + c * (ln_parent / visits as f32).sqrt();

            if best.is_none() || score > best_score {
                best_score = score;
                best = Some((action, child_id));
            }
        }

        // INVARIANT: only called on fully expanded, non-terminal nodes, which
        // always have at least one child
        best.expect("BUG: select_child called on node without children")
    }

    /// Credit `outcome` to every node from `leaf` up to the root.
    ///
    /// Each node receives the reward of its own side to move, so the sign
    /// flips at every level where the turn changes.
    fn backpropagate(&self, tree: &mut Tree<G::Move>, leaf: NodeId, outcome: Outcome) {
        let mut current = Some(leaf);
        while let Some(id) = current {
            let node = tree.get_mut(id);
            node.stats.record(outcome.reward_for(node.to_move));
            current = node.parent;
        }
    }

    /// Extract search results from the root node.
    fn extract_results(&self, tree: &Tree<G::Move>) -> Result<SearchResult<G::Move>> {
        let root = tree.root();

        let visit_counts: Vec<(G::Move, u32)> = root
            .children
            .iter()
            .map(|(a, id)| (*a, tree.get(*id).stats.visit_count))
            .collect();

        // Most visits wins, the earliest child on ties
        let mut best: Option<(G::Move, u32)> = None;
        for &(action, count) in &visit_counts {
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((action, count));
            }
        }
        let (best_move, _) = best.ok_or(ArenaError::NoLegalMoves)?;

        Ok(SearchResult {
            visit_counts,
            best_move,
            root_value: root.stats.mean_reward(),
            simulations: self.config.num_simulations,
            tree_size: tree.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::RolloutEvaluator;
    use arena_core::Side;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::fmt;

    // Simple test game: race to 5
    // Players take turns adding 1 or 2. First to reach exactly 5 wins.
    // First player can always win with optimal play.
    #[derive(Clone, PartialEq, Eq, Debug)]
    struct RaceState {
        count: u8,
        current: Side,
    }

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    struct RaceMove(u8); // 1 or 2

    impl fmt::Display for RaceMove {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "+{}", self.0)
        }
    }

    impl fmt::Display for RaceState {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{} ({} to move)", self.count, self.current)
        }
    }

    impl RaceState {
        fn new() -> Self {
            Self {
                count: 0,
                current: Side::First,
            }
        }
    }

    impl GameState for RaceState {
        type Move = RaceMove;

        fn side_to_move(&self) -> Side {
            self.current
        }

        fn legal_moves(&self) -> Vec<RaceMove> {
            if self.count >= 5 {
                Vec::new()
            } else {
                let mut moves = vec![RaceMove(1)];
                if self.count + 2 <= 5 {
                    moves.push(RaceMove(2));
                }
                moves
            }
        }

        fn check_move(&self, mv: RaceMove) -> Result<()> {
            if self.legal_moves().contains(&mv) {
                Ok(())
            } else {
                Err(ArenaError::InvalidMove(mv.to_string()))
            }
        }

        fn apply(&mut self, mv: RaceMove) -> Result<()> {
            self.check_move(mv)?;
            self.count += mv.0;
            self.current = self.current.opposite();
            Ok(())
        }

        fn outcome(&self) -> Option<Outcome> {
            // Player who just moved reached 5 and wins
            (self.count >= 5).then(|| Outcome::Win(self.current.opposite()))
        }

        fn parse_move(&self, text: &str) -> Result<RaceMove> {
            text.trim()
                .parse()
                .map(RaceMove)
                .map_err(|_| ArenaError::InvalidMove(text.to_string()))
        }
    }

    type RaceMcts = Mcts<RaceState, RolloutEvaluator<ChaCha8Rng>, ChaCha8Rng>;

    fn create_mcts(seed: u64, simulations: usize) -> RaceMcts {
        let config = MctsConfig::with_simulations(simulations);
        let evaluator = RolloutEvaluator::new(ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)));
        Mcts::new(config, evaluator, ChaCha8Rng::seed_from_u64(seed))
    }

    #[test]
    fn test_mcts_basic() {
        let mut mcts = create_mcts(42, 100);
        let state = RaceState::new();

        let result = mcts.search(&state).unwrap();

        assert!(result.best_move == RaceMove(1) || result.best_move == RaceMove(2));
        assert_eq!(result.total_visits(), 100);
        assert!(result.root_value.get() >= -1.0 && result.root_value.get() <= 1.0);
    }

    #[test]
    fn test_mcts_finds_winning_move() {
        // From 3, adding 2 wins immediately
        let state = RaceState {
            count: 3,
            current: Side::First,
        };
        let mut mcts = create_mcts(5, 200);

        let result = mcts.search(&state).unwrap();
        assert_eq!(result.best_move, RaceMove(2));
        assert!(result.visits(RaceMove(2)) > result.visits(RaceMove(1)));
    }

    #[test]
    fn test_mcts_deterministic() {
        let run_search = |seed: u64| {
            let mut mcts = create_mcts(seed, 50);
            mcts.search(&RaceState::new()).unwrap()
        };

        let result1 = run_search(12345);
        let result2 = run_search(12345);

        // Same seed should produce same results
        assert_eq!(result1.best_move, result2.best_move);
        assert_eq!(result1.visit_counts, result2.visit_counts);
    }

    #[test]
    fn test_single_simulation_returns_legal_move() {
        let state = RaceState::new();
        let mut mcts = create_mcts(0, 1);

        let result = mcts.search(&state).unwrap();
        assert!(state.legal_moves().contains(&result.best_move));
        assert_eq!(result.total_visits(), 1);
        assert_eq!(result.tree_size, 2);
    }

    #[test]
    fn test_terminal_root_fails() {
        let state = RaceState {
            count: 5,
            current: Side::Second,
        };
        let mut mcts = create_mcts(0, 10);

        assert!(matches!(mcts.search(&state), Err(ArenaError::NoLegalMoves)));
    }

    #[test]
    fn test_invalid_config_fails() {
        let config = MctsConfig::with_simulations(0);
        let evaluator = RolloutEvaluator::new(ChaCha8Rng::seed_from_u64(0));
        let mut mcts = Mcts::new(config, evaluator, ChaCha8Rng::seed_from_u64(0));

        assert!(matches!(
            mcts.search(&RaceState::new()),
            Err(ArenaError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_root_state_untouched() {
        let state = RaceState::new();
        let mut mcts = create_mcts(3, 30);
        mcts.search(&state).unwrap();
        assert_eq!(state, RaceState::new());
    }

    #[test]
    fn test_backpropagation_signs() {
        // Root (First to move) -> child after +2 (Second to move), terminal win for First
        let state = RaceState {
            count: 3,
            current: Side::First,
        };
        let mcts = create_mcts(0, 1);
        let mut tree = Tree::new(RaceMcts::make_node(&state, None));
        let after = state.after(RaceMove(2)).unwrap();
        let child = RaceMcts::make_node(&after, Some(NodeId::ROOT));
        let child_id = tree.add_child(NodeId::ROOT, RaceMove(2), child);

        mcts.backpropagate(&mut tree, child_id, Outcome::Win(Side::First));

        assert_eq!(tree.root().stats.total_reward, 1.0);
        assert_eq!(tree.get(child_id).stats.total_reward, -1.0);
        assert_eq!(tree.root().stats.visit_count, 1);
        assert_eq!(tree.get(child_id).stats.visit_count, 1);
    }
}
