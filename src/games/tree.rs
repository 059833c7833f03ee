//! Games given as an explicit node list.
//!
//! Handy for small hand-built trees: add nodes bottom-up, then point the
//! root at the top node.
//!
//! ```
//! use cfr_engine::games::tree::TreeGame;
//!
//! let mut game = TreeGame::new(2);
//! let win = game.add_terminal(vec![1.0, -1.0]);
//! let lose = game.add_terminal(vec![-1.0, 1.0]);
//! let root = game.add_decision(0, "only", vec![win, lose]);
//! game.set_root(root);
//! assert_eq!(game.len(), 3);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cfr::game::{Action, Game, InfoState, Turn};

/// Index of a node in a [`TreeGame`].
pub type NodeId = usize;

/// A node of an explicit game tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
    /// Game over with one return per player.
    Terminal {
        /// Utility of each player.
        returns: Vec<f64>,
    },
    /// Nature picks a child with the given probability.
    Chance {
        /// `(probability, child)` pairs.
        outcomes: Vec<(f64, NodeId)>,
    },
    /// A player picks a child.
    Decision {
        /// Acting player.
        player: usize,
        /// Information-set key shared by indistinguishable nodes.
        info_key: String,
        /// Children in action order.
        children: Vec<NodeId>,
    },
}

/// Action taken at a tree node: the index of the child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Branch(pub usize);

impl Action for Branch {
    fn to_string(&self) -> String {
        self.0.to_string()
    }
}

/// Position in a [`TreeGame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeState(pub NodeId);

crate::impl_game_state!(TreeState);

/// Information state of a tree decision node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TreeInfoState(pub String);

impl InfoState for TreeInfoState {
    fn key(&self) -> String {
        self.0.clone()
    }
}

impl fmt::Display for TreeInfoState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An extensive-form game stored as a flat list of nodes.
#[derive(Debug, Clone)]
pub struct TreeGame {
    num_players: usize,
    nodes: Vec<TreeNode>,
    root: NodeId,
}

impl TreeGame {
    /// Create an empty tree for `num_players` players.
    pub fn new(num_players: usize) -> Self {
        Self {
            num_players,
            nodes: Vec::new(),
            root: 0,
        }
    }

    fn push(&mut self, node: TreeNode) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Add a terminal node.
    pub fn add_terminal(&mut self, returns: Vec<f64>) -> NodeId {
        self.push(TreeNode::Terminal { returns })
    }

    /// Add a chance node over existing children.
    pub fn add_chance(&mut self, outcomes: Vec<(f64, NodeId)>) -> NodeId {
        self.push(TreeNode::Chance { outcomes })
    }

    /// Add a decision node over existing children.
    pub fn add_decision(
        &mut self,
        player: usize,
        info_key: impl Into<String>,
        children: Vec<NodeId>,
    ) -> NodeId {
        self.push(TreeNode::Decision {
            player,
            info_key: info_key.into(),
            children,
        })
    }

    /// Set the node play starts from.
    pub fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no node was added yet.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Borrow a node.
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id]
    }
}

impl Game for TreeGame {
    type State = TreeState;
    type Action = Branch;
    type InfoState = TreeInfoState;

    fn num_players(&self) -> usize {
        self.num_players
    }

    fn initial_state(&self) -> Self::State {
        TreeState(self.root)
    }

    fn current_player(&self, state: &Self::State) -> Turn {
        match self.node(state.0) {
            TreeNode::Terminal { .. } => Turn::Terminal,
            TreeNode::Chance { .. } => Turn::Chance,
            TreeNode::Decision { player, .. } => Turn::Player(*player),
        }
    }

    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action> {
        match self.node(state.0) {
            TreeNode::Decision { children, .. } => (0..children.len()).map(Branch).collect(),
            _ => Vec::new(),
        }
    }

    fn chance_outcomes(&self, state: &Self::State) -> Vec<(Self::Action, f64)> {
        match self.node(state.0) {
            TreeNode::Chance { outcomes } => outcomes
                .iter()
                .enumerate()
                .map(|(i, &(prob, _))| (Branch(i), prob))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn apply_action(&self, state: &Self::State, action: &Self::Action) -> Self::State {
        match self.node(state.0) {
            TreeNode::Decision { children, .. } => TreeState(children[action.0]),
            TreeNode::Chance { outcomes } => TreeState(outcomes[action.0].1),
            TreeNode::Terminal { .. } => panic!("apply_action called on a terminal node"),
        }
    }

    fn returns(&self, state: &Self::State) -> Vec<f64> {
        match self.node(state.0) {
            TreeNode::Terminal { returns } => returns.clone(),
            _ => panic!("returns called on a non-terminal node"),
        }
    }

    fn info_state(&self, state: &Self::State, _player: usize) -> Self::InfoState {
        match self.node(state.0) {
            TreeNode::Decision { info_key, .. } => TreeInfoState(info_key.clone()),
            _ => panic!("info_state called on a non-decision node"),
        }
    }
}
