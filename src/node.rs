use crate::card::*;
use ndarray::prelude::*;

/// Index of the first player.
pub const P1: usize = 0;

/// Index of the second player.
pub const P2: usize = 1;

/// Action slot reserved for the fold action when it is present.
pub const FOLD: usize = 0;

/// Type of a node in the public tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NodeType {
    /// A decision node of `current_player`.
    #[default]
    Inner,

    /// A terminal node reached by a fold.
    TerminalFold,

    /// A terminal node reached by a call (showdown).
    TerminalCall,
}

/// A node of the public tree.
///
/// Nodes live in a [`PublicTree`] arena and refer to each other by index. Besides the public
/// game state, each node holds the numeric state of the CFR iteration; every matrix is indexed by
/// `[player or action, private hand]`.
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub(crate) node_type: NodeType,
    pub(crate) board: Vec<Card>,
    pub(crate) current_player: usize,
    pub(crate) pot: f32,
    pub(crate) fold_mask: bool,
    pub(crate) parent: Option<usize>,
    pub(crate) child_id: usize,
    pub(crate) children: Vec<usize>,

    // [players x hands]
    pub(crate) ranges: Array2<f32>,
    pub(crate) cf_values: Array2<f32>,

    // [actions x hands]
    pub(crate) regrets: Array2<f32>,
    pub(crate) current_strategy: Array2<f32>,
    pub(crate) cf_values_allactions: [Array2<f32>; 2],
    pub(crate) children_ranges_absolute: [Array2<f32>; 2],
}

impl Node {
    fn with_type(node_type: NodeType, current_player: usize, pot: f32, board: &[Card]) -> Self {
        let mut board = board.to_vec();
        board.sort_unstable();
        Self {
            node_type,
            board,
            current_player,
            pot,
            fold_mask: true,
            ..Default::default()
        }
    }

    /// Creates a decision node of `current_player`.
    #[inline]
    pub fn inner(current_player: usize, pot: f32, board: &[Card]) -> Self {
        Self::with_type(NodeType::Inner, current_player, pot, board)
    }

    /// Creates a terminal node where `folding_player` folded.
    ///
    /// `pot` is the amount each player has put in when the fold happened; the folding player
    /// loses it and the other player wins it.
    #[inline]
    pub fn fold(folding_player: usize, pot: f32, board: &[Card]) -> Self {
        Self::with_type(NodeType::TerminalFold, folding_player ^ 1, pot, board)
    }

    /// Creates a terminal showdown node. `pot` is the amount each player has put in.
    #[inline]
    pub fn call(pot: f32, board: &[Card]) -> Self {
        Self::with_type(NodeType::TerminalCall, P1, pot, board)
    }

    /// Sets whether the fold branch leading to this node is legal.
    #[inline]
    pub fn with_fold_mask(mut self, fold_mask: bool) -> Self {
        self.fold_mask = fold_mask;
        self
    }

    /// Returns the type of the node.
    #[inline]
    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// Returns whether the node is terminal.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.node_type != NodeType::Inner
    }

    /// Returns the sorted board cards.
    #[inline]
    pub fn board(&self) -> &[Card] {
        &self.board
    }

    /// Returns the player to act. At a fold node, this is the player who did not fold.
    #[inline]
    pub fn current_player(&self) -> usize {
        self.current_player
    }

    /// Returns the pot size.
    #[inline]
    pub fn pot(&self) -> f32 {
        self.pot
    }

    /// Returns `false` if this node is an illegal fold branch.
    #[inline]
    pub fn fold_mask(&self) -> bool {
        self.fold_mask
    }

    /// Returns the index of the parent node.
    #[inline]
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Returns the action slot of this node among its siblings.
    #[inline]
    pub fn child_id(&self) -> usize {
        self.child_id
    }

    /// Returns the indices of the children.
    #[inline]
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    /// Returns the number of actions.
    #[inline]
    pub fn num_actions(&self) -> usize {
        self.children.len()
    }

    /// Returns the ranges `[players x hands]` that reached this node in the last iteration.
    #[inline]
    pub fn ranges(&self) -> &Array2<f32> {
        &self.ranges
    }

    /// Returns the cumulative regrets `[actions x hands]`.
    #[inline]
    pub fn regrets(&self) -> &Array2<f32> {
        &self.regrets
    }

    /// Returns the strategy `[actions x hands]` used in the last iteration.
    #[inline]
    pub fn current_strategy(&self) -> &Array2<f32> {
        &self.current_strategy
    }

    /// Returns the counterfactual values `[players x hands]` of the last iteration.
    #[inline]
    pub fn cf_values(&self) -> &Array2<f32> {
        &self.cf_values
    }

    /// Returns the per-action counterfactual values `[actions x hands]` of the given player.
    ///
    /// For the acting player, the values are replaced by the instantaneous regrets once the
    /// backward pass has visited the node.
    #[inline]
    pub fn cf_values_allactions(&self, player: usize) -> &Array2<f32> {
        &self.cf_values_allactions[player]
    }

    /// Returns the ranges `[actions x hands]` of the given player passed to the children.
    #[inline]
    pub fn children_ranges_absolute(&self, player: usize) -> &Array2<f32> {
        &self.children_ranges_absolute[player]
    }

    /// Clears the numeric state. Regrets stay empty until the first forward pass.
    pub(crate) fn reset_state(&mut self, num_hands: usize) {
        let num_actions = self.num_actions();
        self.ranges = Array2::zeros((2, num_hands));
        self.cf_values = Array2::zeros((2, num_hands));
        self.regrets = Array2::zeros((0, 0));
        self.current_strategy = Array2::zeros((num_actions, num_hands));
        self.cf_values_allactions = [
            Array2::zeros((num_actions, num_hands)),
            Array2::zeros((num_actions, num_hands)),
        ];
        self.children_ranges_absolute = [
            Array2::zeros((num_actions, num_hands)),
            Array2::zeros((num_actions, num_hands)),
        ];
    }
}

/// An arena of public tree nodes.
///
/// The arena owns every node; nodes refer to their parent and children by index. A parent is
/// always stored before its children, and the root has index `0`.
#[derive(Debug, Clone)]
pub struct PublicTree {
    nodes: Vec<Node>,
}

impl PublicTree {
    /// Creates a tree consisting of the root only.
    #[inline]
    pub fn new(root: Node) -> Self {
        let mut root = root;
        root.parent = None;
        root.child_id = 0;
        root.children.clear();
        Self { nodes: vec![root] }
    }

    /// Appends `node` as the next child of `parent` and returns its index.
    ///
    /// # Panics
    /// Panics if `parent` is out of range.
    pub fn add_child(&mut self, parent: usize, mut node: Node) -> usize {
        let index = self.nodes.len();
        let siblings = &mut self.nodes[parent].children;
        node.parent = Some(parent);
        node.child_id = siblings.len();
        node.children.clear();
        siblings.push(index);
        self.nodes.push(node);
        index
    }

    /// Returns the root node.
    #[inline]
    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    /// Returns the node of the given index.
    #[inline]
    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, index: usize) -> &mut Node {
        &mut self.nodes[index]
    }

    /// Returns the number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree has no nodes (never the case for a constructed tree).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the child node of `index` taking the action `action`.
    #[inline]
    pub fn child(&self, index: usize, action: usize) -> &Node {
        &self.nodes[self.nodes[index].children[action]]
    }

    /// Checks the structural invariants the solver relies on.
    pub fn validate(&self) -> Result<(), String> {
        if self.root().is_terminal() {
            return Err("Root node must not be terminal".to_string());
        }

        for (index, node) in self.nodes.iter().enumerate() {
            if node.current_player > P2 {
                return Err(format!(
                    "Node {index}: invalid player {}",
                    node.current_player
                ));
            }

            if !node.pot.is_finite() || node.pot < 0.0 {
                return Err(format!("Node {index}: invalid pot {}", node.pot));
            }

            if node.is_terminal() && !node.children.is_empty() {
                return Err(format!("Node {index}: terminal node has children"));
            }

            if !node.is_terminal() && node.children.is_empty() {
                return Err(format!("Node {index}: decision node has no children"));
            }

            if !node.fold_mask && node.node_type != NodeType::TerminalFold {
                return Err(format!(
                    "Node {index}: only a terminal fold node can be masked"
                ));
            }

            if node.node_type == NodeType::TerminalFold && node.child_id != FOLD {
                return Err(format!(
                    "Node {index}: fold must be the action at slot {FOLD}"
                ));
            }

            if let Some(parent) = node.parent {
                let parent_board = &self.nodes[parent].board;
                if !parent_board.iter().all(|card| node.board.contains(card)) {
                    return Err(format!("Node {index}: board does not extend the parent's"));
                }
            }
        }

        Ok(())
    }

    /// Returns the node indices in pre-order (parents before children, siblings in slot order).
    pub(crate) fn preorder(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![0];
        while let Some(index) = stack.pop() {
            order.push(index);
            stack.extend(self.nodes[index].children.iter().rev());
        }
        order
    }

    /// Clears the numeric state of every node.
    pub(crate) fn reset_state(&mut self, num_hands: usize) {
        self.nodes
            .iter_mut()
            .for_each(|node| node.reset_state(num_hands));
    }

    /// Returns mutable references to the parent of `index` and to the node itself.
    ///
    /// # Panics
    /// Panics if `index` is the root.
    #[inline]
    pub(crate) fn parent_and_node_mut(&mut self, index: usize) -> (&mut Node, &mut Node) {
        let parent = self.nodes[index].parent.expect("root has no parent");
        let (head, tail) = self.nodes.split_at_mut(index);
        (&mut head[parent], &mut tail[0])
    }

    /// Returns the distinct boards of the terminal nodes.
    pub(crate) fn terminal_boards(&self) -> Vec<Vec<Card>> {
        let mut boards = self
            .nodes
            .iter()
            .filter(|node| node.is_terminal())
            .map(|node| node.board.clone())
            .collect::<Vec<_>>();
        boards.sort_unstable();
        boards.dedup();
        boards
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_tree() -> PublicTree {
        let mut tree = PublicTree::new(Node::inner(P1, 1.0, &[]));
        tree.add_child(0, Node::fold(P1, 1.0, &[]).with_fold_mask(false));
        let check = tree.add_child(0, Node::inner(P2, 1.0, &[]));
        tree.add_child(check, Node::call(1.0, &[]));
        tree.add_child(check, Node::call(2.0, &[]));
        tree
    }

    #[test]
    fn arena_links() {
        let tree = small_tree();
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.root().children(), &[1, 2]);
        assert_eq!(tree.node(2).parent(), Some(0));
        assert_eq!(tree.node(2).child_id(), 1);
        assert_eq!(tree.node(4).child_id(), 1);
        assert_eq!(tree.child(2, 1).pot(), 2.0);
        assert_eq!(tree.node(1).current_player(), P2);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn preorder_visits_parents_first() {
        let tree = small_tree();
        assert_eq!(tree.preorder(), vec![0, 1, 2, 3, 4]);

        let mut tree = PublicTree::new(Node::inner(P1, 1.0, &[]));
        let a = tree.add_child(0, Node::inner(P2, 1.0, &[]));
        let b = tree.add_child(0, Node::call(1.0, &[]));
        let c = tree.add_child(a, Node::call(1.0, &[]));
        assert_eq!(tree.preorder(), vec![0, a, c, b]);
    }

    #[test]
    fn validation_errors() {
        let mut tree = PublicTree::new(Node::inner(P1, 1.0, &[]));
        assert!(tree.validate().is_err());

        tree.add_child(0, Node::call(1.0, &[]));
        tree.add_child(0, Node::fold(P1, 1.0, &[]));
        assert!(tree.validate().is_err());

        let mut tree = PublicTree::new(Node::inner(P1, 1.0, &[]));
        tree.add_child(0, Node::call(1.0, &[]).with_fold_mask(false));
        assert!(tree.validate().is_err());

        let mut tree = PublicTree::new(Node::inner(P1, 1.0, &[3]));
        tree.add_child(0, Node::call(1.0, &[]));
        assert!(tree.validate().is_err());

        let tree = PublicTree::new(Node::call(1.0, &[]));
        assert!(tree.validate().is_err());
    }

    #[test]
    fn reset_state_shapes() {
        let mut tree = small_tree();
        tree.reset_state(3);
        let root = tree.root();
        assert_eq!(root.ranges().dim(), (2, 3));
        assert_eq!(root.current_strategy().dim(), (2, 3));
        assert_eq!(root.cf_values_allactions(P2).dim(), (2, 3));
        assert!(root.regrets().is_empty());
        assert_eq!(tree.node(3).current_strategy().dim(), (0, 3));
        assert_eq!(tree.terminal_boards(), vec![Vec::<Card>::new()]);
    }
}
