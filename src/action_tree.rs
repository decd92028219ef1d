use crate::card::*;
use crate::node::*;

/// A struct containing the configuration of a single limit betting round.
///
/// The first player may check or bet; facing a bet, a player may fold, call, or raise while the
/// number of bets and raises is below `max_bets`. A call (or check-check) ends the round in a
/// showdown. The pot of each node is the contribution of one player once bets are matched.
///
/// # Examples
/// ```
/// use lookahead_solver::*;
///
/// let tree_config = TreeConfig {
///     board: board_from_str("Kh").unwrap(),
///     first_player: P1,
///     starting_pot: 1.0,
///     bet_size: 4.0,
///     max_bets: 2,
/// };
///
/// let tree = build_limit_tree(&tree_config).unwrap();
/// assert_eq!(tree.root().num_actions(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TreeConfig {
    /// Board cards of the round (empty before the board is dealt).
    pub board: Vec<Card>,

    /// Player who acts first.
    pub first_player: usize,

    /// Contribution of each player at the start of the round. Must be greater than `0.0`.
    pub starting_pot: f32,

    /// Fixed size of a bet or raise. Must be greater than `0.0`.
    pub bet_size: f32,

    /// Maximum number of bets and raises in the round.
    pub max_bets: usize,
}

impl Default for TreeConfig {
    #[inline]
    fn default() -> Self {
        Self {
            board: Vec::new(),
            first_player: P1,
            starting_pot: 1.0,
            bet_size: 2.0,
            max_bets: 2,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct BuildTreeInfo {
    player: usize,
    bet_amount: [f32; 2],
    num_bets: usize,
    checked: bool,
}

/// Builds the public tree of a single limit betting round.
///
/// Actions are ordered `[check, bet]` when no bet is pending and `[fold, call, raise]` when
/// facing a bet, so the fold action always sits at slot [`FOLD`].
pub fn build_limit_tree(config: &TreeConfig) -> Result<PublicTree, String> {
    check_config(config)?;

    let info = BuildTreeInfo {
        player: config.first_player,
        bet_amount: [config.starting_pot; 2],
        num_bets: 0,
        checked: false,
    };

    let root = Node::inner(info.player, config.starting_pot, &config.board);
    let mut tree = PublicTree::new(root);
    build_tree_recursive(&mut tree, 0, config, info);
    tree.validate()?;
    Ok(tree)
}

/// Checks the configuration.
fn check_config(config: &TreeConfig) -> Result<(), String> {
    if config.first_player > P2 {
        return Err(format!("Invalid first player: {}", config.first_player));
    }

    if !(config.starting_pot > 0.0 && config.starting_pot.is_finite()) {
        return Err(format!(
            "Starting pot must be positive: {}",
            config.starting_pot
        ));
    }

    if !(config.bet_size > 0.0 && config.bet_size.is_finite()) {
        return Err(format!("Bet size must be positive: {}", config.bet_size));
    }

    let mut board = config.board.clone();
    board.sort_unstable();
    board.dedup();
    if board.len() != config.board.len() {
        return Err(format!("Board has duplicate cards: {:?}", config.board));
    }

    for &card in &config.board {
        card_to_string(card)?;
    }

    Ok(())
}

/// Recursively appends the children of the decision node `index`.
fn build_tree_recursive(
    tree: &mut PublicTree,
    index: usize,
    config: &TreeConfig,
    info: BuildTreeInfo,
) {
    let player = info.player;
    let opponent = player ^ 1;
    let player_amount = info.bet_amount[player];
    let opponent_amount = info.bet_amount[opponent];
    let board = &config.board;

    if opponent_amount > player_amount {
        // fold: the folding player loses its own contribution
        tree.add_child(index, Node::fold(player, player_amount, board));

        // call
        tree.add_child(index, Node::call(opponent_amount, board));

        // raise
        if info.num_bets < config.max_bets {
            let mut bet_amount = info.bet_amount;
            bet_amount[player] = opponent_amount + config.bet_size;
            let child = tree.add_child(index, Node::inner(opponent, opponent_amount, board));
            let next = BuildTreeInfo {
                player: opponent,
                bet_amount,
                num_bets: info.num_bets + 1,
                checked: info.checked,
            };
            build_tree_recursive(tree, child, config, next);
        }
    } else {
        // check
        if info.checked {
            tree.add_child(index, Node::call(player_amount, board));
        } else {
            let child = tree.add_child(index, Node::inner(opponent, player_amount, board));
            let next = BuildTreeInfo {
                player: opponent,
                checked: true,
                ..info
            };
            build_tree_recursive(tree, child, config, next);
        }

        // bet
        if info.num_bets < config.max_bets {
            let mut bet_amount = info.bet_amount;
            bet_amount[player] = player_amount + config.bet_size;
            let child = tree.add_child(index, Node::inner(opponent, player_amount, board));
            let next = BuildTreeInfo {
                player: opponent,
                bet_amount,
                num_bets: info.num_bets + 1,
                checked: info.checked,
            };
            build_tree_recursive(tree, child, config, next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leduc_round_shape() {
        let tree = build_limit_tree(&TreeConfig::default()).unwrap();

        // P1: check, bet
        let root = tree.root();
        assert_eq!(root.current_player(), P1);
        assert_eq!(root.num_actions(), 2);

        // P2 after check: check (showdown), bet
        let after_check = tree.child(0, 0);
        assert_eq!(after_check.current_player(), P2);
        assert_eq!(after_check.num_actions(), 2);
        assert_eq!(tree.node(after_check.children()[0]).node_type(), NodeType::TerminalCall);
        assert_eq!(tree.node(after_check.children()[0]).pot(), 1.0);

        // P2 facing bet: fold, call, raise
        let index = root.children()[1];
        let facing_bet = tree.node(index);
        assert_eq!(facing_bet.num_actions(), 3);
        let fold = tree.child(index, FOLD);
        assert_eq!(fold.node_type(), NodeType::TerminalFold);
        assert_eq!(fold.current_player(), P1);
        assert_eq!(fold.pot(), 1.0);
        assert_eq!(tree.child(index, 1).pot(), 3.0);

        // P1 facing raise: fold, call (cap reached)
        let index = facing_bet.children()[2];
        assert_eq!(tree.node(index).num_actions(), 2);
        assert_eq!(tree.child(index, FOLD).pot(), 3.0);
        assert_eq!(tree.child(index, 1).pot(), 5.0);

        assert_eq!(tree.len(), 15);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn no_betting_without_raises() {
        let config = TreeConfig {
            max_bets: 0,
            ..Default::default()
        };
        let tree = build_limit_tree(&config).unwrap();
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.child(1, 0).node_type(), NodeType::TerminalCall);
    }

    #[test]
    fn invalid_configs() {
        let invalid = [
            TreeConfig {
                first_player: 2,
                ..Default::default()
            },
            TreeConfig {
                starting_pot: 0.0,
                ..Default::default()
            },
            TreeConfig {
                bet_size: f32::NAN,
                ..Default::default()
            },
            TreeConfig {
                board: vec![3, 3],
                ..Default::default()
            },
            TreeConfig {
                board: vec![200],
                ..Default::default()
            },
        ];

        for config in &invalid {
            assert!(build_limit_tree(config).is_err());
        }
    }
}
