extern crate lookahead_solver;
use lookahead_solver::*;

const NUM_PRIVATE_HANDS: usize = 3;

const JACK: usize = 0;
const QUEEN: usize = 1;
const KING: usize = 2;

const CHECK: usize = 0;
const BET: usize = 1;

/// Kuhn poker: three cards, one private card per player, no board.
struct KuhnEvaluator {
    hands: [[Card; 1]; NUM_PRIVATE_HANDS],
}

impl KuhnEvaluator {
    fn new() -> Self {
        Self {
            hands: [[0], [1], [2]],
        }
    }
}

impl HandEvaluator for KuhnEvaluator {
    fn num_hands(&self) -> usize {
        NUM_PRIVATE_HANDS
    }

    fn deck_size(&self) -> usize {
        NUM_PRIVATE_HANDS
    }

    fn final_board_size(&self) -> usize {
        0
    }

    fn hand_cards(&self, hand: usize) -> &[Card] {
        &self.hands[hand]
    }

    fn evaluate(&self, cards: &[Card]) -> Option<u16> {
        match cards {
            &[card] if (card as usize) < NUM_PRIVATE_HANDS => Some(card as u16 + 1),
            _ => None,
        }
    }
}

fn kuhn_tree() -> PublicTree {
    let config = TreeConfig {
        board: Vec::new(),
        first_player: P1,
        starting_pot: 1.0,
        bet_size: 1.0,
        max_bets: 1,
    };
    build_limit_tree(&config).unwrap()
}

fn kuhn_lookahead() -> Lookahead<KuhnEvaluator> {
    let config = LookaheadConfig {
        skip_iters: 500,
        iters: 1000,
        ..Default::default()
    };
    Lookahead::new(kuhn_tree(), KuhnEvaluator::new(), config).unwrap()
}

fn uniform_range() -> Vec<f32> {
    vec![1.0 / 3.0; NUM_PRIVATE_HANDS]
}

#[test]
fn kuhn_tree_shape() {
    let tree = kuhn_tree();
    assert_eq!(tree.len(), 9);
    assert_eq!(tree.root().num_actions(), 2);
    assert_eq!(tree.child(0, BET).num_actions(), 2);
    assert_eq!(tree.node(tree.root().children()[BET]).children().len(), 2);
}

#[test]
fn kuhn_first_node() {
    let mut lookahead = kuhn_lookahead();
    lookahead.resolve_first_node(&uniform_range(), &uniform_range());
    let result = lookahead.get_results();

    // the first player never bets the queen, and bluffs the jack a third as often as it bets
    // the king
    let bet = result.strategy.row(BET);
    assert!(bet[QUEEN] < 1e-2);
    assert!((bet[KING] - 3.0 * bet[JACK]).abs() < 2e-2);

    // game value of the first player is -1/18
    let both = result.root_cfvs_both_players.unwrap();
    let ev = both.row(P1).iter().map(|&v| 1.5 * v / 3.0).sum::<f32>();
    assert!((ev + 1.0 / 18.0).abs() < 1e-2);

    for &sum in result.strategy.sum_axis(ndarray::Axis(0)).iter() {
        assert!((sum - 1.0).abs() < 1e-5);
    }
}

#[test]
fn kuhn_children_values() {
    let mut lookahead = kuhn_lookahead();
    lookahead.resolve_first_node(&uniform_range(), &uniform_range());
    let result = lookahead.get_results();
    let root_cfvs = result.root_cfvs.as_ref().unwrap();

    for hand in 0..NUM_PRIVATE_HANDS {
        let value = (0..2)
            .map(|action| result.children_cfvs[[action, hand]] * result.action_mass[action])
            .sum::<f32>();
        assert!((value - root_cfvs[hand]).abs() < 1e-4);
    }

    let total_mass = result.action_mass.sum();
    assert!((total_mass - 1.0).abs() < 1e-5);
    assert_eq!(result.children_cfvs.dim(), (2, NUM_PRIVATE_HANDS));
    assert!(result.children_cfvs.row(CHECK).iter().all(|v| v.is_finite()));
}

#[test]
fn kuhn_resolve() {
    let mut lookahead = kuhn_lookahead();
    lookahead.resolve_first_node(&uniform_range(), &uniform_range());
    let target = lookahead.get_results().root_cfvs.unwrap();

    lookahead.resolve(&uniform_range(), &target);
    let result = lookahead.get_results();
    assert!(lookahead.is_resolving());

    // the reconstructed opponent does not do better than the guaranteed values
    for hand in 0..NUM_PRIVATE_HANDS {
        assert!((result.achieved_cfvs[hand] - target[hand]).abs() < 2e-2);
    }
    assert!(result.strategy[[BET, QUEEN]] < 2e-2);
}

#[test]
fn kuhn_deterministic() {
    let mut recursive = Lookahead::new(
        kuhn_tree(),
        KuhnEvaluator::new(),
        LookaheadConfig {
            traversal: TraversalOrder::Recursive,
            ..Default::default()
        },
    )
    .unwrap();
    let mut flattened = kuhn_lookahead();

    recursive.resolve_first_node(&uniform_range(), &uniform_range());
    flattened.resolve_first_node(&uniform_range(), &uniform_range());
    let first = flattened.get_results();
    assert_eq!(recursive.get_results(), first);

    flattened.resolve_first_node(&uniform_range(), &uniform_range());
    assert_eq!(flattened.get_results(), first);
}
