extern crate lookahead_solver;
use lookahead_solver::*;
use ndarray::prelude::*;

const NUM_PRIVATE_HANDS: usize = 6;

fn preflop_tree(first_player: usize) -> PublicTree {
    let config = TreeConfig {
        board: Vec::new(),
        first_player,
        starting_pot: 1.0,
        bet_size: 2.0,
        max_bets: 2,
    };
    build_limit_tree(&config).unwrap()
}

fn lookahead(tree: PublicTree) -> Lookahead<LeducEvaluator> {
    let config = LookaheadConfig {
        skip_iters: 200,
        iters: 500,
        ..Default::default()
    };
    Lookahead::new(tree, LeducEvaluator::new(), config).unwrap()
}

fn uniform_range() -> Vec<f32> {
    vec![1.0 / NUM_PRIVATE_HANDS as f32; NUM_PRIVATE_HANDS]
}

/// Returns the opponent's range as given, ignoring the achieved values.
struct FixedRange(Array1<f32>);

impl RangeReconstruction for FixedRange {
    fn compute_opponent_range(&mut self, _current_opponent_cfvs: ArrayView1<f32>) -> Array1<f32> {
        self.0.clone()
    }
}

#[test]
fn leduc_preflop() {
    let mut lookahead = lookahead(preflop_tree(P1));
    lookahead.resolve_first_node(&uniform_range(), &uniform_range());
    assert!(lookahead.is_solved());

    // showdowns before the board is dealt average over the board card
    let equity = lookahead.terminal_equity(&[]).unwrap();
    let ace = card_from_str("As").unwrap() as usize;
    let king = card_from_str("Ks").unwrap() as usize;
    assert!((equity.call_matrix()[[ace, king]] - 0.5).abs() < 1e-6);

    let result = lookahead.get_results();
    assert_eq!(result.strategy.dim(), (2, NUM_PRIVATE_HANDS));
    for &sum in result.strategy.sum_axis(Axis(0)).iter() {
        assert!((sum - 1.0).abs() < 1e-5);
    }

    // zero-sum at the root
    let both = result.root_cfvs_both_players.unwrap();
    let range = Array1::from(uniform_range());
    let total = both.row(P1).dot(&range) + both.row(P2).dot(&range);
    assert!(total.abs() < 1e-4);

    // an ace is worth more than a queen to the opponent
    let queen = card_from_str("Qs").unwrap() as usize;
    let root_cfvs = result.root_cfvs.unwrap();
    assert!(root_cfvs[ace] > root_cfvs[queen]);
}

#[test]
fn leduc_fold_and_call_values() {
    let mut lookahead = lookahead(preflop_tree(P1));
    lookahead.resolve_first_node(&uniform_range(), &uniform_range());
    let tree = lookahead.tree();
    let equity = lookahead.terminal_equity(&[]).unwrap();

    // P1 checks, P2 bets, P1 folds: P2 is the non-folding player
    let after_check = tree.root().children()[0];
    let facing_bet = tree.node(after_check).children()[1];
    let fold = tree.child(facing_bet, FOLD);
    assert_eq!(fold.current_player(), P2);

    let expected = fold.ranges().row(P1).dot(equity.fold_matrix()) * fold.pot();
    for (&v, &e) in fold.cf_values().row(P2).iter().zip(expected.iter()) {
        assert!((v - e).abs() < 1e-6);
    }

    // P1 calls
    let call = tree.child(facing_bet, 1);
    let expected = equity.call_matrix().dot(&call.ranges().row(P2)) * call.pot();
    for (&v, &e) in call.cf_values().row(P1).iter().zip(expected.iter()) {
        assert!((v - e).abs() < 1e-6);
    }
    let expected = -call.ranges().row(P1).dot(equity.call_matrix()) * call.pot();
    for (&v, &e) in call.cf_values().row(P2).iter().zip(expected.iter()) {
        assert!((v - e).abs() < 1e-6);
    }
}

#[test]
fn leduc_second_player_first() {
    let mut first = lookahead(preflop_tree(P1));
    let mut second = lookahead(preflop_tree(P2));
    first.resolve_first_node(&uniform_range(), &uniform_range());
    second.resolve_first_node(&uniform_range(), &uniform_range());

    let first = first.get_results();
    let second = second.get_results();
    assert_eq!(first.strategy, second.strategy);
    assert_eq!(first.root_cfvs, second.root_cfvs);

    let first_both = first.root_cfvs_both_players.unwrap();
    let second_both = second.root_cfvs_both_players.unwrap();
    assert_eq!(first_both.row(P1), second_both.row(P2));
    assert_eq!(first_both.row(P2), second_both.row(P1));
}

#[test]
fn leduc_resolve_with_fixed_range() {
    let opponent_range: Array1<f32> = Array1::from(vec![0.1, 0.1, 0.2, 0.2, 0.2, 0.2]);

    let mut solved = lookahead(preflop_tree(P1));
    solved.resolve_first_node(&uniform_range(), &opponent_range);
    let expected = solved.get_results();

    let mut resolved = lookahead(preflop_tree(P1));
    resolved.resolve_with(&uniform_range(), FixedRange(opponent_range.clone()));
    let result = resolved.get_results();

    assert!(resolved.is_resolving());
    assert!(result.root_cfvs.is_none());
    assert_eq!(result.strategy, expected.strategy);
    assert_eq!(result.achieved_cfvs, expected.achieved_cfvs);
    assert_eq!(result.children_cfvs, expected.children_cfvs);
}

#[test]
fn leduc_river_resolve() {
    let config = TreeConfig {
        board: board_from_str("Ah").unwrap(),
        ..Default::default()
    };
    let tree = build_limit_tree(&config).unwrap();
    let mut lookahead = lookahead(tree);

    let range: Vec<f32> = vec![0.2, 0.2, 0.2, 0.2, 0.2, 0.0];
    lookahead.resolve_first_node(&range, &range);
    let target = lookahead.get_results().root_cfvs.unwrap();

    lookahead.resolve(&range, &target);
    let result = lookahead.get_results();

    let ah = card_from_str("Ah").unwrap() as usize;
    let opponent_range = lookahead.tree().root().ranges().row(P2);
    assert_eq!(opponent_range[ah], 0.0);
    assert!(result.achieved_cfvs.iter().all(|v| v.is_finite()));
    for &sum in result.strategy.sum_axis(Axis(0)).iter() {
        assert!((sum - 1.0).abs() < 1e-5);
    }
}
