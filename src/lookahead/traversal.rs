use super::*;

impl<E: HandEvaluator> Lookahead<E> {
    /// Runs all iterations and normalizes the averages.
    pub(super) fn compute(&mut self, mut reconstruction: Option<&mut dyn RangeReconstruction>) {
        let config = self.config;
        log::debug!(
            "solving lookahead: {} nodes, {} iterations ({} skipped), {:?} traversal, resolving = {}",
            self.tree.len(),
            config.iters,
            config.skip_iters,
            config.traversal,
            self.reconstruction
        );

        for iter in 0..config.iters {
            if let Some(gadget) = reconstruction.as_deref_mut() {
                self.set_opponent_starting_range(gadget);
            }

            match config.traversal {
                TraversalOrder::Recursive => self.cfrs_iter_dfs(0),
                TraversalOrder::Flattened => self.cfrs_iter_flat(),
            }

            if iter >= config.skip_iters {
                self.update_average_strategy();
                self.update_average_cfvs();
            }

            if iter % 100 == 0 {
                let root_cfvs = self.tree.root().cf_values.row(P2);
                log::trace!(
                    "iteration {} / {}: mean opponent cfv = {:.6}",
                    iter,
                    config.iters,
                    root_cfvs.mean().unwrap_or(0.0)
                );
            }
        }

        self.normalize_average_strategy();
        self.normalize_average_cfvs();
        self.state = State::Solved;

        log::debug!("lookahead solved after {} iterations", config.iters);
    }

    /// Overwrites the opponent's root range with the reconstructed one, computed from the
    /// opponent's root values of the previous iteration.
    fn set_opponent_starting_range(&mut self, reconstruction: &mut dyn RangeReconstruction) {
        let range = reconstruction.compute_opponent_range(self.tree.root().cf_values.row(P2));
        self.tree.node_mut(0).ranges.row_mut(P2).assign(&range);
    }

    fn cfrs_iter_dfs(&mut self, index: usize) {
        self.forward(index);
        for action in 0..self.tree.node(index).num_actions() {
            let child = self.tree.node(index).children[action];
            self.cfrs_iter_dfs(child);
        }
        self.backward(index);
    }

    fn cfrs_iter_flat(&mut self) {
        for i in 0..self.flat_nodes.len() {
            let index = self.flat_nodes[i];
            self.forward(index);
        }
        for i in (0..self.flat_nodes.len()).rev() {
            let index = self.flat_nodes[i];
            self.backward(index);
        }
    }

    /// Internal index of `player`: the player acting at the root is always `0`.
    #[inline]
    fn internal_player(&self, player: usize) -> usize {
        player ^ self.players_swap as usize
    }

    /// Top-down step: receives the ranges from the parent, then either evaluates the terminal
    /// values or computes the strategy and the ranges passed to the children.
    fn forward(&mut self, index: usize) {
        if index != 0 {
            let (parent, node) = self.tree.parent_and_node_mut(index);
            if node.fold_mask {
                for player in 0..2 {
                    node.ranges
                        .row_mut(player)
                        .assign(&parent.children_ranges_absolute[player].row(node.child_id));
                }
            }
        }

        if self.tree.node(index).is_terminal() {
            self.fill_terminal_values(index);
        } else {
            self.fill_current_strategy(index);
            self.fill_children_ranges(index);
        }
    }

    /// Bottom-up step: aggregates the values of the children and updates the regrets, then passes
    /// the values to the parent.
    fn backward(&mut self, index: usize) {
        if !self.tree.node(index).is_terminal() {
            self.fill_cf_values(index);
        }

        if index != 0 {
            let (parent, node) = self.tree.parent_and_node_mut(index);
            for player in 0..2 {
                parent.cf_values_allactions[player]
                    .row_mut(node.child_id)
                    .assign(&node.cf_values.row(player));
            }
        }
    }

    fn fill_terminal_values(&mut self, index: usize) {
        let player = self.internal_player(self.tree.node(index).current_player);
        let node = self.tree.node_mut(index);
        let equity = &self.terminal_equities[&node.board];

        match node.node_type {
            NodeType::TerminalFold => {
                // unreachable fold
                if !node.fold_mask {
                    return;
                }
                // the player to act at a fold node is the one who did not fold
                equity.tree_node_fold_value(&node.ranges, &mut node.cf_values, player ^ 1);
            }
            NodeType::TerminalCall => {
                equity.tree_node_call_value(&node.ranges, &mut node.cf_values);
            }
            NodeType::Inner => unreachable!(),
        }

        node.cf_values *= node.pot;
    }

    fn fill_current_strategy(&mut self, index: usize) {
        let fold_mask = self.tree.child(index, FOLD).fold_mask;
        let num_hands = self.num_hands;
        let regret_epsilon = self.config.regret_epsilon;
        let node = self.tree.node_mut(index);

        if node.regrets.is_empty() {
            node.regrets =
                initial_regrets(node.num_actions(), num_hands, fold_mask, regret_epsilon);
        }

        compute_current_strategy(&node.regrets, &mut node.current_strategy);
    }

    fn fill_children_ranges(&mut self, index: usize) {
        let player = self.internal_player(self.tree.node(index).current_player);
        let opponent = player ^ 1;
        let node = self.tree.node_mut(index);

        // the acting player splits its range by the strategy
        node.children_ranges_absolute[player].assign(&node.current_strategy);
        node.children_ranges_absolute[player] *= &node.ranges.row(player);

        // the opponent's range is passed unchanged
        node.children_ranges_absolute[opponent].assign(&node.ranges.row(opponent));
    }

    fn fill_cf_values(&mut self, index: usize) {
        let player = self.internal_player(self.tree.node(index).current_player);
        let opponent = player ^ 1;
        let fold_mask = self.tree.child(index, FOLD).fold_mask;
        let regret_epsilon = self.config.regret_epsilon;
        let node = self.tree.node_mut(index);

        let opponent_cfvs = node.cf_values_allactions[opponent].sum_axis(Axis(0));
        node.cf_values.row_mut(opponent).assign(&opponent_cfvs);

        let weighted = &node.current_strategy * &node.cf_values_allactions[player];
        node.cf_values
            .row_mut(player)
            .assign(&weighted.sum_axis(Axis(0)));

        // instantaneous regrets, computed in place
        node.cf_values_allactions[player] -= &node.cf_values.row(player);
        update_regrets(
            &mut node.regrets,
            &node.cf_values_allactions[player],
            fold_mask,
            regret_epsilon,
        );
    }

    fn update_average_strategy(&mut self) {
        let root = self.tree.root();
        if self.average_strategy.is_empty() {
            self.average_strategy = root.current_strategy.clone();
        } else {
            self.average_strategy += &root.current_strategy;
        }
    }

    fn update_average_cfvs(&mut self) {
        let root = self.tree.root();

        if self.average_cfvs.is_empty() {
            self.average_cfvs = root.cf_values.clone();
            self.average_children_cfvs = Array2::zeros((root.num_actions(), self.num_hands));
        } else {
            self.average_cfvs += &root.cf_values;
        }

        for (action, &child) in root.children.iter().enumerate() {
            let mut row = self.average_children_cfvs.row_mut(action);
            row += &self.tree.node(child).cf_values.row(P2);
        }
    }

    /// Divides each hand's accumulated strategy by its sum; degenerate hands follow the configured
    /// policy.
    pub(super) fn normalize_average_strategy(&mut self) {
        let policy = self.config.degenerate_strategy;
        let legal = self.root_legal_actions();
        let fold_legal = legal[FOLD] && self.tree.child(0, FOLD).node_type == NodeType::TerminalFold;
        let num_legal = legal.iter().filter(|&&l| l).count() as f32;
        let sums = self.average_strategy.sum_axis(Axis(0));

        for (mut column, &sum) in self.average_strategy.columns_mut().into_iter().zip(sums.iter()) {
            if sum > 0.0 && sum.is_finite() {
                column /= sum;
                continue;
            }

            match policy {
                DegenerateStrategy::AlwaysFold if fold_legal => {
                    column.fill(0.0);
                    column[FOLD] = 1.0;
                }
                DegenerateStrategy::AlwaysFold | DegenerateStrategy::Uniform => {
                    for (p, &l) in column.iter_mut().zip(legal.iter()) {
                        *p = if l { 1.0 / num_legal } else { 0.0 };
                    }
                }
                DegenerateStrategy::Unnormalized => {}
            }
        }
    }

    fn normalize_average_cfvs(&mut self) {
        let num_averaged = (self.config.iters - self.config.skip_iters) as f32;
        self.average_cfvs /= num_averaged;
    }

    /// Returns which actions at the root are legal.
    fn root_legal_actions(&self) -> Vec<bool> {
        let fold_mask = self.tree.child(0, FOLD).fold_mask;
        (0..self.tree.root().num_actions())
            .map(|action| action != FOLD || fold_mask)
            .collect()
    }
}
