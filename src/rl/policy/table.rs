//! Tabular Q-learning shared by the whole swarm.

use std::collections::HashMap;

use rand::{Rng, RngCore};

use super::trait_::Policy;
use crate::rl::config::AgentParams;
use crate::rl::observation::ObservationKey;
use crate::world::Action;

/// Shared Q-table mapping `(observation, action)` to a learned value.
///
/// Unvisited pairs read as `0.0`. Rows are created on first write and hold
/// one value per action, indexed by [`Action::index`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SharedPolicy {
    table: HashMap<ObservationKey, [f64; Action::COUNT]>,
}

impl SharedPolicy {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Learned value of `(key, action)`, `0.0` when never written.
    pub fn value(&self, key: &ObservationKey, action: Action) -> f64 {
        self.table
            .get(key)
            .map_or(0.0, |row| row[action.index()])
    }

    /// Highest value over all actions for `key`.
    pub fn max_value(&self, key: &ObservationKey) -> f64 {
        match self.table.get(key) {
            Some(row) => row.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            None => 0.0,
        }
    }

    /// Every action attaining the maximum value for `key`, in [`Action::ALL`] order.
    ///
    /// Never empty: an unseen key ties all four actions at zero.
    pub fn best_actions(&self, key: &ObservationKey) -> Vec<Action> {
        let best = self.max_value(key);
        Action::ALL
            .into_iter()
            .filter(|&a| self.value(key, a) == best)
            .collect()
    }

    /// ε-greedy choice.
    ///
    /// Draws `u ~ U[0, 1)`. If `u < exploration_rate` a uniformly random
    /// action is returned, otherwise a uniform pick among
    /// [`SharedPolicy::best_actions`].
    pub fn choose_action<R: Rng + ?Sized>(
        &self,
        key: &ObservationKey,
        exploration_rate: f64,
        rng: &mut R,
    ) -> Action {
        if rng.gen::<f64>() < exploration_rate {
            return Action::ALL[rng.gen_range(0..Action::COUNT)];
        }
        let best = self.best_actions(key);
        best[rng.gen_range(0..best.len())]
    }

    /// One Q-learning update:
    ///
    /// `Q(s, a) ← Q(s, a) + α · (r + γ · max_a' Q(s', a') − Q(s, a))`
    ///
    /// With `next == None` the bootstrap term is zero. α and γ come from the
    /// acting agent's `params`. Returns the new value.
    pub fn update(
        &mut self,
        key: &ObservationKey,
        action: Action,
        reward: f64,
        next: Option<&ObservationKey>,
        params: &AgentParams,
    ) -> f64 {
        let max_next = next.map_or(0.0, |k| self.max_value(k));
        let current = self.value(key, action);
        let target = reward + params.discount_factor * max_next;
        let updated = current + params.learning_rate * (target - current);
        self.set(key.clone(), action, updated);
        updated
    }

    /// Overwrites the value of `(key, action)`.
    pub fn set(&mut self, key: ObservationKey, action: Action, value: f64) {
        self.table.entry(key).or_insert([0.0; Action::COUNT])[action.index()] = value;
    }

    /// Number of observation keys with a stored row.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns true if nothing has been learned yet.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Every stored `(key, action, value)` triple, sorted by key then action.
    pub fn entries(&self) -> Vec<(ObservationKey, Action, f64)> {
        let mut keys: Vec<&ObservationKey> = self.table.keys().collect();
        keys.sort();
        keys.into_iter()
            .flat_map(|key| {
                let row = self.table[key];
                Action::ALL
                    .into_iter()
                    .map(move |a| (key.clone(), a, row[a.index()]))
            })
            .collect()
    }

    /// Copies every row of `other` into this table, replacing rows with the same key.
    pub fn merge(&mut self, other: SharedPolicy) {
        self.table.extend(other.table);
    }
}

impl Policy for SharedPolicy {
    fn choose_action(
        &self,
        key: &ObservationKey,
        exploration_rate: f64,
        rng: &mut dyn RngCore,
    ) -> Action {
        SharedPolicy::choose_action(self, key, exploration_rate, rng)
    }

    fn update(
        &mut self,
        key: &ObservationKey,
        action: Action,
        reward: f64,
        next: Option<&ObservationKey>,
        params: &AgentParams,
    ) -> f64 {
        SharedPolicy::update(self, key, action, reward, next, params)
    }

    fn name(&self) -> &str {
        "SharedQTable"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn key(codes: &str) -> ObservationKey {
        codes.parse().unwrap()
    }

    fn params(alpha: f64, gamma: f64) -> AgentParams {
        AgentParams {
            learning_rate: alpha,
            discount_factor: gamma,
            ..AgentParams::default()
        }
    }

    #[test]
    fn unseen_pairs_read_zero() {
        let policy = SharedPolicy::new();
        assert_eq!(policy.value(&key("e@e"), Action::Left), 0.0);
        assert_eq!(policy.best_actions(&key("e@e")), Action::ALL.to_vec());
        assert!(policy.is_empty());
    }

    #[test]
    fn update_without_next_state() {
        let mut policy = SharedPolicy::new();
        let k = key("eee.@....");
        let v = policy.update(&k, Action::Up, 9.0, None, &params(0.9, 0.99));
        assert!((v - 8.1).abs() < 1e-12);
        assert_eq!(policy.value(&k, Action::Up), v);
        assert_eq!(policy.len(), 1);
    }

    #[test]
    fn update_bootstraps_from_next_state() {
        let mut policy = SharedPolicy::new();
        let s = key("#@#");
        let s2 = key("e@#");
        policy.set(s2.clone(), Action::Right, 10.0);
        policy.set(s2.clone(), Action::Left, -4.0);
        // 0 + 0.5 * (1 + 0.5 * 10 - 0) = 3
        let v = policy.update(&s, Action::Down, 1.0, Some(&s2), &params(0.5, 0.5));
        assert_eq!(v, 3.0);
    }

    #[test]
    fn negative_row_max_is_not_clamped_to_zero() {
        let mut policy = SharedPolicy::new();
        let k = key("#@#");
        for a in Action::ALL {
            policy.set(k.clone(), a, -2.0);
        }
        policy.set(k.clone(), Action::Left, -1.0);
        assert_eq!(policy.max_value(&k), -1.0);
        assert_eq!(policy.best_actions(&k), vec![Action::Left]);
    }

    #[test]
    fn greedy_choice_picks_unique_best() {
        let mut policy = SharedPolicy::new();
        let k = key("m@e");
        policy.set(k.clone(), Action::Right, 1.0);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            assert_eq!(policy.choose_action(&k, 0.0, &mut rng), Action::Right);
        }
    }

    #[test]
    fn greedy_ties_cover_every_tied_action() {
        let mut policy = SharedPolicy::new();
        let k = key("m@e");
        policy.set(k.clone(), Action::Up, 5.0);
        policy.set(k.clone(), Action::Left, 5.0);
        let mut rng = StdRng::seed_from_u64(11);
        let picks: Vec<_> = (0..200)
            .map(|_| policy.choose_action(&k, 0.0, &mut rng))
            .collect();
        assert!(picks.iter().all(|a| matches!(a, Action::Up | Action::Left)));
        assert!(picks.contains(&Action::Up));
        assert!(picks.contains(&Action::Left));
    }

    #[test]
    fn full_exploration_reaches_every_action() {
        let mut policy = SharedPolicy::new();
        let k = key("@");
        policy.set(k.clone(), Action::Down, 100.0);
        let mut rng = StdRng::seed_from_u64(5);
        let picks: Vec<_> = (0..400)
            .map(|_| policy.choose_action(&k, 1.0, &mut rng))
            .collect();
        for a in Action::ALL {
            assert!(picks.contains(&a), "{a} never explored");
        }
    }

    #[test]
    fn same_seed_same_choices() {
        let policy = SharedPolicy::new();
        let k = key("@");
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        let xs: Vec<_> = (0..32).map(|_| policy.choose_action(&k, 0.3, &mut a)).collect();
        let ys: Vec<_> = (0..32).map(|_| policy.choose_action(&k, 0.3, &mut b)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn entries_are_sorted() {
        let mut policy = SharedPolicy::new();
        policy.set(key("e@"), Action::Right, 1.0);
        policy.set(key("#@"), Action::Up, 2.0);
        let entries = policy.entries();
        assert_eq!(entries.len(), 8);
        assert_eq!(entries[0], (key("#@"), Action::Up, 2.0));
        assert_eq!(entries[7], (key("e@"), Action::Right, 1.0));
    }

    #[test]
    fn merge_overwrites_matching_rows() {
        let mut base = SharedPolicy::new();
        base.set(key("#@"), Action::Up, 1.0);
        base.set(key("e@"), Action::Up, 1.0);
        let mut incoming = SharedPolicy::new();
        incoming.set(key("e@"), Action::Down, 7.0);

        base.merge(incoming);
        assert_eq!(base.len(), 2);
        assert_eq!(base.value(&key("#@"), Action::Up), 1.0);
        assert_eq!(base.value(&key("e@"), Action::Down), 7.0);
        assert_eq!(base.value(&key("e@"), Action::Up), 0.0);
    }

    #[test]
    fn trait_object_dispatch() {
        let mut policy = SharedPolicy::new();
        let k = key("@");
        let dynamic: &mut dyn Policy = &mut policy;
        dynamic.update(&k, Action::Up, 2.0, None, &params(1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(dynamic.choose_action(&k, 0.0, &mut rng), Action::Up);
        assert_eq!(dynamic.name(), "SharedQTable");
    }
}
