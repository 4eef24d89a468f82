use rand::Rng;
use tracing::{debug, info};

use crate::environment::{dealer_turn, CardSource, InfiniteShoe};
use crate::hand::reward;
use crate::policy::PolicyTable;
use crate::{
    Action, ConfigError, QInitialization, State, StateActionArray, StateSpace, TrainingConfig,
    SEED_MAGNITUDE,
};

pub type QTable = StateActionArray<f64>;

/// Builds the Q-table an untrained learner starts from.
pub fn initial_q_table(initialization: QInitialization, space: &StateSpace) -> QTable {
    let mut q_table = QTable::new();
    if initialization == QInitialization::Zero {
        return q_table;
    }

    for &state in space.states() {
        let (stand, hit) = if state.player_value < 20 {
            (-SEED_MAGNITUDE, SEED_MAGNITUDE)
        } else {
            (SEED_MAGNITUDE, -SEED_MAGNITUDE)
        };
        q_table[(state, Action::Stand)] = stand;
        q_table[(state, Action::Hit)] = hit;
    }
    q_table
}

/// Returns the larger of the two action values of a state.
pub fn max_value(q_table: &QTable, state: State) -> f64 {
    q_table[(state, Action::Hit)].max(q_table[(state, Action::Stand)])
}

/// Hitting is only preferred when it is strictly better than standing.
pub fn best_action(q_table: &QTable, state: State) -> Action {
    if q_table[(state, Action::Hit)] > q_table[(state, Action::Stand)] {
        Action::Hit
    } else {
        Action::Stand
    }
}

/// Off-policy tabular Q-learning over simulated hands, with a step size of
/// `alpha / count` for every (state, action) pair.
pub struct QLearner<R: Rng> {
    config: TrainingConfig,
    space: StateSpace,
    q_table: QTable,
    counts: StateActionArray<u32>,
    shoe: InfiniteShoe<R>,
    episodes_done: u64,
}

impl<R: Rng> QLearner<R> {
    pub fn new(config: TrainingConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let space = StateSpace::new();
        let q_table = initial_q_table(config.initialization, &space);
        Ok(QLearner {
            config,
            space,
            q_table,
            counts: StateActionArray::new(),
            shoe: InfiniteShoe::new(config.draw_variant, rng),
            episodes_done: 0,
        })
    }

    pub fn state_space(&self) -> &StateSpace {
        &self.space
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn visit_count(&self, state: State, action: Action) -> u32 {
        self.counts[(state, action)]
    }

    pub fn get_episodes_done(&self) -> u64 {
        self.episodes_done
    }

    /// Runs the configured number of episodes.
    pub fn train(&mut self) {
        let episodes = self.config.episodes;
        info!(
            episodes,
            alpha = self.config.alpha,
            discount = self.config.discount,
            epsilon = self.config.epsilon,
            draw_variant = %self.config.draw_variant,
            initialization = %self.config.initialization,
            "Q-learning started"
        );

        let report_every = (episodes / 10).max(1);
        for episode in 1..=episodes {
            self.run_episode();
            if episode % report_every == 0 {
                debug!(episode, episodes, "Q-learning progress");
            }
        }

        info!(episodes = self.episodes_done, "Q-learning finished");
    }

    /// Simulates one hand from a random state until the player stands or
    /// busts, updating the Q-values of every pair acted on.
    pub fn run_episode(&mut self) {
        let mut state = self.space.sample(self.shoe.rng());
        let (dealer_hand, mut player_hand) = state.to_hands();

        loop {
            let action = self.select_action(state);
            let pair = (state, action);
            self.counts[pair] += 1;
            let step_size = self.config.alpha / self.counts[pair] as f64;

            if action.is_hit() {
                player_hand.add_card(self.shoe.draw());
                if player_hand.bust() {
                    self.q_table[pair] += step_size * (-1.0 - self.q_table[pair]);
                    break;
                }

                let next_state = State::from_hand(state.dealer_up_card, &player_hand);
                let target = self.config.discount * max_value(&self.q_table, next_state);
                self.q_table[pair] += step_size * (target - self.q_table[pair]);
                state = next_state;
            } else {
                let dealer_hand = dealer_turn(dealer_hand, &mut self.shoe);
                let reward = reward(&player_hand, &dealer_hand) as f64;
                self.q_table[pair] += step_size * (reward - self.q_table[pair]);
                break;
            }
        }

        self.episodes_done += 1;
    }

    /// Epsilon-greedy action selection over the current Q-values.
    fn select_action(&mut self, state: State) -> Action {
        let rng = self.shoe.rng();
        if rng.gen::<f64>() < self.config.epsilon {
            Action::from(rng.gen::<bool>())
        } else {
            best_action(&self.q_table, state)
        }
    }

    pub fn policy(&self) -> PolicyTable {
        PolicyTable::from_q_table(&self.q_table, &self.space)
    }
}

/// Trains with a thread-local random source and returns the extracted
/// policy.
pub fn train(config: &TrainingConfig) -> Result<PolicyTable, ConfigError> {
    train_with_rng(config, rand::thread_rng())
}

/// Same as `train`, but reproducible when `rng` is seeded.
pub fn train_with_rng<R: Rng>(config: &TrainingConfig, rng: R) -> Result<PolicyTable, ConfigError> {
    let mut learner = QLearner::new(*config, rng)?;
    learner.train();
    Ok(learner.policy())
}
