use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::environment::{deal_hand, dealer_turn, CardSource, InfiniteShoe};
use crate::hand::{reward, Hand};
use crate::qlearning::{best_action, QTable};
use crate::statearray::player_values;
use crate::{Action, DomainError, DrawVariant, State, StateSpace};

/// Hit/stand decisions for one ace slice. Row `i` holds the player value
/// `min_player_value + i`, column `j` the dealer up card `j + 1`. `true`
/// means hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySlice {
    min_player_value: u8,
    rows: Vec<[bool; 10]>,
}

impl PolicySlice {
    fn from_q_table(q_table: &QTable, space: &StateSpace, useable_ace: bool) -> Self {
        let values = player_values(useable_ace);
        let mut rows = vec![[false; 10]; values.len()];
        for state in space.states().iter().filter(|s| s.useable_ace == useable_ace) {
            let row = (state.player_value - values.start()) as usize;
            let col = (state.dealer_up_card - 1) as usize;
            rows[row][col] = best_action(q_table, *state).is_hit();
        }
        PolicySlice {
            min_player_value: *values.start(),
            rows,
        }
    }

    /// Accepts `unchecked` only if it has one row per player value of the
    /// ace slice, starting at the slice's lowest value.
    fn checked(unchecked: UncheckedPolicySlice, useable_ace: bool) -> Result<Self, DomainError> {
        let values = player_values(useable_ace);
        if unchecked.min_player_value != *values.start() || unchecked.rows.len() != values.len() {
            return Err(DomainError::MalformedPolicy { useable_ace });
        }
        Ok(PolicySlice {
            min_player_value: unchecked.min_player_value,
            rows: unchecked.rows,
        })
    }

    pub fn get_min_player_value(&self) -> u8 {
        self.min_player_value
    }

    pub fn get_max_player_value(&self) -> u8 {
        self.min_player_value + self.rows.len() as u8 - 1
    }

    /// Returns None when the pair is not covered by this slice.
    pub fn get(&self, dealer_up_card: u8, player_value: u8) -> Option<bool> {
        if !(1..=10).contains(&dealer_up_card) || player_value < self.min_player_value {
            return None;
        }
        let row = self.rows.get((player_value - self.min_player_value) as usize)?;
        Some(row[(dealer_up_card - 1) as usize])
    }
}

/// The deterministic strategy extracted from a Q-table, split into the
/// useable-ace slice and the no-useable-ace slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedPolicyTable")]
pub struct PolicyTable {
    soft: PolicySlice,
    hard: PolicySlice,
}

#[derive(Deserialize)]
struct UncheckedPolicySlice {
    min_player_value: u8,
    rows: Vec<[bool; 10]>,
}

#[derive(Deserialize)]
struct UncheckedPolicyTable {
    soft: UncheckedPolicySlice,
    hard: UncheckedPolicySlice,
}

impl TryFrom<UncheckedPolicyTable> for PolicyTable {
    type Error = DomainError;

    fn try_from(unchecked: UncheckedPolicyTable) -> Result<Self, Self::Error> {
        Ok(PolicyTable {
            soft: PolicySlice::checked(unchecked.soft, true)?,
            hard: PolicySlice::checked(unchecked.hard, false)?,
        })
    }
}

impl PolicyTable {
    /// Picks the greedy action of every enumerated state; ties go to stand.
    pub fn from_q_table(q_table: &QTable, space: &StateSpace) -> Self {
        PolicyTable {
            soft: PolicySlice::from_q_table(q_table, space, true),
            hard: PolicySlice::from_q_table(q_table, space, false),
        }
    }

    pub fn slice(&self, useable_ace: bool) -> &PolicySlice {
        if useable_ace {
            &self.soft
        } else {
            &self.hard
        }
    }

    /// Whether the player should hit. Busted hands and other states that were
    /// never trained are rejected instead of guessed.
    pub fn recommend(
        &self,
        dealer_up_card: u8,
        player_value: u8,
        useable_ace: bool,
    ) -> Result<bool, DomainError> {
        self.slice(useable_ace)
            .get(dealer_up_card, player_value)
            .ok_or(DomainError::OutOfDomain {
                dealer_up_card,
                player_value,
                useable_ace,
            })
    }

    pub fn decision(&self, state: State) -> Result<Action, DomainError> {
        self.recommend(state.dealer_up_card, state.player_value, state.useable_ace)
            .map(Action::from)
    }
}

/// Plays `games` fresh hands following `policy` and returns the mean reward.
pub fn evaluate_policy<R: Rng>(
    policy: &PolicyTable,
    games: u64,
    variant: DrawVariant,
    rng: R,
) -> Result<f64, DomainError> {
    if games == 0 {
        return Ok(0.0);
    }

    let mut shoe = InfiniteShoe::new(variant, rng);
    let mut total_reward: i64 = 0;
    for _ in 0..games {
        let mut player = deal_hand(&mut shoe);
        let dealer_up_card = shoe.draw();
        while policy.decision(State::from_hand(dealer_up_card, &player))?.is_hit() {
            player.add_card(shoe.draw());
            if player.bust() {
                break;
            }
        }

        let dealer = if player.bust() {
            Hand::new()
        } else {
            let mut dealer = Hand::new();
            dealer.add_card(dealer_up_card);
            dealer_turn(dealer, &mut shoe)
        };
        total_reward += reward(&player, &dealer) as i64;
    }

    Ok(total_reward as f64 / games as f64)
}
