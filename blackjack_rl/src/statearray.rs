use std::ops::{Index, IndexMut, RangeInclusive};

use rand::Rng;
use strum::IntoEnumIterator;

use crate::hand::Hand;
use crate::Action;

pub const MIN_HARD_VALUE: u8 = 2;
pub const MIN_SOFT_VALUE: u8 = 12;
pub const MAX_VALUE: u8 = 21;

const NUMBER_OF_VALUES: usize = (MAX_VALUE - MIN_HARD_VALUE + 1) as usize;
const NUMBER_OF_SLOTS: usize = 10 * NUMBER_OF_VALUES * 2 * 2;

/// What the learner sees of a round: the dealer's up card, the value of the
/// player's hand and whether that value counts an ace as 11.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct State {
    pub dealer_up_card: u8,
    pub player_value: u8,
    pub useable_ace: bool,
}

impl State {
    pub fn new(dealer_up_card: u8, player_value: u8, useable_ace: bool) -> Self {
        State {
            dealer_up_card,
            player_value,
            useable_ace,
        }
    }

    pub fn from_hand(dealer_up_card: u8, player: &Hand) -> Self {
        State {
            dealer_up_card,
            player_value: player.get_value(),
            useable_ace: player.has_useable_ace(),
        }
    }

    /// Rebuilds a dealer hand and a player hand consistent with this state, so
    /// that an episode can start from it. The dealer hand holds only the up
    /// card. The state must satisfy [`State::is_valid`].
    pub fn to_hands(&self) -> (Hand, Hand) {
        debug_assert!(
            self.is_valid(),
            "State {:?} is outside the training domain",
            self
        );
        let total = if self.useable_ace {
            self.player_value - 10
        } else {
            self.player_value
        };
        let player = Hand::with_total(total, self.useable_ace);
        let mut dealer = Hand::new();
        dealer.add_card(self.dealer_up_card);
        (dealer, player)
    }

    /// Whether this state belongs to the enumerated training domain.
    pub fn is_valid(&self) -> bool {
        (1..=10).contains(&self.dealer_up_card)
            && player_values(self.useable_ace).contains(&self.player_value)
    }

    fn slot(&self, action: Action) -> usize {
        if !self.is_valid() {
            panic!("State {:?} is outside the training domain", self);
        }
        let dealer = (self.dealer_up_card - 1) as usize;
        let value = (self.player_value - MIN_HARD_VALUE) as usize;
        (((dealer * NUMBER_OF_VALUES + value) * 2 + self.useable_ace as usize) * 2)
            + action as usize
    }
}

/// Player values that are enumerated for the given ace slice.
pub fn player_values(useable_ace: bool) -> RangeInclusive<u8> {
    if useable_ace {
        MIN_SOFT_VALUE..=MAX_VALUE
    } else {
        MIN_HARD_VALUE..=MAX_VALUE
    }
}

/// Every state the learner can start an episode from. Any state reached by
/// hitting without busting is also in here.
#[derive(Debug, Clone)]
pub struct StateSpace {
    states: Vec<State>,
}

impl StateSpace {
    pub fn new() -> Self {
        let mut states = Vec::with_capacity(NUMBER_OF_SLOTS / 2);
        for dealer_up_card in 1..=10 {
            for useable_ace in [false, true] {
                for player_value in player_values(useable_ace) {
                    states.push(State::new(dealer_up_card, player_value, useable_ace));
                }
            }
        }
        StateSpace { states }
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> State {
        self.states[rng.gen_range(0..self.states.len())]
    }

    /// Iterates all (state, action) pairs of the domain.
    pub fn pairs(&self) -> impl Iterator<Item = (State, Action)> + '_ {
        self.states
            .iter()
            .flat_map(|&state| Action::iter().map(move |action| (state, action)))
    }
}

impl Default for StateSpace {
    fn default() -> Self {
        Self::new()
    }
}

/// This struct provides a convenient way to use a (State, Action) pair as the
/// index of an array. Indexing with a state outside the domain panics.
#[derive(Debug, Clone, PartialEq)]
pub struct StateActionArray<T> {
    data: Vec<T>,
}

impl<T: Clone + Default> StateActionArray<T> {
    pub fn new() -> Self {
        StateActionArray {
            data: vec![Default::default(); NUMBER_OF_SLOTS],
        }
    }
}

impl<T: Clone + Default> Default for StateActionArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<(State, Action)> for StateActionArray<T> {
    type Output = T;
    fn index(&self, (state, action): (State, Action)) -> &Self::Output {
        &self.data[state.slot(action)]
    }
}

impl<T> IndexMut<(State, Action)> for StateActionArray<T> {
    fn index_mut(&mut self, (state, action): (State, Action)) -> &mut Self::Output {
        &mut self.data[state.slot(action)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn state_space_has_hard_and_soft_slices() {
        let space = StateSpace::new();
        assert_eq!(space.len(), 10 * (20 + 10));
        let unique: HashSet<State> = space.states().iter().copied().collect();
        assert_eq!(unique.len(), space.len());
        assert!(space.states().iter().all(State::is_valid));
        assert!(!State::new(5, 11, true).is_valid());
        assert!(!State::new(0, 15, false).is_valid());
        assert!(!State::new(5, 22, false).is_valid());
    }

    #[test]
    fn every_pair_has_its_own_slot() {
        let space = StateSpace::new();
        let mut array: StateActionArray<u32> = StateActionArray::new();
        for (state, action) in space.pairs() {
            array[(state, action)] += 1;
        }
        for (state, action) in space.pairs() {
            assert_eq!(array[(state, action)], 1);
        }
    }

    #[test]
    #[should_panic]
    fn indexing_outside_the_domain_panics() {
        let array: StateActionArray<f64> = StateActionArray::new();
        let _ = array[(State::new(3, 25, false), Action::Hit)];
    }

    #[test]
    fn hands_round_trip_through_state() {
        for &state in StateSpace::new().states() {
            let (dealer, player) = state.to_hands();
            assert_eq!(dealer.get_total(), state.dealer_up_card);
            assert_eq!(State::from_hand(state.dealer_up_card, &player), state);
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "outside the training domain")]
    fn rebuilding_a_soft_state_below_twelve_panics() {
        let _ = State::new(5, 8, true).to_hands();
    }

    #[test]
    fn soft_state_rebuilds_ace_hand() {
        let (dealer, player) = State::new(1, 18, true).to_hands();
        assert_eq!(player.get_total(), 8);
        assert!(player.has_useable_ace());
        assert_eq!(dealer.get_value(), 11);
    }

    #[test]
    fn successors_stay_in_the_domain() {
        for &state in StateSpace::new().states() {
            for card in 1..=10 {
                let (_, mut player) = state.to_hands();
                player.add_card(card);
                if !player.bust() {
                    assert!(State::from_hand(state.dealer_up_card, &player).is_valid());
                }
            }
        }
    }
}
