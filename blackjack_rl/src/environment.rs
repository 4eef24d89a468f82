use crate::hand::Hand;
use crate::DrawVariant;

use rand::Rng;

static RANK_TO_BLACKJACK_VALUE: [u8; 13] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 10, 10, 10];

/// Anything that can hand out card values from 1 to 10.
pub trait CardSource {
    fn draw(&mut self) -> u8;
}

/// A shoe with infinitely many decks: every draw is independent of the
/// previous ones, so no deck state has to be carried around.
#[derive(Debug, Clone)]
pub struct InfiniteShoe<R: Rng> {
    variant: DrawVariant,
    rng: R,
}

impl<R: Rng> InfiniteShoe<R> {
    pub fn new(variant: DrawVariant, rng: R) -> Self {
        Self { variant, rng }
    }

    /// The random source behind the shoe, shared with whoever needs
    /// randomness next to the draws.
    pub fn rng(&mut self) -> &mut R {
        &mut self.rng
    }
}

impl<R: Rng> CardSource for InfiniteShoe<R> {
    fn draw(&mut self) -> u8 {
        match self.variant {
            DrawVariant::UniformTen => self.rng.gen_range(1..=10),
            DrawVariant::ThirteenRanks => RANK_TO_BLACKJACK_VALUE[self.rng.gen_range(0..13)],
        }
    }
}

/// Deals a fresh two-card hand.
pub fn deal_hand<S: CardSource>(source: &mut S) -> Hand {
    let mut hand = Hand::new();
    hand.add_card(source.draw());
    hand.add_card(source.draw());
    hand
}

/// Plays the dealer hand with the fixed dealer strategy: hit below 17, stand
/// on 17 and above (soft 17 included).
pub fn dealer_turn<S: CardSource>(mut hand: Hand, source: &mut S) -> Hand {
    while hand.get_value() < 17 {
        hand.add_card(source.draw());
    }
    hand
}
