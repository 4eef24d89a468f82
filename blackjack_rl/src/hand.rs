/// A hand of cards reduced to what the value of the hand depends on.
///
/// `total` counts every ace as 1, and `has_ace` remembers whether any ace has
/// been received. Hands with more than one ace are still described by this
/// single flag, which is enough because at most one ace can ever count as 11.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hand {
    total: u8,
    has_ace: bool,
}

impl Hand {
    /// Returns the empty hand.
    pub fn new() -> Hand {
        Default::default()
    }

    /// Builds a hand directly from its raw total and ace flag.
    pub fn with_total(total: u8, has_ace: bool) -> Hand {
        Hand { total, has_ace }
    }

    /// Receives a card of given blackjack value (1 for an ace).
    ///
    /// Note that this method won't check if the hand busts.
    pub fn add_card(&mut self, card_value: u8) {
        self.total += card_value;
        if card_value == 1 {
            self.has_ace = true;
        }
    }

    /// Note that this method treats Ace as 1.
    pub fn get_total(&self) -> u8 {
        self.total
    }

    pub fn has_ace(&self) -> bool {
        self.has_ace
    }

    /// An ace is useable if counting it as 11 doesn't bust the hand.
    pub fn has_useable_ace(&self) -> bool {
        self.has_ace && self.total + 10 <= 21
    }

    pub fn get_value(&self) -> u8 {
        if self.has_useable_ace() {
            self.total + 10
        } else {
            self.total
        }
    }

    pub fn bust(&self) -> bool {
        self.get_value() > 21
    }
}

/// Returns the reward of a finished round (-1, 0 or 1). A busted player
/// always loses, even if the dealer busts too.
pub fn reward(player: &Hand, dealer: &Hand) -> i8 {
    let player_value = player.get_value();
    let dealer_value = dealer.get_value();
    if player_value > 21 {
        -1
    } else if dealer_value > 21 {
        1
    } else if player_value < dealer_value {
        -1
    } else if player_value == dealer_value {
        0
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand_of(cards: &[u8]) -> Hand {
        let mut hand = Hand::new();
        for &card in cards {
            hand.add_card(card);
        }
        hand
    }

    #[test]
    fn hands_without_ace_are_hard() {
        for first in 2..=10 {
            for second in 2..=10 {
                let hand = hand_of(&[first, second]);
                assert!(!hand.has_useable_ace());
                assert_eq!(hand.get_value(), hand.get_total());
            }
        }
    }

    #[test]
    fn single_ace_is_useable_up_to_eleven() {
        for total in 1..=11 {
            let hand = Hand::with_total(total, true);
            assert!(hand.has_useable_ace());
            assert_eq!(hand.get_value(), total + 10);
        }
        let hand = hand_of(&[1, 6, 9]);
        assert!(hand.has_ace());
        assert!(!hand.has_useable_ace());
        assert_eq!(hand.get_value(), 16);
    }

    #[test]
    fn two_aces_count_as_twelve() {
        let hand = hand_of(&[1, 1]);
        assert_eq!(hand.get_total(), 2);
        assert_eq!(hand.get_value(), 12);
    }

    #[test]
    fn total_may_exceed_twenty_one() {
        let hand = hand_of(&[10, 10, 5]);
        assert_eq!(hand.get_value(), 25);
        assert!(hand.bust());
    }

    #[test]
    fn reward_checks_busts_before_comparing() {
        assert_eq!(reward(&hand_of(&[10, 10, 2]), &hand_of(&[10, 10])), -1);
        assert_eq!(reward(&hand_of(&[10, 10, 2]), &hand_of(&[10, 6, 8])), -1);
        assert_eq!(reward(&hand_of(&[10, 10]), &hand_of(&[10, 3, 10])), 1);
        assert_eq!(reward(&hand_of(&[10, 9]), &hand_of(&[1, 8])), 0);
        assert_eq!(reward(&hand_of(&[10, 10]), &hand_of(&[10, 8])), 1);
        assert_eq!(reward(&hand_of(&[10, 7]), &hand_of(&[10, 8])), -1);
    }
}
