//! Text grids of the learned values and the extracted policy, one block per
//! ace slice. Rows go from 21 down, columns are the dealer up card.

use std::fmt;

use crate::policy::PolicyTable;
use crate::qlearning::{max_value, QTable};
use crate::statearray::player_values;
use crate::{Action, State};

const DEALER_CARD_LABELS: [&str; 10] = ["A", "2", "3", "4", "5", "6", "7", "8", "9", "T"];

fn slice_title(useable_ace: bool) -> &'static str {
    if useable_ace {
        "Useable ace"
    } else {
        "No useable ace"
    }
}

fn write_grid<F>(f: &mut fmt::Formatter<'_>, useable_ace: bool, width: usize, cell: F) -> fmt::Result
where
    F: Fn(State) -> String,
{
    for label in DEALER_CARD_LABELS {
        write!(f, "{:>width$} ", label, width = width)?;
    }
    writeln!(f, "| dealer")?;
    for player_value in player_values(useable_ace).rev() {
        for dealer_up_card in 1..=10 {
            let state = State::new(dealer_up_card, player_value, useable_ace);
            write!(f, "{:>width$} ", cell(state), width = width)?;
        }
        writeln!(f, "| {}", player_value)?;
    }
    Ok(())
}

/// Q(s, a) for both actions.
pub struct QTableReport<'a>(pub &'a QTable);

impl fmt::Display for QTableReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "---- Q(s,a) ----")?;
        for useable_ace in [true, false] {
            writeln!(f, "{}", slice_title(useable_ace))?;
            for action in [Action::Stand, Action::Hit] {
                writeln!(f, "Values for {}:", action)?;
                write_grid(f, useable_ace, 5, |state| format!("{:5.2}", self.0[(state, action)]))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// V(s) = max_a Q(s, a).
pub struct ValueReport<'a>(pub &'a QTable);

impl fmt::Display for ValueReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "---- V(s) ----")?;
        for useable_ace in [true, false] {
            writeln!(f, "{}", slice_title(useable_ace))?;
            write_grid(f, useable_ace, 5, |state| format!("{:5.2}", max_value(self.0, state)))?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// `X` where the policy hits, blank where it stands.
pub struct PolicyReport<'a>(pub &'a PolicyTable);

impl fmt::Display for PolicyReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "---- Policy ----")?;
        for useable_ace in [true, false] {
            writeln!(f, "{}", slice_title(useable_ace))?;
            let slice = self.0.slice(useable_ace);
            write_grid(f, useable_ace, 1, |state| {
                match slice.get(state.dealer_up_card, state.player_value) {
                    Some(true) => String::from("X"),
                    Some(false) => String::from(" "),
                    None => String::from("?"),
                }
            })?;
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qlearning::initial_q_table;
    use crate::{QInitialization, StateSpace};

    #[test]
    fn policy_grid_marks_hits() {
        let space = StateSpace::new();
        let q_table = initial_q_table(QInitialization::StickOnTwenty, &space);
        let policy = PolicyTable::from_q_table(&q_table, &space);
        let text = PolicyReport(&policy).to_string();
        assert!(text.starts_with("---- Policy ----\nUseable ace\n"));
        assert!(text.contains("A 2 3 4 5 6 7 8 9 T | dealer\n"));
        assert!(text.contains("                    | 21\n"));
        assert!(text.contains("X X X X X X X X X X | 19\n"));
        assert!(text.contains("X X X X X X X X X X | 2\n"));
        // 10 soft rows, 20 hard rows, two headers, two titles, two blank lines
        // and the banner.
        assert_eq!(text.lines().count(), 10 + 20 + 2 + 2 + 2 + 1);
    }

    #[test]
    fn value_grid_shows_the_larger_action_value() {
        let space = StateSpace::new();
        let mut q_table = initial_q_table(QInitialization::Zero, &space);
        q_table[(State::new(10, 20, false), Action::Stand)] = 0.44;
        q_table[(State::new(10, 20, false), Action::Hit)] = -0.85;
        let text = ValueReport(&q_table).to_string();
        assert!(text.contains(" 0.00  0.44 | 20\n"));
    }

    #[test]
    fn q_grid_has_both_actions_per_slice() {
        let space = StateSpace::new();
        let q_table = initial_q_table(QInitialization::StickOnTwenty, &space);
        let text = QTableReport(&q_table).to_string();
        assert_eq!(text.matches("Values for Stand:").count(), 2);
        assert_eq!(text.matches("Values for Hit:").count(), 2);
        assert!(text.contains("-0.00"));
    }
}
