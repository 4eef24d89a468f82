use std::io::{self, BufRead, Write};

use anyhow::{bail, Context};
use blackjack_drivers::ConfigTrainer;
use blackjack_rl::background::{spawn_training, train_in_parallel};
use blackjack_rl::policy::{evaluate_policy, PolicyTable};
use blackjack_rl::qlearning::QLearner;
use blackjack_rl::report::{PolicyReport, QTableReport, ValueReport};
use blackjack_rl::{DrawVariant, StateSpace, TrainingConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

fn new_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn print_evaluation(
    policy: &PolicyTable,
    games: u64,
    variant: DrawVariant,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    if games == 0 {
        return Ok(());
    }
    let mean_reward = evaluate_policy(policy, games, variant, new_rng(seed))?;
    println!(
        "Mean reward over {} games ({}): {:.4}",
        games, variant, mean_reward
    );
    Ok(())
}

/// Trains on the current thread and prints Q, V and the policy.
pub fn train_and_report(
    training: TrainingConfig,
    trainer: &ConfigTrainer,
    seed: Option<u64>,
) -> anyhow::Result<PolicyTable> {
    let mut learner = QLearner::new(training, new_rng(seed))?;
    learner.train();

    println!("{}", QTableReport(learner.q_table()));
    println!("{}", ValueReport(learner.q_table()));
    let policy = learner.policy();
    println!("{}", PolicyReport(&policy));
    print_evaluation(&policy, trainer.evaluation_games, training.draw_variant, seed)?;

    Ok(policy)
}

/// Trains one policy per draw variant in parallel and shows how far they
/// disagree. Returns the policy of the configured variant.
pub fn compare_draw_variants(
    training: TrainingConfig,
    trainer: &ConfigTrainer,
    seed: Option<u64>,
) -> anyhow::Result<PolicyTable> {
    let variants = [DrawVariant::UniformTen, DrawVariant::ThirteenRanks];
    let configs: Vec<TrainingConfig> = variants
        .iter()
        .map(|&draw_variant| TrainingConfig {
            draw_variant,
            ..training
        })
        .collect();
    let mut policies = train_in_parallel(&configs, trainer.number_of_threads, seed)?;

    for (variant, policy) in variants.iter().zip(&policies) {
        println!("==== {} ====", variant);
        println!("{}", PolicyReport(policy));
        print_evaluation(policy, trainer.evaluation_games, *variant, seed)?;
        println!();
    }

    let space = StateSpace::new();
    let mut differences = 0;
    for &state in space.states() {
        if policies[0].decision(state)? != policies[1].decision(state)? {
            differences += 1;
        }
    }
    println!(
        "{} of {} decisions differ between the draw variants",
        differences,
        space.len()
    );

    let index = variants
        .iter()
        .position(|&variant| variant == training.draw_variant)
        .unwrap_or(0);
    Ok(policies.swap_remove(index))
}

/// Parses `<dealer up card> <player value> [soft]`.
fn parse_query(line: &str) -> anyhow::Result<(u8, u8, bool)> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.len() < 2 || words.len() > 3 {
        bail!("expected: <dealer up card> <player value> [soft]");
    }
    let dealer_up_card: u8 = words[0]
        .parse()
        .with_context(|| format!("bad dealer card {:?}", words[0]))?;
    let player_value: u8 = words[1]
        .parse()
        .with_context(|| format!("bad player value {:?}", words[1]))?;
    let useable_ace = match words.get(2) {
        None => false,
        Some(&"soft") => true,
        Some(word) => bail!("unexpected {:?}, only \"soft\" may follow", word),
    };
    Ok((dealer_up_card, player_value, useable_ace))
}

/// Trains on a worker thread while answering questions from stdin. Questions
/// asked before the policy is published are turned away.
pub fn advise_while_training(
    training: TrainingConfig,
    seed: Option<u64>,
) -> anyhow::Result<PolicyTable> {
    let mut pending = spawn_training(training, seed)?;
    println!("Ask with \"<dealer up card> <player value> [soft]\", end with EOF.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    print!("> ");
    stdout.flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        if !line.trim().is_empty() {
            let ready = pending
                .try_get()
                .context("Training stopped before a policy was published")?;
            match (parse_query(&line), ready) {
                (Err(err), _) => println!("{:#}", err),
                (Ok(_), None) => println!("Still training, ask again later."),
                (Ok((dealer_up_card, player_value, useable_ace)), Some(policy)) => {
                    match policy.recommend(dealer_up_card, player_value, useable_ace) {
                        Ok(true) => println!("Hit"),
                        Ok(false) => println!("Stand"),
                        Err(err) => println!("{}", err),
                    }
                }
            }
        }
        print!("> ");
        stdout.flush()?;
    }
    println!();

    info!("waiting for training to finish");
    Ok(pending.wait()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hard_and_soft_queries() {
        assert_eq!(parse_query("10 16").unwrap(), (10, 16, false));
        assert_eq!(parse_query(" 1 18 soft ").unwrap(), (1, 18, true));
    }

    #[test]
    fn rejects_malformed_queries() {
        assert!(parse_query("10").is_err());
        assert!(parse_query("ten 16").is_err());
        assert!(parse_query("10 16 hard").is_err());
        assert!(parse_query("10 16 soft extra").is_err());
        assert!(parse_query("10 300").is_err());
    }

    #[test]
    fn comparison_returns_the_configured_variant() {
        let training = TrainingConfig {
            episodes: 2_000,
            draw_variant: DrawVariant::ThirteenRanks,
            ..Default::default()
        };
        let trainer = ConfigTrainer {
            number_of_threads: 2,
            evaluation_games: 0,
            compare_draw_variants: true,
        };
        let policy = compare_draw_variants(training, &trainer, Some(3)).unwrap();
        assert!(policy.recommend(10, 20, false).is_ok());
    }
}
