use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::JoinHandle;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::policy::PolicyTable;
use crate::qlearning::train_with_rng;
use crate::{ConfigError, TrainingConfig, TrainingError};

fn new_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// A policy that is being trained on a worker thread.
///
/// The worker sends the finished table exactly once, so a reader either sees
/// nothing or the complete table.
pub struct PendingPolicy {
    receiver: Receiver<PolicyTable>,
    worker: Option<JoinHandle<()>>,
    policy: Option<PolicyTable>,
    worker_lost: bool,
}

impl PendingPolicy {
    /// Returns the policy if training has finished, without blocking.
    /// `Ok(None)` means the worker is still training; an error means it is
    /// gone and no policy will ever arrive.
    pub fn try_get(&mut self) -> Result<Option<&PolicyTable>, TrainingError> {
        if self.worker_lost {
            return Err(TrainingError::WorkerPanicked);
        }
        if self.policy.is_none() {
            match self.receiver.try_recv() {
                Ok(policy) => {
                    self.policy = Some(policy);
                    self.join_worker();
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    warn!("training worker exited without a policy");
                    self.worker_lost = true;
                    self.join_worker();
                    return Err(TrainingError::WorkerPanicked);
                }
            }
        }
        Ok(self.policy.as_ref())
    }

    pub fn is_ready(&mut self) -> bool {
        matches!(self.try_get(), Ok(Some(_)))
    }

    /// Blocks until training has finished.
    pub fn wait(mut self) -> Result<PolicyTable, TrainingError> {
        if let Some(policy) = self.policy.take() {
            return Ok(policy);
        }
        if self.worker_lost {
            return Err(TrainingError::WorkerPanicked);
        }
        let received = self.receiver.recv();
        self.join_worker();
        received.map_err(|_| TrainingError::WorkerPanicked)
    }

    fn join_worker(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// Validates `config` on the calling thread, then trains on a new thread.
/// With a seed the run is reproducible.
pub fn spawn_training(
    config: TrainingConfig,
    seed: Option<u64>,
) -> Result<PendingPolicy, ConfigError> {
    config.validate()?;

    let (sender, receiver) = mpsc::channel();
    let worker = std::thread::spawn(move || match train_with_rng(&config, new_rng(seed)) {
        Ok(policy) => {
            // The receiver may already be gone; nobody wants the policy then.
            let _ = sender.send(policy);
        }
        Err(err) => warn!(%err, "background training rejected its config"),
    });

    Ok(PendingPolicy {
        receiver,
        worker: Some(worker),
        policy: None,
        worker_lost: false,
    })
}

/// Runs independent trainings on up to `number_of_threads` threads (0 means
/// one per available core). Results come back in the order of `configs`.
/// With a seed, run `i` is seeded with `seed + i`.
pub fn train_in_parallel(
    configs: &[TrainingConfig],
    number_of_threads: usize,
    seed: Option<u64>,
) -> Result<Vec<PolicyTable>, TrainingError> {
    for config in configs {
        config.validate()?;
    }
    if configs.is_empty() {
        return Ok(Vec::new());
    }

    let number_of_threads = {
        if number_of_threads == 0 {
            match std::thread::available_parallelism() {
                Ok(n) => n.get(),
                Err(_) => 1,
            }
        } else {
            number_of_threads
        }
    }
    .min(configs.len());
    info!(runs = configs.len(), number_of_threads, "training in parallel");

    let mut dispatched_runs: Vec<Vec<(usize, TrainingConfig)>> =
        vec![Vec::new(); number_of_threads];
    for (run_index, config) in configs.iter().enumerate() {
        dispatched_runs[run_index % number_of_threads].push((run_index, *config));
    }

    let mut threads = Vec::with_capacity(number_of_threads - 1);
    for _ in 1..number_of_threads {
        let runs_for_thread = dispatched_runs.pop().unwrap_or_default();
        threads.push(std::thread::spawn(move || run_all(&runs_for_thread, seed)));
    }

    let mut results: Vec<Option<PolicyTable>> = vec![None; configs.len()];
    let runs_for_current_thread = dispatched_runs.pop().unwrap_or_default();
    for (run_index, policy) in run_all(&runs_for_current_thread, seed)? {
        results[run_index] = Some(policy);
    }
    for thread in threads {
        let finished = thread.join().map_err(|_| TrainingError::WorkerPanicked)?;
        for (run_index, policy) in finished? {
            results[run_index] = Some(policy);
        }
    }

    results
        .into_iter()
        .map(|policy| policy.ok_or(TrainingError::WorkerPanicked))
        .collect()
}

fn run_all(
    runs: &[(usize, TrainingConfig)],
    seed: Option<u64>,
) -> Result<Vec<(usize, PolicyTable)>, ConfigError> {
    runs.iter()
        .map(|&(run_index, config)| {
            let rng = new_rng(seed.map(|seed| seed.wrapping_add(run_index as u64)));
            train_with_rng(&config, rng).map(|policy| (run_index, policy))
        })
        .collect()
}
