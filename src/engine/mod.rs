// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The concurrent execution engine: a bounded host queue drained by a
//! fixed pool of workers, fanned back in through a bounded result channel.
//!
//! Every submitted host yields exactly one [`HostResult`], regardless of
//! per-host failures. Results are observed in completion order, which is
//! nondeterministic and generally differs from submission order.

pub mod config;
pub mod result;
pub mod runner;

pub use config::{wrap_sudo, ExecutionConfig, DEFAULT_CONNECT_TIMEOUT_SECS};
pub use result::HostResult;
pub use runner::{CommandRunner, SshCommandRunner};

use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Mutex};

/// Default number of concurrent workers.
pub const DEFAULT_WORKER_COUNT: usize = 10;

/// Default capacity of the host queue and the result channel. Bounds
/// in-flight memory, not logical concurrency — that is the worker count.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 5;

/// One pending execution request. Created by the feeder, consumed exactly
/// once by exactly one worker.
#[derive(Debug)]
struct HostTask {
    hostname: String,
}

/// The execution engine. Owns its channels; multiple engines can run
/// concurrently without shared state.
pub struct Engine {
    config: Arc<ExecutionConfig>,
    runner: Arc<dyn CommandRunner>,
    worker_count: usize,
    channel_capacity: usize,
}

impl Engine {
    pub fn new(config: ExecutionConfig) -> Self {
        Self {
            config: Arc::new(config),
            runner: Arc::new(SshCommandRunner),
            worker_count: DEFAULT_WORKER_COUNT,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count.max(1);
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// Substitute the remote executor. Used by tests to run the pool
    /// without a network.
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Execute the configured command on every host.
    ///
    /// `report` is invoked once per host as its result arrives, in
    /// completion order. Returns all results once exactly `hosts.len()`
    /// have been collected; the consumer does not wait for channel closure
    /// beyond that count.
    pub async fn run<F>(&self, hosts: Vec<String>, mut report: F) -> Vec<HostResult>
    where
        F: FnMut(&HostResult),
    {
        let expected = hosts.len();
        let (task_tx, task_rx) = mpsc::channel::<HostTask>(self.channel_capacity);
        let (result_tx, mut result_rx) = mpsc::channel::<HostResult>(self.channel_capacity);
        let task_rx = Arc::new(Mutex::new(task_rx));

        let workers: Vec<_> = (0..self.worker_count)
            .map(|worker_id| {
                tokio::spawn(worker_loop(
                    worker_id,
                    Arc::clone(&task_rx),
                    result_tx.clone(),
                    Arc::clone(&self.config),
                    Arc::clone(&self.runner),
                ))
            })
            .collect();
        // Workers hold the only remaining result senders; the consumer
        // loop below must observe closure if every worker exits.
        drop(result_tx);

        // Feeder: one task per hostname, in list order. Sending blocks on a
        // full queue — the sole backpressure. Dropping the sender signals
        // exhaustion to the pool.
        let feeder = tokio::spawn(async move {
            for hostname in hosts {
                if task_tx.send(HostTask { hostname }).await.is_err() {
                    break;
                }
            }
        });

        let mut results = Vec::with_capacity(expected);
        while results.len() < expected {
            match result_rx.recv().await {
                Some(result) => {
                    report(&result);
                    results.push(result);
                }
                None => break,
            }
        }

        let _ = feeder.await;
        join_all(workers).await;
        results
    }
}

/// One worker: pull the next host, execute, emit the result, repeat until
/// the queue is closed and drained. Workers are symmetric and stateless
/// between iterations; any worker may process any host.
async fn worker_loop(
    worker_id: usize,
    queue: Arc<Mutex<mpsc::Receiver<HostTask>>>,
    results: mpsc::Sender<HostResult>,
    config: Arc<ExecutionConfig>,
    runner: Arc<dyn CommandRunner>,
) {
    loop {
        // The queue lock is held only across the dequeue, never across
        // the execution itself.
        let task = queue.lock().await.recv().await;
        let Some(task) = task else { break };

        tracing::debug!(worker = worker_id, host = %task.hostname, "executing");
        let started = Instant::now();

        let result = match runner.run(&task.hostname, &config).await {
            Ok(output) => HostResult::success(task.hostname, output),
            Err(error) => HostResult::failure(task.hostname, format!("{error:#}")),
        };

        tracing::debug!(
            worker = worker_id,
            host = %result.hostname,
            elapsed = ?started.elapsed(),
            success = result.is_success(),
            "finished"
        );

        if results.send(result).await.is_err() {
            break;
        }
    }
}
