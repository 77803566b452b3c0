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

use async_trait::async_trait;
use sshp::engine::{CommandRunner, Engine, ExecutionConfig, HostResult};
use sshp::ssh::HostKeyPolicy;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn test_config() -> ExecutionConfig {
    ExecutionConfig {
        user: "ops".to_string(),
        key_path: PathBuf::from("/tmp/unused_test_key"),
        command: "uptime".to_string(),
        port: 22,
        connect_timeout: Duration::from_secs(20),
        command_timeout: None,
        host_key_policy: HostKeyPolicy::TrustAll,
    }
}

/// Runner that never touches a network: each host gets a scripted outcome
/// and an optional artificial latency. Hosts with no scripted outcome fail
/// as if the connection were refused.
struct ScriptedRunner {
    outcomes: HashMap<String, Result<Vec<u8>, String>>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    fn new() -> Self {
        Self {
            outcomes: HashMap::new(),
            delays: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn succeeds(mut self, hostname: &str, output: &[u8]) -> Self {
        self.outcomes
            .insert(hostname.to_string(), Ok(output.to_vec()));
        self
    }

    fn fails(mut self, hostname: &str, error: &str) -> Self {
        self.outcomes
            .insert(hostname.to_string(), Err(error.to_string()));
        self
    }

    fn delayed(mut self, hostname: &str, delay: Duration) -> Self {
        self.delays.insert(hostname.to_string(), delay);
        self
    }

    fn call_log(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, hostname: &str, _config: &ExecutionConfig) -> anyhow::Result<Vec<u8>> {
        self.calls.lock().unwrap().push(hostname.to_string());
        if let Some(delay) = self.delays.get(hostname) {
            tokio::time::sleep(*delay).await;
        }
        match self.outcomes.get(hostname) {
            Some(Ok(output)) => Ok(output.clone()),
            Some(Err(message)) => anyhow::bail!("{message}"),
            None => anyhow::bail!("connection refused"),
        }
    }
}

fn engine_with(runner: Arc<ScriptedRunner>) -> Engine {
    Engine::new(test_config()).with_runner(runner)
}

async fn collect(engine: &Engine, hosts: Vec<String>) -> Vec<HostResult> {
    engine.run(hosts, |_| {}).await
}

fn hostnames(results: &[HostResult]) -> HashSet<String> {
    results.iter().map(|r| r.hostname.clone()).collect()
}

#[tokio::test]
async fn test_exactly_one_result_per_host() {
    let runner = Arc::new(
        ScriptedRunner::new()
            .succeeds("h1", b"ok\n")
            .succeeds("h2", b"ok\n")
            .fails("h3", "connection refused"),
    );
    let engine = engine_with(Arc::clone(&runner));

    let hosts: Vec<String> = ["h1", "h2", "h3"].iter().map(|s| s.to_string()).collect();
    let results = collect(&engine, hosts.clone()).await;

    assert_eq!(results.len(), hosts.len());
    assert_eq!(hostnames(&results), hosts.into_iter().collect());
}

#[tokio::test]
async fn test_empty_host_list_yields_no_results() {
    let engine = engine_with(Arc::new(ScriptedRunner::new()));
    let results = collect(&engine, Vec::new()).await;
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_failure_is_isolated_to_one_host() {
    let runner = Arc::new(
        ScriptedRunner::new()
            .succeeds("h1", b"hi\n")
            .fails("bad-host", "connection refused")
            .succeeds("h2", b"hi\n"),
    );
    let engine = engine_with(runner);

    let results = collect(
        &engine,
        vec!["h1".into(), "bad-host".into(), "h2".into()],
    )
    .await;

    assert_eq!(results.len(), 3);
    for result in &results {
        if result.hostname == "bad-host" {
            assert_eq!(result.error.as_deref(), Some("connection refused"));
            assert!(result.output.is_empty());
        } else {
            assert!(result.is_success(), "{} should succeed", result.hostname);
            assert_eq!(result.output, b"hi\n");
        }
    }
}

#[tokio::test]
async fn test_single_worker_still_reports_every_host() {
    let runner = Arc::new(
        ScriptedRunner::new()
            .succeeds("h1", b"a\n")
            .fails("h2", "no route to host")
            .succeeds("h3", b"c\n"),
    );
    let engine = engine_with(runner).with_worker_count(1);

    let results = collect(&engine, vec!["h1".into(), "h2".into(), "h3".into()]).await;
    assert_eq!(results.len(), 3);
}

#[tokio::test]
async fn test_worker_count_never_changes_outcomes() {
    let hosts: Vec<String> = (1..=8).map(|i| format!("h{i}")).collect();

    let mut outcome_sets = Vec::new();
    for worker_count in [1, 4, 16] {
        let mut runner = ScriptedRunner::new();
        for (i, host) in hosts.iter().enumerate() {
            runner = if i % 3 == 0 {
                runner.fails(host, "connection refused")
            } else {
                runner.succeeds(host, format!("up {host}\n").as_bytes())
            };
        }
        let engine = engine_with(Arc::new(runner)).with_worker_count(worker_count);
        let results = collect(&engine, hosts.clone()).await;

        let mut outcomes: Vec<(String, Option<String>, Vec<u8>)> = results
            .into_iter()
            .map(|r| (r.hostname, r.error, r.output))
            .collect();
        outcomes.sort();
        outcome_sets.push(outcomes);
    }

    assert_eq!(outcome_sets[0], outcome_sets[1]);
    assert_eq!(outcome_sets[1], outcome_sets[2]);
}

#[tokio::test]
async fn test_no_host_is_executed_twice() {
    let hosts: Vec<String> = (1..=12).map(|i| format!("h{i}")).collect();
    let mut scripted = ScriptedRunner::new();
    for host in &hosts {
        scripted = scripted.succeeds(host, b"ok\n");
    }
    let runner = Arc::new(scripted);
    let engine = engine_with(Arc::clone(&runner)).with_worker_count(4);

    let results = collect(&engine, hosts.clone()).await;
    assert_eq!(results.len(), hosts.len());

    let calls = runner.call_log();
    assert_eq!(calls.len(), hosts.len());
    let unique: HashSet<&String> = calls.iter().collect();
    assert_eq!(unique.len(), hosts.len());
}

#[tokio::test]
async fn test_queue_capacity_smaller_than_fleet() {
    let hosts: Vec<String> = (1..=20).map(|i| format!("h{i}")).collect();
    let mut scripted = ScriptedRunner::new();
    for host in &hosts {
        scripted = scripted.succeeds(host, b"ok\n");
    }
    let engine = engine_with(Arc::new(scripted))
        .with_worker_count(3)
        .with_channel_capacity(2);

    let results = collect(&engine, hosts.clone()).await;
    assert_eq!(results.len(), hosts.len());
    assert_eq!(hostnames(&results), hosts.into_iter().collect());
}

#[tokio::test]
async fn test_results_arrive_in_completion_order() {
    let runner = Arc::new(
        ScriptedRunner::new()
            .succeeds("slow", b"slow done\n")
            .delayed("slow", Duration::from_millis(300))
            .succeeds("fast", b"fast done\n"),
    );
    let engine = engine_with(runner).with_worker_count(2);

    let mut arrival_order = Vec::new();
    engine
        .run(vec!["slow".into(), "fast".into()], |result| {
            arrival_order.push(result.hostname.clone());
        })
        .await;

    // "slow" was submitted first but must be reported second.
    assert_eq!(arrival_order, vec!["fast".to_string(), "slow".to_string()]);
}

#[tokio::test]
async fn test_repeated_runs_are_idempotent() {
    let hosts: Vec<String> = vec!["h1".into(), "h2".into(), "bad".into()];
    let build_runner = || {
        Arc::new(
            ScriptedRunner::new()
                .succeeds("h1", b"one\n")
                .succeeds("h2", b"two\n")
                .fails("bad", "connection refused"),
        )
    };

    let first = collect(&engine_with(build_runner()), hosts.clone()).await;
    let second = collect(&engine_with(build_runner()), hosts.clone()).await;

    let as_map = |results: Vec<HostResult>| -> HashMap<String, (Option<String>, Vec<u8>)> {
        results
            .into_iter()
            .map(|r| (r.hostname, (r.error, r.output)))
            .collect()
    };
    assert_eq!(as_map(first), as_map(second));
}

#[tokio::test]
async fn test_rendered_lines_match_output_contract() {
    let runner = Arc::new(
        ScriptedRunner::new()
            .succeeds("h1", b"hi\n")
            .succeeds("h2", b"hi\n"),
    );
    let engine = engine_with(runner);

    let mut lines = HashSet::new();
    engine
        .run(vec!["h1".into(), "h2".into()], |result| {
            lines.insert(result.render());
        })
        .await;

    let expected: HashSet<String> = ["h1: hi\n", "h2: hi\n"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(lines, expected);
}
