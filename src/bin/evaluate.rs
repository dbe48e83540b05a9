//! Compares baseline policies on a traffic scenario.
//!
//! Usage: `evaluate [scenario] [episodes]`, where `scenario` is one of
//! `balanced`, `rush_hour`, `bus_priority` (default `balanced`) and
//! `episodes` defaults to 3. Runs every baseline on the single intersection
//! and the queue heuristic on the 3x3 network, printing the metric tables.

use std::process::ExitCode;

use greenwave::{
    EnvConfig, EvaluationMetrics, FixedCyclePolicy, MultiIntersectionEnv, Policy,
    QueueHeuristicPolicy, RandomPolicy, RoadNetwork, Scenario, SingleIntersectionEnv,
    SyntheticSim,
};

const SEED: u64 = 42;

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let scenario_name = args.next().unwrap_or_else(|| "balanced".to_string());
    let episodes: usize = match args.next().map(|a| a.parse()).transpose() {
        Ok(n) => n.unwrap_or(3),
        Err(_) => {
            eprintln!("episodes must be a positive integer");
            return ExitCode::FAILURE;
        }
    };

    let scenario = match Scenario::by_name(&scenario_name) {
        Some(s) => s,
        None => {
            eprintln!(
                "unknown scenario '{}'; expected balanced, rush_hour, or bus_priority",
                scenario_name
            );
            return ExitCode::FAILURE;
        }
    };

    println!("Scenario: {}\n", scenario);

    let mut baselines: Vec<Box<dyn Policy>> = vec![
        Box::new(RandomPolicy::new()),
        Box::new(FixedCyclePolicy::new(30)),
        Box::new(QueueHeuristicPolicy::new()),
    ];

    for policy in &mut baselines {
        let mut env = SingleIntersectionEnv::new(
            SyntheticSim::single_intersection(SEED),
            scenario.clone(),
            EnvConfig::default(),
        );
        match EvaluationMetrics::evaluate(&mut env, policy.as_mut(), episodes) {
            Ok(metrics) => {
                println!("--- single intersection / {} ---", policy.name());
                println!("{}", metrics);
            }
            Err(err) => {
                eprintln!("evaluation failed for {}: {}", policy.name(), err);
                return ExitCode::FAILURE;
            }
        }
    }

    // The same heuristic, transferred unmodified to the 9-agent network.
    let network = RoadNetwork::grid(3, 3);
    let mut env = MultiIntersectionEnv::new(
        SyntheticSim::new(network.clone(), SEED),
        &network,
        scenario.with_episode_ticks(1500),
        EnvConfig::default(),
    );
    let mut policy = QueueHeuristicPolicy::new();
    match EvaluationMetrics::evaluate_network(&mut env, &mut policy, episodes) {
        Ok(metrics) => {
            println!("--- 3x3 network / {} ---", policy.name());
            println!("{}", metrics);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("network evaluation failed: {}", err);
            ExitCode::FAILURE
        }
    }
}
