#![deny(clippy::all, clippy::pedantic)]
//! Demo driver: runs the payload-dragging task on the mock rig with random
//! actions and logs the running statistics.

use anyhow::{Context, Result};
use clap::Parser;

use batch::{Batch, Tensor};
use dragtask::{DragEnv, TaskConfig};
use rig::{MockRig, RigView, VehicleModel};

#[derive(Parser, Debug)]
#[command(name = "ropelift", about = "Rope-payload dragging task demo")]
struct Args {
    /// Number of parallel instances.
    #[arg(long, default_value_t = 16)]
    instances: usize,
    /// Steps to simulate.
    #[arg(long, default_value_t = 500)]
    steps: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Optional JSON task configuration.
    #[arg(long)]
    config: Option<std::path::PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let cfg = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            TaskConfig::from_json(&text).context("parsing task configuration")?
        }
        None => TaskConfig::default(),
    };

    let model = VehicleModel::preset(&cfg.vehicle)
        .with_context(|| format!("unknown vehicle model `{}`", cfg.vehicle))?;
    let rig = MockRig::new(args.instances, cfg.vehicle_count, model);
    let mut env = DragEnv::new(cfg, rig, args.seed)?;
    env.reset(None);

    let n = env.config().vehicle_count;
    let action_dim = env.rig().model().action_dim();
    let mut rng = fastrand::Rng::with_seed(args.seed ^ 0x5eed);

    tracing::info!(
        instances = args.instances,
        steps = args.steps,
        "starting demo rollout"
    );
    for step in 0..args.steps {
        let data: Vec<f32> = (0..args.instances * n * action_dim)
            .map(|_| rng.f32() * 2.0 - 1.0)
            .collect();
        let mut actions = Batch::new();
        actions.insert(
            "agents.action",
            Tensor::from_vec(vec![args.instances, n, action_dim], data),
        );
        let out = env.step(&actions)?;

        let done = out.get("done")?;
        let finished: Vec<usize> = done
            .data
            .iter()
            .enumerate()
            .filter(|(_, d)| **d > 0.0)
            .map(|(i, _)| i)
            .collect();
        if !finished.is_empty() {
            env.reset(Some(&finished));
        }

        if (step + 1) % 100 == 0 {
            let reward = out.get("agents.reward")?;
            let mean_reward = reward.data.iter().sum::<f32>() / reward.len() as f32;
            let pos_error = out.get("stats.pos_error")?;
            let mean_pos_error = pos_error.data.iter().sum::<f32>() / pos_error.len() as f32;
            tracing::info!(
                step = step + 1,
                mean_reward,
                mean_pos_error,
                resets = finished.len(),
                "rollout progress"
            );
        }
    }

    tracing::info!("demo rollout finished");
    Ok(())
}
