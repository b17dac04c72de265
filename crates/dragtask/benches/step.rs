use criterion::{criterion_group, criterion_main, Criterion};

use batch::{Batch, Tensor};
use dragtask::{DragEnv, TaskConfig};
use rig::{MockRig, VehicleModel};

fn bench_env_step(c: &mut Criterion) {
    let cfg = TaskConfig::default();
    let instances = 64;
    let n = cfg.vehicle_count;
    let model = VehicleModel::preset(&cfg.vehicle).unwrap();
    let action_dim = model.action_dim();
    let rig = MockRig::new(instances, n, model);
    let mut env = DragEnv::new(cfg, rig, 0).unwrap();
    env.reset(None);

    let mut actions = Batch::new();
    actions.insert(
        "agents.action",
        Tensor::zeros(vec![instances, n, action_dim]),
    );

    c.bench_function("env_step_64_instances", |b| {
        b.iter(|| env.step(&actions).unwrap());
    });
}

criterion_group!(benches, bench_env_step);
criterion_main!(benches);
