// src/main.rs
use anyhow::Context;

use imu_scope::simulator::SimulatedImu;
use imu_scope::{Visualizer, VisualizerConfig};

const DEMO_SAMPLE_RATE_HZ: f64 = 200.0;
const DEMO_HISTORY_LIMIT: usize = 20_000;

// 入口函数：可选参数为 JSON 配置文件路径
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => VisualizerConfig::load(&path)
            .with_context(|| format!("loading visualizer config from {path}"))?,
        None => VisualizerConfig::default(),
    };
    log::debug!("config: {config:?}");

    let mut imu = SimulatedImu::spawn(DEMO_SAMPLE_RATE_HZ, DEMO_HISTORY_LIMIT);
    let mut visualizer = Visualizer::new(config);
    let result = visualizer
        .start(imu.accessor())
        .context("running the chart window");
    visualizer.stop();
    imu.shutdown();
    log::info!("visualizer finished in state {:?}", visualizer.lifecycle());
    result
}
