// src/simulator.rs
// 模拟 IMU 数据源：后台线程持续生成六轴数据，供可视化器拉取
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::chart::VisualizerError;
use crate::types::SampleWindow;

const GRAVITY: f64 = 9.81;

struct AxisGen {
    freq_hz: f64,
    phase: f64,
    amp: f64,
    bias: f64,
    noise: f64,
}

impl AxisGen {
    fn sample(&self, t: f64, rng: &mut StdRng) -> f64 {
        let base = (2.0 * std::f64::consts::PI * self.freq_hz * t + self.phase).sin() * self.amp;
        base + self.bias + rng.gen_range(-self.noise..=self.noise)
    }
}

/// Synthetic six-axis sensor: a slow sway on top of gravity plus noise.
pub struct SensorRig {
    accel: [AxisGen; 3],
    gyro: [AxisGen; 3],
    sample_rate_hz: f64,
    frame: u64,
    rng: StdRng,
}

impl SensorRig {
    pub fn new(sample_rate_hz: f64, rng: StdRng) -> Self {
        let axis = |freq_hz: f64, phase: f64, amp: f64, bias: f64, noise: f64| AxisGen {
            freq_hz,
            phase,
            amp,
            bias,
            noise,
        };
        Self {
            accel: [
                axis(0.5, 0.0, 1.5, 0.0, 0.05),
                axis(0.7, 1.0, 1.0, 0.0, 0.05),
                axis(0.3, 2.0, 0.5, GRAVITY, 0.05),
            ],
            gyro: [
                axis(0.5, 0.5, 0.8, 0.0, 0.02),
                axis(0.7, 1.5, 0.6, 0.0, 0.02),
                axis(0.2, 2.5, 0.3, 0.0, 0.02),
            ],
            sample_rate_hz: sample_rate_hz.max(1.0),
            frame: 0,
            rng,
        }
    }

    /// Appends the next sample to `window`, trimming it to `history_limit`.
    pub fn advance(&mut self, window: &mut SampleWindow, history_limit: usize) {
        let t = self.frame as f64 / self.sample_rate_hz;
        let rng = &mut self.rng;
        let accel = [0, 1, 2].map(|i| self.accel[i].sample(t, rng));
        let gyro = [0, 1, 2].map(|i| self.gyro[i].sample(t, rng));
        window.push(self.frame, accel, gyro);
        self.frame += 1;
        // 批量裁剪，避免每帧都搬移整段历史
        if window.len() > history_limit + history_limit / 4 {
            window.retain_latest(history_limit);
        }
    }
}

/// Background producer writing into a shared sample history.
pub struct SimulatedImu {
    history: Arc<Mutex<SampleWindow>>,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl SimulatedImu {
    pub fn spawn(sample_rate_hz: f64, history_limit: usize) -> Self {
        let history = Arc::new(Mutex::new(SampleWindow::default()));
        let running = Arc::new(AtomicBool::new(true));
        let worker = {
            let history = Arc::clone(&history);
            let running = Arc::clone(&running);
            thread::spawn(move || {
                let mut rig = SensorRig::new(sample_rate_hz, StdRng::from_entropy());
                let period = Duration::from_secs_f64(1.0 / sample_rate_hz.max(1.0));
                let started = Instant::now();
                let mut produced: u32 = 0;
                log::info!("simulated IMU producing at {sample_rate_hz} Hz");
                while running.load(Ordering::Relaxed) {
                    match history.lock() {
                        Ok(mut window) => rig.advance(&mut window, history_limit),
                        Err(_) => {
                            log::error!("sample history lock poisoned, producer exiting");
                            break;
                        }
                    }
                    produced = produced.wrapping_add(1);
                    let next = started + period * produced;
                    thread::sleep(next.saturating_duration_since(Instant::now()));
                }
            })
        };
        Self {
            history,
            running,
            worker: Some(worker),
        }
    }

    /// Accessor handing out a snapshot of the history on each call.
    pub fn accessor(
        &self,
    ) -> impl FnMut() -> Result<Option<SampleWindow>, VisualizerError> + 'static {
        let history = Arc::clone(&self.history);
        move || {
            let window = history
                .lock()
                .map_err(|_| VisualizerError::Accessor("sample history lock poisoned".into()))?;
            if window.is_empty() {
                Ok(None)
            } else {
                Ok(Some(window.clone()))
            }
        }
    }

    pub fn shutdown(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("simulated IMU thread panicked");
            }
        }
    }
}

impl Drop for SimulatedImu {
    fn drop(&mut self) {
        self.shutdown();
    }
}
