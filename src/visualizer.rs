// src/visualizer.rs
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use eframe::egui;

use crate::chart::{Chart, DataAccessor, VisualizerError, WindowPolicy};
use crate::config::VisualizerConfig;
use crate::gui::ScopeApp;
use crate::timer::RedrawTimer;
use crate::types::Lifecycle;

// 单次重绘的结果
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum TickOutcome {
    NoData,
    Updated,
    Failed,
}

/// Shutdown request that can be raised from any thread. The chart surface
/// checks it once per frame.
#[derive(Clone, Debug, Default)]
pub struct StopHandle {
    requested: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

/// Chart state shared by the `Visualizer` handle and the chart surface.
/// Both live on the UI thread.
pub(crate) struct Scope {
    pub(crate) chart: Chart,
    pub(crate) timer: RedrawTimer,
    pub(crate) lifecycle: Lifecycle,
    /// Points per series after the last successful tick.
    pub(crate) shown: usize,
    pub(crate) dropped_frames: u64,
    policy: WindowPolicy,
    accessor: Option<Box<dyn DataAccessor>>,
}

impl Scope {
    fn new(config: &VisualizerConfig) -> Self {
        Self {
            chart: Chart::new(config.window_size),
            timer: RedrawTimer::new(config.update_interval()),
            lifecycle: Lifecycle::Configured,
            shown: 0,
            dropped_frames: 0,
            policy: WindowPolicy::new(config.window_size),
            accessor: None,
        }
    }

    /// Runs a tick if the redraw timer is due at `now`.
    pub(crate) fn poll(&mut self, now: Instant) -> Option<TickOutcome> {
        if self.timer.poll(now) {
            Some(self.tick())
        } else {
            None
        }
    }

    /// Pulls the current window and redraws. Failures are logged and the
    /// series stay as the failed tick left them.
    pub(crate) fn tick(&mut self) -> TickOutcome {
        match self.refresh() {
            Ok(true) => TickOutcome::Updated,
            Ok(false) => TickOutcome::NoData,
            Err(err) => {
                self.dropped_frames += 1;
                log::error!("Error in redraw tick: {err}");
                TickOutcome::Failed
            }
        }
    }

    fn refresh(&mut self) -> Result<bool, VisualizerError> {
        let Some(accessor) = self.accessor.as_mut() else {
            return Ok(false);
        };
        let Some(window) = accessor.current_window()? else {
            return Ok(false);
        };
        let Some(slice) = self.policy.select(&window)? else {
            return Ok(false);
        };
        self.shown = slice.len();
        self.chart.apply(&slice)?;
        Ok(true)
    }

    pub(crate) fn halt(&mut self) {
        self.timer.stop();
        if self.lifecycle == Lifecycle::Running {
            log::info!(
                "visualization stopped ({} dropped frames)",
                self.dropped_frames
            );
        }
        self.lifecycle = Lifecycle::Stopped;
    }
}

/// Stops the redraw timer when `start` leaves its blocking call, however
/// it leaves it.
struct RunGuard {
    scope: Rc<RefCell<Scope>>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if let Ok(mut scope) = self.scope.try_borrow_mut() {
            scope.halt();
        }
    }
}

/// Live two-panel chart of accelerometer and gyroscope channels.
pub struct Visualizer {
    config: VisualizerConfig,
    scope: Rc<RefCell<Scope>>,
    stop: StopHandle,
}

impl Visualizer {
    pub fn new(config: VisualizerConfig) -> Self {
        let scope = Scope::new(&config);
        Self {
            config,
            scope: Rc::new(RefCell::new(scope)),
            stop: StopHandle::default(),
        }
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.scope.borrow().lifecycle
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Binds `accessor`, starts redrawing and blocks until the chart
    /// window is closed or a stop is requested.
    pub fn start(&mut self, accessor: impl DataAccessor + 'static) -> Result<(), VisualizerError> {
        self.bind(Box::new(accessor), Instant::now())?;
        println!("Starting real-time visualization...");
        println!("Close the plot window to stop");

        let _guard = RunGuard {
            scope: Rc::clone(&self.scope),
        };
        let viewport = egui::ViewportBuilder::default()
            .with_inner_size([self.config.width, self.config.height])
            .with_title(self.config.title.clone());
        let options = eframe::NativeOptions {
            viewport,
            ..Default::default()
        };
        let app = ScopeApp::new(
            Rc::clone(&self.scope),
            self.stop.clone(),
            self.config.title.clone(),
        );
        eframe::run_native(
            &self.config.title,
            options,
            Box::new(move |cc| {
                cc.egui_ctx.set_visuals(egui::Visuals::dark());
                Box::new(app)
            }),
        )
        .map_err(|e| VisualizerError::Surface(e.to_string()))
    }

    /// Stops redrawing and asks the chart window to close. Safe to call at
    /// any point, any number of times.
    pub fn stop(&mut self) {
        self.stop.stop();
        self.scope.borrow_mut().halt();
    }

    fn bind(&mut self, accessor: Box<dyn DataAccessor>, now: Instant) -> Result<(), VisualizerError> {
        let mut scope = self.scope.borrow_mut();
        if scope.lifecycle == Lifecycle::Stopped {
            return Err(VisualizerError::AlreadyStopped);
        }
        scope.accessor = Some(accessor);
        scope.timer.start(now);
        scope.lifecycle = Lifecycle::Running;
        log::info!(
            "redrawing every {:?}, window of {} points",
            scope.timer.interval(),
            self.config.window_size
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{AxisExtent, ManualSource};
    use crate::types::{Channel, SampleWindow};
    use std::time::Duration;

    fn ramp(len: usize, offset: f64) -> SampleWindow {
        let mut window = SampleWindow::default();
        for i in 0..len {
            let v = i as f64 + offset;
            window.push(i as u64, [v, 2.0 * v, 3.0 * v], [-v, -2.0 * v, -3.0 * v]);
        }
        window
    }

    fn running(window_size: usize, source: ManualSource) -> (Visualizer, Instant) {
        let mut vis = Visualizer::new(VisualizerConfig::new(window_size, 10));
        let t0 = Instant::now();
        vis.bind(Box::new(source), t0).unwrap();
        (vis, t0)
    }

    fn points(vis: &Visualizer, channel: Channel) -> Vec<[f64; 2]> {
        let scope = vis.scope.borrow();
        scope.chart.series(channel).unwrap().points().to_vec()
    }

    #[test]
    fn short_history_shows_every_point() {
        let (vis, _) = running(1000, ManualSource::from_windows([ramp(80, 0.0)]));
        assert_eq!(vis.scope.borrow_mut().tick(), TickOutcome::Updated);

        let ax = points(&vis, Channel::Ax);
        assert_eq!(ax.len(), 80);
        assert_eq!(ax.first(), Some(&[0.0, 0.0]));
        assert_eq!(ax.last(), Some(&[79.0, 79.0]));
        let scope = vis.scope.borrow();
        assert_eq!(scope.shown, 80);
        assert_eq!(scope.chart.accel.x_extent, AxisExtent::new(0.0, 80.0));
        assert_eq!(scope.chart.gyro.x_extent, AxisExtent::new(0.0, 80.0));
    }

    #[test]
    fn long_history_shows_trailing_window() {
        let (vis, _) = running(100, ManualSource::from_windows([ramp(250, 0.0)]));
        vis.scope.borrow_mut().tick();

        for channel in Channel::ACCEL.into_iter().chain(Channel::GYRO) {
            let pts = points(&vis, channel);
            assert_eq!(pts.len(), 100, "{channel}");
            assert_eq!(pts[0][0], 0.0);
            assert_eq!(pts[99][0], 99.0);
        }
        assert_eq!(points(&vis, Channel::Ax)[0][1], 150.0);
        assert_eq!(points(&vis, Channel::Gz)[99][1], -3.0 * 249.0);
        let scope = vis.scope.borrow();
        assert_eq!(scope.chart.accel.x_extent, AxisExtent::new(0.0, 100.0));
    }

    #[test]
    fn few_samples_keep_minimum_horizontal_span() {
        let (vis, _) = running(1000, ManualSource::from_windows([ramp(10, 0.0)]));
        vis.scope.borrow_mut().tick();
        let scope = vis.scope.borrow();
        assert_eq!(scope.chart.accel.x_extent, AxisExtent::new(0.0, 50.0));
    }

    #[test]
    fn empty_results_leave_series_untouched() {
        let source = ManualSource::new(vec![
            Ok(Some(ramp(20, 1.0))),
            Ok(None),
            Ok(Some(SampleWindow::default())),
        ]);
        let (vis, _) = running(1000, source);
        vis.scope.borrow_mut().tick();
        let before = vis.scope.borrow().chart.clone();

        assert_eq!(vis.scope.borrow_mut().tick(), TickOutcome::NoData);
        assert_eq!(vis.scope.borrow_mut().tick(), TickOutcome::NoData);

        let scope = vis.scope.borrow();
        assert_eq!(scope.chart.accel.y_extent, before.accel.y_extent);
        assert_eq!(scope.chart.gyro.x_extent, before.gyro.x_extent);
        for channel in Channel::ACCEL.into_iter().chain(Channel::GYRO) {
            assert_eq!(
                scope.chart.series(channel).unwrap().points(),
                before.series(channel).unwrap().points()
            );
        }
    }

    #[test]
    fn unbound_visualizer_ticks_as_no_data() {
        let vis = Visualizer::new(VisualizerConfig::default());
        assert_eq!(vis.scope.borrow_mut().tick(), TickOutcome::NoData);
        assert!(points(&vis, Channel::Ax).is_empty());
    }

    #[test]
    fn autoscale_uses_ten_percent_headroom() {
        let (vis, _) = running(1000, ManualSource::from_windows([ramp(11, 0.0)]));
        vis.scope.borrow_mut().tick();
        let scope = vis.scope.borrow();
        // accel spans 0..=30, gyro spans -30..=0
        assert_eq!(scope.chart.accel.y_extent, AxisExtent::new(-3.0, 33.0));
        assert_eq!(scope.chart.gyro.y_extent, AxisExtent::new(-33.0, 3.0));
    }

    #[test]
    fn failing_tick_keeps_timer_running() {
        let source = ManualSource::new(vec![
            Err(VisualizerError::Accessor("serial read timed out".into())),
            Ok(Some(ramp(5, 0.0))),
        ]);
        let (vis, t0) = running(1000, source);
        let step = Duration::from_millis(10);
        let mut scope = vis.scope.borrow_mut();

        assert_eq!(scope.poll(t0), Some(TickOutcome::Failed));
        assert!(scope.timer.is_running());
        assert_eq!(scope.poll(t0 + step / 2), None);
        assert_eq!(scope.poll(t0 + step), Some(TickOutcome::Updated));
        assert_eq!(scope.dropped_frames, 1);
        assert_eq!(scope.lifecycle, Lifecycle::Running);
    }

    #[test]
    fn malformed_window_is_dropped() {
        let mut ragged = ramp(6, 0.0);
        ragged.gx.pop();
        let source = ManualSource::new(vec![Ok(Some(ramp(3, 0.0))), Ok(Some(ragged))]);
        let (vis, _) = running(1000, source);
        vis.scope.borrow_mut().tick();

        assert_eq!(vis.scope.borrow_mut().tick(), TickOutcome::Failed);
        assert_eq!(points(&vis, Channel::Gx).len(), 3);
    }

    #[test]
    fn non_finite_extent_keeps_updated_series() {
        let mut window = ramp(4, 0.0);
        window.ay[2] = f64::INFINITY;
        let (vis, _) = running(1000, ManualSource::from_windows([ramp(2, 0.0), window]));
        vis.scope.borrow_mut().tick();
        let x_before = vis.scope.borrow().chart.accel.x_extent;

        assert_eq!(vis.scope.borrow_mut().tick(), TickOutcome::Failed);
        assert_eq!(points(&vis, Channel::Ay).len(), 4);
        assert_eq!(points(&vis, Channel::Gz).len(), 4);
        assert_eq!(vis.scope.borrow().chart.accel.x_extent, x_before);
    }

    #[test]
    fn stop_before_start_and_twice_is_harmless() {
        let mut vis = Visualizer::new(VisualizerConfig::default());
        vis.stop();
        vis.stop();
        assert_eq!(vis.lifecycle(), Lifecycle::Stopped);
        assert!(vis.stop_handle().is_requested());
    }

    #[test]
    fn stop_halts_a_running_visualizer() {
        let (mut vis, t0) = running(1000, ManualSource::from_windows([ramp(3, 0.0)]));
        assert_eq!(vis.lifecycle(), Lifecycle::Running);
        vis.stop();
        vis.stop();
        let mut scope = vis.scope.borrow_mut();
        assert!(!scope.timer.is_running());
        assert_eq!(scope.poll(t0 + Duration::from_secs(1)), None);
    }

    #[test]
    fn stopped_visualizer_cannot_restart() {
        let mut vis = Visualizer::new(VisualizerConfig::default());
        vis.stop();
        let err = vis
            .bind(Box::new(ManualSource::new(Vec::new())), Instant::now())
            .unwrap_err();
        assert!(matches!(err, VisualizerError::AlreadyStopped));
    }

    #[test]
    fn run_guard_stops_timer_on_drop() {
        let (vis, _) = running(1000, ManualSource::new(Vec::new()));
        {
            let _guard = RunGuard {
                scope: Rc::clone(&vis.scope),
            };
        }
        assert!(!vis.scope.borrow().timer.is_running());
        assert_eq!(vis.lifecycle(), Lifecycle::Stopped);
    }
}
