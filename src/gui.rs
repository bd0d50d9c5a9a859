// src/gui.rs
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use eframe::egui;
use egui::Color32;
use egui_plot::{Legend, Line, Plot, PlotBounds, PlotPoints};

use crate::chart::PlotPanel;
use crate::visualizer::{Scope, StopHandle};

// dark_background 配色
const SERIES_COLORS: [Color32; 3] = [
    Color32::from_rgb(0x8d, 0xd3, 0xc7),
    Color32::from_rgb(0xfe, 0xff, 0xb3),
    Color32::from_rgb(0xbf, 0xbb, 0xd9),
];

/// Chart surface: draws the shared scope and drives its redraw timer.
pub struct ScopeApp {
    scope: Rc<RefCell<Scope>>,
    stop: StopHandle,
    title: String,
    closing: bool,
}

impl ScopeApp {
    pub(crate) fn new(scope: Rc<RefCell<Scope>>, stop: StopHandle, title: String) -> Self {
        Self {
            scope,
            stop,
            title,
            closing: false,
        }
    }

    fn draw_panel(ui: &mut egui::Ui, panel: &PlotPanel, height: f32) {
        let group = panel.group;
        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new(group.title()).strong().size(15.0));
        });
        Plot::new(group.title())
            .height(height)
            .legend(Legend::default())
            .x_axis_label("Sample")
            .y_axis_label(group.y_label())
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .show(ui, |plot_ui| {
                for (series, color) in panel.series.iter().zip(SERIES_COLORS) {
                    let points = PlotPoints::new(series.points().to_vec());
                    plot_ui.line(Line::new(points).name(series.channel).color(color));
                }
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                    [panel.x_extent.min, panel.y_extent.min],
                    [panel.x_extent.max, panel.y_extent.max],
                ));
            });
    }
}

impl eframe::App for ScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut scope = self.scope.borrow_mut();

        // 1. 外部停止请求
        if self.stop.is_requested() && !self.closing {
            scope.halt();
            self.closing = true;
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        // 2. 定时重绘
        let now = Instant::now();
        scope.poll(now);

        // 3. UI 绘制
        egui::TopBottomPanel::top("title").show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(&self.title);
            });
            ui.horizontal(|ui| {
                ui.label(format!("Samples shown: {}", scope.shown));
                if scope.dropped_frames > 0 {
                    ui.label(
                        egui::RichText::new(format!("Dropped frames: {}", scope.dropped_frames))
                            .color(Color32::YELLOW),
                    );
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            // 两个绘图区平分剩余高度，减去标题行
            let height = (ui.available_height() / 2.0 - 30.0).max(80.0);
            for panel in scope.chart.panels() {
                Self::draw_panel(ui, panel, height);
            }
        });

        if let Some(wait) = scope.timer.until_due(now) {
            ctx.request_repaint_after(wait);
        }
    }
}
