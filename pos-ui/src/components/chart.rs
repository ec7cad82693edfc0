//! Chart Component
//!
//! Bar and line charts for dashboard series, drawn on an HTML5 Canvas.

use leptos::*;
use pos_client::dashboard::SeriesPoint;
use pos_client::money::format_number;
use rust_decimal::prelude::ToPrimitive;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const BAR_COLOR: &str = "#f59e0b"; // amber-500
const LINE_COLOR: &str = "#22c55e"; // green-500

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bars,
    Line,
}

#[component]
pub fn Chart(
    title: &'static str,
    #[prop(into)]
    points: Signal<Vec<SeriesPoint>>,
    #[prop(default = ChartKind::Bars)]
    kind: ChartKind,
) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();

    // Redraw when the series changes
    create_effect(move |_| {
        let points = points.get();
        if let Some(canvas) = canvas_ref.get() {
            draw_chart(&canvas, &points, kind);
        }
    });

    view! {
        <section class="bg-gray-800 rounded-xl p-4">
            <h3 class="text-sm text-gray-400 mb-2">{title}</h3>
            <canvas
                node_ref=canvas_ref
                width="640"
                height="260"
                class="w-full h-56 rounded-lg"
            />
        </section>
    }
}

fn draw_chart(canvas: &HtmlCanvasElement, points: &[SeriesPoint], kind: ChartKind) {
    let ctx = match canvas.get_context("2d") {
        Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
            Ok(ctx) => ctx,
            Err(_) => return,
        },
        _ => return,
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;

    let margin_left = 70.0;
    let margin_right = 10.0;
    let margin_top = 10.0;
    let margin_bottom = 30.0;

    let chart_width = width - margin_left - margin_right;
    let chart_height = height - margin_top - margin_bottom;

    ctx.set_fill_style(&"#1f2937".into()); // gray-800
    ctx.fill_rect(0.0, 0.0, width, height);

    let values: Vec<f64> = points
        .iter()
        .map(|p| p.amount.to_f64().unwrap_or(0.0))
        .collect();
    let max = values.iter().copied().fold(0.0_f64, f64::max);

    if values.is_empty() || max <= 0.0 {
        ctx.set_fill_style(&"#6b7280".into());
        ctx.set_font("14px sans-serif");
        let _ = ctx.fill_text("Sin datos", width / 2.0 - 30.0, height / 2.0);
        return;
    }

    // Grid and y labels
    ctx.set_stroke_style(&"#374151".into()); // gray-700
    ctx.set_line_width(1.0);
    ctx.set_font("11px sans-serif");
    for i in 0..=4 {
        let y = margin_top + (i as f64 / 4.0) * chart_height;
        ctx.begin_path();
        ctx.move_to(margin_left, y);
        ctx.line_to(width - margin_right, y);
        ctx.stroke();

        let value = max - (i as f64 / 4.0) * max;
        let label = rust_decimal::Decimal::from_f64_retain(value)
            .map(format_number)
            .unwrap_or_default();
        ctx.set_fill_style(&"#9ca3af".into()); // gray-400
        let _ = ctx.fill_text(&label, 5.0, y + 4.0);
    }

    let slot = chart_width / values.len() as f64;
    let y_of = |v: f64| margin_top + (1.0 - v / max) * chart_height;

    match kind {
        ChartKind::Bars => {
            ctx.set_fill_style(&BAR_COLOR.into());
            for (i, value) in values.iter().enumerate() {
                let x = margin_left + i as f64 * slot + slot * 0.15;
                let y = y_of(*value);
                ctx.fill_rect(x, y, slot * 0.7, margin_top + chart_height - y);
            }
        }
        ChartKind::Line => {
            ctx.set_stroke_style(&LINE_COLOR.into());
            ctx.set_line_width(2.0);
            ctx.begin_path();
            for (i, value) in values.iter().enumerate() {
                let x = margin_left + i as f64 * slot + slot / 2.0;
                if i == 0 {
                    ctx.move_to(x, y_of(*value));
                } else {
                    ctx.line_to(x, y_of(*value));
                }
            }
            ctx.stroke();
        }
    }

    // X labels, thinned out so they do not overlap
    ctx.set_fill_style(&"#9ca3af".into());
    let every = (values.len() / 10).max(1);
    for (i, point) in points.iter().enumerate().filter(|(i, _)| i % every == 0) {
        let x = margin_left + i as f64 * slot + slot / 2.0 - 14.0;
        let label: String = point.label.chars().take(10).collect();
        let _ = ctx.fill_text(&label, x, height - 10.0);
    }
}
