//! Chart rendering with plotters.
//!
//! All drawing state lives in a [`RenderContext`] built from the chart
//! settings; nothing here touches global style.

use crate::analysis::{percent, Aggregates, PrimaryCategorySummary, RankedEntry};
use crate::config::{ChartConfig, PipelineConfig};
use anyhow::Result;
use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use tracing::debug;

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

const STUDY_TYPE_COLORS: [RGBColor; 2] = [RGBColor(0x2E, 0x86, 0xAB), RGBColor(0xA2, 0x3B, 0x72)];
const SPONSOR_TYPE_COLORS: [RGBColor; 4] = [
    RGBColor(0x2E, 0x86, 0xAB),
    RGBColor(0xF1, 0x8F, 0x01),
    RGBColor(0x06, 0xBA, 0x63),
    RGBColor(0xA2, 0x3B, 0x72),
];
const PRIMARY_COLORS: [RGBColor; 4] = [
    RGBColor(0xE6, 0x39, 0x46),
    RGBColor(0xF1, 0x8F, 0x01),
    RGBColor(0x06, 0xBA, 0x63),
    RGBColor(0x45, 0x7B, 0x9D),
];
const INTERVENTION_COLOR: RGBColor = RGBColor(0xF1, 0x8F, 0x01);
const SPONSOR_COLOR: RGBColor = RGBColor(0x00, 0x6B, 0xA6);
const CONDITION_COLOR: RGBColor = RGBColor(0xC7, 0x3E, 0x1D);
const BREAKDOWN_COLOR: RGBColor = RGBColor(0x2E, 0x86, 0xAB);

/// Longest bar label before truncation.
const MAX_LABEL_CHARS: usize = 42;

/// Explicit rendering state passed to every chart function.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub font: String,
    pub title: String,
    pub dashboard_size: (u32, u32),
    pub breakdown_size: (u32, u32),
}

impl From<&ChartConfig> for RenderContext {
    fn from(config: &ChartConfig) -> Self {
        Self {
            font: config.font.clone(),
            title: config.title.clone(),
            dashboard_size: config.dashboard_size,
            breakdown_size: config.breakdown_size,
        }
    }
}

impl RenderContext {
    fn styled(&self, size: i32, style: FontStyle) -> TextStyle<'_> {
        FontDesc::new(FontFamily::Name(&self.font), f64::from(size), style).color(&BLACK)
    }

    fn text(&self, size: i32) -> TextStyle<'_> {
        self.styled(size, FontStyle::Normal)
    }

    fn bold(&self, size: i32) -> TextStyle<'_> {
        self.styled(size, FontStyle::Bold)
    }
}

/// Layout of one horizontal bar panel.
struct BarPanel<'a> {
    title: String,
    entries: &'a [RankedEntry],
    color: RGBColor,
    label_size: i32,
    y_desc: Option<&'a str>,
    annotate: bool,
}

/// Render the six-panel dashboard.
pub fn render_dashboard(
    ctx: &RenderContext,
    aggregates: &Aggregates,
    pipeline: &PipelineConfig,
    path: &Path,
) -> Result<()> {
    debug!("Rendering dashboard to {}", path.display());

    let root = SVGBackend::new(path, ctx.dashboard_size).into_drawing_area();
    root.fill(&WHITE)?;
    let body = root.titled(&ctx.title, ctx.bold(30))?;
    let panels = body.split_evenly((3, 2));

    draw_pie(
        ctx,
        &panels[0],
        "Study Type Distribution",
        &aggregates.study_types,
        &STUDY_TYPE_COLORS,
    )?;

    draw_horizontal_bars(
        ctx,
        &panels[1],
        &BarPanel {
            title: format!("Top {} Intervention Types", pipeline.top_n_interventions),
            entries: &aggregates.top_interventions,
            color: INTERVENTION_COLOR,
            label_size: 14,
            y_desc: None,
            annotate: false,
        },
    )?;

    draw_horizontal_bars(
        ctx,
        &panels[2],
        &BarPanel {
            title: format!("Top {} Sponsors", pipeline.top_n_sponsors),
            entries: &aggregates.top_sponsors,
            color: SPONSOR_COLOR,
            label_size: 12,
            y_desc: None,
            annotate: false,
        },
    )?;

    draw_horizontal_bars(
        ctx,
        &panels[3],
        &BarPanel {
            title: format!("Top {} Conditions Studied", pipeline.top_n_conditions),
            entries: &aggregates.top_conditions,
            color: CONDITION_COLOR,
            label_size: 11,
            y_desc: None,
            annotate: false,
        },
    )?;

    draw_primary_categories(ctx, &panels[4], &aggregates.primary)?;

    let sponsor_slices: Vec<RankedEntry> = aggregates
        .sponsor_categories
        .iter()
        .map(|s| RankedEntry {
            label: s.category.label().to_string(),
            count: s.count,
        })
        .collect();
    draw_pie(
        ctx,
        &panels[5],
        "Sponsor Category Distribution",
        &sponsor_slices,
        &SPONSOR_TYPE_COLORS,
    )?;

    root.present()?;
    Ok(())
}

/// Render the standalone intervention breakdown with counts at each bar end.
pub fn render_intervention_breakdown(
    ctx: &RenderContext,
    entries: &[RankedEntry],
    pipeline: &PipelineConfig,
    path: &Path,
) -> Result<()> {
    debug!("Rendering intervention breakdown to {}", path.display());

    let root = SVGBackend::new(path, ctx.breakdown_size).into_drawing_area();
    root.fill(&WHITE)?;

    draw_horizontal_bars(
        ctx,
        &root,
        &BarPanel {
            title: format!(
                "Intervention Type Distribution (Top {})",
                pipeline.top_n_interventions_detail
            ),
            entries,
            color: BREAKDOWN_COLOR,
            label_size: 14,
            y_desc: Some("Intervention Type"),
            annotate: true,
        },
    )?;

    root.present()?;
    Ok(())
}

fn draw_pie(
    ctx: &RenderContext,
    area: &Area<'_>,
    title: &str,
    slices: &[RankedEntry],
    palette: &[RGBColor],
) -> Result<()> {
    let area = area.titled(title, ctx.bold(22))?;
    let (w, h) = area.dim_in_pixel();
    let center = ((w / 2) as i32, (h / 2) as i32);

    let total: usize = slices.iter().map(|s| s.count).sum();
    if total == 0 {
        area.draw(&Text::new(
            "No data",
            center,
            ctx.text(16).pos(Pos::new(HPos::Center, VPos::Center)),
        ))?;
        return Ok(());
    }

    let radius = f64::from(w.min(h)) * 0.32;
    let sizes: Vec<f64> = slices.iter().map(|s| s.count as f64).collect();
    let colors: Vec<RGBColor> = (0..slices.len())
        .map(|i| palette[i % palette.len()])
        .collect();
    let labels: Vec<String> = slices
        .iter()
        .map(|s| format!("{} ({:.1}%)", s.label, percent(s.count, total)))
        .collect();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    // First slice starts at twelve o'clock
    pie.start_angle(-90.0);
    pie.label_style(ctx.text(15));
    area.draw(&pie)?;

    Ok(())
}

fn draw_horizontal_bars(ctx: &RenderContext, area: &Area<'_>, panel: &BarPanel<'_>) -> Result<()> {
    let rows = panel.entries.len() as i32;
    let max = panel.entries.iter().map(|e| e.count).max().unwrap_or(0) as u32;
    // Headroom for the end-of-bar annotations
    let x_max = (max + max / 8).max(1) + 1;

    let labels: Vec<String> = panel.entries.iter().map(|e| truncate_label(&e.label)).collect();
    let longest = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let label_area = ((longest as f64 * f64::from(panel.label_size) * 0.6) as u32).clamp(60, 420);

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ctx.bold(22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(label_area)
        .build_cartesian_2d(0u32..x_max, (0..rows.max(1)).into_segmented())?;

    // Rank 0 sits on the top row
    let row_of = |rank: usize| rows - 1 - rank as i32;
    let label_for = |value: &SegmentValue<i32>| match value {
        SegmentValue::CenterOf(y) if (0..rows).contains(y) => {
            labels[(rows - 1 - *y) as usize].clone()
        }
        _ => String::new(),
    };

    let mut mesh = chart.configure_mesh();
    mesh.disable_y_mesh()
        .x_desc("Number of Trials")
        .y_labels(rows as usize + 1)
        .y_label_style(ctx.text(panel.label_size))
        .y_label_formatter(&label_for)
        .x_label_style(ctx.text(12));
    if let Some(desc) = panel.y_desc {
        mesh.y_desc(desc);
    }
    mesh.draw()?;

    chart.draw_series(panel.entries.iter().enumerate().map(|(rank, e)| {
        let y = row_of(rank);
        let mut bar = Rectangle::new(
            [
                (0, SegmentValue::Exact(y)),
                (e.count as u32, SegmentValue::Exact(y + 1)),
            ],
            panel.color.filled(),
        );
        bar.set_margin(3, 3, 0, 0);
        bar
    }))?;

    if panel.annotate {
        let style = ctx
            .text(panel.label_size)
            .pos(Pos::new(HPos::Left, VPos::Center));
        chart.draw_series(panel.entries.iter().enumerate().map(|(rank, e)| {
            Text::new(
                format!(" {}", e.count),
                (e.count as u32, SegmentValue::CenterOf(row_of(rank))),
                style.clone(),
            )
        }))?;
    }

    Ok(())
}

fn draw_primary_categories(
    ctx: &RenderContext,
    area: &Area<'_>,
    primary: &PrimaryCategorySummary,
) -> Result<()> {
    let bars = primary.bars();
    let low = bars.iter().map(|(_, v)| *v).min().unwrap_or(0).min(0);
    let high = bars.iter().map(|(_, v)| *v).max().unwrap_or(0).max(1);
    let pad = (high - low) / 10 + 1;
    let y_min = if low < 0 { low - pad } else { 0 };

    let mut chart = ChartBuilder::on(area)
        .caption("Primary Intervention Categories", ctx.bold(22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((0..bars.len() as i32).into_segmented(), y_min..high + pad)?;

    let label_for = |value: &SegmentValue<i32>| match value {
        SegmentValue::CenterOf(x) => bars
            .get(*x as usize)
            .map(|(label, _)| label.to_string())
            .unwrap_or_default(),
        _ => String::new(),
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc("Number of Trials")
        .x_labels(bars.len() + 1)
        .x_label_formatter(&label_for)
        .x_label_style(ctx.text(13))
        .y_label_style(ctx.text(12))
        .draw()?;

    chart.draw_series(bars.iter().enumerate().map(|(i, (_, value))| {
        let x = i as i32;
        let mut bar = Rectangle::new(
            [(SegmentValue::Exact(x), *value), (SegmentValue::Exact(x + 1), 0)],
            PRIMARY_COLORS[i % PRIMARY_COLORS.len()].filled(),
        );
        bar.set_margin(0, 0, 12, 12);
        bar
    }))?;

    Ok(())
}

/// Shorten long labels so the label area stays readable.
fn truncate_label(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_CHARS {
        label.to_string()
    } else {
        let head: String = label.chars().take(MAX_LABEL_CHARS - 1).collect();
        format!("{}…", head)
    }
}
