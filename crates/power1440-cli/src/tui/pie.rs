//! Pie chart widget drawn on a braille canvas.
//!
//! The widget only knows segments and a label callback; slice geometry
//! comes from `power1440_core::chart`.

use power1440_core::chart::{pie_slices, ChartSegment, PieSlice};
use power1440_core::Rgb;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Points},
        Block, Widget,
    },
};

const RADIUS: f64 = 0.95;

pub fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

pub struct PieChart<'a, F> {
    segments: &'a [ChartSegment],
    label: F,
    block: Option<Block<'a>>,
}

impl<'a, F> PieChart<'a, F>
where
    F: Fn(&PieSlice) -> String,
{
    pub fn new(segments: &'a [ChartSegment], label: F) -> Self {
        Self {
            segments,
            label,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

/// Sample the canvas at braille resolution and bucket every point inside
/// the circle by the slice its angle falls in.
fn slice_points(slices: &[PieSlice], area: Rect, x_extent: f64) -> Vec<Vec<(f64, f64)>> {
    let mut buckets = vec![Vec::new(); slices.len()];
    let cols = (area.width as usize).max(1) * 2;
    let rows = (area.height as usize).max(1) * 4;
    for i in 0..cols {
        let x = -x_extent + (i as f64 + 0.5) * (2.0 * x_extent / cols as f64);
        for j in 0..rows {
            let y = -1.0 + (j as f64 + 0.5) * (2.0 / rows as f64);
            if x * x + y * y > RADIUS * RADIUS {
                continue;
            }
            let angle = y.atan2(x).to_degrees().rem_euclid(360.0);
            if let Some(slice) = slices.iter().find(|s| s.contains_angle(angle)) {
                buckets[slice.index].push((x, y));
            }
        }
    }
    buckets
}

impl<'a, F> Widget for PieChart<'a, F>
where
    F: Fn(&PieSlice) -> String,
{
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match &self.block {
            Some(block) => block.inner(area),
            None => area,
        };
        if inner.width == 0 || inner.height == 0 {
            if let Some(block) = self.block {
                block.render(area, buf);
            }
            return;
        }

        // Terminal cells are about twice as tall as wide.
        let x_extent = inner.width as f64 / (inner.height as f64 * 2.0);
        let slices = pie_slices(self.segments);
        let points = slice_points(&slices, inner, x_extent);
        let labels: Vec<(f64, f64, String)> = slices
            .iter()
            .filter(|s| s.sweep > 0.0)
            .map(|s| {
                let (x, y) = s.label_anchor(RADIUS);
                (x, y, (self.label)(s))
            })
            .collect();
        let segments = self.segments;

        let mut canvas = Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([-x_extent, x_extent])
            .y_bounds([-1.0, 1.0])
            .paint(move |ctx| {
                for (seg, coords) in segments.iter().zip(&points) {
                    ctx.draw(&Points {
                        coords,
                        color: to_color(seg.color),
                    });
                }
                ctx.layer();
                for (x, y, text) in &labels {
                    let offset = text.chars().count() as f64 * x_extent / inner.width as f64;
                    ctx.print(
                        x - offset,
                        *y,
                        Span::styled(
                            text.clone(),
                            Style::default()
                                .fg(Color::Black)
                                .add_modifier(Modifier::BOLD),
                        ),
                    );
                }
            });
        if let Some(block) = self.block {
            canvas = canvas.block(block);
        }
        canvas.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use power1440_core::chart::value_label;
    use power1440_core::{chart, Allocation, TaskLedger};

    fn rendered(buf: &Buffer, area: Rect) -> String {
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().chars().next().unwrap_or(' '))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn every_point_lands_in_a_positive_slice() {
        let segs = chart::segments(&Allocation::default(), &TaskLedger::new());
        let slices = pie_slices(&segs);
        let area = Rect::new(0, 0, 20, 10);
        let buckets = slice_points(&slices, area, 1.0);
        assert!(!buckets[0].is_empty());
        assert!(!buckets[1].is_empty());
        assert!(buckets[2].is_empty());
        assert!(!buckets[3].is_empty());
        assert!(buckets[1].len() > buckets[0].len());
    }

    #[test]
    fn renders_raw_values_inside_slices() {
        let segs = chart::segments(&Allocation::default(), &TaskLedger::new());
        let area = Rect::new(0, 0, 40, 16);
        let mut buf = Buffer::empty(area);
        PieChart::new(&segs, value_label).render(area, &mut buf);
        let text = rendered(&buf, area);
        assert!(text.contains("600"), "missing livelihood label:\n{text}");
        assert!(text.contains("420"), "missing sleep label:\n{text}");
    }

    #[test]
    fn tiny_area_does_not_panic() {
        let segs = chart::segments(&Allocation::default(), &TaskLedger::new());
        let area = Rect::new(0, 0, 2, 2);
        let mut buf = Buffer::empty(area);
        PieChart::new(&segs, value_label)
            .block(Block::bordered())
            .render(area, &mut buf);
    }
}
