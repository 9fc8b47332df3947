//! ratatui adapter: the timeline density strip and the transcript rows.
//!
//! This is one concrete sink for the structural render contract; nothing in
//! the core depends on it. Both widgets delegate drawing to `Paragraph`.

use crate::geometry::FixedRowGeometry;
use backscroll_core::{DensityMap, RenderedBody, RenderedMessage, color_for};

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Paragraph, Widget},
};

fn to_color(c: backscroll_core::NickColor) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

/// Timeline overview: one row per bucket, bar width proportional to message
/// count, with an optional thumb column and sender hover-highlighting.
pub struct DensityStrip<'a> {
    density: &'a DensityMap,
    /// `(top, height)` in track pixels, from [`DensityMap::thumb_span`]
    thumb: Option<(usize, usize)>,
    /// Normalized sender key; buckets containing it light up in that
    /// sender's color at full width
    highlight: Option<&'a str>,
}

impl<'a> DensityStrip<'a> {
    pub fn new(density: &'a DensityMap) -> Self {
        Self { density, thumb: None, highlight: None }
    }

    pub fn with_thumb(mut self, span: (usize, usize)) -> Self {
        self.thumb = Some(span);
        self
    }

    pub fn with_highlight(mut self, sender_key: &'a str) -> Self {
        self.highlight = Some(sender_key);
        self
    }

    fn row_line(&self, y: usize, bar_width: usize) -> Line<'static> {
        let in_thumb = self.thumb.is_some_and(|(top, height)| y >= top && y < top + height);
        let thumb_span = if in_thumb {
            Span::styled("│", Style::default().fg(Color::White))
        } else {
            Span::raw(" ")
        };

        let Some(bucket) = self.density.bucket(y) else {
            return Line::from(vec![thumb_span]);
        };

        let highlighted = self.highlight.filter(|key| bucket.senders.contains(*key));
        let (width, style) = match highlighted {
            Some(key) => (bar_width, Style::default().fg(to_color(color_for(key)))),
            None => (self.density.width_for(bucket.count, bar_width), Style::default().fg(Color::DarkGray)),
        };

        Line::from(vec![thumb_span, Span::styled("█".repeat(width), style)])
    }
}

impl Widget for DensityStrip<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 2 || area.height == 0 {
            return;
        }
        let bar_width = (area.width - 1) as usize;
        let rows = (area.height as usize).min(self.density.track_height());
        let lines: Vec<Line<'static>> = (0..rows).map(|y| self.row_line(y, bar_width)).collect();
        Paragraph::new(Text::from(lines)).render(area, buf);
    }
}

/// Build one terminal line per rendered message. Faded notices produce an
/// empty line: hidden visually, while the message itself survives and keeps
/// row indices aligned with the snapshot.
pub fn transcript_lines<F>(rendered: &[RenderedMessage], is_faded: F) -> Vec<Line<'static>>
where
    F: Fn(&str) -> bool,
{
    rendered
        .iter()
        .map(|msg| {
            let mut spans = Vec::new();
            match &msg.body {
                RenderedBody::Text { segments } => {
                    spans.push(Span::styled("[", Style::default().add_modifier(Modifier::DIM)));
                    spans.push(Span::styled(msg.from.clone(), Style::default().fg(to_color(msg.color))));
                    spans.push(Span::styled("] ", Style::default().add_modifier(Modifier::DIM)));
                    for segment in segments {
                        match segment {
                            backscroll_core::Segment::Literal(text) => {
                                if !text.is_empty() {
                                    spans.push(Span::raw(text.clone()));
                                }
                            }
                            backscroll_core::Segment::Link { text, .. } => {
                                spans.push(Span::styled(
                                    text.clone(),
                                    Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
                                ));
                            }
                        }
                    }
                }
                RenderedBody::Notice { text } => {
                    if is_faded(&msg.id) {
                        return Line::default();
                    }
                    spans.push(Span::styled(
                        text.clone(),
                        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                    ));
                }
                RenderedBody::Plain { text } => {
                    spans.push(Span::styled(text.clone(), Style::default().add_modifier(Modifier::DIM)));
                }
            }

            if let Some(timestamp) = &msg.timestamp {
                spans.push(Span::styled(format!("  {}", timestamp), Style::default().add_modifier(Modifier::DIM)));
            }

            Line::from(spans)
        })
        .collect()
}

/// Transcript widget over pre-built lines
pub struct TranscriptView {
    lines: Vec<Line<'static>>,
    scroll: u16,
}

impl TranscriptView {
    pub fn new(lines: Vec<Line<'static>>, scroll: u16) -> Self {
        Self { lines, scroll }
    }

    /// Geometry describing this view at one cell row per message
    pub fn geometry(&self, area: Rect) -> FixedRowGeometry {
        FixedRowGeometry::new(1, self.lines.len(), area.height as i64).with_scroll(self.scroll as i64)
    }
}

impl Widget for TranscriptView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(Text::from(self.lines)).scroll((self.scroll, 0)).render(area, buf);
    }
}
