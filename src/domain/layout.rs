//! Page layout: turns one filled [`WeekPage`] into a declarative draw list.
//!
//! Units are inches with the origin at the top-left corner of an 11x17 landscape sheet.
//! The builder does no I/O; the assembler hands the list to a renderer.

use crate::domain::{DayCell, WeekPage};
use chrono::NaiveDate;

/// Horizontal anchor of a text placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// Plain 8-bit RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgb,
    /// Line width in inches.
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CirclePaint {
    pub fill: Rgb,
    pub stroke: Stroke,
}

/// One primitive the renderer must draw.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Text {
        text: String,
        at: Point,
        /// Font size in points.
        size: f32,
        align: TextAlign,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    Circle {
        center: Point,
        radius: f32,
        paint: CirclePaint,
    },
}

/// Everything drawn on one week page, in paint order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageLayout {
    pub commands: Vec<DrawCommand>,
}

impl PageLayout {
    /// All text strings on the page, in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Page geometry. Defaults reproduce the printed 11x17 layout.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub title_y: f32,
    pub title_size: f32,
    pub subtitle_y: f32,
    pub subtitle_size: f32,
    pub columns_x: f32,
    pub column_width: f32,
    /// Baseline of the day headers; column content hangs below it.
    pub columns_y: f32,
    pub column_height: f32,
    pub header_size: f32,
    pub label_size: f32,
    /// Distance from the header baseline to the first label.
    pub label_offset: f32,
    pub label_step: f32,
    pub label_inset: f32,
    pub writing_line_count: u32,
    pub writing_line_offset: f32,
    pub writing_line_step: f32,
    pub writing_line_right_inset: f32,
    pub writing_line: Stroke,
    pub separator_overhang: f32,
    pub separator: Stroke,
    pub hole_y: f32,
    pub hole_xs: Vec<f32>,
    pub hole_radius: f32,
    pub hole_paint: CirclePaint,
}

impl Default for LayoutGeometry {
    fn default() -> Self {
        Self {
            page_width: 17.0,
            page_height: 11.0,
            title_y: 0.8,
            title_size: 24.0,
            subtitle_y: 1.5,
            subtitle_size: 16.0,
            columns_x: 0.5,
            column_width: 2.2,
            columns_y: 2.5,
            column_height: 7.5,
            header_size: 14.0,
            label_size: 14.0,
            label_offset: 0.8,
            label_step: 0.3,
            label_inset: 0.1,
            writing_line_count: 24,
            writing_line_offset: 0.5,
            writing_line_step: 0.3,
            writing_line_right_inset: 0.2,
            writing_line: Stroke {
                color: Rgb(100, 100, 100),
                width: 0.01,
            },
            separator_overhang: 0.2,
            separator: Stroke {
                color: Rgb(220, 220, 220),
                width: 0.01,
            },
            hole_y: 0.4,
            hole_xs: vec![2.0, 8.5, 15.0],
            hole_radius: 0.1,
            hole_paint: CirclePaint {
                fill: Rgb(240, 240, 240),
                stroke: Stroke {
                    color: Rgb(200, 200, 200),
                    width: 0.01,
                },
            },
        }
    }
}

/// Builds [`PageLayout`]s for one calendar.
#[derive(Debug, Clone)]
pub struct PageLayoutBuilder {
    title: String,
    reference_year: i32,
    geometry: LayoutGeometry,
}

impl PageLayoutBuilder {
    pub fn new(title: impl Into<String>, reference_year: i32) -> Self {
        Self::with_geometry(title, reference_year, LayoutGeometry::default())
    }

    pub fn with_geometry(
        title: impl Into<String>,
        reference_year: i32,
        geometry: LayoutGeometry,
    ) -> Self {
        Self {
            title: title.into(),
            reference_year,
            geometry,
        }
    }

    pub fn geometry(&self) -> &LayoutGeometry {
        &self.geometry
    }

    /// "2025 - Week 1 (Dec. 29 - Jan. 4)"
    pub fn subtitle(&self, page: &WeekPage) -> String {
        format!(
            "{} - Week {} ({} - {})",
            self.reference_year,
            page.week_number,
            abbreviated(page.week_start),
            abbreviated(page.week_end)
        )
    }

    pub fn build(&self, page: &WeekPage) -> PageLayout {
        let g = &self.geometry;
        let center_x = g.page_width / 2.0;
        let mut commands = vec![
            DrawCommand::Text {
                text: self.title.clone(),
                at: Point::new(center_x, g.title_y),
                size: g.title_size,
                align: TextAlign::Center,
            },
            DrawCommand::Text {
                text: self.subtitle(page),
                at: Point::new(center_x, g.subtitle_y),
                size: g.subtitle_size,
                align: TextAlign::Center,
            },
        ];

        for (index, cell) in page.days.iter().enumerate() {
            let x = g.columns_x + index as f32 * g.column_width;
            self.push_column(&mut commands, index, x, cell);
        }

        for &hx in &g.hole_xs {
            commands.push(DrawCommand::Circle {
                center: Point::new(hx, g.hole_y),
                radius: g.hole_radius,
                paint: g.hole_paint,
            });
        }

        PageLayout { commands }
    }

    fn push_column(&self, commands: &mut Vec<DrawCommand>, index: usize, x: f32, cell: &DayCell) {
        let g = &self.geometry;
        let top = g.columns_y;

        commands.push(DrawCommand::Text {
            text: day_header(cell.date),
            at: Point::new(x + g.column_width / 2.0, top),
            size: g.header_size,
            align: TextAlign::Center,
        });

        // Labels overlap the writing lines; no clipping at the column bottom.
        for (i, label) in cell.labels.iter().enumerate() {
            commands.push(DrawCommand::Text {
                text: label.clone(),
                at: Point::new(
                    x + g.label_inset,
                    top + g.label_offset + i as f32 * g.label_step,
                ),
                size: g.label_size,
                align: TextAlign::Left,
            });
        }

        if index > 0 {
            commands.push(DrawCommand::Line {
                from: Point::new(x, top - g.separator_overhang),
                to: Point::new(x, top + g.column_height - g.separator_overhang),
                stroke: g.separator,
            });
        }

        if !cell.in_range {
            return;
        }
        let bottom = top + g.column_height - g.separator_overhang;
        for n in 1..=g.writing_line_count {
            let y = top + g.writing_line_offset + n as f32 * g.writing_line_step;
            if y < bottom {
                commands.push(DrawCommand::Line {
                    from: Point::new(x + g.label_inset, y),
                    to: Point::new(x + g.column_width - g.writing_line_right_inset, y),
                    stroke: g.writing_line,
                });
            }
        }
    }
}

/// "Dec. 29"
fn abbreviated(date: NaiveDate) -> String {
    format!("{}. {}", date.format("%b"), date.format("%-d"))
}

/// "Sunday - Dec 29"
fn day_header(date: NaiveDate) -> String {
    format!("{} - {} {}", date.format("%A"), date.format("%b"), date.format("%-d"))
}
