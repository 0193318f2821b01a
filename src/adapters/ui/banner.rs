//! Startup banner: "WALLCAL" shaded left to right from holiday red to marigold.

use super::palette::{HOLIDAY_RED, MARIGOLD, RULING_GREY};
use crossterm::ExecutableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use figlet_rs::FIGfont;
use std::io::{Write, stdout};

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb { r, g, b }
}

/// Color at `t` in [0.0, 1.0] between `from` and `to`.
fn blend(from: (u8, u8, u8), to: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
    (mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
}

/// Figlet art, or the bare name when the bundled font cannot be loaded.
fn banner_art() -> String {
    FIGfont::standard()
        .ok()
        .and_then(|font| font.convert("WALLCAL").map(|f| f.to_string()))
        .unwrap_or_else(|| "WALLCAL".to_string())
}

/// Shade per column so every row carries the full gradient.
fn column_shade(column: usize, width: usize) -> (u8, u8, u8) {
    let t = if width <= 1 {
        0.0
    } else {
        column as f64 / (width - 1) as f64
    };
    blend(HOLIDAY_RED, MARIGOLD, t)
}

pub fn print_welcome() {
    let mut out = stdout();
    let art = banner_art();
    let width = art.lines().map(|l| l.chars().count()).max().unwrap_or(0);

    for line in art.lines() {
        for (column, ch) in line.chars().enumerate() {
            let _ = out.execute(SetForegroundColor(rgb(column_shade(column, width))));
            let _ = out.execute(Print(ch));
        }
        let _ = out.execute(ResetColor);
        let _ = out.execute(Print("\r\n"));
    }

    let _ = out.execute(SetForegroundColor(rgb(RULING_GREY)));
    let _ = out.execute(Print(format!(
        "v{}  one tabloid page per week, Sunday to Saturday\r\n\r\n",
        env!("CARGO_PKG_VERSION")
    )));
    let _ = out.execute(ResetColor);
    let _ = out.flush();
}
