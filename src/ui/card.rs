//! Now-playing card rendering.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::App;
use crate::art::CoverArt;
use crate::config::{ControlsSettings, UiSettings};

use super::layout::CardLayout;

const BACKDROP: Color = Color::Rgb(16, 14, 24);
const BACKDROP_DOTS: Color = Color::Rgb(40, 36, 60);
const CARD_BG: Color = Color::Rgb(26, 22, 40);
const ACCENT: Color = Color::Rgb(167, 139, 250);
const TEXT: Color = Color::Rgb(236, 233, 246);
const TEXT_DIM: Color = Color::Rgb(148, 142, 170);
const HEART: Color = Color::Rgb(244, 114, 182);

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("space/p".to_string(), "play/pause".to_string());
    // h/l is filled dynamically from config.
    map.insert("j/k".to_string(), "volume".to_string());
    map.insert("f".to_string(), "like".to_string());
    map.insert("s".to_string(), "shuffle".to_string());
    map.insert("r".to_string(), "repeat".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text, incorporating skip seconds.
fn controls_text(skip_seconds: u64) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = ["space/p", "h/l", "j/k", "f", "s", "r", "q"];
    order
        .iter()
        .filter_map(|k| {
            if *k == "h/l" {
                Some(format!("[h/l] -/+{}s", skip_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `M:SS` (minutes unpadded, seconds two-digit).
pub(super) fn format_time(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Like `format_time`, rendering an unknown duration as `0:00`.
pub(super) fn format_time_or_zero(d: Option<Duration>) -> String {
    format_time(d.unwrap_or(Duration::ZERO))
}

/// Render the whole card into `frame` using `app` state and settings.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    layout: &CardLayout,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let area = frame.area();
    draw_backdrop(frame, area);

    if layout.card.width == 0 || layout.card.height == 0 {
        return;
    }

    let card = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT))
        .style(Style::default().bg(CARD_BG))
        .title(" now playing ")
        .title_alignment(Alignment::Center)
        .title_style(Style::default().fg(TEXT_DIM));
    frame.render_widget(card, layout.card);

    if layout.art.height > 0 {
        draw_art(frame, app.art.as_ref(), layout.art);
    }

    let title = Paragraph::new(app.track.title.as_str())
        .style(Style::default().fg(TEXT).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, layout.title);

    let artist = Paragraph::new(app.track.artist.as_deref().unwrap_or(""))
        .style(Style::default().fg(TEXT_DIM))
        .alignment(Alignment::Center);
    frame.render_widget(artist, layout.artist);

    let progress = Paragraph::new(bar_line(layout.progress.width, app.progress_ratio()));
    frame.render_widget(progress, layout.progress);

    frame.render_widget(times_line(app, layout.times.width), layout.times);

    draw_transport(frame, app, layout);

    let like_symbol = if app.liked { "♥" } else { "♡" };
    let like_color = if app.liked { HEART } else { TEXT_DIM };
    let like = Paragraph::new(like_symbol).style(Style::default().fg(like_color));
    frame.render_widget(like, layout.like);

    let volume_ratio = f64::from(app.volume) / 100.0;
    let volume = Paragraph::new(bar_line(layout.volume.width, volume_ratio));
    frame.render_widget(volume, layout.volume);

    let volume_label = Paragraph::new(format!("{}%", app.volume))
        .style(Style::default().fg(TEXT_DIM))
        .alignment(Alignment::Right);
    frame.render_widget(volume_label, layout.volume_label);

    if ui_settings.show_hints {
        let hints = Paragraph::new(controls_text(controls_settings.skip_seconds))
            .style(Style::default().fg(TEXT_DIM))
            .alignment(Alignment::Center);
        frame.render_widget(hints, layout.hints);
    }
}

/// Fill the whole terminal behind the card, with a faint dot texture so
/// the card reads as floating.
fn draw_backdrop(frame: &mut Frame, area: Rect) {
    frame.render_widget(Block::default().style(Style::default().bg(BACKDROP)), area);

    let buf = frame.buffer_mut();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if (usize::from(x) * 7 + usize::from(y) * 13) % 37 == 0 {
                buf[(x, y)].set_symbol("·").set_fg(BACKDROP_DOTS);
            }
        }
    }
}

/// Render cover art as half-block cells (upper half foreground, lower
/// half background: two pixels per cell). Falls back to a note glyph
/// when no art decoded.
fn draw_art(frame: &mut Frame, art: Option<&CoverArt>, rect: Rect) {
    let lines = match art {
        Some(art) => art_lines(art, rect),
        None => placeholder_lines(rect),
    };
    frame.render_widget(Paragraph::new(lines), rect);
}

fn art_lines(art: &CoverArt, rect: Rect) -> Vec<Line<'static>> {
    let w = usize::from(rect.width);
    let h = usize::from(rect.height);
    let mut lines = Vec::with_capacity(h);
    for y in 0..h {
        let mut spans = Vec::with_capacity(w);
        for x in 0..w {
            let u = (x as f64 + 0.5) / w as f64;
            let top = art.sample(u, (y as f64 * 2.0 + 0.5) / (h as f64 * 2.0));
            let bottom = art.sample(u, (y as f64 * 2.0 + 1.5) / (h as f64 * 2.0));
            spans.push(Span::styled(
                "▀",
                Style::default()
                    .fg(Color::Rgb(top.0, top.1, top.2))
                    .bg(Color::Rgb(bottom.0, bottom.1, bottom.2)),
            ));
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn placeholder_lines(rect: Rect) -> Vec<Line<'static>> {
    let h = usize::from(rect.height);
    let mut lines = vec![Line::default(); h];
    if h > 0 {
        lines[h / 2] = Line::from(Span::styled("♪", Style::default().fg(TEXT_DIM)))
            .alignment(Alignment::Center);
    }
    lines
}

/// A horizontal slider: filled track, knob, remaining track.
fn bar_line(width: u16, ratio: f64) -> Line<'static> {
    let w = usize::from(width);
    if w == 0 {
        return Line::default();
    }
    let filled = (ratio.clamp(0.0, 1.0) * (w - 1) as f64).round() as usize;

    let mut spans = Vec::with_capacity(3);
    if filled > 0 {
        spans.push(Span::styled("━".repeat(filled), Style::default().fg(ACCENT)));
    }
    spans.push(Span::styled("●", Style::default().fg(TEXT)));
    if w > filled + 1 {
        spans.push(Span::styled(
            "─".repeat(w - filled - 1),
            Style::default().fg(TEXT_DIM),
        ));
    }
    Line::from(spans)
}

fn times_line(app: &App, width: u16) -> Paragraph<'static> {
    let elapsed = format_time(app.position);
    let total = format_time_or_zero(app.duration);
    let pad = usize::from(width).saturating_sub(elapsed.chars().count() + total.chars().count());

    Paragraph::new(Line::from(vec![
        Span::styled(elapsed, Style::default().fg(TEXT)),
        Span::raw(" ".repeat(pad)),
        Span::styled(total, Style::default().fg(TEXT_DIM)),
    ]))
}

fn draw_transport(frame: &mut Frame, app: &App, layout: &CardLayout) {
    let toggle_style = |on: bool| {
        if on {
            Style::default().fg(ACCENT)
        } else {
            Style::default().fg(TEXT_DIM)
        }
    };

    let shuffle = Paragraph::new("⇄")
        .style(toggle_style(app.shuffle))
        .alignment(Alignment::Center);
    frame.render_widget(shuffle, layout.shuffle);

    let back = Paragraph::new("⏪")
        .style(Style::default().fg(TEXT))
        .alignment(Alignment::Center);
    frame.render_widget(back, layout.skip_back);

    let play_symbol = if app.is_loading() {
        "…"
    } else if app.is_playing() {
        "⏸"
    } else {
        "▶"
    };
    let play = Paragraph::new(play_symbol)
        .style(Style::default().fg(TEXT).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(play, layout.play);

    let forward = Paragraph::new("⏩")
        .style(Style::default().fg(TEXT))
        .alignment(Alignment::Center);
    frame.render_widget(forward, layout.skip_forward);

    let repeat = Paragraph::new("⟳")
        .style(toggle_style(app.repeat == crate::audio::RepeatMode::One))
        .alignment(Alignment::Center);
    frame.render_widget(repeat, layout.repeat);
}
