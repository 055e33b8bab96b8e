//! Card geometry and pointer hit zones.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Nominal card width in cells; shrinks on narrow terminals.
const CARD_WIDTH: u16 = 46;

/// Tallest art block we render, in rows.
const MAX_ART_ROWS: u16 = 11;

/// Resolved positions of everything on the card.
///
/// Computed once per frame from the terminal area and kept around for
/// mouse hit-testing, so presses resolve against the geometry that was
/// actually rendered.
#[derive(Debug, Default, Clone, Copy)]
pub struct CardLayout {
    pub card: Rect,
    pub art: Rect,
    pub title: Rect,
    pub artist: Rect,
    pub progress: Rect,
    pub times: Rect,
    pub shuffle: Rect,
    pub skip_back: Rect,
    pub play: Rect,
    pub skip_forward: Rect,
    pub repeat: Rect,
    pub like: Rect,
    pub volume: Rect,
    pub volume_label: Rect,
    pub hints: Rect,
}

/// What a pointer press resolved to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hit {
    PlayPause,
    SkipBack,
    SkipForward,
    Shuffle,
    Repeat,
    Like,
    /// Press on the progress bar at this fraction of the track.
    Progress(f64),
    /// Press on the volume slider mapping to this level.
    Volume(u8),
}

impl CardLayout {
    /// Compute the card geometry for `area`. The art block is dropped
    /// entirely when `show_art` is false or the terminal is too short
    /// for it; absurdly small areas yield an all-zero layout.
    pub fn compute(area: Rect, show_art: bool) -> Self {
        let mut layout = Self::default();
        if area.width < 20 || area.height < 9 {
            return layout;
        }

        layout.hints = Rect::new(area.x, area.y + area.height - 1, area.width, 1);
        let body = Rect::new(area.x, area.y, area.width, area.height - 2);

        let mut art_rows = if show_art {
            MAX_ART_ROWS.min(body.height.saturating_sub(10))
        } else {
            0
        };
        if art_rows < 4 {
            art_rows = 0;
        }

        // Six text rows (title, artist, progress, times, transport,
        // volume) plus the border.
        let width = CARD_WIDTH.min(body.width.saturating_sub(2)).max(18);
        let height = (art_rows + 8).min(body.height);
        layout.card = centered_rect(width, height, body);

        let inner = Rect::new(
            layout.card.x + 1,
            layout.card.y + 1,
            layout.card.width.saturating_sub(2),
            layout.card.height.saturating_sub(2),
        );

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(art_rows),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        if art_rows > 0 {
            // Half-block cells are twice as tall as wide; 2:1 keeps the
            // picture roughly square.
            let art_width = (art_rows * 2).min(inner.width);
            layout.art = Rect::new(
                inner.x + (inner.width - art_width) / 2,
                rows[0].y,
                art_width,
                art_rows,
            );
        }

        layout.title = rows[1];
        layout.artist = rows[2];
        layout.progress = inset_x(rows[3], 2);
        layout.times = inset_x(rows[4], 2);

        let transport_width = 22.min(inner.width);
        let transport = Rect::new(
            inner.x + (inner.width - transport_width) / 2,
            rows[5].y,
            transport_width,
            rows[5].height,
        );
        let buttons = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(4),
                Constraint::Length(6),
                Constraint::Length(4),
                Constraint::Length(4),
            ])
            .split(transport);
        layout.shuffle = buttons[0];
        layout.skip_back = buttons[1];
        layout.play = buttons[2];
        layout.skip_forward = buttons[3];
        layout.repeat = buttons[4];

        let bottom = inset_x(rows[6], 2);
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(5),
            ])
            .split(bottom);
        layout.like = cols[0];
        layout.volume = cols[1];
        layout.volume_label = cols[2];

        layout
    }

    /// Resolve a pointer press to a control, if it landed on one.
    pub fn hit(&self, column: u16, row: u16) -> Option<Hit> {
        if contains(self.play, column, row) {
            return Some(Hit::PlayPause);
        }
        if contains(self.skip_back, column, row) {
            return Some(Hit::SkipBack);
        }
        if contains(self.skip_forward, column, row) {
            return Some(Hit::SkipForward);
        }
        if contains(self.shuffle, column, row) {
            return Some(Hit::Shuffle);
        }
        if contains(self.repeat, column, row) {
            return Some(Hit::Repeat);
        }
        if contains(self.like, column, row) {
            return Some(Hit::Like);
        }
        if contains(self.progress, column, row) {
            return Some(Hit::Progress(fraction_in(self.progress, column)));
        }
        if contains(self.volume, column, row) {
            let level = (fraction_in(self.volume, column) * 100.0).round() as u8;
            return Some(Hit::Volume(level));
        }
        None
    }
}

fn contains(r: Rect, column: u16, row: u16) -> bool {
    column >= r.x
        && column < r.x.saturating_add(r.width)
        && row >= r.y
        && row < r.y.saturating_add(r.height)
}

/// Fraction of the way across `r` for a press at `column`; the first and
/// last cells map to exactly 0.0 and 1.0.
fn fraction_in(r: Rect, column: u16) -> f64 {
    if r.width <= 1 {
        return 0.0;
    }
    f64::from(column.saturating_sub(r.x)) / f64::from(r.width - 1)
}

fn inset_x(r: Rect, dx: u16) -> Rect {
    if r.width <= dx * 2 {
        return r;
    }
    Rect::new(r.x + dx, r.y, r.width - dx * 2, r.height)
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width).max(1);
    height = height.min(r.height).max(1);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}
