use std::time::Duration;

use ratatui::layout::Rect;

use super::card::{format_time, format_time_or_zero};
use super::layout::{CardLayout, Hit};

#[test]
fn format_time_pads_seconds_not_minutes() {
    assert_eq!(format_time(Duration::from_secs(0)), "0:00");
    assert_eq!(format_time(Duration::from_secs(9)), "0:09");
    assert_eq!(format_time(Duration::from_secs(59)), "0:59");
    assert_eq!(format_time(Duration::from_secs(65)), "1:05");
    assert_eq!(format_time(Duration::from_secs(600)), "10:00");
}

#[test]
fn format_time_renders_unknown_as_zero() {
    assert_eq!(format_time_or_zero(None), "0:00");
    assert_eq!(format_time_or_zero(Some(Duration::from_secs(65))), "1:05");
}

#[test]
fn layout_places_the_card_inside_the_area() {
    let area = Rect::new(0, 0, 80, 30);
    let layout = CardLayout::compute(area, true);

    assert!(layout.card.width > 0 && layout.card.height > 0);
    assert!(layout.card.x > 0 && layout.card.y > 0);
    assert!(layout.card.x + layout.card.width <= area.width);
    assert!(layout.card.y + layout.card.height <= area.height);
    assert!(layout.art.height > 0);
    assert!(layout.progress.width > 2);
}

#[test]
fn layout_drops_art_when_disabled_or_cramped() {
    let without = CardLayout::compute(Rect::new(0, 0, 80, 30), false);
    assert_eq!(without.art.height, 0);
    assert!(without.card.height > 0);

    let cramped = CardLayout::compute(Rect::new(0, 0, 80, 12), true);
    assert_eq!(cramped.art.height, 0);
    assert!(cramped.card.height > 0);
}

#[test]
fn tiny_areas_yield_an_empty_layout() {
    let layout = CardLayout::compute(Rect::new(0, 0, 10, 4), true);
    assert_eq!(layout.card, Rect::default());
    assert_eq!(layout.hit(3, 2), None);
}

#[test]
fn progress_presses_resolve_to_endpoint_fractions() {
    let layout = CardLayout::compute(Rect::new(0, 0, 80, 30), true);
    let bar = layout.progress;

    match layout.hit(bar.x, bar.y) {
        Some(Hit::Progress(f)) => assert!(f.abs() < 1e-9),
        other => panic!("expected progress hit, got {other:?}"),
    }
    match layout.hit(bar.x + bar.width - 1, bar.y) {
        Some(Hit::Progress(f)) => assert!((f - 1.0).abs() < 1e-9),
        other => panic!("expected progress hit, got {other:?}"),
    }

    // The artist row just above the bar is not a seek.
    assert_eq!(layout.hit(bar.x, bar.y - 1), None);
}

#[test]
fn transport_buttons_resolve_by_position() {
    let layout = CardLayout::compute(Rect::new(0, 0, 80, 30), true);

    assert_eq!(layout.hit(layout.play.x, layout.play.y), Some(Hit::PlayPause));
    assert_eq!(
        layout.hit(layout.skip_back.x, layout.skip_back.y),
        Some(Hit::SkipBack)
    );
    assert_eq!(
        layout.hit(layout.skip_forward.x, layout.skip_forward.y),
        Some(Hit::SkipForward)
    );
    assert_eq!(
        layout.hit(layout.shuffle.x, layout.shuffle.y),
        Some(Hit::Shuffle)
    );
    assert_eq!(layout.hit(layout.repeat.x, layout.repeat.y), Some(Hit::Repeat));
    assert_eq!(layout.hit(layout.like.x, layout.like.y), Some(Hit::Like));
}

#[test]
fn volume_presses_map_to_levels() {
    let layout = CardLayout::compute(Rect::new(0, 0, 80, 30), true);
    let slider = layout.volume;
    assert!(slider.width > 2);

    assert_eq!(layout.hit(slider.x, slider.y), Some(Hit::Volume(0)));
    assert_eq!(
        layout.hit(slider.x + slider.width - 1, slider.y),
        Some(Hit::Volume(100))
    );

    let mid = slider.x + (slider.width - 1) / 2;
    match layout.hit(mid, slider.y) {
        Some(Hit::Volume(level)) => assert!((45..=55).contains(&level)),
        other => panic!("expected volume hit, got {other:?}"),
    }
}

#[test]
fn narrow_terminals_still_get_a_card() {
    let layout = CardLayout::compute(Rect::new(0, 0, 24, 20), true);
    assert!(layout.card.width >= 18);
    assert!(layout.card.width <= 24);
    assert!(layout.progress.width > 0);
}
