use std::sync::Arc;

use wavecarve::pyramid;
use wavecarve::selection::Selection;

fn counted(len: usize) -> Arc<Vec<f32>> {
    Arc::new((0..len).map(|i| (i + 1) as f32).collect())
}

#[test]
fn factor_one_level_is_the_buffer_itself() {
    let buf = counted(4096);
    let pyr = pyramid::build_pyramid(&buf, &[4096, 256, 16, 1]);
    let level = pyr.level(1).expect("raw level");
    assert!(level.is_raw());
    assert!(Arc::ptr_eq(level.raw().expect("alias"), &buf));
    assert_eq!(level.samples(), buf.as_slice());
}

#[test]
fn bucketed_levels_have_floor_len_over_factor_entries() {
    let buf = counted(10_000);
    let pyr = pyramid::build_pyramid(&buf, &[4096, 256, 16, 1]);
    assert_eq!(pyr.level(16).unwrap().len(), 625);
    assert_eq!(pyr.level(256).unwrap().len(), 39);
    assert_eq!(pyr.level(4096).unwrap().len(), 2);
    assert_eq!(pyr.levels().len(), 4);
}

#[test]
fn window_is_zero_padded_at_the_left_boundary() {
    let buf = counted(1024);
    let pyr = pyramid::build_pyramid(&buf, &[1]);
    let level = pyr.level(1).unwrap();
    let win = pyramid::window_at(level, 10, 64);
    assert_eq!(win.len(), 64);
    for v in &win[..22] {
        assert_eq!(*v, 0.0);
    }
    assert_eq!(win[22], 1.0); // first real sample
    assert_eq!(win[32], 11.0); // the center sample stays centered
}

#[test]
fn window_truncates_at_the_right_boundary() {
    let buf = counted(100);
    let pyr = pyramid::build_pyramid(&buf, &[1]);
    let win = pyramid::window_at(pyr.level(1).unwrap(), 90, 64);
    assert_eq!(win.len(), 42); // 32 before the center + 10 remaining after
    assert_eq!(win[0], 59.0);
}

#[test]
fn selection_windows_meet_exactly_at_the_edges() {
    let buf = counted(4096);
    let pyr = pyramid::build_pyramid(&buf, &[16, 1]);
    let sel = Selection::new(1600, 3200, 4096).unwrap();

    let w = pyramid::selection_windows(pyr.level(1).unwrap(), sel, 512);
    assert_eq!(w.before_low.len(), 256);
    assert_eq!(*w.before_low.last().unwrap(), 1600.0); // sample index 1599
    assert_eq!(w.after_high.len(), 256);
    assert_eq!(w.after_high[0], 3201.0); // sample index 3200
    assert_eq!(w.span.len(), 512);
    assert_eq!(w.span[0], 2945.0); // approach to the high edge
    assert_eq!(w.span[256], 1601.0); // departure from the low edge
}

#[test]
fn selection_windows_pad_and_clip_at_coarser_levels() {
    let buf = counted(4096);
    let pyr = pyramid::build_pyramid(&buf, &[16, 1]);
    let sel = Selection::new(1600, 3200, 4096).unwrap();

    // level length 256; local edges at 100 and 200
    let w = pyramid::selection_windows(pyr.level(16).unwrap(), sel, 512);
    assert_eq!(w.before_low.len(), 256);
    for v in &w.before_low[..156] {
        assert_eq!(*v, 0.0); // zero pre-roll before the start of the level
    }
    assert_eq!(w.after_high.len(), 56); // clipped by the end of the level
    assert_eq!(w.span.len(), 200); // both sides clipped to the 100-entry span
}

#[test]
fn narrow_selection_span_is_clipped_to_the_selection() {
    let buf = counted(4096);
    let pyr = pyramid::build_pyramid(&buf, &[1]);
    let sel = Selection::new(2000, 2010, 4096).unwrap();
    let w = pyramid::selection_windows(pyr.level(1).unwrap(), sel, 512);
    assert_eq!(w.span.len(), 20);
}
