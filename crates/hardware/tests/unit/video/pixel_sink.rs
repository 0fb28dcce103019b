//! # Pixel Sink Tests
//!
//! Verifies colour expansion, active/bounds gating and vsync frame completion.

use cosim_core::core::VideoPins;
use cosim_core::video::{PixelSink, expand_rrggbb};
use rstest::rstest;

fn pixel(x: u16, y: u16, rrggbb: u8, active: bool) -> VideoPins {
    VideoPins {
        rrggbb,
        active,
        x,
        y,
        vsync: false,
    }
}

fn vsync(level: bool) -> VideoPins {
    VideoPins {
        vsync: level,
        ..VideoPins::default()
    }
}

#[rstest]
#[case(0b00_00_00, [0, 0, 0, 255])]
#[case(0b11_11_11, [255, 255, 255, 255])]
#[case(0b10_00_00, [170, 0, 0, 255])]
#[case(0b00_01_00, [0, 85, 0, 255])]
#[case(0b00_00_11, [0, 0, 255, 255])]
#[case(0b11_00_00 | 0b0100_0000, [255, 0, 0, 255])]
fn channels_expand_by_85(#[case] color: u8, #[case] rgba: [u8; 4]) {
    assert_eq!(expand_rrggbb(color), rgba);
}

#[test]
fn active_pixel_visible_after_vsync_falling_edge() {
    let mut sink = PixelSink::new(320, 200);
    assert!(!sink.feed(&pixel(10, 10, 0b11_00_00, true)));
    assert!(!sink.feed(&vsync(true)));
    assert!(sink.feed(&vsync(false)));
    assert_eq!(sink.frames_completed(), 1);
    assert_eq!(sink.frame().pixel(10, 10), Some([255, 0, 0, 255]));
}

#[test]
fn inactive_pixel_is_not_drawn() {
    let mut sink = PixelSink::new(320, 200);
    let _ = sink.feed(&pixel(10, 10, 0b11_00_00, false));
    let _ = sink.feed(&vsync(true));
    let _ = sink.feed(&vsync(false));
    assert_eq!(sink.frame().pixel(10, 10), Some([0, 0, 0, 255]));
}

#[test]
fn out_of_bounds_pixel_is_ignored() {
    let mut sink = PixelSink::new(320, 200);
    let _ = sink.feed(&pixel(320, 10, 0x3F, true));
    let _ = sink.feed(&pixel(10, 200, 0x3F, true));
    assert!(sink.frame().as_rgba().chunks(4).all(|p| p == [0, 0, 0, 255]));
    assert_eq!(sink.frame().pixel(320, 10), None);
}

#[test]
fn vsync_held_low_never_completes() {
    let mut sink = PixelSink::new(8, 8);
    for _ in 0..10 {
        assert!(!sink.feed(&vsync(false)));
    }
    assert_eq!(sink.frames_completed(), 0);
}

#[test]
fn rising_vsync_does_not_complete() {
    let mut sink = PixelSink::new(8, 8);
    assert!(!sink.feed(&vsync(true)));
    assert!(!sink.feed(&vsync(true)));
}

#[test]
fn frame_persists_across_frames() {
    let mut sink = PixelSink::new(8, 8);
    let _ = sink.feed(&pixel(1, 1, 0x0C, true));
    for _ in 0..2 {
        let _ = sink.feed(&vsync(true));
        let _ = sink.feed(&vsync(false));
    }
    assert_eq!(sink.frames_completed(), 2);
    assert_eq!(sink.frame().pixel(1, 1), Some([0, 255, 0, 255]));
}
