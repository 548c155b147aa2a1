use digitlens_common::DigitlensError;
use digitlens_frame_model::{Bgra, DigitImage, OwnedFrame};
use digitlens_processing_core::FramePreprocessor;

fn white_frame(width: u32, height: u32) -> OwnedFrame {
    OwnedFrame::solid(width, height, Bgra::WHITE)
}

#[test]
fn minimum_frame_size_is_exactly_the_crop() {
    let pre = FramePreprocessor::with_defaults();

    let frame = white_frame(323, 323);
    let rect = pre.crop_rect(&frame.view()).unwrap();
    assert_eq!((rect.x, rect.y, rect.size), (0, 0, 323));

    for (w, h) in [(322, 323), (323, 322), (100, 100)] {
        let frame = white_frame(w, h);
        let err = pre.preprocess(&frame.view()).unwrap_err();
        assert!(matches!(err, DigitlensError::InvalidRegion { .. }), "{w}x{h}");
    }
}

#[test]
fn all_white_frame_yields_blank_centered_canvas() {
    let pre = FramePreprocessor::with_defaults();
    let frame = white_frame(640, 480);

    let digit = pre.preprocess(&frame.view()).unwrap();
    assert_eq!(digit.as_image().dimensions(), (DigitImage::SIDE, DigitImage::SIDE));
    // White background inverts to black; nothing to see.
    assert!(digit.is_blank());
}

#[test]
fn off_center_block_shifts_placement_away_from_default() {
    let pre = FramePreprocessor::with_defaults();

    // 10x10 fully black block at crop-local (50,50)-(60,60). The frame is
    // exactly crop-sized, so crop-local and frame coordinates coincide.
    let mut frame = white_frame(323, 323);
    for y in 50..60 {
        for x in 50..60 {
            frame.put_pixel(x, y, Bgra::BLACK);
        }
    }

    let rect = pre.crop_rect(&frame.view()).unwrap();
    let scan = pre.scan_ink(&frame.view(), rect);
    assert_eq!(scan.ink_pixels(), 100);

    let centroid = scan.centroid().unwrap();
    assert!(centroid.0.abs_diff(55) <= 1, "centroid_x = {}", centroid.0);
    assert!(centroid.1.abs_diff(55) <= 1, "centroid_y = {}", centroid.1);

    // A centroid far up-left maps past the margin and pins to the far edge.
    let (ox, oy) = pre.centroid_offset(centroid);
    let placement = (pre.placement(ox), pre.placement(oy));
    assert_eq!(placement, (8, 8));
    assert_ne!(placement, pre.default_placement());

    // The full pipeline still produces visible ink on the canvas.
    let digit = pre.preprocess(&frame.view()).unwrap();
    assert!(!digit.is_blank());
}

#[test]
fn digit_content_lands_within_canvas_bounds_for_corner_ink() {
    let pre = FramePreprocessor::with_defaults();

    for (bx, by) in [(0, 0), (313, 0), (0, 313), (313, 313)] {
        let mut frame = white_frame(323, 323);
        for y in by..by + 10 {
            for x in bx..bx + 10 {
                frame.put_pixel(x, y, Bgra::BLACK);
            }
        }
        let digit = pre.preprocess(&frame.view()).unwrap();
        assert!(!digit.is_blank(), "block at ({bx},{by})");
        // Canvas stays exactly 28x28 regardless of the pinned placement.
        assert_eq!(digit.as_image().dimensions(), (28, 28));
    }
}

#[test]
fn tensor_of_preprocessed_frame_matches_shape_contract() {
    let pre = FramePreprocessor::with_defaults();
    let mut frame = white_frame(400, 400);
    for y in 180..220 {
        for x in 180..220 {
            frame.put_pixel(x, y, Bgra::BLACK);
        }
    }

    let digit = pre.preprocess(&frame.view()).unwrap();
    let tensor = digit.to_tensor();
    assert_eq!(tensor.len(), 784);
    assert!(tensor.iter().all(|v| (0.0..=1.0).contains(v)));
    assert!(tensor.iter().any(|&v| v > 0.5), "ink should survive downscale");
}
