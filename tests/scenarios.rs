//! End-to-end sequences through the public API.

use frame_difference::{
    capture::{FrameSource, SequenceConfig, SyntheticSource},
    difference::{ClusterSample, DegeneratePolicy},
    Frame, FrameDifferenceError, FrameDifferenceModel, FrameRange, ModelConfig,
    BACKGROUND_LABEL, FOREGROUND_LABEL,
};

#[test]
fn test_uniform_gray_sequence_is_background() {
    let gray = Frame::solid(4, 4, [128, 128, 128], 0);
    let mut model = FrameDifferenceModel::new();

    model.initialize(gray.pixels(), 4, 4).unwrap();
    model.ingest(gray.pixels()).unwrap();
    model.ingest(gray.pixels()).unwrap();

    assert_eq!(model.frame_range(), Some(FrameRange { min: 128, max: 128 }));
    let history = model.history().unwrap();
    for i in 0..16 {
        assert_eq!(history.slots(i), [128, 128, 128]);
    }

    let masks = model.compute_masks().unwrap();
    assert!(masks.segmentation.iter().all(|&v| v == BACKGROUND_LABEL));
}

#[test]
fn test_alternating_pixel_is_changed() {
    // Pixel 0 goes black -> white -> black, the others stay white.
    let mut black = Frame::solid(2, 2, [255, 255, 255], 0);
    black.pixel_mut(0, 0).unwrap().copy_from_slice(&[0, 0, 0]);
    let white = Frame::solid(2, 2, [255, 255, 255], 1);

    let mut model = FrameDifferenceModel::new();
    model.initialize(black.pixels(), 2, 2).unwrap();
    model.ingest(black.pixels()).unwrap();
    model.ingest(white.pixels()).unwrap();
    model.ingest(black.pixels()).unwrap();

    let history = model.history().unwrap();
    assert_eq!(history.slots(0), [0, 255, 0]);
    assert_eq!(history.slots(1), [255, 255, 255]);

    let masks = model.compute_masks().unwrap();
    assert!(masks.outcome.estimate.refined < 65025.0);
    assert_eq!(
        masks.segmentation,
        vec![FOREGROUND_LABEL, BACKGROUND_LABEL, BACKGROUND_LABEL, BACKGROUND_LABEL]
    );
}

#[test]
fn test_indicator_map_follows_middle_slot() {
    let mut black = Frame::solid(2, 2, [255, 255, 255], 0);
    black.pixel_mut(0, 0).unwrap().copy_from_slice(&[0, 0, 0]);
    let white = Frame::solid(2, 2, [255, 255, 255], 1);

    let mut model = FrameDifferenceModel::new();
    model.initialize(black.pixels(), 2, 2).unwrap();
    model.ingest(white.pixels()).unwrap();
    model.ingest(black.pixels()).unwrap();

    // Middle slot is white everywhere; latest range is 0..255, coarse 127
    let masks = model.compute_masks().unwrap();
    assert_eq!(masks.outcome.estimate.coarse, 127);
    assert_eq!(masks.indicator, vec![1, 1, 1, 1]);
}

#[test]
fn test_seed_then_same_frame_is_quiet() {
    let mut frame = Frame::solid(3, 3, [40, 80, 120], 0);
    frame.pixel_mut(1, 1).unwrap().copy_from_slice(&[250, 250, 250]);

    let mut model = FrameDifferenceModel::new();
    model.initialize(frame.pixels(), 3, 3).unwrap();
    model.ingest(frame.pixels()).unwrap();

    let masks = model.compute_masks().unwrap();
    assert!(masks.segmentation.iter().all(|&v| v == BACKGROUND_LABEL));
}

#[test]
fn test_black_static_scene_is_quiet() {
    // Zero range yields a zero refined threshold; zero products still clear.
    let black = Frame::solid(3, 2, [0, 0, 0], 0);
    let mut model = FrameDifferenceModel::new();
    model.initialize(black.pixels(), 3, 2).unwrap();
    model.ingest(black.pixels()).unwrap();

    let masks = model.compute_masks().unwrap();
    assert_eq!(masks.outcome.estimate.refined, 0.0);
    assert!(masks.segmentation.iter().all(|&v| v == BACKGROUND_LABEL));
}

#[test]
fn test_product_equal_to_truncated_threshold_stays_foreground() {
    let mut model = FrameDifferenceModel::new();
    model.initialize(&gray_row(&[150, 151, 49]), 3, 1).unwrap();
    model.ingest(&gray_row(&[150, 151, 50])).unwrap();
    model.ingest(&gray_row(&[150, 151, 52])).unwrap();

    // Cluster means 150 (from 150.5) and 50 give exactly 2.0; the last
    // pixel's product is |52-50| * |50-49| = 2, which is not below it.
    let masks = model.compute_masks().unwrap();
    assert_eq!(masks.outcome.estimate.refined, 2.0);
    assert_eq!(
        masks.segmentation,
        vec![BACKGROUND_LABEL, BACKGROUND_LABEL, FOREGROUND_LABEL]
    );
}

fn gray_row(values: &[u8]) -> Vec<u8> {
    values.iter().flat_map(|&v| [v, v, v]).collect()
}

#[test]
fn test_caller_buffers_and_errors() {
    let mut model = FrameDifferenceModel::new();
    let frame = Frame::solid(2, 2, [10, 10, 10], 0);

    let mut seg = vec![FOREGROUND_LABEL; 4];
    let mut ind = vec![0u8; 4];
    assert_eq!(
        model.compute(&mut seg, &mut ind).unwrap_err(),
        FrameDifferenceError::NotInitialized
    );

    model.initialize(frame.pixels(), 2, 2).unwrap();
    assert_eq!(
        model.compute(&mut seg, &mut ind).unwrap_err(),
        FrameDifferenceError::NoFrameIngested
    );

    let wrong = Frame::solid(3, 2, [10, 10, 10], 1);
    assert!(matches!(
        model.ingest(wrong.pixels()),
        Err(FrameDifferenceError::FrameSizeMismatch { expected: 12, actual: 18 })
    ));

    model.ingest(frame.pixels()).unwrap();
    assert!(model.compute(&mut seg, &mut ind).is_ok());
}

#[test]
fn test_moving_square_marks_transit_region() {
    let config = SequenceConfig {
        width: 32,
        height: 16,
        object_size: 8,
        object_speed: 8,
        ..Default::default()
    };
    let mut source = SyntheticSource::new();
    source.open(&config).unwrap();

    let mut model = FrameDifferenceModel::new();
    let first = source.next_frame().unwrap();
    model.initialize(first.pixels(), 32, 16).unwrap();

    // Square at x = 0, 8, 16 (rows 4..12). Only the block covered in the
    // middle frame changes twice in a row.
    model.ingest(source.next_frame().unwrap().pixels()).unwrap();
    model.ingest(source.next_frame().unwrap().pixels()).unwrap();
    let masks = model.compute_masks().unwrap();

    for y in 0..16usize {
        for x in 0..32usize {
            let expected = if (8..16).contains(&x) && (4..12).contains(&y) {
                FOREGROUND_LABEL
            } else {
                BACKGROUND_LABEL
            };
            assert_eq!(masks.segmentation[y * 32 + x], expected, "pixel ({x}, {y})");
        }
    }

    // Middle frame: 64 object pixels at 240, the rest at 96
    let estimate = &masks.outcome.estimate;
    assert_eq!(estimate.foreground.count, 64);
    assert!((estimate.refined - 3.36).abs() < 1e-9);
}

#[test]
fn test_legacy_cluster_sample_with_coarse_fallback() {
    let config = ModelConfig {
        cluster_sample: ClusterSample::LegacyMean,
        degenerate_policy: DegeneratePolicy::Coarse,
        ..Default::default()
    };
    let mut model = FrameDifferenceModel::with_config(config);
    model.initialize(&[0, 0, 0, 0, 0, 0], 2, 1).unwrap();
    model.ingest(&[255, 255, 255, 0, 0, 0]).unwrap();
    model.ingest(&[0, 0, 0, 255, 255, 255]).unwrap();

    // Windows: [0, 255, 0] and [0, 0, 255]; legacy means 85 and 0
    let masks = model.compute_masks().unwrap();
    assert_eq!(masks.outcome.estimate.coarse, 127);
    assert_eq!(masks.indicator, vec![0, 0]);
    assert!(masks.outcome.estimate.is_degenerate());
    assert_eq!(masks.outcome.applied_threshold, 127.0);
    assert_eq!(masks.segmentation, vec![FOREGROUND_LABEL, BACKGROUND_LABEL]);
}

#[test]
fn test_independent_models_on_threads() {
    let handles: Vec<_> = (0..4u8)
        .map(|k| {
            std::thread::spawn(move || {
                let mut model = FrameDifferenceModel::new();
                let base = Frame::solid(8, 8, [k * 10, k * 10, k * 10], 0);
                let flash = Frame::solid(8, 8, [255, 255, 255], 1);

                model.initialize(base.pixels(), 8, 8).unwrap();
                model.ingest(flash.pixels()).unwrap();
                model.ingest(base.pixels()).unwrap();

                let masks = model.compute_masks().unwrap();
                (k, model.frame_range().unwrap(), masks.segmentation)
            })
        })
        .collect();

    for handle in handles {
        let (k, range, segmentation) = handle.join().unwrap();
        assert_eq!(range, FrameRange { min: k * 10, max: k * 10 });
        assert!(segmentation.iter().all(|&v| v == FOREGROUND_LABEL));
    }
}
