//! Property tests for the frame difference engine.

use frame_difference::difference::{luminance, MAX_PRODUCT};
use frame_difference::{FrameDifferenceModel, BACKGROUND_LABEL, HISTORY_DEPTH};
use proptest::prelude::*;

const WIDTH: u32 = 3;
const HEIGHT: u32 = 2;
const FRAME_BYTES: usize = (WIDTH * HEIGHT) as usize * 3;

fn frame() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), FRAME_BYTES)
}

fn reduce(rgb: &[u8]) -> Vec<u8> {
    rgb.chunks_exact(3)
        .map(|p| luminance(p[0], p[1], p[2]))
        .collect()
}

proptest! {
    #[test]
    fn luminance_is_truncated_mean(c0: u8, c1: u8, c2: u8) {
        let sum = c0 as u32 + c1 as u32 + c2 as u32;
        let value = luminance(c0, c1, c2) as u32;
        prop_assert_eq!(value, sum / 3);
        prop_assert!(value >= (c0.min(c1).min(c2)) as u32);
        prop_assert!(value <= (c0.max(c1).max(c2)) as u32);
    }

    #[test]
    fn seeding_fills_every_slot(seed in frame()) {
        let mut model = FrameDifferenceModel::new();
        model.initialize(&seed, WIDTH, HEIGHT).unwrap();

        let history = model.history().unwrap();
        for (i, value) in reduce(&seed).into_iter().enumerate() {
            prop_assert_eq!(history.slots(i), [value; HISTORY_DEPTH]);
        }
    }

    #[test]
    fn history_holds_last_three_frames(
        seed in frame(),
        frames in prop::collection::vec(frame(), HISTORY_DEPTH..8),
    ) {
        let mut model = FrameDifferenceModel::new();
        model.initialize(&seed, WIDTH, HEIGHT).unwrap();
        for f in &frames {
            model.ingest(f).unwrap();
        }

        let tail: Vec<Vec<u8>> = frames[frames.len() - HISTORY_DEPTH..]
            .iter()
            .map(|f| reduce(f))
            .collect();
        let history = model.history().unwrap();
        for i in 0..(WIDTH * HEIGHT) as usize {
            let expected = [tail[0][i], tail[1][i], tail[2][i]];
            prop_assert_eq!(history.slots(i), expected);
        }
        prop_assert_eq!(model.frames_ingested(), frames.len() as u64);
    }

    #[test]
    fn range_describes_latest_frame_only(seed in frame(), a in frame(), b in frame()) {
        let mut model = FrameDifferenceModel::new();
        model.initialize(&seed, WIDTH, HEIGHT).unwrap();
        model.ingest(&a).unwrap();
        model.ingest(&b).unwrap();

        let values = reduce(&b);
        let range = model.frame_range().unwrap();
        prop_assert_eq!(range.min, *values.iter().min().unwrap());
        prop_assert_eq!(range.max, *values.iter().max().unwrap());
        prop_assert!(range.min <= range.max);
    }

    #[test]
    fn identical_frames_never_change(f in frame(), repeats in 1usize..4) {
        let mut model = FrameDifferenceModel::new();
        model.initialize(&f, WIDTH, HEIGHT).unwrap();
        for _ in 0..repeats {
            model.ingest(&f).unwrap();
        }

        let masks = model.compute_masks().unwrap();
        prop_assert!(masks.segmentation.iter().all(|&v| v == BACKGROUND_LABEL));
    }

    #[test]
    fn indicator_is_binary_and_refined_is_bounded(seed in frame(), a in frame(), b in frame()) {
        let mut model = FrameDifferenceModel::new();
        model.initialize(&seed, WIDTH, HEIGHT).unwrap();
        model.ingest(&a).unwrap();
        model.ingest(&b).unwrap();

        let masks = model.compute_masks().unwrap();
        prop_assert!(masks.indicator.iter().all(|&v| v <= 1));

        let estimate = &masks.outcome.estimate;
        prop_assert_eq!(
            estimate.foreground.count + estimate.background.count,
            (WIDTH * HEIGHT) as u64
        );
        // Two means of at most 255 each
        prop_assert!(estimate.refined <= 5.1);
        prop_assert!(estimate.refined < MAX_PRODUCT as f64);
    }
}
