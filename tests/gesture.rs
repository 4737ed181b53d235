//! Gesture classification integration tests
//!
//! Drives the classifier with synthetic landmark sets

use handcue::config::GestureConfig;
use handcue::hand::extract;
use handcue::{Command, FilterParams, GestureClassifier, Playback};

mod common;

use common::{FIST, OPEN, PEACE, hand, pinching_hand};

fn classifier() -> GestureClassifier {
    GestureClassifier::new(GestureConfig::default(), FilterParams::default(), 0.0)
}

#[test]
fn test_fist_pauses() {
    let fist = hand(FIST);
    assert_eq!(extract(&fist).extended_count(), 0);

    let mut c = classifier();
    assert_eq!(
        c.classify(0.1, Some(&fist)),
        Some(Command::PlayPause(Playback::Pause))
    );
}

#[test]
fn test_open_hand_plays() {
    let mut c = classifier();
    assert_eq!(
        c.classify(0.1, Some(&hand(OPEN))),
        Some(Command::PlayPause(Playback::Play))
    );
}

#[test]
fn test_peace_sign_mutes() {
    let mut c = classifier();
    assert_eq!(c.classify(0.1, Some(&hand(PEACE))), Some(Command::Mute));
}

#[test]
fn test_other_poses_emit_nothing() {
    let mut c = classifier();
    for fingers in [
        [false, true, false, false, false],
        [false, true, true, true, false],
        [true, true, false, false, true],
        [false, false, true, true, true],
    ] {
        assert_eq!(c.classify(0.1, Some(&hand(fingers))), None, "{fingers:?}");
    }
}

#[test]
fn test_play_and_pause_are_exclusive() {
    // Every combination of the five flags
    for bits in 0u8..32 {
        let fingers: [bool; 5] = std::array::from_fn(|i| bits & (1 << i) != 0);
        let features = extract(&hand(fingers));
        let count = features.extended_count();
        assert!(count <= 5);

        let mut c = classifier();
        let command = c.classify(0.1, Some(&hand(fingers)));
        assert_eq!(
            command == Some(Command::PlayPause(Playback::Play)),
            count == 5
        );
        assert_eq!(
            command == Some(Command::PlayPause(Playback::Pause)),
            count == 0
        );
    }
}

#[test]
fn test_cooldown_between_discrete_gestures() {
    let mut c = classifier();
    let poses = [hand(OPEN), hand(FIST), hand(PEACE)];
    let mut emitted = Vec::new();

    // 30 fps for 5 seconds, cycling qualifying poses every frame
    for frame in 1..=150u32 {
        let now = f64::from(frame) / 30.0;
        let pose = &poses[frame as usize % poses.len()];
        if let Some(command) = c.classify(now, Some(pose)) {
            assert!(command.is_discrete());
            emitted.push(now);
        }
    }

    assert!(emitted.len() >= 4, "{emitted:?}");
    for pair in emitted.windows(2) {
        assert!(pair[1] - pair[0] >= 1.0, "{pair:?}");
    }
}

#[test]
fn test_configured_cooldown() {
    let config = GestureConfig {
        cooldown_secs: 0.25,
        ..GestureConfig::default()
    };
    let mut c = GestureClassifier::new(config, FilterParams::default(), 0.0);

    assert!(c.classify(0.1, Some(&hand(OPEN))).is_some());
    assert!(c.classify(0.3, Some(&hand(OPEN))).is_none());
    assert!(c.classify(0.4, Some(&hand(OPEN))).is_some());
}

#[test]
fn test_pinch_has_priority() {
    let mut c = classifier();
    let mut t = 0.0;

    // Still and moving pinches, all with five extended fingers
    for frame in 0..60u8 {
        t += 1.0 / 30.0;
        let y = if frame < 30 {
            0.5
        } else {
            0.01f32.mul_add(-f32::from(frame - 30), 0.5)
        };
        let pinch = pinching_hand(y);
        let features = extract(&pinch);
        assert!(features.pinch_ratio() < 0.4);
        assert_eq!(features.extended_count(), 5, "y = {y}");

        let command = c.classify(t, Some(&pinch));
        assert!(!command.is_some_and(Command::is_discrete), "{command:?}");
    }
    assert_eq!(c.state().last_gesture_at, None);

    // The same fingers without the pinch read as an open hand
    assert_eq!(
        c.classify(t + 0.1, Some(&hand(OPEN))),
        Some(Command::PlayPause(Playback::Play))
    );
}

#[test]
fn test_pinch_raised_turns_volume_up() {
    let mut c = classifier();
    let mut commands = Vec::new();

    // Fingertip rises 0.03 per frame
    for frame in 1..=10u8 {
        let y = 0.03f32.mul_add(-f32::from(frame), 0.5);
        if let Some(command) = c.classify(f64::from(frame) / 30.0, Some(&pinching_hand(y))) {
            commands.push(command);
        }
    }

    assert!(!commands.is_empty());
    assert!(commands.iter().all(|&command| command == Command::VolumeUp));
}

#[test]
fn test_pinch_lowered_turns_volume_down() {
    let mut c = classifier();
    let mut commands = Vec::new();

    for frame in 1..=10u8 {
        let y = 0.03f32.mul_add(f32::from(frame), 0.5);
        if let Some(command) = c.classify(f64::from(frame) / 30.0, Some(&pinching_hand(y))) {
            commands.push(command);
        }
    }

    assert!(!commands.is_empty());
    assert!(commands.iter().all(|&command| command == Command::VolumeDown));
}

#[test]
fn test_volume_threshold_and_anchor() {
    let mut c = classifier();
    let mut t = 0.0;

    // Held still near the seed: below the step, anchor stays put
    for _ in 0..30 {
        t += 1.0 / 30.0;
        assert_eq!(c.classify(t, Some(&pinching_hand(0.495))), None);
    }
    assert!((c.state().previous_smoothed_y - 0.5).abs() < f64::EPSILON);

    // A clear move crosses the step and commits the anchor
    t += 1.0 / 30.0;
    let mut fired = None;
    for _ in 0..30 {
        t += 1.0 / 30.0;
        fired = c.classify(t, Some(&pinching_hand(0.3)));
        if fired.is_some() {
            break;
        }
    }
    assert_eq!(fired, Some(Command::VolumeUp));
    let state = c.state();
    assert!((state.previous_smoothed_y - c.filter().state().last_value).abs() < f64::EPSILON);
    assert!(0.5 - state.previous_smoothed_y > 0.015);
}

#[test]
fn test_volume_not_rate_limited() {
    let mut c = classifier();
    let mut fired = 0;

    for frame in 1..=20u8 {
        let y = 0.02f32.mul_add(-f32::from(frame), 0.6);
        if c.classify(f64::from(frame) / 30.0, Some(&pinching_hand(y))).is_some() {
            fired += 1;
        }
    }

    // Far more than one per second of cooldown
    assert!(fired > 3, "fired {fired}");
}

#[test]
fn test_no_hand_leaves_state() {
    let mut c = classifier();
    c.classify(0.1, Some(&hand(OPEN)));
    let before = c.state();

    for i in 0..10 {
        assert_eq!(c.classify(0.2 + f64::from(i), None), None);
    }
    assert_eq!(c.state(), before);
}
