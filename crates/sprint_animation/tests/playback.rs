//! Playback behaviour of complete timelines
//!
//! These tests drive real `SceneNode`s through `Sprint` timelines and check:
//! - property values at and between step boundaries
//! - completion and the "is animating" flag
//! - looping, restarts and adapter failures

use sprint_animation::{AnimationError, Easing, EasingFamily, EasingMode, PlaybackPhase, Sprint};
use sprint_core::{AnimatedNode, Rect, SceneNode, Size, Vec2};
use std::cell::RefCell;
use std::rc::Rc;

fn scene_node(name: &str, x: f32, y: f32) -> Rc<RefCell<SceneNode>> {
    SceneNode::new(name, Rect::new(x, y, 200.0, 50.0), Size::new(800.0, 600.0)).shared()
}

fn record_states(sprint: &mut Sprint) -> Rc<RefCell<Vec<bool>>> {
    let states = Rc::new(RefCell::new(Vec::new()));
    let states_clone = states.clone();
    sprint.on_animating_changed(move |_, new| states_clone.borrow_mut().push(new));
    states
}

/// wait(0.5), slide_from_left(2), rotate_to(2, 360) on one node
#[test]
fn test_wait_then_concurrent_slide_and_rotate() {
    let title = scene_node("title", 100.0, 40.0);
    let mut sprint = Sprint::new(title.clone());
    sprint.set_interpolator(EasingFamily::Quadratic);
    sprint
        .wait(0.5)
        .unwrap()
        .slide_from_left(2.0)
        .unwrap()
        .rotate_to(2.0, 360.0)
        .unwrap()
        .sprint()
        .unwrap();

    // Nothing moves during the wait
    sprint.advance(0.25).unwrap();
    assert_eq!(title.borrow().translate(), Vec2::ZERO);
    assert_eq!(title.borrow().rotate(), 0.0);

    // Slide starts fully off the left edge and eases toward 0 with the rotation
    sprint.advance(0.25).unwrap();
    assert_eq!(title.borrow().translate().x, -300.0);
    assert_eq!(title.borrow().rotate(), 0.0);

    sprint.advance(1.0).unwrap();
    {
        let title = title.borrow();
        let eased = Easing::curve(EasingFamily::Quadratic, EasingMode::EaseOut).apply(0.5);
        assert!((title.translate().x - (-300.0 + 300.0 * eased)).abs() < 1e-3);
        assert!((title.rotate() - 360.0 * eased).abs() < 1e-3);
    }
    assert!(sprint.is_animating());

    sprint.advance(1.0).unwrap();
    assert_eq!(title.borrow().translate(), Vec2::ZERO);
    assert_eq!(title.borrow().rotate(), 360.0);
    assert_eq!(sprint.phase(), PlaybackPhase::Completed);
    assert!(!sprint.is_animating());
}

#[test]
fn test_small_increments_reach_exact_targets() {
    let node = scene_node("n", 0.0, 0.0);
    let mut sprint = Sprint::new(node.clone());
    sprint.set_interpolator((EasingFamily::Elastic, EasingMode::EaseOut));
    sprint
        .move_to(0.3, 40.0, -20.0)
        .unwrap()
        .scale_to(0.7, 1.5, 0.5)
        .unwrap()
        .wait(0.2)
        .unwrap()
        .fade_to(0.5, 0.25)
        .unwrap()
        .rotate_to(0.5, -90.0)
        .unwrap();
    let states = record_states(&mut sprint);
    sprint.sprint().unwrap();

    let total = sprint.duration();
    assert!((total - 1.4).abs() < 1e-5);

    // 1.4s in 1/60s frames
    for _ in 0..84 {
        sprint.advance(1.0 / 60.0).unwrap();
    }

    let node = node.borrow();
    assert_eq!(node.translate(), Vec2::new(40.0, -20.0));
    assert_eq!(node.scale(), Vec2::new(1.5, 0.5));
    assert_eq!(node.opacity(), 0.25);
    assert_eq!(node.rotate(), -90.0);
    assert_eq!(sprint.phase(), PlaybackPhase::Completed);
    assert_eq!(*states.borrow(), vec![true, false]);
}

#[test]
fn test_move_from_starts_displaced() {
    let node = SceneNode::new("n", Rect::new(0.0, 0.0, 10.0, 10.0), Size::new(100.0, 100.0))
        .with_translate(10.0, 10.0)
        .shared();
    let mut sprint = Sprint::new(node.clone());
    sprint.move_from(1.0, 25.0, -5.0).unwrap().sprint().unwrap();

    assert_eq!(node.borrow().translate(), Vec2::new(35.0, 5.0));

    sprint.advance(1.0).unwrap();
    assert_eq!(node.borrow().translate(), Vec2::new(10.0, 10.0));
}

#[test]
fn test_scale_from_grows_back_to_current() {
    let node = scene_node("n", 0.0, 0.0);
    let mut sprint = Sprint::new(node.clone());
    sprint.set_interpolator(Easing::Linear);
    sprint.scale_from(2.0, 0.5, 0.5).unwrap().sprint().unwrap();

    assert_eq!(node.borrow().scale(), Vec2::new(0.5, 0.5));
    sprint.advance(1.0).unwrap();
    assert!((node.borrow().scale().x - 0.75).abs() < 1e-5);
    sprint.advance(1.0).unwrap();
    assert_eq!(node.borrow().scale(), Vec2::ONE);
}

#[test]
fn test_start_values_snapshot_when_step_begins() {
    let node = scene_node("n", 0.0, 0.0);
    let mut sprint = Sprint::new(node.clone());
    sprint.set_interpolator(Easing::Linear);
    sprint
        .wait(1.0)
        .unwrap()
        .rotate_to(1.0, 100.0)
        .unwrap()
        .sprint()
        .unwrap();

    // Host moves the node during the wait; the rotation starts from there
    sprint.advance(0.5).unwrap();
    node.borrow_mut().set_rotate(50.0).unwrap();

    sprint.advance(1.0).unwrap();
    assert!((node.borrow().rotate() - 75.0).abs() < 1e-4);
}

#[test]
fn test_zero_duration_step_applies_once_and_advances() {
    let node = scene_node("n", 0.0, 0.0);
    let mut sprint = Sprint::new(node.clone());
    sprint
        .fade_to(0.0, 0.4)
        .unwrap()
        .wait(0.0)
        .unwrap()
        .rotate_to(0.0, 45.0)
        .unwrap()
        .sprint()
        .unwrap();

    assert_eq!(node.borrow().opacity(), 0.4);
    assert_eq!(node.borrow().rotate(), 45.0);
    assert_eq!(sprint.phase(), PlaybackPhase::Completed);
}

#[test]
fn test_infinite_loop_never_completes() {
    let circle = scene_node("circle", 300.0, 300.0);
    let mut sprint = Sprint::new(circle.clone());
    sprint.set_interpolator(EasingFamily::Sine);
    let states = record_states(&mut sprint);
    sprint
        .scale_to(2.0, 1.3, 1.3)
        .unwrap()
        .rotate_to(2.0, 360.0)
        .unwrap()
        .repeat(0)
        .unwrap();

    let duration = sprint.duration();
    for _ in 0..100 {
        sprint.advance(duration / 3.0).unwrap();
        sprint.advance(duration / 3.0).unwrap();
        sprint.advance(duration / 3.0).unwrap();
        assert!(sprint.is_animating());
    }

    assert!(matches!(sprint.phase(), PlaybackPhase::Running { .. }));
    assert_eq!(*states.borrow(), vec![true]);
}

#[test]
fn test_finite_loop_repeats_then_completes() {
    let node = scene_node("n", 0.0, 0.0);
    let mut sprint = Sprint::new(node.clone());
    sprint.set_interpolator(Easing::Linear);
    sprint
        .move_to(1.0, 10.0, 0.0)
        .unwrap()
        .repeat(2)
        .unwrap();

    // Each pass moves another 10 from where the last one ended
    sprint.advance(1.0).unwrap();
    assert_eq!(node.borrow().translate().x, 10.0);
    assert!(sprint.is_animating());

    sprint.advance(1.5).unwrap();
    assert!((node.borrow().translate().x - 25.0).abs() < 1e-4);

    sprint.advance(0.5).unwrap();
    assert_eq!(node.borrow().translate().x, 30.0);
    assert!(!sprint.is_animating());
}

#[test]
fn test_steps_after_finite_loop_run_once() {
    let node = scene_node("n", 0.0, 0.0);
    let mut sprint = Sprint::new(node.clone());
    // repeat plays at once; the fade appended after it joins on the replay
    sprint
        .rotate_to(1.0, 90.0)
        .unwrap()
        .repeat(1)
        .unwrap()
        .fade_to(1.0, 0.0)
        .unwrap()
        .sprint()
        .unwrap();

    assert!((sprint.duration() - 2.0).abs() < 1e-6);
    sprint.advance(2.0).unwrap();
    assert!(sprint.is_animating());
    assert_eq!(node.borrow().opacity(), 1.0);

    sprint.advance(1.0).unwrap();
    assert_eq!(node.borrow().opacity(), 0.0);
    assert!(!sprint.is_animating());
}

#[test]
fn test_second_sprint_restarts_from_first_step() {
    let node = scene_node("n", 0.0, 0.0);
    let mut sprint = Sprint::new(node.clone());
    sprint.set_interpolator(Easing::Linear);
    sprint.rotate_to(2.0, 100.0).unwrap();
    let states = record_states(&mut sprint);
    sprint.sprint().unwrap();

    sprint.advance(1.0).unwrap();
    assert!((node.borrow().rotate() - 50.0).abs() < 1e-4);

    // Re-chain and replay: the whole list restarts, snapshotting from 50
    sprint.fade_to(1.0, 0.0).unwrap().sprint().unwrap();
    assert_eq!(sprint.phase(), PlaybackPhase::Running { segment: 0, elapsed: 0.0 });

    sprint.advance(1.0).unwrap();
    assert!((node.borrow().rotate() - 75.0).abs() < 1e-4);
    assert!((node.borrow().opacity() - 0.0).abs() < 1e-6);

    sprint.advance(1.0).unwrap();
    assert_eq!(node.borrow().rotate(), 100.0);
    assert!(!sprint.is_animating());

    // The restart never reported a false in between
    assert_eq!(*states.borrow(), vec![true, false]);
}

#[test]
fn test_appending_after_completion_does_not_replay() {
    let node = scene_node("n", 0.0, 0.0);
    let mut sprint = Sprint::new(node.clone());
    sprint.fade_to(1.0, 0.5).unwrap().sprint().unwrap();
    sprint.advance(1.0).unwrap();

    sprint.rotate_to(1.0, 90.0).unwrap();
    sprint.advance(1.0).unwrap();

    assert_eq!(node.borrow().rotate(), 0.0);
    assert_eq!(sprint.phase(), PlaybackPhase::Completed);
}

#[test]
fn test_rebinding_keeps_earlier_steps_on_their_node() {
    let title = scene_node("title", 100.0, 40.0);
    let subtitle = scene_node("subtitle", 100.0, 120.0);

    let mut sprint = Sprint::new(title.clone());
    sprint.slide_from_left(1.0).unwrap();
    sprint
        .set_node(subtitle.clone())
        .slide_from_right(1.0)
        .unwrap()
        .sprint()
        .unwrap();

    // Different nodes animate together
    assert_eq!(title.borrow().translate().x, -300.0);
    assert_eq!(subtitle.borrow().translate().x, 700.0);

    sprint.advance(1.0).unwrap();
    assert_eq!(title.borrow().translate(), Vec2::ZERO);
    assert_eq!(subtitle.borrow().translate(), Vec2::ZERO);
    assert!(!sprint.is_animating());
}

#[test]
fn test_same_property_steps_run_in_sequence() {
    let node = scene_node("n", 0.0, 0.0);
    let mut sprint = Sprint::new(node.clone());
    sprint.set_interpolator(Easing::Linear);
    sprint
        .move_from(0.2, -14.0, 0.0)
        .unwrap()
        .move_from(0.2, 8.0, 0.0)
        .unwrap()
        .sprint()
        .unwrap();

    assert!((sprint.duration() - 0.4).abs() < 1e-6);
    assert_eq!(node.borrow().translate().x, -14.0);

    sprint.advance(0.2).unwrap();
    assert_eq!(node.borrow().translate().x, 8.0);

    sprint.advance(0.2).unwrap();
    assert_eq!(node.borrow().translate().x, 0.0);
}

#[test]
fn test_opacity_writes_are_clamped() {
    let node = scene_node("n", 0.0, 0.0);
    let mut sprint = Sprint::new(node.clone());
    sprint.set_interpolator((EasingFamily::Back, EasingMode::EaseOut));
    sprint.fade_to(1.0, 0.0).unwrap().sprint().unwrap();

    for _ in 0..10 {
        sprint.advance(0.1).unwrap();
        let opacity = node.borrow().opacity();
        assert!((0.0..=1.0).contains(&opacity));
    }
}

#[test]
fn test_failed_write_aborts_run() {
    let node = scene_node("n", 0.0, 0.0);
    let mut sprint = Sprint::new(node.clone());
    let states = record_states(&mut sprint);
    sprint.fade_to(1.0, 0.0).unwrap().sprint().unwrap();

    node.borrow_mut().set_locked(true);
    let err = sprint.advance(0.5).unwrap_err();

    assert!(matches!(err, AnimationError::Node(_)));
    assert_eq!(sprint.phase(), PlaybackPhase::Completed);
    assert_eq!(*states.borrow(), vec![true, false]);

    // A later sprint starts a fresh run
    node.borrow_mut().set_locked(false);
    sprint.sprint().unwrap();
    assert!(sprint.is_animating());
}

#[test]
fn test_removed_listener_is_not_called() {
    let node = scene_node("n", 0.0, 0.0);
    let mut sprint = Sprint::new(node);
    let calls = Rc::new(RefCell::new(0));
    let calls_clone = calls.clone();
    let id = sprint.on_animating_changed(move |_, _| *calls_clone.borrow_mut() += 1);

    sprint.wait(0.1).unwrap().sprint().unwrap();
    assert!(sprint.remove_listener(id));
    sprint.advance(0.1).unwrap();

    assert_eq!(*calls.borrow(), 1);
    assert_eq!(sprint.playback_state().listener_count(), 0);
}

fn tick_rotation(seconds: f32, fps: u32) -> (Rc<RefCell<SceneNode>>, Sprint) {
    let node = scene_node("n", 0.0, 0.0);
    let mut sprint = Sprint::new(node.clone());
    sprint.set_interpolator(Easing::Linear);
    sprint.rotate_to(seconds, 90.0).unwrap().sprint().unwrap();

    let frames = (seconds * fps as f32).round() as usize;
    let dt = 1.0 / fps as f32;
    for _ in 0..frames {
        sprint.advance(dt).unwrap();
    }
    (node, sprint)
}

#[test]
fn test_long_steps_complete_at_frame_rates() {
    for (seconds, fps) in [(10.0, 60), (30.0, 60), (60.0, 144), (120.0, 120), (600.0, 60)] {
        let (node, sprint) = tick_rotation(seconds, fps);
        assert_eq!(sprint.phase(), PlaybackPhase::Completed, "{seconds}s at {fps}fps");
        assert_eq!(node.borrow().rotate(), 90.0, "{seconds}s at {fps}fps");
        assert!(!sprint.is_animating());
    }
}

#[test]
fn test_long_stall_skips_whole_loop_passes() {
    let node = scene_node("n", 0.0, 0.0);
    let mut sprint = Sprint::new(node.clone());
    sprint
        .scale_to(0.5, 2.0, 2.0)
        .unwrap()
        .rotate_to(0.5, 90.0)
        .unwrap()
        .repeat(0)
        .unwrap();

    sprint.advance(1_000_000.25).unwrap();

    let PlaybackPhase::Running { segment, elapsed } = sprint.phase() else {
        panic!("infinite loop stopped: {:?}", sprint.phase());
    };
    assert_eq!(segment, 0);
    assert!((elapsed - 0.25).abs() < 1e-6, "{elapsed}");
    assert_eq!(node.borrow().scale(), Vec2::new(2.0, 2.0));
    assert_eq!(node.borrow().rotate(), 90.0);
}

#[test]
fn test_relative_loop_passes_accumulate() {
    let node = scene_node("n", 0.0, 0.0);
    let mut sprint = Sprint::new(node.clone());
    sprint.move_to(1.0, 10.0, 0.0).unwrap().repeat(0).unwrap();

    sprint.advance(3.0).unwrap();
    assert_eq!(node.borrow().translate().x, 30.0);
    assert!(sprint.is_animating());
}
