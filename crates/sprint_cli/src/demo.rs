//! Demo scene
//!
//! A title, subtitle, button and circle laid out in a column. The intro
//! slides the labels in with elastic easing, bounces the button up from the
//! bottom and starts the circle breathing forever. Each accepted button click
//! replays the button pulse and the label re-entry with the next easing
//! family.

use sprint_animation::{
    AnimationPreset, AnimationScheduler, Easing, EasingFamily, EasingMode, Edge, Result,
    SharedSprint, Sprint,
};
use rand::Rng;
use sprint_core::{AnimatedNode, Rect, SceneNode, Size};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Re-entry directions, indexed by the 1-based count of families handed out
/// so far, modulo 4; the first click enters from the right
const DIRECTIONS: [Edge; 4] = [Edge::Left, Edge::Top, Edge::Right, Edge::Bottom];

/// Settle nudge of the title; the subtitle nudges the opposite way
const TITLE_NUDGE: f32 = -14.0;

pub struct DemoScene {
    title: Rc<RefCell<SceneNode>>,
    subtitle: Rc<RefCell<SceneNode>>,
    button: Rc<RefCell<SceneNode>>,
    circle: Rc<RefCell<SceneNode>>,

    title_sprint: SharedSprint,
    button_sprint: SharedSprint,
    circle_sprint: SharedSprint,

    title_animating: Rc<Cell<bool>>,
    button_animating: Rc<Cell<bool>>,

    /// Position in `EasingFamily::ALL` of the next click's family
    next_family: usize,
    clicks: u32,
}

impl DemoScene {
    /// Lay out the scene in `viewport` and register its timelines
    pub fn new(viewport: Size, scheduler: &mut AnimationScheduler) -> Self {
        let center = viewport.width / 2.0;
        let node = |name: &str, width: f32, height: f32, y: f32| {
            SceneNode::new(name, Rect::new(center - width / 2.0, y, width, height), viewport).shared()
        };

        let title = node("title", 320.0, 60.0, viewport.height * 0.18);
        let subtitle = node("subtitle", 260.0, 28.0, viewport.height * 0.18 + 72.0);
        let button = node("button", 140.0, 44.0, viewport.height * 0.55);
        let circle = node("circle", 90.0, 90.0, viewport.height * 0.72);

        let (_, title_sprint) = scheduler.add(Sprint::new(title.clone()));
        let (_, button_sprint) = scheduler.add(Sprint::new(button.clone()));
        let (_, circle_sprint) = scheduler.add(Sprint::new(circle.clone()));

        Self {
            title,
            subtitle,
            button,
            circle,
            title_sprint,
            button_sprint,
            circle_sprint,
            title_animating: Rc::new(Cell::new(false)),
            button_animating: Rc::new(Cell::new(false)),
            next_family: 0,
            clicks: 0,
        }
    }

    /// Chain and start the intro animations
    pub fn setup(&mut self) -> Result<()> {
        tracing::info!("scene is displayed");

        self.watch(&self.title_sprint, "title", self.title_animating.clone());
        self.watch(&self.button_sprint, "button", self.button_animating.clone());

        {
            // Title spins in from the left, subtitle grows in from the right
            let mut sprint = self.title_sprint.borrow_mut();
            sprint.set_interpolator(EasingFamily::Elastic);
            sprint
                .wait(0.5)?
                .slide_from_left(2.0)?
                .rotate_to(2.0, 360.0)?;
            sprint
                .set_node(self.subtitle.clone())
                .slide_from_right(2.0)?
                .scale_from(2.0, 0.5, 0.5)?
                .wait(0.5)?
                .sprint()?;
        }

        {
            let mut sprint = self.button_sprint.borrow_mut();
            sprint.set_interpolator(EasingFamily::Bounce);
            sprint
                .wait(0.8)?
                .slide_from_bottom(1.0)?
                .rotate_to(1.0, 360.0)?
                .sprint()?;
            sprint.set_interpolator(EasingFamily::Back);
        }

        {
            let mut sprint = self.circle_sprint.borrow_mut();
            sprint.set_interpolator(EasingFamily::Sine);
            sprint
                .scale_to(2.0, 1.3, 1.3)?
                .rotate_to(2.0, 360.0)?
                .repeat(0)?;
        }

        Ok(())
    }

    fn watch(&self, sprint: &SharedSprint, name: &'static str, flag: Rc<Cell<bool>>) {
        sprint
            .borrow_mut()
            .on_animating_changed(move |_, animating| {
                tracing::info!(animating, "{name} animation state");
                flag.set(animating);
            });
    }

    /// Whether a click would be accepted right now
    pub fn is_idle(&self) -> bool {
        !self.title_animating.get() && !self.button_animating.get()
    }

    /// Replay the button pulse and label re-entry with the next family.
    ///
    /// Ignored while the title or button is still animating; returns whether
    /// the click was accepted.
    pub fn button_clicked(&mut self) -> Result<bool> {
        if !self.is_idle() {
            tracing::debug!("click ignored, animations in flight");
            return Ok(false);
        }

        let edge = entry_edge(self.next_family);
        let family = self.next_interpolator();
        self.clicks += 1;
        let easing = Easing::from(family);
        let duration = entry_duration(&mut rand::thread_rng());

        tracing::info!(click = self.clicks, ?family, ?edge, duration, "button clicked");

        {
            let rotation = self.button.borrow().rotate();
            let mut sprint = self.button_sprint.borrow_mut();
            sprint.clear().set_interpolator(easing);
            AnimationPreset::spin(&mut sprint, 1.2, rotation)?;
            AnimationPreset::pulse(&mut sprint)?.sprint()?;
        }

        {
            let mut sprint = self.title_sprint.borrow_mut();
            sprint
                .clear()
                .set_interpolator(easing)
                .set_node(self.title.clone());
            AnimationPreset::slide_in_settle(&mut sprint, edge, duration, TITLE_NUDGE)?;

            sprint.set_node(self.subtitle.clone()).wait(0.08)?;
            AnimationPreset::slide_in_settle(&mut sprint, Edge::Right, duration * 0.95, -TITLE_NUDGE)?
                .sprint()?;

            sprint.set_interpolator((EasingFamily::Back, EasingMode::EaseIn));
        }

        Ok(true)
    }

    /// The next of the nine families, wrapping after the last
    fn next_interpolator(&mut self) -> EasingFamily {
        let family = EasingFamily::ALL[self.next_family % EasingFamily::ALL.len()];
        self.next_family = (self.next_family + 1) % EasingFamily::ALL.len();
        family
    }

    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    pub fn circle_is_animating(&self) -> bool {
        self.circle_sprint.borrow().is_animating()
    }

    /// Log the final property values of every node
    pub fn log_summary(&self) {
        for node in [&self.title, &self.subtitle, &self.button, &self.circle] {
            let node = node.borrow();
            tracing::info!(
                node = node.name(),
                translate = ?node.translate(),
                scale = ?node.scale(),
                rotate = node.rotate(),
                opacity = node.opacity(),
                "final state"
            );
        }
    }
}

/// Edge the title re-enters from when the family at `position` is used
fn entry_edge(position: usize) -> Edge {
    let handed_out = position % EasingFamily::ALL.len() + 2;
    DIRECTIONS[handed_out % DIRECTIONS.len()]
}

/// Re-entry length, picked at random in `1.1..1.6` seconds
fn entry_duration<R: Rng>(rng: &mut R) -> f32 {
    rng.gen_range(1.1..1.6)
}
