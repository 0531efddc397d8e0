//! FLIP (First, Last, Invert, Play) reflow animation.
//!
//! - **F**irst: record each element's position before the DOM is mutated
//! - **L**ast: after the mutation, record where layout put it
//! - **I**nvert: translate the element back by `first - last` with transitions disabled
//! - **P**lay: two frames later, re-enable the transition and clear the transform
//!
//! The animator never owns elements; it holds host node handles and drives inline style
//! overrides through [`Host::set_style`]. The host drives time: [`FlipSession::on_animation_frame`]
//! once per frame, [`FlipSession::on_transition_end`] when `transitionend` fires and
//! [`FlipSession::tick`] so the fallback timer can fire.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::{Completion, Host, Join, Point, Settled, StyleProperty};

/// Frames to wait between inverting and playing. One is not enough: the browser has not yet
/// committed the untransitioned transform when the first frame callback runs.
const PLAY_AFTER_FRAMES: u8 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FlipOptions {
    pub duration_ms: u64,
    /// Extra time granted to `transitionend` before the fallback timer completes the animation.
    pub fallback_margin_ms: u64,
}

impl Default for FlipOptions {
    fn default() -> Self {
        Self {
            duration_ms: 500,
            fallback_margin_ms: 50,
        }
    }
}

impl FlipOptions {
    pub fn transition(&self) -> String {
        format!("transform {}ms", self.duration_ms)
    }

    pub fn fallback_ms(&self) -> u64 {
        self.duration_ms.saturating_add(self.fallback_margin_ms)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Idle,
    /// Inverted transform applied; counting frames until play.
    Inverted { frames: u8 },
    /// Transition running back to the natural position.
    Playing { deadline_ms: u64 },
}

/// One tracked element.
#[derive(Clone, Debug)]
pub struct FlipElement<N> {
    node: N,
    first: Point,
    last: Point,
    stage: Stage,
    /// Present while the element is animating.
    completion: Option<Completion>,
    /// The dragged element keeps receiving pointer events.
    exempt: bool,
}

impl<N: Clone + PartialEq> FlipElement<N> {
    /// Captures the element's current position as its `first`.
    pub fn capture<H: Host<Node = N>>(host: &H, node: N) -> Self {
        let first = host.bounding_rect(&node).origin();
        Self {
            node,
            first,
            last: Point::default(),
            stage: Stage::Idle,
            completion: None,
            exempt: false,
        }
    }

    pub fn node(&self) -> &N {
        &self.node
    }

    pub fn first(&self) -> Point {
        self.first
    }

    pub fn last(&self) -> Point {
        self.last
    }

    pub fn delta(&self) -> Point {
        self.first - self.last
    }

    pub fn is_playing(&self) -> bool {
        self.stage != Stage::Idle
    }

    pub fn capture_first<H: Host<Node = N>>(&mut self, host: &H) {
        self.first = host.bounding_rect(&self.node).origin();
    }

    fn capture_last<H: Host<Node = N>>(&mut self, host: &H) {
        self.last = host.bounding_rect(&self.node).origin();
    }

    /// Starts animating from `first` to wherever layout now places the element.
    ///
    /// An element that is already animating is left alone; the returned completion is its
    /// in-flight one.
    pub fn play<H: Host<Node = N>>(&mut self, host: &mut H) -> Completion {
        if let Some(c) = &self.completion {
            return c.clone();
        }

        self.capture_last(host);
        let delta = self.delta();
        if delta.is_zero() {
            return Completion::resolved(Settled::Unchanged);
        }

        host.set_style(&self.node, StyleProperty::Transition, "none");
        host.set_style(
            &self.node,
            StyleProperty::Transform,
            &format!("translate({}px, {}px)", delta.x, delta.y),
        );
        // Moving siblings would otherwise swallow `dragenter` meant for the element beneath them.
        if !self.exempt {
            host.set_style(&self.node, StyleProperty::PointerEvents, "none");
        }

        let completion = Completion::new();
        self.completion = Some(completion.clone());
        self.stage = Stage::Inverted { frames: 0 };
        completion
    }

    pub fn on_animation_frame<H: Host<Node = N>>(
        &mut self,
        host: &mut H,
        options: &FlipOptions,
        now_ms: u64,
    ) {
        let Stage::Inverted { frames } = self.stage else {
            return;
        };
        let frames = frames + 1;
        if frames < PLAY_AFTER_FRAMES {
            self.stage = Stage::Inverted { frames };
            return;
        }

        host.set_style(&self.node, StyleProperty::Transition, &options.transition());
        host.set_style(&self.node, StyleProperty::Transform, "none");
        self.stage = Stage::Playing {
            deadline_ms: now_ms.saturating_add(options.fallback_ms()),
        };
    }

    /// Returns `true` if this call completed the animation.
    pub fn on_transition_end<H: Host<Node = N>>(&mut self, host: &mut H, node: &N) -> bool {
        if &self.node != node || !matches!(self.stage, Stage::Playing { .. }) {
            return false;
        }
        self.complete(host, Settled::TransitionEnd)
    }

    /// Returns `true` if the fallback timer completed the animation.
    pub fn tick<H: Host<Node = N>>(&mut self, host: &mut H, now_ms: u64) -> bool {
        match self.stage {
            Stage::Playing { deadline_ms } if now_ms >= deadline_ms => {
                self.complete(host, Settled::Timeout)
            }
            _ => false,
        }
    }

    /// Aborts an in-flight animation, clearing every override.
    pub fn interrupt<H: Host<Node = N>>(&mut self, host: &mut H) -> bool {
        if self.completion.is_none() {
            return false;
        }
        self.complete(host, Settled::Interrupted)
    }

    fn complete<H: Host<Node = N>>(&mut self, host: &mut H, how: Settled) -> bool {
        let Some(completion) = self.completion.take() else {
            return false;
        };
        self.reset(host);
        self.capture_first(host);
        completion.resolve(how)
    }

    fn reset<H: Host<Node = N>>(&mut self, host: &mut H) {
        host.set_style(&self.node, StyleProperty::PointerEvents, "");
        host.set_style(&self.node, StyleProperty::Transition, "");
        host.set_style(&self.node, StyleProperty::Transform, "");
        self.stage = Stage::Idle;
    }
}

/// A set of sibling elements animated together for one drag gesture.
#[derive(Clone, Debug)]
pub struct FlipSession<N> {
    elements: Vec<FlipElement<N>>,
    options: FlipOptions,
    last_play: Option<Join>,
}

impl<N: Clone + PartialEq> FlipSession<N> {
    /// Captures the `first` position of every node.
    ///
    /// `exempt` names the actively dragged element, which keeps its pointer events while the
    /// others animate.
    pub fn capture<H: Host<Node = N>>(
        host: &H,
        nodes: Vec<N>,
        exempt: Option<&N>,
        options: FlipOptions,
    ) -> Self {
        let elements = nodes
            .into_iter()
            .map(|node| {
                let mut el = FlipElement::capture(host, node);
                el.exempt = exempt == Some(&el.node);
                el
            })
            .collect::<Vec<_>>();
        dtrace!(count = elements.len(), "FlipSession::capture");
        Self {
            elements,
            options,
            last_play: None,
        }
    }

    pub fn options(&self) -> &FlipOptions {
        &self.options
    }

    pub fn elements(&self) -> &[FlipElement<N>] {
        &self.elements
    }

    pub fn element(&self, node: &N) -> Option<&FlipElement<N>> {
        self.elements.iter().find(|e| &e.node == node)
    }

    /// Plays every element concurrently. The returned join resolves once all of them have.
    pub fn play<H: Host<Node = N>>(&mut self, host: &mut H) -> Join {
        let parts = self
            .elements
            .iter_mut()
            .map(|el| el.play(host))
            .collect::<Vec<_>>();
        let join = Join::new(parts);
        self.last_play = Some(join.clone());
        join
    }

    /// `true` while any element is still animating.
    pub fn is_animating(&self) -> bool {
        self.elements.iter().any(FlipElement::is_playing)
    }

    /// The join returned by the most recent [`FlipSession::play`].
    pub fn last_play(&self) -> Option<&Join> {
        self.last_play.as_ref()
    }

    pub fn on_animation_frame<H: Host<Node = N>>(&mut self, host: &mut H, now_ms: u64) {
        let options = self.options;
        for el in &mut self.elements {
            el.on_animation_frame(host, &options, now_ms);
        }
    }

    pub fn on_transition_end<H: Host<Node = N>>(&mut self, host: &mut H, node: &N) -> bool {
        self.elements
            .iter_mut()
            .any(|el| el.on_transition_end(host, node))
    }

    /// Fires fallback timers that are due. Returns how many elements timed out.
    pub fn tick<H: Host<Node = N>>(&mut self, host: &mut H, now_ms: u64) -> usize {
        let mut fired = 0;
        for el in &mut self.elements {
            if el.tick(host, now_ms) {
                fired += 1;
            }
        }
        if fired > 0 {
            dtrace!(fired, now_ms, "FlipSession::tick: fallback timer completed elements");
        }
        fired
    }

    /// Settles every in-flight animation immediately.
    pub fn finish_now<H: Host<Node = N>>(&mut self, host: &mut H) {
        for el in &mut self.elements {
            el.interrupt(host);
        }
    }
}
