/// Distance from the bottom, in pixels, that still counts as "at the bottom".
pub const NEAR_BOTTOM_PX: f64 = 100.0;

/// Quiet period after the last scroll event before the user is considered
/// done scrolling.
pub const SCROLL_IDLE_MS: u64 = 150;

/// Geometry of the scroll container at the time of an event.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl Viewport {
    pub fn is_near_bottom(&self) -> bool {
        self.scroll_height - self.scroll_top - self.client_height < NEAR_BOTTOM_PX
    }
}

/// Decides whether new content should pull the view to the bottom.
///
/// Scrolling up hands control to the user; coming back near the bottom,
/// sending a prompt, or pressing the jump button hands it back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollTracker {
    auto_scroll: bool,
    user_scrolling: bool,
    last_scroll_top: f64,
}

impl Default for ScrollTracker {
    fn default() -> Self {
        Self {
            auto_scroll: true,
            user_scrolling: false,
            last_scroll_top: 0.0,
        }
    }
}

impl ScrollTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn auto_scroll(&self) -> bool {
        self.auto_scroll
    }

    pub fn user_scrolling(&self) -> bool {
        self.user_scrolling
    }

    /// Whether content updates should scroll the container to the bottom.
    pub fn should_follow(&self) -> bool {
        self.auto_scroll && !self.user_scrolling
    }

    /// Each update below reports whether `auto_scroll` or `user_scrolling`
    /// changed, so callers can skip notifying when nothing visible moved.
    pub fn on_scroll(&mut self, view: Viewport) -> bool {
        let before = self.mode();
        let scrolling_up = view.scroll_top < self.last_scroll_top;

        if scrolling_up && !self.user_scrolling {
            self.user_scrolling = true;
            self.auto_scroll = false;
        }

        if view.is_near_bottom() && !scrolling_up && !self.auto_scroll {
            self.user_scrolling = false;
            self.auto_scroll = true;
        }

        self.last_scroll_top = view.scroll_top;
        self.mode() != before
    }

    /// No scroll events for [`SCROLL_IDLE_MS`].
    pub fn on_scroll_idle(&mut self) -> bool {
        let before = self.mode();
        self.user_scrolling = false;
        self.mode() != before
    }

    /// The user sent a prompt or pressed "scroll to bottom".
    pub fn resume(&mut self) -> bool {
        let before = self.mode();
        self.auto_scroll = true;
        self.user_scrolling = false;
        self.mode() != before
    }

    /// A reply is starting; follow it only if the reader is already there.
    pub fn on_reply_start(&mut self, view: Viewport) -> bool {
        let before = self.mode();
        if view.is_near_bottom() {
            self.auto_scroll = true;
        }
        self.mode() != before
    }

    fn mode(&self) -> (bool, bool) {
        (self.auto_scroll, self.user_scrolling)
    }
}

/// Outcome of an idle timer firing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IdleCheck {
    /// The quiet period has passed.
    Idle,
    /// More events came in; look again after this many milliseconds.
    Wait(f64),
}

/// Scroll-idle debounce that never cancels a timer.
///
/// Only one timer is pending at a time. Events arriving while it is pending
/// just move `last_event` forward, and the timer re-arms itself for the
/// remainder when it fires early.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct IdleDebounce {
    last_event: f64,
    armed: bool,
}

impl IdleDebounce {
    /// Record an event at `now` (ms). Returns `true` when no timer is pending
    /// and the caller has to arm one.
    pub fn touch(&mut self, now: f64) -> bool {
        self.last_event = now;
        !std::mem::replace(&mut self.armed, true)
    }

    pub fn check(&mut self, now: f64, idle_ms: f64) -> IdleCheck {
        let waited = now - self.last_event;
        if waited >= idle_ms {
            self.armed = false;
            IdleCheck::Idle
        } else {
            IdleCheck::Wait(idle_ms - waited)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(scroll_top: f64) -> Viewport {
        Viewport {
            scroll_top,
            scroll_height: 2000.0,
            client_height: 500.0,
        }
    }

    #[test]
    fn near_bottom_threshold() {
        assert!(at(1450.0).is_near_bottom());
        assert!(!at(1400.0).is_near_bottom());
        assert!(!at(0.0).is_near_bottom());
    }

    #[test]
    fn follows_by_default() {
        assert!(ScrollTracker::new().should_follow());
    }

    #[test]
    fn scrolling_up_stops_following() {
        let mut tracker = ScrollTracker::new();
        tracker.on_scroll(at(1500.0));
        tracker.on_scroll(at(900.0));
        assert!(!tracker.auto_scroll());
        assert!(tracker.user_scrolling());
        assert!(!tracker.should_follow());

        tracker.on_scroll_idle();
        assert!(!tracker.user_scrolling());
        assert!(!tracker.should_follow());
    }

    #[test]
    fn returning_to_bottom_resumes() {
        let mut tracker = ScrollTracker::new();
        tracker.on_scroll(at(1500.0));
        tracker.on_scroll(at(600.0));
        tracker.on_scroll_idle();

        tracker.on_scroll(at(1000.0));
        assert!(!tracker.should_follow());
        tracker.on_scroll(at(1480.0));
        assert!(tracker.should_follow());
    }

    #[test]
    fn resume_after_jump_button() {
        let mut tracker = ScrollTracker::new();
        tracker.on_scroll(at(1500.0));
        tracker.on_scroll(at(100.0));
        tracker.resume();
        assert!(tracker.should_follow());
    }

    #[test]
    fn reply_start_only_reenables_near_bottom() {
        let mut tracker = ScrollTracker::new();
        tracker.on_scroll(at(1500.0));
        tracker.on_scroll(at(100.0));
        tracker.on_scroll_idle();

        tracker.on_reply_start(at(100.0));
        assert!(!tracker.auto_scroll());

        tracker.on_reply_start(at(1490.0));
        assert!(tracker.auto_scroll());
    }

    #[test]
    fn unchanged_mode_reports_no_change() {
        let mut tracker = ScrollTracker::new();
        // following and drifting down: nothing visible changes
        assert!(!tracker.on_scroll(at(1450.0)));
        assert!(!tracker.on_scroll(at(1480.0)));
        assert!(!tracker.resume());
        assert!(!tracker.on_scroll_idle());

        assert!(tracker.on_scroll(at(900.0)));
        // still scrolling up: already handed to the user
        assert!(!tracker.on_scroll(at(800.0)));
        assert!(tracker.on_scroll_idle());
        assert!(!tracker.on_reply_start(at(800.0)));
        assert!(tracker.resume());
    }

    #[test]
    fn debounce_arms_once_per_quiet_period() {
        let mut idle = IdleDebounce::default();
        assert!(idle.touch(0.0));
        assert!(!idle.touch(50.0));
        assert!(!idle.touch(100.0));

        // first timer fires at 150 but the last event was at 100
        assert_eq!(idle.check(150.0, 150.0), IdleCheck::Wait(100.0));
        assert!(!idle.touch(200.0));
        assert_eq!(idle.check(250.0, 150.0), IdleCheck::Wait(100.0));
        assert_eq!(idle.check(350.0, 150.0), IdleCheck::Idle);

        // quiet again: the next event arms a fresh timer
        assert!(idle.touch(400.0));
    }
}
