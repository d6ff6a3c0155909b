//! typewriter-style reveal of a dialog body, one resend per timer tick

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    error::DialogError,
    scheduler::TaskHandle,
    services::DialogServices,
    session::SessionRef,
    transport::{DialogTransport, DialogWindow},
};

/// Introduces a two-character formatting code such as `§6`.
pub const STYLE_ESCAPE: char = '§';

struct ScrollState {
    chars: Vec<char>,
    active: bool,
    cursor: usize,
    timer: Option<TaskHandle>,
}

enum Step {
    Reveal(String),
    Finish(Option<TaskHandle>),
}

/// Runs right before the full window goes out.
pub type FinishHook = Arc<dyn Fn() + Send + Sync>;

impl ScrollState {
    fn step(&mut self) -> Step {
        if !self.active || self.cursor >= self.chars.len() {
            self.cursor = 0;
            self.active = false;
            return Step::Finish(self.timer.take());
        }

        let shown = self.chars[..self.cursor].iter().collect();
        self.cursor += reveal_width(&self.chars, self.cursor);
        Step::Reveal(shown)
    }
}

/// How many chars the reveal moves past at `cursor`: a formatting code and its argument go
/// together, everything else one at a time.
fn reveal_width(chars: &[char], cursor: usize) -> usize {
    if chars[cursor] == STYLE_ESCAPE && cursor + 1 < chars.len() {
        2
    } else {
        1
    }
}

/// Re-sends a window with a growing prefix of its body every `speed` ticks, then the full
/// window once.
///
/// The final full send happens exactly once per run, whether the reveal finished,
/// [`stop`](Self::stop) was called or the presenter was restarted. Cancelling the
/// [`TaskHandle`] returned by [`start`](Self::start) abandons the run without it. Cursor and
/// length count chars, not bytes.
pub struct ScrollingTextPresenter {
    services: Arc<DialogServices>,
    session: SessionRef,
    window: DialogWindow,
    speed: u32,
    on_finish: Option<FinishHook>,
    state: Arc<Mutex<ScrollState>>,
}

impl ScrollingTextPresenter {
    pub fn new(
        services: Arc<DialogServices>,
        session: SessionRef,
        window: DialogWindow,
        speed: u32,
    ) -> Self {
        let chars = window.snapshot.body.chars().collect();
        Self {
            services,
            session,
            window,
            speed: speed.max(1),
            on_finish: None,
            state: Arc::new(Mutex::new(ScrollState {
                chars,
                active: false,
                cursor: 0,
                timer: None,
            })),
        }
    }

    pub fn with_default_speed(
        services: Arc<DialogServices>,
        session: SessionRef,
        window: DialogWindow,
    ) -> Self {
        let speed = services.settings.scroll_speed_ticks;
        Self::new(services, session, window, speed)
    }

    /// Called before every final full send, e.g. to start delays that must follow the
    /// interactive window rather than the first partial one.
    pub fn on_finish(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_finish = Some(Arc::new(hook));
        self
    }

    /// Starts a run from the beginning. A run still in progress gets its final send first.
    pub fn start(&self) -> TaskHandle {
        let previous = {
            let mut state = lock(&self.state);
            state.active = true;
            state.cursor = 0;
            state.timer.take()
        };
        if let Some(previous) = previous {
            previous.cancel();
            finish(
                self.on_finish.as_ref(),
                self.services.transport.as_ref(),
                &self.session,
                &self.window,
            );
        }

        let state = self.state.clone();
        let transport = self.services.transport.clone();
        let session = self.session.clone();
        let window = self.window.clone();
        let on_finish = self.on_finish.clone();
        let timer = self.services.scheduler.schedule_repeating(
            self.speed,
            Box::new(move || {
                scroll_tick(&state, on_finish.as_ref(), transport.as_ref(), &session, &window)
            }),
        );
        lock(&self.state).timer = Some(timer.clone());
        timer
    }

    /// Ends the reveal on the next tick, which still sends the full window.
    pub fn stop(&self) {
        lock(&self.state).active = false;
    }

    pub fn is_active(&self) -> bool {
        lock(&self.state).active
    }

    pub fn cursor(&self) -> usize {
        lock(&self.state).cursor
    }

    pub fn set_cursor(&self, cursor: usize) -> Result<(), DialogError> {
        let mut state = lock(&self.state);
        let len = state.chars.len();
        if cursor > len {
            return Err(DialogError::CursorOutOfRange { cursor, len });
        }
        state.cursor = cursor;
        Ok(())
    }

    pub fn len(&self) -> usize {
        lock(&self.state).chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn window(&self) -> &DialogWindow {
        &self.window
    }
}

fn scroll_tick(
    state: &Mutex<ScrollState>,
    on_finish: Option<&FinishHook>,
    transport: &dyn DialogTransport,
    session: &SessionRef,
    window: &DialogWindow,
) {
    let step = lock(state).step();
    match step {
        Step::Reveal(body) => transport.transmit(session, &window.partial(body)),
        Step::Finish(timer) => {
            if let Some(timer) = timer {
                timer.cancel();
            }
            finish(on_finish, transport, session, window);
        }
    }
}

fn finish(
    on_finish: Option<&FinishHook>,
    transport: &dyn DialogTransport,
    session: &SessionRef,
    window: &DialogWindow,
) {
    if let Some(on_finish) = on_finish {
        on_finish();
    }
    transport.transmit(session, window);
}

fn lock(state: &Mutex<ScrollState>) -> MutexGuard<'_, ScrollState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        session::HostRef,
        testing::{FakeHost, FakeSession, Harness, NoopListener},
        transport::DialogSnapshot,
    };

    fn window(body: &str) -> DialogWindow {
        let host: HostRef = FakeHost::new("guide");
        DialogWindow::new(
            host,
            DialogSnapshot {
                title: "title".to_string(),
                body: body.to_string(),
                buttons: vec!["ok".to_string()],
                skin_data: "{}".to_string(),
            },
        )
        .with_listener(Arc::new(NoopListener))
    }

    fn presenter(harness: &Harness, body: &str, speed: u32) -> ScrollingTextPresenter {
        let session: SessionRef = FakeSession::new("steve");
        ScrollingTextPresenter::new(harness.services(), session, window(body), speed)
    }

    #[test]
    fn reveal_keeps_style_codes_whole() {
        let harness = Harness::new();
        let scroll = presenter(&harness, "ab§1c", 2);
        scroll.start();
        assert!(scroll.is_active());

        harness.clock.advance(40);

        let bodies = harness.transport.bodies();
        assert_eq!(bodies, vec!["", "a", "ab", "ab§1", "ab§1c"]);
        for body in &bodies[..bodies.len() - 1] {
            assert!(!body.ends_with(STYLE_ESCAPE));
        }
    }

    #[test]
    fn partial_sends_are_bare_and_final_send_is_the_original() {
        let harness = Harness::new();
        let scroll = presenter(&harness, "hey", 1);
        scroll.start();
        harness.clock.advance(10);

        let sent = harness.transport.sent();
        let (last, partials) = sent.split_last().unwrap();
        for partial in partials {
            assert!(partial.snapshot.buttons.is_empty());
            assert!(!partial.has_listener());
            assert_eq!(partial.snapshot.title, "title");
            assert_eq!(partial.snapshot.skin_data, "{}");
        }
        assert!(Arc::ptr_eq(&last.snapshot, &scroll.window().snapshot));
        assert!(last.has_listener());
    }

    #[test]
    fn completion_sends_full_window_once_and_goes_idle() {
        let harness = Harness::new();
        let scroll = presenter(&harness, "abc", 2);
        scroll.start();
        harness.clock.advance(100);

        let full = harness
            .transport
            .bodies()
            .into_iter()
            .filter(|body| body == "abc")
            .count();
        assert_eq!(full, 1);
        assert!(!scroll.is_active());
        assert_eq!(scroll.cursor(), 0);
        assert_eq!(harness.clock.pending(), 0);
    }

    #[test]
    fn stop_finishes_on_next_tick() {
        let harness = Harness::new();
        let scroll = presenter(&harness, "a long line of text", 1);
        scroll.start();
        harness.clock.advance(3);
        scroll.stop();
        assert!(!scroll.is_active());
        assert_eq!(harness.transport.sent().len(), 3);

        harness.clock.tick();
        assert_eq!(
            harness.transport.bodies().last().map(String::as_str),
            Some("a long line of text")
        );
        harness.clock.advance(20);
        assert_eq!(harness.transport.sent().len(), 4);
    }

    #[test]
    fn lone_trailing_escape_is_only_shown_in_full() {
        let harness = Harness::new();
        let scroll = presenter(&harness, "ab§", 1);
        scroll.start();
        harness.clock.advance(10);
        assert_eq!(harness.transport.bodies(), vec!["", "a", "ab", "ab§"]);
    }

    #[test]
    fn restart_after_completion() {
        let harness = Harness::new();
        let scroll = presenter(&harness, "ab", 1);
        scroll.start();
        harness.clock.advance(10);
        assert!(!scroll.is_active());

        scroll.start();
        assert!(scroll.is_active());
        harness.clock.advance(10);
        assert_eq!(
            harness.transport.bodies(),
            vec!["", "a", "ab", "", "a", "ab"]
        );
    }

    #[test]
    fn restart_while_running_finishes_the_old_run_first() {
        let harness = Harness::new();
        let scroll = presenter(&harness, "abcdef", 1);
        let first = scroll.start();
        harness.clock.advance(2);
        let second = scroll.start();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        harness.clock.advance(2);
        assert_eq!(harness.transport.bodies(), vec!["", "a", "abcdef", "", "a"]);
    }

    #[test]
    fn cancelled_run_skips_the_final_send() {
        let harness = Harness::new();
        let scroll = presenter(&harness, "abcdef", 1);
        let timer = scroll.start();
        harness.clock.advance(2);
        timer.cancel();
        harness.clock.advance(20);
        assert_eq!(harness.transport.bodies(), vec!["", "a"]);
    }

    #[test]
    fn finish_hook_runs_before_each_full_send() {
        let harness = Harness::new();
        let transport = harness.transport.clone();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        let scroll = presenter(&harness, "ab", 1).on_finish(move || {
            log.lock().unwrap().push(transport.sent().len());
        });

        scroll.start();
        harness.clock.advance(10);
        scroll.start();
        harness.clock.advance(10);

        // sends before the hook ran: "", "a", "ab" | "", "a", "ab"
        assert_eq!(*seen.lock().unwrap(), vec![2, 5]);
    }

    #[test]
    fn cursor_is_bounded_by_char_length() {
        let harness = Harness::new();
        let scroll = presenter(&harness, "ab§1c", 2);
        assert_eq!(scroll.len(), 5);

        assert!(scroll.set_cursor(0).is_ok());
        assert!(scroll.set_cursor(5).is_ok());
        assert_eq!(scroll.cursor(), 5);
        assert!(matches!(
            scroll.set_cursor(6),
            Err(DialogError::CursorOutOfRange { cursor: 6, len: 5 })
        ));
        assert_eq!(scroll.cursor(), 5);
    }

    #[test]
    fn default_speed_comes_from_settings() {
        let harness = Harness::new();
        let session: SessionRef = FakeSession::new("steve");
        let scroll =
            ScrollingTextPresenter::with_default_speed(harness.services(), session, window("x"));
        assert_eq!(scroll.speed(), harness.settings().scroll_speed_ticks);
    }
}
