//! `TuiRunner` — the application event loop that threads terminal, input
//! parser, and backend together.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::ThreadId;
use std::time::{Duration, Instant};

use crate::backend::{Backend, Frame};
use crate::error::Result;
use crate::event::{Event, TickEvent};
use crate::geometry::{Rect, Size};
use crate::input::InputParser;
use crate::terminal::Terminal;

type Task = Box<dyn FnOnce() + Send>;

/// A cloneable, `Send` handle into a running [`TuiRunner`], usable from
/// scheduled tasks or other threads to request a quit or queue render-thread
/// work.
#[derive(Clone)]
pub struct RunnerHandle {
    quit: Arc<AtomicBool>,
    queue: Arc<Mutex<VecDeque<Task>>>,
    render_thread: Arc<Mutex<Option<ThreadId>>>,
}

impl RunnerHandle {
    /// Request that the runner exit its loop after the current iteration.
    pub fn quit(&self) {
        self.quit.store(true, Ordering::SeqCst);
    }

    /// Run `task` immediately if called from the render thread; otherwise
    /// queue it for drainage on the runner's next loop iteration.
    pub fn run_on_render_thread(&self, task: impl FnOnce() + Send + 'static) {
        let render_thread = match self.render_thread.lock() {
            Ok(g) => g,
            Err(poison) => poison.into_inner(),
        };
        let on_render_thread = *render_thread == Some(std::thread::current().id());
        drop(render_thread);
        if on_render_thread {
            task();
        } else {
            let mut queue = match self.queue.lock() {
                Ok(g) => g,
                Err(poison) => poison.into_inner(),
            };
            queue.push_back(Box::new(task));
        }
    }

    /// Always queue `task` for drainage on the runner's next loop iteration,
    /// even when called from the render thread.
    pub fn run_later(&self, task: impl FnOnce() + Send + 'static) {
        let mut queue = match self.queue.lock() {
            Ok(g) => g,
            Err(poison) => poison.into_inner(),
        };
        queue.push_back(Box::new(task));
    }
}

enum ScheduledKind {
    Once(Option<Box<dyn FnMut() + Send>>),
    Repeating(Box<dyn FnMut() + Send>),
}

struct ScheduledTask {
    fire_at: Instant,
    period: Option<Duration>,
    kind: ScheduledKind,
}

/// Threads the platform terminal, input parser, and backend into a single
/// render-thread event loop.
///
/// Exactly one thread — the one that calls [`TuiRunner::run`] — ever
/// mutates the backend's buffers or application state reached through the
/// draw closure. The scheduler and OS resize signals feed that thread
/// through [`RunnerHandle`]'s thread-safe queue.
pub struct TuiRunner<T: Terminal> {
    terminal: T,
    backend: Backend,
    parser: InputParser,
    tick_interval: Duration,
    handle: RunnerHandle,
    scheduled: Vec<ScheduledTask>,
    frame_count: u64,
    last_size: Size,
}

impl<T: Terminal> TuiRunner<T> {
    /// Create a runner over an already-open terminal and backend.
    pub fn new(terminal: T, backend: Backend) -> Self {
        Self {
            terminal,
            backend,
            parser: InputParser::new(),
            tick_interval: Duration::from_millis(250),
            handle: RunnerHandle {
                quit: Arc::new(AtomicBool::new(false)),
                queue: Arc::new(Mutex::new(VecDeque::new())),
                render_thread: Arc::new(Mutex::new(None)),
            },
            scheduled: Vec::new(),
            frame_count: 0,
            last_size: Size::default(),
        }
    }

    /// Override the scheduler tick interval (default 250ms).
    #[must_use]
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// A cloneable handle for requesting quit or queuing render-thread work
    /// from outside the loop (e.g. from a scheduled task).
    pub fn handle(&self) -> RunnerHandle {
        self.handle.clone()
    }

    /// Request that the loop exit after its current iteration.
    pub fn quit(&self) {
        self.handle.quit();
    }

    /// Run `task` once, after `delay` has elapsed, on the render thread.
    pub fn schedule(&mut self, task: impl FnOnce() + Send + 'static, delay: Duration) {
        self.scheduled.push(ScheduledTask {
            fire_at: Instant::now() + delay,
            period: None,
            kind: ScheduledKind::Once(Some(Box::new(task))),
        });
    }

    /// Run `task` repeatedly, every `period`, on the render thread.
    pub fn schedule_repeating(&mut self, task: impl FnMut() + Send + 'static, period: Duration) {
        self.scheduled.push(ScheduledTask {
            fire_at: Instant::now() + period,
            period: Some(period),
            kind: ScheduledKind::Repeating(Box::new(task)),
        });
    }

    /// Enter raw mode and run the event loop until `quit()` is called, Ctrl+C
    /// is observed, or an unrecoverable I/O error occurs. `event_handler` is
    /// invoked for every parsed input event, tick, and resize, and returns
    /// whether the frame should be redrawn. `draw_fn` renders the current
    /// frame; it runs only when an event requested a redraw or the terminal
    /// was resized.
    ///
    /// For a quit-triggering event (Ctrl+C, or any key bound to the `"quit"`
    /// action), the loop quits by default once `event_handler` returns — but
    /// if `event_handler` returns `true` for that event, the quit is declined
    /// and the loop keeps running.
    ///
    /// On panic inside `event_handler` or `draw_fn`, the terminal's raw mode
    /// is restored before the panic resumes.
    pub fn run<H, D>(&mut self, mut event_handler: H, mut draw_fn: D) -> Result<()>
    where
        H: FnMut(&Event) -> bool,
        D: FnMut(&mut Frame<'_>),
    {
        let mut render_thread = match self.handle.render_thread.lock() {
            Ok(g) => g,
            Err(poison) => poison.into_inner(),
        };
        *render_thread = Some(std::thread::current().id());
        drop(render_thread);
        self.terminal.enter_raw_mode()?;

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            self.run_loop(&mut event_handler, &mut draw_fn)
        }));

        if result.is_err() {
            tracing::warn!("panic during event loop, restoring terminal before resuming unwind");
        }
        let _ = self.terminal.exit_raw_mode();

        match result {
            Ok(r) => r,
            Err(payload) => std::panic::resume_unwind(payload),
        }
    }

    fn run_loop(
        &mut self,
        event_handler: &mut dyn FnMut(&Event) -> bool,
        draw_fn: &mut dyn FnMut(&mut Frame<'_>),
    ) -> Result<()> {
        self.last_size = self.terminal.size()?;
        let mut last_tick = Instant::now();

        loop {
            if self.handle.quit.load(Ordering::SeqCst) {
                break;
            }

            self.run_scheduled_tasks();

            let mut should_redraw = false;

            let remaining = self.tick_interval.saturating_sub(last_tick.elapsed());
            let timeout_ms = u64::try_from(remaining.as_millis()).unwrap_or(u64::MAX);

            if let Some(byte) = self.terminal.read_byte(timeout_ms)? {
                for event in self.parser.feed(&[byte]) {
                    let redraw = event_handler(&event);
                    should_redraw |= redraw;
                    // A quit-triggering event (Ctrl+C, a "quit"-bound key) quits
                    // by default; the handler declines by returning true, taking
                    // responsibility for continuing (or quitting explicitly via
                    // the handle) itself.
                    if event.is_quit() && !redraw {
                        self.handle.quit();
                    }
                }
            } else if let Some(event) = self.parser.check_timeout() {
                should_redraw |= event_handler(&event);
            }

            let current_size = self.terminal.size()?;
            let resized = current_size != self.last_size;
            if resized {
                tracing::debug!(width = current_size.width, height = current_size.height, "resize dispatched");
                self.last_size = current_size;
                should_redraw |= event_handler(&Event::Resize(current_size));
            }

            if last_tick.elapsed() >= self.tick_interval {
                self.frame_count += 1;
                let tick = Event::Tick(TickEvent {
                    frame_count: self.frame_count,
                    elapsed: last_tick.elapsed(),
                });
                should_redraw |= event_handler(&tick);
                last_tick = Instant::now();
            }

            self.drain_queue();

            if should_redraw || resized {
                let area = Rect::from_size(current_size);
                self.backend.draw(&mut self.terminal, area, |frame| {
                    draw_fn(frame);
                })?;
            }

            if self.handle.quit.load(Ordering::SeqCst) {
                break;
            }
        }
        Ok(())
    }

    fn drain_queue(&self) {
        let mut queue = match self.handle.queue.lock() {
            Ok(g) => g,
            Err(poison) => poison.into_inner(),
        };
        let tasks: Vec<Task> = queue.drain(..).collect();
        drop(queue);
        for task in tasks {
            task();
        }
    }

    fn run_scheduled_tasks(&mut self) {
        let now = Instant::now();
        let mut i = 0;
        while i < self.scheduled.len() {
            if self.scheduled[i].fire_at > now {
                i += 1;
                continue;
            }
            match &mut self.scheduled[i].kind {
                ScheduledKind::Once(slot) => {
                    if let Some(mut task) = slot.take() {
                        task();
                    }
                    self.scheduled.remove(i);
                }
                ScheduledKind::Repeating(task) => {
                    task();
                    let period = self.scheduled[i].period.unwrap_or(self.tick_interval);
                    self.scheduled[i].fire_at = now + period;
                    i += 1;
                }
            }
        }
    }
}
