//! Fetch, render and redraw loop behind `get --watch`.
//!
//! The fetch and the sleep between ticks both race the same cancellation
//! token and deadline, so a hung request cannot hold the loop open past a
//! cancel or a timeout.

use std::future::Future;
use std::io::{self, Write};
use std::ops::ControlFlow;

use crossterm::queue;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::ansi::ClearScreen;
use crate::errors::{FetchError, WatchError};
use crate::structs::RenderOptions;
use crate::tree::{ResourceNode, TreeRenderer};

/// Produces a fresh snapshot of the tree to render.
pub trait TreeSource {
    fn fetch(&self) -> impl Future<Output = Result<ResourceNode, FetchError>> + Send;
}

/// Why the loop stopped without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchExit {
    /// Single shot render finished.
    Completed,
    Cancelled,
    TimedOut,
}

pub struct WatchLoop<'a, S> {
    source: &'a S,
    options: &'a RenderOptions,
    renderer: TreeRenderer,
    cancel: CancellationToken,
}

impl<'a, S: TreeSource> WatchLoop<'a, S> {
    pub fn new(source: &'a S, options: &'a RenderOptions, cancel: CancellationToken) -> Self {
        Self {
            source,
            options,
            renderer: TreeRenderer::new(options),
            cancel,
        }
    }

    /// Renders once, or until cancelled or timed out when watching.
    #[tracing::instrument(skip_all, fields(watch = self.options.watch))]
    pub async fn run<W: Write + ?Sized>(&self, out: &mut W) -> Result<WatchExit, WatchError> {
        let deadline = self.options.timeout.map(|t| Instant::now() + t);
        let period = self.options.refresh_interval;
        let mut tick = time::interval_at(Instant::now() + period, period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut last_frame: Option<String> = None;

        loop {
            let fetched = match self.until_stopped(deadline, self.source.fetch()).await {
                ControlFlow::Continue(fetched) => fetched,
                ControlFlow::Break(exit) => return Ok(exit),
            };

            match fetched {
                Ok(tree) => {
                    let frame = self.renderer.render_to_string(&tree);
                    self.draw(out, &frame)?;
                    last_frame = Some(frame);
                }
                Err(err) if err.is_fatal() || !self.options.watch => return Err(err.into()),
                Err(err) => {
                    warn!(error = %err, "failed to fetch resource tree, retrying on next tick");
                    let mut frame = last_frame.clone().unwrap_or_default();
                    frame.push_str(&format!("\nerror: {err}\n"));
                    self.draw(out, &frame)?;
                }
            }

            if !self.options.watch {
                return Ok(WatchExit::Completed);
            }

            if let ControlFlow::Break(exit) = self.until_stopped(deadline, tick.tick()).await {
                return Ok(exit);
            }
        }
    }

    async fn until_stopped<F: Future>(
        &self,
        deadline: Option<Instant>,
        fut: F,
    ) -> ControlFlow<WatchExit, F::Output> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                debug!("watch cancelled");
                ControlFlow::Break(WatchExit::Cancelled)
            }
            _ = sleep_until(deadline) => {
                debug!("watch timed out");
                ControlFlow::Break(WatchExit::TimedOut)
            }
            output = fut => ControlFlow::Continue(output),
        }
    }

    /// Writes a whole frame, preceded by a screen clear when watching.
    fn draw<W: Write + ?Sized>(&self, out: &mut W, frame: &str) -> io::Result<()> {
        let mut buf = Vec::with_capacity(frame.len() + 16);
        if self.options.watch {
            queue!(buf, ClearScreen)?;
        }
        buf.extend_from_slice(frame.as_bytes());
        out.write_all(&buf)?;
        out.flush()
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
