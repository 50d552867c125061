//! Proximity observation of placeholder regions.
//!
//! [`observe`] is the low-level subscription: it re-evaluates a region
//! against the margin-expanded viewport at animation-frame boundaries and
//! hands entries to a callback until the callback asks to disconnect or the
//! returned [`Observation`] is dropped.
//!
//! [`VisibilityObserver`] builds the fire-once signal on top of it: the
//! first entry that crosses the threshold flips `is_visible` to true,
//! publishes [`PageEvent::SectionVisible`], and disconnects.

use crate::events::{PageEvent, PageEvents};
use crate::geometry::{Rect, RootMargin, Viewport, intersect};
use crate::scheduler::{FrameClock, ScopedTask};
use crate::section::SectionId;
use anyhow::{Result, bail};
use std::cell::Cell;
use std::rc::Rc;
use tokio::sync::watch;

/// Default fraction of the region that must be inside the root.
pub const DEFAULT_THRESHOLD: f32 = 0.15;

/// Proximity configuration for one observation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObserverOptions {
    /// How far beyond the viewport edges counts as "near"
    pub root_margin: RootMargin,
    /// Minimum intersection ratio, in `[0, 1]`
    pub threshold: f32,
}

impl ObserverOptions {
    /// Reject thresholds outside `[0, 1]`.
    ///
    /// # Errors
    /// Returns an error when the threshold is not a finite fraction
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            bail!("threshold {} is outside [0, 1]", self.threshold);
        }
        Ok(())
    }
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            root_margin: RootMargin::default(),
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// One evaluation of a region against the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionEntry {
    /// Region being observed
    pub target: Rect,
    /// Viewport grown by the root margin
    pub root: Rect,
    /// Overlap ratio of `target` within `root`
    pub ratio: f32,
    /// Whether `target` touches `root` at all
    pub is_intersecting: bool,
    /// Whether the ratio meets the threshold
    pub is_visible: bool,
    /// Frame on which the entry was computed
    pub frame: u64,
}

impl IntersectionEntry {
    /// Evaluate `target` against `viewport` under `options`.
    pub fn compute(
        target: Rect,
        viewport: &Viewport,
        options: &ObserverOptions,
        frame: u64,
    ) -> Self {
        let root = options.root_margin.expand(viewport.rect());
        let hit = intersect(&target, &root);
        Self {
            target,
            root,
            ratio: hit.ratio,
            is_intersecting: hit.is_intersecting,
            is_visible: hit.is_intersecting && hit.ratio >= options.threshold,
            frame,
        }
    }
}

/// What the callback wants after an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObserveControl {
    /// Keep observing
    Continue,
    /// Stop; no further callbacks
    Disconnect,
}

/// Dispose handle for a running observation. Dropping it disconnects.
pub struct Observation {
    connected: Rc<Cell<bool>>,
    task: ScopedTask,
}

impl Observation {
    /// Whether callbacks can still be delivered.
    #[inline]
    pub fn is_connected(&self) -> bool {
        self.connected.get() && !self.task.is_finished()
    }

    /// Stop observing now.
    pub fn disconnect(self) {
        self.connected.set(false);
        self.task.cancel();
    }
}

/// Observe `region` against `viewport`.
///
/// The first entry is delivered on the frame after mount, so a region that
/// is already near the viewport is reported without any scrolling. Later
/// entries are delivered only when the visibility decision changes.
///
/// # Errors
/// Returns an error when the options are invalid or either source has
/// already been closed
pub fn observe<F>(
    mut region: watch::Receiver<Rect>,
    mut viewport: watch::Receiver<Viewport>,
    options: ObserverOptions,
    frames: &FrameClock,
    mut callback: F,
) -> Result<Observation>
where
    F: FnMut(&IntersectionEntry) -> ObserveControl + 'static,
{
    options.validate()?;
    if region.has_changed().is_err() {
        bail!("region source is closed");
    }
    if viewport.has_changed().is_err() {
        bail!("viewport source is closed");
    }

    let connected = Rc::new(Cell::new(true));
    let flag = Rc::clone(&connected);
    let frames = frames.clone();
    let task = ScopedTask::spawn_local(async move {
        let mut last: Option<bool> = None;
        loop {
            let frame = frames.next_frame().await;
            let target = *region.borrow_and_update();
            let view = *viewport.borrow_and_update();
            let entry = IntersectionEntry::compute(target, &view, &options, frame);
            if last != Some(entry.is_visible) {
                last = Some(entry.is_visible);
                if callback(&entry) == ObserveControl::Disconnect {
                    break;
                }
            }
            let source_closed = tokio::select! {
                changed = region.changed() => changed.is_err(),
                changed = viewport.changed() => changed.is_err(),
            };
            if source_closed {
                log::debug!("observation source closed; disconnecting");
                break;
            }
        }
        flag.set(false);
    });
    Ok(Observation { connected, task })
}

struct VisibilityShared {
    visible: watch::Sender<bool>,
    callbacks: Cell<u32>,
}

impl VisibilityShared {
    /// Flip to visible. Returns false if it already was.
    fn mark_visible(&self) -> bool {
        self.visible.send_if_modified(|visible| {
            if *visible {
                false
            } else {
                *visible = true;
                true
            }
        })
    }
}

/// Fire-once proximity signal for one deferred section.
pub struct VisibilityObserver {
    section: SectionId,
    shared: Rc<VisibilityShared>,
    observation: Option<Observation>,
}

impl VisibilityObserver {
    /// Start observing `region`. Never fails: if observation cannot be set
    /// up the section is treated as visible immediately.
    pub fn mount(
        section: SectionId,
        region: watch::Receiver<Rect>,
        viewport: watch::Receiver<Viewport>,
        options: ObserverOptions,
        frames: &FrameClock,
        events: &PageEvents,
    ) -> Self {
        let (visible, _) = watch::channel(false);
        let shared = Rc::new(VisibilityShared {
            visible,
            callbacks: Cell::new(0),
        });

        let sink = Rc::clone(&shared);
        let bus = events.clone();
        let id = section.clone();
        let observed = observe(region, viewport, options, frames, move |entry| {
            sink.callbacks.set(sink.callbacks.get() + 1);
            if !entry.is_visible {
                return ObserveControl::Continue;
            }
            if sink.mark_visible() {
                log::debug!(
                    "{id} visible at ratio {:.2} on frame {}",
                    entry.ratio,
                    entry.frame
                );
                bus.emit(PageEvent::SectionVisible {
                    section: id.clone(),
                    at_ms: bus.elapsed_ms(),
                });
            }
            ObserveControl::Disconnect
        });

        let observation = match observed {
            Ok(observation) => Some(observation),
            Err(err) => {
                log::warn!("{section}: observation unavailable ({err:#}); rendering immediately");
                if shared.mark_visible() {
                    events.emit(PageEvent::SectionVisible {
                        section: section.clone(),
                        at_ms: events.elapsed_ms(),
                    });
                }
                None
            }
        };

        Self {
            section,
            shared,
            observation,
        }
    }

    /// Section this observer belongs to.
    #[inline]
    pub fn section(&self) -> &SectionId {
        &self.section
    }

    /// Whether the region has come near the viewport. Never reverts.
    #[inline]
    pub fn is_visible(&self) -> bool {
        *self.shared.visible.borrow()
    }

    /// Signal that turns true once.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shared.visible.subscribe()
    }

    /// Entries delivered to this observer so far.
    #[inline]
    pub fn callback_count(&self) -> u32 {
        self.shared.callbacks.get()
    }

    /// Whether the underlying observation is still connected.
    pub fn is_observing(&self) -> bool {
        self.observation.as_ref().is_some_and(Observation::is_connected)
    }

    /// Whether setup failed and the section was made visible unconditionally.
    #[inline]
    pub fn is_degraded(&self) -> bool {
        self.observation.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_respects_threshold() {
        let options = ObserverOptions::default();
        let viewport = Viewport::new(1280.0, 800.0);
        // Top edge just inside the margin: intersecting but below 15%.
        let barely = IntersectionEntry::compute(
            Rect::new(0.0, 1100.0, 1280.0, 400.0),
            &viewport,
            &options,
            1,
        );
        assert!(barely.is_intersecting);
        assert!(!barely.is_visible);

        let enough = IntersectionEntry::compute(
            Rect::new(0.0, 1000.0, 1280.0, 400.0),
            &viewport,
            &options,
            1,
        );
        assert!(enough.is_visible);
    }

    #[test]
    fn invalid_threshold_is_rejected() {
        let options = ObserverOptions {
            threshold: 1.5,
            ..ObserverOptions::default()
        };
        assert!(options.validate().is_err());
        let nan = ObserverOptions {
            threshold: f32::NAN,
            ..ObserverOptions::default()
        };
        assert!(nan.validate().is_err());
    }
}
