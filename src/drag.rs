//! Exclusive pointer drag gestures.
//!
//! A [`DragSession`] claims the document's pointer capture for one gesture.
//! Moves are reported relative to the press position; the release ends the
//! gesture. Capture is released in exactly one place
//! (`Dom::release_pointer_capture`), whichever way the session ends: pointer
//! release, [`DragSession::cancel`], or dropping the session.

use crate::dom::{CaptureId, Dom, Event};
use crate::error::DragError;

/// Pointer displacement since the press that began the drag.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragMotion {
    pub dx: f64,
    pub dy: f64,
}

pub struct DragSession {
    dom: Dom,
    id: CaptureId,
}

impl std::fmt::Debug for DragSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragSession").field("id", &self.id).finish()
    }
}

impl DragSession {
    /// Start a drag from the pointer press `press`.
    ///
    /// Fails with [`DragError::CaptureActive`] while another session holds
    /// the capture.
    pub fn begin(
        dom: &Dom,
        press: &Event,
        mut on_move: impl FnMut(&Dom, DragMotion) + 'static,
        on_end: impl FnOnce(&Dom, DragMotion) + 'static,
    ) -> Result<Self, DragError> {
        let (x0, y0) = (press.client_x(), press.client_y());
        let motion = move |ev: &Event| DragMotion {
            dx: ev.client_x() - x0,
            dy: ev.client_y() - y0,
        };
        let id = dom
            .set_pointer_capture(
                move |dom, ev| on_move(dom, motion(ev)),
                move |dom, ev| on_end(dom, motion(ev)),
            )
            .inspect_err(|e| tracing::warn!(error = %e, "drag refused"))?;
        tracing::debug!(?id, x = x0, y = y0, "drag started");
        Ok(Self {
            dom: dom.clone(),
            id,
        })
    }

    /// Whether this session still holds the pointer capture.
    pub fn is_active(&self) -> bool {
        self.dom.active_capture() == Some(self.id)
    }

    /// Abandon the gesture without running its end callback.
    pub fn cancel(self) {
        tracing::debug!(id = ?self.id, "drag cancelled");
        drop(self);
    }
}

impl Drop for DragSession {
    fn drop(&mut self) {
        // A session that already ended finds nothing to release.
        drop(self.dom.release_pointer_capture(self.id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn press(y: f64) -> Event {
        Event::pointer("mousedown", 0.0, y)
    }

    #[test]
    fn reports_motion_relative_to_press() {
        let dom = Dom::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let ended = Rc::new(RefCell::new(None));
        let (s, e) = (seen.clone(), ended.clone());
        let session = DragSession::begin(
            &dom,
            &press(10.0),
            move |_, m| s.borrow_mut().push(m.dy),
            move |_, m| *e.borrow_mut() = Some(m.dy),
        )
        .unwrap();
        dom.pointer_move(None, 0.0, 12.0);
        dom.pointer_move(None, 0.0, 7.0);
        dom.pointer_up(None, 0.0, 6.0);
        assert_eq!(*seen.borrow(), vec![2.0, -3.0]);
        assert_eq!(*ended.borrow(), Some(-4.0));
        assert!(!session.is_active());
    }

    #[test]
    fn second_session_is_refused_until_first_ends() {
        let dom = Dom::new();
        let first = DragSession::begin(&dom, &press(0.0), |_, _| {}, |_, _| {}).unwrap();
        let second = DragSession::begin(&dom, &press(0.0), |_, _| {}, |_, _| {});
        assert_eq!(second.unwrap_err(), DragError::CaptureActive);
        first.cancel();
        assert!(dom.active_capture().is_none());
        assert!(DragSession::begin(&dom, &press(0.0), |_, _| {}, |_, _| {}).is_ok());
    }

    #[test]
    fn dropping_session_releases_capture_without_ending() {
        let dom = Dom::new();
        let ended = Rc::new(RefCell::new(false));
        let e = ended.clone();
        {
            let _session =
                DragSession::begin(&dom, &press(0.0), |_, _| {}, move |_, _| *e.borrow_mut() = true)
                    .unwrap();
            assert!(dom.active_capture().is_some());
        }
        assert!(dom.active_capture().is_none());
        dom.pointer_up(None, 0.0, 0.0);
        assert!(!*ended.borrow());
    }
}
