use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

/// How a dialog ended. Cancellation is an expected outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogOutcome<T> {
    Ok(T),
    Cancelled,
}

impl<T> DialogOutcome<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DialogOutcome::Cancelled)
    }

    pub fn ok(self) -> Option<T> {
        match self {
            DialogOutcome::Ok(value) => Some(value),
            DialogOutcome::Cancelled => None,
        }
    }
}

type Listener<T> = Box<dyn FnOnce(&DialogOutcome<T>)>;

struct Slot<T> {
    outcome: Option<DialogOutcome<T>>,
    settled: bool,
    waker: Option<Waker>,
    listeners: Vec<Listener<T>>,
}

/// Eventual outcome of one `show_dialog` call.
///
/// It can be awaited, polled with [`DialogResult::try_take`], or observed with
/// [`DialogResult::on_settled`]. A dialog that is abandoned while open never
/// settles.
pub struct DialogResult<T> {
    slot: Rc<RefCell<Slot<T>>>,
}

/// The settling side. Consumed by [`Settler::settle`], so an outcome can only
/// be delivered once.
pub(crate) struct Settler<T> {
    slot: Rc<RefCell<Slot<T>>>,
}

pub(crate) fn pending<T>() -> (DialogResult<T>, Settler<T>) {
    let slot = Rc::new(RefCell::new(Slot {
        outcome: None,
        settled: false,
        waker: None,
        listeners: Vec::new(),
    }));
    (
        DialogResult { slot: slot.clone() },
        Settler { slot },
    )
}

impl<T> Settler<T> {
    pub(crate) fn settle(self, outcome: DialogOutcome<T>) {
        let (listeners, waker) = {
            let mut slot = self.slot.borrow_mut();
            slot.settled = true;
            (std::mem::take(&mut slot.listeners), slot.waker.take())
        };
        for listener in listeners {
            listener(&outcome);
        }
        self.slot.borrow_mut().outcome = Some(outcome);
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

impl<T> DialogResult<T> {
    pub fn is_settled(&self) -> bool {
        self.slot.borrow().settled
    }

    /// Take the outcome if the dialog has closed. Returns `None` before that,
    /// and after the outcome has been taken once.
    pub fn try_take(&self) -> Option<DialogOutcome<T>> {
        self.slot.borrow_mut().outcome.take()
    }

    /// Run `f` once the dialog closes, or right away if it already has and
    /// the outcome was not taken yet.
    pub fn on_settled(&self, f: impl FnOnce(&DialogOutcome<T>) + 'static) {
        let mut slot = self.slot.borrow_mut();
        if !slot.settled {
            slot.listeners.push(Box::new(f));
            return;
        }
        let outcome = slot.outcome.take();
        drop(slot);
        if let Some(outcome) = outcome {
            f(&outcome);
            self.slot.borrow_mut().outcome = Some(outcome);
        }
    }
}

impl<T> Future for DialogResult<T> {
    type Output = DialogOutcome<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut slot = self.slot.borrow_mut();
        match slot.outcome.take() {
            Some(outcome) => Poll::Ready(outcome),
            None => {
                slot.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::task::Wake;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct Flag(AtomicBool);

    impl Wake for Flag {
        fn wake(self: Arc<Self>) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[test]
    fn listeners_see_outcome_once() {
        let (result, settler) = pending::<u32>();
        let seen = Rc::new(Cell::new(0));
        let s = seen.clone();
        result.on_settled(move |o| {
            assert_eq!(o, &DialogOutcome::Ok(7));
            s.set(s.get() + 1);
        });
        assert!(!result.is_settled());
        settler.settle(DialogOutcome::Ok(7));
        assert_eq!(seen.get(), 1);
        assert_eq!(result.try_take(), Some(DialogOutcome::Ok(7)));
        assert_eq!(result.try_take(), None);
    }

    #[test]
    fn future_wakes_on_settle() {
        let (mut result, settler) = pending::<()>();
        let flag = Arc::new(Flag(AtomicBool::new(false)));
        let waker = Waker::from(flag.clone());
        let mut cx = Context::from_waker(&waker);
        assert!(Pin::new(&mut result).poll(&mut cx).is_pending());
        settler.settle(DialogOutcome::Cancelled);
        assert!(flag.0.load(Ordering::SeqCst));
        assert_eq!(
            Pin::new(&mut result).poll(&mut cx),
            Poll::Ready(DialogOutcome::Cancelled)
        );
    }
}
