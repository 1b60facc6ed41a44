// velox-core/src/signal.rs

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

type EffectFn = Rc<RefCell<Box<dyn FnMut()>>>;

// Holds the currently running/collecting effect during dependency tracking.
thread_local! {
    static CURRENT_EFFECT: RefCell<Option<EffectFn>> = RefCell::new(None);

    // Simple microtask-style scheduler queue and guards.
    static EFFECT_QUEUE: RefCell<Vec<EffectFn>> = RefCell::new(Vec::new());
    static QUEUED: RefCell<HashSet<usize>> = RefCell::new(HashSet::new());
    static IS_FLUSHING: Cell<bool> = Cell::new(false);
}

fn ptr_id(rc: &EffectFn) -> usize {
    rc.as_ptr() as usize
}

fn enqueue_effect(eff: EffectFn) {
    EFFECT_QUEUE.with(|q| {
        QUEUED.with(|set| {
            let id = ptr_id(&eff);
            let mut set_b = set.borrow_mut();
            if set_b.insert(id) {
                q.borrow_mut().push(eff);
            }
        });
    });
}

/// Run `eff` as the current effect, restoring whichever effect was collecting
/// before. Nested renders therefore register against their own effect only.
fn run_effect(eff: &EffectFn) {
    // Extract the closure out of the RefCell so we don't hold a mutable borrow
    // while executing it (the body may call set() and re-enqueue itself).
    let mut func: Box<dyn FnMut()> = {
        let mut b = eff.borrow_mut();
        std::mem::replace(&mut *b, Box::new(|| {}))
    };

    let prev = CURRENT_EFFECT.with(|cur| cur.borrow_mut().replace(eff.clone()));
    func();
    CURRENT_EFFECT.with(|cur| *cur.borrow_mut() = prev);

    // Put the function back into the effect cell.
    let mut b = eff.borrow_mut();
    *b = func;
}

fn flush_queue() {
    // Prevent re-entrant flush; effects scheduled during a flush will be queued
    // and processed by this outer flush.
    if IS_FLUSHING.with(|f| f.replace(true)) {
        return;
    }

    loop {
        let next = EFFECT_QUEUE.with(|q| q.borrow_mut().pop());
        let Some(eff) = next else { break };

        // Mark as not queued before running, so re-enqueues are allowed.
        QUEUED.with(|set| {
            set.borrow_mut().remove(&ptr_id(&eff));
        });

        run_effect(&eff);
    }

    IS_FLUSHING.with(|f| f.set(false));
}

/// The subscriber list behind every observed value.
#[derive(Default)]
pub struct Dep {
    subscribers: RefCell<Vec<EffectFn>>,
}

impl Dep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the running effect (if any) as a subscriber.
    pub fn depend(&self) {
        CURRENT_EFFECT.with(|current| {
            if let Some(effect_rc) = current.borrow().as_ref() {
                let mut subs = self.subscribers.borrow_mut();
                if !subs.iter().any(|e| Rc::ptr_eq(e, effect_rc)) {
                    subs.push(effect_rc.clone());
                }
            }
        });
    }

    /// Schedule every subscriber and flush the queue.
    pub fn notify(&self) {
        // Snapshot subscribers before enqueuing.
        let subscribers = self.subscribers.borrow().clone();
        for subscriber in subscribers {
            enqueue_effect(subscriber);
        }
        flush_queue();
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

impl std::fmt::Debug for Dep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dep")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Register a closure as a reactive effect:
/// - runs immediately to collect dependencies,
/// - then re-runs whenever any observed value it reads changes.
pub fn effect<F>(f: F)
where
    F: FnMut() + 'static,
{
    let eff: EffectFn = Rc::new(RefCell::new(Box::new(f) as Box<dyn FnMut()>));
    run_effect(&eff);
}
