//! Composite behaviors: child-selection policies.
//!
//! | Policy            | On start                          | When the running child stops          |
//! |-------------------|-----------------------------------|---------------------------------------|
//! | `FirstApplicable` | first child (list order) to start | composite stops                       |
//! | `OneRandom`       | weighted shuffle, then as above   | composite stops                       |
//! | `Sequential`      | child after the last one started  | next child starts in the same tick    |
//! | `AllApplicable`   | every child that can start        | composite stops once none are running |
//! | `Repeatable`      | the single child                  | same child again, up to `times` runs  |
//!
//! A composite is running exactly as long as at least one of its children is.
//!
//! # Same-tick successors
//!
//! For `Sequential` and `Repeatable`, a successor started because its
//! predecessor stopped is updated in that same tick.  A composite performs at
//! most `children + 1` child updates per tick; a successor started past that
//! budget waits for the next tick.

use br_world::Host;

use crate::{Behavior, TaskCtx, WeightedList};

type ResetPredicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// How a composite picks among its children.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Policy {
    FirstApplicable,
    OneRandom,
    Sequential,
    AllApplicable,
    Repeatable { times: u32 },
}

/// Children plus the selection state of one policy.
pub struct Composite<H: Host> {
    policy:   Policy,
    children: WeightedList<Behavior<H>>,
    /// Index of the running child (all policies but `AllApplicable`).
    running:  Option<usize>,
    /// `Sequential`: where the next selection starts looking.
    next:     usize,
    /// `Repeatable`: runs started in the current activation.
    repeats:  u32,
    reset_if: Option<ResetPredicate>,
}

impl<H: Host> Composite<H> {
    pub(crate) fn new(name: &str, policy: Policy, children: WeightedList<Behavior<H>>) -> Self {
        assert!(!children.is_empty(), "composite behavior {name:?} has no children");
        if let Policy::Repeatable { times } = policy {
            assert!(
                children.len() == 1,
                "repeatable behavior {name:?} needs exactly one child, got {}",
                children.len()
            );
            assert!(times > 0, "repeatable behavior {name:?} must repeat at least once");
        }
        Self { policy, children, running: None, next: 0, repeats: 0, reset_if: None }
    }

    pub(crate) fn set_reset(&mut self, f: ResetPredicate) {
        self.reset_if = Some(f);
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn children(&self) -> &WeightedList<Behavior<H>> {
        &self.children
    }

    /// The tracked running child, for single-child policies.
    pub fn running_child(&self) -> Option<&Behavior<H>> {
        self.children.get(self.running?)
    }

    /// Runs started in the current `Repeatable` activation.
    pub fn repeats(&self) -> u32 {
        self.repeats
    }

    pub fn any_running(&self) -> bool {
        self.children.iter().any(Behavior::is_running)
    }

    // ── Hooks driven by the owning `Behavior` ─────────────────────────────

    /// Start child(ren) per policy.  `true` if anything started.
    pub(crate) fn select(&mut self, ctx: &mut TaskCtx<'_, H>) -> bool {
        match self.policy {
            Policy::FirstApplicable => self.start_first(ctx),
            Policy::OneRandom => {
                self.children.shuffle(ctx.rng);
                self.start_first(ctx)
            }
            Policy::Sequential => self.start_next(ctx),
            Policy::AllApplicable => {
                let mut any = false;
                for child in self.children.iter_mut() {
                    if !child.is_running() && child.try_start(ctx) {
                        any = true;
                    }
                }
                any
            }
            Policy::Repeatable { .. } => {
                self.repeats = 0;
                self.start_again(ctx)
            }
        }
    }

    pub(crate) fn tick(&mut self, ctx: &mut TaskCtx<'_, H>) {
        if self.policy == Policy::AllApplicable {
            for child in self.children.iter_mut() {
                if child.is_running() {
                    child.update(ctx);
                }
            }
            return;
        }

        let mut budget = self.children.len() + 1;
        while let Some(i) = self.running {
            if budget == 0 {
                return;
            }
            budget -= 1;
            let Some(child) = self.children.get_mut(i) else {
                self.running = None;
                return;
            };
            child.update(ctx);
            if child.is_running() {
                return;
            }
            let finished = child.name();
            self.running = None;
            if !self.start_successor(finished, ctx) {
                return;
            }
        }
    }

    pub(crate) fn stop_children(&mut self, ctx: &mut TaskCtx<'_, H>) {
        for child in self.children.iter_mut() {
            if child.is_running() {
                child.stop(ctx);
            }
        }
        self.running = None;
        self.repeats = 0;
    }

    // ── Selection helpers ─────────────────────────────────────────────────

    fn start_first(&mut self, ctx: &mut TaskCtx<'_, H>) -> bool {
        for (i, child) in self.children.iter_mut().enumerate() {
            if child.try_start(ctx) {
                self.running = Some(i);
                return true;
            }
        }
        false
    }

    /// Try each child once, starting at `next` and wrapping.
    fn start_next(&mut self, ctx: &mut TaskCtx<'_, H>) -> bool {
        let n = self.children.len();
        for k in 0..n {
            let i = (self.next + k) % n;
            let started = self.children.get_mut(i).is_some_and(|c| c.try_start(ctx));
            if started {
                self.running = Some(i);
                self.next = (i + 1) % n;
                return true;
            }
        }
        false
    }

    fn start_again(&mut self, ctx: &mut TaskCtx<'_, H>) -> bool {
        let started = self.children.get_mut(0).is_some_and(|c| c.try_start(ctx));
        if started {
            self.repeats += 1;
            self.running = Some(0);
        }
        started
    }

    fn start_successor(&mut self, finished: &str, ctx: &mut TaskCtx<'_, H>) -> bool {
        match self.policy {
            Policy::Sequential => {
                if self.reset_if.as_ref().is_some_and(|f| f(finished)) {
                    self.next = 0;
                }
                self.start_next(ctx)
            }
            Policy::Repeatable { times } if self.repeats < times => self.start_again(ctx),
            _ => false,
        }
    }
}
