//! `Behavior` — the state machine every node runs.

use std::fmt;

use br_core::{Span, Tick};
use br_memory::{MemoryId, MemoryRequirement};
use br_world::Host;

use crate::{Composite, Policy, Task, TaskCtx, WeightedList};

/// Leaf duration when none is configured.
pub const DEFAULT_DURATION: u64 = 60;

type StartPredicate<H> = Box<dyn Fn(&TaskCtx<'_, H>) -> bool + Send + Sync>;

// ── Status / kind ─────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum Status {
    #[default]
    Stopped,
    Running,
}

/// What a node does once running: one task, or a policy over children.
pub enum BehaviorKind<H: Host> {
    Leaf(Box<dyn Task<H>>),
    Composite(Composite<H>),
}

// ── Behavior ──────────────────────────────────────────────────────────────────

/// One node of a behavior tree.
///
/// Construct with [`leaf`](Self::leaf), [`composite`](Self::composite),
/// [`weighted`](Self::weighted) or [`repeat`](Self::repeat), then chain the
/// gating and timing builders:
///
/// ```rust,ignore
/// let attack = Behavior::leaf("attack", Attack)
///     .requires(MemoryRequirement::present(ATTACK_TARGET))
///     .duration(Span::between(40, 80))
///     .cooldown(20);
/// ```
///
/// # Timing
///
/// A node started at tick `T` samples its duration `N` and is updated (tick
/// hook and all) on ticks `T..T+N`.  The update at `T+N` stops it without
/// ticking, unless the task asks to run past its timeout.  Stopping sets the
/// cooldown: the node cannot start again before `now + cooldown`.
pub struct Behavior<H: Host> {
    name:              &'static str,
    kind:              BehaviorKind<H>,
    status:            Status,
    requirements:      Vec<MemoryRequirement>,
    start_if:          Option<StartPredicate<H>>,
    duration:          Span<H::Agent>,
    cooldown:          Span<H::Agent>,
    cooldown_ready_at: Tick,
    started_at:        Tick,
    horizon:           u64,
}

impl<H: Host> Behavior<H> {
    fn with_kind(name: &'static str, kind: BehaviorKind<H>, duration: Span<H::Agent>) -> Self {
        Self {
            name,
            kind,
            status: Status::Stopped,
            requirements: Vec::new(),
            start_if: None,
            duration,
            cooldown: Span::Fixed(0),
            cooldown_ready_at: Tick::ZERO,
            started_at: Tick::ZERO,
            horizon: 0,
        }
    }

    /// A leaf node running `task`, with [`DEFAULT_DURATION`] and no cooldown.
    pub fn leaf(name: &'static str, task: impl Task<H> + 'static) -> Self {
        Self::with_kind(name, BehaviorKind::Leaf(Box::new(task)), Span::Fixed(DEFAULT_DURATION))
    }

    /// A composite over equally weighted children.  Composites have no
    /// timeout of their own unless one is configured.
    ///
    /// # Panics
    ///
    /// Panics if `children` is empty, or if a [`Policy::Repeatable`]
    /// composite does not have exactly one child.
    pub fn composite(
        name:     &'static str,
        policy:   Policy,
        children: impl IntoIterator<Item = Behavior<H>>,
    ) -> Self {
        Self::weighted(name, policy, children.into_iter().map(|c| (c, 1)))
    }

    /// A composite over weighted children (weights matter for
    /// [`Policy::OneRandom`]).
    pub fn weighted(
        name:     &'static str,
        policy:   Policy,
        children: impl IntoIterator<Item = (Behavior<H>, u32)>,
    ) -> Self {
        let children: WeightedList<Behavior<H>> = children.into_iter().collect();
        let composite = Composite::new(name, policy, children);
        Self::with_kind(name, BehaviorKind::Composite(composite), Span::Unbounded)
    }

    /// Run `child` up to `times` times back to back.
    pub fn repeat(name: &'static str, times: u32, child: Behavior<H>) -> Self {
        Self::composite(name, Policy::Repeatable { times }, [child])
    }

    // ── Builders ──────────────────────────────────────────────────────────

    /// Add a memory precondition.
    pub fn requires(mut self, requirement: MemoryRequirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    pub fn requires_all(mut self, requirements: impl IntoIterator<Item = MemoryRequirement>) -> Self {
        self.requirements.extend(requirements);
        self
    }

    /// Custom start predicate, checked after cooldown and requirements.
    pub fn start_if<F>(mut self, f: F) -> Self
    where
        F: Fn(&TaskCtx<'_, H>) -> bool + Send + Sync + 'static,
    {
        self.start_if = Some(Box::new(f));
        self
    }

    pub fn duration(mut self, span: impl Into<Span<H::Agent>>) -> Self {
        self.duration = span.into();
        self
    }

    pub fn cooldown(mut self, span: impl Into<Span<H::Agent>>) -> Self {
        self.cooldown = span.into();
        self
    }

    /// For [`Policy::Sequential`] composites: after a child named `n` stops,
    /// restart the sequence from the first child if `f(n)` holds.
    ///
    /// # Panics
    ///
    /// Panics on anything but a sequential composite.
    pub fn reset_when<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        match &mut self.kind {
            BehaviorKind::Composite(c) if c.policy() == Policy::Sequential => c.set_reset(Box::new(f)),
            _ => panic!("reset_when on behavior {:?}, which is not a sequential composite", self.name),
        }
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn status(&self) -> Status {
        self.status
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    pub fn requirements(&self) -> &[MemoryRequirement] {
        &self.requirements
    }

    pub fn kind(&self) -> &BehaviorKind<H> {
        &self.kind
    }

    pub fn composite_ref(&self) -> Option<&Composite<H>> {
        match &self.kind {
            BehaviorKind::Composite(c) => Some(c),
            BehaviorKind::Leaf(_) => None,
        }
    }

    pub fn cooldown_ready_at(&self) -> Tick {
        self.cooldown_ready_at
    }

    pub fn started_at(&self) -> Tick {
        self.started_at
    }

    /// Tick at which the current run times out; `None` while stopped or for
    /// unbounded runs.
    pub fn timeout_at(&self) -> Option<Tick> {
        if !self.is_running() || self.horizon == u64::MAX {
            return None;
        }
        Some(self.started_at.offset(self.horizon))
    }

    // ── State machine ─────────────────────────────────────────────────────

    /// Cooldown, memory requirements and the custom start predicate.
    ///
    /// Does not run the task's own extra start check, which may have side
    /// effects.
    pub fn can_start(&self, ctx: &TaskCtx<'_, H>) -> bool {
        ctx.tick >= self.cooldown_ready_at
            && ctx.memory.satisfies(&self.requirements)
            && self.start_if.as_ref().is_none_or(|f| f(ctx))
    }

    /// Attempt `Stopped -> Running`.  Returns `true` if the node started.
    pub fn try_start(&mut self, ctx: &mut TaskCtx<'_, H>) -> bool {
        debug_assert!(!self.is_running(), "try_start on running behavior {:?}", self.name);
        if self.is_running() || !self.can_start(ctx) {
            return false;
        }
        let extra = match &mut self.kind {
            BehaviorKind::Leaf(task) => task.check_extra_start(ctx),
            BehaviorKind::Composite(c) => c.select(ctx),
        };
        if !extra {
            return false;
        }

        self.status = Status::Running;
        self.started_at = ctx.tick;
        self.horizon = self.duration.sample(ctx.agent, ctx.rng);
        if let BehaviorKind::Leaf(task) = &mut self.kind {
            task.start(ctx);
        }
        tracing::debug!(behavior = self.name, tick = %ctx.tick, horizon = self.horizon, "behavior started");
        true
    }

    /// One update of a running node: timeout check, tick hook, keep-running
    /// check.
    pub fn update(&mut self, ctx: &mut TaskCtx<'_, H>) {
        debug_assert!(self.is_running(), "update on stopped behavior {:?}", self.name);
        if !self.is_running() {
            return;
        }

        if self.timed_out(ctx.tick) {
            let extend = match &mut self.kind {
                BehaviorKind::Leaf(task) => task.extend_past_timeout(ctx),
                BehaviorKind::Composite(_) => false,
            };
            if !extend {
                self.stop(ctx);
                return;
            }
        }

        let keep = match &mut self.kind {
            BehaviorKind::Leaf(task) => {
                task.tick(ctx);
                task.should_keep_running(ctx)
            }
            BehaviorKind::Composite(c) => {
                c.tick(ctx);
                c.any_running()
            }
        };
        if !keep {
            self.stop(ctx);
        }
    }

    /// `Running -> Stopped`: stop hook (composites stop their running
    /// children), then cooldown.
    pub fn stop(&mut self, ctx: &mut TaskCtx<'_, H>) {
        debug_assert!(self.is_running(), "stop on stopped behavior {:?}", self.name);
        if !self.is_running() {
            return;
        }
        match &mut self.kind {
            BehaviorKind::Leaf(task) => task.stop(ctx),
            BehaviorKind::Composite(c) => c.stop_children(ctx),
        }
        self.cooldown_ready_at = ctx.tick.offset(self.cooldown.sample(ctx.agent, ctx.rng));
        self.status = Status::Stopped;
        tracing::debug!(
            behavior = self.name,
            tick = %ctx.tick,
            ran = ctx.tick.since(self.started_at),
            "behavior stopped"
        );
    }

    #[inline]
    fn timed_out(&self, now: Tick) -> bool {
        now.since(self.started_at) >= self.horizon
    }

    // ── Introspection ─────────────────────────────────────────────────────

    /// Depth-first pre-order walk over this node and all descendants.
    /// `depth` is 0 for `self`.
    pub fn visit<F: FnMut(&Behavior<H>, usize)>(&self, f: &mut F) {
        self.visit_at(0, f);
    }

    fn visit_at<F: FnMut(&Behavior<H>, usize)>(&self, depth: usize, f: &mut F) {
        f(self, depth);
        if let BehaviorKind::Composite(c) = &self.kind {
            for child in c.children().iter() {
                child.visit_at(depth + 1, f);
            }
        }
    }

    /// `/`-joined paths of every running leaf, e.g. `"patrol/walk"`.
    pub fn running_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_running("", &mut out);
        out
    }

    fn collect_running(&self, prefix: &str, out: &mut Vec<String>) {
        if !self.is_running() {
            return;
        }
        let path = if prefix.is_empty() {
            self.name.to_owned()
        } else {
            format!("{prefix}/{}", self.name)
        };
        match &self.kind {
            BehaviorKind::Leaf(_) => out.push(path),
            BehaviorKind::Composite(c) => {
                for child in c.children().iter() {
                    child.collect_running(&path, out);
                }
            }
        }
    }

    /// Every memory slot named by a requirement anywhere in this subtree.
    pub fn memory_ids(&self) -> Vec<MemoryId> {
        let mut ids = Vec::new();
        self.visit(&mut |node, _| ids.extend(node.requirements.iter().map(|r| r.id)));
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

impl<H: Host> fmt::Debug for Behavior<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Behavior");
        s.field("name", &self.name).field("status", &self.status);
        match &self.kind {
            BehaviorKind::Leaf(_) => s.field("kind", &"leaf"),
            BehaviorKind::Composite(c) => s
                .field("policy", &c.policy())
                .field("children", &c.children().len()),
        };
        s.field("requirements", &self.requirements)
            .field("duration", &self.duration)
            .field("cooldown_ready_at", &self.cooldown_ready_at)
            .finish()
    }
}
