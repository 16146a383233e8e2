//! `FairSharedQueue` — round-robin scheduler for many searches sharing one
//! expansion loop.
//!
//! # Model
//!
//! Every registered agent owns a small state machine (its [`SearchAgent`])
//! and a completion slot.  The queue holds `(agent, frontier state)` entries
//! in one FIFO shared by all agents:
//!
//! ```text
//! register(A, a0); register(B, b0)      queue: [A:a0, B:b0]
//! execute():
//!   pop A:a0 → A.step enqueues a1, a2   queue: [B:b0, A:a1, A:a2]
//!   pop B:b0 → B.step enqueues b1       queue: [A:a1, A:a2, B:b1]
//!   ...                                 until the queue is empty
//!   every agent still pending → NotFound (exactly once)
//! ```
//!
//! Because expansion entries are appended to the shared tail, all of an
//! agent's depth-`k` entries are processed before any agent's depth-`k + 1`
//! entries derived after them; no agent can run ahead by several rounds.
//! When two agents reach a contested cell at the same depth, the one
//! registered earlier is stepped first and its side effects on the shared
//! context `X` (e.g. a reservation set) are visible to the later one.
//!
//! # Threading
//!
//! A drain is single-threaded and cooperative.  The shared context is
//! handed to each step as `&mut X`; nothing else can observe it during
//! `execute`, so no synchronisation is needed.

use std::collections::VecDeque;

/// Index of a registered agent.  Valid only for the queue that issued it.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct AgentHandle(usize);

impl AgentHandle {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

// ── SearchAgent ───────────────────────────────────────────────────────────────

/// One logical search participant.
///
/// `S` is the frontier state, `R` the result type, `X` the tick-scoped
/// shared context every agent can read and mutate during its step.
pub trait SearchAgent<S, R, X: ?Sized> {
    /// Process one dequeued frontier entry.  May call
    /// [`SharedQueueScope::finish`] and/or [`SharedQueueScope::enqueue`] any
    /// number of times.
    fn step(&mut self, scope: &mut SharedQueueScope<'_, S, R>, shared: &mut X, state: S);
}

impl<S, R, X: ?Sized, F> SearchAgent<S, R, X> for F
where
    F: FnMut(&mut SharedQueueScope<'_, S, R>, &mut X, S),
{
    fn step(&mut self, scope: &mut SharedQueueScope<'_, S, R>, shared: &mut X, state: S) {
        self(scope, shared, state)
    }
}

// ── Scope ─────────────────────────────────────────────────────────────────────

#[derive(Debug)]
enum Completion<R> {
    Pending,
    Finished(R),
    NotFound,
    Taken,
}

struct Entry<S> {
    agent: AgentHandle,
    state: S,
}

/// The handle a step function uses to finish its agent or extend its frontier.
pub struct SharedQueueScope<'q, S, R> {
    agent:      AgentHandle,
    queue:      &'q mut VecDeque<Entry<S>>,
    completion: &'q mut Completion<R>,
}

impl<S, R> SharedQueueScope<'_, S, R> {
    /// Complete this agent with `result`.  Only the first call counts; the
    /// agent's remaining queue entries are skipped.
    pub fn finish(&mut self, result: R) {
        if matches!(self.completion, Completion::Pending) {
            *self.completion = Completion::Finished(result);
        }
    }

    /// Append a frontier entry for this agent to the shared tail.
    pub fn enqueue(&mut self, state: S) {
        self.queue.push_back(Entry { agent: self.agent, state });
    }

    pub fn is_finished(&self) -> bool {
        !matches!(self.completion, Completion::Pending)
    }

    pub fn agent(&self) -> AgentHandle {
        self.agent
    }
}

// ── FairSharedQueue ───────────────────────────────────────────────────────────

struct AgentSlot<'a, S, R, X: ?Sized> {
    /// Dropped once the drain that completed the agent ends.
    step:       Option<Box<dyn SearchAgent<S, R, X> + 'a>>,
    completion: Completion<R>,
}

/// Fair FIFO multiplexer of search agents.  See the module docs.
pub struct FairSharedQueue<'a, S, R, X: ?Sized = ()> {
    queue:  VecDeque<Entry<S>>,
    agents: Vec<AgentSlot<'a, S, R, X>>,
}

impl<S, R, X: ?Sized> Default for FairSharedQueue<'_, S, R, X> {
    fn default() -> Self {
        Self {
            queue:  VecDeque::new(),
            agents: Vec::new(),
        }
    }
}

impl<'a, S, R, X: ?Sized> FairSharedQueue<'a, S, R, X> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent and enqueue its initial state at the shared tail.
    pub fn register<A>(&mut self, initial: S, agent: A) -> AgentHandle
    where
        A: SearchAgent<S, R, X> + 'a,
    {
        let handle = AgentHandle(self.agents.len());
        self.agents.push(AgentSlot {
            step:       Some(Box::new(agent)),
            completion: Completion::Pending,
        });
        self.queue.push_back(Entry { agent: handle, state: initial });
        handle
    }

    /// [`register`][Self::register] for a plain closure.
    pub fn register_fn<F>(&mut self, initial: S, step: F) -> AgentHandle
    where
        F: FnMut(&mut SharedQueueScope<'_, S, R>, &mut X, S) + 'a,
    {
        self.register(initial, step)
    }

    /// Drain the shared queue, stepping each entry's agent in FIFO order,
    /// then force-complete every still-pending agent with "not found".
    ///
    /// Returns the number of steps taken.
    pub fn execute(&mut self, shared: &mut X) -> usize {
        let mut steps = 0;
        while let Some(Entry { agent, state }) = self.queue.pop_front() {
            let slot = &mut self.agents[agent.0];
            if !matches!(slot.completion, Completion::Pending) {
                continue;
            }
            let Some(step) = slot.step.as_mut() else {
                continue;
            };
            let mut scope = SharedQueueScope {
                agent,
                queue:      &mut self.queue,
                completion: &mut slot.completion,
            };
            step.step(&mut scope, shared, state);
            steps += 1;
        }

        for slot in &mut self.agents {
            if matches!(slot.completion, Completion::Pending) {
                slot.completion = Completion::NotFound;
            }
            slot.step = None;
        }
        steps
    }

    /// `true` once `agent` has finished or been force-completed.
    pub fn is_complete(&self, agent: AgentHandle) -> bool {
        !matches!(self.agents[agent.0].completion, Completion::Pending)
    }

    /// Take the result of a completed agent.  `None` means "not found", or
    /// that the agent is still pending, or its result was already taken.
    pub fn take(&mut self, agent: AgentHandle) -> Option<R> {
        let slot = &mut self.agents[agent.0];
        match std::mem::replace(&mut slot.completion, Completion::Taken) {
            Completion::Finished(result) => Some(result),
            Completion::Pending => {
                slot.completion = Completion::Pending;
                None
            }
            Completion::NotFound | Completion::Taken => None,
        }
    }

    /// Number of registered agents.
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Entries currently waiting in the shared queue.
    pub fn pending_entries(&self) -> usize {
        self.queue.len()
    }
}
