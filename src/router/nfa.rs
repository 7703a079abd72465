//! Character-level NFA shared by every registered route.
//!
//! States live in a flat arena and are addressed by [`StateId`]; transitions
//! are lists of indices into the same arena. Routes that share a literal
//! prefix share the states for that prefix, because [`Nfa::put`] reuses any
//! outgoing transition with a structurally equal [`CharSpec`].
//!
//! The graph is append-only: `put`, `link` and `accept` are only called while
//! routes are registered, and matching only reads it.

use regex::Regex;
use smallvec::SmallVec;
use std::sync::Arc;

use super::route::HandlerEntry;
use super::segment::{CharSpec, SegmentTypes};

/// Index of a state in the arena
pub type StateId = usize;

/// The automaton root; every path walk starts here
pub const ROOT: StateId = 0;

/// Data attached to a state once a route terminates on it
#[derive(Debug, Clone)]
pub struct Acceptance {
    /// Handlers in registration order
    pub handlers: Arc<[HandlerEntry]>,
    /// Anchored capture pattern covering the whole route
    pub regex: Arc<Regex>,
    /// Textual form of `regex`, kept for the trailing-slash check
    pub pattern: Arc<str>,
    pub types: SegmentTypes,
}

#[derive(Debug, Clone)]
pub struct State {
    /// The transition leading into this state
    pub spec: CharSpec,
    /// Outgoing transitions, in insertion order
    pub next: SmallVec<[StateId; 4]>,
    pub accept: Option<Acceptance>,
}

/// Arena of automaton states
#[derive(Debug, Clone)]
pub struct Nfa {
    states: Vec<State>,
}

/// Active state set for one simulation step (deduplicated, insertion ordered)
pub type ActiveSet = SmallVec<[StateId; 8]>;

impl Default for Nfa {
    fn default() -> Self {
        Self::new()
    }
}

impl Nfa {
    pub fn new() -> Self {
        Self {
            // The root is never the target of a transition, so its spec is never compared.
            states: vec![State {
                spec: CharSpec::valid(""),
                next: SmallVec::new(),
                accept: None,
            }],
        }
    }

    #[inline]
    #[must_use]
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id]
    }

    /// Number of states, the root included
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Existing outgoing transition of `from` whose spec equals `spec`
    fn find(&self, from: StateId, spec: &CharSpec) -> Option<StateId> {
        self.states[from]
            .next
            .iter()
            .copied()
            .find(|&child| self.states[child].spec == *spec)
    }

    /// Follow (or create) the transition from `from` labeled `spec`
    ///
    /// A newly created state for a repeating spec loops back onto itself.
    pub fn put(&mut self, from: StateId, spec: CharSpec) -> StateId {
        if let Some(existing) = self.find(from, &spec) {
            return existing;
        }
        let id = self.states.len();
        let repeat = spec.repeat;
        self.states.push(State {
            spec,
            next: SmallVec::new(),
            accept: None,
        });
        self.states[from].next.push(id);
        if repeat {
            self.states[id].next.push(id);
        }
        id
    }

    /// Add a plain transition `from -> to` (used for skipping optional segments)
    pub fn link(&mut self, from: StateId, to: StateId) {
        let next = &mut self.states[from].next;
        if !next.contains(&to) {
            next.push(to);
        }
    }

    /// Mark `id` accepting, replacing whatever route ended there before
    pub fn accept(&mut self, id: StateId, acceptance: Acceptance) {
        self.states[id].accept = Some(acceptance);
    }

    /// One simulation step: every state reachable from `current` on `ch`
    pub fn step(&self, current: &ActiveSet, ch: char, out: &mut ActiveSet) {
        out.clear();
        for &state in current {
            for &child in &self.states[state].next {
                if self.states[child].spec.accepts(ch) && !out.contains(&child) {
                    out.push(child);
                }
            }
        }
    }

    /// Walk `path` from the root and return the final active set
    ///
    /// Stops as soon as no state is active; the returned set is then empty.
    pub fn simulate(&self, path: &str) -> ActiveSet {
        let mut current: ActiveSet = smallvec::smallvec![ROOT];
        let mut next = ActiveSet::new();
        for ch in path.chars() {
            self.step(&current, ch, &mut next);
            std::mem::swap(&mut current, &mut next);
            if current.is_empty() {
                break;
            }
        }
        current
    }
}
