//! Lifecycle events and the listener registry.
//!
//! The engine announces every notable step of a run through an
//! [`EventBus`]. Listeners are plain closures registered per
//! [`EventKind`], either persistently ([`EventBus::on`]) or for a single
//! delivery ([`EventBus::once`]). They run synchronously on the engine's
//! thread, in registration order, and may fail: an error aborts the run.

use super::types::{GaProblem, RunState};
use crate::error::{EngineError, Result};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Names of the lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EventKind {
    InitialPopulation,
    EvaluatedPopulation,
    Crossover,
    Mutated,
    NewIndividual,
    NewGeneration,
    End,
}

impl EventKind {
    pub const ALL: [EventKind; 7] = [
        EventKind::InitialPopulation,
        EventKind::EvaluatedPopulation,
        EventKind::Crossover,
        EventKind::Mutated,
        EventKind::NewIndividual,
        EventKind::NewGeneration,
        EventKind::End,
    ];

    /// The snake_case event name, e.g. `"new_individual"`.
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::InitialPopulation => "initial_population",
            EventKind::EvaluatedPopulation => "evaluated_population",
            EventKind::Crossover => "crossover",
            EventKind::Mutated => "mutated",
            EventKind::NewIndividual => "new_individual",
            EventKind::NewGeneration => "new_generation",
            EventKind::End => "end",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EventKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| EngineError::InvalidArgument(format!("unknown event `{s}`")))
    }
}

/// An event with its payload.
///
/// Ranked payloads are `(fitness, individual)` pairs sorted ascending by
/// fitness. `NewIndividual` hands out mutable access to the freshly
/// evaluated child and its fitness; whatever they hold when the last
/// listener returns is what enters the next population.
#[derive(Debug)]
pub enum Event<'a, T, F> {
    InitialPopulation {
        gen: usize,
        population: &'a [T],
    },
    EvaluatedPopulation {
        gen: usize,
        ranked: &'a [(F, T)],
    },
    Crossover {
        gen: usize,
        parent1: &'a T,
        parent2: &'a T,
        child: &'a T,
    },
    Mutated {
        gen: usize,
        child: &'a T,
        fitness: F,
    },
    NewIndividual {
        gen: usize,
        individual: &'a mut T,
        fitness: &'a mut F,
    },
    NewGeneration {
        gen: usize,
        ranked: &'a [(F, T)],
    },
    End,
}

impl<T, F> Event<'_, T, F> {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::InitialPopulation { .. } => EventKind::InitialPopulation,
            Event::EvaluatedPopulation { .. } => EventKind::EvaluatedPopulation,
            Event::Crossover { .. } => EventKind::Crossover,
            Event::Mutated { .. } => EventKind::Mutated,
            Event::NewIndividual { .. } => EventKind::NewIndividual,
            Event::NewGeneration { .. } => EventKind::NewGeneration,
            Event::End => EventKind::End,
        }
    }
}

/// What a listener can see besides the event itself.
pub struct EventContext<'a, P: GaProblem> {
    /// The problem plugin driving the run.
    pub problem: &'a P,
    /// The current generation's population and fitness.
    pub state: RunState<'a, P::Individual, P::Fitness>,
}

/// Event type delivered to listeners of problem `P`.
pub type ProblemEvent<'a, P> =
    Event<'a, <P as GaProblem>::Individual, <P as GaProblem>::Fitness>;

/// A registered callback.
pub type Listener<P> =
    Box<dyn FnMut(&EventContext<'_, P>, &mut ProblemEvent<'_, P>) -> anyhow::Result<()> + Send>;

/// Handle returned by [`EventBus::on`] / [`EventBus::once`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Bucket<P> = Vec<(ListenerId, Listener<P>)>;

/// Per-event listener registry.
pub struct EventBus<P: GaProblem> {
    persistent: HashMap<EventKind, Bucket<P>>,
    one_shot: HashMap<EventKind, Bucket<P>>,
    next_id: u64,
}

impl<P: GaProblem> Default for EventBus<P> {
    fn default() -> Self {
        Self {
            persistent: HashMap::new(),
            one_shot: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<P: GaProblem> fmt::Debug for EventBus<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = |map: &HashMap<EventKind, Bucket<P>>| -> usize {
            map.values().map(Vec::len).sum()
        };
        f.debug_struct("EventBus")
            .field("persistent", &count(&self.persistent))
            .field("one_shot", &count(&self.one_shot))
            .finish()
    }
}

impl<P: GaProblem> EventBus<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes `listener` to every future `kind` event.
    pub fn on<L>(&mut self, kind: EventKind, listener: L) -> ListenerId
    where
        L: FnMut(&EventContext<'_, P>, &mut ProblemEvent<'_, P>) -> anyhow::Result<()> + Send + 'static,
    {
        self.subscribe(kind, Box::new(listener))
    }

    /// Subscribes `listener` to the next `kind` event only.
    pub fn once<L>(&mut self, kind: EventKind, listener: L) -> ListenerId
    where
        L: FnMut(&EventContext<'_, P>, &mut ProblemEvent<'_, P>) -> anyhow::Result<()> + Send + 'static,
    {
        let id = self.allocate_id();
        self.one_shot
            .entry(kind)
            .or_default()
            .push((id, Box::new(listener)));
        id
    }

    /// Subscribes an already boxed listener persistently.
    pub fn subscribe(&mut self, kind: EventKind, listener: Listener<P>) -> ListenerId {
        let id = self.allocate_id();
        self.persistent.entry(kind).or_default().push((id, listener));
        id
    }

    /// Removes a listener from both buckets of `kind`.
    ///
    /// Returns `false` if it was not subscribed.
    pub fn off(&mut self, kind: EventKind, id: ListenerId) -> bool {
        let mut removed = false;
        for map in [&mut self.persistent, &mut self.one_shot] {
            if let Some(bucket) = map.get_mut(&kind) {
                let before = bucket.len();
                bucket.retain(|(other, _)| *other != id);
                removed |= bucket.len() != before;
            }
        }
        removed
    }

    /// Number of listeners currently registered for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        let len = |map: &HashMap<EventKind, Bucket<P>>| map.get(&kind).map_or(0, Vec::len);
        len(&self.persistent) + len(&self.one_shot)
    }

    /// Delivers `event` to its listeners.
    ///
    /// One-shot listeners run first, each removed as it is called, then
    /// persistent listeners run. The first failing listener stops delivery
    /// and its error is returned; one-shot listeners it kept from running
    /// stay subscribed.
    pub fn emit(&mut self, ctx: &EventContext<'_, P>, event: &mut ProblemEvent<'_, P>) -> Result<()> {
        let kind = event.kind();
        let wrap = |source: anyhow::Error| EngineError::Listener { event: kind, source };

        let mut pending = self.one_shot.remove(&kind).unwrap_or_default().into_iter();
        while let Some((_, mut listener)) = pending.next() {
            if let Err(source) = listener(ctx, &mut *event) {
                let unreached: Bucket<P> = pending.collect();
                if !unreached.is_empty() {
                    self.one_shot.insert(kind, unreached);
                }
                return Err(wrap(source));
            }
        }

        if let Some(bucket) = self.persistent.get_mut(&kind) {
            for (_, listener) in bucket.iter_mut() {
                listener(ctx, &mut *event).map_err(wrap)?;
            }
        }

        Ok(())
    }

    fn allocate_id(&mut self) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        id
    }
}
