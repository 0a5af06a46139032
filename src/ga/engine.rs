//! Generational loop.
//!
//! [`GaEngine`] owns the run state and drives it:
//! generate → evaluate → (select → crossover → mutate → evaluate)* → replace → repeat,
//! announcing each step on its [`EventBus`].

use super::config::EngineConfig;
use super::events::{Event, EventBus, EventContext, EventKind, Listener, ListenerId, ProblemEvent};
use super::selection::{CustomSelection, SelectionMethod, Selector};
use super::types::{best_index, is_comparable, rank, Fitness, GaProblem, RunState};
use crate::error::{EngineError, Result};
use crate::random::RandomStream;
use rand::Rng;
use tracing::{debug, info, trace};

/// Final population of a run, ascending by fitness (best first).
pub type Ranked<P> = Vec<(<P as GaProblem>::Fitness, <P as GaProblem>::Individual)>;

/// Generational evolutionary engine.
///
/// # Usage
///
/// ```ignore
/// let mut engine = GaEngine::new(MyProblem::new(), EngineConfig::new(42, 50, 0.05, 0.9))?;
/// engine.on(EventKind::NewGeneration, |_, event| {
///     if let Event::NewGeneration { gen, ranked } = event {
///         println!("gen {gen}: best {:?}", ranked[0].0);
///     }
///     Ok(())
/// });
/// let ranked = engine.start(true, SelectionMethod::DeterministicTournament, None)?;
/// ```
///
/// # Replacement policies
///
/// Each generation builds a new population of exactly `population_size`
/// individuals. Two parents are selected independently; with probability
/// `crossover_rate` they produce one child (mutated with probability
/// `mutation_rate`, then evaluated). Otherwise the first parent is copied
/// and, if a slot remains, the second one too.
///
/// With elitism the new population starts from one copy of the current
/// best individual and its fitness, so the best fitness never degrades
/// from one generation to the next.
pub struct GaEngine<P: GaProblem> {
    problem: P,
    config: EngineConfig,
    events: EventBus<P>,
    rng: RandomStream,
    current: Generation<P::Individual, P::Fitness>,
}

/// Population of the generation in progress.
#[derive(Debug)]
struct Generation<T, F> {
    gen: usize,
    population: Vec<T>,
    fitness: Vec<F>,
}

impl<T, F> Generation<T, F> {
    fn view(&self) -> RunState<'_, T, F> {
        RunState {
            gen: self.gen,
            population: &self.population,
            fitness: &self.fitness,
        }
    }
}

impl<P: GaProblem + std::fmt::Debug> std::fmt::Debug for GaEngine<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GaEngine")
            .field("problem", &self.problem)
            .field("config", &self.config)
            .field("events", &self.events)
            .field("gen", &self.current.gen)
            .field("population_len", &self.current.population.len())
            .finish()
    }
}

impl<P: GaProblem> GaEngine<P> {
    /// Creates an engine for `problem`.
    ///
    /// Fails with [`EngineError::Configuration`] if `config` is invalid.
    pub fn new(problem: P, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            rng: RandomStream::new(config.seed),
            problem,
            config,
            events: EventBus::new(),
            current: Generation {
                gen: 0,
                population: Vec::new(),
                fitness: Vec::new(),
            },
        })
    }

    /// Creates an engine with a list of persistent listeners.
    pub fn with_listeners<I>(problem: P, config: EngineConfig, listeners: I) -> Result<Self>
    where
        I: IntoIterator<Item = (EventKind, Listener<P>)>,
    {
        let mut engine = Self::new(problem, config)?;
        engine.subscribe_all(listeners);
        Ok(engine)
    }

    /// Subscribes `listener` to every future `kind` event.
    pub fn on<L>(&mut self, kind: EventKind, listener: L) -> ListenerId
    where
        L: FnMut(&EventContext<'_, P>, &mut ProblemEvent<'_, P>) -> anyhow::Result<()> + Send + 'static,
    {
        self.events.on(kind, listener)
    }

    /// Subscribes `listener` to the next `kind` event only.
    pub fn once<L>(&mut self, kind: EventKind, listener: L) -> ListenerId
    where
        L: FnMut(&EventContext<'_, P>, &mut ProblemEvent<'_, P>) -> anyhow::Result<()> + Send + 'static,
    {
        self.events.once(kind, listener)
    }

    /// Unsubscribes a listener. Returns `false` if it was not registered.
    pub fn off(&mut self, kind: EventKind, id: ListenerId) -> bool {
        self.events.off(kind, id)
    }

    /// Registers boxed listeners persistently, in order.
    pub fn subscribe_all<I>(&mut self, listeners: I) -> Vec<ListenerId>
    where
        I: IntoIterator<Item = (EventKind, Listener<P>)>,
    {
        listeners
            .into_iter()
            .map(|(kind, listener)| self.events.subscribe(kind, listener))
            .collect()
    }

    /// Completed generations in the current (or last) run.
    pub fn gen(&self) -> usize {
        self.current.gen
    }

    /// Current population.
    pub fn population(&self) -> &[P::Individual] {
        &self.current.population
    }

    /// Fitness of each individual in [`population`](Self::population).
    pub fn fitness(&self) -> &[P::Fitness] {
        &self.current.fitness
    }

    /// Read-only view of the run state.
    pub fn state(&self) -> RunState<'_, P::Individual, P::Fitness> {
        self.current.view()
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn events(&self) -> &EventBus<P> {
        &self.events
    }

    /// Runs the engine until the problem's end condition holds.
    ///
    /// Returns the final population ranked ascending by fitness.
    ///
    /// The random stream is re-seeded from the configuration on every
    /// call, so two calls with the same arguments and a deterministic
    /// plugin produce the same run.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Configuration`] if `selection_method` is
    ///   [`SelectionMethod::Custom`] without `custom_selection`, or a
    ///   tournament is larger than the population. Nothing runs.
    /// - [`EngineError::Plugin`] / [`EngineError::Listener`] if a plugin
    ///   operation or a listener fails. The run stops where it failed.
    /// - [`EngineError::PopulationSize`] if the plugin generates the wrong
    ///   number of individuals.
    pub fn start(
        &mut self,
        elitism: bool,
        selection_method: SelectionMethod,
        custom_selection: Option<CustomSelection<P::Fitness>>,
    ) -> Result<Ranked<P>> {
        let mut selector = Selector::resolve(selection_method, custom_selection, &self.config)?;
        let size = self.config.population_size;

        self.rng = RandomStream::new(self.config.seed);
        self.current.gen = 0;
        self.current.population.clear();
        self.current.fitness.clear();

        info!(
            seed = self.config.seed,
            population_size = size,
            elitism,
            selection = %selection_method,
            "starting run"
        );

        let population = self
            .problem
            .generate_population(size, &mut self.rng)
            .map_err(EngineError::plugin("generate_population"))?;
        if population.len() != size {
            return Err(EngineError::PopulationSize {
                expected: size,
                actual: population.len(),
            });
        }
        self.current.population = population;
        emit_in(
            &mut self.events,
            &self.problem,
            self.current.view(),
            &mut Event::InitialPopulation {
                gen: self.current.gen,
                population: &self.current.population,
            },
        )?;

        self.current.fitness = self
            .current
            .population
            .iter()
            .map(|ind| evaluate(&self.problem, ind))
            .collect::<Result<Vec<_>>>()?;
        let mut ranked = rank(&self.current.population, &self.current.fitness);
        self.emit(&mut Event::EvaluatedPopulation {
            gen: self.current.gen,
            ranked: &ranked,
        })?;

        while !self.end_condition()? {
            let (population, fitness) = self.next_generation(elitism, &mut selector)?;
            self.current.gen += 1;
            self.current.population = population;
            self.current.fitness = fitness;

            ranked = rank(&self.current.population, &self.current.fitness);
            debug!(
                gen = self.current.gen,
                best = ranked[0].0.to_f64(),
                "generation complete"
            );
            self.emit(&mut Event::NewGeneration {
                gen: self.current.gen,
                ranked: &ranked,
            })?;
        }

        info!(
            generations = self.current.gen,
            best = ranked[0].0.to_f64(),
            "run finished"
        );
        self.emit(&mut Event::End)?;
        Ok(ranked)
    }

    fn end_condition(&self) -> Result<bool> {
        self.problem
            .end_condition(&self.current.view())
            .map_err(EngineError::plugin("end_condition"))
    }

    /// Builds the next population from the current one.
    fn next_generation(
        &mut self,
        elitism: bool,
        selector: &mut Selector<P::Fitness>,
    ) -> Result<(Vec<P::Individual>, Vec<P::Fitness>)> {
        let size = self.config.population_size;
        let mut population = Vec::with_capacity(size);
        let mut fitness = Vec::with_capacity(size);

        if elitism {
            if let Some(best) = best_index(&self.current.fitness) {
                population.push(self.current.population[best].clone());
                fitness.push(self.current.fitness[best]);
            }
        }

        while population.len() < size {
            let i1 = selector.select(&self.current.fitness, &mut self.rng)?;
            let i2 = selector.select(&self.current.fitness, &mut self.rng)?;
            trace!(gen = self.current.gen, parent1 = i1, parent2 = i2, "selected parents");

            if self.rng.random::<f64>() < self.config.crossover_rate {
                let (child, child_fitness) = self.breed(i1, i2)?;
                population.push(child);
                fitness.push(child_fitness);
            } else {
                population.push(self.current.population[i1].clone());
                fitness.push(self.current.fitness[i1]);
                if population.len() < size {
                    population.push(self.current.population[i2].clone());
                    fitness.push(self.current.fitness[i2]);
                }
            }
        }

        // The fill loop never overshoots; this pins the size invariant regardless.
        population.truncate(size);
        fitness.truncate(size);
        Ok((population, fitness))
    }

    /// Crosses parents `i1` and `i2`, maybe mutates, evaluates, and
    /// announces the child.
    fn breed(&mut self, i1: usize, i2: usize) -> Result<(P::Individual, P::Fitness)> {
        let gen = self.current.gen;
        let parent1 = &self.current.population[i1];
        let parent2 = &self.current.population[i2];

        let mut child = self
            .problem
            .crossover(parent1, parent2, &mut self.rng)
            .map_err(EngineError::plugin("crossover"))?;
        emit_in(
            &mut self.events,
            &self.problem,
            self.current.view(),
            &mut Event::Crossover {
                gen,
                parent1,
                parent2,
                child: &child,
            },
        )?;

        let mutated = self.rng.random::<f64>() < self.config.mutation_rate;
        if mutated {
            child = self
                .problem
                .mutate(child, &mut self.rng)
                .map_err(EngineError::plugin("mutate"))?;
        }

        let mut child_fitness = evaluate(&self.problem, &child)?;

        if mutated {
            emit_in(
                &mut self.events,
                &self.problem,
                self.current.view(),
                &mut Event::Mutated {
                    gen,
                    child: &child,
                    fitness: child_fitness,
                },
            )?;
        }

        emit_in(
            &mut self.events,
            &self.problem,
            self.current.view(),
            &mut Event::NewIndividual {
                gen,
                individual: &mut child,
                fitness: &mut child_fitness,
            },
        )?;
        if !is_comparable(&child_fitness) {
            return Err(EngineError::Listener {
                event: EventKind::NewIndividual,
                source: anyhow::anyhow!("listener left an unordered fitness {child_fitness:?}"),
            });
        }
        trace!(gen, fitness = child_fitness.to_f64(), mutated, "new individual");

        Ok((child, child_fitness))
    }

    fn emit(&mut self, event: &mut ProblemEvent<'_, P>) -> Result<()> {
        emit_in(&mut self.events, &self.problem, self.current.view(), event)
    }
}

/// Scores one individual, rejecting fitness values that cannot be ordered.
fn evaluate<P: GaProblem>(problem: &P, individual: &P::Individual) -> Result<P::Fitness> {
    let fitness = problem
        .fitness(individual)
        .map_err(EngineError::plugin("fitness"))?;
    if !is_comparable(&fitness) {
        return Err(EngineError::Plugin {
            operation: "fitness",
            source: anyhow::anyhow!("unordered fitness {fitness:?} for {individual:?}"),
        });
    }
    Ok(fitness)
}

/// Emits through `events` while the rest of the engine stays borrowed.
fn emit_in<P: GaProblem>(
    events: &mut EventBus<P>,
    problem: &P,
    state: RunState<'_, P::Individual, P::Fitness>,
    event: &mut ProblemEvent<'_, P>,
) -> Result<()> {
    let ctx = EventContext { problem, state };
    events.emit(&ctx, event)
}

// ============================================================================
// Tests
// ============================================================================
