//! Local-search hybridization.
//!
//! The engine never improves individuals itself. A plugin opts in by
//! subscribing a hook to [`EventKind::NewIndividual`](super::EventKind::NewIndividual);
//! [`local_search_hook`] builds the usual one.

use super::events::{Event, EventContext, ProblemEvent};
use super::types::GaProblem;
use tracing::trace;

/// Builds a `NewIndividual` listener that polishes promising children.
///
/// When a child's fitness is at most `threshold`, the problem's
/// [`local_search`](GaProblem::local_search) is run on it. The result
/// replaces the child, together with its fitness, only if it scores
/// strictly better.
///
/// ```ignore
/// engine.on(EventKind::NewIndividual, local_search_hook(2));
/// ```
pub fn local_search_hook<P: GaProblem>(
    threshold: P::Fitness,
) -> impl FnMut(&EventContext<'_, P>, &mut ProblemEvent<'_, P>) -> anyhow::Result<()> + Send + 'static
{
    move |ctx, event| {
        let Event::NewIndividual {
            gen,
            individual,
            fitness,
        } = event
        else {
            return Ok(());
        };
        if **fitness > threshold {
            return Ok(());
        }

        let improved = ctx.problem.local_search(&**individual)?;
        let improved_fitness = ctx.problem.fitness(&improved)?;
        if improved_fitness < **fitness {
            trace!(
                gen = *gen,
                before = ?**fitness,
                after = ?improved_fitness,
                "local search improved child"
            );
            **individual = improved;
            **fitness = improved_fitness;
        }
        Ok(())
    }
}
