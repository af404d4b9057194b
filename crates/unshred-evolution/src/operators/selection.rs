use rand::Rng;

use crate::{
    error::EvolutionError, individual::Individual, params::ParamsError, population::Population,
};

use super::Selection;

/// Tournament selection minimizing fitness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TournamentSelection {
    /// Number of contestants per tournament (larger = stronger selection pressure)
    pub tournament_size: usize,
}

impl Selection for TournamentSelection {
    fn select<R>(
        &self,
        population: &Population,
        count: usize,
        rng: &mut R,
    ) -> Result<Population, EvolutionError>
    where
        R: Rng + ?Sized,
    {
        select(population, count, self.tournament_size, rng)
    }
}

/// Selects `count` individuals by repeated tournaments of size `k`.
///
/// Each tournament draws `k` contestants uniformly at random *with
/// replacement* and keeps the one with the lowest fitness; on ties the
/// contestant drawn first wins. The returned individuals are clones, in
/// tournament order.
///
/// Every individual must already carry a fitness value, otherwise
/// [`EvolutionError::Precondition`] names the first unevaluated one. The same
/// error is returned when `count > 0` and the population is empty.
///
/// # Arguments
///
/// * `population` - Evaluated individuals to choose from
/// * `count` - Number of individuals to select
/// * `k` - Tournament size, at least 1 (larger = stronger selection pressure)
/// * `rng` - Random number generator
///
/// # Returns
///
/// A fresh population of `count` clones. A tournament size of zero fails with
/// [`EvolutionError::InvalidParams`].
pub fn select<R>(
    population: &Population,
    count: usize,
    k: usize,
    rng: &mut R,
) -> Result<Population, EvolutionError>
where
    R: Rng + ?Sized,
{
    if k == 0 {
        return Err(ParamsError::EmptyTournament.into());
    }
    let individuals = population.individuals();
    let fitness = population.require_fitness()?;
    if individuals.is_empty() && count > 0 {
        return Err(EvolutionError::Precondition { index: 0 });
    }

    let chosen = (0..count)
        .map(|_| {
            let winner = tournament(&fitness, k, rng);
            individuals[winner].clone()
        })
        .collect::<Vec<Individual>>();
    Ok(Population::from(chosen))
}

fn tournament<R>(fitness: &[f64], k: usize, rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    let mut winner = rng.random_range(0..fitness.len());
    for _ in 1..k {
        let contestant = rng.random_range(0..fitness.len());
        if fitness[contestant] < fitness[winner] {
            winner = contestant;
        }
    }
    winner
}
