//! Synthetic stand-in for the image oracle.
//!
//! Real runs score strip orders against a shredded picture. For the command
//! line we shred a virtual image instead: the hidden original order is a
//! seeded random permutation of the strips, and a candidate is penalized for
//! every neighbouring pair of strips that were not neighbours (in that order)
//! in the original. A candidate scores `0` exactly when it is the original
//! order.

use rand::{SeedableRng as _, seq::SliceRandom as _};
use rand_pcg::Pcg32;
use unshred_evolution::{FitnessOracle, OracleError, permutation};

#[derive(Debug, Clone)]
pub struct ShreddedStrips {
    original: Vec<usize>,
    /// `successor[s]` is the strip right of `s` in the original image
    successor: Vec<Option<usize>>,
}

impl ShreddedStrips {
    pub fn new(strip_count: usize, shred_seed: u64) -> Self {
        let mut original = permutation::identity(strip_count);
        original.shuffle(&mut Pcg32::seed_from_u64(shred_seed));
        let mut successor = vec![None; strip_count];
        for pair in original.windows(2) {
            successor[pair[0]] = Some(pair[1]);
        }
        Self {
            original,
            successor,
        }
    }

    pub fn original(&self) -> &[usize] {
        &self.original
    }

    /// Positions `i` where strip `i + 1` does not continue strip `i`.
    fn seams<'a>(&'a self, permutation: &'a [usize]) -> impl Iterator<Item = usize> + 'a {
        permutation
            .windows(2)
            .enumerate()
            .filter(|(_, pair)| self.successor[pair[0]] != Some(pair[1]))
            .map(|(i, _)| i)
    }

    fn check(&self, permutation: &[usize]) -> Result<(), OracleError> {
        permutation::validate(permutation, self.original.len())
            .map_err(|e| OracleError::new(format!("not a strip order: {e}")))
    }
}

impl FitnessOracle for ShreddedStrips {
    #[expect(clippy::cast_precision_loss)]
    fn evaluate_solution(&self, permutation: &[usize]) -> Result<f64, OracleError> {
        self.check(permutation)?;
        Ok(self.seams(permutation).count() as f64)
    }

    fn show_solution(&self, permutation: &[usize]) -> Result<(), OracleError> {
        self.check(permutation)?;
        let seams = self.seams(permutation).collect::<Vec<_>>();
        let mut line = String::new();
        for (i, strip) in permutation.iter().enumerate() {
            line.push_str(&strip.to_string());
            if i + 1 < permutation.len() {
                line.push_str(if seams.contains(&i) { " | " } else { " " });
            }
        }
        println!("Reconstructed strips: {line}");
        println!("Original strips:      {:?}", self.original);
        if seams.is_empty() {
            println!("Image fully reconstructed");
        } else {
            println!("{} misplaced seam(s) marked with '|'", seams.len());
        }
        Ok(())
    }
}
