use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::utils::{validate_ratio, AnalysisError};

/// Row indices of a shuffled train/test partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n_samples` with a seeded RNG and cut off the test partition
///
/// # Arguments
/// * `n_samples` - Number of rows to partition
/// * `test_ratio` - Fraction held out, strictly inside (0, 1)
/// * `seed` - RNG seed; the same seed always yields the same partition
///
/// # Returns
/// * `Ok(SplitIndices)` - `ceil(n * test_ratio)` test rows, the rest train rows
/// * `Err(AnalysisError)` - If the ratio is invalid or either side would be empty
pub fn train_test_split(
    n_samples: usize,
    test_ratio: f64,
    seed: u64,
) -> Result<SplitIndices, AnalysisError> {
    validate_ratio(test_ratio)?;

    let n_test = (n_samples as f64 * test_ratio).ceil() as usize;
    if n_test == 0 || n_test >= n_samples {
        return Err(AnalysisError::ValidationError(format!(
            "cannot split {} samples with test ratio {}: a partition would be empty",
            n_samples, test_ratio
        )));
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    Ok(SplitIndices {
        train,
        test: indices,
    })
}

/// Materialized partition
#[derive(Debug, Clone)]
pub struct Partition {
    pub x_train: Array2<f64>,
    pub y_train: Array1<usize>,
    pub x_test: Array2<f64>,
    pub y_test: Array1<usize>,
}

impl SplitIndices {
    /// Gather the rows of each side
    pub fn apply(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, usize>) -> Partition {
        Partition {
            x_train: x.select(Axis(0), &self.train),
            y_train: y.select(Axis(0), &self.train),
            x_test: x.select(Axis(0), &self.test),
            y_test: y.select(Axis(0), &self.test),
        }
    }
}
