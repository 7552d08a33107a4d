//! Train/validation split of co-indexed examples.
//!
//! Rows are shuffled and partitioned so that the validation set holds
//! `round(test_size * n)` examples and the training set the rest. Row `i` of
//! the inputs always travels with row `i` of the labels.
//!
//! In stratified mode every distinct combination of labels is treated as one
//! class and each class is spread over both sets in proportion to its size.
//! Stratification works on a dense copy of the label matrix. A class with a
//! single member cannot be spread and fails with
//! [`InaworldError::InsufficientClassMembers`]; there is no silent fallback
//! to an unstratified split.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use sprs::CsMat;
use tracing::info;

use crate::config::{DEFAULT_TEST_SIZE, SessionConfig};
use crate::error::{InaworldError, Result};
use crate::vectorize::sparse;

/// Arrays whose rows can be selected by index.
pub trait Rows: Sized {
    /// Number of rows.
    fn n_rows(&self) -> usize;

    /// New array made of the given rows, in the given order.
    fn take_rows(&self, indices: &[usize]) -> Result<Self>;

    /// New array made of the rows whose mask entry is `true`.
    fn select_rows(&self, keep: &[bool]) -> Result<Self> {
        if keep.len() != self.n_rows() {
            return Err(InaworldError::shape_mismatch(self.n_rows(), keep.len()));
        }
        let indices: Vec<usize> = keep
            .iter()
            .enumerate()
            .filter_map(|(i, &kept)| kept.then_some(i))
            .collect();
        self.take_rows(&indices)
    }
}

impl<T: Clone> Rows for Vec<T> {
    fn n_rows(&self) -> usize {
        self.len()
    }

    fn take_rows(&self, indices: &[usize]) -> Result<Self> {
        indices
            .iter()
            .map(|&i| {
                self.get(i)
                    .cloned()
                    .ok_or_else(|| InaworldError::shape_mismatch(self.len(), i + 1))
            })
            .collect()
    }
}

impl<N: Clone> Rows for CsMat<N> {
    fn n_rows(&self) -> usize {
        self.rows()
    }

    fn take_rows(&self, indices: &[usize]) -> Result<Self> {
        sparse::take_rows(self, indices)
    }

    fn select_rows(&self, keep: &[bool]) -> Result<Self> {
        sparse::select_rows(self, keep)
    }
}

/// Options for [`split_data`].
#[derive(Debug, Clone, PartialEq)]
pub struct SplitConfig {
    /// Fraction of rows held out for validation, in (0, 1).
    pub test_size: f64,
    /// Preserve label-combination proportions in both sets.
    pub stratify: bool,
    /// Shuffle seed; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        SplitConfig {
            test_size: DEFAULT_TEST_SIZE,
            stratify: false,
            seed: None,
        }
    }
}

impl From<&SessionConfig> for SplitConfig {
    fn from(config: &SessionConfig) -> Self {
        SplitConfig {
            test_size: config.test_size,
            stratify: config.stratify_split,
            seed: config.seed,
        }
    }
}

/// Training and validation halves of a split.
#[derive(Debug, Clone)]
pub struct SplitPayload<X, Y> {
    pub x_train: X,
    pub y_train: Y,
    pub x_test: X,
    pub y_test: Y,
    /// Original row index of every training row.
    pub train_indices: Vec<usize>,
    /// Original row index of every validation row.
    pub test_indices: Vec<usize>,
}

/// Sizes `(n_train, n_test)` for `n` rows.
pub fn split_sizes(n: usize, test_size: f64) -> Result<(usize, usize)> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(InaworldError::invalid_config(format!(
            "test_size must be in (0, 1), got {test_size}"
        )));
    }

    let n_test = (test_size * n as f64).round() as usize;
    let n_train = n - n_test.min(n);

    if n_test == 0 || n_train == 0 {
        return Err(InaworldError::invalid_config(format!(
            "cannot split {n} examples with test_size {test_size}: one side would be empty"
        )));
    }

    Ok((n_train, n_test))
}

/// Shuffle and partition `x` and `y` into training and validation sets.
pub fn split_data<X: Rows>(
    x: &X,
    y: &CsMat<u8>,
    config: &SplitConfig,
) -> Result<SplitPayload<X, CsMat<u8>>> {
    let n = x.n_rows();
    if y.rows() != n {
        return Err(InaworldError::shape_mismatch(n, y.rows()));
    }

    let (n_train, n_test) = split_sizes(n, config.test_size)?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let (train_indices, test_indices) = if config.stratify {
        stratified_indices(y, n_train, n_test, &mut rng)?
    } else {
        let mut permutation: Vec<usize> = (0..n).collect();
        permutation.shuffle(&mut rng);
        let train = permutation.split_off(n_test);
        (train, permutation)
    };

    info!(
        n_train = train_indices.len(),
        n_test = test_indices.len(),
        stratified = config.stratify,
        "split examples"
    );

    Ok(SplitPayload {
        x_train: x.take_rows(&train_indices)?,
        y_train: y.take_rows(&train_indices)?,
        x_test: x.take_rows(&test_indices)?,
        y_test: y.take_rows(&test_indices)?,
        train_indices,
        test_indices,
    })
}

fn stratified_indices(
    y: &CsMat<u8>,
    n_train: usize,
    n_test: usize,
    rng: &mut StdRng,
) -> Result<(Vec<usize>, Vec<usize>)> {
    // Class assignment needs whole rows as keys, which a sparse matrix does
    // not offer directly.
    let dense = y.to_dense();

    let mut classes: BTreeMap<Vec<u8>, Vec<usize>> = BTreeMap::new();
    for (i, row) in dense.rows().into_iter().enumerate() {
        classes.entry(row.to_vec()).or_default().push(i);
    }

    if let Some((key, members)) = classes.iter().find(|(_, members)| members.len() < 2) {
        return Err(InaworldError::InsufficientClassMembers {
            class: describe_class(key),
            members: members.len(),
        });
    }

    if n_test < classes.len() || n_train < classes.len() {
        return Err(InaworldError::invalid_config(format!(
            "stratified split needs at least {} examples on each side, got {n_train} train and {n_test} validation",
            classes.len()
        )));
    }

    let counts: Vec<usize> = classes.values().map(Vec::len).collect();
    let test_allocation = allocate(&counts, n_test);

    let mut train = Vec::with_capacity(n_train);
    let mut test = Vec::with_capacity(n_test);
    for (mut members, n_class_test) in classes.into_values().zip(test_allocation) {
        members.shuffle(rng);
        let class_train = members.split_off(n_class_test);
        test.extend(members);
        train.extend(class_train);
    }

    train.shuffle(rng);
    test.shuffle(rng);

    Ok((train, test))
}

/// Share `total` slots among classes in proportion to their sizes using the
/// largest-remainder method. Ties go to the larger class, then the earlier one.
fn allocate(counts: &[usize], total: usize) -> Vec<usize> {
    let n: usize = counts.iter().sum();
    if n == 0 {
        return vec![0; counts.len()];
    }

    let exact: Vec<f64> = counts
        .iter()
        .map(|&count| count as f64 * total as f64 / n as f64)
        .collect();
    let mut allocation: Vec<usize> = exact.iter().map(|share| share.floor() as usize).collect();

    let mut order: Vec<usize> = (0..counts.len()).collect();
    order.sort_by(|&a, &b| {
        let remainder_a = exact[a] - allocation[a] as f64;
        let remainder_b = exact[b] - allocation[b] as f64;
        remainder_b
            .total_cmp(&remainder_a)
            .then(counts[b].cmp(&counts[a]))
            .then(a.cmp(&b))
    });

    let mut remaining = total.saturating_sub(allocation.iter().sum());
    for &class in order.iter().cycle() {
        if remaining == 0 {
            break;
        }
        if allocation[class] < counts[class] {
            allocation[class] += 1;
            remaining -= 1;
        }
    }

    allocation
}

fn describe_class(key: &[u8]) -> String {
    let columns: Vec<String> = key
        .iter()
        .enumerate()
        .filter(|&(_, &value)| value > 0)
        .map(|(col, _)| col.to_string())
        .collect();
    format!("{{{}}}", columns.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprs::TriMat;

    fn single_label_matrix(labels: &[usize], n_labels: usize) -> CsMat<u8> {
        let mut tri = TriMat::new((labels.len(), n_labels));
        for (row, &col) in labels.iter().enumerate() {
            tri.add_triplet(row, col, 1u8);
        }
        tri.to_csr()
    }

    #[test]
    fn test_split_sizes() {
        assert_eq!(split_sizes(4, 0.25).unwrap(), (3, 1));
        assert_eq!(split_sizes(10, 0.25).unwrap(), (7, 3)); // 2.5 rounds up
        assert_eq!(split_sizes(10, 0.33).unwrap(), (7, 3));
        assert!(split_sizes(1, 0.25).is_err());
        assert!(split_sizes(10, 1.0).is_err());
    }

    #[test]
    fn test_split_preserves_alignment() {
        let x: Vec<usize> = (0..20).collect();
        let labels: Vec<usize> = (0..20).map(|i| i % 4).collect();
        let y = single_label_matrix(&labels, 4);
        let config = SplitConfig {
            test_size: 0.25,
            stratify: false,
            seed: Some(7),
        };

        let split = split_data(&x, &y, &config).unwrap();

        assert_eq!(split.x_train.len(), 15);
        assert_eq!(split.x_test.len(), 5);
        for (row, &original) in split.x_train.iter().enumerate() {
            assert_eq!(split.y_train.get(row, original % 4), Some(&1));
        }
        for (row, &original) in split.x_test.iter().enumerate() {
            assert_eq!(split.y_test.get(row, original % 4), Some(&1));
        }

        let mut all: Vec<usize> = split.x_train.iter().chain(&split.x_test).copied().collect();
        all.sort();
        assert_eq!(all, x);
    }

    #[test]
    fn test_split_is_reproducible_with_seed() {
        let x: Vec<usize> = (0..12).collect();
        let y = single_label_matrix(&vec![0; 12], 1);
        let config = SplitConfig {
            seed: Some(42),
            ..Default::default()
        };

        let first = split_data(&x, &y, &config).unwrap();
        let second = split_data(&x, &y, &config).unwrap();

        assert_eq!(first.train_indices, second.train_indices);
        assert_eq!(first.test_indices, second.test_indices);
    }

    #[test]
    fn test_stratified_split_balances_classes() {
        let labels: Vec<usize> = (0..40).map(|i| if i < 30 { 0 } else { 1 }).collect();
        let x: Vec<usize> = (0..40).collect();
        let y = single_label_matrix(&labels, 2);
        let config = SplitConfig {
            test_size: 0.25,
            stratify: true,
            seed: Some(3),
        };

        let split = split_data(&x, &y, &config).unwrap();

        let test_minority = split.x_test.iter().filter(|&&i| i >= 30).count();
        assert_eq!(split.x_test.len(), 10);
        // shares are 2.5 and 7.5; the tie goes to the larger class
        assert_eq!(test_minority, 2);
    }

    #[test]
    fn test_stratified_split_rejects_singleton_class() {
        let x: Vec<usize> = (0..5).collect();
        let y = single_label_matrix(&[0, 0, 0, 0, 1], 2);
        let config = SplitConfig {
            test_size: 0.4,
            stratify: true,
            seed: Some(1),
        };

        match split_data(&x, &y, &config) {
            Err(InaworldError::InsufficientClassMembers { class, members }) => {
                assert_eq!(class, "{1}");
                assert_eq!(members, 1);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_shape_mismatch() {
        let x: Vec<usize> = (0..3).collect();
        let y = single_label_matrix(&[0, 0], 1);

        assert!(matches!(
            split_data(&x, &y, &SplitConfig::default()),
            Err(InaworldError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_allocate() {
        assert_eq!(allocate(&[30, 10], 10), vec![8, 2]);
        assert_eq!(allocate(&[3, 3, 3], 4), vec![2, 1, 1]);
        assert_eq!(allocate(&[2, 2], 0), vec![0, 0]);
    }

    #[test]
    fn test_rows_for_vec_and_matrix() {
        let values = vec!["a", "b", "c"];
        assert_eq!(values.select_rows(&[true, false, true]).unwrap(), vec!["a", "c"]);
        assert_eq!(values.take_rows(&[2, 0]).unwrap(), vec!["c", "a"]);
        assert!(values.take_rows(&[3]).is_err());

        let matrix = single_label_matrix(&[0, 1, 0], 2);
        assert_eq!(matrix.select_rows(&[false, true, true]).unwrap().rows(), 2);
    }
}
