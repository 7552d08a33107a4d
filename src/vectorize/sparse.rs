//! Row and column selection on CSR matrices.
//!
//! Matrices built by this crate are always in CSR layout, so the outer
//! dimension is the example (row) dimension.

use sprs::CsMat;

use crate::error::{InaworldError, Result};

/// Keep the rows whose mask entry is `true`, in order.
pub fn select_rows<N: Clone>(matrix: &CsMat<N>, keep: &[bool]) -> Result<CsMat<N>> {
    ensure_csr(matrix)?;
    if keep.len() != matrix.rows() {
        return Err(InaworldError::shape_mismatch(matrix.rows(), keep.len()));
    }

    let mut indptr = vec![0usize];
    let mut indices = Vec::new();
    let mut data = Vec::new();

    for (row, &kept) in matrix.outer_iterator().zip(keep) {
        if !kept {
            continue;
        }
        for (col, value) in row.iter() {
            indices.push(col);
            data.push(value.clone());
        }
        indptr.push(indices.len());
    }

    let n_rows = indptr.len() - 1;
    Ok(CsMat::new((n_rows, matrix.cols()), indptr, indices, data))
}

/// Keep the rows listed in `rows`, in the order given. Indices may repeat.
pub fn take_rows<N: Clone>(matrix: &CsMat<N>, rows: &[usize]) -> Result<CsMat<N>> {
    ensure_csr(matrix)?;

    let mut indptr = vec![0usize];
    let mut indices = Vec::new();
    let mut data = Vec::new();

    for &row_index in rows {
        let row = matrix
            .outer_view(row_index)
            .ok_or_else(|| InaworldError::shape_mismatch(matrix.rows(), row_index + 1))?;
        for (col, value) in row.iter() {
            indices.push(col);
            data.push(value.clone());
        }
        indptr.push(indices.len());
    }

    Ok(CsMat::new((rows.len(), matrix.cols()), indptr, indices, data))
}

/// Keep the columns whose mask entry is `true`, renumbering them densely.
pub fn select_columns<N: Clone>(matrix: &CsMat<N>, keep: &[bool]) -> Result<CsMat<N>> {
    ensure_csr(matrix)?;
    if keep.len() != matrix.cols() {
        return Err(InaworldError::shape_mismatch(matrix.cols(), keep.len()));
    }

    let mut remap = Vec::with_capacity(keep.len());
    let mut next = 0usize;
    for &kept in keep {
        if kept {
            remap.push(Some(next));
            next += 1;
        } else {
            remap.push(None);
        }
    }

    let mut indptr = vec![0usize];
    let mut indices = Vec::new();
    let mut data = Vec::new();

    for row in matrix.outer_iterator() {
        for (col, value) in row.iter() {
            if let Some(new_col) = remap[col] {
                indices.push(new_col);
                data.push(value.clone());
            }
        }
        indptr.push(indices.len());
    }

    Ok(CsMat::new((matrix.rows(), next), indptr, indices, data))
}

/// Number of rows in which each column holds a non-zero value.
pub fn column_counts<N>(matrix: &CsMat<N>) -> Vec<usize>
where
    N: Copy + Default + PartialEq,
{
    let zero = N::default();
    let mut counts = vec![0usize; matrix.cols()];
    for row in matrix.outer_iterator() {
        for (col, &value) in row.iter() {
            if value != zero {
                counts[col] += 1;
            }
        }
    }
    counts
}

fn ensure_csr<N>(matrix: &CsMat<N>) -> Result<()> {
    if matrix.is_csr() {
        Ok(())
    } else {
        Err(InaworldError::invalid_config(
            "sparse matrix must be in CSR layout",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprs::TriMat;

    fn sample() -> CsMat<u8> {
        // [1 0 1]
        // [0 0 0]
        // [0 1 1]
        let mut tri = TriMat::new((3, 3));
        tri.add_triplet(0, 0, 1u8);
        tri.add_triplet(0, 2, 1);
        tri.add_triplet(2, 1, 1);
        tri.add_triplet(2, 2, 1);
        tri.to_csr()
    }

    #[test]
    fn test_select_rows() {
        let selected = select_rows(&sample(), &[true, false, true]).unwrap();

        assert_eq!(selected.shape(), (2, 3));
        assert_eq!(selected.get(0, 0), Some(&1));
        assert_eq!(selected.get(1, 1), Some(&1));
        assert_eq!(selected.get(1, 0), None);
    }

    #[test]
    fn test_select_columns() {
        let selected = select_columns(&sample(), &[false, true, true]).unwrap();

        assert_eq!(selected.shape(), (3, 2));
        assert_eq!(selected.get(0, 1), Some(&1));
        assert_eq!(selected.get(2, 0), Some(&1));
        assert_eq!(selected.nnz(), 3);
    }

    #[test]
    fn test_take_rows_in_order() {
        let taken = take_rows(&sample(), &[2, 0]).unwrap();

        assert_eq!(taken.shape(), (2, 3));
        assert_eq!(taken.get(0, 1), Some(&1));
        assert_eq!(taken.get(1, 0), Some(&1));
        assert!(take_rows(&sample(), &[3]).is_err());
    }

    #[test]
    fn test_mask_length_mismatch() {
        assert!(matches!(
            select_rows(&sample(), &[true]),
            Err(InaworldError::ShapeMismatch { expected: 3, actual: 1 })
        ));
    }

    #[test]
    fn test_column_counts() {
        assert_eq!(column_counts(&sample()), vec![1, 1, 2]);
    }
}
