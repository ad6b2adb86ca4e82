/// Visiting order of the accumulator within one `k` step.
///
/// Columns are visited in order. Rows go up on even columns and down on odd
/// ones, so the last row touched in column `n` is the first one touched in
/// column `n + 1`.
#[derive(Clone, Debug)]
pub struct Serpentine {
    rows: usize,
    columns: usize,
    index: usize,
}

impl Serpentine {
    pub const fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            index: 0,
        }
    }

    // Only called with `step < rows`.
    #[inline(always)]
    const fn row(rows: usize, column: usize, step: usize) -> usize {
        if column % 2 == 1 {
            rows - 1 - step
        } else {
            step
        }
    }
}

impl Iterator for Serpentine {
    /// `(row, column)` of the accumulator element.
    type Item = (usize, usize);

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.rows * self.columns {
            return None;
        }

        let column = self.index / self.rows;
        let step = self.index % self.rows;
        self.index += 1;

        Some((Self::row(self.rows, column, step), column))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.rows * self.columns).saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Serpentine {}
