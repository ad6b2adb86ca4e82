use core::fmt::{Debug, Display};

use serde::{Deserialize, Serialize};

/// Interleave factor that the SIMT warp level collapses to a plain layout.
pub const SIMT_INTERLEAVE: u32 = 4;

/// Maps a `(row, column)` coordinate of a packed `rows x columns` matrix to a
/// linear offset.
pub trait MatrixLayout: Copy + Default + Debug + Send + Sync + 'static {
    /// Runtime tag of the layout.
    const KIND: LayoutKind;

    /// Layout used by a single lane once the warp level has resolved it.
    ///
    /// 4-way interleaved layouts collapse to their plain counterpart, every
    /// other layout maps to itself.
    type Thread: MatrixLayout;

    fn offset(row: usize, column: usize, rows: usize, columns: usize) -> usize {
        Self::KIND.offset(row, column, rows, columns)
    }
}

#[derive(Copy, Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct RowMajor;

#[derive(Copy, Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct ColumnMajor;

/// Row-major layout where groups of `I` consecutive rows are interleaved.
#[derive(Copy, Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct RowMajorInterleaved<const I: u32>;

/// Column-major layout where groups of `I` consecutive columns are interleaved.
#[derive(Copy, Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct ColumnMajorInterleaved<const I: u32>;

impl MatrixLayout for RowMajor {
    const KIND: LayoutKind = LayoutKind::RowMajor;
    type Thread = RowMajor;
}

impl MatrixLayout for ColumnMajor {
    const KIND: LayoutKind = LayoutKind::ColumnMajor;
    type Thread = ColumnMajor;
}

macro_rules! impl_interleaved {
    ($($interleave:literal => $row_thread:ty, $col_thread:ty);* $(;)?) => {
        $(
            impl MatrixLayout for RowMajorInterleaved<$interleave> {
                const KIND: LayoutKind = LayoutKind::RowMajorInterleaved($interleave);
                type Thread = $row_thread;
            }

            impl MatrixLayout for ColumnMajorInterleaved<$interleave> {
                const KIND: LayoutKind = LayoutKind::ColumnMajorInterleaved($interleave);
                type Thread = $col_thread;
            }
        )*
    };
}

impl_interleaved!(
    1 => RowMajorInterleaved<1>, ColumnMajorInterleaved<1>;
    2 => RowMajorInterleaved<2>, ColumnMajorInterleaved<2>;
    4 => RowMajor, ColumnMajor;
    8 => RowMajorInterleaved<8>, ColumnMajorInterleaved<8>;
    16 => RowMajorInterleaved<16>, ColumnMajorInterleaved<16>;
    32 => RowMajorInterleaved<32>, ColumnMajorInterleaved<32>;
);

/// Runtime tag for every supported layout.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutKind {
    RowMajor,
    ColumnMajor,
    RowMajorInterleaved(u32),
    ColumnMajorInterleaved(u32),
}

impl LayoutKind {
    /// Linear offset of `(row, column)` in a packed `rows x columns` matrix.
    ///
    /// Interleaved layouts expect `rows` (row interleaving) or `columns`
    /// (column interleaving) to be a multiple of the interleave factor.
    pub const fn offset(&self, row: usize, column: usize, rows: usize, columns: usize) -> usize {
        match *self {
            LayoutKind::RowMajor => row * columns + column,
            LayoutKind::ColumnMajor => column * rows + row,
            LayoutKind::RowMajorInterleaved(interleave) => {
                let interleave = interleave as usize;
                let row_major = row / interleave;
                let row_minor = row % interleave;
                row_major * (columns * interleave) + column * interleave + row_minor
            }
            LayoutKind::ColumnMajorInterleaved(interleave) => {
                let interleave = interleave as usize;
                let column_major = column / interleave;
                let column_minor = column % interleave;
                column_major * (rows * interleave) + row * interleave + column_minor
            }
        }
    }

    /// Inverse of [offset](LayoutKind::offset): the `(row, column)` stored at `offset`.
    pub const fn coordinate(&self, offset: usize, rows: usize, columns: usize) -> (usize, usize) {
        match *self {
            LayoutKind::RowMajor => (offset / columns, offset % columns),
            LayoutKind::ColumnMajor => (offset % rows, offset / rows),
            LayoutKind::RowMajorInterleaved(interleave) => {
                let interleave = interleave as usize;
                let row_major = offset / (columns * interleave);
                let residual = offset % (columns * interleave);
                (
                    row_major * interleave + residual % interleave,
                    residual / interleave,
                )
            }
            LayoutKind::ColumnMajorInterleaved(interleave) => {
                let interleave = interleave as usize;
                let column_major = offset / (rows * interleave);
                let residual = offset % (rows * interleave);
                (
                    residual / interleave,
                    column_major * interleave + residual % interleave,
                )
            }
        }
    }

    /// Layout used by a single lane, see [MatrixLayout::Thread].
    pub fn thread_layout(&self) -> LayoutKind {
        match *self {
            LayoutKind::RowMajorInterleaved(SIMT_INTERLEAVE) => LayoutKind::RowMajor,
            LayoutKind::ColumnMajorInterleaved(SIMT_INTERLEAVE) => LayoutKind::ColumnMajor,
            other => other,
        }
    }

    /// Whether a packed `rows x columns` matrix fits this layout without padding.
    pub const fn accepts_extent(&self, rows: u32, columns: u32) -> bool {
        match *self {
            LayoutKind::RowMajor | LayoutKind::ColumnMajor => true,
            LayoutKind::RowMajorInterleaved(interleave) => interleave > 0 && rows % interleave == 0,
            LayoutKind::ColumnMajorInterleaved(interleave) => {
                interleave > 0 && columns % interleave == 0
            }
        }
    }
}

impl Display for LayoutKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LayoutKind::RowMajor => write!(f, "row-major"),
            LayoutKind::ColumnMajor => write!(f, "column-major"),
            LayoutKind::RowMajorInterleaved(interleave) => {
                write!(f, "row-major-interleaved<{interleave}>")
            }
            LayoutKind::ColumnMajorInterleaved(interleave) => {
                write!(f, "column-major-interleaved<{interleave}>")
            }
        }
    }
}
