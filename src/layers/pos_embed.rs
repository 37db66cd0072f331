use burn::prelude::*;
use ndarray::Array2;

/// Fixed 2-D sinusoidal positional table of shape (1, rows * cols, dim).
///
/// The first half of the channels encodes the column coordinate and the
/// second half the row coordinate; within each half the channels split
/// into a sin bank and a cos bank sharing geometric frequencies. Rows are
/// laid out to match a row-major patch flattening.
pub fn sincos_pos_embed_2d<B: Backend>(
    dim: usize,
    grid: (usize, usize),
    device: &B::Device,
) -> Tensor<B, 3> {
    let (rows, cols) = grid;
    let table = sincos_table(dim, rows, cols);

    let (data, _) = table.into_raw_vec_and_offset();
    Tensor::<B, 1>::from_floats(data.as_slice(), device).reshape([1, rows * cols, dim])
}

fn sincos_table(dim: usize, rows: usize, cols: usize) -> Array2<f32> {
    assert!(
        dim % 4 == 0,
        "sinusoidal embedding dimension must be divisible by 4, got {dim}"
    );
    let quarter = dim / 4;

    Array2::from_shape_fn((rows * cols, dim), |(patch, channel)| {
        let position = if channel < 2 * quarter {
            (patch % cols) as f32
        } else {
            (patch / cols) as f32
        };

        let bank = channel % (2 * quarter);
        let frequency = 1.0 / 10_000f32.powf((bank % quarter) as f32 / quarter as f32);
        let angle = position * frequency;

        if bank < quarter {
            angle.sin()
        } else {
            angle.cos()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "backend_ndarray")]
    type NdArrayBackend = burn::backend::NdArray<f32>;

    #[test]
    fn origin_patch_is_all_sin_zero_cos_one() {
        let table = sincos_table(16, 4, 4);

        for quarter in 0..4 {
            for k in 0..4 {
                let value = table[[0, quarter * 4 + k]];
                let expected = if quarter % 2 == 0 { 0.0 } else { 1.0 };
                assert_eq!(value, expected);
            }
        }
    }

    #[test]
    fn table_is_deterministic() {
        assert_eq!(sincos_table(32, 3, 5), sincos_table(32, 3, 5));
    }

    #[test]
    fn column_coordinate_fills_first_half() {
        let table = sincos_table(16, 2, 3);

        // patches 0 and 3 share a column, so their first halves agree
        for channel in 0..8 {
            assert_eq!(table[[0, channel]], table[[3, channel]]);
        }
        // ... and patches 0 and 1 share a row, so their second halves agree
        for channel in 8..16 {
            assert_eq!(table[[0, channel]], table[[1, channel]]);
        }
    }

    #[test]
    #[should_panic(expected = "divisible by 4")]
    fn rejects_unaligned_dimension() {
        sincos_table(18, 4, 4);
    }

    #[test]
    #[cfg(feature = "backend_ndarray")]
    fn tensor_shape_matches_grid() {
        let device = Default::default();
        let embedding = sincos_pos_embed_2d::<NdArrayBackend>(64, (4, 8), &device);
        assert_eq!(embedding.dims(), [1, 32, 64]);
    }
}
