//! Property tests for map algebra, reduction and discretization

use mite::prelude::*;
use proptest::prelude::*;

/// Binary map of the given shape with cells taken modulo the shape
fn binary_map(name: &str, shape: MapShape, cells: &[(usize, usize)]) -> IntensityMap {
    let mut builder = MapBuilder::new(shape, MapKind::Binary).with_name(name);
    for &(r, c) in cells {
        builder.push(r % shape.rows, c % shape.cols, 1.0).unwrap();
    }
    builder.build()
}

fn class_map(name: &str, shape: MapShape, cells: &[(usize, usize, u8)]) -> IntensityMap {
    let mut builder = MapBuilder::new(shape, MapKind::Classes).with_name(name);
    for &(r, c, class) in cells {
        builder
            .push(r % shape.rows, c % shape.cols, f64::from(class))
            .unwrap();
    }
    builder.build()
}

fn shape_strategy() -> impl Strategy<Value = MapShape> {
    (1usize..24, 1usize..24).prop_map(|(rows, cols)| MapShape::new(rows, cols))
}

fn cells_strategy() -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec((0usize..64, 0usize..64), 0..40)
}

mod property_tests {
    use super::*;

    proptest! {
        /// A presence map intersected with itself is unchanged
        #[test]
        fn test_self_intersection(shape in shape_strategy(), cells in cells_strategy()) {
            let map = binary_map("m", shape, &cells);
            let both = intersection(&map, &map);
            prop_assert_eq!(both.cells(), map.cells());
            prop_assert_eq!(both.shape(), map.shape());
        }

        /// Distance is symmetric and zero against itself
        #[test]
        fn test_distance_symmetry(
            shape_a in shape_strategy(),
            shape_b in shape_strategy(),
            cells_a in cells_strategy(),
            cells_b in cells_strategy(),
        ) {
            let a = binary_map("a", shape_a, &cells_a);
            let b = binary_map("b", shape_b, &cells_b);
            prop_assert_eq!(distance(&a, &b), distance(&b, &a));
            prop_assert_eq!(distance(&a, &a), 0);
            prop_assert!(distance(&a, &b) <= a.nonzero_count() + b.nonzero_count());
        }

        /// Symmetric difference of class maps is the absolute difference per cell
        #[test]
        fn test_symmetric_difference_is_absolute(
            shape in shape_strategy(),
            cells_a in prop::collection::vec((0usize..64, 0usize..64, 1u8..=4), 0..30),
            cells_b in prop::collection::vec((0usize..64, 0usize..64, 1u8..=4), 0..30),
        ) {
            let a = class_map("a", shape, &cells_a);
            let b = class_map("b", shape, &cells_b);
            let sym = symmetric_difference(&a, &b);
            for row in 0..shape.rows {
                for col in 0..shape.cols {
                    let expected = (a.get(row, col).unwrap() - b.get(row, col).unwrap()).abs();
                    prop_assert_eq!(sym.get(row, col).unwrap(), expected);
                }
            }
        }

        /// All-pairs matrix is symmetric with a zero diagonal
        #[test]
        fn test_distance_matrix_symmetric(
            samples in prop::collection::vec((shape_strategy(), cells_strategy()), 1..6),
        ) {
            let maps: Vec<IntensityMap> = samples
                .iter()
                .enumerate()
                .map(|(i, (shape, cells))| binary_map(&format!("s{i}"), *shape, cells))
                .collect();
            let matrix = DistanceMatrix::compute(&maps);
            prop_assert!(matrix.is_symmetric());
            prop_assert_eq!(matrix.comparisons(), maps.len() * (maps.len() - 1) / 2);
            for i in 0..maps.len() {
                prop_assert_eq!(matrix.get(i, i), Some(0));
            }
        }

        /// One reduction step shrinks the grid to the window's reduced shape
        #[test]
        fn test_reduction_shrinks(
            rows in 3usize..40,
            cols in 3usize..40,
            cells in cells_strategy(),
            width in 2usize..3,
            height in 1usize..3,
            fraction in 0.0f64..=1.0,
        ) {
            let shape = MapShape::new(rows, cols);
            let map = binary_map("m", shape, &cells);
            let window = Window::new(width, height);
            let reducer = WindowedReducer::new(
                ReductionConfig::new(window, ReductionRule::threshold(fraction)),
            ).unwrap();

            let reduced = reducer.reduce_once(&map).unwrap();
            prop_assert_eq!(reduced.shape(), window.reduced_shape(shape));
            prop_assert!(reduced.shape().cell_count() < shape.cell_count());
            prop_assert!(reduced.nonzero_count() <= map.nonzero_count());
            prop_assert!(reduced.cells().iter().all(|c| c.value == 1.0));
        }

        /// A looser threshold never removes presence a stricter one keeps
        #[test]
        fn test_threshold_monotone(
            shape in (4usize..30, 4usize..30).prop_map(|(r, c)| MapShape::new(r, c)),
            cells in cells_strategy(),
            low in 0.0f64..=1.0,
            high in 0.0f64..=1.0,
        ) {
            let (low, high) = if low <= high { (low, high) } else { (high, low) };
            let map = binary_map("m", shape, &cells);
            let reduce = |fraction| {
                WindowedReducer::new(
                    ReductionConfig::new(Window::new(2, 2), ReductionRule::threshold(fraction)),
                )
                .unwrap()
                .reduce_once(&map)
                .unwrap()
            };
            let loose = reduce(low);
            let strict = reduce(high);
            for cell in strict.cells() {
                prop_assert_eq!(loose.get(cell.row, cell.col).unwrap(), 1.0);
            }
        }

        /// Quartile classes never decrease as intensity grows
        #[test]
        fn test_quartile_class_monotone(
            values in prop::collection::vec(0.0f64..1e9, 1..200),
            x in 0.0f64..1e9,
            y in 0.0f64..1e9,
        ) {
            let q = Quartiles::from_values(&values).unwrap();
            prop_assert!(q.q1 <= q.q2 && q.q2 <= q.q3);
            let (lo, hi) = if x <= y { (x, y) } else { (y, x) };
            prop_assert!(q.class_of(lo) <= q.class_of(hi));
            prop_assert!((1..=4).contains(&q.class_of(x)));
        }
    }
}
