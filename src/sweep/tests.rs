use super::*;

#[test]
fn test_parameters_advance_together() {
    let sweep = PartitionSweep::new(SweepKind::Uniform, (2, 3), (6, 9), 2);
    let strategies = sweep.strategies().unwrap();
    assert_eq!(
        strategies,
        vec![
            PartitionStrategy::Uniform {
                row_parts: 2,
                col_parts: 3
            },
            PartitionStrategy::Uniform {
                row_parts: 4,
                col_parts: 5
            },
            PartitionStrategy::Uniform {
                row_parts: 6,
                col_parts: 7
            },
        ]
    );

    let short = PartitionSweep::new(SweepKind::FixedSize, (1, 10), (10, 12), 1);
    assert_eq!(short.strategies().unwrap().len(), 3);
}

#[test]
fn test_zero_step_is_invalid() {
    let sweep = PartitionSweep::new(SweepKind::Uniform, (1, 1), (3, 3), 0);
    assert!(sweep.strategies().is_err());
}

#[test]
fn test_best_result_is_accumulated() {
    let sweep = PartitionSweep::new(SweepKind::Uniform, (1, 1), (4, 4), 1);
    let scores = [0.2, 0.5, 0.4, 0.7];
    let mut scorer = |step: usize, _: &PartitionStrategy, _: &Partition| -> Result<f64, ScoreError> {
        Ok(scores[step - 1])
    };

    let outcome = sweep.run(MapShape::new(8, 8), &mut scorer).unwrap();
    assert_eq!(outcome.iterations, 4);
    let best = outcome.best.as_ref().unwrap();
    assert_eq!(best.step, 4);
    assert_eq!(best.partition.len(), 16);
    let improved: Vec<usize> = outcome.history.iter().map(|s| s.step).collect();
    assert_eq!(improved, vec![1, 2, 4]);
}

#[test]
fn test_ties_keep_the_earlier_partition() {
    let outcome = [1.0, 1.0]
        .iter()
        .enumerate()
        .fold(SweepOutcome::default(), |acc, (i, &score)| {
            acc.record(ScoredPartition {
                step: i + 1,
                score,
                strategy: PartitionStrategy::Whole,
                partition: Partition::generate(MapShape::new(2, 2), PartitionStrategy::Whole).unwrap(),
            })
        });
    assert_eq!(outcome.best.unwrap().step, 1);
    assert_eq!(outcome.iterations, 2);
}

#[test]
fn test_scorer_error_stops_the_sweep() {
    let sweep = PartitionSweep::new(SweepKind::FixedSize, (1, 1), (3, 3), 1);
    let mut calls = 0;
    let mut scorer = |step: usize, _: &PartitionStrategy, _: &Partition| -> Result<f64, ScoreError> {
        calls += 1;
        if step == 2 {
            Err("tree inference failed".into())
        } else {
            Ok(1.0)
        }
    };

    let err = sweep.run(MapShape::new(4, 4), &mut scorer).unwrap_err();
    assert!(matches!(err, SweepError::Scorer { step: 2, .. }));
    assert_eq!(calls, 2);
}

#[test]
fn test_invalid_partition_parameters() {
    let sweep = PartitionSweep::new(SweepKind::FixedSize, (0, 0), (1, 1), 1);
    let mut scorer = |_: usize, _: &PartitionStrategy, _: &Partition| -> Result<f64, ScoreError> { Ok(0.0) };
    assert!(matches!(
        sweep.run(MapShape::new(4, 4), &mut scorer),
        Err(SweepError::Partition(_))
    ));
}
