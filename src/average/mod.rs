//! Averaging of several normalized runs of the same experiment.
//!
//! Rows are matched by position. Before any value is averaged, every input
//! must carry exactly the same key columns (node, timestamp) as the first
//! one, row for row.

use crate::error::{Error, Result};
use crate::table::{self, Number, Row};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Check that every table has the key columns of the first one.
///
/// Fails on the first table (1-based `index`) that disagrees.
pub fn check_keys(tables: &[Vec<Row>]) -> Result<()> {
    let Some((first, rest)) = tables.split_first() else {
        return Err(Error::NoInputs);
    };

    for (i, table) in rest.iter().enumerate() {
        if let Some((row, detail)) = first_key_difference(first, table) {
            return Err(Error::SchemaMismatch {
                index: i + 2,
                path: None,
                row,
                detail,
            });
        }
    }

    Ok(())
}

/// 1-based row of the first key difference, with a description.
fn first_key_difference(expected: &[Row], found: &[Row]) -> Option<(usize, String)> {
    for (i, (e, f)) in expected.iter().zip(found).enumerate() {
        if !e.same_key(f) {
            return Some((
                i + 1,
                format!(
                    "expected key ({}, {}), found ({}, {})",
                    e.node, e.timestamp, f.node, f.timestamp
                ),
            ));
        }
    }

    if expected.len() != found.len() {
        return Some((
            expected.len().min(found.len()) + 1,
            format!("{} rows, expected {}", found.len(), expected.len()),
        ));
    }

    None
}

/// Combine runs into one. A single run is returned untouched; otherwise keys
/// are validated and each value becomes the mean across runs, rounded half
/// away from zero.
pub fn average(mut tables: Vec<Vec<Row>>) -> Result<Vec<Row>> {
    match tables.len() {
        0 => return Err(Error::NoInputs),
        1 => return Ok(tables.swap_remove(0)),
        _ => {}
    }

    check_keys(&tables)?;

    let n = tables.len() as f64;
    let first = &tables[0];
    let mut column = Vec::with_capacity(tables.len());
    let mut out = Vec::with_capacity(first.len());

    for (i, row) in first.iter().enumerate() {
        column.clear();
        column.extend(tables.iter().map(|t| t[i].value.as_f64()));
        // Summing in sorted order makes the mean independent of input order.
        column.sort_by(f64::total_cmp);
        let mean = column.iter().sum::<f64>() / n;

        out.push(Row {
            node: row.node.clone(),
            timestamp: row.timestamp,
            value: Number::Int(mean.round() as i64),
        });
    }

    Ok(out)
}

/// Average the runs in `inputs` and write the result to `output`.
///
/// Inputs are only read. On any error nothing is written.
pub fn average_files(inputs: &[PathBuf], output: &Path) -> Result<()> {
    if inputs.is_empty() {
        return Err(Error::NoInputs);
    }
    if is_one_of(output, inputs) {
        return Err(Error::OutputIsInput(output.to_path_buf()));
    }

    let tables = inputs
        .iter()
        .map(|p| table::read_table(p))
        .collect::<Result<Vec<_>>>()?;

    let averaged = average(tables).map_err(|err| match err {
        Error::SchemaMismatch {
            index, row, detail, ..
        } => Error::SchemaMismatch {
            index,
            path: inputs.get(index - 1).cloned(),
            row,
            detail,
        },
        other => other,
    })?;

    table::write_table(output, &averaged)?;
    info!(
        runs = inputs.len(),
        rows = averaged.len(),
        path = %output.display(),
        "wrote averaged run"
    );
    Ok(())
}

fn is_one_of(output: &Path, inputs: &[PathBuf]) -> bool {
    let Ok(output) = fs::canonicalize(output) else {
        // Does not exist yet, so it cannot be an existing input.
        return false;
    };
    inputs
        .iter()
        .filter_map(|p| fs::canonicalize(p).ok())
        .any(|p| p == output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(values: &[(&str, f64, i64)]) -> Vec<Row> {
        values
            .iter()
            .map(|&(node, ts, v)| Row::new(node, Number::Float(ts), Number::Int(v)))
            .collect()
    }

    fn values(rows: &[Row]) -> Vec<Number> {
        rows.iter().map(|r| r.value).collect()
    }

    #[test]
    fn mean_of_three_runs() {
        let a = run(&[("Node1", 0.0, 100), ("Node2", 0.0, 200)]);
        let b = run(&[("Node1", 0.0, 110), ("Node2", 0.0, 210)]);
        let c = run(&[("Node1", 0.0, 90), ("Node2", 0.0, 190)]);

        let out = average(vec![a, b, c]).unwrap();
        assert_eq!(out, run(&[("Node1", 0.0, 100), ("Node2", 0.0, 200)]));
    }

    #[test]
    fn rounds_half_away_from_zero() {
        let a = run(&[("Node1", 0.0, 100), ("Node2", 0.0, -100)]);
        let b = run(&[("Node1", 0.0, 101), ("Node2", 0.0, -101)]);
        let out = average(vec![a, b]).unwrap();
        assert_eq!(values(&out), vec![Number::Int(101), Number::Int(-101)]);

        let a = run(&[("Node1", 0.0, 100)]);
        let b = run(&[("Node1", 0.0, 100)]);
        let c = run(&[("Node1", 0.0, 101)]);
        let out = average(vec![a, b, c]).unwrap();
        assert_eq!(values(&out), vec![Number::Int(100)]);
    }

    #[test]
    fn input_order_does_not_matter() {
        let float_run = |vs: [f64; 2]| {
            vec![
                Row::new("Node1 (a)", Number::Float(0.0), Number::Float(vs[0])),
                Row::new("Node1 (a)", Number::Float(1.0), Number::Float(vs[1])),
            ]
        };
        let a = float_run([0.1, 2.5]);
        let b = float_run([0.2, 0.5]);
        let c = float_run([0.3, 1.0]);

        let abc = average(vec![a.clone(), b.clone(), c.clone()]).unwrap();
        let cab = average(vec![c.clone(), a.clone(), b.clone()]).unwrap();
        let bca = average(vec![b, c, a]).unwrap();
        assert_eq!(abc, cab);
        assert_eq!(abc, bca);
        assert_eq!(values(&abc), vec![Number::Int(0), Number::Int(1)]);
    }

    #[test]
    fn single_run_passes_through_untouched() {
        let rows = vec![
            Row::new("Node1", Number::Float(0.0), Number::Float(123.4)),
            Row::new("Node2", Number::Float(0.0), Number::Int(456)),
        ];
        let out = average(vec![rows.clone()]).unwrap();
        assert!(matches!(out[0].value, Number::Float(v) if v == 123.4));
        assert_eq!(out, rows);
    }

    #[test]
    fn differing_key_cell_is_a_mismatch() {
        let a = run(&[("Node1", 0.0, 1), ("Node2", 0.0, 2)]);
        let b = run(&[("Node1", 0.0, 1), ("Node2", 0.5, 2)]);
        match average(vec![a.clone(), a, b]) {
            Err(Error::SchemaMismatch { index, row, .. }) => {
                assert_eq!(index, 3);
                assert_eq!(row, 2);
            }
            other => panic!("expected schema mismatch, got {other:?}"),
        }
    }

    #[test]
    fn reordered_rows_are_a_mismatch() {
        let a = run(&[("Node1", 0.0, 1), ("Node2", 0.0, 2)]);
        let b = run(&[("Node2", 0.0, 2), ("Node1", 0.0, 1)]);
        assert!(matches!(
            average(vec![a, b]),
            Err(Error::SchemaMismatch { index: 2, row: 1, .. })
        ));
    }

    #[test]
    fn row_count_difference_is_a_mismatch() {
        let a = run(&[("Node1", 0.0, 1), ("Node2", 0.0, 2)]);
        let b = run(&[("Node1", 0.0, 1)]);
        assert!(matches!(
            check_keys(&[a.clone(), b.clone()]),
            Err(Error::SchemaMismatch { index: 2, row: 2, .. })
        ));
        assert!(matches!(
            check_keys(&[b, a]),
            Err(Error::SchemaMismatch { index: 2, row: 2, .. })
        ));
    }

    #[test]
    fn integer_and_float_timestamps_compare_numerically() {
        let a = vec![Row::new("Node1", Number::Int(0), Number::Int(1))];
        let b = vec![Row::new("Node1", Number::Float(0.0), Number::Int(3))];
        assert_eq!(values(&average(vec![a, b]).unwrap()), vec![Number::Int(2)]);
    }

    #[test]
    fn no_tables_is_an_error() {
        assert!(matches!(average(Vec::new()), Err(Error::NoInputs)));
    }

    mod files {
        use super::*;
        use pretty_assertions::assert_eq;
        use std::fs;
        use tempfile::TempDir;

        fn write(dir: &TempDir, name: &str, text: &str) -> PathBuf {
            let path = dir.path().join(name);
            fs::write(&path, text).unwrap();
            path
        }

        #[test]
        fn averages_files() {
            let dir = tempfile::tempdir().unwrap();
            let inputs = vec![
                write(&dir, "r1.csv", "Node1 (v),0.0,100\nNode2 (v),0.0,200\n"),
                write(&dir, "r2.csv", "Node1 (v),0.0,110\nNode2 (v),0.0,210\n"),
                write(&dir, "r3.csv", "Node1 (v),0.0,90\nNode2 (v),0.0,190\n"),
            ];
            let out = dir.path().join("avg.csv");

            average_files(&inputs, &out).unwrap();
            assert_eq!(
                fs::read_to_string(&out).unwrap(),
                "Node1 (v),0.0,100\nNode2 (v),0.0,200\n"
            );
            assert_eq!(
                fs::read_to_string(&inputs[0]).unwrap(),
                "Node1 (v),0.0,100\nNode2 (v),0.0,200\n"
            );
        }

        #[test]
        fn single_file_is_copied_byte_for_byte() {
            let dir = tempfile::tempdir().unwrap();
            let text = "Node1 (v),0.0,123\nNode2 (v),0.5,456\nNode1 (v),1.3333333333333333,7\n";
            let input = write(&dir, "only.csv", text);
            let out = dir.path().join("avg.csv");

            average_files(&[input], &out).unwrap();
            assert_eq!(fs::read_to_string(&out).unwrap(), text);
        }

        #[test]
        fn mismatch_names_the_file_and_writes_nothing() {
            let dir = tempfile::tempdir().unwrap();
            let inputs = vec![
                write(&dir, "r1.csv", "Node1 (v),0.0,1\nNode2 (v),0.0,2\n"),
                write(&dir, "r2.csv", "Node1 (v),0.0,1\nNode3 (v),0.0,2\n"),
            ];
            let out = dir.path().join("avg.csv");

            let err = average_files(&inputs, &out).unwrap_err();
            match &err {
                Error::SchemaMismatch {
                    index, path, row, ..
                } => {
                    assert_eq!(*index, 2);
                    assert_eq!(path.as_ref(), Some(&inputs[1]));
                    assert_eq!(*row, 2);
                }
                other => panic!("expected schema mismatch, got {other:?}"),
            }
            assert!(err.to_string().contains("r2.csv"), "{err}");
            assert!(!out.exists());
        }

        #[test]
        fn missing_value_fails_fast() {
            let dir = tempfile::tempdir().unwrap();
            let inputs = vec![
                write(&dir, "r1.csv", "Node1 (v),0.0,1\n"),
                write(&dir, "r2.csv", "Node1 (v),0.0,\n"),
            ];
            let out = dir.path().join("avg.csv");

            assert!(matches!(
                average_files(&inputs, &out),
                Err(Error::MalformedInput { .. })
            ));
            assert!(!out.exists());
        }

        #[test]
        fn refuses_to_overwrite_an_input() {
            let dir = tempfile::tempdir().unwrap();
            let inputs = vec![
                write(&dir, "r1.csv", "Node1 (v),0.0,1\n"),
                write(&dir, "r2.csv", "Node1 (v),0.0,3\n"),
            ];

            assert!(matches!(
                average_files(&inputs, &inputs[1]),
                Err(Error::OutputIsInput(_))
            ));
            assert_eq!(fs::read_to_string(&inputs[1]).unwrap(), "Node1 (v),0.0,3\n");
        }
    }
}
