use formula_grid_filter::{
    CellValue, Condition, DataType, FilterHost, GridId, Operator, TableColumn, TableSource,
};
use pretty_assertions::assert_eq;

fn host(column: TableColumn) -> FilterHost<TableSource> {
    let source = TableSource::new(
        GridId(1),
        vec![column],
        vec![
            vec![CellValue::Number(0.0)],
            vec![CellValue::Number(5.0)],
            vec![CellValue::Blank],
        ],
    )
    .unwrap();
    FilterHost::new(source)
}

fn visible_with(host: &mut FilterHost<TableSource>, condition: Condition) -> Vec<usize> {
    host.edit_condition(0).unwrap().condition1 = condition;
    host.visible_rows()
}

#[test]
fn empty_literal_matches_blank_but_not_zero_in_untyped_column() {
    let mut h = host(TableColumn::new("n"));
    assert_eq!(visible_with(&mut h, Condition::new(Operator::Equals, "")), vec![2]);
    assert_eq!(visible_with(&mut h, Condition::new(Operator::Equals, "0")), vec![0]);
}

#[test]
fn not_equals_zero_hides_zero_and_blank() {
    let mut h = host(TableColumn::new("n"));
    assert_eq!(
        visible_with(&mut h, Condition::new(Operator::NotEquals, "0")),
        vec![1]
    );
}

#[test]
fn typed_numeric_column_never_equates_zero_with_empty_literal() {
    let mut h = host(TableColumn::new("n").with_data_type(DataType::Number));
    assert_eq!(visible_with(&mut h, Condition::new(Operator::Equals, "")), vec![2]);
    assert_eq!(
        visible_with(&mut h, Condition::new(Operator::Equals, 0.0)),
        vec![0]
    );
}

#[test]
fn and_or_toggle_on_monotonic_column() {
    let source = TableSource::new(
        GridId(1),
        vec![TableColumn::new("n")],
        (0..=20).map(|n| vec![CellValue::Number(f64::from(n))]).collect(),
    )
    .unwrap();
    let mut h = FilterHost::new(source);
    {
        let f = h.edit_condition(0).unwrap();
        f.condition1 = Condition::new(Operator::GreaterThan, 10.0);
        f.condition2 = Condition::new(Operator::LessThan, 5.0);
    }
    assert!(h.visible_rows().is_empty());

    h.edit_condition(0).unwrap().combine_with_and = false;
    let expected: Vec<usize> = (0..5).chain(11..=20).collect();
    assert_eq!(h.visible_rows(), expected);
}
