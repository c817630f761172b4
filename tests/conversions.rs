use svtarray::coo::{coo_to_svt, svt_to_coo};
use svtarray::csc::{csc_to_svt, svt_to_csc};
use svtarray::dense::{dense_to_svt, svt_to_dense, Dense};
use svtarray::dim::{Coord, Shape};
use svtarray::subassign::{subassign_lindex, subassign_mindex};
use svtarray::value::{ElementKind, Value};

fn ival(v: i32) -> Value {
    Value::Integer(v)
}

#[test]
fn round_trips_agree_across_all_three_formats() {
    let shape = Shape::new(vec![3, 4]).unwrap();
    let nzindex: Vec<Coord> = vec![1, 3, 2, 3, 1, 1, 3, 4];
    let nzdata = vec![ival(15), ival(25), ival(35), ival(45)];

    let svt = coo_to_svt(shape.clone(), ElementKind::Integer, &nzindex, &nzdata).unwrap();
    let dense = svt_to_dense(&svt).unwrap();
    let svt_from_dense = dense_to_svt(dense).unwrap();
    assert_eq!(svt.nz_count(), svt_from_dense.nz_count());

    let coo = svt_to_coo(&svt).unwrap();
    let svt_from_coo = coo_to_svt(shape, ElementKind::Integer, &coo.nzindex, &coo.nzdata).unwrap();
    assert_eq!(svt.nz_count(), svt_from_coo.nz_count());
}

#[test]
fn csc_round_trip_matches_dense() {
    let shape = Shape::new(vec![4, 3]).unwrap();
    let colptr = vec![0, 1, 1, 3];
    let rowidx = vec![2, 0, 3];
    let x = vec![ival(10), ival(20), ival(30)];

    let svt = csc_to_svt(shape, ElementKind::Integer, &colptr, &rowidx, &x).unwrap();
    let dense = svt_to_dense(&svt).unwrap();
    assert_eq!(dense.data[2], ival(10)); // row 3 (0-based 2), col 1
    assert_eq!(dense.data[8], ival(20)); // row 1, col 3 -> offset 2*4+0
    assert_eq!(dense.data[11], ival(30)); // row 4, col 3 -> offset 2*4+3

    let csc_back = svt_to_csc(&svt).unwrap();
    assert_eq!(csc_back.colptr, colptr);
}

#[test]
fn bulk_subassignment_then_reconversion_is_consistent() {
    let shape = Shape::new(vec![4, 4]).unwrap();
    let empty = svtarray::SparseVectorTree::empty(shape, ElementKind::Double);

    let mindex: Vec<Coord> = vec![1, 2, 3, 4, 1, 2, 3, 4];
    let values = vec![
        Value::Double(1.0),
        Value::Double(2.0),
        Value::Double(3.0),
        Value::Double(4.0),
    ];
    let updated = subassign_mindex(&empty, &mindex, &values).unwrap();
    assert_eq!(updated.nz_count(), 4);

    // overwrite (2,2) to zero via Lindex: linear index for (2,2) in dim
    // [4,4] is (2-1) + (2-1)*4 + 1 = 6.
    let cleared = subassign_lindex(&updated, &[6], &[Value::Double(0.0)]).unwrap();
    assert_eq!(cleared.nz_count(), 3);

    let coo = svt_to_coo(&cleared).unwrap();
    assert_eq!(coo.nrow, 3);
}
