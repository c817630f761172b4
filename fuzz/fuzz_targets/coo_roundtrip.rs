#![no_main]

use libfuzzer_sys::fuzz_target;

use svtarray::coo::{coo_to_svt, svt_to_coo};
use svtarray::dim::Shape;
use svtarray::value::{ElementKind, Value};

#[derive(arbitrary::Arbitrary, Debug)]
struct Row {
    r: u8,
    c: u8,
    v: i16,
}

#[derive(arbitrary::Arbitrary, Debug)]
struct Input {
    dim0: u8,
    dim1: u8,
    rows: Vec<Row>,
}

fuzz_target!(|input: Input| {
    let dim0 = (input.dim0 as i64 % 6) + 1;
    let dim1 = (input.dim1 as i64 % 6) + 1;
    let shape = match Shape::new(vec![dim0, dim1]) {
        Ok(s) => s,
        Err(_) => return,
    };

    let rows: Vec<&Row> = input
        .rows
        .iter()
        .filter(|r| (r.r as i64 % dim0) + 1 >= 1 && (r.c as i64 % dim1) + 1 >= 1)
        .take(64)
        .collect();
    let k = rows.len();

    let mut nzindex = vec![0i64; k * 2];
    let mut nzdata = Vec::with_capacity(k);
    for (i, row) in rows.iter().enumerate() {
        nzindex[i] = (row.r as i64 % dim0) + 1;
        nzindex[k + i] = (row.c as i64 % dim1) + 1;
        nzdata.push(Value::Integer(row.v as i32));
    }

    let svt = match coo_to_svt(shape.clone(), ElementKind::Integer, &nzindex, &nzdata) {
        Ok(svt) => svt,
        Err(_) => return,
    };

    let coo = svt_to_coo(&svt).expect("svt built above always has a valid shape");
    let svt2 = coo_to_svt(shape, ElementKind::Integer, &coo.nzindex, &coo.nzdata)
        .expect("re-deriving from a valid svt's own coo never fails");

    assert_eq!(svt.nz_count(), svt2.nz_count());
});
