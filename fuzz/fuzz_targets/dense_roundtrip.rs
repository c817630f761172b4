#![no_main]

use libfuzzer_sys::fuzz_target;

use svtarray::dense::{dense_to_svt, svt_to_dense, Dense};
use svtarray::dim::Shape;
use svtarray::value::{ElementKind, Value};

#[derive(arbitrary::Arbitrary, Debug)]
struct Input {
    dim0: u8,
    dim1: u8,
    cells: Vec<i16>,
}

fuzz_target!(|input: Input| {
    let dim0 = (input.dim0 as i64 % 8) + 1;
    let dim1 = (input.dim1 as i64 % 8) + 1;
    let shape = match Shape::new(vec![dim0, dim1]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let total = shape.total_len() as usize;

    let mut data: Vec<Value> = input
        .cells
        .iter()
        .take(total)
        .map(|&v| Value::Integer(v as i32))
        .collect();
    data.resize(total, Value::Integer(0));

    let dense = Dense {
        shape: shape.clone(),
        kind: ElementKind::Integer,
        data: data.clone(),
    };

    let svt = dense_to_svt(dense).expect("buffer length matches shape by construction");
    let back = svt_to_dense(&svt).expect("svt built above always has a valid shape");

    assert_eq!(back.data, data);
});
