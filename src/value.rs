//! The seven element kinds and the dynamically-typed value that carries one
//! of them.
//!
//! A `Leaf` is homogeneous in kind (all its `vals` share the SVT's
//! `ElementKind`), but the kind itself is only known at runtime, so values
//! are carried behind a small tagged union rather than a generic parameter.
//! This mirrors the "small trait/interface or per-kind dispatch table"
//! design note: `ElementKind` is the tag, `Value` is the dispatch table's
//! payload.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// The closed set of element kinds an SVT may hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Logical,
    Integer,
    Double,
    Complex,
    Raw,
    Character,
    List,
}

impl ElementKind {
    /// Parses the short tag used at the external boundary (§6).
    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "logical" => ElementKind::Logical,
            "integer" => ElementKind::Integer,
            "double" => ElementKind::Double,
            "complex" => ElementKind::Complex,
            "raw" => ElementKind::Raw,
            "character" => ElementKind::Character,
            "list" => ElementKind::List,
            _ => return None,
        })
    }

    /// The absent/zero value for this kind (§3.1).
    pub fn zero(self) -> Value {
        match self {
            ElementKind::Logical => Value::Logical(false),
            ElementKind::Integer => Value::Integer(0),
            ElementKind::Double => Value::Double(0.0),
            ElementKind::Complex => Value::Complex(0.0, 0.0),
            ElementKind::Raw => Value::Raw(0),
            ElementKind::Character => Value::Character(Rc::from("")),
            ElementKind::List => Value::List(Rc::new(ListSlot::Null)),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ElementKind::Logical => "logical",
            ElementKind::Integer => "integer",
            ElementKind::Double => "double",
            ElementKind::Complex => "complex",
            ElementKind::Raw => "raw",
            ElementKind::Character => "character",
            ElementKind::List => "list",
        };
        f.write_str(s)
    }
}

/// A list element is opaque and carries copy-by-reference semantics (§3.1).
/// `Null` is the list kind's zero/absent slot.
#[derive(Debug)]
pub enum ListSlot {
    Null,
    Elem(Rc<dyn Any>),
}

/// One live value of one of the seven kinds.
#[derive(Clone, Debug)]
pub enum Value {
    Logical(bool),
    Integer(i32),
    Double(f64),
    Complex(f64, f64),
    Raw(u8),
    Character(Rc<str>),
    List(Rc<ListSlot>),
}

impl Value {
    pub fn kind(&self) -> ElementKind {
        match self {
            Value::Logical(_) => ElementKind::Logical,
            Value::Integer(_) => ElementKind::Integer,
            Value::Double(_) => ElementKind::Double,
            Value::Complex(..) => ElementKind::Complex,
            Value::Raw(_) => ElementKind::Raw,
            Value::Character(_) => ElementKind::Character,
            Value::List(_) => ElementKind::List,
        }
    }

    /// The zero-test used to decide leaf membership (§3.2: "presence in a
    /// leaf means non-zero"). Uses the correct predicate per kind, per the
    /// Open Question resolved in DESIGN.md (the original always tested the
    /// integer zero regardless of kind).
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Logical(b) => !b,
            Value::Integer(i) => *i == 0,
            Value::Double(d) => *d == 0.0,
            Value::Complex(re, im) => *re == 0.0 && *im == 0.0,
            Value::Raw(b) => *b == 0,
            Value::Character(s) => s.is_empty(),
            Value::List(slot) => matches!(slot.as_ref(), ListSlot::Null),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Logical(a), Value::Logical(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Complex(ar, ai), Value::Complex(br, bi)) => ar == br && ai == bi,
            (Value::Raw(a), Value::Raw(b)) => a == b,
            (Value::Character(a), Value::Character(b)) => a == b,
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}
