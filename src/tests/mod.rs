//! Cross tree scenarios and randomized properties

mod scenarios;

use crate::FieldElement;

pub(crate) fn fe(value: u64) -> FieldElement {
    FieldElement::from(value)
}

pub(crate) fn leaves(range: std::ops::Range<u64>) -> Vec<FieldElement> {
    range.map(fe).collect()
}
