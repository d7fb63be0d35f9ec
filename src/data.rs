//! Turning raw samples into the vectors a network expects.
//!
//! Inputs are kept away from zero, since a zero input wipes out its weight update,
//! and targets stay inside `(0, 1)` where a sigmoid output can actually reach them.

use crate::prelude::*;

/// Scales a byte (e.g. a grayscale pixel) into `[0.01, 1.0]`.
pub fn scale_pixel<T: Element>(value: u8) -> T {
    let scaled = f64::from(value) / 255.0 * 0.98 + 0.01;
    num_traits::cast(scaled).unwrap_or_else(T::one)
}

/// Target vector of `classes` entries: `0.99` at `label`, `0.01` everywhere else.
pub fn one_hot<T: Element>(label: usize, classes: usize) -> Result<Vec<T>> {
    if label >= classes {
        return Err(Error::config(format!(
            "label {label} out of range for {classes} classes"
        )));
    }
    let low: T = num_traits::cast(0.01).unwrap_or_else(T::zero);
    let high: T = num_traits::cast(0.99).unwrap_or_else(T::one);

    let mut target = vec![low; classes];
    target[label] = high;
    Ok(target)
}

/// Index of the first largest element, `None` when empty.
pub fn argmax<T: PartialOrd>(values: &[T]) -> Option<usize> {
    let mut best: Option<(usize, &T)> = None;
    for (i, v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}
