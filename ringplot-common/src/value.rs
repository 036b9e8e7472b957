use serde::{Deserialize, Serialize};

/// Per-instance mark attribute: one value shared by every instance, or one
/// value each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ScalarOrArray<T: Clone> {
    Scalar(T),
    Array(Vec<T>),
}

impl<T: Clone> ScalarOrArray<T> {
    /// Values for `len` instances. A scalar repeats, an array is yielded
    /// as stored.
    pub fn iter(&self, len: usize) -> impl Iterator<Item = &T> + '_ {
        let (scalar, repeat, values): (Option<&T>, usize, &[T]) = match self {
            ScalarOrArray::Scalar(value) => (Some(value), len, &[]),
            ScalarOrArray::Array(values) => (None, 0, values),
        };
        std::iter::repeat(scalar)
            .take(repeat)
            .flatten()
            .chain(values.iter())
    }

    pub fn to_vec(&self, len: usize) -> Vec<T> {
        self.iter(len).cloned().collect()
    }

    /// Value of instance `index`, or `None` past the end of an array.
    pub fn get(&self, index: usize) -> Option<&T> {
        match self {
            ScalarOrArray::Scalar(value) => Some(value),
            ScalarOrArray::Array(values) => values.get(index),
        }
    }

    /// Overwrite the value of one instance, splitting a scalar into `len`
    /// copies first. Returns `false` when `index` is out of bounds.
    pub fn set(&mut self, index: usize, len: usize, value: T) -> bool {
        if index >= len {
            return false;
        }
        if let ScalarOrArray::Scalar(scalar) = self {
            *self = ScalarOrArray::Array(vec![scalar.clone(); len]);
        }
        match self {
            ScalarOrArray::Array(values) => values
                .get_mut(index)
                .map(|slot| *slot = value)
                .is_some(),
            ScalarOrArray::Scalar(_) => false,
        }
    }
}

impl<T: Clone> From<Vec<T>> for ScalarOrArray<T> {
    fn from(values: Vec<T>) -> Self {
        ScalarOrArray::Array(values)
    }
}

impl<T: Clone> From<T> for ScalarOrArray<T> {
    fn from(value: T) -> Self {
        ScalarOrArray::Scalar(value)
    }
}
