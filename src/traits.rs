use crate::{HdrVec, HdrVecError, MIN_CAPACITY};
use std::fmt::Debug;

/// Implements fallible collect to `HdrVec`.
pub trait HdrVecIterator: Iterator {
    fn collect_hdrvec(self) -> Result<HdrVec<Self::Item>, HdrVecError> where Self::Item: Copy;

    fn collect_result_hdrvec<I, E>(self) -> Result<HdrVec<I>, E>
        where
            Self: Iterator<Item=Result<I, E>>,
            I: Copy,
            E: From<HdrVecError>;
}

impl<Q: Iterator> HdrVecIterator for Q {
    fn collect_hdrvec(self) -> Result<HdrVec<Self::Item>, HdrVecError> where Self::Item: Copy {
        let (lower, _) = self.size_hint();
        let mut array = HdrVec::with_capacity(lower.max(MIN_CAPACITY))?;
        for item in self {
            array.append(item)?;
        }
        Ok(array)
    }

    fn collect_result_hdrvec<I, E>(self) -> Result<HdrVec<I>, E>
        where
            Self: Iterator<Item=Result<I, E>>,
            I: Copy,
            E: From<HdrVecError>
    {
        let mut array = HdrVec::new();
        for mi in self {
            let i = mi?;
            array.append(i)?;
        }
        Ok(array)
    }
}

impl<T> HdrVec<T> where T: Copy {
    /// Copies the elements into a new buffer. A null handle clones to a null handle.
    pub fn try_clone(&self) -> Result<HdrVec<T>, HdrVecError> {
        let mut cloned = HdrVec::new();
        if !self.is_null() {
            cloned.copy(self, None)?;
        }
        Ok(cloned)
    }
}

/// Panics if the allocation fails, where `try_clone` returns the error instead.
impl<T> Clone for HdrVec<T> where T: Copy {
    fn clone(&self) -> Self {
        self.try_clone().expect("clone HdrVec")
    }
}

impl<T> Debug for HdrVec<T> where T: Copy + Debug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> PartialEq for HdrVec<T> where T: Copy + PartialEq {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice().eq(other.as_slice())
    }
}

impl<T> Eq for HdrVec<T> where T: Copy + Eq {}

impl<T> PartialEq<[T]> for HdrVec<T> where T: Copy + PartialEq {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice().eq(other)
    }
}

impl<T> PartialEq<Vec<T>> for HdrVec<T> where T: Copy + PartialEq {
    fn eq(&self, other: &Vec<T>) -> bool {
        self.as_slice().eq(other.as_slice())
    }
}
