//! `into_par_iter` with or without the `parallel` feature.
//!
//! The compositor only zips slices and consumes them with `for_each`, so the
//! sequential build maps `into_par_iter` onto `into_iter` and lets the
//! standard `Iterator` adapters do the rest.

#[cfg(feature = "parallel")]
pub use rayon::prelude::*;

#[cfg(not(feature = "parallel"))]
pub trait IntoParallelIterator: IntoIterator + Sized {
    fn into_par_iter(self) -> Self::IntoIter {
        self.into_iter()
    }
}

#[cfg(not(feature = "parallel"))]
impl<I: IntoIterator> IntoParallelIterator for I {}
