//! Parallel iteration when the `parallel` feature is on, plain iteration otherwise.
//!
//! Only the entry point the proximity builder needs (`into_par_iter` on an
//! index range) is shimmed. Downstream adapters (`map`, `collect`) resolve to
//! rayon's or std's depending on which trait is in scope.

#[cfg(feature = "parallel")]
pub use rayon::prelude::*;

#[cfg(not(feature = "parallel"))]
mod sequential {
    /// Stand-in for `rayon::iter::IntoParallelIterator` that yields the
    /// ordinary sequential iterator.
    pub trait IntoParallelIterator {
        type Iter: Iterator<Item = Self::Item>;
        type Item;
        fn into_par_iter(self) -> Self::Iter;
    }

    impl<I: IntoIterator> IntoParallelIterator for I {
        type Iter = I::IntoIter;
        type Item = I::Item;
        fn into_par_iter(self) -> Self::Iter {
            self.into_iter()
        }
    }
}

#[cfg(not(feature = "parallel"))]
pub use sequential::*;
