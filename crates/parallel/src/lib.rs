//! Declarative parallel/sequential execution helpers.
//!
//! The monthly clear is a bulk-synchronous sequence of parallel phases with
//! barriers between them: buyer opt-in, choice-set construction, bid-list
//! sorting, top-bid extraction, and the sweep all map or iterate over a
//! collection and join before the next phase starts. Each helper here
//! applies a closure over a collection and, with the `parallel` feature
//! enabled, runs it on rayon's work-stealing pool; the implicit join of the
//! parallel iterator is the phase barrier.
//!
//! The `cfg` logic lives in ONE place so call sites stay clean, and every
//! helper takes a `force_sequential` override for profiling and for tests
//! that want strictly serial execution.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

// =============================================================================
// Slice Operations
// =============================================================================

/// Map a function over a slice, potentially in parallel.
///
/// Results come back in input order (parallel collection preserves order),
/// which the clearing engine relies on for deterministic error selection.
#[inline]
pub fn map_slice<T, F, R>(slice: &[T], f: F, force_sequential: bool) -> Vec<R>
where
    T: Sync,
    F: Fn(&T) -> R + Sync + Send,
    R: Send,
{
    #[cfg(feature = "parallel")]
    {
        if force_sequential {
            slice.iter().map(f).collect()
        } else {
            slice.par_iter().map(f).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    {
        let _ = force_sequential;
        slice.iter().map(f).collect()
    }
}

/// Run a side-effectful closure over a slice, potentially in parallel.
///
/// The closure must be safe to call concurrently; shared state behind it
/// needs its own synchronization (per-element locks in the bid lists).
#[inline]
pub fn for_each_slice<T, F>(slice: &[T], f: F, force_sequential: bool)
where
    T: Sync,
    F: Fn(&T) + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        if force_sequential {
            slice.iter().for_each(f);
        } else {
            slice.par_iter().for_each(f);
        }
    }

    #[cfg(not(feature = "parallel"))]
    {
        let _ = force_sequential;
        slice.iter().for_each(f);
    }
}

// =============================================================================
// Index-based Operations
// =============================================================================

/// Run a closure for each index in `0..len`, potentially in parallel.
///
/// The pattern for per-seller phases where the closure indexes into several
/// parallel structures at once.
#[inline]
pub fn for_each_index<F>(len: usize, f: F, force_sequential: bool)
where
    F: Fn(usize) + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        if force_sequential {
            (0..len).for_each(f);
        } else {
            (0..len).into_par_iter().for_each(f);
        }
    }

    #[cfg(not(feature = "parallel"))]
    {
        let _ = force_sequential;
        (0..len).for_each(f);
    }
}

/// Map over each index in `0..len`, potentially in parallel, preserving
/// index order in the result.
#[inline]
pub fn map_index<F, R>(len: usize, f: F, force_sequential: bool) -> Vec<R>
where
    F: Fn(usize) -> R + Sync + Send,
    R: Send,
{
    #[cfg(feature = "parallel")]
    {
        if force_sequential {
            (0..len).map(f).collect()
        } else {
            (0..len).into_par_iter().map(f).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    {
        let _ = force_sequential;
        (0..len).map(f).collect()
    }
}
