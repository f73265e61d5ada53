//! Nonlinear residual of the coupled Richards / overland-flow system.
//!
//! One call to [`ResidualAssembler::evaluate`] computes, for a trial
//! pressure, the finite-volume residual a Newton-type solver drives to zero:
//!
//! 1. halo exchange of the pressure
//! 2. density and saturation from the pressure
//! 3. accumulation, compressible storage and source terms
//! 4. Dirichlet ghost injection
//! 5. relative permeability and the interior flux stencil
//! 6. surface discharge on every overland column, shared between subgrids
//! 7. boundary corrections, including overland routing
//! 8. internal boundary corrections and the exterior identity `r = p`
//!
//! Every per-subgrid pass writes only its own subvector. Besides the halo
//! exchange, sharing the surface discharge is the only step that reads
//! another subgrid's data. With the
//! `parallel` feature the passes run on the rayon thread pool.

mod assembler;
mod boundary;
mod config;
mod stencil;
mod terms;

pub use assembler::{ResidualAssembler, ResidualEvaluation, ResidualState};
pub use config::ResidualConfig;

/// Run `f` once per subgrid, in parallel when the `parallel` feature is on.
///
/// `items[n]` holds the mutable data of subgrid `n`; results keep that
/// order.
fn for_each_subgrid<T, R, F>(items: Vec<T>, f: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(usize, T) -> R + Send + Sync,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        items
            .into_par_iter()
            .enumerate()
            .map(|(n, item)| f(n, item))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        items
            .into_iter()
            .enumerate()
            .map(|(n, item)| f(n, item))
            .collect()
    }
}
