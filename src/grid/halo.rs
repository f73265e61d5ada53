//! Ghost-cell synchronization.
//!
//! The residual evaluator calls [`HaloExchange::exchange`] once on the
//! pressure field before reading any neighbour. The exchange is blocking:
//! begin and complete are one call.

use log::trace;

use crate::grid::DistributedField;

/// Refreshes ghost cells of a distributed field from their owners.
///
/// Implementations for message-passing transports live outside this crate.
pub trait HaloExchange: Send + Sync {
    /// Overwrite every ghost cell that has an owner with the owner's value.
    ///
    /// Ghost cells outside every owned region keep their current value.
    fn exchange(&self, field: &mut DistributedField);

    /// Name for logging.
    fn name(&self) -> &'static str;
}

/// In-process exchange between the subvectors of one field.
///
/// Suitable when the whole partition lives in one address space.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalHaloExchange;

impl HaloExchange for LocalHaloExchange {
    fn exchange(&self, field: &mut DistributedField) {
        // Gather first so reads never observe a half-updated field
        let mut updates: Vec<(usize, usize, f64)> = Vec::new();
        for (n, sv) in field.subvectors().iter().enumerate() {
            let owned = field.owned_box(n);
            for cell in sv.data_box().cells().filter(|c| !owned.contains(*c)) {
                let owner = (0..field.len()).find(|&m| m != n && field.owned_box(m).contains(cell));
                if let Some(m) = owner {
                    updates.push((n, sv.index(cell), field.subvector(m).get(cell)));
                }
            }
        }

        trace!(
            "{}: {} ghost values across {} subvectors",
            self.name(),
            updates.len(),
            field.len()
        );

        for (n, idx, value) in updates {
            field.subvector_mut(n).as_mut_slice()[idx] = value;
        }
    }

    fn name(&self) -> &'static str {
        "local halo exchange"
    }
}

/// Exchange that leaves ghosts untouched.
///
/// For single-subgrid partitions whose ghosts are set by the caller.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHaloExchange;

impl HaloExchange for NoHaloExchange {
    fn exchange(&self, _field: &mut DistributedField) {}

    fn name(&self) -> &'static str {
        "no-op halo exchange"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Partition;
    use crate::types::CellIndex;

    #[test]
    fn test_local_exchange_copies_owner_values() {
        let p = Partition::split([4, 1, 1], [1.0; 3], [2, 1, 1]).unwrap();
        let mut f = DistributedField::new(&p, 1);
        for (n, sv) in f.subvectors_mut().iter_mut().enumerate() {
            sv.fill(n as f64 + 1.0);
        }
        LocalHaloExchange.exchange(&mut f);

        // subgrid 0 sees subgrid 1's first cell as its +x ghost
        assert_eq!(f.subvector(0).get(CellIndex::new(2, 0, 0)), 2.0);
        assert_eq!(f.subvector(1).get(CellIndex::new(1, 0, 0)), 1.0);
        // ghosts outside the domain are untouched
        assert_eq!(f.subvector(0).get(CellIndex::new(-1, 0, 0)), 1.0);
        assert_eq!(f.subvector(1).get(CellIndex::new(4, 0, 0)), 2.0);
    }

    #[test]
    fn test_no_exchange_keeps_ghosts() {
        let p = Partition::split([4, 1, 1], [1.0; 3], [2, 1, 1]).unwrap();
        let mut f = DistributedField::new(&p, 1);
        f.subvector_mut(0).fill(1.0);
        f.subvector_mut(1).fill(2.0);
        let before = f.clone();
        NoHaloExchange.exchange(&mut f);

        assert_eq!(f, before);
        // the seam ghost still holds the caller's value, not the owner's
        assert_eq!(f.subvector(0).get(CellIndex::new(2, 0, 0)), 1.0);
        assert_eq!(NoHaloExchange.name(), "no-op halo exchange");
    }

    #[test]
    fn test_surface_exchange() {
        let p = Partition::split([2, 2, 3], [1.0; 3], [1, 2, 1]).unwrap();
        let mut f = DistributedField::new_surface(&p, 1);
        f.subvector_mut(0).fill(5.0);
        f.subvector_mut(1).fill(7.0);
        LocalHaloExchange.exchange(&mut f);
        assert_eq!(f.subvector(0).get(CellIndex::new(0, 1, 0)), 7.0);
        assert_eq!(f.subvector(1).get(CellIndex::new(1, 0, 0)), 5.0);
    }
}
