//! Per-iteration trace hooks.
//!
//! The root finder reports every outer iteration to an [`IterationObserver`]. The solver
//! itself never prints; callers decide whether iterations become log lines, test
//! assertions, or nothing at all.

/// Snapshot of one residual evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationRecord {
    /// 1-based outer iteration index.
    pub index: usize,
    pub z: f64,
    pub c: f64,
    pub s: f64,
    pub y: f64,
    /// Time-of-flight residual F(z).
    pub residual: f64,
    /// dF/dz, `None` on the iteration that met the tolerance.
    pub df_dz: Option<f64>,
}

impl IterationRecord {
    #[inline]
    pub fn converged(&self) -> bool {
        self.df_dz.is_none()
    }
}

/// An iteration spent moving `z` back into the domain where `y(z) ≥ 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainRepair {
    pub index: usize,
    pub rejected_z: f64,
    pub repaired_z: f64,
    pub halvings: usize,
}

/// Receives iteration events from the root finder.
pub trait IterationObserver {
    fn on_iteration(&mut self, record: &IterationRecord);

    fn on_domain_repair(&mut self, _repair: &DomainRepair) {}
}

/// Observer that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl IterationObserver for NoopObserver {
    #[inline]
    fn on_iteration(&mut self, _record: &IterationRecord) {}
}

impl<F> IterationObserver for F
where
    F: FnMut(&IterationRecord),
{
    fn on_iteration(&mut self, record: &IterationRecord) {
        self(record)
    }
}

/// Emits iterations as `tracing` events: every `every`-th iteration and the converging
/// one at DEBUG, domain repairs at TRACE.
#[derive(Debug, Clone, Copy)]
pub struct TracingObserver {
    every: usize,
}

impl TracingObserver {
    pub const DEFAULT_EVERY: usize = 10;

    pub fn new(every: usize) -> Self {
        Self {
            every: every.max(1),
        }
    }

    pub fn every(&self) -> usize {
        self.every
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new(Self::DEFAULT_EVERY)
    }
}

impl IterationObserver for TracingObserver {
    fn on_iteration(&mut self, record: &IterationRecord) {
        if record.converged() || record.index % self.every == 0 {
            tracing::debug!(
                iteration = record.index,
                z = record.z,
                c = record.c,
                s = record.s,
                y = record.y,
                residual = record.residual,
                df_dz = ?record.df_dz,
                converged = record.converged(),
                "lambert iteration"
            );
        }
    }

    fn on_domain_repair(&mut self, repair: &DomainRepair) {
        tracing::trace!(
            iteration = repair.index,
            rejected_z = repair.rejected_z,
            repaired_z = repair.repaired_z,
            halvings = repair.halvings,
            "y(z) < 0, bisected back into the admissible domain"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(index: usize, df_dz: Option<f64>) -> IterationRecord {
        IterationRecord {
            index,
            z: 1.0,
            c: 0.5,
            s: 1.0 / 6.0,
            y: 10.0,
            residual: 1.0,
            df_dz,
        }
    }

    #[test]
    fn closures_are_observers() {
        let mut seen = Vec::new();
        {
            let mut sink = |r: &IterationRecord| seen.push(r.index);
            let observer: &mut dyn IterationObserver = &mut sink;
            observer.on_iteration(&record(1, Some(2.0)));
            observer.on_iteration(&record(2, None));
            observer.on_domain_repair(&DomainRepair {
                index: 3,
                rejected_z: -50.0,
                repaired_z: -25.0,
                halvings: 1,
            });
        }
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn tracing_observer_never_uses_zero_period() {
        assert_eq!(TracingObserver::new(0).every(), 1);
        assert_eq!(TracingObserver::default().every(), 10);
    }

    #[test]
    fn converged_flag_follows_missing_derivative() {
        assert!(record(5, None).converged());
        assert!(!record(5, Some(1.0)).converged());
    }
}
