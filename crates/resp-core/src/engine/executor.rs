use rayon::ThreadPool;

/// How QM-bound work is executed.
///
/// The two operations that call out to the quantum-chemistry engine (geometry
/// optimization and per-orientation ESP evaluation) accept a strategy instead
/// of detecting an executor at runtime. Both variants produce identical side
/// effects; `Pool` merely fans independent work units out across the supplied
/// thread pool and joins before any aggregate is read.
#[derive(Clone, Copy)]
pub enum Execution<'a> {
    /// Run on the calling thread, blocking until the work returns.
    Inline,
    /// Run inside the given rayon thread pool.
    Pool(&'a ThreadPool),
}

impl Execution<'_> {
    /// Runs one closure under this strategy.
    pub(crate) fn run<T, F>(&self, work: F) -> T
    where
        F: FnOnce() -> T + Send,
        T: Send,
    {
        match self {
            Execution::Inline => work(),
            Execution::Pool(pool) => pool.install(work),
        }
    }

    pub(crate) fn is_parallel(&self) -> bool {
        matches!(self, Execution::Pool(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_runs_on_the_calling_thread() {
        let caller = std::thread::current().id();
        let ran_on = Execution::Inline.run(|| std::thread::current().id());
        assert_eq!(caller, ran_on);
    }

    #[test]
    fn pool_runs_inside_the_pool() {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap();
        let caller = std::thread::current().id();
        let ran_on = Execution::Pool(&pool).run(|| std::thread::current().id());
        assert_ne!(caller, ran_on);
    }
}
