//! Fixed-size worker pool running one task per shard index.
//!
//! Each call is a barrier: it returns once every index has run or the first
//! task has failed. The `_mut` variants hand every task exclusive access to
//! its own shard; anything else a task sees is captured read-only.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::Result;

#[derive(Debug, Clone, Copy)]
pub struct ShardExecutor {
    threads: usize,
}

impl ShardExecutor {
    pub fn new(threads: usize) -> Self {
        Self {
            threads: threads.max(1),
        }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    fn pool(&self, shards: usize) -> Result<ThreadPool> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.threads.min(shards).max(1))
            .thread_name(|i| format!("prophasm-shard-{i}"))
            .build()?;
        Ok(pool)
    }

    /// Run `op` once for every index in `0..shards`.
    pub fn for_each<F>(&self, shards: usize, op: F) -> Result<()>
    where
        F: Fn(usize) -> Result<()> + Send + Sync,
    {
        if shards == 0 {
            return Ok(());
        }
        self.pool(shards)?.install(|| {
            (0..shards)
                .into_par_iter()
                .with_max_len(1)
                .try_for_each(|i| op(i))
        })
    }

    /// Run `op` once for every index in `0..shards`, results in index order.
    pub fn map<F, R>(&self, shards: usize, op: F) -> Result<Vec<R>>
    where
        F: Fn(usize) -> Result<R> + Send + Sync,
        R: Send,
    {
        if shards == 0 {
            return Ok(Vec::new());
        }
        self.pool(shards)?.install(|| {
            (0..shards)
                .into_par_iter()
                .with_max_len(1)
                .map(|i| op(i))
                .collect()
        })
    }

    /// Run `op` once on every shard, each task owning its shard.
    pub fn for_each_mut<T, F>(&self, shards: &mut [T], op: F) -> Result<()>
    where
        T: Send,
        F: Fn(usize, &mut T) -> Result<()> + Send + Sync,
    {
        self.map_mut(shards, op).map(|_| ())
    }

    /// Run `op` once on every shard, each task owning its shard; results in
    /// shard order.
    pub fn map_mut<T, F, R>(&self, shards: &mut [T], op: F) -> Result<Vec<R>>
    where
        T: Send,
        F: Fn(usize, &mut T) -> Result<R> + Send + Sync,
        R: Send,
    {
        if shards.is_empty() {
            return Ok(Vec::new());
        }
        self.pool(shards.len())?.install(|| {
            shards
                .par_iter_mut()
                .enumerate()
                .with_max_len(1)
                .map(|(i, shard)| op(i, shard))
                .collect()
        })
    }
}
