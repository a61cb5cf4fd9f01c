//! Directed edge multiset (implicit pheromone).
//!
//! Counts how often each directed edge `(from, to)` occurs across the
//! permutations of the live population. Sources range over the virtual
//! start node (`None`) and `Some(0..n)`; destinations over `0..n`. Since a
//! permutation visits every node once, each individual contributes at most
//! one edge per source, so no count and no per-source fan-out exceeds the
//! population size `k`.
//!
//! # Storage
//!
//! - [`DenseEdgeMultiset`]: flat `(n + 1) * n` table, O(1) per operation.
//! - [`SparseEdgeMultiset`]: per-source sorted list of at most `k`
//!   `(to, count)` pairs, O(log k + k) per operation, O(n * k) memory.
//!
//! [`EdgeMultiset::new`] picks dense storage whenever the table is small
//! enough to index safely and falls back to sparse storage otherwise.
//!
//! # Reference
//! Guntsch & Middendorf (2002), "A Population Based Approach for ACO"

use tracing::debug;

use crate::error::{PacoError, Result};

/// Dense tables are used while `(n + 1) * n * 2` stays below this.
pub const MAX_DENSE_CELLS: usize = i32::MAX as usize;

/// Largest supported per-edge count bound.
pub const MAX_EDGES_PER_NODE: usize = u32::MAX as usize;

/// Flat-table edge counts.
#[derive(Debug, Clone)]
pub struct DenseEdgeMultiset {
    counts: Vec<u32>,
    n: usize,
    k: u32,
}

impl DenseEdgeMultiset {
    /// Creates an empty multiset over `n` nodes with bound `k`.
    pub fn new(n: usize, k: usize) -> Result<Self> {
        let k = check_bounds(n, k)?;
        let cells = n
            .checked_add(1)
            .and_then(|rows| rows.checked_mul(n))
            .ok_or_else(|| {
                PacoError::invalid_argument(format!("{n} nodes overflow a dense edge table"))
            })?;
        Ok(Self {
            counts: vec![0; cells],
            n,
            k,
        })
    }

    #[inline]
    fn index(&self, from: Option<usize>, to: usize) -> Result<usize> {
        check_edge(self.n, from, to)?;
        Ok(from.map_or(0, |f| f + 1) * self.n + to)
    }

    fn clear(&mut self) {
        self.counts.fill(0);
    }

    fn edge_count(&self, from: Option<usize>, to: usize) -> u32 {
        self.index(from, to).map_or(0, |i| self.counts[i])
    }

    fn add_edge(&mut self, from: Option<usize>, to: usize) -> Result<()> {
        let i = self.index(from, to)?;
        if self.counts[i] >= self.k {
            return Err(overflow(from, to, self.k));
        }
        self.counts[i] += 1;
        Ok(())
    }

    fn remove_edge(&mut self, from: Option<usize>, to: usize) -> Result<()> {
        let i = self.index(from, to)?;
        if self.counts[i] == 0 {
            return Err(underflow(from, to));
        }
        self.counts[i] -= 1;
        Ok(())
    }
}

/// Per-source sorted-list edge counts.
#[derive(Debug, Clone)]
pub struct SparseEdgeMultiset {
    /// `lists[from + 1]` holds `(to, count)` sorted by `to`, all counts > 0.
    lists: Vec<Vec<(usize, u32)>>,
    n: usize,
    k: u32,
}

impl SparseEdgeMultiset {
    /// Creates an empty multiset over `n` nodes with bound `k`.
    pub fn new(n: usize, k: usize) -> Result<Self> {
        let bound = check_bounds(n, k)?;
        Ok(Self {
            lists: (0..=n).map(|_| Vec::with_capacity(k.min(n))).collect(),
            n,
            k: bound,
        })
    }

    fn clear(&mut self) {
        for list in &mut self.lists {
            list.clear();
        }
    }

    fn list(&self, from: Option<usize>) -> &[(usize, u32)] {
        &self.lists[from.map_or(0, |f| f + 1)]
    }

    fn edge_count(&self, from: Option<usize>, to: usize) -> u32 {
        if check_edge(self.n, from, to).is_err() {
            return 0;
        }
        let list = self.list(from);
        list.binary_search_by_key(&to, |&(t, _)| t)
            .map_or(0, |pos| list[pos].1)
    }

    fn add_edge(&mut self, from: Option<usize>, to: usize) -> Result<()> {
        check_edge(self.n, from, to)?;
        let k = self.k;
        let list = &mut self.lists[from.map_or(0, |f| f + 1)];
        match list.binary_search_by_key(&to, |&(t, _)| t) {
            Ok(pos) => {
                if list[pos].1 >= k {
                    return Err(overflow(from, to, k));
                }
                list[pos].1 += 1;
            }
            Err(pos) => {
                if list.len() >= k as usize {
                    return Err(PacoError::invalid_state(format!(
                        "source {} already has {k} distinct successors",
                        fmt_source(from)
                    )));
                }
                list.insert(pos, (to, 1));
            }
        }
        Ok(())
    }

    fn remove_edge(&mut self, from: Option<usize>, to: usize) -> Result<()> {
        check_edge(self.n, from, to)?;
        let list = &mut self.lists[from.map_or(0, |f| f + 1)];
        match list.binary_search_by_key(&to, |&(t, _)| t) {
            Ok(pos) => {
                list[pos].1 -= 1;
                if list[pos].1 == 0 {
                    list.remove(pos);
                }
                Ok(())
            }
            Err(_) => Err(underflow(from, to)),
        }
    }
}

/// Edge multiset with storage chosen by problem size.
#[derive(Debug, Clone)]
pub enum EdgeMultiset {
    /// Flat table.
    Dense(DenseEdgeMultiset),
    /// Sorted per-source lists.
    Sparse(SparseEdgeMultiset),
}

impl EdgeMultiset {
    /// Creates an empty multiset over `n` nodes with per-edge bound `k`,
    /// choosing dense storage when it is safe to index.
    ///
    /// # Errors
    /// `InvalidArgument` if `n <= 1`, `k == 0` or `k` exceeds
    /// [`MAX_EDGES_PER_NODE`].
    pub fn new(n: usize, k: usize) -> Result<Self> {
        Self::with_limit(n, k, MAX_DENSE_CELLS)
    }

    /// Like [`new`](Self::new), with dense storage allowed only below
    /// `limit` cells.
    pub fn with_limit(n: usize, k: usize, limit: usize) -> Result<Self> {
        let multiset = if prefers_dense(n, limit) {
            Self::Dense(DenseEdgeMultiset::new(n, k)?)
        } else {
            Self::Sparse(SparseEdgeMultiset::new(n, k)?)
        };
        debug!(
            nodes = n,
            max_edges_per_node = k,
            dense = multiset.is_dense(),
            "created edge multiset"
        );
        Ok(multiset)
    }

    /// Creates a dense multiset regardless of size.
    pub fn dense(n: usize, k: usize) -> Result<Self> {
        DenseEdgeMultiset::new(n, k).map(Self::Dense)
    }

    /// Creates a sparse multiset regardless of size.
    pub fn sparse(n: usize, k: usize) -> Result<Self> {
        SparseEdgeMultiset::new(n, k).map(Self::Sparse)
    }

    /// Whether the flat-table strategy is in use.
    pub fn is_dense(&self) -> bool {
        matches!(self, Self::Dense(_))
    }

    /// Number of nodes `n`.
    pub fn node_count(&self) -> usize {
        match self {
            Self::Dense(d) => d.n,
            Self::Sparse(s) => s.n,
        }
    }

    /// Per-edge count bound `k`.
    pub fn max_edges_per_node(&self) -> usize {
        match self {
            Self::Dense(d) => d.k as usize,
            Self::Sparse(s) => s.k as usize,
        }
    }

    /// Resets every count to zero.
    pub fn clear(&mut self) {
        match self {
            Self::Dense(d) => d.clear(),
            Self::Sparse(s) => s.clear(),
        }
    }

    /// Current count of `(from, to)`; 0 for edges never added or out of
    /// range.
    pub fn edge_count(&self, from: Option<usize>, to: usize) -> usize {
        let count = match self {
            Self::Dense(d) => d.edge_count(from, to),
            Self::Sparse(s) => s.edge_count(from, to),
        };
        count as usize
    }

    /// Increments the count of `(from, to)`.
    ///
    /// # Errors
    /// `InvalidState` if the count would exceed `k`.
    pub fn add_edge(&mut self, from: Option<usize>, to: usize) -> Result<()> {
        match self {
            Self::Dense(d) => d.add_edge(from, to),
            Self::Sparse(s) => s.add_edge(from, to),
        }
    }

    /// Decrements the count of `(from, to)`.
    ///
    /// # Errors
    /// `InvalidState` if the count is already zero.
    pub fn remove_edge(&mut self, from: Option<usize>, to: usize) -> Result<()> {
        match self {
            Self::Dense(d) => d.remove_edge(from, to),
            Self::Sparse(s) => s.remove_edge(from, to),
        }
    }

    /// Adds every edge of `permutation`, starting from the virtual start
    /// node. On failure no count is changed.
    ///
    /// # Errors
    /// `InvalidState` if any edge would exceed `k`.
    pub fn add_permutation(&mut self, permutation: &[usize]) -> Result<()> {
        for (i, (from, to)) in path(permutation).enumerate() {
            if let Err(e) = self.add_edge(from, to) {
                for (from, to) in path(permutation).take(i) {
                    self.remove_edge(from, to)?;
                }
                return Err(e);
            }
        }
        Ok(())
    }

    /// Removes every edge of `permutation`, starting from the virtual start
    /// node. On failure no count is changed.
    ///
    /// # Errors
    /// `InvalidState` if any edge is not present.
    pub fn remove_permutation(&mut self, permutation: &[usize]) -> Result<()> {
        for (i, (from, to)) in path(permutation).enumerate() {
            if let Err(e) = self.remove_edge(from, to) {
                for (from, to) in path(permutation).take(i) {
                    self.add_edge(from, to)?;
                }
                return Err(e);
            }
        }
        Ok(())
    }
}

/// Whether a dense table over `n` nodes stays below `limit` cells (with the
/// factor 2 headroom on the index range).
pub fn prefers_dense(n: usize, limit: usize) -> bool {
    n.checked_add(1)
        .and_then(|rows| rows.checked_mul(n))
        .and_then(|cells| cells.checked_mul(2))
        .is_some_and(|cells| cells < limit)
}

fn check_bounds(n: usize, k: usize) -> Result<u32> {
    if n <= 1 {
        return Err(PacoError::invalid_argument(format!(
            "node count must be > 1, got {n}"
        )));
    }
    if k == 0 || k > MAX_EDGES_PER_NODE {
        return Err(PacoError::invalid_argument(format!(
            "max edges per node must be in 1..={MAX_EDGES_PER_NODE}, got {k}"
        )));
    }
    Ok(k as u32)
}

#[inline]
fn check_edge(n: usize, from: Option<usize>, to: usize) -> Result<()> {
    if to >= n || from.is_some_and(|f| f >= n) {
        return Err(PacoError::invalid_state(format!(
            "edge ({}, {to}) outside node range 0..{n}",
            fmt_source(from)
        )));
    }
    Ok(())
}

fn overflow(from: Option<usize>, to: usize, k: u32) -> PacoError {
    PacoError::invalid_state(format!(
        "edge ({}, {to}) already occurs {k} times",
        fmt_source(from)
    ))
}

fn underflow(from: Option<usize>, to: usize) -> PacoError {
    PacoError::invalid_state(format!(
        "edge ({}, {to}) has count 0",
        fmt_source(from)
    ))
}

/// Consecutive `(from, to)` pairs of `permutation`, led by the virtual
/// start node.
fn path(permutation: &[usize]) -> impl Iterator<Item = (Option<usize>, usize)> + '_ {
    let sources = std::iter::once(None).chain(permutation.iter().copied().map(Some));
    sources.zip(permutation.iter().copied())
}

fn fmt_source(from: Option<usize>) -> String {
    from.map_or_else(|| "-1".to_string(), |f| f.to_string())
}
