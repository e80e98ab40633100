//! Maximum-weight matching on general graphs.
//!
//! Primal-dual blossom algorithm (Edmonds) with Galil's O(n^3) bookkeeping.
//! Each stage grows alternating trees from every free vertex, shrinks odd
//! cycles into blossoms, and adjusts the dual variables until it either finds
//! an augmenting path or proves that no augmentation can increase the total
//! weight. Cardinality is not maximized: a lighter, larger matching never
//! beats a heavier, smaller one.
//!
//! Edges are indexed by `k`; edge `k` has endpoints `2k` and `2k + 1`, and an
//! endpoint `p` belongs to vertex `endpoint[p]`. Vertices are `0..n` and
//! non-trivial blossoms reuse the ids `n..2n`.

use std::collections::HashSet;
use thiserror::Error;

/// Failures of the matching engine
///
/// Every variant is a programming error upstream or inside the engine.
#[derive(Debug, Error, PartialEq)]
pub enum MatchingError {
    #[error("self-loop on vertex {0}")]
    SelfLoop(usize),

    #[error("duplicate edge ({0}, {1})")]
    DuplicateEdge(usize, usize),

    #[error("edge ({0}, {1}) has invalid weight {2}")]
    InvalidWeight(usize, usize, f64),

    #[error("edge ({0}, {1}) references a vertex outside 0..{2}")]
    VertexOutOfRange(usize, usize, usize),

    #[error("blossom search did not converge within {0} dual updates")]
    NonConvergence(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Free,
    S,
    T,
    /// Temporary mark left by `scan_blossom`
    Breadcrumb,
}

/// Outcome of a dual-variable update
#[derive(Debug, Clone, Copy)]
enum Delta {
    /// Some vertex dual hit zero: the matching is optimal
    VertexDual,
    /// Edge from an S-vertex to a free vertex became tight
    FreeEdge(usize),
    /// Edge between two S-blossoms became tight
    SEdge(usize),
    /// A T-blossom dual hit zero and must be expanded
    TBlossom(usize),
}

/// Compute a maximum-weight matching
///
/// `edges` are `(u, v, weight)` triples over vertices `0..vertex_count`.
/// Returns the mate of each vertex. Ties between optimal matchings are broken
/// by edge order, so the same input always yields the same matching.
pub fn max_weight_matching(
    vertex_count: usize,
    edges: &[(usize, usize, f64)],
) -> Result<Vec<Option<usize>>, MatchingError> {
    validate(vertex_count, edges)?;

    if edges.is_empty() {
        return Ok(vec![None; vertex_count]);
    }

    let mut state = BlossomState::new(vertex_count, edges);
    state.solve()?;
    Ok(state.mates())
}

fn validate(vertex_count: usize, edges: &[(usize, usize, f64)]) -> Result<(), MatchingError> {
    let mut seen = HashSet::with_capacity(edges.len());
    for &(u, v, w) in edges {
        if u == v {
            return Err(MatchingError::SelfLoop(u));
        }
        if u >= vertex_count || v >= vertex_count {
            return Err(MatchingError::VertexOutOfRange(u, v, vertex_count));
        }
        if !w.is_finite() || w < 0.0 {
            return Err(MatchingError::InvalidWeight(u, v, w));
        }
        if !seen.insert((u.min(v), u.max(v))) {
            return Err(MatchingError::DuplicateEdge(u, v));
        }
    }
    Ok(())
}

/// Index into a rotating child/endpoint list with Python-style negative indices
#[inline]
fn cyclic(list: &[usize], index: isize) -> usize {
    list[index.rem_euclid(list.len() as isize) as usize]
}

struct BlossomState<'a> {
    n: usize,
    edges: &'a [(usize, usize, f64)],
    epsilon: f64,
    endpoint: Vec<usize>,
    /// Remote endpoints of the edges incident to each vertex
    neighbors: Vec<Vec<usize>>,
    /// Remote endpoint of each vertex's matched edge
    mate: Vec<Option<usize>>,
    label: Vec<Label>,
    /// Endpoint through which a top-level blossom got its label
    label_end: Vec<Option<usize>>,
    /// Top-level blossom containing each vertex
    in_blossom: Vec<usize>,
    blossom_parent: Vec<Option<usize>>,
    /// Sub-blossoms in cyclic order, starting at the base
    blossom_children: Vec<Vec<usize>>,
    blossom_base: Vec<Option<usize>>,
    /// Endpoints connecting consecutive children
    blossom_endpoints: Vec<Vec<usize>>,
    /// Least-slack edge to a different S-blossom (or, for free vertices, to any S-vertex)
    best_edge: Vec<Option<usize>>,
    blossom_best_edges: Vec<Option<Vec<usize>>>,
    unused_blossoms: Vec<usize>,
    dual: Vec<f64>,
    allowed: Vec<bool>,
    queue: Vec<usize>,
}

impl<'a> BlossomState<'a> {
    fn new(n: usize, edges: &'a [(usize, usize, f64)]) -> Self {
        let max_weight = edges.iter().map(|e| e.2).fold(0.0_f64, f64::max);

        let mut endpoint = Vec::with_capacity(2 * edges.len());
        let mut neighbors = vec![Vec::new(); n];
        for (k, &(i, j, _)) in edges.iter().enumerate() {
            endpoint.push(i);
            endpoint.push(j);
            neighbors[i].push(2 * k + 1);
            neighbors[j].push(2 * k);
        }

        let mut blossom_base: Vec<Option<usize>> = (0..n).map(Some).collect();
        blossom_base.resize(2 * n, None);

        let mut dual = vec![max_weight; n];
        dual.resize(2 * n, 0.0);

        Self {
            n,
            edges,
            epsilon: 1e-9 * max_weight.max(1.0),
            endpoint,
            neighbors,
            mate: vec![None; n],
            label: vec![Label::Free; 2 * n],
            label_end: vec![None; 2 * n],
            in_blossom: (0..n).collect(),
            blossom_parent: vec![None; 2 * n],
            blossom_children: vec![Vec::new(); 2 * n],
            blossom_base,
            blossom_endpoints: vec![Vec::new(); 2 * n],
            best_edge: vec![None; 2 * n],
            blossom_best_edges: vec![None; 2 * n],
            unused_blossoms: (n..2 * n).collect(),
            dual,
            allowed: vec![false; edges.len()],
            queue: Vec::new(),
        }
    }

    /// Twice the reduced cost of edge `k`; zero means the edge is tight
    #[inline]
    fn slack(&self, k: usize) -> f64 {
        let (i, j, w) = self.edges[k];
        self.dual[i] + self.dual[j] - 2.0 * w
    }

    fn blossom_leaves(&self, b: usize) -> Vec<usize> {
        let mut leaves = Vec::new();
        self.collect_leaves(b, &mut leaves);
        leaves
    }

    fn collect_leaves(&self, b: usize, leaves: &mut Vec<usize>) {
        if b < self.n {
            leaves.push(b);
        } else {
            for &child in &self.blossom_children[b] {
                self.collect_leaves(child, leaves);
            }
        }
    }

    /// Label the top-level blossom of `w` and, for T, the mate on the far side
    fn assign_label(&mut self, w: usize, t: Label, p: Option<usize>) {
        let b = self.in_blossom[w];
        self.label[w] = t;
        self.label[b] = t;
        self.label_end[w] = p;
        self.label_end[b] = p;
        self.best_edge[w] = None;
        self.best_edge[b] = None;

        match t {
            Label::S => {
                let leaves = self.blossom_leaves(b);
                self.queue.extend(leaves);
            }
            Label::T => {
                let base = self.blossom_base[b].expect("labeled blossom has a base");
                let mate = self.mate[base].expect("T-blossom base is matched");
                self.assign_label(self.endpoint[mate], Label::S, Some(mate ^ 1));
            }
            _ => {}
        }
    }

    /// Trace back from `v` and `w` to find a new blossom base, or `None` if
    /// the two trees are distinct and an augmenting path exists
    fn scan_blossom(&mut self, v: usize, w: usize) -> Option<usize> {
        let mut path = Vec::new();
        let mut base = None;
        let (mut v, mut w) = (Some(v), Some(w));

        while let Some(current) = v {
            let b = self.in_blossom[current];
            if self.label[b] == Label::Breadcrumb {
                base = self.blossom_base[b];
                break;
            }
            path.push(b);
            self.label[b] = Label::Breadcrumb;

            v = self.label_end[b].and_then(|p| {
                let bt = self.in_blossom[self.endpoint[p]];
                self.label_end[bt].map(|q| self.endpoint[q])
            });

            if w.is_some() {
                std::mem::swap(&mut v, &mut w);
            }
        }

        for b in path {
            self.label[b] = Label::S;
        }
        base
    }

    /// Shrink the odd cycle closed by edge `k` into a new blossom on `base`
    fn add_blossom(&mut self, base: usize, k: usize) {
        let (v, w, _) = self.edges[k];
        let bb = self.in_blossom[base];
        let mut bv = self.in_blossom[v];
        let mut bw = self.in_blossom[w];

        let b = self
            .unused_blossoms
            .pop()
            .expect("at most n/2 blossoms exist at once");
        self.blossom_base[b] = Some(base);
        self.blossom_parent[b] = None;
        self.blossom_parent[bb] = Some(b);

        let mut path = Vec::new();
        let mut endps = Vec::new();
        while bv != bb {
            self.blossom_parent[bv] = Some(b);
            path.push(bv);
            let p = self.label_end[bv].expect("blossom path is labeled");
            endps.push(p);
            bv = self.in_blossom[self.endpoint[p]];
        }
        path.push(bb);
        path.reverse();
        endps.reverse();
        endps.push(2 * k);
        while bw != bb {
            self.blossom_parent[bw] = Some(b);
            path.push(bw);
            let p = self.label_end[bw].expect("blossom path is labeled");
            endps.push(p ^ 1);
            bw = self.in_blossom[self.endpoint[p]];
        }

        self.label[b] = Label::S;
        self.label_end[b] = self.label_end[bb];
        self.dual[b] = 0.0;
        self.blossom_children[b] = path.clone();
        self.blossom_endpoints[b] = endps;

        for leaf in self.blossom_leaves(b) {
            if self.label[self.in_blossom[leaf]] == Label::T {
                // T-vertices become S-vertices inside the new blossom
                self.queue.push(leaf);
            }
            self.in_blossom[leaf] = b;
        }

        // Least-slack edges from the new blossom to each neighbouring S-blossom
        let mut best_to: Vec<Option<usize>> = vec![None; 2 * self.n];
        for &sub in &path {
            let candidates: Vec<usize> = match self.blossom_best_edges[sub].take() {
                Some(list) => list,
                None => self
                    .blossom_leaves(sub)
                    .into_iter()
                    .flat_map(|leaf| self.neighbors[leaf].iter().map(|p| p / 2))
                    .collect(),
            };

            for k in candidates {
                let (i, j, _) = self.edges[k];
                let j = if self.in_blossom[j] == b { i } else { j };
                let bj = self.in_blossom[j];
                if bj != b
                    && self.label[bj] == Label::S
                    && best_to[bj].map_or(true, |current| self.slack(k) < self.slack(current))
                {
                    best_to[bj] = Some(k);
                }
            }
            self.best_edge[sub] = None;
        }

        let best: Vec<usize> = best_to.into_iter().flatten().collect();
        let mut least = None;
        for &k in &best {
            if least.map_or(true, |current| self.slack(k) < self.slack(current)) {
                least = Some(k);
            }
        }
        self.best_edge[b] = least;
        self.blossom_best_edges[b] = Some(best);
    }

    /// Undo blossom `b`, relabeling its children when expanded mid-stage
    fn expand_blossom(&mut self, b: usize, end_stage: bool) {
        let children = self.blossom_children[b].clone();
        for &s in &children {
            self.blossom_parent[s] = None;
            if s < self.n {
                self.in_blossom[s] = s;
            } else if end_stage && self.dual[s] <= self.epsilon {
                self.expand_blossom(s, end_stage);
            } else {
                for leaf in self.blossom_leaves(s) {
                    self.in_blossom[leaf] = s;
                }
            }
        }

        if !end_stage && self.label[b] == Label::T {
            self.relabel_expanded_t_blossom(b, &children);
        }

        self.label[b] = Label::Free;
        self.label_end[b] = None;
        self.blossom_children[b] = Vec::new();
        self.blossom_endpoints[b] = Vec::new();
        self.blossom_base[b] = None;
        self.blossom_best_edges[b] = None;
        self.best_edge[b] = None;
        self.unused_blossoms.push(b);
    }

    /// Keep the alternating tree intact after expanding a T-blossom: the even
    /// path from the entry child to the base is relabeled T/S, the rest of the
    /// children lose their labels unless reachable from outside
    fn relabel_expanded_t_blossom(&mut self, b: usize, children: &[usize]) {
        let endps = self.blossom_endpoints[b].clone();
        let entry_end = self.label_end[b].expect("T-blossom has a label endpoint");
        let entry_child = self.in_blossom[self.endpoint[entry_end ^ 1]];
        let len = children.len() as isize;

        let mut j = children
            .iter()
            .position(|&c| c == entry_child)
            .expect("entry child belongs to the blossom") as isize;
        let (step, trick): (isize, usize) = if j & 1 == 1 {
            j -= len;
            (1, 0)
        } else {
            (-1, 1)
        };

        let mut p = entry_end;
        while j != 0 {
            self.label[self.endpoint[p ^ 1]] = Label::Free;
            let q = cyclic(&endps, j - trick as isize);
            self.label[self.endpoint[q ^ trick ^ 1]] = Label::Free;
            self.assign_label(self.endpoint[p ^ 1], Label::T, Some(p));
            self.allowed[q / 2] = true;
            j += step;
            p = cyclic(&endps, j - trick as isize) ^ trick;
            self.allowed[p / 2] = true;
            j += step;
        }

        let bv = cyclic(children, j);
        let entry_vertex = self.endpoint[p ^ 1];
        self.label[entry_vertex] = Label::T;
        self.label[bv] = Label::T;
        self.label_end[entry_vertex] = Some(p);
        self.label_end[bv] = Some(p);
        self.best_edge[bv] = None;
        j += step;

        while cyclic(children, j) != entry_child {
            let bv = cyclic(children, j);
            if self.label[bv] == Label::S {
                j += step;
                continue;
            }

            let reached = self
                .blossom_leaves(bv)
                .into_iter()
                .find(|&leaf| self.label[leaf] != Label::Free);
            if let Some(v) = reached {
                self.label[v] = Label::Free;
                let base = self.blossom_base[bv].expect("child blossom has a base");
                let mate = self.mate[base].expect("child base is matched");
                self.label[self.endpoint[mate]] = Label::Free;
                let end = self.label_end[v];
                self.assign_label(v, Label::T, end);
            }
            j += step;
        }
    }

    /// Flip matched/unmatched edges along the even path from `v` to the base of `b`
    fn augment_blossom(&mut self, b: usize, v: usize) {
        let mut t = v;
        while self.blossom_parent[t] != Some(b) {
            t = self.blossom_parent[t].expect("vertex lies inside the blossom");
        }
        if t >= self.n {
            self.augment_blossom(t, v);
        }

        let len = self.blossom_children[b].len() as isize;
        let i = self.blossom_children[b]
            .iter()
            .position(|&c| c == t)
            .expect("sub-blossom belongs to the blossom");
        let mut j = i as isize;
        let (step, trick): (isize, usize) = if i & 1 == 1 {
            j -= len;
            (1, 0)
        } else {
            (-1, 1)
        };

        while j != 0 {
            j += step;
            let t = cyclic(&self.blossom_children[b], j);
            let p = cyclic(&self.blossom_endpoints[b], j - trick as isize) ^ trick;
            if t >= self.n {
                self.augment_blossom(t, self.endpoint[p]);
            }
            j += step;
            let t = cyclic(&self.blossom_children[b], j);
            if t >= self.n {
                self.augment_blossom(t, self.endpoint[p ^ 1]);
            }
            self.mate[self.endpoint[p]] = Some(p ^ 1);
            self.mate[self.endpoint[p ^ 1]] = Some(p);
        }

        // Rotate so the new base comes first
        self.blossom_children[b].rotate_left(i);
        self.blossom_endpoints[b].rotate_left(i);
        let first = self.blossom_children[b][0];
        self.blossom_base[b] = self.blossom_base[first];
    }

    /// Augment along the path through edge `k` connecting two S-trees
    fn augment_matching(&mut self, k: usize) {
        let (v, w, _) = self.edges[k];
        for (start, start_end) in [(v, 2 * k + 1), (w, 2 * k)] {
            let (mut s, mut p) = (start, start_end);
            loop {
                let bs = self.in_blossom[s];
                if bs >= self.n {
                    self.augment_blossom(bs, s);
                }
                self.mate[s] = Some(p);

                let Some(end) = self.label_end[bs] else {
                    // Reached a tree root
                    break;
                };
                let t = self.endpoint[end];
                let bt = self.in_blossom[t];
                let t_end = self.label_end[bt].expect("T-blossom has a label endpoint");
                s = self.endpoint[t_end];
                let j = self.endpoint[t_end ^ 1];
                if bt >= self.n {
                    self.augment_blossom(bt, j);
                }
                self.mate[j] = Some(t_end);
                p = t_end ^ 1;
            }
        }
    }

    /// Scan the neighbours of S-vertex `v`; returns true after an augmentation
    fn scan_vertex(&mut self, v: usize) -> bool {
        for idx in 0..self.neighbors[v].len() {
            let p = self.neighbors[v][idx];
            let k = p / 2;
            let w = self.endpoint[p];
            if self.in_blossom[v] == self.in_blossom[w] {
                continue;
            }

            let mut kslack = 0.0;
            if !self.allowed[k] {
                kslack = self.slack(k);
                if kslack <= self.epsilon {
                    self.allowed[k] = true;
                }
            }

            if self.allowed[k] {
                match self.label[self.in_blossom[w]] {
                    Label::Free => self.assign_label(w, Label::T, Some(p ^ 1)),
                    Label::S => match self.scan_blossom(v, w) {
                        Some(base) => self.add_blossom(base, k),
                        None => {
                            self.augment_matching(k);
                            return true;
                        }
                    },
                    _ => {
                        if self.label[w] == Label::Free {
                            // w sits inside a T-blossom but was not reached yet
                            self.label[w] = Label::T;
                            self.label_end[w] = Some(p ^ 1);
                        }
                    }
                }
            } else if self.label[self.in_blossom[w]] == Label::S {
                let b = self.in_blossom[v];
                if self.best_edge[b].map_or(true, |e| kslack < self.slack(e)) {
                    self.best_edge[b] = Some(k);
                }
            } else if self.label[w] == Label::Free
                && self.best_edge[w].map_or(true, |e| kslack < self.slack(e))
            {
                self.best_edge[w] = Some(k);
            }
        }
        false
    }

    fn compute_delta(&self) -> (f64, Delta) {
        let n = self.n;
        let mut delta = self.dual[..n].iter().copied().fold(f64::INFINITY, f64::min);
        let mut kind = Delta::VertexDual;

        for v in 0..n {
            if self.label[self.in_blossom[v]] == Label::Free {
                if let Some(e) = self.best_edge[v] {
                    let d = self.slack(e);
                    if d < delta {
                        delta = d;
                        kind = Delta::FreeEdge(e);
                    }
                }
            }
        }

        for b in 0..2 * n {
            if self.blossom_parent[b].is_none() && self.label[b] == Label::S {
                if let Some(e) = self.best_edge[b] {
                    let d = self.slack(e) / 2.0;
                    if d < delta {
                        delta = d;
                        kind = Delta::SEdge(e);
                    }
                }
            }
        }

        for b in n..2 * n {
            if self.blossom_base[b].is_some()
                && self.blossom_parent[b].is_none()
                && self.label[b] == Label::T
                && self.dual[b] < delta
            {
                delta = self.dual[b];
                kind = Delta::TBlossom(b);
            }
        }

        (delta, kind)
    }

    fn apply_delta(&mut self, delta: f64) {
        let n = self.n;
        for v in 0..n {
            match self.label[self.in_blossom[v]] {
                Label::S => self.dual[v] -= delta,
                Label::T => self.dual[v] += delta,
                _ => {}
            }
        }
        for b in n..2 * n {
            if self.blossom_base[b].is_some() && self.blossom_parent[b].is_none() {
                match self.label[b] {
                    Label::S => self.dual[b] += delta,
                    Label::T => self.dual[b] -= delta,
                    _ => {}
                }
            }
        }
    }

    fn reset_stage(&mut self) {
        let n = self.n;
        self.label.iter_mut().for_each(|l| *l = Label::Free);
        self.best_edge.iter_mut().for_each(|e| *e = None);
        for entry in &mut self.blossom_best_edges[n..] {
            *entry = None;
        }
        self.allowed.iter_mut().for_each(|a| *a = false);
        self.queue.clear();

        for v in 0..n {
            if self.mate[v].is_none() && self.label[self.in_blossom[v]] == Label::Free {
                self.assign_label(v, Label::S, None);
            }
        }
    }

    fn solve(&mut self) -> Result<(), MatchingError> {
        let n = self.n;
        // Each stage needs O(n) dual updates; anything far beyond that is a bug
        let update_budget = 4 * (n + self.edges.len()) + 16;

        for _stage in 0..n {
            self.reset_stage();

            let mut augmented = false;
            let mut updates = 0;
            loop {
                while let Some(v) = self.queue.pop() {
                    if self.scan_vertex(v) {
                        augmented = true;
                        break;
                    }
                }
                if augmented {
                    break;
                }

                updates += 1;
                if updates > update_budget {
                    return Err(MatchingError::NonConvergence(update_budget));
                }

                let (delta, kind) = self.compute_delta();
                self.apply_delta(delta);

                match kind {
                    Delta::VertexDual => break,
                    Delta::FreeEdge(e) => {
                        self.allowed[e] = true;
                        let (i, j, _) = self.edges[e];
                        let s_vertex = if self.label[self.in_blossom[i]] == Label::Free { j } else { i };
                        self.queue.push(s_vertex);
                    }
                    Delta::SEdge(e) => {
                        self.allowed[e] = true;
                        self.queue.push(self.edges[e].0);
                    }
                    Delta::TBlossom(b) => self.expand_blossom(b, false),
                }
            }

            if !augmented {
                break;
            }

            // Blossoms whose dual dropped to zero are no longer needed
            for b in n..2 * n {
                if self.blossom_parent[b].is_none()
                    && self.blossom_base[b].is_some()
                    && self.label[b] == Label::S
                    && self.dual[b] <= self.epsilon
                {
                    self.expand_blossom(b, true);
                }
            }
        }

        Ok(())
    }

    fn mates(&self) -> Vec<Option<usize>> {
        self.mate
            .iter()
            .map(|m| m.map(|p| self.endpoint[p]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(edges: &[(usize, usize, f64)], mates: &[Option<usize>]) -> f64 {
        edges
            .iter()
            .filter(|(u, v, _)| mates[*u] == Some(*v))
            .map(|e| e.2)
            .sum()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(max_weight_matching(0, &[]).unwrap(), Vec::<Option<usize>>::new());
        assert_eq!(max_weight_matching(3, &[]).unwrap(), vec![None, None, None]);
    }

    #[test]
    fn test_single_edge() {
        assert_eq!(
            max_weight_matching(2, &[(0, 1, 1.0)]).unwrap(),
            vec![Some(1), Some(0)]
        );
    }

    #[test]
    fn test_prefers_weight_over_cardinality() {
        // Path 0-1-2-3: the middle edge alone outweighs both outer edges
        let edges = [(0, 1, 2.0), (1, 2, 10.0), (2, 3, 2.0)];
        let mates = max_weight_matching(4, &edges).unwrap();
        assert_eq!(mates, vec![None, Some(2), Some(1), None]);
    }

    #[test]
    fn test_prefers_two_edges_when_heavier() {
        let edges = [(0, 1, 5.0), (1, 2, 6.0), (2, 3, 5.0)];
        let mates = max_weight_matching(4, &edges).unwrap();
        assert_eq!(mates, vec![Some(1), Some(0), Some(3), Some(2)]);
    }

    #[test]
    fn test_isolated_vertices_stay_unmatched() {
        let mates = max_weight_matching(5, &[(1, 3, 4.0)]).unwrap();
        assert_eq!(mates, vec![None, Some(3), None, Some(1), None]);
    }

    #[test]
    fn test_blossom_creation() {
        // Odd cycle 0-1-2 with a pendant edge forces a blossom
        let edges = [(0, 1, 8.0), (0, 2, 9.0), (1, 2, 10.0), (2, 3, 7.0)];
        let mates = max_weight_matching(4, &edges).unwrap();
        assert_eq!(mates, vec![Some(1), Some(0), Some(3), Some(2)]);
    }

    #[test]
    fn test_blossom_with_stem_augmentation() {
        let edges = [
            (0, 1, 8.0),
            (0, 2, 9.0),
            (1, 2, 10.0),
            (2, 3, 7.0),
            (0, 5, 5.0),
            (3, 4, 6.0),
        ];
        let mates = max_weight_matching(6, &edges).unwrap();
        assert_eq!(total(&edges, &mates), 21.0);
        assert_eq!(mates, vec![Some(5), Some(2), Some(1), Some(4), Some(3), Some(0)]);
    }

    #[test]
    fn test_s_blossom_relabeled_as_t() {
        let edges = [
            (0, 1, 9.0),
            (0, 2, 8.0),
            (1, 2, 10.0),
            (0, 3, 5.0),
            (3, 4, 4.0),
            (0, 5, 3.0),
        ];
        let mates = max_weight_matching(6, &edges).unwrap();
        assert_eq!(mates, vec![Some(5), Some(2), Some(1), Some(4), Some(3), Some(0)]);
    }

    #[test]
    fn test_nested_blossom_expansion() {
        let edges = [
            (0, 1, 8.0),
            (0, 2, 8.0),
            (1, 2, 10.0),
            (1, 3, 12.0),
            (2, 4, 12.0),
            (3, 4, 14.0),
            (3, 5, 12.0),
            (4, 6, 12.0),
            (5, 6, 14.0),
            (6, 7, 12.0),
        ];
        let mates = max_weight_matching(8, &edges).unwrap();
        assert_eq!(
            mates,
            vec![Some(1), Some(0), Some(4), Some(5), Some(2), Some(3), Some(7), Some(6)]
        );
    }

    #[test]
    fn test_nested_blossom_relabeling() {
        let edges = [
            (0, 1, 19.0),
            (0, 2, 20.0),
            (0, 7, 8.0),
            (1, 2, 25.0),
            (1, 3, 18.0),
            (2, 4, 18.0),
            (3, 4, 13.0),
            (3, 6, 7.0),
            (4, 5, 7.0),
        ];
        let mates = max_weight_matching(8, &edges).unwrap();
        assert_eq!(
            mates,
            vec![Some(7), Some(2), Some(1), Some(6), Some(5), Some(4), Some(3), Some(0)]
        );
    }

    #[test]
    fn test_expand_t_blossom_on_augmenting_path() {
        let edges = [
            (0, 1, 45.0),
            (0, 4, 45.0),
            (1, 2, 50.0),
            (2, 3, 45.0),
            (3, 4, 50.0),
            (0, 5, 30.0),
            (2, 8, 35.0),
            (3, 7, 35.0),
            (4, 6, 26.0),
            (8, 9, 5.0),
        ];
        let mates = max_weight_matching(10, &edges).unwrap();
        assert_eq!(total(&edges, &mates), 146.0);
        assert_eq!(
            mates,
            vec![
                Some(5),
                Some(2),
                Some(1),
                Some(7),
                Some(6),
                Some(0),
                Some(4),
                Some(3),
                Some(9),
                Some(8)
            ]
        );
    }

    #[test]
    fn test_fractional_weights() {
        let edges = [(0, 1, 0.1), (1, 2, 0.25), (2, 3, 0.1), (0, 3, 0.2)];
        let mates = max_weight_matching(4, &edges).unwrap();
        assert!((total(&edges, &mates) - 0.45).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_invalid_edges() {
        assert_eq!(
            max_weight_matching(2, &[(1, 1, 3.0)]),
            Err(MatchingError::SelfLoop(1))
        );
        assert_eq!(
            max_weight_matching(2, &[(0, 1, 3.0), (1, 0, 4.0)]),
            Err(MatchingError::DuplicateEdge(1, 0))
        );
        assert!(matches!(
            max_weight_matching(2, &[(0, 1, -3.0)]),
            Err(MatchingError::InvalidWeight(0, 1, _))
        ));
        assert_eq!(
            max_weight_matching(2, &[(0, 2, 3.0)]),
            Err(MatchingError::VertexOutOfRange(0, 2, 2))
        );
    }

    #[test]
    fn test_deterministic_output() {
        let edges = [(0, 1, 4.0), (1, 2, 4.0), (2, 3, 4.0), (3, 0, 4.0)];
        let first = max_weight_matching(4, &edges).unwrap();
        for _ in 0..10 {
            assert_eq!(max_weight_matching(4, &edges).unwrap(), first);
        }
        assert_eq!(total(&edges, &first), 8.0);
    }
}
