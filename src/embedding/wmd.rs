// Word mover's distance between two tokenized sentences.
//
// Each sentence becomes a normalized bag of words: every in-vocabulary word
// carries weight count / total. The distance is the cheapest way to move all
// of one sentence's weight onto the other's, where moving a unit of weight
// from word a to word b costs the Euclidean distance between their vectors.
//
// The transport problem is solved exactly as a min-cost flow with successive
// shortest paths. Sentences are short, so the network rarely has more than a
// few dozen nodes. A relaxed lower bound (each word moving all of its weight
// to its nearest counterpart) is checked first so that clearly dissimilar
// pairs skip the exact solve.

use std::collections::HashMap;

use super::vectors::WordVectors;

/// Capacities and path costs below this are treated as zero.
const EPSILON: f64 = 1e-12;

/// Slack so a lower bound that merely ties the cutoff is still solved exactly.
const BOUND_SLACK: f64 = 1e-9;

/// A sentence's in-vocabulary words with their normalized frequencies.
struct Bag<'v> {
    vectors: Vec<&'v [f32]>,
    weights: Vec<f64>,
}

impl<'v> Bag<'v> {
    /// Drop out-of-vocabulary tokens and count the rest in first-seen order.
    fn new(model: &'v WordVectors, tokens: &[String]) -> Self {
        let mut position: HashMap<&str, usize> = HashMap::new();
        let mut vectors = Vec::new();
        let mut counts: Vec<f64> = Vec::new();

        for token in tokens {
            let Some(vector) = model.get(token) else {
                continue;
            };
            match position.get(token.as_str()) {
                Some(&i) => counts[i] += 1.0,
                None => {
                    position.insert(token.as_str(), vectors.len());
                    vectors.push(vector);
                    counts.push(1.0);
                }
            }
        }

        let total: f64 = counts.iter().sum();
        let weights = counts.into_iter().map(|c| c / total).collect();
        Self { vectors, weights }
    }

    fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

/// Word mover's distance between two token lists.
///
/// Returns `f64::INFINITY` when either side has no in-vocabulary tokens.
pub fn word_movers_distance(model: &WordVectors, tokens1: &[String], tokens2: &[String]) -> f64 {
    let (bag1, bag2) = (Bag::new(model, tokens1), Bag::new(model, tokens2));
    if bag1.is_empty() || bag2.is_empty() {
        return f64::INFINITY;
    }

    let cost = cost_matrix(&bag1, &bag2);
    earth_movers(&bag1.weights, &bag2.weights, &cost)
}

/// Word mover's distance, or `None` when it is not below `cutoff`.
///
/// Computes the relaxed lower bound first and only solves the transport
/// problem when the bound leaves room for a match.
pub fn word_movers_distance_below(
    model: &WordVectors,
    tokens1: &[String],
    tokens2: &[String],
    cutoff: f64,
) -> Option<f64> {
    let (bag1, bag2) = (Bag::new(model, tokens1), Bag::new(model, tokens2));
    if bag1.is_empty() || bag2.is_empty() {
        return None;
    }

    let cost = cost_matrix(&bag1, &bag2);
    if relaxed_lower_bound(&bag1.weights, &bag2.weights, &cost) > cutoff + BOUND_SLACK {
        return None;
    }

    let distance = earth_movers(&bag1.weights, &bag2.weights, &cost);
    (distance < cutoff).then_some(distance)
}

/// Row-major `bag1 x bag2` matrix of Euclidean distances.
fn cost_matrix(bag1: &Bag<'_>, bag2: &Bag<'_>) -> Vec<f64> {
    let mut cost = Vec::with_capacity(bag1.vectors.len() * bag2.vectors.len());
    for a in &bag1.vectors {
        for b in &bag2.vectors {
            cost.push(euclidean(a, b));
        }
    }
    cost
}

fn euclidean(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = f64::from(x) - f64::from(y);
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Lower bound on the transport cost: drop one side's capacity constraints
/// and let every unit of weight travel to its nearest word. The tighter of
/// the two directions is returned.
pub fn relaxed_lower_bound(supply: &[f64], demand: &[f64], cost: &[f64]) -> f64 {
    let m = demand.len();

    let forward: f64 = supply
        .iter()
        .enumerate()
        .map(|(i, w)| w * row_min(&cost[i * m..(i + 1) * m]))
        .sum();

    let backward: f64 = demand
        .iter()
        .enumerate()
        .map(|(j, w)| {
            let column_min = (0..supply.len())
                .map(|i| cost[i * m + j])
                .fold(f64::INFINITY, f64::min);
            w * column_min
        })
        .sum();

    forward.max(backward)
}

fn row_min(row: &[f64]) -> f64 {
    row.iter().copied().fold(f64::INFINITY, f64::min)
}

/// Exact earth mover's distance between two weight distributions.
///
/// `cost` is row-major with `supply.len()` rows and `demand.len()` columns.
/// Moves `min(sum(supply), sum(demand))` units of weight at minimum total cost.
pub fn earth_movers(supply: &[f64], demand: &[f64], cost: &[f64]) -> f64 {
    let (n, m) = (supply.len(), demand.len());
    assert_eq!(cost.len(), n * m, "cost matrix must be supply x demand");

    let source = 0;
    let sink = n + m + 1;
    let mut network = FlowNetwork::new(n + m + 2);

    for (i, &w) in supply.iter().enumerate() {
        network.add_edge(source, 1 + i, w, 0.0);
    }
    for i in 0..n {
        for j in 0..m {
            network.add_edge(1 + i, 1 + n + j, f64::INFINITY, cost[i * m + j]);
        }
    }
    for (j, &w) in demand.iter().enumerate() {
        network.add_edge(1 + n + j, sink, w, 0.0);
    }

    let target = supply.iter().sum::<f64>().min(demand.iter().sum());
    let mut flow = 0.0;
    let mut total_cost = 0.0;

    // Every augmentation saturates at least one edge; the cap only guards
    // against floating-point cycling.
    let max_rounds = 4 * (n * m + n + m) + 16;
    for _ in 0..max_rounds {
        let remaining = target - flow;
        if remaining <= EPSILON {
            break;
        }
        let Some(path) = network.shortest_path(source, sink) else {
            break;
        };

        let push = path
            .iter()
            .map(|&(node, edge)| network.adj[node][edge].capacity)
            .fold(remaining, f64::min);
        if push <= EPSILON {
            break;
        }

        for &(node, edge) in &path {
            total_cost += push * network.adj[node][edge].cost;
            network.push(node, edge, push);
        }
        flow += push;
    }

    total_cost.max(0.0)
}

struct Edge {
    to: usize,
    /// Index of the paired reverse edge in `adj[to]`
    rev: usize,
    capacity: f64,
    cost: f64,
}

struct FlowNetwork {
    adj: Vec<Vec<Edge>>,
}

impl FlowNetwork {
    fn new(nodes: usize) -> Self {
        Self {
            adj: (0..nodes).map(|_| Vec::new()).collect(),
        }
    }

    fn add_edge(&mut self, from: usize, to: usize, capacity: f64, cost: f64) {
        let forward_index = self.adj[from].len();
        let reverse_index = self.adj[to].len();
        self.adj[from].push(Edge {
            to,
            rev: reverse_index,
            capacity,
            cost,
        });
        self.adj[to].push(Edge {
            to: from,
            rev: forward_index,
            capacity: 0.0,
            cost: -cost,
        });
    }

    fn push(&mut self, node: usize, edge: usize, amount: f64) {
        let (to, rev) = {
            let e = &mut self.adj[node][edge];
            e.capacity -= amount;
            (e.to, e.rev)
        };
        self.adj[to][rev].capacity += amount;
    }

    /// Cheapest residual path from `source` to `sink` as (node, edge) hops.
    ///
    /// Bellman-Ford, since reverse edges carry negative costs.
    fn shortest_path(&self, source: usize, sink: usize) -> Option<Vec<(usize, usize)>> {
        let nodes = self.adj.len();
        let mut dist = vec![f64::INFINITY; nodes];
        let mut prev: Vec<Option<(usize, usize)>> = vec![None; nodes];
        dist[source] = 0.0;

        for _ in 0..nodes {
            let mut changed = false;
            for u in 0..nodes {
                if !dist[u].is_finite() {
                    continue;
                }
                for (i, e) in self.adj[u].iter().enumerate() {
                    let candidate = dist[u] + e.cost;
                    if e.capacity > EPSILON && candidate < dist[e.to] - EPSILON {
                        dist[e.to] = candidate;
                        prev[e.to] = Some((u, i));
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }

        if !dist[sink].is_finite() {
            return None;
        }

        let mut path = Vec::new();
        let mut node = sink;
        while node != source {
            let hop = prev[node]?;
            path.push(hop);
            node = hop.0;
            if path.len() > nodes {
                return None;
            }
        }
        path.reverse();
        Some(path)
    }
}
