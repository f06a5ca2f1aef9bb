//! Parallel construction of the 5- and 7-card transition tables.
//!
//! The state space is the set of canonical hand prefixes: starting from the
//! empty hand, every legal card leads either to another canonical prefix or,
//! one card short of the full hand, to a terminal packed rank. Workers pull
//! prefixes from a queue and expand their 52 edges; a mutex-protected cache
//! makes sure each canonical prefix becomes exactly one node, whichever
//! worker gets there first. The creator of a node is the only writer of its
//! edges.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;

use crossbeam::channel::{unbounded, Receiver, Sender};
use eval_core::{eval_slow, walk5, CanonicalHand64, Card};

#[derive(Debug, Clone, Copy, Default)]
enum Edge {
    #[default]
    Empty,
    Terminal(u16),
    Next {
        xf: u8,
        node: u32,
    },
}

struct Node {
    edges: [Edge; 52],
}

#[derive(Default)]
struct State {
    cache: HashMap<(u8, u64), u32>,
    nodes: Vec<Node>,
}

enum Work {
    Expand { n: u8, hand: u64, id: u32 },
    Shutdown,
}

struct TreeBuilder<'a> {
    ncards: u8,
    // the finished 5-card table, present when building the 7-card tree
    table5: Option<&'a [u32]>,
    state: Mutex<State>,
    tx: Sender<Work>,
    outstanding: AtomicUsize,
    workers: usize,
}

impl<'a> TreeBuilder<'a> {
    /// Returns the node id for a canonical prefix, creating the node and
    /// queueing its expansion when it is new.
    fn intern(&self, n: u8, hand: u64) -> u32 {
        let id = {
            let mut st = self.state.lock().unwrap();
            if let Some(&id) = st.cache.get(&(n, hand)) {
                return id;
            }
            let id = st.nodes.len() as u32;
            st.cache.insert((n, hand), id);
            st.nodes.push(Node { edges: [Edge::Empty; 52] });
            id
        };
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        self.tx.send(Work::Expand { n, hand, id }).expect("work queue closed early");
        id
    }

    fn run_worker(&self, rx: &Receiver<Work>) {
        while let Ok(work) = rx.recv() {
            match work {
                Work::Shutdown => break,
                Work::Expand { n, hand, id } => {
                    let edges = self.expand(n, hand);
                    self.state.lock().unwrap().nodes[id as usize].edges = edges;
                    if self.outstanding.fetch_sub(1, Ordering::SeqCst) == 1 {
                        for _ in 0..self.workers {
                            self.tx.send(Work::Shutdown).expect("work queue closed early");
                        }
                    }
                }
            }
        }
    }

    fn expand(&self, n: u8, hand: u64) -> [Edge; 52] {
        let mut edges = [Edge::Empty; 52];
        let h = CanonicalHand64(hand);
        for card in Card::ALL {
            let Some(nh) = h.add(usize::from(n), card) else {
                continue;
            };
            let (nhc, xf) = nh.canonical_with_transform(usize::from(n) + 1, usize::from(self.ncards));
            edges[usize::from(card.index())] = if n + 1 == self.ncards {
                Edge::Terminal(self.leaf_rank(nhc))
            } else {
                Edge::Next { xf: xf.to_byte().0, node: self.intern(n + 1, nhc.0) }
            };
        }
        edges
    }

    fn leaf_rank(&self, h: CanonicalHand64) -> u16 {
        match self.table5 {
            None => {
                let cards = h.exemplar(5).cards_n(5);
                eval_slow(&cards).expect("leaf hand evaluates")
            }
            Some(table5) => {
                let cards: [Card; 7] =
                    h.exemplar(7).cards_n(7).try_into().expect("seven-card exemplar");
                eval7_with(table5, &cards)
            }
        }
    }
}

/// Best of the 21 5-card subsets, each ranked through the 5-card table.
fn eval7_with(table5: &[u32], c: &[Card; 7]) -> u16 {
    let mut idx = [4usize, 3, 2, 1, 0];
    let mut best = 0u16;
    loop {
        let h = [c[idx[0]], c[idx[1]], c[idx[2]], c[idx[3]], c[idx[4]]];
        let ev = walk5(table5, &h);
        if ev > best {
            best = ev;
        }
        if idx[0] < 6 {
            idx[0] += 1;
        } else if idx[1] < 5 {
            idx[1] += 1;
            idx[0] = idx[1] + 1;
        } else if idx[2] < 4 {
            idx[2] += 1;
            idx[1] = idx[2] + 1;
            idx[0] = idx[1] + 1;
        } else if idx[3] < 3 {
            idx[3] += 1;
            idx[2] = idx[3] + 1;
            idx[1] = idx[2] + 1;
            idx[0] = idx[1] + 1;
        } else if idx[4] < 2 {
            idx[4] += 1;
            idx[3] = idx[4] + 1;
            idx[2] = idx[3] + 1;
            idx[1] = idx[2] + 1;
            idx[0] = idx[1] + 1;
        } else {
            return best;
        }
    }
}

/// Builds the transition table for hands of `ncards` cards and serialises it
/// to the flat form: entry `node_index * 52 + card` holds either a terminal
/// rank or `(next_node_offset << 8) | transform_byte`, with 0 for
/// unreachable edges.
pub(crate) fn build_tree(ncards: u8, table5: Option<&[u32]>) -> Vec<u32> {
    let workers = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    let (tx, rx) = unbounded();
    let builder = TreeBuilder {
        ncards,
        table5,
        state: Mutex::new(State::default()),
        tx,
        outstanding: AtomicUsize::new(0),
        workers,
    };
    let root = builder.intern(0, 0);
    assert_eq!(root, 0, "root must be the first node");

    crossbeam::scope(|scope| {
        for _ in 0..workers {
            let rx = rx.clone();
            let builder = &builder;
            scope.spawn(move |_| builder.run_worker(&rx));
        }
    })
    .expect("table build worker panicked");

    let state = builder.state.into_inner().unwrap();
    flatten(&state.nodes)
}

/// Assigns breadth-first indices from the root and writes the flat table.
/// Worker scheduling makes creation order nondeterministic, so the layout is
/// fixed by this single-threaded pass.
fn flatten(nodes: &[Node]) -> Vec<u32> {
    let mut order: Vec<u32> = vec![0];
    let mut new_index = vec![u32::MAX; nodes.len()];
    new_index[0] = 0;
    let mut i = 0;
    while i < order.len() {
        for edge in &nodes[order[i] as usize].edges {
            if let Edge::Next { node, .. } = edge {
                if new_index[*node as usize] == u32::MAX {
                    new_index[*node as usize] = order.len() as u32;
                    order.push(*node);
                }
            }
        }
        i += 1;
    }
    assert_eq!(order.len(), nodes.len(), "table build left unreachable nodes");

    let mut table = vec![0u32; nodes.len() * 52];
    for (new_i, &old) in order.iter().enumerate() {
        let base = new_i * 52;
        for (c, edge) in nodes[old as usize].edges.iter().enumerate() {
            table[base + c] = match edge {
                Edge::Empty => 0,
                Edge::Terminal(rank) => u32::from(*rank),
                Edge::Next { xf, node } => {
                    (new_index[*node as usize] * 52) << 8 | u32::from(*xf)
                }
            };
        }
    }
    table
}
