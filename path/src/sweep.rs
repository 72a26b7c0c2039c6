//! Generic interval/rect sweepline driver (component H), used by `Path`
//! self-intersection and `PathVector` pairwise intersection.

/// A bound a sweep can order by: an entry coordinate and an exit
/// coordinate, `entry <= exit`.
pub trait Bound {
    fn entry_value(&self) -> f64;
    fn exit_value(&self) -> f64;
}

impl Bound for geom::Interval {
    fn entry_value(&self) -> f64 {
        self.min()
    }
    fn exit_value(&self) -> f64 {
        self.max()
    }
}

#[derive(Copy, Clone, Debug)]
struct Record<B, I> {
    bound: B,
    item: I,
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum EventKind {
    Entry,
    Exit,
}

struct Event {
    coord: f64,
    index: usize,
    kind: EventKind,
}

/// Drives a sweep over a set of bounded items, invoking `on_enter`/`on_exit`
/// in coordinate order with the documented exit-before-entry tie-break.
pub struct Sweep<B, I> {
    records: Vec<Record<B, I>>,
}

impl<B: Bound + Copy, I> Sweep<B, I> {
    pub fn new() -> Self {
        Sweep { records: Vec::new() }
    }

    pub fn insert(&mut self, bound: B, item: I) {
        self.records.push(Record { bound, item });
    }

    /// Runs the sweep. `on_enter`/`on_exit` receive the just-processed
    /// item's index into insertion order; `active` always reflects the set
    /// of indices whose bound strictly contains the current sweep position
    /// for the duration of the callback.
    pub fn process(mut self, mut on_enter: impl FnMut(usize, &[usize]), mut on_exit: impl FnMut(usize, &[usize])) {
        let mut events: Vec<Event> = Vec::with_capacity(self.records.len() * 2);
        for (i, r) in self.records.iter().enumerate() {
            events.push(Event { coord: r.bound.entry_value(), index: i, kind: EventKind::Entry });
            events.push(Event { coord: r.bound.exit_value(), index: i, kind: EventKind::Exit });
        }
        // Exits before entries at equal coordinates.
        events.sort_by(|a, b| {
            a.coord
                .partial_cmp(&b.coord)
                .unwrap()
                .then_with(|| match (&a.kind, &b.kind) {
                    (EventKind::Exit, EventKind::Entry) => core::cmp::Ordering::Less,
                    (EventKind::Entry, EventKind::Exit) => core::cmp::Ordering::Greater,
                    _ => core::cmp::Ordering::Equal,
                })
        });

        let mut active: Vec<usize> = Vec::new();
        for event in events {
            match event.kind {
                EventKind::Entry => {
                    on_enter(event.index, &active);
                    active.push(event.index);
                }
                EventKind::Exit => {
                    on_exit(event.index, &active);
                    active.retain(|&i| i != event.index);
                }
            }
        }
        debug_assert!(active.is_empty(), "sweepline active list must be empty at the end");
        self.records.clear();
    }

    pub fn items(&self) -> impl Iterator<Item = &I> {
        self.records.iter().map(|r| &r.item)
    }

    pub fn item(&self, index: usize) -> &I {
        &self.records[index].item
    }
}

impl<B: Bound + Copy, I> Default for Sweep<B, I> {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience entry point: sweeps `items`, calling `predicate` for every
/// pair whose bounds are simultaneously active (i.e. the bounds overlap),
/// and collecting the pairs for which it returns `true`. This is the shape
/// `Path`/`PathVector` intersection use: `item_bounds` reduces candidate
/// pairs to those with overlapping bounding boxes before the expensive
/// curve-level intersection test runs.
pub fn sweep_pairs<B: Bound + Copy, I>(bounds: Vec<B>, items: Vec<I>) -> Vec<(usize, usize)> {
    assert_eq!(bounds.len(), items.len());
    let mut sweep: Sweep<B, I> = Sweep::new();
    for (b, i) in bounds.into_iter().zip(items.into_iter()) {
        sweep.insert(b, i);
    }
    let mut pairs = Vec::new();
    sweep.process(
        |entering, active| {
            for &other in active {
                if other < entering {
                    pairs.push((other, entering));
                } else {
                    pairs.push((entering, other));
                }
            }
        },
        |_, _| {},
    );
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use geom::Interval;

    #[test]
    fn active_list_empty_after_process() {
        let mut sweep: Sweep<Interval, usize> = Sweep::new();
        sweep.insert(Interval::new(0.0, 5.0), 0);
        sweep.insert(Interval::new(4.0, 8.0), 1);
        sweep.insert(Interval::new(7.0, 10.0), 2);

        let mut snapshots: Vec<Vec<usize>> = Vec::new();
        sweep.process(
            |entering, active| {
                let mut set: Vec<usize> = active.to_vec();
                set.push(entering);
                set.sort();
                snapshots.push(set);
            },
            |_, _| {},
        );

        assert_eq!(snapshots, vec![vec![0], vec![0, 1], vec![1, 2]]);
    }

    #[test]
    fn seed_scenario_three_rectangles() {
        let bounds = vec![Interval::new(0.0, 5.0), Interval::new(4.0, 8.0), Interval::new(7.0, 10.0)];
        let items = vec![0usize, 1, 2];
        let pairs = sweep_pairs(bounds, items);
        assert_eq!(pairs, vec![(0, 1), (1, 2)]);
    }
}
