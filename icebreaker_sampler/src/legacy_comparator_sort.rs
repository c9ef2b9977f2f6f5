//! Comparator-driven TimSort used by the legacy shuffle.
//!
//! # Purpose
//! Replays, step for step, what V8's `Array.prototype.sort` does when its
//! comparator is `() => 0.5 - rng()`. The comparator never looks at the
//! elements, so the sort only has to reproduce the engine's sequence of
//! comparator calls and element moves. It therefore permutes indices and
//! leaves the caller's items alone until the end.
//!
//! # Algorithm (V8 TimSort)
//! - `min_run` from the list length (the whole list when shorter than 64)
//! - per run: count the natural run (reversing a descending one), extend it
//!   to `min_run` with binary insertion, push, collapse the run stack
//! - merges trim both runs with gallops, then merge low or high, switching
//!   into galloping mode after `min_gallop` consecutive wins
//! - `min_gallop` starts at 7 and adapts across merges of one sort
//!
//! A comparator call "returns negative" exactly when its draw exceeds 0.5.
//! Every call consumes one draw, so the generator state after the sort also
//! matches the engine.

use crate::mulberry32_seeded_sampler::{next, GeneratorState};

/// Initial `min_gallop` and the win count that keeps a merge galloping.
const MIN_GALLOP_WINS: usize = 7;

/// Sorts the identity permutation `0..len` with the random comparator.
///
/// Returns the resulting index order and the advanced state.
pub(crate) fn sort_indices(len: usize, state: GeneratorState) -> (Vec<usize>, GeneratorState) {
    let mut sort = ComparatorSort {
        work: (0..len).collect(),
        state,
        runs: Vec::new(),
        min_gallop: MIN_GALLOP_WINS,
    };
    sort.run();
    (sort.work, sort.state)
}

/// `n` reduced below 64 by halving, plus one if any shifted-out bit was set.
fn min_run_length(mut n: usize) -> usize {
    let mut r = 0;
    while n >= 64 {
        r |= n & 1;
        n >>= 1;
    }
    n + r
}

struct ComparatorSort {
    work: Vec<usize>,
    state: GeneratorState,
    /// Pending runs as `(base, len)`.
    runs: Vec<(usize, usize)>,
    min_gallop: usize,
}

impl ComparatorSort {
    /// One comparator call: `0.5 - draw < 0`.
    fn less(&mut self) -> bool {
        let (draw, state) = next(self.state);
        self.state = state;
        draw > 0.5
    }

    fn run(&mut self) {
        let len = self.work.len();
        if len < 2 {
            return;
        }

        let min_run = min_run_length(len);
        let mut low = 0;
        let mut remaining = len;
        while remaining != 0 {
            let mut run = self.count_and_make_run(low, low + remaining);
            if run < min_run {
                let forced = min_run.min(remaining);
                self.binary_insertion_sort(low, low + run, low + forced);
                run = forced;
            }
            self.runs.push((low, run));
            self.merge_collapse();
            low += run;
            remaining -= run;
        }
        self.merge_force_collapse();
    }

    /// Length of the natural run starting at `low`; descending runs are
    /// reversed in place.
    fn count_and_make_run(&mut self, low: usize, high: usize) -> usize {
        let first = low + 1;
        if first == high {
            return 1;
        }

        let descending = self.less();
        let mut run = 2;
        for _ in first + 1..high {
            if self.less() != descending {
                break;
            }
            run += 1;
        }
        if descending {
            self.work[low..low + run].reverse();
        }
        run
    }

    /// Inserts `start..high` into the sorted prefix `low..start`.
    fn binary_insertion_sort(&mut self, low: usize, start: usize, high: usize) {
        let start = if low == start { start + 1 } else { start };
        for start in start..high {
            let mut left = low;
            let mut right = start;
            while left < right {
                let mid = left + ((right - left) >> 1);
                if self.less() {
                    right = mid;
                } else {
                    left = mid + 1;
                }
            }
            self.work[left..=start].rotate_right(1);
        }
    }

    fn run_len(&self, i: usize) -> usize {
        self.runs[i].1
    }

    /// `runs[n-2] > runs[n-1] + runs[n]`, trivially true for `n < 2`.
    fn run_invariant_established(&self, n: usize) -> bool {
        if n < 2 {
            return true;
        }
        self.run_len(n - 2) > self.run_len(n - 1) + self.run_len(n)
    }

    fn merge_collapse(&mut self) {
        while self.runs.len() > 1 {
            let mut n = self.runs.len() - 2;
            if !self.run_invariant_established(n + 1) || !self.run_invariant_established(n) {
                if self.run_len(n - 1) < self.run_len(n + 1) {
                    n -= 1;
                }
                self.merge_at(n);
            } else if self.run_len(n) <= self.run_len(n + 1) {
                self.merge_at(n);
            } else {
                break;
            }
        }
    }

    fn merge_force_collapse(&mut self) {
        while self.runs.len() > 1 {
            let mut n = self.runs.len() - 2;
            if n > 0 && self.run_len(n - 1) < self.run_len(n + 1) {
                n -= 1;
            }
            self.merge_at(n);
        }
    }

    /// Merges pending runs `i` and `i + 1`.
    fn merge_at(&mut self, i: usize) {
        let size = self.runs.len();
        let (mut base_a, mut len_a) = self.runs[i];
        let (base_b, len_b) = self.runs[i + 1];

        self.runs[i].1 = len_a + len_b;
        if i + 3 == size {
            self.runs[i + 1] = self.runs[i + 2];
        }
        self.runs.truncate(size - 1);

        // Leading part of A already in place.
        let k = self.gallop_right(len_a, 0);
        base_a += k;
        len_a -= k;
        if len_a == 0 {
            return;
        }

        // Trailing part of B already in place.
        let len_b = self.gallop_left(len_b, len_b - 1);
        if len_b == 0 {
            return;
        }

        if len_a <= len_b {
            self.merge_low(base_a, len_a, base_b, len_b);
        } else {
            self.merge_high(base_a, len_a, base_b, len_b);
        }
    }

    /// Leftmost insertion point search starting at `hint`.
    fn gallop_left(&mut self, length: usize, hint: usize) -> usize {
        let (length, hint) = (length as isize, hint as isize);
        let mut last = 0isize;
        let mut offset = 1isize;

        if self.less() {
            let max = length - hint;
            while offset < max {
                if !self.less() {
                    break;
                }
                last = offset;
                offset = (offset << 1) + 1;
            }
            offset = offset.min(max);
            last += hint;
            offset += hint;
        } else {
            let max = hint + 1;
            while offset < max {
                if self.less() {
                    break;
                }
                last = offset;
                offset = (offset << 1) + 1;
            }
            offset = offset.min(max);
            let tmp = last;
            last = hint - offset;
            offset = hint - tmp;
        }

        last += 1;
        while last < offset {
            let m = last + ((offset - last) >> 1);
            if self.less() {
                last = m + 1;
            } else {
                offset = m;
            }
        }
        offset as usize
    }

    /// Rightmost insertion point search starting at `hint`.
    fn gallop_right(&mut self, length: usize, hint: usize) -> usize {
        let (length, hint) = (length as isize, hint as isize);
        let mut last = 0isize;
        let mut offset = 1isize;

        if self.less() {
            let max = hint + 1;
            while offset < max {
                if !self.less() {
                    break;
                }
                last = offset;
                offset = (offset << 1) + 1;
            }
            offset = offset.min(max);
            let tmp = last;
            last = hint - offset;
            offset = hint - tmp;
        } else {
            let max = length - hint;
            while offset < max {
                if self.less() {
                    break;
                }
                last = offset;
                offset = (offset << 1) + 1;
            }
            offset = offset.min(max);
            last += hint;
            offset += hint;
        }

        last += 1;
        while last < offset {
            let m = last + ((offset - last) >> 1);
            if self.less() {
                offset = m;
            } else {
                last = m + 1;
            }
        }
        offset as usize
    }

    /// Forward merge; run A (the shorter) is copied out.
    fn merge_low(&mut self, base_a: usize, mut len_a: usize, base_b: usize, mut len_b: usize) {
        let tmp = self.work[base_a..base_a + len_a].to_vec();
        let mut dest = base_a;
        let mut cursor_tmp = 0;
        let mut cursor_b = base_b;

        self.work[dest] = self.work[cursor_b];
        dest += 1;
        cursor_b += 1;

        // true: A is down to its last element, which goes after all of B
        let copy_b = 'merge: {
            len_b -= 1;
            if len_b == 0 {
                break 'merge false;
            }
            if len_a == 1 {
                break 'merge true;
            }

            loop {
                let mut wins_a = 0;
                let mut wins_b = 0;

                loop {
                    if self.less() {
                        self.work[dest] = self.work[cursor_b];
                        dest += 1;
                        cursor_b += 1;
                        wins_b += 1;
                        len_b -= 1;
                        wins_a = 0;
                        if len_b == 0 {
                            break 'merge false;
                        }
                        if wins_b >= self.min_gallop {
                            break;
                        }
                    } else {
                        self.work[dest] = tmp[cursor_tmp];
                        dest += 1;
                        cursor_tmp += 1;
                        wins_a += 1;
                        len_a -= 1;
                        wins_b = 0;
                        if len_a == 1 {
                            break 'merge true;
                        }
                        if wins_a >= self.min_gallop {
                            break;
                        }
                    }
                }

                self.min_gallop += 1;
                let mut first = true;
                while wins_a >= MIN_GALLOP_WINS || wins_b >= MIN_GALLOP_WINS || first {
                    first = false;
                    self.min_gallop = self.min_gallop.saturating_sub(1).max(1);

                    wins_a = self.gallop_right(len_a, 0);
                    if wins_a > 0 {
                        self.work[dest..dest + wins_a]
                            .copy_from_slice(&tmp[cursor_tmp..cursor_tmp + wins_a]);
                        dest += wins_a;
                        cursor_tmp += wins_a;
                        len_a -= wins_a;
                        if len_a == 1 {
                            break 'merge true;
                        }
                        if len_a == 0 {
                            break 'merge false;
                        }
                    }
                    self.work[dest] = self.work[cursor_b];
                    dest += 1;
                    cursor_b += 1;
                    len_b -= 1;
                    if len_b == 0 {
                        break 'merge false;
                    }

                    wins_b = self.gallop_left(len_b, 0);
                    if wins_b > 0 {
                        self.work.copy_within(cursor_b..cursor_b + wins_b, dest);
                        dest += wins_b;
                        cursor_b += wins_b;
                        len_b -= wins_b;
                        if len_b == 0 {
                            break 'merge false;
                        }
                    }
                    self.work[dest] = tmp[cursor_tmp];
                    dest += 1;
                    cursor_tmp += 1;
                    len_a -= 1;
                    if len_a == 1 {
                        break 'merge true;
                    }
                }
                self.min_gallop += 1;
            }
        };

        if copy_b {
            self.work.copy_within(cursor_b..cursor_b + len_b, dest);
            self.work[dest + len_b] = tmp[cursor_tmp];
        } else if len_a > 0 {
            self.work[dest..dest + len_a].copy_from_slice(&tmp[cursor_tmp..cursor_tmp + len_a]);
        }
    }

    /// Backward merge; run B (the shorter) is copied out.
    fn merge_high(&mut self, base_a: usize, mut len_a: usize, base_b: usize, mut len_b: usize) {
        let tmp = self.work[base_b..base_b + len_b].to_vec();
        // Cursors walk downward and may step one below zero on the way out.
        let mut dest = (base_b + len_b - 1) as isize;
        let mut cursor_tmp = len_b as isize - 1;
        let mut cursor_a = (base_a + len_a - 1) as isize;

        self.work[dest as usize] = self.work[cursor_a as usize];
        dest -= 1;
        cursor_a -= 1;

        // true: B is down to its first element, which goes before all of A
        let copy_a = 'merge: {
            len_a -= 1;
            if len_a == 0 {
                break 'merge false;
            }
            if len_b == 1 {
                break 'merge true;
            }

            loop {
                let mut wins_a = 0;
                let mut wins_b = 0;

                loop {
                    if self.less() {
                        self.work[dest as usize] = self.work[cursor_a as usize];
                        dest -= 1;
                        cursor_a -= 1;
                        wins_a += 1;
                        len_a -= 1;
                        wins_b = 0;
                        if len_a == 0 {
                            break 'merge false;
                        }
                        if wins_a >= self.min_gallop {
                            break;
                        }
                    } else {
                        self.work[dest as usize] = tmp[cursor_tmp as usize];
                        dest -= 1;
                        cursor_tmp -= 1;
                        wins_b += 1;
                        len_b -= 1;
                        wins_a = 0;
                        if len_b == 1 {
                            break 'merge true;
                        }
                        if wins_b >= self.min_gallop {
                            break;
                        }
                    }
                }

                self.min_gallop += 1;
                let mut first = true;
                while wins_a >= MIN_GALLOP_WINS || wins_b >= MIN_GALLOP_WINS || first {
                    first = false;
                    self.min_gallop = self.min_gallop.saturating_sub(1).max(1);

                    let k = self.gallop_right(len_a, len_a - 1);
                    wins_a = len_a - k;
                    if wins_a > 0 {
                        dest -= wins_a as isize;
                        cursor_a -= wins_a as isize;
                        let from = (cursor_a + 1) as usize;
                        self.work.copy_within(from..from + wins_a, (dest + 1) as usize);
                        len_a -= wins_a;
                        if len_a == 0 {
                            break 'merge false;
                        }
                    }
                    self.work[dest as usize] = tmp[cursor_tmp as usize];
                    dest -= 1;
                    cursor_tmp -= 1;
                    len_b -= 1;
                    if len_b == 1 {
                        break 'merge true;
                    }

                    let k = self.gallop_left(len_b, len_b - 1);
                    wins_b = len_b - k;
                    if wins_b > 0 {
                        dest -= wins_b as isize;
                        cursor_tmp -= wins_b as isize;
                        let from = (cursor_tmp + 1) as usize;
                        let to = (dest + 1) as usize;
                        self.work[to..to + wins_b].copy_from_slice(&tmp[from..from + wins_b]);
                        len_b -= wins_b;
                        if len_b == 1 {
                            break 'merge true;
                        }
                        if len_b == 0 {
                            break 'merge false;
                        }
                    }
                    self.work[dest as usize] = self.work[cursor_a as usize];
                    dest -= 1;
                    cursor_a -= 1;
                    len_a -= 1;
                    if len_a == 0 {
                        break 'merge false;
                    }
                }
                self.min_gallop += 1;
            }
        };

        if copy_a {
            dest -= len_a as isize;
            cursor_a -= len_a as isize;
            let from = (cursor_a + 1) as usize;
            self.work.copy_within(from..from + len_a, (dest + 1) as usize);
            self.work[dest as usize] = tmp[cursor_tmp as usize];
        } else if len_b > 0 {
            let to = (dest - (len_b as isize - 1)) as usize;
            self.work[to..to + len_b].copy_from_slice(&tmp[..len_b]);
        }
    }
}
