/// Index combinations of `choose` out of `len`, in lexicographic order.
///
/// Combinations are produced one at a time, so a search that stops at its
/// first match never enumerates the rest.
pub(crate) fn choose_index_combinations(len: usize, choose: usize) -> IndexCombinations {
    IndexCombinations {
        len,
        indices: (0..choose).collect(),
        started: false,
        done: choose > len,
    }
}

pub(crate) struct IndexCombinations {
    len: usize,
    indices: Vec<usize>,
    started: bool,
    done: bool,
}

impl Iterator for IndexCombinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.indices.clone());
        }

        let choose = self.indices.len();
        // Rightmost index that can still move right.
        let Some(pos) = (0..choose)
            .rev()
            .find(|&i| self.indices[i] < self.len - choose + i)
        else {
            self.done = true;
            return None;
        };
        self.indices[pos] += 1;
        for next in pos + 1..choose {
            self.indices[next] = self.indices[next - 1] + 1;
        }
        Some(self.indices.clone())
    }
}
