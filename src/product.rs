//! Lazy Cartesian product over index ranges
//!
//! Yields every index tuple `[i0, i1, ...]` with `ik < radices[k]`, the last
//! position varying fastest. An empty radix list yields one empty tuple; a
//! zero radix anywhere yields nothing.

#[derive(Debug, Clone)]
pub struct CartesianProduct {
    radices: Vec<usize>,
    cursor: Option<Vec<usize>>,
}

impl CartesianProduct {
    pub fn new(radices: Vec<usize>) -> Self {
        let cursor = if radices.contains(&0) {
            None
        } else {
            Some(vec![0; radices.len()])
        };
        Self { radices, cursor }
    }

    /// Total number of tuples, saturating on overflow
    pub fn total(&self) -> usize {
        self.radices
            .iter()
            .fold(1usize, |total, radix| total.saturating_mul(*radix))
    }
}

impl Iterator for CartesianProduct {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor.take()?;

        let mut successor = current.clone();
        for position in (0..successor.len()).rev() {
            successor[position] += 1;
            if successor[position] < self.radices[position] {
                self.cursor = Some(successor);
                break;
            }
            successor[position] = 0;
        }

        Some(current)
    }
}

impl std::iter::FusedIterator for CartesianProduct {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_position_varies_fastest() {
        let tuples: Vec<Vec<usize>> = CartesianProduct::new(vec![2, 3]).collect();
        assert_eq!(
            tuples,
            vec![
                vec![0, 0],
                vec![0, 1],
                vec![0, 2],
                vec![1, 0],
                vec![1, 1],
                vec![1, 2],
            ]
        );
    }

    #[test]
    fn test_empty_radices_yield_one_empty_tuple() {
        let tuples: Vec<Vec<usize>> = CartesianProduct::new(Vec::new()).collect();
        assert_eq!(tuples, vec![Vec::<usize>::new()]);
    }

    #[test]
    fn test_zero_radix_yields_nothing() {
        let mut product = CartesianProduct::new(vec![3, 0, 2]);
        assert_eq!(product.total(), 0);
        assert_eq!(product.next(), None);
    }

    #[test]
    fn test_total_matches_count() {
        let product = CartesianProduct::new(vec![2, 2, 3]);
        assert_eq!(product.total(), 12);
        assert_eq!(product.count(), 12);
    }
}
