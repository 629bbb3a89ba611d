//! Fixed-size batching of fallible sequences.

/// Groups the `Ok` items of an inner iterator into `Vec`s of `size`.
///
/// A full batch is yielded as soon as it fills. When the inner iterator
/// ends, exactly one more batch holding the remainder is yielded, even when
/// that remainder is empty. On an inner error the partially filled batch is
/// discarded, the error is yielded, and the sequence ends.
pub struct Batches<I, T> {
    inner: I,
    size: usize,
    current: Vec<T>,
    done: bool,
}

impl<I, T, E> Batches<I, T>
where
    I: Iterator<Item = Result<T, E>>,
{
    /// Create a batching adaptor. `size` is clamped to at least 1.
    pub fn new(inner: I, size: usize) -> Self {
        let size = size.max(1);
        Self {
            inner,
            size,
            current: Vec::with_capacity(size),
            done: false,
        }
    }
}

impl<I, T, E> Iterator for Batches<I, T>
where
    I: Iterator<Item = Result<T, E>>,
{
    type Item = Result<Vec<T>, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.inner.next() {
                Some(Ok(item)) => {
                    self.current.push(item);
                    if self.current.len() >= self.size {
                        let batch =
                            std::mem::replace(&mut self.current, Vec::with_capacity(self.size));
                        return Some(Ok(batch));
                    }
                }
                Some(Err(e)) => {
                    self.done = true;
                    self.current.clear();
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    return Some(Ok(std::mem::take(&mut self.current)));
                }
            }
        }
    }
}

impl<I, T, E> std::iter::FusedIterator for Batches<I, T> where I: Iterator<Item = Result<T, E>> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(n: usize, size: usize) -> Vec<usize> {
        let items = (0..n).map(Ok::<usize, String>);
        Batches::new(items, size)
            .map(|b| b.unwrap().len())
            .collect()
    }

    #[test]
    fn test_remainder_batch() {
        assert_eq!(sizes(7, 3), vec![3, 3, 1]);
    }

    #[test]
    fn test_exact_multiple_yields_trailing_empty_batch() {
        assert_eq!(sizes(6, 3), vec![3, 3, 0]);
    }

    #[test]
    fn test_empty_input_yields_one_empty_batch() {
        assert_eq!(sizes(0, 3), vec![0]);
    }

    #[test]
    fn test_preserves_order() {
        let batches: Vec<Vec<usize>> = Batches::new((0..5).map(Ok::<usize, String>), 2)
            .map(|b| b.unwrap())
            .collect();
        assert_eq!(batches, vec![vec![0, 1], vec![2, 3], vec![4]]);
    }

    #[test]
    fn test_error_discards_partial_batch_and_ends() {
        let items = vec![Ok(1), Ok(2), Ok(3), Err("boom".to_string()), Ok(4)];
        let out: Vec<_> = Batches::new(items.into_iter(), 2).collect();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], Ok(vec![1, 2]));
        assert_eq!(out[1], Err("boom".to_string()));
    }

    #[test]
    fn test_stops_pulling_when_consumer_stops() {
        let mut pulled = 0;
        let items = std::iter::from_fn(|| {
            pulled += 1;
            Some(Ok::<usize, String>(pulled))
        });
        let first = Batches::new(items, 4).next().unwrap().unwrap();
        assert_eq!(first, vec![1, 2, 3, 4]);
        assert_eq!(pulled, 4);
    }
}
