//! Memoizing, forward-only sequences.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::CalendarError;

type Producer<T, E> = Box<dyn Iterator<Item = Result<T, E>>>;

struct Inner<T, E> {
    producer: Option<Producer<T, E>>,
    cache: Vec<Rc<T>>,
    failure: Option<E>,
}

/// An indexable view over a lazily evaluated producer.
///
/// Items are generated in order, at most once each, and kept for the life of
/// the sequence. Once the producer fails, every position past the cached ones
/// reports the same error. Not thread-safe.
pub struct LazySeq<T, E = CalendarError> {
    inner: RefCell<Inner<T, E>>,
}

impl<T, E: Clone> LazySeq<T, E> {
    pub fn new<I>(producer: I) -> LazySeq<T, E>
    where
        I: Iterator<Item = Result<T, E>> + 'static,
    {
        LazySeq {
            inner: RefCell::new(Inner {
                producer: Some(Box::new(producer)),
                cache: Vec::new(),
                failure: None,
            }),
        }
    }

    /// The item at `index`, generating any missing items before it.
    ///
    /// `Ok(None)` means the producer ran out before reaching `index`.
    pub fn get(&self, index: usize) -> Result<Option<Rc<T>>, E> {
        let mut inner = self.inner.borrow_mut();
        while inner.cache.len() <= index {
            if let Some(err) = &inner.failure {
                return Err(err.clone());
            }
            let Some(producer) = inner.producer.as_mut() else {
                return Ok(None);
            };
            match producer.next() {
                Some(Ok(item)) => inner.cache.push(Rc::new(item)),
                Some(Err(err)) => {
                    inner.producer = None;
                    inner.failure = Some(err.clone());
                    return Err(err);
                }
                None => {
                    inner.producer = None;
                    return Ok(None);
                }
            }
        }
        Ok(Some(Rc::clone(&inner.cache[index])))
    }

    /// Items in `[start, end)`; `end` of `None` runs until the producer is
    /// exhausted.
    pub fn iter(self: &Rc<Self>, start: Option<usize>, end: Option<usize>) -> Iter<T, E> {
        Iter {
            seq: Rc::clone(self),
            next: start.unwrap_or(0),
            end,
            done: false,
        }
    }
}

/// Iterator over a [`LazySeq`]. Yields an error at most once, then stops.
pub struct Iter<T, E = CalendarError> {
    seq: Rc<LazySeq<T, E>>,
    next: usize,
    end: Option<usize>,
    done: bool,
}

impl<T, E: Clone> Iterator for Iter<T, E> {
    type Item = Result<Rc<T>, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.end.is_some_and(|end| self.next >= end) {
            return None;
        }
        match self.seq.get(self.next) {
            Ok(Some(item)) => {
                self.next += 1;
                Some(Ok(item))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn get_generates_each_item_once() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let seq: LazySeq<usize, String> = LazySeq::new((0..).map(move |i| {
            counter.set(counter.get() + 1);
            Ok(i * 10)
        }));
        assert_eq!(seq.get(3).unwrap().as_deref(), Some(&30));
        assert_eq!(calls.get(), 4);
        assert_eq!(seq.get(1).unwrap().as_deref(), Some(&10));
        assert_eq!(seq.get(3).unwrap().as_deref(), Some(&30));
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn get_past_end_is_absent() {
        let seq: LazySeq<u8, String> = LazySeq::new((0..3u8).map(Ok));
        assert_eq!(seq.get(2).unwrap().as_deref(), Some(&2));
        assert!(seq.get(3).unwrap().is_none());
        assert!(seq.get(100).unwrap().is_none());
    }

    #[test]
    fn failure_is_replayed() {
        let items = vec![Ok(1), Err("broken".to_string()), Ok(3)];
        let seq = LazySeq::new(items.into_iter());
        assert_eq!(seq.get(0).unwrap().as_deref(), Some(&1));
        assert_eq!(seq.get(1), Err("broken".to_string()));
        assert_eq!(seq.get(2), Err("broken".to_string()));
        assert_eq!(seq.get(0).unwrap().as_deref(), Some(&1));
    }

    #[test]
    fn iter_respects_bounds() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let seq: Rc<LazySeq<u32, String>> = Rc::new(LazySeq::new((0..).map(move |i| {
            counter.set(counter.get() + 1);
            Ok(i)
        })));
        let items: Vec<u32> = seq.iter(Some(2), Some(5)).map(|item| *item.unwrap()).collect();
        assert_eq!(items, vec![2, 3, 4]);
        assert_eq!(calls.get(), 5);
    }

    #[test]
    fn iter_without_end_stops_at_exhaustion() {
        let seq: Rc<LazySeq<u32, String>> = Rc::new(LazySeq::new((0..4).map(Ok)));
        assert_eq!(seq.iter(None, None).count(), 4);
        assert_eq!(seq.iter(Some(3), None).count(), 1);
        assert_eq!(seq.iter(Some(9), None).count(), 0);
    }

    #[test]
    fn iter_stops_after_error() {
        let items = vec![Ok(1), Err("broken".to_string())];
        let seq = Rc::new(LazySeq::new(items.into_iter()));
        let collected: Vec<Result<Rc<i32>, String>> = seq.iter(None, None).collect();
        assert_eq!(collected.len(), 2);
        assert!(collected[1].is_err());
    }
}
