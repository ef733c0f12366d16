//! Folding finer units into coarser ones: days into weeks, weeks into blocks,
//! blocks into years.

use std::rc::Rc;

use crate::types::{Block, Day, InBlock, InWeek, InYear, Week, Year};

/// Groups maximal runs of consecutive items that share a key.
///
/// An error from the source ends the iteration and discards the unfinished
/// group.
pub struct GroupBy<T, I, F> {
    source: I,
    key: F,
    pending: Option<Rc<T>>,
    done: bool,
}

impl<T, E, I, F> GroupBy<T, I, F>
where
    I: Iterator<Item = Result<Rc<T>, E>>,
{
    pub fn new(source: I, key: F) -> GroupBy<T, I, F> {
        GroupBy {
            source,
            key,
            pending: None,
            done: false,
        }
    }
}

impl<T, E, I, F, K> Iterator for GroupBy<T, I, F>
where
    I: Iterator<Item = Result<Rc<T>, E>>,
    F: FnMut(&T) -> K,
    K: PartialEq,
{
    type Item = Result<Vec<Rc<T>>, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let first = match self.pending.take() {
            Some(item) => item,
            None => match self.source.next() {
                Some(Ok(item)) => item,
                Some(Err(err)) => {
                    self.done = true;
                    return Some(Err(err));
                }
                None => {
                    self.done = true;
                    return None;
                }
            },
        };

        let group_key = (self.key)(&*first);
        let mut group = vec![first];
        loop {
            match self.source.next() {
                Some(Ok(item)) if (self.key)(&*item) == group_key => group.push(item),
                Some(Ok(item)) => {
                    self.pending = Some(item);
                    break;
                }
                Some(Err(err)) => {
                    self.done = true;
                    return Some(Err(err));
                }
                None => {
                    self.done = true;
                    break;
                }
            }
        }
        Some(Ok(group))
    }
}

/// Days grouped by (year, block, week), numbered from zero.
pub fn group_weeks<E, I>(days: I) -> impl Iterator<Item = Result<Week, E>>
where
    I: Iterator<Item = Result<Rc<Day>, E>>,
{
    GroupBy::new(days, |day: &Day| {
        (day.year_of_calendar(), day.block_of_year(), day.week_of_block())
    })
    .enumerate()
    .map(|(week_of_calendar, group)| group.map(|days| Week::new(days, week_of_calendar)))
}

/// Weeks grouped by (year, block), numbered from zero.
pub fn group_blocks<E, I>(weeks: I) -> impl Iterator<Item = Result<Block, E>>
where
    I: Iterator<Item = Result<Rc<Week>, E>>,
{
    GroupBy::new(weeks, |week: &Week| (week.year_of_calendar(), week.block_of_year()))
        .enumerate()
        .map(|(block_of_calendar, group)| group.map(|weeks| Block::new(weeks, block_of_calendar)))
}

/// Blocks grouped by year, numbered from zero.
pub fn group_years<E, I>(blocks: I) -> impl Iterator<Item = Result<Year, E>>
where
    I: Iterator<Item = Result<Rc<Block>, E>>,
{
    GroupBy::new(blocks, |block: &Block| block.year_of_calendar())
        .enumerate()
        .map(|(years_since_epoch, group)| group.map(|blocks| Year::new(blocks, years_since_epoch)))
}
