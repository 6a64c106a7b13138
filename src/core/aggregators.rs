//! Reducers from per-analyzer result maps to final collections

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::marker::PhantomData;

use crate::core::analyzer::AnalyzerResultMap;

/// Turns the facts of one traversal into the caller's collection type
pub trait Aggregator<R> {
    type Output;

    fn aggregate(&self, results: AnalyzerResultMap<R>) -> Self::Output;
}

/// Deduplicates facts found by several analyzers
#[derive(Debug, Clone, Copy, Default)]
pub struct SetAggregator;

impl<R: Eq + Hash> Aggregator<R> for SetAggregator {
    type Output = HashSet<R>;

    fn aggregate(&self, results: AnalyzerResultMap<R>) -> Self::Output {
        results.into_results().collect()
    }
}

/// Keeps every fact, ordered by analyzer then by document position
#[derive(Debug, Clone, Copy, Default)]
pub struct ListAggregator;

impl<R> Aggregator<R> for ListAggregator {
    type Output = Vec<R>;

    fn aggregate(&self, results: AnalyzerResultMap<R>) -> Self::Output {
        results.into_results().collect()
    }
}

/// Like [`ListAggregator`] for analyzers that yield several values per node
#[derive(Debug)]
pub struct FlatListAggregator<T>(PhantomData<fn() -> T>);

impl<T> FlatListAggregator<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for FlatListAggregator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Aggregator<Vec<T>> for FlatListAggregator<T> {
    type Output = Vec<T>;

    fn aggregate(&self, results: AnalyzerResultMap<Vec<T>>) -> Self::Output {
        results.into_results().flatten().collect()
    }
}

/// Counts identical facts
#[derive(Debug, Clone, Copy, Default)]
pub struct MultisetAggregator;

impl<R: Eq + Hash> Aggregator<R> for MultisetAggregator {
    type Output = HashMap<R, usize>;

    fn aggregate(&self, results: AnalyzerResultMap<R>) -> Self::Output {
        let mut counts = HashMap::new();
        for fact in results.into_results() {
            *counts.entry(fact).or_insert(0) += 1;
        }
        counts
    }
}
