//! Test doubles shared by the unit tests in this crate.

use std::{
    collections::{HashMap, HashSet},
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use chrono::NaiveDate;

use screener_core::{
    AnnualStatement, DataError, DataProvider, FundamentalDataProvider, ProgressObserver, Result,
    Symbol,
};

/// Provider serving canned statements and counting fetches.
#[derive(Debug)]
pub(crate) struct FakeProvider {
    name: &'static str,
    statements: HashMap<Symbol, Vec<AnnualStatement>>,
    failing: HashSet<Symbol>,
    calls: AtomicUsize,
}

impl FakeProvider {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            statements: HashMap::new(),
            failing: HashSet::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Adds one fiscal year per element, oldest first, ending in 2024.
    pub(crate) fn with_series(mut self, ticker: &str, revenue: &[f64], net_income: &[f64]) -> Self {
        let symbol = Symbol::new(ticker);
        let first_year = 2025 - revenue.len() as i32;
        let rows = revenue
            .iter()
            .zip(net_income)
            .enumerate()
            .map(|(i, (rev, ni))| {
                let period_end = NaiveDate::from_ymd_opt(first_year + i as i32, 12, 31).unwrap();
                AnnualStatement::new(symbol.clone(), period_end)
                    .with_revenue(*rev)
                    .with_net_income(*ni)
            })
            .collect();
        self.statements.insert(symbol, rows);
        self
    }

    /// Makes every fetch for `ticker` fail with a network error.
    pub(crate) fn failing(mut self, ticker: &str) -> Self {
        self.failing.insert(Symbol::new(ticker));
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DataProvider for FakeProvider {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "canned statements"
    }
}

#[async_trait]
impl FundamentalDataProvider for FakeProvider {
    async fn fetch_annual_statements(&self, symbol: &Symbol) -> Result<Vec<AnnualStatement>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(symbol) {
            return Err(DataError::Network(format!("connection reset for {symbol}")));
        }
        self.statements
            .get(symbol)
            .cloned()
            .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))
    }
}

/// Observer recording every notification.
#[derive(Debug, Default)]
pub(crate) struct RecordingProgress {
    pub(crate) events: Mutex<Vec<(usize, usize, String)>>,
    pub(crate) finished: AtomicUsize,
}

impl RecordingProgress {
    pub(crate) fn events(&self) -> Vec<(usize, usize, String)> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

impl ProgressObserver for RecordingProgress {
    fn on_progress(&self, index: usize, total: usize, symbol: &Symbol) {
        self.events
            .lock()
            .unwrap()
            .push((index, total, symbol.to_string()));
    }

    fn on_finish(&self) {
        self.finished.fetch_add(1, Ordering::SeqCst);
    }
}
