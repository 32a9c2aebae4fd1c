//! Ticker universes used for seeding.

/// Default seed tickers: a mix of moat types and business models.
pub const DEFAULT_TICKERS: [&str; 12] = [
    "MSFT", "AAPL", "GOOGL", "KO", "PG", "JNJ", "V", "BRK-B", "CAT", "COST", "HD", "UNH",
];

/// Trait for ticker universes.
pub trait Universe {
    /// Get all tickers in the universe.
    fn symbols(&self) -> Vec<String>;

    /// Check if a ticker is in the universe (case-insensitive).
    fn contains(&self, symbol: &str) -> bool {
        let symbol = symbol.trim().to_uppercase();
        self.symbols().contains(&symbol)
    }

    /// Get the number of tickers.
    fn size(&self) -> usize {
        self.symbols().len()
    }
}

/// A list of tickers, upper-cased and deduplicated in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerList {
    tickers: Vec<String>,
}

impl TickerList {
    /// Build from any ticker strings. Blank entries are dropped.
    pub fn new<I, T>(tickers: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for t in tickers {
            let t = t.as_ref().trim().to_uppercase();
            if !t.is_empty() && !out.contains(&t) {
                out.push(t);
            }
        }
        Self { tickers: out }
    }

    /// Parse a comma-separated list such as `"msft, aapl"`.
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(','))
    }
}

impl Default for TickerList {
    fn default() -> Self {
        Self::new(DEFAULT_TICKERS)
    }
}

impl Universe for TickerList {
    fn symbols(&self) -> Vec<String> {
        self.tickers.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_universe() {
        let universe = TickerList::default();

        assert!(universe.contains("brk-b"));
        assert!(!universe.contains("NOTREAL"));
        assert_eq!(universe.size(), 12);
        assert_eq!(universe.symbols()[0], "MSFT");
    }

    #[test]
    fn test_parse() {
        let universe = TickerList::parse(" ko,msft,,KO ");
        assert_eq!(universe.symbols(), vec!["KO", "MSFT"]);
    }
}
