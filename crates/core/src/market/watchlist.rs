/// # Summary
/// 用户的自选股列表，只保存数据源中存在的代码。
///
/// # Invariants
/// - 代码全部为大写，且不重复。
/// - 保持加入顺序。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Watchlist {
    symbols: Vec<String>,
}

impl Watchlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Summary
    /// 以配置中的代码初始化自选列表。
    ///
    /// # Logic
    /// 1. `configured` 为空时跟踪数据源提供的全部代码。
    /// 2. 否则逐个尝试加入，无法加入的代码原样收集到返回值的第二项。
    ///
    /// # Returns
    /// `(自选列表, 被拒绝的代码)`。
    pub fn seeded(configured: &[String], available: &[String]) -> (Self, Vec<String>) {
        let mut watchlist = Self::new();
        if configured.is_empty() {
            for symbol in available {
                watchlist.add(symbol, available);
            }
            return (watchlist, Vec::new());
        }
        let rejected = configured
            .iter()
            .filter(|symbol| !watchlist.add(symbol, available))
            .cloned()
            .collect();
        (watchlist, rejected)
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// # Summary
    /// 在数据源代码中做不区分大小写的子串搜索。
    ///
    /// # Returns
    /// 匹配的代码，保持 `available` 中的顺序；查询为空白时返回全部。
    pub fn search<'a>(available: &'a [String], query: &str) -> Vec<&'a str> {
        let needle = query.trim().to_lowercase();
        available
            .iter()
            .filter(|symbol| symbol.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }

    /// # Summary
    /// 加入一个代码。
    ///
    /// # Logic
    /// 1. 去除首尾空白并转为大写。
    /// 2. 代码为空、不在 `available` 中或已在列表中时拒绝。
    ///
    /// # Returns
    /// 成功加入返回 true。
    pub fn add(&mut self, symbol: &str, available: &[String]) -> bool {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() || self.contains(&symbol) || !available.contains(&symbol) {
            return false;
        }
        self.symbols.push(symbol);
        true
    }

    /// 移除一个代码，不在列表中时返回 false
    pub fn remove(&mut self, symbol: &str) -> bool {
        let before = self.symbols.len();
        self.symbols.retain(|s| s != symbol);
        self.symbols.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn available() -> Vec<String> {
        ["AAPL", "AMZN", "MSFT", "NVDA"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let available = available();
        assert_eq!(Watchlist::search(&available, "a"), vec!["AAPL", "AMZN", "NVDA"]);
        assert_eq!(Watchlist::search(&available, "Ms"), vec!["MSFT"]);
        assert_eq!(Watchlist::search(&available, "  ").len(), 4);
        assert!(Watchlist::search(&available, "tsla").is_empty());
    }

    #[test]
    fn test_add_normalizes_to_upper_case() {
        let available = available();
        let mut watchlist = Watchlist::new();
        assert!(watchlist.add(" aapl ", &available));
        assert_eq!(watchlist.symbols(), ["AAPL"]);
        assert!(watchlist.contains("AAPL"));
    }

    #[test]
    fn test_add_rejects_unknown_symbol() {
        let available = available();
        let mut watchlist = Watchlist::new();
        assert!(!watchlist.add("TSLA", &available));
        assert!(!watchlist.add("", &available));
        assert!(watchlist.is_empty());
    }

    #[test]
    fn test_add_rejects_duplicate() {
        let available = available();
        let mut watchlist = Watchlist::new();
        assert!(watchlist.add("MSFT", &available));
        assert!(!watchlist.add("msft", &available));
        assert_eq!(watchlist.symbols(), ["MSFT"]);
    }

    #[test]
    fn test_remove() {
        let available = available();
        let mut watchlist = Watchlist::new();
        watchlist.add("NVDA", &available);
        watchlist.add("AAPL", &available);
        assert!(watchlist.remove("NVDA"));
        assert!(!watchlist.remove("NVDA"));
        assert_eq!(watchlist.symbols(), ["AAPL"]);
    }

    #[test]
    fn test_seeded_from_configuration() {
        let available = available();
        let (watchlist, rejected) = Watchlist::seeded(&[], &available);
        assert_eq!(watchlist.symbols(), available.as_slice());
        assert!(rejected.is_empty());

        let configured = vec!["msft".to_string(), "TSLA".to_string(), "MSFT".to_string()];
        let (watchlist, rejected) = Watchlist::seeded(&configured, &available);
        assert_eq!(watchlist.symbols(), ["MSFT"]);
        assert_eq!(rejected, vec!["TSLA".to_string(), "MSFT".to_string()]);
    }
}
