use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Priority of balances on chains we do not rank; such balances are dropped.
pub const UNRANKED_PRIORITY: i32 = -99;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletBalance {
    pub currency: String,
    pub amount: f64,
    pub blockchain: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedWalletBalance {
    pub currency: String,
    pub amount: f64,
    pub blockchain: String,
    pub formatted: String,
    /// `None` when no price is known for the currency
    pub usd_value: Option<f64>,
}

pub fn blockchain_priority(blockchain: &str) -> i32 {
    match blockchain {
        "Osmosis" => 100,
        "Ethereum" => 50,
        "Arbitrum" => 30,
        "Zilliqa" | "Neo" => 20,
        _ => UNRANKED_PRIORITY,
    }
}

/// Drops empty and unranked balances, orders by chain priority (highest first, ties keep
/// their input order), and attaches display amount and USD value.
pub fn prepare_balances(
    balances: &[WalletBalance],
    prices: &HashMap<String, f64>,
) -> Vec<FormattedWalletBalance> {
    let mut kept: Vec<&WalletBalance> = balances
        .iter()
        .filter(|b| blockchain_priority(&b.blockchain) > UNRANKED_PRIORITY && b.amount > 0.0)
        .collect();
    kept.sort_by_key(|b| std::cmp::Reverse(blockchain_priority(&b.blockchain)));

    kept.into_iter()
        .map(|b| FormattedWalletBalance {
            currency: b.currency.clone(),
            amount: b.amount,
            blockchain: b.blockchain.clone(),
            formatted: format!("{:.2}", b.amount),
            usd_value: prices.get(&b.currency).map(|price| price * b.amount),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn balance(currency: &str, amount: f64, blockchain: &str) -> WalletBalance {
        WalletBalance {
            currency: currency.to_string(),
            amount,
            blockchain: blockchain.to_string(),
        }
    }

    #[test]
    fn test_priorities() {
        assert_eq!(blockchain_priority("Osmosis"), 100);
        assert_eq!(blockchain_priority("Neo"), 20);
        assert_eq!(blockchain_priority("Solana"), UNRANKED_PRIORITY);
    }

    #[test]
    fn test_prepare_filters_sorts_and_formats() {
        let balances = vec![
            balance("NEO", 3.0, "Neo"),
            balance("ETH", 1.23456, "Ethereum"),
            balance("SOL", 10.0, "Solana"),
            balance("OSMO", 0.0, "Osmosis"),
            balance("ATOM", 5.0, "Osmosis"),
            balance("ZIL", 100.0, "Zilliqa"),
        ];
        let mut prices = HashMap::new();
        prices.insert("ETH".to_string(), 2000.0);
        prices.insert("ATOM".to_string(), 7.0);

        let prepared = prepare_balances(&balances, &prices);
        let order: Vec<&str> = prepared.iter().map(|b| b.currency.as_str()).collect();
        assert_eq!(order, vec!["ATOM", "ETH", "NEO", "ZIL"]);

        assert_eq!(prepared[1].formatted, "1.23");
        assert_eq!(prepared[0].usd_value, Some(35.0));
        assert_eq!(prepared[2].usd_value, None);
    }
}
