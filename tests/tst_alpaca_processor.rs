
use oc_scraper::OptionType;
use oc_scraper::alpaca::{
    ContractsResponse,
    OptionContract,
    OptionSnapshot,
    SnapshotsResponse,
    assemble_rows,
    strike_bounds,
    symbol_batches,
};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn contract(symbol: &str, strike: &str) -> OptionContract {
        OptionContract {
            symbol: symbol.to_string(),
            expiration_date: NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
            contract_type: OptionType::Call,
            strike_price: strike.to_string(),
            open_interest: Some("100".to_string()),
        }
    }

    fn stamp() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap().and_hms_opt(10, 0, 0).unwrap()
    }

    #[test]
    fn test_strike_window() {
        // Current price 100, ±10% window. The raw f64 products go out in
        // the request (100 * 1.1 is a hair above 110), so bounds are
        // checked within a tolerance
        let (low, high) = strike_bounds(100.0, 0.1);
        assert!((low - 90.0).abs() < 1e-9);
        assert!((high - 110.0).abs() < 1e-9);

        // Default window is ±30%
        let (low, high) = strike_bounds(200.0, 0.3);
        assert!((low - 140.0).abs() < 1e-9);
        assert!((high - 260.0).abs() < 1e-9);
    }

    #[test]
    fn test_contracts_response_paged_shape() {
        let body = r#"{
            "option_contracts": [
                {
                    "symbol": "NFLX250620C01000000",
                    "expiration_date": "2025-06-20",
                    "type": "call",
                    "strike_price": "1000",
                    "open_interest": "1523"
                },
                {
                    "symbol": "NFLX250620P01000000",
                    "expiration_date": "2025-06-20",
                    "type": "put",
                    "strike_price": "1000",
                    "open_interest": null
                }
            ],
            "next_page_token": "abc123"
        }"#;

        let response: ContractsResponse = serde_json::from_str(body).unwrap();
        let (contracts, token) = response.into_page();

        assert_eq!(contracts.len(), 2);
        assert_eq!(contracts[0].symbol, "NFLX250620C01000000");
        assert_eq!(contracts[0].contract_type, OptionType::Call);
        assert_eq!(contracts[1].contract_type, OptionType::Put);
        assert_eq!(contracts[1].open_interest, None);
        assert_eq!(token.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_contracts_response_bare_array_shape() {
        // Some plans answer with a plain array and no pagination envelope
        let body = r#"[
            {
                "symbol": "V250620C00300000",
                "expiration_date": "2025-06-20",
                "type": "call",
                "strike_price": "300",
                "open_interest": "42"
            }
        ]"#;

        let response: ContractsResponse = serde_json::from_str(body).unwrap();
        let (contracts, token) = response.into_page();

        assert_eq!(contracts.len(), 1);
        assert_eq!(token, None); // bare arrays never paginate
    }

    #[test]
    fn test_pagination_accumulates_in_order() {
        let pages = [
            r#"{"option_contracts": [
                {"symbol": "A1", "expiration_date": "2025-06-20", "type": "call", "strike_price": "10", "open_interest": null},
                {"symbol": "A2", "expiration_date": "2025-06-20", "type": "call", "strike_price": "11", "open_interest": null}
            ], "next_page_token": "t1"}"#,
            r#"{"option_contracts": [
                {"symbol": "B1", "expiration_date": "2025-06-27", "type": "put", "strike_price": "12", "open_interest": null}
            ], "next_page_token": "t2"}"#,
            r#"{"option_contracts": [
                {"symbol": "C1", "expiration_date": "2025-07-03", "type": "call", "strike_price": "13", "open_interest": null}
            ], "next_page_token": null}"#,
        ];

        // Walk the pages the way the discovery loop does
        let mut all: Vec<OptionContract> = Vec::new();
        let mut token: Option<String> = None;
        for (i, page) in pages.iter().enumerate() {
            let response: ContractsResponse = serde_json::from_str(page).unwrap();
            let (contracts, next) = response.into_page();
            all.extend(contracts);

            if i < pages.len() - 1 {
                assert!(next.is_some()); // token present until the last page
            }
            token = next;
        }

        assert_eq!(token, None);
        let symbols: Vec<&str> = all.iter().map(|c| c.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["A1", "A2", "B1", "C1"]);
    }

    #[test]
    fn test_snapshot_batching_sizes() {
        // 45 capped symbols should go out as 20 + 20 + 5
        let symbols: Vec<String> = (0..45).map(|i| format!("SYM{i:03}")).collect();
        let batches = symbol_batches(&symbols, 20);

        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].len(), 20);
        assert_eq!(batches[1].len(), 20);
        assert_eq!(batches[2].len(), 5);
        assert_eq!(batches[1][0], "SYM020");
    }

    #[test]
    fn test_snapshots_response_decoding() {
        let body = r#"{
            "snapshots": {
                "UBER250620C00080000": {
                    "latestQuote": {"ap": 2.05, "as": 12, "bp": 1.95, "bs": 9},
                    "latestTrade": {"p": 2.0, "s": 1},
                    "impliedVolatility": 0.38,
                    "dailyBar": {"o": 1.9, "h": 2.1, "l": 1.85, "c": 2.0, "v": 523}
                },
                "UBER250620P00080000": {
                    "latestQuote": {"ap": 1.1, "bp": 0.0}
                }
            }
        }"#;

        let response: SnapshotsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.snapshots.len(), 2);

        let call = &response.snapshots["UBER250620C00080000"];
        assert_eq!(call.latest_quote.as_ref().unwrap().bid_price, Some(1.95));
        assert_eq!(call.latest_quote.as_ref().unwrap().ask_price, Some(2.05));
        assert_eq!(call.latest_trade.as_ref().unwrap().price, Some(2.0));
        assert_eq!(call.implied_volatility, Some(0.38));
        assert_eq!(call.daily_bar.as_ref().unwrap().volume, Some(523));

        // Sparse snapshot: everything else absent
        let put = &response.snapshots["UBER250620P00080000"];
        assert!(put.latest_trade.is_none());
        assert!(put.implied_volatility.is_none());
    }

    #[test]
    fn test_batch_failure_leaves_other_batches_intact() {
        // 40 contracts = two snapshot batches; pretend the second batch
        // failed, so only the first 20 have snapshot data
        let contracts: Vec<OptionContract> =
            (0..40).map(|i| contract(&format!("SYM{i:03}"), "50")).collect();

        let mut snapshots: HashMap<String, OptionSnapshot> = HashMap::new();
        for i in 0..20 {
            let body = r#"{
                "latestQuote": {"ap": 1.5, "bp": 1.0},
                "latestTrade": {"p": 1.2},
                "impliedVolatility": 0.5,
                "dailyBar": {"v": 10}
            }"#;
            snapshots.insert(format!("SYM{i:03}"), serde_json::from_str(body).unwrap());
        }

        let rows = assemble_rows("TEST", &contracts, &snapshots, stamp(), stamp().date());

        // Every discovered contract still gets a row
        assert_eq!(rows.len(), 40);

        // First batch populated
        assert_eq!(rows[0].bid, 1.0);
        assert_eq!(rows[0].ask, 1.5);
        assert_eq!(rows[0].mid_price, 1.25); // (1.0 + 1.5) / 2
        assert_eq!(rows[19].open_interest, 100);

        // Second batch zero-filled
        assert_eq!(rows[20].bid, 0.0);
        assert_eq!(rows[20].ask, 0.0);
        assert_eq!(rows[20].mid_price, 0.0);
        assert_eq!(rows[20].volume, 0);
        assert_eq!(rows[20].open_interest, 0);
        assert_eq!(rows[39].iv, 0.0);
    }

    #[test]
    fn test_rows_beyond_snapshot_cap_are_zero_filled() {
        // 60 discovered contracts, snapshots only for the first 50
        let contracts: Vec<OptionContract> =
            (0..60).map(|i| contract(&format!("CAP{i:03}"), "25")).collect();

        let mut snapshots: HashMap<String, OptionSnapshot> = HashMap::new();
        for i in 0..50 {
            let body = r#"{"latestQuote": {"ap": 0.75, "bp": 0.25}}"#;
            snapshots.insert(format!("CAP{i:03}"), serde_json::from_str(body).unwrap());
        }

        let rows = assemble_rows("TEST", &contracts, &snapshots, stamp(), stamp().date());
        assert_eq!(rows.len(), 60);
        assert_eq!(rows[49].mid_price, 0.5); // (0.25 + 0.75) / 2
        assert_eq!(rows[50].mid_price, 0.0);
        assert_eq!(rows[59].bid, 0.0);
    }
}
