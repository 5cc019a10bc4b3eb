pub mod json_api;
pub mod static_value;

use crate::domain::metric::{MetricId, Normalizer};
use crate::domain::ports::SignalSource;
use json_api::JsonApiSource;
use json_api::PathSegment::{Index, Key};
use reqwest::Client;
use static_value::StaticSource;
use std::sync::Arc;

/// The fixed deployment set: one adapter per tracked metric.
///
/// Live fetches carry their own URL, field path and unit conversion; the
/// rest are placeholder constants sourced from quarterly reports until a
/// machine-readable feed exists (the pipeline cannot tell the two kinds
/// apart). Endpoints get swapped over time — only this registry changes
/// when that happens.
pub fn registry(client: &Client) -> Vec<Arc<dyn SignalSource>> {
    vec![
        // Electric Capital developer report; refreshed manually per release.
        Arc::new(StaticSource::new(MetricId::DevContributors, 19_300.0)),
        // Galaxy Research quarterly VC figures ($3.5B across 416 deals).
        Arc::new(StaticSource::new(MetricId::VcDeployedUsdM, 3_500.0)),
        Arc::new(StaticSource::new(MetricId::VcDeals, 416.0)),
        Arc::new(JsonApiSource::new(
            MetricId::DefiTvlUsdB,
            client.clone(),
            "https://api.llama.fi/tvl",
            vec![Key("tvl")],
            Normalizer::new(1e9, 2),
        )),
        Arc::new(JsonApiSource::new(
            MetricId::StablecoinSettledUsdB,
            client.clone(),
            "https://community-api.coinmetrics.io/v4/timeseries/asset-metrics\
             ?assets=usdt&metrics=TxTfrValAdjUSD&page_size=1&paging_from=end",
            vec![Key("data"), Index(0), Key("TxTfrValAdjUSD")],
            Normalizer::new(1e9, 2),
        )),
        // The Block ETF flow board needs an API key; static until wired up.
        Arc::new(StaticSource::new(MetricId::EtfNetFlowUsdM, 120.0)),
        Arc::new(JsonApiSource::new(
            MetricId::BtcHashrateEhs,
            client.clone(),
            "https://api.bitinfocharts.com/v1/bitcoin/hashrate",
            vec![Key("hashrate")],
            Normalizer::new(1e18, 1),
        )),
        // CME open interest comes from a CSV download; static for now.
        Arc::new(StaticSource::new(MetricId::CmeOpenInterestUsdB, 19.8)),
        Arc::new(JsonApiSource::new(
            MetricId::FearGreedIndex,
            client.clone(),
            "https://api.alternative.me/fng/?limit=1",
            vec![Key("data"), Index(0), Key("value")],
            Normalizer::integer(),
        )),
        // Search-interest index has no stable public JSON endpoint.
        Arc::new(StaticSource::new(MetricId::GoogleTrend, 38.0)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::time::Duration;

    #[test]
    fn test_registry_covers_every_metric_exactly_once() {
        let client = crate::infrastructure::http_client_factory::HttpClientFactory::create_client(
            Duration::from_secs(10),
        );
        let sources = registry(&client);

        let ids: BTreeSet<MetricId> = sources.iter().map(|s| s.id()).collect();
        assert_eq!(sources.len(), MetricId::ALL.len());
        assert_eq!(ids.len(), MetricId::ALL.len());
    }
}
