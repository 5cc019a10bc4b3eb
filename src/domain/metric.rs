use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of signals tracked per deployment. Iteration order (and
/// therefore record ordering) follows the derived `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MetricId {
    DevContributors,
    VcDeployedUsdM,
    VcDeals,
    DefiTvlUsdB,
    StablecoinSettledUsdB,
    EtfNetFlowUsdM,
    BtcHashrateEhs,
    CmeOpenInterestUsdB,
    FearGreedIndex,
    GoogleTrend,
}

impl MetricId {
    pub const ALL: [MetricId; 10] = [
        Self::DevContributors,
        Self::VcDeployedUsdM,
        Self::VcDeals,
        Self::DefiTvlUsdB,
        Self::StablecoinSettledUsdB,
        Self::EtfNetFlowUsdM,
        Self::BtcHashrateEhs,
        Self::CmeOpenInterestUsdB,
        Self::FearGreedIndex,
        Self::GoogleTrend,
    ];

    /// Stable snake-case identifier used in logs and diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DevContributors => "dev_contributors",
            Self::VcDeployedUsdM => "vc_deployed_usd_m",
            Self::VcDeals => "vc_deals",
            Self::DefiTvlUsdB => "defi_tvl_usd_b",
            Self::StablecoinSettledUsdB => "stablecoin_settled_usd_b",
            Self::EtfNetFlowUsdM => "etf_net_flow_usd_m",
            Self::BtcHashrateEhs => "btc_hashrate_ehs",
            Self::CmeOpenInterestUsdB => "cme_open_interest_usd_b",
            Self::FearGreedIndex => "fear_greed_index",
            Self::GoogleTrend => "google_trend",
        }
    }

    /// Exact destination column name. Case- and spacing-sensitive: the store
    /// rejects the write if these drift from the database schema.
    pub fn property_name(&self) -> &'static str {
        match self {
            Self::DevContributors => "Dev Contributors",
            Self::VcDeployedUsdM => "VC $ Deployed ($M)",
            Self::VcDeals => "VC Deals",
            Self::DefiTvlUsdB => "DeFi TVL ($B)",
            Self::StablecoinSettledUsdB => "Stablecoin Settled ($B/24 h)",
            Self::EtfNetFlowUsdM => "ETF Net Flow ($M/day)",
            Self::BtcHashrateEhs => "BTC Hashrate (EH/s)",
            Self::CmeOpenInterestUsdB => "CME OI ($B)",
            Self::FearGreedIndex => "Fear-Greed",
            Self::GoogleTrend => "Google Trend",
        }
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a metric came back empty. Absence is data, not an error: none of
/// these ever affect the run's exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbsenceReason {
    NetworkError,
    BadStatus,
    ParseError,
    MissingField,
    Timeout,
    AdapterPanic,
}

impl fmt::Display for AbsenceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NetworkError => "network_error",
            Self::BadStatus => "bad_status",
            Self::ParseError => "parse_error",
            Self::MissingField => "missing_field",
            Self::Timeout => "timeout",
            Self::AdapterPanic => "adapter_panic",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MetricValue {
    Present(f64),
    Absent(AbsenceReason),
}

impl MetricValue {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present(v) => write!(f, "{v}"),
            Self::Absent(reason) => write!(f, "absent ({reason})"),
        }
    }
}

/// One adapter's outcome for one run. Built once, never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricResult {
    pub id: MetricId,
    pub value: MetricValue,
}

impl MetricResult {
    pub fn new(id: MetricId, value: MetricValue) -> Self {
        Self { id, value }
    }
}

/// Per-adapter unit conversion: divide the raw reading, then round to a
/// fixed number of decimals. The divisor is adapter configuration — two
/// adapters for similar metrics may legitimately disagree on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalizer {
    pub divisor: f64,
    pub decimals: u32,
}

impl Normalizer {
    pub fn new(divisor: f64, decimals: u32) -> Self {
        Self { divisor, decimals }
    }

    /// No unit conversion, integer rounding.
    pub fn integer() -> Self {
        Self::new(1.0, 0)
    }

    pub fn apply(&self, raw: f64) -> f64 {
        let scaled = raw / self.divisor;
        let factor = 10f64.powi(self.decimals as i32);
        (scaled * factor).round() / factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_billions_with_two_decimals() {
        let n = Normalizer::new(1e9, 2);
        assert_eq!(n.apply(3_500_000_000.0), 3.50);
        assert_eq!(n.apply(3_456_789_012.0), 3.46);
    }

    #[test]
    fn test_exahash_with_one_decimal() {
        let n = Normalizer::new(1e18, 1);
        assert_eq!(n.apply(612_340_000_000_000_000_000.0), 612.3);
    }

    #[test]
    fn test_integer_rounding() {
        let n = Normalizer::integer();
        assert_eq!(n.apply(54.6), 55.0);
        assert_eq!(n.apply(54.0), 54.0);
    }

    #[test]
    fn test_metric_id_ordering_is_stable() {
        let mut ids = MetricId::ALL.to_vec();
        ids.reverse();
        ids.sort();
        assert_eq!(ids, MetricId::ALL.to_vec());
    }

    #[test]
    fn test_property_names_match_destination_schema() {
        assert_eq!(MetricId::DefiTvlUsdB.property_name(), "DeFi TVL ($B)");
        assert_eq!(
            MetricId::StablecoinSettledUsdB.property_name(),
            "Stablecoin Settled ($B/24 h)"
        );
        assert_eq!(MetricId::FearGreedIndex.property_name(), "Fear-Greed");
    }

    #[test]
    fn test_absence_reason_tags() {
        assert_eq!(AbsenceReason::Timeout.to_string(), "timeout");
        assert_eq!(AbsenceReason::AdapterPanic.to_string(), "adapter_panic");
        assert_eq!(
            MetricValue::Absent(AbsenceReason::MissingField).to_string(),
            "absent (missing_field)"
        );
    }
}
