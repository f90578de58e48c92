use serde::Deserialize;

// ===== Chart API payloads (v8/finance/chart) =====

#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
pub struct ChartEnvelope {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartError {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub symbol: String,
    /// Exchange offset from UTC in seconds
    #[serde(default)]
    pub gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteBlock>,
    #[serde(default)]
    pub adjclose: Vec<AdjCloseBlock>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteBlock {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
pub struct AdjCloseBlock {
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}
