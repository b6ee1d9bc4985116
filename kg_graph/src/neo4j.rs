use anyhow::Context;
use reqwest::{blocking::Client, header::ACCEPT};
use serde::Deserialize;
use serde_json::json;

use crate::{ConnectionConfig, GraphSource, Record, Value};

/// Client for the Neo4j HTTP transactional endpoint
///
/// Each query is sent as a single statement to `/db/<database>/tx/commit`,
/// so runs in its own auto-committed transaction.  The client is blocking.
pub struct Neo4jHttp {
    cfg: ConnectionConfig,
    client: Client,
}

impl Neo4jHttp {
    pub fn new(cfg: ConnectionConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .build()
            .with_context(|| "Could not set up HTTP client")?;
        Ok(Self { cfg, client })
    }

    fn endpoint(&self) -> String {
        format!("{}/db/{}/tx/commit", self.cfg.url(), self.cfg.database())
    }
}

impl GraphSource for Neo4jHttp {
    fn run_query(&self, query: &str) -> anyhow::Result<Vec<Record>> {
        let url = self.endpoint();
        trace!("Sending query to {}: {}", url, query);
        let body = json!({ "statements": [ { "statement": query } ] });

        let mut req = self
            .client
            .post(&url)
            .header(ACCEPT, "application/json;charset=UTF-8")
            .json(&body);
        if let Some(user) = self.cfg.user() {
            req = req.basic_auth(user, self.cfg.password());
        }
        let resp = req
            .send()
            .with_context(|| format!("Error sending query to {}", url))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("Query to {} failed with status {}", url, status));
        }
        let tx: TxResponse = resp
            .json()
            .with_context(|| format!("Could not decode response from {}", url))?;
        decode_response(tx)
    }
}

#[derive(Debug, Deserialize)]
struct TxResponse {
    #[serde(default)]
    results: Vec<TxResult>,
    #[serde(default)]
    errors: Vec<TxError>,
}

#[derive(Debug, Deserialize)]
struct TxResult {
    columns: Vec<String>,
    #[serde(default)]
    data: Vec<TxRow>,
}

#[derive(Debug, Deserialize)]
struct TxRow {
    row: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct TxError {
    code: String,
    message: String,
}

fn decode_response(mut tx: TxResponse) -> anyhow::Result<Vec<Record>> {
    if let Some(e) = tx.errors.first() {
        return Err(anyhow!("Query failed: {} ({})", e.message, e.code));
    }
    // Only one statement is ever sent
    let res = match tx.results.pop() {
        Some(r) => r,
        None => return Ok(Vec::new()),
    };
    let TxResult { columns, data } = res;
    let mut records = Vec::with_capacity(data.len());
    for (i, row) in data.into_iter().enumerate() {
        if row.row.len() != columns.len() {
            return Err(anyhow!(
                "Row {} has {} values for {} columns",
                i,
                row.row.len(),
                columns.len()
            ));
        }
        records.push(
            columns
                .iter()
                .cloned()
                .zip(row.row.into_iter().map(Value::from))
                .collect(),
        )
    }
    trace!("Received {} records", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(s: &str) -> anyhow::Result<Vec<Record>> {
        decode_response(serde_json::from_str(s).unwrap())
    }

    #[test]
    fn decode_rows() {
        let r = decode(
            r#"{"results":[{"columns":["node_name","samples_with_node"],
                "data":[{"row":["TP53",12],"meta":[null,null]},
                        {"row":[null,3],"meta":[null,null]}]}],
                "errors":[]}"#,
        )
        .unwrap();
        assert_eq!(r.len(), 2);
        assert_eq!(r[0].str("node_name"), Some("TP53"));
        assert_eq!(r[0].count("samples_with_node").unwrap(), 12);
        assert_eq!(r[1].get("node_name"), Some(&Value::Null));
    }

    #[test]
    fn decode_empty() {
        let r = decode(r#"{"results":[{"columns":["count"],"data":[]}],"errors":[]}"#).unwrap();
        assert!(r.is_empty());
        let r = decode(r#"{"results":[],"errors":[]}"#).unwrap();
        assert!(r.is_empty());
    }

    #[test]
    fn decode_server_error() {
        let e = decode(
            r#"{"results":[],"errors":[{"code":"Neo.ClientError.Statement.SyntaxError",
                "message":"Invalid input"}]}"#,
        )
        .unwrap_err();
        let s = e.to_string();
        assert!(s.contains("Invalid input"));
        assert!(s.contains("SyntaxError"));
    }

    #[test]
    fn decode_bad_row() {
        assert!(decode(r#"{"results":[{"columns":["a","b"],"data":[{"row":[1]}]}]}"#).is_err());
    }

    #[test]
    fn endpoint_path() {
        let db = Neo4jHttp::new(ConnectionConfig::new("http://localhost:7474/", "graph2.db"))
            .unwrap();
        assert_eq!(db.endpoint(), "http://localhost:7474/db/graph2.db/tx/commit");
    }
}
