use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use kg_graph::{check_ident, ConnectionConfig};

pub const DEFAULT_LABELS: [&str; 7] = [
    "Biological_sample",
    "Gene",
    "Protein",
    "Clinically_relevant_variant",
    "Known_variant",
    "Disease",
    "Phenotype",
];

pub const DEFAULT_RELATIONSHIPS: [(&str, &str, &str); 11] = [
    ("Biological_sample", "HAS_DAMAGE", "Gene"),
    ("Biological_sample", "HAS_PROTEIN", "Protein"),
    ("Biological_sample", "HAS_DISEASE", "Disease"),
    ("Biological_sample", "HAS_PHENOTYPE", "Phenotype"),
    ("Gene", "ASSOCIATED_WITH", "Disease"),
    ("Clinically_relevant_variant", "ASSOCIATED_WITH", "Disease"),
    ("Protein", "DETECTED_IN_PATHOLOGY_SAMPLE", "Disease"),
    ("Protein", "IS_BIOMARKER_OF_DISEASE", "Disease"),
    ("Protein", "IS_QCMARKER_IN_TISSUE", "Tissue"),
    ("Protein", "MENTIONED_IN_PUBLICATION", "Publication"),
    ("Phenotype", "MAPS_TO", "Disease"),
];

/// (start)-[rel]->(end) pattern, with an optional relationship property
///
/// Parsed from Start:REL:End or Start:REL:End:property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelSpec {
    pub start: String,
    pub rel: String,
    pub end: String,
    pub attribute: Option<String>,
}

impl RelSpec {
    fn new(start: &str, rel: &str, end: &str) -> Self {
        Self {
            start: start.to_owned(),
            rel: rel.to_owned(),
            end: end.to_owned(),
            attribute: None,
        }
    }
}

impl FromStr for RelSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let v: Vec<_> = s.split(':').map(|x| x.trim()).collect();
        if !(3..=4).contains(&v.len()) {
            return Err(format!(
                "Expected Start:REL:End or Start:REL:End:property, found {}",
                s
            ));
        }
        for x in v.iter() {
            check_ident(x).map_err(|e| e.to_string())?;
        }
        let mut r = RelSpec::new(v[0], v[1], v[2]);
        r.attribute = v.get(3).map(|x| x.to_string());
        Ok(r)
    }
}

impl fmt::Display for RelSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -> [{}] -> {}", self.start, self.rel, self.end)
    }
}

/// Config
///
/// Generated from the command line arguments, read only afterwards
pub struct Config {
    connection: ConnectionConfig,
    log_file: PathBuf,
    control: String,
    min_occurrence: u64,
    top_k: Option<usize>,
    labels: Vec<String>,
    relationships: Vec<RelSpec>,
    attributes: Vec<RelSpec>,
}

impl Config {
    pub fn new(connection: ConnectionConfig, log_file: PathBuf, control: String) -> Self {
        Self {
            connection,
            log_file,
            control,
            min_occurrence: 3,
            top_k: None,
            labels: DEFAULT_LABELS.iter().map(|s| s.to_string()).collect(),
            relationships: DEFAULT_RELATIONSHIPS
                .iter()
                .map(|(a, r, b)| RelSpec::new(a, r, b))
                .collect(),
            attributes: Vec::new(),
        }
    }

    pub fn set_min_occurrence(&mut self, n: u64) {
        self.min_occurrence = n
    }
    pub fn set_top_k(&mut self, k: usize) {
        self.top_k = Some(k)
    }
    pub fn set_labels(&mut self, v: Vec<String>) {
        self.labels = v
    }
    pub fn set_relationships(&mut self, v: Vec<RelSpec>) {
        self.relationships = v
    }
    pub fn set_attributes(&mut self, v: Vec<RelSpec>) {
        self.attributes = v
    }

    pub fn connection(&self) -> &ConnectionConfig {
        &self.connection
    }
    pub fn log_file(&self) -> &Path {
        &self.log_file
    }
    pub fn control(&self) -> &str {
        &self.control
    }
    pub fn min_occurrence(&self) -> u64 {
        self.min_occurrence
    }
    pub fn top_k(&self) -> Option<usize> {
        self.top_k
    }
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
    pub fn relationships(&self) -> &[RelSpec] {
        &self.relationships
    }
    pub fn attributes(&self) -> &[RelSpec] {
        &self.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rel_spec_parsing() {
        let r: RelSpec = "Gene:ASSOCIATED_WITH:Disease".parse().unwrap();
        assert_eq!(r, RelSpec::new("Gene", "ASSOCIATED_WITH", "Disease"));
        assert_eq!(r.to_string(), "Gene -> [ASSOCIATED_WITH] -> Disease");

        let r: RelSpec = "Gene:ASSOCIATED_WITH:Disease:score".parse().unwrap();
        assert_eq!(r.attribute.as_deref(), Some("score"));

        assert!("Gene:ASSOCIATED_WITH".parse::<RelSpec>().is_err());
        assert!("Gene:ASSOCIATED WITH:Disease".parse::<RelSpec>().is_err());
        assert!("a:b:c:d:e".parse::<RelSpec>().is_err());
    }

    #[test]
    fn defaults() {
        let cfg = Config::new(
            ConnectionConfig::new("http://localhost:7474", "neo4j"),
            PathBuf::from("log.txt"),
            "control".to_owned(),
        );
        assert_eq!(cfg.labels().len(), 7);
        assert_eq!(cfg.relationships().len(), 11);
        assert!(cfg.attributes().is_empty());
        assert_eq!(cfg.min_occurrence(), 3);
    }
}
