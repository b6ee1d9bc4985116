//! Parameterised queries used by the analysis tools
//!
//! Names are interpolated as quoted string literals, labels and relationship
//! types are checked with [`check_ident`].  A query returning no rows is not
//! an error: it gives zero or an empty collection.

use std::{collections::HashMap, fmt, str::FromStr};

use anyhow::Context;

use crate::{check_ident, quote_str, GraphSource};

pub type OccurrenceMap = HashMap<String, u64>;

/// A relationship followed from a biological sample to a node type,
/// i.e. (:Biological_sample)-[:HAS_DAMAGE]->(:Gene)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    relationship: String,
    node_type: String,
}

impl Link {
    pub fn new(relationship: &str, node_type: &str) -> anyhow::Result<Self> {
        Ok(Self {
            relationship: check_ident(relationship)?.to_owned(),
            node_type: check_ident(node_type)?.to_owned(),
        })
    }

    pub fn relationship(&self) -> &str {
        &self.relationship
    }

    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    /// Phenotypes, damaged genes and proteins
    pub fn defaults() -> Vec<Link> {
        [
            ("HAS_PHENOTYPE", "Phenotype"),
            ("HAS_DAMAGE", "Gene"),
            ("HAS_PROTEIN", "Protein"),
        ]
        .iter()
        .map(|(r, n)| Link {
            relationship: r.to_string(),
            node_type: n.to_string(),
        })
        .collect()
    }
}

/// Parse from RELATIONSHIP:NodeType
impl FromStr for Link {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (r, n) = s
            .split_once(':')
            .ok_or_else(|| format!("Expected RELATIONSHIP:NodeType, found {}", s))?;
        Link::new(r.trim(), n.trim()).map_err(|e| e.to_string())
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.relationship, self.node_type)
    }
}

/// Min, max and mean of a set of values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Min: {}, Max: {}, Avg: {}", self.min, self.max, self.avg)
    }
}

/// Sample counts split by diagnosis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct People {
    pub sick: u64,
    pub healthy: u64,
    pub undiagnosed: u64,
}

fn first_count(db: &dyn GraphSource, query: &str, col: &str, what: &str) -> anyhow::Result<u64> {
    let res = db.run_query(query)?;
    match res.first() {
        Some(r) => r.count(col),
        None => {
            info!("No results found for {}", what);
            Ok(0)
        }
    }
}

/// Number of biological samples diagnosed with disease
pub fn sample_count(db: &dyn GraphSource, disease: &str) -> anyhow::Result<u64> {
    let query = format!(
        "MATCH (d:Disease {{name: {}}})<-[:HAS_DISEASE]-(s:Biological_sample) \
         RETURN count(s) AS count",
        quote_str(disease)
    );
    first_count(db, &query, "count", disease)
        .with_context(|| format!("Error getting sample count for {}", disease))
}

fn name_count_pairs(
    db: &dyn GraphSource,
    query: &str,
    count_col: &str,
) -> anyhow::Result<Vec<(String, u64)>> {
    let mut v = Vec::new();
    for r in db.run_query(query)? {
        match r.str("name") {
            Some(name) => v.push((name.to_owned(), r.count(count_col)?)),
            None => warn!("Skipping disease without a name"),
        }
    }
    Ok(v)
}

/// Diseases with at least one sample, ordered by decreasing sample count.
/// Optionally restricted to a single disease and/or the top_k diseases
pub fn disease_counts(
    db: &dyn GraphSource,
    name: Option<&str>,
    top_k: Option<usize>,
) -> anyhow::Result<Vec<(String, u64)>> {
    let filter = name
        .map(|s| format!(" {{name: {}}}", quote_str(s)))
        .unwrap_or_default();
    let limit = top_k.map(|k| format!(" LIMIT {}", k)).unwrap_or_default();
    let query = format!(
        "MATCH (b:Disease{}) \
         OPTIONAL MATCH (a)-[r:HAS_DISEASE]->(b) \
         WITH count(r) AS disease_count, b.name AS name \
         WHERE disease_count >= 1 \
         RETURN name, disease_count ORDER BY disease_count DESC, name{}",
        filter, limit
    );
    name_count_pairs(db, &query, "disease_count").with_context(|| "Error getting disease counts")
}

/// Diseases with at least min samples, ordered by decreasing sample count
pub fn diseases_with_min_samples(
    db: &dyn GraphSource,
    min: u64,
) -> anyhow::Result<Vec<(String, u64)>> {
    let query = format!(
        "MATCH (d:Disease)<-[:HAS_DISEASE]-(s:Biological_sample) \
         WITH d, count(s) AS count \
         WHERE count >= {} \
         RETURN d.name AS name, count ORDER BY count DESC, name",
        min
    );
    let v = name_count_pairs(db, &query, "count")
        .with_context(|| format!("Error getting diseases with at least {} samples", min))?;
    if v.is_empty() {
        info!("No diseases found with at least {} samples", min)
    }
    Ok(v)
}

/// Number of distinct nodes of the link's type associated with samples of disease
pub fn total_associations(db: &dyn GraphSource, disease: &str, link: &Link) -> anyhow::Result<u64> {
    let query = format!(
        "MATCH (d:Disease {{name: {}}})<-[:HAS_DISEASE]-(s:Biological_sample)-[:{}]->(n:{}) \
         RETURN count(DISTINCT n) AS total_associations",
        quote_str(disease),
        link.relationship(),
        link.node_type()
    );
    first_count(
        db,
        &query,
        "total_associations",
        &format!("{} and {}", disease, link),
    )
    .with_context(|| format!("Error getting total associations for {} ({})", disease, link))
}

/// For each node of the link's type, the number of distinct relationships from
/// samples of disease.  Nodes without a name are skipped
pub fn occurrences(db: &dyn GraphSource, disease: &str, link: &Link) -> anyhow::Result<OccurrenceMap> {
    let query = format!(
        "MATCH (d:Disease {{name: {}}})<-[:HAS_DISEASE]-(s:Biological_sample)-[r:{}]->(n:{}) \
         WITH n, count(DISTINCT r) AS samples_with_node \
         RETURN n.name AS node_name, samples_with_node",
        quote_str(disease),
        link.relationship(),
        link.node_type()
    );
    let res = db
        .run_query(&query)
        .with_context(|| format!("Error getting occurrences for {} ({})", disease, link))?;
    if res.is_empty() {
        info!("No {} occurrences found for {}", link.node_type(), disease);
    }
    let mut occ = OccurrenceMap::with_capacity(res.len());
    let mut unnamed = 0;
    for r in res.iter() {
        if let Some(name) = r.str("node_name") {
            occ.insert(name.to_owned(), r.count("samples_with_node")?);
        } else {
            unnamed += 1
        }
    }
    if unnamed > 0 {
        debug!("Skipped {} {} nodes without a name", unnamed, link.node_type());
    }
    Ok(occ)
}

/// Number of nodes with label
pub fn node_count(db: &dyn GraphSource, label: &str) -> anyhow::Result<u64> {
    let query = format!("MATCH (n:{}) RETURN count(n) AS count", check_ident(label)?);
    first_count(db, &query, "count", label)
        .with_context(|| format!("Error getting node count for {}", label))
}

fn first_stats(db: &dyn GraphSource, query: &str) -> anyhow::Result<Option<Stats>> {
    let res = db.run_query(query)?;
    let r = match res.first() {
        Some(r) => r,
        None => return Ok(None),
    };
    Ok(match (r.number("min")?, r.number("max")?, r.number("avg")?) {
        (Some(min), Some(max), Some(avg)) => Some(Stats { min, max, avg }),
        _ => None,
    })
}

/// Min, max and average number of rel relationships per start node
pub fn relationship_stats(
    db: &dyn GraphSource,
    start: &str,
    rel: &str,
    end: &str,
) -> anyhow::Result<Option<Stats>> {
    let query = format!(
        "MATCH (a:{})-[r:{}]->(b:{}) \
         WITH count(DISTINCT r) AS rel_count, a AS a \
         RETURN min(rel_count) AS min, max(rel_count) AS max, avg(rel_count) AS avg",
        check_ident(start)?,
        check_ident(rel)?,
        check_ident(end)?
    );
    first_stats(db, &query)
        .with_context(|| format!("Error getting statistics for {} -> [{}] -> {}", start, rel, end))
}

/// Min, max and average of a relationship property
pub fn attribute_stats(
    db: &dyn GraphSource,
    start: &str,
    rel: &str,
    end: &str,
    attribute: &str,
) -> anyhow::Result<Option<Stats>> {
    let query = format!(
        "MATCH (a:{})-[r:{}]->(b:{}) \
         WITH collect(r.{}) AS values \
         UNWIND values AS value \
         RETURN min(value) AS min, max(value) AS max, avg(value) AS avg",
        check_ident(start)?,
        check_ident(rel)?,
        check_ident(end)?,
        check_ident(attribute)?
    );
    first_stats(db, &query).with_context(|| {
        format!(
            "Error getting statistics of {} for {} -> [{}] -> {}",
            attribute, start, rel, end
        )
    })
}

/// Samples with a disease other than control, samples with control and samples without diagnosis
pub fn people_counts(db: &dyn GraphSource, control: &str) -> anyhow::Result<People> {
    let control = quote_str(control);
    let sick = first_count(
        db,
        &format!(
            "MATCH (b:Disease)<-[:HAS_DISEASE]-(a:Biological_sample) \
             WHERE b.name <> {} RETURN count(DISTINCT a) AS sick_people",
            control
        ),
        "sick_people",
        "sick people",
    )?;
    let healthy = first_count(
        db,
        &format!(
            "MATCH (b:Disease)<-[:HAS_DISEASE]-(a:Biological_sample) \
             WHERE b.name = {} RETURN count(DISTINCT a) AS healthy_people",
            control
        ),
        "healthy_people",
        "healthy people",
    )?;
    let undiagnosed = first_count(
        db,
        "MATCH (a:Biological_sample) \
         WHERE NOT (a)-[:HAS_DISEASE]->() RETURN count(a) AS undiagnosed",
        "undiagnosed",
        "undiagnosed people",
    )?;
    Ok(People {
        sick,
        healthy,
        undiagnosed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        mock::{rec, MemorySource},
        Value,
    };

    #[test]
    fn link_parsing() {
        let l: Link = "HAS_DAMAGE:Gene".parse().unwrap();
        assert_eq!(l.relationship(), "HAS_DAMAGE");
        assert_eq!(l.node_type(), "Gene");
        assert_eq!(l.to_string(), "HAS_DAMAGE:Gene");
        assert!("HAS_DAMAGE".parse::<Link>().is_err());
        assert!("HAS DAMAGE:Gene".parse::<Link>().is_err());
        assert_eq!(Link::defaults().len(), 3);
        assert_eq!(Link::defaults()[0].node_type(), "Phenotype");
    }

    #[test]
    fn sample_count_quotes_name() {
        let db = MemorySource::new(vec![vec![rec(vec![("count", Value::Int(31))])]]);
        assert_eq!(sample_count(&db, "Crohn\"s disease").unwrap(), 31);
        assert!(db.queries()[0].contains(r#"{name: "Crohn\"s disease"}"#));
    }

    #[test]
    fn empty_result_is_zero() {
        let db = MemorySource::new(vec![vec![], vec![]]);
        assert_eq!(sample_count(&db, "control").unwrap(), 0);
        let link = Link::new("HAS_DAMAGE", "Gene").unwrap();
        assert_eq!(total_associations(&db, "asthma", &link).unwrap(), 0);
    }

    #[test]
    fn occurrences_skip_unnamed() {
        let db = MemorySource::new(vec![vec![
            rec(vec![("node_name", "TP53".into()), ("samples_with_node", Value::Int(4))]),
            rec(vec![("node_name", Value::Null), ("samples_with_node", Value::Int(2))]),
            rec(vec![("node_name", "BRCA1".into()), ("samples_with_node", Value::Int(1))]),
        ]]);
        let link = Link::new("HAS_DAMAGE", "Gene").unwrap();
        let occ = occurrences(&db, "asthma", &link).unwrap();
        assert_eq!(occ.len(), 2);
        assert_eq!(occ["TP53"], 4);
        assert_eq!(occ["BRCA1"], 1);
        let q = &db.queries()[0];
        assert!(q.contains("[r:HAS_DAMAGE]->(n:Gene)"));
    }

    #[test]
    fn occurrences_empty() {
        let db = MemorySource::new(vec![vec![]]);
        let link = Link::new("HAS_PROTEIN", "Protein").unwrap();
        assert!(occurrences(&db, "asthma", &link).unwrap().is_empty());
    }

    #[test]
    fn disease_count_queries() {
        let db = MemorySource::new(vec![
            vec![
                rec(vec![("name", "control".into()), ("disease_count", Value::Int(40))]),
                rec(vec![("name", Value::Null), ("disease_count", Value::Int(9))]),
                rec(vec![("name", "asthma".into()), ("disease_count", Value::Int(7))]),
            ],
            vec![rec(vec![("name", "asthma".into()), ("count", Value::Int(7))])],
        ]);
        let v = disease_counts(&db, None, Some(10)).unwrap();
        assert_eq!(
            v,
            vec![("control".to_owned(), 40), ("asthma".to_owned(), 7)]
        );
        let v = diseases_with_min_samples(&db, 5).unwrap();
        assert_eq!(v, vec![("asthma".to_owned(), 7)]);

        let q = db.queries();
        assert!(q[0].ends_with("LIMIT 10"));
        assert!(!q[0].contains("{name:"));
        assert!(q[1].contains("WHERE count >= 5"));
    }

    #[test]
    fn stats_queries() {
        let db = MemorySource::new(vec![
            vec![rec(vec![
                ("min", Value::Int(1)),
                ("max", Value::Int(9)),
                ("avg", Value::Float(3.5)),
            ])],
            vec![rec(vec![
                ("min", Value::Null),
                ("max", Value::Null),
                ("avg", Value::Null),
            ])],
        ]);
        let s = relationship_stats(&db, "Biological_sample", "HAS_DAMAGE", "Gene")
            .unwrap()
            .unwrap();
        assert_eq!(
            s,
            Stats {
                min: 1.0,
                max: 9.0,
                avg: 3.5
            }
        );
        assert_eq!(s.to_string(), "Min: 1, Max: 9, Avg: 3.5");
        assert_eq!(
            attribute_stats(&db, "Gene", "ASSOCIATED_WITH", "Disease", "score").unwrap(),
            None
        );
        assert!(db.queries()[1].contains("collect(r.score)"));
    }

    #[test]
    fn bad_label_is_rejected_before_query() {
        let db = MemorySource::new(vec![]);
        assert!(node_count(&db, "Gene) DETACH DELETE (n").is_err());
        assert!(db.queries().is_empty());
    }

    #[test]
    fn people() {
        let db = MemorySource::new(vec![
            vec![rec(vec![("sick_people", Value::Int(120))])],
            vec![rec(vec![("healthy_people", Value::Int(40))])],
            vec![rec(vec![("undiagnosed", Value::Int(3))])],
        ]);
        let p = people_counts(&db, "control").unwrap();
        assert_eq!(
            p,
            People {
                sick: 120,
                healthy: 40,
                undiagnosed: 3
            }
        );
        assert!(db.queries()[0].contains("<> \"control\""));
    }
}
