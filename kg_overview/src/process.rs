use kg_graph::{query, GraphSource};
use utils::AnalysisLog;

use crate::config::Config;

/// Disease section.  The total counts every disease with at least one sample;
/// only those with at least min_occurrence samples are listed
fn disease_counts(cfg: &Config, db: &dyn GraphSource, log: &mut AnalysisLog) -> anyhow::Result<()> {
    log.section("Disease analysis")?;
    let v = query::disease_counts(db, None, cfg.top_k())?;
    log.line(format!("Total number of diseases: {}", v.len()))?;
    log.line("Diseases by count")?;
    for (name, n) in v.iter().take_while(|(_, n)| *n >= cfg.min_occurrence()) {
        log.line(format!("{}, {}", name, n))?
    }
    Ok(())
}

fn node_counts(cfg: &Config, db: &dyn GraphSource, log: &mut AnalysisLog) -> anyhow::Result<()> {
    log.section("Node counts")?;
    for label in cfg.labels() {
        let n = query::node_count(db, label)?;
        log.line(format!("{}: {}", label, n))?
    }
    Ok(())
}

fn relationship_stats(
    cfg: &Config,
    db: &dyn GraphSource,
    log: &mut AnalysisLog,
) -> anyhow::Result<()> {
    log.section("Number of Relationships")?;
    for r in cfg.relationships() {
        log.line(r)?;
        match query::relationship_stats(db, &r.start, &r.rel, &r.end)? {
            Some(s) => log.line(s)?,
            None => log.line("No relationships found")?,
        }
    }
    Ok(())
}

fn attribute_stats(cfg: &Config, db: &dyn GraphSource, log: &mut AnalysisLog) -> anyhow::Result<()> {
    log.section("Relationship attributes")?;
    for r in cfg.attributes() {
        let attr = r.attribute.as_deref().unwrap_or_default();
        log.line(format!("{}  | Attribute: {}", r, attr))?;
        match query::attribute_stats(db, &r.start, &r.rel, &r.end, attr)? {
            Some(s) => log.line(s)?,
            None => log.line("No values found")?,
        }
    }
    Ok(())
}

fn people(cfg: &Config, db: &dyn GraphSource, log: &mut AnalysisLog) -> anyhow::Result<()> {
    log.section("People analysis")?;
    let p = query::people_counts(db, cfg.control())?;
    log.line(format!("Number of sick people: {}", p.sick))?;
    log.line(format!("Number of healthy people: {}", p.healthy))?;
    log.line(format!("Number of people without diagnosis: {}", p.undiagnosed))
}

pub fn process_overview(cfg: &Config, db: &dyn GraphSource) -> anyhow::Result<()> {
    debug!("Starting processing");
    let mut log = AnalysisLog::create(cfg.log_file())?;
    log.line("Graph structure overview")?;

    disease_counts(cfg, db, &mut log)?;
    node_counts(cfg, db, &mut log)?;
    relationship_stats(cfg, db, &mut log)?;
    if !cfg.attributes().is_empty() {
        attribute_stats(cfg, db, &mut log)?;
    }
    people(cfg, db, &mut log)?;
    debug!("Overview written to {}", log.path().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use super::*;
    use crate::config::RelSpec;
    use kg_graph::{ConnectionConfig, Record, Value};

    /// Answers each query with the result of the first rule whose pattern occurs in the query
    struct RuleSource(Vec<(&'static str, Vec<Record>)>);

    impl GraphSource for RuleSource {
        fn run_query(&self, query: &str) -> anyhow::Result<Vec<Record>> {
            Ok(self
                .0
                .iter()
                .find(|(p, _)| query.contains(p))
                .map(|(_, r)| r.clone())
                .unwrap_or_default())
        }
    }

    fn rec(fields: Vec<(&str, Value)>) -> Record {
        fields.into_iter().map(|(k, v)| (k.to_owned(), v)).collect()
    }

    fn disease(name: &str, n: i64) -> Record {
        rec(vec![("name", name.into()), ("disease_count", Value::Int(n))])
    }

    fn stats(min: i64, max: i64, avg: f64) -> Vec<Record> {
        vec![rec(vec![
            ("min", Value::Int(min)),
            ("max", Value::Int(max)),
            ("avg", Value::Float(avg)),
        ])]
    }

    #[test]
    fn overview_log() {
        let db = RuleSource(vec![
            (
                "disease_count",
                vec![disease("control", 40), disease("asthma", 7), disease("gout", 2)],
            ),
            ("(n:Gene)", vec![rec(vec![("count", Value::Int(120))])]),
            ("(n:Disease)", vec![rec(vec![("count", Value::Int(3))])]),
            ("[r:HAS_DAMAGE]", stats(1, 9, 2.5)),
            ("collect(r.score)", stats(0, 1, 0.5)),
            ("sick_people", vec![rec(vec![("sick_people", Value::Int(9))])]),
            ("healthy_people", vec![rec(vec![("healthy_people", Value::Int(40))])]),
            ("undiagnosed", vec![rec(vec![("undiagnosed", Value::Int(1))])]),
        ]);

        let dir = tempfile::tempdir().unwrap();
        let mut cfg = Config::new(
            ConnectionConfig::new("http://localhost:7474", "neo4j"),
            dir.path().join("log.txt"),
            "control".to_owned(),
        );
        cfg.set_labels(vec!["Gene".to_owned(), "Disease".to_owned()]);
        cfg.set_relationships(vec![
            "Biological_sample:HAS_DAMAGE:Gene".parse::<RelSpec>().unwrap(),
            "Phenotype:MAPS_TO:Disease".parse::<RelSpec>().unwrap(),
        ]);
        cfg.set_attributes(vec!["Gene:ASSOCIATED_WITH:Disease:score"
            .parse::<RelSpec>()
            .unwrap()]);

        process_overview(&cfg, &db).unwrap();

        let expected = "\
Graph structure overview

------------------------- Disease analysis -------------------------
Total number of diseases: 3
Diseases by count
control, 40
asthma, 7

------------------------- Node counts -------------------------
Gene: 120
Disease: 3

------------------------- Number of Relationships -------------------------
Biological_sample -> [HAS_DAMAGE] -> Gene
Min: 1, Max: 9, Avg: 2.5
Phenotype -> [MAPS_TO] -> Disease
No relationships found

------------------------- Relationship attributes -------------------------
Gene -> [ASSOCIATED_WITH] -> Disease  | Attribute: score
Min: 0, Max: 1, Avg: 0.5

------------------------- People analysis -------------------------
Number of sick people: 9
Number of healthy people: 40
Number of people without diagnosis: 1
";
        let p: PathBuf = dir.path().join("log.txt");
        assert_eq!(fs::read_to_string(p).unwrap(), expected);
    }
}
