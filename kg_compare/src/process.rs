use std::path::Path;

use anyhow::Context;
use kg_graph::{
    query::{self, Link},
    GraphSource,
};
use utils::AnalysisLog;

use crate::{
    compare::{compare, Comparison, OccurrenceMap},
    config::Config,
    plot,
    report::{self, create_dir, disease_folder},
};

/// Occurrences of one node type for a cohort
struct Group<'a> {
    link: &'a Link,
    occurrences: OccurrenceMap,
}

/// Fetch occurrences and total associations for each link, optionally saving
/// the tables and occurrence plots to the disease folder
fn analyze_groups<'a>(
    cfg: &'a Config,
    db: &dyn GraphSource,
    disease: &str,
    samples: u64,
) -> anyhow::Result<Vec<Group<'a>>> {
    let folder = disease_folder(cfg.output_dir(), disease);
    let mut v = Vec::with_capacity(cfg.links().len());
    for link in cfg.links() {
        let nt = link.node_type();
        let total_associations = query::total_associations(db, disease, link)?;
        let occurrences = query::occurrences(db, disease, link)?;
        debug!(
            "{}: {} {} nodes, {} total associations",
            disease,
            occurrences.len(),
            nt,
            total_associations
        );

        if cfg.save_analysis() || cfg.plot_occurrences() {
            create_dir(&folder)?
        }
        if cfg.save_analysis() {
            report::write_occurrences(&folder.join(format!("occurrences_{}.csv", nt)), &occurrences)?;
            report::write_summary(
                &folder.join(format!("summary_{}.csv", nt)),
                total_associations,
                samples,
            )?;
        }
        if cfg.plot_occurrences() {
            plot::plot_occurrences(
                &folder.join(format!("occ_{}_plot.png", nt)),
                &occurrences,
                total_associations,
                samples,
                disease,
                nt,
            )?;
        }
        v.push(Group { link, occurrences })
    }
    Ok(v)
}

/// Write the comparison and section count charts for one node type.  A chart
/// that can not be drawn is reported and skipped
fn plot_node_type(cfg: &Config, folder: &Path, disease: &str, nt: &str, cmp: &Comparison) {
    let res = plot::plot_comparison(
        &folder.join(format!("occ_diff_{}_plot.png", nt)),
        cmp,
        cfg.sections(),
        disease,
        nt,
    );
    if let Err(e) = res {
        warn!("Could not plot {} differences for {}: {:#}", nt, disease, e)
    }
    let res = plot::plot_section_counts(
        &folder.join(format!("occ_count_percentage_{}_plot.png", nt)),
        &cmp.sections,
        cfg.sections(),
        disease,
        nt,
    );
    if let Err(e) = res {
        warn!("Could not plot {} section counts for {}: {:#}", nt, disease, e)
    }
}

/// Compare every node type for a disease before anything is written to the
/// log, so a disease that fails leaves no trace there
fn compare_disease(
    cfg: &Config,
    db: &dyn GraphSource,
    log: &mut AnalysisLog,
    disease: &str,
    samples: u64,
    control_samples: u64,
    control_groups: &[Group],
) -> anyhow::Result<()> {
    let groups = analyze_groups(cfg, db, disease, samples)?;
    let comparisons = control_groups
        .iter()
        .zip(groups.iter())
        .map(|(ctrl, dis)| {
            let nt = dis.link.node_type();
            compare(
                &dis.occurrences,
                &ctrl.occurrences,
                samples,
                control_samples,
                cfg.sections(),
            )
            .map(|cmp| (nt, cmp))
            .with_context(|| format!("Error comparing {} occurrences for {}", nt, disease))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    log.section(disease)?;
    for (nt, cmp) in comparisons.iter() {
        log.line(format!(
            "{}: {} samples, {} control samples",
            nt, samples, control_samples
        ))?;
        log.line(format!(
            "  unique {}s: {} in disease, {} in control, {} combined",
            nt,
            cmp.disease.len(),
            cmp.control.len(),
            cmp.diff.len()
        ))?;
        for l in report::section_lines(cfg.sections(), &cmp.sections) {
            log.line(l)?
        }
    }

    if cfg.plot() {
        let folder = disease_folder(cfg.output_dir(), disease);
        match create_dir(&folder) {
            Ok(_) => {
                for (nt, cmp) in comparisons.iter() {
                    plot_node_type(cfg, &folder, disease, nt, cmp)
                }
            }
            Err(e) => warn!("No plots for {}: {:#}", disease, e),
        }
    }
    Ok(())
}

/// Strategy
///
/// Collect the occurrences for the control group once.  Then go through each
/// disease with enough samples, collect its occurrences, and compare them
/// against the control occurrences.  A failure for one disease is reported and
/// the disease is skipped
pub fn process_diseases(cfg: &Config, db: &dyn GraphSource) -> anyhow::Result<()> {
    debug!("Starting processing");
    let mut log = AnalysisLog::create(cfg.log_file())?;
    log.line("Disease analysis")?;

    let control_samples = query::sample_count(db, cfg.control())?;
    if control_samples == 0 {
        warn!("No samples found for control group {}", cfg.control())
    }
    let control_groups = analyze_groups(cfg, db, cfg.control(), control_samples)
        .with_context(|| format!("Error collecting data for control group {}", cfg.control()))?;

    let diseases = query::diseases_with_min_samples(db, cfg.min_samples())?;
    let (mut compared, mut skipped) = (0, 0);
    for (disease, samples) in diseases.iter().filter(|(d, _)| d != cfg.control()) {
        debug!("Comparing {} ({} samples)", disease, samples);
        match compare_disease(
            cfg,
            db,
            &mut log,
            disease,
            *samples,
            control_samples,
            &control_groups,
        ) {
            Ok(_) => compared += 1,
            Err(e) => {
                warn!("Skipping {}: {:#}", disease, e);
                skipped += 1
            }
        }
    }

    log.section("Summary")?;
    log.line(format!("Diseases compared: {}", compared))?;
    log.line(format!("Diseases skipped: {}", skipped))
}
