use std::{
    borrow::Cow,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Context;
use compress_io::compress::CompressIo;

use crate::compare::{OccurrenceMap, SectionCounts, Sections};

/// Output folder for a disease: the name lower cased, with anything other
/// than letters and digits replaced by '_'
pub fn disease_folder(output_dir: &Path, disease: &str) -> PathBuf {
    let name: String = disease
        .chars()
        .flat_map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().collect::<Vec<_>>()
            } else {
                vec!['_']
            }
        })
        .collect();
    output_dir.join(name)
}

pub fn create_dir(d: &Path) -> anyhow::Result<()> {
    if !d.exists() {
        trace!("Creating output directory {}", d.display());
        fs::create_dir_all(d)
            .with_context(|| format!("Error creating output directory {}", d.display()))?;
    }
    Ok(())
}

fn csv_field(s: &str) -> Cow<'_, str> {
    if s.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", s.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(s)
    }
}

/// Write Node,Occurrences table sorted by decreasing occurrences
pub fn write_occurrences(path: &Path, occ: &OccurrenceMap) -> anyhow::Result<()> {
    debug!("Writing occurrences to {}", path.display());
    let mut v: Vec<_> = occ.iter().collect();
    v.sort_unstable_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let mut wrt = CompressIo::new()
        .path(path)
        .bufwriter()
        .with_context(|| format!("Failed to open output file {}", path.display()))?;
    writeln!(wrt, "Node,Occurrences")?;
    for (node, n) in v {
        writeln!(wrt, "{},{}", csv_field(node), n)?
    }
    wrt.flush()
        .with_context(|| format!("Error writing to {}", path.display()))
}

pub fn write_summary(path: &Path, total_associations: u64, total_samples: u64) -> anyhow::Result<()> {
    debug!("Writing summary to {}", path.display());
    let mut wrt = CompressIo::new()
        .path(path)
        .bufwriter()
        .with_context(|| format!("Failed to open output file {}", path.display()))?;
    writeln!(wrt, "Total associations,Total samples")?;
    writeln!(wrt, "{},{}", total_associations, total_samples)?;
    wrt.flush()
        .with_context(|| format!("Error writing to {}", path.display()))
}

/// Labels for each section bucket: "<lower> - <upper>", or just the boundary for the first
pub fn interval_labels(sections: &Sections) -> Vec<String> {
    sections
        .intervals()
        .map(|(lo, hi)| match lo {
            Some(lo) => format!("{} - {}", lo, hi),
            None => format!("{}", hi),
        })
        .collect()
}

/// One line per bucket, for the analysis log
pub fn section_lines(sections: &Sections, counts: &SectionCounts) -> Vec<String> {
    let mut v: Vec<_> = interval_labels(sections)
        .into_iter()
        .zip(counts.iter())
        .map(|(l, (_, n))| format!("  {}: {}", l, n))
        .collect();
    if counts.out_of_range() > 0 {
        v.push(format!("  outside sections: {}", counts.out_of_range()))
    }
    v
}
