use std::{io::BufRead, path::Path};

use anyhow::Context;
use compress_io::compress::CompressIo;
use regex::Regex;
use utils::{get_next_line, is_section_header, section_header};

/// Largest disease total accepted from the log.  Every unlisted disease is
/// given an estimated count
pub const MAX_DISEASES: usize = 1_000_000;

/// Disease section of the analysis log
#[derive(Debug, PartialEq, Eq)]
pub struct DiseaseLog {
    /// Number of diseases with at least one sample
    pub total: usize,
    /// Sample counts of the listed diseases, in log order
    pub counts: Vec<u64>,
}

pub fn read_disease_log(p: &Path) -> anyhow::Result<DiseaseLog> {
    debug!("Reading disease counts from {}", p.display());
    let mut rdr = CompressIo::new()
        .path(p)
        .bufreader()
        .with_context(|| format!("Could not open log file {}", p.display()))?;
    parse_disease_log(&mut rdr).with_context(|| format!("Error reading {}", p.display()))
}

fn parse_disease_log<R: BufRead>(rdr: &mut R) -> anyhow::Result<DiseaseLog> {
    let header = section_header("Disease analysis");
    let total_re = Regex::new(r"^Total number of diseases:\s*(\d+)$")?;
    let count_re = Regex::new(r"^(.+?),\s*(\d+)$")?;

    let mut buf = String::new();
    let mut line = 0;
    let mut in_section = false;
    let mut found = false;
    let mut total = None;
    let mut counts = Vec::new();

    while let Some(s) = get_next_line(rdr, &mut buf)
        .with_context(|| format!("Error after reading {} lines", line))?
    {
        line += 1;
        if in_section {
            if is_section_header(s) {
                break;
            } else if let Some(c) = total_re.captures(s) {
                total = Some(
                    c[1].parse::<usize>()
                        .with_context(|| format!("{}: Error reading number of diseases", line))?,
                );
            } else if let Some(c) = count_re.captures(s) {
                counts.push(
                    c[2].parse::<u64>()
                        .with_context(|| format!("{}: Error reading disease count", line))?,
                );
            }
        } else if s == header {
            trace!("Disease section starts at line {}", line);
            in_section = true;
            found = true;
        }
    }

    if !found {
        return Err(anyhow!("Disease analysis section not found"));
    }
    let total = total.ok_or_else(|| anyhow!("Total number of diseases not found"))?;
    if total > MAX_DISEASES {
        return Err(anyhow!(
            "Total number of diseases {} is larger than the maximum of {}",
            total,
            MAX_DISEASES
        ));
    }
    debug!("{} diseases in total, {} listed", total, counts.len());
    Ok(DiseaseLog { total, counts })
}
