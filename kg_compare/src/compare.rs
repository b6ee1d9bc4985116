use std::{
    collections::{HashMap, HashSet},
    fmt,
    str::FromStr,
};

use thiserror::Error;

pub use kg_graph::query::OccurrenceMap;

/// Entity name -> occurrence count / cohort size
pub type PercentageMap = HashMap<String, f64>;

/// Differences within this distance of a boundary are taken to lie on it
/// (e.g., 8/10 - 7/10 gives 0.10000000000000009)
const BOUNDARY_TOLERANCE: f64 = 1e-9;

pub const DEFAULT_SECTIONS: [f64; 11] = [
    -1.0, -0.75, -0.5, -0.25, -0.1, 0.0, 0.1, 0.25, 0.5, 0.75, 1.0,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cohort {
    Disease,
    Control,
}

impl fmt::Display for Cohort {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Cohort::Disease => write!(f, "disease"),
            Cohort::Control => write!(f, "control"),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CompareError {
    #[error("{0} cohort has no samples; occurrences can not be normalized")]
    ZeroTotal(Cohort),
    #[error("invalid section boundaries: {0}")]
    InvalidSections(String),
}

/// Divide every count by the cohort size
pub fn normalize(
    occ: &OccurrenceMap,
    total: u64,
    cohort: Cohort,
) -> Result<PercentageMap, CompareError> {
    if total == 0 {
        return Err(CompareError::ZeroTotal(cohort));
    }
    let t = total as f64;
    Ok(occ.iter().map(|(k, n)| (k.clone(), *n as f64 / t)).collect())
}

/// disease - control for every key in either map.  Missing keys count as 0
pub fn percentage_diff(disease: &PercentageMap, control: &PercentageMap) -> PercentageMap {
    let keys: HashSet<&String> = disease.keys().chain(control.keys()).collect();
    keys.into_iter()
        .map(|k| {
            let d = disease.get(k).copied().unwrap_or(0.0);
            let c = control.get(k).copied().unwrap_or(0.0);
            (k.clone(), d - c)
        })
        .collect()
}

/// Sections
///
/// Non-empty, strictly ascending list of finite bucket boundaries.
/// Boundary i closes the interval (b[i-1], b[i]]; the first bucket
/// only holds values equal to b[0]
#[derive(Debug, Clone, PartialEq)]
pub struct Sections(Vec<f64>);

impl Sections {
    pub fn new(boundaries: Vec<f64>) -> Result<Self, CompareError> {
        if boundaries.is_empty() {
            return Err(CompareError::InvalidSections("no boundaries".to_owned()));
        }
        if let Some(x) = boundaries.iter().find(|x| !x.is_finite()) {
            return Err(CompareError::InvalidSections(format!(
                "non finite boundary {}",
                x
            )));
        }
        if let Some(w) = boundaries.windows(2).find(|w| w[1] <= w[0]) {
            return Err(CompareError::InvalidSections(format!(
                "boundaries not strictly ascending ({} followed by {})",
                w[0], w[1]
            )));
        }
        Ok(Self(boundaries))
    }

    pub fn boundaries(&self) -> &[f64] {
        &self.0
    }

    /// Index of the smallest boundary >= x, or None if x lies outside
    /// [first boundary, last boundary].  x matches a boundary if within
    /// BOUNDARY_TOLERANCE of it
    pub fn bucket(&self, x: f64) -> Option<usize> {
        let b = &self.0;
        if x.is_nan() || x < b[0] - BOUNDARY_TOLERANCE {
            return None;
        }
        let i = b.partition_point(|y| *y < x - BOUNDARY_TOLERANCE);
        if i < b.len() {
            Some(i)
        } else {
            None
        }
    }

    pub fn count<'a, I: IntoIterator<Item = &'a f64>>(&self, values: I) -> SectionCounts {
        let mut counts = vec![0; self.0.len()];
        let mut out_of_range = 0;
        for x in values {
            match self.bucket(*x) {
                Some(i) => counts[i] += 1,
                None => out_of_range += 1,
            }
        }
        if out_of_range > 0 {
            warn!(
                "{} values lie outside the section boundaries {} - {}",
                out_of_range,
                self.0[0],
                self.0[self.0.len() - 1]
            )
        }
        SectionCounts {
            boundaries: self.0.clone(),
            counts,
            out_of_range,
        }
    }

    /// (lower, upper) limits of each bucket.  The first bucket has no lower limit
    pub fn intervals(&self) -> impl Iterator<Item = (Option<f64>, f64)> + '_ {
        self.0
            .iter()
            .enumerate()
            .map(move |(i, b)| (if i > 0 { Some(self.0[i - 1]) } else { None }, *b))
    }
}

impl Default for Sections {
    fn default() -> Self {
        Self(DEFAULT_SECTIONS.to_vec())
    }
}

/// Parse from a comma separated list of boundaries
impl FromStr for Sections {
    type Err = CompareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let v = s
            .split(',')
            .map(|x| {
                x.trim()
                    .parse::<f64>()
                    .map_err(|_| CompareError::InvalidSections(format!("could not parse '{}'", x)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(v)
    }
}

/// Number of values falling in each section
#[derive(Debug, Clone, PartialEq)]
pub struct SectionCounts {
    boundaries: Vec<f64>,
    counts: Vec<usize>,
    out_of_range: usize,
}

impl SectionCounts {
    /// Count for the bucket ending at boundary
    #[cfg(test)]
    pub fn get(&self, boundary: f64) -> Option<usize> {
        self.boundaries
            .iter()
            .position(|b| *b == boundary)
            .map(|i| self.counts[i])
    }

    /// (upper boundary, count) in ascending order of boundary
    pub fn iter(&self) -> impl Iterator<Item = (f64, usize)> + '_ {
        self.boundaries.iter().copied().zip(self.counts.iter().copied())
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Number of values assigned to a bucket
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn out_of_range(&self) -> usize {
        self.out_of_range
    }
}

/// Result of comparing a disease cohort against the control cohort
#[derive(Debug, Clone)]
pub struct Comparison {
    pub disease: PercentageMap,
    pub control: PercentageMap,
    pub diff: PercentageMap,
    pub sections: SectionCounts,
}

impl Comparison {
    /// Differences sorted by decreasing value (ties by name)
    pub fn sorted_diff(&self) -> Vec<(&str, f64)> {
        let mut v: Vec<_> = self.diff.iter().map(|(k, x)| (k.as_str(), *x)).collect();
        v.sort_unstable_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        v
    }
}

/// Normalize both occurrence maps by their cohort sizes, take the difference
/// for every entity and count the differences falling in each section
pub fn compare(
    disease: &OccurrenceMap,
    control: &OccurrenceMap,
    disease_total: u64,
    control_total: u64,
    sections: &Sections,
) -> Result<Comparison, CompareError> {
    let disease = normalize(disease, disease_total, Cohort::Disease)?;
    let control = normalize(control, control_total, Cohort::Control)?;
    let diff = percentage_diff(&disease, &control);
    let sections = sections.count(diff.values());
    Ok(Comparison {
        disease,
        control,
        diff,
        sections,
    })
}
