use std::path::{Path, PathBuf};

pub struct Config {
    input: PathBuf,
    output: PathBuf,
    seed: Option<u64>,
}

impl Config {
    pub fn new(input: PathBuf, output: PathBuf, seed: Option<u64>) -> Self {
        Self {
            input,
            output,
            seed,
        }
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}
