use crate::aggregate::Mode;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashSet,
    fmt::Debug,
    fs,
    ops::RangeBounds,
    path::{Path, PathBuf},
};

/// Plotting job configuration.
///
/// Loaded from a TOML file holding one `[[job]]` table per chart and
/// validated before use. See [`Config::from_file`] for loading.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Jobs to run, one rendered image each.
    #[serde(rename = "job")]
    pub jobs: Vec<Job>,
}

/// One windowed-aggregation-and-plot job.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Unique job name, used to select a single job from the CLI.
    pub name: String,

    /// Default input file for series that do not name their own.
    pub samples_file: Option<PathBuf>,

    /// Number of consecutive samples aggregated into one window
    /// (commonly the population size of one generation).
    pub window_size: usize,

    /// Chart title.
    pub title: String,
    /// Horizontal axis description.
    pub x_label: String,
    /// Vertical axis description.
    pub y_label: String,
    /// Optional upper bound of the horizontal axis.
    pub x_limit: Option<f64>,

    /// Image file the chart is written to.
    pub output_file: PathBuf,

    /// Series drawn on the chart, in draw order.
    #[serde(rename = "series")]
    pub series_vec: Vec<Series>,
}

/// One line series of a job.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Series {
    /// Legend label.
    pub label: String,

    /// Input file of this series, overriding the job default.
    pub samples_file: Option<PathBuf>,

    /// Per-window statistic.
    pub mode: Mode,

    /// Normalization constant every window value is divided by.
    #[serde(default = "default_norm_const")]
    pub norm_const: f64,
}

fn default_norm_const() -> f64 {
    1.0
}

impl Config {
    /// Load a [`Config`] from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let config: Config = toml::from_str(&contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.jobs.is_empty() {
            bail!("config must contain at least one job");
        }

        let mut names = HashSet::new();
        for job in &self.jobs {
            if !names.insert(job.name.as_str()) {
                bail!("duplicate job name {:?}", job.name);
            }
            job.validate()
                .with_context(|| format!("invalid job {:?}", job.name))?;
        }

        Ok(())
    }
}

impl Job {
    fn validate(&self) -> Result<()> {
        check_num(self.window_size, 1..1_000_000).context("invalid window size")?;

        if let Some(x_limit) = self.x_limit {
            check_num(x_limit, 1.0..1e9).context("invalid x limit")?;
        }

        if self.series_vec.is_empty() {
            bail!("job must contain at least one series");
        }
        for series in &self.series_vec {
            series
                .validate(self)
                .with_context(|| format!("invalid series {:?}", series.label))?;
        }

        Ok(())
    }

    /// Input file a series of this job reads from.
    pub fn samples_file<'a>(&'a self, series: &'a Series) -> Result<&'a Path> {
        series
            .samples_file
            .as_deref()
            .or(self.samples_file.as_deref())
            .with_context(|| {
                format!("series {:?} has no samples file and the job sets no default", series.label)
            })
    }
}

impl Series {
    fn validate(&self, job: &Job) -> Result<()> {
        if self.label.is_empty() {
            bail!("series label must not be empty");
        }
        if !self.norm_const.is_finite() || self.norm_const == 0.0 {
            bail!(
                "normalization constant must be finite and nonzero, but is {}",
                self.norm_const
            );
        }
        job.samples_file(self)?;
        Ok(())
    }
}

fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}
