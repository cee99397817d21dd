use crate::aggregate::aggregate;
use crate::config::{Config, Job};
use crate::plot::render_chart;
use crate::samples::load_samples;
use anyhow::{Context, Result};
use std::path::Path;

pub struct Manager {
    cfg: Config,
}

impl Manager {
    pub fn new<P: AsRef<Path>>(config_file: P) -> Result<Self> {
        let cfg = Config::from_file(config_file).context("failed to construct cfg")?;
        log::info!("{cfg:#?}");

        Ok(Self { cfg })
    }

    /// Run the named job, or every job, end to end.
    pub fn render_jobs(&self, name: Option<&str>) -> Result<()> {
        match name {
            Some(name) => self.render_job(self.job(name)?),
            None => {
                for job in &self.cfg.jobs {
                    self.render_job(job)?;
                }
                Ok(())
            }
        }
    }

    /// Print the aggregate series of the named job to stdout as
    /// whitespace-separated columns, one row per window.
    pub fn print_aggregates(&self, name: &str) -> Result<()> {
        let job = self.job(name)?;
        let series_data = self.compute_job(job)?;

        print!("# window");
        for (label, _) in &series_data {
            print!(" {label:?}");
        }
        println!();

        let n_windows = series_data
            .iter()
            .map(|(_, values)| values.len())
            .max()
            .unwrap_or(0);
        for i_window in 0..n_windows {
            print!("{i_window}");
            for (_, values) in &series_data {
                match values.get(i_window) {
                    Some(value) => print!(" {value}"),
                    None => print!(" nan"),
                }
            }
            println!();
        }

        Ok(())
    }

    fn render_job(&self, job: &Job) -> Result<()> {
        let series_data = self.compute_job(job)?;

        render_chart(job, &series_data)
            .with_context(|| format!("failed to render job {:?}", job.name))?;
        log::info!("wrote {:?}", job.output_file);

        Ok(())
    }

    fn compute_job(&self, job: &Job) -> Result<Vec<(String, Vec<f64>)>> {
        let mut series_data = Vec::with_capacity(job.series_vec.len());

        for series in &job.series_vec {
            let file = job.samples_file(series)?;
            let samples = load_samples(file)
                .with_context(|| format!("failed to load samples of {:?}", series.label))?;
            log::info!("loaded {} samples from {file:?}", samples.len());

            let values = aggregate(&samples, job.window_size, series.mode, series.norm_const)
                .with_context(|| format!("failed to aggregate series {:?}", series.label))?;
            log::info!("aggregated {:?} into {} windows", series.label, values.len());

            series_data.push((series.label.clone(), values));
        }

        Ok(series_data)
    }

    fn job(&self, name: &str) -> Result<&Job> {
        self.cfg
            .jobs
            .iter()
            .find(|job| job.name == name)
            .with_context(|| format!("no job named {name:?}"))
    }
}
