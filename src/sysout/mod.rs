use indicatif::{ProgressBar, ProgressStyle};

use crate::reporter::PipelineReporter;

#[derive(Debug)]
pub struct PipelineReporterSysOut {
    progress_bar: ProgressBar,
    done: usize,
    failed: usize,
}

impl PipelineReporterSysOut {
    pub fn new() -> Self {
        let progress_bar = ProgressBar::new_spinner();
        Self { progress_bar, done: 0, failed: 0 }
    }
}

impl Default for PipelineReporterSysOut {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineReporter for PipelineReporterSysOut {
    fn set_total_dirs(&mut self, total_dirs: usize) {
        self.progress_bar.set_length(total_dirs as u64);
        self.progress_bar.set_style(ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.green/blue}] {pos}/{len} | {msg}")
            .progress_chars("#>-"));
    }

    fn update_current_dir(&mut self, name: &str) {
        self.progress_bar.set_message(&format!("Processing {}", name));
    }

    fn update_dir_done(&mut self, failed: bool) {
        self.done += 1;
        if failed {
            self.failed += 1;
        }
        self.progress_bar.set_position(self.done as u64);
    }

    fn finish(&mut self) {
        let message = if self.failed > 0 {
            format!("Processed #{}, with errors #{}", self.done, self.failed)
        } else {
            format!("Processed #{}", self.done)
        };
        self.progress_bar.finish_with_message(&message);
    }
}
