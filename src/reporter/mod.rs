/// Receives progress notifications while the pipeline runs.
pub trait PipelineReporter {
    fn set_total_dirs(&mut self, total_dirs: usize);
    fn update_current_dir(&mut self, name: &str);
    fn update_dir_done(&mut self, failed: bool);
    fn finish(&mut self);
}
