use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use std::time::Instant;

pub struct SuggestionEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> SuggestionEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("🚀 Starting suggestion run");
        self.monitor.log_stats("Start");

        // Extract
        tracing::info!("📥 Extracting profiles, contexts and categories...");
        let dataset = self.pipeline.extract().await?;
        tracing::info!(
            "📥 Extracted {} profiles x {} contexts",
            dataset.users.len(),
            dataset.contexts.len()
        );
        self.monitor.log_stats("Extract");

        // Transform
        tracing::info!("🧺 Building bundles...");
        let run = self.pipeline.transform(dataset).await?;
        tracing::info!(
            "🧺 {} pairs processed, {} failed units, {} lines",
            run.pairs_processed,
            run.failed_units,
            run.lines.len()
        );
        self.monitor.log_stats("Transform");

        // Load
        tracing::info!("💾 Writing run file...");
        let output_path = self.pipeline.load(run).await?;
        tracing::info!("📁 Output saved to: {}", output_path);
        self.monitor.log_stats("Load");

        self.monitor.log_final_stats();
        tracing::info!("⏱️ Total run time: {:?}", started.elapsed());
        Ok(output_path)
    }
}
