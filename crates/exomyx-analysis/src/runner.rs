//! Pipeline runner.
//!
//! Executes a validated analysis against a set of genes:
//!   1. Schedule variant filters before gene filters and prioritisers
//!   2. Check for cancellation at every step barrier
//!   3. Run each step over all genes, in parallel above a size threshold
//!   4. Contain per-item errors, escalate provider errors per policy
//!   5. Emit a step report and a progress event after each step
//!
//! Steps never run concurrently with each other. Within a step each gene is
//! touched by exactly one worker.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rayon::prelude::*;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use exomyx_common::{
    AnalysisError, AnalysisMode, EvaluationError, FilterResult, FilterType, Gene, ProviderError, Result,
};
use exomyx_config::{ProviderErrorPolicy, RunnerConfig};
use exomyx_filters::{GeneEvaluation, GeneFilter, VariantFilter};
use exomyx_ranker::{Prioritiser, ScoringParallelism};

use crate::analysis::Analysis;
use crate::diagnostics::{AnalysisResults, Diagnostic, StepReport};
use crate::progress::{AnalysisProgress, CancellationToken, RunState};
use crate::step::{AnalysisContext, AnalysisStep};

// ── Step tallies ─────────────────────────────────────────────────────────────

/// Counts and contained problems from one step over some genes.
#[derive(Debug, Default)]
struct StepTally {
    evaluated: usize,
    passed: usize,
    failed: usize,
    errors: usize,
    diagnostics: Vec<Diagnostic>,
}

impl StepTally {
    fn record(&mut self, result: &FilterResult) {
        self.evaluated += 1;
        if result.passed() {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }

    fn merge(mut self, other: StepTally) -> StepTally {
        self.evaluated += other.evaluated;
        self.passed += other.passed;
        self.failed += other.failed;
        self.errors += other.errors;
        self.diagnostics.extend(other.diagnostics);
        self
    }
}

/// Whether a gene-level step looks at `gene`. PASS_ONLY skips genes with a
/// failed gene filter or without a passing variant.
fn gene_in_play(mode: AnalysisMode, gene: &Gene) -> bool {
    mode == AnalysisMode::Full || (gene.has_passing_variant() && gene.passed_filters())
}

/// Either a contained FAIL for the item, or the provider error that aborts the run.
fn contain(
    err: EvaluationError,
    filter_type: FilterType,
    policy: ProviderErrorPolicy,
    step: &str,
    subject: String,
    tally: &mut StepTally,
) -> std::result::Result<FilterResult, ProviderError> {
    let message = match err {
        EvaluationError::Item(message) => message,
        EvaluationError::Provider(provider_err) => match policy {
            ProviderErrorPolicy::Abort => return Err(provider_err),
            ProviderErrorPolicy::Record => provider_err.to_string(),
        },
    };
    debug!(step, subject = %subject, error = %message, "item evaluation failed");
    tally.errors += 1;
    tally.diagnostics.push(Diagnostic::warning(Some(step), Some(subject), message.clone()));
    Ok(FilterResult::fail_with_message(filter_type, message))
}

// ── Runner ───────────────────────────────────────────────────────────────────

/// Runs analyses. Holds only configuration and read-only providers, so one
/// runner can serve many runs, including concurrent ones.
#[derive(Clone)]
pub struct AnalysisRunner {
    config: RunnerConfig,
    context: AnalysisContext,
    pool: Option<Arc<rayon::ThreadPool>>,
    progress_tx: Option<broadcast::Sender<AnalysisProgress>>,
}

impl std::fmt::Debug for AnalysisRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisRunner")
            .field("config", &self.config)
            .field("context", &self.context)
            .field("dedicated_pool", &self.pool.is_some())
            .field("progress", &self.progress_tx.is_some())
            .finish()
    }
}

impl AnalysisRunner {
    pub fn new(config: RunnerConfig, context: AnalysisContext) -> Result<Self> {
        config
            .validate()
            .map_err(|e| AnalysisError::Config(e.to_string()))?;

        let pool = if config.parallel && config.worker_threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.worker_threads)
                .thread_name(|i| format!("exomyx-worker-{i}"))
                .build()
                .map_err(|e| AnalysisError::WorkerPool(e.to_string()))?;
            Some(Arc::new(pool))
        } else {
            None
        };

        Ok(Self { config, context, pool, progress_tx: None })
    }

    /// Open a progress channel sized from the config and subscribe to it.
    pub fn subscribe(&mut self) -> broadcast::Receiver<AnalysisProgress> {
        match &self.progress_tx {
            Some(tx) => tx.subscribe(),
            None => {
                let (tx, rx) = broadcast::channel(self.config.progress_capacity);
                self.progress_tx = Some(tx);
                rx
            }
        }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn run(&self, analysis: &Analysis, genes: Vec<Gene>) -> Result<AnalysisResults> {
        self.run_cancellable(analysis, genes, &CancellationToken::new())
    }

    /// Run on the blocking pool so async callers never stall their executor.
    pub async fn run_async(
        &self,
        analysis: Analysis,
        genes: Vec<Gene>,
        cancel: CancellationToken,
    ) -> Result<AnalysisResults> {
        let runner = self.clone();
        tokio::task::spawn_blocking(move || runner.run_cancellable(&analysis, genes, &cancel))
            .await
            .map_err(|e| AnalysisError::WorkerPool(format!("analysis task failed: {e}")))?
    }

    #[instrument(skip_all, fields(mode = %analysis.mode(), steps = analysis.steps().len(), genes = genes.len()))]
    pub fn run_cancellable(
        &self,
        analysis: &Analysis,
        mut genes: Vec<Gene>,
        cancel: &CancellationToken,
    ) -> Result<AnalysisResults> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let t0 = Instant::now();
        let schedule = analysis.execution_schedule();
        let steps_total = schedule.len();

        info!(run_id = %run_id, mode = %analysis.mode(), steps = steps_total, genes = genes.len(), "Starting analysis");

        let emit = |progress: AnalysisProgress| {
            if let Some(ref tx) = self.progress_tx {
                let _ = tx.send(progress);
            }
        };

        let mut diagnostics: Vec<Diagnostic> = analysis
            .warnings()
            .iter()
            .map(|w| Diagnostic::warning(None, None, w.clone()))
            .collect();
        let mut step_reports = Vec::with_capacity(steps_total);

        emit(AnalysisProgress::new(run_id, RunState::NotStarted, steps_total, "Analysis started"));

        for (index, step) in schedule.iter().enumerate() {
            if cancel.is_cancelled() {
                warn!(run_id = %run_id, completed_steps = index, "Analysis cancelled");
                let mut progress = AnalysisProgress::new(run_id, RunState::Aborted, steps_total, "Analysis cancelled");
                progress.steps_completed = index;
                emit(progress);
                return Err(AnalysisError::Cancelled { completed_steps: index });
            }

            let step_name = step.name();
            let t_step = Instant::now();
            debug!(run_id = %run_id, step = step_name, position = index, "Running step");

            let outcome = match step {
                AnalysisStep::VariantFilter(filter) => self.run_variant_filter(filter, analysis.mode(), &mut genes),
                AnalysisStep::GeneFilter(filter) => self.run_gene_filter(filter, analysis, &mut genes),
                AnalysisStep::Prioritiser(prioritiser) => self.run_prioritiser(prioritiser, analysis, &mut genes),
            };

            let tally = match outcome {
                Ok(tally) => tally,
                Err(source) => {
                    warn!(run_id = %run_id, step = step_name, error = %source, "Data provider failure, aborting");
                    let mut progress = AnalysisProgress::new(run_id, RunState::Aborted, steps_total, source.to_string());
                    progress.step = Some(step_name.to_string());
                    progress.steps_completed = index;
                    emit(progress);
                    return Err(AnalysisError::DataProvider { step: step_name.to_string(), source });
                }
            };

            if tally.errors > 0 {
                warn!(run_id = %run_id, step = step_name, errors = tally.errors, "Step recorded contained errors");
            }

            let report = StepReport {
                step: step_name.to_string(),
                position: index,
                evaluated: tally.evaluated,
                passed: tally.passed,
                failed: tally.failed,
                errors: tally.errors,
                duration_ms: t_step.elapsed().as_millis() as u64,
            };
            debug!(
                run_id = %run_id,
                step = step_name,
                evaluated = report.evaluated,
                passed = report.passed,
                failed = report.failed,
                "Step complete"
            );

            let mut progress = AnalysisProgress::new(
                run_id,
                RunState::Running { step_index: index },
                steps_total,
                format!("{step_name}: {} passed, {} failed", report.passed, report.failed),
            );
            progress.step = Some(step_name.to_string());
            progress.steps_completed = index + 1;
            progress.passed = report.passed;
            progress.failed = report.failed;
            emit(progress);

            diagnostics.extend(tally.diagnostics);
            step_reports.push(report);
        }

        let duration_ms = t0.elapsed().as_millis() as u64;
        let passed_genes = genes.iter().filter(|g| g.passed_filters()).count();

        info!(
            run_id      = %run_id,
            genes       = genes.len(),
            passed      = passed_genes,
            diagnostics = diagnostics.len(),
            duration_ms,
            "Analysis complete"
        );

        let mut progress = AnalysisProgress::new(
            run_id,
            RunState::Completed,
            steps_total,
            format!("Done. {passed_genes} of {} genes passed.", genes.len()),
        );
        progress.steps_completed = steps_total;
        emit(progress);

        Ok(AnalysisResults {
            run_id,
            state: RunState::Completed,
            mode: analysis.mode(),
            genes,
            step_reports,
            diagnostics,
            started_at,
            finished_at: Utc::now(),
            duration_ms,
        })
    }

    // ── Step execution ───────────────────────────────────────────────────────

    fn parallelism(&self) -> ScoringParallelism {
        ScoringParallelism { enabled: self.config.parallel, threshold: self.config.parallel_threshold }
    }

    fn goes_parallel(&self, n: usize) -> bool {
        self.config.parallel && n >= self.config.parallel_threshold
    }

    /// Apply `per_gene` to every gene, fanning out across the worker pool for
    /// large gene sets. Results come back in gene order.
    fn for_each_gene<F>(&self, genes: &mut [Gene], per_gene: F) -> std::result::Result<StepTally, ProviderError>
    where
        F: Fn(&mut Gene) -> std::result::Result<StepTally, ProviderError> + Sync + Send,
    {
        let tallies: Vec<StepTally> = if self.goes_parallel(genes.len()) {
            let per_gene = &per_gene;
            let mut work = move || genes.into_par_iter().map(per_gene).collect::<std::result::Result<Vec<_>, _>>();
            match &self.pool {
                Some(pool) => pool.install(work)?,
                None => work()?,
            }
        } else {
            genes.iter_mut().map(&per_gene).collect::<std::result::Result<Vec<_>, _>>()?
        };
        Ok(tallies.into_iter().fold(StepTally::default(), StepTally::merge))
    }

    fn run_variant_filter(
        &self,
        filter: &VariantFilter,
        mode: AnalysisMode,
        genes: &mut [Gene],
    ) -> std::result::Result<StepTally, ProviderError> {
        let providers = &self.context.variant_data;
        let policy = self.config.provider_error_policy;
        let filter_type = filter.filter_type();
        let step = filter_type.as_str();

        self.for_each_gene(genes, |gene| {
            let mut tally = StepTally::default();
            for variant in gene.variants_mut() {
                if mode == AnalysisMode::PassOnly && !variant.passed_filters() {
                    continue;
                }
                let result = match filter.evaluate(variant, providers) {
                    Ok(result) => result,
                    Err(err) => contain(err, filter_type, policy, step, variant.key(), &mut tally)?,
                };
                tally.record(&result);
                variant.add_filter_result(result);
            }
            Ok(tally)
        })
    }

    fn run_gene_filter(
        &self,
        filter: &GeneFilter,
        analysis: &Analysis,
        genes: &mut [Gene],
    ) -> std::result::Result<StepTally, ProviderError> {
        let pedigree = analysis.pedigree();
        let mode = analysis.mode();
        let policy = self.config.provider_error_policy;
        let filter_type = filter.filter_type();
        let step = filter_type.as_str();

        self.for_each_gene(genes, |gene| {
            let mut tally = StepTally::default();
            if !gene_in_play(mode, gene) {
                return Ok(tally);
            }
            let result = match filter.evaluate(gene, pedigree) {
                Ok(GeneEvaluation { result, assessment }) => {
                    if let Some(assessment) = assessment {
                        for (index, modes) in assessment.variant_modes {
                            if let Some(variant) = gene.variants_mut().get_mut(index) {
                                variant.add_compatible_modes(modes);
                            }
                        }
                        gene.set_inheritance_assessment(assessment.compatible_modes, assessment.comp_het_pairs);
                    }
                    result
                }
                Err(err) => contain(err, filter_type, policy, step, gene.symbol.clone(), &mut tally)?,
            };
            tally.record(&result);
            gene.add_filter_result(result);
            Ok(tally)
        })
    }

    fn run_prioritiser(
        &self,
        prioritiser: &Prioritiser,
        analysis: &Analysis,
        genes: &mut [Gene],
    ) -> std::result::Result<StepTally, ProviderError> {
        let priority_type = prioritiser.priority_type();
        let considered: Vec<usize> = genes
            .iter()
            .enumerate()
            .filter(|(_, g)| gene_in_play(analysis.mode(), g))
            .map(|(i, _)| i)
            .collect();
        let refs: Vec<&Gene> = considered.iter().map(|&i| &genes[i]).collect();

        let scored = match &self.pool {
            Some(pool) if self.goes_parallel(refs.len()) => pool.install(|| {
                prioritiser.score(&refs, analysis.hpo_ids(), &self.context.priority_data, self.parallelism())
            }),
            _ => prioritiser.score(&refs, analysis.hpo_ids(), &self.context.priority_data, self.parallelism()),
        };

        let mut tally = StepTally::default();
        let scores = match scored {
            Ok(scores) => scores,
            Err(err) => match self.config.provider_error_policy {
                ProviderErrorPolicy::Abort => return Err(err),
                ProviderErrorPolicy::Record => {
                    tally.evaluated = considered.len();
                    tally.failed = considered.len();
                    tally.errors = 1;
                    tally.diagnostics.push(Diagnostic::error(Some(priority_type.as_str()), None, err.to_string()));
                    return Ok(tally);
                }
            },
        };

        for index in considered {
            let gene = &mut genes[index];
            tally.evaluated += 1;
            match scores.get(&gene.gene_id) {
                Some(&score) => {
                    gene.add_priority_score(priority_type, score);
                    tally.passed += 1;
                }
                None => tally.failed += 1,
            }
        }
        Ok(tally)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exomyx_common::{AnalysisDeclaration, VariantEvaluation};

    fn analysis(yaml: &str) -> Analysis {
        Analysis::from_declaration(&AnalysisDeclaration::from_yaml_str(yaml).unwrap()).unwrap()
    }

    fn gene_with_qualities(symbol: &str, id: u32, qualities: &[f64]) -> Gene {
        let mut gene = Gene::new(symbol, id);
        for (i, q) in qualities.iter().enumerate() {
            gene.add_variant(VariantEvaluation::new(3, 1000 + i as u32, "A", "C").with_gene(symbol, id).with_quality(*q));
        }
        gene
    }

    #[test]
    fn test_pass_only_skips_failed_variants() {
        let analysis = analysis(
            "analysisMode: PASS_ONLY\nsteps: [{kind: qualityFilter, options: {minQuality: 50}}, {kind: failedVariantFilter}]",
        );
        let runner = AnalysisRunner::new(RunnerConfig::sequential(), AnalysisContext::default()).unwrap();
        let results = runner.run(&analysis, vec![gene_with_qualities("A", 1, &[10.0, 90.0])]).unwrap();

        let gene = &results.genes[0];
        assert_eq!(gene.variants()[0].filter_results().len(), 1);
        assert_eq!(gene.variants()[1].filter_results().len(), 2);
        assert_eq!(results.step_reports[1].evaluated, 1);
    }

    #[test]
    fn test_full_mode_evaluates_everything() {
        let analysis = analysis(
            "analysisMode: FULL\nsteps: [{kind: qualityFilter, options: {minQuality: 50}}, {kind: failedVariantFilter}]",
        );
        let runner = AnalysisRunner::new(RunnerConfig::sequential(), AnalysisContext::default()).unwrap();
        let results = runner.run(&analysis, vec![gene_with_qualities("A", 1, &[10.0, 90.0])]).unwrap();
        assert_eq!(results.genes[0].variants()[0].filter_results().len(), 2);
        assert_eq!(results.step_reports[1].evaluated, 2);
    }

    #[test]
    fn test_nan_quality_is_contained() {
        let analysis = analysis("steps: [{kind: qualityFilter, options: {minQuality: 50}}]");
        let runner = AnalysisRunner::new(RunnerConfig::sequential(), AnalysisContext::default()).unwrap();
        let results = runner.run(&analysis, vec![gene_with_qualities("A", 1, &[f64::NAN, 90.0])]).unwrap();

        let variant = &results.genes[0].variants()[0];
        assert!(!variant.passed_filters());
        assert!(variant.filter_results()[0].message().is_some());
        assert_eq!(results.step_reports[0].errors, 1);
        assert_eq!(results.warnings().count(), 1);
    }

    #[test]
    fn test_pass_only_gene_steps_skip_genes_without_variants() {
        let declaration = AnalysisDeclaration {
            inheritance_modes: vec!["AUTOSOMAL_DOMINANT".to_string()],
            ..AnalysisDeclaration::default()
        }
        .with_step(exomyx_common::StepDeclaration::new(exomyx_common::StepKind::InheritanceFilter));
        let analysis = Analysis::from_declaration(&declaration).unwrap();
        let runner = AnalysisRunner::new(RunnerConfig::sequential(), AnalysisContext::default()).unwrap();

        let results = runner
            .run(&analysis, vec![gene_with_qualities("A", 1, &[90.0]), Gene::new("EMPTY", 2)])
            .unwrap();

        assert_eq!(results.step_reports[0].evaluated, 1);
        let empty = results.gene("EMPTY").unwrap();
        assert!(empty.filter_results().is_empty());
        assert!(!empty.passed_filters());
        assert!(results.passed_genes().all(|g| g.symbol != "EMPTY"));
    }

    #[test]
    fn test_empty_gene_list_completes() {
        let analysis = analysis("steps: [{kind: failedVariantFilter}]");
        let runner = AnalysisRunner::new(RunnerConfig::default(), AnalysisContext::default()).unwrap();
        let results = runner.run(&analysis, vec![]).unwrap();
        assert_eq!(results.state, RunState::Completed);
        assert_eq!(results.step_reports.len(), 1);
        assert_eq!(results.step_reports[0].evaluated, 0);
    }

    #[test]
    fn test_dedicated_pool_from_worker_threads() {
        let config = RunnerConfig { worker_threads: 2, parallel_threshold: 1, ..RunnerConfig::default() };
        let runner = AnalysisRunner::new(config, AnalysisContext::default()).unwrap();
        let analysis = analysis("steps: [{kind: qualityFilter, options: {minQuality: 50}}]");
        let genes = vec![gene_with_qualities("A", 1, &[10.0]), gene_with_qualities("B", 2, &[60.0])];
        let results = runner.run(&analysis, genes).unwrap();
        assert_eq!(results.passed_genes().count(), 1);
    }
}
