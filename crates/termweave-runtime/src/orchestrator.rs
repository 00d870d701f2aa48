//! Orchestrator — one run from initial analysis to final report.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};
use termweave_analyze::{analyze_document, CoverageAnalysis};
use termweave_core::{InjectionOptions, Term};
use termweave_inject::{
    inject_headers, inject_sentence, InsertionPointLocator, SaturationCounters,
};
use termweave_markup::Document;
use tracing::{debug, info, warn};

use crate::types::*;

/// Runs injections with fixed options and an optional fixed seed.
pub struct Orchestrator {
    options: InjectionOptions,
    seed: Option<u64>,
}

impl Orchestrator {
    pub fn new(options: InjectionOptions) -> Self {
        Self {
            options,
            seed: None,
        }
    }

    /// Same seed, same input ⇒ same output.
    pub fn with_seed(options: InjectionOptions, seed: u64) -> Self {
        Self {
            options,
            seed: Some(seed),
        }
    }

    pub fn run(&self, content: &str, terms: &[Term]) -> InjectionResult {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        inject_missing_terms(content, terms, &self.options, &mut rng)
    }
}

/// Insert missing terms into `content` until raw coverage reaches the target,
/// the insertion budget runs out, or every missing term has been tried.
pub fn inject_missing_terms<R: Rng + ?Sized>(
    content: &str,
    terms: &[Term],
    options: &InjectionOptions,
    rng: &mut R,
) -> InjectionResult {
    let mut run = Run::new(content, options);
    let mut doc = Document::parse(content);

    let initial = analyze_document(&doc, terms);
    if initial.total_terms == 0 {
        debug!("Nothing to analyze; passing content through");
        return run.finish_early(content, initial);
    }
    if initial.raw_score >= run.target {
        info!(
            "Coverage {}% already meets target {}%",
            initial.raw_score, run.target
        );
        return run.finish_early(content, initial);
    }

    let mut work = initial.missing_terms.clone();
    if options.prioritize_important {
        work.sort_by(|a, b| {
            b.is_critical()
                .cmp(&a.is_critical())
                .then(b.weight().cmp(&a.weight()))
        });
    }

    info!(
        "Run {}: coverage {}%, target {}%, {} missing terms",
        run.id,
        initial.raw_score,
        run.target,
        work.len()
    );

    if options.inject_headers {
        run.enter(RunState::HeaderPass);
        let headed = run.header_pass(&mut doc, &work, rng);
        work.retain(|t| !headed.contains(&t.key()));
    }

    run.enter(RunState::BodyPass);
    run.body_pass(&mut doc, terms, &work, rng);

    let final_coverage = analyze_document(&doc, terms);
    run.finish(doc.into_markup(), initial, final_coverage)
}

/// Mutable bookkeeping for one run.
struct Run<'a> {
    id: String,
    state: RunState,
    options: &'a InjectionOptions,
    target: u32,
    input_digest: String,
    added: Vec<String>,
    failed: Vec<String>,
    skipped: Vec<String>,
    report: Vec<InsertionReportEntry>,
}

impl<'a> Run<'a> {
    fn new(content: &str, options: &'a InjectionOptions) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            state: RunState::Initialized,
            options,
            target: options.target(),
            input_digest: digest(content),
            added: Vec::new(),
            failed: Vec::new(),
            skipped: Vec::new(),
            report: Vec::new(),
        }
    }

    fn enter(&mut self, state: RunState) {
        debug!("Run {}: {:?} -> {:?}", self.id, self.state, state);
        self.state = state;
    }

    /// Rewrite headings for heading-class terms. Returns keys of injected terms.
    ///
    /// Spends its whole budget regardless of the target score.
    fn header_pass<R: Rng + ?Sized>(
        &mut self,
        doc: &mut Document,
        work: &[Term],
        rng: &mut R,
    ) -> Vec<String> {
        let candidates: Vec<Term> = work
            .iter()
            .filter(|t| t.category.is_heading_class())
            .cloned()
            .collect();
        let budget = self.options.header_budget().min(self.options.max_insertions);
        let injections = inject_headers(doc, &candidates, budget, rng);

        let mut keys = Vec::with_capacity(injections.len());
        for injection in injections {
            debug!("Heading now reads {:?}", injection.heading);
            keys.push(injection.term.key());
            self.added.push(injection.term.text.clone());
            self.report.push(InsertionReportEntry {
                term: injection.term.text,
                placement_kind: PlacementKind::Heading,
                template_used: format!("heading:{}", injection.style.name()),
                relevance_score: SYNTHETIC_HEADING_SCORE,
            });
        }
        if !keys.is_empty() {
            info!("Header pass injected {} terms", keys.len());
        }
        keys
    }

    /// Splice one sentence per remaining term, re-scoring before each attempt.
    fn body_pass<R: Rng + ?Sized>(
        &mut self,
        doc: &mut Document,
        terms: &[Term],
        work: &[Term],
        rng: &mut R,
    ) {
        let locator = InsertionPointLocator::new(self.options.include_containers);
        let mut saturation = SaturationCounters::new();

        for (idx, term) in work.iter().enumerate() {
            if self.added.len() >= self.options.max_insertions {
                debug!("Insertion budget of {} reached", self.options.max_insertions);
                self.skip_rest(&work[idx..]);
                break;
            }

            let live = analyze_document(doc, terms);
            if live.raw_score >= self.target {
                info!(
                    "Target reached at {}% with {} terms left untouched",
                    live.raw_score,
                    work.len() - idx
                );
                self.skip_rest(&work[idx..]);
                break;
            }
            if live.occurrences(&term.text) > 0 {
                debug!("{:?} was covered by an earlier edit", term.text);
                continue;
            }

            let points = locator.find(doc, term, &saturation);
            let Some(best) = points.first() else {
                warn!("No insertion point for {:?}", term.text);
                self.failed.push(term.text.clone());
                continue;
            };

            match inject_sentence(doc, best, term, rng) {
                Ok(injected) => {
                    *saturation.entry(best.block).or_insert(0) += 1;
                    self.added.push(term.text.clone());
                    self.report.push(InsertionReportEntry {
                        term: term.text.clone(),
                        placement_kind: best.block_kind.into(),
                        template_used: injected.template.to_string(),
                        relevance_score: best.relevance_score,
                    });
                }
                Err(e) => {
                    warn!("Insertion failed for {:?}: {}", term.text, e);
                    self.failed.push(term.text.clone());
                }
            }
        }
    }

    fn skip_rest(&mut self, rest: &[Term]) {
        self.skipped.extend(rest.iter().map(|t| t.text.clone()));
    }

    fn finish_early(mut self, content: &str, coverage: CoverageAnalysis) -> InjectionResult {
        self.enter(RunState::EarlyExit);
        self.finish(content.to_string(), coverage.clone(), coverage)
    }

    fn finish(
        mut self,
        final_content: String,
        initial_coverage: CoverageAnalysis,
        final_coverage: CoverageAnalysis,
    ) -> InjectionResult {
        if self.state != RunState::EarlyExit {
            self.enter(RunState::Finalized);
            info!(
                "Run {} finished: {}% -> {}%, {} added, {} failed",
                self.id,
                initial_coverage.raw_score,
                final_coverage.raw_score,
                self.added.len(),
                self.failed.len()
            );
        }

        InjectionResult {
            output_digest: digest(&final_content),
            run_id: self.id,
            state: self.state,
            final_content,
            added_terms: self.added,
            failed_terms: self.failed,
            skipped_terms: self.skipped,
            initial_coverage,
            final_coverage,
            insertion_report: self.report,
            input_digest: self.input_digest,
            completed_at: chrono::Utc::now(),
        }
    }
}

fn digest(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}
